//! Method signatures as Go text

use super::{render_type, RenderError};
use crate::imports::AliasTable;
use crate::model::{Method, TypeRef};

/// A method signature with every type rendered
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature {
    pub name: String,
    pub arg_names: Vec<String>,
    pub arg_types: Vec<String>,
    pub results: Vec<String>,
}

impl Signature {
    pub fn render(
        method: &Method,
        aliases: &AliasTable,
        local_package: Option<&str>,
    ) -> Result<Self, RenderError> {
        let mut arg_types = method
            .inputs
            .iter()
            .map(|p| render_type(&p.typ, aliases, local_package))
            .collect::<Result<Vec<_>, _>>()?;

        if let Some(variadic) = &method.variadic {
            let typ = match &variadic.typ {
                TypeRef::Variadic(_) => render_type(&variadic.typ, aliases, local_package)?,
                element => format!("...{}", render_type(element, aliases, local_package)?),
            };
            arg_types.push(typ);
        }

        let results = method
            .outputs
            .iter()
            .map(|p| render_type(&p.typ, aliases, local_package))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            name: method.name.clone(),
            arg_names: arg_names(method),
            arg_types,
            results,
        })
    }

    /// `ctx context.Context, id int64`
    pub fn params(&self) -> String {
        self.arg_names
            .iter()
            .zip(&self.arg_types)
            .map(|(name, typ)| format!("{} {}", name, typ))
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Result clause including its leading space: ``, ` error`, ` (T, error)`
    pub fn results_clause(&self) -> String {
        match self.results.len() {
            0 => String::new(),
            1 => format!(" {}", self.results[0]),
            _ => format!(" ({})", self.results.join(", ")),
        }
    }
}

/// Parameter names, with empty or `_` names replaced by `argN`
///
/// `N` is the parameter position; the variadic parameter counts as last.
pub fn arg_names(method: &Method) -> Vec<String> {
    method
        .all_inputs()
        .enumerate()
        .map(|(i, p)| {
            if p.name.is_empty() || p.name == "_" {
                format!("arg{}", i)
            } else {
                p.name.clone()
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::imports::ImportResolver;
    use crate::model::Parameter;
    use pretty_assertions::assert_eq;

    fn method() -> Method {
        Method {
            name: "Find".into(),
            inputs: vec![
                Parameter::new("ctx", TypeRef::context()),
                Parameter::new("_", TypeRef::bare("int")),
            ],
            outputs: vec![
                Parameter::unnamed(TypeRef::slice(TypeRef::qualified("example.com/dto", "Item"))),
                Parameter::unnamed(TypeRef::bare("error")),
            ],
            variadic: Some(Parameter::unnamed(TypeRef::qualified(
                "example.com/dto",
                "Option",
            ))),
            comment: String::new(),
        }
    }

    #[test]
    fn test_signature() {
        let aliases = ImportResolver::new().resolve(["context", "example.com/dto"], &[]);
        let sig = Signature::render(&method(), &aliases, None).unwrap();

        assert_eq!(sig.arg_names, vec!["ctx", "arg1", "arg2"]);
        assert_eq!(
            sig.params(),
            "ctx context.Context, arg1 int, arg2 ...dto.Option"
        );
        assert_eq!(sig.results_clause(), " ([]dto.Item, error)");
    }

    #[test]
    fn test_results_clause_shapes() {
        let mut sig = Signature {
            name: "Close".into(),
            arg_names: vec![],
            arg_types: vec![],
            results: vec![],
        };
        assert_eq!(sig.results_clause(), "");
        sig.results.push("error".into());
        assert_eq!(sig.results_clause(), " error");
    }
}
