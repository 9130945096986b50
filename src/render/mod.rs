//! Type rendering: model types back to Go source text
//!
//! Rendering needs the alias table of the current generation call: a
//! qualified type is written with the alias its import path resolved to,
//! not with whatever name the source file used.

mod signature;

pub use signature::{arg_names, Signature};

use crate::imports::AliasTable;
use crate::model::TypeRef;
use thiserror::Error;

/// Text written for any function type
///
/// Function types are not rendered structurally.
pub const FUNC_PLACEHOLDER: &str = "func";

/// A type the renderer cannot express
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RenderError {
    #[error("unsupported type `{0}`")]
    Unsupported(String),

    #[error("no alias resolved for import path `{0}`")]
    UnresolvedPackage(String),
}

/// Render a type with the aliases of `aliases`
///
/// Types qualified with `local_package` are written unqualified, for code
/// generated into the package that declares them.
pub fn render_type(
    typ: &TypeRef,
    aliases: &AliasTable,
    local_package: Option<&str>,
) -> Result<String, RenderError> {
    let mut out = String::new();
    write_type(&mut out, typ, aliases, local_package)?;
    Ok(out)
}

fn write_type(
    out: &mut String,
    typ: &TypeRef,
    aliases: &AliasTable,
    local_package: Option<&str>,
) -> Result<(), RenderError> {
    match typ {
        TypeRef::Bare(name) => out.push_str(name),
        TypeRef::Qualified { package, name } => {
            if local_package == Some(package.as_str()) {
                out.push_str(name);
            } else {
                let alias = aliases
                    .get(package)
                    .ok_or_else(|| RenderError::UnresolvedPackage(package.clone()))?;
                out.push_str(alias);
                out.push('.');
                out.push_str(name);
            }
        }
        TypeRef::Pointer(inner) => {
            out.push('*');
            write_type(out, inner, aliases, local_package)?;
        }
        TypeRef::Slice(inner) => {
            out.push_str("[]");
            write_type(out, inner, aliases, local_package)?;
        }
        TypeRef::Map { key, value } => {
            out.push_str("map[");
            write_type(out, key, aliases, local_package)?;
            out.push(']');
            write_type(out, value, aliases, local_package)?;
        }
        TypeRef::Variadic(inner) => {
            out.push_str("...");
            write_type(out, inner, aliases, local_package)?;
        }
        TypeRef::Func => out.push_str(FUNC_PLACEHOLDER),
        TypeRef::Unknown(text) => return Err(RenderError::Unsupported(text.clone())),
    }
    Ok(())
}
