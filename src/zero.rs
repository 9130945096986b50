//! Zero values for early returns
//!
//! Repository methods return a zero value for every result but the error.
//! Unknown types never fail: a placeholder `type T struct{}` file is
//! produced instead so the generated package still compiles.

use crate::error::{Error, Result};
use crate::imports::{is_go_reserved, is_identifier};
use crate::model::OutputFile;
use crate::plan::FilePlanner;
use genco::prelude::*;
use std::collections::BTreeSet;

/// Go package of the placeholder type files
pub const PLACEHOLDER_PACKAGE: &str = "model";

/// Literal for one result position
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ZeroLiteral {
    /// The `error` position; the caller substitutes its error variable
    NoError,
    Expr(String),
}

/// A zero value and the placeholder type it relies on, if any
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZeroValue {
    pub literal: ZeroLiteral,
    pub side_file: Option<OutputFile>,
}

impl ZeroValue {
    fn expr(literal: impl Into<String>) -> Self {
        Self {
            literal: ZeroLiteral::Expr(literal.into()),
            side_file: None,
        }
    }
}

/// Zero value table
#[derive(Debug, Clone, Default)]
pub struct ZeroValues {
    /// Rendered types whose zero value is `""`
    string_types: BTreeSet<String>,
}

impl ZeroValues {
    pub fn new() -> Self {
        Self::default()
    }

    /// Treat these rendered types (`model.OrderID`) as string-like
    pub fn with_string_types<I, S>(mut self, types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.string_types.extend(types.into_iter().map(Into::into));
        self
    }

    /// Zero value for a rendered type
    ///
    /// Placeholder files are planned into the folder of `planner`.
    pub fn zero_value(&self, rendered: &str, planner: &FilePlanner) -> Result<ZeroValue> {
        let builtin = match rendered {
            "error" => {
                return Ok(ZeroValue {
                    literal: ZeroLiteral::NoError,
                    side_file: None,
                })
            }
            "int" | "int8" | "int16" | "int32" | "int64" | "uint" | "uint8" | "uint16"
            | "uint32" | "uint64" | "uintptr" | "byte" | "rune" | "complex64" | "complex128" => {
                Some("0")
            }
            "float32" | "float64" => Some("0.0"),
            "bool" => Some("false"),
            "string" => Some(r#""""#),
            "any" | "interface{}" => Some("nil"),
            t if t.starts_with("map[") || t.starts_with("func") || t.starts_with("chan") => {
                Some("nil")
            }
            _ => None,
        };
        if let Some(literal) = builtin {
            return Ok(ZeroValue::expr(literal));
        }
        if self.string_types.contains(rendered) {
            return Ok(ZeroValue::expr(r#""""#));
        }

        let literal = if rendered.starts_with('*') || rendered.starts_with("[]") {
            "nil".to_string()
        } else {
            format!("{}{{}}", rendered)
        };

        // composite element types (`[]map[string]int`, `struct{}`) name no type
        let type_name = trailing_identifier(rendered);
        let side_file = if is_identifier(type_name) && !is_go_reserved(type_name) {
            Some(OutputFile::new(
                planner.placeholder(type_name),
                placeholder_source(type_name)?,
            ))
        } else {
            None
        };

        Ok(ZeroValue {
            literal: ZeroLiteral::Expr(literal),
            side_file,
        })
    }
}

/// `[]*model.Order` → `Order`
pub fn trailing_identifier(rendered: &str) -> &str {
    let unwrapped = rendered.trim_start_matches(['*', '[', ']']);
    unwrapped.rsplit('.').next().unwrap_or(unwrapped)
}

fn placeholder_source(type_name: &str) -> Result<String> {
    let tokens: go::Tokens = quote! {
        package $PLACEHOLDER_PACKAGE
        $['\n']
        type $type_name struct {}
    };
    tokens
        .to_file_string()
        .map_err(|e| Error::Render(format!("placeholder type {}: {}", type_name, e)))
}
