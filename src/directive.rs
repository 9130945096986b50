//! Query directives in method comments
//!
//! A repository method picks its sqlx call through a comment such as
//!
//! ```go
//! Get(ctx context.Context, id OrderID) (Order, error) // sqlx: GetContext
//! ```

use regex::Regex;
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

/// Marker token that introduces a directive
pub const MARKER: &str = "sqlx:";

/// Extract the identifier following the `sqlx:` marker, if any
pub fn parse_directive(comment: &str) -> Option<&str> {
    static DIRECTIVE: OnceLock<Regex> = OnceLock::new();
    let re = DIRECTIVE.get_or_init(|| {
        Regex::new(&format!(r"{}\s*(\w+)", regex::escape(MARKER))).expect("valid directive regex")
    });
    re.captures(comment)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// How a repository method executes its query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExecShape {
    /// `ExecContext`, no result binding
    Exec,
    /// `SelectContext`, rows bound into a buffer
    Select,
    /// `GetContext`, a single row bound into a buffer
    Get,
}

impl ExecShape {
    /// sqlx method invoked for this shape
    pub fn sqlx_method(self) -> &'static str {
        match self {
            ExecShape::Exec => "ExecContext",
            ExecShape::Select => "SelectContext",
            ExecShape::Get => "GetContext",
        }
    }

    /// Variable the result is bound into, if any
    pub fn binding(self) -> Option<&'static str> {
        match self {
            ExecShape::Exec => None,
            ExecShape::Select => Some("items"),
            ExecShape::Get => Some("item"),
        }
    }
}

impl FromStr for ExecShape {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ExecContext" => Ok(ExecShape::Exec),
            "SelectContext" => Ok(ExecShape::Select),
            "GetContext" => Ok(ExecShape::Get),
            other => Err(format!("unknown sqlx directive `{}`", other)),
        }
    }
}

impl fmt::Display for ExecShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.sqlx_method())
    }
}
