//! Template context structures
//!
//! Converts rendered signatures and resolved imports into template-friendly
//! data structures. Every field is plain text: all Go-specific decisions are
//! made before a context is built.

use crate::imports::AliasTable;
use crate::render::Signature;
use serde::Serialize;
use std::collections::BTreeSet;

/// One line of an import block
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImportView {
    pub alias: String,
    pub path: String,
}

/// Import block for a file using `paths`, sorted by path
///
/// Paths without an alias (the implementation's own package) are skipped.
pub fn import_views(aliases: &AliasTable, paths: &BTreeSet<String>) -> Vec<ImportView> {
    paths
        .iter()
        .filter_map(|path| {
            aliases.get(path).map(|alias| ImportView {
                alias: alias.to_string(),
                path: path.clone(),
            })
        })
        .collect()
}

/// A method signature ready for a `func` line
#[derive(Debug, Clone, Serialize)]
pub struct SignatureView {
    pub name: String,
    /// `ctx context.Context, id int64`
    pub params: String,
    /// Result clause with its leading space
    pub results: String,
}

impl From<&Signature> for SignatureView {
    fn from(sig: &Signature) -> Self {
        Self {
            name: sig.name.clone(),
            params: sig.params(),
            results: sig.results_clause(),
        }
    }
}

/// Tracing span opened at the top of a stub body
#[derive(Debug, Clone, Serialize)]
pub struct SpanView {
    /// Context variable the span is derived from
    pub ctx: String,
    /// Alias of the otel package
    pub tracer: String,
    pub name: String,
}

/// Context for `go/basic/method.jinja`
#[derive(Debug, Clone, Serialize)]
pub struct BasicMethodContext {
    pub struct_name: String,
    pub sig: SignatureView,
    pub span: Option<SpanView>,
}

/// Context for `go/repo/method.jinja`
#[derive(Debug, Clone, Serialize)]
pub struct RepoMethodContext {
    pub struct_name: String,
    pub sig: SignatureView,
    /// Context variable name
    pub ctx: String,
    /// Declare `ctx := context.Background()` first
    pub background: bool,
    /// Alias of the `context` package
    pub context: String,
    /// Alias of the otel package
    pub otel: String,
    pub span_name: String,
    /// Buffer the query result is bound into
    pub binding: Option<String>,
    /// The query call, assigning `err`
    pub statement: String,
    /// Return operands with their leading space
    pub returns: String,
}

/// Context for the holder templates
#[derive(Debug, Clone, Serialize)]
pub struct HolderContext {
    pub package: String,
    pub imports: Vec<ImportView>,
    pub struct_name: String,
    /// Alias of sqlx (repository holder only)
    pub sqlx: Option<String>,
    /// Alias of the transaction manager's sqlx adapter (repository holder only)
    pub trmsqlx: Option<String>,
    /// Method bodies appended in single-file layout
    pub methods: Vec<String>,
}

/// Context for `go/method_file.jinja`
#[derive(Debug, Clone, Serialize)]
pub struct MethodFileContext {
    pub package: String,
    pub imports: Vec<ImportView>,
    pub body: String,
}

/// Context for `go/repo/queries.jinja`
#[derive(Debug, Clone, Serialize)]
pub struct QueriesContext {
    /// Method names; each becomes an embedded `string` variable
    pub queries: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::imports::ImportResolver;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_import_views_sorted_and_filtered() {
        let aliases = ImportResolver::new().resolve(
            ["github.com/acme/shop/model", "context"],
            &[("go.opentelemetry.io/otel", "otel")],
        );
        let used: BTreeSet<String> = [
            "go.opentelemetry.io/otel",
            "context",
            "github.com/acme/shop/repo",
        ]
        .into_iter()
        .map(String::from)
        .collect();

        let views = import_views(&aliases, &used);
        assert_eq!(
            views,
            vec![
                ImportView {
                    alias: "context".into(),
                    path: "context".into()
                },
                ImportView {
                    alias: "otel".into(),
                    path: "go.opentelemetry.io/otel".into()
                },
            ]
        );
    }
}
