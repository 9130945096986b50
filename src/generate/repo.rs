//! Repository strategy: sqlx-backed bodies
//!
//! Every method gets a query slot: an empty `sql/<method>.sql` file embedded
//! into a string variable of the `sql` subpackage. The method body opens a
//! span, runs the query through the transaction-aware `ctxGetter` and
//! returns zero values plus the observed error.

use super::{
    OutputSet, RenderedMethod, Unit, CONTEXT_PATH, OTEL_PATH, SQLX_PATH, TRMSQLX_PATH,
};
use crate::directive::{parse_directive, ExecShape};
use crate::error::Result;
use crate::imports::AliasTable;
use crate::model::{Method, OutputFile};
use crate::render::Signature;
use crate::templates::context::{
    import_views, HolderContext, MethodFileContext, QueriesContext, RepoMethodContext,
    SignatureView,
};
use crate::templates::{self, METHOD_FILE, REPO_HOLDER, REPO_METHOD, REPO_QUERIES};
use crate::zero::{ZeroLiteral, ZeroValues};
use std::collections::BTreeSet;
use tracing::{debug, warn};

/// Name of the query subpackage
const QUERY_PACKAGE: &str = "sql";

/// Query call picked for a method
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum QueryCall {
    /// A recognized directive
    Directive(ExecShape),
    /// No usable directive: a bare exec without query text
    Fallback,
}

fn query_call(method: &Method) -> QueryCall {
    match parse_directive(&method.comment) {
        None => QueryCall::Fallback,
        Some(word) => match word.parse::<ExecShape>() {
            Ok(shape) => QueryCall::Directive(shape),
            Err(reason) => {
                warn!(method = %method.name, "{}, falling back to a bare exec", reason);
                QueryCall::Fallback
            }
        },
    }
}

pub(super) fn generate(unit: &Unit<'_>, out: &mut OutputSet) -> Result<()> {
    let query_path = unit
        .planner
        .import_path(unit.opts.module_path.as_deref(), Some(QUERY_PACKAGE));
    let aliases = unit.aliases(&[
        (OTEL_PATH, "otel"),
        (SQLX_PATH, "sqlx"),
        (TRMSQLX_PATH, "trmsqlx"),
        (CONTEXT_PATH, "context"),
        (query_path.as_str(), QUERY_PACKAGE),
    ]);
    let zeros = ZeroValues::new().with_string_types(unit.opts.string_types.iter().cloned());

    let mut methods = Vec::with_capacity(unit.iface.methods.len());
    let mut side_files = Vec::new();
    for method in &unit.iface.methods {
        let sig = unit.signature(method, &aliases)?;
        let mut uses = unit.signature_paths(method);
        uses.insert(OTEL_PATH.to_string());

        let (ctx, background) = match context_arg(method, &sig) {
            Some(name) => (name, false),
            None => {
                uses.insert(CONTEXT_PATH.to_string());
                (fresh_name("ctx", &sig.arg_names), true)
            }
        };

        let call = query_call(method);
        if call != QueryCall::Fallback {
            uses.insert(query_path.clone());
        }
        debug!(method = %method.name, ?call, "rendering repository method");

        let mut returns = Vec::with_capacity(sig.results.len());
        for rendered in &sig.results {
            let zero = zeros.zero_value(rendered, &unit.planner)?;
            returns.push(match zero.literal {
                ZeroLiteral::NoError => "err".to_string(),
                ZeroLiteral::Expr(expr) => expr,
            });
            if let Some(file) = zero.side_file {
                side_files.push((method.name.clone(), file));
            }
        }

        let body = templates::render_fragment(
            REPO_METHOD,
            RepoMethodContext {
                struct_name: unit.struct_name().to_string(),
                sig: SignatureView::from(&sig),
                statement: statement(call, &ctx, &sig, &aliases, &query_path),
                ctx,
                background,
                context: alias(&aliases, CONTEXT_PATH, "context"),
                otel: alias(&aliases, OTEL_PATH, "otel"),
                span_name: unit.span_name(&method.name),
                binding: match call {
                    QueryCall::Directive(shape) => shape.binding().map(String::from),
                    QueryCall::Fallback => None,
                },
                returns: if returns.is_empty() {
                    String::new()
                } else {
                    format!(" {}", returns.join(", "))
                },
            },
        )?;
        methods.push(RenderedMethod {
            name: method.name.clone(),
            body,
            uses,
        });
    }

    let queries: Vec<String> = methods.iter().map(|m| m.name.clone()).collect();

    let mut holder_uses: BTreeSet<String> = [SQLX_PATH, TRMSQLX_PATH].into_iter().map(String::from).collect();
    let holder_methods = if unit.opts.single_file {
        holder_uses.extend(methods.iter().flat_map(|m| m.uses.iter().cloned()));
        methods.iter().map(|m| m.body.clone()).collect()
    } else {
        Vec::new()
    };
    let holder = templates::render(
        REPO_HOLDER,
        HolderContext {
            package: unit.package.clone(),
            imports: import_views(&aliases, &holder_uses),
            struct_name: unit.struct_name().to_string(),
            sqlx: Some(alias(&aliases, SQLX_PATH, "sqlx")),
            trmsqlx: Some(alias(&aliases, TRMSQLX_PATH, "trmsqlx")),
            methods: holder_methods,
        },
    )?;
    out.push(
        OutputFile::new(unit.planner.holder(unit.struct_name()), holder),
        unit.source("holder"),
    )?;

    for method in methods {
        if !unit.opts.single_file {
            let content = templates::render(
                METHOD_FILE,
                MethodFileContext {
                    package: unit.package.clone(),
                    imports: import_views(&aliases, &method.uses),
                    body: method.body,
                },
            )?;
            out.push(
                OutputFile::new(unit.planner.method(&method.name), content),
                unit.source(&method.name),
            )?;
        }
        out.push(
            OutputFile::new(unit.planner.query(&method.name), Vec::<u8>::new()),
            unit.source(&format!("{} query", method.name)),
        )?;
        for (_, file) in side_files.iter().filter(|(owner, _)| *owner == method.name) {
            out.push_placeholder(file.clone(), unit.source(&method.name));
        }
    }

    let aggregator = templates::render(REPO_QUERIES, QueriesContext { queries })?;
    out.push(
        OutputFile::new(unit.planner.queries(), aggregator),
        unit.source("queries"),
    )
}

/// Name of the first non-variadic `context.Context` argument
fn context_arg(method: &Method, sig: &Signature) -> Option<String> {
    method
        .inputs
        .iter()
        .position(|p| p.typ.is_context())
        .and_then(|i| sig.arg_names.get(i).cloned())
}

/// `base`, suffixed with `0`, `1`, ... until no argument uses it
fn fresh_name(base: &str, taken: &[String]) -> String {
    let mut name = base.to_string();
    let mut i = 0;
    while taken.iter().any(|t| *t == name) {
        name = format!("{}{}", base, i);
        i += 1;
    }
    name
}

fn alias(aliases: &AliasTable, path: &str, fallback: &str) -> String {
    aliases.get(path).unwrap_or(fallback).to_string()
}

/// The query call assigning `err`
fn statement(
    call: QueryCall,
    ctx: &str,
    sig: &Signature,
    aliases: &AliasTable,
    query_path: &str,
) -> String {
    let db = format!("i.ctxGetter.DefaultTrOrDB({}, i.db)", ctx);
    let query = format!("{}.{}", alias(aliases, query_path, QUERY_PACKAGE), sig.name);
    match call {
        QueryCall::Fallback => format!("_, err = {}.ExecContext({})", db, ctx),
        QueryCall::Directive(ExecShape::Exec) => {
            format!("_, err = {}.ExecContext({}, {})", db, ctx, query)
        }
        QueryCall::Directive(shape) => format!(
            "err = {}.{}({}, &{}, {})",
            db,
            shape.sqlx_method(),
            ctx,
            shape.binding().unwrap_or("item"),
            query
        ),
    }
}
