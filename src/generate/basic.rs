//! Basic strategy: panicking stubs

use super::{OutputSet, RenderedMethod, Unit, OTEL_PATH};
use crate::error::Result;
use crate::model::OutputFile;
use crate::templates::context::{
    import_views, BasicMethodContext, HolderContext, MethodFileContext, SignatureView, SpanView,
};
use crate::templates::{self, BASIC_HOLDER, BASIC_METHOD, METHOD_FILE};
use std::collections::BTreeSet;
use tracing::debug;

pub(super) fn generate(unit: &Unit<'_>, out: &mut OutputSet) -> Result<()> {
    let mandatory: &[(&str, &str)] = if unit.opts.tracing {
        &[(OTEL_PATH, "otel")]
    } else {
        &[]
    };
    let aliases = unit.aliases(mandatory);
    let tracer = aliases.get(OTEL_PATH).unwrap_or("otel");

    let mut methods = Vec::with_capacity(unit.iface.methods.len());
    for method in &unit.iface.methods {
        let sig = unit.signature(method, &aliases)?;
        let mut uses = unit.signature_paths(method);

        let span = match sig.arg_names.first() {
            Some(ctx) if unit.opts.tracing && method.takes_context() => {
                uses.insert(OTEL_PATH.to_string());
                Some(SpanView {
                    ctx: ctx.clone(),
                    tracer: tracer.to_string(),
                    name: unit.span_name(&method.name),
                })
            }
            _ => None,
        };
        debug!(method = %method.name, traced = span.is_some(), "rendering stub");

        let body = templates::render_fragment(
            BASIC_METHOD,
            BasicMethodContext {
                struct_name: unit.struct_name().to_string(),
                sig: SignatureView::from(&sig),
                span,
            },
        )?;
        methods.push(RenderedMethod {
            name: method.name.clone(),
            body,
            uses,
        });
    }

    let holder_path = unit.planner.holder(unit.struct_name());
    if unit.opts.single_file {
        let uses: BTreeSet<String> = methods.iter().flat_map(|m| m.uses.iter().cloned()).collect();
        let holder = templates::render(
            BASIC_HOLDER,
            HolderContext {
                package: unit.package.clone(),
                imports: import_views(&aliases, &uses),
                struct_name: unit.struct_name().to_string(),
                sqlx: None,
                trmsqlx: None,
                methods: methods.into_iter().map(|m| m.body).collect(),
            },
        )?;
        return out.push(OutputFile::new(holder_path, holder), unit.source("holder"));
    }

    let holder = templates::render(
        BASIC_HOLDER,
        HolderContext {
            package: unit.package.clone(),
            imports: Vec::new(),
            struct_name: unit.struct_name().to_string(),
            sqlx: None,
            trmsqlx: None,
            methods: Vec::new(),
        },
    )?;
    out.push(OutputFile::new(holder_path, holder), unit.source("holder"))?;

    for method in methods {
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

    Ok(())
}
