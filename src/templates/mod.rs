//! Template-based Go generation
//!
//! Uses MiniJinja templates, embedded in the binary, for every generated Go
//! file. Templates are looked up by name through the loader, so a missing
//! template surfaces as a render error rather than at start-up.

pub mod context;
pub mod filters;

use minijinja::{AutoEscape, Environment};
use serde::Serialize;
use std::sync::OnceLock;

// Embedded templates (compiled into binary)
mod embedded {
    pub const IMPORTS: &str = include_str!("../../templates/go/imports.jinja");
    pub const METHOD_FILE: &str = include_str!("../../templates/go/method_file.jinja");

    pub const BASIC_HOLDER: &str = include_str!("../../templates/go/basic/holder.jinja");
    pub const BASIC_METHOD: &str = include_str!("../../templates/go/basic/method.jinja");

    pub const REPO_HOLDER: &str = include_str!("../../templates/go/repo/holder.jinja");
    pub const REPO_METHOD: &str = include_str!("../../templates/go/repo/method.jinja");
    pub const REPO_QUERIES: &str = include_str!("../../templates/go/repo/queries.jinja");

    pub fn lookup(name: &str) -> Option<&'static str> {
        Some(match name {
            super::IMPORTS => IMPORTS,
            super::METHOD_FILE => METHOD_FILE,
            super::BASIC_HOLDER => BASIC_HOLDER,
            super::BASIC_METHOD => BASIC_METHOD,
            super::REPO_HOLDER => REPO_HOLDER,
            super::REPO_METHOD => REPO_METHOD,
            super::REPO_QUERIES => REPO_QUERIES,
            _ => return None,
        })
    }
}

pub const IMPORTS: &str = "go/imports.jinja";
pub const METHOD_FILE: &str = "go/method_file.jinja";
pub const BASIC_HOLDER: &str = "go/basic/holder.jinja";
pub const BASIC_METHOD: &str = "go/basic/method.jinja";
pub const REPO_HOLDER: &str = "go/repo/holder.jinja";
pub const REPO_METHOD: &str = "go/repo/method.jinja";
pub const REPO_QUERIES: &str = "go/repo/queries.jinja";

/// Template engine singleton
static ENGINE: OnceLock<Environment<'static>> = OnceLock::new();

fn init_engine() -> Environment<'static> {
    let mut env = Environment::new();

    env.set_auto_escape_callback(|_| AutoEscape::None);
    env.set_trim_blocks(true);
    env.set_lstrip_blocks(true);
    env.set_loader(|name| Ok(embedded::lookup(name).map(str::to_owned)));

    filters::register_filters(&mut env);

    env
}

/// Get the global template engine
pub fn engine() -> &'static Environment<'static> {
    ENGINE.get_or_init(init_engine)
}

/// Render a named template as a whole file
///
/// The output always ends with exactly one newline.
pub fn render<S: Serialize>(name: &str, ctx: S) -> Result<String, minijinja::Error> {
    let mut out = render_fragment(name, ctx)?;
    out.push('\n');
    Ok(out)
}

/// Render a named template for embedding into another one
///
/// Trailing newlines are stripped.
pub fn render_fragment<S: Serialize>(name: &str, ctx: S) -> Result<String, minijinja::Error> {
    let mut out = engine().get_template(name)?.render(ctx)?;
    let trimmed = out.trim_end_matches('\n').len();
    out.truncate(trimmed);
    Ok(out)
}
