//! Schema command

use clap::ValueEnum;
use implgen::{config::ProjectConfig, Package, Result};

/// Documents with a JSON Schema
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SchemaKind {
    /// YAML/JSON package model accepted by `--src`
    Package,
    /// `implgen.yaml`
    Config,
}

pub fn cmd_schema(kind: SchemaKind) -> Result<()> {
    match kind {
        SchemaKind::Package => print_schema::<Package>(),
        SchemaKind::Config => print_schema::<ProjectConfig>(),
    }
}

fn print_schema<T: schemars::JsonSchema>() -> Result<()> {
    let schema = schemars::schema_for!(T);
    println!("{}", serde_json::to_string_pretty(&schema)?);
    Ok(())
}
