//! CLI command implementations
//!
//! - `generate`: the `basic` and `repo` commands
//! - `schema`: JSON Schema output

pub mod generate;
pub mod schema;

pub use generate::{cmd_generate, GenerateArgs};
pub use schema::{cmd_schema, SchemaKind};
