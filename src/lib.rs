// Production-quality lints
#![warn(
    clippy::todo,
    clippy::unimplemented,
    clippy::dbg_macro,
    clippy::print_stdout,
    clippy::print_stderr
)]
// Deny truly dangerous patterns
#![deny(clippy::mem_forget)]
// Allow common patterns in library code
#![allow(clippy::missing_errors_doc, clippy::missing_panics_doc)]

//! # implgen: Go implementation scaffolding
//!
//! Reads Go interfaces and generates the files implementing them.
//!
//! ## Core Concept
//!
//! A front-end turns a Go source (or a YAML/JSON model) into a [`Package`].
//! The generation engine turns that package into a deterministic list of
//! [`OutputFile`]s, one [`Strategy`] at a time:
//!
//! - **Basic**: stub methods that panic, optionally opening an
//!   OpenTelemetry span first
//! - **Repository**: sqlx-backed methods whose query call is picked by a
//!   `sqlx:` directive in the method comment, with an embedded `.sql` slot
//!   per method
//!
//! Nothing is written by the engine; the [`writer`] persists the files and
//! runs `goimports`/`gofmt` over them.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use implgen::{parse_go_package, GenerateOptions, Strategy};
//!
//! let pkg = parse_go_package(r#"
//! package repo
//!
//! import "context"
//!
//! type OrderRepo interface {
//!     Get(ctx context.Context, id int64) (Order, error) // sqlx: GetContext
//! }
//! "#, None)?;
//!
//! let opts = GenerateOptions { destination: "internal".into(), ..Default::default() };
//! for file in Strategy::Repository.generate(&pkg, &opts)? {
//!     println!("{}", file.path.display());
//! }
//! // internal/order-repo/implementation.go
//! // internal/order-repo/get.go
//! // internal/order-repo/sql/get.sql
//! // internal/order-repo/model/order.go
//! // internal/order-repo/sql/sql.go
//! ```
//!
//! ## Determinism
//!
//! Import aliases are resolved over sorted paths, and every output path is
//! derived from identifiers with [`util::to_snake_case`] and
//! [`util::to_kebab_case`]. The same package and options always produce
//! byte-identical files.

pub mod config;
pub mod directive;
pub mod error;
pub mod format;
pub mod generate;
pub mod imports;
pub mod model;
pub mod parse;
pub mod plan;
pub mod render;
pub mod templates;
pub mod util;
pub mod writer;
pub mod zero;

// Re-exports for convenience
pub use config::ProjectConfig;
pub use error::{Error, Result};
pub use generate::{generate, GenerateOptions, Strategy};
pub use imports::{AliasTable, ImportResolver};
pub use model::{Import, Interface, Method, OutputFile, Package, Parameter, TypeRef};
pub use parse::{load_package, parse_go_package};
pub use render::{render_type, RenderError, Signature};
pub use writer::{OverwritePolicy, WriteReport, Writer};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
