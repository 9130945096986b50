//! Project configuration
//!
//! Handles loading of the optional `implgen.yaml` file. Every field is
//! optional: command-line flags win over the file, and the file wins over
//! the built-in defaults of [`GenerateOptions`].
//!
//! ```yaml
//! destination: internal/repo
//! implementation_name: Postgres
//! module_path: github.com/acme/shop
//! tracing: true
//! package_names:
//!   github.com/go-openapi/strfmt: strfmt
//! string_types:
//!   - model.OrderID
//! ```

use crate::error::{Error, Result};
use crate::generate::GenerateOptions;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Name of the configuration file looked up in the working directory
pub const CONFIG_FILE: &str = "implgen.yaml";

/// Contents of `implgen.yaml`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
#[schemars(title = "implgen configuration")]
pub struct ProjectConfig {
    /// Root directory of the generated packages
    #[serde(default)]
    pub destination: Option<PathBuf>,

    /// Name of the generated struct
    #[serde(default)]
    pub implementation_name: Option<String>,

    /// Package name override (only applies with an interface name)
    #[serde(default)]
    pub package_name: Option<String>,

    /// Write the holder and all methods into one file
    #[serde(default)]
    pub single_file: Option<bool>,

    /// Open a tracing span in basic stubs
    #[serde(default)]
    pub tracing: Option<bool>,

    /// Go module path of the destination
    #[serde(default)]
    pub module_path: Option<String>,

    /// Import path to package name, for paths whose last segment is not the name
    #[serde(default)]
    pub package_names: BTreeMap<String, String>,

    /// Rendered types whose zero value is the empty string
    #[serde(default)]
    pub string_types: BTreeSet<String>,

    /// Run `goimports`/`gofmt` on written Go files
    #[serde(default)]
    pub format: Option<bool>,
}

impl ProjectConfig {
    /// Parse a configuration from YAML
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        serde_norway::from_str(yaml).map_err(|e| Error::Config(format!("Failed to parse config: {}", e)))
    }

    /// Load a configuration file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(Error::Io)?;
        let config: Self = serde_norway::from_str(&content)
            .map_err(|e| Error::Config(format!("Failed to parse {}: {}", path.display(), e)))?;
        debug!(path = %path.display(), "loaded configuration");
        Ok(config)
    }

    /// Load `implgen.yaml` from a directory, if present
    pub fn load_from_dir(dir: &Path) -> Result<Option<Self>> {
        let config_file = dir.join(CONFIG_FILE);
        if !config_file.exists() {
            return Ok(None);
        }
        Self::load(&config_file).map(Some)
    }

    /// Fill options the command line left unset
    ///
    /// `opts` holds the built-in defaults for fields the caller did not set;
    /// `explicit` tells which scalar fields came from the command line.
    pub fn apply(&self, opts: &mut GenerateOptions, explicit: &ExplicitFlags) {
        if !explicit.destination {
            if let Some(destination) = &self.destination {
                opts.destination = destination.clone();
            }
        }
        if !explicit.implementation_name {
            if let Some(name) = &self.implementation_name {
                opts.implementation_name = name.clone();
            }
        }
        if opts.package_name.is_none() {
            opts.package_name = self.package_name.clone();
        }
        if !explicit.single_file {
            opts.single_file = self.single_file.unwrap_or(opts.single_file);
        }
        if !explicit.tracing {
            opts.tracing = self.tracing.unwrap_or(opts.tracing);
        }
        if opts.module_path.is_none() {
            opts.module_path = self.module_path.clone();
        }

        // command-line entries win on conflicts
        for (path, name) in &self.package_names {
            opts.package_names
                .entry(path.clone())
                .or_insert_with(|| name.clone());
        }
        opts.string_types.extend(self.string_types.iter().cloned());
    }

    /// Whether written Go files go through the external formatter
    pub fn format_enabled(&self) -> bool {
        self.format.unwrap_or(true)
    }
}

/// Scalar options given on the command line
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExplicitFlags {
    pub destination: bool,
    pub implementation_name: bool,
    pub single_file: bool,
    pub tracing: bool,
}
