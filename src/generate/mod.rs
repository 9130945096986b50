//! Generation engine
//!
//! Turns a [`Package`] into the list of files implementing its interfaces.
//! Generation is a single synchronous pass: nothing is written here, and a
//! failing interface or method aborts the whole call so that either every
//! file is returned or none is.
//!
//! Two strategies exist:
//!
//! - [`Strategy::Basic`]: stub bodies that panic, optionally opening a
//!   tracing span first
//! - [`Strategy::Repository`]: sqlx-backed bodies whose query call is picked
//!   by a `sqlx:` directive in the method comment

mod basic;
mod repo;

use crate::error::{Error, Result};
use crate::imports::{is_identifier, AliasTable, ImportResolver};
use crate::model::{Interface, Method, OutputFile, Package};
use crate::plan::{folder_name, package_name, FilePlanner};
use crate::render::Signature;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use tracing::{debug, warn};

/// OpenTelemetry API
pub const OTEL_PATH: &str = "go.opentelemetry.io/otel";
pub const SQLX_PATH: &str = "github.com/jmoiron/sqlx";
/// sqlx adapter of the transaction manager
pub const TRMSQLX_PATH: &str = "github.com/avito-tech/go-transaction-manager/sqlx";
pub const CONTEXT_PATH: &str = "context";

/// Default name of the generated struct
pub const DEFAULT_IMPLEMENTATION_NAME: &str = "Implementation";

/// Implementation strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Strategy {
    /// Stub bodies that panic
    Basic,
    /// sqlx-backed repository bodies
    Repository,
}

impl Strategy {
    /// Generate the files of `pkg` with this strategy
    pub fn generate(self, pkg: &Package, opts: &GenerateOptions) -> Result<Vec<OutputFile>> {
        generate(pkg, self, opts)
    }

    pub fn name(self) -> &'static str {
        match self {
            Strategy::Basic => "basic",
            Strategy::Repository => "repo",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Strategy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "basic" => Ok(Strategy::Basic),
            "repo" | "repository" => Ok(Strategy::Repository),
            other => Err(format!("unknown strategy `{}`", other)),
        }
    }
}

/// Options of one generation call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerateOptions {
    /// Root of every output path
    pub destination: PathBuf,
    /// Only implement this interface
    pub interface_name: Option<String>,
    /// Name of the generated struct
    pub implementation_name: String,
    /// Package name override; needs `interface_name`
    pub package_name: Option<String>,
    /// Holder and all methods in one file
    pub single_file: bool,
    /// Open a span in basic stubs taking a context
    pub tracing: bool,
    /// Go module the destination lives in
    pub module_path: Option<String>,
    /// Import path → package name, ahead of the source file's aliases
    pub package_names: BTreeMap<String, String>,
    /// Rendered types whose zero value is `""`
    pub string_types: BTreeSet<String>,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            destination: PathBuf::from("."),
            interface_name: None,
            implementation_name: DEFAULT_IMPLEMENTATION_NAME.to_string(),
            package_name: None,
            single_file: false,
            tracing: false,
            module_path: None,
            package_names: BTreeMap::new(),
            string_types: BTreeSet::new(),
        }
    }
}

impl GenerateOptions {
    /// Check the options before handing them to the engine
    pub fn validate(&self) -> Result<()> {
        if self.package_name.is_some() && self.interface_name.is_none() {
            return Err(Error::Config(
                "a package name override needs an interface name to apply to".into(),
            ));
        }
        if !is_identifier(&self.implementation_name) {
            return Err(Error::Config(format!(
                "implementation name `{}` is not a valid Go identifier",
                self.implementation_name
            )));
        }
        if let Some(name) = self.package_name.as_deref() {
            if !is_identifier(name) {
                return Err(Error::Config(format!(
                    "package name `{}` is not a valid Go identifier",
                    name
                )));
            }
        }
        Ok(())
    }
}

/// Generate the files implementing the selected interfaces of `pkg`
pub fn generate(pkg: &Package, strategy: Strategy, opts: &GenerateOptions) -> Result<Vec<OutputFile>> {
    let known_names = known_names(pkg, opts);
    let mut out = OutputSet::default();

    for iface in select(pkg, opts) {
        debug!(interface = %iface.name, %strategy, "generating implementation");
        let unit = Unit::new(iface, opts, &known_names);
        match strategy {
            Strategy::Basic => basic::generate(&unit, &mut out)?,
            Strategy::Repository => repo::generate(&unit, &mut out)?,
        }
    }

    Ok(out.into_files())
}

fn select<'p>(pkg: &'p Package, opts: &GenerateOptions) -> Vec<&'p Interface> {
    match opts.interface_name.as_deref() {
        None => pkg.interfaces.iter().collect(),
        Some(name) => match pkg.interface(name) {
            Some(iface) => vec![iface],
            None => {
                warn!(interface = name, package = %pkg.name, "interface not found");
                Vec::new()
            }
        },
    }
}

/// Package names seeding alias resolution
///
/// Explicit `package_names` win over the source file's own aliases.
fn known_names(pkg: &Package, opts: &GenerateOptions) -> BTreeMap<String, String> {
    let mut names: BTreeMap<String, String> = pkg
        .imports
        .iter()
        .filter(|imp| imp.alias != "_" && is_identifier(&imp.alias))
        .map(|imp| (imp.path.clone(), imp.alias.clone()))
        .collect();
    names.extend(opts.package_names.clone());
    names
}

/// One interface being implemented
pub(crate) struct Unit<'a> {
    pub iface: &'a Interface,
    pub opts: &'a GenerateOptions,
    pub package: String,
    pub planner: FilePlanner,
    /// Import path of the generated package itself
    pub local_package: Option<String>,
    known_names: &'a BTreeMap<String, String>,
}

impl<'a> Unit<'a> {
    fn new(
        iface: &'a Interface,
        opts: &'a GenerateOptions,
        known_names: &'a BTreeMap<String, String>,
    ) -> Self {
        let package = package_name(
            &iface.name,
            opts.interface_name.as_deref(),
            opts.package_name.as_deref(),
        );
        let planner = FilePlanner::new(&opts.destination, folder_name(&package));
        let local_package = opts
            .module_path
            .as_deref()
            .map(|module| planner.import_path(Some(module), None));

        Self {
            iface,
            opts,
            package,
            planner,
            local_package,
            known_names,
        }
    }

    pub fn struct_name(&self) -> &str {
        &self.opts.implementation_name
    }

    /// Alias table for this interface, built once per call
    pub fn aliases(&self, mandatory: &[(&str, &str)]) -> AliasTable {
        let paths = self.iface.referenced_paths();
        ImportResolver::new()
            .with_known_names(self.known_names)
            .resolve(
                paths
                    .iter()
                    .map(String::as_str)
                    .filter(|p| Some(*p) != self.local_package.as_deref()),
                mandatory,
            )
    }

    pub fn signature(&self, method: &Method, aliases: &AliasTable) -> Result<Signature> {
        Signature::render(method, aliases, self.local_package.as_deref()).map_err(|source| {
            Error::Model {
                interface: self.iface.name.clone(),
                method: method.name.clone(),
                source,
            }
        })
    }

    /// Import paths a method's signature needs in its file
    pub fn signature_paths(&self, method: &Method) -> BTreeSet<String> {
        let mut paths = method.referenced_paths();
        if let Some(local) = &self.local_package {
            paths.remove(local);
        }
        paths
    }

    /// `OrderRepoImplementation.Get`, or `OrderRepoPg.Get` for a struct
    /// already named after the interface
    pub fn span_name(&self, method: &str) -> String {
        let struct_name = self.struct_name();
        if struct_name.starts_with(&self.iface.name) {
            format!("{}.{}", struct_name, method)
        } else {
            format!("{}{}.{}", self.iface.name, struct_name, method)
        }
    }

    /// Label of a logical source, for collision reports
    pub fn source(&self, what: &str) -> String {
        format!("{}.{}", self.iface.name, what)
    }
}

/// A method body rendered for one interface
pub(crate) struct RenderedMethod {
    pub name: String,
    pub body: String,
    /// Import paths the body needs
    pub uses: BTreeSet<String>,
}

/// Output files of one call, keyed by path
#[derive(Debug, Default)]
pub(crate) struct OutputSet {
    files: Vec<OutputFile>,
    sources: BTreeMap<PathBuf, String>,
}

impl OutputSet {
    /// Add a file; a second file on the same path is a collision
    pub fn push(&mut self, file: OutputFile, source: String) -> Result<()> {
        if let Some(first) = self.sources.get(&file.path) {
            return Err(Error::PathCollision {
                path: file.path,
                first: first.clone(),
                second: source,
            });
        }
        self.sources.insert(file.path.clone(), source);
        self.files.push(file);
        Ok(())
    }

    /// Add a placeholder type file unless its path is already planned
    pub fn push_placeholder(&mut self, file: OutputFile, source: String) {
        if self.sources.contains_key(&file.path) {
            debug!(path = %file.path.display(), "placeholder type already planned");
            return;
        }
        self.sources.insert(file.path.clone(), source);
        self.files.push(file);
    }

    pub fn into_files(self) -> Vec<OutputFile> {
        self.files
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Import, Parameter, TypeRef};
    use pretty_assertions::assert_eq;

    fn package() -> Package {
        Package {
            name: "repo".into(),
            interfaces: vec![
                Interface {
                    name: "OrderRepo".into(),
                    methods: vec![Method {
                        name: "Count".into(),
                        outputs: vec![Parameter::unnamed(TypeRef::bare("int"))],
                        ..Default::default()
                    }],
                },
                Interface {
                    name: "UserRepo".into(),
                    methods: vec![],
                },
            ],
            imports: vec![
                Import {
                    alias: "openapi".into(),
                    path: "example.com/go-openapi".into(),
                },
                Import {
                    alias: "_".into(),
                    path: "example.com/driver".into(),
                },
            ],
        }
    }

    #[test]
    fn test_validate() {
        assert!(GenerateOptions::default().validate().is_ok());

        let orphan_override = GenerateOptions {
            package_name: Some("orders".into()),
            ..Default::default()
        };
        assert!(matches!(orphan_override.validate(), Err(Error::Config(_))));

        let with_filter = GenerateOptions {
            package_name: Some("orders".into()),
            interface_name: Some("OrderRepo".into()),
            ..Default::default()
        };
        assert!(with_filter.validate().is_ok());

        let bad_struct = GenerateOptions {
            implementation_name: "my-impl".into(),
            ..Default::default()
        };
        assert!(bad_struct.validate().is_err());
    }

    #[test]
    fn test_select() {
        let pkg = package();
        assert_eq!(select(&pkg, &GenerateOptions::default()).len(), 2);

        let opts = GenerateOptions {
            interface_name: Some("UserRepo".into()),
            ..Default::default()
        };
        let selected = select(&pkg, &opts);
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].name, "UserRepo");

        let missing = GenerateOptions {
            interface_name: Some("Nope".into()),
            ..Default::default()
        };
        assert!(select(&pkg, &missing).is_empty());
    }

    #[test]
    fn test_known_names() {
        let pkg = package();
        let mut opts = GenerateOptions::default();
        let names = known_names(&pkg, &opts);
        assert_eq!(names.get("example.com/go-openapi").map(String::as_str), Some("openapi"));
        assert!(!names.contains_key("example.com/driver"));

        opts.package_names
            .insert("example.com/go-openapi".into(), "oapi".into());
        let names = known_names(&pkg, &opts);
        assert_eq!(names.get("example.com/go-openapi").map(String::as_str), Some("oapi"));
    }

    #[test]
    fn test_span_name() {
        let pkg = package();
        let names = BTreeMap::new();
        let mut opts = GenerateOptions::default();
        let unit = Unit::new(&pkg.interfaces[0], &opts, &names);
        assert_eq!(unit.span_name("Count"), "OrderRepoImplementation.Count");

        opts.implementation_name = "OrderRepoPg".into();
        let unit = Unit::new(&pkg.interfaces[0], &opts, &names);
        assert_eq!(unit.span_name("Count"), "OrderRepoPg.Count");
    }

    #[test]
    fn test_local_package_from_module_path() {
        let pkg = package();
        let names = BTreeMap::new();
        let opts = GenerateOptions {
            destination: PathBuf::from("internal"),
            module_path: Some("github.com/acme/shop".into()),
            ..Default::default()
        };
        let unit = Unit::new(&pkg.interfaces[0], &opts, &names);
        assert_eq!(unit.package, "order_repo");
        assert_eq!(
            unit.local_package.as_deref(),
            Some("github.com/acme/shop/internal/order-repo")
        );
    }

    #[test]
    fn test_output_set_collision() {
        let mut out = OutputSet::default();
        out.push(OutputFile::new("a/b.go", "x"), "A.holder".into())
            .unwrap();
        let err = out
            .push(OutputFile::new("a/b.go", "y"), "A.B".into())
            .unwrap_err();
        match err {
            Error::PathCollision {
                path,
                first,
                second,
            } => {
                assert_eq!(path, PathBuf::from("a/b.go"));
                assert_eq!(first, "A.holder");
                assert_eq!(second, "A.B");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_output_set_placeholder_dedup() {
        let mut out = OutputSet::default();
        out.push_placeholder(OutputFile::new("m/widget.go", "1"), "A.X".into());
        out.push_placeholder(OutputFile::new("m/widget.go", "2"), "A.Y".into());
        let files = out.into_files();
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].content, b"1".to_vec());
    }

    #[test]
    fn test_strategy_names() {
        assert_eq!("basic".parse::<Strategy>(), Ok(Strategy::Basic));
        assert_eq!("repo".parse::<Strategy>(), Ok(Strategy::Repository));
        assert!("grpc".parse::<Strategy>().is_err());
        assert_eq!(Strategy::Repository.to_string(), "repo");
    }
}
