//! Front-ends producing the package model
//!
//! Go sources go through tree-sitter; `.yaml`/`.yml`/`.json` files are read
//! as serialized [`Package`] models.

mod go;

pub use go::parse_go_package;

use crate::error::{Error, Result};
use crate::model::Package;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// A Go module found on disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GoModule {
    /// Directory holding `go.mod`
    pub root: PathBuf,
    /// Module path declared in `go.mod`
    pub path: String,
}

/// Source kinds accepted by [`load_package`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    Go,
    Yaml,
    Json,
}

impl SourceKind {
    /// Detect the kind from a file extension
    pub fn detect(path: &Path) -> Option<Self> {
        match path.extension()?.to_str()? {
            "go" => Some(SourceKind::Go),
            "yaml" | "yml" => Some(SourceKind::Yaml),
            "json" => Some(SourceKind::Json),
            _ => None,
        }
    }
}

/// Load the package model from a Go source or a model file
pub fn load_package(path: &Path) -> Result<Package> {
    let kind = SourceKind::detect(path).ok_or_else(|| {
        Error::Parse(format!(
            "{}: expected a .go, .yaml or .json source",
            path.display()
        ))
    })?;
    let source = fs::read_to_string(path)?;
    debug!(path = %path.display(), ?kind, "loading package");

    match kind {
        SourceKind::Go => {
            let self_import = package_import_path(path)?;
            parse_go_package(&source, Some(&self_import))
        }
        SourceKind::Yaml => Package::from_yaml(&source),
        SourceKind::Json => Package::from_json(&source),
    }
}

/// Find the Go module containing `dir`
///
/// Walks parent directories until a `go.mod` is found.
pub fn find_module(dir: &Path) -> Result<Option<GoModule>> {
    let mut current = dir.canonicalize().map_err(Error::Io)?;

    loop {
        let go_mod = current.join("go.mod");
        if go_mod.is_file() {
            let content = fs::read_to_string(&go_mod)?;
            let path = module_path(&content).ok_or_else(|| {
                Error::Parse(format!("{}: no module directive", go_mod.display()))
            })?;
            return Ok(Some(GoModule {
                root: current,
                path,
            }));
        }

        // Move to parent
        match current.parent() {
            Some(parent) => current = parent.to_path_buf(),
            None => return Ok(None),
        }
    }
}

/// Module path from the `module` directive of a `go.mod`
pub fn module_path(go_mod: &str) -> Option<String> {
    go_mod.lines().find_map(|line| {
        let rest = line.trim().strip_prefix("module")?;
        if !rest.starts_with(char::is_whitespace) {
            return None;
        }
        let path = rest.split("//").next().unwrap_or(rest).trim().trim_matches('"');
        (!path.is_empty()).then(|| path.to_string())
    })
}

/// Import path of the package declared by a Go source file
///
/// Module path joined with the file's directory relative to the module
/// root; without a `go.mod`, the name of that directory.
pub fn package_import_path(src_file: &Path) -> Result<String> {
    let dir = match src_file.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
        _ => PathBuf::from("."),
    };
    let dir = dir.canonicalize().map_err(Error::Io)?;

    match module_import_path(&dir)? {
        Some(path) => Ok(path),
        None => Ok(dir
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default()),
    }
}

/// Import path of a directory inside a Go module, `None` outside any module
pub fn module_import_path(dir: &Path) -> Result<Option<String>> {
    let Some(module) = find_module(dir)? else {
        return Ok(None);
    };

    let dir = dir.canonicalize().map_err(Error::Io)?;
    let relative = dir.strip_prefix(&module.root).unwrap_or(Path::new(""));
    let mut segments = vec![module.path];
    segments.extend(
        relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy().into_owned()),
    );
    Ok(Some(segments.join("/")))
}
