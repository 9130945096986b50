//! Output layout
//!
//! Maps interface and method names to the paths of the files generated for
//! them:
//!
//! ```text
//! <dst>/<folder>/<kebab(impl)>.go      holder (+ methods in single-file layout)
//! <dst>/<folder>/<snake(method)>.go    one per method
//! <dst>/<folder>/sql/<snake(m)>.sql    repository query placeholders
//! <dst>/<folder>/sql/sql.go            repository query bindings
//! <dst>/<folder>/model/<snake(T)>.go   placeholder types
//! ```

use crate::util::{to_kebab_case, to_snake_case};
use std::path::{Path, PathBuf};

/// Extension of generated Go sources
pub const GO_EXT: &str = "go";

/// Go package name of an implementation
///
/// The override only applies when generation targets one named interface.
pub fn package_name(interface: &str, filter: Option<&str>, package_override: Option<&str>) -> String {
    match (filter, package_override) {
        (Some(_), Some(name)) if !name.is_empty() => to_snake_case(name),
        _ => to_snake_case(interface),
    }
}

/// Folder holding an implementation package
pub fn folder_name(package: &str) -> String {
    package.replace('_', "-")
}

/// Paths for one interface
#[derive(Debug, Clone)]
pub struct FilePlanner {
    root: PathBuf,
    folder: String,
}

impl FilePlanner {
    pub fn new(root: impl Into<PathBuf>, folder: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            folder: folder.into(),
        }
    }

    pub fn folder(&self) -> &str {
        &self.folder
    }

    /// `<dst>/<folder>`
    pub fn dir(&self) -> PathBuf {
        self.root.join(&self.folder)
    }

    pub fn holder(&self, implementation: &str) -> PathBuf {
        self.dir()
            .join(format!("{}.{}", to_kebab_case(implementation), GO_EXT))
    }

    pub fn method(&self, method: &str) -> PathBuf {
        self.dir().join(format!("{}.{}", to_snake_case(method), GO_EXT))
    }

    pub fn query(&self, method: &str) -> PathBuf {
        self.dir()
            .join("sql")
            .join(format!("{}.sql", to_snake_case(method)))
    }

    pub fn queries(&self) -> PathBuf {
        self.dir().join("sql").join(format!("sql.{}", GO_EXT))
    }

    pub fn placeholder(&self, type_name: &str) -> PathBuf {
        self.dir()
            .join("model")
            .join(format!("{}.{}", to_snake_case(type_name), GO_EXT))
    }

    /// Go import path of a subpackage of the implementation
    ///
    /// Rooted at `module` when known, at the destination directory otherwise.
    pub fn import_path(&self, module: Option<&str>, sub: Option<&str>) -> String {
        let mut segments: Vec<String> = Vec::new();
        if let Some(module) = module {
            segments.push(module.trim_end_matches('/').to_string());
        }
        segments.extend(path_segments(&self.root));
        segments.push(self.folder.clone());
        if let Some(sub) = sub {
            segments.push(sub.to_string());
        }
        segments.join("/")
    }
}

/// Normal components of a relative path, without `.`
fn path_segments(path: &Path) -> Vec<String> {
    path.components()
        .filter_map(|c| match c {
            std::path::Component::Normal(s) => Some(s.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_package_name() {
        assert_eq!(package_name("OrderRepo", None, None), "order_repo");
        assert_eq!(package_name("OrderRepo", Some("OrderRepo"), Some("Orders")), "orders");
        // override without a filter is ambiguous and ignored
        assert_eq!(package_name("OrderRepo", None, Some("Orders")), "order_repo");
        assert_eq!(folder_name("order_repo"), "order-repo");
    }

    #[test]
    fn test_paths() {
        let planner = FilePlanner::new("out", "order-repo");
        assert_eq!(planner.dir(), PathBuf::from("out/order-repo"));
        assert_eq!(
            planner.holder("Implementation"),
            PathBuf::from("out/order-repo/implementation.go")
        );
        assert_eq!(planner.method("GetByID"), PathBuf::from("out/order-repo/get_by_id.go"));
        assert_eq!(planner.query("GetByID"), PathBuf::from("out/order-repo/sql/get_by_id.sql"));
        assert_eq!(planner.queries(), PathBuf::from("out/order-repo/sql/sql.go"));
        assert_eq!(planner.placeholder("Widget"), PathBuf::from("out/order-repo/model/widget.go"));
    }

    #[test]
    fn test_import_path() {
        let planner = FilePlanner::new("./internal/repo", "order-repo");
        assert_eq!(
            planner.import_path(Some("github.com/acme/shop"), Some("sql")),
            "github.com/acme/shop/internal/repo/order-repo/sql"
        );
        assert_eq!(planner.import_path(None, None), "internal/repo/order-repo");
    }
}
