//! Interface model: the input of the generation engine
//!
//! A `Package` is produced once by a front-end (the Go parser in
//! [`crate::parse`], or a YAML/JSON model file) and is read-only afterwards.
//!
//! ## Example model
//!
//! ```yaml
//! name: repo
//! imports:
//!   - alias: model
//!     path: github.com/acme/shop/model
//! interfaces:
//!   - name: OrderRepo
//!     methods:
//!       - name: Get
//!         comment: "sqlx: GetContext"
//!         in:
//!           - name: ctx
//!             type: { qualified: { package: context, name: Context } }
//!           - name: id
//!             type: { qualified: { package: github.com/acme/shop/model, name: OrderID } }
//!         out:
//!           - type: { qualified: { package: github.com/acme/shop/model, name: Order } }
//!           - type: { bare: error }
//! ```

use crate::error::Result;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::PathBuf;

/// A parsed source package
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[schemars(title = "implgen Package", description = "Interfaces to implement")]
pub struct Package {
    /// Go package name of the source
    pub name: String,

    /// Interfaces in declaration order
    #[serde(default)]
    pub interfaces: Vec<Interface>,

    /// Imports of the source file; aliases are advisory
    #[serde(default)]
    pub imports: Vec<Import>,
}

/// An import of the source file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Import {
    #[serde(default)]
    pub alias: String,
    pub path: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Interface {
    pub name: String,

    #[serde(default)]
    pub methods: Vec<Method>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Method {
    pub name: String,

    #[serde(rename = "in", default)]
    pub inputs: Vec<Parameter>,

    #[serde(rename = "out", default)]
    pub outputs: Vec<Parameter>,

    /// Trailing `...T` parameter; `typ` holds the element type `T`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variadic: Option<Parameter>,

    /// Comment text attached to the method, where directives live
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub comment: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Parameter {
    /// May be empty or `_`; the engine then names it by position
    #[serde(default)]
    pub name: String,

    #[serde(rename = "type")]
    pub typ: TypeRef,
}

impl Parameter {
    pub fn new(name: impl Into<String>, typ: TypeRef) -> Self {
        Self {
            name: name.into(),
            typ,
        }
    }

    /// Unnamed parameter (results, or anonymous inputs)
    pub fn unnamed(typ: TypeRef) -> Self {
        Self::new("", typ)
    }
}

/// A type reference as written in a method signature
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum TypeRef {
    /// Builtin or otherwise unqualified name (`int`, `error`, `Widget`)
    Bare(String),
    /// `pkg.Name` where `package` is the import path
    Qualified { package: String, name: String },
    Pointer(Box<TypeRef>),
    Slice(Box<TypeRef>),
    Map { key: Box<TypeRef>, value: Box<TypeRef> },
    Variadic(Box<TypeRef>),
    /// Function types are rendered as a fixed placeholder
    Func,
    /// Syntax the front-end could not model; carries the source text
    Unknown(String),
}

impl TypeRef {
    pub fn bare(name: impl Into<String>) -> Self {
        TypeRef::Bare(name.into())
    }

    pub fn qualified(package: impl Into<String>, name: impl Into<String>) -> Self {
        TypeRef::Qualified {
            package: package.into(),
            name: name.into(),
        }
    }

    pub fn pointer(inner: TypeRef) -> Self {
        TypeRef::Pointer(Box::new(inner))
    }

    pub fn slice(inner: TypeRef) -> Self {
        TypeRef::Slice(Box::new(inner))
    }

    pub fn map(key: TypeRef, value: TypeRef) -> Self {
        TypeRef::Map {
            key: Box::new(key),
            value: Box::new(value),
        }
    }

    /// `context.Context`
    pub fn context() -> Self {
        TypeRef::qualified("context", "Context")
    }

    pub fn is_context(&self) -> bool {
        matches!(self, TypeRef::Qualified { package, name } if package == "context" && name == "Context")
    }

    /// Collect every import path this type refers to
    pub fn collect_paths(&self, paths: &mut BTreeSet<String>) {
        match self {
            TypeRef::Qualified { package, .. } => {
                paths.insert(package.clone());
            }
            TypeRef::Pointer(inner) | TypeRef::Slice(inner) | TypeRef::Variadic(inner) => {
                inner.collect_paths(paths)
            }
            TypeRef::Map { key, value } => {
                key.collect_paths(paths);
                value.collect_paths(paths);
            }
            TypeRef::Bare(_) | TypeRef::Func | TypeRef::Unknown(_) => {}
        }
    }
}

impl Method {
    /// Inputs followed by the variadic parameter, if any
    pub fn all_inputs(&self) -> impl Iterator<Item = &Parameter> {
        self.inputs.iter().chain(self.variadic.iter())
    }

    /// Import paths referenced anywhere in the signature
    pub fn referenced_paths(&self) -> BTreeSet<String> {
        let mut paths = BTreeSet::new();
        for param in self.all_inputs().chain(self.outputs.iter()) {
            param.typ.collect_paths(&mut paths);
        }
        paths
    }

    /// True when the first input is a `context.Context`
    pub fn takes_context(&self) -> bool {
        self.inputs.first().is_some_and(|p| p.typ.is_context())
    }
}

impl Interface {
    pub fn referenced_paths(&self) -> BTreeSet<String> {
        self.methods
            .iter()
            .flat_map(|m| m.referenced_paths())
            .collect()
    }
}

impl Package {
    /// Parse a package model from YAML
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        Ok(serde_norway::from_str(yaml)?)
    }

    /// Parse a package model from JSON
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn interface(&self, name: &str) -> Option<&Interface> {
        self.interfaces.iter().find(|i| i.name == name)
    }
}

/// A generated file, handed to the writer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputFile {
    /// Relative to the working directory, rooted at the destination
    pub path: PathBuf,
    pub content: Vec<u8>,
}

impl OutputFile {
    pub fn new(path: impl Into<PathBuf>, content: impl Into<Vec<u8>>) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
        }
    }

    /// Content as text (generated files are always UTF-8)
    pub fn text(&self) -> std::borrow::Cow<'_, str> {
        String::from_utf8_lossy(&self.content)
    }

    pub fn is_go(&self) -> bool {
        self.path.extension().is_some_and(|ext| ext == "go")
    }
}
