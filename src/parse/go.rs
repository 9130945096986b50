//! Go parser - parses Go interface declarations into the package model

use crate::error::{Error, Result};
use crate::imports::base_segment;
use crate::model::{Import, Interface, Method, Package, Parameter, TypeRef};
use std::collections::HashMap;
use tree_sitter::{Node, Parser};
use tracing::{debug, warn};

/// Predeclared Go type names
const BUILTIN_TYPES: &[&str] = &[
    "any",
    "bool",
    "byte",
    "comparable",
    "complex64",
    "complex128",
    "error",
    "float32",
    "float64",
    "int",
    "int8",
    "int16",
    "int32",
    "int64",
    "rune",
    "string",
    "uint",
    "uint8",
    "uint16",
    "uint32",
    "uint64",
    "uintptr",
];

/// Parse Go source into a [`Package`]
///
/// Unqualified non-builtin types are qualified with `self_import_path` when
/// it is known, so the generated code can import them from the source
/// package.
pub fn parse_go_package(source: &str, self_import_path: Option<&str>) -> Result<Package> {
    let mut parser = Parser::new();
    parser
        .set_language(&tree_sitter_go::LANGUAGE.into())
        .map_err(|e| Error::Parse(format!("Failed to set language: {}", e)))?;

    let tree = parser
        .parse(source, None)
        .ok_or_else(|| Error::Parse("Failed to parse source".into()))?;
    let root = tree.root_node();
    if root.has_error() {
        warn!("Go source contains syntax errors, parsing what is recognizable");
    }

    let mut name = None;
    let mut imports = Vec::new();
    let mut declarations = Vec::new();

    let mut cursor = root.walk();
    for child in root.children(&mut cursor) {
        match child.kind() {
            "package_clause" => {
                name = child
                    .named_child(0)
                    .map(|n| text(n, source).to_string());
            }
            "import_declaration" => collect_imports(child, source, &mut imports),
            "type_declaration" => declarations.push(child),
            _ => {}
        }
    }

    let name = name.ok_or_else(|| Error::Parse("missing package clause".into()))?;

    let types = GoTypes {
        source,
        self_import_path,
        aliases: imports
            .iter()
            .map(|imp| (imp.alias.clone(), imp.path.clone()))
            .collect(),
    };

    let mut interfaces = Vec::new();
    for decl in declarations {
        let mut cursor = decl.walk();
        for spec in decl.named_children(&mut cursor) {
            if spec.kind() != "type_spec" {
                continue;
            }
            let (Some(name), Some(typ)) = (
                spec.child_by_field_name("name"),
                spec.child_by_field_name("type"),
            ) else {
                continue;
            };
            if typ.kind() == "interface_type" {
                interfaces.push(types.interface(text(name, source), typ));
            }
        }
    }

    if let Some(path) = self_import_path {
        imports.insert(
            0,
            Import {
                alias: name.clone(),
                path: path.to_string(),
            },
        );
    }

    debug!(package = %name, interfaces = interfaces.len(), "parsed Go source");
    Ok(Package {
        name,
        interfaces,
        imports,
    })
}

fn collect_imports(node: Node, source: &str, imports: &mut Vec<Import>) {
    let mut cursor = node.walk();
    for child in node.named_children(&mut cursor) {
        match child.kind() {
            "import_spec" => {
                let Some(path) = child.child_by_field_name("path") else {
                    continue;
                };
                let path = text(path, source).trim_matches(|c| c == '"' || c == '`');
                let alias = match child.child_by_field_name("name") {
                    Some(alias) => text(alias, source).to_string(),
                    None => base_segment(path).to_string(),
                };
                imports.push(Import {
                    alias,
                    path: path.to_string(),
                });
            }
            "import_spec_list" => collect_imports(child, source, imports),
            _ => {}
        }
    }
}

/// Node text, empty when not valid UTF-8
fn text<'s>(node: Node, source: &'s str) -> &'s str {
    node.utf8_text(source.as_bytes()).unwrap_or("")
}

/// Type mapping state for one source file
struct GoTypes<'s> {
    source: &'s str,
    self_import_path: Option<&'s str>,
    /// Local package name → import path
    aliases: HashMap<String, String>,
}

impl GoTypes<'_> {
    fn interface(&self, name: &str, node: Node) -> Interface {
        let mut methods = Vec::new();
        let children: Vec<Node> = {
            let mut cursor = node.walk();
            node.named_children(&mut cursor).collect()
        };

        for (i, child) in children.iter().enumerate() {
            if !matches!(child.kind(), "method_elem" | "method_spec") {
                // embedded interfaces and constraints
                continue;
            }
            let mut method = self.method(*child);
            method.comment = attached_comment(&children, i, self.source);
            methods.push(method);
        }

        Interface {
            name: name.to_string(),
            methods,
        }
    }

    fn method(&self, node: Node) -> Method {
        let name = node
            .child_by_field_name("name")
            .map(|n| text(n, self.source).to_string())
            .unwrap_or_default();

        let mut method = Method {
            name,
            ..Default::default()
        };

        if let Some(params) = node.child_by_field_name("parameters") {
            let mut cursor = params.walk();
            for param in params.named_children(&mut cursor) {
                match param.kind() {
                    "parameter_declaration" => {
                        method.inputs.extend(self.parameter_declaration(param))
                    }
                    "variadic_parameter_declaration" => {
                        let name = param
                            .child_by_field_name("name")
                            .map(|n| text(n, self.source).to_string())
                            .unwrap_or_default();
                        let typ = param
                            .child_by_field_name("type")
                            .map(|t| self.type_ref(t))
                            .unwrap_or_else(|| TypeRef::Unknown(text(param, self.source).into()));
                        method.variadic = Some(Parameter::new(name, typ));
                    }
                    _ => {}
                }
            }
        }

        if let Some(result) = node.child_by_field_name("result") {
            if result.kind() == "parameter_list" {
                let mut cursor = result.walk();
                for param in result.named_children(&mut cursor) {
                    if param.kind() == "parameter_declaration" {
                        method.outputs.extend(self.parameter_declaration(param));
                    }
                }
            } else {
                method.outputs.push(Parameter::unnamed(self.type_ref(result)));
            }
        }

        method
    }

    /// `a, b int` expands to two parameters
    fn parameter_declaration(&self, node: Node) -> Vec<Parameter> {
        let typ = match node.child_by_field_name("type") {
            Some(t) => self.type_ref(t),
            None => TypeRef::Unknown(text(node, self.source).to_string()),
        };

        let mut cursor = node.walk();
        let names: Vec<String> = node
            .children_by_field_name("name", &mut cursor)
            .map(|n| text(n, self.source).to_string())
            .collect();

        if names.is_empty() {
            return vec![Parameter::unnamed(typ)];
        }
        names
            .into_iter()
            .map(|name| Parameter::new(name, typ.clone()))
            .collect()
    }

    fn type_ref(&self, node: Node) -> TypeRef {
        let source = self.source;
        match node.kind() {
            "type_identifier" => {
                let name = text(node, source);
                match self.self_import_path {
                    Some(path) if !BUILTIN_TYPES.contains(&name) => TypeRef::qualified(path, name),
                    _ => TypeRef::bare(name),
                }
            }
            "qualified_type" => {
                let package = node
                    .child_by_field_name("package")
                    .map(|n| text(n, source))
                    .unwrap_or("");
                let name = node
                    .child_by_field_name("name")
                    .map(|n| text(n, source))
                    .unwrap_or("");
                let path = match self.aliases.get(package) {
                    Some(path) => path.clone(),
                    None => {
                        warn!(package, "no import for package, using its name as path");
                        package.to_string()
                    }
                };
                TypeRef::qualified(path, name)
            }
            "pointer_type" => self.inner(node, None, TypeRef::pointer),
            "slice_type" => self.inner(node, Some("element"), TypeRef::slice),
            "map_type" => {
                match (
                    node.child_by_field_name("key"),
                    node.child_by_field_name("value"),
                ) {
                    (Some(key), Some(value)) => TypeRef::map(self.type_ref(key), self.type_ref(value)),
                    _ => TypeRef::Unknown(text(node, source).to_string()),
                }
            }
            "parenthesized_type" => match node.named_child(0) {
                Some(inner) => self.type_ref(inner),
                None => TypeRef::Unknown(text(node, source).to_string()),
            },
            "function_type" => TypeRef::Func,
            "interface_type" | "struct_type" if node.named_child_count() == 0 => {
                TypeRef::bare(text(node, source))
            }
            _ => TypeRef::Unknown(text(node, source).to_string()),
        }
    }

    fn inner(&self, node: Node, field: Option<&str>, wrap: fn(TypeRef) -> TypeRef) -> TypeRef {
        let inner = match field {
            Some(field) => node.child_by_field_name(field),
            None => node.named_child(0),
        };
        match inner {
            Some(inner) => wrap(self.type_ref(inner)),
            None => TypeRef::Unknown(text(node, self.source).to_string()),
        }
    }
}

/// Comments directly above a method plus the one trailing it on its line
fn attached_comment(siblings: &[Node], index: usize, source: &str) -> String {
    let method = siblings[index];
    let mut lines = Vec::new();

    let mut row = method.start_position().row;
    for j in (0..index).rev() {
        let prev = siblings[j];
        if prev.kind() != "comment" || prev.end_position().row + 1 != row {
            break;
        }
        // trailing comment of the previous method
        if j > 0 && siblings[j - 1].end_position().row == prev.start_position().row {
            break;
        }
        lines.push(comment_text(text(prev, source)));
        row = prev.start_position().row;
    }
    lines.reverse();

    // a trailing comment may end up inside the method node or right after it
    let mut cursor = method.walk();
    let trailing = method
        .named_children(&mut cursor)
        .filter(|c| c.kind() == "comment")
        .chain(siblings.get(index + 1).copied())
        .find(|c| c.kind() == "comment" && c.start_position().row == method.end_position().row);
    if let Some(comment) = trailing {
        lines.push(comment_text(text(comment, source)));
    }

    lines.join("\n")
}

fn comment_text(comment: &str) -> &str {
    let body = match comment.strip_prefix("//") {
        Some(line) => line,
        None => comment
            .strip_prefix("/*")
            .and_then(|c| c.strip_suffix("*/"))
            .unwrap_or(comment),
    };
    body.trim()
}
