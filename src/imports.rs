//! Import alias resolution
//!
//! Every import path used by generated code gets a unique local name. The
//! result only depends on the input set, never on iteration order, so the
//! generated files are byte-stable across runs.

use std::collections::{BTreeMap, BTreeSet};

/// Resolved mapping from import path to local alias
///
/// Values are unique and never a reserved word of the target language.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AliasTable {
    aliases: BTreeMap<String, String>,
}

impl AliasTable {
    /// Alias assigned to an import path
    pub fn get(&self, path: &str) -> Option<&str> {
        self.aliases.get(path).map(String::as_str)
    }

    pub fn contains_alias(&self, alias: &str) -> bool {
        self.aliases.values().any(|a| a == alias)
    }

    /// `(path, alias)` pairs sorted by path
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.aliases.iter().map(|(p, a)| (p.as_str(), a.as_str()))
    }

    pub fn len(&self) -> usize {
        self.aliases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.aliases.is_empty()
    }
}

/// Computes an [`AliasTable`] for a set of import paths
pub struct ImportResolver<'a> {
    known_names: Option<&'a BTreeMap<String, String>>,
    is_reserved: fn(&str) -> bool,
}

impl Default for ImportResolver<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> ImportResolver<'a> {
    /// Resolver for Go output
    pub fn new() -> Self {
        Self {
            known_names: None,
            is_reserved: is_go_reserved,
        }
    }

    /// Package names that take priority over the path-derived base
    pub fn with_known_names(mut self, names: &'a BTreeMap<String, String>) -> Self {
        self.known_names = Some(names);
        self
    }

    /// Swap the reserved-word predicate for another target language
    pub fn with_reserved(mut self, is_reserved: fn(&str) -> bool) -> Self {
        self.is_reserved = is_reserved;
        self
    }

    /// Assign aliases: `mandatory` first, then the remaining `paths` in
    /// lexicographic order, suffixing `0`, `1`, ... on conflicts
    pub fn resolve<'p, I>(&self, paths: I, mandatory: &[(&str, &str)]) -> AliasTable
    where
        I: IntoIterator<Item = &'p str>,
    {
        let mut aliases = BTreeMap::new();
        let mut taken = BTreeSet::new();

        for (path, alias) in mandatory {
            aliases.insert(path.to_string(), alias.to_string());
            taken.insert(alias.to_string());
        }

        let sorted: BTreeSet<&str> = paths.into_iter().collect();
        for path in sorted {
            if aliases.contains_key(path) {
                continue;
            }

            let base = self
                .known_names
                .and_then(|names| names.get(path))
                .cloned()
                .unwrap_or_else(|| sanitize(base_segment(path)));

            let mut alias = base.clone();
            let mut i = 0;
            while taken.contains(&alias) || (self.is_reserved)(&alias) {
                alias = format!("{}{}", base, i);
                i += 1;
            }

            taken.insert(alias.clone());
            aliases.insert(path.to_string(), alias);
        }

        AliasTable { aliases }
    }
}

/// The path segment a package is usually named after
///
/// `github.com/x/y/v2` → `y`, `gopkg.in/yaml.v3` → `yaml`.
pub fn base_segment(path: &str) -> &str {
    let mut segments = path.trim_end_matches('/').rsplit('/');
    let last = segments.next().unwrap_or(path);
    let last = match segments.next() {
        Some(prev) if is_major_version(last) => prev,
        _ => last,
    };

    match last.rfind(".v") {
        Some(dot) if dot > 0 && is_major_version(&last[dot + 1..]) => &last[..dot],
        _ => last,
    }
}

fn is_major_version(segment: &str) -> bool {
    segment
        .strip_prefix('v')
        .is_some_and(|n| !n.is_empty() && n.bytes().all(|b| b.is_ascii_digit()))
}

/// Make a string usable as a Go identifier
///
/// Invalid characters become `_`; a lone `_` becomes `x`.
pub fn sanitize(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        let valid = if out.is_empty() {
            c.is_alphabetic() || c == '_'
        } else {
            c.is_alphanumeric() || c == '_'
        };
        out.push(if valid { c } else { '_' });
    }
    if out == "_" || out.is_empty() {
        out = "x".to_string();
    }
    out
}

/// True for a syntactically valid Go identifier
pub fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_alphanumeric() || c == '_')
}

/// Go keywords
pub fn is_go_reserved(word: &str) -> bool {
    matches!(
        word,
        "break"
            | "case"
            | "chan"
            | "const"
            | "continue"
            | "default"
            | "defer"
            | "else"
            | "fallthrough"
            | "for"
            | "func"
            | "go"
            | "goto"
            | "if"
            | "import"
            | "interface"
            | "map"
            | "package"
            | "range"
            | "return"
            | "select"
            | "struct"
            | "switch"
            | "type"
            | "var"
    )
}
