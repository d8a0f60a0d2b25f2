//! Namespace declaration values and the deduplicating set they are collected into.

use indexmap::IndexMap;
use indexmap::map::Entry;
use serde::{Deserialize, Serialize};

/// Prefix used to qualify tags bound to a default namespace
pub const DEFAULT_PREFIX: &str = "jxt";

/// Identity of a declaration for deduplication: `(prefix, url)`.
///
/// The `no_namespace` flag is not part of the key, so a
/// no-namespace location and a default namespace with the same URL collide.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NamespaceKey {
    pub prefix: Option<String>,
    pub url: String,
}

/// One namespace binding discovered in a document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamespaceDeclaration {
    /// Absent for default namespaces and for no-namespace schema locations
    pub prefix: Option<String>,
    /// Namespace URI or schema location
    pub url: String,
    /// Set only for `noNamespaceSchemaLocation` entries
    pub no_namespace: bool,
}

impl NamespaceDeclaration {
    /// `xmlns="url"`
    pub fn default_namespace(url: impl Into<String>) -> Self {
        Self {
            prefix: None,
            url: url.into(),
            no_namespace: false,
        }
    }

    /// `xsi:noNamespaceSchemaLocation="url"`
    pub fn no_namespace_location(url: impl Into<String>) -> Self {
        Self {
            prefix: None,
            url: url.into(),
            no_namespace: true,
        }
    }

    /// `xmlns:prefix="url"`
    pub fn prefixed(prefix: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            prefix: Some(prefix.into()),
            url: url.into(),
            no_namespace: false,
        }
    }

    /// An empty no-namespace placeholder
    pub fn blank() -> Self {
        Self {
            prefix: Some(String::new()),
            url: String::new(),
            no_namespace: true,
        }
    }

    pub fn key(&self) -> NamespaceKey {
        NamespaceKey {
            prefix: self.prefix.clone(),
            url: self.url.clone(),
        }
    }

    pub fn is_default(&self) -> bool {
        self.prefix.is_none()
    }

    /// Prefix to render this declaration with.
    ///
    /// Empty for no-namespace entries, `fallback` for default namespaces,
    /// otherwise the declared prefix.
    pub fn effective_prefix<'a>(&'a self, fallback: &'a str) -> &'a str {
        if self.no_namespace {
            return "";
        }
        match &self.prefix {
            Some(prefix) => prefix.as_str(),
            None => fallback,
        }
    }

    /// Qualify `tag` as `prefix:tag`, or leave it bare for no-namespace entries
    pub fn qualify(&self, tag: &str, fallback: &str) -> String {
        if self.no_namespace {
            tag.to_string()
        } else {
            format!("{}:{}", self.effective_prefix(fallback), tag)
        }
    }

    /// Render as an `xmlns` attribute suitable for a stylesheet header
    pub fn to_attribute(&self, fallback: &str) -> String {
        let prefix = self.effective_prefix(fallback);
        if prefix.is_empty() {
            format!("xmlns=\"{}\"", self.url)
        } else {
            format!("xmlns:{}=\"{}\"", prefix, self.url)
        }
    }
}

/// Insertion-ordered set of declarations keyed by [`NamespaceKey`].
///
/// The first declaration inserted for a key wins; later ones are dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NamespaceSet {
    entries: IndexMap<NamespaceKey, NamespaceDeclaration>,
}

impl NamespaceSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `false` when a declaration with the same key was already present
    pub fn insert(&mut self, declaration: NamespaceDeclaration) -> bool {
        match self.entries.entry(declaration.key()) {
            Entry::Occupied(_) => false,
            Entry::Vacant(slot) => {
                slot.insert(declaration);
                true
            }
        }
    }

    pub fn get(&self, key: &NamespaceKey) -> Option<&NamespaceDeclaration> {
        self.entries.get(key)
    }

    pub fn contains(&self, declaration: &NamespaceDeclaration) -> bool {
        self.entries.contains_key(&declaration.key())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Declarations in discovery order
    pub fn iter(&self) -> impl Iterator<Item = &NamespaceDeclaration> {
        self.entries.values()
    }

    /// Space-separated `xmlns` attributes for every member, in discovery order
    pub fn to_attributes(&self, fallback: &str) -> String {
        self.iter()
            .map(|ns| ns.to_attribute(fallback))
            .collect::<Vec<_>>()
            .join(" ")
    }

    pub fn into_vec(self) -> Vec<NamespaceDeclaration> {
        self.entries.into_values().collect()
    }
}

impl IntoIterator for NamespaceSet {
    type Item = NamespaceDeclaration;
    type IntoIter = indexmap::map::IntoValues<NamespaceKey, NamespaceDeclaration>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_values()
    }
}

impl FromIterator<NamespaceDeclaration> for NamespaceSet {
    fn from_iter<I: IntoIterator<Item = NamespaceDeclaration>>(iter: I) -> Self {
        let mut set = Self::new();
        for declaration in iter {
            set.insert(declaration);
        }
        set
    }
}
