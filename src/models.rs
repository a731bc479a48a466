// src/models.rs

//! Data types shared across the generator.

use serde::{Deserialize, Deserializer};
use serde_yaml::Value;
use std::fmt;

// --- DOCUMENT METADATA ---

/// Typed view over the merged front matter and sidecar of a document.
///
/// Only the fields the generator reads are modelled; every other key of the
/// source mapping is ignored. A field with an unexpected shape (a list as
/// `title`, a string as `html`) reads as absent instead of failing the whole
/// document, so a valid `id` is never lost to an unrelated key.
#[derive(Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(default)]
pub struct DocumentMetadata {
    /// The declared identifier of the document.
    #[serde(deserialize_with = "deserialize_scalar_string")]
    pub id: Option<String>,
    /// Human readable title.
    #[serde(deserialize_with = "deserialize_scalar_string")]
    pub title: Option<String>,
    /// Rendering options (`html:` block).
    #[serde(deserialize_with = "deserialize_html_options")]
    pub html: HtmlOptions,
}

/// The `html:` block of a document's metadata.
#[derive(Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(default)]
pub struct HtmlOptions {
    /// Template used by the render stage instead of the default one.
    #[serde(deserialize_with = "deserialize_scalar_string")]
    pub template: Option<String>,
}

impl DocumentMetadata {
    /// Returns the declared id, treating an empty or blank value as absent.
    pub fn declared_id(&self) -> Option<&str> {
        self.id.as_deref().filter(|id| !id.trim().is_empty())
    }

    /// Returns the template override, if the document declares one.
    pub fn template_override(&self) -> Option<&str> {
        self.html
            .template
            .as_deref()
            .filter(|tpl| !tpl.trim().is_empty())
    }
}

/// Keeps the string form of any YAML scalar (`id: 42`, `id: true`).
/// Sequences and mappings read as `None`.
fn scalar_string(value: Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Tagged(tagged) => scalar_string(tagged.value),
        other => {
            log::debug!("Ignoring non-scalar metadata value: {:?}", other);
            None
        }
    }
}

fn deserialize_scalar_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(scalar_string)
}

fn deserialize_html_options<'de, D>(deserializer: D) -> Result<HtmlOptions, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    match value {
        Value::Null => Ok(HtmlOptions::default()),
        Value::Mapping(_) => Ok(serde_yaml::from_value(value).unwrap_or_else(|e| {
            log::debug!("Ignoring malformed 'html' block: {}", e);
            HtmlOptions::default()
        })),
        other => {
            log::debug!("Ignoring 'html' value that is not a mapping: {:?}", other);
            Ok(HtmlOptions::default())
        }
    }
}

// --- REFERENCES ---

/// The two inclusion calls recognized inside fenced script blocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum IncludeCall {
    /// `include('a.md', 'b.md')`: each file (or directory, fully) is inlined.
    Include,
    /// `include_deflist_entry('dir', glob='*.md')`: directory entries matched by `glob`.
    IncludeDeflistEntry,
}

impl IncludeCall {
    /// Maps the call name found in the source text to the call kind.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "include" => Some(Self::Include),
            "include_deflist_entry" => Some(Self::IncludeDeflistEntry),
            _ => None,
        }
    }

    /// The name of the call as written in documents.
    pub fn name(self) -> &'static str {
        match self {
            Self::Include => "include",
            Self::IncludeDeflistEntry => "include_deflist_entry",
        }
    }

    /// Whether the call honors a `glob=` keyword argument.
    pub fn accepts_glob(self) -> bool {
        matches!(self, Self::IncludeDeflistEntry)
    }
}

impl fmt::Display for IncludeCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A pointer from a document to another document or file, as found in its text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reference {
    /// An inline token naming another document by `id`.
    Id(String),
    /// An inclusion call with its raw, unparsed argument list.
    Include {
        /// Which call was used.
        call: IncludeCall,
        /// The text between the call's parentheses.
        args: String,
    },
}

// --- DEPENDENCY EDGES ---

/// A `dependent: dependency` pair of the generated rule set.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Edge {
    /// The build path that must be rebuilt.
    pub dependent: String,
    /// The path it depends on.
    pub dependency: String,
}

impl Edge {
    /// Creates a new edge.
    pub fn new(dependent: impl Into<String>, dependency: impl Into<String>) -> Self {
        Self {
            dependent: dependent.into(),
            dependency: dependency.into(),
        }
    }

    /// Splits a rule line at its first colon. Returns `None` for lines without one.
    pub fn parse(rule: &str) -> Option<Self> {
        let (dependent, dependency) = rule.split_once(':')?;
        Some(Self::new(dependent.trim(), dependency.trim()))
    }
}

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.dependent, self.dependency)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metadata_accepts_numeric_id_and_nested_template() {
        let yaml = "id: 42\ntitle: Intro\nhtml:\n  template: src/templates/wide.html.jinja\nextra: [1, 2]\n";
        let meta: DocumentMetadata = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(meta.declared_id(), Some("42"));
        assert_eq!(meta.title.as_deref(), Some("Intro"));
        assert_eq!(
            meta.template_override(),
            Some("src/templates/wide.html.jinja")
        );
    }

    #[test]
    fn test_metadata_blank_id_is_absent() {
        let meta: DocumentMetadata = serde_yaml::from_str("id: ''\n").unwrap();
        assert_eq!(meta.declared_id(), None);
        assert_eq!(meta.template_override(), None);
    }

    #[test]
    fn test_metadata_sequence_id_reads_as_absent() {
        let meta: DocumentMetadata = serde_yaml::from_str("id: [a, b]\n").unwrap();
        assert_eq!(meta.declared_id(), None);
    }

    #[test]
    fn test_odd_shaped_fields_keep_the_id() {
        let meta: DocumentMetadata =
            serde_yaml::from_str("id: real-id\ntitle: [Part, One]\nhtml: wide\n").unwrap();
        assert_eq!(meta.declared_id(), Some("real-id"));
        assert_eq!(meta.title, None);
        assert_eq!(meta.template_override(), None);

        let meta: DocumentMetadata =
            serde_yaml::from_str("id: x\nhtml:\n  template: {name: wide}\n").unwrap();
        assert_eq!(meta.declared_id(), Some("x"));
        assert_eq!(meta.template_override(), None);
    }

    #[test]
    fn test_edge_parse_and_display() {
        let edge = Edge::parse("build/a.md :  build/b.md").unwrap();
        assert_eq!(edge.dependent, "build/a.md");
        assert_eq!(edge.dependency, "build/b.md");
        assert_eq!(edge.to_string(), "build/a.md: build/b.md");
        assert!(Edge::parse(".PHONY all").is_none());
    }

    #[test]
    fn test_include_call_names() {
        assert_eq!(IncludeCall::from_name("include"), Some(IncludeCall::Include));
        assert_eq!(
            IncludeCall::from_name("include_deflist_entry"),
            Some(IncludeCall::IncludeDeflistEntry)
        );
        assert_eq!(IncludeCall::from_name("mermaid"), None);
        assert!(!IncludeCall::Include.accepts_glob());
        assert!(IncludeCall::IncludeDeflistEntry.accepts_glob());
    }
}
