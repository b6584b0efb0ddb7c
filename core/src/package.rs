use serde::{Deserialize, Serialize};

use crate::TypeSchema;

/// Serializable bundle of schemas for several types.
///
/// A package groups multiple [`TypeSchema`] values with version metadata,
/// making it suitable for emitting the schemas of every type in a source
/// directory as a single file or embedding them at build time.
///
/// # Examples
///
/// ```
/// use type2cli_core::*;
///
/// let mut package = SchemaPackage::new("1.0.0");
/// package.name = Some("demo-types".into());
/// package.schemas.push(TypeSchema::new("Bar"));
/// package.schemas.push(TypeSchema::new("Repo"));
///
/// assert_eq!(package.schema_count(), 2);
/// assert!(package.find("Repo").is_some());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaPackage {
    /// Schema contract version (populated from
    /// [`SCHEMA_CONTRACT_VERSION`](crate::SCHEMA_CONTRACT_VERSION)).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema_version: Option<String>,
    /// Package format version (semver string).
    pub version: String,
    /// Optional package name.
    pub name: Option<String>,
    /// Optional ISO-8601 timestamp for package creation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generated_at: Option<String>,
    /// Optional hash of the serialized schemas.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bundle_hash: Option<String>,
    /// Type schemas included in this package.
    pub schemas: Vec<TypeSchema>,
}

impl SchemaPackage {
    /// Creates a package with required fields.
    ///
    /// The `schema_version` is automatically set from
    /// [`SCHEMA_CONTRACT_VERSION`](crate::SCHEMA_CONTRACT_VERSION).
    pub fn new(version: impl Into<String>) -> Self {
        Self {
            schema_version: Some(crate::SCHEMA_CONTRACT_VERSION.to_string()),
            version: version.into(),
            name: None,
            generated_at: None,
            bundle_hash: None,
            schemas: Vec::new(),
        }
    }

    /// Returns the number of schemas in this package.
    pub fn schema_count(&self) -> usize {
        self.schemas.len()
    }

    /// Finds the schema for `type_name`.
    pub fn find(&self, type_name: &str) -> Option<&TypeSchema> {
        self.schemas.iter().find(|s| s.type_name == type_name)
    }

    /// Sorts schemas by type name for deterministic output.
    pub fn sort(&mut self) {
        self.schemas.sort_by(|a, b| a.type_name.cmp(&b.type_name));
    }
}
