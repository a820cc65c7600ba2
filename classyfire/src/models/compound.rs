//! Classification result model
//!
//! Field names follow the ClassyFire JSON entity format so a [`Compound`]
//! serializes back into the record it was parsed from.

use crate::error::{ClassyFireError, Result};
use crate::models::identifier::Identifier;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

/// One node of the ChemOnt taxonomy
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChemontNode {
    /// Taxon name (e.g. "Organic compounds")
    pub name: String,
    /// Human-readable definition
    pub description: String,
    /// ChemOnt code (e.g. "CHEMONTID:0000000")
    pub chemont_id: String,
    /// Reference URL
    pub url: String,
}

/// Annotation from an external database
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExternalDescriptor {
    pub source: String,
    pub source_id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub annotations: Vec<String>,
}

/// A classified compound
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Compound {
    /// Resolved SMILES
    pub smiles: String,
    /// Resolved InChIKey, `InChIKey=` prefixed
    pub inchikey: String,
    /// Top-level taxon, always present on a classified compound
    pub kingdom: ChemontNode,
    #[serde(default)]
    pub superclass: Option<ChemontNode>,
    #[serde(default)]
    pub class: Option<ChemontNode>,
    #[serde(default)]
    pub subclass: Option<ChemontNode>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub intermediate_nodes: Vec<ChemontNode>,
    #[serde(default)]
    pub direct_parent: Option<ChemontNode>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub alternative_parents: Vec<ChemontNode>,
    #[serde(default)]
    pub molecular_framework: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub substituents: Vec<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub external_descriptors: Vec<ExternalDescriptor>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub ancestors: Vec<String>,
    /// Terms predicted by the ChEBI auxiliary classifier
    #[serde(default, deserialize_with = "null_as_default")]
    pub predicted_chebi_terms: Vec<String>,
    /// Terms predicted by the LIPID MAPS auxiliary classifier
    #[serde(default, deserialize_with = "null_as_default")]
    pub predicted_lipidmaps_terms: Vec<String>,
    #[serde(default)]
    pub classification_version: Option<String>,
}

impl Compound {
    /// Taxonomy chain from kingdom down to the direct parent
    ///
    /// Absent levels are skipped.
    pub fn levels(&self) -> Vec<&ChemontNode> {
        let mut levels = vec![&self.kingdom];
        levels.extend(self.superclass.as_ref());
        levels.extend(self.class.as_ref());
        levels.extend(self.subclass.as_ref());
        levels.extend(self.intermediate_nodes.iter());
        if let Some(parent) = &self.direct_parent {
            // The direct parent often repeats the deepest named level
            if levels.last().map(|last| last.chemont_id != parent.chemont_id).unwrap_or(true) {
                levels.push(parent);
            }
        }
        levels
    }
}

/// Outcome of classifying one identifier
///
/// `Empty` is the service saying "no classification at this time"; it is a
/// value of its own so "fetched but empty" never looks like "not fetched".
#[derive(Debug, Clone, PartialEq)]
pub enum Classification {
    Classified(Box<Compound>),
    Empty,
}

impl Classification {
    pub fn is_empty(&self) -> bool {
        matches!(self, Classification::Empty)
    }

    pub fn compound(&self) -> Option<&Compound> {
        match self {
            Classification::Classified(compound) => Some(compound.as_ref()),
            Classification::Empty => None,
        }
    }

    pub fn into_compound(self) -> Option<Compound> {
        match self {
            Classification::Classified(compound) => Some(*compound),
            Classification::Empty => None,
        }
    }
}

impl From<Compound> for Classification {
    fn from(compound: Compound) -> Self {
        Classification::Classified(Box::new(compound))
    }
}

// Empty serializes as `null`
impl Serialize for Classification {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.compound().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Classification {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        Ok(match Option::<Compound>::deserialize(deserializer)? {
            Some(compound) => compound.into(),
            None => Classification::Empty,
        })
    }
}

/// Build a classification from a raw service response
///
/// `null`, `{}`, `[]` and an object whose `kingdom` is `null` are the
/// "no classification available" shapes. Anything else must parse as a
/// [`Compound`].
pub fn parse_response(identifier: &Identifier, response: Value) -> Result<Classification> {
    let malformed = |message: String| ClassyFireError::MalformedResponse {
        identifier: identifier.to_string(),
        message,
    };

    match &response {
        Value::Null => return Ok(Classification::Empty),
        Value::Array(items) if items.is_empty() => return Ok(Classification::Empty),
        Value::Object(fields) if fields.is_empty() => return Ok(Classification::Empty),
        Value::Object(fields) => {
            if !fields.contains_key("inchikey") {
                return Err(malformed("missing 'inchikey'".to_string()));
            }
            if fields.get("kingdom").map(Value::is_null).unwrap_or(true) {
                return Ok(Classification::Empty);
            }
        }
        other => return Err(malformed(format!("unexpected JSON value: {}", other))),
    }

    serde_json::from_value::<Compound>(response)
        .map(Classification::from)
        .map_err(|e| malformed(e.to_string()))
}

fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}
