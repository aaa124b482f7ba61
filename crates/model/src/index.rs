use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Scalar type of a key attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AttributeType {
    S,
    N,
    B,
}

/// One attribute of an index key. The first entry of
/// [`GsiSpec::key_attributes`] is the partition key, the optional
/// second entry is the sort key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct KeyAttribute {
    pub attribute_name: String,
    pub attribute_type: AttributeType,
}

/// Which item attributes the index projects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "ProjectionType")]
pub enum Projection {
    #[serde(rename = "ALL")]
    All,
    #[serde(rename = "KEYS_ONLY")]
    KeysOnly,
    #[serde(rename = "INCLUDE")]
    Include {
        #[serde(rename = "NonKeyAttributes")]
        non_key_attributes: Vec<String>,
    },
}

/// Provisioned read/write capacity for the index.
/// Omitted entirely when the table runs in on-demand mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Throughput {
    pub read_capacity_units: i64,
    pub write_capacity_units: i64,
}

/// Full specification of one global secondary index.
/// The name is immutable once submitted to the service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct GsiSpec {
    pub index_name: String,
    pub key_attributes: Vec<KeyAttribute>,
    pub projection: Projection,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub throughput: Option<Throughput>,
}

impl GsiSpec {
    /// Check the structural invariants of the specification.
    /// Run before any mutation is submitted; a violation fails the
    /// whole lifecycle event without touching the service.
    pub fn validate(&self) -> Result<(), SpecViolation> {
        if self.index_name.is_empty() {
            return Err(self.violation("index name must not be empty"));
        }

        if self.key_attributes.is_empty() || self.key_attributes.len() > 2 {
            return Err(self.violation(
                "key attributes must contain a partition key and at most one sort key",
            ));
        }

        if self
            .key_attributes
            .iter()
            .any(|key| key.attribute_name.is_empty())
        {
            return Err(self.violation("key attribute names must not be empty"));
        }

        if let Projection::Include { non_key_attributes } = &self.projection {
            if non_key_attributes.is_empty() {
                return Err(self.violation("INCLUDE projection requires at least one attribute"));
            }
        }

        Ok(())
    }

    fn violation(&self, reason: &str) -> SpecViolation {
        SpecViolation {
            index_name: self.index_name.clone(),
            reason: reason.to_string(),
        }
    }
}

/// A structurally invalid index specification.
#[derive(Debug)]
pub struct SpecViolation {
    pub index_name: String,
    pub reason: String,
}

impl Display for SpecViolation {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid index [{}]: {}", self.index_name, self.reason)
    }
}

impl std::error::Error for SpecViolation {}

/// Status of an index as reported by the service.
///
/// `Active` is the only terminal success state; `Failed` is terminal
/// failure; `Creating` and `Deleting` drive continued polling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IndexStatus {
    NotFound,
    Creating,
    Active,
    Deleting,
    Failed,
}

impl IndexStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, IndexStatus::Active | IndexStatus::Failed)
    }
}

impl Display for IndexStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let name: &str = match self {
            IndexStatus::NotFound => "NOT_FOUND",
            IndexStatus::Creating => "CREATING",
            IndexStatus::Active => "ACTIVE",
            IndexStatus::Deleting => "DELETING",
            IndexStatus::Failed => "FAILED",
        };

        f.write_str(name)
    }
}
