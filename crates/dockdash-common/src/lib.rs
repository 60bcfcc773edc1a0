// Re-export dependencies used in public interfaces of common types

use std::fmt::Display;
use std::str::FromStr;

pub use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DashError {
    #[error("Unknown resource kind: {0}")]
    UnknownKind(String),

    #[error("Configuration Error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, DashError>;

/// The four resource collections the dashboard manages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    #[default]
    Containers,
    Images,
    Volumes,
    Networks,
}

impl ResourceKind {
    pub const ALL: [ResourceKind; 4] = [
        ResourceKind::Containers,
        ResourceKind::Images,
        ResourceKind::Volumes,
        ResourceKind::Networks,
    ];

    /// Path segment under `/api`.
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceKind::Containers => "containers",
            ResourceKind::Images => "images",
            ResourceKind::Volumes => "volumes",
            ResourceKind::Networks => "networks",
        }
    }

    /// Volumes are addressed by name, everything else by id.
    pub fn addressed_by_name(&self) -> bool {
        matches!(self, ResourceKind::Volumes)
    }
}

impl Display for ResourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResourceKind {
    type Err = DashError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "containers" | "container" => Ok(Self::Containers),
            "images" | "image" => Ok(Self::Images),
            "volumes" | "volume" => Ok(Self::Volumes),
            "networks" | "network" => Ok(Self::Networks),
            other => Err(DashError::UnknownKind(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ContainerRecord {
    pub id: String,
    /// Names as the engine reports them, each with a leading `/`.
    pub names: Vec<String>,
    pub image: String,
    pub state: String,
    pub status: String,
    /// Epoch seconds.
    pub created: i64,
    pub size_rw: i64,
}

impl ContainerRecord {
    /// First name without the engine's leading separator.
    pub fn display_name(&self) -> &str {
        self.names
            .first()
            .map(|n| n.trim_start_matches('/'))
            .unwrap_or_default()
    }

    pub fn display_names(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(|n| n.trim_start_matches('/'))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ImageRecord {
    pub id: String,
    /// Empty for dangling images.
    pub repo_tags: Vec<String>,
    pub created: i64,
    pub size: i64,
    pub virtual_size: i64,
    pub containers: i64,
}

impl ImageRecord {
    pub fn primary_tag(&self) -> Option<&str> {
        self.repo_tags.first().map(String::as_str)
    }

    pub fn is_dangling(&self) -> bool {
        self.repo_tags.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct VolumeRecord {
    pub name: String,
    pub driver: String,
    pub mountpoint: String,
    /// ISO 8601 as reported by the engine.
    pub created: String,
    pub size: i64,
    pub ref_count: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct NetworkRecord {
    pub id: String,
    pub name: String,
    pub driver: String,
    pub scope: String,
    pub internal: bool,
    pub created: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct UsageTotals {
    pub count: u64,
    pub size: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct UsageSummary {
    pub containers: UsageTotals,
    pub images: UsageTotals,
    pub volumes: UsageTotals,
}

/// Outcome of removing a single resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Removal {
    Removed,
    Failed(String),
}

/// One entry of a bulk delete, keyed by the identifier it was asked for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemovalOutcome {
    pub target: String,
    pub removal: Removal,
}

impl RemovalOutcome {
    pub fn removed(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            removal: Removal::Removed,
        }
    }

    pub fn failed(target: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            removal: Removal::Failed(message.into()),
        }
    }

    pub fn succeeded(&self) -> bool {
        matches!(self.removal, Removal::Removed)
    }

    pub fn error(&self) -> Option<&str> {
        match &self.removal {
            Removal::Removed => None,
            Removal::Failed(message) => Some(message),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct DeleteIdsRequest {
    pub ids: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct DeleteNamesRequest {
    pub names: Vec<String>,
}

/// Wire form of a per-item delete result. Volumes key results by `name`,
/// which is accepted on the way in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteResult {
    #[serde(alias = "name")]
    pub id: String,
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VolumeDeleteResult {
    pub name: String,
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl From<RemovalOutcome> for DeleteResult {
    fn from(outcome: RemovalOutcome) -> Self {
        let success = outcome.succeeded();
        Self {
            error: outcome.error().map(str::to_string),
            id: outcome.target,
            success,
        }
    }
}

impl From<RemovalOutcome> for VolumeDeleteResult {
    fn from(outcome: RemovalOutcome) -> Self {
        let success = outcome.succeeded();
        Self {
            error: outcome.error().map(str::to_string),
            name: outcome.target,
            success,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteResponse<T> {
    pub results: Vec<T>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}
