use async_trait::async_trait;
use bollard::errors::Error as BollardError;
use dockdash_common::{
    ContainerRecord, ImageRecord, NetworkRecord, ResourceKind, UsageSummary, VolumeRecord,
};
use thiserror::Error;

// Re-export dependencies potentially needed by consumers (like the gateway)
pub use bollard;
pub use dockdash_common as common;

pub mod docker;
pub mod removal;
pub mod reshape;

pub use docker::{DockerEngine, DEFAULT_SOCKET_PATH};
pub use removal::remove_all;

// --- Custom Error Type ---
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Engine connection failed: {0}")]
    Connect(#[source] BollardError),
    #[error("Docker API error: {0}")]
    DockerApi(#[from] BollardError),
}

impl EngineError {
    /// The message the engine itself returned, without client-side wrapping.
    pub fn engine_message(&self) -> String {
        match self {
            EngineError::Connect(err) | EngineError::DockerApi(err) => match err {
                BollardError::DockerResponseServerError { message, .. } => message.clone(),
                other => other.to_string(),
            },
        }
    }
}

pub type Result<T> = std::result::Result<T, EngineError>;

/// Read and remove access to a container engine, already reshaped into records.
#[async_trait]
pub trait Engine: Send + Sync {
    /// Engine version string reported by a ping.
    async fn ping(&self) -> Result<String>;

    /// All containers, stopped ones included.
    async fn list_containers(&self) -> Result<Vec<ContainerRecord>>;

    /// All images, untagged and intermediate ones included.
    async fn list_images(&self) -> Result<Vec<ImageRecord>>;

    /// Volumes with size and reference count joined from the usage report.
    async fn list_volumes(&self) -> Result<Vec<VolumeRecord>>;

    async fn list_networks(&self) -> Result<Vec<NetworkRecord>>;

    async fn usage(&self) -> Result<UsageSummary>;

    /// Remove one resource. Containers, images and volumes are force-removed.
    async fn remove(&self, kind: ResourceKind, target: &str) -> Result<()>;
}
