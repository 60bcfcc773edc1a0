//! Docker Engine access over the local control socket.

use crate::reshape::{
    container_record, image_record, network_record, usage_summary, volume_record,
    volume_usage_index,
};
use crate::{Engine, EngineError, Result};
use async_trait::async_trait;
use bollard::container::{ListContainersOptions, RemoveContainerOptions};
use bollard::image::{ListImagesOptions, RemoveImageOptions};
use bollard::network::ListNetworksOptions;
use bollard::volume::{ListVolumesOptions, RemoveVolumeOptions};
use bollard::{Docker, API_DEFAULT_VERSION};
use dockdash_common::{
    ContainerRecord, ImageRecord, NetworkRecord, ResourceKind, UsageSummary, VolumeRecord,
};
use tokio::sync::OnceCell;
use tracing::{debug, info, instrument, warn};

pub const DEFAULT_SOCKET_PATH: &str = "/var/run/docker.sock";

/// Seconds bollard waits on a single engine call.
const ENGINE_TIMEOUT_SECS: u64 = 120;

/// Engine backed by the Docker socket. The client handle is created on first
/// use and shared by every request afterwards.
pub struct DockerEngine {
    socket_path: String,
    client: OnceCell<Docker>,
}

impl DockerEngine {
    pub fn new(socket_path: impl Into<String>) -> Self {
        Self {
            socket_path: socket_path.into(),
            client: OnceCell::new(),
        }
    }

    /// Engine over an already connected client, for endpoints other than the
    /// local socket.
    pub fn with_client(docker: Docker) -> Self {
        Self {
            socket_path: String::new(),
            client: OnceCell::from(docker),
        }
    }

    pub fn socket_path(&self) -> &str {
        &self.socket_path
    }

    async fn docker(&self) -> Result<&Docker> {
        self.client
            .get_or_try_init(|| async {
                info!(socket = %self.socket_path, "Connecting to Docker engine");
                Docker::connect_with_socket(&self.socket_path, ENGINE_TIMEOUT_SECS, API_DEFAULT_VERSION)
                    .map_err(EngineError::Connect)
            })
            .await
    }
}

impl Default for DockerEngine {
    fn default() -> Self {
        Self::new(DEFAULT_SOCKET_PATH)
    }
}

#[async_trait]
impl Engine for DockerEngine {
    async fn ping(&self) -> Result<String> {
        let docker = self.docker().await?;
        docker.ping().await?;
        let version = docker.version().await?;
        Ok(version.version.unwrap_or_default())
    }

    #[instrument(skip(self))]
    async fn list_containers(&self) -> Result<Vec<ContainerRecord>> {
        let options = ListContainersOptions::<String> {
            all: true,
            size: true,
            ..Default::default()
        };
        let containers = self.docker().await?.list_containers(Some(options)).await?;
        debug!(count = containers.len(), "Listed containers");
        Ok(containers.into_iter().map(container_record).collect())
    }

    #[instrument(skip(self))]
    async fn list_images(&self) -> Result<Vec<ImageRecord>> {
        let options = ListImagesOptions::<String> {
            all: true,
            ..Default::default()
        };
        let images = self.docker().await?.list_images(Some(options)).await?;
        debug!(count = images.len(), "Listed images");
        Ok(images.into_iter().map(image_record).collect())
    }

    #[instrument(skip(self))]
    async fn list_volumes(&self) -> Result<Vec<VolumeRecord>> {
        let docker = self.docker().await?;
        let listing = docker
            .list_volumes(None::<ListVolumesOptions<String>>)
            .await?;

        // Sizes are best-effort: a failed usage query leaves every volume at zero.
        let report = match docker.df().await {
            Ok(report) => Some(report),
            Err(e) => {
                warn!(error = %e, "Disk usage query failed, volume sizes default to zero");
                None
            }
        };
        let usage = volume_usage_index(report.as_ref());

        let volumes = listing.volumes.unwrap_or_default();
        debug!(count = volumes.len(), sized = usage.len(), "Listed volumes");
        Ok(volumes
            .into_iter()
            .map(|volume| volume_record(volume, &usage))
            .collect())
    }

    #[instrument(skip(self))]
    async fn list_networks(&self) -> Result<Vec<NetworkRecord>> {
        let networks = self
            .docker()
            .await?
            .list_networks(None::<ListNetworksOptions<String>>)
            .await?;
        debug!(count = networks.len(), "Listed networks");
        Ok(networks.into_iter().map(network_record).collect())
    }

    #[instrument(skip(self))]
    async fn usage(&self) -> Result<UsageSummary> {
        let report = self.docker().await?.df().await?;
        Ok(usage_summary(&report))
    }

    #[instrument(skip(self))]
    async fn remove(&self, kind: ResourceKind, target: &str) -> Result<()> {
        let docker = self.docker().await?;
        match kind {
            ResourceKind::Containers => {
                docker
                    .remove_container(
                        target,
                        Some(RemoveContainerOptions {
                            force: true,
                            ..Default::default()
                        }),
                    )
                    .await?
            }
            ResourceKind::Images => {
                docker
                    .remove_image(
                        target,
                        Some(RemoveImageOptions {
                            force: true,
                            ..Default::default()
                        }),
                        None,
                    )
                    .await?;
            }
            ResourceKind::Volumes => {
                docker
                    .remove_volume(target, Some(RemoveVolumeOptions { force: true }))
                    .await?
            }
            ResourceKind::Networks => docker.remove_network(target).await?,
        }
        info!(%kind, %target, "Removed");
        Ok(())
    }
}
