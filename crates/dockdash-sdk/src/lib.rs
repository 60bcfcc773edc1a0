//! # dockdash SDK
//!
//! HTTP client for the dockdash gateway and the table state that sits on top
//! of it.
//!
//! ```rust,no_run
//! use dockdash_sdk::{Dashboard, DashClient};
//!
//! # async fn example() {
//! let mut dashboard = Dashboard::new(DashClient::new("http://localhost:3001"));
//! dashboard.refresh().await;
//! dashboard.set_search("redis");
//! dashboard.toggle_sort("size");
//! dashboard.toggle_select_all();
//! let status = dashboard.delete_selected(|_prompt| true).await;
//! println!("{status:?}");
//! # }
//! ```

use async_trait::async_trait;
use dockdash_common::{
    ContainerRecord, DeleteIdsRequest, DeleteNamesRequest, DeleteResponse, DeleteResult,
    ErrorBody, ImageRecord, NetworkRecord, ResourceKind, UsageSummary, VolumeRecord,
};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::debug;

pub mod dashboard;
pub mod table;

pub use dashboard::{Dashboard, DeletePrompt, DeleteStatus, Snapshot};
pub use dockdash_common as common;
pub use table::{Cell, Row, SortDirection, SortState};

#[derive(Error, Debug)]
pub enum SdkError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },
}

/// Everything the dashboard needs from the gateway.
#[async_trait]
pub trait Gateway: Send + Sync {
    async fn containers(&self) -> Result<Vec<ContainerRecord>, SdkError>;
    async fn images(&self) -> Result<Vec<ImageRecord>, SdkError>;
    async fn volumes(&self) -> Result<Vec<VolumeRecord>, SdkError>;
    async fn networks(&self) -> Result<Vec<NetworkRecord>, SdkError>;
    async fn usage(&self) -> Result<UsageSummary, SdkError>;

    /// Bulk delete. Volumes are addressed by name, other kinds by id.
    async fn delete(
        &self,
        kind: ResourceKind,
        targets: Vec<String>,
    ) -> Result<Vec<DeleteResult>, SdkError>;
}

/// reqwest-backed client for the gateway HTTP API.
#[derive(Clone)]
pub struct DashClient {
    client: Client,
    base_url: String,
}

impl DashClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api/{}", self.base_url, path)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, SdkError> {
        let response = self.client.get(self.url(path)).send().await?;
        parse(response).await
    }
}

async fn parse<T: DeserializeOwned>(response: Response) -> Result<T, SdkError> {
    let status = response.status();
    if !status.is_success() {
        let text = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorBody>(&text)
            .map(|body| body.error)
            .unwrap_or(text);
        return Err(SdkError::Api {
            status: status.as_u16(),
            message,
        });
    }
    Ok(response.json().await?)
}

#[async_trait]
impl Gateway for DashClient {
    async fn containers(&self) -> Result<Vec<ContainerRecord>, SdkError> {
        self.get_json("containers").await
    }

    async fn images(&self) -> Result<Vec<ImageRecord>, SdkError> {
        self.get_json("images").await
    }

    async fn volumes(&self) -> Result<Vec<VolumeRecord>, SdkError> {
        self.get_json("volumes").await
    }

    async fn networks(&self) -> Result<Vec<NetworkRecord>, SdkError> {
        self.get_json("networks").await
    }

    async fn usage(&self) -> Result<UsageSummary, SdkError> {
        self.get_json("system").await
    }

    async fn delete(
        &self,
        kind: ResourceKind,
        targets: Vec<String>,
    ) -> Result<Vec<DeleteResult>, SdkError> {
        debug!(%kind, count = targets.len(), "Sending delete");
        let request = self.client.delete(self.url(kind.as_str()));
        let request = if kind.addressed_by_name() {
            request.json(&DeleteNamesRequest { names: targets })
        } else {
            request.json(&DeleteIdsRequest { ids: targets })
        };
        let body: DeleteResponse<DeleteResult> = parse(request.send().await?).await?;
        Ok(body.results)
    }
}
