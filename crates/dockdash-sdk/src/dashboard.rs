//! Client-side table state: active tab, search, sort, selection and the
//! bulk delete round-trip.

use crate::table::{view, Row, SortState};
use crate::Gateway;
use dockdash_common::{
    ContainerRecord, ImageRecord, NetworkRecord, ResourceKind, UsageSummary, VolumeRecord,
};
use std::collections::BTreeSet;
use tracing::{info, warn};

/// Data from the last successful refresh.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snapshot {
    pub containers: Vec<ContainerRecord>,
    pub images: Vec<ImageRecord>,
    pub volumes: Vec<VolumeRecord>,
    pub networks: Vec<NetworkRecord>,
    pub usage: UsageSummary,
}

/// What the user is asked to confirm before a delete is sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeletePrompt {
    pub kind: ResourceKind,
    pub targets: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteStatus {
    /// Another round-trip is in flight.
    Busy,
    NothingSelected,
    Cancelled,
    /// The gateway answered; `failed` items were not removed.
    Completed { deleted: usize, failed: usize },
    /// The request itself failed; nothing is known about individual items.
    RequestFailed,
}

pub struct Dashboard<G> {
    gateway: G,
    data: Snapshot,
    tab: ResourceKind,
    search: String,
    sort: Option<SortState>,
    selected: BTreeSet<String>,
    error: Option<String>,
    loading: bool,
}

impl<G: Gateway> Dashboard<G> {
    pub fn new(gateway: G) -> Self {
        Self {
            gateway,
            data: Snapshot::default(),
            tab: ResourceKind::default(),
            search: String::new(),
            sort: None,
            selected: BTreeSet::new(),
            error: None,
            loading: false,
        }
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    pub fn data(&self) -> &Snapshot {
        &self.data
    }

    pub fn tab(&self) -> ResourceKind {
        self.tab
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn sort(&self) -> Option<&SortState> {
        self.sort.as_ref()
    }

    pub fn selected(&self) -> &BTreeSet<String> {
        &self.selected
    }

    pub fn is_selected(&self, key: &str) -> bool {
        self.selected.contains(key)
    }

    /// Current error banner, if any.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Switching tabs resets selection, search and sort.
    pub fn set_tab(&mut self, kind: ResourceKind) {
        self.tab = kind;
        self.selected.clear();
        self.search.clear();
        self.sort = None;
    }

    pub fn set_search(&mut self, text: impl Into<String>) {
        self.search = text.into();
    }

    pub fn toggle_sort(&mut self, column: &str) {
        self.sort = Some(SortState::toggled(self.sort.as_ref(), column));
    }

    pub fn toggle_selected(&mut self, key: &str) {
        if !self.selected.remove(key) {
            self.selected.insert(key.to_string());
        }
    }

    /// Toggle over the visible rows only: when every visible row is already
    /// selected they are deselected, otherwise the selection becomes exactly
    /// the visible rows.
    pub fn toggle_select_all(&mut self) {
        let visible = self.visible_keys();
        let all_selected =
            !visible.is_empty() && visible.iter().all(|key| self.selected.contains(key));
        if all_selected {
            for key in &visible {
                self.selected.remove(key);
            }
        } else {
            self.selected = visible.into_iter().collect();
        }
    }

    fn visible<'a, R: Row>(&self, rows: &'a [R]) -> Vec<&'a R> {
        view(rows, &self.search, self.sort.as_ref())
    }

    pub fn visible_containers(&self) -> Vec<&ContainerRecord> {
        self.visible(&self.data.containers)
    }

    pub fn visible_images(&self) -> Vec<&ImageRecord> {
        self.visible(&self.data.images)
    }

    pub fn visible_volumes(&self) -> Vec<&VolumeRecord> {
        self.visible(&self.data.volumes)
    }

    pub fn visible_networks(&self) -> Vec<&NetworkRecord> {
        self.visible(&self.data.networks)
    }

    /// Keys of the active tab's rows after filtering and sorting.
    pub fn visible_keys(&self) -> Vec<String> {
        fn keys<R: Row>(rows: Vec<&R>) -> Vec<String> {
            rows.into_iter().map(|r| r.key().to_string()).collect()
        }
        match self.tab {
            ResourceKind::Containers => keys(self.visible_containers()),
            ResourceKind::Images => keys(self.visible_images()),
            ResourceKind::Volumes => keys(self.visible_volumes()),
            ResourceKind::Networks => keys(self.visible_networks()),
        }
    }

    /// Fetch all five collections concurrently. Nothing is committed unless
    /// every fetch succeeds; on failure the banner is set and earlier data
    /// stays. Returns whether the refresh succeeded.
    pub async fn refresh(&mut self) -> bool {
        self.loading = true;
        self.error = None;

        let gateway = &self.gateway;
        let fetched = tokio::try_join!(
            gateway.containers(),
            gateway.images(),
            gateway.volumes(),
            gateway.networks(),
            gateway.usage(),
        );

        let ok = match fetched {
            Ok((containers, images, volumes, networks, usage)) => {
                self.data = Snapshot {
                    containers,
                    images,
                    volumes,
                    networks,
                    usage,
                };
                true
            }
            Err(e) => {
                warn!(error = %e, "Refresh failed");
                self.error = Some("Failed to fetch data".to_string());
                false
            }
        };
        self.loading = false;
        ok
    }

    /// Delete the selection on the active tab after `confirm` accepts it.
    /// Whatever the per-item outcome, the selection is cleared and a full
    /// refresh follows. A failed refresh keeps its own banner.
    pub async fn delete_selected<F>(&mut self, confirm: F) -> DeleteStatus
    where
        F: FnOnce(&DeletePrompt) -> bool,
    {
        if self.loading {
            return DeleteStatus::Busy;
        }
        if self.selected.is_empty() {
            return DeleteStatus::NothingSelected;
        }

        let prompt = DeletePrompt {
            kind: self.tab,
            targets: self.selected.iter().cloned().collect(),
        };
        if !confirm(&prompt) {
            return DeleteStatus::Cancelled;
        }

        self.loading = true;
        let results = match self.gateway.delete(prompt.kind, prompt.targets).await {
            Ok(results) => results,
            Err(e) => {
                warn!(error = %e, kind = %self.tab, "Delete request failed");
                self.error = Some("Failed to delete items".to_string());
                self.loading = false;
                return DeleteStatus::RequestFailed;
            }
        };

        let failed = results.iter().filter(|r| !r.success).count();
        let deleted = results.len() - failed;
        info!(kind = %self.tab, deleted, failed, "Delete finished");

        self.selected.clear();
        let refreshed = self.refresh().await;
        if failed > 0 && refreshed {
            self.error = Some(format!("Failed to delete {failed} items"));
        }
        DeleteStatus::Completed { deleted, failed }
    }
}
