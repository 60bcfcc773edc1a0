//! Best-effort bulk removal.

use crate::Engine;
use dockdash_common::{RemovalOutcome, ResourceKind};
use futures::future::join_all;
use tracing::{info, warn};

/// Remove every target independently. A failure never stops the others and
/// nothing is rolled back; the returned outcomes follow input order.
pub async fn remove_all(
    engine: &dyn Engine,
    kind: ResourceKind,
    targets: Vec<String>,
) -> Vec<RemovalOutcome> {
    let attempts = targets.into_iter().map(|target| async move {
        match engine.remove(kind, &target).await {
            Ok(()) => RemovalOutcome::removed(target),
            Err(e) => {
                warn!(%kind, %target, error = %e, "Removal failed");
                RemovalOutcome::failed(target, e.engine_message())
            }
        }
    });

    let outcomes = join_all(attempts).await;
    let failed = outcomes.iter().filter(|o| !o.succeeded()).count();
    info!(%kind, total = outcomes.len(), failed, "Bulk removal finished");
    outcomes
}
