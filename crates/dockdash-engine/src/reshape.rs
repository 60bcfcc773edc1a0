//! Flattening of engine models into dashboard records.
//!
//! Optional engine fields collapse to empty strings, zero or false so every
//! record has a stable shape on the wire.

use bollard::models::{ContainerSummary, ImageSummary, Network, SystemDataUsageResponse, Volume};
use dockdash_common::{
    ContainerRecord, ImageRecord, NetworkRecord, UsageSummary, UsageTotals, VolumeRecord,
};
use std::collections::HashMap;

pub fn container_record(summary: ContainerSummary) -> ContainerRecord {
    ContainerRecord {
        id: summary.id.unwrap_or_default(),
        names: summary.names.unwrap_or_default(),
        image: summary.image.unwrap_or_default(),
        state: summary.state.unwrap_or_default(),
        status: summary.status.unwrap_or_default(),
        created: summary.created.unwrap_or_default(),
        size_rw: summary.size_rw.unwrap_or_default(),
    }
}

pub fn image_record(summary: ImageSummary) -> ImageRecord {
    ImageRecord {
        id: summary.id,
        repo_tags: summary.repo_tags,
        created: summary.created,
        size: summary.size,
        virtual_size: summary.virtual_size.unwrap_or(summary.size),
        containers: summary.containers,
    }
}

pub fn network_record(network: Network) -> NetworkRecord {
    NetworkRecord {
        id: network.id.unwrap_or_default(),
        name: network.name.unwrap_or_default(),
        driver: network.driver.unwrap_or_default(),
        scope: network.scope.unwrap_or_default(),
        internal: network.internal.unwrap_or_default(),
        created: network.created.unwrap_or_default(),
    }
}

/// Per-volume `(size, ref_count)` keyed by name, taken from the usage report.
pub fn volume_usage_index(report: Option<&SystemDataUsageResponse>) -> HashMap<String, (i64, i64)> {
    report
        .and_then(|r| r.volumes.as_ref())
        .map(|volumes| {
            volumes
                .iter()
                .filter_map(|v| {
                    v.usage_data
                        .as_ref()
                        .map(|usage| (v.name.clone(), (usage.size, usage.ref_count)))
                })
                .collect()
        })
        .unwrap_or_default()
}

/// Listing calls do not carry usage, so size and reference count are joined
/// by name. Volumes missing from the index report zero.
pub fn volume_record(volume: Volume, usage: &HashMap<String, (i64, i64)>) -> VolumeRecord {
    let (size, ref_count) = usage.get(&volume.name).copied().unwrap_or((0, 0));
    VolumeRecord {
        name: volume.name,
        driver: volume.driver,
        mountpoint: volume.mountpoint,
        created: volume.created_at.unwrap_or_default(),
        size,
        ref_count,
    }
}

fn totals<I>(sizes: I) -> UsageTotals
where
    I: IntoIterator<Item = i64>,
{
    sizes.into_iter().fold(UsageTotals::default(), |acc, size| UsageTotals {
        count: acc.count + 1,
        // The engine reports -1 when a size is unknown.
        size: acc.size + size.max(0),
    })
}

pub fn usage_summary(report: &SystemDataUsageResponse) -> UsageSummary {
    UsageSummary {
        containers: report
            .containers
            .as_ref()
            .map(|c| totals(c.iter().map(|c| c.size_rw.unwrap_or_default())))
            .unwrap_or_default(),
        images: report
            .images
            .as_ref()
            .map(|i| totals(i.iter().map(|i| i.size)))
            .unwrap_or_default(),
        volumes: report
            .volumes
            .as_ref()
            .map(|v| {
                totals(
                    v.iter()
                        .map(|v| v.usage_data.as_ref().map(|u| u.size).unwrap_or_default()),
                )
            })
            .unwrap_or_default(),
    }
}
