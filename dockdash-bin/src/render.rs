use chrono::{DateTime, Local};
use colored::Colorize;
use dockdash_common::{ResourceKind, UsageTotals};
use dockdash_sdk::{Dashboard, Gateway, Row, SortDirection};
use ubyte::ByteUnit;

pub fn bytes(size: i64) -> String {
    if size < 0 {
        return "-".to_string();
    }
    ByteUnit::Byte(size as u64).to_string()
}

pub fn epoch(secs: i64) -> String {
    DateTime::from_timestamp(secs, 0)
        .map(|t| t.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_default()
}

pub fn iso(value: &str) -> String {
    DateTime::parse_from_rfc3339(value)
        .map(|t| t.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|_| value.to_string())
}

fn short_id(id: &str) -> &str {
    let id = id.strip_prefix("sha256:").unwrap_or(id);
    match id.char_indices().nth(12) {
        Some((end, _)) => &id[..end],
        None => id,
    }
}

fn usage(label: &str, totals: &UsageTotals) -> String {
    format!("{label}: {} ({})", totals.count, bytes(totals.size))
}

fn columns<R: Row>(sort_column: Option<(&str, SortDirection)>) -> Vec<String> {
    R::COLUMNS
        .iter()
        .map(|c| match sort_column {
            Some((col, SortDirection::Ascending)) if col == *c => format!("{c} ^"),
            Some((col, SortDirection::Descending)) if col == *c => format!("{c} v"),
            _ => c.to_string(),
        })
        .collect()
}

/// Render rows as fixed-width text. The first column is the row number and
/// selection mark.
fn table(header: Vec<String>, rows: Vec<(bool, Vec<String>)>) -> String {
    let mut widths: Vec<usize> = header.iter().map(|h| h.len()).collect();
    for (_, cells) in &rows {
        for (w, cell) in widths.iter_mut().zip(cells) {
            *w = (*w).max(cell.chars().count());
        }
    }

    let line = |cells: &[String]| {
        cells
            .iter()
            .zip(&widths)
            .map(|(c, w)| format!("{c:<width$}", width = *w))
            .collect::<Vec<_>>()
            .join("  ")
    };

    let mut out = format!("      {}\n", line(&header).bold());
    for (n, (selected, cells)) in rows.iter().enumerate() {
        let mark = if *selected { "[x]" } else { "[ ]" };
        out.push_str(&format!("{:>3} {mark} {}\n", n + 1, line(cells)));
    }
    out
}

pub fn dashboard<G: Gateway>(dashboard: &Dashboard<G>) -> String {
    let data = dashboard.data();
    let mut out = String::new();

    out.push_str(&format!(
        "{}   {}   {}\n",
        usage("containers", &data.usage.containers),
        usage("images", &data.usage.images),
        usage("volumes", &data.usage.volumes),
    ));

    let tabs: Vec<String> = ResourceKind::ALL
        .iter()
        .map(|k| {
            if *k == dashboard.tab() {
                format!("[{k}]").cyan().bold().to_string()
            } else {
                k.to_string()
            }
        })
        .collect();
    out.push_str(&tabs.join(" "));
    if !dashboard.search().is_empty() {
        out.push_str(&format!("   search: {}", dashboard.search().yellow()));
    }
    out.push('\n');

    if let Some(error) = dashboard.error() {
        out.push_str(&format!("{}\n", error.red().bold()));
    }

    let sort = dashboard.sort().map(|s| (s.column.as_str(), s.direction));
    let sel = |key: &str| dashboard.is_selected(key);

    let body = match dashboard.tab() {
        ResourceKind::Containers => table(
            columns::<dockdash_common::ContainerRecord>(sort),
            dashboard
                .visible_containers()
                .into_iter()
                .map(|c| {
                    (
                        sel(c.key()),
                        vec![
                            c.display_name().to_string(),
                            c.image.clone(),
                            c.state.clone(),
                            c.status.clone(),
                            epoch(c.created),
                            bytes(c.size_rw),
                        ],
                    )
                })
                .collect(),
        ),
        ResourceKind::Images => table(
            columns::<dockdash_common::ImageRecord>(sort),
            dashboard
                .visible_images()
                .into_iter()
                .map(|i| {
                    let tags = if i.is_dangling() {
                        "<none>".to_string()
                    } else {
                        i.repo_tags.join(", ")
                    };
                    (
                        sel(i.key()),
                        vec![
                            tags,
                            short_id(&i.id).to_string(),
                            epoch(i.created),
                            bytes(i.size),
                            bytes(i.virtual_size),
                            i.containers.to_string(),
                        ],
                    )
                })
                .collect(),
        ),
        ResourceKind::Volumes => table(
            columns::<dockdash_common::VolumeRecord>(sort),
            dashboard
                .visible_volumes()
                .into_iter()
                .map(|v| {
                    (
                        sel(v.key()),
                        vec![
                            v.name.clone(),
                            v.driver.clone(),
                            v.mountpoint.clone(),
                            iso(&v.created),
                            bytes(v.size),
                            v.ref_count.to_string(),
                        ],
                    )
                })
                .collect(),
        ),
        ResourceKind::Networks => table(
            columns::<dockdash_common::NetworkRecord>(sort),
            dashboard
                .visible_networks()
                .into_iter()
                .map(|n| {
                    (
                        sel(n.key()),
                        vec![
                            n.name.clone(),
                            short_id(&n.id).to_string(),
                            n.driver.clone(),
                            n.scope.clone(),
                            if n.internal { "yes" } else { "no" }.to_string(),
                            iso(&n.created),
                        ],
                    )
                })
                .collect(),
        ),
    };
    out.push_str(&body);

    let visible = dashboard.visible_keys().len();
    out.push_str(&format!(
        "{} shown, {} selected{}\n",
        visible,
        dashboard.selected().len(),
        if dashboard.is_loading() { ", loading..." } else { "" }
    ));
    out
}
