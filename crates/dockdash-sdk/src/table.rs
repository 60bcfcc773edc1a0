//! Filtering and sorting of resource rows.

use dockdash_common::{ContainerRecord, ImageRecord, NetworkRecord, VolumeRecord};
use std::cmp::Ordering;

/// A comparable cell value.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Text(String),
    Number(i64),
    Bool(bool),
}

impl Cell {
    fn text(value: &str) -> Option<Cell> {
        Some(Cell::Text(value.to_string()))
    }

    fn as_text(&self) -> String {
        match self {
            Cell::Text(s) => s.to_lowercase(),
            Cell::Number(n) => n.to_string(),
            Cell::Bool(b) => b.to_string(),
        }
    }
}

/// Missing cells compare as empty text. Text compares by its lowercase form
/// in code point order, with no locale collation: accented letters sort after
/// `z` and punctuation keeps its ASCII position. Engine names and tags are
/// ASCII in practice.
pub fn compare_cells(a: Option<&Cell>, b: Option<&Cell>) -> Ordering {
    let empty = Cell::Text(String::new());
    match (a.unwrap_or(&empty), b.unwrap_or(&empty)) {
        (Cell::Number(x), Cell::Number(y)) => x.cmp(y),
        (Cell::Bool(x), Cell::Bool(y)) => x.cmp(y),
        (x, y) => x.as_text().cmp(&y.as_text()),
    }
}

/// A record shown as one table row.
pub trait Row {
    /// Sortable column keys, in display order.
    const COLUMNS: &'static [&'static str];

    /// Identifier used for selection and deletion.
    fn key(&self) -> &str;

    /// Value compared when sorting by `column`. Derived columns return the
    /// derived scalar.
    fn cell(&self, column: &str) -> Option<Cell>;

    /// Fields the search text is matched against.
    fn search_fields(&self) -> Vec<&str>;

    fn matches(&self, needle: &str) -> bool {
        if needle.is_empty() {
            return true;
        }
        let needle = needle.to_lowercase();
        self.search_fields()
            .iter()
            .any(|field| field.to_lowercase().contains(&needle))
    }
}

impl Row for ContainerRecord {
    const COLUMNS: &'static [&'static str] =
        &["name", "image", "state", "status", "created", "sizeRw"];

    fn key(&self) -> &str {
        &self.id
    }

    fn cell(&self, column: &str) -> Option<Cell> {
        match column {
            "name" | "names" => Cell::text(self.display_name()),
            "id" => Cell::text(&self.id),
            "image" => Cell::text(&self.image),
            "state" => Cell::text(&self.state),
            "status" => Cell::text(&self.status),
            "created" => Some(Cell::Number(self.created)),
            "sizeRw" | "size" => Some(Cell::Number(self.size_rw)),
            _ => None,
        }
    }

    fn search_fields(&self) -> Vec<&str> {
        let mut fields: Vec<&str> = self.display_names().collect();
        fields.push(&self.image);
        fields.push(&self.status);
        fields
    }
}

impl Row for ImageRecord {
    const COLUMNS: &'static [&'static str] =
        &["repoTags", "id", "created", "size", "virtualSize", "containers"];

    fn key(&self) -> &str {
        &self.id
    }

    fn cell(&self, column: &str) -> Option<Cell> {
        match column {
            "repoTags" | "tag" => self.primary_tag().and_then(Cell::text),
            "id" => Cell::text(&self.id),
            "created" => Some(Cell::Number(self.created)),
            "size" => Some(Cell::Number(self.size)),
            "virtualSize" => Some(Cell::Number(self.virtual_size)),
            "containers" => Some(Cell::Number(self.containers)),
            _ => None,
        }
    }

    fn search_fields(&self) -> Vec<&str> {
        let mut fields: Vec<&str> = self.repo_tags.iter().map(String::as_str).collect();
        fields.push(&self.id);
        fields
    }
}

impl Row for VolumeRecord {
    const COLUMNS: &'static [&'static str] =
        &["name", "driver", "mountpoint", "created", "size", "refCount"];

    fn key(&self) -> &str {
        &self.name
    }

    fn cell(&self, column: &str) -> Option<Cell> {
        match column {
            "name" => Cell::text(&self.name),
            "driver" => Cell::text(&self.driver),
            "mountpoint" => Cell::text(&self.mountpoint),
            "created" => Cell::text(&self.created),
            "size" => Some(Cell::Number(self.size)),
            "refCount" => Some(Cell::Number(self.ref_count)),
            _ => None,
        }
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![self.name.as_str(), self.driver.as_str()]
    }
}

impl Row for NetworkRecord {
    const COLUMNS: &'static [&'static str] =
        &["name", "id", "driver", "scope", "internal", "created"];

    fn key(&self) -> &str {
        &self.id
    }

    fn cell(&self, column: &str) -> Option<Cell> {
        match column {
            "name" => Cell::text(&self.name),
            "id" => Cell::text(&self.id),
            "driver" => Cell::text(&self.driver),
            "scope" => Cell::text(&self.scope),
            "internal" => Some(Cell::Bool(self.internal)),
            "created" => Cell::text(&self.created),
            _ => None,
        }
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![self.name.as_str(), self.driver.as_str()]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortState {
    pub column: String,
    pub direction: SortDirection,
}

impl SortState {
    /// Header click: the current ascending column flips to descending, any
    /// other state starts ascending on `column`.
    pub fn toggled(current: Option<&SortState>, column: &str) -> SortState {
        let direction = match current {
            Some(s) if s.column == column && s.direction == SortDirection::Ascending => {
                SortDirection::Descending
            }
            _ => SortDirection::Ascending,
        };
        SortState {
            column: column.to_string(),
            direction,
        }
    }
}

/// Rows matching `search`, then stably sorted by `sort`.
pub fn view<'a, R: Row>(rows: &'a [R], search: &str, sort: Option<&SortState>) -> Vec<&'a R> {
    let mut visible: Vec<&R> = rows.iter().filter(|r| r.matches(search)).collect();
    if let Some(sort) = sort {
        visible.sort_by(|a, b| {
            let ord = compare_cells(a.cell(&sort.column).as_ref(), b.cell(&sort.column).as_ref());
            match sort.direction {
                SortDirection::Ascending => ord,
                SortDirection::Descending => ord.reverse(),
            }
        });
    }
    visible
}

#[cfg(test)]
mod tests {
    use super::*;

    fn images() -> Vec<ImageRecord> {
        vec![
            ImageRecord {
                id: "sha256:aaa".to_string(),
                repo_tags: vec!["x:latest".to_string()],
                size: 100,
                ..Default::default()
            },
            ImageRecord {
                id: "sha256:bbb".to_string(),
                repo_tags: vec![],
                size: 50,
                ..Default::default()
            },
        ]
    }

    fn sizes(rows: &[&ImageRecord]) -> Vec<i64> {
        rows.iter().map(|r| r.size).collect()
    }

    fn sort(column: &str, direction: SortDirection) -> SortState {
        SortState {
            column: column.to_string(),
            direction,
        }
    }

    #[test]
    fn test_image_search_and_size_sort() {
        let rows = images();

        let found = view(&rows, "x:latest", None);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, "sha256:aaa");

        let desc = view(&rows, "", Some(&sort("size", SortDirection::Descending)));
        assert_eq!(sizes(&desc), vec![100, 50]);

        let asc = view(&rows, "", Some(&sort("size", SortDirection::Ascending)));
        assert_eq!(sizes(&asc), vec![50, 100]);
    }

    #[test]
    fn test_search_is_case_insensitive_and_kind_specific() {
        let containers = vec![
            ContainerRecord {
                id: "c1".to_string(),
                names: vec!["/Web-Frontend".to_string()],
                image: "nginx:1.25".to_string(),
                status: "Up 2 hours".to_string(),
                ..Default::default()
            },
            ContainerRecord {
                id: "c2".to_string(),
                names: vec!["/db".to_string()],
                image: "postgres:16".to_string(),
                status: "Exited (0) 3 days ago".to_string(),
                state: "exited".to_string(),
                ..Default::default()
            },
        ];

        assert_eq!(view(&containers, "web", None)[0].id, "c1");
        assert_eq!(view(&containers, "POSTGRES", None)[0].id, "c2");
        assert_eq!(view(&containers, "exited (0)", None)[0].id, "c2");
        // The leading separator is not part of the searchable name.
        assert!(view(&containers, "/db", None).is_empty());
        // State is not a search field.
        assert_eq!(view(&containers, "exited", None).len(), 1);

        let volumes = vec![VolumeRecord {
            name: "data".to_string(),
            driver: "local".to_string(),
            mountpoint: "/srv/secret".to_string(),
            ..Default::default()
        }];
        assert_eq!(view(&volumes, "LOCAL", None).len(), 1);
        assert!(view(&volumes, "secret", None).is_empty());
    }

    #[test]
    fn test_derived_and_missing_values() {
        let rows = images();
        // Dangling image has no primary tag and sorts as empty text.
        let asc = view(&rows, "", Some(&sort("repoTags", SortDirection::Ascending)));
        assert_eq!(asc[0].id, "sha256:bbb");

        let containers = vec![
            ContainerRecord {
                id: "c1".to_string(),
                names: vec!["/zeta".to_string()],
                ..Default::default()
            },
            ContainerRecord {
                id: "c2".to_string(),
                names: vec!["/Alpha".to_string()],
                ..Default::default()
            },
        ];
        let by_name = view(&containers, "", Some(&sort("name", SortDirection::Ascending)));
        assert_eq!(by_name[0].id, "c2");
    }

    #[test]
    fn test_boolean_sort_and_stability() {
        let networks: Vec<NetworkRecord> = [("n1", true), ("n2", false), ("n3", true), ("n4", false)]
            .iter()
            .map(|(id, internal)| NetworkRecord {
                id: id.to_string(),
                internal: *internal,
                ..Default::default()
            })
            .collect();

        let asc = view(&networks, "", Some(&sort("internal", SortDirection::Ascending)));
        let ids: Vec<_> = asc.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec!["n2", "n4", "n1", "n3"]);

        let desc = view(&networks, "", Some(&sort("internal", SortDirection::Descending)));
        let ids: Vec<_> = desc.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec!["n1", "n3", "n2", "n4"]);
    }

    #[test]
    fn test_sort_toggle_cycle() {
        let first = SortState::toggled(None, "size");
        assert_eq!(first, sort("size", SortDirection::Ascending));

        let second = SortState::toggled(Some(&first), "size");
        assert_eq!(second, sort("size", SortDirection::Descending));

        let third = SortState::toggled(Some(&second), "size");
        assert_eq!(third.direction, SortDirection::Ascending);

        let other = SortState::toggled(Some(&second), "created");
        assert_eq!(other, sort("created", SortDirection::Ascending));
    }

    #[test]
    fn test_compare_cells() {
        assert_eq!(
            compare_cells(Some(&Cell::Text("abc".into())), Some(&Cell::Text("ABD".into()))),
            Ordering::Less
        );
        assert_eq!(
            compare_cells(Some(&Cell::Number(9)), Some(&Cell::Number(10))),
            Ordering::Less
        );
        assert_eq!(compare_cells(None, Some(&Cell::Text("a".into()))), Ordering::Less);
        assert_eq!(compare_cells(None, None), Ordering::Equal);
        assert_eq!(
            compare_cells(Some(&Cell::Text("Web".into())), Some(&Cell::Text("web".into()))),
            Ordering::Equal
        );
        assert_eq!(
            compare_cells(Some(&Cell::Text("Zeta".into())), Some(&Cell::Text("alpha".into()))),
            Ordering::Greater
        );
        assert_eq!(
            compare_cells(Some(&Cell::Text("zz".into())), Some(&Cell::Text("Éclair".into()))),
            Ordering::Less
        );
    }
}
