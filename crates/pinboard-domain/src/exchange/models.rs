//! Exchange file layout.
//!
//! One CSV per entity plus an `images/` folder. Rows map 1:1 to stored rows
//! except for tab viewports, which are not exchanged, and card images,
//! which are referenced by file name instead of by hash.

use crate::{Card, Connection, Group, Placement, Tab};

pub const CARDS_CSV: &str = "cards.csv";
pub const TABS_CSV: &str = "tabs.csv";
pub const PLACEMENTS_CSV: &str = "placements.csv";
pub const GROUPS_CSV: &str = "groups.csv";
pub const CONNECTIONS_CSV: &str = "connections.csv";
pub const IMAGES_DIR: &str = "images";

/// Every CSV file an exchange bundle must contain.
pub const CSV_FILES: [&str; 5] = [CARDS_CSV, TABS_CSV, PLACEMENTS_CSV, GROUPS_CSV, CONNECTIONS_CSV];

/// Columns written on export and the subset an import requires.
pub struct CsvLayout {
    pub file: &'static str,
    pub headers: &'static [&'static str],
    pub required: &'static [&'static str],
}

pub const CARDS: CsvLayout = CsvLayout {
    file: CARDS_CSV,
    headers: &["id", "title", "description", "image_filename"],
    required: &["id", "title"],
};

pub const TABS: CsvLayout = CsvLayout {
    file: TABS_CSV,
    headers: &["id", "name", "order"],
    required: &["id", "name", "order"],
};

pub const PLACEMENTS: CsvLayout = CsvLayout {
    file: PLACEMENTS_CSV,
    headers: &["id", "tab_id", "card_id", "x", "y", "group_id"],
    required: &["id", "tab_id", "card_id", "x", "y"],
};

pub const GROUPS: CsvLayout = CsvLayout {
    file: GROUPS_CSV,
    headers: &["id", "tab_id", "label", "x", "y", "width", "height"],
    required: &["id", "tab_id", "label", "x", "y", "width", "height"],
};

pub const CONNECTIONS: CsvLayout = CsvLayout {
    file: CONNECTIONS_CSV,
    headers: &["tab_id", "from_type", "from_id", "to_type", "to_id", "label", "color"],
    required: &["tab_id", "from_type", "from_id", "to_type", "to_id", "color"],
};

pub const LAYOUTS: [&CsvLayout; 5] = [&CARDS, &TABS, &PLACEMENTS, &GROUPS, &CONNECTIONS];

fn opt(value: &Option<String>) -> String {
    value.clone().unwrap_or_default()
}

fn opt_id(value: Option<uuid::Uuid>) -> String {
    value.map(|id| id.to_string()).unwrap_or_default()
}

/// `image_file` is the card image's name inside `images/`, if it has one.
pub fn card_fields(card: &Card, image_file: Option<&str>) -> Vec<String> {
    vec![
        card.id.to_string(),
        card.title.clone(),
        opt(&card.description),
        image_file.unwrap_or_default().to_string(),
    ]
}

pub fn tab_fields(tab: &Tab) -> Vec<String> {
    vec![tab.id.to_string(), tab.name.clone(), tab.order.to_string()]
}

pub fn placement_fields(placement: &Placement) -> Vec<String> {
    vec![
        placement.id.to_string(),
        placement.tab_id.to_string(),
        placement.card_id.to_string(),
        placement.x.to_string(),
        placement.y.to_string(),
        opt_id(placement.group_id),
    ]
}

pub fn group_fields(group: &Group) -> Vec<String> {
    vec![
        group.id.to_string(),
        group.tab_id.to_string(),
        group.label.clone(),
        group.x.to_string(),
        group.y.to_string(),
        group.width.to_string(),
        group.height.to_string(),
    ]
}

pub fn connection_fields(conn: &Connection) -> Vec<String> {
    vec![
        conn.tab_id.to_string(),
        conn.from_type.to_string(),
        conn.from_id.to_string(),
        conn.to_type.to_string(),
        conn.to_id.to_string(),
        opt(&conn.label),
        conn.color.to_string(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layouts_write_every_required_column() {
        for layout in LAYOUTS {
            for column in layout.required {
                assert!(layout.headers.contains(column), "{} lacks {}", layout.file, column);
            }
        }
    }

    #[test]
    fn test_whole_numbers_have_no_fraction() {
        let p = Placement::new(uuid::Uuid::new_v4(), uuid::Uuid::new_v4(), 120.0, -35.5);
        let fields = placement_fields(&p);
        assert_eq!(fields[3], "120");
        assert_eq!(fields[4], "-35.5");
        assert_eq!(fields[5], "");
    }
}
