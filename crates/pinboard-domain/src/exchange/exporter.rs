//! Board export.
//!
//! Converts a board snapshot into the exchange files. Writing them anywhere
//! is the caller's business.

use std::collections::{BTreeMap, HashMap, HashSet};

use chrono::NaiveDate;
use pinboard_core::PinboardResult;

use super::csv::to_csv;
use super::models::{
    card_fields, connection_fields, group_fields, placement_fields, tab_fields, CARDS,
    CONNECTIONS, GROUPS, PLACEMENTS, TABS,
};
use crate::{repository::Repositories, snapshot::BoardSnapshot, BoardId, Image, ImageHash};

/// Exchange files in memory. Image keys are file names inside `images/`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExportBundle {
    pub name: String,
    pub files: BTreeMap<String, String>,
    pub images: BTreeMap<String, Vec<u8>>,
}

pub struct BoardExporter;

impl BoardExporter {
    /// Export a stored board. `None` when the board does not exist.
    pub async fn export_board(
        repos: &Repositories,
        board_id: BoardId,
        date: NaiveDate,
    ) -> PinboardResult<Option<ExportBundle>> {
        let Some(snapshot) = BoardSnapshot::capture(repos, board_id).await? else {
            return Ok(None);
        };

        let mut images = Vec::new();
        let mut seen = HashSet::new();
        for hash in snapshot.cards.iter().filter_map(|c| c.image_filename.as_ref()) {
            if !seen.insert(hash.clone()) {
                continue;
            }
            match repos.images.get(hash).await? {
                Some(image) => images.push(image),
                None => tracing::warn!(%hash, "card image missing from store, not exported"),
            }
        }

        let bundle = Self::export_snapshot(&snapshot, &images, date)?;
        tracing::info!(
            %board_id,
            files = bundle.files.len(),
            images = bundle.images.len(),
            "exported board"
        );
        Ok(Some(bundle))
    }

    /// Build the exchange files for `snapshot`. Cards whose image is not
    /// among `images` are exported without one.
    pub fn export_snapshot(
        snapshot: &BoardSnapshot,
        images: &[Image],
        date: NaiveDate,
    ) -> PinboardResult<ExportBundle> {
        let names = image_file_names(images);

        let cards = snapshot.cards.iter().map(|card| {
            let file = card
                .image_filename
                .as_ref()
                .and_then(|hash| names.get(hash))
                .map(String::as_str);
            card_fields(card, file)
        });
        let tabs = snapshot.tabs.iter().map(|t| tab_fields(&t.tab));
        let placements = snapshot
            .tabs
            .iter()
            .flat_map(|t| t.placements.iter().map(placement_fields));
        let groups = snapshot
            .tabs
            .iter()
            .flat_map(|t| t.groups.iter().map(group_fields));
        let connections = snapshot
            .tabs
            .iter()
            .flat_map(|t| t.connections.iter().map(connection_fields));

        let mut files = BTreeMap::new();
        files.insert(CARDS.file.to_string(), to_csv(CARDS.headers, cards)?);
        files.insert(TABS.file.to_string(), to_csv(TABS.headers, tabs)?);
        files.insert(PLACEMENTS.file.to_string(), to_csv(PLACEMENTS.headers, placements)?);
        files.insert(GROUPS.file.to_string(), to_csv(GROUPS.headers, groups)?);
        files.insert(CONNECTIONS.file.to_string(), to_csv(CONNECTIONS.headers, connections)?);

        let images = images
            .iter()
            .filter_map(|image| Some((names.get(&image.hash)?.clone(), image.data.clone())))
            .collect();

        Ok(ExportBundle {
            name: export_name(&snapshot.board.name, date),
            files,
            images,
        })
    }
}

/// File name for each image inside `images/`: the sanitized original name
/// when no other exported image shares it, otherwise a hash prefix plus the
/// extension.
fn image_file_names(images: &[Image]) -> HashMap<ImageHash, String> {
    let mut counts: HashMap<String, usize> = HashMap::new();
    for image in images {
        if let Some(name) = original_name(image) {
            *counts.entry(name).or_default() += 1;
        }
    }
    images
        .iter()
        .map(|image| {
            let name = original_name(image)
                .filter(|name| counts.get(name) == Some(&1))
                .unwrap_or_else(|| format!("{}.{}", &image.hash[..12.min(image.hash.len())], image.extension()));
            (image.hash.clone(), name)
        })
        .collect()
}

fn original_name(image: &Image) -> Option<String> {
    let trimmed = image.original_filename.trim();
    if trimmed.is_empty() {
        return None;
    }
    Some(sanitize_filename(trimmed))
}

/// Replace characters that are unsafe in file names with `_`.
/// An empty result becomes "export".
pub fn sanitize_filename(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| match c {
            '<' | '>' | ':' | '"' | '/' | '\\' | '|' | '?' | '*' => '_',
            c => c,
        })
        .collect();
    let cleaned = cleaned.trim();
    if cleaned.is_empty() {
        "export".to_string()
    } else {
        cleaned.to_string()
    }
}

/// "`<sanitized board name>`_YYYY-MM-DD".
pub fn export_name(board_name: &str, date: NaiveDate) -> String {
    format!("{}_{}", sanitize_filename(board_name), date.format("%Y-%m-%d"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exchange::csv::parse_csv;
    use crate::snapshot::TabSnapshot;
    use crate::{Board, Card, Connection, Endpoint, Group, Placement, Tab};
    use pinboard_core::Rect;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 9).unwrap()
    }

    #[test]
    fn test_sanitize_filename() {
        assert_eq!(sanitize_filename("a/b:c?"), "a_b_c_");
        assert_eq!(sanitize_filename("   "), "export");
        assert_eq!(export_name("Trip: Rome", date()), "Trip_ Rome_2024-03-09");
    }

    #[test]
    fn test_colliding_image_names_fall_back_to_hash() {
        let a = Image::new(vec![1], "image/png".into(), "photo.png".into());
        let b = Image::new(vec![2], "image/png".into(), "photo.png".into());
        let c = Image::new(vec![3], "image/jpeg".into(), "cat.jpg".into());
        let d = Image::new(vec![4], "image/gif".into(), "".into());
        let names = image_file_names(&[a.clone(), b.clone(), c.clone(), d.clone()]);
        assert_eq!(names[&a.hash], format!("{}.png", &a.hash[..12]));
        assert_ne!(names[&a.hash], names[&b.hash]);
        assert_eq!(names[&c.hash], "cat.jpg");
        assert_eq!(names[&d.hash], format!("{}.gif", &d.hash[..12]));
    }

    #[test]
    fn test_export_snapshot_files() {
        let board = Board::new("Trip".into());
        let image = Image::new(vec![9, 9], "image/png".into(), "map.png".into());
        let mut card = Card::new(board.id, "Rome, Italy".into());
        card.image_filename = Some(image.hash.clone());
        let other = Card::new(board.id, "Paris".into());
        let tab = Tab::new(board.id, "Tab 1".into(), 0);
        let group = Group::new(tab.id, "Day 1".into(), Rect::new(0.0, 0.0, 300.0, 200.0));
        let a = Placement::new(tab.id, card.id, 10.0, 20.0);
        let b = Placement::new(tab.id, other.id, 400.0, 20.0);
        let conn = Connection::new(tab.id, Endpoint::card(a.id), Endpoint::group(group.id)).unwrap();

        let snapshot = BoardSnapshot {
            board,
            cards: vec![card, other],
            tabs: vec![TabSnapshot {
                tab,
                groups: vec![group],
                placements: vec![a, b],
                connections: vec![conn],
            }],
        };
        let bundle = BoardExporter::export_snapshot(&snapshot, &[image], date()).unwrap();

        assert_eq!(bundle.name, "Trip_2024-03-09");
        assert_eq!(bundle.files.len(), 5);
        assert_eq!(bundle.images.get("map.png"), Some(&vec![9, 9]));

        let cards = parse_csv(&bundle.files["cards.csv"]).unwrap();
        assert_eq!(cards.field(0, "title"), "Rome, Italy");
        assert_eq!(cards.field(0, "image_filename"), "map.png");

        let placements = parse_csv(&bundle.files["placements.csv"]).unwrap();
        assert_eq!(placements.rows.len(), 2);

        let connections = parse_csv(&bundle.files["connections.csv"]).unwrap();
        assert_eq!(connections.field(0, "to_type"), "group");
        assert_eq!(connections.field(0, "color"), "red");
    }
}
