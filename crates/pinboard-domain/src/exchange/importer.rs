//! Board import.
//!
//! Two phases. [`BoardImporter::validate`] checks every file against every
//! other without touching the store and fails on the first violation with
//! its file and line. Only a fully valid bundle is committed, under fresh
//! ids, as a new board.

use std::collections::{HashMap, HashSet};

use chrono::NaiveDate;
use pinboard_core::{PinboardError, PinboardResult};
use uuid::Uuid;

use super::csv::{error_line, parse_csv, CsvTable};
use super::models::{CsvLayout, CARDS, CONNECTIONS, CSV_FILES, GROUPS, PLACEMENTS, TABS};
use crate::{
    board_lifecycle::{discard_board, write_board},
    image::content_type_for_extension,
    repository::Repositories,
    snapshot::{BoardSnapshot, TabSnapshot},
    Board, Card, Connection, ConnectionColor, EndpointKind, Group, Placement, Tab,
};

pub const FALLBACK_BOARD_NAME: &str = "Imported Board";

/// Exchange files in memory, as read from a directory or archive.
#[derive(Debug, Clone, Default)]
pub struct ImportBundle {
    /// Name of the source (directory or archive) the board name derives from.
    pub name: String,
    /// CSV text keyed by file name.
    pub files: HashMap<String, String>,
    /// Image bytes keyed by file name inside `images/`.
    pub images: HashMap<String, Vec<u8>>,
}

/// Parsed tables that passed validation.
#[derive(Debug, Clone)]
pub struct ValidatedImport {
    pub cards: CsvTable,
    pub tabs: CsvTable,
    pub placements: CsvTable,
    pub groups: CsvTable,
    pub connections: CsvTable,
}

pub struct BoardImporter;

impl BoardImporter {
    /// Validate and commit `bundle` as a new board.
    pub async fn import(
        repos: &Repositories,
        bundle: &ImportBundle,
        today: NaiveDate,
    ) -> PinboardResult<Board> {
        let tables = Self::validate(bundle)?;

        let existing: HashSet<String> = repos
            .boards
            .all()
            .await?
            .into_iter()
            .map(|b| b.name)
            .collect();
        let mut name = board_name_from_source(&bundle.name);
        if existing.contains(&name) {
            name = format!("{} (imported {})", name, today.format("%Y-%m-%d"));
        }

        let mut image_hashes = HashMap::new();
        for index in 0..tables.cards.rows.len() {
            let file = tables.cards.field(index, "image_filename");
            if file.is_empty() || image_hashes.contains_key(file) {
                continue;
            }
            let Some(bytes) = bundle.images.get(file) else {
                continue;
            };
            let ext = file.rsplit_once('.').map(|(_, e)| e).unwrap_or_default();
            let hash = repos
                .images
                .save(bytes.clone(), content_type_for_extension(ext), file)
                .await?;
            image_hashes.insert(file.to_string(), hash);
        }

        let snapshot = build_board(&tables, Board::new(name), &image_hashes);
        if let Err(err) = write_board(repos, &snapshot).await {
            discard_board(repos, &snapshot).await;
            return Err(err);
        }
        tracing::info!(
            board_id = %snapshot.board.id,
            name = %snapshot.board.name,
            cards = snapshot.cards.len(),
            tabs = snapshot.tabs.len(),
            "imported board"
        );
        Ok(snapshot.board)
    }

    /// Check every file without writing anything.
    pub fn validate(bundle: &ImportBundle) -> PinboardResult<ValidatedImport> {
        let mut parsed = HashMap::new();
        for name in CSV_FILES {
            let text = bundle.files.get(name).ok_or_else(|| {
                PinboardError::import(name, 0, format!("Required file \"{}\" is missing", name))
            })?;
            let table = parse_csv(text)
                .map_err(|err| PinboardError::import(name, error_line(&err), err.to_string()))?;
            parsed.insert(name, table);
        }
        let mut take = |layout: &CsvLayout| -> PinboardResult<CsvTable> {
            let table = parsed.remove(layout.file).unwrap_or_default();
            require_headers(&table, layout)?;
            Ok(table)
        };
        let tables = ValidatedImport {
            cards: take(&CARDS)?,
            tabs: take(&TABS)?,
            placements: take(&PLACEMENTS)?,
            groups: take(&GROUPS)?,
            connections: take(&CONNECTIONS)?,
        };

        let cards = validate_cards(&tables.cards, bundle)?;
        let tabs = validate_tabs(&tables.tabs)?;
        let groups = validate_groups(&tables.groups, &tabs)?;
        let placements = validate_placements(&tables.placements, &tabs, &cards, &groups)?;
        validate_connections(&tables.connections, &tabs, &placements, &groups)?;

        Ok(tables)
    }
}

/// Board name for an import source: the source name without a trailing
/// `.zip` and export date suffix.
pub fn board_name_from_source(source: &str) -> String {
    let name = source.trim();
    let name = match name.len().checked_sub(4) {
        Some(cut) if name.is_char_boundary(cut) && name[cut..].eq_ignore_ascii_case(".zip") => {
            &name[..cut]
        }
        _ => name,
    };
    let name = strip_date_suffix(name);
    if name.is_empty() {
        FALLBACK_BOARD_NAME.to_string()
    } else {
        name.to_string()
    }
}

fn strip_date_suffix(name: &str) -> &str {
    let Some(cut) = name.len().checked_sub(11) else {
        return name;
    };
    if !name.is_char_boundary(cut) {
        return name;
    }
    let suffix = name[cut..].as_bytes();
    let shape_ok = suffix[0] == b'_'
        && suffix[5] == b'-'
        && suffix[8] == b'-'
        && suffix
            .iter()
            .enumerate()
            .all(|(i, b)| matches!(i, 0 | 5 | 8) || b.is_ascii_digit());
    if shape_ok {
        &name[..cut]
    } else {
        name
    }
}

fn line(index: usize) -> usize {
    index + 2
}

fn require_headers(table: &CsvTable, layout: &CsvLayout) -> PinboardResult<()> {
    for header in layout.required {
        if !table.has_header(header) {
            return Err(PinboardError::import(
                layout.file,
                0,
                format!("Missing required column \"{}\"", header),
            ));
        }
    }
    Ok(())
}

fn require_field<'a>(
    table: &'a CsvTable,
    file: &str,
    index: usize,
    field: &str,
) -> PinboardResult<&'a str> {
    let value = table.field(index, field);
    if value.is_empty() {
        return Err(PinboardError::import(
            file,
            line(index),
            format!("Missing required field \"{}\"", field),
        ));
    }
    Ok(value)
}

fn require_number(table: &CsvTable, file: &str, index: usize, field: &str) -> PinboardResult<f64> {
    let value = table.field(index, field);
    parse_number(value).ok_or_else(|| {
        PinboardError::import(
            file,
            line(index),
            format!("Field \"{}\" must be numeric, got \"{}\"", field, value),
        )
    })
}

fn parse_number(value: &str) -> Option<f64> {
    value.trim().parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Unique ids of a file, or the line of the first repeat.
fn claim_id(seen: &mut HashSet<String>, id: &str, file: &str, index: usize) -> PinboardResult<()> {
    if !seen.insert(id.to_string()) {
        return Err(PinboardError::import(
            file,
            line(index),
            format!("Duplicate id \"{}\"", id),
        ));
    }
    Ok(())
}

fn validate_cards(table: &CsvTable, bundle: &ImportBundle) -> PinboardResult<HashSet<String>> {
    let file = CARDS.file;
    let mut ids = HashSet::new();
    for index in 0..table.rows.len() {
        let id = require_field(table, file, index, "id")?;
        require_field(table, file, index, "title")?;
        claim_id(&mut ids, id, file, index)?;
    }
    // Image references are checked once every row is known to be well formed.
    for index in 0..table.rows.len() {
        let image = table.field(index, "image_filename");
        if !image.is_empty() && !bundle.images.contains_key(image) {
            return Err(PinboardError::import(
                file,
                line(index),
                format!("image_filename \"{}\" not found in images/ folder", image),
            ));
        }
    }
    Ok(ids)
}

fn validate_tabs(table: &CsvTable) -> PinboardResult<HashSet<String>> {
    let file = TABS.file;
    if table.rows.is_empty() {
        return Err(PinboardError::import(file, 0, "At least one tab is required"));
    }
    let mut ids = HashSet::new();
    for index in 0..table.rows.len() {
        let id = require_field(table, file, index, "id")?;
        require_field(table, file, index, "name")?;
        require_field(table, file, index, "order")?;
        require_number(table, file, index, "order")?;
        claim_id(&mut ids, id, file, index)?;
    }
    Ok(ids)
}

/// Group id to its tab id.
fn validate_groups(table: &CsvTable, tabs: &HashSet<String>) -> PinboardResult<HashMap<String, String>> {
    let file = GROUPS.file;
    let mut groups = HashMap::new();
    let mut ids = HashSet::new();
    for index in 0..table.rows.len() {
        let id = require_field(table, file, index, "id")?;
        let tab_id = require_field(table, file, index, "tab_id")?;
        require_field(table, file, index, "label")?;
        for field in ["x", "y"] {
            require_number(table, file, index, field)?;
        }
        for field in ["width", "height"] {
            let value = require_number(table, file, index, field)?;
            if value <= 0.0 {
                return Err(PinboardError::import(
                    file,
                    line(index),
                    format!("{} must be positive, got {}", field, value),
                ));
            }
        }
        if !tabs.contains(tab_id) {
            return Err(PinboardError::import(
                file,
                line(index),
                format!("tab_id \"{}\" does not exist in tabs.csv", tab_id),
            ));
        }
        claim_id(&mut ids, id, file, index)?;
        groups.insert(id.to_string(), tab_id.to_string());
    }
    Ok(groups)
}

/// Placement id to its tab id.
fn validate_placements(
    table: &CsvTable,
    tabs: &HashSet<String>,
    cards: &HashSet<String>,
    groups: &HashMap<String, String>,
) -> PinboardResult<HashMap<String, String>> {
    let file = PLACEMENTS.file;
    let mut placements = HashMap::new();
    let mut ids = HashSet::new();
    let mut placed = HashSet::new();
    for index in 0..table.rows.len() {
        let id = require_field(table, file, index, "id")?;
        let tab_id = require_field(table, file, index, "tab_id")?;
        let card_id = require_field(table, file, index, "card_id")?;
        require_number(table, file, index, "x")?;
        require_number(table, file, index, "y")?;

        let fail = |message: String| Err(PinboardError::import(file, line(index), message));
        if !tabs.contains(tab_id) {
            return fail(format!("tab_id \"{}\" does not exist in tabs.csv", tab_id));
        }
        if !cards.contains(card_id) {
            return fail(format!("card_id \"{}\" does not exist in cards.csv", card_id));
        }
        let group_id = table.field(index, "group_id");
        if !group_id.is_empty() {
            match groups.get(group_id) {
                None => {
                    return fail(format!("group_id \"{}\" does not exist in groups.csv", group_id))
                }
                Some(group_tab) if group_tab != tab_id => {
                    return fail(format!("group_id \"{}\" belongs to a different tab", group_id))
                }
                Some(_) => {}
            }
        }
        if !placed.insert((tab_id, card_id)) {
            return fail(format!("card_id \"{}\" is placed twice on tab \"{}\"", card_id, tab_id));
        }
        claim_id(&mut ids, id, file, index)?;
        placements.insert(id.to_string(), tab_id.to_string());
    }
    Ok(placements)
}

fn validate_connections(
    table: &CsvTable,
    tabs: &HashSet<String>,
    placements: &HashMap<String, String>,
    groups: &HashMap<String, String>,
) -> PinboardResult<()> {
    let file = CONNECTIONS.file;
    for index in 0..table.rows.len() {
        let tab_id = require_field(table, file, index, "tab_id")?;
        let from_type = require_field(table, file, index, "from_type")?;
        let from_id = require_field(table, file, index, "from_id")?;
        let to_type = require_field(table, file, index, "to_type")?;
        let to_id = require_field(table, file, index, "to_id")?;
        let color = require_field(table, file, index, "color")?;

        let fail = |message: String| Err(PinboardError::import(file, line(index), message));
        if !tabs.contains(tab_id) {
            return fail(format!("tab_id \"{}\" does not exist in tabs.csv", tab_id));
        }

        let ends = [("from", from_type, from_id), ("to", to_type, to_id)];
        let mut kinds = Vec::with_capacity(2);
        for (end, kind, _) in ends {
            match kind.parse::<EndpointKind>() {
                Ok(kind) => kinds.push(kind),
                Err(_) => {
                    return fail(format!(
                        "{}_type must be \"card\" or \"group\", got \"{}\"",
                        end, kind
                    ))
                }
            }
        }
        for ((end, kind_str, id), kind) in ends.into_iter().zip(kinds) {
            let (rows, source) = match kind {
                EndpointKind::Card => (placements, "placements.csv"),
                EndpointKind::Group => (groups, "groups.csv"),
            };
            match rows.get(id) {
                None => {
                    return fail(format!(
                        "{}_id \"{}\" does not exist in {} ({}_type is \"{}\")",
                        end, id, source, end, kind_str
                    ))
                }
                Some(end_tab) if end_tab != tab_id => {
                    return fail(format!(
                        "{}_id \"{}\" is not on tab \"{}\"",
                        end, id, tab_id
                    ))
                }
                Some(_) => {}
            }
        }

        if from_type == to_type && from_id == to_id {
            return fail("Connection cannot have the same source and target".to_string());
        }
        if color.parse::<ConnectionColor>().is_err() {
            let allowed: Vec<&str> = ConnectionColor::ALL.iter().map(|c| c.as_str()).collect();
            return fail(format!(
                "Invalid color \"{}\". Must be one of: {}",
                color,
                allowed.join(", ")
            ));
        }
    }
    Ok(())
}

/// Rows of a validated bundle under `board`, with fresh ids. Tabs keep the
/// relative order of their `order` column and viewports start at the
/// identity.
fn build_board(
    tables: &ValidatedImport,
    board: Board,
    image_hashes: &HashMap<String, String>,
) -> BoardSnapshot {
    let fresh = |table: &CsvTable| -> HashMap<String, Uuid> {
        (0..table.rows.len())
            .map(|i| (table.field(i, "id").to_string(), Uuid::new_v4()))
            .collect()
    };
    let card_ids = fresh(&tables.cards);
    let tab_ids = fresh(&tables.tabs);
    let group_ids = fresh(&tables.groups);
    let placement_ids = fresh(&tables.placements);
    let num = |table: &CsvTable, index: usize, field: &str| {
        parse_number(table.field(index, field)).unwrap_or_default()
    };

    let cards = (0..tables.cards.rows.len())
        .map(|i| {
            let t = &tables.cards;
            let description = t.field(i, "description");
            Card {
                id: card_ids[t.field(i, "id")],
                board_id: board.id,
                title: t.field(i, "title").to_string(),
                description: (!description.is_empty()).then(|| description.to_string()),
                image_filename: image_hashes.get(t.field(i, "image_filename")).cloned(),
            }
        })
        .collect();

    let mut tab_rows: Vec<usize> = (0..tables.tabs.rows.len()).collect();
    tab_rows.sort_by(|a, b| {
        num(&tables.tabs, *a, "order").total_cmp(&num(&tables.tabs, *b, "order"))
    });

    let tabs = tab_rows
        .into_iter()
        .enumerate()
        .map(|(order, i)| {
            let source_id = tables.tabs.field(i, "id");
            let tab = Tab {
                id: tab_ids[source_id],
                ..Tab::new(board.id, tables.tabs.field(i, "name").to_string(), order as u32)
            };

            let t = &tables.groups;
            let groups = (0..t.rows.len())
                .filter(|&g| t.field(g, "tab_id") == source_id)
                .map(|g| Group {
                    id: group_ids[t.field(g, "id")],
                    tab_id: tab.id,
                    label: t.field(g, "label").to_string(),
                    x: num(t, g, "x"),
                    y: num(t, g, "y"),
                    width: num(t, g, "width"),
                    height: num(t, g, "height"),
                })
                .collect();

            let t = &tables.placements;
            let placements = (0..t.rows.len())
                .filter(|&p| t.field(p, "tab_id") == source_id)
                .map(|p| Placement {
                    id: placement_ids[t.field(p, "id")],
                    tab_id: tab.id,
                    card_id: card_ids[t.field(p, "card_id")],
                    x: num(t, p, "x"),
                    y: num(t, p, "y"),
                    group_id: group_ids.get(t.field(p, "group_id")).copied(),
                })
                .collect();

            let t = &tables.connections;
            let endpoint_id = |kind: &str, id: &str| -> Uuid {
                let ids = if kind == EndpointKind::Card.as_str() {
                    &placement_ids
                } else {
                    &group_ids
                };
                ids[id]
            };
            let connections = (0..t.rows.len())
                .filter(|&c| t.field(c, "tab_id") == source_id)
                .map(|c| {
                    let label = t.field(c, "label");
                    Connection {
                        id: Uuid::new_v4(),
                        tab_id: tab.id,
                        from_type: t.field(c, "from_type").parse().unwrap_or(EndpointKind::Card),
                        from_id: endpoint_id(t.field(c, "from_type"), t.field(c, "from_id")),
                        to_type: t.field(c, "to_type").parse().unwrap_or(EndpointKind::Card),
                        to_id: endpoint_id(t.field(c, "to_type"), t.field(c, "to_id")),
                        label: (!label.is_empty()).then(|| label.to_string()),
                        color: t.field(c, "color").parse().unwrap_or_default(),
                    }
                })
                .collect();

            TabSnapshot {
                tab,
                groups,
                placements,
                connections,
            }
        })
        .collect();

    BoardSnapshot { board, cards, tabs }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_bundle() -> ImportBundle {
        let mut files = HashMap::new();
        files.insert(
            "cards.csv".to_string(),
            "\u{feff}id,title,description,image_filename\r\nc1,Rome,\"Day, one\",rome.png\r\nc2,Paris,,\r\n".to_string(),
        );
        files.insert("tabs.csv".to_string(), "id,name,order\r\nt2,Second,5\r\nt1,First,1\r\n".to_string());
        files.insert(
            "placements.csv".to_string(),
            "id,tab_id,card_id,x,y,group_id\r\np1,t1,c1,10,20,g1\r\np2,t1,c2,400,20,\r\np3,t2,c1,0,0,\r\n".to_string(),
        );
        files.insert(
            "groups.csv".to_string(),
            "id,tab_id,label,x,y,width,height\r\ng1,t1,Italy,0,0,300,200\r\n".to_string(),
        );
        files.insert(
            "connections.csv".to_string(),
            "tab_id,from_type,from_id,to_type,to_id,label,color\r\nt1,card,p1,card,p2,next,blue\r\nt1,group,g1,card,p2,,red\r\n".to_string(),
        );
        let mut images = HashMap::new();
        images.insert("rome.png".to_string(), vec![1, 2, 3]);
        ImportBundle {
            name: "Trip_2024-03-09".to_string(),
            files,
            images,
        }
    }

    fn with_file(name: &str, text: &str) -> ImportBundle {
        let mut bundle = sample_bundle();
        bundle.files.insert(name.to_string(), text.to_string());
        bundle
    }

    fn import_error(bundle: &ImportBundle) -> (String, usize, String) {
        match BoardImporter::validate(bundle) {
            Err(PinboardError::Import { file, row, message }) => (file, row, message),
            other => panic!("expected an import error, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_sample_is_valid() {
        assert!(BoardImporter::validate(&sample_bundle()).is_ok());
    }

    #[test]
    fn test_missing_file() {
        let mut bundle = sample_bundle();
        bundle.files.remove("groups.csv");
        let (file, row, message) = import_error(&bundle);
        assert_eq!((file.as_str(), row), ("groups.csv", 0));
        assert_eq!(message, "Required file \"groups.csv\" is missing");
    }

    #[test]
    fn test_missing_column() {
        let (file, row, message) = import_error(&with_file("tabs.csv", "id,name\r\nt1,First\r\n"));
        assert_eq!((file.as_str(), row), ("tabs.csv", 0));
        assert_eq!(message, "Missing required column \"order\"");
    }

    #[test]
    fn test_non_numeric_field_reports_line() {
        let bundle = with_file(
            "groups.csv",
            "id,tab_id,label,x,y,width,height\r\ng1,t1,Italy,0,0,300,200\r\ng2,t1,Bad,0,zero,300,200\r\n",
        );
        let (file, row, message) = import_error(&bundle);
        assert_eq!((file.as_str(), row), ("groups.csv", 3));
        assert_eq!(message, "Field \"y\" must be numeric, got \"zero\"");
    }

    #[test]
    fn test_unknown_tab() {
        let bundle = with_file(
            "groups.csv",
            "id,tab_id,label,x,y,width,height\r\ng1,t9,Italy,0,0,300,200\r\n",
        );
        let (_, row, message) = import_error(&bundle);
        assert_eq!(row, 2);
        assert_eq!(message, "tab_id \"t9\" does not exist in tabs.csv");
    }

    #[test]
    fn test_group_without_area_rejected() {
        let bundle = with_file(
            "groups.csv",
            "id,tab_id,label,x,y,width,height\r\ng1,t1,Italy,0,0,300,200\r\ng2,t1,Flat,0,0,-50,200\r\n",
        );
        let (file, row, message) = import_error(&bundle);
        assert_eq!((file.as_str(), row), ("groups.csv", 3));
        assert_eq!(message, "width must be positive, got -50");

        let bundle = with_file(
            "groups.csv",
            "id,tab_id,label,x,y,width,height\r\ng1,t1,Italy,0,0,300,0\r\n",
        );
        let (_, row, message) = import_error(&bundle);
        assert_eq!(row, 2);
        assert_eq!(message, "height must be positive, got 0");
    }

    #[test]
    fn test_bad_endpoint_type() {
        let bundle = with_file(
            "connections.csv",
            "tab_id,from_type,from_id,to_type,to_id,label,color\r\nt1,note,p1,card,p2,,red\r\n",
        );
        let (_, _, message) = import_error(&bundle);
        assert_eq!(message, "from_type must be \"card\" or \"group\", got \"note\"");
    }

    #[test]
    fn test_self_connection_rejected() {
        let bundle = with_file(
            "connections.csv",
            "tab_id,from_type,from_id,to_type,to_id,label,color\r\nt1,card,p1,card,p1,,red\r\n",
        );
        let (_, _, message) = import_error(&bundle);
        assert_eq!(message, "Connection cannot have the same source and target");
    }

    #[test]
    fn test_cross_tab_connection_rejected() {
        let bundle = with_file(
            "connections.csv",
            "tab_id,from_type,from_id,to_type,to_id,label,color\r\nt1,card,p1,card,p3,,red\r\n",
        );
        let (_, _, message) = import_error(&bundle);
        assert_eq!(message, "to_id \"p3\" is not on tab \"t1\"");
    }

    #[test]
    fn test_invalid_color() {
        let bundle = with_file(
            "connections.csv",
            "tab_id,from_type,from_id,to_type,to_id,label,color\r\nt1,card,p1,card,p2,,teal\r\n",
        );
        let (_, _, message) = import_error(&bundle);
        assert_eq!(
            message,
            "Invalid color \"teal\". Must be one of: red, orange, yellow, green, blue, purple, pink, gray"
        );
    }

    #[test]
    fn test_missing_image_file() {
        let mut bundle = sample_bundle();
        bundle.images.clear();
        let (file, row, message) = import_error(&bundle);
        assert_eq!((file.as_str(), row), ("cards.csv", 2));
        assert_eq!(message, "image_filename \"rome.png\" not found in images/ folder");
    }

    #[test]
    fn test_empty_tabs_rejected() {
        let bundle = with_file("tabs.csv", "id,name,order\r\n");
        let (file, row, _) = import_error(&bundle);
        assert_eq!((file.as_str(), row), ("tabs.csv", 0));
    }

    #[test]
    fn test_board_name_from_source() {
        assert_eq!(board_name_from_source("Trip_2024-03-09"), "Trip");
        assert_eq!(board_name_from_source("Trip_2024-03-09.ZIP"), "Trip");
        assert_eq!(board_name_from_source("Trip_notes"), "Trip_notes");
        assert_eq!(board_name_from_source("_2024-03-09"), FALLBACK_BOARD_NAME);
        assert_eq!(board_name_from_source(""), FALLBACK_BOARD_NAME);
    }

    #[test]
    fn test_build_orders_tabs_densely_and_remaps() {
        let bundle = sample_bundle();
        let tables = BoardImporter::validate(&bundle).unwrap();
        let hashes = HashMap::from([("rome.png".to_string(), "abc".to_string())]);
        let snapshot = build_board(&tables, Board::new("Trip".into()), &hashes);

        let names: Vec<_> = snapshot.tabs.iter().map(|t| (t.tab.name.as_str(), t.tab.order)).collect();
        assert_eq!(names, vec![("First", 0), ("Second", 1)]);

        let first = &snapshot.tabs[0];
        assert_eq!(first.placements.len(), 2);
        assert_eq!(first.connections.len(), 2);
        assert_eq!(first.placements[0].group_id, Some(first.groups[0].id));
        let rome = snapshot.cards.iter().find(|c| c.title == "Rome").unwrap();
        assert_eq!(rome.image_filename.as_deref(), Some("abc"));
        assert_eq!(rome.description.as_deref(), Some("Day, one"));
        assert_eq!(first.tab.viewport_zoom, 1.0);

        let group_conn = first
            .connections
            .iter()
            .find(|c| c.from_type == EndpointKind::Group)
            .unwrap();
        assert_eq!(group_conn.from_id, first.groups[0].id);
        assert_eq!(group_conn.label, None);
    }
}
