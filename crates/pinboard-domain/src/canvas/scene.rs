//! In-memory scene graph for the current tab.
//!
//! The scene is the source of truth for element geometry while the tab is
//! on screen. Gestures move nodes here live; rows are only written when a
//! gesture commits. Renderers project these nodes and never read geometry
//! back from what they drew.
//!
//! Render order is groups below cards, and within each layer later nodes
//! are drawn on top.

use std::collections::HashMap;

use pinboard_core::{PinboardResult, Point, Rect};
use serde::Serialize;

use super::path::ConnectionPath;
use crate::{
    repository::Repositories, Card, CardId, Connection, ConnectionColor, ConnectionId, Endpoint,
    EndpointKind, Group, GroupId, Placement, PlacementId, TabId,
};

pub const CARD_WIDTH: f64 = 220.0;
/// Height assumed until the renderer reports a measured one.
pub const DEFAULT_CARD_HEIGHT: f64 = 80.0;
/// How close (canvas units) a point must be to a curve to hit it.
pub const CONNECTION_HIT_TOLERANCE: f64 = 6.0;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CardNode {
    pub placement_id: PlacementId,
    pub card_id: CardId,
    pub title: String,
    pub description: Option<String>,
    pub image_hash: Option<String>,
    pub group_id: Option<GroupId>,
    pub rect: Rect,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupNode {
    pub group_id: GroupId,
    pub label: String,
    pub rect: Rect,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConnectionNode {
    pub connection_id: ConnectionId,
    pub from: Endpoint,
    pub to: Endpoint,
    pub label: Option<String>,
    pub color: ConnectionColor,
    /// `None` while an endpoint is missing from the scene.
    pub path: Option<ConnectionPath>,
}

/// A renderable element and its bounds, for exporters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", content = "id", rename_all = "lowercase")]
pub enum ElementRef {
    Card(PlacementId),
    Group(GroupId),
    Connection(ConnectionId),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Scene {
    pub tab_id: Option<TabId>,
    pub groups: Vec<GroupNode>,
    pub cards: Vec<CardNode>,
    pub connections: Vec<ConnectionNode>,
}

impl Scene {
    /// Assemble the scene for one tab from its rows. Placements whose card
    /// is missing are left out.
    pub fn build(
        tab_id: TabId,
        placements: &[Placement],
        cards: &HashMap<CardId, Card>,
        groups: &[Group],
        connections: &[Connection],
        card_heights: &HashMap<PlacementId, f64>,
    ) -> Self {
        let groups = groups
            .iter()
            .map(|g| GroupNode {
                group_id: g.id,
                label: g.label.clone(),
                rect: g.bounds(),
            })
            .collect();

        let cards = placements
            .iter()
            .filter_map(|p| {
                let card = cards.get(&p.card_id)?;
                let height = card_heights
                    .get(&p.id)
                    .copied()
                    .unwrap_or(DEFAULT_CARD_HEIGHT);
                Some(CardNode {
                    placement_id: p.id,
                    card_id: card.id,
                    title: card.title.clone(),
                    description: card.description.clone(),
                    image_hash: card.image_filename.clone(),
                    group_id: p.group_id,
                    rect: Rect::new(p.x, p.y, CARD_WIDTH, height),
                })
            })
            .collect();

        let connections = connections
            .iter()
            .map(|c| ConnectionNode {
                connection_id: c.id,
                from: c.from(),
                to: c.to(),
                label: c.label.clone(),
                color: c.color,
                path: None,
            })
            .collect();

        let mut scene = Scene {
            tab_id: Some(tab_id),
            groups,
            cards,
            connections,
        };
        scene.refresh_all_paths();
        scene
    }

    /// Load the scene for `tab_id` from the repositories.
    pub async fn load(
        repos: &Repositories,
        tab_id: TabId,
        card_heights: &HashMap<PlacementId, f64>,
    ) -> PinboardResult<Self> {
        let placements = repos.placements.by_tab(tab_id).await?;
        let mut cards = HashMap::new();
        for placement in &placements {
            if cards.contains_key(&placement.card_id) {
                continue;
            }
            if let Some(card) = repos.cards.get(placement.card_id).await? {
                cards.insert(card.id, card);
            }
        }
        let groups = repos.groups.by_tab(tab_id).await?;
        let connections = repos.connections.by_tab(tab_id).await?;
        Ok(Self::build(
            tab_id,
            &placements,
            &cards,
            &groups,
            &connections,
            card_heights,
        ))
    }

    pub fn card(&self, placement_id: PlacementId) -> Option<&CardNode> {
        self.cards.iter().find(|c| c.placement_id == placement_id)
    }

    pub fn group(&self, group_id: GroupId) -> Option<&GroupNode> {
        self.groups.iter().find(|g| g.group_id == group_id)
    }

    pub fn connection(&self, connection_id: ConnectionId) -> Option<&ConnectionNode> {
        self.connections
            .iter()
            .find(|c| c.connection_id == connection_id)
    }

    pub fn rect_of(&self, endpoint: Endpoint) -> Option<Rect> {
        match endpoint.kind {
            EndpointKind::Card => self.card(endpoint.id).map(|c| c.rect),
            EndpointKind::Group => self.group(endpoint.id).map(|g| g.rect),
        }
    }

    /// Move a card node and re-route its connections.
    pub fn move_card(&mut self, placement_id: PlacementId, position: Point) {
        if let Some(card) = self.cards.iter_mut().find(|c| c.placement_id == placement_id) {
            card.rect = card.rect.with_origin(position);
            self.refresh_paths_for(Endpoint::card(placement_id));
        }
    }

    pub fn set_group_rect(&mut self, group_id: GroupId, rect: Rect) {
        if let Some(group) = self.groups.iter_mut().find(|g| g.group_id == group_id) {
            group.rect = rect;
            self.refresh_paths_for(Endpoint::group(group_id));
        }
    }

    /// Record the rendered height of a card.
    pub fn set_card_height(&mut self, placement_id: PlacementId, height: f64) {
        if let Some(card) = self.cards.iter_mut().find(|c| c.placement_id == placement_id) {
            card.rect.height = height;
            self.refresh_paths_for(Endpoint::card(placement_id));
        }
    }

    pub fn set_card_group(&mut self, placement_id: PlacementId, group_id: Option<GroupId>) {
        if let Some(card) = self.cards.iter_mut().find(|c| c.placement_id == placement_id) {
            card.group_id = group_id;
        }
    }

    pub fn refresh_all_paths(&mut self) {
        let paths: Vec<Option<ConnectionPath>> = self
            .connections
            .iter()
            .map(|c| self.path_between(c.from, c.to))
            .collect();
        for (conn, path) in self.connections.iter_mut().zip(paths) {
            conn.path = path;
        }
    }

    fn refresh_paths_for(&mut self, endpoint: Endpoint) {
        let updates: Vec<(usize, Option<ConnectionPath>)> = self
            .connections
            .iter()
            .enumerate()
            .filter(|(_, c)| c.from == endpoint || c.to == endpoint)
            .map(|(i, c)| (i, self.path_between(c.from, c.to)))
            .collect();
        for (index, path) in updates {
            self.connections[index].path = path;
        }
    }

    fn path_between(&self, from: Endpoint, to: Endpoint) -> Option<ConnectionPath> {
        Some(ConnectionPath::linking(&self.rect_of(from)?, &self.rect_of(to)?))
    }

    /// Bounds of every renderable element in render order.
    pub fn element_bounds(&self) -> Vec<(ElementRef, Rect)> {
        let groups = self
            .groups
            .iter()
            .map(|g| (ElementRef::Group(g.group_id), g.rect));
        let cards = self
            .cards
            .iter()
            .map(|c| (ElementRef::Card(c.placement_id), c.rect));
        let connections = self.connections.iter().filter_map(|c| {
            c.path
                .map(|p| (ElementRef::Connection(c.connection_id), p.bounds()))
        });
        groups.chain(cards).chain(connections).collect()
    }

    /// Card and group rectangles, the input to "fit all".
    pub fn content_rects(&self) -> Vec<Rect> {
        self.groups
            .iter()
            .map(|g| g.rect)
            .chain(self.cards.iter().map(|c| c.rect))
            .collect()
    }

    /// Topmost group whose rectangle contains `point`.
    pub fn group_containing(&self, point: Point) -> Option<GroupId> {
        self.groups
            .iter()
            .rev()
            .find(|g| g.rect.contains(point))
            .map(|g| g.group_id)
    }

    /// Placements recorded as members of `group_id`, with their positions.
    pub fn members_of(&self, group_id: GroupId) -> Vec<(PlacementId, Point)> {
        self.cards
            .iter()
            .filter(|c| c.group_id == Some(group_id))
            .map(|c| (c.placement_id, c.rect.origin()))
            .collect()
    }

    /// Topmost card or group under `point`, or a connection curve near it.
    pub fn hit_test(&self, point: Point) -> Option<ElementRef> {
        if let Some(card) = self.cards.iter().rev().find(|c| c.rect.contains(point)) {
            return Some(ElementRef::Card(card.placement_id));
        }
        let near_curve = self.connections.iter().rev().find(|c| {
            c.path
                .is_some_and(|p| distance_to_curve(&p, point) <= CONNECTION_HIT_TOLERANCE)
        });
        if let Some(conn) = near_curve {
            return Some(ElementRef::Connection(conn.connection_id));
        }
        self.groups
            .iter()
            .rev()
            .find(|g| g.rect.contains(point))
            .map(|g| ElementRef::Group(g.group_id))
    }

    /// Nearest card or group within `radius` of `point`, measured to the
    /// rectangle (0 inside). `exclude` is never returned. Ties go to the
    /// topmost element, cards before groups.
    pub fn nearest_element(&self, point: Point, radius: f64, exclude: Endpoint) -> Option<Endpoint> {
        let cards = self
            .cards
            .iter()
            .rev()
            .map(|c| (Endpoint::card(c.placement_id), c.rect));
        let groups = self
            .groups
            .iter()
            .rev()
            .map(|g| (Endpoint::group(g.group_id), g.rect));

        let mut best: Option<(Endpoint, f64)> = None;
        for (endpoint, rect) in cards.chain(groups) {
            if endpoint == exclude {
                continue;
            }
            let distance = rect.distance_to_point(point);
            if distance > radius {
                continue;
            }
            if best.map_or(true, |(_, d)| distance < d) {
                best = Some((endpoint, distance));
            }
        }
        best.map(|(endpoint, _)| endpoint)
    }
}

fn distance_to_curve(path: &ConnectionPath, point: Point) -> f64 {
    const SAMPLES: usize = 32;
    (0..=SAMPLES)
        .map(|i| path.point_at(i as f64 / SAMPLES as f64).distance_to(point))
        .fold(f64::INFINITY, f64::min)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Board;
    use uuid::Uuid;

    struct Fixture {
        scene: Scene,
        group: Group,
        inside: Placement,
        outside: Placement,
        conn: Connection,
    }

    fn fixture() -> Fixture {
        let board = Board::new("B".into());
        let tab_id = Uuid::new_v4();
        let card_a = Card::new(board.id, "A".into());
        let card_b = Card::new(board.id, "B".into());
        let group = Group::new(tab_id, "G".into(), Rect::new(0.0, 0.0, 300.0, 200.0));
        let mut inside = Placement::new(tab_id, card_a.id, 50.0, 50.0);
        inside.group_id = Some(group.id);
        let outside = Placement::new(tab_id, card_b.id, 600.0, 50.0);
        let conn = Connection::new(tab_id, Endpoint::card(inside.id), Endpoint::card(outside.id)).unwrap();

        let cards = HashMap::from([(card_a.id, card_a), (card_b.id, card_b)]);
        let scene = Scene::build(
            tab_id,
            &[inside.clone(), outside.clone()],
            &cards,
            std::slice::from_ref(&group),
            std::slice::from_ref(&conn),
            &HashMap::new(),
        );
        Fixture {
            scene,
            group,
            inside,
            outside,
            conn,
        }
    }

    #[test]
    fn test_build_uses_default_card_size() {
        let f = fixture();
        let node = f.scene.card(f.inside.id).unwrap();
        assert_eq!(node.rect, Rect::new(50.0, 50.0, CARD_WIDTH, DEFAULT_CARD_HEIGHT));
        assert!(f.scene.connection(f.conn.id).unwrap().path.is_some());
    }

    #[test]
    fn test_moving_card_reroutes_connection() {
        let mut f = fixture();
        let before = f.scene.connection(f.conn.id).unwrap().path.unwrap();
        f.scene.move_card(f.outside.id, Point::new(600.0, 500.0));
        let after = f.scene.connection(f.conn.id).unwrap().path.unwrap();
        assert_ne!(before.end, after.end);
        let rect = f.scene.card(f.outside.id).unwrap().rect;
        assert_eq!(after.end, rect.border_point_toward(f.scene.card(f.inside.id).unwrap().rect.center()));
    }

    #[test]
    fn test_group_containing_and_members() {
        let f = fixture();
        assert_eq!(f.scene.group_containing(Point::new(160.0, 90.0)), Some(f.group.id));
        assert_eq!(f.scene.group_containing(Point::new(710.0, 90.0)), None);
        assert_eq!(
            f.scene.members_of(f.group.id),
            vec![(f.inside.id, Point::new(50.0, 50.0))]
        );
    }

    #[test]
    fn test_nearest_element_prefers_cards_and_excludes_source() {
        let f = fixture();
        // Inside both the group and the inside card: the card wins.
        let hit = f
            .scene
            .nearest_element(Point::new(60.0, 60.0), 40.0, Endpoint::card(f.outside.id));
        assert_eq!(hit, Some(Endpoint::card(f.inside.id)));

        // Excluding the card falls back to the group.
        let hit = f
            .scene
            .nearest_element(Point::new(60.0, 60.0), 40.0, Endpoint::card(f.inside.id));
        assert_eq!(hit, Some(Endpoint::group(f.group.id)));

        // 30 units right of the outside card is within the radius; 50 is not.
        let near = Point::new(600.0 + CARD_WIDTH + 30.0, 60.0);
        let far = Point::new(600.0 + CARD_WIDTH + 50.0, 60.0);
        let source = Endpoint::group(f.group.id);
        assert_eq!(f.scene.nearest_element(near, 40.0, source), Some(Endpoint::card(f.outside.id)));
        assert_eq!(f.scene.nearest_element(far, 40.0, source), None);
    }

    #[test]
    fn test_element_bounds_cover_every_node() {
        let f = fixture();
        let bounds = f.scene.element_bounds();
        assert_eq!(bounds.len(), 4);
        assert_eq!(bounds[0], (ElementRef::Group(f.group.id), f.group.bounds()));
        assert_eq!(f.scene.content_rects().len(), 3);
    }

    #[test]
    fn test_hit_test_order() {
        let f = fixture();
        assert_eq!(
            f.scene.hit_test(Point::new(60.0, 60.0)),
            Some(ElementRef::Card(f.inside.id))
        );
        assert_eq!(
            f.scene.hit_test(Point::new(20.0, 190.0)),
            Some(ElementRef::Group(f.group.id))
        );
        assert_eq!(f.scene.hit_test(Point::new(2000.0, 2000.0)), None);
    }

    #[test]
    fn test_missing_card_is_skipped() {
        let tab_id = Uuid::new_v4();
        let orphan = Placement::new(tab_id, Uuid::new_v4(), 0.0, 0.0);
        let scene = Scene::build(tab_id, &[orphan], &HashMap::new(), &[], &[], &HashMap::new());
        assert!(scene.cards.is_empty());
    }
}
