use std::{fmt, str::FromStr};

use pinboard_core::{PinboardError, PinboardResult};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{field_update::FieldUpdate, tab::TabId};

pub type ConnectionId = Uuid;

/// What a connection endpoint points at. A `Card` endpoint carries a
/// placement id, never a card id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EndpointKind {
    Card,
    Group,
}

impl EndpointKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EndpointKind::Card => "card",
            EndpointKind::Group => "group",
        }
    }
}

impl fmt::Display for EndpointKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EndpointKind {
    type Err = PinboardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "card" => Ok(EndpointKind::Card),
            "group" => Ok(EndpointKind::Group),
            other => Err(PinboardError::Validation(format!(
                "invalid endpoint type '{}'",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Endpoint {
    pub kind: EndpointKind,
    pub id: Uuid,
}

impl Endpoint {
    pub fn card(placement_id: Uuid) -> Self {
        Self {
            kind: EndpointKind::Card,
            id: placement_id,
        }
    }

    pub fn group(group_id: Uuid) -> Self {
        Self {
            kind: EndpointKind::Group,
            id: group_id,
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.kind, self.id)
    }
}

/// Parses the `kind:id` form written by `Display`.
impl FromStr for Endpoint {
    type Err = PinboardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (kind, id) = s.split_once(':').ok_or_else(|| {
            PinboardError::Validation(format!("endpoint '{}' is not of the form kind:id", s))
        })?;
        let id = Uuid::parse_str(id)
            .map_err(|_| PinboardError::Validation(format!("invalid endpoint id '{}'", id)))?;
        Ok(Self {
            kind: kind.parse()?,
            id,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionColor {
    #[default]
    Red,
    Orange,
    Yellow,
    Green,
    Blue,
    Purple,
    Pink,
    Gray,
}

impl ConnectionColor {
    pub const ALL: [ConnectionColor; 8] = [
        ConnectionColor::Red,
        ConnectionColor::Orange,
        ConnectionColor::Yellow,
        ConnectionColor::Green,
        ConnectionColor::Blue,
        ConnectionColor::Purple,
        ConnectionColor::Pink,
        ConnectionColor::Gray,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ConnectionColor::Red => "red",
            ConnectionColor::Orange => "orange",
            ConnectionColor::Yellow => "yellow",
            ConnectionColor::Green => "green",
            ConnectionColor::Blue => "blue",
            ConnectionColor::Purple => "purple",
            ConnectionColor::Pink => "pink",
            ConnectionColor::Gray => "gray",
        }
    }

    /// Stroke colour used by renderers.
    pub fn hex(&self) -> &'static str {
        match self {
            ConnectionColor::Red => "#e11d48",
            ConnectionColor::Orange => "#ea580c",
            ConnectionColor::Yellow => "#ca8a04",
            ConnectionColor::Green => "#16a34a",
            ConnectionColor::Blue => "#2563eb",
            ConnectionColor::Purple => "#7c3aed",
            ConnectionColor::Pink => "#db2777",
            ConnectionColor::Gray => "#4b5563",
        }
    }
}

impl fmt::Display for ConnectionColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ConnectionColor {
    type Err = PinboardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ConnectionColor::ALL
            .iter()
            .copied()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| PinboardError::Validation(format!("invalid color '{}'", s)))
    }
}

/// Curved, optionally labelled link between two endpoints on the same tab.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Connection {
    pub id: ConnectionId,
    pub tab_id: TabId,
    pub from_type: EndpointKind,
    pub from_id: Uuid,
    pub to_type: EndpointKind,
    pub to_id: Uuid,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub color: ConnectionColor,
}

impl Connection {
    /// Builds a connection between two distinct endpoints.
    pub fn new(tab_id: TabId, from: Endpoint, to: Endpoint) -> PinboardResult<Self> {
        if from == to {
            return Err(PinboardError::Validation(
                "a connection cannot link an element to itself".to_string(),
            ));
        }
        Ok(Self {
            id: Uuid::new_v4(),
            tab_id,
            from_type: from.kind,
            from_id: from.id,
            to_type: to.kind,
            to_id: to.id,
            label: None,
            color: ConnectionColor::default(),
        })
    }

    pub fn with_label(mut self, label: Option<String>) -> Self {
        self.label = label;
        self
    }

    pub fn with_color(mut self, color: ConnectionColor) -> Self {
        self.color = color;
        self
    }

    pub fn from(&self) -> Endpoint {
        Endpoint {
            kind: self.from_type,
            id: self.from_id,
        }
    }

    pub fn to(&self) -> Endpoint {
        Endpoint {
            kind: self.to_type,
            id: self.to_id,
        }
    }

    pub fn touches(&self, endpoint: Endpoint) -> bool {
        self.from() == endpoint || self.to() == endpoint
    }

    pub fn is_self_loop(&self) -> bool {
        self.from() == self.to()
    }

    pub fn update(&mut self, updates: ConnectionUpdate) {
        updates.label.apply_to(&mut self.label);
        if let Some(color) = updates.color {
            self.color = color;
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConnectionUpdate {
    pub label: FieldUpdate<String>,
    pub color: Option<ConnectionColor>,
}

impl ConnectionUpdate {
    pub fn label(label: Option<String>) -> Self {
        Self {
            label: FieldUpdate::from(label),
            ..Default::default()
        }
    }

    pub fn color(color: ConnectionColor) -> Self {
        Self {
            color: Some(color),
            ..Default::default()
        }
    }

    pub fn inverse(&self, connection: &Connection) -> ConnectionUpdate {
        ConnectionUpdate {
            label: self.label.inverse(&connection.label),
            color: self.color.map(|_| connection.color),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_parses_its_display_form() {
        let endpoint = Endpoint::group(Uuid::new_v4());
        assert_eq!(endpoint.to_string().parse::<Endpoint>().unwrap(), endpoint);
        assert!("card".parse::<Endpoint>().is_err());
        assert!("tab:00000000-0000-0000-0000-000000000000".parse::<Endpoint>().is_err());
    }

    #[test]
    fn test_self_loop_rejected() {
        let placement = Uuid::new_v4();
        let result = Connection::new(
            Uuid::new_v4(),
            Endpoint::card(placement),
            Endpoint::card(placement),
        );
        assert!(matches!(result, Err(PinboardError::Validation(_))));
    }

    #[test]
    fn test_same_id_different_kind_is_not_self_loop() {
        let id = Uuid::new_v4();
        let conn = Connection::new(Uuid::new_v4(), Endpoint::card(id), Endpoint::group(id)).unwrap();
        assert!(!conn.is_self_loop());
        assert!(conn.touches(Endpoint::group(id)));
    }

    #[test]
    fn test_color_parse_and_default() {
        assert_eq!("purple".parse::<ConnectionColor>().unwrap(), ConnectionColor::Purple);
        assert!("teal".parse::<ConnectionColor>().is_err());
        assert_eq!(ConnectionColor::default(), ConnectionColor::Red);
        assert_eq!(ConnectionColor::Gray.hex(), "#4b5563");
    }

    #[test]
    fn test_serialized_endpoint_kinds_are_lowercase() {
        let conn = Connection::new(
            Uuid::new_v4(),
            Endpoint::card(Uuid::new_v4()),
            Endpoint::group(Uuid::new_v4()),
        )
        .unwrap();
        let json = serde_json::to_value(&conn).unwrap();
        assert_eq!(json["from_type"], "card");
        assert_eq!(json["to_type"], "group");
        assert_eq!(json["color"], "red");
    }

    #[test]
    fn test_update_inverse_restores_label_and_color() {
        let original = Connection::new(
            Uuid::new_v4(),
            Endpoint::card(Uuid::new_v4()),
            Endpoint::card(Uuid::new_v4()),
        )
        .unwrap()
        .with_label(Some("depends on".to_string()));

        let update = ConnectionUpdate {
            label: FieldUpdate::Clear,
            color: Some(ConnectionColor::Blue),
        };
        let undo = update.inverse(&original);

        let mut conn = original.clone();
        conn.update(update);
        assert_eq!(conn.label, None);
        conn.update(undo);
        assert_eq!(conn, original);
    }
}
