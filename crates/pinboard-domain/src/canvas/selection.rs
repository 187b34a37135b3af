//! What is currently selected on the canvas.
//!
//! Selection kinds are mutually exclusive. Only cards support additive
//! multi-selection; selecting a group or a connection drops any cards.

use crate::{ConnectionId, GroupId, PlacementId};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Selection {
    #[default]
    None,
    /// Placement ids in selection order. `primary` is the most recently
    /// toggled-in id and is always a member of `ids`.
    Cards {
        primary: PlacementId,
        ids: Vec<PlacementId>,
    },
    Group(GroupId),
    Connection(ConnectionId),
}

/// Which property panel, if any, the selection calls for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropertyPanel {
    Card(PlacementId),
    Group(GroupId),
    Connection(ConnectionId),
}

impl Selection {
    pub fn card(id: PlacementId) -> Self {
        Selection::Cards {
            primary: id,
            ids: vec![id],
        }
    }

    /// Additive toggle of a card. Adding makes it primary; removing the last
    /// card clears the selection. Any non-card selection is replaced.
    pub fn toggle_card(&mut self, id: PlacementId) {
        if !matches!(self, Selection::Cards { .. }) {
            *self = Selection::card(id);
            return;
        }
        let Selection::Cards { primary, ids } = self else {
            return;
        };
        match ids.iter().position(|existing| *existing == id) {
            Some(pos) => {
                ids.remove(pos);
                if *primary == id {
                    if let Some(last) = ids.last() {
                        *primary = *last;
                    }
                }
            }
            None => {
                ids.push(id);
                *primary = id;
            }
        }
        if ids.is_empty() {
            *self = Selection::None;
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Selection::None)
    }

    pub fn contains_card(&self, id: PlacementId) -> bool {
        matches!(self, Selection::Cards { ids, .. } if ids.contains(&id))
    }

    pub fn card_ids(&self) -> &[PlacementId] {
        match self {
            Selection::Cards { ids, .. } => ids,
            _ => &[],
        }
    }

    pub fn primary_card(&self) -> Option<PlacementId> {
        match self {
            Selection::Cards { primary, .. } => Some(*primary),
            _ => None,
        }
    }

    /// Whether the element with `id` should be drawn highlighted.
    pub fn highlights(&self, id: uuid::Uuid) -> bool {
        match self {
            Selection::None => false,
            Selection::Cards { ids, .. } => ids.contains(&id),
            Selection::Group(group_id) => *group_id == id,
            Selection::Connection(conn_id) => *conn_id == id,
        }
    }

    /// Panels only show for a single element; a multi-card selection edits
    /// nothing.
    pub fn property_panel(&self) -> Option<PropertyPanel> {
        match self {
            Selection::None => None,
            Selection::Cards { primary, ids } if ids.len() == 1 => Some(PropertyPanel::Card(*primary)),
            Selection::Cards { .. } => None,
            Selection::Group(id) => Some(PropertyPanel::Group(*id)),
            Selection::Connection(id) => Some(PropertyPanel::Connection(*id)),
        }
    }

    /// Drop every reference to `id`, e.g. after the element was deleted.
    pub fn forget(&mut self, id: uuid::Uuid) {
        if self.contains_card(id) {
            self.toggle_card(id);
        } else if self.highlights(id) {
            *self = Selection::None;
        }
    }
}
