use pinboard_core::{Point, Rect};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::tab::TabId;

pub type GroupId = Uuid;

pub const DEFAULT_GROUP_LABEL: &str = "Group";
pub const DEFAULT_GROUP_WIDTH: f64 = 300.0;
pub const DEFAULT_GROUP_HEIGHT: f64 = 200.0;

/// Rectangular container on a tab. Membership lives on
/// [`crate::Placement::group_id`], not here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Group {
    pub id: GroupId,
    pub tab_id: TabId,
    pub label: String,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Group {
    pub fn new(tab_id: TabId, label: String, bounds: Rect) -> Self {
        Self {
            id: Uuid::new_v4(),
            tab_id,
            label,
            x: bounds.x,
            y: bounds.y,
            width: bounds.width,
            height: bounds.height,
        }
    }

    pub fn bounds(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }

    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn update(&mut self, updates: GroupUpdate) {
        if let Some(label) = updates.label {
            self.label = label;
        }
        if let Some(bounds) = updates.bounds {
            self.x = bounds.x;
            self.y = bounds.y;
            self.width = bounds.width;
            self.height = bounds.height;
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct GroupUpdate {
    pub label: Option<String>,
    pub bounds: Option<Rect>,
}

impl GroupUpdate {
    pub fn label(label: impl Into<String>) -> Self {
        Self {
            label: Some(label.into()),
            ..Default::default()
        }
    }

    pub fn bounds(bounds: Rect) -> Self {
        Self {
            bounds: Some(bounds),
            ..Default::default()
        }
    }
}
