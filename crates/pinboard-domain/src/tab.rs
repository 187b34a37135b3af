use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{board::BoardId, canvas::Viewport};

pub type TabId = Uuid;

/// One canvas of a board. `order` is dense (0..n) within the board.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tab {
    pub id: TabId,
    pub board_id: BoardId,
    pub name: String,
    pub order: u32,
    #[serde(default)]
    pub viewport_x: f64,
    #[serde(default)]
    pub viewport_y: f64,
    #[serde(default = "default_zoom")]
    pub viewport_zoom: f64,
}

fn default_zoom() -> f64 {
    1.0
}

impl Tab {
    pub fn new(board_id: BoardId, name: String, order: u32) -> Self {
        Self {
            id: Uuid::new_v4(),
            board_id,
            name,
            order,
            viewport_x: 0.0,
            viewport_y: 0.0,
            viewport_zoom: 1.0,
        }
    }

    /// Default name for the tab at `order`: "Tab 1", "Tab 2", ...
    pub fn default_name(order: u32) -> String {
        format!("Tab {}", order + 1)
    }

    pub fn viewport(&self) -> Viewport {
        Viewport::new(self.viewport_x, self.viewport_y, self.viewport_zoom)
    }

    pub fn update(&mut self, updates: TabUpdate) {
        if let Some(name) = updates.name {
            self.name = name;
        }
        if let Some(order) = updates.order {
            self.order = order;
        }
        if let Some(viewport) = updates.viewport {
            self.viewport_x = viewport.x;
            self.viewport_y = viewport.y;
            self.viewport_zoom = viewport.zoom;
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TabUpdate {
    pub name: Option<String>,
    pub order: Option<u32>,
    pub viewport: Option<Viewport>,
}

impl TabUpdate {
    pub fn name(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Default::default()
        }
    }

    pub fn order(order: u32) -> Self {
        Self {
            order: Some(order),
            ..Default::default()
        }
    }

    pub fn viewport(viewport: Viewport) -> Self {
        Self {
            viewport: Some(viewport),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_tab_has_identity_viewport() {
        let tab = Tab::new(Uuid::new_v4(), Tab::default_name(0), 0);
        assert_eq!(tab.name, "Tab 1");
        assert_eq!(tab.viewport(), Viewport::default());
    }

    #[test]
    fn test_update_viewport_keeps_name() {
        let mut tab = Tab::new(Uuid::new_v4(), "Ideas".to_string(), 2);
        tab.update(TabUpdate::viewport(Viewport::new(10.0, -5.0, 2.0)));
        assert_eq!(tab.name, "Ideas");
        assert_eq!(tab.order, 2);
        assert_eq!(tab.viewport_zoom, 2.0);
    }

    #[test]
    fn test_missing_viewport_fields_default() {
        let json = serde_json::json!({
            "id": Uuid::new_v4(),
            "board_id": Uuid::new_v4(),
            "name": "Old",
            "order": 0
        });
        let tab: Tab = serde_json::from_value(json).unwrap();
        assert_eq!(tab.viewport(), Viewport::default());
    }
}
