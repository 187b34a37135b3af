pub mod board;
pub mod board_lifecycle;
pub mod canvas;
pub mod card;
pub mod commands;
pub mod connection;
pub mod exchange;
pub mod field_update;
pub mod group;
pub mod history;
pub mod image;
pub mod placement;
pub mod repository;
pub mod snapshot;
pub mod tab;

pub use board::{Board, BoardId};
pub use card::{Card, CardId, CardUpdate, DEFAULT_CARD_TITLE};
pub use commands::Command;
pub use connection::{
    Connection, ConnectionColor, ConnectionId, ConnectionUpdate, Endpoint, EndpointKind,
};
pub use field_update::FieldUpdate;
pub use group::{
    Group, GroupId, GroupUpdate, DEFAULT_GROUP_HEIGHT, DEFAULT_GROUP_LABEL, DEFAULT_GROUP_WIDTH,
};
pub use history::{HistoryListener, HistoryManager, HistoryStatus};
pub use image::{content_hash, Image, ImageHash};
pub use placement::{Placement, PlacementId, PlacementSlot, PlacementUpdate};
pub use repository::{Record, Repositories, Repository};
pub use snapshot::{BoardSnapshot, TabSnapshot};
pub use tab::{Tab, TabId, TabUpdate};
