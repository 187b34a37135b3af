pub mod config;
pub mod error;
pub mod geometry;
pub mod result;
pub mod traits;

pub use config::AppConfig;
pub use error::PinboardError;
pub use geometry::{bounding_box, Point, Rect, Size};
pub use result::PinboardResult;
pub use traits::{Collection, Row, Store};
