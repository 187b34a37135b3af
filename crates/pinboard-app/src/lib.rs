pub mod events;
pub mod exchange;
pub mod session;
pub mod store;

pub use events::{EventBus, SessionEvent};
pub use exchange::{read_import, write_export};
pub use session::Session;
pub use store::open_store;
