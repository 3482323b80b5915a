pub mod board;
pub mod canvas;
pub mod collection;
pub mod config;
pub mod directory;
pub mod events;
pub mod id;
pub mod model;

pub use board::Board;
pub use collection::MoveError;
pub use config::{BoardConfig, Viewport};
pub use directory::Directory;
pub use events::{BoardEvent, Observers, SubscriptionId};
pub use id::NodeId;
pub use model::*;
