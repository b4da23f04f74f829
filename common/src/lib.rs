pub mod constants;
pub mod error;
pub mod map;
pub mod room;
pub mod store;

pub use error::MapError;
pub use map::{Map, generate_map, generate_map_with};
pub use room::{Direction, Links, Room, RoomId};
pub use store::{MemoryStore, MemoryStoreError, RoomStore};
