pub mod config;
pub mod store;
pub mod world;

pub use store::{JsonFileStore, JsonStoreError};
pub use world::{World, create_world};
