// Rooms:
pub const DEFAULT_TITLE: &str = "DEFAULT TITLE";
pub const DEFAULT_DESCRIPTION: &str = "DEFAULT DESCRIPTION";
pub const ASSET_SUFFIX: &str = "_1.tmx"; // Tile set 1. Only one variant exists so far.

// Generation:
pub const DEFAULT_GRID_SIZE: i64 = 4;
