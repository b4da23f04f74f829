use std::path::PathBuf;

use clap::Parser;
use common::constants::DEFAULT_GRID_SIZE;

/// Generate a fresh room map, replacing the stored one.
#[derive(Debug, Parser)]
#[command(name = "create_world", version)]
pub struct Config {
    /// Rooms per side of the square grid.
    #[arg(
        long,
        env = "GRID_SIZE",
        default_value_t = DEFAULT_GRID_SIZE,
        allow_negative_numbers = true
    )]
    pub grid_size: i64,

    /// JSON file holding the rooms.
    #[arg(long, env = "ROOMS_PATH", default_value = "rooms.json")]
    pub rooms_path: PathBuf,

    /// Seed for a reproducible layout.
    #[arg(long, env = "MAP_SEED")]
    pub seed: Option<u64>,

    /// Draw the map on stdout when done.
    #[arg(long)]
    pub print: bool,
}

impl Config {
    /// Reads `.env` (if present) into the environment, then parses arguments.
    pub fn load() -> Self {
        dotenvy::dotenv().ok();
        Config::parse()
    }
}
