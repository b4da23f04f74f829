use std::{error::Error, process};

use rand::{SeedableRng, rngs::StdRng};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use server::{JsonFileStore, World, config::Config, create_world};

fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = Config::load();

    match run(&config) {
        Ok(world) => {
            info!(
                rooms = world.map.rooms().len(),
                size = world.map.size(),
                first_room = %world.first_room,
                path = %config.rooms_path.display(),
                "world created"
            );
            if config.print {
                println!("{}", world.map);
            }
        }
        Err(e) => {
            error!("Failed to create world: {e}.");
            let mut source = e.source();
            while let Some(cause) = source {
                error!("Caused by: {cause}.");
                source = cause.source();
            }
            process::exit(1);
        }
    }
}

fn run(config: &Config) -> Result<World, Box<dyn Error>> {
    let mut store = JsonFileStore::open(&config.rooms_path)?;

    let world = match config.seed {
        Some(seed) => create_world(&mut store, config.grid_size, StdRng::seed_from_u64(seed))?,
        None => create_world(&mut store, config.grid_size, rand::rng())?,
    };

    Ok(world)
}
