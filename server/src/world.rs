use common::{Map, MapError, RoomId, RoomStore, generate_map_with};
use rand::Rng;
use tracing::info;

pub struct World {
    pub map: Map,
    pub first_room: RoomId, // Where new players start.
}

/// Replaces whatever map `store` holds with a freshly generated one.
///
/// The old rooms are deleted first, so only one map exists at a time. A
/// failure part way leaves the store half built; call this again to recover.
pub fn create_world<S, R>(store: &mut S, grid_size: i64, rng: R) -> Result<World, MapError>
where
    S: RoomStore,
    R: Rng,
{
    let discarded = store.len();
    store.delete_all_rooms().map_err(MapError::store)?;
    info!(discarded, "previous rooms deleted");

    let map = generate_map_with(grid_size, rng, store)?;
    let first_room = map.first_room().id;

    Ok(World { map, first_room })
}
