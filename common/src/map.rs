pub mod disjoint_set;
pub mod maker;

use std::{collections::HashMap, fmt};

use rand::Rng;
use tracing::{info, info_span};

use crate::{
    error::MapError,
    room::{Direction, Room, RoomId},
    store::{MemoryStore, RoomStore},
};

use maker::MapMaker;

/// A finished world: every room linked into a single tree of passages.
#[derive(Clone)]
pub struct Map {
    rooms: Vec<Room>,
    size: usize,
    first: usize,
    by_id: HashMap<RoomId, usize>,
    by_coordinates: HashMap<(usize, usize), usize>,
}

/// Generates a map with thread-local randomness and throwaway in-memory ids.
pub fn generate_map(grid_size: i64) -> Result<Map, MapError> {
    generate_map_with(grid_size, rand::rng(), &mut MemoryStore::new())
}

/// Generates a map, creating and then updating its rooms in `store`.
///
/// Nothing is handed back until every room is linked, written and flushed, so on error
/// the caller should clear the store before trying again.
pub fn generate_map_with<R, S>(grid_size: i64, rng: R, store: &mut S) -> Result<Map, MapError>
where
    R: Rng,
    S: RoomStore,
{
    let _span = info_span!("generate_map", grid_size).entered();

    let map = MapMaker::new(grid_size, rng, store)?.make_map(store)?;

    info!(
        rooms = map.rooms.len(),
        passages = map.edge_count(),
        "map generated"
    );

    Ok(map)
}

impl Map {
    pub fn new(rooms: Vec<Room>) -> Result<Self, MapError> {
        let size = rooms.len().isqrt();
        if rooms.is_empty() || size * size != rooms.len() {
            return Err(MapError::InvalidTopology { rooms: rooms.len() });
        }

        let mut by_id = HashMap::with_capacity(rooms.len());
        let mut by_coordinates = HashMap::with_capacity(rooms.len());
        for (i, room) in rooms.iter().enumerate() {
            let in_bounds = room.x < size && room.y < size;
            let duplicate = by_id.insert(room.id, i).is_some()
                || by_coordinates.insert(room.coordinates(), i).is_some();
            if !in_bounds || duplicate {
                return Err(MapError::InvalidTopology { rooms: rooms.len() });
            }
        }

        let first = by_id
            .iter()
            .min_by_key(|&(id, _)| *id)
            .map_or(0, |(_, &i)| i);

        Ok(Self {
            rooms,
            size,
            first,
            by_id,
            by_coordinates,
        })
    }

    pub fn rooms(&self) -> &[Room] {
        &self.rooms
    }

    pub fn into_rooms(self) -> Vec<Room> {
        self.rooms
    }

    /// Width (and height) of the grid in rooms.
    pub fn size(&self) -> usize {
        self.size
    }

    pub fn room(&self, id: RoomId) -> Option<&Room> {
        self.by_id.get(&id).map(|&i| &self.rooms[i])
    }

    pub fn room_at(&self, x: usize, y: usize) -> Option<&Room> {
        self.by_coordinates.get(&(x, y)).map(|&i| &self.rooms[i])
    }

    /// The room reached by leaving `id` in `direction`, if a passage exists.
    pub fn neighbor(&self, id: RoomId, direction: Direction) -> Option<&Room> {
        let destination = self.room(id)?.exit(direction)?;
        self.room(destination)
    }

    /// The room with the lowest id, where new players are placed.
    pub fn first_room(&self) -> &Room {
        &self.rooms[self.first]
    }

    /// Number of passages; each one is recorded on both of its rooms.
    pub fn edge_count(&self) -> usize {
        let ends: usize = self.rooms.iter().map(|room| room.links.degree()).sum();
        ends / 2
    }

    pub fn log(&self) -> String {
        let width = 2 * self.size + 1;
        let mut grid = vec![vec![true; width]; width]; // true = wall.

        for room in &self.rooms {
            let row = 2 * room.x + 1;
            let col = 2 * room.y + 1;
            grid[row][col] = false;
            if room.links.s_to.is_some() {
                grid[row + 1][col] = false;
            }
            if room.links.e_to.is_some() {
                grid[row][col + 1] = false;
            }
        }

        grid.iter()
            .map(|row| {
                row.iter()
                    .map(|&wall| if wall { "██" } else { "  " })
                    .collect::<String>()
            })
            .collect::<Vec<String>>()
            .join("\n")
    }
}

impl fmt::Debug for Map {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl fmt::Display for Map {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.log())
    }
}
