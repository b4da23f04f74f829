pub mod kruskal;

use std::{collections::BTreeMap, fmt};

use rand::Rng;
use strum::IntoEnumIterator;
use tracing::debug;

use crate::{
    error::MapError,
    map::Map,
    room::{Direction, Room},
    store::RoomStore,
};

use kruskal::Kruskal;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Cell {
    pub x: usize,
    pub y: usize,
}

impl Cell {
    pub fn new(x: usize, y: usize) -> Cell {
        Cell { x, y }
    }

    /// The in-bounds cell one step away, if any.
    pub fn step(self, direction: Direction, grid_size: usize) -> Option<Cell> {
        let (dx, dy) = direction.offset();
        let x = self.x.checked_add_signed(dx)?;
        let y = self.y.checked_add_signed(dy)?;

        if x < grid_size && y < grid_size {
            Some(Cell { x, y })
        } else {
            None
        }
    }

    pub fn neighbors(self, grid_size: usize) -> Vec<Cell> {
        Direction::iter()
            .filter_map(|direction| self.step(direction, grid_size))
            .collect()
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Orientation {
    Horizontal, // Same row: east/west neighbors.
    Vertical,   // Same column: north/south neighbors.
}

/// An undirected passage between two orthogonally adjacent cells.
///
/// Endpoints are stored in ascending order, so `a` is always the western or
/// northern end.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct Edge {
    pub a: Cell,
    pub b: Cell,
}

impl Edge {
    pub fn new(cell_1: Cell, cell_2: Cell) -> Edge {
        debug_assert!(
            cell_1.x.abs_diff(cell_2.x) + cell_1.y.abs_diff(cell_2.y) == 1,
            "edge endpoints {cell_1} and {cell_2} are not adjacent"
        );

        if cell_1 <= cell_2 {
            Edge {
                a: cell_1,
                b: cell_2,
            }
        } else {
            Edge {
                a: cell_2,
                b: cell_1,
            }
        }
    }

    pub fn orientation(&self) -> Orientation {
        if self.a.x == self.b.x {
            Orientation::Horizontal
        } else {
            Orientation::Vertical
        }
    }

    /// Direction of travel from `a` to `b`.
    pub fn direction(&self) -> Direction {
        match self.orientation() {
            Orientation::Horizontal => Direction::East,
            Orientation::Vertical => Direction::South,
        }
    }
}

/// Builds one map: the room grid, its full adjacency, and then the tree.
pub struct MapMaker<R: Rng> {
    pub rng: R,
    grid_size: usize,
    rooms: Vec<Room>, // Row-major: index = x * grid_size + y.
    adjacency: BTreeMap<Cell, Vec<Cell>>,
    edge_count: usize,
}

/// Room and edge counts for an `n`×`n` grid, or `None` if they cannot be
/// held in memory on this platform.
fn grid_counts(n: usize) -> Option<(usize, usize)> {
    let rooms = n.checked_mul(n)?;
    let edges = n.checked_mul(n - 1)?.checked_mul(2)?;

    let room_bytes = rooms.checked_mul(size_of::<Room>())?;
    let edge_bytes = edges.checked_mul(size_of::<Edge>())?;
    if room_bytes > isize::MAX as usize || edge_bytes > isize::MAX as usize {
        return None;
    }

    Some((rooms, edges))
}

impl<R: Rng> MapMaker<R> {
    /// Creates every room in `store` so each has an id before any link
    /// refers to it. Fails before touching the store if the size is invalid.
    pub fn new<S: RoomStore>(grid_size: i64, rng: R, store: &mut S) -> Result<Self, MapError> {
        let requested = grid_size;
        let (grid_size, room_count, edge_count) = match usize::try_from(requested) {
            Ok(n) if n > 0 => match grid_counts(n) {
                Some((rooms, edges)) => (n, rooms, edges),
                None => return Err(MapError::InvalidSize(requested)),
            },
            _ => return Err(MapError::InvalidSize(requested)),
        };

        let mut rooms = Vec::with_capacity(room_count);
        let mut adjacency = BTreeMap::new();

        for x in 0..grid_size {
            for y in 0..grid_size {
                let id = store.create_room(x, y).map_err(MapError::store)?;
                rooms.push(Room::new(id, x, y));

                let cell = Cell::new(x, y);
                adjacency.insert(cell, cell.neighbors(grid_size));
            }
        }

        debug!(grid_size, rooms = rooms.len(), "grid built");

        Ok(MapMaker {
            rng,
            grid_size,
            rooms,
            adjacency,
            edge_count,
        })
    }

    pub fn grid_size(&self) -> usize {
        self.grid_size
    }

    pub fn rooms(&self) -> &[Room] {
        &self.rooms
    }

    pub fn adjacency(&self) -> &BTreeMap<Cell, Vec<Cell>> {
        &self.adjacency
    }

    pub fn room_at(&self, cell: Cell) -> &Room {
        &self.rooms[self.room_index(cell)]
    }

    fn room_index(&self, cell: Cell) -> usize {
        debug_assert!(
            cell.x < self.grid_size && cell.y < self.grid_size,
            "cell {cell} is out of bounds"
        );

        cell.x * self.grid_size + cell.y
    }

    /// Every grid edge exactly once.
    pub fn edges(&self) -> Vec<Edge> {
        let mut edges = Vec::with_capacity(self.edge_count);

        for (&cell, neighbors) in &self.adjacency {
            for &neighbor in neighbors {
                if cell < neighbor {
                    edges.push(Edge::new(cell, neighbor));
                }
            }
        }

        edges
    }

    /// Opens a passage for each tree edge, then names every room's tile.
    pub fn connect_rooms(&mut self, tree: &[Edge]) {
        for edge in tree {
            let i = self.room_index(edge.a);
            let j = self.room_index(edge.b);
            let direction = edge.direction();

            let (room_1, room_2) = pair_mut(&mut self.rooms, i, j);
            room_1.connect(room_2, direction);
            room_2.connect(room_1, direction.opposite());
        }

        for room in &mut self.rooms {
            room.refresh_asset();
        }
    }

    /// Selects the tree, links the rooms, and writes them back to `store` in
    /// one pass. The store is flushed before the map is handed back.
    pub fn make_map<S: RoomStore>(mut self, store: &mut S) -> Result<Map, MapError> {
        let tree = self.kruskal()?;
        self.connect_rooms(&tree);

        for room in &self.rooms {
            store
                .update_room(room.id, &room.links, &room.asset)
                .map_err(MapError::store)?;
        }
        store.flush().map_err(MapError::store)?;

        debug!(rooms = self.rooms.len(), "rooms persisted");
        Map::new(self.rooms)
    }
}

// `i` precedes `j` in row-major order because edge endpoints are sorted.
fn pair_mut(rooms: &mut [Room], i: usize, j: usize) -> (&mut Room, &mut Room) {
    debug_assert!(i < j, "room indices must be ascending");

    let (head, tail) = rooms.split_at_mut(j);
    (&mut head[i], &mut tail[0])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{room::RoomId, store::MemoryStore};

    fn maker(grid_size: i64) -> (MapMaker<rand::rngs::ThreadRng>, MemoryStore) {
        let mut store = MemoryStore::new();
        let maker = MapMaker::new(grid_size, rand::rng(), &mut store).expect("valid grid size");
        (maker, store)
    }

    #[test]
    fn rooms_are_created_in_the_store_with_coordinates() {
        let (maker, store) = maker(3);

        assert_eq!(maker.rooms().len(), 9);
        assert_eq!(store.len(), 9);
        for room in maker.rooms() {
            let stored = store.room(room.id).expect("room should be stored");
            assert_eq!(stored.coordinates(), room.coordinates());
            assert!(room.links.is_empty());
        }
        assert_eq!(maker.room_at(Cell::new(2, 1)).coordinates(), (2, 1));
    }

    #[test]
    fn neighbor_counts_depend_on_position() {
        let (maker, _) = maker(4);
        let adjacency = maker.adjacency();

        assert_eq!(adjacency[&Cell::new(0, 0)].len(), 2);
        assert_eq!(adjacency[&Cell::new(3, 3)].len(), 2);
        assert_eq!(adjacency[&Cell::new(0, 2)].len(), 3);
        assert_eq!(adjacency[&Cell::new(2, 0)].len(), 3);
        assert_eq!(adjacency[&Cell::new(1, 2)].len(), 4);

        for (cell, neighbors) in adjacency {
            for neighbor in neighbors {
                assert_eq!(cell.x.abs_diff(neighbor.x) + cell.y.abs_diff(neighbor.y), 1);
                assert!(adjacency[neighbor].contains(cell));
            }
        }
    }

    #[test]
    fn edge_list_has_every_grid_edge_once() {
        for n in 1..=6 {
            let (maker, _) = maker(n as i64);
            let edges = maker.edges();

            assert_eq!(edges.len(), 2 * n * (n - 1));

            let unique: std::collections::HashSet<_> = edges.iter().collect();
            assert_eq!(unique.len(), edges.len());
        }
    }

    #[test]
    fn single_room_grid_has_no_edges() {
        let (maker, _) = maker(1);

        assert_eq!(maker.rooms().len(), 1);
        assert!(maker.adjacency()[&Cell::new(0, 0)].is_empty());
        assert!(maker.edges().is_empty());
    }

    #[test]
    fn invalid_sizes_fail_before_creating_rooms() {
        for size in [0, -1, -40] {
            let mut store = MemoryStore::new();
            let result = MapMaker::new(size, rand::rng(), &mut store);

            assert!(matches!(result, Err(MapError::InvalidSize(s)) if s == size));
            assert!(store.is_empty());
        }
    }

    #[test]
    fn sizes_too_large_to_hold_fail_before_creating_rooms() {
        for size in [1_i64 << 32, 1_i64 << 31, i64::MAX] {
            let mut store = MemoryStore::new();
            let result = MapMaker::new(size, rand::rng(), &mut store);

            assert!(matches!(result, Err(MapError::InvalidSize(s)) if s == size));
            assert!(store.is_empty());
        }
    }

    #[test]
    fn grid_counts_match_the_square_grid() {
        assert_eq!(grid_counts(1), Some((1, 0)));
        assert_eq!(grid_counts(4), Some((16, 24)));
        assert_eq!(grid_counts(usize::MAX), None);
    }

    #[test]
    fn edges_sort_their_endpoints() {
        let edge = Edge::new(Cell::new(1, 2), Cell::new(1, 1));
        assert_eq!(edge.a, Cell::new(1, 1));
        assert_eq!(edge.orientation(), Orientation::Horizontal);
        assert_eq!(edge.direction(), Direction::East);

        let edge = Edge::new(Cell::new(2, 0), Cell::new(1, 0));
        assert_eq!(edge.a, Cell::new(1, 0));
        assert_eq!(edge.orientation(), Orientation::Vertical);
        assert_eq!(edge.direction(), Direction::South);
    }

    #[test]
    fn connect_rooms_mirrors_links_and_names_tiles() {
        let (mut maker, _) = maker(2);
        let tree = [
            Edge::new(Cell::new(0, 0), Cell::new(0, 1)),
            Edge::new(Cell::new(0, 0), Cell::new(1, 0)),
            Edge::new(Cell::new(1, 1), Cell::new(0, 1)),
        ];

        maker.connect_rooms(&tree);

        let id = |x, y| maker.room_at(Cell::new(x, y)).id;
        let top_left = maker.room_at(Cell::new(0, 0));
        let top_right = maker.room_at(Cell::new(0, 1));
        let bottom_left = maker.room_at(Cell::new(1, 0));
        let bottom_right = maker.room_at(Cell::new(1, 1));

        assert_eq!(top_left.links.e_to, Some(id(0, 1)));
        assert_eq!(top_left.links.s_to, Some(id(1, 0)));
        assert_eq!(top_right.links.w_to, Some(id(0, 0)));
        assert_eq!(top_right.links.s_to, Some(id(1, 1)));
        assert_eq!(bottom_left.links.n_to, Some(id(0, 0)));
        assert_eq!(bottom_right.links.n_to, Some(id(0, 1)));

        assert_eq!(top_left.asset, "se_1.tmx");
        assert_eq!(top_right.asset, "sw_1.tmx");
        assert_eq!(bottom_left.asset, "n_1.tmx");
        assert_eq!(bottom_right.asset, "n_1.tmx");
    }

    #[test]
    fn make_map_persists_links_and_assets() {
        let (maker, mut store) = maker(3);

        let map = maker.make_map(&mut store).expect("map should build");

        assert_eq!(store.len(), 9);
        for room in map.rooms() {
            let stored = store.room(room.id).expect("room should be stored");
            assert_eq!(stored.links, room.links);
            assert_eq!(stored.asset, room.asset);
        }
        assert_eq!(store.first_room_id(), RoomId::new(1));
    }
}
