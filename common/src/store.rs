use std::collections::BTreeMap;

use thiserror::Error;

use crate::room::{Links, Room, RoomId};

/// Durable home of generated rooms.
///
/// Ids must be issued in increasing order so that `first_room_id` names the
/// room created first.
pub trait RoomStore {
    type Error: std::error::Error + Send + Sync + 'static;

    fn create_room(&mut self, x: usize, y: usize) -> Result<RoomId, Self::Error>;

    fn update_room(&mut self, id: RoomId, links: &Links, asset: &str) -> Result<(), Self::Error>;

    fn delete_all_rooms(&mut self) -> Result<(), Self::Error>;

    fn first_room_id(&self) -> Option<RoomId>;

    fn room(&self, id: RoomId) -> Option<Room>;

    fn len(&self) -> usize;

    /// Makes earlier writes durable. Stores that write through need not
    /// override this.
    fn flush(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MemoryStoreError {
    #[error("room {0} does not exist")]
    UnknownRoom(RoomId),
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    rooms: BTreeMap<RoomId, Room>,
    last_id: u64, // Never reset, so ids stay unique across worlds.
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Restores saved rooms. The id sequence resumes after whichever is
    /// higher: `last_id` or the largest id among `rooms`.
    pub fn from_rooms(rooms: impl IntoIterator<Item = Room>, last_id: u64) -> Self {
        let rooms: BTreeMap<RoomId, Room> =
            rooms.into_iter().map(|room| (room.id, room)).collect();
        let highest = rooms.keys().next_back().map_or(0, |id| id.get());

        Self {
            rooms,
            last_id: last_id.max(highest),
        }
    }

    pub fn rooms(&self) -> impl Iterator<Item = &Room> {
        self.rooms.values()
    }

    /// The most recently issued id, or 0 before the first room.
    pub fn last_id(&self) -> u64 {
        self.last_id
    }
}

impl RoomStore for MemoryStore {
    type Error = MemoryStoreError;

    fn create_room(&mut self, x: usize, y: usize) -> Result<RoomId, Self::Error> {
        self.last_id += 1;
        let id = RoomId::new(self.last_id).expect("incremented id is never zero");
        self.rooms.insert(id, Room::new(id, x, y));
        Ok(id)
    }

    fn update_room(&mut self, id: RoomId, links: &Links, asset: &str) -> Result<(), Self::Error> {
        let room = self
            .rooms
            .get_mut(&id)
            .ok_or(MemoryStoreError::UnknownRoom(id))?;
        room.links = *links;
        room.asset = asset.to_string();
        Ok(())
    }

    fn delete_all_rooms(&mut self) -> Result<(), Self::Error> {
        self.rooms.clear();
        Ok(())
    }

    fn first_room_id(&self) -> Option<RoomId> {
        self.rooms.keys().next().copied()
    }

    fn room(&self, id: RoomId) -> Option<Room> {
        self.rooms.get(&id).cloned()
    }

    fn len(&self) -> usize {
        self.rooms.len()
    }
}
