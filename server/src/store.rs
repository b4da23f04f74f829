use std::{
    fs, io,
    path::{Path, PathBuf},
};

use common::{Links, MemoryStore, MemoryStoreError, Room, RoomId, RoomStore};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

#[derive(Debug, Error)]
pub enum JsonStoreError {
    #[error("could not access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("could not read rooms from {}: {source}", path.display())]
    Serialization {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error(transparent)]
    Rooms(#[from] MemoryStoreError),
}

#[derive(Default, Serialize, Deserialize)]
struct Snapshot {
    last_id: u64,
    rooms: Vec<Room>,
}

/// Rooms kept in memory and written to a JSON file on [`flush`](RoomStore::flush).
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    rooms: MemoryStore,
}

impl JsonFileStore {
    /// Loads `path` if it exists, otherwise starts empty.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, JsonStoreError> {
        let path = path.into();

        let snapshot = match fs::read_to_string(&path) {
            Ok(text) => serde_json::from_str::<Snapshot>(&text).map_err(|source| {
                JsonStoreError::Serialization {
                    path: path.clone(),
                    source,
                }
            })?,
            Err(e) if e.kind() == io::ErrorKind::NotFound => Snapshot::default(),
            Err(source) => return Err(JsonStoreError::Io { path, source }),
        };

        let rooms = MemoryStore::from_rooms(snapshot.rooms, snapshot.last_id);
        debug!(path = %path.display(), rooms = rooms.len(), "room store opened");

        Ok(Self { path, rooms })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn rooms(&self) -> impl Iterator<Item = &Room> {
        self.rooms.rooms()
    }

    fn io_error(&self, source: io::Error) -> JsonStoreError {
        JsonStoreError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

impl RoomStore for JsonFileStore {
    type Error = JsonStoreError;

    fn create_room(&mut self, x: usize, y: usize) -> Result<RoomId, Self::Error> {
        Ok(self.rooms.create_room(x, y)?)
    }

    fn update_room(&mut self, id: RoomId, links: &Links, asset: &str) -> Result<(), Self::Error> {
        Ok(self.rooms.update_room(id, links, asset)?)
    }

    fn delete_all_rooms(&mut self) -> Result<(), Self::Error> {
        Ok(self.rooms.delete_all_rooms()?)
    }

    fn first_room_id(&self) -> Option<RoomId> {
        self.rooms.first_room_id()
    }

    fn room(&self, id: RoomId) -> Option<Room> {
        self.rooms.room(id)
    }

    fn len(&self) -> usize {
        self.rooms.len()
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        let snapshot = Snapshot {
            last_id: self.rooms.last_id(),
            rooms: self.rooms.rooms().cloned().collect(),
        };
        let json = serde_json::to_string_pretty(&snapshot).map_err(|source| {
            JsonStoreError::Serialization {
                path: self.path.clone(),
                source,
            }
        })?;

        // Write beside the target and rename, so readers never see half a file.
        let temporary = self.path.with_extension("json.tmp");
        fs::write(&temporary, json).map_err(|e| self.io_error(e))?;
        fs::rename(&temporary, &self.path).map_err(|e| self.io_error(e))?;

        info!(path = %self.path.display(), rooms = self.rooms.len(), "rooms saved");
        Ok(())
    }
}
