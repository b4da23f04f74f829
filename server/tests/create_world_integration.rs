use std::collections::HashSet;

use common::{Direction, MapError, RoomStore, generate_map_with};
use rand::{SeedableRng, rngs::StdRng};
use server::{JsonFileStore, create_world};
use strum::IntoEnumIterator;
use tempfile::tempdir;

#[test]
fn world_is_written_to_disk_and_reloads_intact() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("rooms.json");

    let mut store = JsonFileStore::open(&path).unwrap();
    let world = create_world(&mut store, 4, StdRng::seed_from_u64(99)).unwrap();

    let reopened = JsonFileStore::open(&path).unwrap();
    assert_eq!(reopened.len(), 16);
    assert_eq!(reopened.first_room_id(), Some(world.first_room));

    let mut passages = HashSet::new();
    for room in reopened.rooms() {
        assert_eq!(Some(room), world.map.room(room.id));
        for direction in Direction::iter() {
            if let Some(other) = room.exit(direction) {
                let other = reopened.room(other).expect("link should point at a stored room");
                assert_eq!(other.exit(direction.opposite()), Some(room.id));
                passages.insert((room.id.min(other.id), room.id.max(other.id)));
            }
        }
    }
    assert_eq!(passages.len(), 15);
}

#[test]
fn regenerating_discards_the_previous_rooms() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("rooms.json");

    let mut store = JsonFileStore::open(&path).unwrap();
    let first = create_world(&mut store, 3, rand::rng()).unwrap();
    let old_ids: HashSet<_> = first.map.rooms().iter().map(|room| room.id).collect();

    let mut store = JsonFileStore::open(&path).unwrap();
    let second = create_world(&mut store, 3, rand::rng()).unwrap();

    let reopened = JsonFileStore::open(&path).unwrap();
    assert_eq!(reopened.len(), 9);
    for room in reopened.rooms() {
        assert!(!old_ids.contains(&room.id), "room {} survived", room.id);
    }
    assert!(second.first_room > first.first_room);
}

#[test]
fn invalid_size_is_reported_without_writing() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("rooms.json");

    let mut store = JsonFileStore::open(&path).unwrap();
    let result = create_world(&mut store, -1, rand::rng());

    assert!(matches!(result, Err(MapError::InvalidSize(-1))));
    assert!(!path.exists());
}

#[test]
fn generated_map_is_on_disk_without_an_explicit_flush() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("rooms.json");

    let mut store = JsonFileStore::open(&path).unwrap();
    let map = generate_map_with(3, StdRng::seed_from_u64(7), &mut store).unwrap();
    drop(store);

    let reopened = JsonFileStore::open(&path).unwrap();
    assert_eq!(reopened.len(), 9);
    assert_eq!(reopened.first_room_id(), Some(map.first_room().id));
    for room in map.rooms() {
        assert_eq!(reopened.room(room.id).as_ref(), Some(room));
    }
}
