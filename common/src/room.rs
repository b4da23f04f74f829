use std::{fmt, num::NonZeroU64};

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoEnumIterator};

use crate::constants::{ASSET_SUFFIX, DEFAULT_DESCRIPTION, DEFAULT_TITLE};

/// Identifier handed out by a [`RoomStore`](crate::store::RoomStore).
///
/// Zero is reserved: on the wire it means "no link in this direction", so it
/// can never name a room.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u64", into = "u64")]
pub struct RoomId(NonZeroU64);

impl RoomId {
    pub fn new(raw: u64) -> Option<Self> {
        NonZeroU64::new(raw).map(RoomId)
    }

    pub fn get(self) -> u64 {
        self.0.get()
    }
}

impl TryFrom<u64> for RoomId {
    type Error = &'static str;

    fn try_from(raw: u64) -> Result<Self, Self::Error> {
        RoomId::new(raw).ok_or("room id must not be zero")
    }
}

impl From<RoomId> for u64 {
    fn from(id: RoomId) -> Self {
        id.get()
    }
}

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Compass directions in the order their markers appear in an asset name.
///
/// Increasing `x` runs south and increasing `y` runs east.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(ascii_case_insensitive)]
pub enum Direction {
    #[strum(to_string = "north", serialize = "n")]
    North,
    #[strum(to_string = "south", serialize = "s")]
    South,
    #[strum(to_string = "east", serialize = "e")]
    East,
    #[strum(to_string = "west", serialize = "w")]
    West,
}

impl Direction {
    pub fn opposite(self) -> Self {
        match self {
            Direction::North => Direction::South,
            Direction::South => Direction::North,
            Direction::East => Direction::West,
            Direction::West => Direction::East,
        }
    }

    pub fn marker(self) -> char {
        match self {
            Direction::North => 'n',
            Direction::South => 's',
            Direction::East => 'e',
            Direction::West => 'w',
        }
    }

    /// Step `(dx, dy)` taken when leaving a room this way.
    pub fn offset(self) -> (isize, isize) {
        match self {
            Direction::North => (-1, 0),
            Direction::South => (1, 0),
            Direction::East => (0, 1),
            Direction::West => (0, -1),
        }
    }
}

/// The four exits of a room. `None` means there is a wall that way.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Links {
    #[serde(with = "link")]
    pub n_to: Option<RoomId>,
    #[serde(with = "link")]
    pub s_to: Option<RoomId>,
    #[serde(with = "link")]
    pub e_to: Option<RoomId>,
    #[serde(with = "link")]
    pub w_to: Option<RoomId>,
}

impl Links {
    pub fn get(&self, direction: Direction) -> Option<RoomId> {
        match direction {
            Direction::North => self.n_to,
            Direction::South => self.s_to,
            Direction::East => self.e_to,
            Direction::West => self.w_to,
        }
    }

    pub fn set(&mut self, direction: Direction, destination: RoomId) {
        let slot = match direction {
            Direction::North => &mut self.n_to,
            Direction::South => &mut self.s_to,
            Direction::East => &mut self.e_to,
            Direction::West => &mut self.w_to,
        };
        *slot = Some(destination);
    }

    pub fn open_directions(&self) -> impl Iterator<Item = Direction> + '_ {
        Direction::iter().filter(|&direction| self.get(direction).is_some())
    }

    pub fn degree(&self) -> usize {
        self.open_directions().count()
    }

    pub fn is_empty(&self) -> bool {
        self.degree() == 0
    }
}

// Missing links are stored as 0, matching the integer columns other code reads.
mod link {
    use serde::{Deserialize, Deserializer, Serializer};

    use super::RoomId;

    pub fn serialize<S>(link: &Option<RoomId>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(link.map_or(0, RoomId::get))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<RoomId>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = u64::deserialize(deserializer)?;
        Ok(RoomId::new(raw))
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Room {
    pub id: RoomId,
    pub title: String,
    pub description: String,
    pub x: usize,
    pub y: usize,
    #[serde(flatten)]
    pub links: Links,
    pub asset: String,
}

impl Room {
    pub fn new(id: RoomId, x: usize, y: usize) -> Self {
        Room {
            id,
            title: DEFAULT_TITLE.to_string(),
            description: DEFAULT_DESCRIPTION.to_string(),
            x,
            y,
            links: Links::default(),
            asset: String::new(),
        }
    }

    pub fn coordinates(&self) -> (usize, usize) {
        (self.x, self.y)
    }

    pub fn connect(&mut self, destination: &Room, direction: Direction) {
        self.links.set(direction, destination.id);
    }

    pub fn exit(&self, direction: Direction) -> Option<RoomId> {
        self.links.get(direction)
    }

    pub fn refresh_asset(&mut self) {
        self.asset = asset_for(&self.links);
    }
}

/// Tile name for a room: one marker per open direction, then the tile set suffix.
pub fn asset_for(links: &Links) -> String {
    let mut asset: String = links.open_directions().map(Direction::marker).collect();
    asset.push_str(ASSET_SUFFIX);
    asset
}
