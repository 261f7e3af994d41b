use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use crate::canvas::{DEFAULT_TILE_SIZE, Tile};

// ============================================================================
// COORDINATES
// ============================================================================

/// Integer grid address of a tile. Y grows *upward* on screen.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct TileCoord {
    pub x: i32,
    pub y: i32,
}

impl TileCoord {
    pub const ORIGIN: TileCoord = TileCoord { x: 0, y: 0 };

    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Packed map key: high 32 bits X, low 32 bits Y (both as raw two's complement).
    #[inline]
    pub const fn key(self) -> u64 {
        ((self.x as u32 as u64) << 32) | self.y as u32 as u64
    }

    #[inline]
    pub const fn from_key(key: u64) -> Self {
        Self {
            x: (key >> 32) as u32 as i32,
            y: key as u32 as i32,
        }
    }

    /// `up → (x, y+1)`, `down → (x, y-1)`, `left → (x-1, y)`, `right → (x+1, y)`.
    pub fn neighbor(self, direction: Direction) -> Self {
        match direction {
            Direction::Up => Self::new(self.x, self.y.wrapping_add(1)),
            Direction::Down => Self::new(self.x, self.y.wrapping_sub(1)),
            Direction::Left => Self::new(self.x.wrapping_sub(1), self.y),
            Direction::Right => Self::new(self.x.wrapping_add(1), self.y),
        }
    }

    /// External `"x|y"` identifier.
    pub fn id(self) -> String {
        self.to_string()
    }

    /// Parse an `"x|y"` identifier.
    pub fn parse_id(id: &str) -> Option<Self> {
        let (x, y) = id.split_once('|')?;
        Some(Self::new(x.trim().parse().ok()?, y.trim().parse().ok()?))
    }
}

impl fmt::Display for TileCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}|{}", self.x, self.y)
    }
}

impl FromStr for TileCoord {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_id(s).ok_or_else(|| format!("invalid tile id {:?} (expected \"x|y\")", s))
    }
}

/// Free-function form of [`TileCoord::neighbor`].
pub fn neighbor_id(coord: TileCoord, direction: Direction) -> TileCoord {
    coord.neighbor(direction)
}

/// Cardinal expansion direction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub fn all() -> &'static [Direction] {
        &[Direction::Up, Direction::Down, Direction::Left, Direction::Right]
    }

    pub fn opposite(self) -> Self {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Direction::Up => "up",
            Direction::Down => "down",
            Direction::Left => "left",
            Direction::Right => "right",
        }
    }
}

impl FromStr for Direction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "up" => Ok(Direction::Up),
            "down" => Ok(Direction::Down),
            "left" => Ok(Direction::Left),
            "right" => Ok(Direction::Right),
            other => Err(format!("unknown direction {:?}", other)),
        }
    }
}

// ============================================================================
// EXPANSION STATE
// ============================================================================

/// Which "add neighbour" arrows a tile shows: `true` where no neighbour exists yet.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct Expansion {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
}

impl Expansion {
    pub fn is_open(&self, direction: Direction) -> bool {
        match direction {
            Direction::Up => self.up,
            Direction::Down => self.down,
            Direction::Left => self.left,
            Direction::Right => self.right,
        }
    }

    pub fn open_directions(&self) -> Vec<Direction> {
        Direction::all().iter().copied().filter(|d| self.is_open(*d)).collect()
    }
}

/// Result of a create request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Creation {
    Created,
    AlreadyExisted,
}

// ============================================================================
// TILE GRID – sparse, append-only
// ============================================================================

/// Infinite sparse grid of tiles keyed by packed coordinates.
///
/// A tile exists at the origin from construction on; tiles are never removed.
/// Iteration follows creation order.
#[derive(Clone, Debug)]
pub struct TileGrid {
    tile_size: u32,
    tiles: HashMap<u64, Tile>,
    order: Vec<TileCoord>,
}

impl Default for TileGrid {
    fn default() -> Self {
        Self::new(DEFAULT_TILE_SIZE)
    }
}

impl TileGrid {
    /// New grid holding the origin tile.
    pub fn new(tile_size: u32) -> Self {
        let mut grid = Self {
            tile_size: tile_size.max(1),
            tiles: HashMap::new(),
            order: Vec::new(),
        };
        grid.create(TileCoord::ORIGIN);
        grid
    }

    pub fn tile_size(&self) -> u32 {
        self.tile_size
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Always false: the origin tile exists from construction.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn contains(&self, coord: TileCoord) -> bool {
        self.tiles.contains_key(&coord.key())
    }

    /// Lookup without creation.
    pub fn get(&self, coord: TileCoord) -> Option<&Tile> {
        self.tiles.get(&coord.key())
    }

    pub fn get_mut(&mut self, coord: TileCoord) -> Option<&mut Tile> {
        self.tiles.get_mut(&coord.key())
    }

    /// Create the tile at `coord`, or return the existing one untouched.
    pub fn create(&mut self, coord: TileCoord) -> (Creation, &mut Tile) {
        let key = coord.key();
        let creation = if self.tiles.contains_key(&key) {
            crate::log_info!("Tile {} already exists", coord);
            Creation::AlreadyExisted
        } else {
            self.order.push(coord);
            crate::log_info!(
                "Created tile {} ({} total, open sides: {:?})",
                coord,
                self.order.len(),
                self.expansion(coord).open_directions()
            );
            Creation::Created
        };
        let tile_size = self.tile_size;
        let tile = self
            .tiles
            .entry(key)
            .or_insert_with(|| Tile::new(coord, tile_size));
        (creation, tile)
    }

    /// Expansion arrow click: create the neighbour of `from` in `direction`.
    /// `None` when `from` itself is not part of the grid.
    pub fn add_neighbor(&mut self, from: TileCoord, direction: Direction) -> Option<(TileCoord, Creation)> {
        if !self.contains(from) {
            crate::log_warn!("Cannot expand from missing tile {}", from);
            return None;
        }
        let target = from.neighbor(direction);
        let (creation, _) = self.create(target);
        if creation == Creation::AlreadyExisted {
            crate::log_warn!("Tile {} already exists {} of {}", target, direction.label(), from);
        }
        Some((target, creation))
    }

    /// Per-direction arrow visibility for `coord`.
    pub fn expansion(&self, coord: TileCoord) -> Expansion {
        Expansion {
            up: !self.contains(coord.neighbor(Direction::Up)),
            down: !self.contains(coord.neighbor(Direction::Down)),
            left: !self.contains(coord.neighbor(Direction::Left)),
            right: !self.contains(coord.neighbor(Direction::Right)),
        }
    }

    /// Tile coordinates in creation order.
    pub fn coords(&self) -> impl Iterator<Item = TileCoord> + '_ {
        self.order.iter().copied()
    }

    /// Tiles in creation order.
    pub fn iter(&self) -> impl Iterator<Item = &Tile> + '_ {
        self.order.iter().filter_map(|c| self.tiles.get(&c.key()))
    }

    /// Mutable access to every tile (unordered).
    pub fn tiles_mut(&mut self) -> impl Iterator<Item = &mut Tile> + '_ {
        self.tiles.values_mut()
    }
}
