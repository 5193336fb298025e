#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the tile editor.
//!
//! This crate defines the vocabulary that connects adapters, the authoritative
//! world, and pure systems. Adapters submit [`Command`] values describing
//! desired edits, the world executes those commands via its `apply` entry
//! point, and then reports [`Event`] values describing what actually changed.
//! Coordinates, terrain classification and the error taxonomy of the tile
//! data model live here so every crate agrees on them.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Largest number of tiles a world or an installed object footprint may cover.
pub const MAX_TILE_COUNT: usize = 1 << 24;

/// Commands that express all permissible world edits.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// Resets every tile to the world's default terrain.
    InitializeTiles,
    /// Paints every in-bounds tile of the region with the provided terrain.
    PaintTerrain {
        /// Inclusive block of tiles to repaint. Cells outside the world are skipped.
        region: TileRect,
        /// Terrain applied to each tile in the region.
        terrain: TerrainKind,
    },
    /// Requests placement of an installed object anchored at the base tile.
    PlaceInstalledObject {
        /// Name of the registered prototype to instantiate.
        object_type: String,
        /// Bottom-left tile of the object's footprint.
        base: TileCoord,
    },
    /// Requests removal of a previously placed installed object.
    RemoveInstalledObject {
        /// Identifier of the object targeted for removal.
        id: InstalledObjectId,
    },
}

/// Events reported by the world after processing commands.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// Confirms that a tile's terrain changed.
    TerrainChanged {
        /// Tile whose terrain changed.
        tile: TileCoord,
        /// Terrain held before the change.
        from: TerrainKind,
        /// Terrain held after the change.
        to: TerrainKind,
    },
    /// Confirms that an installed object was placed into the world.
    InstalledObjectPlaced {
        /// Identifier assigned to the object by the world.
        id: InstalledObjectId,
        /// Prototype name the object was created from.
        object_type: String,
        /// Block of tiles occupied by the object.
        region: TileRect,
    },
    /// Confirms that an installed object was removed from the world.
    InstalledObjectRemoved {
        /// Identifier of the removed object.
        id: InstalledObjectId,
        /// Block of tiles the object previously occupied.
        region: TileRect,
    },
    /// Reports that a placement request was rejected.
    PlacementRejected {
        /// Prototype name provided in the request.
        object_type: String,
        /// Base tile provided in the request.
        base: TileCoord,
        /// Specific reason the placement failed.
        reason: PlacementError,
    },
    /// Reports that a removal request was rejected.
    RemovalRejected {
        /// Identifier provided in the request.
        id: InstalledObjectId,
        /// Specific reason the removal failed.
        reason: RemovalError,
    },
}

/// Location of a single tile expressed as zero-based x and y coordinates.
///
/// `y` grows upwards: row zero is the bottom row of the map.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TileCoord {
    x: u32,
    y: u32,
}

impl TileCoord {
    /// Creates a new tile coordinate.
    #[must_use]
    pub const fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }

    /// Zero-based column of the tile.
    #[must_use]
    pub const fn x(&self) -> u32 {
        self.x
    }

    /// Zero-based row of the tile.
    #[must_use]
    pub const fn y(&self) -> u32 {
        self.y
    }

    /// Returns the coordinate shifted by the provided offsets, if representable.
    #[must_use]
    pub fn offset(self, dx: u32, dy: u32) -> Option<Self> {
        Some(Self::new(self.x.checked_add(dx)?, self.y.checked_add(dy)?))
    }

    /// Converts signed coordinates, rejecting negative or oversized values.
    #[must_use]
    pub fn from_signed(x: i64, y: i64) -> Option<Self> {
        Some(Self::new(u32::try_from(x).ok()?, u32::try_from(y).ok()?))
    }
}

impl fmt::Display for TileCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Dimensions of a rectangular block measured in whole tiles.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FootprintSize {
    width: u32,
    height: u32,
}

impl FootprintSize {
    /// Creates a new size descriptor with explicit dimensions.
    #[must_use]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Width of the block in tiles.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Height of the block in tiles.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Number of tiles covered by the block.
    #[must_use]
    pub fn area(&self) -> usize {
        let width = usize::try_from(self.width).unwrap_or(usize::MAX);
        let height = usize::try_from(self.height).unwrap_or(usize::MAX);
        width.saturating_mul(height)
    }

    /// Number of tiles covered by the block, or `None` when it exceeds
    /// [`MAX_TILE_COUNT`].
    #[must_use]
    pub fn checked_area(&self) -> Option<usize> {
        let width = usize::try_from(self.width).ok()?;
        let height = usize::try_from(self.height).ok()?;
        width
            .checked_mul(height)
            .filter(|area| *area <= MAX_TILE_COUNT)
    }

    /// Reports whether either dimension is zero.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// Axis-aligned block of tiles anchored at its bottom-left corner.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TileRect {
    origin: TileCoord,
    size: FootprintSize,
}

impl TileRect {
    /// Constructs a rectangle from an origin tile and size.
    #[must_use]
    pub const fn from_origin_and_size(origin: TileCoord, size: FootprintSize) -> Self {
        Self { origin, size }
    }

    /// Constructs the smallest rectangle containing both corners, inclusive.
    ///
    /// The corners may be supplied in any order; the origin is always the
    /// minimum of both axes.
    #[must_use]
    pub fn from_corners(a: TileCoord, b: TileCoord) -> Self {
        let origin = TileCoord::new(a.x().min(b.x()), a.y().min(b.y()));
        let width = a.x().abs_diff(b.x()).saturating_add(1);
        let height = a.y().abs_diff(b.y()).saturating_add(1);
        Self {
            origin,
            size: FootprintSize::new(width, height),
        }
    }

    /// Bottom-left tile of the rectangle.
    #[must_use]
    pub const fn origin(&self) -> TileCoord {
        self.origin
    }

    /// Dimensions of the rectangle.
    #[must_use]
    pub const fn size(&self) -> FootprintSize {
        self.size
    }

    /// Reports whether the tile lies inside the rectangle.
    #[must_use]
    pub fn contains(&self, tile: TileCoord) -> bool {
        let dx = tile.x().checked_sub(self.origin.x());
        let dy = tile.y().checked_sub(self.origin.y());
        matches!((dx, dy), (Some(dx), Some(dy)) if dx < self.size.width() && dy < self.size.height())
    }

    /// Iterates the tiles of the rectangle left to right, then bottom to top.
    ///
    /// Cells whose coordinates would overflow `u32` are skipped.
    pub fn iter(&self) -> impl Iterator<Item = TileCoord> + '_ {
        (0..self.size.height()).flat_map(move |dy| {
            (0..self.size.width()).filter_map(move |dx| self.origin.offset(dx, dy))
        })
    }
}

/// Base terrain classification of a tile.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum TerrainKind {
    /// Unpainted void.
    #[default]
    Empty,
    /// Open water.
    Water,
    /// Grassland.
    Grass,
    /// Sandy desert.
    Desert,
    /// Flat plains.
    Plains,
    /// Broken, rocky ground.
    Rough,
    /// Molten lava.
    Lava,
    /// Snowfield.
    Snow,
    /// Boggy marsh.
    Marsh,
}

impl TerrainKind {
    /// Every terrain kind in declaration order.
    pub const ALL: [TerrainKind; 9] = [
        Self::Empty,
        Self::Water,
        Self::Grass,
        Self::Desert,
        Self::Plains,
        Self::Rough,
        Self::Lava,
        Self::Snow,
        Self::Marsh,
    ];

    /// Human readable name matching the variant identifier.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Empty => "Empty",
            Self::Water => "Water",
            Self::Grass => "Grass",
            Self::Desert => "Desert",
            Self::Plains => "Plains",
            Self::Rough => "Rough",
            Self::Lava => "Lava",
            Self::Snow => "Snow",
            Self::Marsh => "Marsh",
        }
    }

    const fn index(self) -> usize {
        match self {
            Self::Empty => 0,
            Self::Water => 1,
            Self::Grass => 2,
            Self::Desert => 3,
            Self::Plains => 4,
            Self::Rough => 5,
            Self::Lava => 6,
            Self::Snow => 7,
            Self::Marsh => 8,
        }
    }
}

impl fmt::Display for TerrainKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for TerrainKind {
    type Err = UnknownTerrain;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.name().eq_ignore_ascii_case(value.trim()))
            .ok_or_else(|| UnknownTerrain(value.to_owned()))
    }
}

/// Error returned when a terrain name does not match any [`TerrainKind`].
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("unknown terrain type `{0}`")]
pub struct UnknownTerrain(pub String);

const DEFAULT_MOVE_COSTS: [f32; 9] = [0.0, 5.0, 1.0, 1.2, 1.2, 1.5, 2.0, 2.0, 2.0];

/// Side table mapping each terrain kind to its movement cost and display asset.
///
/// The table always holds an entry for every [`TerrainKind`], so lookups
/// never fail. Configuration may override costs without widening the enum.
#[derive(Clone, Debug, PartialEq)]
pub struct TerrainTable {
    move_costs: [f32; 9],
}

impl Default for TerrainTable {
    fn default() -> Self {
        Self {
            move_costs: DEFAULT_MOVE_COSTS,
        }
    }
}

impl TerrainTable {
    /// Returns a copy of the table with the cost of `kind` replaced.
    #[must_use]
    pub fn with_cost(mut self, kind: TerrainKind, cost: f32) -> Self {
        self.set_cost(kind, cost);
        self
    }

    /// Overrides the movement cost of `kind`.
    pub fn set_cost(&mut self, kind: TerrainKind, cost: f32) {
        self.move_costs[kind.index()] = cost;
    }

    /// Movement cost multiplier for traversing terrain of the given kind.
    ///
    /// A cost of zero marks the terrain as impassable.
    #[must_use]
    pub fn move_cost(&self, kind: TerrainKind) -> f32 {
        self.move_costs[kind.index()]
    }

    /// Key of the display asset the renderer should use for the terrain.
    ///
    /// `Empty` tiles have no visual and report `None`.
    #[must_use]
    pub fn asset_key(&self, kind: TerrainKind) -> Option<String> {
        match kind {
            TerrainKind::Empty => None,
            other => Some(format!("Terrain_{}", other.name())),
        }
    }
}

/// Unique identifier assigned to a placed installed object.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct InstalledObjectId(u32);

impl InstalledObjectId {
    /// Creates a new identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for InstalledObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Describes how a prototype's movement-cost list was obtained.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CostSource {
    /// The caller supplied a list of the correct length.
    Provided,
    /// The caller supplied no costs; every cell defaulted to impassable.
    DefaultedEmpty,
    /// The caller supplied a list of the wrong length; it was replaced by zeros.
    CorrectedMismatch,
}

/// Invalid dimensions supplied while configuring the world or a prototype.
#[derive(Clone, Debug, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum ConfigurationError {
    /// The world must be at least one tile wide and tall.
    #[error("world dimensions must be positive, got {width}x{height}")]
    ZeroDimension {
        /// Requested width.
        width: u32,
        /// Requested height.
        height: u32,
    },
    /// The world would hold more than [`MAX_TILE_COUNT`] tiles.
    #[error("world of {width}x{height} tiles exceeds the limit of {limit} tiles", limit = MAX_TILE_COUNT)]
    WorldTooLarge {
        /// Requested width.
        width: u32,
        /// Requested height.
        height: u32,
    },
    /// Installed objects must cover at least one tile.
    #[error("installed object `{object_type}` must be at least 1x1, got {width}x{height}")]
    ZeroFootprint {
        /// Prototype name.
        object_type: String,
        /// Requested width.
        width: u32,
        /// Requested height.
        height: u32,
    },
    /// The footprint would cover more than [`MAX_TILE_COUNT`] tiles.
    #[error(
        "installed object `{object_type}` of {width}x{height} tiles exceeds the limit of {limit} tiles",
        limit = MAX_TILE_COUNT
    )]
    FootprintTooLarge {
        /// Prototype name.
        object_type: String,
        /// Requested width.
        width: u32,
        /// Requested height.
        height: u32,
    },
}

/// Reasons a prototype registration may be rejected.
#[derive(Clone, Debug, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum RegistryError {
    /// A prototype with the same name is already registered.
    #[error("installed object prototype `{0}` is already registered")]
    DuplicatePrototype(String),
}

/// Reasons an installed object placement may be rejected by the world.
#[derive(Clone, Debug, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum PlacementError {
    /// No prototype is registered under the requested name.
    #[error("no installed object prototype named `{0}`")]
    UnknownPrototype(String),
    /// The footprint extends beyond the world's bounds.
    #[error("footprint extends beyond the world bounds")]
    OutOfBounds,
    /// A tile of the footprint already holds an installed object.
    #[error("tile {tile} is already occupied by installed object {occupant}")]
    Occupied {
        /// First conflicting tile.
        tile: TileCoord,
        /// Object currently occupying the tile.
        occupant: InstalledObjectId,
    },
    /// Every installed object identifier has been handed out.
    #[error("no installed object identifiers remain")]
    IdentifiersExhausted,
}

/// Reasons an installed object removal may be rejected by the world.
#[derive(Clone, Debug, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum RemovalError {
    /// No installed object with the provided identifier exists.
    #[error("no installed object with identifier {0}")]
    MissingInstalledObject(InstalledObjectId),
}
