#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative tile world state for the tile editor.
//!
//! The [`World`] owns a fixed-size grid of [`Tile`] values, a registry of
//! installed object [`Prototype`]s and every placed [`InstalledObject`].
//! Renderers keep their visuals in sync by subscribing to per-tile and
//! per-world notifications; editors drive changes either through the direct
//! methods or through the [`apply`] command entry point.

mod installed;
mod observers;
mod tile;

use std::collections::BTreeMap;

use tile_editor_core::{
    Command, ConfigurationError, Event, FootprintSize, InstalledObjectId, PlacementError,
    RegistryError, RemovalError, TerrainKind, TerrainTable, TileCoord,
};
use tracing::{info, warn};

pub use installed::{InstalledObject, Prototype};
pub use observers::{Observers, SubscriptionId};
pub use tile::Tile;

const DEFAULT_TERRAIN: TerrainKind = TerrainKind::Grass;

/// Represents one editable map and everything placed on it.
#[derive(Debug)]
pub struct World {
    width: u32,
    height: u32,
    tiles: Vec<Tile>,
    terrain_table: TerrainTable,
    default_terrain: TerrainKind,
    prototypes: BTreeMap<String, Prototype>,
    installed: BTreeMap<InstalledObjectId, InstalledObject>,
    next_installed_id: InstalledObjectId,
    installed_created: Observers<InstalledObject>,
    installed_destroyed: Observers<InstalledObject>,
}

impl World {
    /// Creates a world of `width` by `height` tiles, all initially empty.
    ///
    /// Both dimensions must be positive and the grid may hold at most
    /// [`MAX_TILE_COUNT`](tile_editor_core::MAX_TILE_COUNT) tiles.
    pub fn new(width: u32, height: u32) -> Result<Self, ConfigurationError> {
        let size = FootprintSize::new(width, height);
        if size.is_empty() {
            return Err(ConfigurationError::ZeroDimension { width, height });
        }
        let capacity = size
            .checked_area()
            .ok_or(ConfigurationError::WorldTooLarge { width, height })?;

        let mut tiles = Vec::with_capacity(capacity);
        for y in 0..height {
            for x in 0..width {
                tiles.push(Tile::new(TileCoord::new(x, y)));
            }
        }
        info!(width, height, tiles = tiles.len(), "world created");

        Ok(Self {
            width,
            height,
            tiles,
            terrain_table: TerrainTable::default(),
            default_terrain: DEFAULT_TERRAIN,
            prototypes: BTreeMap::new(),
            installed: BTreeMap::new(),
            next_installed_id: InstalledObjectId::new(0),
            installed_created: Observers::new(),
            installed_destroyed: Observers::new(),
        })
    }

    /// Replaces the terrain cost table.
    #[must_use]
    pub fn with_terrain_table(mut self, terrain_table: TerrainTable) -> Self {
        self.terrain_table = terrain_table;
        self
    }

    /// Changes the terrain used by [`World::initialize_tiles`].
    pub fn set_default_terrain(&mut self, terrain: TerrainKind) {
        self.default_terrain = terrain;
    }

    /// Number of tile columns.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Number of tile rows.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Terrain cost and asset table used by this world.
    #[must_use]
    pub const fn terrain_table(&self) -> &TerrainTable {
        &self.terrain_table
    }

    /// Terrain applied by [`World::initialize_tiles`].
    #[must_use]
    pub const fn default_terrain(&self) -> TerrainKind {
        self.default_terrain
    }

    /// Reports whether the coordinate lies inside the grid.
    #[must_use]
    pub const fn contains(&self, coord: TileCoord) -> bool {
        coord.x() < self.width && coord.y() < self.height
    }

    /// Returns the tile at signed coordinates, or `None` when out of range.
    ///
    /// Out-of-range lookups are expected (for example pointer drags past the
    /// map edge) and are not logged.
    #[must_use]
    pub fn tile_at(&self, x: i64, y: i64) -> Option<&Tile> {
        self.tile(TileCoord::from_signed(x, y)?)
    }

    /// Returns the tile at the coordinate, or `None` when out of range.
    #[must_use]
    pub fn tile(&self, coord: TileCoord) -> Option<&Tile> {
        self.index(coord).and_then(|index| self.tiles.get(index))
    }

    /// Returns mutable access to the tile at the coordinate.
    pub fn tile_mut(&mut self, coord: TileCoord) -> Option<&mut Tile> {
        let index = self.index(coord)?;
        self.tiles.get_mut(index)
    }

    /// Iterates every tile, row by row from the bottom row upwards.
    pub fn tiles(&self) -> impl Iterator<Item = &Tile> {
        self.tiles.iter()
    }

    /// Changes the terrain of one tile.
    ///
    /// Returns `None` when the coordinate is out of range, otherwise whether
    /// the terrain actually changed.
    pub fn set_terrain(&mut self, coord: TileCoord, terrain: TerrainKind) -> Option<bool> {
        self.tile_mut(coord).map(|tile| tile.set_terrain(terrain))
    }

    /// Resets every tile to the default terrain.
    ///
    /// Tiles already holding the default terrain fire no notification, so a
    /// second call changes nothing. Returns the number of tiles that changed.
    pub fn initialize_tiles(&mut self) -> usize {
        let terrain = self.default_terrain;
        self.tiles
            .iter_mut()
            .map(|tile| tile.set_terrain(terrain))
            .filter(|changed| *changed)
            .count()
    }

    /// Adds a prototype to the registry under its object type name.
    pub fn register_prototype(&mut self, prototype: Prototype) -> Result<(), RegistryError> {
        let name = prototype.object_type().to_owned();
        if self.prototypes.contains_key(&name) {
            warn!(object_type = %name, "installed object prototype already registered");
            return Err(RegistryError::DuplicatePrototype(name));
        }
        info!(
            object_type = %name,
            width = prototype.width(),
            height = prototype.height(),
            "registered installed object prototype"
        );
        let _ = self.prototypes.insert(name, prototype);
        Ok(())
    }

    /// Looks up a registered prototype by name.
    #[must_use]
    pub fn prototype(&self, object_type: &str) -> Option<&Prototype> {
        self.prototypes.get(object_type)
    }

    /// Iterates the registered prototypes ordered by name.
    pub fn prototypes(&self) -> impl Iterator<Item = &Prototype> {
        self.prototypes.values()
    }

    /// Places an instance of the named prototype with its bottom-left corner on `base`.
    ///
    /// The footprint is validated before any tile is touched: if a cell lies
    /// outside the world or is already occupied, nothing changes. On success
    /// every covered tile references the new object and creation observers
    /// are notified once.
    pub fn place_installed_object(
        &mut self,
        object_type: &str,
        base: TileCoord,
    ) -> Result<InstalledObjectId, PlacementError> {
        let Some(prototype) = self.prototypes.get(object_type) else {
            warn!(object_type, "no installed object prototype with this name");
            return Err(PlacementError::UnknownPrototype(object_type.to_owned()));
        };

        let mut covered = Vec::with_capacity(prototype.size().area());
        for cell in prototype.footprint(base) {
            let Some(tile) = cell.and_then(|cell| self.tile(cell)) else {
                warn!(
                    object_type,
                    x = base.x(),
                    y = base.y(),
                    "installed object footprint extends beyond the world"
                );
                return Err(PlacementError::OutOfBounds);
            };
            if let Some(occupant) = tile.installed_object() {
                warn!(
                    object_type,
                    x = tile.x(),
                    y = tile.y(),
                    occupant = occupant.get(),
                    "installed object footprint overlaps an occupied tile"
                );
                return Err(PlacementError::Occupied {
                    tile: tile.coord(),
                    occupant,
                });
            }
            covered.push(tile.coord());
        }

        let id = self.next_installed_id;
        let Some(next_id) = id.get().checked_add(1) else {
            warn!(object_type, "installed object identifiers exhausted");
            return Err(PlacementError::IdentifiersExhausted);
        };
        let object = InstalledObject::from_prototype(id, prototype, covered);
        for &coord in object.tiles() {
            if let Some(tile) = self.tile_mut(coord) {
                tile.set_installed_object(Some(id))?;
            }
        }
        self.next_installed_id = InstalledObjectId::new(next_id);
        let _ = self.installed.insert(id, object);

        if let Some(object) = self.installed.get(&id) {
            info!(
                object_type,
                id = id.get(),
                x = base.x(),
                y = base.y(),
                "installed object created"
            );
            self.installed_created.notify(object);
        }
        Ok(id)
    }

    /// Removes a placed object, clearing its tiles and notifying destruction observers.
    pub fn remove_installed_object(
        &mut self,
        id: InstalledObjectId,
    ) -> Result<InstalledObject, RemovalError> {
        let Some(object) = self.installed.remove(&id) else {
            warn!(id = id.get(), "tried to remove an installed object that does not exist");
            return Err(RemovalError::MissingInstalledObject(id));
        };

        for &coord in object.tiles() {
            if let Some(tile) = self.tile_mut(coord) {
                if tile.installed_object() == Some(id) {
                    let _ = tile.set_installed_object(None);
                }
            }
        }
        info!(
            object_type = object.object_type(),
            id = id.get(),
            "installed object destroyed"
        );
        self.installed_destroyed.notify(&object);
        Ok(object)
    }

    /// Looks up a placed object by identifier.
    #[must_use]
    pub fn installed_object(&self, id: InstalledObjectId) -> Option<&InstalledObject> {
        self.installed.get(&id)
    }

    /// Mutable access to a placed object, for example to subscribe to it.
    pub fn installed_object_mut(&mut self, id: InstalledObjectId) -> Option<&mut InstalledObject> {
        self.installed.get_mut(&id)
    }

    /// Returns the object occupying the tile, if any.
    #[must_use]
    pub fn installed_object_at(&self, coord: TileCoord) -> Option<&InstalledObject> {
        self.tile(coord)
            .and_then(Tile::installed_object)
            .and_then(|id| self.installed.get(&id))
    }

    /// Iterates every placed object ordered by identifier.
    pub fn installed_objects(&self) -> impl Iterator<Item = &InstalledObject> {
        self.installed.values()
    }

    /// Effective movement cost of a tile.
    ///
    /// The terrain cost is multiplied by the per-cell multiplier of the
    /// occupying installed object, if any. Zero means impassable.
    #[must_use]
    pub fn movement_cost(&self, coord: TileCoord) -> Option<f32> {
        let tile = self.tile(coord)?;
        let terrain_cost = tile.move_cost(&self.terrain_table);
        let modifier = self
            .installed_object_at(coord)
            .and_then(|object| object.movement_cost_at(coord))
            .unwrap_or(1.0);
        Some(terrain_cost * modifier)
    }

    /// Registers a callback invoked after each successful placement.
    pub fn on_installed_object_created<F>(&mut self, callback: F) -> SubscriptionId
    where
        F: Fn(&InstalledObject) + 'static,
    {
        self.installed_created.subscribe(callback)
    }

    /// Removes a callback registered through [`World::on_installed_object_created`].
    pub fn unsubscribe_installed_object_created(&mut self, id: SubscriptionId) -> bool {
        self.installed_created.unsubscribe(id)
    }

    /// Registers a callback invoked after each removal.
    pub fn on_installed_object_destroyed<F>(&mut self, callback: F) -> SubscriptionId
    where
        F: Fn(&InstalledObject) + 'static,
    {
        self.installed_destroyed.subscribe(callback)
    }

    /// Removes a callback registered through [`World::on_installed_object_destroyed`].
    pub fn unsubscribe_installed_object_destroyed(&mut self, id: SubscriptionId) -> bool {
        self.installed_destroyed.unsubscribe(id)
    }

    fn index(&self, coord: TileCoord) -> Option<usize> {
        if !self.contains(coord) {
            return None;
        }
        let row = usize::try_from(coord.y()).ok()?;
        let column = usize::try_from(coord.x()).ok()?;
        let width = usize::try_from(self.width).ok()?;
        Some(row * width + column)
    }
}

/// Applies the provided command to the world and reports what changed.
///
/// Observer callbacks fire while the command executes; the returned events
/// describe the same changes for systems that consume event streams.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::InitializeTiles => {
            let terrain = world.default_terrain();
            for tile in world.tiles.iter_mut() {
                let from = tile.terrain();
                if tile.set_terrain(terrain) {
                    out_events.push(Event::TerrainChanged {
                        tile: tile.coord(),
                        from,
                        to: terrain,
                    });
                }
            }
        }
        Command::PaintTerrain { region, terrain } => {
            for coord in region.iter() {
                let Some(tile) = world.tile_mut(coord) else {
                    continue;
                };
                let from = tile.terrain();
                if tile.set_terrain(terrain) {
                    out_events.push(Event::TerrainChanged {
                        tile: coord,
                        from,
                        to: terrain,
                    });
                }
            }
        }
        Command::PlaceInstalledObject { object_type, base } => {
            match world.place_installed_object(&object_type, base) {
                Ok(id) => {
                    if let Some(region) = world.installed_object(id).and_then(InstalledObject::region)
                    {
                        out_events.push(Event::InstalledObjectPlaced {
                            id,
                            object_type,
                            region,
                        });
                    }
                }
                Err(reason) => out_events.push(Event::PlacementRejected {
                    object_type,
                    base,
                    reason,
                }),
            }
        }
        Command::RemoveInstalledObject { id } => match world.remove_installed_object(id) {
            Ok(object) => {
                if let Some(region) = object.region() {
                    out_events.push(Event::InstalledObjectRemoved { id, region });
                }
            }
            Err(reason) => out_events.push(Event::RemovalRejected { id, reason }),
        },
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use super::{InstalledObject, Prototype, Tile, World};
    use tile_editor_core::{InstalledObjectId, TerrainKind, TileCoord};

    /// Dimensions of the world as `(width, height)`.
    #[must_use]
    pub fn dimensions(world: &World) -> (u32, u32) {
        (world.width(), world.height())
    }

    /// Retrieves the tile at signed coordinates.
    #[must_use]
    pub fn tile_at(world: &World, x: i64, y: i64) -> Option<&Tile> {
        world.tile_at(x, y)
    }

    /// Looks up a registered prototype by name.
    #[must_use]
    pub fn prototype<'world>(world: &'world World, object_type: &str) -> Option<&'world Prototype> {
        world.prototype(object_type)
    }

    /// Returns the identifier of the object occupying the tile, if any.
    #[must_use]
    pub fn installed_object_id_at(world: &World, coord: TileCoord) -> Option<InstalledObjectId> {
        world.tile(coord).and_then(Tile::installed_object)
    }

    /// Returns the object occupying the tile, if any.
    #[must_use]
    pub fn installed_object_at(world: &World, coord: TileCoord) -> Option<&InstalledObject> {
        world.installed_object_at(coord)
    }

    /// Captures a dense snapshot of every tile's terrain.
    #[must_use]
    pub fn terrain_view(world: &World) -> TerrainView {
        TerrainView {
            width: world.width(),
            height: world.height(),
            cells: world.tiles().map(Tile::terrain).collect(),
        }
    }

    /// Dense row-major snapshot of tile terrain, bottom row first.
    #[derive(Clone, Debug, PartialEq, Eq)]
    pub struct TerrainView {
        width: u32,
        height: u32,
        cells: Vec<TerrainKind>,
    }

    impl TerrainView {
        /// Terrain recorded for the coordinate, if it lies inside the snapshot.
        #[must_use]
        pub fn terrain(&self, coord: TileCoord) -> Option<TerrainKind> {
            if coord.x() >= self.width || coord.y() >= self.height {
                return None;
            }
            let index = usize::try_from(coord.y()).ok()? * usize::try_from(self.width).ok()?
                + usize::try_from(coord.x()).ok()?;
            self.cells.get(index).copied()
        }

        /// Iterates the rows of the snapshot from the bottom row upwards.
        pub fn rows(&self) -> impl Iterator<Item = &[TerrainKind]> {
            let width = usize::try_from(self.width).unwrap_or(usize::MAX).max(1);
            self.cells.chunks(width)
        }

        /// Provides the dimensions of the snapshot.
        #[must_use]
        pub const fn dimensions(&self) -> (u32, u32) {
            (self.width, self.height)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tile_editor_core::TileRect;

    fn world_with_trees() -> World {
        let mut world = World::new(10, 10).expect("valid dimensions");
        world
            .register_prototype(Prototype::uniform("Trees", 2.0, 2, 2).expect("valid footprint"))
            .expect("unique prototype");
        world
    }

    #[test]
    fn zero_dimensions_are_rejected() {
        assert_eq!(
            World::new(0, 5).map(|_| ()),
            Err(ConfigurationError::ZeroDimension {
                width: 0,
                height: 5
            })
        );
        assert!(World::new(4, 0).is_err());
    }

    #[test]
    fn oversized_dimensions_are_rejected() {
        assert_eq!(
            World::new(u32::MAX, u32::MAX).map(|_| ()),
            Err(ConfigurationError::WorldTooLarge {
                width: u32::MAX,
                height: u32::MAX
            })
        );
        assert!(matches!(
            World::new(5000, 5000),
            Err(ConfigurationError::WorldTooLarge { .. })
        ));
    }

    #[test]
    fn exhausted_identifiers_leave_the_world_untouched() {
        let mut world = world_with_trees();
        world.next_installed_id = InstalledObjectId::new(u32::MAX);

        let result = world.place_installed_object("Trees", TileCoord::new(0, 0));

        assert_eq!(result, Err(PlacementError::IdentifiersExhausted));
        assert!(world.installed_objects().next().is_none());
        assert!(world.tiles().all(|tile| tile.installed_object().is_none()));
    }

    #[test]
    fn tiles_are_laid_out_row_major() {
        let world = World::new(3, 2).expect("valid dimensions");
        let coords: Vec<_> = world.tiles().map(Tile::coord).collect();
        assert_eq!(coords.len(), 6);
        assert_eq!(coords[0], TileCoord::new(0, 0));
        assert_eq!(coords[2], TileCoord::new(2, 0));
        assert_eq!(coords[3], TileCoord::new(0, 1));
    }

    #[test]
    fn apply_paint_reports_each_change() {
        let mut world = World::new(4, 4).expect("valid dimensions");
        let mut events = Vec::new();
        assert_eq!(world.set_terrain(TileCoord::new(1, 1), TerrainKind::Water), Some(true));

        apply(
            &mut world,
            Command::PaintTerrain {
                region: TileRect::from_corners(TileCoord::new(0, 0), TileCoord::new(1, 1)),
                terrain: TerrainKind::Water,
            },
            &mut events,
        );

        assert_eq!(events.len(), 3, "tile (1, 1) already held water");
        assert!(events.contains(&Event::TerrainChanged {
            tile: TileCoord::new(0, 1),
            from: TerrainKind::Empty,
            to: TerrainKind::Water,
        }));
    }

    #[test]
    fn apply_paint_skips_cells_outside_the_world() {
        let mut world = World::new(2, 2).expect("valid dimensions");
        let mut events = Vec::new();

        apply(
            &mut world,
            Command::PaintTerrain {
                region: TileRect::from_corners(TileCoord::new(1, 1), TileCoord::new(5, 5)),
                terrain: TerrainKind::Snow,
            },
            &mut events,
        );

        assert_eq!(events.len(), 1);
        assert_eq!(
            world.tile(TileCoord::new(1, 1)).map(Tile::terrain),
            Some(TerrainKind::Snow)
        );
    }

    #[test]
    fn apply_initialize_reports_changed_tiles_only() {
        let mut world = World::new(2, 2).expect("valid dimensions");
        let mut events = Vec::new();
        assert_eq!(world.set_terrain(TileCoord::new(0, 0), TerrainKind::Grass), Some(true));

        apply(&mut world, Command::InitializeTiles, &mut events);
        assert_eq!(events.len(), 3);

        events.clear();
        apply(&mut world, Command::InitializeTiles, &mut events);
        assert!(events.is_empty());
    }

    #[test]
    fn apply_place_and_remove_round_trip() {
        let mut world = world_with_trees();
        let mut events = Vec::new();

        apply(
            &mut world,
            Command::PlaceInstalledObject {
                object_type: "Trees".to_owned(),
                base: TileCoord::new(2, 3),
            },
            &mut events,
        );
        let Some(Event::InstalledObjectPlaced { id, region, .. }) = events.first().cloned() else {
            panic!("expected placement event, got {events:?}");
        };
        assert_eq!(region.origin(), TileCoord::new(2, 3));

        events.clear();
        apply(&mut world, Command::RemoveInstalledObject { id }, &mut events);
        assert_eq!(events, vec![Event::InstalledObjectRemoved { id, region }]);
        assert!(query::installed_object_at(&world, TileCoord::new(3, 4)).is_none());
    }

    #[test]
    fn apply_reports_unknown_prototype() {
        let mut world = world_with_trees();
        let mut events = Vec::new();

        apply(
            &mut world,
            Command::PlaceInstalledObject {
                object_type: "Boulder".to_owned(),
                base: TileCoord::new(0, 0),
            },
            &mut events,
        );

        assert_eq!(
            events,
            vec![Event::PlacementRejected {
                object_type: "Boulder".to_owned(),
                base: TileCoord::new(0, 0),
                reason: PlacementError::UnknownPrototype("Boulder".to_owned()),
            }]
        );
    }

    #[test]
    fn apply_reports_missing_removal_target() {
        let mut world = world_with_trees();
        let mut events = Vec::new();
        let id = InstalledObjectId::new(42);

        apply(&mut world, Command::RemoveInstalledObject { id }, &mut events);

        assert_eq!(
            events,
            vec![Event::RemovalRejected {
                id,
                reason: RemovalError::MissingInstalledObject(id),
            }]
        );
    }

    #[test]
    fn terrain_view_matches_tiles() {
        let mut world = World::new(3, 2).expect("valid dimensions");
        assert_eq!(world.set_terrain(TileCoord::new(2, 1), TerrainKind::Lava), Some(true));

        let view = query::terrain_view(&world);
        assert_eq!(view.dimensions(), (3, 2));
        assert_eq!(view.terrain(TileCoord::new(2, 1)), Some(TerrainKind::Lava));
        assert_eq!(view.terrain(TileCoord::new(3, 1)), None);
        assert_eq!(view.rows().count(), 2);
    }

    #[test]
    fn movement_cost_combines_terrain_and_object() {
        let mut world = world_with_trees();
        let _ = world.initialize_tiles();
        let id = world
            .place_installed_object("Trees", TileCoord::new(0, 0))
            .expect("placement succeeds");

        assert_eq!(world.movement_cost(TileCoord::new(1, 1)), Some(2.0));
        assert_eq!(world.movement_cost(TileCoord::new(2, 2)), Some(1.0));
        assert_eq!(world.movement_cost(TileCoord::new(10, 0)), None);
        assert!(world.installed_object(id).is_some());
    }
}
