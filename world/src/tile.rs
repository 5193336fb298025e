//! Individual grid cells owned by the world.

use tile_editor_core::{InstalledObjectId, PlacementError, TerrainKind, TerrainTable, TileCoord};
use tracing::{debug, warn};

use crate::observers::{Observers, SubscriptionId};

/// A single cell of the world grid.
///
/// Tiles are created once by the [`World`](crate::World) and live as long as
/// it does. Coordinates never change; terrain and occupancy mutate over the
/// tile's life. Navigation to neighbouring tiles or to the occupying object
/// goes through the world by coordinate or identifier.
#[derive(Debug)]
pub struct Tile {
    coord: TileCoord,
    terrain: TerrainKind,
    installed_object: Option<InstalledObjectId>,
    type_changed: Observers<Tile>,
}

impl Tile {
    pub(crate) fn new(coord: TileCoord) -> Self {
        Self {
            coord,
            terrain: TerrainKind::Empty,
            installed_object: None,
            type_changed: Observers::new(),
        }
    }

    /// Coordinate of the tile within its world.
    #[must_use]
    pub const fn coord(&self) -> TileCoord {
        self.coord
    }

    /// Zero-based column of the tile.
    #[must_use]
    pub const fn x(&self) -> u32 {
        self.coord.x()
    }

    /// Zero-based row of the tile.
    #[must_use]
    pub const fn y(&self) -> u32 {
        self.coord.y()
    }

    /// Base terrain classification of the tile.
    #[must_use]
    pub const fn terrain(&self) -> TerrainKind {
        self.terrain
    }

    /// Changes the terrain, notifying type-changed observers once.
    ///
    /// Assigning the terrain the tile already holds is a no-op and fires no
    /// notification. Returns whether the terrain actually changed.
    pub fn set_terrain(&mut self, terrain: TerrainKind) -> bool {
        if self.terrain == terrain {
            return false;
        }
        self.terrain = terrain;
        self.type_changed.notify(self);
        true
    }

    /// Movement cost of the terrain under this tile.
    ///
    /// Modifiers from installed objects are applied by
    /// [`World::movement_cost`](crate::World::movement_cost).
    #[must_use]
    pub fn move_cost(&self, table: &TerrainTable) -> f32 {
        table.move_cost(self.terrain)
    }

    /// Identifier of the installed object occupying the tile, if any.
    #[must_use]
    pub const fn installed_object(&self) -> Option<InstalledObjectId> {
        self.installed_object
    }

    /// Reports whether an installed object occupies the tile.
    #[must_use]
    pub const fn is_occupied(&self) -> bool {
        self.installed_object.is_some()
    }

    /// Updates the occupancy slot.
    ///
    /// Clearing always succeeds. Occupying an already occupied tile is
    /// rejected and the current occupant is kept.
    pub(crate) fn set_installed_object(
        &mut self,
        object: Option<InstalledObjectId>,
    ) -> Result<(), PlacementError> {
        match (object, self.installed_object) {
            (None, previous) => {
                if let Some(previous) = previous {
                    debug!(
                        x = self.x(),
                        y = self.y(),
                        object = previous.get(),
                        "removed installed object from tile"
                    );
                }
                self.installed_object = None;
                Ok(())
            }
            (Some(requested), Some(occupant)) => {
                warn!(
                    x = self.x(),
                    y = self.y(),
                    requested = requested.get(),
                    occupant = occupant.get(),
                    "tried to place an installed object on a tile that already has one"
                );
                Err(PlacementError::Occupied {
                    tile: self.coord,
                    occupant,
                })
            }
            (Some(requested), None) => {
                self.installed_object = Some(requested);
                debug!(
                    x = self.x(),
                    y = self.y(),
                    object = requested.get(),
                    "installed object placed on tile"
                );
                Ok(())
            }
        }
    }

    /// Registers a callback invoked with the tile after each terrain change.
    ///
    /// The caller is responsible for unsubscribing before discarding any state
    /// the callback captures.
    pub fn on_type_changed<F>(&mut self, callback: F) -> SubscriptionId
    where
        F: Fn(&Tile) + 'static,
    {
        self.type_changed.subscribe(callback)
    }

    /// Removes a callback registered through [`Tile::on_type_changed`].
    pub fn unsubscribe_type_changed(&mut self, id: SubscriptionId) -> bool {
        self.type_changed.unsubscribe(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{cell::Cell, rc::Rc};

    #[test]
    fn new_tile_is_empty_and_unoccupied() {
        let tile = Tile::new(TileCoord::new(3, 4));
        assert_eq!(tile.x(), 3);
        assert_eq!(tile.y(), 4);
        assert_eq!(tile.terrain(), TerrainKind::Empty);
        assert!(!tile.is_occupied());
    }

    #[test]
    fn clearing_an_empty_slot_succeeds() {
        let mut tile = Tile::new(TileCoord::new(0, 0));
        assert_eq!(tile.set_installed_object(None), Ok(()));
        assert_eq!(tile.installed_object(), None);
    }

    #[test]
    fn second_occupant_is_rejected() {
        let mut tile = Tile::new(TileCoord::new(1, 1));
        let first = InstalledObjectId::new(1);
        let second = InstalledObjectId::new(2);

        assert_eq!(tile.set_installed_object(Some(first)), Ok(()));
        assert_eq!(
            tile.set_installed_object(Some(second)),
            Err(PlacementError::Occupied {
                tile: TileCoord::new(1, 1),
                occupant: first,
            })
        );
        assert_eq!(tile.installed_object(), Some(first));

        assert_eq!(tile.set_installed_object(None), Ok(()));
        assert_eq!(tile.set_installed_object(Some(second)), Ok(()));
        assert_eq!(tile.installed_object(), Some(second));
    }

    #[test]
    fn move_cost_follows_terrain_table() {
        let mut tile = Tile::new(TileCoord::new(0, 0));
        let table = TerrainTable::default().with_cost(TerrainKind::Water, 7.0);
        assert_eq!(tile.move_cost(&table), 0.0);
        assert!(tile.set_terrain(TerrainKind::Water));
        assert_eq!(tile.move_cost(&table), 7.0);
    }

    #[test]
    fn callback_observes_updated_terrain() {
        let mut tile = Tile::new(TileCoord::new(2, 2));
        let seen = Rc::new(Cell::new(TerrainKind::Empty));
        let _ = {
            let seen = Rc::clone(&seen);
            tile.on_type_changed(move |tile| seen.set(tile.terrain()))
        };

        assert!(tile.set_terrain(TerrainKind::Lava));
        assert_eq!(seen.get(), TerrainKind::Lava);
    }
}
