//! Installed object prototypes and their placed instances.
//!
//! Installed objects are static decorations that are neither terrain nor
//! interactable, such as trees, ponds or bridges. A [`Prototype`] describes the
//! shape and per-cell movement cost of one kind of object. Placing a prototype
//! produces an [`InstalledObject`] bound to a rectangular block of tiles whose
//! bottom-left corner is the base tile.

use tile_editor_core::{
    ConfigurationError, CostSource, FootprintSize, InstalledObjectId, TileCoord, TileRect,
};
use tracing::{error, info};

use crate::observers::{Observers, SubscriptionId};

/// Reusable template describing an installed object's type, shape and costs.
#[derive(Clone, Debug, PartialEq)]
pub struct Prototype {
    object_type: String,
    size: FootprintSize,
    movement_cost: Vec<f32>,
    cost_source: CostSource,
}

impl Prototype {
    /// Creates a prototype covering `width` by `height` tiles.
    ///
    /// `movement_cost` holds one multiplier per covered tile, ordered left to
    /// right then bottom to top. An empty list marks every cell impassable.
    /// A list of any other wrong length is replaced by an all-zero list and an
    /// error is logged; [`Prototype::cost_source`] reports the correction.
    /// Footprints must cover between one and
    /// [`MAX_TILE_COUNT`](tile_editor_core::MAX_TILE_COUNT) tiles.
    pub fn new(
        object_type: impl Into<String>,
        movement_cost: Vec<f32>,
        width: u32,
        height: u32,
    ) -> Result<Self, ConfigurationError> {
        let object_type = object_type.into();
        let size = FootprintSize::new(width, height);
        let cells = footprint_cells(&object_type, size)?;
        let (movement_cost, cost_source) = if movement_cost.is_empty() {
            info!(
                object_type = %object_type,
                cells,
                "no movement costs supplied, installed object is impassable"
            );
            (vec![0.0; cells], CostSource::DefaultedEmpty)
        } else if movement_cost.len() != cells {
            error!(
                object_type = %object_type,
                supplied = movement_cost.len(),
                expected = cells,
                "movement cost list does not match the footprint, defaulting to impassable"
            );
            (vec![0.0; cells], CostSource::CorrectedMismatch)
        } else {
            (movement_cost, CostSource::Provided)
        };

        Ok(Self {
            object_type,
            size,
            movement_cost,
            cost_source,
        })
    }

    /// Creates a prototype applying the same cost to every covered tile.
    pub fn uniform(
        object_type: impl Into<String>,
        cost: f32,
        width: u32,
        height: u32,
    ) -> Result<Self, ConfigurationError> {
        let object_type = object_type.into();
        let cells = footprint_cells(&object_type, FootprintSize::new(width, height))?;
        Self::new(object_type, vec![cost; cells], width, height)
    }

    /// Creates a single-tile prototype.
    #[must_use]
    pub fn single(object_type: impl Into<String>, cost: f32) -> Self {
        Self {
            object_type: object_type.into(),
            size: FootprintSize::new(1, 1),
            movement_cost: vec![cost],
            cost_source: CostSource::Provided,
        }
    }

    /// Name identifying the prototype within the world registry.
    #[must_use]
    pub fn object_type(&self) -> &str {
        &self.object_type
    }

    /// Footprint dimensions.
    #[must_use]
    pub const fn size(&self) -> FootprintSize {
        self.size
    }

    /// Width of the footprint in tiles.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.size.width()
    }

    /// Height of the footprint in tiles.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.size.height()
    }

    /// Per-cell movement cost multipliers.
    #[must_use]
    pub fn movement_cost(&self) -> &[f32] {
        &self.movement_cost
    }

    /// How the movement cost list was obtained.
    #[must_use]
    pub const fn cost_source(&self) -> CostSource {
        self.cost_source
    }

    /// Coordinates the prototype would cover when anchored at `base`.
    ///
    /// Cells are listed left to right, then bottom to top. Cells whose
    /// coordinates overflow are reported as `None`.
    #[must_use]
    pub fn footprint(&self, base: TileCoord) -> Vec<Option<TileCoord>> {
        let mut cells = Vec::with_capacity(self.size.area());
        for dy in 0..self.size.height() {
            for dx in 0..self.size.width() {
                cells.push(base.offset(dx, dy));
            }
        }
        cells
    }
}

fn footprint_cells(object_type: &str, size: FootprintSize) -> Result<usize, ConfigurationError> {
    if size.is_empty() {
        return Err(ConfigurationError::ZeroFootprint {
            object_type: object_type.to_owned(),
            width: size.width(),
            height: size.height(),
        });
    }
    size.checked_area().ok_or_else(|| ConfigurationError::FootprintTooLarge {
        object_type: object_type.to_owned(),
        width: size.width(),
        height: size.height(),
    })
}

/// An installed object placed into the world.
#[derive(Debug)]
pub struct InstalledObject {
    id: InstalledObjectId,
    object_type: String,
    size: FootprintSize,
    movement_cost: Vec<f32>,
    tiles: Vec<TileCoord>,
    state_changed: Observers<InstalledObject>,
}

impl InstalledObject {
    /// Binds a copy of the prototype's data to the provided tiles.
    ///
    /// `tiles` must follow [`Prototype::footprint`] ordering.
    pub(crate) fn from_prototype(
        id: InstalledObjectId,
        prototype: &Prototype,
        tiles: Vec<TileCoord>,
    ) -> Self {
        Self {
            id,
            object_type: prototype.object_type.clone(),
            size: prototype.size,
            movement_cost: prototype.movement_cost.clone(),
            tiles,
            state_changed: Observers::new(),
        }
    }

    /// Identifier assigned by the world.
    #[must_use]
    pub const fn id(&self) -> InstalledObjectId {
        self.id
    }

    /// Name of the prototype the object was created from.
    #[must_use]
    pub fn object_type(&self) -> &str {
        &self.object_type
    }

    /// Footprint dimensions.
    #[must_use]
    pub const fn size(&self) -> FootprintSize {
        self.size
    }

    /// Width of the footprint in tiles.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.size.width()
    }

    /// Height of the footprint in tiles.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.size.height()
    }

    /// Per-cell movement cost multipliers, in the same order as [`Self::tiles`].
    #[must_use]
    pub fn movement_cost(&self) -> &[f32] {
        &self.movement_cost
    }

    /// Occupied tiles, left to right then bottom to top from the base tile.
    #[must_use]
    pub fn tiles(&self) -> &[TileCoord] {
        &self.tiles
    }

    /// Bottom-left tile anchoring the object.
    #[must_use]
    pub fn base(&self) -> Option<TileCoord> {
        self.tiles.first().copied()
    }

    /// Block of tiles covered by the object.
    #[must_use]
    pub fn region(&self) -> Option<TileRect> {
        self.base()
            .map(|base| TileRect::from_origin_and_size(base, self.size))
    }

    /// Movement cost multiplier the object applies to the given tile.
    #[must_use]
    pub fn movement_cost_at(&self, tile: TileCoord) -> Option<f32> {
        let index = self.tiles.iter().position(|candidate| *candidate == tile)?;
        self.movement_cost.get(index).copied()
    }

    /// Registers a callback for changes to the object's own state.
    ///
    /// Placed objects are currently static, so nothing fires this channel yet.
    pub fn on_state_changed<F>(&mut self, callback: F) -> SubscriptionId
    where
        F: Fn(&InstalledObject) + 'static,
    {
        self.state_changed.subscribe(callback)
    }

    /// Removes a callback registered through [`InstalledObject::on_state_changed`].
    pub fn unsubscribe_state_changed(&mut self, id: SubscriptionId) -> bool {
        self.state_changed.unsubscribe(id)
    }
}
