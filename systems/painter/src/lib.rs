#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure editor system that turns pointer input into tile painting and placement commands.
//!
//! Adapters translate raw device input into [`PointerInput`] values expressed
//! in world space, where tile `(x, y)` is centred on the point `(x, y)`. The
//! painter tracks the band selection between the point where the primary
//! button went down and the current pointer, and emits world commands when
//! the button is released.

use glam::Vec2;
use tile_editor_core::{Command, TerrainKind, TileCoord, TileRect};
use tracing::debug;

/// Converts a world-space point into signed tile coordinates.
///
/// Tiles are centred on integer coordinates, so the point is shifted by half
/// a tile before flooring. The result may lie outside the world.
#[must_use]
pub fn tile_coord_at(point: Vec2) -> (i64, i64) {
    (
        (point.x + 0.5).floor() as i64,
        (point.y + 0.5).floor() as i64,
    )
}

/// What releasing the primary button produces.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BuildMode {
    /// Paint the selected band with a terrain kind.
    Terrain(TerrainKind),
    /// Place an installed object of the named prototype at the release tile.
    InstalledObject(String),
}

impl Default for BuildMode {
    fn default() -> Self {
        Self::Terrain(TerrainKind::Grass)
    }
}

/// Input snapshot distilled from adapter-provided frame input data.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointerInput {
    /// Pointer location in world space.
    pub position: Vec2,
    /// Indicates whether the primary button went down on this frame.
    pub pressed: bool,
    /// Indicates whether the primary button is held on this frame.
    pub held: bool,
    /// Indicates whether the primary button was released on this frame.
    pub released: bool,
    /// Indicates whether the pointer hovers a UI element.
    pub over_ui: bool,
}

impl PointerInput {
    /// Creates an idle input descriptor at the provided position.
    #[must_use]
    pub const fn at(position: Vec2) -> Self {
        Self {
            position,
            pressed: false,
            held: false,
            released: false,
            over_ui: false,
        }
    }
}

impl Default for PointerInput {
    fn default() -> Self {
        Self::at(Vec2::ZERO)
    }
}

/// Editor system that translates pointer drags into world commands.
#[derive(Clone, Debug, Default)]
pub struct Painter {
    build_mode: BuildMode,
    anchor: Option<(i64, i64)>,
    suppressed: bool,
    held: bool,
}

impl Painter {
    /// Creates a painter in the default terrain mode.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Active build mode.
    #[must_use]
    pub const fn build_mode(&self) -> &BuildMode {
        &self.build_mode
    }

    /// Switches the build mode. Any drag in progress keeps its anchor.
    pub fn set_build_mode(&mut self, build_mode: BuildMode) {
        self.build_mode = build_mode;
    }

    /// Consumes one frame of pointer input and emits the resulting commands.
    ///
    /// `dimensions` are the world's `(width, height)`; painted bands are
    /// clipped to them. A drag that starts over a UI element is ignored until
    /// the next press.
    pub fn handle(&mut self, input: PointerInput, dimensions: (u32, u32), out: &mut Vec<Command>) {
        let current = tile_coord_at(input.position);
        self.held = input.held;

        if input.pressed {
            self.suppressed = input.over_ui;
            self.anchor = if self.suppressed { None } else { Some(current) };
        }

        if !input.released {
            return;
        }
        self.held = false;
        let Some(anchor) = self.anchor.take() else {
            return;
        };
        if self.suppressed {
            return;
        }

        match &self.build_mode {
            BuildMode::Terrain(terrain) => {
                if let Some(region) = clip_band(anchor, current, dimensions) {
                    debug!(?region, %terrain, "painting terrain band");
                    out.push(Command::PaintTerrain {
                        region,
                        terrain: *terrain,
                    });
                }
            }
            BuildMode::InstalledObject(object_type) => {
                let Some(base) = in_bounds(current, dimensions) else {
                    return;
                };
                debug!(%base, object_type = object_type.as_str(), "placing installed object");
                out.push(Command::PlaceInstalledObject {
                    object_type: object_type.clone(),
                    base,
                });
            }
        }
    }

    /// Tiles covered by the drag in progress, for selection previews.
    ///
    /// Returns an empty list when no drag is active.
    #[must_use]
    pub fn selection(&self, position: Vec2, dimensions: (u32, u32)) -> Vec<TileCoord> {
        if !self.held || self.suppressed {
            return Vec::new();
        }
        self.anchor
            .and_then(|anchor| clip_band(anchor, tile_coord_at(position), dimensions))
            .map(|region| region.iter().collect())
            .unwrap_or_default()
    }
}

fn in_bounds(tile: (i64, i64), (width, height): (u32, u32)) -> Option<TileCoord> {
    let coord = TileCoord::from_signed(tile.0, tile.1)?;
    (coord.x() < width && coord.y() < height).then_some(coord)
}

fn clip_band(a: (i64, i64), b: (i64, i64), (width, height): (u32, u32)) -> Option<TileRect> {
    let max_x = i64::from(width) - 1;
    let max_y = i64::from(height) - 1;
    let start_x = a.0.min(b.0).max(0);
    let end_x = a.0.max(b.0).min(max_x);
    let start_y = a.1.min(b.1).max(0);
    let end_y = a.1.max(b.1).min(max_y);
    if start_x > end_x || start_y > end_y {
        return None;
    }

    let start = TileCoord::from_signed(start_x, start_y)?;
    let end = TileCoord::from_signed(end_x, end_y)?;
    Some(TileRect::from_corners(start, end))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tile_editor_core::FootprintSize;

    #[test]
    fn points_round_to_the_nearest_tile_centre() {
        assert_eq!(tile_coord_at(Vec2::new(2.49, -0.5)), (2, 0));
        assert_eq!(tile_coord_at(Vec2::new(-0.51, 0.0)), (-1, 0));
        assert_eq!(tile_coord_at(Vec2::new(3.5, 7.2)), (4, 7));
    }

    #[test]
    fn band_is_clipped_to_the_world() {
        let region = clip_band((-3, 8), (2, 12), (10, 10)).expect("band overlaps the world");
        assert_eq!(region.origin(), TileCoord::new(0, 8));
        assert_eq!(region.size(), FootprintSize::new(3, 2));
    }

    #[test]
    fn band_entirely_outside_is_discarded() {
        assert_eq!(clip_band((-5, -5), (-1, -2), (10, 10)), None);
        assert_eq!(clip_band((10, 0), (12, 3), (10, 10)), None);
    }
}
