//! Plain-text rendering of a world for terminal output.

use tile_editor_core::{TerrainKind, TileCoord};
use tile_editor_world::World;

/// Renders the world with the top row first, one glyph per tile.
///
/// Tiles holding an installed object show the first letter of its type.
pub(crate) fn render(world: &World) -> String {
    let width = usize::try_from(world.width()).unwrap_or(0);
    let height = usize::try_from(world.height()).unwrap_or(0);
    let mut output = String::with_capacity(width.saturating_add(1).saturating_mul(height));
    for y in (0..world.height()).rev() {
        for x in 0..world.width() {
            let coord = TileCoord::new(x, y);
            let glyph = match world.installed_object_at(coord) {
                Some(object) => object_glyph(object.object_type()),
                None => world
                    .tile(coord)
                    .map_or(' ', |tile| terrain_glyph(tile.terrain())),
            };
            output.push(glyph);
        }
        output.push('\n');
    }
    output
}

fn object_glyph(object_type: &str) -> char {
    object_type
        .chars()
        .next()
        .map_or('?', |glyph| glyph.to_ascii_uppercase())
}

const fn terrain_glyph(terrain: TerrainKind) -> char {
    match terrain {
        TerrainKind::Empty => '.',
        TerrainKind::Water => '~',
        TerrainKind::Grass => '"',
        TerrainKind::Desert => ':',
        TerrainKind::Plains => '_',
        TerrainKind::Rough => '^',
        TerrainKind::Lava => '!',
        TerrainKind::Snow => '*',
        TerrainKind::Marsh => '%',
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tile_editor_world::Prototype;

    #[test]
    fn renders_top_row_first_with_objects() {
        let mut world = World::new(3, 2).expect("valid dimensions");
        assert_eq!(world.set_terrain(TileCoord::new(0, 1), TerrainKind::Water), Some(true));
        world
            .register_prototype(Prototype::single("trees", 2.0))
            .expect("unique prototype");
        let _ = world
            .place_installed_object("trees", TileCoord::new(2, 0))
            .expect("placement succeeds");

        assert_eq!(render(&world), "~..\n..T\n");
    }
}
