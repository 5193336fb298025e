//! Parsers for the scripted edits accepted on the command line.

use std::{error::Error, fmt};

use tile_editor_core::{Command, TerrainKind, TileCoord, TileRect, UnknownTerrain};

const TERRAIN_DELIMITER: char = '=';
const RANGE_DELIMITER: char = ':';
const OBJECT_DELIMITER: char = '@';

/// Errors that can occur while parsing scripted edits.
#[derive(Debug)]
pub(crate) enum ScriptError {
    /// The paint edit did not name a terrain after `=`.
    MissingTerrain(String),
    /// The place edit did not name a base tile after `@`.
    MissingBase(String),
    /// The place edit named an empty prototype.
    MissingObjectType(String),
    /// A coordinate pair could not be parsed.
    InvalidCoordinate(String),
    /// The terrain name is not known.
    UnknownTerrain(UnknownTerrain),
}

impl fmt::Display for ScriptError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingTerrain(value) => {
                write!(f, "paint edit '{value}' is missing '=<terrain>'")
            }
            Self::MissingBase(value) => write!(f, "place edit '{value}' is missing '@x,y'"),
            Self::MissingObjectType(value) => {
                write!(f, "place edit '{value}' is missing the object type")
            }
            Self::InvalidCoordinate(value) => {
                write!(f, "could not parse tile coordinate '{value}'")
            }
            Self::UnknownTerrain(error) => write!(f, "{error}"),
        }
    }
}

impl Error for ScriptError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::UnknownTerrain(error) => Some(error),
            _ => None,
        }
    }
}

/// Parses `x,y=Terrain` or `x0,y0:x1,y1=Terrain` into a paint command.
pub(crate) fn parse_paint(value: &str) -> Result<Command, ScriptError> {
    let (range, terrain) = value
        .trim()
        .split_once(TERRAIN_DELIMITER)
        .ok_or_else(|| ScriptError::MissingTerrain(value.to_owned()))?;
    let terrain: TerrainKind = terrain.parse().map_err(ScriptError::UnknownTerrain)?;

    let region = match range.split_once(RANGE_DELIMITER) {
        Some((start, end)) => TileRect::from_corners(parse_coord(start)?, parse_coord(end)?),
        None => {
            let tile = parse_coord(range)?;
            TileRect::from_corners(tile, tile)
        }
    };

    Ok(Command::PaintTerrain { region, terrain })
}

/// Parses `Name@x,y` into a placement command.
pub(crate) fn parse_place(value: &str) -> Result<Command, ScriptError> {
    let (object_type, base) = value
        .trim()
        .split_once(OBJECT_DELIMITER)
        .ok_or_else(|| ScriptError::MissingBase(value.to_owned()))?;
    let object_type = object_type.trim();
    if object_type.is_empty() {
        return Err(ScriptError::MissingObjectType(value.to_owned()));
    }

    Ok(Command::PlaceInstalledObject {
        object_type: object_type.to_owned(),
        base: parse_coord(base)?,
    })
}

fn parse_coord(value: &str) -> Result<TileCoord, ScriptError> {
    let invalid = || ScriptError::InvalidCoordinate(value.to_owned());
    let (x, y) = value.split_once(',').ok_or_else(invalid)?;
    let x = x.trim().parse::<u32>().map_err(|_| invalid())?;
    let y = y.trim().parse::<u32>().map_err(|_| invalid())?;
    Ok(TileCoord::new(x, y))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paint_accepts_ranges_in_any_order() {
        let command = parse_paint("4,3:1,0=water").expect("edit parses");
        assert_eq!(
            command,
            Command::PaintTerrain {
                region: TileRect::from_corners(TileCoord::new(1, 0), TileCoord::new(4, 3)),
                terrain: TerrainKind::Water,
            }
        );
    }

    #[test]
    fn paint_accepts_a_single_tile() {
        let command = parse_paint("2,2=Lava").expect("edit parses");
        let Command::PaintTerrain { region, .. } = command else {
            panic!("expected a paint command");
        };
        assert_eq!(region.iter().collect::<Vec<_>>(), vec![TileCoord::new(2, 2)]);
    }

    #[test]
    fn paint_rejects_unknown_terrain() {
        assert!(matches!(
            parse_paint("0,0=Swamp"),
            Err(ScriptError::UnknownTerrain(_))
        ));
        assert!(matches!(
            parse_paint("0,0"),
            Err(ScriptError::MissingTerrain(_))
        ));
    }

    #[test]
    fn place_parses_name_and_base() {
        assert_eq!(
            parse_place("Trees@5,6").expect("edit parses"),
            Command::PlaceInstalledObject {
                object_type: "Trees".to_owned(),
                base: TileCoord::new(5, 6),
            }
        );
    }

    #[test]
    fn place_rejects_malformed_input() {
        assert!(matches!(parse_place("Trees"), Err(ScriptError::MissingBase(_))));
        assert!(matches!(
            parse_place("@1,1"),
            Err(ScriptError::MissingObjectType(_))
        ));
        assert!(matches!(
            parse_place("Trees@-1,1"),
            Err(ScriptError::InvalidCoordinate(_))
        ));
    }
}
