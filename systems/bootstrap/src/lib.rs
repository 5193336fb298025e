#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Bootstrap system that prepares a world from its configuration.
//!
//! A [`WorldConfig`] describes the map size, the terrain painted on start-up,
//! terrain cost overrides and the installed object prototypes available to
//! the editor. [`Bootstrap::build`] turns it into a ready [`World`].

use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tile_editor_core::{ConfigurationError, RegistryError, TerrainKind, TerrainTable, UnknownTerrain};
use tile_editor_world::{Prototype, World};
use tracing::{info, warn};

const DEFAULT_WORLD_WIDTH: u32 = 100;
const DEFAULT_WORLD_HEIGHT: u32 = 100;

/// Errors raised while loading configuration or building the world.
#[derive(Debug, Error)]
pub enum BootstrapError {
    /// The configuration file could not be read.
    #[error("failed to read world configuration at {}", path.display())]
    Io {
        /// Location of the configuration file.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },
    /// The configuration file is not valid TOML for [`WorldConfig`].
    #[error("failed to parse world configuration")]
    Parse(#[from] toml::de::Error),
    /// A terrain cost override names a terrain that does not exist.
    #[error(transparent)]
    UnknownTerrain(#[from] UnknownTerrain),
    /// World or prototype dimensions are invalid.
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
    /// Two prototypes share a name.
    #[error(transparent)]
    Registry(#[from] RegistryError),
    /// A prototype footprint is larger than the world, so it could never be placed.
    #[error(
        "installed object `{name}` of {width}x{height} tiles does not fit in a {world_width}x{world_height} world"
    )]
    PrototypeExceedsWorld {
        /// Prototype name.
        name: String,
        /// Footprint width.
        width: u32,
        /// Footprint height.
        height: u32,
        /// Configured world width.
        world_width: u32,
        /// Configured world height.
        world_height: u32,
    },
}

/// Declarative description of a world.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WorldConfig {
    /// Number of tile columns.
    pub width: u32,
    /// Number of tile rows.
    pub height: u32,
    /// Terrain every tile receives when the world is initialised.
    pub default_terrain: TerrainKind,
    /// Movement cost overrides keyed by terrain name.
    pub terrain_costs: BTreeMap<String, f32>,
    /// Installed object prototypes registered with the world.
    pub prototypes: Vec<PrototypeConfig>,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_WORLD_WIDTH,
            height: DEFAULT_WORLD_HEIGHT,
            default_terrain: TerrainKind::Grass,
            terrain_costs: BTreeMap::new(),
            prototypes: Vec::new(),
        }
    }
}

impl WorldConfig {
    /// Parses a configuration from TOML source.
    pub fn from_toml_str(contents: &str) -> Result<Self, BootstrapError> {
        Ok(toml::from_str(contents)?)
    }

    /// Reads and parses a configuration file.
    pub fn load(path: &Path) -> Result<Self, BootstrapError> {
        let contents = fs::read_to_string(path).map_err(|source| BootstrapError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&contents)
    }

    /// Builds the terrain table, applying the configured overrides.
    pub fn terrain_table(&self) -> Result<TerrainTable, BootstrapError> {
        let mut table = TerrainTable::default();
        for (name, cost) in &self.terrain_costs {
            let kind: TerrainKind = name.parse()?;
            table.set_cost(kind, *cost);
        }
        Ok(table)
    }
}

/// Configuration of one installed object prototype.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PrototypeConfig {
    /// Unique prototype name.
    pub name: String,
    /// Movement cost, either one value for every cell or one per cell.
    #[serde(default)]
    pub movement_cost: MovementCostConfig,
    /// Footprint width in tiles.
    #[serde(default = "one")]
    pub width: u32,
    /// Footprint height in tiles.
    #[serde(default = "one")]
    pub height: u32,
}

impl PrototypeConfig {
    /// Builds the prototype described by this entry.
    pub fn to_prototype(&self) -> Result<Prototype, ConfigurationError> {
        match &self.movement_cost {
            MovementCostConfig::Uniform(cost) => {
                Prototype::uniform(self.name.as_str(), *cost, self.width, self.height)
            }
            MovementCostConfig::PerCell(costs) => {
                Prototype::new(self.name.as_str(), costs.clone(), self.width, self.height)
            }
        }
    }
}

/// Movement cost entry accepting either a scalar or a list.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MovementCostConfig {
    /// One multiplier applied to every covered tile.
    Uniform(f32),
    /// One multiplier per covered tile, left to right then bottom to top.
    PerCell(Vec<f32>),
}

impl Default for MovementCostConfig {
    fn default() -> Self {
        Self::PerCell(Vec::new())
    }
}

const fn one() -> u32 {
    1
}

/// Produces worlds ready for editing.
#[derive(Debug, Default)]
pub struct Bootstrap;

impl Bootstrap {
    /// Builds a world from configuration.
    ///
    /// The world is created, cost overrides and prototypes are installed and
    /// every tile is set to the configured default terrain. A prototype wider
    /// or taller than the world is rejected. Observers can only
    /// be attached afterwards, so this initial pass notifies nobody.
    pub fn build(&self, config: &WorldConfig) -> Result<World, BootstrapError> {
        let terrain_table = config.terrain_table()?;
        let mut world = World::new(config.width, config.height)?.with_terrain_table(terrain_table);
        world.set_default_terrain(config.default_terrain);

        for entry in &config.prototypes {
            if entry.width > config.width || entry.height > config.height {
                warn!(
                    object_type = %entry.name,
                    width = entry.width,
                    height = entry.height,
                    "installed object prototype is larger than the world"
                );
                return Err(BootstrapError::PrototypeExceedsWorld {
                    name: entry.name.clone(),
                    width: entry.width,
                    height: entry.height,
                    world_width: config.width,
                    world_height: config.height,
                });
            }
            world.register_prototype(entry.to_prototype()?)?;
        }

        let initialised = world.initialize_tiles();
        info!(
            tiles = initialised,
            terrain = %config.default_terrain,
            prototypes = config.prototypes.len(),
            "world bootstrapped"
        );
        Ok(world)
    }
}
