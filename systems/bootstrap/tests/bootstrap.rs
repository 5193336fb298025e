use tile_editor_core::{ConfigurationError, CostSource, RegistryError, TerrainKind, TileCoord};
use tile_editor_system_bootstrap::{
    Bootstrap, BootstrapError, MovementCostConfig, PrototypeConfig, WorldConfig,
};
use tile_editor_world::Tile;

const SAMPLE: &str = r#"
width = 12
height = 8
default_terrain = "Plains"

[terrain_costs]
Water = 4.0
marsh = 3

[[prototypes]]
name = "Trees"
movement_cost = 2.0
width = 2
height = 2

[[prototypes]]
name = "Bridge"
movement_cost = [1.0, 0.5, 1.0]
width = 3

[[prototypes]]
name = "Boulder"
"#;

#[test]
fn sample_config_parses_every_section() {
    let config = WorldConfig::from_toml_str(SAMPLE).expect("sample config parses");

    assert_eq!((config.width, config.height), (12, 8));
    assert_eq!(config.default_terrain, TerrainKind::Plains);
    assert_eq!(config.prototypes.len(), 3);
    assert_eq!(
        config.prototypes[0].movement_cost,
        MovementCostConfig::Uniform(2.0)
    );
    assert_eq!(
        config.prototypes[1].movement_cost,
        MovementCostConfig::PerCell(vec![1.0, 0.5, 1.0])
    );
    assert_eq!(config.prototypes[1].height, 1, "height defaults to one tile");
    assert_eq!(
        config.prototypes[2].movement_cost,
        MovementCostConfig::PerCell(Vec::new())
    );
}

#[test]
fn bootstrap_builds_an_initialised_world() {
    let config = WorldConfig::from_toml_str(SAMPLE).expect("sample config parses");
    let world = Bootstrap.build(&config).expect("world builds");

    assert_eq!((world.width(), world.height()), (12, 8));
    assert!(world
        .tiles()
        .all(|tile: &Tile| tile.terrain() == TerrainKind::Plains));
    assert_eq!(world.terrain_table().move_cost(TerrainKind::Water), 4.0);
    assert_eq!(world.terrain_table().move_cost(TerrainKind::Marsh), 3.0);

    let names: Vec<_> = world
        .prototypes()
        .map(|prototype| prototype.object_type().to_owned())
        .collect();
    assert_eq!(names, vec!["Boulder", "Bridge", "Trees"]);

    let boulder = world.prototype("Boulder").expect("registered");
    assert_eq!(boulder.cost_source(), CostSource::DefaultedEmpty);
    assert_eq!(boulder.movement_cost(), &[0.0]);
}

#[test]
fn bootstrapped_world_accepts_placements() {
    let config = WorldConfig::from_toml_str(SAMPLE).expect("sample config parses");
    let mut world = Bootstrap.build(&config).expect("world builds");

    let _ = world
        .place_installed_object("Bridge", TileCoord::new(4, 0))
        .expect("bridge fits");

    assert_eq!(world.movement_cost(TileCoord::new(5, 0)), Some(0.6));
    assert_eq!(world.movement_cost(TileCoord::new(4, 1)), Some(1.2));
}

#[test]
fn zero_sized_world_is_a_configuration_error() {
    let config = WorldConfig {
        width: 0,
        ..WorldConfig::default()
    };

    let result = Bootstrap.build(&config);

    assert!(matches!(
        result,
        Err(BootstrapError::Configuration(ConfigurationError::ZeroDimension { .. }))
    ));
}

#[test]
fn duplicate_prototypes_are_reported() {
    let entry = PrototypeConfig {
        name: "Trees".to_owned(),
        movement_cost: MovementCostConfig::Uniform(2.0),
        width: 1,
        height: 1,
    };
    let config = WorldConfig {
        width: 4,
        height: 4,
        prototypes: vec![entry.clone(), entry],
        ..WorldConfig::default()
    };

    let result = Bootstrap.build(&config);

    assert!(matches!(
        result,
        Err(BootstrapError::Registry(RegistryError::DuplicatePrototype(name))) if name == "Trees"
    ));
}

#[test]
fn prototype_larger_than_the_world_is_rejected() {
    let config = WorldConfig {
        width: 4,
        height: 4,
        prototypes: vec![PrototypeConfig {
            name: "Mountain".to_owned(),
            movement_cost: MovementCostConfig::Uniform(3.0),
            width: 9,
            height: 9,
        }],
        ..WorldConfig::default()
    };

    let result = Bootstrap.build(&config);

    assert!(matches!(
        result,
        Err(BootstrapError::PrototypeExceedsWorld { name, width: 9, height: 9, .. }) if name == "Mountain"
    ));
}

#[test]
fn missing_file_reports_its_path() {
    let path = std::env::temp_dir().join("tile-editor-missing-config.toml");
    let error = WorldConfig::load(&path).expect_err("file does not exist");
    assert!(error.to_string().contains("tile-editor-missing-config.toml"));
}

#[test]
fn bundled_demo_config_builds() {
    let config = WorldConfig::from_toml_str(include_str!("../../../demos/world.toml"))
        .expect("demo config parses");
    let world = Bootstrap.build(&config).expect("demo world builds");

    assert_eq!((world.width(), world.height()), (20, 12));
    assert_eq!(world.prototypes().count(), 3);
    assert_eq!(
        world.prototype("Pond").map(|pond| pond.cost_source()),
        Some(CostSource::DefaultedEmpty)
    );
}
