#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that boots a tile world and applies scripted edits.

mod map;
mod script;

use std::{cell::Cell, path::PathBuf, rc::Rc};

use anyhow::{Context, Result};
use clap::Parser;
use tile_editor_core::{Command, Event, TileCoord};
use tile_editor_system_bootstrap::{Bootstrap, WorldConfig};
use tile_editor_world::{self as world, World};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Boots a tile world from configuration, applies edits and prints the map.
#[derive(Debug, Parser)]
#[command(name = "tile-editor", version, about)]
struct Args {
    /// World configuration file (TOML). Defaults to a 100x100 grass map.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Overrides the configured world width.
    #[arg(long)]
    width: Option<u32>,
    /// Overrides the configured world height.
    #[arg(long)]
    height: Option<u32>,
    /// Paints terrain: `x,y=Terrain` or `x0,y0:x1,y1=Terrain`. Repeatable.
    #[arg(long = "paint", value_name = "EDIT", value_parser = script::parse_paint)]
    paint: Vec<Command>,
    /// Places an installed object: `Name@x,y`. Repeatable.
    #[arg(long = "place", value_name = "EDIT", value_parser = script::parse_place)]
    place: Vec<Command>,
    /// Skips printing the map after the edits.
    #[arg(long)]
    no_map: bool,
}

/// Entry point for the tile editor command-line interface.
fn main() -> Result<()> {
    init_tracing();
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => WorldConfig::load(path)
            .with_context(|| format!("failed to load {}", path.display()))?,
        None => WorldConfig::default(),
    };
    if let Some(width) = args.width {
        config.width = width;
    }
    if let Some(height) = args.height {
        config.height = height;
    }

    let mut world = Bootstrap
        .build(&config)
        .context("failed to build the world")?;
    let changed_tiles = watch_terrain(&mut world);
    watch_installed_objects(&mut world);

    let mut events = Vec::new();
    for command in args.paint.into_iter().chain(args.place) {
        world::apply(&mut world, command, &mut events);
    }
    for event in &events {
        log_event(event);
    }
    info!(
        notifications = changed_tiles.get(),
        events = events.len(),
        "edits applied"
    );

    if !args.no_map {
        print!("{}", map::render(&world));
    }
    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

fn watch_terrain(world: &mut World) -> Rc<Cell<usize>> {
    let counter = Rc::new(Cell::new(0));
    for y in 0..world.height() {
        for x in 0..world.width() {
            let Some(tile) = world.tile_mut(TileCoord::new(x, y)) else {
                continue;
            };
            let counter = Rc::clone(&counter);
            let _ = tile.on_type_changed(move |_| counter.set(counter.get() + 1));
        }
    }
    counter
}

fn watch_installed_objects(world: &mut World) {
    let _ = world.on_installed_object_created(|object| {
        info!(
            object_type = object.object_type(),
            id = object.id().get(),
            tiles = object.tiles().len(),
            "installed object created"
        );
    });
    let _ = world.on_installed_object_destroyed(|object| {
        info!(
            object_type = object.object_type(),
            id = object.id().get(),
            "installed object destroyed"
        );
    });
}

fn log_event(event: &Event) {
    match event {
        Event::TerrainChanged { .. } | Event::InstalledObjectPlaced { .. } => {}
        Event::InstalledObjectRemoved { id, .. } => info!(%id, "installed object removed"),
        Event::PlacementRejected {
            object_type,
            base,
            reason,
        } => warn!(object_type = object_type.as_str(), %base, %reason, "placement rejected"),
        Event::RemovalRejected { id, reason } => warn!(%id, %reason, "removal rejected"),
    }
}
