use std::process::Command;

fn demo_config() -> String {
    format!("{}/../../demos/world.toml", env!("CARGO_MANIFEST_DIR"))
}

#[test]
fn scripted_edits_are_printed_on_the_map() {
    let output = Command::new(env!("CARGO_BIN_EXE_tile-editor"))
        .args(["--config", &demo_config()])
        .args(["--paint", "0,0:19,1=Water"])
        .args(["--place", "Trees@5,6"])
        .env("RUST_LOG", "off")
        .output()
        .expect("failed to run the tile-editor binary");

    assert!(output.status.success(), "tile-editor should exit cleanly");
    let map = String::from_utf8(output.stdout).expect("map is utf-8");
    let rows: Vec<&str> = map.lines().collect();
    assert_eq!(rows.len(), 12, "one row per tile row");
    assert!(rows.iter().all(|row| row.chars().count() == 20));

    // Rows are printed top first, so tile row y sits at index 11 - y.
    assert_eq!(rows[11], "~".repeat(20));
    assert_eq!(rows[10], "~".repeat(20));
    assert_eq!(&rows[11 - 6][5..7], "TT");
    assert_eq!(&rows[11 - 7][5..7], "TT");
    assert_eq!(&rows[11 - 8][5..7], "\"\"");
}

#[test]
fn rejected_placement_keeps_the_map_unchanged() {
    let output = Command::new(env!("CARGO_BIN_EXE_tile-editor"))
        .args(["--config", &demo_config()])
        .args(["--place", "Trees@19,11"])
        .env("RUST_LOG", "off")
        .output()
        .expect("failed to run the tile-editor binary");

    assert!(output.status.success(), "rejections are reported, not fatal");
    let map = String::from_utf8(output.stdout).expect("map is utf-8");
    assert!(!map.contains('T'), "out-of-bounds trees are not drawn");
}

#[test]
fn oversized_world_is_reported_as_an_error() {
    let output = Command::new(env!("CARGO_BIN_EXE_tile-editor"))
        .args(["--width", "4294967295", "--height", "4294967295", "--no-map"])
        .env("RUST_LOG", "off")
        .output()
        .expect("failed to run the tile-editor binary");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("exceeds the limit"), "stderr: {stderr}");
    assert!(!stderr.contains("panicked"), "stderr: {stderr}");
}
