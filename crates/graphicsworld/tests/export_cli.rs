use std::fs;
use std::path::Path;
use std::process::{Command, Output};

use tempfile::TempDir;

fn graphicsworld(config_dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_graphicsworld"))
        .env("GRAPHICSWORLD_CONFIG_DIR", config_dir)
        .env_remove("GRAPHICSWORLD_CONFIG")
        .args(args)
        .output()
        .expect("failed to run graphicsworld")
}

#[test]
fn export_writes_png_with_requested_size() {
    let root = TempDir::new().unwrap();
    let out = root.path().join("frames/gradient.png");
    let output = graphicsworld(
        &root.path().join("config"),
        &[
            "--variant",
            "gradient",
            "--size",
            "64x32",
            "--export",
            out.to_str().unwrap(),
        ],
    );
    assert!(output.status.success(), "{output:?}");

    let image = image::open(&out).unwrap().to_rgba8();
    assert_eq!(image.dimensions(), (64, 32));
    assert!(image.get_pixel(0, 16).0[0] < 5);
    assert!(image.get_pixel(63, 16).0[0] > 250);
}

#[test]
fn config_file_supplies_defaults_and_flags_override() {
    let root = TempDir::new().unwrap();
    let config_dir = root.path().join("config");
    fs::create_dir_all(&config_dir).unwrap();
    fs::write(
        config_dir.join("graphicsworld.toml"),
        "version = 1\nvariant = \"radial\"\nsize = \"16x8\"\n",
    )
    .unwrap();

    let from_file = root.path().join("from_file.png");
    let output = graphicsworld(&config_dir, &["--export", from_file.to_str().unwrap()]);
    assert!(output.status.success(), "{output:?}");
    assert_eq!(image::open(&from_file).unwrap().to_rgba8().dimensions(), (16, 8));

    let overridden = root.path().join("overridden.png");
    let output = graphicsworld(
        &config_dir,
        &["--size", "20x10", "--export", overridden.to_str().unwrap()],
    );
    assert!(output.status.success(), "{output:?}");
    assert_eq!(image::open(&overridden).unwrap().to_rgba8().dimensions(), (20, 10));
}

#[test]
fn invalid_config_file_fails() {
    let root = TempDir::new().unwrap();
    let config_dir = root.path().join("config");
    fs::create_dir_all(&config_dir).unwrap();
    fs::write(config_dir.join("graphicsworld.toml"), "version = 7\n").unwrap();

    let out = root.path().join("never.png");
    let output = graphicsworld(&config_dir, &["--export", out.to_str().unwrap()]);
    assert!(!output.status.success());
    assert!(!out.exists());
}

#[test]
fn config_init_and_where() {
    let root = TempDir::new().unwrap();
    let config_dir = root.path().join("config");

    let output = graphicsworld(&config_dir, &["config", "where"]);
    assert!(output.status.success(), "{output:?}");
    let printed = String::from_utf8(output.stdout).unwrap();
    assert_eq!(
        printed.trim(),
        config_dir.join("graphicsworld.toml").display().to_string()
    );

    let output = graphicsworld(&config_dir, &["config", "init"]);
    assert!(output.status.success(), "{output:?}");
    let written = fs::read_to_string(config_dir.join("graphicsworld.toml")).unwrap();
    assert!(written.contains("version = 1"));

    let output = graphicsworld(&config_dir, &["config", "init"]);
    assert!(!output.status.success());

    let output = graphicsworld(&config_dir, &["config", "init", "--force"]);
    assert!(output.status.success(), "{output:?}");
}
