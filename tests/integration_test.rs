use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

const PNG_SIGNATURE: [u8; 8] = [0x89, 0x50, 0x4e, 0x47, 0x0d, 0x0a, 0x1a, 0x0a];
const OUTPUT_FILES: [&str; 4] = ["icon_16.png", "icon_48.png", "icon_128.png", "icon.png"];

/// Runs `ext-icon-gen` with no arguments inside an empty directory, the way
/// it is used from an extension's source tree, and checks the full icon set.
#[test]
fn test_default_run_writes_icon_set() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");

    let output = run_icon_gen(temp_dir.path(), &[]);
    assert_success(&output);

    for name in OUTPUT_FILES {
        let path = temp_dir.path().join(name);
        assert!(path.exists(), "{} should exist", path.display());

        let bytes = std::fs::read(&path).expect("Failed to read generated icon");
        assert_eq!(&bytes[..8], &PNG_SIGNATURE, "{name} should start with the PNG signature");
    }

    let canonical = std::fs::read(temp_dir.path().join("icon.png")).unwrap();
    let largest = std::fs::read(temp_dir.path().join("icon_128.png")).unwrap();
    assert_eq!(canonical, largest, "icon.png should be a copy of icon_128.png");

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("✓ Generated icon_16.png"));
    assert!(stdout.contains("✓ Generated icon.png"));
}

#[cfg(feature = "render")]
#[test]
fn test_rendered_icons_decode() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    assert_success(&run_icon_gen(temp_dir.path(), &["--backend", "render"]));

    for size in [16u32, 48, 128] {
        let icon = image::open(temp_dir.path().join(format!("icon_{size}.png")))
            .expect("Failed to load generated icon")
            .to_rgba8();
        assert_eq!(icon.dimensions(), (size, size));

        // gradient starts at #1d9bf0
        assert_eq!(icon.get_pixel(size / 2, 0).0, [0x1d, 0x9b, 0xf0, 255]);

        // the glyph's own colour, not blended over the gradient
        let centre = icon.get_pixel(size / 2, size / 2);
        assert_eq!(centre.0, [255, 255, 255, 245], "centre should be the white glyph");
    }
}

#[test]
fn test_output_directory_and_manifest() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let output_dir = temp_dir.path().join("assets").join("icons");

    let output = run_icon_gen(
        temp_dir.path(),
        &[
            "--backend",
            "raw",
            "--png",
            "16,32",
            "--manifest",
            "-o",
            output_dir.to_str().unwrap(),
        ],
    );
    assert_success(&output);

    assert!(output_dir.join("icon_16.png").exists());
    assert!(output_dir.join("icon_32.png").exists());
    // 128 was not requested, so there is nothing to copy
    assert!(!output_dir.join("icon.png").exists());

    let manifest = std::fs::read_to_string(output_dir.join("icons.json")).unwrap();
    let json: serde_json::Value =
        serde_json::from_str(&manifest).expect("icons.json should contain valid JSON");
    assert_eq!(json["icons"]["16"], "icon_16.png");
    assert_eq!(json["icons"]["32"], "icon_32.png");
    assert_eq!(json["action"]["default_icon"]["32"], "icon_32.png");
}

#[test]
fn test_config_file_controls_generation() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let config_path = temp_dir.path().join("icons.config.json");
    std::fs::write(
        &config_path,
        r#"{ "sizes": [24, 64], "canonical_size": 64, "canonical_name": "logo.png", "file_prefix": "logo" }"#,
    )
    .unwrap();

    let output = run_icon_gen(
        temp_dir.path(),
        &["--backend", "raw", "-c", config_path.to_str().unwrap()],
    );
    assert_success(&output);

    for name in ["logo_24.png", "logo_64.png", "logo.png"] {
        assert!(temp_dir.path().join(name).exists(), "{name} should exist");
    }
    assert!(!temp_dir.path().join("icon_16.png").exists());
}

#[test]
fn test_invalid_input_fails_before_writing() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");

    let output = run_icon_gen(temp_dir.path(), &["--png", "16,0"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("greater than zero"), "stderr: {stderr}");
    assert!(!temp_dir.path().join("icon_16.png").exists());

    let output = run_icon_gen(temp_dir.path(), &["-c", "missing.json"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("missing.json"));
}

#[test]
fn test_inspect_reports_placeholder_checksums() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    assert_success(&run_icon_gen(temp_dir.path(), &["--backend", "raw"]));

    let output = Command::new(env!("CARGO_BIN_EXE_inspect-png"))
        .current_dir(temp_dir.path())
        .output()
        .expect("Failed to run inspect-png");
    assert_success(&output);

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("IHDR"));
    assert!(stdout.contains("128x128"));
    assert!(stdout.contains("MISMATCH"));
    assert!(stdout.contains("uncompressed RGBA"));
}

fn run_icon_gen(dir: &Path, args: &[&str]) -> Output {
    Command::new(icon_gen_binary_path())
        .args(args)
        .current_dir(dir)
        .env("RUST_LOG", "off")
        .output()
        .expect("Failed to run ext-icon-gen command")
}

fn assert_success(output: &Output) {
    if !output.status.success() {
        eprintln!("Command failed with status: {}", output.status);
        eprintln!("stdout: {}", String::from_utf8_lossy(&output.stdout));
        eprintln!("stderr: {}", String::from_utf8_lossy(&output.stderr));
        panic!("command failed");
    }
}

fn icon_gen_binary_path() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_ext-icon-gen"))
}
