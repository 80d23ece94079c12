//! Cassette replay integration tests: zero network I/O.
//!
//! All tests set `CONTRIBGRID_REPLAY` to a cassette file path so that the
//! binary never contacts a live API endpoint.

use assert_cmd::Command;
use base64::Engine;
use predicates::prelude::*;
use std::path::PathBuf;

const PNG_SIGNATURE: [u8; 8] = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];

fn cmd(cassette: &str) -> Command {
    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("contribgrid");
    cmd.env("CONTRIBGRID_REPLAY", fixtures_dir().join(cassette))
        .env("CONTRIBGRID_CONFIG", "/nonexistent/contribgrid.toml")
        .env_remove("GITHUB_TOKEN")
        .env_remove("GITHUB_APP_TOKEN");
    cmd
}

/// Absolute path to the `test_fixtures` directory.
fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("test_fixtures")
}

fn temp_output(name: &str) -> PathBuf {
    let path = std::env::temp_dir().join(name);
    let _ = std::fs::remove_file(&path);
    path
}

#[test]
fn linked_svg_matches_grid_geometry() {
    let out = temp_output("contribgrid_test_linked.svg");

    cmd("two_contributors.cassette.yaml")
        .args(["render", "--repo", "octo/demo", "--columns", "2", "--width", "50", "--gap", "10"])
        .args(["--border-width", "1", "--no-embed", "--output", out.to_str().unwrap()])
        .assert()
        .success()
        .stderr(predicate::str::contains("Saved:"));

    let svg = std::fs::read_to_string(&out).unwrap();
    assert!(svg.contains(r#"width="111" height="51""#), "unexpected canvas: {svg}");
    let first = svg.find(r#"href="https://github.com/user1""#).expect("user1 link");
    let second = svg.find(r#"href="https://github.com/user2""#).expect("user2 link");
    assert!(first < second, "links must follow contributor rank");
    assert!(svg.contains("https://avatars.githubusercontent.com/u/1?v=4&amp;s=50"));
    assert!(!svg.contains("data:"));

    let _ = std::fs::remove_file(&out);
}

#[test]
fn stdout_output() {
    cmd("two_contributors.cassette.yaml")
        .args(["render", "--repo", "octo/demo", "--no-embed", "--output", "-"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("<svg"))
        .stdout(predicate::str::contains("<title>user2</title>"))
        .stderr(predicate::str::contains("Saved:").not());
}

#[test]
fn embedded_svg_inlines_avatars_in_order() {
    let out = temp_output("contribgrid_test_embedded.svg");

    cmd("two_contributors_embedded.cassette.yaml")
        .args(["render", "--repo", "octo/demo", "--embed", "--output", out.to_str().unwrap()])
        .assert()
        .success();

    let svg = std::fs::read_to_string(&out).unwrap();
    let first = svg.find("data:image/jpeg;base64,AQID").expect("first avatar");
    let second = svg.find("data:image/png;base64,BAUG").expect("second avatar");
    assert!(first < second);

    let _ = std::fs::remove_file(&out);
}

#[test]
fn fixed_rows_cap_the_grid() {
    cmd("two_contributors.cassette.yaml")
        .args(["render", "--repo", "octo/demo", "--no-embed", "--columns", "1", "--rows", "1"])
        .args(["--width", "40", "--output", "-"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("user1")
                .and(predicate::str::contains("user2").not())
                .and(predicate::str::contains(r#"width="40" height="40""#)),
        );
}

#[test]
fn auto_filename_uses_repository_name() {
    let work_dir = std::env::temp_dir().join("contribgrid_test_autofile");
    let _ = std::fs::remove_dir_all(&work_dir);
    std::fs::create_dir_all(&work_dir).unwrap();

    cmd("two_contributors.cassette.yaml")
        .args(["render", "--repo", "octo/demo", "--no-embed"])
        .current_dir(&work_dir)
        .assert()
        .success();

    let files: Vec<_> = std::fs::read_dir(&work_dir).unwrap().flatten().collect();
    assert_eq!(files.len(), 1, "Exactly one file should be created");
    assert_eq!(files[0].file_name().to_string_lossy(), "octo-demo-contributors.svg");

    let _ = std::fs::remove_dir_all(&work_dir);
}

#[test]
fn upstream_failure_is_fatal() {
    let out = temp_output("contribgrid_test_rate_limited.svg");

    cmd("rate_limited.cassette.yaml")
        .args(["render", "--repo", "octo/demo", "--output", out.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("API rate limit exceeded"));

    assert!(!out.exists(), "No partial image should be written");
}

#[test]
fn png_output_embeds_and_rasterizes() {
    // Build a real avatar PNG and a cassette that serves it for both contributors.
    let avatar = {
        let img = image::RgbaImage::from_pixel(2, 2, image::Rgba([0, 0, 255, 255]));
        let mut buf = std::io::Cursor::new(Vec::<u8>::new());
        img.write_to(&mut buf, image::ImageFormat::Png).unwrap();
        base64::engine::general_purpose::STANDARD.encode(buf.into_inner())
    };

    let mut cassette = String::from(
        "name: png-test\nrecorded_at: \"2026-02-01T00:00:00Z\"\ncommit: test\ninteractions:\n  - seq: 0\n    port: contributor_source\n    method: fetch_page\n    input: {}\n    output:\n      Ok:\n        - login: user1\n          avatar_url: \"https://avatars.githubusercontent.com/u/1?v=4\"\n        - login: user2\n          avatar_url: \"https://avatars.githubusercontent.com/u/2?v=4\"\n  - seq: 1\n    port: contributor_source\n    method: fetch_page\n    input: {}\n    output:\n      Ok: []\n",
    );
    for seq in 2..=3 {
        cassette.push_str(&format!(
            "  - seq: {seq}\n    port: avatar_source\n    method: fetch_avatar\n    input: {{}}\n    output:\n      Ok:\n        data: {avatar}\n        content_type: image/png\n"
        ));
    }
    let cassette_path = std::env::temp_dir().join("contribgrid_test_png.cassette.yaml");
    std::fs::write(&cassette_path, &cassette).unwrap();

    let out = temp_output("contribgrid_test_output.png");

    cmd("unused")
        .env("CONTRIBGRID_REPLAY", &cassette_path)
        .args(["render", "--repo", "octo/demo", "--format", "png", "--columns", "2"])
        .args(["--width", "50", "--gap", "10", "--no-embed", "--output", out.to_str().unwrap()])
        .assert()
        .success()
        .stderr(predicate::str::contains("Saved:"));

    let data = std::fs::read(&out).unwrap();
    assert_eq!(&data[..8], &PNG_SIGNATURE, "Output should be a valid PNG file");
    let decoded = image::load_from_memory(&data).unwrap().to_rgba8();
    assert_eq!(decoded.dimensions(), (110, 50));
    assert_eq!(decoded.get_pixel(25, 25).0, [0, 0, 255, 255]);

    let _ = std::fs::remove_file(&out);
    let _ = std::fs::remove_file(&cassette_path);
}
