//! End-to-end runs of the `rfcanvas` binary

use std::path::{Path, PathBuf};
use std::process::Command;

use image::{ImageFormat, Rgba, RgbaImage};
use rfcanvas::Bitmap;

fn scratch(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("rfcanvas-cli-{}-{}", std::process::id(), name))
}

/// Write an opaque 4x3 PNG and return its path.
fn write_source(name: &str) -> PathBuf {
    let path = scratch(name);
    let img = RgbaImage::from_pixel(4, 3, Rgba([10, 200, 30, 255]));
    img.save_with_format(&path, ImageFormat::Png).unwrap();
    path
}

fn run(args: &[&str]) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_rfcanvas"))
        .args(args)
        .output()
        .expect("failed to run rfcanvas")
}

fn output_size(path: &Path) -> (u32, u32) {
    let bmp = Bitmap::decode(&std::fs::read(path).unwrap()).unwrap();
    (bmp.width(), bmp.height())
}

/// Run `draw` on a 4x3 source with extra arguments and return the canvas size.
fn draw_size(tag: &str, extra: &[&str]) -> (u32, u32) {
    let src = write_source(&format!("{}-src.png", tag));
    let out = scratch(&format!("{}-out.png", tag));

    let mut args = vec!["draw", src.to_str().unwrap(), "-o", out.to_str().unwrap()];
    args.extend_from_slice(extra);
    let res = run(&args);
    assert!(res.status.success(), "draw failed: {}", String::from_utf8_lossy(&res.stderr));

    let size = output_size(&out);
    let _ = std::fs::remove_file(&src);
    let _ = std::fs::remove_file(&out);
    size
}

#[test]
fn draw_sizes_canvas_from_image() {
    assert_eq!(draw_size("natural", &[]), (4, 3));
}

#[test]
fn draw_with_one_dimension_takes_the_other_from_image() {
    assert_eq!(draw_size("width-only", &["--width", "4"]), (4, 3));
    assert_eq!(draw_size("height-only", &["--height", "5"]), (4, 5));
}

#[test]
fn draw_with_both_dimensions_uses_them() {
    assert_eq!(draw_size("both", &["--width", "7", "--height", "2"]), (7, 2));
}

#[test]
fn draw_missing_source_fails() {
    let out = scratch("missing-out.png");
    let res = run(&["draw", "/definitely/not/here.png", "-o", out.to_str().unwrap()]);
    assert!(!res.status.success());
    assert!(!out.exists());
}

#[test]
fn seeded_noise_prints_stable_digest() {
    let a = scratch("noise-a.png");
    let b = scratch("noise-b.png");
    let noise = |out: &Path| {
        let out = out.to_str().unwrap();
        run(&["noise", "--width", "8", "--height", "4", "--seed", "7", "-o", out])
    };

    let first = noise(&a);
    let second = noise(&b);
    assert!(first.status.success());
    assert_eq!(first.stdout, second.stdout);
    assert_eq!(String::from_utf8_lossy(&first.stdout).trim().len(), 64);
    assert_eq!(output_size(&a), (8, 4));

    let _ = std::fs::remove_file(&a);
    let _ = std::fs::remove_file(&b);
}
