//! Smoke tests for the worker-backed async canvas

use base64::Engine as Base64Engine;
use image::{ImageFormat, Rgba, RgbaImage};
use rfcanvas::{CanvasConfig, CanvasWorker, Error, NoiseMode};
use std::io::Cursor;

fn data_url(img: &RgbaImage) -> String {
    let mut out = Cursor::new(Vec::new());
    img.write_to(&mut out, ImageFormat::Png).unwrap();
    format!(
        "data:image/png;base64,{}",
        base64::engine::general_purpose::STANDARD.encode(out.into_inner())
    )
}

fn small_config() -> CanvasConfig {
    CanvasConfig {
        width: 16,
        height: 8,
        ..Default::default()
    }
}

#[tokio::test]
async fn worker_noise_and_snapshot() {
    let worker = CanvasWorker::new(Some(small_config())).await.unwrap();
    assert_eq!(worker.size().await.unwrap(), (16, 8));

    worker.draw_noise(false).await.unwrap();
    let data = worker.image_data().await.unwrap();
    assert!(data.pixels().all(|px| px[0] == px[1] && px[1] == px[2] && px[3] == 255));

    worker.close().await.unwrap();
}

#[tokio::test]
async fn worker_seeded_noise_is_reproducible() {
    let a = CanvasWorker::new(Some(small_config())).await.unwrap();
    let b = CanvasWorker::new(Some(small_config())).await.unwrap();
    a.draw_noise_seeded(NoiseMode::Color, 11).await.unwrap();
    b.draw_noise_seeded(NoiseMode::Color, 11).await.unwrap();
    assert_eq!(a.image_data().await.unwrap(), b.image_data().await.unwrap());
}

#[tokio::test]
async fn worker_draws_image_after_noise() {
    let worker = CanvasWorker::new(Some(small_config())).await.unwrap();
    worker.draw_noise(true).await.unwrap();

    let green = RgbaImage::from_pixel(4, 4, Rgba([0, 255, 0, 255]));
    worker.draw_image(&data_url(&green)).await.unwrap();

    let data = worker.image_data().await.unwrap();
    assert_eq!(data.pixel(3, 3), Some([0, 255, 0, 255]));
    assert_eq!(data.pixel(4, 0).unwrap()[3], 255);

    let png = worker.png(None).await.unwrap();
    assert_eq!(&png[0..8], b"\x89PNG\r\n\x1a\n");
}

#[tokio::test]
async fn worker_reports_load_errors() {
    let worker = CanvasWorker::new(Some(small_config())).await.unwrap();
    let err = worker.draw_image("").await.unwrap_err();
    assert!(matches!(err, Error::InvalidSource(_)));

    // still usable afterwards
    worker.draw_noise(false).await.unwrap();
}

#[tokio::test]
async fn worker_rejects_oversized_canvas() {
    let cfg = CanvasConfig {
        width: u32::MAX,
        height: u32::MAX,
        ..Default::default()
    };
    assert!(matches!(
        CanvasWorker::new(Some(cfg)).await,
        Err(Error::ConfigError(_))
    ));
}

#[tokio::test]
async fn closed_worker_cancels_requests() {
    let worker = CanvasWorker::new(Some(small_config())).await.unwrap();
    let other = worker.clone();
    worker.close().await.unwrap();

    let err = other.size().await.unwrap_err();
    assert!(matches!(err, Error::Other(_)), "got {:?}", err);
}
