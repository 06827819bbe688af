use std::sync::Arc;
use std::time::Duration;

use gardenkit_core::ImageError;
use gardenkit_designer::image_cache::rgba_to_pixmap;
use gardenkit_designer::{FileImageSource, ImageCache, ImageHandle};
use image::{Rgba, RgbaImage};
use tempfile::TempDir;

fn write_png(dir: &TempDir, name: &str, color: [u8; 4]) {
    RgbaImage::from_pixel(3, 2, Rgba(color))
        .save(dir.path().join(name))
        .unwrap();
}

async fn wait_for(cache: &mut ImageCache, count: usize) -> Vec<String> {
    let mut finished = Vec::new();
    for _ in 0..200 {
        finished.extend(cache.poll_completed());
        if finished.len() >= count {
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    finished
}

#[tokio::test]
async fn test_load_is_pending_then_ready() {
    let dir = TempDir::new().unwrap();
    write_png(&dir, "tomato.png", [200, 30, 30, 255]);
    let mut cache = ImageCache::new(Arc::new(FileImageSource::with_root(dir.path())));

    assert!(matches!(cache.get_or_load("tomato.png"), ImageHandle::Pending));
    assert!(matches!(cache.get_or_load("tomato.png"), ImageHandle::Pending));
    assert_eq!(cache.pending(), 1);

    let finished = wait_for(&mut cache, 1).await;
    assert_eq!(finished, vec!["tomato.png".to_string()]);

    let handle = cache.get_or_load("tomato.png");
    let pixmap = handle.ready().unwrap();
    assert_eq!((pixmap.width(), pixmap.height()), (3, 2));
    assert_eq!(pixmap.pixel(0, 0).unwrap().red(), 200);
    assert_eq!(cache.pending(), 0);
}

#[tokio::test]
async fn test_missing_and_corrupt_files_fail() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("broken.png"), b"not a png").unwrap();
    let mut cache = ImageCache::new(Arc::new(FileImageSource::with_root(dir.path())));

    cache.get_or_load("absent.png");
    cache.get_or_load("broken.png");
    wait_for(&mut cache, 2).await;

    assert!(matches!(
        cache.peek("absent.png"),
        Some(ImageHandle::Failed(ImageError::Read { .. }))
    ));
    assert!(matches!(
        cache.peek("broken.png"),
        Some(ImageHandle::Failed(ImageError::Decode { .. }))
    ));
}

#[test]
fn test_without_runtime_loads_inline() {
    let dir = TempDir::new().unwrap();
    write_png(&dir, "bean.png", [0, 0, 0, 0]);
    let mut cache = ImageCache::with_runtime(Arc::new(FileImageSource::with_root(dir.path())), None);

    assert!(cache.get_or_load("bean.png").ready().is_some());
    assert!(cache.poll_completed().is_empty());
    cache.clear();
    assert!(cache.peek("bean.png").is_none());
}

#[test]
fn test_rgba_to_pixmap_premultiplies() {
    let image = RgbaImage::from_pixel(1, 1, Rgba([100, 200, 50, 0]));
    let pixmap = rgba_to_pixmap(&image).unwrap();
    let pixel = pixmap.pixel(0, 0).unwrap();
    assert_eq!((pixel.red(), pixel.green(), pixel.alpha()), (0, 0, 0));

    assert!(rgba_to_pixmap(&RgbaImage::new(0, 0)).is_none());
}
