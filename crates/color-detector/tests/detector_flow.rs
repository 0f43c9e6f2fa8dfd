//! Camera to favorites, against a real image file and a real database.

use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::mpsc;

use color_detector::camera::{
    CameraConstraints, CameraDevice, CameraError, StillImageDevice, PERMISSION_MESSAGE,
};
use color_detector::favorites::FAVORITES_KEY;
use color_detector::frame::FrameSource;
use color_detector::naming::NearestNamer;
use color_detector::{
    CameraStatus, Config, Detector, Favorites, KeyValueStore, MemoryStore, Storage,
};

struct TempDir(PathBuf);

impl TempDir {
    fn new(label: &str) -> Self {
        let dir = std::env::temp_dir().join(format!(
            "colordet-{label}-{}-{}",
            std::process::id(),
            chrono::Utc::now().timestamp_nanos_opt().unwrap_or_default()
        ));
        std::fs::create_dir_all(&dir).unwrap();
        Self(dir)
    }
}

impl Drop for TempDir {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.0);
    }
}

fn write_image(dir: &TempDir, rgb: [u8; 3]) -> PathBuf {
    let path = dir.0.join("frame.png");
    // Only the center pixel matches; a corner sampler would see black.
    let mut image = image::RgbImage::new(9, 7);
    image.put_pixel(4, 3, image::Rgb(rgb));
    image.save(&path).unwrap();
    path
}

/// Refuses once, then hands out the still image.
struct ReluctantCamera {
    refused: bool,
    inner: StillImageDevice,
}

impl CameraDevice for ReluctantCamera {
    fn acquire(
        &mut self,
        constraints: &CameraConstraints,
    ) -> Result<Box<dyn FrameSource>, CameraError> {
        if !self.refused {
            self.refused = true;
            return Err(CameraError::PermissionDenied);
        }
        self.inner.acquire(constraints)
    }
}

#[tokio::test(start_paused = true)]
async fn test_sampled_favorite_survives_restart() {
    let dir = TempDir::new("flow");
    let image = write_image(&dir, [0x12, 0x34, 0x56]);
    let db = dir.0.join("data").join("store.db");

    let mut config = Config::default();
    config.storage.database_path = Some(db.clone());

    let mut detector = Detector::new(
        &config,
        Box::new(ReluctantCamera {
            refused: false,
            inner: StillImageDevice::new(&image),
        }),
        Arc::new(NearestNamer::new()),
        Box::new(Storage::open(config.database_path()).unwrap()),
    )
    .unwrap();

    assert_eq!(
        detector.start(),
        &CameraStatus::Permission(PERMISSION_MESSAGE.to_string())
    );
    assert!(detector.retry().is_ready());

    let (tx, mut rx) = mpsc::channel(8);
    let handle = detector.handle();
    let consumer = async move {
        let mut readings = Vec::new();
        while let Some(reading) = rx.recv().await {
            readings.push(reading);
            if readings.len() == 3 {
                handle.stop();
                break;
            }
        }
        readings
    };
    let ((), readings) = tokio::join!(detector.run(tx), consumer);

    assert_eq!(readings.len(), 3);
    assert!(readings.iter().all(|r| r.sample.hex() == "#123456"));
    assert!(readings[0].added_to_history);
    assert!(!readings[1].added_to_history);
    assert_eq!(detector.history().len(), 1);

    assert!(detector.favorite_current().unwrap());
    detector.shutdown();
    drop(detector);

    let store = Storage::open(&db).unwrap();
    let raw = store.get(FAVORITES_KEY).unwrap().unwrap();
    assert!(raw.contains("\"hex\":\"#123456\""));

    let favorites = Favorites::load(Box::new(store)).unwrap();
    assert_eq!(favorites.len(), 1);
    assert!(favorites.contains("#123456"));
}

#[tokio::test(start_paused = true)]
async fn test_denied_camera_recovers_without_restarting_the_loop() {
    let dir = TempDir::new("recover");
    let image = write_image(&dir, [0xfa, 0x80, 0x72]);

    let mut detector = Detector::new(
        &Config::default(),
        Box::new(ReluctantCamera {
            refused: false,
            inner: StillImageDevice::new(&image),
        }),
        Arc::new(NearestNamer::new()),
        Box::new(MemoryStore::new()),
    )
    .unwrap();
    assert!(!detector.start().is_ready());

    let (tx, mut rx) = mpsc::channel(8);
    let control = detector.control();
    let handle = detector.handle();
    let user = async move {
        assert!(control.retry().await.unwrap().is_ready());
        let reading = rx.recv().await.unwrap();
        let (saved, added) = control.favorite_current().await.unwrap();
        handle.stop();
        (reading, saved, added)
    };
    let ((), (reading, saved, added)) = tokio::join!(detector.run(tx), user);

    assert_eq!(reading.sample.hex(), "#fa8072");
    assert_eq!(reading.sample.name(), "Salmon");
    assert_eq!(saved, reading.sample);
    assert!(added);
    assert_eq!(detector.favorites().len(), 1);
}

#[test]
fn test_corrupt_favorites_start_empty() {
    let dir = TempDir::new("corrupt");
    let db = dir.0.join("store.db");

    let mut store = Storage::open(&db).unwrap();
    store.set(FAVORITES_KEY, "{not json").unwrap();
    drop(store);

    let favorites = Favorites::load(Box::new(Storage::open(&db).unwrap())).unwrap();
    assert!(favorites.is_empty());
}
