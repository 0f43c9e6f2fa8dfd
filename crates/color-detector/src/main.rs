//! `colordet` - CLI for color-detector
//!
//! Samples the center of a camera or image and names the color.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::Parser;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use color_detector::camera::{CameraDevice, StillImageDevice};
use color_detector::cli::{
    Cli, Command, ConfigCommand, FavoritesCommand, NameCommand, SampleCommand, WatchCommand,
};
use color_detector::clipboard::{Copier, SystemClipboard};
use color_detector::color::{normalize_hex, Rgb, Sample};
use color_detector::frame::{FrameSource, StillImageSource};
use color_detector::naming::{ColorNamer, NearestNamer};
use color_detector::{init_logging, Config, Detector, Favorites, Reading, Storage};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbosity());

    let config = Config::load_from(cli.config.clone()).context("failed to load configuration")?;

    match cli.command {
        Command::Watch(cmd) => handle_watch(&config, &cmd).await,
        Command::Sample(cmd) => handle_sample(&config, &cmd),
        Command::Name(cmd) => handle_name(&cmd),
        Command::Favorites(cmd) => handle_favorites(&config, cmd),
        Command::Status(cmd) => handle_status(&config, cmd.json),
        Command::Config(cmd) => handle_config(&config, cmd),
    }
}

fn open_favorites(config: &Config) -> Result<Favorites> {
    let path = config.database_path();
    let storage = Storage::open(&path)
        .with_context(|| format!("failed to open database {}", path.display()))?;
    Ok(Favorites::load(Box::new(storage))?)
}

fn camera_device(image: Option<&Path>) -> Result<Box<dyn CameraDevice>> {
    if let Some(path) = image {
        return Ok(Box::new(StillImageDevice::new(path)));
    }

    #[cfg(feature = "webcam")]
    {
        Ok(Box::new(color_detector::webcam::Webcam::new()))
    }

    #[cfg(not(feature = "webcam"))]
    {
        bail!("built without webcam support; pass --image FILE or rebuild with --features webcam")
    }
}

fn print_reading(reading: &Reading, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string(&reading.sample)?);
    } else {
        println!(
            "{}  {}  (text {})",
            reading.sample.hex(),
            reading.sample.name(),
            reading.rgb.contrast_text()
        );
    }
    Ok(())
}

/// Forward stdin lines from a plain thread. It is never joined, so a read
/// still pending at exit doesn't hold the process open.
fn spawn_input() -> mpsc::Receiver<String> {
    let (tx, rx) = mpsc::channel(8);
    std::thread::spawn(move || {
        for line in std::io::stdin().lines() {
            let Ok(line) = line else { break };
            if tx.blocking_send(line).is_err() {
                break;
            }
        }
    });
    rx
}

async fn handle_watch(config: &Config, cmd: &WatchCommand) -> Result<()> {
    let device = camera_device(cmd.image.as_deref())?;
    let namer: Arc<dyn ColorNamer> = Arc::new(NearestNamer::new());
    let favorites_path = config.database_path();
    let storage = Storage::open(&favorites_path)
        .with_context(|| format!("failed to open database {}", favorites_path.display()))?;

    let mut detector = Detector::new(config, device, namer, Box::new(storage))?;
    let mut input = spawn_input();

    let mut status = detector.start().clone();
    while !status.is_ready() {
        let message = status.message().unwrap_or("camera unavailable").to_string();
        eprintln!("{message}");
        eprint!("Retry? [Y/n] ");
        match input.recv().await {
            Some(answer) if !answer.trim().eq_ignore_ascii_case("n") => {
                status = detector.retry().clone();
            }
            _ => bail!("{message}"),
        }
    }
    info!(
        source = %detector.session().source_name().unwrap_or_default(),
        interval_ms = config.sampler.interval_ms,
        "Watching"
    );
    if !cmd.json {
        eprintln!("Keys: f favorite, c copy, p pause, r retry camera, q quit (then Enter)");
    }

    let (tx, mut rx) = mpsc::channel::<Reading>(16);
    let handle = detector.handle();
    let control = detector.control();
    let limit = cmd.count;
    let (all, json) = (cmd.all, cmd.json);

    let consumer = async move {
        let mut copier = Copier::new(SystemClipboard);
        let mut latest: Option<Sample> = None;
        let mut input_open = true;
        let mut seen = 0usize;
        loop {
            tokio::select! {
                reading = rx.recv() => {
                    let Some(reading) = reading else { break };
                    if all || reading.added_to_history {
                        print_reading(&reading, json)?;
                    }
                    latest = Some(reading.sample);
                    seen += 1;
                    if limit.is_some_and(|n| seen >= n) {
                        handle.stop();
                        break;
                    }
                }
                line = input.recv(), if input_open => {
                    let Some(line) = line else {
                        input_open = false;
                        continue;
                    };
                    match line.trim() {
                        "f" => match control.favorite_current().await {
                            Ok((sample, true)) => eprintln!("Saved {sample}"),
                            Ok((sample, false)) => {
                                eprintln!("{} is already a favorite", sample.hex());
                            }
                            Err(e) => warn!(error = %e, "Failed to save favorite"),
                        },
                        "c" => match &latest {
                            Some(sample) => match copier.copy(sample) {
                                Ok(()) => eprintln!("Copied {}", sample.hex()),
                                Err(e) => warn!(error = %e, "Failed to copy"),
                            },
                            None => eprintln!("Nothing sampled yet"),
                        },
                        "p" => {
                            let paused = control.toggle_pause().await?;
                            eprintln!("{}", if paused { "Paused" } else { "Resumed" });
                        }
                        "r" => {
                            let status = control.retry().await?;
                            eprintln!("Camera: {status}");
                        }
                        "q" => {
                            handle.stop();
                            break;
                        }
                        "" => {}
                        other => eprintln!("Unknown key '{other}'"),
                    }
                }
                _ = tokio::signal::ctrl_c() => {
                    debug!("Interrupted");
                    handle.stop();
                    break;
                }
            }
        }
        Ok::<_, anyhow::Error>(())
    };

    let ((), consumed) = tokio::join!(detector.run(tx), consumer);
    detector.shutdown();
    consumed?;

    if !json && !detector.history().is_empty() {
        println!();
        println!("Recent colors:");
        for sample in detector.history().iter() {
            println!("  {sample}");
        }
    }
    Ok(())
}

fn handle_sample(config: &Config, cmd: &SampleCommand) -> Result<()> {
    let mut source = StillImageSource::open(&cmd.image)?;
    let rgb = source.grab()?.center_pixel();
    source.stop();

    let sample = Sample::new(rgb, NearestNamer::new().name(rgb));

    if cmd.copy {
        Copier::new(SystemClipboard).copy(&sample)?;
        info!(hex = sample.hex(), "Copied to clipboard");
    }

    if cmd.favorite {
        let mut favorites = open_favorites(config)?;
        if favorites.add(sample.clone())? {
            info!(hex = sample.hex(), "Saved to favorites");
        }
    }

    if cmd.json {
        let output = serde_json::json!({
            "hex": sample.hex(),
            "name": sample.name(),
            "rgb": [rgb.r, rgb.g, rgb.b],
            "text": rgb.contrast_text().to_hex(),
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        println!("{sample}");
    }
    Ok(())
}

fn handle_name(cmd: &NameCommand) -> Result<()> {
    let rgb = Rgb::from_hex(&cmd.hex)?;
    let name = NearestNamer::new().name(rgb);

    if cmd.json {
        let output = serde_json::json!({
            "hex": rgb.to_hex(),
            "name": name,
            "luminance": rgb.luminance(),
            "text": rgb.contrast_text().to_hex(),
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        println!("{}  {}  (text {})", rgb.to_hex(), name, rgb.contrast_text());
    }
    Ok(())
}

fn handle_favorites(config: &Config, cmd: FavoritesCommand) -> Result<()> {
    let mut favorites = open_favorites(config)?;

    match cmd {
        FavoritesCommand::List { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(favorites.as_slice())?);
            } else if favorites.is_empty() {
                println!("No favorites saved.");
            } else {
                for sample in favorites.iter() {
                    println!("{sample}");
                }
            }
        }
        FavoritesCommand::Add { hex } => {
            let rgb = Rgb::from_hex(&hex)?;
            let sample = Sample::new(rgb, NearestNamer::new().name(rgb));
            if favorites.add(sample.clone())? {
                println!("Saved {sample}");
            } else {
                println!("{} is already a favorite", sample.hex());
            }
        }
        FavoritesCommand::Remove { hex } => {
            let hex = normalize_hex(&hex)?;
            if favorites.remove(&hex)? {
                println!("Removed {hex}");
            } else {
                println!("{hex} was not a favorite");
            }
        }
    }
    Ok(())
}

fn handle_status(config: &Config, json: bool) -> Result<()> {
    let path = config.database_path();
    let exists = path.exists();
    let (favorites, stats) = if exists {
        let storage = Storage::open(&path)?;
        let stats = storage.stats()?;
        (Favorites::load(Box::new(storage))?.len(), Some(stats))
    } else {
        (0, None)
    };

    if json {
        let status = serde_json::json!({
            "database_path": path,
            "database_exists": exists,
            "database_size_bytes": stats.as_ref().map(|s| s.db_size_bytes),
            "favorites": favorites,
            "cache_name": config.offline.cache_name(),
            "origin": config.offline.origin,
            "webcam_support": cfg!(feature = "webcam"),
        });
        println!("{}", serde_json::to_string_pretty(&status)?);
    } else {
        println!("colordet status");
        println!("---------------");
        println!("Database:      {}", path.display());
        if let Some(stats) = &stats {
            println!("Size:          {} bytes", stats.db_size_bytes);
        } else {
            println!("Size:          (not created yet)");
        }
        println!("Favorites:     {favorites}");
        println!("Cache:         {}", config.offline.cache_name());
        println!("Origin:        {}", config.offline.origin);
        println!(
            "Webcam:        {}",
            if cfg!(feature = "webcam") { "enabled" } else { "disabled" }
        );
    }
    Ok(())
}

fn handle_config(config: &Config, cmd: ConfigCommand) -> Result<()> {
    match cmd {
        ConfigCommand::Show { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(config)?);
            } else {
                println!("Current Configuration");
                println!("=====================");
                println!();
                println!("[Camera]");
                println!("  Device index:       {}", config.camera.device_index);
                println!(
                    "  Ideal resolution:   {}x{}",
                    config.camera.ideal_width, config.camera.ideal_height
                );
                println!("  Facing:             {}", config.camera.facing);
                println!();
                println!("[Sampler]");
                println!("  Interval (ms):      {}", config.sampler.interval_ms);
                println!("  History length:     {}", config.sampler.history_len);
                println!();
                println!("[Storage]");
                println!("  Database path:      {}", config.database_path().display());
                println!();
                println!("[Offline]");
                println!("  Cache name:         {}", config.offline.cache_name());
                println!("  Origin:             {}", config.offline.origin);
                println!("  Precached assets:   {}", config.offline.precache.len());
            }
        }
        ConfigCommand::Path => {
            println!("{}", Config::default_config_path().display());
        }
        ConfigCommand::Validate { file } => {
            let path = file.unwrap_or_else(Config::default_config_path);
            println!("Validating configuration: {}", path.display());
            match Config::load_from(Some(path)) {
                Ok(_) => println!("Configuration is valid."),
                Err(e) => bail!("Configuration error: {e}"),
            }
        }
    }
    Ok(())
}
