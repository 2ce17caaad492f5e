use bevy::prelude::*;

use earshot::audio::map::{MapSource, ZonedAudioMap};
use earshot::audio::AudioOcclusionPlugin;

use std::fs;
use std::path::{Path, PathBuf};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const DEMO_MAP_PATH: &str = "assets/demo_map.ron";
const LOG_DIR: &str = "logs";
const LOG_KEEP_COUNT: usize = 25;

/// Install stdout + file logging. Returns the log file path, or None when the
/// log directory is unavailable and only stdout is used.
fn setup_logging() -> Option<String> {
    let filter = || {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("bevy_ecs=warn,earshot=info"))
    };

    fn stdout_layer<S>() -> impl tracing_subscriber::Layer<S>
    where
        S: bevy::log::tracing::Subscriber
            + for<'a> tracing_subscriber::registry::LookupSpan<'a>,
    {
        fmt::layer().with_writer(std::io::stdout).with_target(false)
    }

    let log_dir = PathBuf::from(LOG_DIR);
    if let Err(e) = fs::create_dir_all(&log_dir) {
        tracing_subscriber::registry().with(filter()).with(stdout_layer()).init();
        warn!("Failed to create {}: {} (logging to stdout only)", LOG_DIR, e);
        return None;
    }

    // Clean up old log files, keeping only the newest ones
    cleanup_old_logs(&log_dir, LOG_KEEP_COUNT);

    let now = chrono::Local::now();
    let log_filename = format!("earshot_{}.log", now.format("%Y%m%d_%H%M%S"));
    let log_path_str = log_dir.join(&log_filename).to_string_lossy().to_string();

    let file_appender = RollingFileAppender::new(Rotation::NEVER, &log_dir, &log_filename);
    let file_layer = fmt::layer().with_writer(file_appender).with_ansi(false);

    tracing_subscriber::registry()
        .with(filter())
        .with(file_layer)
        .with(stdout_layer())
        .init();

    Some(log_path_str)
}

fn cleanup_old_logs(log_dir: &Path, keep_count: usize) {
    let Ok(entries) = fs::read_dir(log_dir) else {
        return;
    };
    let mut log_files: Vec<_> = entries
        .filter_map(|e| e.ok())
        .filter(|e| {
            e.file_name()
                .to_str()
                .is_some_and(|s| s.starts_with("earshot") && s.ends_with(".log"))
        })
        .collect();

    // Oldest first
    log_files.sort_by_key(|e| e.metadata().ok().and_then(|m| m.modified().ok()));

    if log_files.len() > keep_count {
        for file in log_files.iter().take(log_files.len() - keep_count) {
            let _ = fs::remove_file(file.path());
        }
    }
}

fn load_map_source(path: &str) -> Option<MapSource> {
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) => {
            error!("Failed to read map {}: {}", path, e);
            return None;
        }
    };
    match MapSource::from_ron(&contents) {
        Ok(source) => Some(source),
        Err(e) => {
            error!("Failed to parse map {}: {}", path, e);
            None
        }
    }
}

/// Log the travel distance from every point of interest to every other point
/// in the zone that owns it.
fn report_routes(map: &ZonedAudioMap, source: &MapSource) {
    for &from in &source.points {
        let Some(zone) = map.zone_for_point(from) else {
            info!("({:.1}, {:.1}) is outside the zone grid", from.x, from.y);
            continue;
        };
        for &to in &source.points {
            if from == to || zone.node_at(to).is_none() {
                continue;
            }
            match map.route(from, to) {
                Ok(Some(route)) => info!(
                    "({:.1}, {:.1}) -> ({:.1}, {:.1}): distance {:.2} via {} hops",
                    from.x,
                    from.y,
                    to.x,
                    to.y,
                    route.distance,
                    route.waypoints.len() - 1
                ),
                Ok(None) => info!(
                    "({:.1}, {:.1}) -> ({:.1}, {:.1}): occluded",
                    from.x, from.y, to.x, to.y
                ),
                Err(e) => error!("Route query failed: {}", e),
            }
        }
    }
}

fn main() {
    let log_file = setup_logging();

    if let Some(log_file) = &log_file {
        println!("╔══════════════════════════════════════════════════════════╗");
        println!("║  Earshot - Logging to file                               ║");
        println!("╠══════════════════════════════════════════════════════════╣");
        println!("║  Log file: {:<45} ║", log_file);
        println!("╚══════════════════════════════════════════════════════════╝");
    }

    let map_path = std::env::args().nth(1).unwrap_or_else(|| DEMO_MAP_PATH.to_string());
    let Some(source) = load_map_source(&map_path) else {
        std::process::exit(1);
    };

    let mut app = App::new();
    app.add_plugins(MinimalPlugins)
        .add_plugins(AudioOcclusionPlugin)
        .insert_resource(source.clone());

    // One frame runs Startup (config) and the rebuild system
    app.update();

    let Some(map) = app.world().get_resource::<ZonedAudioMap>() else {
        error!("Zoned map was not built from {}", map_path);
        std::process::exit(1);
    };
    report_routes(map, &source);
}
