use bevy::prelude::*;

pub mod config;
pub mod geometry;
pub mod graph;
pub mod map;

use config::{load_audio_config, AudioConfig};
use map::{MapSource, ZonedAudioMap};

/// Keeps a [`ZonedAudioMap`] resource in sync with the ingested [`MapSource`].
///
/// Loads [`AudioConfig`] at startup (unless the app already inserted one) and
/// rebuilds the whole zoned map every time the `MapSource` resource is
/// inserted or changed. Zones are never patched in place.
pub struct AudioOcclusionPlugin;

impl Plugin for AudioOcclusionPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, load_audio_config).add_systems(
            Update,
            rebuild_zoned_map.run_if(
                resource_exists::<AudioConfig>.and(resource_exists_and_changed::<MapSource>),
            ),
        );
    }
}

fn rebuild_zoned_map(mut commands: Commands, config: Res<AudioConfig>, source: Res<MapSource>) {
    match ZonedAudioMap::build(config.speaking_radius, &source, config.wall_filter) {
        Ok(map) => {
            let (x, y) = map.zone_counts();
            info!("[AUDIO MAP] Zoned map ready: {} x {} zones", x, y);
            commands.insert_resource(map);
        }
        Err(e) => {
            error!("[AUDIO MAP] Failed to build zoned map: {}", e);
            commands.remove_resource::<ZonedAudioMap>();
        }
    }
}
