//! # Configuration
//!
//! World and physics settings, loaded from a JSON file with `serde_json`.
//!
//! Every field has a default, so a configuration file only needs to name the
//! values it changes. Loading never panics: callers get a [`ConfigError`] and
//! decide whether to fall back to [`WorldConfig::default`].

use std::{fs, io, path::Path};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::engine_state::voxels::{
    chunk::DEFAULT_CHUNK_DIMENSION, generation::biome::BiomeParameters,
};

/// Environment variable naming a configuration file.
pub const CONFIG_PATH_ENV: &str = "VOXEL_WORLD_CONFIG";

/// Errors raised while loading a configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Tunables for the physics integrator and collision resolver.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Downward acceleration in blocks per second squared.
    pub gravity: f32,
    /// Scales `gravity`.
    pub gravity_multiplier: f32,
    /// Fraction of horizontal velocity left after one second on the ground.
    pub ground_friction: f32,
    /// Fraction of horizontal velocity left after one second in the air.
    pub air_friction: f32,
    /// Auto-step climb speed in blocks per second.
    pub step_climb_rate: f32,
    /// Horizontal speeds below this snap to zero.
    pub velocity_snap: f32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        PhysicsConfig {
            gravity: 24.0,
            gravity_multiplier: 1.0,
            ground_friction: 0.002,
            air_friction: 0.4,
            step_climb_rate: 6.0,
            velocity_snap: 0.01,
        }
    }
}

/// Settings for world creation and simulation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// Fixed world seed. A random seed is chosen (and logged) when absent.
    pub seed: Option<u64>,
    /// Grid size `(Wx, Wy, Wz)` in chunks.
    pub world_chunks: [usize; 3],
    /// Chunk edge length in blocks.
    pub chunk_size: usize,
    /// Water fills every cell above the terrain and below this height.
    pub water_level: i32,
    /// Lowest terrain surface height before clamping to the water level.
    pub base_offset: i32,
    /// Highest terrain surface as a fraction of the world height.
    pub max_height_fraction: f64,
    /// Biome parameters. The classic grass/dirt/stone palette is used when absent.
    pub biome: Option<BiomeParameters>,
    /// Place floating islands, trees and clouds.
    pub structures: bool,
    /// Scatter tall grass and flowers.
    pub vegetation: bool,
    /// Number of background threads used for world generation.
    pub generation_workers: usize,
    pub physics: PhysicsConfig,
}

impl Default for WorldConfig {
    fn default() -> Self {
        WorldConfig {
            seed: None,
            world_chunks: [8, 4, 8],
            chunk_size: DEFAULT_CHUNK_DIMENSION,
            water_level: 50,
            base_offset: 20,
            max_height_fraction: 0.75,
            biome: None,
            structures: true,
            vegetation: true,
            generation_workers: 1,
            physics: PhysicsConfig::default(),
        }
    }
}

impl WorldConfig {
    /// Reads and validates a configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let data = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let config = Self::from_json(&data).map_err(|err| match err {
            ConfigError::Parse { source, .. } => ConfigError::Parse {
                path: path.display().to_string(),
                source,
            },
            other => other,
        })?;
        Ok(config)
    }

    /// Parses and validates a configuration from a JSON string.
    pub fn from_json(data: &str) -> Result<Self, ConfigError> {
        let config: WorldConfig = serde_json::from_str(data).map_err(|source| ConfigError::Parse {
            path: "<inline>".to_string(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Checks values that would otherwise trip invariants deeper in the engine.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.chunk_size == 0 {
            return Err(ConfigError::Invalid("chunk_size must be non-zero".into()));
        }
        if self.world_chunks.iter().any(|&n| n == 0) {
            return Err(ConfigError::Invalid(
                "world_chunks must be non-zero on every axis".into(),
            ));
        }
        if !(0.0..=1.0).contains(&self.max_height_fraction) {
            return Err(ConfigError::Invalid(
                "max_height_fraction must lie in [0, 1]".into(),
            ));
        }
        Ok(())
    }

    /// World height in blocks.
    pub fn world_height(&self) -> i32 {
        (self.world_chunks[1] * self.chunk_size) as i32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let config = WorldConfig::from_json(
            r#"{ "seed": 99, "water_level": 40, "physics": { "gravity_multiplier": 2.0 } }"#,
        )
        .unwrap();
        assert_eq!(config.seed, Some(99));
        assert_eq!(config.water_level, 40);
        assert_eq!(config.chunk_size, DEFAULT_CHUNK_DIMENSION);
        assert_eq!(config.physics.gravity_multiplier, 2.0);
        assert_eq!(config.physics.gravity, PhysicsConfig::default().gravity);
        assert!(config.biome.is_none());
    }

    #[test]
    fn biome_parameters_are_read_and_clamped() {
        let config = WorldConfig::from_json(
            r#"{ "biome": { "temperature": 9, "humidity": 1, "relief": 0 } }"#,
        )
        .unwrap();
        assert_eq!(config.biome, Some(BiomeParameters::new(4, 1, 0)));
    }

    #[test]
    fn invalid_values_are_rejected() {
        assert!(matches!(
            WorldConfig::from_json(r#"{ "chunk_size": 0 }"#),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            WorldConfig::from_json("{ not json"),
            Err(ConfigError::Parse { .. })
        ));
        assert!(matches!(
            WorldConfig::load("/definitely/not/here.json"),
            Err(ConfigError::Io { .. })
        ));
    }
}
