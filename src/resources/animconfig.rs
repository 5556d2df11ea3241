//! Playback configuration resource.
//!
//! Settings loaded from an INI file, with defaults for safe startup.
//!
//! # Configuration File Format
//!
//! ```ini
//! [playback]
//! frame_delay = 4
//! creature_frame_delay = 4
//! alpha = 255
//!
//! [preview]
//! war_machine = false
//! seed = 1234
//!
//! [library]
//! path = ./animations.json
//! ```

use bevy_ecs::prelude::*;
use configparser::ini::Ini;
use log::info;
use std::path::PathBuf;

use crate::components::creatureanim::CreatureAnim;
use crate::components::showableanim::ShowableAnim;
use crate::error::AnimError;

const DEFAULT_FRAME_DELAY: u32 = 4;
const DEFAULT_CREATURE_FRAME_DELAY: u32 = 4;
const DEFAULT_ALPHA: u8 = 255;
const DEFAULT_WAR_MACHINE: bool = false;
const DEFAULT_LIBRARY_PATH: &str = "./animations.json";
const DEFAULT_CONFIG_PATH: &str = "./animkit.ini";

/// Playback configuration resource.
#[derive(Resource, Debug, Clone, PartialEq)]
pub struct AnimConfig {
    /// Ticks per frame for generic playback.
    pub frame_delay: u32,
    /// Ticks per frame for creature animations.
    pub creature_frame_delay: u32,
    /// Initial alpha for new controllers.
    pub alpha: u8,
    /// Preview with the war machine candidate list.
    pub war_machine: bool,
    /// Seed for [`AnimRng`](crate::resources::random::AnimRng); random when absent.
    pub seed: Option<u64>,
    /// Animation library JSON file.
    pub library_path: PathBuf,
    /// Path to the configuration file.
    pub config_path: PathBuf,
}

impl Default for AnimConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl AnimConfig {
    /// Create a new configuration with safe default values.
    pub fn new() -> Self {
        Self {
            frame_delay: DEFAULT_FRAME_DELAY,
            creature_frame_delay: DEFAULT_CREATURE_FRAME_DELAY,
            alpha: DEFAULT_ALPHA,
            war_machine: DEFAULT_WAR_MACHINE,
            seed: None,
            library_path: PathBuf::from(DEFAULT_LIBRARY_PATH),
            config_path: PathBuf::from(DEFAULT_CONFIG_PATH),
        }
    }

    /// Create a new configuration with a custom config file path.
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: path.into(),
            ..Self::new()
        }
    }

    /// Load configuration from the INI file.
    ///
    /// Missing values retain their current (default) values.
    pub fn load_from_file(&mut self) -> Result<(), AnimError> {
        let mut config = Ini::new();
        config.load(&self.config_path).map_err(|e| {
            AnimError::Config(format!(
                "failed to load {}: {}",
                self.config_path.display(),
                e
            ))
        })?;

        // [playback] section
        if let Some(delay) = config.getuint("playback", "frame_delay").ok().flatten() {
            self.frame_delay = tick_delay(delay);
        }
        if let Some(delay) = config
            .getuint("playback", "creature_frame_delay")
            .ok()
            .flatten()
        {
            self.creature_frame_delay = tick_delay(delay);
        }
        if let Some(alpha) = config.getuint("playback", "alpha").ok().flatten() {
            self.alpha = alpha.min(255) as u8;
        }

        // [preview] section
        if let Some(war_machine) = config.getbool("preview", "war_machine").ok().flatten() {
            self.war_machine = war_machine;
        }
        if let Some(seed) = config.getuint("preview", "seed").ok().flatten() {
            self.seed = Some(seed);
        }

        // [library] section
        if let Some(path) = config.get("library", "path") {
            self.library_path = PathBuf::from(path);
        }

        info!(
            "Loaded config: frame_delay={}, creature_frame_delay={}, alpha={}, war_machine={}, seed={:?}, library={}",
            self.frame_delay,
            self.creature_frame_delay,
            self.alpha,
            self.war_machine,
            self.seed,
            self.library_path.display()
        );

        Ok(())
    }

    /// Apply generic playback settings to a controller.
    pub fn configure_playback(&self, anim: &mut ShowableAnim) {
        anim.set_frame_delay(self.frame_delay);
        anim.set_alpha(u32::from(self.alpha));
    }

    /// Apply creature settings and start the idle preview.
    pub fn configure_creature(&self, creature: &mut CreatureAnim) {
        creature.anim_mut().set_frame_delay(self.creature_frame_delay);
        creature.anim_mut().set_alpha(u32::from(self.alpha));
        creature.start_preview(self.war_machine);
    }

    /// Save configuration to the INI file.
    pub fn save_to_file(&self) -> Result<(), AnimError> {
        let mut config = Ini::new();

        config.set("playback", "frame_delay", Some(self.frame_delay.to_string()));
        config.set(
            "playback",
            "creature_frame_delay",
            Some(self.creature_frame_delay.to_string()),
        );
        config.set("playback", "alpha", Some(self.alpha.to_string()));

        config.set("preview", "war_machine", Some(self.war_machine.to_string()));
        if let Some(seed) = self.seed {
            config.set("preview", "seed", Some(seed.to_string()));
        }

        config.set(
            "library",
            "path",
            Some(self.library_path.display().to_string()),
        );

        config.write(&self.config_path).map_err(|e| AnimError::Io {
            path: self.config_path.clone(),
            source: e,
        })?;

        info!("Saved config to {:?}", self.config_path);

        Ok(())
    }
}

/// Ticks per frame from the INI value; at least 1, saturating at `u32::MAX`.
fn tick_delay(value: u64) -> u32 {
    u32::try_from(value).unwrap_or(u32::MAX).max(1)
}
