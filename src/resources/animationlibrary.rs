//! Animation resource registry.
//!
//! Maps animation names to frame layouts and opens a fresh
//! [`MemoryFrameStore`] for each view constructed by name. The layout is a
//! small JSON document:
//!
//! ```json
//! {
//!   "animations": {
//!     "pikeman": {
//!       "groups": {
//!         "2": [ { "width": 32, "height": 48, "color": { "r": 0, "g": 0, "b": 200, "a": 255 } } ]
//!       }
//!     }
//!   }
//! }
//! ```
//!
//! Group keys are raw group indices (see [`AnimType`](crate::components::animtype::AnimType)
//! for the creature numbering).

use std::collections::BTreeMap;
use std::path::Path;

use bevy_ecs::prelude::Resource;
use log::info;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::error::AnimError;
use crate::resources::framestore::{FrameStoreSource, SharedFrameStore, share};
use crate::resources::memoryframestore::MemoryFrameStore;
use crate::resources::raster::{Canvas, Rgba};

/// One solid-colour frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FrameDef {
    pub width: u32,
    pub height: u32,
    pub color: Rgba,
}

/// Frames of one animation, keyed by group index.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnimationDef {
    pub groups: BTreeMap<usize, Vec<FrameDef>>,
}

impl AnimationDef {
    pub fn with_group(mut self, group: usize, frames: Vec<FrameDef>) -> Self {
        self.groups.insert(group, frames);
        self
    }

    /// Frame count per group, for logging.
    pub fn summary(&self) -> String {
        self.groups
            .iter()
            .map(|(g, frames)| format!("{}:{}", g, frames.len()))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Central registry of animation layouts keyed by name.
#[derive(Resource, Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnimationLibrary {
    pub animations: FxHashMap<String, AnimationDef>,
}

impl AnimationLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json_str(json: &str) -> Result<Self, AnimError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, AnimError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| AnimError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let library = Self::from_json_str(&json)?;
        info!(
            "Loaded {} animation(s) from {}",
            library.animations.len(),
            path.display()
        );
        Ok(library)
    }

    pub fn insert(&mut self, name: impl Into<String>, def: AnimationDef) {
        self.animations.insert(name.into(), def);
    }

    pub fn get(&self, name: &str) -> Option<&AnimationDef> {
        self.animations.get(name)
    }

    /// Build an unshared store for `name`.
    pub fn build_store(&self, name: &str, compressed: bool) -> Result<MemoryFrameStore, AnimError> {
        let def = self
            .get(name)
            .ok_or_else(|| AnimError::UnknownAnimation(name.to_string()))?;
        let mut store = MemoryFrameStore::new(name).with_compressed(compressed);
        for (group, frames) in &def.groups {
            let canvases = frames
                .iter()
                .map(|f| Canvas::filled(f.width, f.height, f.color))
                .collect();
            store = store.with_group(*group, canvases);
        }
        Ok(store)
    }
}

impl FrameStoreSource for AnimationLibrary {
    fn open(&self, name: &str, compressed: bool) -> Result<SharedFrameStore, AnimError> {
        self.build_store(name, compressed).map(share)
    }
}
