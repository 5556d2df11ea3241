//! In-memory frame store with observable reference counts.
//!
//! Frames are [`Canvas`] bitmaps kept per group. An image is only handed out
//! while something holds a reference on it (the frame itself or its whole
//! group), the same way a disk-backed store only keeps decoded frames that
//! are in use. Load/unload counters make reference balance easy to check.

use log::{debug, warn};
use rustc_hash::FxHashMap;

use crate::resources::framestore::FrameStore;
use crate::resources::raster::{Canvas, Rgba, Surface};

#[derive(Debug, Clone, Default)]
pub struct MemoryFrameStore {
    name: String,
    compressed: bool,
    groups: FxHashMap<usize, Vec<Canvas>>,
    frame_refs: FxHashMap<(usize, usize), u32>,
    group_refs: FxHashMap<usize, u32>,
    loads: usize,
    unloads: usize,
}

impl MemoryFrameStore {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_compressed(mut self, compressed: bool) -> Self {
        self.compressed = compressed;
        self
    }

    pub fn with_group(mut self, group: usize, frames: Vec<Canvas>) -> Self {
        self.groups.insert(group, frames);
        self
    }

    /// Add `count` solid frames of the same size and colour.
    pub fn with_solid_group(
        self,
        group: usize,
        count: usize,
        width: u32,
        height: u32,
        color: Rgba,
    ) -> Self {
        self.with_group(group, vec![Canvas::filled(width, height, color); count])
    }

    pub fn push_frame(&mut self, group: usize, frame: Canvas) {
        self.groups.entry(group).or_default().push(frame);
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_compressed(&self) -> bool {
        self.compressed
    }

    /// Outstanding single-frame references on `(frame, group)`.
    pub fn frame_refs(&self, frame: usize, group: usize) -> u32 {
        self.frame_refs.get(&(group, frame)).copied().unwrap_or(0)
    }

    /// Outstanding group-level references on `group`.
    pub fn group_refs(&self, group: usize) -> u32 {
        self.group_refs.get(&group).copied().unwrap_or(0)
    }

    /// Total successful `load` and `load_group` calls.
    pub fn loads(&self) -> usize {
        self.loads
    }

    /// Total `unload` and `unload_group` calls that released something.
    pub fn unloads(&self) -> usize {
        self.unloads
    }

    /// No references outstanding.
    pub fn is_balanced(&self) -> bool {
        self.frame_refs.is_empty() && self.group_refs.is_empty()
    }

    fn is_loaded(&self, frame: usize, group: usize) -> bool {
        self.frame_refs(frame, group) > 0 || self.group_refs(group) > 0
    }

    fn exists(&self, frame: usize, group: usize) -> bool {
        frame < self.size(group)
    }
}

fn release<K: std::hash::Hash + Eq>(refs: &mut FxHashMap<K, u32>, key: K) -> bool {
    match refs.get_mut(&key) {
        Some(count) if *count > 1 => {
            *count -= 1;
            true
        }
        Some(_) => {
            refs.remove(&key);
            true
        }
        None => false,
    }
}

impl FrameStore for MemoryFrameStore {
    fn size(&self, group: usize) -> usize {
        self.groups.get(&group).map_or(0, Vec::len)
    }

    fn load(&mut self, frame: usize, group: usize) -> bool {
        if !self.exists(frame, group) {
            warn!(
                "{}: cannot load missing frame {}:{}",
                self.name, group, frame
            );
            return false;
        }
        *self.frame_refs.entry((group, frame)).or_insert(0) += 1;
        self.loads += 1;
        true
    }

    fn unload(&mut self, frame: usize, group: usize) {
        if release(&mut self.frame_refs, (group, frame)) {
            self.unloads += 1;
        } else {
            warn!(
                "{}: unbalanced unload of frame {}:{}",
                self.name, group, frame
            );
        }
    }

    fn load_group(&mut self, group: usize) {
        *self.group_refs.entry(group).or_insert(0) += 1;
        self.loads += 1;
        debug!(
            "{}: loaded group {} ({} frames{})",
            self.name(),
            group,
            self.size(group),
            if self.is_compressed() { ", compressed" } else { "" }
        );
    }

    fn unload_group(&mut self, group: usize) {
        if release(&mut self.group_refs, group) {
            self.unloads += 1;
        } else {
            warn!("{}: unbalanced unload of group {}", self.name, group);
        }
    }

    fn image(&self, frame: usize, group: usize) -> Option<&dyn Surface> {
        if !self.is_loaded(frame, group) {
            return None;
        }
        self.groups
            .get(&group)
            .and_then(|frames| frames.get(frame))
            .map(|c| c as &dyn Surface)
    }

    fn image_mut(&mut self, frame: usize, group: usize) -> Option<&mut dyn Surface> {
        if !self.is_loaded(frame, group) {
            return None;
        }
        self.groups
            .get_mut(&group)
            .and_then(|frames| frames.get_mut(frame))
            .map(|c| c as &mut dyn Surface)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> MemoryFrameStore {
        MemoryFrameStore::new("unit").with_solid_group(2, 3, 4, 4, Rgba::opaque(0, 0, 200))
    }

    #[test]
    fn test_size_of_unknown_group_is_zero() {
        let s = store();
        assert_eq!(s.size(2), 3);
        assert_eq!(s.size(7), 0);
    }

    #[test]
    fn test_load_missing_frame_fails_without_counting() {
        let mut s = store();
        assert!(!s.load(3, 2));
        assert_eq!(s.loads(), 0);
        assert!(s.is_balanced());
    }

    #[test]
    fn test_refcounts_nest() {
        let mut s = store();
        assert!(s.load(1, 2));
        assert!(s.load(1, 2));
        s.unload(1, 2);
        assert_eq!(s.frame_refs(1, 2), 1);
        assert!(s.image(1, 2).is_some());
        s.unload(1, 2);
        assert!(s.image(1, 2).is_none());
        assert!(s.is_balanced());
    }

    #[test]
    fn test_unbalanced_unload_is_ignored() {
        let mut s = store();
        s.unload(0, 2);
        s.unload_group(2);
        assert_eq!(s.unloads(), 0);
        assert!(s.is_balanced());
    }

    #[test]
    fn test_image_mut_recolors_frame() {
        let mut s = store();
        s.load_group(2);
        if let Some(img) = s.image_mut(0, 2) {
            img.player_colored(crate::resources::raster::PlayerColor(0));
        }
        let img = s.image(0, 2).expect("loaded");
        assert_eq!(img.pixel(0, 0), Rgba::opaque(200, 0, 0));
    }
}
