//! Frame store abstraction and scoped frame references.
//!
//! A [`FrameStore`] maps `(group, frame)` to a decoded image and keeps
//! reference counts for what is loaded. Holders never call `load`/`unload`
//! by hand: they keep a [`FrameLease`] (one frame) or a [`GroupLease`] (a
//! whole group) whose drop releases exactly what it acquired.
//!
//! Stores are shared through [`SharedFrameStore`]. Several views may hold
//! clones of the same handle; each balances its own references.

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::error::AnimError;
use crate::resources::raster::Surface;

/// Source of decoded frames, grouped by animation group.
pub trait FrameStore: Send {
    /// Number of frames in `group` (0 for unknown groups).
    fn size(&self, group: usize) -> usize;
    /// Take a reference on one frame. Returns `false` if it does not exist.
    fn load(&mut self, frame: usize, group: usize) -> bool;
    /// Release a reference taken by [`load`](Self::load).
    fn unload(&mut self, frame: usize, group: usize);
    /// Take a reference on every frame of `group`.
    fn load_group(&mut self, group: usize);
    /// Release a reference taken by [`load_group`](Self::load_group).
    fn unload_group(&mut self, group: usize);
    /// Loaded image for `(frame, group)`.
    fn image(&self, frame: usize, group: usize) -> Option<&dyn Surface>;
    fn image_mut(&mut self, frame: usize, group: usize) -> Option<&mut dyn Surface>;
}

/// Handle to a frame store shared between views.
pub type SharedFrameStore = Arc<Mutex<dyn FrameStore>>;

/// Wrap a store into a fresh, exclusively held handle.
pub fn share<S: FrameStore + 'static>(store: S) -> SharedFrameStore {
    Arc::new(Mutex::new(store))
}

/// Lock a shared store. Playback is single threaded, so a poisoned lock only
/// means an earlier panic; the counts inside are still usable.
pub fn lock(store: &SharedFrameStore) -> MutexGuard<'_, dyn FrameStore + 'static> {
    store.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Opens frame stores by resource name.
pub trait FrameStoreSource {
    /// Create a new store for `name`. `compressed` selects compressed frames.
    fn open(&self, name: &str, compressed: bool) -> Result<SharedFrameStore, AnimError>;
}

/// One frame reference, released on drop.
pub struct FrameLease {
    store: SharedFrameStore,
    frame: usize,
    group: usize,
    loaded: bool,
}

impl FrameLease {
    /// Load `(frame, group)`. A missing frame yields an inert lease that
    /// releases nothing.
    pub fn acquire(store: &SharedFrameStore, frame: usize, group: usize) -> Self {
        let loaded = lock(store).load(frame, group);
        Self {
            store: Arc::clone(store),
            frame,
            group,
            loaded,
        }
    }

    pub fn frame(&self) -> usize {
        self.frame
    }

    pub fn group(&self) -> usize {
        self.group
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }
}

impl Drop for FrameLease {
    fn drop(&mut self) {
        if self.loaded {
            lock(&self.store).unload(self.frame, self.group);
        }
    }
}

impl fmt::Debug for FrameLease {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FrameLease")
            .field("frame", &self.frame)
            .field("group", &self.group)
            .field("loaded", &self.loaded)
            .finish()
    }
}

/// Group-level reference, released on drop.
pub struct GroupLease {
    store: SharedFrameStore,
    group: usize,
}

impl GroupLease {
    pub fn acquire(store: &SharedFrameStore, group: usize) -> Self {
        lock(store).load_group(group);
        Self {
            store: Arc::clone(store),
            group,
        }
    }

    pub fn group(&self) -> usize {
        self.group
    }
}

impl Drop for GroupLease {
    fn drop(&mut self) {
        lock(&self.store).unload_group(self.group);
    }
}

impl fmt::Debug for GroupLease {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GroupLease")
            .field("group", &self.group)
            .finish()
    }
}
