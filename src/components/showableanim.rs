//! Timed playback of one animation group.
//!
//! [`ShowableAnim`] steps through the frames `[first, last)` of a group,
//! advancing one frame every `frame_delay` calls to [`ShowableAnim::show`].
//! Reaching `last` rewinds to `first` (or, with `play_once`, holds the last
//! frame). The whole group is kept loaded through a [`GroupLease`]; switching
//! groups acquires the new lease before the old one is released.
//!
//! Wraparound does not call back into user code. [`ShowableAnim::reset`]
//! returns an [`AnimAction`] that the driving loop handles after the tick,
//! which is where a new group may be selected.

use bevy_ecs::prelude::Component;
use log::{debug, warn};

use crate::components::animflags::AnimFlags;
use crate::error::AnimError;
use crate::resources::framestore::{
    FrameStore, FrameStoreSource, GroupLease, SharedFrameStore, lock,
};
use crate::resources::raster::{BlitParams, Point, RasterSurface, Rect, draw_image};

/// Follow-up work produced when playback wraps around.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimAction {
    /// The animation finished a cycle and a completion listener is registered.
    Completed,
    /// A creature needs its next idle animation picked.
    Preview { war_machine: bool },
}

#[derive(Component)]
pub struct ShowableAnim {
    store: SharedFrameStore,
    group_lease: GroupLease,
    group: usize,
    frame: usize,
    first: usize,
    last: usize,
    frame_delay: u32,
    value: u32,
    flags: AnimFlags,
    x_offset: i32,
    y_offset: i32,
    alpha: u8,
    notify_on_complete: bool,
    /// Screen position and display size.
    pub pos: Rect,
}

impl ShowableAnim {
    /// Open `name` from `source`; the new store is owned by this controller.
    pub fn from_source(
        source: &dyn FrameStoreSource,
        name: &str,
        x: i32,
        y: i32,
        flags: AnimFlags,
        delay: u32,
        group: usize,
    ) -> Result<Self, AnimError> {
        let store = source.open(name, flags.compressed)?;
        Ok(Self::new(store, x, y, flags, delay, group))
    }

    /// Play `group` from `store`. The display size is taken from the group's
    /// first frame.
    pub fn new(
        store: SharedFrameStore,
        x: i32,
        y: i32,
        flags: AnimFlags,
        delay: u32,
        group: usize,
    ) -> Self {
        let group_lease = GroupLease::acquire(&store, group);
        let (last, size) = {
            let s = lock(&store);
            let size = s.image(0, group).map(|img| (img.width(), img.height()));
            (s.size(group), size)
        };
        let (w, h) = size.unwrap_or_else(|| {
            warn!("Animation group {} has no frames to size the view from", group);
            (0, 0)
        });
        Self {
            store,
            group_lease,
            group,
            frame: 0,
            first: 0,
            last,
            frame_delay: delay.max(1),
            value: 0,
            flags,
            x_offset: 0,
            y_offset: 0,
            alpha: 255,
            notify_on_complete: false,
            pos: Rect::new(x, y, w, h),
        }
    }

    pub fn store(&self) -> &SharedFrameStore {
        &self.store
    }

    pub fn group(&self) -> usize {
        self.group
    }

    pub fn frame(&self) -> usize {
        self.frame
    }

    pub fn first(&self) -> usize {
        self.first
    }

    pub fn last(&self) -> usize {
        self.last
    }

    /// Ticks elapsed on the current frame.
    pub fn value(&self) -> u32 {
        self.value
    }

    pub fn frame_delay(&self) -> u32 {
        self.frame_delay
    }

    /// Ticks per frame; at least 1.
    pub fn set_frame_delay(&mut self, delay: u32) {
        self.frame_delay = delay.max(1);
        self.value = self.value.min(self.frame_delay - 1);
    }

    pub fn flags(&self) -> AnimFlags {
        self.flags
    }

    pub fn alpha(&self) -> u8 {
        self.alpha
    }

    /// Source offset set by [`clip_rect`](Self::clip_rect).
    pub fn offset(&self) -> Point {
        Point::new(self.x_offset, self.y_offset)
    }

    /// Frame count of any group in the bound store.
    pub fn group_size(&self, group: usize) -> usize {
        lock(&self.store).size(group)
    }

    /// Emit [`AnimAction::Completed`] from every reset.
    pub fn set_completion_notify(&mut self, on: bool) {
        self.notify_on_complete = on;
    }

    pub fn set_alpha(&mut self, alpha: u32) {
        self.alpha = alpha.min(255) as u8;
    }

    /// Play frames `[from, to)` of `group`; `to` is clamped to the group size.
    ///
    /// Returns `false` and changes nothing if the clamped range is empty,
    /// including a range starting at or past the group's end.
    pub fn set_range(&mut self, group: usize, from: usize, to: usize) -> bool {
        let max = self.group_size(group).min(to);
        if max <= from {
            return false;
        }
        self.group_lease = GroupLease::acquire(&self.store, group);
        self.group = group;
        self.frame = from;
        self.first = from;
        self.last = max;
        self.value = 0;
        true
    }

    /// Play all of `group` from its first frame.
    ///
    /// Returns `false` and changes nothing if the group has no frames.
    pub fn set(&mut self, group: usize) -> bool {
        let size = self.group_size(group);
        if size == 0 {
            return false;
        }
        if self.group != group {
            self.group_lease = GroupLease::acquire(&self.store, group);
            self.group = group;
            debug!("Switched animation to group {} ({} frames)", group, size);
        }
        self.first = 0;
        self.last = size;
        self.frame = 0;
        self.value = 0;
        true
    }

    /// Rewind to the start of the range.
    pub fn reset(&mut self) -> Option<AnimAction> {
        self.rewind();
        self.notify_on_complete.then_some(AnimAction::Completed)
    }

    pub(crate) fn rewind(&mut self) {
        self.value = 0;
        self.frame = self.first;
    }

    /// Draw, then advance playback by one tick.
    pub fn show(&mut self, target: &mut dyn RasterSurface) -> Option<AnimAction> {
        self.show_all(target);
        if self.advance() { self.reset() } else { None }
    }

    /// Draw the base frame (if enabled) and the current frame without
    /// advancing.
    pub fn show_all(&self, target: &mut dyn RasterSurface) {
        let store = lock(&self.store);
        if self.flags.base {
            self.blit_frame(&*store, self.first, target);
        }
        self.blit_frame(&*store, self.frame, target);
    }

    /// Count one tick. Returns `true` when playback ran past `last`.
    pub(crate) fn advance(&mut self) -> bool {
        if self.flags.play_once && self.frame + 1 == self.last {
            return false;
        }
        self.value += 1;
        if self.value < self.frame_delay {
            return false;
        }
        self.value = 0;
        self.frame += 1;
        self.frame >= self.last
    }

    fn blit_frame(&self, store: &dyn FrameStore, frame: usize, target: &mut dyn RasterSurface) {
        let Some(img) = store.image(frame, self.group) else {
            return;
        };
        let src = Rect::new(self.x_offset, self.y_offset, self.pos.w, self.pos.h);
        let at = Point::new(self.pos.x - self.x_offset, self.pos.y - self.y_offset);
        let params = BlitParams {
            alpha: self.alpha,
            flip_h: self.flags.flip_h,
            flip_v: self.flags.flip_v,
        };
        draw_image(img, target, at, Some(src), params);
    }

    /// Turn horizontal (or vertical) mirroring on or off.
    pub fn rotate(&mut self, on: bool, vertical: bool) {
        if vertical {
            self.flags.flip_v = on;
        } else {
            self.flags.flip_h = on;
        }
    }

    /// Show only the `width` x `height` part of each frame starting at
    /// `(pos_x, pos_y)` in the frame.
    pub fn clip_rect(&mut self, pos_x: i32, pos_y: i32, width: u32, height: u32) {
        self.x_offset = pos_x;
        self.y_offset = pos_y;
        self.pos.w = width;
        self.pos.h = height;
    }
}
