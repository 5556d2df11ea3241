//! Single-frame animation view.
//!
//! [`AnimImage`] shows one frame of an animation resource, optionally on top
//! of the group's frame 0 (the "base"). It holds a [`FrameLease`] on the
//! displayed frame and, with the base flag, a second lease on frame 0 of the
//! current group. Both are released when the view is dropped.

use bevy_ecs::prelude::Component;
use log::error;

use crate::error::AnimError;
use crate::components::animflags::AnimFlags;
use crate::resources::framestore::{FrameLease, FrameStoreSource, SharedFrameStore, lock};
use crate::resources::raster::{BlitParams, PlayerColor, RasterSurface, Rect, draw_image};

#[derive(Component)]
pub struct AnimImage {
    store: SharedFrameStore,
    frame: usize,
    group: usize,
    frame_lease: FrameLease,
    base_lease: Option<FrameLease>,
    player: Option<PlayerColor>,
    flags: AnimFlags,
    /// Screen position; `w`/`h` follow the displayed frame.
    pub pos: Rect,
    missing_frame_reports: usize,
}

impl AnimImage {
    /// Open `name` from `source` and own the resulting store exclusively.
    pub fn from_source(
        source: &dyn FrameStoreSource,
        name: &str,
        frame: usize,
        group: usize,
        x: i32,
        y: i32,
        flags: AnimFlags,
    ) -> Result<Self, AnimError> {
        let store = source.open(name, flags.compressed)?;
        Ok(Self::new(store, frame, group, x, y, flags))
    }

    /// Show `(frame, group)` from an existing, possibly shared, store.
    pub fn new(
        store: SharedFrameStore,
        frame: usize,
        group: usize,
        x: i32,
        y: i32,
        flags: AnimFlags,
    ) -> Self {
        let frame_lease = FrameLease::acquire(&store, frame, group);
        let base_lease = flags
            .base
            .then(|| FrameLease::acquire(&store, 0, group));
        let mut image = Self {
            store,
            frame,
            group,
            frame_lease,
            base_lease,
            player: None,
            flags,
            pos: Rect::new(x, y, 0, 0),
            missing_frame_reports: 0,
        };
        image.refresh_size();
        image
    }

    /// Frame count of the bound group.
    pub fn size(&self) -> usize {
        lock(&self.store).size(self.group)
    }

    pub fn frame(&self) -> usize {
        self.frame
    }

    pub fn group(&self) -> usize {
        self.group
    }

    pub fn flags(&self) -> AnimFlags {
        self.flags
    }

    pub fn player(&self) -> Option<PlayerColor> {
        self.player
    }

    /// How many missing-frame errors this view has logged.
    pub fn missing_frame_reports(&self) -> usize {
        self.missing_frame_reports
    }

    /// Display `(frame, group)`.
    ///
    /// Unchanged pairs are ignored. A frame the group does not have is
    /// reported and the current frame stays on screen.
    pub fn set_frame(&mut self, frame: usize, group: usize) {
        if self.frame == frame && self.group == group {
            return;
        }
        let available = lock(&self.store).size(group);
        if frame >= available {
            self.report_missing_frame(frame, group, available);
            return;
        }

        self.frame_lease = FrameLease::acquire(&self.store, frame, group);
        let group_changed = group != self.group;
        if group_changed && self.flags.base {
            self.base_lease = Some(FrameLease::acquire(&self.store, 0, group));
        }
        self.frame = frame;
        self.group = group;

        if self.flags.player_colored {
            if let Some(player) = self.player {
                self.recolor(player, group_changed);
            }
        }
        self.refresh_size();
    }

    /// Tag this view with `player` and recolour what it displays.
    pub fn player_colored(&mut self, player: PlayerColor) {
        self.player = Some(player);
        self.flags.player_colored = true;
        self.recolor(player, true);
    }

    pub fn show_all(&self, target: &mut dyn RasterSurface) {
        let store = lock(&self.store);
        let at = self.pos.top_left();
        if self.flags.base && self.frame != 0 {
            if let Some(img) = store.image(0, self.group) {
                draw_image(img, target, at, None, BlitParams::default());
            }
        }
        if let Some(img) = store.image(self.frame, self.group) {
            draw_image(img, target, at, None, BlitParams::default());
        }
    }

    /// Every missing-frame error goes through here, so the counter always
    /// matches the number of `error!` lines.
    fn report_missing_frame(&mut self, frame: usize, group: usize, available: usize) {
        error!(
            "Error: accessing unavailable frame {}:{} (group has {} frames)",
            group, frame, available
        );
        self.missing_frame_reports += 1;
    }

    fn recolor(&mut self, player: PlayerColor, include_base: bool) {
        let mut store = lock(&self.store);
        if let Some(img) = store.image_mut(self.frame, self.group) {
            img.player_colored(player);
        }
        if include_base && self.flags.base && self.frame != 0 {
            if let Some(img) = store.image_mut(0, self.group) {
                img.player_colored(player);
            }
        }
    }

    fn refresh_size(&mut self) {
        let store = lock(&self.store);
        if let Some(img) = store.image(self.frame, self.group) {
            self.pos.w = img.width();
            self.pos.h = img.height();
        }
    }
}
