//! Display flags shared by animation views.

use serde::{Deserialize, Serialize};

/// Render and playback switches for [`AnimImage`](crate::components::animimage::AnimImage)
/// and [`ShowableAnim`](crate::components::showableanim::ShowableAnim).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimFlags {
    /// Draw the group's base frame underneath the current one.
    pub base: bool,
    /// Stop on the last frame instead of looping.
    pub play_once: bool,
    pub flip_h: bool,
    pub flip_v: bool,
    /// Re-apply the player colour whenever the displayed frame changes.
    pub player_colored: bool,
    /// Ask the frame store for compressed frames.
    pub compressed: bool,
}

impl AnimFlags {
    pub fn with_base(mut self) -> Self {
        self.base = true;
        self
    }

    pub fn with_play_once(mut self) -> Self {
        self.play_once = true;
        self
    }

    pub fn with_compressed(mut self) -> Self {
        self.compressed = true;
        self
    }
}
