//! Queue-driven creature animation.
//!
//! [`CreatureAnim`] layers a queue of pending [`AnimType`]s over a
//! [`ShowableAnim`]. Each time the current group finishes a cycle the next
//! playable entry is popped and started. When the queue runs dry the
//! completion hook gets a chance to queue more; with nothing queued the
//! creature falls back to [`AnimType::Holding`].
//!
//! # States
//!
//! ```text
//! Playing --wraparound--> DrainingQueue --entry set--> Playing
//!                              |   \--empty, no hook--> Playing (Holding)
//!                              \--empty, hook--> InvokingCompletionHook
//! InvokingCompletionHook --resume--> DrainingQueue --> Playing
//! ```
//!
//! The hook itself never runs inside [`CreatureAnim::reset`]: the reset
//! returns an [`AnimAction`] and the driver answers it (picking a preview
//! animation, notifying observers). The machine resumes on the next
//! [`CreatureAnim::resume`], which `show`/`show_all` call first.

use std::collections::VecDeque;

use arrayvec::ArrayVec;
use bevy_ecs::prelude::Component;
use log::{debug, warn};

use crate::components::animflags::AnimFlags;
use crate::components::animtype::{AnimType, bridging_transitions};
use crate::components::showableanim::{AnimAction, ShowableAnim};
use crate::error::AnimError;
use crate::resources::framestore::{FrameStoreSource, SharedFrameStore};
use crate::resources::random::RandomSource;
use crate::resources::raster::{RasterSurface, Rect};

/// Ticks per frame for creature animations.
pub const CREATURE_FRAME_DELAY: u32 = 4;

/// Roughly one second of idle animation, in frames.
const IDLE_HOLD_FRAMES: usize = 12;

/// What happens when the queue runs dry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CompletionHook {
    /// Fall back to holding straight away.
    #[default]
    None,
    /// Report [`AnimAction::Completed`] so observers can queue more.
    Notify,
    /// Pick a random idle animation.
    Preview { war_machine: bool },
}

impl CompletionHook {
    fn action(self) -> Option<AnimAction> {
        match self {
            CompletionHook::None => None,
            CompletionHook::Notify => Some(AnimAction::Completed),
            CompletionHook::Preview { war_machine } => Some(AnimAction::Preview { war_machine }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum QueueState {
    #[default]
    Playing,
    DrainingQueue,
    InvokingCompletionHook,
}

/// Result of one pass over the queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrainOutcome {
    /// An entry was started.
    Resumed,
    /// Queue is empty; the completion hook must run first.
    AwaitHook,
    /// Queue is empty and nothing can refill it.
    FallBack,
}

/// Decide what follows a queue pass.
pub fn drain_outcome(drained: bool, hook_pending: bool) -> DrainOutcome {
    match (drained, hook_pending) {
        (true, _) => DrainOutcome::Resumed,
        (false, true) => DrainOutcome::AwaitHook,
        (false, false) => DrainOutcome::FallBack,
    }
}

#[derive(Component)]
pub struct CreatureAnim {
    anim: ShowableAnim,
    queue: VecDeque<AnimType>,
    hook: CompletionHook,
    state: QueueState,
}

impl CreatureAnim {
    /// Open `name` from `source` and start on `anim_type`.
    pub fn from_source(
        source: &dyn FrameStoreSource,
        name: &str,
        x: i32,
        y: i32,
        pic_pos: Rect,
        flags: AnimFlags,
        anim_type: AnimType,
    ) -> Result<Self, AnimError> {
        let store = source.open(name, flags.compressed)?;
        Ok(Self::new(store, x, y, pic_pos, flags, anim_type))
    }

    /// `pic_pos` selects the visible part of each frame: its corner is the
    /// source offset, a non-zero `w`/`h` overrides the display size.
    pub fn new(
        store: SharedFrameStore,
        x: i32,
        y: i32,
        pic_pos: Rect,
        flags: AnimFlags,
        anim_type: AnimType,
    ) -> Self {
        let mut anim = ShowableAnim::new(
            store,
            x,
            y,
            flags,
            CREATURE_FRAME_DELAY,
            anim_type.group(),
        );
        let w = if pic_pos.w != 0 { pic_pos.w } else { anim.pos.w };
        let h = if pic_pos.h != 0 { pic_pos.h } else { anim.pos.h };
        anim.clip_rect(pic_pos.x, pic_pos.y, w, h);
        Self {
            anim,
            queue: VecDeque::new(),
            hook: CompletionHook::None,
            state: QueueState::Playing,
        }
    }

    pub fn anim(&self) -> &ShowableAnim {
        &self.anim
    }

    pub fn anim_mut(&mut self) -> &mut ShowableAnim {
        &mut self.anim
    }

    /// Type of the group currently playing.
    pub fn anim_type(&self) -> Option<AnimType> {
        AnimType::from_group(self.anim.group())
    }

    pub fn queue(&self) -> &VecDeque<AnimType> {
        &self.queue
    }

    pub fn state(&self) -> QueueState {
        self.state
    }

    pub fn hook(&self) -> CompletionHook {
        self.hook
    }

    /// Start `anim_type` immediately, keeping the queue.
    pub fn set(&mut self, anim_type: AnimType) -> bool {
        self.anim.set(anim_type.group())
    }

    /// Queue `new` behind everything pending, with any bridging groups.
    pub fn queue_next(&mut self, new: AnimType) {
        let current = self.anim_type();
        self.queue.extend(bridging_transitions(current, new));
        self.queue.push_back(new);
    }

    /// Cycle finished: start the next queued group.
    ///
    /// A turn that is about to repeat flips the sprite first (left turns
    /// mirror it, right turns restore it).
    pub fn reset(&mut self) -> Option<AnimAction> {
        self.anim.rewind();

        if let Some(turn) = self.anim_type().filter(|t| t.is_turn()) {
            if self.queue.front() == Some(&turn) {
                self.anim.rotate(turn == AnimType::TurnL, false);
            }
        }

        self.state = QueueState::DrainingQueue;
        let drained = self.pop_until_set();
        match drain_outcome(drained, self.hook != CompletionHook::None) {
            DrainOutcome::Resumed => {
                self.state = QueueState::Playing;
                None
            }
            DrainOutcome::FallBack => {
                self.fall_back();
                self.state = QueueState::Playing;
                None
            }
            DrainOutcome::AwaitHook => {
                self.state = QueueState::InvokingCompletionHook;
                self.hook.action()
            }
        }
    }

    /// Finish a reset that was waiting on the completion hook.
    pub fn resume(&mut self) {
        if self.state != QueueState::InvokingCompletionHook {
            return;
        }
        self.state = QueueState::DrainingQueue;
        if !self.pop_until_set() {
            self.fall_back();
        }
        self.state = QueueState::Playing;
    }

    /// Answer an action returned by [`reset`](Self::reset) or [`show`](Self::show).
    ///
    /// Preview requests are handled here and the machine resumes at once.
    /// [`AnimAction::Completed`] is left to the caller, who may queue more
    /// before the next tick.
    pub fn apply(&mut self, action: AnimAction, rng: &mut dyn RandomSource) {
        if let AnimAction::Preview { war_machine } = action {
            self.loop_preview(war_machine, rng);
            self.resume();
        }
    }

    /// Draw, then advance one tick.
    pub fn show(&mut self, target: &mut dyn RasterSurface) -> Option<AnimAction> {
        self.resume();
        self.anim.show_all(target);
        if self.anim.advance() { self.reset() } else { None }
    }

    pub fn show_all(&mut self, target: &mut dyn RasterSurface) {
        self.resume();
        self.anim.show_all(target);
    }

    /// Pick idle animations every time the queue runs dry.
    pub fn start_preview(&mut self, war_machine: bool) {
        self.hook = CompletionHook::Preview { war_machine };
    }

    /// Report [`AnimAction::Completed`] every time the queue runs dry.
    pub fn set_completion_notify(&mut self) {
        self.hook = CompletionHook::Notify;
    }

    /// Fall back to holding straight away when the queue runs dry.
    pub fn clear_hook(&mut self) {
        self.hook = CompletionHook::None;
    }

    /// Queue one random idle animation.
    ///
    /// Half of the draw range picks one of the available preview groups,
    /// the other half holds still for about a second.
    pub fn loop_preview(&mut self, war_machine: bool, rng: &mut dyn RandomSource) {
        let available: ArrayVec<AnimType, 5> = AnimType::preview_list(war_machine)
            .iter()
            .copied()
            .filter(|t| self.anim.group_size(t.group()) > 0)
            .collect();
        if available.is_empty() {
            debug!("No preview animations available");
            return;
        }

        let rnd = rng.next_int(available.len() * 2 - 1);
        if let Some(&picked) = available.get(rnd) {
            self.queue_next(picked);
            return;
        }

        let idle = if self.anim.group_size(AnimType::Holding.group()) > 0 {
            AnimType::Holding
        } else {
            AnimType::Moving
        };
        let frames = self.anim.group_size(idle.group());
        if frames == 0 {
            return;
        }
        for _ in 0..IDLE_HOLD_FRAMES / frames + 1 {
            self.queue_next(idle);
        }
    }

    /// Drop everything queued and start `anim_type` now.
    pub fn clear_and_set(&mut self, anim_type: AnimType) -> bool {
        self.queue.clear();
        self.state = QueueState::Playing;
        self.set(anim_type)
    }

    fn pop_until_set(&mut self) -> bool {
        while let Some(next) = self.queue.pop_front() {
            if self.set(next) {
                return true;
            }
            debug!("Skipping queued {:?}: no frames", next);
        }
        false
    }

    fn fall_back(&mut self) {
        if !self.set(AnimType::Holding) {
            warn!("Creature animation has no holding frames to fall back to");
        }
    }
}
