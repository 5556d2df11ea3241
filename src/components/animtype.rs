//! Creature animation types and the bridging rule between them.
//!
//! Each [`AnimType`] is a fixed group index inside a creature's animation
//! resource. Some transitions need extra groups played in between (starting
//! or stopping movement, holding a turn); [`bridging_transitions`] is the one
//! place that knows about them.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// Semantic animation group of a creature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AnimType {
    Moving = 0,
    MouseOn = 1,
    Holding = 2,
    Hitted = 3,
    Defence = 4,
    Death = 5,
    TurnL = 7,
    TurnR = 8,
    AttackUp = 11,
    AttackFront = 12,
    AttackDown = 13,
    ShootUp = 14,
    ShootFront = 15,
    ShootDown = 16,
    CastUp = 17,
    CastFront = 18,
    CastDown = 19,
    MoveStart = 20,
    MoveEnd = 21,
    Dead = 22,
}

/// Idle preview candidates for regular creatures, in priority order.
pub const CREATURE_PREVIEW: [AnimType; 5] = [
    AnimType::Holding,
    AnimType::Hitted,
    AnimType::Defence,
    AnimType::AttackFront,
    AnimType::CastFront,
];

/// Idle preview candidates for war machines, in priority order.
pub const WAR_MACHINE_PREVIEW: [AnimType; 5] = [
    AnimType::Holding,
    AnimType::Moving,
    AnimType::ShootUp,
    AnimType::ShootFront,
    AnimType::ShootDown,
];

impl AnimType {
    pub const ALL: [AnimType; 20] = [
        AnimType::Moving,
        AnimType::MouseOn,
        AnimType::Holding,
        AnimType::Hitted,
        AnimType::Defence,
        AnimType::Death,
        AnimType::TurnL,
        AnimType::TurnR,
        AnimType::AttackUp,
        AnimType::AttackFront,
        AnimType::AttackDown,
        AnimType::ShootUp,
        AnimType::ShootFront,
        AnimType::ShootDown,
        AnimType::CastUp,
        AnimType::CastFront,
        AnimType::CastDown,
        AnimType::MoveStart,
        AnimType::MoveEnd,
        AnimType::Dead,
    ];

    /// Group index in the animation resource.
    pub fn group(self) -> usize {
        self as usize
    }

    pub fn from_group(group: usize) -> Option<AnimType> {
        Self::ALL.into_iter().find(|t| t.group() == group)
    }

    pub fn is_turn(self) -> bool {
        matches!(self, AnimType::TurnL | AnimType::TurnR)
    }

    pub fn preview_list(war_machine: bool) -> &'static [AnimType; 5] {
        if war_machine {
            &WAR_MACHINE_PREVIEW
        } else {
            &CREATURE_PREVIEW
        }
    }
}

/// Groups to queue before `next` when the creature currently shows `current`.
///
/// - entering [`AnimType::Moving`] from anything else plays [`AnimType::MoveStart`]
/// - leaving [`AnimType::Moving`] plays [`AnimType::MoveEnd`]
/// - a turn is queued one extra time so the turned pose is held for two cycles
pub fn bridging_transitions(current: Option<AnimType>, next: AnimType) -> SmallVec<[AnimType; 2]> {
    let mut out = SmallVec::new();
    let moving_now = current == Some(AnimType::Moving);
    if !moving_now && next == AnimType::Moving {
        out.push(AnimType::MoveStart);
    } else if moving_now && next != AnimType::Moving {
        out.push(AnimType::MoveEnd);
    }
    if next.is_turn() {
        out.push(next);
    }
    out
}
