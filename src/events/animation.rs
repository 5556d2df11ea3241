//! Animation completion events.
//!
//! When a [`ShowableAnim`](crate::components::showableanim::ShowableAnim)
//! with completion notification wraps around, or a
//! [`CreatureAnim`](crate::components::creatureanim::CreatureAnim) with a
//! notify hook runs out of queued groups, an [`AnimationCompletedEvent`] is
//! triggered for the entity. Observers may queue the next animation; the
//! creature picks it up on its next tick.
//!
//! # Example
//!
//! ```ignore
//! world.add_observer(
//!     |trigger: On<AnimationCompletedEvent>, mut creatures: Query<&mut CreatureAnim>| {
//!         if let Ok(mut creature) = creatures.get_mut(trigger.event().entity) {
//!             creature.queue_next(AnimType::Defence);
//!         }
//!     },
//! );
//! ```
//!
//! # Related
//!
//! - [`crate::systems::animation::show_playback`]
//! - [`crate::systems::animation::show_creatures`]

use bevy_ecs::prelude::*;

/// Event emitted when an animation finishes a cycle.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnimationCompletedEvent {
    /// The entity whose animation completed.
    pub entity: Entity,
}
