//! Animation systems.
//!
//! - [`show_playback`] draws and advances every plain [`ShowableAnim`].
//! - [`show_creatures`] does the same for [`CreatureAnim`]s and answers
//!   their preview requests.
//! - [`show_static_images`] draws the non-animated views.
//! - [`clear_draw_target`] wipes the framebuffer at the start of a tick.
//!
//! # Tick Flow
//!
//! 1. Each view is drawn to the [`DrawTarget`] and advanced by one tick.
//! 2. A wraparound may yield an [`AnimAction`]. Preview requests are answered
//!    in place with the world's [`AnimRng`]; completions are triggered as
//!    [`AnimationCompletedEvent`]s.
//! 3. Observers of that event run when the commands are applied, after the
//!    system. Anything they queue is picked up on the creature's next tick.
//!
//! # Related
//!
//! - [`crate::components::showableanim::ShowableAnim`]
//! - [`crate::components::creatureanim::CreatureAnim`]
//! - [`crate::events::animation::AnimationCompletedEvent`]

use bevy_ecs::prelude::*;
use log::debug;

use crate::components::animimage::AnimImage;
use crate::components::creatureanim::CreatureAnim;
use crate::components::picture::{FilledTexture, Picture};
use crate::components::showableanim::{AnimAction, ShowableAnim};
use crate::events::animation::AnimationCompletedEvent;
use crate::resources::drawtarget::DrawTarget;
use crate::resources::random::AnimRng;

/// Draw and advance playback controllers.
///
/// Contract
/// - Draws into [`DrawTarget`].
/// - Triggers [`AnimationCompletedEvent`] when a controller with completion
///   notification wraps around.
pub fn show_playback(
    mut query: Query<(Entity, &mut ShowableAnim)>,
    mut target: ResMut<DrawTarget>,
    mut commands: Commands,
) {
    let target = target.surface_mut();
    for (entity, mut anim) in query.iter_mut() {
        if let Some(AnimAction::Completed) = anim.show(&mut *target) {
            commands.trigger(AnimationCompletedEvent { entity });
        }
    }
}

/// Draw and advance creature animations.
///
/// Contract
/// - Draws into [`DrawTarget`].
/// - Uses [`AnimRng`] to pick idle animations for previewing creatures.
/// - Triggers [`AnimationCompletedEvent`] when a notifying creature runs out
///   of queued groups.
pub fn show_creatures(
    mut query: Query<(Entity, &mut CreatureAnim)>,
    mut target: ResMut<DrawTarget>,
    mut rng: ResMut<AnimRng>,
    mut commands: Commands,
) {
    let target = target.surface_mut();
    for (entity, mut creature) in query.iter_mut() {
        match creature.show(&mut *target) {
            Some(AnimAction::Completed) => {
                commands.trigger(AnimationCompletedEvent { entity });
            }
            Some(action @ AnimAction::Preview { .. }) => {
                creature.apply(action, &mut *rng);
                debug!("Creature {:?} previews {:?}", entity, creature.anim_type());
            }
            None => {}
        }
    }
}

/// Wipe the framebuffer; runs before the drawing systems.
pub fn clear_draw_target(mut target: ResMut<DrawTarget>) {
    target.clear();
}

/// Draw single-frame views, pictures and tiled textures.
pub fn show_static_images(
    images: Query<&AnimImage>,
    pictures: Query<&Picture>,
    textures: Query<&FilledTexture>,
    mut target: ResMut<DrawTarget>,
) {
    let target = target.surface_mut();
    for texture in textures.iter() {
        texture.show_all(&mut *target);
    }
    for picture in pictures.iter() {
        picture.show_all(&mut *target);
    }
    for image in images.iter() {
        image.show_all(&mut *target);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::animflags::AnimFlags;
    use crate::components::animtype::AnimType;
    use crate::components::creatureanim::QueueState;
    use crate::resources::framestore::{SharedFrameStore, share};
    use crate::resources::memoryframestore::MemoryFrameStore;
    use crate::resources::raster::{Canvas, Rect, Rgba};
    use std::sync::{Arc, Mutex};

    #[derive(Resource, Default)]
    struct Completed(Vec<Entity>);

    fn world() -> World {
        let mut world = World::new();
        world.insert_resource(DrawTarget::new(16, 16));
        world.insert_resource(AnimRng::with_seed(7));
        world.init_resource::<Completed>();
        world.add_observer(
            |trigger: On<AnimationCompletedEvent>, mut completed: ResMut<Completed>| {
                completed.0.push(trigger.event().entity);
            },
        );
        world
    }

    #[test]
    fn test_show_playback_triggers_completion() {
        let mut world = world();
        let store = share(MemoryFrameStore::new("a").with_solid_group(
            0,
            2,
            2,
            2,
            Rgba::opaque(1, 2, 3),
        ));
        let mut anim = ShowableAnim::new(store, 0, 0, AnimFlags::default(), 1, 0);
        anim.set_completion_notify(true);
        let entity = world.spawn(anim).id();

        let mut schedule = Schedule::default();
        schedule.add_systems(show_playback);
        schedule.run(&mut world);
        world.flush();
        assert!(world.resource::<Completed>().0.is_empty());
        schedule.run(&mut world);
        world.flush();
        assert_eq!(world.resource::<Completed>().0, vec![entity]);
        assert_eq!(
            world.resource::<DrawTarget>().canvas.pixel_at(1, 1),
            Some(Rgba::opaque(1, 2, 3))
        );
    }

    #[test]
    fn test_show_creatures_answers_preview_without_event() {
        let mut world = world();
        let mem = MemoryFrameStore::new("c")
            .with_solid_group(AnimType::Holding.group(), 1, 2, 2, Rgba::opaque(9, 9, 9))
            .with_solid_group(AnimType::Defence.group(), 2, 2, 2, Rgba::opaque(9, 9, 9));
        let mut creature = CreatureAnim::new(
            share(mem),
            0,
            0,
            Rect::default(),
            AnimFlags::default(),
            AnimType::Holding,
        );
        creature.anim_mut().set_frame_delay(1);
        creature.start_preview(false);
        let entity = world.spawn(creature).id();

        let mut schedule = Schedule::default();
        schedule.add_systems(show_creatures);
        schedule.run(&mut world);
        world.flush();

        assert!(world.resource::<Completed>().0.is_empty());
        let creature = world.get::<CreatureAnim>(entity).unwrap();
        assert_eq!(creature.state(), QueueState::Playing);
        assert!(creature.anim_type().is_some());
    }

    #[test]
    fn test_show_static_images_draws_all_kinds() {
        let mut world = world();
        let mem = Arc::new(Mutex::new(MemoryFrameStore::new("s").with_solid_group(
            0,
            1,
            1,
            1,
            Rgba::opaque(3, 3, 3),
        )));
        let shared: SharedFrameStore = mem.clone();
        world.spawn(AnimImage::new(shared, 0, 0, 2, 2, AnimFlags::default()));
        world.spawn(Picture::from_surface(
            Box::new(Canvas::filled(1, 1, Rgba::opaque(4, 4, 4))),
            5,
            5,
        ));

        let mut schedule = Schedule::default();
        schedule.add_systems((clear_draw_target, show_static_images).chain());
        schedule.run(&mut world);

        let canvas = &world.resource::<DrawTarget>().canvas;
        assert_eq!(canvas.pixel_at(2, 2), Some(Rgba::opaque(3, 3, 3)));
        assert_eq!(canvas.pixel_at(5, 5), Some(Rgba::opaque(4, 4, 4)));
        assert_eq!(canvas.pixel_at(0, 0), Some(Rgba::TRANSPARENT));
    }
}
