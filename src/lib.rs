//! Animkit library.
//!
//! Sprite animation playback for turn-based strategy screens: single-frame
//! views, timed group playback, queue-driven creature animations and static
//! pictures, exposed as ECS components, resources, systems, and events.

pub mod components;
pub mod error;
pub mod events;
pub mod resources;
pub mod systems;
