//! Engine systems.
//!
//! This module groups the ECS systems that draw and advance animations.
//!
//! Submodules overview
//! - [`animation`] – tick playback controllers and creatures, draw static views

pub mod animation;
