//! ECS components for animated and static views.
//!
//! Each view binds to a frame store and draws onto a
//! [`RasterSurface`](crate::resources::raster::RasterSurface).
//!
//! Submodules overview:
//! - [`animflags`] – display flags shared by every view
//! - [`animimage`] – one fixed frame of an animation, optionally over its base frame
//! - [`animtype`] – semantic creature animation groups and the transitions between them
//! - [`creatureanim`] – queue-driven creature animation with idle previews
//! - [`picture`] – static bitmaps and tiled textures
//! - [`showableanim`] – timed playback of one animation group

pub mod animflags;
pub mod animimage;
pub mod animtype;
pub mod creatureanim;
pub mod picture;
pub mod showableanim;
