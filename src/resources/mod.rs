//! ECS resources and the asset layer behind the views.
//!
//! This module groups the long-lived data injected into the ECS world and
//! the frame storage the components borrow from.
//!
//! Overview
//! - `animationlibrary` – JSON-defined animations that open into frame stores
//! - `animconfig` – playback settings loaded from an INI file
//! - `drawtarget` – framebuffer the systems draw onto
//! - `framestore` – reference-counted frame storage and the leases that pin frames
//! - `memoryframestore` – in-memory frame store with load accounting
//! - `random` – injectable randomness for idle previews
//! - `raster` – geometry, colours, surfaces and blitting
pub mod animationlibrary;
pub mod animconfig;
pub mod drawtarget;
pub mod framestore;
pub mod memoryframestore;
pub mod random;
pub mod raster;
