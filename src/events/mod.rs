//! Event types raised by the playback systems.
//!
//! Events let the animation systems hand completion notices to the host
//! without calling back into user code in the middle of a tick.
//!
//! Submodules:
//! - [`animation`] – an animation finished a cycle or ran out of queued groups
pub mod animation;
