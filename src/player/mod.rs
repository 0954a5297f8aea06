//! Playback across third-party embed mirrors
//!
//! - `mirrors` - the ordered registry of embed providers and URL builders
//! - `session` - the per-playback state machine (mirror index, error flag)
//! - `frame` - the opaque embedded-player abstraction and its signals

pub mod frame;
pub mod mirrors;
pub mod session;

pub use frame::{BrowserFrame, EmbedFrame, FrameError, FrameEvent, PlayerMessage};
pub use mirrors::{MirrorDescriptor, MirrorRegistry, Provider};
pub use session::{PlayerError, PlayerSession, RouteParams};
