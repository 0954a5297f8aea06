//! Embed frame abstraction
//!
//! A mirror's player runs inside an opaque embedded browsing context. The
//! controller only ever needs to point that context at a URL and react to the
//! two signals that come back: a load failure, and an optional best-effort
//! progress message. Everything else about the frame is the provider's
//! business.

use serde::Deserialize;
use thiserror::Error;

/// Errors surfaced when handing a URL to a frame
#[derive(Debug, Error)]
pub enum FrameError {
    #[error("refusing to load an empty URL")]
    EmptyUrl,

    #[error("no handler available to open the embed")]
    NoHandler,

    #[error("failed to open embed: {0}")]
    OpenFailed(std::io::Error),
}

/// An opaque rendering target for a mirror's player
pub trait EmbedFrame {
    /// Load the given URL into the frame. An error here is the frame-level
    /// load-failure signal.
    fn set_url(&mut self, url: &str) -> Result<(), FrameError>;
}

/// Signals delivered back from the active frame
#[derive(Debug, Clone, PartialEq)]
pub enum FrameEvent {
    /// The frame failed to load its current URL
    LoadError,
    /// A provider-originated playback progress message
    Message(PlayerMessage),
}

/// Payload of a provider progress message.
///
/// Providers that support it post `{type: "PLAYER_EVENT", data: {...}}` to
/// the embedding context; the envelope is stripped by
/// [`parse_player_event`].
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PlayerMessage {
    /// Provider-defined event name ("timeupdate", "pause", ...)
    pub event: String,
    #[serde(rename = "currentTime")]
    pub current_time: f64,
    pub duration: f64,
}

#[derive(Debug, Deserialize)]
struct MessageEnvelope {
    #[serde(rename = "type")]
    kind: String,
    data: PlayerMessage,
}

/// Parse a raw cross-frame message, returning the payload for
/// `PLAYER_EVENT` envelopes and `None` for anything else. Malformed input is
/// ignored, not an error.
pub fn parse_player_event(raw: &str) -> Option<PlayerMessage> {
    let envelope: MessageEnvelope = serde_json::from_str(raw).ok()?;
    if envelope.kind == "PLAYER_EVENT" {
        Some(envelope.data)
    } else {
        None
    }
}

/// Default frame: the system browser.
///
/// Opening a tab is fire-and-forget; the only signal we get back is whether
/// the handler could be launched at all, which maps onto the frame's
/// load-failure signal.
#[derive(Debug, Default)]
pub struct BrowserFrame;

impl BrowserFrame {
    pub fn new() -> Self {
        Self
    }
}

impl EmbedFrame for BrowserFrame {
    fn set_url(&mut self, url: &str) -> Result<(), FrameError> {
        if url.is_empty() {
            return Err(FrameError::EmptyUrl);
        }
        open::that(url).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                FrameError::NoHandler
            } else {
                FrameError::OpenFailed(e)
            }
        })
    }
}
