//! Mirror registry
//!
//! The ordered table of third-party embed providers and their URL dialects.
//! Each provider knows how to turn a [`PlaybackRequest`] into a fully
//! qualified embed URL; building a URL is pure string work, no I/O, and it
//! never fails. The registry is constructed once and never mutated at
//! runtime.

use serde::Serialize;

use crate::models::{MediaType, PlaybackRequest};

/// Accent color passed to providers that support player theming
const ACCENT_COLOR: &str = "16A085";

// =============================================================================
// Providers
// =============================================================================

/// Embed URL dialect, one variant per supported provider.
///
/// Providers differ in which identifier they accept (some prefer the IMDb id,
/// some only take the TMDB id) and in how series episodes are encoded (path
/// segments vs. query parameters).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    VidSrc,
    TwoEmbed,
    VidKing,
    VidLink,
    VidFast,
}

impl Provider {
    /// Short stable key, used in config overrides and progress records
    pub fn id(&self) -> &'static str {
        match self {
            Provider::VidSrc => "vidsrc",
            Provider::TwoEmbed => "2embed",
            Provider::VidKing => "vidking",
            Provider::VidLink => "vidlink",
            Provider::VidFast => "vidfast",
        }
    }

    /// Human-readable label
    pub fn display_name(&self) -> &'static str {
        match self {
            Provider::VidSrc => "VidSrc",
            Provider::TwoEmbed => "2Embed",
            Provider::VidKing => "VidKing",
            Provider::VidLink => "VidLink",
            Provider::VidFast => "VidFast",
        }
    }

    /// Default embed base URL, overridable via config
    pub fn default_base_url(&self) -> &'static str {
        match self {
            Provider::VidSrc => "https://vidsrc.xyz/embed",
            Provider::TwoEmbed => "https://www.2embed.cc",
            Provider::VidKing => "https://www.vidking.net/embed",
            Provider::VidLink => "https://vidlink.pro",
            Provider::VidFast => "https://vidfast.pro",
        }
    }

    /// Build the embed URL for `request` against `base`.
    ///
    /// Pure and total: thin input still yields a best-effort URL string. The
    /// consuming frame's own error signal is the authoritative failure
    /// detector for anything malformed.
    fn build_url(&self, base: &str, request: &PlaybackRequest) -> String {
        let tmdb = request.content_id;
        let imdb = request.imdb_id.as_deref().filter(|s| !s.is_empty());

        match self {
            // Query-parameter dialect; prefers the IMDb id when present.
            Provider::VidSrc => {
                let ident = match imdb {
                    Some(imdb) => format!("imdb={}", imdb),
                    None => format!("tmdb={}", tmdb),
                };
                match request.media_type {
                    MediaType::Movie => format!("{}/movie?{}&autoplay=1", base, ident),
                    MediaType::Tv => format!(
                        "{}/tv?{}&season={}&episode={}&autoplay=1",
                        base, ident, request.season, request.episode
                    ),
                }
            }
            // Accepts either id; episodes ride in `&s=&e=` after the path.
            Provider::TwoEmbed => {
                let ident = imdb
                    .map(str::to_string)
                    .unwrap_or_else(|| tmdb.to_string());
                match request.media_type {
                    MediaType::Movie => format!("{}/embed/{}", base, ident),
                    MediaType::Tv => format!(
                        "{}/embedtv/{}&s={}&e={}",
                        base, ident, request.season, request.episode
                    ),
                }
            }
            // TMDB id only; episodes are path segments.
            Provider::VidKing => match request.media_type {
                MediaType::Movie => format!(
                    "{}/movie/{}?color={}&autoPlay=true",
                    base, tmdb, ACCENT_COLOR
                ),
                MediaType::Tv => format!(
                    "{}/tv/{}/{}/{}?color={}&autoPlay=true",
                    base, tmdb, request.season, request.episode, ACCENT_COLOR
                ),
            },
            // TMDB id only; episodes are path segments.
            Provider::VidLink => match request.media_type {
                MediaType::Movie => format!(
                    "{}/movie/{}?primaryColor={}&iconColor={}&autoplay=true",
                    base, tmdb, ACCENT_COLOR, ACCENT_COLOR
                ),
                MediaType::Tv => format!(
                    "{}/tv/{}/{}/{}?primaryColor={}&iconColor={}&autoplay=true",
                    base, tmdb, request.season, request.episode, ACCENT_COLOR, ACCENT_COLOR
                ),
            },
            // Accepts either id; episodes are path segments.
            Provider::VidFast => {
                let ident = imdb
                    .map(str::to_string)
                    .unwrap_or_else(|| tmdb.to_string());
                match request.media_type {
                    MediaType::Movie => format!(
                        "{}/movie/{}?autoPlay=true&theme={}",
                        base, ident, ACCENT_COLOR
                    ),
                    MediaType::Tv => format!(
                        "{}/tv/{}/{}/{}?autoPlay=true&theme={}",
                        base, ident, request.season, request.episode, ACCENT_COLOR
                    ),
                }
            }
        }
    }
}

// =============================================================================
// Descriptors
// =============================================================================

/// A registered playback provider: identity, ordering, and URL rules
#[derive(Debug, Clone, Serialize)]
pub struct MirrorDescriptor {
    pub id: &'static str,
    pub display_name: &'static str,
    /// Lower is tried first; ties keep declaration order
    pub priority: u8,
    provider: Provider,
    base_url: String,
}

impl MirrorDescriptor {
    fn new(provider: Provider, priority: u8) -> Self {
        Self {
            id: provider.id(),
            display_name: provider.display_name(),
            priority,
            provider,
            base_url: provider.default_base_url().to_string(),
        }
    }

    /// Build the embed URL for `request` on this mirror
    pub fn build_url(&self, request: &PlaybackRequest) -> String {
        self.provider.build_url(&self.base_url, request)
    }
}

// =============================================================================
// Registry
// =============================================================================

/// Ordered, deduplicated list of playback providers.
///
/// Sorted ascending by priority at construction (stable for equal
/// priorities), so `by_priority` returns the same order on every call.
#[derive(Debug, Clone)]
pub struct MirrorRegistry {
    mirrors: Vec<MirrorDescriptor>,
}

impl MirrorRegistry {
    /// Build a registry from descriptors; duplicates (by id) keep the first
    /// occurrence
    pub fn new(descriptors: Vec<MirrorDescriptor>) -> Self {
        let mut mirrors: Vec<MirrorDescriptor> = Vec::with_capacity(descriptors.len());
        for descriptor in descriptors {
            if mirrors.iter().all(|m| m.id != descriptor.id) {
                mirrors.push(descriptor);
            }
        }
        mirrors.sort_by_key(|m| m.priority);
        Self { mirrors }
    }

    /// The built-in provider table
    pub fn builtin() -> Self {
        Self::new(vec![
            MirrorDescriptor::new(Provider::VidSrc, 1),
            MirrorDescriptor::new(Provider::TwoEmbed, 2),
            MirrorDescriptor::new(Provider::VidKing, 3),
            MirrorDescriptor::new(Provider::VidLink, 4),
            MirrorDescriptor::new(Provider::VidFast, 5),
        ])
    }

    /// Replace the embed base URL for the mirror with the given id, if
    /// registered. Called once while applying config, before any session
    /// exists.
    pub fn override_base_url(&mut self, id: &str, base_url: impl Into<String>) {
        if let Some(mirror) = self.mirrors.iter_mut().find(|m| m.id == id) {
            let base = base_url.into();
            mirror.base_url = base.trim_end_matches('/').to_string();
        }
    }

    /// All mirrors, ascending by priority
    pub fn by_priority(&self) -> &[MirrorDescriptor] {
        &self.mirrors
    }

    pub fn get(&self, index: usize) -> Option<&MirrorDescriptor> {
        self.mirrors.get(index)
    }

    /// Index of the mirror with the given id
    pub fn position(&self, id: &str) -> Option<usize> {
        self.mirrors.iter().position(|m| m.id == id)
    }

    pub fn len(&self) -> usize {
        self.mirrors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mirrors.is_empty()
    }

    /// Delegate to the mirror's URL builder
    pub fn build_url(&self, mirror: &MirrorDescriptor, request: &PlaybackRequest) -> String {
        mirror.build_url(request)
    }
}

impl Default for MirrorRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}
