//! Terminal UI components
//!
//! Built with ratatui. Keyboard-first navigation throughout; the view
//! renderers live next to the event loop in main.rs.

pub mod theme;

pub use theme::Theme;
