//! # UI Module
//!
//! Terminal user interface for NiriSetup.
//!
//! ## Components
//!
//! - [`App`] - the menu/state controller (cursor, screen, session log)
//! - [`keys`] - key event decoding
//! - [`mod@render`] - pure rendering of an [`App`]
//! - [`theme`] - color themes
//!
//! ## Layout
//!
//! ```text
//! ┌─────────────────────────────────────────────────┐
//! │       NiriSetup Assistant for FreeBSD           │
//! ├─────────────────┬───────────────────────────────┤
//! │ > Install Niri  │ Selected: Install Niri        │
//! │   Configure     │ Processing...                 │
//! │   Validate      │                               │
//! │   Save Logs     │ Initializing NiriSetup...     │
//! │   Exit          │                               │
//! ├─────────────────┴───────────────────────────────┤
//! │ [↑↓/jk] Navigate  [Enter] Select  [q] Quit      │
//! └─────────────────────────────────────────────────┘
//! ```

pub mod app;
pub mod keys;
pub mod render;
pub mod theme;

pub use app::App;
pub use render::render;
