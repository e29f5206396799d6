//! `ratatui-datakit-core` provides the primitives shared by the datakit components.
//!
//! This crate carries no widgets of its own; the select, pagination, and data-table
//! components live in the `ratatui-datakit` crate. What lives here:
//!
//! - [`input`]: a small key/paste event vocabulary decoupled from any terminal backend.
//! - [`theme`]: the style palette components render with.
//! - [`viewport`]: a one-axis list viewport with offset clamping and `ensure_visible`.
//! - [`render`]: width-aware clipped string/line rendering and a vertical scrollbar.
//! - [`path`]: dotted-path access into `serde_json::Value` rows.
//! - [`debounce`]: a poll-style debounce deadline (no timers, no async runtime).
//! - [`error`]: the recoverable per-row render failure type.
//!
//! ## Design goals
//!
//! - Event-loop agnostic: you drive input + rendering from your app.
//! - No async runtime: remote data is expressed as request values the app executes.
//! - Rows are opaque `serde_json::Value` records; the library only ever reads them
//!   through dotted paths and never mutates them.

pub mod theme;

#[cfg(feature = "crossterm")]
pub mod crossterm_input;

pub mod debounce;
pub mod error;
pub mod input;
pub mod path;
pub mod render;
pub mod viewport;
