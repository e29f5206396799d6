//! `ratatui-datakit` is a set of data-driven components for terminal UIs.
//!
//! Everything is headless-first: each component is a state struct you drive with
//! [`input::InputEvent`]s from your own event loop and render into a
//! `ratatui::buffer::Buffer`. No async runtime is pulled in: remote data is
//! expressed as request values ([`async_select::FetchRequest`],
//! [`datatable::TableQuery`]) the app executes and feeds back.
//!
//! Entry points:
//! - [`pagination::compute_window`]: page-number windowing with ellipses.
//! - [`pagination::PaginationView`]: an interactive pager control.
//! - [`select::SelectView`]: a searchable single-value dropdown.
//! - [`async_select::AsyncSelectView`]: the dropdown over paged remote data.
//! - [`datatable::DataTableState`]: a table composing headers, paging, search,
//!   selection, and display modes.
//!
//! Rows are `serde_json::Value` records addressed with dotted paths
//! (`"category.ref"`); the library never mutates a row.
//!
//! Per-component configuration merges over ambient defaults via the records in
//! [`config`]: an explicit instance value always wins, icon groups merge
//! key-by-key, and hardcoded fallbacks apply when neither side has an opinion.

pub mod async_select;
pub mod config;
pub mod datatable;
pub mod options;
pub mod pagination;
pub mod select;

pub use ratatui_datakit_core::debounce;
pub use ratatui_datakit_core::error;
pub use ratatui_datakit_core::input;
pub use ratatui_datakit_core::path;
pub use ratatui_datakit_core::render;
pub use ratatui_datakit_core::theme;
pub use ratatui_datakit_core::viewport;

#[cfg(feature = "crossterm")]
pub use ratatui_datakit_core::crossterm_input;
