//! A data table over `serde_json::Value` rows: columns with visibility rules,
//! static or query-driven pagination, search, row selection with bulk actions,
//! gated per-row actions, and switchable display modes.

mod headers;
mod state;
mod view;

pub use headers::CellContent;
pub use headers::CellRenderer;
pub use headers::HeaderSet;
pub use headers::HeaderSpec;
pub use state::ActionGate;
pub use state::BulkActionSpec;
pub use state::DataTableOptions;
pub use state::DataTableState;
pub use state::DisplayAs;
pub use state::ExtraRenderer;
pub use state::ExtraViewSpec;
pub use state::PaginationMode;
pub use state::RowGate;
pub use state::TableAction;
pub use state::TableFocus;
pub use state::TableQuery;
pub use state::TableSearch;
