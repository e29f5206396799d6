//! Per-component configuration records.
//!
//! Each record is a partial config: `None` means "no opinion". An app builds
//! one set of ambient defaults, each component instance builds its own record,
//! and `apply` fills the instance's gaps from the defaults. Explicit instance
//! values always win; icon groups merge key-by-key. `resolve` then turns the
//! merged record into concrete view options, supplying hardcoded fallbacks for
//! anything neither side set.

use std::time::Duration;

use crate::async_select::AsyncSelectViewOptions;
use crate::datatable::DataTableOptions;
use crate::select::SelectViewOptions;

/// Icon overrides for the select control. Merged key-by-key, not as a block.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SelectIcons {
    pub open: Option<String>,
    pub closed: Option<String>,
    pub clear: Option<String>,
    pub loading: Option<String>,
}

impl SelectIcons {
    fn apply(&self, instance: &mut SelectIcons) {
        if instance.open.is_none() {
            instance.open = self.open.clone();
        }
        if instance.closed.is_none() {
            instance.closed = self.closed.clone();
        }
        if instance.clear.is_none() {
            instance.clear = self.clear.clone();
        }
        if instance.loading.is_none() {
            instance.loading = self.loading.clone();
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct SelectDefaults {
    pub clearable: Option<bool>,
    pub searchable: Option<bool>,
    pub raw_value: Option<bool>,
    pub empty_message: Option<String>,
    pub option_error_fallback: Option<String>,
    pub icons: SelectIcons,
}

impl SelectDefaults {
    /// Fills the instance record's unset fields from these defaults.
    pub fn apply(&self, instance: &mut SelectDefaults) {
        if instance.clearable.is_none() {
            instance.clearable = self.clearable;
        }
        if instance.searchable.is_none() {
            instance.searchable = self.searchable;
        }
        if instance.raw_value.is_none() {
            instance.raw_value = self.raw_value;
        }
        if instance.empty_message.is_none() {
            instance.empty_message = self.empty_message.clone();
        }
        if instance.option_error_fallback.is_none() {
            instance.option_error_fallback = self.option_error_fallback.clone();
        }
        self.icons.apply(&mut instance.icons);
    }

    pub fn resolve(&self) -> SelectViewOptions {
        let mut options = SelectViewOptions::default();
        if let Some(v) = self.clearable {
            options.clearable = v;
        }
        if let Some(v) = self.searchable {
            options.searchable = v;
        }
        if let Some(v) = self.raw_value {
            options.raw_value = v;
        }
        if let Some(v) = &self.empty_message {
            options.empty_message = v.clone();
        }
        if let Some(v) = &self.option_error_fallback {
            options.option_error_fallback = v.clone();
        }
        if let Some(v) = &self.icons.open {
            options.open_icon = v.clone();
        }
        if let Some(v) = &self.icons.closed {
            options.closed_icon = v.clone();
        }
        if let Some(v) = &self.icons.clear {
            options.clear_icon = v.clone();
        }
        if let Some(v) = &self.icons.loading {
            options.loading_icon = v.clone();
        }
        options
    }
}

#[derive(Clone, Debug, Default)]
pub struct AsyncSelectDefaults {
    pub limit: Option<usize>,
    pub search_timeout: Option<Duration>,
    pub select: SelectDefaults,
}

impl AsyncSelectDefaults {
    pub fn apply(&self, instance: &mut AsyncSelectDefaults) {
        if instance.limit.is_none() {
            instance.limit = self.limit;
        }
        if instance.search_timeout.is_none() {
            instance.search_timeout = self.search_timeout;
        }
        self.select.apply(&mut instance.select);
    }

    pub fn resolve(&self) -> AsyncSelectViewOptions {
        let mut options = AsyncSelectViewOptions::default();
        if let Some(v) = self.limit {
            options.limit = v;
        }
        if let Some(v) = self.search_timeout {
            options.search_timeout = v;
        }
        options.select = self.select.resolve();
        options
    }
}

#[derive(Clone, Debug, Default)]
pub struct TableDefaults {
    pub toggle_rows: Option<bool>,
    pub no_head: Option<bool>,
    pub use_get_as_refresh: Option<bool>,
    pub empty_table: Option<String>,
    pub empty_cell: Option<String>,
    /// Dotted path extracting the stored value of a selected row.
    pub key_extractor: Option<String>,
    pub edit_title: Option<String>,
    pub delete_title: Option<String>,
    pub search_on_type: Option<bool>,
    pub search_timeout: Option<Duration>,
}

impl TableDefaults {
    pub fn apply(&self, instance: &mut TableDefaults) {
        if instance.toggle_rows.is_none() {
            instance.toggle_rows = self.toggle_rows;
        }
        if instance.no_head.is_none() {
            instance.no_head = self.no_head;
        }
        if instance.use_get_as_refresh.is_none() {
            instance.use_get_as_refresh = self.use_get_as_refresh;
        }
        if instance.empty_table.is_none() {
            instance.empty_table = self.empty_table.clone();
        }
        if instance.empty_cell.is_none() {
            instance.empty_cell = self.empty_cell.clone();
        }
        if instance.key_extractor.is_none() {
            instance.key_extractor = self.key_extractor.clone();
        }
        if instance.edit_title.is_none() {
            instance.edit_title = self.edit_title.clone();
        }
        if instance.delete_title.is_none() {
            instance.delete_title = self.delete_title.clone();
        }
        if instance.search_on_type.is_none() {
            instance.search_on_type = self.search_on_type;
        }
        if instance.search_timeout.is_none() {
            instance.search_timeout = self.search_timeout;
        }
    }

    pub fn resolve(&self) -> DataTableOptions {
        let mut options = DataTableOptions::default();
        if let Some(v) = self.toggle_rows {
            options.toggle_rows = v;
        }
        if let Some(v) = self.no_head {
            options.no_head = v;
        }
        if let Some(v) = self.use_get_as_refresh {
            options.use_get_as_refresh = v;
        }
        if let Some(v) = &self.empty_table {
            options.empty_table = v.clone();
        }
        if let Some(v) = &self.empty_cell {
            options.empty_cell = v.clone();
        }
        if self.key_extractor.is_some() {
            options.key_extractor = self.key_extractor.clone();
        }
        if let Some(v) = &self.edit_title {
            options.edit_title = v.clone();
        }
        if let Some(v) = &self.delete_title {
            options.delete_title = v.clone();
        }
        if let Some(v) = self.search_on_type {
            options.search_on_type = v;
        }
        if let Some(v) = self.search_timeout {
            options.search_timeout = v;
        }
        options
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn instance_values_win_over_defaults() {
        let defaults = SelectDefaults {
            searchable: Some(false),
            empty_message: Some("nothing here".to_string()),
            ..Default::default()
        };
        let mut instance = SelectDefaults {
            searchable: Some(true),
            ..Default::default()
        };
        defaults.apply(&mut instance);

        let options = instance.resolve();
        assert!(options.searchable);
        assert_eq!(options.empty_message, "nothing here");
        // untouched by both sides: hardcoded fallback
        assert!(options.clearable);
    }

    #[test]
    fn icons_merge_key_by_key() {
        let defaults = SelectDefaults {
            icons: SelectIcons {
                open: Some("v".to_string()),
                clear: Some("X".to_string()),
                ..Default::default()
            },
            ..Default::default()
        };
        let mut instance = SelectDefaults {
            icons: SelectIcons {
                open: Some("+".to_string()),
                ..Default::default()
            },
            ..Default::default()
        };
        defaults.apply(&mut instance);

        let options = instance.resolve();
        assert_eq!(options.open_icon, "+"); // instance key wins
        assert_eq!(options.clear_icon, "X"); // default key fills the gap
        assert_eq!(options.closed_icon, "▸"); // neither side: fallback
    }

    #[test]
    fn async_defaults_resolve_with_fallbacks() {
        let defaults = AsyncSelectDefaults {
            limit: Some(20),
            ..Default::default()
        };
        let mut instance = AsyncSelectDefaults::default();
        defaults.apply(&mut instance);

        let options = instance.resolve();
        assert_eq!(options.limit, 20);
        assert_eq!(options.search_timeout, Duration::from_millis(500));
        assert!(options.select.searchable);
    }

    #[test]
    fn table_defaults_resolve_with_fallbacks() {
        let defaults = TableDefaults {
            empty_cell: Some("·".to_string()),
            ..Default::default()
        };
        let mut instance = TableDefaults {
            empty_table: Some("nothing".to_string()),
            ..Default::default()
        };
        defaults.apply(&mut instance);

        let options = instance.resolve();
        assert_eq!(options.empty_cell, "·");
        assert_eq!(options.empty_table, "nothing");
        assert!(options.toggle_rows);
        assert!(options.use_get_as_refresh);
        assert!(!options.no_head);
        assert_eq!(options.edit_title, "Edit");
        assert!(!options.search_on_type);
    }
}
