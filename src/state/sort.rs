// Sort options for directory listings

use crate::entry::Entry;
use std::cmp::Ordering;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SortBy {
    Name,
    Extension,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SortOrder {
    Ascending,
    Descending,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SortOptions {
    pub sort_by: SortBy,
    pub sort_order: SortOrder,
    pub dirs_first: bool,
}

impl Default for SortOptions {
    fn default() -> Self {
        Self {
            sort_by: SortBy::Name,
            sort_order: SortOrder::Ascending,
            dirs_first: true,
        }
    }
}

impl SortOptions {
    /// Build options from config strings, falling back to defaults on unknown values.
    pub fn parse(sort_by: &str, sort_order: &str, dirs_first: bool) -> Self {
        let defaults = Self::default();
        let sort_by = match sort_by.to_ascii_lowercase().as_str() {
            "name" => SortBy::Name,
            "extension" | "ext" => SortBy::Extension,
            other => {
                tracing::warn!(sort_by = other, "unknown sort field, using name");
                defaults.sort_by
            }
        };
        let sort_order = match sort_order.to_ascii_lowercase().as_str() {
            "asc" | "ascending" => SortOrder::Ascending,
            "desc" | "descending" => SortOrder::Descending,
            other => {
                tracing::warn!(sort_order = other, "unknown sort order, using asc");
                defaults.sort_order
            }
        };
        Self {
            sort_by,
            sort_order,
            dirs_first,
        }
    }

    pub fn cycle_sort_by(&mut self) {
        self.sort_by = match self.sort_by {
            SortBy::Name => SortBy::Extension,
            SortBy::Extension => SortBy::Name,
        };
    }

    pub fn toggle_order(&mut self) {
        self.sort_order = match self.sort_order {
            SortOrder::Ascending => SortOrder::Descending,
            SortOrder::Descending => SortOrder::Ascending,
        };
    }

    pub fn toggle_dirs_first(&mut self) {
        self.dirs_first = !self.dirs_first;
    }

    pub fn compare(&self, a: &Entry, b: &Entry) -> Ordering {
        if self.dirs_first && a.is_dir != b.is_dir {
            return b.is_dir.cmp(&a.is_dir);
        }
        let by_name = || {
            a.name
                .to_lowercase()
                .cmp(&b.name.to_lowercase())
                .then_with(|| a.name.cmp(&b.name))
        };
        let ordering = match self.sort_by {
            SortBy::Name => by_name(),
            SortBy::Extension => a
                .extension_key()
                .sort_text()
                .cmp(b.extension_key().sort_text())
                .then_with(by_name),
        };
        match self.sort_order {
            SortOrder::Ascending => ordering,
            SortOrder::Descending => ordering.reverse(),
        }
    }

    pub fn apply(&self, entries: &mut [Entry]) {
        entries.sort_by(|a, b| self.compare(a, b));
    }

    pub fn label(&self) -> &'static str {
        match (self.sort_by, self.sort_order) {
            (SortBy::Name, SortOrder::Ascending) => "Name ↑",
            (SortBy::Name, SortOrder::Descending) => "Name ↓",
            (SortBy::Extension, SortOrder::Ascending) => "Type ↑",
            (SortBy::Extension, SortOrder::Descending) => "Type ↓",
        }
    }
}
