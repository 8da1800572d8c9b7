use crate::icons::ExtensionKey;

/// Marker appended to directory names in listings.
pub const DIR_MARKER: char = '/';

/// Name of the synthetic entry that moves one level up.
pub const PARENT_MARKER: &str = "../";

/// One row of a directory listing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Entry {
    pub name: String,
    pub is_dir: bool,
}

impl Entry {
    pub fn directory(name: &str) -> Self {
        Self {
            name: format!("{}{}", name, DIR_MARKER),
            is_dir: true,
        }
    }

    pub fn file(name: &str) -> Self {
        Self {
            name: name.to_string(),
            is_dir: false,
        }
    }

    pub fn parent() -> Self {
        Self {
            name: PARENT_MARKER.to_string(),
            is_dir: true,
        }
    }

    pub fn is_parent(&self) -> bool {
        self.is_dir && self.name == PARENT_MARKER
    }

    /// Name without the directory marker.
    pub fn file_name(&self) -> &str {
        if self.is_dir {
            self.name.strip_suffix(DIR_MARKER).unwrap_or(&self.name)
        } else {
            &self.name
        }
    }

    pub fn extension_key(&self) -> ExtensionKey {
        ExtensionKey::of(self.file_name())
    }
}
