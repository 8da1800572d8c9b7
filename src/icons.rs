// Extension -> icon key registry owned by the rendering layer

use crate::entry::Entry;
use std::collections::HashMap;

/// Lookup key derived from a file name.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum ExtensionKey {
    /// Lowercase text after the last `.`
    Extension(String),
    /// The name has no `.`, or ends with one
    None,
}

impl ExtensionKey {
    pub fn of(file_name: &str) -> Self {
        match file_name.rfind('.') {
            Some(idx) if idx + 1 < file_name.len() => {
                Self::Extension(file_name[idx + 1..].to_lowercase())
            }
            _ => Self::None,
        }
    }

    pub fn sort_text(&self) -> &str {
        match self {
            Self::Extension(ext) => ext,
            Self::None => "",
        }
    }
}

/// Accepts "zip", ".ZIP" or "" (the no-extension key).
impl From<&str> for ExtensionKey {
    fn from(extension: &str) -> Self {
        let ext = extension.strip_prefix('.').unwrap_or(extension);
        if ext.is_empty() {
            Self::None
        } else {
            Self::Extension(ext.to_lowercase())
        }
    }
}

impl From<String> for ExtensionKey {
    fn from(extension: String) -> Self {
        Self::from(extension.as_str())
    }
}

/// Icon picked for an entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IconChoice<'a, T> {
    Folder,
    Mapped(&'a T),
    Fallback,
}

/// Maps file extensions to caller-defined icon keys.
#[derive(Clone, Debug)]
pub struct IconMap<T> {
    keys: HashMap<ExtensionKey, T>,
}

impl<T> IconMap<T> {
    pub fn new() -> Self {
        Self {
            keys: HashMap::new(),
        }
    }

    /// Returns the key previously registered for the extension.
    pub fn register_icon_key(&mut self, extension: impl Into<ExtensionKey>, key: T) -> Option<T> {
        self.keys.insert(extension.into(), key)
    }

    pub fn clear_icon_keys(&mut self) {
        self.keys.clear();
    }

    pub fn has_icon_keys(&self) -> bool {
        !self.keys.is_empty()
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn lookup(&self, file_name: &str) -> Option<&T> {
        self.keys.get(&ExtensionKey::of(file_name))
    }

    pub fn choose(&self, entry: &Entry) -> IconChoice<'_, T> {
        if entry.is_dir {
            return IconChoice::Folder;
        }
        match self.keys.get(&entry.extension_key()) {
            Some(key) => IconChoice::Mapped(key),
            None => IconChoice::Fallback,
        }
    }
}

impl<T> Default for IconMap<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, K: Into<ExtensionKey>> FromIterator<(K, T)> for IconMap<T> {
    fn from_iter<I: IntoIterator<Item = (K, T)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (ext, key) in iter {
            map.register_icon_key(ext, key);
        }
        map
    }
}
