//! Directory browsing core: a path-stack navigator over the local filesystem,
//! an extension-to-icon registry for the rendering layer, and a background
//! worker that hands immutable listings to the UI.

pub mod config;
pub mod entry;
pub mod error;
pub mod icons;
pub mod io;
pub mod logging;
pub mod navigator;
pub mod state;

pub use entry::{Entry, PARENT_MARKER};
pub use error::{Error, FilesystemError, NavigationError};
pub use icons::{ExtensionKey, IconChoice, IconMap};
pub use navigator::{Listing, Navigator, Step};
