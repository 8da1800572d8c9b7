mod directory;
mod watcher;
mod worker;

pub use directory::{describe, read_directory, EntryDetails};
pub use watcher::DirectoryWatcher;
pub use worker::{spawn_worker, IoCommand, IoResult};
