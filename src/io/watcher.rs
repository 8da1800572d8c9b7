use notify::{Event, RecommendedWatcher, RecursiveMode, Watcher};
use std::path::{Path, PathBuf};

/// Watches one directory (non-recursively) and calls back on changes.
pub struct DirectoryWatcher {
    path: PathBuf,
    _watcher: RecommendedWatcher,
}

impl DirectoryWatcher {
    pub fn watch<F>(path: &Path, on_change: F) -> notify::Result<Self>
    where
        F: Fn() + Send + 'static,
    {
        let mut watcher = notify::recommended_watcher(move |res: Result<Event, notify::Error>| {
            match res {
                Ok(event) if event.kind.is_access() => {}
                Ok(_) => on_change(),
                Err(e) => tracing::warn!(error = %e, "watch error"),
            }
        })?;
        watcher.watch(path, RecursiveMode::NonRecursive)?;
        tracing::debug!(path = %path.display(), "watching directory");

        Ok(Self {
            path: path.to_path_buf(),
            _watcher: watcher,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
