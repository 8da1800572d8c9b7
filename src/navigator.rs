//! Current-directory bookkeeping for the browser.
//!
//! A [`Navigator`] keeps a stack of path segments below a fixed root. The
//! resolved current directory is always `root` joined with every segment, and
//! the stack only ever holds segments that resolved to a directory when they
//! were pushed.

use crate::entry::{Entry, DIR_MARKER, PARENT_MARKER};
use crate::error::{Error, FilesystemError, NavigationError};
use crate::io::read_directory;
use crate::state::SortOptions;
use std::fs;
use std::path::{Path, PathBuf, MAIN_SEPARATOR};
use std::sync::Arc;

/// Immutable view of one listing, handed to the rendering layer.
#[derive(Clone, Debug)]
pub struct Listing {
    pub path: PathBuf,
    pub at_root: bool,
    pub entries: Arc<[Entry]>,
}

/// Outcome of [`Navigator::descend`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Step {
    Entered(PathBuf),
    Ascended(PathBuf),
    /// The target is not a directory; navigation state did not change
    File(PathBuf),
}

impl Step {
    pub fn path(&self) -> &Path {
        match self {
            Step::Entered(p) | Step::Ascended(p) | Step::File(p) => p,
        }
    }

    pub fn moved(&self) -> bool {
        !matches!(self, Step::File(_))
    }
}

pub fn is_parent_marker(segment: &str) -> bool {
    segment.eq_ignore_ascii_case(PARENT_MARKER)
}

#[derive(Debug)]
pub struct Navigator {
    root: PathBuf,
    segments: Vec<String>,
    current: PathBuf,
    entries: Arc<[Entry]>,
    sort: SortOptions,
}

impl Navigator {
    pub fn new(root: impl Into<PathBuf>) -> Result<Self, FilesystemError> {
        let root = root.into();
        if !stat_is_dir(&root)? {
            return Err(FilesystemError::NotADirectory(root));
        }
        Ok(Self {
            current: root.clone(),
            root,
            segments: Vec::new(),
            entries: Arc::from(Vec::new()),
            sort: SortOptions::default(),
        })
    }

    pub fn with_sort(mut self, sort: SortOptions) -> Self {
        self.sort = sort;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Same as [`Navigator::root`]; callers compare against it to decide
    /// whether to offer the "up" entry.
    pub fn current_root(&self) -> &Path {
        &self.root
    }

    pub fn current_path(&self) -> &Path {
        &self.current
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn is_at_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// Entries from the last successful listing.
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn sort_options(&self) -> SortOptions {
        self.sort
    }

    pub fn set_sort(&mut self, sort: SortOptions) {
        self.sort = sort;
    }

    pub fn snapshot(&self) -> Listing {
        Listing {
            path: self.current.clone(),
            at_root: self.is_at_root(),
            entries: Arc::clone(&self.entries),
        }
    }

    /// Re-read the current directory and replace the exposed entries.
    ///
    /// Below the root the first entry is always the parent marker. On error the
    /// previous entries are kept.
    pub fn list_current_directory(&mut self) -> Result<&[Entry], FilesystemError> {
        let mut entries = read_directory(&self.current, &self.sort)?;
        if !self.is_at_root() {
            entries.insert(0, Entry::parent());
        }
        tracing::debug!(
            path = %self.current.display(),
            count = entries.len(),
            "listed directory"
        );
        self.entries = entries.into();
        Ok(&self.entries)
    }

    /// Move into `segment`, or up one level for the parent marker.
    ///
    /// A segment naming a file leaves the state untouched and returns
    /// [`Step::File`] with its path.
    pub fn descend(&mut self, segment: &str) -> Result<Step, Error> {
        if is_parent_marker(segment) {
            return self.ascend().map(Step::Ascended);
        }

        let normalized = normalize_segment(segment)?;
        self.segments.push(normalized);
        let candidate = self.resolve();

        match stat_is_dir(&candidate) {
            Ok(true) => {
                tracing::debug!(path = %candidate.display(), "entered directory");
                self.current = candidate.clone();
                Ok(Step::Entered(candidate))
            }
            Ok(false) => {
                self.segments.pop();
                Ok(Step::File(candidate))
            }
            Err(e) => {
                self.segments.pop();
                Err(e.into())
            }
        }
    }

    /// Path of a direct child of the current directory.
    pub fn child_path(&self, name: &str) -> Result<PathBuf, NavigationError> {
        let normalized = normalize_segment(name)?;
        Ok(self.current.join(normalized.trim_end_matches(DIR_MARKER)))
    }

    /// Drop every segment and return to the root.
    pub fn reset(&mut self) {
        self.segments.clear();
        self.current = self.root.clone();
    }

    fn ascend(&mut self) -> Result<PathBuf, Error> {
        let popped = self.segments.pop().ok_or(NavigationError::AtRoot)?;
        let candidate = self.resolve();

        let outcome = match stat_is_dir(&candidate) {
            Ok(true) => Ok(()),
            Ok(false) => Err(FilesystemError::NotADirectory(candidate.clone())),
            Err(e) => Err(e),
        };
        if let Err(e) = outcome {
            self.segments.push(popped);
            return Err(e.into());
        }

        tracing::debug!(path = %candidate.display(), "ascended to parent");
        self.current = candidate.clone();
        Ok(candidate)
    }

    fn resolve(&self) -> PathBuf {
        let mut path = self.root.clone();
        for segment in &self.segments {
            path.push(segment.trim_end_matches(DIR_MARKER));
        }
        path
    }
}

fn normalize_segment(segment: &str) -> Result<String, NavigationError> {
    let name = segment.strip_suffix(DIR_MARKER).unwrap_or(segment);
    let invalid = name.is_empty()
        || name == "."
        || name == ".."
        || name.contains(DIR_MARKER)
        || name.contains(MAIN_SEPARATOR);
    if invalid {
        return Err(NavigationError::InvalidSegment(segment.to_string()));
    }
    Ok(format!("{}{}", name, DIR_MARKER))
}

fn stat_is_dir(path: &Path) -> Result<bool, FilesystemError> {
    fs::metadata(path)
        .map(|m| m.is_dir())
        .map_err(|source| FilesystemError::Stat {
            path: path.to_path_buf(),
            source,
        })
}
