use crate::entry::Entry;
use crate::error::FilesystemError;
use crate::state::SortOptions;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// Stat result for a single entry, shown in the details bar.
#[derive(Clone, Debug)]
pub struct EntryDetails {
    pub path: PathBuf,
    pub is_dir: bool,
    pub size: u64,
    /// `None` where the platform keeps no modification time
    pub modified: Option<SystemTime>,
}

/// List the visible children of `path`.
///
/// Hidden children, children whose name is not UTF-8 and children the
/// process has no read permission for are skipped. Nothing but the directory
/// itself is opened.
pub fn read_directory(path: &Path, sort: &SortOptions) -> Result<Vec<Entry>, FilesystemError> {
    let read_dir = fs::read_dir(path).map_err(|source| FilesystemError::List {
        path: path.to_path_buf(),
        source,
    })?;

    let mut entries = Vec::new();
    for dir_entry in read_dir {
        let dir_entry = match dir_entry {
            Ok(e) => e,
            Err(e) => {
                tracing::trace!(dir = %path.display(), error = %e, "skipping unreadable entry");
                continue;
            }
        };
        let child = dir_entry.path();
        let name = match dir_entry.file_name().into_string() {
            Ok(name) => name,
            Err(raw) => {
                tracing::trace!(dir = %path.display(), name = ?raw, "skipping non UTF-8 name");
                continue;
            }
        };

        // Follows symlinks, so a dangling link is unreadable
        let metadata = match fs::metadata(&child) {
            Ok(m) => m,
            Err(e) => {
                tracing::trace!(path = %child.display(), error = %e, "skipping entry without metadata");
                continue;
            }
        };

        if is_hidden(&name, &metadata) {
            continue;
        }
        if !is_readable(&child, &metadata) {
            tracing::trace!(path = %child.display(), "skipping unreadable entry");
            continue;
        }

        entries.push(if metadata.is_dir() {
            Entry::directory(&name)
        } else {
            Entry::file(&name)
        });
    }

    sort.apply(&mut entries);
    Ok(entries)
}

pub fn describe(path: &Path) -> Result<EntryDetails, FilesystemError> {
    let metadata = fs::metadata(path).map_err(|source| FilesystemError::Stat {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(EntryDetails {
        path: path.to_path_buf(),
        is_dir: metadata.is_dir(),
        size: metadata.len(),
        modified: metadata.modified().ok(),
    })
}

fn is_hidden(name: &str, metadata: &fs::Metadata) -> bool {
    if name.starts_with('.') {
        return true;
    }

    #[cfg(windows)]
    {
        use std::os::windows::fs::MetadataExt;
        const FILE_ATTRIBUTE_HIDDEN: u32 = 0x2;
        metadata.file_attributes() & FILE_ATTRIBUTE_HIDDEN != 0
    }

    #[cfg(not(windows))]
    {
        let _ = metadata;
        false
    }
}

#[cfg(unix)]
fn is_readable(path: &Path, _metadata: &fs::Metadata) -> bool {
    use std::ffi::CString;
    use std::os::unix::ffi::OsStrExt;

    let Ok(c_path) = CString::new(path.as_os_str().as_bytes()) else {
        return false;
    };
    // Permission check only; FIFOs and device nodes must never be opened here
    unsafe { libc::access(c_path.as_ptr(), libc::R_OK) == 0 }
}

#[cfg(not(unix))]
fn is_readable(path: &Path, metadata: &fs::Metadata) -> bool {
    !metadata.is_dir() || fs::read_dir(path).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use tempfile::tempdir;

    fn names(entries: &[Entry]) -> Vec<&str> {
        entries.iter().map(|e| e.name.as_str()).collect()
    }

    #[test]
    fn test_read_directory_marks_and_sorts() {
        let dir = tempdir().unwrap();
        File::create(dir.path().join("notes.TXT")).unwrap();
        fs::create_dir(dir.path().join("Photos")).unwrap();
        File::create(dir.path().join("a.bin")).unwrap();

        let entries = read_directory(dir.path(), &SortOptions::default()).unwrap();

        assert_eq!(names(&entries), ["Photos/", "a.bin", "notes.TXT"]);
        assert!(entries[0].is_dir);
        assert!(entries[1..].iter().all(|e| !e.is_dir && !e.name.ends_with('/')));
    }

    #[test]
    fn test_hidden_entries_are_skipped() {
        let dir = tempdir().unwrap();
        File::create(dir.path().join(".secret")).unwrap();
        fs::create_dir(dir.path().join(".git")).unwrap();
        File::create(dir.path().join("visible")).unwrap();

        let entries = read_directory(dir.path(), &SortOptions::default()).unwrap();
        assert_eq!(names(&entries), ["visible"]);
    }

    #[cfg(unix)]
    #[test]
    fn test_dangling_symlink_is_skipped() {
        let dir = tempdir().unwrap();
        std::os::unix::fs::symlink(dir.path().join("missing"), dir.path().join("broken")).unwrap();
        fs::create_dir(dir.path().join("real")).unwrap();
        std::os::unix::fs::symlink(dir.path().join("real"), dir.path().join("link")).unwrap();

        let entries = read_directory(dir.path(), &SortOptions::default()).unwrap();
        assert_eq!(names(&entries), ["link/", "real/"]);
    }

    #[test]
    fn test_missing_directory_fails() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("gone");

        let err = read_directory(&missing, &SortOptions::default()).unwrap_err();
        assert!(matches!(err, FilesystemError::List { ref path, .. } if path == &missing));
    }

    #[test]
    fn test_describe() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("data.bin");
        fs::write(&file, b"12345").unwrap();

        let details = describe(&file).unwrap();
        assert_eq!(details.size, 5);
        assert!(!details.is_dir);
        assert!(details.modified.is_some());
        assert!(describe(dir.path()).unwrap().is_dir);
        assert!(describe(&dir.path().join("nope")).is_err());
    }

    #[cfg(unix)]
    fn mkfifo(path: &Path) {
        use std::ffi::CString;
        use std::os::unix::ffi::OsStrExt;

        let c_path = CString::new(path.as_os_str().as_bytes()).unwrap();
        assert_eq!(unsafe { libc::mkfifo(c_path.as_ptr(), 0o644) }, 0);
    }

    #[cfg(unix)]
    #[test]
    fn test_fifo_does_not_block_listing() {
        use std::sync::mpsc::channel;
        use std::time::Duration;

        let dir = tempdir().unwrap();
        File::create(dir.path().join("a.txt")).unwrap();
        mkfifo(&dir.path().join("pipe"));

        let (tx, rx) = channel();
        let path = dir.path().to_path_buf();
        std::thread::spawn(move || {
            let _ = tx.send(read_directory(&path, &SortOptions::default()));
        });

        let entries = rx
            .recv_timeout(Duration::from_secs(5))
            .expect("listing blocked on a FIFO")
            .unwrap();
        assert_eq!(names(&entries), ["a.txt", "pipe"]);
    }

    #[cfg(unix)]
    #[test]
    fn test_permission_denied_entries_are_skipped() {
        use std::os::unix::fs::PermissionsExt;

        // root passes every access check
        if unsafe { libc::geteuid() } == 0 {
            return;
        }

        let dir = tempdir().unwrap();
        File::create(dir.path().join("open.txt")).unwrap();
        let locked = dir.path().join("locked.txt");
        File::create(&locked).unwrap();
        let sealed = dir.path().join("sealed");
        fs::create_dir(&sealed).unwrap();
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();
        fs::set_permissions(&sealed, fs::Permissions::from_mode(0o000)).unwrap();

        let entries = read_directory(dir.path(), &SortOptions::default()).unwrap();

        fs::set_permissions(&sealed, fs::Permissions::from_mode(0o755)).unwrap();
        assert_eq!(names(&entries), ["open.txt"]);
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_non_utf8_names_are_skipped() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let dir = tempdir().unwrap();
        fs::create_dir(dir.path().join(OsStr::from_bytes(b"caf\xe9"))).unwrap();
        fs::create_dir(dir.path().join("cafe")).unwrap();

        let entries = read_directory(dir.path(), &SortOptions::default()).unwrap();
        assert_eq!(names(&entries), ["cafe/"]);
    }
}
