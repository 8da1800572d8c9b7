use crate::entry::PARENT_MARKER;
use crate::error::Error;
use crate::io::directory::{describe, EntryDetails};
use crate::navigator::{Listing, Navigator, Step};
use crate::state::SortOptions;
use std::path::PathBuf;
use std::sync::mpsc::{channel, Receiver, Sender};
use std::thread;

pub enum IoCommand {
    List,
    Descend(String),
    Reset,
    Sort(SortOptions),
    Describe(String),
}

pub enum IoResult {
    Listed(Listing),
    FileSelected(PathBuf),
    Described(EntryDetails),
    /// `listing` is set when the worker had to move to recover; it replaces
    /// whatever snapshot the UI holds
    Failed {
        error: Error,
        listing: Option<Listing>,
    },
}

impl IoResult {
    fn failed(error: impl Into<Error>) -> Self {
        IoResult::Failed {
            error: error.into(),
            listing: None,
        }
    }
}

/// Move the navigator onto a background thread.
///
/// The thread owns the navigator for its whole life; callers only ever see
/// [`Listing`] snapshots. `wake` runs after each result is sent.
pub fn spawn_worker<F>(mut navigator: Navigator, wake: F) -> (Sender<IoCommand>, Receiver<IoResult>)
where
    F: Fn() + Send + 'static,
{
    let (cmd_tx, cmd_rx) = channel();
    let (res_tx, res_rx) = channel();

    thread::spawn(move || {
        while let Ok(cmd) = cmd_rx.recv() {
            let result = handle(&mut navigator, cmd);
            if res_tx.send(result).is_err() {
                break;
            }
            wake();
        }
        tracing::debug!("navigation worker stopped");
    });

    (cmd_tx, res_rx)
}

fn handle(navigator: &mut Navigator, cmd: IoCommand) -> IoResult {
    match cmd {
        IoCommand::List => list(navigator),
        IoCommand::Descend(segment) => descend(navigator, &segment),
        IoCommand::Reset => {
            navigator.reset();
            list(navigator)
        }
        IoCommand::Sort(options) => {
            navigator.set_sort(options);
            list(navigator)
        }
        IoCommand::Describe(name) => {
            let path = match navigator.child_path(&name) {
                Ok(path) => path,
                Err(e) => return IoResult::failed(e),
            };
            match describe(&path) {
                Ok(details) => IoResult::Described(details),
                Err(e) => IoResult::failed(e),
            }
        }
    }
}

fn descend(navigator: &mut Navigator, segment: &str) -> IoResult {
    let last = navigator.segments().last().cloned();
    let step = match navigator.descend(segment) {
        Ok(Step::File(path)) => return IoResult::FileSelected(path),
        Ok(step) => step,
        Err(e) => {
            tracing::warn!(segment = %segment, error = %e, "navigation failed");
            return IoResult::failed(e);
        }
    };

    let error = match navigator.list_current_directory() {
        Ok(_) => return IoResult::Listed(navigator.snapshot()),
        Err(e) => e,
    };
    tracing::warn!(path = %step.path().display(), error = %error, "listing after move failed, moving back");

    // Undo the move so the next snapshot is the directory the caller came from
    let back = match (&step, last) {
        (Step::Ascended(_), Some(popped)) => navigator.descend(&popped),
        _ => navigator.descend(PARENT_MARKER),
    };
    if back.is_err() {
        navigator.reset();
    }
    relist_after(navigator, error.into())
}

fn list(navigator: &mut Navigator) -> IoResult {
    match navigator.list_current_directory() {
        Ok(_) => IoResult::Listed(navigator.snapshot()),
        Err(e) => {
            tracing::warn!(error = %e, "listing failed");
            recover(navigator, e.into())
        }
    }
}

fn relist_after(navigator: &mut Navigator, error: Error) -> IoResult {
    match navigator.list_current_directory() {
        Ok(_) => IoResult::Failed {
            error,
            listing: Some(navigator.snapshot()),
        },
        Err(_) => recover(navigator, error),
    }
}

/// Climb toward the root until a directory can be listed again.
fn recover(navigator: &mut Navigator, error: Error) -> IoResult {
    while !navigator.is_at_root() {
        if navigator.descend(PARENT_MARKER).is_err() {
            navigator.reset();
        }
        if navigator.list_current_directory().is_ok() {
            tracing::info!(path = %navigator.current_path().display(), "recovered after listing failure");
            return IoResult::Failed {
                error,
                listing: Some(navigator.snapshot()),
            };
        }
    }
    IoResult::Failed {
        error,
        listing: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{FilesystemError, NavigationError};
    use std::fs::{self, File};
    use std::time::Duration;
    use tempfile::tempdir;

    const TIMEOUT: Duration = Duration::from_secs(5);

    fn names(listing: &Listing) -> Vec<&str> {
        listing.entries.iter().map(|e| e.name.as_str()).collect()
    }

    fn expect_listing(rx: &Receiver<IoResult>) -> Listing {
        match rx.recv_timeout(TIMEOUT).unwrap() {
            IoResult::Listed(listing) => listing,
            _ => panic!("expected a listing"),
        }
    }

    #[test]
    fn test_worker_navigates_in_order() {
        let dir = tempdir().unwrap();
        fs::create_dir(dir.path().join("docs")).unwrap();
        File::create(dir.path().join("docs").join("a.txt")).unwrap();

        let nav = Navigator::new(dir.path()).unwrap();
        let (tx, rx) = spawn_worker(nav, || {});

        tx.send(IoCommand::List).unwrap();
        tx.send(IoCommand::Descend("docs/".into())).unwrap();
        tx.send(IoCommand::Descend("a.txt".into())).unwrap();
        tx.send(IoCommand::Descend("../".into())).unwrap();

        let root = expect_listing(&rx);
        assert!(root.at_root);
        assert_eq!(names(&root), ["docs/"]);

        let docs = expect_listing(&rx);
        assert!(!docs.at_root);
        assert_eq!(docs.path, dir.path().join("docs"));
        assert_eq!(names(&docs), ["../", "a.txt"]);

        match rx.recv_timeout(TIMEOUT).unwrap() {
            IoResult::FileSelected(path) => {
                assert_eq!(path, dir.path().join("docs").join("a.txt"))
            }
            _ => panic!("expected a file selection"),
        }

        let back = expect_listing(&rx);
        assert!(back.at_root);
        assert_eq!(back.path, dir.path());
    }

    #[test]
    fn test_worker_reports_errors() {
        let dir = tempdir().unwrap();
        let nav = Navigator::new(dir.path()).unwrap();
        let (tx, rx) = spawn_worker(nav, || {});

        tx.send(IoCommand::Descend("../".into())).unwrap();
        match rx.recv_timeout(TIMEOUT).unwrap() {
            IoResult::Failed {
                error: Error::Navigation(NavigationError::AtRoot),
                listing: None,
            } => {}
            _ => panic!("expected AtRoot"),
        }
    }

    #[test]
    fn test_describe_rejects_escaping_names() {
        let dir = tempdir().unwrap();
        let nav = Navigator::new(dir.path()).unwrap();
        let (tx, rx) = spawn_worker(nav, || {});

        tx.send(IoCommand::Describe("../../etc/passwd".into())).unwrap();
        match rx.recv_timeout(TIMEOUT).unwrap() {
            IoResult::Failed {
                error: Error::Navigation(NavigationError::InvalidSegment(_)),
                ..
            } => {}
            _ => panic!("expected InvalidSegment"),
        }
    }

    #[test]
    fn test_vanished_directory_recovers_to_parent() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("a").join("inner")).unwrap();
        fs::create_dir(dir.path().join("b")).unwrap();

        let nav = Navigator::new(dir.path()).unwrap();
        let (tx, rx) = spawn_worker(nav, || {});

        tx.send(IoCommand::Descend("a/".into())).unwrap();
        tx.send(IoCommand::Descend("inner/".into())).unwrap();
        expect_listing(&rx);
        expect_listing(&rx);

        fs::remove_dir_all(dir.path().join("a")).unwrap();
        tx.send(IoCommand::List).unwrap();
        match rx.recv_timeout(TIMEOUT).unwrap() {
            IoResult::Failed {
                error: Error::Filesystem(_),
                listing: Some(listing),
            } => {
                assert!(listing.at_root);
                assert_eq!(listing.path, dir.path());
                assert_eq!(names(&listing), ["b/"]);
            }
            _ => panic!("expected a failure with a recovered listing"),
        }

        // Activations from the recovered snapshot resolve under the root
        tx.send(IoCommand::Descend("b/".into())).unwrap();
        let b = expect_listing(&rx);
        assert_eq!(b.path, dir.path().join("b"));
    }

    #[cfg(unix)]
    #[test]
    fn test_unlistable_target_moves_back() {
        use std::os::unix::fs::PermissionsExt;

        // root can list anything
        if unsafe { libc::geteuid() } == 0 {
            return;
        }

        let dir = tempdir().unwrap();
        let sealed = dir.path().join("sealed");
        fs::create_dir(&sealed).unwrap();
        File::create(dir.path().join("note.txt")).unwrap();
        fs::set_permissions(&sealed, fs::Permissions::from_mode(0o000)).unwrap();

        let nav = Navigator::new(dir.path()).unwrap();
        let (tx, rx) = spawn_worker(nav, || {});
        tx.send(IoCommand::Descend("sealed/".into())).unwrap();
        let result = rx.recv_timeout(TIMEOUT).unwrap();
        fs::set_permissions(&sealed, fs::Permissions::from_mode(0o755)).unwrap();

        match result {
            IoResult::Failed {
                error: Error::Filesystem(FilesystemError::List { .. }),
                listing: Some(listing),
            } => {
                assert!(listing.at_root);
                assert_eq!(names(&listing), ["note.txt"]);
            }
            _ => panic!("expected the move to be undone"),
        }
    }

    #[test]
    fn test_worker_describe_and_reset() {
        let dir = tempdir().unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();
        fs::write(dir.path().join("sub").join("f.bin"), b"abc").unwrap();

        let nav = Navigator::new(dir.path()).unwrap();
        let (tx, rx) = spawn_worker(nav, || {});

        tx.send(IoCommand::Descend("sub/".into())).unwrap();
        tx.send(IoCommand::Describe("f.bin".into())).unwrap();
        tx.send(IoCommand::Reset).unwrap();

        expect_listing(&rx);
        match rx.recv_timeout(TIMEOUT).unwrap() {
            IoResult::Described(details) => assert_eq!(details.size, 3),
            _ => panic!("expected details"),
        }
        let root = expect_listing(&rx);
        assert!(root.at_root);
    }

    #[test]
    fn test_worker_resorts_listing() {
        let dir = tempdir().unwrap();
        File::create(dir.path().join("a.txt")).unwrap();
        File::create(dir.path().join("b.md")).unwrap();

        let nav = Navigator::new(dir.path()).unwrap();
        let (tx, rx) = spawn_worker(nav, || {});

        let mut options = SortOptions::default();
        options.cycle_sort_by();
        tx.send(IoCommand::List).unwrap();
        tx.send(IoCommand::Sort(options)).unwrap();

        assert_eq!(names(&expect_listing(&rx)), ["a.txt", "b.md"]);
        assert_eq!(names(&expect_listing(&rx)), ["b.md", "a.txt"]);
    }

    #[test]
    fn test_wake_called_per_result() {
        use std::sync::atomic::{AtomicUsize, Ordering};
        use std::sync::Arc;

        let dir = tempdir().unwrap();
        let nav = Navigator::new(dir.path()).unwrap();
        let wakes = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&wakes);
        let (tx, rx) = spawn_worker(nav, move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        tx.send(IoCommand::List).unwrap();
        tx.send(IoCommand::List).unwrap();
        expect_listing(&rx);
        expect_listing(&rx);
        drop(tx);

        // wake runs right after each send; give the thread a moment
        let deadline = std::time::Instant::now() + TIMEOUT;
        while wakes.load(Ordering::SeqCst) < 2 && std::time::Instant::now() < deadline {
            thread::yield_now();
        }
        assert_eq!(wakes.load(Ordering::SeqCst), 2);
    }
}
