//! JWalk-based directory traversal.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use jwalk::{DirEntry, Parallelism, WalkDir};
use tracing::{debug, error, trace};

use filescancrypt_core::{ScanError, ScanState};

/// Walks a directory tree once, feeding counts and sizes into a shared
/// [`ScanState`].
pub struct Traverser {
    root: PathBuf,
    state: Arc<ScanState>,
}

impl Traverser {
    /// Create a traverser for `root` that reports into `state`.
    pub fn new(root: impl Into<PathBuf>, state: Arc<ScanState>) -> Self {
        Self {
            root: root.into(),
            state,
        }
    }

    /// Walk the tree.
    ///
    /// Per-file and per-directory errors are absorbed. Only a failure on the
    /// root itself is returned. The completion flag is set on every exit
    /// path, including unwinding.
    pub fn run(&self) -> Result<(), ScanError> {
        let _guard = CompletionGuard::new(&self.state);

        if let Err(err) = std::fs::read_dir(&self.root) {
            let err = ScanError::io(&self.root, err);
            error!(root = %self.root.display(), "Error during scan: {err}");
            return Err(err);
        }

        let state = Arc::clone(&self.state);
        let walker = walker(&self.root).process_read_dir(move |depth, _path, _, children| {
            // The root's parent is "read" with no depth; it is not a
            // directory the scan entered.
            if depth.is_none() {
                return;
            }
            record_children(&state, children);
        });

        for entry in walker {
            let Err(err) = entry else { continue };

            if err.path().is_some_and(|p| p == self.root.as_path()) {
                let err = ScanError::walk(&self.root, &err);
                error!(root = %self.root.display(), "Error during scan: {err}");
                return Err(err);
            }

            self.state.record_read_error();
            debug!(
                path = %err.path().map(|p| p.display().to_string()).unwrap_or_default(),
                "skipping unreadable entry: {err}"
            );
        }

        Ok(())
    }
}

/// Sets the completion flag when dropped.
struct CompletionGuard<'a> {
    state: &'a ScanState,
}

impl<'a> CompletionGuard<'a> {
    fn new(state: &'a ScanState) -> Self {
        Self { state }
    }
}

impl Drop for CompletionGuard<'_> {
    fn drop(&mut self) {
        if self.state.mark_complete() {
            debug!("scan complete");
        }
    }
}

/// Tally the immediate children of one directory.
fn record_children(state: &ScanState, children: &[Result<DirEntry<((), ())>, jwalk::Error>]) {
    let mut subdirs = 0;
    let mut files = Vec::new();

    for child in children {
        match child {
            Ok(entry) if is_directory(entry) => subdirs += 1,
            Ok(entry) => files.push(entry.path()),
            Err(err) => {
                state.record_read_error();
                debug!("skipping unreadable entry: {err}");
            }
        }
    }

    state.record_directory(subdirs, files.len() as u64);

    for path in files {
        // Follows symlinks; a dangling link still counts as a file but adds
        // no size.
        match std::fs::metadata(&path) {
            Ok(metadata) => state.record_file_size(metadata.len()),
            Err(err) => trace!(path = %path.display(), "no size for file: {err}"),
        }
    }
}

/// Directories, and symlinks that resolve to one, count as subdirectories.
/// Symlinked directories are never descended into.
fn is_directory(entry: &DirEntry<((), ())>) -> bool {
    let file_type = entry.file_type();
    file_type.is_dir() || (file_type.is_symlink() && entry.path().is_dir())
}

/// Count every directory reachable from `root`, root included.
///
/// This is the cheap first pass that bounds the progress display. It fails
/// if the root is missing, is not a directory, or cannot be listed.
pub fn count_directories(root: &Path) -> Result<u64, ScanError> {
    let metadata = std::fs::metadata(root).map_err(|e| ScanError::io(root, e))?;
    if !metadata.is_dir() {
        return Err(ScanError::NotADirectory {
            path: root.to_path_buf(),
        });
    }
    std::fs::read_dir(root).map_err(|e| ScanError::io(root, e))?;

    let walker = walker(root).process_read_dir(|depth, _, _, children| {
        // Keep the root entry even when the root path is a symlink.
        if depth.is_none() {
            return;
        }
        children.retain(|child| {
            child
                .as_ref()
                .map(|entry| entry.file_type().is_dir())
                .unwrap_or(false)
        });
    });

    let mut total = 0;
    for entry in walker {
        match entry {
            // The root was checked above and may be a symlink to a directory.
            Ok(entry) if entry.depth == 0 || entry.file_type().is_dir() => total += 1,
            Ok(_) => {}
            Err(err) if err.path().is_some_and(|p| p == root) => {
                return Err(ScanError::walk(root, err));
            }
            Err(err) => debug!("directory count skipped an entry: {err}"),
        }
    }

    Ok(total)
}

/// Serial walk that includes hidden entries and never follows links.
fn walker(root: &Path) -> WalkDir {
    WalkDir::new(root)
        .parallelism(Parallelism::Serial)
        .skip_hidden(false)
        .follow_links(false)
        .min_depth(0)
}
