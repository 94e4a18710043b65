//! Terminal actions applied to files that match a strategy.

use crate::archive::{archive_path, zip_file};
use crate::config::StrategyAction;
use crate::error::{Result, ScrubError};
use crate::fs::{FileEntry, Filesystem};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Something that can be done to the files matching a strategy.
pub trait Performer {
    /// Apply the action to every file for which `matches` returns true.
    ///
    /// Returns the files that are still present afterwards, in their original order.
    fn perform(
        &self,
        files: Vec<FileEntry>,
        matches: &dyn Fn(&FileEntry) -> bool,
    ) -> Result<Vec<FileEntry>>;
}

/// Outcome of acting on one matching file
enum Outcome {
    /// The file is gone from the directory
    Removed,
    /// The file is still there (pretend mode, or a per-file failure)
    Kept,
}

/// Shared state of every action: the directory being cleaned and how to touch it.
struct ActionContext<'a> {
    dir: PathBuf,
    fs: &'a dyn Filesystem,
    pretend: bool,
}

impl ActionContext<'_> {
    /// Walk the working set, calling `act` for each match and keeping everything it
    /// doesn't remove. The input is consumed rather than spliced while iterating.
    fn run(
        &self,
        tag: &str,
        files: Vec<FileEntry>,
        matches: &dyn Fn(&FileEntry) -> bool,
        mut act: impl FnMut(&Path) -> Result<Outcome>,
    ) -> Result<Vec<FileEntry>> {
        let mut kept = Vec::with_capacity(files.len());

        for file in files {
            let filename = self.fs.full_path(&file, &self.dir);

            if !matches(&file) {
                debug!("[{}] No action is needed for file {}", tag, filename.display());
                kept.push(file);
                continue;
            }

            match act(&filename)? {
                Outcome::Removed => {}
                Outcome::Kept => kept.push(file),
            }
        }

        Ok(kept)
    }
}

/// Permanently deletes matching files
pub struct DeleteAction<'a> {
    ctx: ActionContext<'a>,
}

impl<'a> DeleteAction<'a> {
    pub fn new(dir: impl Into<PathBuf>, fs: &'a dyn Filesystem, pretend: bool) -> Self {
        DeleteAction {
            ctx: ActionContext {
                dir: dir.into(),
                fs,
                pretend,
            },
        }
    }
}

impl Performer for DeleteAction<'_> {
    fn perform(
        &self,
        files: Vec<FileEntry>,
        matches: &dyn Fn(&FileEntry) -> bool,
    ) -> Result<Vec<FileEntry>> {
        let ctx = &self.ctx;
        ctx.run("Delete", files, matches, |filename| {
            if ctx.pretend {
                info!("[Delete] PRETEND: Would delete file {}", filename.display());
                return Ok(Outcome::Kept);
            }

            info!("[Delete] Deleting file {}", filename.display());
            match ctx.fs.remove(filename) {
                Ok(()) => Ok(Outcome::Removed),
                Err(err) => {
                    warn!(
                        "[Delete] ERROR: Failed to delete file {}: {}",
                        filename.display(),
                        err
                    );
                    Ok(Outcome::Kept)
                }
            }
        })
    }
}

/// Compresses each matching file into `<file>.zip`, then deletes the original
pub struct ZipAction<'a> {
    ctx: ActionContext<'a>,
}

impl<'a> ZipAction<'a> {
    pub fn new(dir: impl Into<PathBuf>, fs: &'a dyn Filesystem, pretend: bool) -> Self {
        ZipAction {
            ctx: ActionContext {
                dir: dir.into(),
                fs,
                pretend,
            },
        }
    }
}

impl Performer for ZipAction<'_> {
    fn perform(
        &self,
        files: Vec<FileEntry>,
        matches: &dyn Fn(&FileEntry) -> bool,
    ) -> Result<Vec<FileEntry>> {
        let ctx = &self.ctx;
        ctx.run("ZIP", files, matches, |filename| {
            if ctx.pretend {
                info!("[ZIP] PRETEND: Would zip file {}", filename.display());
                return Ok(Outcome::Kept);
            }

            info!("[ZIP] Zipping file {}", filename.display());

            // A failed archive stops everything; the original is still in place
            zip_file(ctx.fs, filename).map_err(|source| ScrubError::Archive {
                path: archive_path(filename),
                source,
            })?;

            match ctx.fs.remove(filename) {
                Ok(()) => Ok(Outcome::Removed),
                Err(err) => {
                    warn!(
                        "[ZIP] ERROR: Failed to delete original file {}: {}",
                        filename.display(),
                        err
                    );
                    Ok(Outcome::Kept)
                }
            }
        })
    }
}

/// Build the action a strategy asks for, operating on files in `dir`
pub fn action_from_config<'a>(
    action: StrategyAction,
    dir: &Path,
    fs: &'a dyn Filesystem,
    pretend: bool,
) -> Box<dyn Performer + 'a> {
    match action {
        StrategyAction::Delete => Box::new(DeleteAction::new(dir, fs, pretend)),
        StrategyAction::Zip => Box::new(ZipAction::new(dir, fs, pretend)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::mock::{days, file, test_path, MockFilesystem, TEST_PATH};

    fn names(files: &[FileEntry]) -> Vec<&str> {
        files.iter().map(|f| f.name.as_str()).collect()
    }

    fn bigger_than_10(file: &FileEntry) -> bool {
        file.size > 10
    }

    fn sample() -> Vec<FileEntry> {
        vec![
            file("a.log", 20, days(1)),
            file("b.log", 5, days(1)),
            file("c.log", 30, days(1)),
            file("d.log", 40, days(1)),
        ]
    }

    // ============ delete tests ============

    #[test]
    fn test_delete_removes_consecutive_matches() {
        let fs = MockFilesystem::with_files(sample());
        let action = DeleteAction::new(TEST_PATH, &fs, false);

        let remaining = action.perform(sample(), &bigger_than_10).unwrap();

        assert_eq!(names(&remaining), vec!["b.log"]);
        assert_eq!(
            fs.removed(),
            vec![test_path("a.log"), test_path("c.log"), test_path("d.log")]
        );
    }

    #[test]
    fn test_delete_failure_keeps_file_and_continues() {
        let mut fs = MockFilesystem::with_files(sample());
        fs.fail_remove = vec![test_path("a.log")];
        let action = DeleteAction::new(TEST_PATH, &fs, false);

        let remaining = action.perform(sample(), &bigger_than_10).unwrap();

        assert_eq!(names(&remaining), vec!["a.log", "b.log"]);
        assert_eq!(fs.removed(), vec![test_path("c.log"), test_path("d.log")]);
    }

    #[test]
    fn test_delete_pretend_touches_nothing() {
        let fs = MockFilesystem::with_files(sample());
        let action = DeleteAction::new(TEST_PATH, &fs, true);

        let remaining = action.perform(sample(), &bigger_than_10).unwrap();

        assert_eq!(names(&remaining), vec!["a.log", "b.log", "c.log", "d.log"]);
        assert!(fs.removed().is_empty());
    }

    #[test]
    fn test_delete_empty_set() {
        let fs = MockFilesystem::default();
        let action = DeleteAction::new(TEST_PATH, &fs, false);
        assert!(action.perform(Vec::new(), &bigger_than_10).unwrap().is_empty());
    }

    // ============ zip tests ============

    #[test]
    fn test_zip_creates_archive_and_removes_original() {
        let files = vec![file("filename.extension", 20, days(1))];
        let fs = MockFilesystem::with_files(files.clone());
        let action = ZipAction::new(TEST_PATH, &fs, false);

        let remaining = action.perform(files, &bigger_than_10).unwrap();

        assert!(remaining.is_empty());
        assert_eq!(fs.created(), vec![test_path("filename.extension.zip")]);
        assert_eq!(fs.removed(), vec![test_path("filename.extension")]);
    }

    #[test]
    fn test_zip_skips_non_matching() {
        let fs = MockFilesystem::with_files(sample());
        let action = ZipAction::new(TEST_PATH, &fs, false);

        let remaining = action.perform(sample(), &|f| f.name == "c.log").unwrap();

        assert_eq!(names(&remaining), vec!["a.log", "b.log", "d.log"]);
        assert_eq!(fs.created(), vec![test_path("c.log.zip")]);
    }

    #[test]
    fn test_zip_create_failure_aborts() {
        let mut fs = MockFilesystem::with_files(sample());
        fs.fail_create = true;
        let action = ZipAction::new(TEST_PATH, &fs, false);

        let err = action.perform(sample(), &bigger_than_10).unwrap_err();

        match err {
            ScrubError::Archive { path, .. } => assert_eq!(path, test_path("a.log.zip")),
            other => panic!("expected archive error, got {:?}", other),
        }
        // Nothing was removed, not even later matches
        assert!(fs.removed().is_empty());
    }

    #[test]
    fn test_zip_remove_failure_keeps_file() {
        let mut fs = MockFilesystem::with_files(sample());
        fs.fail_remove = vec![test_path("a.log")];
        let action = ZipAction::new(TEST_PATH, &fs, false);

        let remaining = action.perform(sample(), &bigger_than_10).unwrap();

        assert_eq!(names(&remaining), vec!["a.log", "b.log"]);
        // The archive exists even though the original could not be removed
        assert_eq!(
            fs.created(),
            vec![
                test_path("a.log.zip"),
                test_path("c.log.zip"),
                test_path("d.log.zip")
            ]
        );
    }

    #[test]
    fn test_zip_pretend_touches_nothing() {
        let fs = MockFilesystem::with_files(sample());
        let action = ZipAction::new(TEST_PATH, &fs, true);

        let remaining = action.perform(sample(), &bigger_than_10).unwrap();

        assert_eq!(remaining.len(), 4);
        assert!(fs.created().is_empty());
        assert!(fs.removed().is_empty());
    }

    // ============ factory tests ============

    #[test]
    fn test_action_from_config() {
        let fs = MockFilesystem::with_files(sample());

        let delete = action_from_config(StrategyAction::Delete, Path::new(TEST_PATH), &fs, false);
        delete.perform(sample(), &|f| f.name == "a.log").unwrap();
        assert_eq!(fs.removed(), vec![test_path("a.log")]);
        assert!(fs.created().is_empty());

        let zip = action_from_config(StrategyAction::Zip, Path::new(TEST_PATH), &fs, false);
        zip.perform(sample(), &|f| f.name == "b.log").unwrap();
        assert_eq!(fs.created(), vec![test_path("b.log.zip")]);
    }
}
