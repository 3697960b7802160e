/// File organization: sorting the entries of one directory into category folders.
///
/// This module provides the single-pass scan over a target directory, the
/// protected-name policy that keeps the tool's own files and existing category
/// folders in place, and the collision-safe naming used when a destination
/// already exists.
use crate::config::{CONFIG_FILE_NAME, CategoryMap};
use crate::file_category::{DEFAULT_CATEGORY, ExtensionIndex, extension_of};
use chrono::{DateTime, Local};
use std::collections::{BTreeMap, HashSet};
use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, error, info, warn};

/// Name of the binary, never sorted when found in the target directory.
pub const PROGRAM_NAME: &str = env!("CARGO_PKG_NAME");

/// Default name of the log file, never sorted when found in the target directory.
pub const LOG_FILE_NAME: &str = "dirsort.log";

/// Errors that can occur during file organization operations.
#[derive(Debug, Error)]
pub enum OrganizeError {
    /// The target path is missing or is not a directory.
    #[error("Target directory '{}' not found or is not a directory", .0.display())]
    TargetNotFound(PathBuf),
    /// The target directory listing could not be read.
    #[error("Could not read directory {}: {source}", path.display())]
    ReadDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    /// Failed to create a category directory.
    #[error("Could not create directory {}: {source}", path.display())]
    DirectoryCreation {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    /// Failed to move a file to its category directory.
    #[error("Could not move '{}' to '{}': {source}", from.display(), to.display())]
    Move {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Result type for file organization operations.
pub type OrganizeResult<T> = Result<T, OrganizeError>;

/// What kind of filesystem object a directory entry is, following symlinks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Directory,
    /// Anything else, including broken symlinks.
    Other,
}

impl EntryKind {
    pub fn of(path: &Path) -> Self {
        match fs::metadata(path) {
            Ok(meta) if meta.is_file() => EntryKind::File,
            Ok(meta) if meta.is_dir() => EntryKind::Directory,
            _ => EntryKind::Other,
        }
    }
}

/// Names that are never organized.
///
/// File names in this set are protected whatever the entry kind; category
/// names (including [`DEFAULT_CATEGORY`]) only protect directories.
#[derive(Debug, Clone)]
pub struct ProtectedNames {
    file_names: HashSet<String>,
    category_dirs: HashSet<String>,
}

impl ProtectedNames {
    /// Protects the program, the default config and log file names, and
    /// every category folder of `categories`.
    pub fn new(categories: &CategoryMap) -> Self {
        let file_names = [
            PROGRAM_NAME.to_string(),
            format!("{PROGRAM_NAME}.exe"),
            CONFIG_FILE_NAME.to_string(),
            LOG_FILE_NAME.to_string(),
        ]
        .into_iter()
        .collect();

        let category_dirs = categories
            .category_names()
            .chain(std::iter::once(DEFAULT_CATEGORY))
            .map(str::to_string)
            .collect();

        Self {
            file_names,
            category_dirs,
        }
    }

    /// Protects the file name of `path` if the file lives directly in `target`.
    ///
    /// Files elsewhere are ignored, so an unrelated entry of the target that
    /// happens to share the name is still organized. Both paths are
    /// canonicalized; a path that cannot be resolved protects nothing.
    pub fn with_file_in(mut self, target: &Path, path: &Path) -> Self {
        let in_target = match (path.canonicalize(), target.canonicalize()) {
            (Ok(file), Ok(dir)) => file.parent() == Some(dir.as_path()),
            _ => false,
        };
        if in_target && let Some(name) = path.file_name() {
            self.file_names.insert(name.to_string_lossy().into_owned());
        }
        self
    }

    pub fn is_protected(&self, name: &str, kind: EntryKind) -> bool {
        self.file_names.contains(name)
            || (kind == EntryKind::Directory && self.category_dirs.contains(name))
    }
}

/// Outcome of processing a single file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveStatus {
    Moved,
    WouldMove,
    /// The file stayed in place; carries the error message.
    Skipped(String),
}

/// Record of what happened to one file during a run.
#[derive(Debug, Clone)]
pub struct MoveRecord {
    /// File name in the target directory.
    pub source_name: String,
    /// Category folder the file belongs to.
    pub category: String,
    /// File name inside the category folder, after collision handling.
    pub destination_name: String,
    pub status: MoveStatus,
}

impl MoveRecord {
    /// Returns true if the file had to be renamed to avoid a collision.
    pub fn renamed(&self) -> bool {
        self.source_name != self.destination_name
    }
}

/// Summary of a complete organization run.
#[derive(Debug, Clone)]
pub struct OrganizeReport {
    pub dry_run: bool,
    pub started_at: DateTime<Local>,
    /// Files moved, or that would be moved in a dry run.
    pub moved: usize,
    /// Files left in place because of an error.
    pub skipped: usize,
    pub records: Vec<MoveRecord>,
}

impl OrganizeReport {
    fn new(dry_run: bool) -> Self {
        Self {
            dry_run,
            started_at: Local::now(),
            moved: 0,
            skipped: 0,
            records: Vec::new(),
        }
    }

    fn push(&mut self, record: MoveRecord) {
        match record.status {
            MoveStatus::Moved | MoveStatus::WouldMove => self.moved += 1,
            MoveStatus::Skipped(_) => self.skipped += 1,
        }
        self.records.push(record);
    }

    /// Number of files moved (or that would be moved) per category.
    pub fn category_counts(&self) -> BTreeMap<String, usize> {
        let mut counts = BTreeMap::new();
        for record in &self.records {
            if !matches!(record.status, MoveStatus::Skipped(_)) {
                *counts.entry(record.category.clone()).or_insert(0) += 1;
            }
        }
        counts
    }

    fn log_summary(&self) {
        info!("{}", "-".repeat(30));
        info!("Organization complete.{}", dry_run_suffix(self.dry_run));
        info!("Files processed/moved: {}", self.moved);
        info!("Files skipped (errors/protected): {}", self.skipped);
    }
}

fn dry_run_suffix(dry_run: bool) -> &'static str {
    if dry_run { " (Dry Run)" } else { "" }
}

/// Sorts the files of a directory into category subdirectories.
///
/// The organizer borrows an already built [`ExtensionIndex`] and
/// [`ProtectedNames`]; neither changes while a directory is scanned.
pub struct FileOrganizer<'a> {
    index: &'a ExtensionIndex,
    protected: &'a ProtectedNames,
    dry_run: bool,
}

impl<'a> FileOrganizer<'a> {
    pub fn new(index: &'a ExtensionIndex, protected: &'a ProtectedNames, dry_run: bool) -> Self {
        Self {
            index,
            protected,
            dry_run,
        }
    }

    /// Organizes the immediate entries of `target`.
    ///
    /// Every file that is not protected is moved into `target/<category>`,
    /// renamed with a numeric suffix if the name is taken. Subdirectories are
    /// left alone. In dry-run mode nothing on disk changes, but the report
    /// lists the destinations the files would get.
    ///
    /// # Errors
    ///
    /// Fails before touching anything if `target` is not a readable
    /// directory. Failures on individual files do not abort the run; they are
    /// counted in [`OrganizeReport::skipped`].
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use dirsort::config::CategoryMap;
    /// use dirsort::file_category::ExtensionIndex;
    /// use dirsort::file_organizer::{FileOrganizer, ProtectedNames};
    /// use std::path::Path;
    ///
    /// let map = CategoryMap::from_pairs([("Images", vec![".png"])]).unwrap();
    /// let index = ExtensionIndex::build(&map);
    /// let protected = ProtectedNames::new(&map);
    ///
    /// let report = FileOrganizer::new(&index, &protected, true)
    ///     .organize(Path::new("/path/to/downloads"))
    ///     .unwrap();
    /// println!("{} files would move", report.moved);
    /// ```
    pub fn organize(&self, target: &Path) -> OrganizeResult<OrganizeReport> {
        if !target.is_dir() {
            return Err(OrganizeError::TargetNotFound(target.to_path_buf()));
        }

        let entries = fs::read_dir(target).map_err(|source| OrganizeError::ReadDir {
            path: target.to_path_buf(),
            source,
        })?;

        info!(
            "Scanning directory: {}{}",
            target.display(),
            dry_run_suffix(self.dry_run)
        );

        let mut report = OrganizeReport::new(self.dry_run);

        for entry in entries {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!("Could not read an entry of {}: {}", target.display(), e);
                    continue;
                }
            };

            let path = entry.path();
            let name = entry.file_name().to_string_lossy().into_owned();
            let kind = EntryKind::of(&path);

            if self.protected.is_protected(&name, kind) {
                debug!("Skipping: {} (protected or category folder)", name);
                continue;
            }

            match kind {
                EntryKind::File => report.push(self.organize_file(target, &path, name)),
                EntryKind::Directory => debug!(
                    "Skipping directory: {} (sub-directory processing not implemented)",
                    name
                ),
                EntryKind::Other => {}
            }
        }

        report.log_summary();
        Ok(report)
    }

    fn organize_file(&self, target: &Path, file_path: &Path, name: String) -> MoveRecord {
        let category = self.index.resolve(&extension_of(file_path));
        let category_path = target.join(category);
        // file_name() is always present for entries returned by read_dir
        let intended = category_path.join(file_path.file_name().unwrap_or_default());

        if self.dry_run {
            let destination = resolve_collision(&intended);
            let record = MoveRecord {
                destination_name: file_name_string(&destination),
                source_name: name,
                category: category.to_string(),
                status: MoveStatus::WouldMove,
            };
            info!(
                "[DRY RUN] Would move: '{}' to '{}/{}'{}",
                record.source_name,
                category,
                record.destination_name,
                if record.renamed() { " (collision handling)" } else { "" }
            );
            return record;
        }

        let result = create_category_dir(&category_path).and_then(|()| {
            let destination = resolve_collision(&intended);
            move_file(file_path, &destination).map(|()| destination)
        });

        match result {
            Ok(destination) => {
                let destination_name = file_name_string(&destination);
                info!("Moved: '{}' to '{}/{}'", name, category, destination_name);
                MoveRecord {
                    source_name: name,
                    category: category.to_string(),
                    destination_name,
                    status: MoveStatus::Moved,
                }
            }
            Err(e) => {
                error!("{}", e);
                MoveRecord {
                    destination_name: name.clone(),
                    source_name: name,
                    category: category.to_string(),
                    status: MoveStatus::Skipped(e.to_string()),
                }
            }
        }
    }
}

/// Returns a destination path that does not exist yet.
///
/// If `path` is free it is returned unchanged. Otherwise a counter is
/// inserted before the extension, starting at 1, until a free name is found:
/// `image.png` becomes `image_1.png`, then `image_2.png`, and so on. Names
/// without an extension get the counter appended (`data_1`).
///
/// # Examples
///
/// ```no_run
/// use dirsort::file_organizer::resolve_collision;
/// use std::path::Path;
///
/// let destination = resolve_collision(Path::new("/downloads/Images/image.png"));
/// println!("moving to {}", destination.display());
/// ```
pub fn resolve_collision(path: &Path) -> PathBuf {
    if !is_occupied(path) {
        return path.to_path_buf();
    }

    let mut counter: u64 = 1;
    loop {
        let candidate = path.with_file_name(numbered_name(path, counter));
        if !is_occupied(&candidate) {
            return candidate;
        }
        counter += 1;
    }
}

// A dangling symlink still occupies its name.
fn is_occupied(path: &Path) -> bool {
    fs::symlink_metadata(path).is_ok()
}

fn numbered_name(path: &Path, counter: u64) -> OsString {
    match (path.file_stem(), path.extension()) {
        (Some(stem), Some(ext)) if !ext.is_empty() => {
            let mut name = stem.to_os_string();
            name.push(format!("_{counter}."));
            name.push(ext);
            name
        }
        _ => {
            let mut name = path.file_name().unwrap_or_default().to_os_string();
            name.push(format!("_{counter}"));
            name
        }
    }
}

fn file_name_string(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn create_category_dir(path: &Path) -> OrganizeResult<()> {
    fs::create_dir_all(path).map_err(|source| OrganizeError::DirectoryCreation {
        path: path.to_path_buf(),
        source,
    })
}

/// Moves a file, falling back to copy-and-delete across filesystems.
pub fn move_file(from: &Path, to: &Path) -> OrganizeResult<()> {
    let move_error = |source: io::Error| OrganizeError::Move {
        from: from.to_path_buf(),
        to: to.to_path_buf(),
        source,
    };

    match fs::rename(from, to) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::CrossesDevices => {
            fs::copy(from, to).map_err(move_error)?;
            if let Err(e) = fs::remove_file(from) {
                // Leave exactly one copy behind.
                if let Err(cleanup) = fs::remove_file(to) {
                    warn!(
                        "Could not remove duplicate copy {}: {}",
                        to.display(),
                        cleanup
                    );
                }
                return Err(move_error(e));
            }
            Ok(())
        }
        Err(e) => Err(move_error(e)),
    }
}
