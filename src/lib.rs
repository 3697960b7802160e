//! dirsort - sort the files of a directory into category folders
//!
//! This library maps file extensions to categories from a JSON configuration,
//! moves each file of a directory into its category folder with collision-safe
//! renaming, and can preview the result with a dry run.

pub mod cli;
pub mod config;
pub mod file_category;
pub mod file_organizer;
pub mod logging;
pub mod output;

pub use config::{CategoryMap, ConfigError};
pub use file_category::{DEFAULT_CATEGORY, ExtensionIndex};
pub use file_organizer::{
    FileOrganizer, MoveRecord, MoveStatus, OrganizeError, OrganizeReport, ProtectedNames,
    resolve_collision,
};
pub use logging::{LogConfig, Logger};

pub use cli::{Cli, run};
