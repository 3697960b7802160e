//! Category configuration.
//!
//! The category map is read from a JSON document that maps each category
//! folder name to the list of extensions it collects:
//!
//! ```json
//! {
//!     "Images": [".jpg", ".jpeg", ".png"],
//!     "Documents": [".pdf", ".txt"]
//! }
//! ```
//!
//! Key order is significant: when an extension is listed under more than one
//! category, the category that appears first in the document wins.

use serde::Deserialize;
use serde::de::{Deserializer, MapAccess, Visitor};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

/// Name of the category config looked up when no path is given.
pub const CONFIG_FILE_NAME: &str = "file_types.json";

/// Errors that can occur while loading the category configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// No configuration file at the given or any default location.
    #[error("Configuration file '{}' not found", .0.display())]
    NotFound(PathBuf),
    /// The configuration file exists but could not be read.
    #[error("Could not read configuration file '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The configuration file is not a JSON object of string lists.
    #[error("Could not decode JSON from '{}': {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    /// A category name cannot be used as a folder directly under the target.
    #[error("Invalid category name '{0}': must be a single, non-empty folder name")]
    InvalidCategoryName(String),
}

/// Ordered mapping from category name to the extensions it collects.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryMap {
    categories: Vec<(String, Vec<String>)>,
}

impl CategoryMap {
    /// Builds a map from `(category, extensions)` pairs, keeping their order.
    ///
    /// # Examples
    ///
    /// ```
    /// use dirsort::config::CategoryMap;
    ///
    /// let map = CategoryMap::from_pairs([("Images", vec![".png"]), ("Documents", vec![".txt"])])
    ///     .unwrap();
    /// assert_eq!(map.category_names().collect::<Vec<_>>(), ["Images", "Documents"]);
    /// ```
    pub fn from_pairs<I, C, E>(pairs: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (C, Vec<E>)>,
        C: Into<String>,
        E: Into<String>,
    {
        let mut map = Self::default();
        for (category, extensions) in pairs {
            map.insert(
                category.into(),
                extensions.into_iter().map(Into::into).collect(),
            );
        }
        map.validate()?;
        Ok(map)
    }

    /// Loads the category map using the default lookup order.
    ///
    /// 1. `config_path`, if provided
    /// 2. `file_types.json` in the current directory
    /// 3. `~/.config/dirsort/file_types.json`
    ///
    /// There is no built-in fallback; if none of these exist the result is
    /// [`ConfigError::NotFound`].
    ///
    /// Returns the map together with the path it was read from.
    pub fn load(config_path: Option<&Path>) -> Result<(Self, PathBuf), ConfigError> {
        if let Some(path) = config_path {
            return Self::load_from_file(path).map(|map| (map, path.to_path_buf()));
        }

        let local_config = PathBuf::from(CONFIG_FILE_NAME);
        if local_config.exists() {
            return Self::load_from_file(&local_config).map(|map| (map, local_config));
        }

        if let Ok(home) = std::env::var("HOME") {
            let home_config = PathBuf::from(home)
                .join(".config")
                .join("dirsort")
                .join(CONFIG_FILE_NAME);
            if home_config.exists() {
                return Self::load_from_file(&home_config).map(|map| (map, home_config));
            }
        }

        Err(ConfigError::NotFound(local_config))
    }

    /// Loads the category map from a specific file.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let map = Self::from_json(&content).map_err(|err| match err {
            ConfigError::Parse { source, .. } => ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            },
            other => other,
        })?;

        debug!(
            "Loaded {} categories from '{}'",
            map.categories.len(),
            path.display()
        );
        Ok(map)
    }

    /// Parses and validates a category map from a JSON string.
    pub fn from_json(content: &str) -> Result<Self, ConfigError> {
        let map: Self = serde_json::from_str(content).map_err(|source| ConfigError::Parse {
            path: PathBuf::new(),
            source,
        })?;
        map.validate()?;
        Ok(map)
    }

    /// Iterates categories and their extensions in document order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.categories
            .iter()
            .map(|(name, exts)| (name.as_str(), exts.as_slice()))
    }

    /// Iterates category names in document order.
    pub fn category_names(&self) -> impl Iterator<Item = &str> {
        self.categories.iter().map(|(name, _)| name.as_str())
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    // A repeated key replaces the earlier list but keeps its position.
    fn insert(&mut self, category: String, extensions: Vec<String>) {
        match self.categories.iter_mut().find(|(name, _)| *name == category) {
            Some(entry) => entry.1 = extensions,
            None => self.categories.push((category, extensions)),
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        for (name, extensions) in &self.categories {
            if !is_valid_category_name(name) {
                return Err(ConfigError::InvalidCategoryName(name.clone()));
            }
            for ext in extensions {
                if !ext.is_empty() && !ext.starts_with('.') {
                    warn!(
                        "Extension '{}' in category '{}' has no leading '.', it will never match",
                        ext, name
                    );
                }
            }
        }
        Ok(())
    }
}

fn is_valid_category_name(name: &str) -> bool {
    !name.is_empty() && name != "." && name != ".." && !name.contains(['/', '\\'])
}

impl<'de> Deserialize<'de> for CategoryMap {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct CategoryMapVisitor;

        impl<'de> Visitor<'de> for CategoryMapVisitor {
            type Value = CategoryMap;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("an object mapping category names to lists of extensions")
            }

            fn visit_map<A>(self, mut access: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut map = CategoryMap::default();
                while let Some((category, extensions)) =
                    access.next_entry::<String, Vec<String>>()?
                {
                    map.insert(category, extensions);
                }
                Ok(map)
            }
        }

        deserializer.deserialize_map(CategoryMapVisitor)
    }
}
