/// Extension-based categorization of files.
///
/// This module turns a [`CategoryMap`] into an [`ExtensionIndex`] that maps
/// lowercase file extensions (with their leading dot) to category folder names.
/// Anything the index does not know about lands in [`DEFAULT_CATEGORY`].
///
/// # Examples
///
/// ```
/// use dirsort::config::CategoryMap;
/// use dirsort::file_category::ExtensionIndex;
///
/// let map = CategoryMap::from_pairs([("Images", vec![".jpg"]), ("Documents", vec![".txt"])])
///     .unwrap();
/// let index = ExtensionIndex::build(&map);
/// assert_eq!(index.resolve(".JPG"), "Images");
/// assert_eq!(index.resolve(".txt"), "Documents");
/// assert_eq!(index.resolve(".xyz"), "Others");
/// ```
use crate::config::CategoryMap;
use std::collections::HashMap;
use std::path::Path;

/// Folder for files whose extension matches no category.
pub const DEFAULT_CATEGORY: &str = "Others";

/// Maps normalized file extensions to category names.
///
/// The index is built once from a [`CategoryMap`] and never changes afterwards;
/// every lookup is a plain read.
#[derive(Debug, Clone, Default)]
pub struct ExtensionIndex {
    extension_map: HashMap<String, String>,
}

impl ExtensionIndex {
    /// Builds the index from a category map.
    ///
    /// Extensions are lowercased. When the same extension is listed under
    /// several categories, the category that comes first in the map keeps it.
    pub fn build(categories: &CategoryMap) -> Self {
        let mut extension_map = HashMap::new();
        for (category, extensions) in categories.iter() {
            for ext in extensions {
                extension_map
                    .entry(ext.to_lowercase())
                    .or_insert_with(|| category.to_string());
            }
        }
        Self { extension_map }
    }

    /// Returns the category for an extension such as `".png"`.
    ///
    /// The lookup is case-insensitive. An empty extension or one the index
    /// does not contain resolves to [`DEFAULT_CATEGORY`].
    ///
    /// # Examples
    ///
    /// ```
    /// use dirsort::config::CategoryMap;
    /// use dirsort::file_category::ExtensionIndex;
    ///
    /// let map = CategoryMap::from_pairs([("Images", vec![".png"])]).unwrap();
    /// let index = ExtensionIndex::build(&map);
    /// assert_eq!(index.resolve(".PnG"), "Images");
    /// assert_eq!(index.resolve(""), "Others");
    /// ```
    pub fn resolve(&self, ext: &str) -> &str {
        if ext.is_empty() {
            return DEFAULT_CATEGORY;
        }
        self.extension_map
            .get(&ext.to_lowercase())
            .map(String::as_str)
            .unwrap_or(DEFAULT_CATEGORY)
    }

    /// Number of distinct extensions known to the index.
    pub fn len(&self) -> usize {
        self.extension_map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.extension_map.is_empty()
    }
}

/// Returns the lowercase extension of a file name, including the leading dot.
///
/// Names without an extension, dot-files such as `.bashrc`, and names ending
/// in a bare dot all yield an empty string.
///
/// ```
/// use dirsort::file_category::extension_of;
/// use std::path::Path;
///
/// assert_eq!(extension_of(Path::new("photo.JPG")), ".jpg");
/// assert_eq!(extension_of(Path::new("backup.tar.gz")), ".gz");
/// assert_eq!(extension_of(Path::new("README")), "");
/// assert_eq!(extension_of(Path::new(".bashrc")), "");
/// ```
pub fn extension_of(path: &Path) -> String {
    match path.extension() {
        Some(ext) if !ext.is_empty() => format!(".{}", ext.to_string_lossy().to_lowercase()),
        _ => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn index_for(pairs: Vec<(&str, Vec<&str>)>) -> ExtensionIndex {
        ExtensionIndex::build(&CategoryMap::from_pairs(pairs).unwrap())
    }

    #[test]
    fn test_resolve_known_extensions() {
        let index = index_for(vec![
            ("Images", vec![".jpg", ".png"]),
            ("Documents", vec![".pdf", ".txt"]),
        ]);
        assert_eq!(index.resolve(".jpg"), "Images");
        assert_eq!(index.resolve(".png"), "Images");
        assert_eq!(index.resolve(".pdf"), "Documents");
    }

    #[test]
    fn test_resolve_case_insensitive() {
        let index = index_for(vec![("Images", vec![".JPG"]), ("Documents", vec![".txt"])]);
        assert_eq!(index.resolve(".jpg"), "Images");
        assert_eq!(index.resolve(".Jpg"), "Images");
        assert_eq!(index.resolve(".TXT"), "Documents");
    }

    #[test]
    fn test_resolve_unknown_defaults_to_others() {
        let index = index_for(vec![("Images", vec![".jpg"])]);
        assert_eq!(index.resolve(".xyz"), DEFAULT_CATEGORY);
        assert_eq!(index.resolve("jpg"), DEFAULT_CATEGORY);
    }

    #[test]
    fn test_resolve_empty_extension() {
        let index = index_for(vec![("Blank", vec![""])]);
        assert_eq!(index.resolve(""), DEFAULT_CATEGORY);
    }

    #[test]
    fn test_first_category_wins() {
        let index = index_for(vec![("Code", vec![".json"]), ("Data", vec![".JSON", ".csv"])]);
        assert_eq!(index.resolve(".json"), "Code");
        assert_eq!(index.resolve(".csv"), "Data");
        assert_eq!(index.len(), 2);
    }

    #[test]
    fn test_empty_map_builds_empty_index() {
        let index = ExtensionIndex::build(&CategoryMap::default());
        assert!(index.is_empty());
        assert_eq!(index.resolve(".jpg"), DEFAULT_CATEGORY);
    }

    #[test]
    fn test_extension_of() {
        assert_eq!(extension_of(Path::new("photo.JPG")), ".jpg");
        assert_eq!(extension_of(Path::new("notes.txt")), ".txt");
        assert_eq!(extension_of(Path::new("archive.tar.gz")), ".gz");
        assert_eq!(extension_of(Path::new("data")), "");
        assert_eq!(extension_of(Path::new(".env")), "");
        assert_eq!(extension_of(Path::new("trailing.")), "");
    }
}
