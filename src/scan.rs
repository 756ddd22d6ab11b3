//! Asset discovery on disk

use crate::error::Result;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Metadata sidecar extension, never treated as an asset
pub const META_EXTENSION: &str = "meta";

/// A file found under a scan root
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetEntry {
    /// Absolute (or caller-rooted) path to the file
    pub path: PathBuf,
    /// Path relative to the scan root
    pub relative: PathBuf,
    /// Lowercase extension without the dot, empty if none
    pub extension: String,
}

impl AssetEntry {
    fn from_path(root: &Path, path: &Path) -> Self {
        let relative = path.strip_prefix(root).unwrap_or(path).to_path_buf();
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();
        Self {
            path: path.to_path_buf(),
            relative,
            extension,
        }
    }

    /// File name without its extension
    pub fn stem(&self) -> String {
        self.relative
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    /// Relative path with the extension removed and `/` separators
    pub fn key(&self) -> String {
        let without_ext = self.relative.with_extension("");
        without_ext
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/")
    }

    pub fn is_meta(&self) -> bool {
        self.extension == META_EXTENSION
    }
}

/// File extension filter, e.g. parsed from `"*.prefab, *.asset"`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtensionFilter {
    extensions: Vec<String>,
}

impl ExtensionFilter {
    /// Filter that accepts every file
    pub fn any() -> Self {
        Self::default()
    }

    /// Parse a comma-separated list. Entries are trimmed, empty ones
    /// dropped, and a leading `*` and `.` removed.
    pub fn parse(list: &str) -> Self {
        let extensions = list
            .split(',')
            .map(|ext| ext.trim().trim_start_matches('*').trim_start_matches('.'))
            .filter(|ext| !ext.is_empty())
            .map(|ext| ext.to_lowercase())
            .collect();
        Self { extensions }
    }

    pub fn single(extension: &str) -> Self {
        Self::parse(extension)
    }

    pub fn is_any(&self) -> bool {
        self.extensions.is_empty()
    }

    pub fn extensions(&self) -> &[String] {
        &self.extensions
    }

    pub fn matches(&self, entry: &AssetEntry) -> bool {
        self.is_any() || self.extensions.iter().any(|e| *e == entry.extension)
    }
}

/// Options for [`scan_files`]
#[derive(Debug, Clone)]
pub struct ScanOptions {
    pub filter: ExtensionFilter,
    pub recursive: bool,
    pub skip_meta: bool,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            filter: ExtensionFilter::any(),
            recursive: true,
            skip_meta: true,
        }
    }
}

/// List the files under `root` that pass `options`, sorted by relative path
pub fn scan_files(root: &Path, options: &ScanOptions) -> Result<Vec<AssetEntry>> {
    let mut walker = WalkDir::new(root).follow_links(false);
    if !options.recursive {
        walker = walker.max_depth(1);
    }

    let mut entries = Vec::new();
    for entry in walker {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }

        let asset = AssetEntry::from_path(root, entry.path());
        if options.skip_meta && asset.is_meta() {
            continue;
        }
        if !options.filter.matches(&asset) {
            continue;
        }
        entries.push(asset);
    }

    entries.sort_by(|a, b| a.relative.cmp(&b.relative));
    log::debug!("Scanned {}: {} matching files", root.display(), entries.len());
    Ok(entries)
}

/// Find every directory named `name` below `root` (including nested ones),
/// sorted by path
pub fn find_named_dirs(root: &Path, name: &str) -> Result<Vec<PathBuf>> {
    let mut dirs = Vec::new();
    for entry in WalkDir::new(root).follow_links(false) {
        let entry = entry?;
        if entry.file_type().is_dir() && entry.depth() > 0 && entry.file_name() == name {
            dirs.push(entry.into_path());
        }
    }
    dirs.sort();
    Ok(dirs)
}

/// True when any component of `path` equals `name`; `\` is treated as a
/// separator too
pub fn has_path_segment(path: &Path, name: &str) -> bool {
    path.to_string_lossy()
        .split(['/', '\\'])
        .any(|segment| segment == name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn touch(root: &Path, rel: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "").unwrap();
    }

    #[test]
    fn test_extension_filter_parse() {
        let filter = ExtensionFilter::parse("*.prefab, *.Asset,, .png ,jpg");
        assert_eq!(filter.extensions(), &["prefab", "asset", "png", "jpg"]);
        assert!(!filter.is_any());
        assert!(ExtensionFilter::parse(" , ").is_any());
    }

    #[test]
    fn test_scan_recursive_skips_meta() {
        let dir = tempdir().unwrap();
        touch(dir.path(), "b.prefab");
        touch(dir.path(), "b.prefab.meta");
        touch(dir.path(), "sub/a.png");

        let entries = scan_files(dir.path(), &ScanOptions::default()).unwrap();
        let keys: Vec<_> = entries.iter().map(|e| e.key()).collect();
        assert_eq!(keys, vec!["b", "sub/a"]);
    }

    #[test]
    fn test_scan_non_recursive_with_filter() {
        let dir = tempdir().unwrap();
        touch(dir.path(), "top.prefab");
        touch(dir.path(), "top.txt");
        touch(dir.path(), "nested/deep.prefab");

        let options = ScanOptions {
            filter: ExtensionFilter::parse("*.prefab"),
            recursive: false,
            skip_meta: true,
        };
        let entries = scan_files(dir.path(), &options).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].stem(), "top");
        assert_eq!(entries[0].extension, "prefab");
    }

    #[test]
    fn test_key_strips_only_last_extension() {
        let dir = tempdir().unwrap();
        touch(dir.path(), "Fx/spark.v2.asset");

        let entries = scan_files(dir.path(), &ScanOptions::default()).unwrap();
        assert_eq!(entries[0].key(), "Fx/spark.v2");
        assert_eq!(entries[0].stem(), "spark.v2");
    }

    #[test]
    fn test_find_named_dirs() {
        let dir = tempdir().unwrap();
        touch(dir.path(), "Resources/a.txt");
        touch(dir.path(), "Plugins/Vendor/Resources/b.txt");
        touch(dir.path(), "NotResources/c.txt");

        let found = find_named_dirs(dir.path(), "Resources").unwrap();
        assert_eq!(found.len(), 2);
        assert!(found.iter().all(|p| p.ends_with("Resources")));
    }

    #[test]
    fn test_has_path_segment() {
        assert!(has_path_segment(Path::new("Assets/Resources/x.png"), "Resources"));
        assert!(has_path_segment(Path::new("Assets\\Resources\\x.png"), "Resources"));
        assert!(!has_path_segment(Path::new("Assets/MyResources/x.png"), "Resources"));
    }
}
