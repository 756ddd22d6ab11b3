//! Resource key tree generator
//!
//! Collects every file below each `Resources` folder of the assets root and
//! emits nested static classes mirroring the folder layout, one constant per
//! file holding its load key (relative path without extension).

use super::{class_name_or_default, Build, GeneratedClass, Generator, GeneratorKind, SkipReason};
use crate::config::{self, Config};
use crate::error::Result;
use crate::ident::sanitize_identifier;
use crate::scan::{self, ExtensionFilter, ScanOptions};
use crate::tree::ClassNode;
use hashbrown::HashSet;
use std::path::{Path, PathBuf};

/// Folder name that marks a resources root
pub const RESOURCES_FOLDER: &str = "Resources";

/// Root class name used when none (or a blank one) is configured
pub const DEFAULT_CLASS_NAME: &str = "ResourcesConstants";

/// A resource load key and the constant name it is emitted under
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ResourceKey {
    /// Path relative to its `Resources` folder, extension stripped, `/` separated
    pub path: String,
    /// Sanitized file name
    pub ident: String,
}

/// Generator for the resources key class
#[derive(Debug, Clone)]
pub struct ResourcesGenerator {
    assets_root: PathBuf,
    output_path: PathBuf,
    filter: ExtensionFilter,
    include_subfolders: bool,
    class_name: String,
}

impl ResourcesGenerator {
    pub fn new(assets_root: impl Into<PathBuf>, output_path: impl Into<PathBuf>) -> Self {
        Self {
            assets_root: assets_root.into(),
            output_path: output_path.into(),
            filter: ExtensionFilter::any(),
            include_subfolders: true,
            class_name: DEFAULT_CLASS_NAME.to_string(),
        }
    }

    pub fn from_config(config: &Config, project_root: &Path) -> Self {
        let settings = &config.resources;
        Self::new(
            config::resolve(project_root, &config.assets_dir),
            config::resolve(project_root, &settings.output_path),
        )
        .with_filter(ExtensionFilter::parse(&settings.file_extensions))
        .include_subfolders(settings.include_subfolders)
        .with_class_name(&settings.class_name)
    }

    pub fn with_filter(mut self, filter: ExtensionFilter) -> Self {
        self.filter = filter;
        self
    }

    pub fn include_subfolders(mut self, include: bool) -> Self {
        self.include_subfolders = include;
        self
    }

    /// Set the root class name; a blank name falls back to the default
    pub fn with_class_name(mut self, name: &str) -> Self {
        self.class_name = class_name_or_default(name, DEFAULT_CLASS_NAME);
        self
    }

    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    /// Keys from every resources folder, deduplicated and sorted by path
    pub fn collect_keys(&self, folders: &[PathBuf]) -> Result<Vec<ResourceKey>> {
        let options = ScanOptions {
            filter: self.filter.clone(),
            recursive: self.include_subfolders,
            skip_meta: true,
        };

        let mut keys = HashSet::new();
        for folder in folders {
            for entry in scan::scan_files(folder, &options)? {
                keys.insert(ResourceKey {
                    path: entry.key(),
                    ident: sanitize_identifier(&entry.stem()),
                });
            }
        }

        let mut keys: Vec<ResourceKey> = keys.into_iter().collect();
        keys.sort();
        Ok(keys)
    }

    /// Build the class tree from already collected keys
    pub fn build_tree(&self, keys: &[ResourceKey]) -> ClassNode {
        let mut root = ClassNode::new(self.class_name.as_str());
        for key in keys {
            root.insert_path(&key.path, &key.ident);
        }
        root
    }
}

impl Generator for ResourcesGenerator {
    fn kind(&self) -> GeneratorKind {
        GeneratorKind::Resources
    }

    fn output_path(&self) -> &Path {
        &self.output_path
    }

    fn build(&self) -> Result<Build> {
        if !self.assets_root.is_dir() {
            return Ok(Build::Skipped(SkipReason::ScanRootMissing {
                path: self.assets_root.clone(),
            }));
        }

        let folders = scan::find_named_dirs(&self.assets_root, RESOURCES_FOLDER)?;
        if folders.is_empty() {
            return Ok(Build::Skipped(SkipReason::NoScanFolders {
                root: self.assets_root.clone(),
                folder_name: RESOURCES_FOLDER.to_string(),
            }));
        }

        let keys = self.collect_keys(&folders)?;
        if keys.is_empty() {
            return Ok(Build::Skipped(SkipReason::NoMatchingFiles { searched: folders }));
        }

        log::debug!(
            "Collected {} resource keys from {} folder(s)",
            keys.len(),
            folders.len()
        );
        Ok(Build::Ready(GeneratedClass {
            root: self.build_tree(&keys),
            usings: Vec::new(),
            file_count: keys.len(),
            root_count: folders.len(),
        }))
    }
}
