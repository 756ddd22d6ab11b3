//! Scene name generator

use super::{class_name_or_default, Build, GeneratedClass, Generator, GeneratorKind, SkipReason};
use crate::config::{self, Config};
use crate::error::Result;
use crate::ident::escape_identifier;
use crate::scan::{self, ExtensionFilter, ScanOptions};
use crate::tree::ClassNode;
use std::path::{Path, PathBuf};

/// Scene file extension
pub const SCENE_EXTENSION: &str = "unity";

pub const DEFAULT_CLASS_NAME: &str = "Scenes";

/// Emits one flat class with a constant per scene file name
#[derive(Debug, Clone)]
pub struct SceneGenerator {
    scenes_dir: PathBuf,
    output_path: PathBuf,
    class_name: String,
}

impl SceneGenerator {
    pub fn new(scenes_dir: impl Into<PathBuf>, output_path: impl Into<PathBuf>) -> Self {
        Self {
            scenes_dir: scenes_dir.into(),
            output_path: output_path.into(),
            class_name: DEFAULT_CLASS_NAME.to_string(),
        }
    }

    pub fn from_config(config: &Config, project_root: &Path) -> Self {
        let settings = &config.scenes;
        Self::new(
            config::resolve(project_root, &settings.scenes_dir),
            config::resolve(project_root, &settings.output_path),
        )
        .with_class_name(&settings.class_name)
    }

    /// Set the class name; a blank name falls back to the default
    pub fn with_class_name(mut self, name: &str) -> Self {
        self.class_name = class_name_or_default(name, DEFAULT_CLASS_NAME);
        self
    }

    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    /// Scene names (file stems) found below the scenes directory, sorted
    pub fn scene_names(&self) -> Result<Vec<String>> {
        let options = ScanOptions {
            filter: ExtensionFilter::single(SCENE_EXTENSION),
            ..ScanOptions::default()
        };
        let mut names: Vec<String> = scan::scan_files(&self.scenes_dir, &options)?
            .iter()
            .map(|entry| entry.stem())
            .collect();
        names.sort();
        Ok(names)
    }
}

/// Build the flat scene class
pub fn scene_class(class_name: &str, names: &[String]) -> ClassNode {
    let mut root = ClassNode::new(class_name);
    for name in names {
        root.add_constant(escape_identifier(name), name.as_str());
    }
    root
}

impl Generator for SceneGenerator {
    fn kind(&self) -> GeneratorKind {
        GeneratorKind::Scenes
    }

    fn output_path(&self) -> &Path {
        &self.output_path
    }

    fn build(&self) -> Result<Build> {
        if !self.scenes_dir.is_dir() {
            return Ok(Build::Skipped(SkipReason::ScanRootMissing {
                path: self.scenes_dir.clone(),
            }));
        }

        let names = self.scene_names()?;
        if names.is_empty() {
            return Ok(Build::Skipped(SkipReason::NoMatchingFiles {
                searched: vec![self.scenes_dir.clone()],
            }));
        }

        Ok(Build::Ready(GeneratedClass {
            root: scene_class(&self.class_name, &names),
            usings: Vec::new(),
            file_count: names.len(),
            root_count: 1,
        }))
    }
}
