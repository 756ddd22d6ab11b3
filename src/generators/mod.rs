//! Constant-class generators
//!
//! Every generator follows the same pipeline: enumerate files, derive
//! names, sanitize them, assemble a [`ClassNode`] tree, render it and write
//! the result. A missing scan root or an empty scan is not an error: it is
//! logged and reported as [`Outcome::Skipped`] without touching the output.

pub mod mixer;
pub mod resources;
pub mod scenes;

pub use mixer::{MixerContents, MixerExtractor, MixerGenerator};
pub use resources::ResourcesGenerator;
pub use scenes::SceneGenerator;

use crate::config::Config;
use crate::error::{ConstGenError, Result};
use crate::render::SourceFile;
use crate::tree::ClassNode;
use serde::Serialize;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

/// Which generator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum GeneratorKind {
    Resources,
    Scenes,
    Mixers,
}

impl GeneratorKind {
    pub const ALL: [GeneratorKind; 3] = [
        GeneratorKind::Resources,
        GeneratorKind::Scenes,
        GeneratorKind::Mixers,
    ];
}

impl fmt::Display for GeneratorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            GeneratorKind::Resources => "resources",
            GeneratorKind::Scenes => "scenes",
            GeneratorKind::Mixers => "mixers",
        };
        write!(f, "{}", name)
    }
}

/// Why a generator produced nothing
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum SkipReason {
    /// The directory to scan does not exist
    ScanRootMissing { path: PathBuf },
    /// No directory with the required name exists below the root
    NoScanFolders { root: PathBuf, folder_name: String },
    /// Directories exist but hold no matching files
    NoMatchingFiles { searched: Vec<PathBuf> },
}

impl SkipReason {
    /// Log at the severity the condition deserves
    pub fn log(&self, kind: GeneratorKind) {
        match self {
            SkipReason::ScanRootMissing { .. } => log::error!("[{}] {}", kind, self),
            _ => log::warn!("[{}] {}", kind, self),
        }
    }
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::ScanRootMissing { path } => {
                write!(f, "Scan folder not found at path: {}", path.display())
            }
            SkipReason::NoScanFolders { root, folder_name } => write!(
                f,
                "No {} folders found under {}",
                folder_name,
                root.display()
            ),
            SkipReason::NoMatchingFiles { searched } => write!(
                f,
                "No matching files found in {} folder(s)",
                searched.len()
            ),
        }
    }
}

/// A class tree ready to be rendered
#[derive(Debug, Clone)]
pub struct GeneratedClass {
    pub root: ClassNode,
    pub usings: Vec<String>,
    /// Files that contributed constants
    pub file_count: usize,
    /// Scan roots that were searched
    pub root_count: usize,
}

impl GeneratedClass {
    pub fn render(&self) -> String {
        self.usings
            .iter()
            .fold(SourceFile::new(&self.root), |file, ns| file.with_using(ns.as_str()))
            .render()
    }
}

/// Result of [`Generator::build`]
#[derive(Debug, Clone)]
pub enum Build {
    Ready(GeneratedClass),
    Skipped(SkipReason),
}

/// Summary of a written file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GenerationReport {
    pub kind: GeneratorKind,
    pub output_path: PathBuf,
    pub class_name: String,
    pub constant_count: usize,
    pub file_count: usize,
    pub root_count: usize,
}

/// Outcome of one generator run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Outcome {
    Written(GenerationReport),
    Skipped(SkipReason),
}

impl Outcome {
    pub fn is_written(&self) -> bool {
        matches!(self, Outcome::Written(_))
    }
}

/// A constants generator
pub trait Generator {
    fn kind(&self) -> GeneratorKind;

    /// Where the generated file goes
    fn output_path(&self) -> &Path;

    /// Scan the file system and assemble the class tree
    fn build(&self) -> Result<Build>;

    /// Render without writing; `None` when the run would be skipped
    fn preview(&self) -> Result<Option<String>> {
        match self.build()? {
            Build::Ready(class) => Ok(Some(class.render())),
            Build::Skipped(reason) => {
                reason.log(self.kind());
                Ok(None)
            }
        }
    }

    /// Build, render and write the output file
    fn generate(&self) -> Result<Outcome> {
        let class = match self.build()? {
            Build::Ready(class) => class,
            Build::Skipped(reason) => {
                reason.log(self.kind());
                return Ok(Outcome::Skipped(reason));
            }
        };

        let output_path = self.output_path();
        write_output(output_path, &class.render())?;

        let report = GenerationReport {
            kind: self.kind(),
            output_path: output_path.to_path_buf(),
            class_name: class.root.name().to_string(),
            constant_count: class.root.constant_count(),
            file_count: class.file_count,
            root_count: class.root_count,
        };
        log::info!(
            "Generated {} class at {} with {} constants from {} files in {} folder(s)",
            report.class_name,
            report.output_path.display(),
            report.constant_count,
            report.file_count,
            report.root_count
        );
        Ok(Outcome::Written(report))
    }
}

/// Write generated text, creating the parent directory when missing
pub fn write_output(path: &Path, text: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.is_dir() {
            fs::create_dir_all(parent).map_err(|e| ConstGenError::io(parent, e))?;
        }
    }
    fs::write(path, text).map_err(|e| ConstGenError::io(path, e))
}

/// Trimmed `name`, or `default` with an error logged when it is blank
pub(crate) fn class_name_or_default(name: &str, default: &str) -> String {
    let name = name.trim();
    if name.is_empty() {
        log::error!("Class name cannot be empty. Using default name: {}", default);
        default.to_string()
    } else {
        name.to_string()
    }
}

/// Construct the generator for `kind` from configuration
pub fn from_config(
    kind: GeneratorKind,
    config: &Config,
    project_root: &Path,
) -> Result<Box<dyn Generator>> {
    let generator: Box<dyn Generator> = match kind {
        GeneratorKind::Resources => Box::new(ResourcesGenerator::from_config(config, project_root)),
        GeneratorKind::Scenes => Box::new(SceneGenerator::from_config(config, project_root)),
        GeneratorKind::Mixers => Box::new(MixerGenerator::from_config(config, project_root)?),
    };
    Ok(generator)
}

/// Run several generators in order, stopping at the first hard error
pub fn run_all(
    kinds: &[GeneratorKind],
    config: &Config,
    project_root: &Path,
) -> Result<Vec<Outcome>> {
    kinds
        .iter()
        .map(|&kind| from_config(kind, config, project_root)?.generate())
        .collect()
}
