//! Audio mixer constants generator
//!
//! Mixer assets are YAML-like text. Exposed parameters appear as
//! `- guid: <id>` / `name: <param>` pairs and every group, snapshot and
//! effect carries an `m_Name:` line. One nested class is emitted per mixer
//! file.

use super::{class_name_or_default, Build, GeneratedClass, Generator, GeneratorKind, SkipReason};
use crate::config::{self, Config};
use crate::error::{ConstGenError, Result};
use crate::ident::escape_identifier;
use crate::scan::{self, ExtensionFilter, ScanOptions};
use crate::tree::ClassNode;
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};

/// Mixer asset extension
pub const MIXER_EXTENSION: &str = "mixer";

pub const DEFAULT_CLASS_NAME: &str = "AudioResources";

/// Exposed parameter entry; capture 1 is the parameter name
pub const EXPOSED_PARAMETER_PATTERN: &str = r"- guid:\s*\w+\s*name:\s*(\w+)";

/// Line marker for object names
pub const NAME_KEY: &str = "m_Name:";

/// Prefix of internal names that are not groups
pub const INTERNAL_PREFIX: &str = "m_";

/// Prefix for group constant names
pub const GROUP_CONSTANT_PREFIX: &str = "Group_";

/// Namespaces imported by the generated file
pub const USINGS: [&str; 2] = ["UnityEngine", "UnityEngine.Audio"];

/// Names pulled from one mixer file, in file order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MixerContents {
    pub parameters: Vec<String>,
    pub groups: Vec<String>,
}

/// Extracts exposed parameters and group names from mixer text
#[derive(Debug, Clone)]
pub struct MixerExtractor {
    parameter_pattern: Regex,
}

impl MixerExtractor {
    pub fn new() -> Result<Self> {
        Ok(Self {
            parameter_pattern: Regex::new(EXPOSED_PARAMETER_PATTERN)?,
        })
    }

    /// Both sequences in appearance order, duplicates kept
    pub fn extract(&self, text: &str) -> MixerContents {
        MixerContents {
            parameters: self.parameters(text),
            groups: groups(text),
        }
    }

    pub fn parameters(&self, text: &str) -> Vec<String> {
        self.parameter_pattern
            .captures_iter(text)
            .filter_map(|caps| caps.get(1))
            .map(|m| m.as_str().to_string())
            .collect()
    }
}

/// Group names: the value of every `m_Name:` line that is neither empty
/// nor internal (`m_` prefixed)
pub fn groups(text: &str) -> Vec<String> {
    text.lines()
        .filter(|line| line.contains(NAME_KEY))
        .filter_map(|line| line.split(':').nth(1))
        .map(str::trim)
        .filter(|name| !name.is_empty() && !name.starts_with(INTERNAL_PREFIX))
        .map(str::to_string)
        .collect()
}

/// Comment heading the exposed parameter constants
pub const PARAMETERS_SECTION: &str = "Exposed Parameters";

/// Comment heading the group constants
pub const GROUPS_SECTION: &str = "Audio Mixer Groups";

/// Add one mixer's class under `root`.
///
/// Mixers sharing a file name merge into one class, each member landing in
/// its existing section.
pub fn add_mixer_class(root: &mut ClassNode, mixer_name: &str, contents: &MixerContents) {
    let class_name = format!("{}Mixer", escape_identifier(mixer_name));
    let node = root.get_or_add_child(&class_name);
    if !node.is_empty() {
        log::warn!(
            "Mixer class {} already generated; merging {}",
            class_name,
            mixer_name
        );
    }

    node.open_section(PARAMETERS_SECTION);
    for param in &contents.parameters {
        node.add_constant_in_section(PARAMETERS_SECTION, escape_identifier(param), param.as_str());
    }

    node.open_section(GROUPS_SECTION);
    for group in &contents.groups {
        node.add_constant_in_section(
            GROUPS_SECTION,
            format!("{}{}", GROUP_CONSTANT_PREFIX, escape_identifier(group)),
            group.as_str(),
        );
    }
}

/// Generator for the audio mixer class
#[derive(Debug, Clone)]
pub struct MixerGenerator {
    mixers_dir: PathBuf,
    output_path: PathBuf,
    class_name: String,
    extractor: MixerExtractor,
}

impl MixerGenerator {
    pub fn new(mixers_dir: impl Into<PathBuf>, output_path: impl Into<PathBuf>) -> Result<Self> {
        Ok(Self {
            mixers_dir: mixers_dir.into(),
            output_path: output_path.into(),
            class_name: DEFAULT_CLASS_NAME.to_string(),
            extractor: MixerExtractor::new()?,
        })
    }

    pub fn from_config(config: &Config, project_root: &Path) -> Result<Self> {
        let settings = &config.mixers;
        let generator = Self::new(
            config::resolve(project_root, &settings.mixers_dir),
            config::resolve(project_root, &settings.output_path),
        )?;
        Ok(generator.with_class_name(&settings.class_name))
    }

    /// Set the root class name; a blank name falls back to the default
    pub fn with_class_name(mut self, name: &str) -> Self {
        self.class_name = class_name_or_default(name, DEFAULT_CLASS_NAME);
        self
    }

    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    /// Read and extract one mixer file
    pub fn read_mixer(&self, path: &Path) -> Result<MixerContents> {
        let text = fs::read_to_string(path).map_err(|e| ConstGenError::io(path, e))?;
        let contents = self.extractor.extract(&text);
        log::debug!(
            "{}: {} exposed parameters, {} groups",
            path.display(),
            contents.parameters.len(),
            contents.groups.len()
        );
        Ok(contents)
    }
}

impl Generator for MixerGenerator {
    fn kind(&self) -> GeneratorKind {
        GeneratorKind::Mixers
    }

    fn output_path(&self) -> &Path {
        &self.output_path
    }

    fn build(&self) -> Result<Build> {
        if !self.mixers_dir.is_dir() {
            return Ok(Build::Skipped(SkipReason::ScanRootMissing {
                path: self.mixers_dir.clone(),
            }));
        }

        let options = ScanOptions {
            filter: ExtensionFilter::single(MIXER_EXTENSION),
            ..ScanOptions::default()
        };
        let files = scan::scan_files(&self.mixers_dir, &options)?;
        if files.is_empty() {
            return Ok(Build::Skipped(SkipReason::NoMatchingFiles {
                searched: vec![self.mixers_dir.clone()],
            }));
        }

        let mut root = ClassNode::new(self.class_name.as_str());
        for file in &files {
            let contents = self.read_mixer(&file.path)?;
            add_mixer_class(&mut root, &file.stem(), &contents);
        }

        Ok(Build::Ready(GeneratedClass {
            root,
            usings: USINGS.iter().map(|ns| ns.to_string()).collect(),
            file_count: files.len(),
            root_count: 1,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    const SAMPLE_MIXER: &str = "\
%YAML 1.1
--- !u!241 &24100000
AudioMixerController:
  m_ObjectHideFlags: 0
  m_Name: m_Something
  m_ExposedParameters:
  - guid: 4f1c2a9b0d3e4c55a1b2c3d4e5f60718
    name: MasterVolume
  - guid: 9a8b7c6d5e4f30211203a4b5c6d7e8f9
    name: MusicVolume
--- !u!243 &24300002
AudioMixerGroupController:
  m_Name: Master
--- !u!243 &24300004
AudioMixerGroupController:
  m_Name: Music
";

    #[test]
    fn test_extract_parameters_and_groups() {
        let extractor = MixerExtractor::new().unwrap();
        let contents = extractor.extract(SAMPLE_MIXER);
        assert_eq!(contents.parameters, vec!["MasterVolume", "MusicVolume"]);
        assert_eq!(contents.groups, vec!["Master", "Music"]);
    }

    #[test]
    fn test_groups_skip_empty_and_internal() {
        let text = "  m_Name:\n  m_Name: m_Hidden\n  m_Name:   SFX  \n";
        assert_eq!(groups(text), vec!["SFX"]);
    }

    #[test]
    fn test_duplicates_pass_through_extraction() {
        let text = "m_Name: Music\nm_Name: Music\n";
        assert_eq!(groups(text), vec!["Music", "Music"]);
    }

    #[test]
    fn test_no_matches_yield_empty() {
        let extractor = MixerExtractor::new().unwrap();
        assert_eq!(extractor.extract("garbage"), MixerContents::default());
    }

    #[test]
    fn test_add_mixer_class_layout() {
        let mut root = ClassNode::new("AudioResources");
        let contents = MixerContents {
            parameters: vec!["MasterVolume".to_string()],
            groups: vec!["Music".to_string(), "Music".to_string()],
        };
        add_mixer_class(&mut root, "Main", &contents);

        let node = root.child("MainMixer").unwrap();
        assert_eq!(node.constant("MasterVolume"), Some("MasterVolume"));
        assert_eq!(node.constant("Group_Music"), Some("Music"));
        // the repeated group collapses into one declaration
        assert_eq!(node.constant_count(), 2);
    }

    #[test]
    fn test_generate_writes_file() {
        let dir = tempdir().unwrap();
        let mixers = dir.path().join("Mixers");
        fs::create_dir_all(&mixers).unwrap();
        fs::write(mixers.join("Main.mixer"), SAMPLE_MIXER).unwrap();

        let output = dir.path().join("Generated/AudioResources.cs");
        let generator = MixerGenerator::new(&mixers, &output).unwrap();
        let outcome = generator.generate().unwrap();
        assert!(outcome.is_written());

        let text = fs::read_to_string(&output).unwrap();
        let expected = "\
using UnityEngine;
using UnityEngine.Audio;

// This file is auto-generated. Do not modify manually.

public static class AudioResources
{
    public static class MainMixer
    {
        // Exposed Parameters
        public const string MasterVolume = \"MasterVolume\";
        public const string MusicVolume = \"MusicVolume\";
        // Audio Mixer Groups
        public const string Group_Master = \"Master\";
        public const string Group_Music = \"Music\";
    }
}
";
        assert_eq!(text, expected);
    }

    #[test]
    fn test_same_named_mixers_share_sections() {
        let dir = tempdir().unwrap();
        let mixers = dir.path().join("Mixers");
        fs::create_dir_all(mixers.join("Alt")).unwrap();
        fs::write(
            mixers.join("Main.mixer"),
            "- guid: aa11\n  name: Vol\nm_Name: Sfx\n",
        )
        .unwrap();
        fs::write(
            mixers.join("Alt/Main.mixer"),
            "- guid: bb22\n  name: Pitch\nm_Name: Music\n",
        )
        .unwrap();

        let output = dir.path().join("AudioResources.cs");
        let generator = MixerGenerator::new(&mixers, &output).unwrap();
        let text = generator.preview().unwrap().unwrap();
        let expected_body = "    public static class MainMixer
    {
        // Exposed Parameters
        public const string Pitch = \"Pitch\";
        public const string Vol = \"Vol\";
        // Audio Mixer Groups
        public const string Group_Music = \"Music\";
        public const string Group_Sfx = \"Sfx\";
    }
";
        assert!(text.contains(expected_body), "got:\n{}", text);
        assert_eq!(text.matches("// Exposed Parameters").count(), 1);
    }

    #[test]
    fn test_no_mixer_files_skipped() {
        let dir = tempdir().unwrap();
        let generator = MixerGenerator::new(dir.path(), dir.path().join("out.cs")).unwrap();
        assert!(!generator.generate().unwrap().is_written());
        assert!(!dir.path().join("out.cs").exists());
    }
}
