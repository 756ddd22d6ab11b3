//! Regeneration on file changes
//!
//! [`RegenerationCoordinator`] decides which generators a change concerns
//! and holds at most one pending run per generator until the debounce
//! interval has passed. The `watch` feature adds [`AssetWatcher`] and
//! [`run`], which feed it from a `notify` watcher.

use crate::config::Config;
use crate::generators::GeneratorKind;
use crate::scan::{self, META_EXTENSION};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

#[cfg(feature = "watch")]
use crate::error::{ConstGenError, Result};
#[cfg(feature = "watch")]
use crate::generators::{self, Outcome};
#[cfg(feature = "watch")]
use notify::event::{ModifyKind, RenameMode};
#[cfg(feature = "watch")]
use notify::{Event, EventKind, RecursiveMode, Watcher};
#[cfg(feature = "watch")]
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};

/// Paths containing this are generator output and never trigger a run
pub const GENERATED_MARKER: &str = "Generated";

/// Type of file change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileChangeKind {
    Added,
    Modified,
    Removed,
}

/// A file change event
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileChange {
    pub path: PathBuf,
    pub kind: FileChangeKind,
}

impl FileChange {
    pub fn new(path: impl Into<PathBuf>, kind: FileChangeKind) -> Self {
        Self {
            path: path.into(),
            kind,
        }
    }
}

fn extension_of(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase()
}

/// True for a non-meta, non-generated path inside a `Resources` folder
pub fn is_resource_change(path: &Path) -> bool {
    extension_of(path) != META_EXTENSION
        && !path.to_string_lossy().contains(GENERATED_MARKER)
        && scan::has_path_segment(path, crate::generators::resources::RESOURCES_FOLDER)
}

/// Generators whose output may be affected by `path`
pub fn classify_change(path: &Path) -> Vec<GeneratorKind> {
    let mut kinds = Vec::new();
    if is_resource_change(path) {
        kinds.push(GeneratorKind::Resources);
    }
    match extension_of(path).as_str() {
        crate::generators::scenes::SCENE_EXTENSION => kinds.push(GeneratorKind::Scenes),
        crate::generators::mixer::MIXER_EXTENSION => kinds.push(GeneratorKind::Mixers),
        _ => {}
    }
    kinds
}

/// Tracks which generators need to run after file changes
#[derive(Debug, Clone)]
pub struct RegenerationCoordinator {
    enabled: BTreeSet<GeneratorKind>,
    pending: BTreeSet<GeneratorKind>,
    ignored: Vec<PathBuf>,
    last_event: Option<Instant>,
    debounce: Duration,
    notify_on_file_add: bool,
}

impl RegenerationCoordinator {
    pub fn new(debounce: Duration) -> Self {
        Self {
            enabled: BTreeSet::new(),
            pending: BTreeSet::new(),
            ignored: Vec::new(),
            last_event: None,
            debounce,
            notify_on_file_add: false,
        }
    }

    /// Enable the generators whose `auto_generate_on_change` is set and
    /// ignore their own output files
    pub fn from_config(config: &Config, project_root: &Path) -> Self {
        let mut coordinator = Self::new(Duration::from_millis(config.watch.debounce_ms));
        coordinator.notify_on_file_add = config.resources.notify_on_file_add;

        let flags = [
            (
                GeneratorKind::Resources,
                config.resources.auto_generate_on_change,
                &config.resources.output_path,
            ),
            (
                GeneratorKind::Scenes,
                config.scenes.auto_generate_on_change,
                &config.scenes.output_path,
            ),
            (
                GeneratorKind::Mixers,
                config.mixers.auto_generate_on_change,
                &config.mixers.output_path,
            ),
        ];
        for (kind, enabled, output) in flags {
            if enabled {
                coordinator.enable(kind);
            }
            coordinator.ignore(crate::config::resolve(project_root, output));
        }
        coordinator
    }

    pub fn enable(&mut self, kind: GeneratorKind) {
        self.enabled.insert(kind);
    }

    pub fn is_enabled(&self, kind: GeneratorKind) -> bool {
        self.enabled.contains(&kind)
    }

    pub fn enabled(&self) -> impl Iterator<Item = GeneratorKind> + '_ {
        self.enabled.iter().copied()
    }

    pub fn set_notify_on_file_add(&mut self, notify: bool) {
        self.notify_on_file_add = notify;
    }

    /// Never react to changes of this path
    pub fn ignore(&mut self, path: PathBuf) {
        self.ignored.push(path);
    }

    fn is_ignored(&self, path: &Path) -> bool {
        self.ignored.iter().any(|p| p == path)
    }

    /// Whether an added file should be reported to the user
    pub fn should_announce(&self, change: &FileChange) -> bool {
        self.notify_on_file_add
            && change.kind == FileChangeKind::Added
            && !self.is_ignored(&change.path)
            && is_resource_change(&change.path)
    }

    /// Queue a run. Returns `false` when one is already pending.
    pub fn schedule(&mut self, kind: GeneratorKind, now: Instant) -> bool {
        self.last_event = Some(now);
        self.pending.insert(kind)
    }

    pub fn is_pending(&self, kind: GeneratorKind) -> bool {
        self.pending.contains(&kind)
    }

    /// Record a change; returns the generators newly scheduled by it
    pub fn record(&mut self, change: &FileChange, now: Instant) -> Vec<GeneratorKind> {
        if self.is_ignored(&change.path) {
            return Vec::new();
        }

        let mut scheduled = Vec::new();
        for kind in classify_change(&change.path) {
            if !self.is_enabled(kind) {
                continue;
            }
            if self.schedule(kind, now) {
                log::debug!("Scheduled {} regeneration ({})", kind, change.path.display());
                scheduled.push(kind);
            }
        }
        scheduled
    }

    /// Time left until pending runs are due, `None` when nothing is pending
    pub fn time_until_due(&self, now: Instant) -> Option<Duration> {
        if self.pending.is_empty() {
            return None;
        }
        let last = self.last_event?;
        Some(self.debounce.saturating_sub(now.saturating_duration_since(last)))
    }

    /// Take the pending runs once the debounce interval has elapsed
    pub fn take_due(&mut self, now: Instant) -> Vec<GeneratorKind> {
        match self.time_until_due(now) {
            Some(left) if left.is_zero() => std::mem::take(&mut self.pending).into_iter().collect(),
            _ => Vec::new(),
        }
    }
}

/// Convert a `notify` event into file changes
#[cfg(feature = "watch")]
pub fn changes_from_event(event: Event) -> Vec<FileChange> {
    let kind = match event.kind {
        EventKind::Create(_) => FileChangeKind::Added,
        EventKind::Remove(_) => FileChangeKind::Removed,
        EventKind::Modify(ModifyKind::Name(RenameMode::To)) => FileChangeKind::Added,
        EventKind::Modify(ModifyKind::Name(RenameMode::From)) => FileChangeKind::Removed,
        EventKind::Modify(ModifyKind::Name(RenameMode::Both)) => {
            let mut paths = event.paths.into_iter();
            return paths
                .next()
                .map(|from| FileChange::new(from, FileChangeKind::Removed))
                .into_iter()
                .chain(paths.map(|to| FileChange::new(to, FileChangeKind::Added)))
                .collect();
        }
        EventKind::Modify(_) => FileChangeKind::Modified,
        _ => return Vec::new(),
    };
    event
        .paths
        .into_iter()
        .map(|path| FileChange::new(path, kind))
        .collect()
}

/// Recursive watcher over the assets folder
#[cfg(feature = "watch")]
pub struct AssetWatcher {
    _watcher: notify::RecommendedWatcher,
    rx: Receiver<notify::Result<Event>>,
    root: PathBuf,
}

#[cfg(feature = "watch")]
impl AssetWatcher {
    pub fn new(root: &Path) -> Result<Self> {
        if !root.is_dir() {
            return Err(ConstGenError::Watch(format!(
                "watch folder not found: {}",
                root.display()
            )));
        }

        let (tx, rx) = mpsc::channel();
        let mut watcher = notify::recommended_watcher(move |res: notify::Result<Event>| {
            let _ = tx.send(res);
        })
        .map_err(|e| ConstGenError::Watch(format!("failed to create file watcher: {}", e)))?;

        watcher
            .watch(root, RecursiveMode::Recursive)
            .map_err(|e| ConstGenError::Watch(format!("failed to watch {}: {}", root.display(), e)))?;

        log::info!("Watching directory: {}", root.display());
        Ok(Self {
            _watcher: watcher,
            rx,
            root: root.to_path_buf(),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Wait up to `timeout` for changes, then drain whatever else is queued
    pub fn wait(&self, timeout: Duration) -> Result<Vec<FileChange>> {
        let first = match self.rx.recv_timeout(timeout) {
            Ok(res) => res,
            Err(RecvTimeoutError::Timeout) => return Ok(Vec::new()),
            Err(RecvTimeoutError::Disconnected) => {
                return Err(ConstGenError::Watch("file watcher disconnected".to_string()))
            }
        };

        let mut changes = Vec::new();
        for res in std::iter::once(first).chain(self.rx.try_iter()) {
            match res {
                Ok(event) => changes.extend(changes_from_event(event)),
                Err(e) => log::warn!("File watcher error: {}", e),
            }
        }
        Ok(changes)
    }
}

/// Callbacks for [`run`]
#[cfg(feature = "watch")]
pub trait WatchObserver {
    /// A file was added to a resources folder
    fn file_added(&mut self, _path: &Path) {}

    /// A generator ran
    fn regenerated(&mut self, kind: GeneratorKind, outcome: &Result<Outcome>);
}

/// Idle poll interval while nothing is pending
#[cfg(feature = "watch")]
pub const IDLE_POLL: Duration = Duration::from_millis(250);

/// Watch the assets folder and regenerate until the watcher fails
#[cfg(feature = "watch")]
pub fn run(config: &Config, project_root: &Path, observer: &mut dyn WatchObserver) -> Result<()> {
    let assets_root = crate::config::resolve(project_root, &config.assets_dir);
    let watcher = AssetWatcher::new(&assets_root)?;
    let mut coordinator = RegenerationCoordinator::from_config(config, project_root);

    if coordinator.enabled().next().is_none() {
        log::warn!("No generator has auto_generate_on_change enabled; only reporting changes");
    }

    loop {
        let timeout = coordinator
            .time_until_due(Instant::now())
            .unwrap_or(IDLE_POLL)
            .max(Duration::from_millis(1));

        for change in watcher.wait(timeout)? {
            if coordinator.should_announce(&change) {
                log::info!("Asset added in Resources: {}", change.path.display());
                observer.file_added(&change.path);
            }
            coordinator.record(&change, Instant::now());
        }

        for kind in coordinator.take_due(Instant::now()) {
            log::info!("Changes detected, regenerating {}", kind);
            let outcome = generators::from_config(kind, config, project_root)
                .and_then(|generator| generator.generate());
            if let Err(e) = &outcome {
                log::error!("[{}] regeneration failed: {}", kind, e);
            }
            observer.regenerated(kind, &outcome);
        }
    }
}
