//! asset-constgen CLI - generate C# constant classes from game assets
//!
//! ## Example Usage
//!
//! ```bash
//! # Resource keys for every Resources folder, prefabs and textures only
//! asset-constgen resources --extensions "*.prefab,*.png"
//!
//! # Scene names, printed instead of written
//! asset-constgen scenes --dry-run
//!
//! # Everything, with a JSON summary
//! asset-constgen -p ~/Projects/MyGame all --report gen.json
//!
//! # Regenerate whenever assets change
//! asset-constgen watch
//! ```

use anyhow::Context;
use asset_constgen::config::{Config, PROJECT_CONFIG_FILE};
use asset_constgen::error::Result as GenResult;
use asset_constgen::generators::{self, GeneratorKind, Outcome};
use clap::{Parser, Subcommand};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::fs;
use std::path::{Path, PathBuf};
use std::process;

/// asset-constgen: compile-checked asset names for game projects
#[derive(Parser)]
#[command(name = "asset-constgen")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(author = "Robert Fall")]
#[command(about = "Generate C# string-constant classes from game asset folders", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Project root that configured paths are relative to
    #[arg(short = 'p', long, global = true, default_value = ".")]
    project: PathBuf,

    /// Print generated code instead of writing it
    #[arg(long, global = true)]
    dry_run: bool,

    /// Write a JSON summary of the run to this file
    #[arg(long, global = true)]
    report: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate resource load keys from every Resources folder
    Resources {
        /// Output file
        #[arg(short = 'o', long)]
        output: Option<PathBuf>,

        /// Comma-separated extension filter (e.g. "*.prefab,*.asset")
        #[arg(short = 'e', long)]
        extensions: Option<String>,

        /// Root class name
        #[arg(short = 'n', long)]
        class_name: Option<String>,

        /// Only scan the top level of each Resources folder
        #[arg(long)]
        no_subfolders: bool,
    },

    /// Generate scene name constants
    Scenes {
        /// Output file
        #[arg(short = 'o', long)]
        output: Option<PathBuf>,

        /// Folder containing scene files
        #[arg(short = 'd', long)]
        scenes_dir: Option<PathBuf>,

        /// Class name
        #[arg(short = 'n', long)]
        class_name: Option<String>,
    },

    /// Generate audio mixer parameter and group constants
    Mixers {
        /// Output file
        #[arg(short = 'o', long)]
        output: Option<PathBuf>,

        /// Folder containing mixer files
        #[arg(short = 'd', long)]
        mixers_dir: Option<PathBuf>,

        /// Root class name
        #[arg(short = 'n', long)]
        class_name: Option<String>,
    },

    /// Run every generator
    All,

    /// Watch the assets folder and regenerate on change
    Watch {
        /// Quiet period before regenerating, in milliseconds
        #[arg(long)]
        debounce_ms: Option<u64>,

        /// Regenerate everything on change, ignoring the config flags
        #[arg(short = 'a', long)]
        all: bool,
    },

    /// Inspect or create the configuration file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Show the effective configuration
    Show,

    /// Write a default config file into the project
    Init {
        /// Overwrite an existing file
        #[arg(short = 'f', long)]
        force: bool,
    },
}

fn main() {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp(None)
        .init();

    if let Err(e) = run(cli) {
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        process::exit(1);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let (mut config, origin) = Config::load(cli.config.as_deref(), &cli.project)?;

    if cli.verbose {
        println!(
            "{} v{}",
            "asset-constgen".cyan().bold(),
            env!("CARGO_PKG_VERSION")
        );
        println!("Project: {}", cli.project.display().to_string().dimmed());
        match &origin {
            Some(path) => println!("Config: {}", path.display().to_string().dimmed()),
            None => println!("Config: {}", "built-in defaults".dimmed()),
        }
    }

    let kinds: Vec<GeneratorKind> = match cli.command {
        Commands::Resources {
            output,
            extensions,
            class_name,
            no_subfolders,
        } => {
            let settings = &mut config.resources;
            if let Some(output) = output {
                settings.output_path = output;
            }
            if let Some(extensions) = extensions {
                settings.file_extensions = extensions;
            }
            if let Some(class_name) = class_name {
                settings.class_name = class_name;
            }
            if no_subfolders {
                settings.include_subfolders = false;
            }
            vec![GeneratorKind::Resources]
        }

        Commands::Scenes {
            output,
            scenes_dir,
            class_name,
        } => {
            let settings = &mut config.scenes;
            if let Some(output) = output {
                settings.output_path = output;
            }
            if let Some(dir) = scenes_dir {
                settings.scenes_dir = dir;
            }
            if let Some(class_name) = class_name {
                settings.class_name = class_name;
            }
            vec![GeneratorKind::Scenes]
        }

        Commands::Mixers {
            output,
            mixers_dir,
            class_name,
        } => {
            let settings = &mut config.mixers;
            if let Some(output) = output {
                settings.output_path = output;
            }
            if let Some(dir) = mixers_dir {
                settings.mixers_dir = dir;
            }
            if let Some(class_name) = class_name {
                settings.class_name = class_name;
            }
            vec![GeneratorKind::Mixers]
        }

        Commands::All => GeneratorKind::ALL.to_vec(),

        Commands::Watch { debounce_ms, all } => {
            if let Some(ms) = debounce_ms {
                config.watch.debounce_ms = ms;
            }
            if all {
                config.resources.auto_generate_on_change = true;
                config.scenes.auto_generate_on_change = true;
                config.mixers.auto_generate_on_change = true;
            }
            return watch(&config, &cli.project);
        }

        Commands::Config { action } => {
            return handle_config_action(action, &config, origin.as_deref(), &cli.project)
        }
    };

    if cli.dry_run {
        return preview(&kinds, &config, &cli.project);
    }

    let outcomes = generate(&kinds, &config, &cli.project)?;

    if let Some(report_path) = cli.report {
        let json = serde_json::to_string_pretty(&outcomes)?;
        fs::write(&report_path, json)
            .with_context(|| format!("writing report {}", report_path.display()))?;
        println!(
            "{} Report saved to: {}",
            "✓".green().bold(),
            report_path.display()
        );
    }

    Ok(())
}

fn generate(kinds: &[GeneratorKind], config: &Config, project: &Path) -> GenResult<Vec<Outcome>> {
    let pb = if kinds.len() > 1 {
        let pb = ProgressBar::new(kinds.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{bar:30.cyan/blue}] {pos}/{len} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("#>-"),
        );
        Some(pb)
    } else {
        None
    };

    let mut outcomes = Vec::with_capacity(kinds.len());
    for &kind in kinds {
        if let Some(pb) = &pb {
            pb.set_message(format!("Generating {}...", kind));
        }

        let outcome = generators::from_config(kind, config, project)?.generate()?;
        if let Some(pb) = &pb {
            pb.suspend(|| print_outcome(kind, &outcome));
            pb.inc(1);
        } else {
            print_outcome(kind, &outcome);
        }
        outcomes.push(outcome);
    }

    if let Some(pb) = pb {
        pb.finish_and_clear();
        let written = outcomes.iter().filter(|o| o.is_written()).count();
        println!(
            "{} {} of {} generators wrote output",
            "Summary:".bold(),
            written,
            outcomes.len()
        );
    }

    Ok(outcomes)
}

fn preview(kinds: &[GeneratorKind], config: &Config, project: &Path) -> anyhow::Result<()> {
    for &kind in kinds {
        let generator = generators::from_config(kind, config, project)?;
        match generator.preview()? {
            Some(text) => {
                println!(
                    "{}",
                    format!("// ---- {} -> {}", kind, generator.output_path().display()).dimmed()
                );
                print!("{}", text);
            }
            None => println!("{} {} would be skipped", "Warning:".yellow(), kind),
        }
    }
    Ok(())
}

fn print_outcome(kind: GeneratorKind, outcome: &Outcome) {
    match outcome {
        Outcome::Written(report) => println!(
            "{} [{}] {} -> {} ({} constants)",
            "✓".green().bold(),
            kind,
            report.class_name.bright_green(),
            report.output_path.display(),
            report.constant_count
        ),
        Outcome::Skipped(reason) => println!(
            "{} [{}] skipped: {}",
            "Warning:".yellow(),
            kind,
            reason
        ),
    }
}

#[cfg(feature = "watch")]
struct ConsoleObserver;

#[cfg(feature = "watch")]
impl asset_constgen::watch::WatchObserver for ConsoleObserver {
    fn file_added(&mut self, path: &Path) {
        println!("{} {}", "New resource:".cyan(), path.display());
    }

    fn regenerated(&mut self, kind: GeneratorKind, outcome: &GenResult<Outcome>) {
        match outcome {
            Ok(outcome) => print_outcome(kind, outcome),
            Err(e) => eprintln!("{} [{}] {}", "Error:".red().bold(), kind, e),
        }
    }
}

#[cfg(feature = "watch")]
fn watch(config: &Config, project: &Path) -> anyhow::Result<()> {
    println!(
        "{} {}",
        "Watching".cyan().bold(),
        asset_constgen::config::resolve(project, &config.assets_dir).display()
    );
    println!("{}", "Press Ctrl+C to stop.".dimmed());
    asset_constgen::watch::run(config, project, &mut ConsoleObserver)?;
    Ok(())
}

#[cfg(not(feature = "watch"))]
fn watch(_config: &Config, _project: &Path) -> anyhow::Result<()> {
    anyhow::bail!("this build has no file watching; rebuild with the `watch` feature")
}

fn handle_config_action(
    action: ConfigAction,
    config: &Config,
    origin: Option<&Path>,
    project: &Path,
) -> anyhow::Result<()> {
    match action {
        ConfigAction::Show => {
            let source = origin
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "built-in defaults".to_string());
            println!("{}", format!("# source: {}", source).dimmed());
            print!("{}", config.to_toml()?);
            Ok(())
        }

        ConfigAction::Init { force } => {
            let path = project.join(PROJECT_CONFIG_FILE);
            if path.exists() && !force {
                println!(
                    "{} {} already exists. Use {} to overwrite.",
                    "Warning:".yellow(),
                    path.display(),
                    "--force".bright_yellow()
                );
                return Ok(());
            }
            Config::default().save(&path)?;
            println!(
                "{} Config written to: {}",
                "✓".green().bold(),
                path.display()
            );
            Ok(())
        }
    }
}
