//! # asset-constgen
//!
//! Generates C# classes of string constants that mirror a game project's
//! assets, so scripts can refer to resources, scenes and audio mixer
//! parameters through compile-checked identifiers instead of raw strings.
//!
//! Three generators are provided:
//!
//! - [`generators::ResourcesGenerator`]: nested classes mirroring every
//!   `Resources` folder, one constant per file holding its load key.
//! - [`generators::SceneGenerator`]: a flat class of scene names.
//! - [`generators::MixerGenerator`]: one class per audio mixer with its
//!   exposed parameters and groups.
//!
//! ## Example
//!
//! ```rust,no_run
//! use asset_constgen::prelude::*;
//!
//! let generator = ResourcesGenerator::new("Assets", "Assets/Generated/ResourcesKeys.cs")
//!     .with_filter(ExtensionFilter::parse("*.prefab,*.png"))
//!     .with_class_name("ResourcesConstants");
//!
//! match generator.generate()? {
//!     Outcome::Written(report) => println!("{} constants", report.constant_count),
//!     Outcome::Skipped(reason) => println!("skipped: {}", reason),
//! }
//! # Ok::<(), asset_constgen::error::ConstGenError>(())
//! ```

pub mod config;
pub mod error;
pub mod generators;
pub mod ident;
pub mod render;
pub mod scan;
pub mod tree;
pub mod watch;

pub mod prelude {
    //! Commonly used types and traits
    pub use crate::config::Config;
    pub use crate::error::{ConstGenError, Result};
    pub use crate::generators::{
        GenerationReport, Generator, GeneratorKind, MixerGenerator, Outcome, ResourcesGenerator,
        SceneGenerator, SkipReason,
    };
    pub use crate::ident::{escape_identifier, sanitize_identifier};
    pub use crate::scan::ExtensionFilter;
    pub use crate::tree::ClassNode;
}
