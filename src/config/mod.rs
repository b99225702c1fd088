//! Configuration model for one generator run.
//!
//! This module holds every user decision: project paths, backend choice,
//! per-backend options and Linux packaging options. Values enter through
//! [`ConfigurationBuilder`] after passing the [`crate::validate`] checks and
//! are read-only from then on.

mod arch;
mod backend;
mod builder;
mod bundler;
mod core;
mod linux;
mod native;
mod platform;

pub use arch::Arch;
pub use backend::{Backend, CompilerToolchain};
pub use builder::{ConfigurationBuilder, DEFAULT_PACKAGE_SCRIPT_NAME, DEFAULT_SCRIPT_NAME};
pub use bundler::{BundlerSettings, DataMapping, UpxDir};
pub use core::Configuration;
pub use linux::{DefaultDependencies, LinuxPackageSettings, PackageFormat, PackagingTool};
pub use native::{DEFAULT_JOBS, NativeSettings};
pub use platform::TargetPlatform;
