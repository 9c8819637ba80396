//! Update resolution for an application auto-updater
//!
//! Given the running build, the user's channel subscription and a catalog of
//! published channels, decides which build to offer and which patch (if any)
//! upgrades the installation to it.
//!
//! ```no_run
//! use update_resolver::catalog::Catalog;
//! use update_resolver::update::{ChannelStatus, Platform, UpdateSettings, resolve};
//! use update_resolver::BuildNumber;
//!
//! # fn main() -> anyhow::Result<()> {
//! let catalog = Catalog::from_json(&std::fs::read_to_string("updates.json")?)?;
//! let settings = UpdateSettings::new(ChannelStatus::Eap);
//!
//! let result = resolve("IU-145.258", &settings, &catalog);
//! if let Some(build) = result.new_build() {
//!     let from = BuildNumber::parse("IU-145.258")?;
//!     let patch = result.find_patch_for_build(&from, &Platform::current());
//!     println!("{} (patch: {})", build.number, patch.is_some());
//! }
//! # Ok(())
//! # }
//! ```

pub mod app;
pub mod build;
pub mod catalog;
pub mod config;
pub mod logging;
pub mod update;

pub use build::BuildNumber;
