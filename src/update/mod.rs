//! Update decision layer
//!
//! Given the running build, the user's settings and a catalog snapshot, this
//! module decides which build (if any) to offer and which patch reaches it.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │  Settings   │────▶│  Strategy   │◀────│   Catalog   │
//! │ (tier,skip) │     │  (resolve)  │     │  (channels) │
//! └─────────────┘     └─────────────┘     └─────────────┘
//!        │                   │
//!        ▼                   ▼
//! ┌─────────────┐     ┌─────────────┐
//! │   Channel   │     │    Patch    │
//! │(eligibility)│     │  (lookup)   │
//! └─────────────┘     └─────────────┘
//! ```
//!
//! # Modules
//!
//! - [`channel`]: Channel tiers and which tiers a subscription may receive
//! - [`settings`]: User settings provider trait and plain settings value
//! - [`strategy`]: Candidate scan and selection
//! - [`patch`]: Platform-aware patch lookup
//! - [`error`]: Resolution failures

pub mod channel;
pub mod error;
pub mod patch;
pub mod settings;
pub mod strategy;

pub use channel::ChannelStatus;
pub use error::ResolveError;
pub use patch::{Platform, find_patch};
pub use settings::{UpdateSettings, UpdateSettingsProvider};
pub use strategy::{CheckForUpdateResult, UpdateState, UpdateStrategy, resolve};
