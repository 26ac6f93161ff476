//! # SocialSpark Core Library
//!
//! Client-side core of the SocialSpark relationship assistant: it keeps the
//! user's contacts in sync with the remote store and turns the server's daily
//! ranking into a short list of suggested outreach tasks ("sparks").
//!
//! ## Architecture
//!
//! - **Sync Gateway**: one HTTP transport with JSON bodies and typed
//!   status/network/decode errors
//! - **Contact Store**: local contact collection, list/create/update and
//!   device-contact import
//! - **Ranking Client**: two-phase top-N then per-contact suggestion fetch
//! - **Spark Scheduler**: ephemeral task list with optimistic completion
//! - **Storage**: TOML configuration and keyring-backed credentials
//!
//! Store and scheduler publish their collections through `tokio::sync::watch`
//! channels; a UI subscribes instead of reaching into shared state.

pub mod auth;
pub mod contacts;
pub mod error;
pub mod gateway;
pub mod ranking;
pub mod sparks;
pub mod storage;

pub use auth::{AuthProvider, KeyringAuth, NoAuth, StaticToken};
pub use contacts::{Closeness, Contact, ContactStore, DeviceContact, ImportSummary};
pub use error::{ConfigError, ContactError, CoreError, RankingError, SparkError, TransportError};
pub use gateway::SyncGateway;
pub use ranking::{RankedSuggestion, RankingClient, Suggestion};
pub use sparks::{SparkCompletion, SparkScheduler, SparkStatus, SparkTask};
pub use storage::Config;
