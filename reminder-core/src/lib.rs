//! Reminder Core - classification and aggregation of open pull requests
//!
//! This crate turns the open PRs of a repository into per-channel review
//! digests: WIP filtering, label routing, per-reviewer grouping, rendering
//! and size-aware chunking. Fetching and posting live behind the
//! [`PrSource`] and [`Notifier`] traits.

pub mod chunk;
pub mod config;
pub mod digest;
pub mod error;
pub mod mention;
pub mod model;
pub mod reminder;
pub mod repository;
pub mod routing;
pub mod secrets;

pub use chunk::{chunk, DEFAULT_MAX_CHUNK_CHARS};
pub use config::{Config, GitHubConfig, MessageConfig, SlackConfig};
pub use digest::{stable_sort_by_key, ChannelDigest, Digest, DigestStats, OutboundMessage};
pub use error::{Error, Result};
pub use mention::{mention, MentionTable};
pub use model::{PrSummary, PullRequest};
pub use reminder::{Notifier, PrSource, Reminder, RunSummary};
pub use repository::Repository;
pub use routing::{route, RoutingRule, RoutingTable};
pub use secrets::Secrets;
