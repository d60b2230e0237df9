//! Reminder Slack - posts digests through the Slack Web API
//!
//! One `chat.postMessage` call per [`Notifier::post`](reminder_core::Notifier::post);
//! in dry-run mode the message is logged instead.

mod error;
mod notifier;

pub use error::{Error, Result};
pub use notifier::{SlackNotifier, DEFAULT_API_URL};
