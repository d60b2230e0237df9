//! Reminder GitHub - open pull request source backed by the GitHub REST API
//!
//! This crate fetches every open PR of a repository, page by page, and
//! converts the API's JSON into [`reminder_core::PullRequest`].

mod client;
mod error;
mod pulls;

pub use client::{GitHubClient, API_VERSION, DEFAULT_API_URL};
pub use error::{Error, Result};
pub use pulls::PAGE_SIZE;
