//! Wanderfeed - Travel Discovery Feed with a Keyword-Driven Assistant
//!
//! Wanderfeed shows a feed of points of interest that can be narrowed by a
//! category token and a free-text search, mutated per session (like, save,
//! dismiss), and steered by a mock travel assistant whose replies switch
//! the active category.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                         App (single writer)                   │
//! │  ┌────────────────┐  ┌────────────────┐  ┌────────────────┐  │
//! │  │ PostRepository │  │  FilterState   │  │   Assistant    │  │
//! │  │ like/save/     │  │ category+query │  │ classify, log, │  │
//! │  │ dismiss/share  │  │                │  │ delayed reply  │  │
//! │  └───────┬────────┘  └───────┬────────┘  └───────┬────────┘  │
//! │          └─────────┬─────────┘                   │           │
//! │             filter + highlight        category command       │
//! │                    │                             │           │
//! │               Screen / render  ◄─────────────────┘           │
//! └────────────────────▲─────────────────────────────────────────┘
//!                      │ GET /api/locations (once)
//! ┌────────────────────┴─────────────────────────────────────────┐
//! │                     Location Server (axum)                    │
//! │  dataset  ·  /api/conversation  ·  /images/*                  │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`feed`]: post types, repository, filter engine and highlighting
//! - [`assistant`]: intent classifier, conversation log and reply scheduling
//! - [`app`]: headless presentation model and terminal rendering
//! - [`client`]: locations API client
//! - [`server`]: location server
//! - [`config`]: configuration management

pub mod app;
pub mod assistant;
pub mod client;
pub mod config;
pub mod error;
pub mod feed;
pub mod server;

pub use config::FeedConfig;
pub use error::{Error, Result};
