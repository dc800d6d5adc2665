//! banter-core - Core library for banter.
//!
//! This crate provides the question-answering core of the banter bot:
//! an n-gram keyword categorizer, a time-bucketed deterministic response
//! selector, a time-decaying preference store, and a lazy table cache
//! over an opaque row source.
//!
//! # Example
//!
//! ```ignore
//! use banter_core::{AskEngine, Answer};
//! use chrono::Utc;
//!
//! let mut engine = AskEngine::new(source, "banter-data");
//!
//! match engine.respond("when will i sleep?", "mocha", &[], Utc::now())? {
//!     Answer::Reply(reply) => println!("{reply}"),
//!     Answer::Unavailable => println!("response data unavailable, try a refresh"),
//! }
//! ```

pub mod ask;
pub mod classify;
pub mod config;
pub mod error;
pub mod prefs;
pub mod select;
pub mod tables;

// Re-export commonly used types
pub use ask::{render, Answer, AskEngine};
pub use classify::{categorize, ngrams, KeywordTable, GENERAL_CATEGORY};
pub use config::BotConfig;
pub use error::{BanterError, BanterResult, ErrorCode};
pub use prefs::{PrefEntry, PrefStore, Snapshot};
pub use select::{select, time_bucket, BUCKET_MINUTES};
pub use tables::{RawRows, Table, TableCache, TableKey, TableSource, TableSpec};
