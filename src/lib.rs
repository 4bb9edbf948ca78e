//! Clauson etymological dictionary service.
//!
//! The interesting parts live in [`normalize`] (orthography folding to a
//! canonical matching key) and [`query`] (the search mini-language compiled to
//! parameterized SQL). [`rich_text`] turns entry markup into linked inline
//! nodes. Storage, bulk import and the REST API sit behind the `database` and
//! `server` features.

pub mod config;
pub mod error;
pub mod models;
pub mod normalize;
pub mod query;
pub mod rich_text;

#[cfg(feature = "database")]
pub mod database;

#[cfg(feature = "database")]
pub mod import;

#[cfg(feature = "server")]
pub mod api;

pub use error::{DictionaryError, Result};
pub use normalize::normalize;
pub use query::{compile, CompiledQuery, OperatorMode, Scope, SearchFilter};
