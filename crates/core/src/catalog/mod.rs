//! # Catalog
//!
//! Remote catalog lookups: exact-name fetch, substring name search,
//! variant discovery, and the debounced typeahead built on top.

pub mod client;
pub mod models;
pub mod typeahead;

pub use client::CatalogClient;
pub use models::{CatalogItem, CatalogRef, Stat};
pub use typeahead::{NameSearch, Suggestions, Typeahead};
