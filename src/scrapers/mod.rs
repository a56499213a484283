//! Headline scraping: extraction strategies, the per-source fetch worker,
//! and the parallel fetch-cycle coordinator.
//!
//! # Pipeline
//!
//! ```text
//! enabled sources ──► coordinator::fetch_all ──► worker::Fetcher × N ──► extract ──► normalize
//!                                 ▲                                                     │
//!                                 └──────────── join, concatenate ◄────────────────────┘
//! ```
//!
//! | Module | Role |
//! |--------|------|
//! | [`extract`] | Strategy table mapping a source to the elements that hold headlines |
//! | [`worker`] | Download one page, extract, normalize; failures become an empty list |
//! | [`coordinator`] | One task per source, join barrier, aggregate result |

pub mod coordinator;
pub mod extract;
pub mod worker;

pub use coordinator::fetch_all;
pub use extract::{DeclaredSelector, Extractor, ExtractorTable, FixedSelector};
pub use worker::{FetchSettings, Fetcher};
