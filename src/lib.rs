//! uscode: browse and search the 1925 US Code by title, chapter and section.
//!
//! The core is three stateless steps. [`loader::load_title`] fetches a title's XML document
//! from a [`corpus::Corpus`] and builds its [`outline::Outline`], and [`search::search`]
//! lazily yields the sections of an outline matching a query. [`session::Session`] tracks
//! which title is shown, and the terminal browser is built from [`app_state`] and [`ui`].

pub mod app_state;
pub mod batch;
pub mod config;
pub mod corpus;
pub mod error;
pub mod loader;
pub mod outline;
pub mod search;
pub mod session;
pub mod title;
pub mod ui;

pub use error::{Error, LoadError, ParseError};
pub use loader::load_title;
pub use outline::Outline;
pub use search::{search, SearchResult};

#[cfg(test)]
#[path = "tests/fixtures.rs"]
pub(crate) mod fixtures;
