//! Which Episode - let chance decide what to watch next
//!
//! This library keeps a small catalogue of TV series (title plus the number
//! of episodes in every season) in a CSV file, draws random episodes and
//! series from it, and looks up new series on TVMaze.

mod app;
mod catalogue;
mod config;
mod metadata_retrieval;
mod selector;
mod temp;

// Re-export error types
pub use catalogue::CatalogueError;
pub use config::ConfigError;
pub use metadata_retrieval::MetadataRetrievalError;

pub use app::{App, AppState, UserInterface};
pub use catalogue::{
    Catalogue, CatalogueStore, SeriesRecord, compress_episode_counts, decompress_episode_counts,
    title_case,
};
pub use config::{CATALOGUE_ENV, Config, ConfigOverrides, TVMAZE_URL_ENV};
pub use metadata_retrieval::{
    DEFAULT_TVMAZE_URL, MetadataProvider, ShowCandidate, TvMazeProvider,
};
pub use selector::{EpisodePick, pick_random_title, pick_season_and_episode};

use std::io;
use thiserror::Error;

/// Top-level error type for Which Episode operations
///
/// Every variant ends the current action only; none of them is fatal to an
/// interactive session.
#[derive(Debug, Error)]
pub enum WhichEpisodeError {
    /// Error reading or writing the catalogue
    #[error("{0}")]
    Catalogue(#[from] CatalogueError),

    /// Error talking to the metadata provider
    #[error("{0}")]
    MetadataRetrieval(#[from] MetadataRetrievalError),

    /// Error reading the configuration
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The terminal prompt failed
    #[error("Prompt failed: {0}")]
    Prompt(#[from] io::Error),

    /// The selected title is not in the catalogue
    #[error("Invalid selection: {0}")]
    InvalidSelection(String),

    /// The selected series has no per-season data
    #[error("No episode data found for {0}")]
    NoEpisodeData(String),

    /// A search returned no candidates
    #[error("No series found for '{0}'! Please try another name")]
    NoSeriesFound(String),

    /// Manual entry received something other than a positive whole number
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
