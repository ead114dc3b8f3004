/// Data structures and traits for remote TV show lookup.
///
/// This module provides the candidate structure returned by a show search,
/// as well as the trait implemented by metadata providers that can search
/// for shows and report how many episodes each of their seasons has.
mod tvmaze;
mod tvmaze_types;

pub use tvmaze::{DEFAULT_TVMAZE_URL, TvMazeProvider};

use thiserror::Error;

/// Errors that can occur during metadata retrieval operations.
#[derive(Debug, Error)]
pub enum MetadataRetrievalError {
    /// Request to the metadata provider failed
    #[error("Network error: {0}")]
    RequestError(String),

    /// Failed to parse the provider's JSON response
    #[error("Failed to parse API response: {0}")]
    ParseError(String),

    /// The requested show was not found
    #[error("Show not found: {0}")]
    ShowNotFound(String),

    /// The API returned invalid or unexpected data
    #[error("API returned invalid data: {0}")]
    InvalidData(String),
}

/// A show returned by a text search, awaiting confirmation by the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShowCandidate {
    /// Provider specific show identifier
    pub id: u64,
    /// The show's name as listed by the provider
    pub name: String,
    /// Premiere date, usually `YYYY-MM-DD`
    pub premiered: Option<String>,
    /// Date of the final episode, `None` while the show is running
    pub ended: Option<String>,
}

impl ShowCandidate {
    /// Year of the premiere, if known
    pub fn start_year(&self) -> Option<&str> {
        self.premiered.as_deref().and_then(year_of)
    }

    /// Year of the final episode, if the show has ended
    pub fn end_year(&self) -> Option<&str> {
        self.ended.as_deref().and_then(year_of)
    }

    /// Human readable label, e.g. `Breaking Bad (2008 - 2013)`
    pub fn label(&self) -> String {
        format!(
            "{} ({} - {})",
            self.name,
            self.start_year().unwrap_or("Unknown"),
            self.end_year().unwrap_or("Ongoing")
        )
    }
}

fn year_of(date: &str) -> Option<&str> {
    date.split('-').next().filter(|year| !year.trim().is_empty())
}

/// Trait for metadata providers that can look up TV shows.
///
/// Implementors of this trait answer the two questions the catalogue needs:
/// which shows match a free-text query, and how many episodes each season
/// of a chosen show has.
pub trait MetadataProvider {
    /// Searches for shows matching free text.
    ///
    /// Candidates are returned in the provider's relevance order. An empty
    /// list means nothing matched.
    fn search_shows(&self, query: &str) -> Result<Vec<ShowCandidate>, MetadataRetrievalError>;

    /// Fetches the number of episodes of every season of a show.
    ///
    /// # Returns
    ///
    /// One positive count per season, season 1 first.
    fn fetch_season_episode_counts(&self, show_id: u64)
    -> Result<Vec<u32>, MetadataRetrievalError>;
}
