//! TVMaze API response types for deserialization.
//!
//! These structures mirror the JSON response format from the TVMaze API.
use serde::Deserialize;

/// A single hit from the TVMaze `search/shows` endpoint.
#[derive(Debug, Deserialize)]
pub(super) struct TvMazeSearchResult {
    /// The matched show
    pub show: TvMazeShow,
}

/// Show data as embedded in a search hit.
#[derive(Debug, Deserialize)]
pub(super) struct TvMazeShow {
    /// TVMaze show id
    pub id: u64,
    /// The name of the TV show
    pub name: String,
    /// Premiere date (`YYYY-MM-DD`, may be null for unaired shows)
    pub premiered: Option<String>,
    /// Date of the last episode (null while the show is running)
    pub ended: Option<String>,
}

/// A season from the TVMaze `shows/:id/seasons` endpoint.
#[derive(Debug, Deserialize)]
pub(super) struct TvMazeSeason {
    /// Season number
    pub number: u32,
    /// Number of episodes (null when not yet announced)
    #[serde(rename = "episodeOrder")]
    pub episode_order: Option<u32>,
}
