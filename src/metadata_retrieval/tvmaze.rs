//! TVMaze metadata provider implementation.
use super::tvmaze_types::{TvMazeSearchResult, TvMazeSeason};
use super::{MetadataProvider, MetadataRetrievalError, ShowCandidate};
use log::{debug, warn};
use serde::de::DeserializeOwned;

/// Public TVMaze API endpoint
pub const DEFAULT_TVMAZE_URL: &str = "https://api.tvmaze.com";

/// Metadata provider for the TVMaze API.
///
/// This provider searches shows through the `search/shows` endpoint and
/// reads episode counts from the `shows/:id/seasons` endpoint.
pub struct TvMazeProvider {
    client: reqwest::blocking::Client,
    base_url: String,
}

impl TvMazeProvider {
    /// Creates a new TVMaze provider instance for the public API.
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_TVMAZE_URL)
    }

    /// Creates a provider talking to a different TVMaze compatible endpoint.
    pub fn with_base_url(base_url: &str) -> Self {
        Self {
            client: reqwest::blocking::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Performs a GET request and decodes the JSON body.
    ///
    /// `not_found` names the missing resource when the API answers 404.
    fn get_json<T>(
        &self,
        path: &str,
        query: &[(&str, &str)],
        not_found: &str,
    ) -> Result<T, MetadataRetrievalError>
    where
        T: DeserializeOwned,
    {
        let url = format!("{}{}", self.base_url, path);
        debug!("GET {} {:?}", url, query);

        let response = self
            .client
            .get(&url)
            .query(query)
            .send()
            .map_err(|e| MetadataRetrievalError::RequestError(e.to_string()))?;

        if response.status() == 404 {
            return Err(MetadataRetrievalError::ShowNotFound(not_found.to_string()));
        }

        // Ensure request was successful
        if !response.status().is_success() {
            return Err(MetadataRetrievalError::RequestError(format!(
                "HTTP {} {}",
                response.status().as_u16(),
                response.status().canonical_reason().unwrap_or("Unknown")
            )));
        }

        response
            .json()
            .map_err(|e| MetadataRetrievalError::ParseError(e.to_string()))
    }

    /// Converts search hits to candidates, keeping the API's order.
    fn convert_search_results(results: Vec<TvMazeSearchResult>) -> Vec<ShowCandidate> {
        results
            .into_iter()
            .map(|result| ShowCandidate {
                id: result.show.id,
                name: result.show.name,
                premiered: result.show.premiered,
                ended: result.show.ended,
            })
            .collect()
    }

    /// Converts the season list to per-season episode counts.
    ///
    /// Seasons are ordered by number. The list stops at the first season
    /// without a positive episode order, which TVMaze uses for seasons that
    /// are announced but not yet scheduled.
    fn convert_seasons(
        show_id: u64,
        mut seasons: Vec<TvMazeSeason>,
    ) -> Result<Vec<u32>, MetadataRetrievalError> {
        seasons.sort_by_key(|season| season.number);

        let mut counts = Vec::with_capacity(seasons.len());
        for season in &seasons {
            match season.episode_order {
                Some(order) if order > 0 => counts.push(order),
                _ => {
                    warn!(
                        "Show {} season {} has no episode count, ignoring it and later seasons",
                        show_id, season.number
                    );
                    break;
                }
            }
        }

        if counts.is_empty() {
            return Err(MetadataRetrievalError::InvalidData(format!(
                "No episode counts available for show {}",
                show_id
            )));
        }

        Ok(counts)
    }
}

impl Default for TvMazeProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl MetadataProvider for TvMazeProvider {
    fn search_shows(&self, query: &str) -> Result<Vec<ShowCandidate>, MetadataRetrievalError> {
        let results: Vec<TvMazeSearchResult> =
            self.get_json("/search/shows", &[("q", query)], query)?;
        debug!("Search for '{}' returned {} show(s)", query, results.len());

        Ok(Self::convert_search_results(results))
    }

    fn fetch_season_episode_counts(
        &self,
        show_id: u64,
    ) -> Result<Vec<u32>, MetadataRetrievalError> {
        let seasons: Vec<TvMazeSeason> = self.get_json(
            &format!("/shows/{}/seasons", show_id),
            &[],
            &show_id.to_string(),
        )?;

        Self::convert_seasons(show_id, seasons)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SEARCH_FIXTURE: &str = r#"[
        {"score": 0.9, "show": {"id": 169, "name": "Breaking Bad", "premiered": "2008-01-20", "ended": "2013-09-29", "language": "English"}},
        {"score": 0.5, "show": {"id": 47371, "name": "Breaking Bad Wolf", "premiered": null, "ended": null}}
    ]"#;

    #[test]
    fn test_convert_search_results_keeps_order() {
        let results: Vec<TvMazeSearchResult> = serde_json::from_str(SEARCH_FIXTURE).unwrap();
        let candidates = TvMazeProvider::convert_search_results(results);

        assert_eq!(candidates.len(), 2);
        assert_eq!(candidates[0].id, 169);
        assert_eq!(candidates[0].label(), "Breaking Bad (2008 - 2013)");
        assert_eq!(candidates[1].id, 47371);
        assert_eq!(candidates[1].premiered, None);
    }

    #[test]
    fn test_convert_empty_search() {
        let results: Vec<TvMazeSearchResult> = serde_json::from_str("[]").unwrap();
        assert!(TvMazeProvider::convert_search_results(results).is_empty());
    }

    #[test]
    fn test_convert_seasons_orders_by_number() {
        let seasons: Vec<TvMazeSeason> = serde_json::from_str(
            r#"[
                {"id": 3, "number": 2, "episodeOrder": 13, "name": ""},
                {"id": 1, "number": 1, "episodeOrder": 7, "name": ""}
            ]"#,
        )
        .unwrap();

        assert_eq!(
            TvMazeProvider::convert_seasons(169, seasons).unwrap(),
            vec![7, 13]
        );
    }

    #[test]
    fn test_convert_seasons_stops_at_unannounced_season() {
        let seasons: Vec<TvMazeSeason> = serde_json::from_str(
            r#"[
                {"number": 1, "episodeOrder": 10},
                {"number": 2, "episodeOrder": 8},
                {"number": 3, "episodeOrder": null},
                {"number": 4, "episodeOrder": 6}
            ]"#,
        )
        .unwrap();

        assert_eq!(
            TvMazeProvider::convert_seasons(1, seasons).unwrap(),
            vec![10, 8]
        );
    }

    #[test]
    fn test_convert_seasons_without_counts_fails() {
        let seasons: Vec<TvMazeSeason> =
            serde_json::from_str(r#"[{"number": 1, "episodeOrder": 0}]"#).unwrap();

        assert!(matches!(
            TvMazeProvider::convert_seasons(1, seasons),
            Err(MetadataRetrievalError::InvalidData(_))
        ));

        assert!(matches!(
            TvMazeProvider::convert_seasons(1, Vec::new()),
            Err(MetadataRetrievalError::InvalidData(_))
        ));
    }

    #[test]
    fn test_base_url_trailing_slash_is_trimmed() {
        let provider = TvMazeProvider::with_base_url("http://localhost:8080/");
        assert_eq!(provider.base_url, "http://localhost:8080");
    }
}
