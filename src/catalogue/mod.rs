//! Catalogue of known TV series
//!
//! This module provides the in-memory representation of the catalogue: one
//! `SeriesRecord` per series, keyed by its title-cased name, holding the
//! number of episodes of every season in order. Persistence lives in the
//! `store` submodule.

mod store;

pub use store::CatalogueStore;

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while building, reading or writing the catalogue
#[derive(Debug, Error)]
pub enum CatalogueError {
    /// The series title is empty after trimming
    #[error("Series title must not be empty")]
    EmptyTitle,

    /// The per-season episode counts violate the record invariants
    #[error("Invalid episode counts: {0}")]
    InvalidEpisodeCounts(String),

    /// A series with the same title is already stored
    #[error("Series already exists in database: {0}")]
    DuplicateTitle(String),

    /// Failed to create the directory holding the catalogue file
    #[error("Failed to create catalogue directory at {path}: {source}")]
    DirectoryCreationFailed { path: PathBuf, source: io::Error },

    /// Failed to open or read the catalogue file
    #[error("Failed to read catalogue file {path}: {source}")]
    ReadFailed { path: PathBuf, source: io::Error },

    /// The catalogue file is not valid CSV
    #[error("Failed to parse catalogue file {path}: {source}")]
    ParseFailed { path: PathBuf, source: csv::Error },

    /// A row of the catalogue file holds unusable data
    #[error("Invalid data in catalogue file {path}, row {row}: {reason}")]
    MalformedRow {
        path: PathBuf,
        row: usize,
        reason: String,
    },

    /// Failed to write the catalogue file
    #[error("Failed to write catalogue file {path}: {source}")]
    WriteFailed { path: PathBuf, source: io::Error },

    /// Failed to acquire the exclusive lock guarding writes
    #[error("Failed to lock catalogue file {path}: {source}")]
    LockFailed { path: PathBuf, source: io::Error },
}

/// A single series and the episode count of each of its seasons
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeriesRecord {
    title: String,
    season_episode_counts: Vec<u32>,
}

impl SeriesRecord {
    /// Creates a record, title-casing the title and validating the counts
    ///
    /// # Errors
    ///
    /// Fails when the title is blank, when no seasons are given or when any
    /// season has zero episodes.
    pub fn new(title: &str, season_episode_counts: Vec<u32>) -> Result<Self, CatalogueError> {
        let title = title_case(title);
        if title.is_empty() {
            return Err(CatalogueError::EmptyTitle);
        }

        validate_episode_counts(&season_episode_counts)
            .map_err(CatalogueError::InvalidEpisodeCounts)?;

        Ok(Self {
            title,
            season_episode_counts,
        })
    }

    /// Creates a record from stored data, keeping the title exactly as stored
    pub(crate) fn from_stored(title: String, season_episode_counts: Vec<u32>) -> Self {
        Self {
            title,
            season_episode_counts,
        }
    }

    /// The unique, title-cased series name
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Episode counts of every season, season 1 first
    pub fn season_episode_counts(&self) -> &[u32] {
        &self.season_episode_counts
    }

    pub fn season_count(&self) -> usize {
        self.season_episode_counts.len()
    }
}

/// The full set of known series, in storage order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalogue {
    records: Vec<SeriesRecord>,
}

impl Catalogue {
    /// Creates an empty catalogue
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn from_records(records: Vec<SeriesRecord>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[SeriesRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Looks up a series by exact title
    pub fn find_by_title(&self, title: &str) -> Option<&SeriesRecord> {
        self.records.iter().find(|record| record.title == title)
    }

    /// All titles, sorted ascending
    pub fn sorted_titles(&self) -> Vec<String> {
        let mut titles: Vec<String> = self.records.iter().map(|r| r.title.clone()).collect();
        titles.sort();
        titles
    }

    /// Returns a new catalogue holding every current record plus `record`
    ///
    /// # Errors
    ///
    /// Returns `CatalogueError::DuplicateTitle` if the title is already
    /// present. The current catalogue is left untouched either way.
    pub fn with_record(&self, record: SeriesRecord) -> Result<Self, CatalogueError> {
        if self.find_by_title(&record.title).is_some() {
            return Err(CatalogueError::DuplicateTitle(record.title));
        }

        let mut records = self.records.clone();
        records.push(record);
        Ok(Self { records })
    }
}

/// Converts a series name to title case
///
/// The first letter of every word is upper-cased and all following letters
/// lower-cased. A word starts after any character that is neither a letter
/// nor an apostrophe, so "grey's anatomy" becomes "Grey's Anatomy" and
/// "the x-files" becomes "The X-Files".
pub fn title_case(name: &str) -> String {
    let mut result = String::with_capacity(name.len());
    let mut in_word = false;

    for c in name.trim().chars() {
        if c.is_alphabetic() {
            if in_word {
                result.extend(c.to_lowercase());
            } else {
                result.extend(c.to_uppercase());
            }
            in_word = true;
        } else {
            result.push(c);
            in_word = c == '\'' && in_word;
        }
    }

    result
}

/// Encodes per-season episode counts as the space-separated stored form
pub fn compress_episode_counts(counts: &[u32]) -> String {
    counts
        .iter()
        .map(|count| count.to_string())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Decodes the space-separated stored form into per-season episode counts
///
/// Any run of whitespace separates entries. Every entry must be a positive
/// integer and at least one entry must be present.
pub fn decompress_episode_counts(compressed: &str) -> Result<Vec<u32>, String> {
    let counts = compressed
        .split_whitespace()
        .map(|token| {
            token
                .parse::<u32>()
                .map_err(|_| format!("'{}' is not a valid episode count", token))
        })
        .collect::<Result<Vec<_>, _>>()?;

    validate_episode_counts(&counts)?;
    Ok(counts)
}

fn validate_episode_counts(counts: &[u32]) -> Result<(), String> {
    if counts.is_empty() {
        return Err("a series needs at least one season".to_string());
    }

    if let Some(position) = counts.iter().position(|&count| count == 0) {
        return Err(format!("season {} has no episodes", position + 1));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("breaking bad"), "Breaking Bad");
        assert_eq!(title_case("  THE OFFICE "), "The Office");
        assert_eq!(title_case("grey's anatomy"), "Grey's Anatomy");
        assert_eq!(title_case("the x-files"), "The X-Files");
        assert_eq!(title_case("9-1-1 lone star"), "9-1-1 Lone Star");
        assert_eq!(title_case("'allo 'allo!"), "'Allo 'Allo!");
    }

    #[test]
    fn test_series_record_normalizes_title() {
        let record = SeriesRecord::new("foo bar", vec![3, 5]).unwrap();
        assert_eq!(record.title(), "Foo Bar");
        assert_eq!(record.season_episode_counts(), &[3, 5]);
        assert_eq!(record.season_count(), 2);
    }

    #[test]
    fn test_series_record_rejects_invalid_data() {
        assert!(matches!(
            SeriesRecord::new("   ", vec![1]),
            Err(CatalogueError::EmptyTitle)
        ));
        assert!(matches!(
            SeriesRecord::new("Foo", vec![]),
            Err(CatalogueError::InvalidEpisodeCounts(_))
        ));
        assert!(matches!(
            SeriesRecord::new("Foo", vec![4, 0, 2]),
            Err(CatalogueError::InvalidEpisodeCounts(_))
        ));
    }

    #[test]
    fn test_find_by_title_is_exact() {
        let catalogue = Catalogue::new()
            .with_record(SeriesRecord::new("Foo", vec![3]).unwrap())
            .unwrap();

        assert!(catalogue.find_by_title("Foo").is_some());
        assert!(catalogue.find_by_title("foo").is_none());
        assert!(catalogue.find_by_title("Fo").is_none());
    }

    #[test]
    fn test_with_record_rejects_duplicate() {
        let catalogue = Catalogue::new()
            .with_record(SeriesRecord::new("Foo", vec![3]).unwrap())
            .unwrap();

        let result = catalogue.with_record(SeriesRecord::new("FOO", vec![9, 9]).unwrap());
        assert!(matches!(result, Err(CatalogueError::DuplicateTitle(title)) if title == "Foo"));
        assert_eq!(catalogue.len(), 1);
        assert_eq!(catalogue.records()[0].season_episode_counts(), &[3]);
    }

    #[test]
    fn test_sorted_titles() {
        let catalogue = Catalogue::from_records(vec![
            SeriesRecord::new("Zoo", vec![1]).unwrap(),
            SeriesRecord::new("Alpha", vec![1]).unwrap(),
            SeriesRecord::new("Mid", vec![1]).unwrap(),
        ]);
        assert_eq!(catalogue.sorted_titles(), vec!["Alpha", "Mid", "Zoo"]);
    }

    #[test]
    fn test_compressed_episode_string() {
        assert_eq!(compress_episode_counts(&[10, 13, 8]), "10 13 8");
        assert_eq!(decompress_episode_counts("10 13  8\t").unwrap(), vec![10, 13, 8]);
        assert!(decompress_episode_counts("").is_err());
        assert!(decompress_episode_counts("3 0").is_err());
        assert!(decompress_episode_counts("3 x").is_err());
        assert!(decompress_episode_counts("3 -1").is_err());
    }
}
