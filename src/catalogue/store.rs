//! CSV-backed catalogue storage
//!
//! The catalogue is persisted as a CSV file with the columns `Title`,
//! `Seasons` and `Eps Compressed`. Every write rewrites the whole file by
//! replacing it with a fully written sibling, while holding an exclusive
//! lock on a `<file>.lock` companion.

use super::{
    Catalogue, CatalogueError, SeriesRecord, compress_episode_counts, decompress_episode_counts,
};
use crate::temp::create_sibling_temp_file;
use log::{debug, error, info};
use serde::{Deserialize, Serialize};
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

const HEADERS: [&str; 3] = ["Title", "Seasons", "Eps Compressed"];

/// A row as it is read from disk
///
/// `Seasons` is informational only and never validated against the
/// compressed episode string.
#[derive(Debug, Deserialize)]
struct StoredRow {
    #[serde(rename = "Title")]
    title: String,
    #[serde(rename = "Seasons", default)]
    _seasons: Option<String>,
    #[serde(rename = "Eps Compressed", default)]
    eps_compressed: String,
}

/// A row as it is written to disk
#[derive(Debug, Serialize)]
struct StoredRowRef<'a> {
    #[serde(rename = "Title")]
    title: &'a str,
    #[serde(rename = "Seasons")]
    seasons: usize,
    #[serde(rename = "Eps Compressed")]
    eps_compressed: String,
}

/// Handle to the catalogue file on disk
///
/// The store holds no catalogue data itself: every read goes back to the
/// file, so edits made outside the program are always picked up.
#[derive(Debug, Clone)]
pub struct CatalogueStore {
    path: PathBuf,
}

impl CatalogueStore {
    /// Creates a store backed by the file at `path`
    ///
    /// Nothing is touched on disk until the first operation.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the path of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Creates an empty catalogue file (header row only) if none exists yet
    pub fn ensure_exists(&self) -> Result<(), CatalogueError> {
        if self.path.exists() {
            return Ok(());
        }

        let _lock = self.lock()?;
        // Another process may have created it while we waited for the lock
        if self.path.exists() {
            return Ok(());
        }

        info!("Creating empty catalogue at {}", self.path.display());
        self.write_catalogue(&Catalogue::new())
    }

    /// Reads every record from the backing file
    ///
    /// A missing file reads as an empty catalogue.
    ///
    /// # Errors
    ///
    /// Fails if the file cannot be read, is not valid CSV, or contains a row
    /// without a title, with an invalid compressed episode string, or with a
    /// title that already appeared in an earlier row.
    pub fn try_load_all(&self) -> Result<Catalogue, CatalogueError> {
        let file = match File::open(&self.path) {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!("No catalogue at {}, using empty", self.path.display());
                return Ok(Catalogue::new());
            }
            Err(e) => {
                return Err(CatalogueError::ReadFailed {
                    path: self.path.clone(),
                    source: e,
                });
            }
        };

        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(file);

        let mut records: Vec<SeriesRecord> = Vec::new();

        for (index, row) in reader.deserialize::<StoredRow>().enumerate() {
            let row = row.map_err(|source| CatalogueError::ParseFailed {
                path: self.path.clone(),
                source,
            })?;
            let row_number = index + 1;

            if row.title.is_empty() {
                return Err(self.malformed(row_number, "missing title".to_string()));
            }

            if records.iter().any(|record| record.title() == row.title) {
                return Err(self.malformed(
                    row_number,
                    format!("duplicate title '{}'", row.title),
                ));
            }

            let counts = decompress_episode_counts(&row.eps_compressed)
                .map_err(|reason| self.malformed(row_number, reason))?;

            records.push(SeriesRecord::from_stored(row.title, counts));
        }

        debug!(
            "Loaded {} series from {}",
            records.len(),
            self.path.display()
        );

        Ok(Catalogue::from_records(records))
    }

    /// Reads every record, substituting an empty catalogue on failure
    ///
    /// The error is logged and handed to `on_error` so it can be shown to
    /// the user. This never fails.
    pub fn load_all<F>(&self, on_error: F) -> Catalogue
    where
        F: FnOnce(&CatalogueError),
    {
        match self.try_load_all() {
            Ok(catalogue) => catalogue,
            Err(e) => {
                error!("Failed to load database: {}", e);
                on_error(&e);
                Catalogue::new()
            }
        }
    }

    /// Adds a record and rewrites the backing file
    ///
    /// The file is re-read under the write lock, so the record is appended
    /// to what is actually stored. Returns the catalogue as written.
    ///
    /// # Errors
    ///
    /// Returns `CatalogueError::DuplicateTitle` without touching the file if
    /// the title is already present. Read failures also abort before any
    /// write, so an unreadable file is never replaced.
    pub fn append(&self, record: SeriesRecord) -> Result<Catalogue, CatalogueError> {
        let _lock = self.lock()?;

        let current = self.try_load_all()?;
        let title = record.title().to_string();
        let updated = current.with_record(record)?;

        self.write_catalogue(&updated)?;
        info!(
            "Added '{}' to {} ({} series total)",
            title,
            self.path.display(),
            updated.len()
        );

        Ok(updated)
    }

    /// Writes the full catalogue to a sibling file and renames it into place
    fn write_catalogue(&self, catalogue: &Catalogue) -> Result<(), CatalogueError> {
        let write_failed = |source: io::Error| CatalogueError::WriteFailed {
            path: self.path.clone(),
            source,
        };

        let (temp, file) = create_sibling_temp_file(&self.path).map_err(write_failed)?;

        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);

        writer
            .write_record(HEADERS)
            .map_err(|e| write_failed(e.into()))?;

        for record in catalogue.records() {
            writer
                .serialize(StoredRowRef {
                    title: record.title(),
                    seasons: record.season_count(),
                    eps_compressed: compress_episode_counts(record.season_episode_counts()),
                })
                .map_err(|e| write_failed(e.into()))?;
        }

        let mut file = writer
            .into_inner()
            .map_err(|e| write_failed(e.into_error()))?;
        file.flush().map_err(write_failed)?;
        file.sync_all().map_err(write_failed)?;
        drop(file);

        temp.persist(&self.path).map_err(write_failed)?;
        Ok(())
    }

    /// Takes the exclusive write lock, released when the returned file drops
    fn lock(&self) -> Result<File, CatalogueError> {
        self.ensure_parent_dir()?;

        let lock_path = self.lock_path();
        let lock_failed = |source: io::Error| CatalogueError::LockFailed {
            path: lock_path.clone(),
            source,
        };

        let file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(&lock_path)
            .map_err(lock_failed)?;
        file.lock().map_err(lock_failed)?;

        Ok(file)
    }

    fn lock_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|name| name.to_os_string())
            .unwrap_or_default();
        name.push(".lock");
        self.path.with_file_name(name)
    }

    fn ensure_parent_dir(&self) -> Result<(), CatalogueError> {
        match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => {
                fs::create_dir_all(parent).map_err(|e| CatalogueError::DirectoryCreationFailed {
                    path: parent.to_path_buf(),
                    source: e,
                })
            }
            _ => Ok(()),
        }
    }

    fn malformed(&self, row: usize, reason: String) -> CatalogueError {
        CatalogueError::MalformedRow {
            path: self.path.clone(),
            row,
            reason,
        }
    }
}
