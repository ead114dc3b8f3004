//! Application actions
//!
//! The four user actions (pick a random episode, pick a random series,
//! search online, manual entry) operate on an explicit [`AppState`] and talk
//! to the human only through the [`UserInterface`] trait. Every action loads
//! the catalogue fresh from the store.

use crate::WhichEpisodeError;
use crate::catalogue::{Catalogue, CatalogueStore, SeriesRecord, title_case};
use crate::metadata_retrieval::MetadataProvider;
use crate::selector::{EpisodePick, pick_random_title, pick_season_and_episode};
use log::{debug, info};
use rand::Rng;
use std::io;

/// The interactive surface the actions need from the frontend
pub trait UserInterface {
    /// Asks for a line of free text
    ///
    /// Returns `None` if the user cancels or enters nothing.
    fn ask_text(&mut self, prompt: &str) -> io::Result<Option<String>>;

    /// Asks a yes/no question
    fn confirm(&mut self, prompt: &str) -> io::Result<bool>;

    /// Reports a failure to the user
    fn show_error(&mut self, message: &str);
}

/// What the user currently sees: the title list, the selection and the
/// last result message
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppState {
    titles: Vec<String>,
    selected: Option<String>,
    result: Option<String>,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Known titles, sorted ascending
    pub fn titles(&self) -> &[String] {
        &self.titles
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    /// Message produced by the last action, if any
    pub fn result(&self) -> Option<&str> {
        self.result.as_deref()
    }

    /// Rebuilds the title list and selects the first title
    pub fn refresh(&mut self, catalogue: &Catalogue) {
        self.titles = catalogue.sorted_titles();
        self.selected = self.titles.first().cloned();
    }

    /// Selects a known title, trying its title-cased form if needed
    ///
    /// Returns `false` and keeps the current selection if neither form is
    /// in the title list.
    pub fn select(&mut self, title: &str) -> bool {
        let normalized = title_case(title);
        let found = [title, normalized.as_str()]
            .into_iter()
            .find(|candidate| self.titles.iter().any(|known| known == candidate));

        match found {
            Some(title) => {
                self.selected = Some(title.to_string());
                true
            }
            None => false,
        }
    }

    pub fn clear_result(&mut self) {
        self.result = None;
    }
}

/// Parses a positive whole number typed by the user
fn parse_positive_count(input: Option<String>) -> Result<u32, WhichEpisodeError> {
    let input = input.ok_or_else(|| WhichEpisodeError::InvalidInput("entry cancelled".into()))?;
    let trimmed = input.trim();

    match trimmed.parse::<u32>() {
        Ok(count) if count > 0 => Ok(count),
        _ => Err(WhichEpisodeError::InvalidInput(format!(
            "'{}' is not a positive whole number",
            trimmed
        ))),
    }
}

/// Wires the catalogue store, the metadata provider and the random source
/// to the user actions
pub struct App<P, R> {
    store: CatalogueStore,
    provider: P,
    rng: R,
}

impl<P, R> App<P, R>
where
    P: MetadataProvider,
    R: Rng,
{
    pub fn new(store: CatalogueStore, provider: P, rng: R) -> Self {
        Self {
            store,
            provider,
            rng,
        }
    }

    pub fn store(&self) -> &CatalogueStore {
        &self.store
    }

    /// Loads the catalogue, showing any read failure to the user
    pub fn load_catalogue<U>(&self, ui: &mut U) -> Catalogue
    where
        U: UserInterface + ?Sized,
    {
        self.store
            .load_all(|e| ui.show_error(&format!("Failed to load database: {}", e)))
    }

    /// Reloads the title list into `state`
    pub fn refresh<U>(&self, state: &mut AppState, ui: &mut U)
    where
        U: UserInterface + ?Sized,
    {
        let catalogue = self.load_catalogue(ui);
        state.refresh(&catalogue);
    }

    /// Draws a random episode of the selected series
    ///
    /// # Errors
    ///
    /// Fails if nothing is selected, if the selected title is not in the
    /// catalogue, or if the series has no episode data.
    pub fn pick_random_episode<U>(
        &mut self,
        state: &mut AppState,
        ui: &mut U,
    ) -> Result<EpisodePick, WhichEpisodeError>
    where
        U: UserInterface + ?Sized,
    {
        let title = state
            .selected
            .clone()
            .ok_or_else(|| WhichEpisodeError::InvalidSelection("no series selected".into()))?;

        let catalogue = self.load_catalogue(ui);
        let record = catalogue
            .find_by_title(&title)
            .ok_or_else(|| WhichEpisodeError::InvalidSelection(title.clone()))?;

        let pick = pick_season_and_episode(record.season_episode_counts(), &mut self.rng)
            .ok_or_else(|| WhichEpisodeError::NoEpisodeData(title.clone()))?;

        debug!(
            "Picked S{}E{} of '{}'",
            pick.season_number, pick.episode_number, title
        );
        state.result = Some(format!(
            "Random Episode: Season {} Episode {}",
            pick.season_number, pick.episode_number
        ));

        Ok(pick)
    }

    /// Selects a random series from the catalogue
    ///
    /// Returns the chosen title, or `None` (with a result message) if the
    /// catalogue is empty.
    pub fn pick_random_series<U>(&mut self, state: &mut AppState, ui: &mut U) -> Option<String>
    where
        U: UserInterface + ?Sized,
    {
        let titles = self.load_catalogue(ui).sorted_titles();

        match pick_random_title(&titles, &mut self.rng) {
            Some(title) => {
                state.selected = Some(title.to_string());
                state.result = None;
                Some(title.to_string())
            }
            None => {
                state.result = Some("No series found.".to_string());
                None
            }
        }
    }

    /// Prompts for a search term, then searches and adds the confirmed show
    ///
    /// Returns `Ok(None)` if the user enters nothing or declines every
    /// candidate.
    pub fn search_online<U>(
        &mut self,
        state: &mut AppState,
        ui: &mut U,
    ) -> Result<Option<SeriesRecord>, WhichEpisodeError>
    where
        U: UserInterface + ?Sized,
    {
        match ui.ask_text("Enter series name")? {
            Some(query) => self.search_and_add(state, ui, &query),
            None => Ok(None),
        }
    }

    /// Searches the metadata provider and adds the first confirmed show
    ///
    /// Candidates are offered one at a time in the provider's order; the
    /// first one the user accepts is fetched and stored under the title-cased
    /// search text.
    ///
    /// # Errors
    ///
    /// Fails on network errors, when nothing matches the search, or when the
    /// series is already in the catalogue. No partial state is stored.
    pub fn search_and_add<U>(
        &mut self,
        state: &mut AppState,
        ui: &mut U,
        query: &str,
    ) -> Result<Option<SeriesRecord>, WhichEpisodeError>
    where
        U: UserInterface + ?Sized,
    {
        let candidates = self.provider.search_shows(query)?;
        if candidates.is_empty() {
            return Err(WhichEpisodeError::NoSeriesFound(query.to_string()));
        }

        for candidate in candidates {
            let question = format!("Is {} the correct series?", candidate.label());
            if !ui.confirm(&question)? {
                continue;
            }

            info!("Confirmed '{}' (id {})", candidate.name, candidate.id);
            let counts = self.provider.fetch_season_episode_counts(candidate.id)?;
            let record = SeriesRecord::new(query, counts)?;
            return self.add_series(state, record).map(Some);
        }

        state.result = Some("No series selected.".to_string());
        Ok(None)
    }

    /// Prompts for a title, a season count and each season's episode count
    ///
    /// Returns `Ok(None)` if no title is entered.
    ///
    /// # Errors
    ///
    /// Any cancelled, non-numeric or non-positive count aborts the entry
    /// without writing anything.
    pub fn manual_entry<U>(
        &mut self,
        state: &mut AppState,
        ui: &mut U,
    ) -> Result<Option<SeriesRecord>, WhichEpisodeError>
    where
        U: UserInterface + ?Sized,
    {
        let Some(title) = ui.ask_text("Enter series name")? else {
            return Ok(None);
        };

        let season_count = parse_positive_count(ui.ask_text("Enter number of seasons")?)?;

        let mut counts = Vec::with_capacity(season_count.min(64) as usize);
        for season in 1..=season_count {
            let prompt = format!("Episodes in season {}", season);
            counts.push(parse_positive_count(ui.ask_text(&prompt)?)?);
        }

        let record = SeriesRecord::new(&title, counts)?;
        self.add_series(state, record).map(Some)
    }

    /// Stores a new series and refreshes the title list
    ///
    /// # Errors
    ///
    /// Returns `CatalogueError::DuplicateTitle` (wrapped) if the title is
    /// already stored.
    pub fn add_series(
        &mut self,
        state: &mut AppState,
        record: SeriesRecord,
    ) -> Result<SeriesRecord, WhichEpisodeError> {
        let catalogue = self.store.append(record.clone())?;
        state.refresh(&catalogue);
        state.result = Some(format!(
            "Added {} ({} season(s))",
            record.title(),
            record.season_count()
        ));

        Ok(record)
    }
}
