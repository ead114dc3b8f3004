//! Terminal frontend
//!
//! Implements the interactive surface with dialoguer prompts and runs the
//! menu loop that stands in for the series dropdown and the four action
//! buttons.

use dialoguer::theme::ColorfulTheme;
use dialoguer::{Confirm, Input, Select};
use rand::Rng;
use std::io;
use which_episode::{App, AppState, MetadataProvider, UserInterface, WhichEpisodeError};

fn prompt_error(e: dialoguer::Error) -> io::Error {
    io::Error::other(e)
}

/// dialoguer-backed prompts on the controlling terminal
pub struct TerminalUi {
    theme: ColorfulTheme,
}

impl TerminalUi {
    pub fn new() -> Self {
        Self {
            theme: ColorfulTheme::default(),
        }
    }

    /// Lets the user choose the current series from the sorted title list
    fn select_series(&mut self, state: &mut AppState) -> io::Result<()> {
        if state.titles().is_empty() {
            println!("No series found.");
            return Ok(());
        }

        let titles = state.titles().to_vec();
        let current = state
            .selected()
            .and_then(|selected| titles.iter().position(|title| title == selected))
            .unwrap_or(0);

        let choice = Select::with_theme(&self.theme)
            .with_prompt("Select a series (Esc to cancel)")
            .items(&titles)
            .default(current)
            .interact_opt()
            .map_err(prompt_error)?;

        if let Some(index) = choice {
            state.select(&titles[index]);
        }

        Ok(())
    }
}

impl UserInterface for TerminalUi {
    fn ask_text(&mut self, prompt: &str) -> io::Result<Option<String>> {
        let answer: String = Input::with_theme(&self.theme)
            .with_prompt(prompt)
            .allow_empty(true)
            .interact_text()
            .map_err(prompt_error)?;

        let answer = answer.trim();
        Ok((!answer.is_empty()).then(|| answer.to_string()))
    }

    fn confirm(&mut self, prompt: &str) -> io::Result<bool> {
        Confirm::with_theme(&self.theme)
            .with_prompt(prompt)
            .default(false)
            .interact()
            .map_err(prompt_error)
    }

    fn show_error(&mut self, message: &str) {
        eprintln!("Error: {}", message);
    }
}

/// Runs the interactive menu until the user quits
///
/// Action failures are shown and the loop continues; only a broken
/// terminal ends it with an error.
pub fn run_menu<P, R>(app: &mut App<P, R>, ui: &mut TerminalUi) -> Result<(), WhichEpisodeError>
where
    P: MetadataProvider,
    R: Rng,
{
    let mut state = AppState::new();
    app.refresh(&mut state, ui);

    println!("Which Episode Should We Watch?\n");

    loop {
        let items = vec![
            format!(
                "Select a series (current: {})",
                state.selected().unwrap_or("none")
            ),
            "Pick random episode".to_string(),
            "Pick random series".to_string(),
            "Search online".to_string(),
            "Manual entry".to_string(),
            "Quit".to_string(),
        ];

        let choice = Select::with_theme(&ui.theme)
            .with_prompt("What now?")
            .items(&items)
            .default(1)
            .interact_opt()
            .map_err(prompt_error)?;

        state.clear_result();

        let outcome = match choice {
            Some(0) => ui.select_series(&mut state).map_err(WhichEpisodeError::from),
            Some(1) => app.pick_random_episode(&mut state, ui).map(|_| ()),
            Some(2) => {
                if let Some(title) = app.pick_random_series(&mut state, ui) {
                    println!("Selected: {}", title);
                }
                Ok(())
            }
            Some(3) => app.search_online(&mut state, ui).map(|_| ()),
            Some(4) => app.manual_entry(&mut state, ui).map(|_| ()),
            _ => return Ok(()),
        };

        match outcome {
            Ok(()) => {
                if let Some(result) = state.result() {
                    println!("{}\n", result);
                }
            }
            Err(WhichEpisodeError::Prompt(e)) => return Err(WhichEpisodeError::Prompt(e)),
            Err(e) => ui.show_error(&e.to_string()),
        }
    }
}
