mod ui;

use clap::{Parser, Subcommand};
use log::warn;
use std::path::PathBuf;
use std::process;
use ui::TerminalUi;
use which_episode::{
    App, AppState, CatalogueStore, Config, ConfigOverrides, SeriesRecord, TvMazeProvider,
    UserInterface, WhichEpisodeError, compress_episode_counts,
};

#[derive(Debug, Parser)]
#[command(
    name = "which-episode",
    version,
    about = "Which episode should we watch? Picks a random episode from your series catalogue."
)]
struct Cli {
    /// Catalogue CSV file [env: WHICH_EPISODE_CATALOGUE]
    #[arg(long, global = true, value_name = "FILE")]
    catalogue: Option<PathBuf>,

    /// TVMaze API base URL [env: WHICH_EPISODE_TVMAZE_URL]
    #[arg(long, global = true, value_name = "URL")]
    tvmaze_url: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Interactive menu (default)
    Interactive,
    /// List every series in the catalogue
    List,
    /// Pick a random episode, of a random series if no title is given
    Pick { title: Option<String> },
    /// Pick a random series
    RandomSeries,
    /// Search TVMaze and add the series you confirm
    Search {
        #[arg(required = true, num_args = 1..)]
        query: Vec<String>,
    },
    /// Add a series by hand, giving the episode count of each season in order
    Add {
        title: String,
        #[arg(required = true, value_parser = clap::value_parser!(u32).range(1..))]
        episodes: Vec<u32>,
    },
}

type TvApp = App<TvMazeProvider, rand::rngs::ThreadRng>;

fn list(app: &TvApp, ui: &mut TerminalUi) -> Result<(), WhichEpisodeError> {
    let catalogue = app.load_catalogue(ui);

    if catalogue.is_empty() {
        println!("No series found.");
        return Ok(());
    }

    let mut records: Vec<_> = catalogue.records().iter().collect();
    records.sort_by(|a, b| a.title().cmp(b.title()));

    for record in records {
        println!(
            "{} - {} season(s): {}",
            record.title(),
            record.season_count(),
            compress_episode_counts(record.season_episode_counts())
        );
    }

    Ok(())
}

fn pick(app: &mut TvApp, ui: &mut TerminalUi, title: Option<String>) -> Result<(), WhichEpisodeError> {
    let mut state = AppState::new();
    app.refresh(&mut state, ui);

    match title {
        Some(title) => {
            if !state.select(&title) {
                return Err(WhichEpisodeError::InvalidSelection(title));
            }
        }
        None => {
            if app.pick_random_series(&mut state, ui).is_none() {
                println!("No series found.");
                return Ok(());
            }
        }
    }

    let pick = app.pick_random_episode(&mut state, ui)?;
    println!(
        "{}: Season {} Episode {}",
        state.selected().unwrap_or_default(),
        pick.season_number,
        pick.episode_number
    );

    Ok(())
}

fn random_series(app: &mut TvApp, ui: &mut TerminalUi) -> Result<(), WhichEpisodeError> {
    let mut state = AppState::new();
    match app.pick_random_series(&mut state, ui) {
        Some(title) => println!("{}", title),
        None => println!("{}", state.result().unwrap_or("No series found.")),
    }
    Ok(())
}

fn search(app: &mut TvApp, ui: &mut TerminalUi, query: &str) -> Result<(), WhichEpisodeError> {
    let mut state = AppState::new();
    app.search_and_add(&mut state, ui, query)?;
    if let Some(result) = state.result() {
        println!("{}", result);
    }
    Ok(())
}

fn add(app: &mut TvApp, title: &str, episodes: Vec<u32>) -> Result<(), WhichEpisodeError> {
    let mut state = AppState::new();
    let record = SeriesRecord::new(title, episodes)?;
    app.add_series(&mut state, record)?;
    if let Some(result) = state.result() {
        println!("{}", result);
    }
    Ok(())
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    let config = match Config::resolve(ConfigOverrides {
        catalogue_path: cli.catalogue,
        tvmaze_base_url: cli.tvmaze_url,
    }) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };

    let store = CatalogueStore::new(&config.catalogue_path);
    let mut ui = TerminalUi::new();

    // Loading fails soft later on, so a missing file is not fatal here
    if let Err(e) = store.ensure_exists() {
        warn!("Could not create catalogue: {}", e);
        ui.show_error(&e.to_string());
    }

    let provider = TvMazeProvider::with_base_url(&config.tvmaze_base_url);
    let mut app = App::new(store, provider, rand::rng());

    let result = match cli.command.unwrap_or(Command::Interactive) {
        Command::Interactive => ui::run_menu(&mut app, &mut ui),
        Command::List => list(&app, &mut ui),
        Command::Pick { title } => pick(&mut app, &mut ui, title),
        Command::RandomSeries => random_series(&mut app, &mut ui),
        Command::Search { query } => search(&mut app, &mut ui, &query.join(" ")),
        Command::Add { title, episodes } => add(&mut app, &title, episodes),
    };

    if let Err(e) = result {
        ui.show_error(&e.to_string());
        process::exit(1);
    }
}
