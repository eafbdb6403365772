use super::{prompts, AppContext};
use crate::output::Output;
use crate::ui;
use color_eyre::eyre::eyre;
use color_eyre::Result;
use owo_colors::OwoColorize;
use popcorn_core::{
    dispatch, DetailController, FileStorage, Key, KeyAction, KeyContext, SearchController, TitleSink,
    WatchlistError, WatchlistStore,
};
use popcorn_models::{RatingInput, WatchedEntry};
use std::sync::Arc;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Screen {
    Search,
    Results,
    Detail,
    Watched,
    Quit,
}

struct Session {
    search: SearchController,
    details: DetailController,
    watchlist: WatchlistStore<FileStorage>,
    rating: RatingInput,
    min_query_len: usize,
}

impl Session {
    /// Menus never hold a text cursor, so only the detail flag varies.
    fn key(&self, key: Key) -> Option<KeyAction> {
        dispatch(
            key,
            KeyContext {
                detail_open: self.details.is_open(),
                input_focused: false,
            },
        )
    }

    /// Applies the key's action and returns the screen it leads to.
    fn handle_key(&mut self, key: Key, fallback: Screen) -> Screen {
        match self.key(key) {
            Some(KeyAction::CloseDetail) => {
                self.details.close();
                Screen::Results
            }
            Some(KeyAction::FocusSearch) => {
                self.details.close();
                Screen::Search
            }
            None => fallback,
        }
    }
}

pub async fn run_browse(output: &Output) -> Result<()> {
    if !ui::is_interactive() || output.is_json() {
        return Err(eyre!("'popcorn browse' needs an interactive terminal and human output"));
    }

    let ctx = AppContext::load()?;
    let catalog = ctx.catalog()?;
    let title = Arc::new(ui::TerminalTitle::new());
    title.set_title(&ctx.config.display.default_title);

    let mut session = Session {
        search: SearchController::new(catalog.clone()).with_min_query_len(ctx.config.search.min_query_len),
        details: DetailController::new(catalog, title)
            .with_default_title(ctx.config.display.default_title.clone()),
        watchlist: ctx.watchlist(),
        rating: ctx.rating_input(),
        min_query_len: ctx.config.search.min_query_len,
    };

    output.println(format!("🍿 {}", ctx.config.display.default_title.bold()));
    output.println(format!(
        "You have watched {} movies. Press Esc in a menu to go back.\n",
        session.watchlist.len()
    ));

    let mut screen = Screen::Search;
    while screen != Screen::Quit {
        debug!(?screen, "Browse screen");
        screen = match screen {
            Screen::Search => search_screen(&mut session).await?,
            Screen::Results => results_screen(&mut session, output)?,
            Screen::Detail => detail_screen(&mut session, output).await?,
            Screen::Watched => watched_screen(&mut session, output)?,
            Screen::Quit => Screen::Quit,
        };
    }

    session.details.close();
    Ok(())
}

async fn search_screen(session: &mut Session) -> Result<Screen> {
    let previous = session.search.state().query;
    let query = prompts::prompt_string(
        "Search movies (leave empty for your watched list)",
        (!previous.is_empty()).then_some(previous.as_str()),
    )?;

    if query.trim().is_empty() {
        return Ok(Screen::Watched);
    }

    session.search.set_query(query.trim());
    let spinner = ui::spinner(format!("Searching for \"{}\"...", query.trim()));
    let settled = session.search.settled().await;
    spinner.finish_and_clear();
    settled?;

    Ok(Screen::Results)
}

fn results_screen(session: &mut Session, output: &Output) -> Result<Screen> {
    let state = session.search.state();
    if state.has_error() {
        output.error(&state.error);
        return Ok(Screen::Search);
    }
    if state.results.is_empty() {
        output.warn(format!("Type at least {} characters to search", session.min_query_len));
        return Ok(Screen::Search);
    }

    let mut items: Vec<String> = state
        .results
        .iter()
        .map(|r| {
            let mark = if session.watchlist.contains(&r.imdb_id) { " ✓" } else { "" };
            format!("{} ({}){}", r.title, r.year, mark)
        })
        .collect();
    let new_search = items.len();
    items.push("↵ New search".to_string());
    items.push("Your watched list".to_string());
    items.push("Quit".to_string());

    let prompt = format!("Found {} results", state.results.len());
    let Some(choice) = prompts::prompt_select(&prompt, &items, 0)? else {
        return Ok(Screen::Search);
    };

    if let Some(result) = state.results.get(choice) {
        session.details.select(result.imdb_id.clone());
        return Ok(Screen::Detail);
    }

    Ok(match choice - new_search {
        0 => session.handle_key(Key::Enter, Screen::Search),
        1 => Screen::Watched,
        _ => Screen::Quit,
    })
}

async fn detail_screen(session: &mut Session, output: &Output) -> Result<Screen> {
    if session.details.state().loading {
        let spinner = ui::spinner("Loading details...");
        let settled = session.details.settled().await;
        spinner.finish_and_clear();
        settled?;
    }

    let state = session.details.state();
    let Some(detail) = state.detail else {
        if !state.error.is_empty() {
            output.error(&state.error);
        }
        return Ok(session.handle_key(Key::Escape, Screen::Results));
    };

    let existing = session.watchlist.user_rating(&detail.imdb_id);
    let watched = session.watchlist.contains(&detail.imdb_id);
    output.println(ui::detail_table(&detail, existing.map(|r| r.value())).to_string());
    if watched {
        let rated = existing.map(|r| format!(" {} ⭐", r)).unwrap_or_default();
        output.info(format!("You rated this movie{}", rated));
    }

    let watch_action = if watched { "Remove from watched list" } else { "Rate and add to watched list" };
    let items = [watch_action, "← Back to results", "↵ New search"];
    let Some(choice) = prompts::prompt_select("What next?", &items, 0)? else {
        return Ok(session.handle_key(Key::Escape, Screen::Detail));
    };

    match choice {
        0 if watched => {
            session
                .watchlist
                .remove(&detail.imdb_id)
                .map_err(|e| eyre!("Failed to save watched list: {}", e))?;
            output.success(format!("Removed {} from your watched list", detail.title));
            Ok(Screen::Detail)
        }
        0 => {
            let Some(rating) = prompts::prompt_rating(&format!("Rate {}", detail.title), &session.rating)? else {
                return Ok(Screen::Detail);
            };
            match session.watchlist.add(WatchedEntry::from_detail(&detail, Some(rating))) {
                Ok(()) => output.success(format!("Added {} with rating {}", detail.title, rating)),
                Err(WatchlistError::AlreadyWatched(_)) => output.warn(format!("You already rated {}", detail.title)),
                Err(e) => return Err(eyre!("Failed to save watched list: {}", e)),
            }
            Ok(session.handle_key(Key::Escape, Screen::Results))
        }
        1 => Ok(session.handle_key(Key::Escape, Screen::Results)),
        _ => Ok(session.handle_key(Key::Enter, Screen::Search)),
    }
}

fn watched_screen(session: &mut Session, output: &Output) -> Result<Screen> {
    output.println(ui::summary_table(&session.watchlist.summary()).to_string());
    if !session.watchlist.is_empty() {
        output.println(ui::watched_table(session.watchlist.entries()).to_string());
    }

    let items = ["↵ Search movies", "Remove a movie", "Quit"];
    match prompts::prompt_select("Your watched list", &items, 0)? {
        None | Some(0) => Ok(session.handle_key(Key::Enter, Screen::Search)),
        Some(1) => {
            let titles: Vec<String> = session
                .watchlist
                .entries()
                .iter()
                .map(|e| format!("{} ({})", e.title, e.year))
                .collect();
            if titles.is_empty() {
                output.info("Nothing to remove");
                return Ok(Screen::Watched);
            }
            if let Some(i) = prompts::prompt_select("Remove which movie?", &titles, 0)? {
                let entry = session.watchlist.entries()[i].clone();
                if prompts::prompt_yes_no(&format!("Remove {}?", entry.title), true)? {
                    session
                        .watchlist
                        .remove(&entry.imdb_id)
                        .map_err(|e| eyre!("Failed to save watched list: {}", e))?;
                    output.success(format!("Removed {}", entry.title));
                }
            }
            Ok(Screen::Watched)
        }
        Some(_) => Ok(Screen::Quit),
    }
}
