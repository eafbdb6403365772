use super::{prompts, AppContext};
use crate::output::Output;
use crate::ui;
use crate::WatchedCommands;
use color_eyre::eyre::eyre;
use color_eyre::Result;
use popcorn_core::WatchlistError;
use popcorn_models::WatchedEntry;
use serde_json::json;

pub async fn run_watched(cmd: WatchedCommands, output: &Output) -> Result<()> {
    let ctx = AppContext::load()?;
    match cmd {
        WatchedCommands::List => list(&ctx, output),
        WatchedCommands::Summary => summary(&ctx, output),
        WatchedCommands::Add { imdb_id, rating } => add(&ctx, &imdb_id, rating, output).await,
        WatchedCommands::Remove { imdb_id } => remove(&ctx, &imdb_id, output),
    }
}

fn list(ctx: &AppContext, output: &Output) -> Result<()> {
    let watchlist = ctx.watchlist();
    if watchlist.is_empty() && !output.is_json() {
        output.info("Your watched list is empty. Add movies with 'popcorn watched add <imdb-id>' or 'popcorn browse'.");
        return Ok(());
    }

    output.table(
        &ui::watched_table(watchlist.entries()),
        &json!({
            "entries": watchlist.entries(),
            "summary": ui::summary_json(&watchlist.summary()),
        }),
    );
    Ok(())
}

fn summary(ctx: &AppContext, output: &Output) -> Result<()> {
    let summary = ctx.watchlist().summary();
    output.table(&ui::summary_table(&summary), &ui::summary_json(&summary));
    Ok(())
}

async fn add(ctx: &AppContext, imdb_id: &str, rating: Option<u32>, output: &Output) -> Result<()> {
    let mut watchlist = ctx.watchlist();
    if let Some(existing) = watchlist.get(imdb_id) {
        let rated = existing
            .user_rating
            .map(|r| format!(" (rated {})", r))
            .unwrap_or_default();
        output.warn(format!("You already rated {}{}", existing.title, rated));
        return Ok(());
    }

    let input = ctx.rating_input();
    // Validate before going to the network.
    let user_rating = match rating {
        Some(value) => Some(input.rate(value)?),
        None => None,
    };

    let catalog = ctx.catalog()?;
    let spinner = ui::spinner(format!("Loading {}...", imdb_id));
    let fetched = catalog.movie_detail(imdb_id).await;
    spinner.finish_and_clear();
    let detail = fetched.map_err(|e| eyre!("{}", e))?;

    let user_rating = match user_rating {
        Some(r) => Some(r),
        None if ui::is_interactive() && !output.is_json() => {
            prompts::prompt_rating(&format!("Rate {}", detail.title), &input)?
        }
        None => None,
    };

    let entry = WatchedEntry::from_detail(&detail, user_rating);
    match watchlist.add(entry) {
        Ok(()) => {
            let rated = user_rating.map(|r| format!(" with rating {}", r)).unwrap_or_default();
            output.success(format!("Added {} ({}){}", detail.title, detail.year, rated));
            Ok(())
        }
        Err(WatchlistError::AlreadyWatched(_)) => {
            output.warn(format!("You already rated {}", detail.title));
            Ok(())
        }
        Err(e) => Err(eyre!("Failed to save watched list: {}", e)),
    }
}

fn remove(ctx: &AppContext, imdb_id: &str, output: &Output) -> Result<()> {
    let mut watchlist = ctx.watchlist();
    let title = watchlist.get(imdb_id).map(|e| e.title.clone());
    let removed = watchlist
        .remove(imdb_id)
        .map_err(|e| eyre!("Failed to save watched list: {}", e))?;

    match (removed, title) {
        (true, Some(title)) => output.success(format!("Removed {} from your watched list", title)),
        (true, None) => output.success(format!("Removed {} from your watched list", imdb_id)),
        (false, _) => output.warn(format!("{} is not in your watched list", imdb_id)),
    }
    Ok(())
}
