use super::AppContext;
use crate::output::Output;
use crate::ui;
use color_eyre::eyre::eyre;
use color_eyre::Result;
use popcorn_core::{DetailController, SearchController};
use std::sync::Arc;

pub async fn run_search(query: &str, output: &Output) -> Result<()> {
    let ctx = AppContext::load()?;
    let mut controller = SearchController::new(ctx.catalog()?)
        .with_min_query_len(ctx.config.search.min_query_len);

    controller.set_query(query);
    let spinner = ui::spinner(format!("Searching for \"{}\"...", query.trim()));
    let settled = controller.settled().await;
    spinner.finish_and_clear();
    settled?;

    let state = controller.state();
    if state.has_error() {
        return Err(eyre!("{}", state.error));
    }
    if state.results.is_empty() {
        output.warn(format!(
            "Type at least {} characters to search",
            ctx.config.search.min_query_len
        ));
        return Ok(());
    }

    if !output.is_json() {
        output.info(format!("Found {} results", state.results.len()));
    }
    output.table(
        &ui::results_table(&state.results),
        &ui::results_json(&state.query, &state.results),
    );
    Ok(())
}

pub async fn run_show(imdb_id: &str, output: &Output) -> Result<()> {
    let ctx = AppContext::load()?;
    let watchlist = ctx.watchlist();
    let mut details = DetailController::new(ctx.catalog()?, Arc::new(ui::TerminalTitle::new()))
        .with_default_title(ctx.config.display.default_title.clone());

    details.select(imdb_id);
    let spinner = ui::spinner(format!("Loading {}...", imdb_id));
    let settled = details.settled().await;
    spinner.finish_and_clear();
    settled?;

    let state = details.state();
    if !state.error.is_empty() {
        return Err(eyre!("{}", state.error));
    }
    let Some(detail) = state.detail else {
        return Err(eyre!("No details returned for {}", imdb_id));
    };

    let user_rating = watchlist.user_rating(&detail.imdb_id).map(|r| r.value());
    let data = serde_json::json!({
        "detail": &detail,
        "watched": watchlist.contains(&detail.imdb_id),
        "user_rating": user_rating,
    });
    output.table(&ui::detail_table(&detail, user_rating), &data);
    Ok(())
}
