use super::{prompts, AppContext};
use crate::output::Output;
use crate::ui;
use color_eyre::eyre::eyre;
use color_eyre::Result;
use popcorn_config::PathManager;
use std::fs;

pub fn run_clear(all: bool, watchlist: bool, credentials: bool, output: &Output) -> Result<()> {
    if !(all || watchlist || credentials) {
        output.warn("No clear option specified. Use --watchlist, --credentials, or --all");
        output.println("\nExample: popcorn clear --watchlist");
        return Ok(());
    }

    // Credentials go first so a malformed credentials file can still be cleared.
    if all || credentials {
        clear_credentials(&PathManager::default(), output)?;
    }
    if all || watchlist {
        clear_watchlist(&AppContext::load()?, output)?;
    }
    if all {
        output.success("Watched list and credentials cleared");
    }
    Ok(())
}

fn clear_watchlist(ctx: &AppContext, output: &Output) -> Result<()> {
    let mut store = ctx.watchlist();
    if store.is_empty() {
        output.info("Watched list is already empty");
        return Ok(());
    }

    if ui::is_interactive()
        && !output.is_json()
        && !prompts::prompt_yes_no(&format!("Remove all {} watched movies?", store.len()), false)?
    {
        output.info("Kept watched list");
        return Ok(());
    }

    let count = store.len();
    store
        .clear()
        .map_err(|e| eyre!("Failed to clear watched list: {}", e))?;
    output.success(format!("Cleared {} watched movies", count));
    Ok(())
}

fn clear_credentials(path_manager: &PathManager, output: &Output) -> Result<()> {
    let credentials_file = path_manager.credentials_file();

    if credentials_file.exists() {
        fs::remove_file(&credentials_file).map_err(|e| {
            eyre!("Failed to remove credentials file at {}: {}", credentials_file.display(), e)
        })?;
        output.success(format!("Cleared credentials: {}", credentials_file.display()));
    } else {
        output.info("No credentials file found to clear");
    }

    Ok(())
}
