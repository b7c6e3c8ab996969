use color_eyre::eyre::eyre;
use color_eyre::Result;

use super::{describe_backend_error, spinner, AppContext};
use crate::output::Output;

pub async fn run_recommend(output: &Output) -> Result<()> {
    let ctx = AppContext::load()?;
    ctx.require_catalog_keys()?;

    // Suggestions are seeded from whichever watchlist is active: the
    // account's when logged in, the local one otherwise.
    let watchlist = if ctx.session.is_valid() {
        ctx.backend()
            .watchlist()
            .await
            .map_err(|e| eyre!(describe_backend_error(&e)))?
    } else {
        ctx.local_watchlist().list()
    };

    if watchlist.is_empty() {
        output.info("Watchlist is empty - nothing to recommend from yet.");
        return Ok(());
    }

    let engine = ctx.recommendation_engine();
    let pb = spinner(output, "Building recommendations…");
    let picks = engine.recommend(&watchlist, "").await;
    pb.finish_and_clear();

    if picks.is_empty() {
        output.info("No recommendations available right now.");
    } else {
        output.movies(&picks);
    }
    Ok(())
}
