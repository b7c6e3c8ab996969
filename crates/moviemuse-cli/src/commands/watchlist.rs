use color_eyre::eyre::eyre;
use color_eyre::Result;
use moviemuse_models::{MovieId, WatchlistEntry};
use moviemuse_sources::Catalog;

use super::{describe_backend_error, spinner, AppContext};
use crate::output::Output;

pub async fn run_list(output: &Output) -> Result<()> {
    let ctx = AppContext::load()?;

    if ctx.session.is_valid() {
        let entries = ctx
            .backend()
            .watchlist()
            .await
            .map_err(|e| eyre!(describe_backend_error(&e)))?;
        output.watchlist(&entries);
    } else {
        output.info("Not logged in - showing the local watchlist.");
        output.watchlist(&ctx.local_watchlist().list());
    }
    Ok(())
}

pub async fn run_add(
    id: &str,
    rating: Option<u8>,
    review: Option<String>,
    output: &Output,
) -> Result<()> {
    let ctx = AppContext::load()?;
    ctx.require_catalog_keys()?;
    let id: MovieId = id.parse().map_err(|e| eyre!("{}", e))?;

    if let Some(rating) = rating {
        if !(1..=10).contains(&rating) {
            return Err(eyre!("rating must be between 1 and 10"));
        }
    }

    // The entry carries a full record so the list renders without another
    // catalog round trip.
    let pb = spinner(output, "Fetching movie…");
    let details = ctx.catalog().details(&id).await;
    pb.finish_and_clear();
    let details = details.ok_or_else(|| eyre!("no catalog entry found for {}", id))?;

    let mut entry = WatchlistEntry::new(details.movie.clone());
    entry.user_rating = rating;
    entry.user_review = review;
    entry.imdb_rating = details.rating;
    entry.runtime_minutes = details.runtime_minutes;

    let entries = if ctx.session.is_valid() {
        ctx.backend()
            .watchlist_add(&entry)
            .await
            .map_err(|e| eyre!(describe_backend_error(&e)))?
    } else {
        ctx.local_watchlist().add(entry).map_err(|e| eyre!("{:#}", e))?
    };

    // A changed watchlist invalidates this movie's cached suggestions.
    ctx.recommendation_engine().invalidate(&id);

    output.success(format!("Added {} to the watchlist", details.movie.title));
    output.watchlist(&entries);
    Ok(())
}

pub async fn run_remove(id: &str, output: &Output) -> Result<()> {
    let ctx = AppContext::load()?;
    let id: MovieId = id.parse().map_err(|e| eyre!("{}", e))?;

    let entries = if ctx.session.is_valid() {
        ctx.backend()
            .watchlist_remove(&id)
            .await
            .map_err(|e| eyre!(describe_backend_error(&e)))?
    } else {
        ctx.local_watchlist()
            .remove(&id)
            .map_err(|e| eyre!("{:#}", e))?
    };

    ctx.recommendation_engine().invalidate(&id);

    output.success(format!("Removed {} from the watchlist", id));
    output.watchlist(&entries);
    Ok(())
}
