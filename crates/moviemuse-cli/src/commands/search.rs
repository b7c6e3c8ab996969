use color_eyre::Result;
use moviemuse_core::SearchController;
use moviemuse_sources::Catalog;

use super::{spinner, AppContext};
use crate::output::Output;

pub async fn run_search(
    query: &str,
    year: Option<u16>,
    debounce: bool,
    output: &Output,
) -> Result<()> {
    let ctx = AppContext::load()?;
    ctx.require_catalog_keys()?;

    // `--year` is a direct catalog filter; the controller path is the
    // normal interactive pipeline (cache, min length, cancellation).
    if let Some(year) = year {
        let pb = spinner(output, "Searching…");
        let results = ctx.catalog().search(query, Some(year)).await;
        pb.finish_and_clear();
        if results.is_empty() {
            output.error("No results found");
        } else {
            output.movies(&results);
        }
        return Ok(());
    }

    let controller = SearchController::new(ctx.catalog(), ctx.query_cache(), ctx.config.search);
    let pb = spinner(output, "Searching…");
    if debounce {
        controller.set_query(query);
    } else {
        controller.force_search(query);
    }
    let state = controller.settled().await;
    pb.finish_and_clear();

    if let Some(error) = state.error {
        output.error(error);
        return Ok(());
    }
    output.movies(&state.results);
    Ok(())
}
