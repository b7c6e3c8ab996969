use color_eyre::eyre::eyre;
use color_eyre::Result;
use moviemuse_core::similar_key;
use moviemuse_models::MovieId;
use moviemuse_sources::Catalog;

use super::{spinner, AppContext};
use crate::output::Output;

pub async fn run_similar(id: &str, output: &Output) -> Result<()> {
    let ctx = AppContext::load()?;
    ctx.require_catalog_keys()?;
    let id: MovieId = id.parse().map_err(|e| eyre!("{}", e))?;

    let cache = ctx.query_cache();
    let key = similar_key(&id);
    let movies = match cache.get(&key) {
        Some(cached) => cached,
        None => {
            let pb = spinner(output, "Fetching similar movies…");
            let fetched = ctx.catalog().similar(&id).await;
            pb.finish_and_clear();
            if !fetched.is_empty() {
                cache.set(&key, fetched.clone());
            }
            fetched
        }
    };

    if movies.is_empty() {
        output.info(format!("No similar movies found for {}", id));
    } else {
        output.movies(&movies);
    }
    Ok(())
}
