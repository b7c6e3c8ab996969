use color_eyre::eyre::eyre;
use color_eyre::Result;
use moviemuse_models::MovieId;
use moviemuse_sources::Catalog;

use super::{spinner, AppContext};
use crate::output::Output;

pub async fn run_details(id: &str, output: &Output) -> Result<()> {
    let ctx = AppContext::load()?;
    ctx.require_catalog_keys()?;

    let id: MovieId = id.parse().map_err(|e| eyre!("{}", e))?;
    let pb = spinner(output, "Fetching details…");
    let details = ctx.catalog().details(&id).await;
    pb.finish_and_clear();

    match details {
        Some(details) => output.details(&details),
        None => output.error(format!("no details found for {}", id)),
    }
    Ok(())
}
