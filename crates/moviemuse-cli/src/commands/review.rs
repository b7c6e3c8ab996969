use color_eyre::eyre::eyre;
use color_eyre::Result;
use moviemuse_models::MovieId;

use super::{describe_backend_error, spinner, AppContext};
use crate::output::Output;

pub async fn run_show(id: &str, output: &Output) -> Result<()> {
    let ctx = AppContext::load()?;
    let id: MovieId = id.parse().map_err(|e| eyre!("{}", e))?;

    let pb = spinner(output, "Fetching reviews…");
    let reviews = ctx.backend().reviews(&id).await;
    pb.finish_and_clear();

    let reviews = reviews.map_err(|e| eyre!(describe_backend_error(&e)))?;
    output.reviews(&reviews);
    Ok(())
}

pub async fn run_post(id: &str, rating: u8, comment: &str, output: &Output) -> Result<()> {
    let ctx = AppContext::load()?;
    let id: MovieId = id.parse().map_err(|e| eyre!("{}", e))?;

    if !(1..=10).contains(&rating) {
        return Err(eyre!("rating must be between 1 and 10"));
    }

    let (review, message) = ctx
        .backend()
        .post_review(&id, rating, comment)
        .await
        .map_err(|e| eyre!(describe_backend_error(&e)))?;

    output.success(message);
    output.reviews(&[review]);
    Ok(())
}
