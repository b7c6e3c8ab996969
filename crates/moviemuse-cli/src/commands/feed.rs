use color_eyre::Result;
use moviemuse_models::Feed;

use super::{describe_backend_error, spinner, AppContext};
use crate::output::Output;

pub async fn run_feed(feed: Option<Feed>, page: u32, output: &Output) -> Result<()> {
    let ctx = AppContext::load()?;
    let service = ctx.feed_service();

    let feeds: Vec<Feed> = match feed {
        Some(feed) => vec![feed],
        None => Feed::ALL.to_vec(),
    };

    let pb = spinner(output, "Fetching feeds…");
    let fetched =
        futures::future::join_all(feeds.iter().map(|feed| service.fetch(*feed, page))).await;
    pb.finish_and_clear();

    for (feed, result) in feeds.iter().zip(fetched) {
        if output.is_human() {
            output.info(format!("\n{}", feed_label(*feed)));
        }
        match result {
            Ok(movies) => output.movies(&movies),
            Err(e) => output.error(format!(
                "failed to load {} feed: {}",
                feed,
                describe_backend_error(&e)
            )),
        }
    }
    Ok(())
}

fn feed_label(feed: Feed) -> &'static str {
    match feed {
        Feed::Trending => "Trending",
        Feed::NewReleases => "New Releases",
        Feed::TopRated => "Top Rated",
    }
}
