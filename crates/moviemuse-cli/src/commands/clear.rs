use color_eyre::eyre::eyre;
use color_eyre::Result;
use moviemuse_core::CacheStorage;

use super::AppContext;
use crate::output::Output;

pub async fn run_clear(all: bool, cache: bool, session: bool, output: &Output) -> Result<()> {
    if !all && !cache && !session {
        return Err(eyre!("nothing to clear - pass --cache, --session or --all"));
    }

    let mut ctx = AppContext::load()?;

    if all || cache {
        CacheStorage::new(ctx.paths.cache_query_dir())
            .clear()
            .map_err(|e| eyre!("{:#}", e))?;
        CacheStorage::new(ctx.paths.cache_feed_dir())
            .clear()
            .map_err(|e| eyre!("{:#}", e))?;
        output.success("Cleared query and feed caches");
    }

    if all || session {
        ctx.session.clear().map_err(|e| eyre!("{:#}", e))?;
        output.success("Cleared session");
    }

    if all {
        ctx.local_watchlist()
            .discard()
            .map_err(|e| eyre!("{:#}", e))?;
        output.success("Cleared local watchlist");
    }

    Ok(())
}
