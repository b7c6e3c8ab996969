use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The curated server-proxied movie lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Feed {
    Trending,
    NewReleases,
    TopRated,
}

impl Feed {
    pub const ALL: [Feed; 3] = [Feed::Trending, Feed::NewReleases, Feed::TopRated];

    /// Path segment on the backend, also the cache key stem.
    pub fn as_str(&self) -> &'static str {
        match self {
            Feed::Trending => "trending",
            Feed::NewReleases => "new-releases",
            Feed::TopRated => "top-rated",
        }
    }
}

impl fmt::Display for Feed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Feed {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "trending" => Ok(Feed::Trending),
            "new-releases" => Ok(Feed::NewReleases),
            "top-rated" => Ok(Feed::TopRated),
            other => Err(format!(
                "unknown feed '{}', expected trending, new-releases or top-rated",
                other
            )),
        }
    }
}
