use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Which catalog a movie record originated from.
///
/// TMDB ids are plain integers and collide with nothing else, so they are
/// rendered with a `tmdb-` prefix. IMDB ids already carry their own `tt`
/// shape and are rendered bare, which keeps the flat id namespace the rest
/// of the app (and the backend's documents) expect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CatalogSource {
    Tmdb,
    Imdb,
}

/// A movie identifier as a (source, native id) pair.
///
/// The string form is what travels over the wire and into cache keys; the
/// `normalized` form (native id, no source tag) is used solely when
/// comparing records across catalogs for dedup.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MovieId {
    source: CatalogSource,
    native: String,
}

impl MovieId {
    pub fn tmdb(native: impl Into<String>) -> Self {
        Self {
            source: CatalogSource::Tmdb,
            native: native.into(),
        }
    }

    pub fn imdb(native: impl Into<String>) -> Self {
        Self {
            source: CatalogSource::Imdb,
            native: native.into(),
        }
    }

    pub fn source(&self) -> CatalogSource {
        self.source
    }

    pub fn native(&self) -> &str {
        &self.native
    }

    /// The id with any source tag stripped, for cross-catalog dedup only.
    pub fn normalized(&self) -> &str {
        &self.native
    }
}

impl fmt::Display for MovieId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.source {
            CatalogSource::Tmdb => write!(f, "tmdb-{}", self.native),
            CatalogSource::Imdb => write!(f, "{}", self.native),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseMovieIdError;

impl fmt::Display for ParseMovieIdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "movie id must be non-empty")
    }
}

impl std::error::Error for ParseMovieIdError {}

impl FromStr for MovieId {
    type Err = ParseMovieIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(ParseMovieIdError);
        }
        match s.strip_prefix("tmdb-") {
            Some(native) if !native.is_empty() => Ok(MovieId::tmdb(native)),
            _ => Ok(MovieId::imdb(s)),
        }
    }
}

impl Serialize for MovieId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for MovieId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tmdb_id_round_trip() {
        let id = MovieId::tmdb("603");
        assert_eq!(id.to_string(), "tmdb-603");
        assert_eq!("tmdb-603".parse::<MovieId>().unwrap(), id);
    }

    #[test]
    fn test_imdb_id_round_trip() {
        let id = MovieId::imdb("tt0133093");
        assert_eq!(id.to_string(), "tt0133093");
        assert_eq!("tt0133093".parse::<MovieId>().unwrap(), id);
    }

    #[test]
    fn test_normalized_strips_source_tag() {
        assert_eq!(MovieId::tmdb("603").normalized(), "603");
        assert_eq!(MovieId::imdb("tt0133093").normalized(), "tt0133093");
    }

    #[test]
    fn test_empty_id_rejected() {
        assert!("".parse::<MovieId>().is_err());
    }

    #[test]
    fn test_serde_uses_string_form() {
        let id = MovieId::tmdb("603");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"tmdb-603\"");
        let back: MovieId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }
}
