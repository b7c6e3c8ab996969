use anyhow::{anyhow, Result};
use moviemuse_models::{MovieDetails, MovieId, MovieRecord};
use reqwest::Client;
use serde::Deserialize;

const BASE_URL: &str = "https://www.omdbapi.com/";

/// OMDB reports errors in-band: `{"Response":"False","Error":"..."}`.
#[derive(Debug, Deserialize)]
pub struct OmdbDetail {
    #[serde(rename = "Response")]
    response: String,
    #[serde(rename = "Error")]
    error: Option<String>,
    #[serde(rename = "imdbID")]
    imdb_id: Option<String>,
    #[serde(rename = "Title")]
    title: Option<String>,
    #[serde(rename = "Year")]
    year: Option<String>,
    #[serde(rename = "Poster")]
    poster: Option<String>,
    #[serde(rename = "Runtime")]
    runtime: Option<String>,
    #[serde(rename = "imdbRating")]
    imdb_rating: Option<String>,
    #[serde(rename = "Plot")]
    plot: Option<String>,
    #[serde(rename = "Released")]
    released: Option<String>,
    #[serde(rename = "Actors")]
    actors: Option<String>,
    #[serde(rename = "Director")]
    director: Option<String>,
    #[serde(rename = "Writer")]
    writer: Option<String>,
    #[serde(rename = "Genre")]
    genre: Option<String>,
}

/// "N/A" is OMDB's universal absent-value sentinel.
fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty() && v != "N/A")
}

fn split_names(value: Option<String>) -> Vec<String> {
    present(value)
        .map(|v| v.split(", ").map(str::to_string).collect())
        .unwrap_or_default()
}

pub async fn details(
    client: &Client,
    api_key: &str,
    imdb_id: &str,
) -> Result<MovieDetails> {
    let response = client
        .get(BASE_URL)
        .query(&[("apikey", api_key), ("i", imdb_id)])
        .send()
        .await?;

    if !response.status().is_success() {
        return Err(anyhow!("OMDB returned {}", response.status()));
    }

    let data: OmdbDetail = response.json().await?;
    if data.response != "True" {
        return Err(anyhow!(
            "OMDB error for {}: {}",
            imdb_id,
            data.error.unwrap_or_else(|| "unknown".to_string())
        ));
    }

    // Runtime arrives as "148 min".
    let runtime_minutes = present(data.runtime)
        .and_then(|r| r.split_whitespace().next().and_then(|m| m.parse().ok()));

    Ok(MovieDetails {
        movie: MovieRecord {
            id: MovieId::imdb(data.imdb_id.unwrap_or_else(|| imdb_id.to_string())),
            title: data.title.unwrap_or_default(),
            year: present(data.year).unwrap_or_else(|| "N/A".to_string()),
            poster_url: present(data.poster),
            genres: split_names(data.genre),
        },
        overview: present(data.plot),
        runtime_minutes,
        rating: present(data.imdb_rating).and_then(|r| r.parse().ok()),
        released: present(data.released),
        cast: split_names(data.actors),
        director: present(data.director),
        writers: split_names(data.writer),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_present_filters_sentinel() {
        assert_eq!(present(Some("N/A".to_string())), None);
        assert_eq!(present(Some(String::new())), None);
        assert_eq!(present(Some("1999".to_string())), Some("1999".to_string()));
        assert_eq!(present(None), None);
    }

    #[test]
    fn test_split_names() {
        assert_eq!(
            split_names(Some("Lana Wachowski, Lilly Wachowski".to_string())),
            vec!["Lana Wachowski", "Lilly Wachowski"]
        );
        assert!(split_names(Some("N/A".to_string())).is_empty());
    }
}
