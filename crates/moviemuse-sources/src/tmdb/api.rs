use anyhow::{anyhow, Result};
use moviemuse_models::{MovieDetails, MovieId, MovieRecord};
use reqwest::Client;
use serde::Deserialize;

use super::genres::genre_name;

const BASE_URL: &str = "https://api.themoviedb.org/3";
const IMAGE_BASE: &str = "https://image.tmdb.org/t/p/w500";

#[derive(Debug, Deserialize)]
pub struct TmdbMovie {
    pub id: u64,
    pub title: String,
    pub release_date: Option<String>,
    pub poster_path: Option<String>,
    #[serde(default)]
    pub genre_ids: Vec<u32>,
    pub overview: Option<String>,
    pub vote_average: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct TmdbListResponse {
    #[serde(default)]
    results: Vec<TmdbMovie>,
}

#[derive(Debug, Deserialize)]
struct TmdbFindResponse {
    #[serde(default)]
    movie_results: Vec<TmdbMovie>,
}

#[derive(Debug, Deserialize)]
pub struct TmdbGenre {
    pub id: u32,
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct TmdbCastMember {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct TmdbCrewMember {
    pub name: String,
    pub job: String,
}

#[derive(Debug, Deserialize, Default)]
pub struct TmdbCredits {
    #[serde(default)]
    pub cast: Vec<TmdbCastMember>,
    #[serde(default)]
    pub crew: Vec<TmdbCrewMember>,
}

#[derive(Debug, Deserialize)]
pub struct TmdbMovieDetail {
    pub id: u64,
    pub title: String,
    pub release_date: Option<String>,
    pub poster_path: Option<String>,
    #[serde(default)]
    pub genres: Vec<TmdbGenre>,
    pub overview: Option<String>,
    pub runtime: Option<u32>,
    pub vote_average: Option<f64>,
    pub credits: Option<TmdbCredits>,
}

async fn get_json<T>(
    client: &Client,
    api_key: &str,
    language: &str,
    path: &str,
    params: &[(&str, &str)],
) -> Result<T>
where
    T: for<'de> Deserialize<'de>,
{
    let url = format!("{}{}", BASE_URL, path);
    let mut query: Vec<(&str, &str)> = vec![("api_key", api_key), ("language", language)];
    query.extend_from_slice(params);

    let response = client.get(&url).query(&query).send().await?;

    if !response.status().is_success() {
        return Err(anyhow!("TMDB returned {} for {}", response.status(), path));
    }

    Ok(response.json().await?)
}

pub async fn search(
    client: &Client,
    api_key: &str,
    language: &str,
    title: &str,
    year: Option<u16>,
) -> Result<Vec<TmdbMovie>> {
    let year_str = year.map(|y| y.to_string());
    let mut params = vec![("query", title)];
    if let Some(ref y) = year_str {
        params.push(("year", y));
    }

    let data: TmdbListResponse =
        get_json(client, api_key, language, "/search/movie", &params).await?;
    Ok(data.results)
}

pub async fn similar(
    client: &Client,
    api_key: &str,
    language: &str,
    native_id: &str,
) -> Result<Vec<TmdbMovie>> {
    let path = format!("/movie/{}/similar", native_id);
    let data: TmdbListResponse =
        get_json(client, api_key, language, &path, &[("page", "1")]).await?;
    Ok(data.results)
}

pub async fn recommendations(
    client: &Client,
    api_key: &str,
    language: &str,
    native_id: &str,
) -> Result<Vec<TmdbMovie>> {
    let path = format!("/movie/{}/recommendations", native_id);
    let data: TmdbListResponse =
        get_json(client, api_key, language, &path, &[("page", "1")]).await?;
    Ok(data.results)
}

pub async fn discover_by_genre(
    client: &Client,
    api_key: &str,
    language: &str,
    genre_id: u32,
) -> Result<Vec<TmdbMovie>> {
    let genre = genre_id.to_string();
    let params = [
        ("with_genres", genre.as_str()),
        ("sort_by", "popularity.desc"),
        ("page", "1"),
    ];
    let data: TmdbListResponse =
        get_json(client, api_key, language, "/discover/movie", &params).await?;
    Ok(data.results)
}

/// Resolve a TMDB movie via an external IMDB id.
pub async fn find_by_imdb_id(
    client: &Client,
    api_key: &str,
    language: &str,
    imdb_id: &str,
) -> Result<Option<TmdbMovie>> {
    let path = format!("/find/{}", urlencoding::encode(imdb_id));
    let data: TmdbFindResponse = get_json(
        client,
        api_key,
        language,
        &path,
        &[("external_source", "imdb_id")],
    )
    .await?;
    Ok(data.movie_results.into_iter().next())
}

pub async fn details(
    client: &Client,
    api_key: &str,
    language: &str,
    native_id: &str,
) -> Result<TmdbMovieDetail> {
    let path = format!("/movie/{}", native_id);
    get_json(
        client,
        api_key,
        language,
        &path,
        &[("append_to_response", "credits")],
    )
    .await
}

/// Year is the leading element of the release date; items without one, or
/// without a poster, are dropped rather than rendered half-empty.
fn release_year(release_date: Option<&str>) -> Option<String> {
    let year = release_date?.split('-').next()?;
    if year.len() == 4 && year.chars().all(|c| c.is_ascii_digit()) {
        Some(year.to_string())
    } else {
        None
    }
}

/// Convert an upstream list item to the canonical record shape.
pub fn convert_movie(movie: &TmdbMovie) -> Option<MovieRecord> {
    let poster = movie.poster_path.as_deref()?;
    let year = release_year(movie.release_date.as_deref())?;

    Some(MovieRecord {
        id: MovieId::tmdb(movie.id.to_string()),
        title: movie.title.clone(),
        year,
        poster_url: Some(format!("{}{}", IMAGE_BASE, poster)),
        genres: movie
            .genre_ids
            .iter()
            .filter_map(|id| genre_name(*id))
            .map(str::to_string)
            .collect(),
    })
}

/// The detail view tolerates gaps the list view filters out.
pub fn convert_detail(detail: &TmdbMovieDetail) -> MovieDetails {
    let credits = detail.credits.as_ref();
    let director = credits.and_then(|c| {
        c.crew
            .iter()
            .find(|member| member.job == "Director")
            .map(|member| member.name.clone())
    });
    let writers = credits
        .map(|c| {
            c.crew
                .iter()
                .filter(|member| matches!(member.job.as_str(), "Screenplay" | "Writer" | "Story"))
                .map(|member| member.name.clone())
                .collect()
        })
        .unwrap_or_default();
    let cast = credits
        .map(|c| {
            c.cast
                .iter()
                .take(8)
                .map(|member| member.name.clone())
                .collect()
        })
        .unwrap_or_default();

    MovieDetails {
        movie: MovieRecord {
            id: MovieId::tmdb(detail.id.to_string()),
            title: detail.title.clone(),
            year: release_year(detail.release_date.as_deref())
                .unwrap_or_else(|| "N/A".to_string()),
            poster_url: detail
                .poster_path
                .as_deref()
                .map(|p| format!("{}{}", IMAGE_BASE, p)),
            genres: detail.genres.iter().map(|g| g.name.clone()).collect(),
        },
        overview: detail.overview.clone().filter(|s| !s.is_empty()),
        runtime_minutes: detail.runtime,
        rating: detail.vote_average,
        released: detail.release_date.clone().filter(|s| !s.is_empty()),
        cast,
        director,
        writers,
    }
}
