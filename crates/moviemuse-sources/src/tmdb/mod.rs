pub mod api;
pub mod genres;

pub use genres::{genre_name, resolve_genre_id, DEFAULT_GENRE_ID, TMDB_GENRES};
