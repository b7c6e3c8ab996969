/// TMDB's static movie genre table.
pub const TMDB_GENRES: &[(&str, u32)] = &[
    ("Action", 28),
    ("Adventure", 12),
    ("Animation", 16),
    ("Comedy", 35),
    ("Crime", 80),
    ("Documentary", 99),
    ("Drama", 18),
    ("Family", 10751),
    ("Fantasy", 14),
    ("History", 36),
    ("Horror", 27),
    ("Music", 10402),
    ("Mystery", 9648),
    ("Romance", 10749),
    ("Science Fiction", 878),
    ("TV Movie", 10770),
    ("Thriller", 53),
    ("War", 10752),
    ("Western", 37),
];

/// Drama, the fallback when a genre name has no match.
pub const DEFAULT_GENRE_ID: u32 = 18;

/// Exact case-insensitive name match against the static table. Never fails.
pub fn resolve_genre_id(name: &str) -> u32 {
    TMDB_GENRES
        .iter()
        .find(|(genre, _)| genre.eq_ignore_ascii_case(name))
        .map(|(_, id)| *id)
        .unwrap_or(DEFAULT_GENRE_ID)
}

pub fn genre_name(id: u32) -> Option<&'static str> {
    TMDB_GENRES
        .iter()
        .find(|(_, genre_id)| *genre_id == id)
        .map(|(name, _)| *name)
}
