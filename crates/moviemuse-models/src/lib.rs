pub mod feed;
pub mod movie;
pub mod movie_id;
pub mod review;
pub mod watchlist;

pub use feed::Feed;
pub use movie::{MovieDetails, MovieRecord};
pub use movie_id::{CatalogSource, MovieId, ParseMovieIdError};
pub use review::Review;
pub use watchlist::WatchlistEntry;
