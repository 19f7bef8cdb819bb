//! Entertainment recommendation types (titles plus search links)

use serde::{Deserialize, Serialize};

/// A movie or series with search links
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieLink {
    pub title: String,
    pub imdb: String,
    pub netflix: String,
    pub youtube: String,
    pub google: String,
}

/// A song with search links
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MusicLink {
    pub title: String,
    pub artist: String,
    pub spotify: String,
    pub youtube: String,
    pub apple_music: String,
    pub google_play: String,
}

/// A book with search links
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookLink {
    pub title: String,
    pub author: String,
    pub goodreads: String,
    pub amazon: String,
    pub google_books: String,
    pub kindle: String,
}

/// Parsed entertainment recommendations. A missing section is an empty list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EntertainmentRecommendations {
    pub movies: Vec<MovieLink>,
    pub music: Vec<MusicLink>,
    pub books: Vec<BookLink>,
}

impl EntertainmentRecommendations {
    pub fn is_empty(&self) -> bool {
        self.movies.is_empty() && self.music.is_empty() && self.books.is_empty()
    }
}
