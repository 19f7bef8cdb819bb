//! Entertainment pipeline: movies, music and books with search links
//!
//! Not judged. The generator is asked for a fixed sectioned list and the
//! reply is parsed line by line; a missing section is an empty list.

use std::sync::Arc;

use tracing::debug;
use url::form_urlencoded;

use crate::core::generator::TextGenerator;
use crate::types::{BookLink, EntertainmentRecommendations, MovieLink, MusicLink};

/// Used when the generator returns nothing
pub const FALLBACK_ENTERTAINMENT: &str = "\
Movies/Series:
Taare Zameen Par
Piku

Music:
Soulmate - Badshah
Tum Aa Gaye Ho - Rahat Fateh Ali Khan

Books:
The Alchemist - Paulo Coelho
Midnight's Children - Salman Rushdie
";

const ITEM_SEPARATOR: &str = " - ";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Movies,
    Music,
    Books,
}

impl Section {
    fn from_header(line: &str) -> Option<Self> {
        match line.trim().to_lowercase().as_str() {
            "movies/series:" => Some(Section::Movies),
            "music:" => Some(Section::Music),
            "books:" => Some(Section::Books),
            _ => None,
        }
    }
}

#[derive(Clone)]
pub struct EntertainmentPipeline {
    generator: Arc<dyn TextGenerator>,
}

impl EntertainmentPipeline {
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self { generator }
    }

    pub fn build_prompt(&self, emotion: &str, confidence: f64, user_text: &str) -> String {
        format!(
            "You are an entertainment recommendation expert.\n\
             Based on this emotional analysis:\n\
             - Emotion: {emotion}\n\
             - Confidence: {confidence:.2}\n\
             - User Text: \"{user_text}\"\n\
             \n\
             Provide recommendations in this exact format:\n\
             \n\
             Movies/Series:\n\
             [Movie/Series Name 1]\n\
             [Movie/Series Name 2]\n\
             \n\
             Music:\n\
             [Song Title] - [Artist Name]\n\
             [Song Title] - [Artist Name]\n\
             \n\
             Books:\n\
             [Book Title] - [Author Name]\n\
             [Book Title] - [Author Name]\n\
             \n\
             Do not add any other text, explanations, or numbering. \
             Only provide names in the exact format shown.\n",
        )
    }

    pub fn recommend(&self, emotion: &str, confidence: f64, user_text: &str) -> EntertainmentRecommendations {
        let prompt = self.build_prompt(emotion, confidence, user_text);
        let text = match self.generator.generate(&prompt) {
            Some(text) => text,
            None => {
                debug!(emotion, "entertainment generation unavailable, using fallback list");
                FALLBACK_ENTERTAINMENT.to_string()
            }
        };
        let parsed = parse_recommendations(&text);
        debug!(
            emotion,
            movies = parsed.movies.len(),
            music = parsed.music.len(),
            books = parsed.books.len(),
            "entertainment recommendations"
        );
        parsed
    }
}

/// Parse a sectioned list. Headers are case-insensitive; template
/// placeholders (`[...]`) are skipped; music and book lines need `Title - Name`.
pub fn parse_recommendations(text: &str) -> EntertainmentRecommendations {
    let mut out = EntertainmentRecommendations::default();
    let mut section = None;

    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if let Some(next) = Section::from_header(line) {
            section = Some(next);
            continue;
        }
        if line.starts_with('[') || line.starts_with(']') {
            continue;
        }

        match section {
            Some(Section::Movies) => out.movies.push(movie_link(line)),
            Some(Section::Music) => {
                if let Some((title, artist)) = split_item(line) {
                    out.music.push(music_link(title, artist));
                }
            }
            Some(Section::Books) => {
                if let Some((title, author)) = split_item(line) {
                    out.books.push(book_link(title, author));
                }
            }
            None => {}
        }
    }
    out
}

fn split_item(line: &str) -> Option<(&str, &str)> {
    let (title, name) = line.split_once(ITEM_SEPARATOR)?;
    let name = name.trim();
    Some((title.trim(), if name.is_empty() { "Unknown" } else { name }))
}

/// Percent-encode a search query (spaces as `%20`)
pub fn encode_query(query: &str) -> String {
    form_urlencoded::byte_serialize(query.as_bytes())
        .collect::<String>()
        .replace('+', "%20")
}

pub fn movie_link(title: &str) -> MovieLink {
    let q = encode_query(title);
    MovieLink {
        title: title.to_string(),
        imdb: format!("https://www.imdb.com/find?q={q}&s=t"),
        netflix: format!("https://www.netflix.com/search?q={q}"),
        youtube: format!("https://www.youtube.com/results?search_query={q}+full+movie"),
        google: format!("https://www.google.com/search?q={q}+movie"),
    }
}

pub fn music_link(title: &str, artist: &str) -> MusicLink {
    let q = encode_query(&format!("{title} {artist}"));
    MusicLink {
        title: title.to_string(),
        artist: artist.to_string(),
        spotify: format!("https://open.spotify.com/search/{q}"),
        youtube: format!("https://www.youtube.com/results?search_query={q}"),
        apple_music: format!("https://music.apple.com/search?term={q}"),
        google_play: format!("https://play.google.com/store/music/search?q={q}"),
    }
}

pub fn book_link(title: &str, author: &str) -> BookLink {
    let q = encode_query(&format!("{title} {author}"));
    BookLink {
        title: title.to_string(),
        author: author.to_string(),
        goodreads: format!("https://www.goodreads.com/search?q={q}"),
        amazon: format!("https://www.amazon.com/s?k={q}+book"),
        google_books: format!("https://books.google.com/books?q={q}"),
        kindle: format!("https://www.amazon.com/s?k={q}+kindle"),
    }
}

// =============================================================================
// TESTS
// =============================================================================
