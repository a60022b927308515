use rand::seq::SliceRandom;

use super::core::{load_embedded, Difficulty, Snippet, SnippetError};

/// Supplies snippets on request, optionally filtered
pub trait SnippetSource {
    /// Pick a snippet matching both filters, falling back to the first
    /// snippet of the source when nothing matches.
    fn pick(&self, language: Option<&str>, difficulty: Option<Difficulty>) -> Snippet;
}

/// Snippet corpus held in memory
#[derive(Debug, Clone)]
pub struct SnippetLibrary {
    snippets: Vec<Snippet>,
}

impl SnippetLibrary {
    /// Corpus compiled into the binary
    pub fn embedded() -> Result<Self, SnippetError> {
        Self::from_snippets(load_embedded()?)
    }

    pub fn from_snippets(snippets: Vec<Snippet>) -> Result<Self, SnippetError> {
        if snippets.is_empty() {
            return Err(SnippetError::Empty);
        }
        Ok(Self { snippets })
    }

    pub fn get(&self, id: &str) -> Option<&Snippet> {
        self.snippets.iter().find(|s| s.id == id)
    }

    pub fn by_language<'a>(&'a self, language: &'a str) -> impl Iterator<Item = &'a Snippet> {
        self.snippets.iter().filter(move |s| s.language == language)
    }

    pub fn by_difficulty(&self, difficulty: Difficulty) -> impl Iterator<Item = &Snippet> {
        self.snippets
            .iter()
            .filter(move |s| s.difficulty == difficulty)
    }

    fn matching(&self, language: Option<&str>, difficulty: Option<Difficulty>) -> Vec<&Snippet> {
        self.snippets
            .iter()
            .filter(|s| language.map_or(true, |l| s.language == l))
            .filter(|s| difficulty.map_or(true, |d| s.difficulty == d))
            .collect()
    }
}

impl SnippetSource for SnippetLibrary {
    fn pick(&self, language: Option<&str>, difficulty: Option<Difficulty>) -> Snippet {
        let candidates = self.matching(language, difficulty);
        let mut rng = rand::thread_rng();

        match candidates.choose(&mut rng) {
            Some(snippet) => (*snippet).clone(),
            None => {
                tracing::debug!(?language, ?difficulty, "no snippet matches filters");
                self.snippets[0].clone()
            }
        }
    }
}

/// Always hands out the same snippet; used for `--prompt`
#[derive(Debug, Clone)]
pub struct FixedSource(pub Snippet);

impl SnippetSource for FixedSource {
    fn pick(&self, _language: Option<&str>, _difficulty: Option<Difficulty>) -> Snippet {
        self.0.clone()
    }
}
