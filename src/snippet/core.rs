use clap::ValueEnum;
use include_dir::{include_dir, Dir};
use serde::{Deserialize, Serialize};
use serde_json::from_str;

static SNIPPET_DIR: Dir = include_dir!("$CARGO_MANIFEST_DIR/src/snippets");

#[derive(Debug, thiserror::Error)]
pub enum SnippetError {
    #[error("snippet file {0} is not valid utf-8")]
    Encoding(String),
    #[error("unable to parse snippet file {file}: {source}")]
    Parse {
        file: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("snippet corpus is empty")]
    Empty,
}

#[derive(
    Debug,
    Copy,
    Clone,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    ValueEnum,
    strum_macros::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

/// Languages the embedded corpus ships snippets for
#[derive(
    Debug,
    Copy,
    Clone,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    ValueEnum,
    strum_macros::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Language {
    Javascript,
    Typescript,
    Python,
    Css,
    Rust,
}

impl Language {
    /// Tag used on [`Snippet::language`]
    pub fn as_tag(&self) -> String {
        self.to_string()
    }
}

/// A fixed piece of text to transcribe
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snippet {
    pub id: String,
    pub title: String,
    pub language: String,
    pub difficulty: Difficulty,
    pub body: String,
}

impl Snippet {
    /// Wrap free text given on the command line
    pub fn custom(body: impl Into<String>) -> Self {
        Self {
            id: "custom".to_string(),
            title: "Custom prompt".to_string(),
            language: "text".to_string(),
            difficulty: Difficulty::Easy,
            body: body.into(),
        }
    }

    /// Number of characters to type
    pub fn len(&self) -> usize {
        self.body.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }
}

#[derive(Deserialize)]
struct SnippetFile {
    language: String,
    snippets: Vec<SnippetEntry>,
}

#[derive(Deserialize)]
struct SnippetEntry {
    id: String,
    title: String,
    difficulty: Difficulty,
    body: String,
}

/// Load every snippet embedded in the binary, ordered by file name
pub fn load_embedded() -> Result<Vec<Snippet>, SnippetError> {
    let mut files: Vec<_> = SNIPPET_DIR
        .files()
        .filter(|f| f.path().extension().is_some_and(|ext| ext == "json"))
        .collect();
    files.sort_by_key(|f| f.path());

    let mut snippets = Vec::new();
    for file in files {
        let name = file.path().display().to_string();
        let contents = file
            .contents_utf8()
            .ok_or_else(|| SnippetError::Encoding(name.clone()))?;
        snippets.extend(parse_snippet_file(&name, contents)?);
    }

    if snippets.is_empty() {
        return Err(SnippetError::Empty);
    }
    Ok(snippets)
}

fn parse_snippet_file(name: &str, contents: &str) -> Result<Vec<Snippet>, SnippetError> {
    let file: SnippetFile = from_str(contents).map_err(|source| SnippetError::Parse {
        file: name.to_string(),
        source,
    })?;

    Ok(file
        .snippets
        .into_iter()
        .map(|entry| Snippet {
            id: entry.id,
            title: entry.title,
            language: file.language.clone(),
            difficulty: entry.difficulty,
            body: entry.body,
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_load_embedded() {
        let snippets = load_embedded().unwrap();
        assert!(!snippets.is_empty());

        for snippet in &snippets {
            assert!(!snippet.body.is_empty(), "{} has an empty body", snippet.id);
        }
    }

    #[test]
    fn test_embedded_ids_are_unique() {
        let snippets = load_embedded().unwrap();
        let ids: HashSet<_> = snippets.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids.len(), snippets.len());
    }

    #[test]
    fn test_every_language_has_every_difficulty() {
        let snippets = load_embedded().unwrap();
        for lang in Language::value_variants() {
            for diff in Difficulty::value_variants() {
                assert!(
                    snippets
                        .iter()
                        .any(|s| s.language == lang.as_tag() && s.difficulty == *diff),
                    "missing {lang} / {diff}"
                );
            }
        }
    }

    #[test]
    fn test_parse_snippet_file() {
        let json_data = r#"
        {
            "language": "go",
            "snippets": [
                { "id": "go-1", "title": "Hello", "difficulty": "medium", "body": "fmt.Println(\"hi\")\n" }
            ]
        }
        "#;

        let snippets = parse_snippet_file("go.json", json_data).unwrap();
        assert_eq!(snippets.len(), 1);
        assert_eq!(snippets[0].language, "go");
        assert_eq!(snippets[0].difficulty, Difficulty::Medium);
        assert_eq!(snippets[0].body, "fmt.Println(\"hi\")\n");
    }

    #[test]
    fn test_parse_snippet_file_rejects_unknown_difficulty() {
        let json_data = r#"{ "language": "go", "snippets": [
            { "id": "x", "title": "x", "difficulty": "insane", "body": "x" } ] }"#;

        let err = parse_snippet_file("go.json", json_data).unwrap_err();
        assert!(matches!(err, SnippetError::Parse { .. }));
    }

    #[test]
    fn test_difficulty_display() {
        assert_eq!(Difficulty::Easy.to_string(), "easy");
        assert_eq!(Difficulty::Medium.to_string(), "medium");
        assert_eq!(Difficulty::Hard.to_string(), "hard");
    }

    #[test]
    fn test_language_tag() {
        assert_eq!(Language::Javascript.as_tag(), "javascript");
        assert_eq!(Language::Css.as_tag(), "css");
    }

    #[test]
    fn test_custom_snippet() {
        let snippet = Snippet::custom("hi there");
        assert_eq!(snippet.len(), 8);
        assert_eq!(snippet.language, "text");
    }
}
