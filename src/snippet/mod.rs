pub mod core;
pub mod source;

// Re-export the main types for convenience
pub use core::{Difficulty, Language, Snippet, SnippetError};
pub use source::{FixedSource, SnippetLibrary, SnippetSource};
