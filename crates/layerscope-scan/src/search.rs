// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Case-insensitive search over extracted document text.
//
// Literal terms produce context snippets (`...30 chars | match | 30 chars...`);
// patterns produce the raw matched values. Both stop after five hits.

use layerscope_core::error::{LayerscopeError, Result};
use layerscope_core::types::{MAX_TEXT_MATCHES, SearchMode, SearchQuery};
use regex::{Regex, RegexBuilder};
use tracing::warn;

/// Characters of context kept on each side of a literal match.
pub const CONTEXT_CHARS: usize = 30;

/// Result of searching one document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchOutcome {
    pub matched: bool,
    /// At most [`MAX_TEXT_MATCHES`] entries.
    pub snippets: Vec<String>,
}

/// A query compiled once and applied to many documents.
///
/// An invalid pattern does not fail construction; it is reported by every
/// [`search`](Self::search) call so each document records the error.
#[derive(Debug, Clone)]
pub struct SearchEngine {
    mode: SearchMode,
    matcher: std::result::Result<Regex, String>,
}

impl SearchEngine {
    pub fn new(query: &SearchQuery) -> Self {
        let source = match query.mode() {
            SearchMode::Literal => regex::escape(query.term()),
            SearchMode::Pattern => query.term().to_string(),
        };
        let matcher = RegexBuilder::new(&source)
            .case_insensitive(true)
            .build()
            .map_err(|err| err.to_string());
        if let Err(err) = &matcher {
            warn!(term = query.term(), %err, "Search pattern rejected");
        }
        Self {
            mode: query.mode(),
            matcher,
        }
    }

    /// Search `text`.
    ///
    /// # Errors
    ///
    /// [`LayerscopeError::InvalidPattern`] when the query is not a valid
    /// regular expression.
    pub fn search(&self, text: &str) -> Result<SearchOutcome> {
        let regex = self
            .matcher
            .as_ref()
            .map_err(|err| LayerscopeError::InvalidPattern(err.clone()))?;

        let snippets: Vec<String> = match self.mode {
            SearchMode::Literal => regex
                .find_iter(text)
                .take(MAX_TEXT_MATCHES)
                .map(|found| context_snippet(text, found.start(), found.end()))
                .collect(),
            SearchMode::Pattern => regex
                .find_iter(text)
                .take(MAX_TEXT_MATCHES)
                .map(|found| found.as_str().to_string())
                .collect(),
        };

        Ok(SearchOutcome {
            matched: !snippets.is_empty(),
            snippets,
        })
    }
}

/// One-shot search, compiling the query for a single text.
pub fn search(text: &str, query: &SearchQuery) -> Result<SearchOutcome> {
    SearchEngine::new(query).search(text)
}

/// Up to [`CONTEXT_CHARS`] characters either side of `start..end`, line
/// breaks flattened to spaces, wrapped in ellipses.
fn context_snippet(text: &str, start: usize, end: usize) -> String {
    let from = text[..start]
        .char_indices()
        .rev()
        .nth(CONTEXT_CHARS - 1)
        .map_or(0, |(index, _)| index);
    let to = text[end..]
        .char_indices()
        .nth(CONTEXT_CHARS)
        .map_or(text.len(), |(index, _)| end + index);

    let context: String = text[from..to]
        .chars()
        .map(|c| if c == '\n' || c == '\r' { ' ' } else { c })
        .collect();
    format!("...{}...", context)
}
