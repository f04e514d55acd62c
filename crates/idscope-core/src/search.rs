//! Pattern matching and ranking of identity search results.

use regex::{Regex, RegexBuilder};

use crate::types::BasicIdentityInfo;

/// Search key that does not compile as a pattern.
#[derive(Debug, Clone, thiserror::Error)]
#[error("Your search key may contain special characters. Please try escaping them for search. e.g., /*")]
pub struct PatternError {
    pub query: String,
    pub reason: String,
}

/// Case-insensitive pattern applied to identity fields.
#[derive(Debug, Clone)]
pub struct SearchPattern {
    regex: Regex,
}

impl SearchPattern {
    pub fn compile(query: &str) -> Result<Self, PatternError> {
        RegexBuilder::new(query)
            .case_insensitive(true)
            .build()
            .map(|regex| Self { regex })
            .map_err(|e| PatternError {
                query: query.to_string(),
                reason: e.to_string(),
            })
    }

    pub fn is_match(&self, text: &str) -> bool {
        self.regex.is_match(text)
    }

    /// True when any populated field of `info` matches.
    pub fn matches(&self, info: &BasicIdentityInfo) -> bool {
        info.searchable_fields().any(|field| self.is_match(field))
    }

    /// Order matches by their sort key.
    ///
    /// Records whose sort key itself matches come first; ties are broken
    /// by ascending sort key.
    pub fn rank(&self, infos: &mut [BasicIdentityInfo]) {
        infos.sort_by_cached_key(|info| {
            let key = info.sort_key();
            (!self.is_match(&key), key)
        });
    }

    /// Keep the matching records and rank them.
    pub fn filter_and_rank(&self, infos: Vec<BasicIdentityInfo>) -> Vec<BasicIdentityInfo> {
        let mut matches: Vec<BasicIdentityInfo> =
            infos.into_iter().filter(|info| self.matches(info)).collect();
        self.rank(&mut matches);
        matches
    }
}

/// Parse a query made only of ASCII digits as an account index.
pub fn parse_account_index(query: &str) -> Option<u32> {
    if query.is_empty() || !query.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    query.parse().ok()
}

/// A validated search request.
#[derive(Debug, Clone)]
pub enum SearchQuery {
    /// Blank query; behaves like a plain listing.
    All,
    /// Trimmed, non-blank query.
    Filter {
        /// Set when the query is a plain account index.
        index: Option<u32>,
        pattern: SearchPattern,
    },
}

impl SearchQuery {
    /// Trim and compile `query`. Fails before anything is fetched.
    pub fn parse(query: &str) -> Result<Self, PatternError> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(SearchQuery::All);
        }
        Ok(SearchQuery::Filter {
            index: parse_account_index(query),
            pattern: SearchPattern::compile(query)?,
        })
    }
}
