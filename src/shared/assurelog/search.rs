//! Search Data Structures

use serde::{Deserialize, Serialize};

/// What a quick-search hit points at
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SearchHitKind {
    Report,
    TestCase,
}

impl SearchHitKind {
    pub fn label(&self) -> &'static str {
        match self {
            SearchHitKind::Report => "Relatório",
            SearchHitKind::TestCase => "Caso de Teste",
        }
    }
}

/// One quick-search result
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SearchHit {
    #[serde(rename = "type")]
    pub kind: SearchHitKind,
    /// Report id for report hits; the owning report's id for test case hits
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub subtitle: Option<String>,
}

/// Quick search answers with either a bare list or `{ "results": [...] }`
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum QuickSearchResponse {
    List(Vec<SearchHit>),
    Wrapped { results: Vec<SearchHit> },
}

impl QuickSearchResponse {
    pub fn into_hits(self) -> Vec<SearchHit> {
        match self {
            Self::List(hits) | Self::Wrapped { results: hits } => hits,
        }
    }
}

/// Value lists offered by the report filter dropdowns
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchSuggestions {
    pub responsible: Vec<String>,
    pub status: Vec<String>,
    pub feature: Vec<String>,
    pub environment: Vec<String>,
}

impl SearchSuggestions {
    /// Lenient extraction: a missing or malformed list is empty, and
    /// non-string entries are skipped
    pub fn from_value(value: &serde_json::Value) -> Self {
        let list = |key: &str| -> Vec<String> {
            value
                .get(key)
                .and_then(|v| v.as_array())
                .map(|items| {
                    items
                        .iter()
                        .filter_map(|item| item.as_str().map(str::to_string))
                        .collect()
                })
                .unwrap_or_default()
        };
        Self {
            responsible: list("responsible"),
            status: list("status"),
            feature: list("feature"),
            environment: list("environment"),
        }
    }
}
