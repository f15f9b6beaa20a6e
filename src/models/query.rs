//! Traffic query model: raw input, its cache key form and inferred type

use std::borrow::Cow;
use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::TrafficError;

/// Namibian trunk/main/district route numbers such as `B1`, `C 28` or `A-2`
static ROUTE_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b[abc]\s*-?\s*\d{1,3}\b").expect("valid route pattern"));

/// Inbound request for a traffic status lookup
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrafficStatusRequest {
    #[serde(default)]
    pub query: String,
    /// Overrides the type inferred from the query text
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub query_type: Option<QueryType>,
}

impl TrafficStatusRequest {
    pub fn new<S: Into<String>>(query: S) -> Self {
        Self {
            query: query.into(),
            query_type: None,
        }
    }

    #[must_use]
    pub fn with_type(mut self, query_type: QueryType) -> Self {
        self.query_type = Some(query_type);
        self
    }
}

/// Shape of the place the user asked about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QueryType {
    Road,
    Area,
}

impl QueryType {
    /// Infer the query type from already-normalized text
    #[must_use]
    pub fn infer(normalized: &str) -> Self {
        if ROUTE_NUMBER.is_match(normalized)
            || normalized.contains("road")
            || normalized.contains("highway")
        {
            QueryType::Road
        } else {
            QueryType::Area
        }
    }
}

impl fmt::Display for QueryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryType::Road => f.write_str("road"),
            QueryType::Area => f.write_str("area"),
        }
    }
}

/// A user query in raw and canonical form
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrafficQuery {
    pub raw: String,
    /// Trimmed, whitespace-collapsed, lowercased form; doubles as the cache key
    pub normalized: String,
    #[serde(rename = "type")]
    pub query_type: QueryType,
}

impl TrafficQuery {
    /// Build a query from user input, rejecting blank text
    pub fn parse(raw: &str) -> crate::Result<Self> {
        Self::parse_with_type(raw, None)
    }

    /// Build a query, taking `query_type` over the inferred one when given
    pub fn parse_with_type(raw: &str, query_type: Option<QueryType>) -> crate::Result<Self> {
        let normalized = normalize(raw);
        if normalized.is_empty() {
            return Err(TrafficError::validation(
                "Query is required to check traffic status",
            ));
        }

        let query_type = query_type.unwrap_or_else(|| QueryType::infer(&normalized));
        Ok(Self {
            raw: raw.to_string(),
            normalized,
            query_type,
        })
    }

    /// The normalized text, qualified by the type when it differs from the
    /// inferred one. Normalized text never contains a tab.
    #[must_use]
    pub fn cache_key(&self) -> Cow<'_, str> {
        if self.query_type == QueryType::infer(&self.normalized) {
            Cow::Borrowed(&self.normalized)
        } else {
            Cow::Owned(format!("{}\t{}", self.normalized, self.query_type))
        }
    }
}

fn normalize(raw: &str) -> String {
    raw.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}
