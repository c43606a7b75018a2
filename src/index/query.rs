//! Index query construction
//!
//! Turns a [`SearchQuery`] into the Elasticsearch request body: a weighted
//! multi-field match, authority boosts, a stable sort and highlighting.

use crate::config::SearchSettings;
use crate::error::SearchError;
use crate::search::SearchQuery;
use serde_json::{json, Value};

/// Searched fields and their boosts, strongest first
pub const FIELD_BOOSTS: &[(&str, f64)] = &[
    ("title", 4.0),
    ("meta_title", 3.0),
    ("meta_description", 2.5),
    ("content_summary", 2.0),
    ("body", 1.0),
];

/// Share of the non-best field scores added to the best one
pub const TIE_BREAKER: f64 = 0.3;

/// Share of query terms a document must match
pub const MINIMUM_SHOULD_MATCH: &str = "80%";

/// Character budget of description and body highlight fragments
pub const FRAGMENT_SIZE: u32 = 200;

pub const HIGHLIGHT_PRE_TAG: &str = "<b>";
pub const HIGHLIGHT_POST_TAG: &str = "</b>";

/// A fully built index request
#[derive(Debug, Clone, PartialEq)]
pub struct IndexRequest {
    /// Offset of the first hit
    pub from: u64,
    /// Number of hits requested
    pub size: u32,
    /// Request body sent to `_search`
    pub body: Value,
}

/// Builds index requests within the configured pagination limits
#[derive(Debug, Clone)]
pub struct QueryBuilder {
    max_page_size: u32,
    max_result_window: u64,
}

impl QueryBuilder {
    pub fn new(max_page_size: u32, max_result_window: u64) -> Self {
        Self {
            max_page_size,
            max_result_window,
        }
    }

    pub fn from_settings(settings: &SearchSettings) -> Self {
        Self::new(settings.max_page_size, settings.max_result_window)
    }

    /// Build the request for one page of results
    pub fn build(&self, query: &SearchQuery) -> Result<IndexRequest, SearchError> {
        let size = query.page_size();
        if size > self.max_page_size {
            return Err(SearchError::InvalidQuery(format!(
                "size must not exceed {}",
                self.max_page_size
            )));
        }

        let from = query.offset();
        if from + u64::from(size) > self.max_result_window {
            return Err(SearchError::InvalidQuery(format!(
                "cannot page beyond the first {} results",
                self.max_result_window
            )));
        }

        let fields: Vec<String> = FIELD_BOOSTS
            .iter()
            .map(|(field, boost)| format!("{}^{}", field, boost))
            .collect();

        let body = json!({
            "query": {
                "bool": {
                    "must": {
                        "multi_match": {
                            "query": query.text(),
                            "fields": fields,
                            "type": "best_fields",
                            "tie_breaker": TIE_BREAKER,
                            "minimum_should_match": MINIMUM_SHOULD_MATCH
                        }
                    },
                    "should": [
                        { "exists": { "field": "page_rank", "boost": 1.5 } },
                        { "range": { "page_rank": { "gt": 0, "boost": 2.0 } } }
                    ]
                }
            },
            "from": from,
            "size": size,
            "sort": [
                "_score",
                { "page_rank": { "order": "desc", "missing": "_last" } }
            ],
            "highlight": {
                "pre_tags": [HIGHLIGHT_PRE_TAG],
                "post_tags": [HIGHLIGHT_POST_TAG],
                "fields": {
                    "title": { "number_of_fragments": 0, "type": "unified" },
                    "meta_description": {
                        "number_of_fragments": 1,
                        "fragment_size": FRAGMENT_SIZE,
                        "type": "unified"
                    },
                    "body": {
                        "number_of_fragments": 1,
                        "fragment_size": FRAGMENT_SIZE,
                        "type": "unified"
                    }
                }
            }
        });

        Ok(IndexRequest { from, size, body })
    }
}

impl Default for QueryBuilder {
    fn default() -> Self {
        Self::from_settings(&SearchSettings::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build(text: &str, page: u32, size: u32) -> IndexRequest {
        let query = SearchQuery::new(text, page, size).unwrap();
        QueryBuilder::default().build(&query).unwrap()
    }

    #[test]
    fn test_pagination_offsets() {
        let request = build("rust", 2, 10);
        assert_eq!(request.from, 10);
        assert_eq!(request.size, 10);
        assert_eq!(request.body["from"], 10);
        assert_eq!(request.body["size"], 10);

        let first = build("rust", 1, 25);
        assert_eq!(first.body["from"], 0);
    }

    #[test]
    fn test_field_boosts_ordered_title_first() {
        let request = build("rust", 1, 10);
        let multi = &request.body["query"]["bool"]["must"]["multi_match"];

        let fields: Vec<&str> = multi["fields"]
            .as_array()
            .unwrap()
            .iter()
            .map(|f| f.as_str().unwrap())
            .collect();
        assert_eq!(
            fields,
            vec![
                "title^4",
                "meta_title^3",
                "meta_description^2.5",
                "content_summary^2",
                "body^1"
            ]
        );
        assert!(FIELD_BOOSTS.windows(2).all(|w| w[0].1 > w[1].1));

        assert_eq!(multi["query"], "rust");
        assert_eq!(multi["type"], "best_fields");
        assert_eq!(multi["minimum_should_match"], "80%");
        let tie = multi["tie_breaker"].as_f64().unwrap();
        assert!((tie - 0.3).abs() < 1e-6);
    }

    #[test]
    fn test_authority_boosts_and_sort() {
        let request = build("rust", 1, 10);
        let should = request.body["query"]["bool"]["should"].as_array().unwrap();
        assert_eq!(should[0]["exists"]["field"], "page_rank");
        assert_eq!(should[1]["range"]["page_rank"]["gt"], 0);
        assert!(
            should[1]["range"]["page_rank"]["boost"].as_f64().unwrap()
                > should[0]["exists"]["boost"].as_f64().unwrap()
        );

        let sort = request.body["sort"].as_array().unwrap();
        assert_eq!(sort[0], "_score");
        assert_eq!(sort[1]["page_rank"]["order"], "desc");
        assert_eq!(sort[1]["page_rank"]["missing"], "_last");
    }

    #[test]
    fn test_highlight_fields() {
        let request = build("rust", 1, 10);
        let highlight = &request.body["highlight"];
        assert_eq!(highlight["pre_tags"][0], "<b>");
        assert_eq!(highlight["post_tags"][0], "</b>");
        assert_eq!(highlight["fields"]["title"]["number_of_fragments"], 0);
        assert_eq!(highlight["fields"]["body"]["fragment_size"], 200);
        assert_eq!(highlight["fields"]["body"]["number_of_fragments"], 1);
        assert_eq!(highlight["fields"]["meta_description"]["fragment_size"], 200);
    }

    #[test]
    fn test_rejects_oversized_page() {
        let query = SearchQuery::new("rust", 1, 500).unwrap();
        let result = QueryBuilder::new(100, 10_000).build(&query);
        assert!(matches!(result, Err(SearchError::InvalidQuery(_))));
    }

    #[test]
    fn test_rejects_pages_beyond_result_window() {
        let query = SearchQuery::new("rust", 1001, 10).unwrap();
        let result = QueryBuilder::new(100, 10_000).build(&query);
        assert!(matches!(result, Err(SearchError::InvalidQuery(_))));

        let last = SearchQuery::new("rust", 1000, 10).unwrap();
        assert!(QueryBuilder::new(100, 10_000).build(&last).is_ok());
    }
}
