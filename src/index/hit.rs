//! Index response payloads

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// One matched document as returned by the index.
///
/// `_source` and `highlight` are kept as raw JSON so that a document with an
/// unexpected field type never fails decoding of the whole page.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RawHit {
    #[serde(rename = "_id", default)]
    pub id: Option<String>,
    #[serde(rename = "_score", default)]
    pub score: Option<f64>,
    #[serde(rename = "_source", default)]
    pub source: Value,
    #[serde(default)]
    pub highlight: Value,
}

impl RawHit {
    /// String value of a top-level source field
    pub fn source_str(&self, field: &str) -> Option<&str> {
        self.source.get(field).and_then(Value::as_str)
    }

    /// String value of a nested source field, e.g. `metadata.site_name`
    pub fn source_path_str(&self, path: &[&str]) -> Option<&str> {
        path.iter()
            .try_fold(&self.source, |value, key| value.get(key))
            .and_then(Value::as_str)
    }

    /// Numeric value of a source field
    pub fn source_f64(&self, field: &str) -> Option<f64> {
        self.source.get(field).and_then(Value::as_f64)
    }

    /// First highlight fragment of a field
    pub fn fragment(&self, field: &str) -> Option<&str> {
        self.highlight
            .get(field)
            .and_then(Value::as_array)
            .and_then(|fragments| fragments.first())
            .and_then(Value::as_str)
    }
}

/// Decoded `_search` response
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IndexResponse {
    /// Server-side processing time in milliseconds
    pub took: Option<u64>,
    /// Number of matching documents across all pages
    pub total: u64,
    /// Hits of the requested page, in relevance order
    pub hits: Vec<RawHit>,
}

impl<'de> Deserialize<'de> for IndexResponse {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        struct Wire {
            took: Option<u64>,
            hits: WireHits,
        }

        #[derive(Deserialize)]
        struct WireHits {
            #[serde(default)]
            total: Option<TotalHits>,
            #[serde(default)]
            hits: Vec<RawHit>,
        }

        let wire = Wire::deserialize(deserializer)?;
        let total = match wire.hits.total {
            Some(TotalHits::Object { value }) | Some(TotalHits::Count(value)) => value,
            None => wire.hits.hits.len() as u64,
        };

        Ok(Self {
            took: wire.took,
            total,
            hits: wire.hits.hits,
        })
    }
}

/// `hits.total` is an object on current clusters and a bare number on old ones
#[derive(Deserialize)]
#[serde(untagged)]
enum TotalHits {
    Object { value: u64 },
    Count(u64),
}

/// `_cluster/health` reply; only the status matters here
#[derive(Debug, Clone, Deserialize)]
pub struct ClusterHealth {
    pub status: String,
}

impl ClusterHealth {
    /// Green and yellow clusters can serve queries
    pub fn is_healthy(&self) -> bool {
        matches!(self.status.as_str(), "green" | "yellow")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_search_response() {
        let body = json!({
            "took": 4,
            "hits": {
                "total": { "value": 25, "relation": "eq" },
                "hits": [
                    {
                        "_id": "https://example.com/a",
                        "_score": 3.5,
                        "_source": { "title": "A", "page_rank": 0.2 },
                        "highlight": { "title": ["<b>A</b>"] }
                    },
                    { "_id": "b", "_score": null, "_source": { "title": "B" } }
                ]
            }
        });

        let response: IndexResponse = serde_json::from_value(body).unwrap();
        assert_eq!(response.took, Some(4));
        assert_eq!(response.total, 25);
        assert_eq!(response.hits.len(), 2);
        assert_eq!(response.hits[0].fragment("title"), Some("<b>A</b>"));
        assert_eq!(response.hits[0].source_f64("page_rank"), Some(0.2));
        assert_eq!(response.hits[1].score, None);
        assert_eq!(response.hits[1].fragment("title"), None);
    }

    #[test]
    fn test_decode_legacy_total() {
        let body = json!({ "took": 1, "hits": { "total": 3, "hits": [] } });
        let response: IndexResponse = serde_json::from_value(body).unwrap();
        assert_eq!(response.total, 3);
    }

    #[test]
    fn test_malformed_source_fields_do_not_fail_decoding() {
        let body = json!({
            "hits": {
                "total": { "value": 1 },
                "hits": [{ "_source": { "page_rank": "high", "metadata": 7 } }]
            }
        });
        let response: IndexResponse = serde_json::from_value(body).unwrap();
        let hit = &response.hits[0];
        assert_eq!(hit.source_f64("page_rank"), None);
        assert_eq!(hit.source_path_str(&["metadata", "site_name"]), None);
    }

    #[test]
    fn test_cluster_health() {
        for (status, healthy) in [("green", true), ("yellow", true), ("red", false), ("", false)] {
            let health = ClusterHealth {
                status: status.to_string(),
            };
            assert_eq!(health.is_healthy(), healthy, "status {status}");
        }
    }
}
