//! Response body shaping: the upstream payload with a `__meta` object injected.

use serde_json::{Map, Value, json};

use crate::swr::{Freshness, Served};
use crate::utils::iso_from_ms;

/// `Cache-Control` sent with every successful response.
pub const CACHE_CONTROL: &str = "public, max-age=60";

/// Build the response body.
///
/// Object payloads are flattened next to `__meta`; a payload field named
/// `__meta` replaces the injected one. Any other payload is nested under `data`.
pub fn render_body(served: &Served) -> Value {
    let mut body = Map::new();
    body.insert(
        "__meta".to_string(),
        json!({
            "cache_timestamp_ms": served.entry.timestamp,
            "cache_timestamp_iso": iso_from_ms(served.entry.timestamp),
            "freshness": served.freshness.as_str(),
        }),
    );

    match &served.entry.data {
        Value::Object(fields) => {
            body.extend(fields.iter().map(|(k, v)| (k.clone(), v.clone())));
        }
        other => {
            body.insert("data".to_string(), other.clone());
        }
    }

    Value::Object(body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::CacheEntry;

    fn served(data: Value, freshness: Freshness) -> Served {
        Served {
            entry: CacheEntry::new(data, 1_704_067_200_000),
            freshness,
        }
    }

    #[test]
    fn test_object_payload_is_merged_with_meta() {
        let body = render_body(&served(
            json!({"fields": [{"id": "aqi"}], "records": [{"aqi": "12"}]}),
            Freshness::Stale,
        ));

        assert_eq!(
            body,
            json!({
                "__meta": {
                    "cache_timestamp_ms": 1_704_067_200_000i64,
                    "cache_timestamp_iso": "2024-01-01T00:00:00.000Z",
                    "freshness": "stale"
                },
                "fields": [{"id": "aqi"}],
                "records": [{"aqi": "12"}]
            })
        );
    }

    #[test]
    fn test_payload_meta_field_wins() {
        let body = render_body(&served(json!({"__meta": "upstream"}), Freshness::Fresh));
        assert_eq!(body, json!({"__meta": "upstream"}));
    }

    #[test]
    fn test_non_object_payload_is_nested() {
        let body = render_body(&served(json!([1, 2, 3]), Freshness::Recent));
        assert_eq!(body["data"], json!([1, 2, 3]));
        assert_eq!(body["__meta"]["freshness"], json!("recent"));
    }

    #[test]
    fn test_unrepresentable_timestamp_renders_null_iso() {
        let served = Served {
            entry: CacheEntry::new(json!({"records": []}), i64::MIN),
            freshness: Freshness::Stale,
        };
        let body = render_body(&served);
        assert_eq!(
            body["__meta"],
            json!({
                "cache_timestamp_ms": i64::MIN,
                "cache_timestamp_iso": null,
                "freshness": "stale"
            })
        );
    }
}
