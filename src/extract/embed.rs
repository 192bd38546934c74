//! Token embedding — splice the cached token into the context document's
//! token cache slot.

use crate::error::{CarveError, CarveResult};
use base64::prelude::BASE64_STANDARD;
use base64::Engine;
use serde_json::Value;
use tracing::debug;

/// Embed a cached token into the context document's `CacheData` slot.
///
/// The header and token JSON are concatenated and base64-encoded exactly as
/// they sat in memory, then written over
/// `Contexts[<id>].TokenCache.CacheData` for the first context id in the
/// document. The mutated document is re-serialized as compact UTF-8 JSON.
pub fn embed_cached_token(
    context_json: &[u8],
    header: &[u8],
    token_json: &[u8],
) -> CarveResult<Vec<u8>> {
    let mut blob = Vec::with_capacity(header.len() + token_json.len());
    blob.extend_from_slice(header);
    blob.extend_from_slice(token_json);
    let cache_data = BASE64_STANDARD.encode(&blob);

    // Re-parsed here so this step also stands alone; the extractor has
    // normally validated these bytes already.
    let mut doc: Value = serde_json::from_slice(context_json)
        .map_err(|e| CarveError::malformed_json("context document", e, context_json))?;

    let contexts = doc
        .get_mut("Contexts")
        .and_then(Value::as_object_mut)
        .ok_or(CarveError::NoContextsFound)?;

    // First key in insertion order; a single active context is assumed.
    let context_id = contexts
        .keys()
        .next()
        .cloned()
        .ok_or(CarveError::NoContextsFound)?;
    debug!(context_id = %context_id, "selected context for embedding");

    let entry = contexts
        .get_mut(&context_id)
        .ok_or(CarveError::NoContextsFound)?;
    let token_cache = entry
        .get_mut("TokenCache")
        .ok_or_else(|| {
            CarveError::UnexpectedShape(format!("context \"{context_id}\" has no TokenCache"))
        })?
        .as_object_mut()
        .ok_or_else(|| {
            CarveError::UnexpectedShape(format!(
                "TokenCache of context \"{context_id}\" is not an object"
            ))
        })?;

    match token_cache.get_mut("CacheData") {
        Some(Value::String(slot)) => *slot = cache_data,
        Some(_) => {
            return Err(CarveError::UnexpectedShape(format!(
                "CacheData of context \"{context_id}\" is not a string"
            )))
        }
        None => {
            return Err(CarveError::UnexpectedShape(format!(
                "TokenCache of context \"{context_id}\" has no CacheData"
            )))
        }
    }

    serde_json::to_vec(&doc).map_err(|e| CarveError::Io(e.into()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CarveError;
    use base64::prelude::BASE64_STANDARD;
    use base64::Engine;

    const CONTEXT: &[u8] = br#"{"Contexts":{"abc":{"Account":"user@example.com","TokenCache":{"CacheData":""}}},"ExtendedProperties":{}}"#;

    fn cache_data(doc: &[u8]) -> String {
        let v: serde_json::Value = serde_json::from_slice(doc).unwrap();
        v["Contexts"]["abc"]["TokenCache"]["CacheData"]
            .as_str()
            .unwrap()
            .to_string()
    }

    #[test]
    fn test_base64_round_trip() {
        let header = b"\x03\x00\x00\x00sig:::0ab";
        let token = br#"{"token":"xyz"}"#;
        let out = embed_cached_token(CONTEXT, header, token).unwrap();

        let decoded = BASE64_STANDARD.decode(cache_data(&out)).unwrap();
        let mut expected = header.to_vec();
        expected.extend_from_slice(token);
        assert_eq!(decoded, expected);
    }

    #[test]
    fn test_other_fields_untouched() {
        let out = embed_cached_token(CONTEXT, b"hdr", br#"{"a":1}"#).unwrap();
        let v: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(v["Contexts"]["abc"]["Account"], "user@example.com");
        assert!(v["ExtendedProperties"].is_object());
    }

    #[test]
    fn test_embedding_twice_differs_only_in_cache_data() {
        let once = embed_cached_token(CONTEXT, b"hdr", br#"{"a":1}"#).unwrap();
        let twice = embed_cached_token(&once, b"hdr2", br#"{"a":2}"#).unwrap();

        let mut a: serde_json::Value = serde_json::from_slice(&once).unwrap();
        let mut b: serde_json::Value = serde_json::from_slice(&twice).unwrap();
        assert_ne!(cache_data(&once), cache_data(&twice));

        a["Contexts"]["abc"]["TokenCache"]["CacheData"] = serde_json::Value::String(String::new());
        b["Contexts"]["abc"]["TokenCache"]["CacheData"] = serde_json::Value::String(String::new());
        assert_eq!(a, b);
    }

    #[test]
    fn test_first_context_id_wins() {
        let context = br#"{"Contexts":{"first":{"TokenCache":{"CacheData":""}},"second":{"TokenCache":{"CacheData":""}}}}"#;
        let out = embed_cached_token(context, b"hdr", br#"{"a":1}"#).unwrap();
        let v: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_ne!(v["Contexts"]["first"]["TokenCache"]["CacheData"], "");
        assert_eq!(v["Contexts"]["second"]["TokenCache"]["CacheData"], "");
    }

    #[test]
    fn test_no_contexts_key() {
        let context = br#"{"Profile":{}}"#;
        assert!(matches!(
            embed_cached_token(context, b"h", b"{}"),
            Err(CarveError::NoContextsFound)
        ));
    }

    #[test]
    fn test_empty_contexts_map() {
        let context = br#"{"Contexts":{}}"#;
        assert!(matches!(
            embed_cached_token(context, b"h", b"{}"),
            Err(CarveError::NoContextsFound)
        ));
    }

    #[test]
    fn test_missing_token_cache() {
        let context = br#"{"Contexts":{"abc":{"Account":"x"}}}"#;
        assert!(matches!(
            embed_cached_token(context, b"h", b"{}"),
            Err(CarveError::UnexpectedShape(_))
        ));
    }

    #[test]
    fn test_cache_data_not_a_string() {
        let context = br#"{"Contexts":{"abc":{"TokenCache":{"CacheData":42}}}}"#;
        assert!(matches!(
            embed_cached_token(context, b"h", b"{}"),
            Err(CarveError::UnexpectedShape(_))
        ));
    }

    #[test]
    fn test_malformed_context_bytes() {
        assert!(matches!(
            embed_cached_token(b"{not json", b"h", b"{}"),
            Err(CarveError::MalformedJson { .. })
        ));
    }
}
