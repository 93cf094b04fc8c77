//! Decoding of the analytics API's GraphQL response envelope.
//!
//! The wire shape is the envelope's concern alone; extractors only ever see
//! rows or a failure. A success envelope nests rows under
//! `data.actor.nrql.results`; an application error carries a structured
//! `errors` array alongside a 200 status.

use serde::Deserialize;
use trawl_types::ResultSet;

/// Outcome of decoding an envelope body.
#[derive(Debug)]
pub(crate) enum Decoded {
    /// The query executed; rows may be empty.
    Rows(ResultSet),
    /// The remote source reported an application-level error.
    RemoteError(String),
}

/// Top-level response envelope.
#[derive(Debug, Deserialize)]
pub(crate) struct QueryEnvelope {
    #[serde(default)]
    errors: Vec<ApiError>,
    data: Option<EnvelopeData>,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    message: String,
}

#[derive(Debug, Deserialize)]
struct EnvelopeData {
    actor: Option<Actor>,
}

#[derive(Debug, Deserialize)]
struct Actor {
    nrql: Option<NrqlResult>,
}

#[derive(Debug, Deserialize)]
struct NrqlResult {
    #[serde(default)]
    results: ResultSet,
}

impl QueryEnvelope {
    /// Decodes the envelope into rows or a remote error.
    ///
    /// A structured error takes precedence over any partial `data` the
    /// envelope may also carry. A missing results path is a malformed
    /// envelope, reported through `Err`.
    pub(crate) fn decode(self) -> Result<Decoded, String> {
        if let Some(error) = self.errors.into_iter().next() {
            return Ok(Decoded::RemoteError(error.message));
        }
        let results = self
            .data
            .and_then(|data| data.actor)
            .and_then(|actor| actor.nrql)
            .map(|nrql| nrql.results);
        match results {
            Some(rows) => Ok(Decoded::Rows(rows)),
            None => Err("response missing data.actor.nrql.results".to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn decode(value: serde_json::Value) -> Result<Decoded, String> {
        let envelope: QueryEnvelope = serde_json::from_value(value).unwrap();
        envelope.decode()
    }

    #[test]
    fn test_decode_rows() {
        let decoded = decode(json!({
            "data": { "actor": { "nrql": { "results": [
                { "store": 42, "sbu": "CT" },
                { "store": 17, "sbu": "PH" }
            ] } } }
        }))
        .unwrap();

        match decoded {
            Decoded::Rows(rows) => {
                assert_eq!(rows.len(), 2);
                assert_eq!(rows[0]["store"], json!(42));
            }
            Decoded::RemoteError(message) => panic!("unexpected error: {message}"),
        }
    }

    #[test]
    fn test_decode_empty_results_is_not_an_error() {
        let decoded = decode(json!({
            "data": { "actor": { "nrql": { "results": [] } } }
        }))
        .unwrap();

        assert!(matches!(decoded, Decoded::Rows(rows) if rows.is_empty()));
    }

    #[test]
    fn test_decode_remote_error() {
        let decoded = decode(json!({
            "errors": [
                { "message": "NRQL Syntax Error: unexpected token" },
                { "message": "secondary" }
            ]
        }))
        .unwrap();

        assert!(matches!(
            decoded,
            Decoded::RemoteError(message) if message.contains("Syntax Error")
        ));
    }

    #[test]
    fn test_decode_error_takes_precedence_over_data() {
        let decoded = decode(json!({
            "errors": [ { "message": "query limit exceeded" } ],
            "data": { "actor": { "nrql": { "results": [ { "store": 1 } ] } } }
        }))
        .unwrap();

        assert!(matches!(decoded, Decoded::RemoteError(_)));
    }

    #[test]
    fn test_decode_malformed_envelope() {
        assert!(decode(json!({ "data": {} })).is_err());
        assert!(decode(json!({})).is_err());
    }
}
