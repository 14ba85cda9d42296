//! Verify build/parse methods against JSON test vectors stored in `test-vectors/`.
//!
//! Each vector describes a lookup, the expected request URL, a simulated
//! response, and either the expected result or the expected error. Results
//! are compared as typed values, not raw strings, so key order does not
//! matter.

use std::sync::Arc;

use ipstack_core::{
    ClientOption, Error, HttpRequest, HttpResponse, IpstackClient, LookupOptions, LookupResult,
    Transport, TransportError,
};

/// Fails every send; vectors never reach the network.
struct NoNetwork;

impl Transport for NoNetwork {
    fn send(&self, _request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        Err(TransportError::new("test vectors must not send requests"))
    }
}

fn client() -> IpstackClient {
    IpstackClient::new("vector-key", false, [ClientOption::Transport(Arc::new(NoNetwork))]).unwrap()
}

#[test]
fn lookup_test_vectors() {
    let raw = include_str!("../../test-vectors/lookup.json");
    let vectors: serde_json::Value = serde_json::from_str(raw).unwrap();

    let c = client();
    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let address = case["address"].as_str().unwrap();
        let options: Vec<LookupOptions> = serde_json::from_value(case["options"].clone()).unwrap();

        // Verify build
        let req = c.build_lookup(address, &options).unwrap();
        assert_eq!(req.url, case["expected_request"]["url"].as_str().unwrap(), "{name}: url");

        // Verify parse
        let sim = &case["simulated_response"];
        let response = HttpResponse {
            status: sim["status"].as_u64().unwrap() as u16,
            headers: Vec::new(),
            body: sim["body"].as_str().unwrap().as_bytes().to_vec(),
        };
        let result = c.parse_lookup(response);

        match case.get("expected_error") {
            Some(serde_json::Value::String(kind)) => {
                let err = result.unwrap_err();
                match kind.as_str() {
                    "Decode" => assert!(matches!(err, Error::Decode(_)), "{name}: expected Decode, got {err:?}"),
                    other => panic!("{name}: unknown expected_error: {other}"),
                }
            }
            Some(expected) => match result.unwrap_err() {
                Error::Api(api) => {
                    assert_eq!(api.kind().to_string(), expected["type"].as_str().unwrap(), "{name}: kind");
                    assert_eq!(i64::from(api.code()), expected["code"].as_i64().unwrap(), "{name}: code");
                    assert_eq!(api.success, Some(false), "{name}: success flag");
                }
                other => panic!("{name}: expected API error, got {other:?}"),
            },
            None => {
                let parsed = result.unwrap();
                let expected: LookupResult = serde_json::from_value(case["expected_result"].clone()).unwrap();
                assert_eq!(parsed, expected, "{name}: parsed result");
            }
        }
    }
}
