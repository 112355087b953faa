//! Verify build/parse methods against JSON test vectors stored in `test-vectors/`.
//!
//! Each vector file describes inputs, expected requests, simulated responses,
//! and expected parse results. Comparing parsed JSON (not raw strings) avoids
//! false negatives from field-ordering differences.

use moxi_events::{
    ApiError, Event, EventClient, EventGroup, EventSearch, HttpMethod, HttpRequest, HttpResponse,
    PlatformConfig,
};
use serde_json::Value;

const BASE_URL: &str = "http://localhost:3000";

fn client() -> EventClient {
    EventClient::new(&PlatformConfig::new("abc", "xyz").with_base_url(BASE_URL)).unwrap()
}

fn load(raw: &str) -> Vec<Value> {
    let vectors: Value = serde_json::from_str(raw).unwrap();
    vectors["cases"].as_array().unwrap().clone()
}

/// Parse the method string from test vectors into `HttpMethod`.
fn parse_method(s: &str) -> HttpMethod {
    match s {
        "GET" => HttpMethod::Get,
        "POST" => HttpMethod::Post,
        "PUT" => HttpMethod::Put,
        "DELETE" => HttpMethod::Delete,
        other => panic!("unknown method: {other}"),
    }
}

fn simulated_response(case: &Value) -> HttpResponse {
    let sim = &case["simulated_response"];
    HttpResponse {
        status: sim["status"].as_u64().unwrap() as u16,
        headers: Vec::new(),
        body: sim["body"].as_str().unwrap().to_string(),
    }
}

/// Check method, path, and (when the vector has them) headers and body.
fn assert_request(name: &str, req: &HttpRequest, expected: &Value) {
    let method = parse_method(expected["method"].as_str().unwrap());
    assert_eq!(req.method, method, "{name}: method");
    let path = format!("{BASE_URL}{}", expected["path"].as_str().unwrap());
    assert_eq!(req.path, path, "{name}: path");

    if let Some(headers) = expected.get("headers") {
        let expected_headers: Vec<(String, String)> = headers
            .as_array()
            .unwrap()
            .iter()
            .map(|h| {
                let arr = h.as_array().unwrap();
                (arr[0].as_str().unwrap().to_string(), arr[1].as_str().unwrap().to_string())
            })
            .collect();
        assert_eq!(req.headers, expected_headers, "{name}: headers");
    }

    match expected.get("body") {
        Some(body) => {
            let req_body: Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
            assert_eq!(&req_body, body, "{name}: body");
        }
        None => assert!(req.body.is_none(), "{name}: body should be None"),
    }
}

fn assert_expected_error(name: &str, case: &Value, err: ApiError) {
    match case["expected_error"].as_str().unwrap() {
        "NotFound" => assert!(matches!(err, ApiError::NotFound), "{name}: expected NotFound"),
        "RemoteRequestFailure" => assert!(
            matches!(err, ApiError::RemoteRequestFailure(_)),
            "{name}: expected RemoteRequestFailure, got {err:?}"
        ),
        other => panic!("{name}: unknown expected_error: {other}"),
    }
}

// ---------------------------------------------------------------------------
// Create
// ---------------------------------------------------------------------------

#[test]
fn create_test_vectors() {
    let c = client();
    for case in load(include_str!("../../test-vectors/create.json")) {
        let name = case["name"].as_str().unwrap();
        let input: Event = serde_json::from_value(case["input"].clone()).unwrap();

        let req = c.build_create_event(&input).unwrap();
        assert_request(name, &req, &case["expected_request"]);

        let event = c.parse_create_event(simulated_response(&case)).unwrap();
        let expected: Event = serde_json::from_value(case["expected_result"].clone()).unwrap();
        assert_eq!(event, expected, "{name}: parsed result");
    }
}

// ---------------------------------------------------------------------------
// Find
// ---------------------------------------------------------------------------

#[test]
fn find_test_vectors() {
    let c = client();
    for case in load(include_str!("../../test-vectors/find.json")) {
        let name = case["name"].as_str().unwrap();
        let agent = case["input"]["moxi_works_agent_id"].as_str().unwrap();
        let partner_id = case["input"]["partner_event_id"].as_str().unwrap();

        let req = c.build_find_event(agent, partner_id).unwrap();
        assert_request(name, &req, &case["expected_request"]);

        let result = c.parse_find_event(simulated_response(&case));
        if case.get("expected_error").is_some() {
            assert_expected_error(name, &case, result.unwrap_err());
        } else {
            let expected: Event = serde_json::from_value(case["expected_result"].clone()).unwrap();
            assert_eq!(result.unwrap(), expected, "{name}: parsed result");
        }
    }
}

// ---------------------------------------------------------------------------
// Search
// ---------------------------------------------------------------------------

#[test]
fn search_test_vectors() {
    let c = client();
    for case in load(include_str!("../../test-vectors/search.json")) {
        let name = case["name"].as_str().unwrap();
        let input: EventSearch = serde_json::from_value(case["input"].clone()).unwrap();

        let req = c.build_search_events(&input).unwrap();
        assert_request(name, &req, &case["expected_request"]);

        let groups = c.parse_search_events(simulated_response(&case)).unwrap();
        let expected: Vec<EventGroup> =
            serde_json::from_value(case["expected_result"].clone()).unwrap();
        assert_eq!(groups, expected, "{name}: parsed result");
    }
}

// ---------------------------------------------------------------------------
// Update
// ---------------------------------------------------------------------------

#[test]
fn update_test_vectors() {
    let c = client();
    for case in load(include_str!("../../test-vectors/update.json")) {
        let name = case["name"].as_str().unwrap();
        let input: Event = serde_json::from_value(case["input"].clone()).unwrap();

        let req = c.build_update_event(&input).unwrap();
        assert_request(name, &req, &case["expected_request"]);

        let event = c.parse_update_event(simulated_response(&case)).unwrap();
        let expected: Event = serde_json::from_value(case["expected_result"].clone()).unwrap();
        assert_eq!(event, expected, "{name}: parsed result");
    }
}

// ---------------------------------------------------------------------------
// Delete
// ---------------------------------------------------------------------------

#[test]
fn delete_test_vectors() {
    let c = client();
    for case in load(include_str!("../../test-vectors/delete.json")) {
        let name = case["name"].as_str().unwrap();
        let agent = case["input"]["moxi_works_agent_id"].as_str().unwrap();
        let partner_id = case["input"]["partner_event_id"].as_str().unwrap();

        let req = c.build_delete_event(agent, partner_id).unwrap();
        assert_request(name, &req, &case["expected_request"]);

        let result = c.parse_delete_event(simulated_response(&case));
        if case.get("expected_error").is_some() {
            assert_expected_error(name, &case, result.unwrap_err());
        } else {
            let expected = case["expected_result"].as_bool().unwrap();
            assert_eq!(result.unwrap(), expected, "{name}: parsed result");
        }
    }
}
