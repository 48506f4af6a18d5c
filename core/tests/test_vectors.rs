//! Verify request building and response decoding against the JSON test
//! vectors stored in `test-vectors/`.
//!
//! Each vector file describes inputs, the expected request, a simulated
//! response and the expected `(status, body)` result. JSON bodies are
//! compared as parsed values so field ordering does not matter.

use petfriends_core::{HttpMethod, HttpRequest, HttpResponse, PetForm, PetFriendsClient, ResponseBody};
use serde_json::Value;

const BASE_URL: &str = "http://localhost:3000";

fn client() -> PetFriendsClient {
    PetFriendsClient::new(BASE_URL)
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

fn load(raw: &str) -> Vec<Value> {
    let vectors: Value = serde_json::from_str(raw).unwrap();
    vectors["cases"].as_array().unwrap().clone()
}

fn form_from(fields: &Value) -> PetForm {
    fields
        .as_array()
        .unwrap()
        .iter()
        .fold(PetForm::empty(), |form, pair| {
            form.field(pair[0].as_str().unwrap(), pair[1].as_str().unwrap())
        })
}

fn check_request(name: &str, req: &HttpRequest, expected: &Value) {
    assert_eq!(req.method, parse_method(expected["method"].as_str().unwrap()), "{name}: method");
    assert_eq!(req.path, format!("{BASE_URL}{}", expected["path"].as_str().unwrap()), "{name}: path");

    let expected_headers: Vec<(String, String)> = expected["headers"]
        .as_array()
        .unwrap()
        .iter()
        .map(|h| (h[0].as_str().unwrap().to_string(), h[1].as_str().unwrap().to_string()))
        .collect();
    assert_eq!(req.headers, expected_headers, "{name}: headers");

    match expected["body"].as_str() {
        Some(body) => assert_eq!(req.body.as_deref(), Some(body.as_bytes()), "{name}: body"),
        None => assert!(req.body.is_none(), "{name}: body should be None"),
    }
}

fn check_result(name: &str, c: &PetFriendsClient, case: &Value) {
    let sim = &case["simulated_response"];
    let response = HttpResponse {
        status: sim["status"].as_u64().unwrap() as u16,
        headers: Vec::new(),
        body: sim["body"].as_str().unwrap().to_string(),
    };
    let parsed = c.parse_response(response);

    let expected = &case["expected_result"];
    assert_eq!(u64::from(parsed.status), expected["status"].as_u64().unwrap(), "{name}: status");
    match (&parsed.body, expected.get("json"), expected.get("text")) {
        (ResponseBody::Json(actual), Some(json), None) => assert_eq!(actual, json, "{name}: json body"),
        (ResponseBody::Text(actual), None, Some(text)) => {
            assert_eq!(actual, text.as_str().unwrap(), "{name}: text body")
        }
        (body, _, _) => panic!("{name}: unexpected body {body:?}"),
    }
}

// ---------------------------------------------------------------------------
// Key
// ---------------------------------------------------------------------------

#[test]
fn get_api_key_test_vectors() {
    let c = client();
    for case in load(include_str!("../../test-vectors/get_api_key.json")) {
        let name = case["name"].as_str().unwrap();
        let input = &case["input"];
        let req = c.build_get_api_key(
            input["email"].as_str().unwrap(),
            input["password"].as_str().unwrap(),
        );
        check_request(name, &req, &case["expected_request"]);
        check_result(name, &c, &case);
    }
}

// ---------------------------------------------------------------------------
// List
// ---------------------------------------------------------------------------

#[test]
fn list_pets_test_vectors() {
    let c = client();
    for case in load(include_str!("../../test-vectors/list_pets.json")) {
        let name = case["name"].as_str().unwrap();
        let input = &case["input"];
        let req = c.build_get_list_of_pets(
            input["auth_key"].as_str().unwrap(),
            input["filter"].as_str().unwrap(),
        );
        check_request(name, &req, &case["expected_request"]);
        check_result(name, &c, &case);
    }
}

// ---------------------------------------------------------------------------
// Create (no photo)
// ---------------------------------------------------------------------------

#[test]
fn create_pet_simple_test_vectors() {
    let c = client();
    for case in load(include_str!("../../test-vectors/create_pet_simple.json")) {
        let name = case["name"].as_str().unwrap();
        let input = &case["input"];
        let req = c.build_create_pet_simple(
            input["auth_key"].as_str().unwrap(),
            &form_from(&input["fields"]),
        );
        check_request(name, &req, &case["expected_request"]);
        check_result(name, &c, &case);
    }
}

// ---------------------------------------------------------------------------
// Update
// ---------------------------------------------------------------------------

#[test]
fn update_pet_test_vectors() {
    let c = client();
    for case in load(include_str!("../../test-vectors/update_pet.json")) {
        let name = case["name"].as_str().unwrap();
        let input = &case["input"];
        let req = c.build_update_pet_info(
            input["auth_key"].as_str().unwrap(),
            input["pet_id"].as_str().unwrap(),
            &form_from(&input["fields"]),
        );
        check_request(name, &req, &case["expected_request"]);
        check_result(name, &c, &case);
    }
}

// ---------------------------------------------------------------------------
// Delete
// ---------------------------------------------------------------------------

#[test]
fn delete_pet_test_vectors() {
    let c = client();
    for case in load(include_str!("../../test-vectors/delete_pet.json")) {
        let name = case["name"].as_str().unwrap();
        let input = &case["input"];
        let req = c.build_delete_pet(
            input["auth_key"].as_str().unwrap(),
            input["pet_id"].as_str().unwrap(),
        );
        check_request(name, &req, &case["expected_request"]);
        check_result(name, &c, &case);
    }
}
