use serde_json::{Value, json};
use wasp::{SpecDocument, WaspError};

fn fixture() -> SpecDocument {
    SpecDocument::from_file("tests/fixtures/openapi.json", false).unwrap()
}

fn valid_pet() -> Value {
    json!({
        "id": 10,
        "category": {"id": 1, "name": "dogs"},
        "name": "doggie",
        "photoUrls": ["https://example.org/photo.png"],
        "tags": [{"id": 1, "name": "friendly"}],
        "status": "available"
    })
}

#[test]
fn test_conformant_response_body_matches() {
    let document = fixture();

    let response = document.response_body("/v2/pet/10", "get", "200").unwrap();
    response.match_body(&valid_pet()).unwrap();
}

#[test]
fn test_missing_required_property_fails() {
    let document = fixture();

    let mut pet = valid_pet();
    pet.as_object_mut().unwrap().remove("name");

    let response = document.response_body("/v2/pet/10", "get", "200").unwrap();
    let result = response.match_body(&pet);
    assert!(matches!(result, Err(WaspError::NotMatched(_))));
}

#[test]
fn test_incompatible_property_type_fails() {
    let document = fixture();

    let mut pet = valid_pet();
    pet["id"] = json!("not-a-number");

    let response = document.response_body("/v2/pet/10", "get", "200").unwrap();
    let result = response.match_body(&pet);
    assert!(matches!(result, Err(WaspError::NotMatched(_))));
}

#[test]
fn test_undeclared_property_fails() {
    let document = fixture();

    let mut pet = valid_pet();
    pet["color"] = json!("brown");

    let response = document.response_body("/v2/pet/10", "get", "200").unwrap();
    let error = response.match_body(&pet).unwrap_err();
    assert!(error.to_string().contains("color"));
}

#[test]
fn test_enum_violation_fails() {
    let document = fixture();

    let mut pet = valid_pet();
    pet["status"] = json!("sleeping");

    let response = document.response_body("/v2/pet/10", "get", "200").unwrap();
    let error = response.match_body(&pet).unwrap_err();
    assert!(error.to_string().contains("not found in enum"));
}

#[test]
fn test_nullable_property_admits_null() {
    let document = fixture();

    let mut pet = valid_pet();
    pet["nickname"] = json!(null);

    let response = document.response_body("/v2/pet/10", "get", "200").unwrap();
    response.match_body(&pet).unwrap();
}

#[test]
fn test_null_without_nullable_fails_unless_lenient() {
    let mut pet = valid_pet();
    pet["category"] = json!(null);

    let document = fixture();
    let response = document.response_body("/v2/pet/10", "get", "200").unwrap();
    let result = response.match_body(&pet);
    assert!(matches!(result, Err(WaspError::NotMatched(_))));

    let mut lenient = fixture();
    lenient.set_allow_null_values(true);
    let response = lenient.response_body("/v2/pet/10", "get", "200").unwrap();
    response.match_body(&pet).unwrap();
}

#[test]
fn test_request_body_through_component_reference() {
    let document = fixture();

    let request = document.request_body("/v2/pet", "post").unwrap();
    request.match_body(&valid_pet()).unwrap();

    let mut pet = valid_pet();
    pet.as_object_mut().unwrap().remove("photoUrls");
    let result = request.match_body(&pet);
    assert!(matches!(result, Err(WaspError::NotMatched(_))));
}

#[test]
fn test_array_response_elements_are_matched() {
    let document = fixture();

    let response = document
        .response_body("/v2/pet/findByStatus", "get", "200")
        .unwrap();
    response
        .match_body(&json!([valid_pet(), valid_pet()]))
        .unwrap();

    let error = response
        .match_body(&json!([valid_pet(), {"name": "incomplete"}]))
        .unwrap_err();
    assert!(error.to_string().contains("photoUrls"));
}

#[test]
fn test_additional_properties_response() {
    let document = fixture();

    let response = document
        .response_body("/v2/store/inventory", "get", "200")
        .unwrap();
    response.match_body(&json!({"sold": 2, "pending": 5})).unwrap();

    let result = response.match_body(&json!({"sold": "two"}));
    assert!(matches!(result, Err(WaspError::NotMatched(_))));
}

#[test]
fn test_empty_content_accepts_any_body() {
    let document = fixture();

    let response = document.response_body("/v2/ping", "get", "200").unwrap();
    response.match_body(&json!({"uptime": 42})).unwrap();
    response.match_body(&json!(null)).unwrap();
}

#[test]
fn test_absent_content_demands_empty_body() {
    let document = fixture();

    let response = document.response_body("/v2/user/logout", "get", "200").unwrap();
    response.match_body(&json!(null)).unwrap();
    response.match_body(&json!({})).unwrap();

    let result = response.match_body(&json!({"message": "bye"}));
    assert!(matches!(result, Err(WaspError::NotMatched(_))));
}

#[test]
fn test_undeclared_status_code_fails() {
    let document = fixture();

    let result = document.response_body("/v2/pet", "post", "200");
    assert!(matches!(result, Err(WaspError::InvalidDefinition(_))));
}

#[test]
fn test_request_body_for_operation_without_one_demands_empty_body() {
    let document = fixture();

    let request = document.request_body("/v2/pet/10", "delete").unwrap();
    request.match_body(&json!(null)).unwrap();

    let result = request.match_body(&json!({"reason": "bitey"}));
    assert!(matches!(result, Err(WaspError::NotMatched(_))));
}

#[test]
fn test_order_round_trip() {
    let document = fixture();

    let order = json!({
        "id": 1,
        "petId": 10,
        "quantity": 2,
        "shipDate": "2024-05-01T10:00:00Z",
        "status": "placed",
        "complete": false
    });

    let request = document.request_body("/v2/store/order", "post").unwrap();
    request.match_body(&order).unwrap();

    let response = document.response_body("/v2/store/order", "post", "200").unwrap();
    response.match_body(&order).unwrap();

    let mut bad_order = order.clone();
    bad_order["complete"] = json!("yes");
    let result = response.match_body(&bad_order);
    assert!(matches!(result, Err(WaspError::NotMatched(_))));
}
