//! Verify build/parse methods against JSON test vectors stored in `test-vectors/`.
//!
//! Request vectors pin the exact URL and headers each endpoint builds.
//! Response vectors feed a simulated `HttpResponse` through the matching
//! `parse_*` method and compare a JSON summary of the denormalized entity,
//! so only the keys a case lists are checked.

use patreon_core::{
    Campaign, DecodeError, Error, HttpMethod, HttpResponse, Member, PatreonClient, QueryOptions, User,
};
use serde_json::{json, Value};

const BASE_URL: &str = "http://localhost:3000";

fn client() -> PatreonClient {
    PatreonClient::new(BASE_URL).with_access_token("token")
}

fn load(raw: &str) -> Vec<Value> {
    let vectors: Value = serde_json::from_str(raw).unwrap();
    vectors["cases"].as_array().unwrap().clone()
}

/// Parse the method string from test vectors into `HttpMethod`.
fn parse_method(s: &str) -> HttpMethod {
    match s {
        "GET" => HttpMethod::Get,
        other => panic!("unknown method: {other}"),
    }
}

fn options(value: &Value) -> QueryOptions {
    let mut options = QueryOptions::new();
    if let Some(include) = value["include"].as_array() {
        options = options.include(include.iter().map(|v| v.as_str().unwrap()));
    }
    if let Some(fields) = value["fields"].as_object() {
        for (resource_type, names) in fields {
            let names = names.as_array().unwrap().iter().map(|v| v.as_str().unwrap());
            options = options.fields(resource_type.as_str(), names);
        }
    }
    if let Some(size) = value["page_size"].as_u64() {
        options = options.page_size(size as u32);
    }
    if let Some(cursor) = value["page_cursor"].as_str() {
        options = options.page_cursor(cursor);
    }
    options
}

/// A string body is sent verbatim, anything else as serialized JSON.
fn simulated_response(case: &Value) -> HttpResponse {
    let sim = &case["simulated_response"];
    let body = match &sim["body"] {
        Value::String(text) => text.clone().into_bytes(),
        other => serde_json::to_vec(other).unwrap(),
    };
    HttpResponse {
        status: sim["status"].as_u64().unwrap() as u16,
        headers: vec![("content-type".to_string(), "application/vnd.api+json".to_string())],
        body,
    }
}

/// Lists compare element-wise; objects compare only the expected keys.
fn assert_subset(name: &str, actual: &Value, expected: &Value) {
    match expected {
        Value::Array(items) => {
            let actual = actual.as_array().unwrap();
            assert_eq!(actual.len(), items.len(), "{name}: length");
            for (i, (actual, expected)) in actual.iter().zip(items).enumerate() {
                assert_subset(&format!("{name}[{i}]"), actual, expected);
            }
        }
        _ => {
            for (key, value) in expected.as_object().unwrap() {
                assert_eq!(&actual[key], value, "{name}: {key}");
            }
        }
    }
}

fn assert_error(name: &str, err: &Error, expected: &Value) {
    match (expected["kind"].as_str().unwrap(), err) {
        ("Api", Error::Api(api)) => {
            assert_eq!(u64::from(api.status), expected["status"].as_u64().unwrap(), "{name}: status");
            let errors: Vec<Value> = api
                .errors
                .iter()
                .map(|e| {
                    let mut object = serde_json::Map::new();
                    if let Some(code) = e.code {
                        object.insert("code".to_string(), json!(code));
                    }
                    if let Some(title) = &e.title {
                        object.insert("title".to_string(), json!(title));
                    }
                    Value::Object(object)
                })
                .collect();
            assert_eq!(Value::Array(errors), expected["errors"], "{name}: errors");
        }
        ("Body", Error::Decode(DecodeError::Body(_))) => {}
        ("Decode", Error::Decode(DecodeError::Resource { resource_type, id, .. })) => {
            assert_eq!(resource_type, expected["resource_type"].as_str().unwrap(), "{name}: resource_type");
            assert_eq!(id, expected["id"].as_str().unwrap(), "{name}: id");
        }
        ("UnexpectedType", Error::Decode(DecodeError::UnexpectedType { .. })) => {}
        (kind, other) => panic!("{name}: expected {kind} error, got {other:?}"),
    }
}

fn run<T>(raw: &str, parse: impl Fn(HttpResponse) -> patreon_core::Result<T>, summarize: impl Fn(&T) -> Value) {
    for case in load(raw) {
        let name = case["name"].as_str().unwrap();
        let result = parse(simulated_response(&case));

        if let Some(expected) = case.get("expected_error") {
            match result {
                Ok(_) => panic!("{name}: expected an error"),
                Err(err) => assert_error(name, &err, expected),
            }
        } else {
            let entity = result.unwrap_or_else(|err| panic!("{name}: {err}"));
            assert_subset(name, &summarize(&entity), &case["expected_result"]);
        }
    }
}

fn titles<T>(items: &Option<Vec<T>>, title: impl Fn(&T) -> Option<String>) -> Value {
    match items {
        Some(items) => items.iter().map(|item| json!(title(item))).collect(),
        None => Value::Null,
    }
}

fn summarize_campaign(campaign: &Campaign) -> Value {
    json!({
        "id": campaign.id,
        "creator": campaign.creator.as_ref().map(|u| u.full_name.clone()),
        "tiers": titles(&campaign.tiers, |t| t.title.clone()),
        "benefits": titles(&campaign.benefits, |b| b.title.clone()),
        "goals": titles(&campaign.goals, |g| g.title.clone()),
        "tier_campaigns": titles(&campaign.tiers, |t| t.campaign().map(|c| c.id().to_string())),
    })
}

fn summarize_member(member: &Member) -> Value {
    json!({
        "id": member.id,
        "patron_status": member.patron_status,
        "user": member.user.as_ref().map(|u| u.full_name.clone()),
        "address": member.address.as_ref().map(|a| a.id().to_string()),
        "campaign": member.campaign.as_ref().map(|c| c.id().to_string()),
        "currently_entitled_tiers": titles(&member.currently_entitled_tiers, |t| t.title.clone()),
    })
}

fn summarize_user(user: &User) -> Value {
    json!({
        "id": user.id,
        "full_name": user.full_name,
        "campaign": user.campaign.as_ref().map(|c| c.vanity.clone()),
        "memberships": titles(&user.memberships, |m| m.patron_status.clone()),
    })
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

#[test]
fn request_test_vectors() {
    let c = client();
    for case in load(include_str!("../../test-vectors/requests.json")) {
        let name = case["name"].as_str().unwrap();
        let id = case["id"].as_str().unwrap_or_default();
        let options = options(&case["options"]);
        let expected_req = &case["expected_request"];

        let req = match case["endpoint"].as_str().unwrap() {
            "identity" => c.build_identity(&options),
            "campaigns" => c.build_campaigns(&options),
            "campaign_by_id" => c.build_campaign_by_id(id, &options),
            "member_by_id" => c.build_member_by_id(id, &options),
            "members_by_campaign_id" => c.build_members_by_campaign_id(id, &options),
            other => panic!("{name}: unknown endpoint {other}"),
        }
        .unwrap();

        assert_eq!(req.method, parse_method(expected_req["method"].as_str().unwrap()), "{name}: method");
        assert_eq!(req.url, format!("{BASE_URL}{}", expected_req["url"].as_str().unwrap()), "{name}: url");

        let expected_headers: Vec<(String, String)> = expected_req["headers"]
            .as_array()
            .unwrap()
            .iter()
            .map(|h| {
                let arr = h.as_array().unwrap();
                (arr[0].as_str().unwrap().to_string(), arr[1].as_str().unwrap().to_string())
            })
            .collect();
        assert_eq!(req.headers, expected_headers, "{name}: headers");
        assert!(req.body.is_none(), "{name}: body");
    }
}

// ---------------------------------------------------------------------------
// Responses
// ---------------------------------------------------------------------------

#[test]
fn identity_test_vectors() {
    let c = client();
    run(
        include_str!("../../test-vectors/identity.json"),
        |response| c.parse_identity(response),
        summarize_user,
    );
}

#[test]
fn campaign_test_vectors() {
    let c = client();
    run(
        include_str!("../../test-vectors/campaign.json"),
        |response| c.parse_campaign_by_id(response),
        summarize_campaign,
    );
}

#[test]
fn member_test_vectors() {
    let c = client();
    run(
        include_str!("../../test-vectors/member.json"),
        |response| c.parse_member_by_id(response),
        summarize_member,
    );
}

#[test]
fn campaigns_test_vectors() {
    let c = client();
    run(
        include_str!("../../test-vectors/campaigns.json"),
        |response| c.parse_campaigns(response),
        |campaigns: &Vec<Campaign>| campaigns.iter().map(summarize_campaign).collect(),
    );
}

#[test]
fn members_test_vectors() {
    let c = client();
    run(
        include_str!("../../test-vectors/members.json"),
        |response| c.parse_members_by_campaign_id(response),
        |members: &Vec<Member>| members.iter().map(summarize_member).collect(),
    );
}
