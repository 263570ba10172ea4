use std::{
    collections::{HashMap, HashSet},
    sync::Arc,
};

use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};
use tokio::net::TcpListener;

/// Bearer token accepted by `Fixture::sample()`.
pub const ACCESS_TOKEN: &str = "test-token";

type Params = HashMap<String, String>;

/// The resources a mock server answers with.
///
/// `resources` holds fully-linked JSON:API resource objects. Responses are
/// compound documents cut from it according to `include` and
/// `fields[...]`, so anything not requested is left out of `included`
/// exactly as the real API does.
#[derive(Debug, Clone)]
pub struct Fixture {
    pub access_token: String,
    /// Id of the `user` the access token belongs to.
    pub identity_id: String,
    pub resources: Vec<Value>,
}

impl Fixture {
    pub fn sample() -> Self {
        Self {
            access_token: ACCESS_TOKEN.to_string(),
            identity_id: "9".to_string(),
            resources: vec![
                json!({
                    "type": "user", "id": "9",
                    "attributes": {"full_name": "Alice", "vanity": "alice", "created": "2016-02-01T09:00:00.000+00:00"},
                    "relationships": {
                        "campaign": {"data": {"type": "campaign", "id": "1"}},
                        "memberships": {"data": []}
                    }
                }),
                json!({
                    "type": "user", "id": "20",
                    "attributes": {"full_name": "Bob"},
                    "relationships": {"memberships": {"data": [{"type": "member", "id": "m1"}]}}
                }),
                json!({
                    "type": "campaign", "id": "1",
                    "attributes": {"creation_name": "comics", "patron_count": 2, "is_monthly": true, "vanity": "alice"},
                    "relationships": {
                        "creator": {"data": {"type": "user", "id": "9"}},
                        "tiers": {"data": [{"type": "tier", "id": "t1"}, {"type": "tier", "id": "t2"}]},
                        "benefits": {"data": [{"type": "benefit", "id": "b1"}]},
                        "goals": {"data": [{"type": "goal", "id": "g1"}]}
                    }
                }),
                json!({
                    "type": "tier", "id": "t1",
                    "attributes": {"title": "Bronze", "amount_cents": 300, "published": true},
                    "relationships": {
                        "campaign": {"data": {"type": "campaign", "id": "1"}},
                        "benefits": {"data": [{"type": "benefit", "id": "b1"}]},
                        "tier_image": {"data": null}
                    }
                }),
                json!({
                    "type": "tier", "id": "t2",
                    "attributes": {"title": "Silver", "amount_cents": 800, "published": true},
                    "relationships": {
                        "campaign": {"data": {"type": "campaign", "id": "1"}},
                        "benefits": {"data": []},
                        "tier_image": {"data": {"type": "media", "id": "img1"}}
                    }
                }),
                json!({
                    "type": "media", "id": "img1",
                    "attributes": {"file_name": "silver.png", "mimetype": "image/png", "size_bytes": 2048}
                }),
                json!({
                    "type": "benefit", "id": "b1",
                    "attributes": {"title": "Monthly sketch", "benefit_type": "custom"},
                    "relationships": {
                        "campaign": {"data": {"type": "campaign", "id": "1"}},
                        "tiers": {"data": [{"type": "tier", "id": "t1"}]}
                    }
                }),
                json!({
                    "type": "goal", "id": "g1",
                    "attributes": {"title": "Rent", "amount_cents": 100000, "completed_percentage": 40},
                    "relationships": {"campaign": {"data": {"type": "campaign", "id": "1"}}}
                }),
                json!({
                    "type": "member", "id": "m1",
                    "attributes": {"full_name": "Bob", "patron_status": "active_patron", "currently_entitled_amount_cents": 800},
                    "relationships": {
                        "address": {"data": {"type": "address", "id": "a1"}},
                        "campaign": {"data": {"type": "campaign", "id": "1"}},
                        "currently_entitled_tiers": {"data": [{"type": "tier", "id": "t2"}]},
                        "user": {"data": {"type": "user", "id": "20"}}
                    }
                }),
                json!({
                    "type": "address", "id": "a1",
                    "attributes": {"addressee": "Bob", "city": "Lisbon", "country": "PT"},
                    "relationships": {"user": {"data": {"type": "user", "id": "20"}}}
                }),
            ],
        }
    }

    fn find(&self, kind: &str, id: &str) -> Option<&Value> {
        self.resources.iter().find(|r| r["type"] == kind && r["id"] == id)
    }

    fn of_type<'a>(&'a self, kind: &'a str) -> impl Iterator<Item = &'a Value> + 'a {
        self.resources.iter().filter(move |r| r["type"] == kind)
    }

    /// Related resources reachable through each dotted path of `include`,
    /// deduplicated and excluding the primary resources themselves.
    fn included(&self, primary: &[Value], include: &str) -> Vec<Value> {
        let primary_keys: HashSet<_> = primary.iter().filter_map(identity_of).collect();
        let mut seen = HashSet::new();
        let mut included = Vec::new();
        for path in include.split(',').filter(|p| !p.is_empty()) {
            let mut frontier: Vec<&Value> = primary.iter().collect();
            for name in path.split('.') {
                let mut next = Vec::new();
                for resource in frontier {
                    for (kind, id) in linked(resource, name) {
                        let Some(target) = self.find(&kind, &id) else {
                            continue;
                        };
                        next.push(target);
                        let key = (kind, id);
                        if !primary_keys.contains(&key) && seen.insert(key) {
                            included.push(target.clone());
                        }
                    }
                }
                frontier = next;
            }
        }
        included
    }

    fn document(&self, data: Data, params: &Params) -> Value {
        let primary = match &data {
            Data::One(resource) => vec![resource.clone()],
            Data::Many(resources) => resources.clone(),
        };
        let include = params.get("include").map(String::as_str).unwrap_or_default();
        let included: Vec<Value> = self
            .included(&primary, include)
            .into_iter()
            .map(|r| project(r, params))
            .collect();
        let data = match data {
            Data::One(resource) => project(resource, params),
            Data::Many(resources) => Value::Array(resources.into_iter().map(|r| project(r, params)).collect()),
        };
        json!({"data": data, "included": included})
    }
}

enum Data {
    One(Value),
    Many(Vec<Value>),
}

fn identity_of(resource: &Value) -> Option<(String, String)> {
    Some((resource["type"].as_str()?.to_string(), resource["id"].as_str()?.to_string()))
}

fn linked(resource: &Value, name: &str) -> Vec<(String, String)> {
    match &resource["relationships"][name]["data"] {
        data @ Value::Object(_) => identity_of(data).into_iter().collect(),
        Value::Array(items) => items.iter().filter_map(identity_of).collect(),
        _ => Vec::new(),
    }
}

/// Apply a `fields[<type>]` sparse fieldset to one resource.
fn project(mut resource: Value, params: &Params) -> Value {
    let Some(kind) = resource["type"].as_str() else {
        return resource;
    };
    let Some(fields) = params.get(&format!("fields[{kind}]")) else {
        return resource;
    };
    let wanted: HashSet<&str> = fields.split(',').collect();
    if let Some(attributes) = resource.get_mut("attributes").and_then(Value::as_object_mut) {
        attributes.retain(|name, _| wanted.contains(name.as_str()));
    }
    resource
}

/// A JSON:API error response.
struct ApiFailure {
    status: StatusCode,
    code: Option<u32>,
    title: String,
    detail: String,
}

impl ApiFailure {
    fn unauthorized() -> Self {
        Self {
            status: StatusCode::UNAUTHORIZED,
            code: Some(1),
            title: "Unauthorized".to_string(),
            detail: "The server could not verify that you are authorized to access the URL requested.".to_string(),
        }
    }

    fn not_found(kind: &str, id: &str) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            code: None,
            title: "Not Found".to_string(),
            detail: format!("no {kind} with id {id}"),
        }
    }
}

impl IntoResponse for ApiFailure {
    fn into_response(self) -> Response {
        let body = json!({
            "errors": [{
                "code": self.code,
                "code_name": self.status.canonical_reason(),
                "detail": self.detail,
                "status": self.status.as_str(),
                "title": self.title,
            }]
        });
        (self.status, Json(body)).into_response()
    }
}

type Db = Arc<Fixture>;
type ApiResult = Result<Json<Value>, ApiFailure>;

pub fn app() -> Router {
    app_with(Fixture::sample())
}

pub fn app_with(fixture: Fixture) -> Router {
    let db: Db = Arc::new(fixture);
    Router::new()
        .route("/api/oauth2/v2/identity", get(identity))
        .route("/api/oauth2/v2/campaigns", get(list_campaigns))
        .route("/api/oauth2/v2/campaigns/{id}", get(get_campaign))
        .route("/api/oauth2/v2/campaigns/{id}/members", get(list_campaign_members))
        .route("/api/oauth2/v2/members/{id}", get(get_member))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

fn authorize(db: &Fixture, headers: &HeaderMap) -> Result<(), ApiFailure> {
    let expected = format!("Bearer {}", db.access_token);
    match headers.get(header::AUTHORIZATION).and_then(|v| v.to_str().ok()) {
        Some(value) if value == expected => Ok(()),
        _ => {
            tracing::debug!("rejecting request without a valid bearer token");
            Err(ApiFailure::unauthorized())
        }
    }
}

fn single(db: &Fixture, kind: &str, id: &str, params: &Params) -> ApiResult {
    let resource = db.find(kind, id).cloned().ok_or_else(|| ApiFailure::not_found(kind, id))?;
    Ok(Json(db.document(Data::One(resource), params)))
}

async fn identity(State(db): State<Db>, headers: HeaderMap, Query(params): Query<Params>) -> ApiResult {
    authorize(&db, &headers)?;
    single(&db, "user", &db.identity_id, &params)
}

async fn list_campaigns(State(db): State<Db>, headers: HeaderMap, Query(params): Query<Params>) -> ApiResult {
    authorize(&db, &headers)?;
    let owned = db
        .of_type("campaign")
        .filter(|c| c["relationships"]["creator"]["data"]["id"] == db.identity_id.as_str())
        .cloned()
        .collect();
    Ok(Json(db.document(Data::Many(owned), &params)))
}

async fn get_campaign(
    State(db): State<Db>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Query(params): Query<Params>,
) -> ApiResult {
    authorize(&db, &headers)?;
    single(&db, "campaign", &id, &params)
}

async fn list_campaign_members(
    State(db): State<Db>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Query(params): Query<Params>,
) -> ApiResult {
    authorize(&db, &headers)?;
    if db.find("campaign", &id).is_none() {
        return Err(ApiFailure::not_found("campaign", &id));
    }
    let members = db
        .of_type("member")
        .filter(|m| m["relationships"]["campaign"]["data"]["id"] == id.as_str())
        .cloned()
        .collect();
    Ok(Json(db.document(Data::Many(members), &params)))
}

async fn get_member(
    State(db): State<Db>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Query(params): Query<Params>,
) -> ApiResult {
    authorize(&db, &headers)?;
    single(&db, "member", &id, &params)
}
