//! Stateless request builder and response parser for the Patreon v2 API.
//!
//! # Design
//! `PatreonClient` holds only a base URL and an optional access token. Each
//! operation is split into a `build_*` method that produces an `HttpRequest`
//! and a `parse_*` method that consumes an `HttpResponse`; `fetch_*` glues
//! the two together around a caller-supplied `Transport`. Parsing never
//! returns partial data: any failure aborts the whole response.

use serde::de::DeserializeOwned;
use tracing::{debug, warn};
use url::Url;

use crate::assemble::{self, Campaign, Member, User};
use crate::config::{API_PREFIX, BASE_URL};
use crate::document::{Document, RawResource};
use crate::error::{ApiError, DecodeError, Error, ErrorDocument, Result};
use crate::http::{HttpMethod, HttpRequest, HttpResponse, Transport};
use crate::query::QueryOptions;

/// Longest slice of an unrecognised error body that is logged.
const MAX_LOG_BODY_LENGTH: usize = 200;

#[derive(Debug, Clone)]
pub struct PatreonClient {
    base_url: String,
    access_token: Option<String>,
}

impl Default for PatreonClient {
    fn default() -> Self {
        Self::new(BASE_URL)
    }
}

impl PatreonClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            access_token: None,
        }
    }

    /// Send `authorization: Bearer <token>` with every request.
    pub fn with_access_token(mut self, token: impl Into<String>) -> Self {
        self.access_token = Some(token.into());
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    // -----------------------------------------------------------------------
    // Build
    // -----------------------------------------------------------------------

    /// `GET /identity`. Top-level includes: `memberships`, `campaign`.
    pub fn build_identity(&self, options: &QueryOptions) -> Result<HttpRequest> {
        self.build_get(&["identity"], options)
    }

    /// `GET /campaigns`. Top-level includes: `tiers`, `creator`, `benefits`,
    /// `goals`.
    pub fn build_campaigns(&self, options: &QueryOptions) -> Result<HttpRequest> {
        self.build_get(&["campaigns"], options)
    }

    pub fn build_campaign_by_id(&self, id: &str, options: &QueryOptions) -> Result<HttpRequest> {
        self.build_get(&["campaigns", checked_id(id)?], options)
    }

    /// `GET /members/{id}`. Top-level includes: `address`, `campaign`,
    /// `currently_entitled_tiers`, `user`.
    pub fn build_member_by_id(&self, id: &str, options: &QueryOptions) -> Result<HttpRequest> {
        self.build_get(&["members", checked_id(id)?], options)
    }

    /// One page of `GET /campaigns/{id}/members`.
    pub fn build_members_by_campaign_id(&self, id: &str, options: &QueryOptions) -> Result<HttpRequest> {
        self.build_get(&["campaigns", checked_id(id)?, "members"], options)
    }

    fn build_get(&self, segments: &[&str], options: &QueryOptions) -> Result<HttpRequest> {
        let mut url = Url::parse(&self.base_url)?;
        url.path_segments_mut()
            .map_err(|()| url::ParseError::RelativeUrlWithCannotBeABaseBase)?
            .pop_if_empty()
            .extend(API_PREFIX.split('/').filter(|s| !s.is_empty()))
            .extend(segments);

        let pairs = options.pairs();
        if !pairs.is_empty() {
            url.query_pairs_mut().extend_pairs(&pairs);
        }

        let mut headers = Vec::new();
        if let Some(token) = &self.access_token {
            headers.push(("authorization".to_string(), format!("Bearer {token}")));
        }

        let method = HttpMethod::Get;
        debug!(method = method.as_str(), url = %url, "built request");
        Ok(HttpRequest {
            method,
            url: url.into(),
            headers,
            body: None,
        })
    }

    // -----------------------------------------------------------------------
    // Parse
    // -----------------------------------------------------------------------

    pub fn parse_identity(&self, response: HttpResponse) -> Result<User> {
        Ok(assemble::identity(decode_document(response)?)?)
    }

    pub fn parse_campaigns(&self, response: HttpResponse) -> Result<Vec<Campaign>> {
        Ok(assemble::campaigns(decode_document(response)?)?)
    }

    pub fn parse_campaign_by_id(&self, response: HttpResponse) -> Result<Campaign> {
        Ok(assemble::campaign(decode_document(response)?)?)
    }

    pub fn parse_member_by_id(&self, response: HttpResponse) -> Result<Member> {
        Ok(assemble::member(decode_document(response)?)?)
    }

    pub fn parse_members_by_campaign_id(&self, response: HttpResponse) -> Result<Vec<Member>> {
        Ok(assemble::members(decode_document(response)?)?)
    }

    // -----------------------------------------------------------------------
    // Fetch
    // -----------------------------------------------------------------------

    /// The user the access token belongs to, with campaign and memberships.
    pub fn fetch_identity<T: Transport + ?Sized>(&self, transport: &T, options: &QueryOptions) -> Result<User> {
        let response = perform(transport, &self.build_identity(options)?)?;
        self.parse_identity(response)
    }

    /// Campaigns owned by the authorized user. Requires the `campaigns`
    /// scope.
    pub fn fetch_campaigns<T: Transport + ?Sized>(
        &self,
        transport: &T,
        options: &QueryOptions,
    ) -> Result<Vec<Campaign>> {
        let response = perform(transport, &self.build_campaigns(options)?)?;
        self.parse_campaigns(response)
    }

    pub fn fetch_campaign_by_id<T: Transport + ?Sized>(
        &self,
        transport: &T,
        id: &str,
        options: &QueryOptions,
    ) -> Result<Campaign> {
        let response = perform(transport, &self.build_campaign_by_id(id, options)?)?;
        self.parse_campaign_by_id(response)
    }

    /// Requires the `campaigns.members` scope.
    pub fn fetch_member_by_id<T: Transport + ?Sized>(
        &self,
        transport: &T,
        id: &str,
        options: &QueryOptions,
    ) -> Result<Member> {
        let response = perform(transport, &self.build_member_by_id(id, options)?)?;
        self.parse_member_by_id(response)
    }

    pub fn fetch_members_by_campaign_id<T: Transport + ?Sized>(
        &self,
        transport: &T,
        id: &str,
        options: &QueryOptions,
    ) -> Result<Vec<Member>> {
        let response = perform(transport, &self.build_members_by_campaign_id(id, options)?)?;
        self.parse_members_by_campaign_id(response)
    }
}

/// Empty, `.` and `..` ids are dropped or collapsed by URL path
/// normalization and would address a different endpoint.
fn checked_id(id: &str) -> Result<&str> {
    match id {
        "" | "." | ".." => Err(Error::InvalidId(id.to_string())),
        _ => Ok(id),
    }
}

fn perform<T: Transport + ?Sized>(transport: &T, request: &HttpRequest) -> Result<HttpResponse> {
    transport.perform(request).map_err(Error::Transport)
}

fn decode_document<D: DeserializeOwned>(response: HttpResponse) -> Result<Document<D>> {
    check_status(&response)?;
    serde_json::from_slice(&response.body).map_err(|e| DecodeError::Body(e).into())
}

/// Map a non-success response to an `ApiError` carrying its error objects.
fn check_status(response: &HttpResponse) -> Result<(), ApiError> {
    if response.is_success() {
        return Ok(());
    }
    let errors = match serde_json::from_slice::<ErrorDocument>(&response.body) {
        Ok(document) => document.errors,
        Err(_) => {
            warn!(
                status = response.status,
                body = %sanitize_for_log(&response.body),
                "error response is not a JSON:API error document"
            );
            Vec::new()
        }
    };
    warn!(status = response.status, errors = errors.len(), "api request failed");
    Err(ApiError {
        status: response.status,
        errors,
    })
}

fn sanitize_for_log(body: &[u8]) -> String {
    let text = String::from_utf8_lossy(body);
    let mut printable = text.chars().filter(|c| !c.is_control());
    let mut out: String = printable.by_ref().take(MAX_LOG_BODY_LENGTH).collect();
    if printable.next().is_some() {
        out.push_str(&format!("... [truncated, {} bytes total]", body.len()));
    }
    out
}
