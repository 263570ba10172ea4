//! Synchronous client core for the Patreon v2 API.
//!
//! # Overview
//! Builds `HttpRequest` values and parses `HttpResponse` values without
//! touching the network (host-does-IO pattern). A `Transport` supplied by
//! the caller executes the round-trip.
//!
//! # Design
//! - `PatreonClient` is stateless: a base URL and an optional access token.
//! - Responses are JSON:API compound documents. Parsing is two-phase: every
//!   resource is first decoded by its `type` tag into an `IncludedIndex`,
//!   then relationships are wired up by lookup into `Linked` handles. Cyclic
//!   references (campaign to tier to campaign) are ordinary lookups.
//! - References to resources the server did not include resolve to
//!   nothing; malformed attributes and error statuses fail the whole call.
//! - Each call builds and discards its own index, so concurrent calls share
//!   no mutable state.

pub mod assemble;
pub mod client;
pub mod config;
pub mod document;
pub mod error;
pub mod http;
pub mod index;
pub mod linked;
pub mod query;
pub mod resolve;
pub mod types;

pub use assemble::{Campaign, Member, User};
pub use client::PatreonClient;
pub use document::{Document, Linkage, RawResource, Relationship, Relationships, ResourceIdentifier};
pub use error::{ApiError, DecodeError, Error, ErrorObject, Result};
pub use http::{HttpMethod, HttpRequest, HttpResponse, Transport, TransportError};
pub use index::{Entry, IncludedIndex, Resource, ResourceType};
pub use linked::{
    AddressRef, BenefitRef, CampaignRef, DeliverableRef, GoalRef, Linked, MediaRef, MemberRef, OAuthClientRef,
    TierRef, UserRef, WebhookRef,
};
pub use query::QueryOptions;
pub use types::{
    AddressAttributes, BenefitAttributes, CampaignAttributes, DeliverableAttributes, GoalAttributes,
    MediaAttributes, MemberAttributes, OAuthClientAttributes, TierAttributes, UserAttributes,
    WebhookAttributes,
};
