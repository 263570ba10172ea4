//! Attribute schemas for every resource type the v2 API returns.
//!
//! Every field is optional: sparse fieldsets mean the server may omit any
//! attribute, and omission is not an error. A present attribute of the wrong
//! JSON type is.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value;

/// A patron's shipping address.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct AddressAttributes {
    pub addressee: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub line_1: Option<String>,
    pub line_2: Option<String>,
    pub phone_number: Option<String>,
    pub postal_code: Option<String>,
    pub state: Option<String>,
}

/// A benefit a creator can attach to tiers and deliver to patrons.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct BenefitAttributes {
    pub app_external_id: Option<String>,
    pub app_meta: Option<Value>,
    pub benefit_type: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub deliverables_due_today_count: Option<i64>,
    pub delivered_deliverables_count: Option<i64>,
    pub description: Option<String>,
    pub is_deleted: Option<bool>,
    pub is_ended: Option<bool>,
    pub is_published: Option<bool>,
    pub next_deliverable_due_date: Option<DateTime<Utc>>,
    pub not_delivered_deliverables_count: Option<i64>,
    pub rule_type: Option<String>,
    pub tiers_count: Option<i64>,
    pub title: Option<String>,
}

/// The creator's page.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct CampaignAttributes {
    pub created_at: Option<DateTime<Utc>>,
    pub creation_name: Option<String>,
    pub discord_server_id: Option<String>,
    pub google_analytics_id: Option<String>,
    pub has_rss: Option<bool>,
    pub has_sent_rss_notify: Option<bool>,
    pub image_small_url: Option<String>,
    pub image_url: Option<String>,
    pub is_charged_immediately: Option<bool>,
    pub is_monthly: Option<bool>,
    pub is_nsfw: Option<bool>,
    pub main_video_embed: Option<String>,
    pub main_video_url: Option<String>,
    pub one_liner: Option<String>,
    pub patron_count: Option<i64>,
    pub pay_per_name: Option<String>,
    pub pledge_url: Option<String>,
    pub published_at: Option<DateTime<Utc>>,
    pub rss_artwork_url: Option<String>,
    pub rss_feed_title: Option<String>,
    pub show_earnings: Option<bool>,
    pub summary: Option<String>,
    pub thanks_embed: Option<String>,
    pub thanks_msg: Option<String>,
    pub thanks_video_url: Option<String>,
    pub url: Option<String>,
    pub vanity: Option<String>,
}

/// Whether a patron has been delivered a benefit they are owed.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct DeliverableAttributes {
    pub completed_at: Option<DateTime<Utc>>,
    pub delivery_status: Option<String>,
    pub due_at: Option<DateTime<Utc>>,
}

/// A funding goal in USD.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct GoalAttributes {
    pub amount_cents: Option<i64>,
    pub completed_percentage: Option<i64>,
    pub created_at: Option<DateTime<Utc>>,
    pub description: Option<String>,
    pub reached_at: Option<DateTime<Utc>>,
    pub title: Option<String>,
}

/// A file uploaded to patreon.com, usually an image.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct MediaAttributes {
    pub created_at: Option<DateTime<Utc>>,
    pub download_url: Option<String>,
    pub file_name: Option<String>,
    pub image_urls: Option<Value>,
    pub metadata: Option<Value>,
    pub mimetype: Option<String>,
    pub owner_id: Option<String>,
    pub owner_relationship: Option<String>,
    pub owner_type: Option<String>,
    pub size_bytes: Option<i64>,
    pub state: Option<String>,
    pub upload_expires_at: Option<DateTime<Utc>>,
    pub upload_parameters: Option<Value>,
    pub upload_url: Option<String>,
}

/// A user's membership to a campaign.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct MemberAttributes {
    pub campaign_lifetime_support_cents: Option<i64>,
    pub currently_entitled_amount_cents: Option<i64>,
    pub email: Option<String>,
    pub full_name: Option<String>,
    pub is_follower: Option<bool>,
    pub last_charge_date: Option<DateTime<Utc>>,
    pub last_charge_status: Option<String>,
    pub lifetime_support_cents: Option<i64>,
    pub next_charge_date: Option<DateTime<Utc>>,
    pub note: Option<String>,
    pub patron_status: Option<String>,
    pub pledge_cadence: Option<i64>,
    pub pledge_relationship_start: Option<DateTime<Utc>>,
    pub will_pay_amount_cents: Option<i64>,
}

/// A developer's OAuth client.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct OAuthClientAttributes {
    pub author_name: Option<String>,
    pub client_secret: Option<String>,
    /// Access token of the user who created the client.
    pub creator_token: Option<String>,
    pub default_scopes: Option<String>,
    pub description: Option<String>,
    pub domain: Option<String>,
    pub icon_url: Option<String>,
    pub name: Option<String>,
    pub privacy_policy_url: Option<String>,
    pub redirect_uris: Option<String>,
    pub tos_url: Option<String>,
    pub version: Option<i64>,
}

/// A membership level on a campaign.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct TierAttributes {
    pub amount_cents: Option<i64>,
    pub created_at: Option<DateTime<Utc>>,
    pub description: Option<String>,
    pub discord_role_ids: Option<Vec<String>>,
    pub edited_at: Option<DateTime<Utc>>,
    pub image_url: Option<String>,
    pub patron_count: Option<i64>,
    pub post_count: Option<i64>,
    pub published: Option<bool>,
    pub published_at: Option<DateTime<Utc>>,
    pub remaining: Option<i64>,
    pub requires_shipping: Option<bool>,
    pub title: Option<String>,
    pub unpublished_at: Option<DateTime<Utc>>,
    pub url: Option<String>,
    pub user_limit: Option<i64>,
}

/// A Patreon user, patron or creator.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct UserAttributes {
    pub about: Option<String>,
    pub can_see_nsfw: Option<bool>,
    pub created: Option<DateTime<Utc>>,
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub full_name: Option<String>,
    pub hide_pledges: Option<bool>,
    pub image_url: Option<String>,
    pub is_email_verified: Option<bool>,
    pub last_name: Option<String>,
    pub like_count: Option<i64>,
    pub social_connections: Option<Value>,
    pub thumb_url: Option<String>,
    pub url: Option<String>,
    pub vanity: Option<String>,
}

/// Event subscription on a campaign.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct WebhookAttributes {
    pub last_attempted_at: Option<DateTime<Utc>>,
    pub num_consecutive_times_failed: Option<i64>,
    pub paused: Option<bool>,
    pub secret: Option<String>,
    pub triggers: Option<Vec<String>>,
    pub uri: Option<String>,
}
