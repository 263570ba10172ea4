//! Well-known Patreon endpoints.
//!
//! These are plain constants. A `PatreonClient` copies the base URL at
//! construction and never changes it afterwards.

/// OAuth2 authorization endpoint (RFC 6749 section 3.1).
pub const AUTHORIZATION_URL: &str = "https://www.patreon.com/oauth2/authorize";

/// OAuth2 token endpoint (RFC 6749 section 3.2).
pub const ACCESS_TOKEN_URL: &str = "https://api.patreon.com/oauth2/token";

/// Default base URL for API requests.
pub const BASE_URL: &str = "https://www.patreon.com";

/// Path prefix shared by every v2 resource endpoint.
pub const API_PREFIX: &str = "/api/oauth2/v2";
