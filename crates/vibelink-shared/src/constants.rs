/// Application name
pub const APP_NAME: &str = "VibeLink";

/// Default REST backend base URL (local development)
pub const DEFAULT_API_BASE_URL: &str = "http://127.0.0.1:8000";

/// Token refresh endpoint. A 401 from this path is always fatal.
pub const TOKEN_REFRESH_PATH: &str = "/api/auth/token/refresh/";

/// Durable storage keys for the session token pair
pub const ACCESS_TOKEN_KEY: &str = "accessToken";
pub const REFRESH_TOKEN_KEY: &str = "refreshToken";

/// Server page size for paginated list endpoints
pub const PAGE_SIZE: usize = 20;

/// Default AI recommendation page size
pub const AI_RECOMMENDATIONS_PER_PAGE: u32 = 8;

/// Conversation list / active conversation refresh interval in seconds
pub const POLL_INTERVAL_SECS: u64 = 30;

/// Search-as-you-type quiet period in milliseconds
pub const SEARCH_DEBOUNCE_MS: u64 = 300;

/// Minimum horizontal drag (px) that commits a swipe
pub const MIN_SWIPE_DISTANCE: f64 = 50.0;

/// Mean Earth radius used by the haversine formula (km)
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Matching weights. They always sum to 100.
pub const HASHTAG_WEIGHT: f64 = 40.0;
pub const INTEREST_WEIGHT: f64 = 30.0;
pub const LOCATION_WEIGHT: f64 = 20.0;
pub const BIO_WEIGHT: f64 = 10.0;

/// Default matchmaking radius in km
pub const DEFAULT_LOCATION_RADIUS_KM: u32 = 50;

/// HTTP request timeout in seconds
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;
