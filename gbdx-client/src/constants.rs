//! Platform-wide constants.

pub const GBDX_BASE_URL: &str = "https://geobigdata.io";
pub const GBDX_AUTH_URL: &str = "https://geobigdata.io/auth/v1/oauth/token";

/// Seconds a catalog query result stays reusable.
pub const QUERY_CACHE_DURATION_SECS: u64 = 300;

/// Default request timeout for the reqwest-backed session.
pub const REQUEST_TIMEOUT_SECS: u64 = 60;

pub const TEST_ORDER_NUM: &str = "054581653";
pub const TEST_CAT_ID: &str = "1030010006C85000";
pub const TEST_AOI: [f64; 4] = [
    -122.44535716344512,
    47.114994482489955,
    -122.38750565914782,
    47.21057522872027,
];

/// Joins URL segments with `/`, trimming stray separators at the seams.
pub fn join_url(base: &str, segments: &[&str]) -> String {
    let mut url = base.trim_end_matches('/').to_string();
    for segment in segments {
        url.push('/');
        url.push_str(segment.trim_matches('/'));
    }
    url
}

/// Percent-encodes a caller-supplied id so it stays a single path segment.
pub fn path_segment(id: &str) -> String {
    urlencoding::encode(id).into_owned()
}
