//! Reqwest-backed Triposo source adapter.
//!
//! This adapter owns transport details only: query-string construction,
//! account headers, timeout and HTTP error mapping, and JSON decoding into
//! domain candidates.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use tracing::debug;

use super::dto::TriposoResponseDto;
use crate::domain::ports::{
    RecommendationCandidate, RecommendationQuery, RecommendationRanking, RecommendationSource,
    RecommendationSourceError,
};

const ACCOUNT_HEADER: &str = "X-Triposo-Account";
const TOKEN_HEADER: &str = "X-Triposo-Token";
const RESPONSE_FIELDS: &str = "name,coordinates,intro,snippet,images,properties,score";
const RELEVANCE_ORDER: &str = "-score";
const LOCAL_POPULARITY_ORDER: &str = "-character-Popular_with_locals_score";

/// Account credentials sent with every Triposo request.
#[derive(Clone)]
pub struct TriposoCredentials {
    /// Value of the `X-Triposo-Account` header.
    pub account: String,
    /// Value of the `X-Triposo-Token` header.
    pub token: String,
}

impl std::fmt::Debug for TriposoCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TriposoCredentials")
            .field("account", &self.account)
            .field("token", &"<redacted>")
            .finish()
    }
}

/// Triposo source adapter that performs HTTP GET requests against one endpoint.
pub struct TriposoHttpSource {
    client: Client,
    endpoint: Url,
    credentials: TriposoCredentials,
}

impl TriposoHttpSource {
    /// Build an adapter using a reqwest client with an explicit request timeout.
    /// ```rust,ignore
    /// let source = TriposoHttpSource::new(endpoint, credentials, timeout);
    /// assert!(source.is_ok() || source.is_err());
    /// ```
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(
        endpoint: Url,
        credentials: TriposoCredentials,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint,
            credentials,
        })
    }
}

#[async_trait]
impl RecommendationSource for TriposoHttpSource {
    async fn recommend(
        &self,
        query: &RecommendationQuery,
    ) -> Result<Vec<RecommendationCandidate>, RecommendationSourceError> {
        let url = build_query_url(&self.endpoint, query)?;
        debug!(tag_labels = %query.tag_labels, count = query.max_results, "querying triposo");
        let response = self
            .client
            .get(url)
            .header(ACCOUNT_HEADER, self.credentials.account.as_str())
            .header(TOKEN_HEADER, self.credentials.token.as_str())
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        let body = response.bytes().await.map_err(map_transport_error)?;
        if !status.is_success() {
            return Err(map_status_error(status, body.as_ref()));
        }

        let mut candidates = parse_candidates(body.as_ref())?;
        candidates.truncate(usize::try_from(query.max_results).unwrap_or(usize::MAX));
        Ok(candidates)
    }
}

fn parse_candidates(body: &[u8]) -> Result<Vec<RecommendationCandidate>, RecommendationSourceError> {
    let decoded: TriposoResponseDto = serde_json::from_slice(body).map_err(|error| {
        RecommendationSourceError::decode(format!("invalid Triposo JSON payload: {error}"))
    })?;
    decoded
        .into_domain_candidates()
        .map_err(RecommendationSourceError::decode)
}

fn build_query_url(
    endpoint: &Url,
    query: &RecommendationQuery,
) -> Result<Url, RecommendationSourceError> {
    for (label, value) in [
        ("start location", &query.start_location),
        ("end location", &query.end_location),
        ("tag labels", &query.tag_labels),
    ] {
        if value.trim().is_empty() {
            return Err(RecommendationSourceError::invalid_request(format!(
                "{label} must not be blank"
            )));
        }
    }

    let order_by = match query.ranking {
        RecommendationRanking::Relevance => RELEVANCE_ORDER,
        RecommendationRanking::LocalPopularity => LOCAL_POPULARITY_ORDER,
    };
    let mut url = endpoint.clone();
    url.query_pairs_mut()
        .append_pair(
            "annotate",
            &format!(
                "distance:linestring:{},{}",
                query.start_location, query.end_location
            ),
        )
        .append_pair("tag_labels", &query.tag_labels)
        .append_pair("distance", &format!("<{}", query.max_distance_meters))
        .append_pair("order_by", order_by)
        .append_pair("count", &query.max_results.to_string())
        .append_pair("fields", RESPONSE_FIELDS);
    Ok(url)
}

fn map_transport_error(error: reqwest::Error) -> RecommendationSourceError {
    if error.is_timeout() {
        RecommendationSourceError::timeout(error.to_string())
    } else {
        RecommendationSourceError::transport(error.to_string())
    }
}

fn map_status_error(status: StatusCode, body: &[u8]) -> RecommendationSourceError {
    let body_preview = body_preview(body);
    let message = if body_preview.is_empty() {
        format!("status {}", status.as_u16())
    } else {
        format!("status {}: {}", status.as_u16(), body_preview)
    };

    match status {
        StatusCode::TOO_MANY_REQUESTS => RecommendationSourceError::rate_limited(message),
        StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => {
            RecommendationSourceError::timeout(message)
        }
        _ if status.is_client_error() => RecommendationSourceError::invalid_request(message),
        _ => RecommendationSourceError::transport(message),
    }
}

fn body_preview(body: &[u8]) -> String {
    const PREVIEW_CHAR_LIMIT: usize = 160;

    let compact = String::from_utf8_lossy(body)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let preview = compact.chars().take(PREVIEW_CHAR_LIMIT).collect::<String>();
    if compact.chars().count() > PREVIEW_CHAR_LIMIT {
        format!("{preview}...")
    } else {
        preview
    }
}
