//! Client for the Tencent Map WebService API, used to resolve free-form
//! location input into structured administrative info.

use crate::location::query::LocationQuery;
use crate::transport::client::{ApiClient, ResponseBody};
use crate::transport::error::RequestError;
use log::warn;
use reqwest::{Client, Method};
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;

pub const MAP_ENDPOINT: &str = "https://apis.map.qq.com";

/// Administrative info for a resolved location.
///
/// Keys such as `nation`, `province`, `city`, `district` and `adcode` are
/// common to every lookup, but the exact key set differs per endpoint (the
/// geocoder adds `nation_code`, `city_code` and friends). That
/// inconsistency comes from the provider and is passed through as is.
pub type AdInfo = serde_json::Map<String, Value>;

#[derive(Debug, Deserialize)]
struct LookupEnvelope {
    status: Option<i64>,
    #[serde(default)]
    message: String,
    result: Option<LookupResult>,
}

#[derive(Debug, Deserialize)]
struct LookupResult {
    #[serde(default)]
    ad_info: AdInfo,
}

#[derive(Debug, Deserialize)]
struct SearchEnvelope {
    status: Option<i64>,
    #[serde(default)]
    message: String,
    result: Option<Vec<Vec<Value>>>,
}

/// Client for the three Tencent Map lookup endpoints.
///
/// Every request carries the WebService API key as the `key` query
/// parameter. Provider-level rejections (a non-zero `status` inside a 2xx
/// response) are logged and swallowed into an empty [`AdInfo`]; only
/// transport failures surface as errors.
pub struct MapClient {
    transport: ApiClient,
    api_key: String,
}

impl MapClient {
    pub fn new(api_key: impl Into<String>, http: Option<Client>, timeout: Option<Duration>) -> Self {
        Self::with_endpoint(MAP_ENDPOINT, api_key, http, timeout)
    }

    /// Builds a client against a non-default endpoint.
    pub fn with_endpoint(
        endpoint: impl Into<String>,
        api_key: impl Into<String>,
        http: Option<Client>,
        timeout: Option<Duration>,
    ) -> Self {
        Self {
            transport: ApiClient::new(endpoint, http, timeout),
            api_key: api_key.into(),
        }
    }

    /// Resolves an IPv4 address to administrative info.
    pub async fn location_lookup_by_ip(&self, ip: &str) -> Result<AdInfo, RequestError> {
        let params = [("ip", ip), ("key", self.api_key.as_str())];
        let body = self
            .transport
            .request("/ws/location/v1/ip", Method::GET, &params)
            .await?;
        Ok(extract_ad_info(body, "IP"))
    }

    /// Resolves a `lat,lng` pair to administrative info.
    pub async fn location_lookup_by_coordinates(
        &self,
        coordinates: &str,
    ) -> Result<AdInfo, RequestError> {
        let params = [("location", coordinates), ("key", self.api_key.as_str())];
        let body = self
            .transport
            .request("/ws/geocoder/v1", Method::GET, &params)
            .await?;
        Ok(extract_ad_info(body, "coordinates"))
    }

    /// Resolves a place name or administrative code via district search.
    ///
    /// Takes the first entry of the first result group and delegates its
    /// coordinates to [`Self::location_lookup_by_coordinates`], so a
    /// successful lookup performs two sequential network calls.
    pub async fn location_lookup_by_keyword(&self, keyword: &str) -> Result<AdInfo, RequestError> {
        let params = [("keyword", keyword), ("key", self.api_key.as_str())];
        let body = self
            .transport
            .request("/ws/district/v1/search", Method::GET, &params)
            .await?;

        let Some(value) = body.into_json() else {
            warn!("District search returned a non-JSON body");
            return Ok(AdInfo::new());
        };
        let envelope: SearchEnvelope = match serde_json::from_value(value) {
            Ok(envelope) => envelope,
            Err(e) => {
                warn!("District search returned an unexpected shape: {}", e);
                return Ok(AdInfo::new());
            }
        };
        if envelope.status != Some(0) {
            warn!(
                "Failed to query location by keyword: status {:?}, message {:?}",
                envelope.status, envelope.message
            );
        }

        let groups = envelope.result.unwrap_or_default();
        let Some(first) = groups.first().and_then(|group| group.first()) else {
            return Ok(AdInfo::new());
        };
        let coordinates = first.get("location").and_then(|location| {
            let lat = location.get("lat")?.as_f64()?;
            let lng = location.get("lng")?.as_f64()?;
            Some(format!("{lat},{lng}"))
        });
        let Some(coordinates) = coordinates else {
            warn!("District result for {:?} has no usable coordinates", keyword);
            return Ok(AdInfo::new());
        };
        self.location_lookup_by_coordinates(&coordinates).await
    }

    /// Classifies `query` and dispatches to exactly one lookup.
    ///
    /// The branch is final: an IP or coordinate lookup that resolves to an
    /// empty [`AdInfo`] is returned as is, keyword search only runs when
    /// neither pattern matched the input.
    pub async fn location_lookup(&self, query: &str) -> Result<AdInfo, RequestError> {
        match LocationQuery::classify(query) {
            LocationQuery::Ip(ip) => self.location_lookup_by_ip(&ip).await,
            LocationQuery::Coordinates(coordinates) => {
                self.location_lookup_by_coordinates(&coordinates).await
            }
            LocationQuery::Keyword(keyword) => self.location_lookup_by_keyword(&keyword).await,
        }
    }
}

/// Pulls `result.ad_info` out of an IP or geocoder response, logging a
/// warning when the provider rejected the query. Both provider rejection
/// and a genuinely absent `ad_info` collapse into an empty map.
fn extract_ad_info(body: ResponseBody, kind: &str) -> AdInfo {
    let Some(value) = body.into_json() else {
        warn!("Location lookup by {} returned a non-JSON body", kind);
        return AdInfo::new();
    };
    let envelope: LookupEnvelope = match serde_json::from_value(value) {
        Ok(envelope) => envelope,
        Err(e) => {
            warn!("Location lookup by {} returned an unexpected shape: {}", kind, e);
            return AdInfo::new();
        }
    };
    if envelope.status != Some(0) {
        warn!(
            "Failed to query location by {}: status {:?}, message {:?}",
            kind, envelope.status, envelope.message
        );
    }
    envelope
        .result
        .map(|result| result.ad_info)
        .unwrap_or_default()
}
