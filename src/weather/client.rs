//! Client for the Tencent (QQ) weather endpoint and the reshaping of its
//! raw payloads into current-conditions and forecast structures.

use crate::transport::client::ApiClient;
use crate::transport::error::RequestError;
use crate::weather::weather_type::WeatherType;
use log::warn;
use reqwest::{Client, Method};
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;

pub const WEATHER_ENDPOINT: &str = "https://wis.qq.com";

/// The largest number of forecast days the endpoint serves.
pub const MAX_FORECAST_DAYS: u8 = 7;

/// The hourly forecast always yields 24 hourly points plus one boundary
/// entry.
const HOURLY_FORECAST_ENTRIES: usize = 25;

/// A raw weather payload: one keyed sub-object per requested category.
pub type WeatherData = serde_json::Map<String, Value>;

#[derive(Debug, Deserialize)]
struct WeatherEnvelope {
    status: Option<i64>,
    message: Option<String>,
    data: Option<WeatherData>,
}

/// Client for the multiplexed `/weather/common` endpoint.
pub struct WeatherClient {
    transport: ApiClient,
}

impl WeatherClient {
    pub fn new(http: Option<Client>, timeout: Option<Duration>) -> Self {
        Self::with_endpoint(WEATHER_ENDPOINT, http, timeout)
    }

    /// Builds a client against a non-default endpoint.
    pub fn with_endpoint(
        endpoint: impl Into<String>,
        http: Option<Client>,
        timeout: Option<Duration>,
    ) -> Self {
        Self {
            transport: ApiClient::new(endpoint, http, timeout),
        }
    }

    /// Fetches raw weather data for a province and city.
    ///
    /// `weather_type` is a pipe-delimited category selector sent verbatim,
    /// e.g. `"observe|rise"`; see [`WeatherType`] for the known categories
    /// (observe, forecast_1h, forecast_24h, index, alarm, limit, tips,
    /// rise, air). The call counts as successful only when the response
    /// reports `status == 200` and `message == "OK"`; anything else is
    /// logged and collapsed into an empty [`WeatherData`], never an error.
    pub async fn fetch_weather(
        &self,
        province: &str,
        city: &str,
        weather_type: &str,
    ) -> Result<WeatherData, RequestError> {
        let params = [
            ("source", "pc"),
            ("weather_type", weather_type),
            ("province", province),
            ("city", city),
        ];
        let body = self
            .transport
            .request("/weather/common", Method::GET, &params)
            .await?;

        let Some(value) = body.into_json() else {
            warn!("Weather endpoint returned a non-JSON body");
            return Ok(WeatherData::new());
        };
        let envelope: WeatherEnvelope = match serde_json::from_value(value) {
            Ok(envelope) => envelope,
            Err(e) => {
                warn!("Weather endpoint returned an unexpected shape: {}", e);
                return Ok(WeatherData::new());
            }
        };
        if envelope.status != Some(200) || envelope.message.as_deref() != Some("OK") {
            warn!(
                "Weather query for province {:?}, city {:?} rejected: status {:?}, message {:?}",
                province, city, envelope.status, envelope.message
            );
            return Ok(WeatherData::new());
        }
        Ok(envelope.data.unwrap_or_default())
    }

    /// Returns current conditions: real-time observation, indices, alarms,
    /// car limits, tips, air quality, and today's sunrise/sunset.
    ///
    /// The endpoint keys `rise` entries by day index; only entry `"0"`
    /// (today) is kept, or an empty object when no rise data exists.
    pub async fn fetch_current_weather(
        &self,
        province: &str,
        city: &str,
    ) -> Result<WeatherData, RequestError> {
        let selector = WeatherType::join(&[
            WeatherType::Observe,
            WeatherType::Index,
            WeatherType::Alarm,
            WeatherType::Limit,
            WeatherType::Tips,
            WeatherType::Rise,
            WeatherType::Air,
        ]);
        let mut res = self.fetch_weather(province, city, &selector).await?;

        let today = res
            .get("rise")
            .and_then(|rise| rise.get("0"))
            .and_then(Value::as_object)
            .cloned()
            .unwrap_or_default();
        res.insert("rise".to_string(), Value::Object(today));
        Ok(res)
    }

    /// Returns forecast data for up to [`MAX_FORECAST_DAYS`] days.
    ///
    /// `forecast_days` is clamped into `1..=7`; a value of 1 selects the
    /// hourly granularity, anything larger the daily one. The result maps
    /// `forecast` to the sorted, capped forecast entries and `rise` to
    /// exactly `forecast_days` sorted sunrise/sunset entries.
    pub async fn fetch_weather_forecast(
        &self,
        province: &str,
        city: &str,
        forecast_days: u8,
    ) -> Result<WeatherData, RequestError> {
        let forecast_days = forecast_days.clamp(1, MAX_FORECAST_DAYS) as usize;
        let hourly = forecast_days == 1;
        let (category, sort_field) = if hourly {
            (WeatherType::Forecast1h, "update_time")
        } else {
            (WeatherType::Forecast24h, "time")
        };
        let selector = WeatherType::join(&[category, WeatherType::Rise]);
        let res = self.fetch_weather(province, city, &selector).await?;

        let mut forecast = sorted_entries(&res, category.as_str(), sort_field);
        // The first daily entry represents the prior, transitional day, so
        // one extra entry is kept in the daily case.
        let keep = if hourly {
            HOURLY_FORECAST_ENTRIES
        } else {
            forecast_days + 1
        };
        forecast.truncate(keep);

        let mut rise = sorted_entries(&res, "rise", "time");
        rise.truncate(forecast_days);

        let mut out = WeatherData::new();
        out.insert("forecast".to_string(), Value::Array(forecast));
        out.insert("rise".to_string(), Value::Array(rise));
        Ok(out)
    }
}

/// Collects the values of a keyed sub-object and sorts them ascending by a
/// string field. A missing field sorts as the empty string.
fn sorted_entries(data: &WeatherData, key: &str, sort_field: &str) -> Vec<Value> {
    let mut entries: Vec<Value> = data
        .get(key)
        .and_then(Value::as_object)
        .map(|map| map.values().cloned().collect())
        .unwrap_or_default();
    entries.sort_by(|a, b| field_text(a, sort_field).cmp(field_text(b, sort_field)));
    entries
}

fn field_text<'a>(entry: &'a Value, field: &str) -> &'a str {
    entry.get(field).and_then(Value::as_str).unwrap_or_default()
}
