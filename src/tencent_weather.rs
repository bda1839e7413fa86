//! The main entry point for querying Tencent weather data by free-form
//! location input. Resolution always runs in two sequential passes:
//! location lookup through the map API, then the weather fetch with the
//! resolved province and city.

use crate::error::TencentWeatherError;
use crate::location::client::{AdInfo, MapClient, MAP_ENDPOINT};
use crate::weather::client::{WeatherClient, WeatherData, MAX_FORECAST_DAYS, WEATHER_ENDPOINT};
use bon::bon;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;

const DEFAULT_FORECAST_DAYS: u8 = 7;

/// The main client for the Tencent (QQ) weather and map APIs.
///
/// One `reqwest::Client` is shared by the location and weather lookups of
/// every query made through this value, so connections are pooled across
/// both providers. Dropping the client releases the pool; a caller-supplied
/// client is simply one more handle to a pool the caller keeps owning.
///
/// # Examples
///
/// ```no_run
/// use tencent_weather::{TencentWeather, TencentWeatherError};
///
/// # async fn run() -> Result<(), TencentWeatherError> {
/// let client = TencentWeather::builder().api_key("API_KEY").build()?;
/// let current = client.query_current_weather("北京市").await?;
/// let forecast = client
///     .query_weather_forecast()
///     .query("39.90469,116.40717")
///     .forecast_days(3)
///     .call()
///     .await?;
/// # Ok(())
/// # }
/// ```
pub struct TencentWeather {
    api_key: String,
    http: Client,
    weather_endpoint: String,
    map_endpoint: String,
    timeout: Option<Duration>,
}

#[bon]
impl TencentWeather {
    /// Creates a client for the given Tencent Map WebService API key.
    ///
    /// This method uses a builder pattern.
    ///
    /// # Arguments
    ///
    /// * `.api_key(...)`: **Required.** The Tencent Map WebService API key,
    ///   attached to every map request as the `key` query parameter.
    /// * `.http(Client)`: Optional. A shared `reqwest::Client`; a fresh one
    ///   is created when absent.
    /// * `.weather_endpoint(...)` / `.map_endpoint(...)`: Optional. Override
    ///   the provider base URLs.
    /// * `.timeout(Duration)`: Optional. Per-request deadline; expiry maps
    ///   to [`crate::RequestError::Timeout`].
    ///
    /// # Errors
    ///
    /// Returns [`TencentWeatherError::MissingApiKey`] when the key is empty.
    #[builder]
    pub fn new(
        #[builder(into)] api_key: String,
        http: Option<Client>,
        #[builder(into)] weather_endpoint: Option<String>,
        #[builder(into)] map_endpoint: Option<String>,
        timeout: Option<Duration>,
    ) -> Result<Self, TencentWeatherError> {
        if api_key.is_empty() {
            return Err(TencentWeatherError::MissingApiKey);
        }
        Ok(Self {
            api_key,
            http: http.unwrap_or_default(),
            weather_endpoint: weather_endpoint.unwrap_or_else(|| WEATHER_ENDPOINT.to_string()),
            map_endpoint: map_endpoint.unwrap_or_else(|| MAP_ENDPOINT.to_string()),
            timeout,
        })
    }

    /// Queries real-time weather for a location.
    ///
    /// `query` is a single location identifier, auto-detected:
    ///
    /// * `北京市` - location name
    /// * `110105` - adcode
    /// * `39.90469,116.40717` - coordinates (lat, lng)
    /// * `61.135.17.68` - IP address
    ///
    /// The result carries the requested categories plus today's
    /// sunrise/sunset under `rise` and the resolved administrative info
    /// under `location`. A location that fails to resolve degrades to
    /// empty province and city values, which the weather endpoint answers
    /// with no data; the call still succeeds.
    ///
    /// # Errors
    ///
    /// Returns [`TencentWeatherError::EmptyQuery`] before any network
    /// activity when `query` is empty, and transport failures unchanged.
    pub async fn query_current_weather(
        &self,
        query: &str,
    ) -> Result<WeatherData, TencentWeatherError> {
        if query.is_empty() {
            return Err(TencentWeatherError::EmptyQuery);
        }

        let ad_info = self.map_client().location_lookup(query).await?;
        let (province, city) = province_city(&ad_info);

        let mut res = self
            .weather_client()
            .fetch_current_weather(&province, &city)
            .await?;
        res.insert("location".to_string(), Value::Object(ad_info));
        Ok(res)
    }

    /// Queries forecast weather for up to 7 days into the future.
    ///
    /// This method uses a builder pattern.
    ///
    /// # Arguments
    ///
    /// * `.query(...)`: **Required.** A single location identifier, same
    ///   forms as [`Self::query_current_weather`].
    /// * `.forecast_days(u8)`: Optional. How many days of forecast data to
    ///   return (default: 7). A value of 1 returns hourly data instead of
    ///   daily data.
    ///
    /// The result maps `forecast` to the ordered forecast entries, `rise`
    /// to one sunrise/sunset entry per requested day and `location` to the
    /// resolved administrative info.
    ///
    /// # Errors
    ///
    /// Returns [`TencentWeatherError::EmptyQuery`] or
    /// [`TencentWeatherError::InvalidForecastDays`] before any network
    /// activity, and transport failures unchanged.
    #[builder]
    pub async fn query_weather_forecast(
        &self,
        query: &str,
        forecast_days: Option<u8>,
    ) -> Result<WeatherData, TencentWeatherError> {
        let forecast_days = forecast_days.unwrap_or(DEFAULT_FORECAST_DAYS);
        if query.is_empty() {
            return Err(TencentWeatherError::EmptyQuery);
        }
        if forecast_days > MAX_FORECAST_DAYS {
            return Err(TencentWeatherError::InvalidForecastDays(forecast_days));
        }

        let ad_info = self.map_client().location_lookup(query).await?;
        let (province, city) = province_city(&ad_info);

        let mut res = self
            .weather_client()
            .fetch_weather_forecast(&province, &city, forecast_days)
            .await?;
        res.insert("location".to_string(), Value::Object(ad_info));
        Ok(res)
    }

    fn map_client(&self) -> MapClient {
        MapClient::with_endpoint(
            &self.map_endpoint,
            &self.api_key,
            Some(self.http.clone()),
            self.timeout,
        )
    }

    fn weather_client(&self) -> WeatherClient {
        WeatherClient::with_endpoint(&self.weather_endpoint, Some(self.http.clone()), self.timeout)
    }
}

/// Province and city as the weather endpoint expects them: plain strings,
/// empty when resolution produced nothing.
fn province_city(ad_info: &AdInfo) -> (String, String) {
    let field = |key: &str| {
        ad_info
            .get(key)
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string()
    };
    (field("province"), field("city"))
}

/// Queries the Tencent weather API for real-time weather data in a
/// location of your choice.
///
/// Convenience wrapper that builds a [`TencentWeather`] for the lifetime
/// of this single call; both provider lookups share its connection pool,
/// released when the call returns.
pub async fn query_current_weather(
    api_key: &str,
    query: &str,
) -> Result<WeatherData, TencentWeatherError> {
    TencentWeather::builder()
        .api_key(api_key)
        .build()?
        .query_current_weather(query)
        .await
}

/// Queries the Tencent weather API for forecast data for up to 7 days
/// into the future. Pass `forecast_days = 1` for hourly granularity.
pub async fn query_weather_forecast(
    api_key: &str,
    query: &str,
    forecast_days: u8,
) -> Result<WeatherData, TencentWeatherError> {
    TencentWeather::builder()
        .api_key(api_key)
        .build()?
        .query_weather_forecast()
        .query(query)
        .forecast_days(forecast_days)
        .call()
        .await
}
