mod error;
mod location;
mod tencent_weather;
mod transport;
mod weather;

pub use error::TencentWeatherError;
pub use tencent_weather::*;

pub use location::client::{AdInfo, MapClient, MAP_ENDPOINT};
pub use location::query::LocationQuery;

pub use transport::client::{ApiClient, ResponseBody};
pub use transport::error::RequestError;

pub use weather::client::{WeatherClient, WeatherData, MAX_FORECAST_DAYS, WEATHER_ENDPOINT};
pub use weather::weather_type::WeatherType;
