use crate::transport::error::RequestError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TencentWeatherError {
    #[error(transparent)]
    Request(#[from] RequestError),

    #[error("Please provide a Tencent Map API key")]
    MissingApiKey,

    #[error("Empty location query")]
    EmptyQuery,

    #[error("Invalid forecast days: {0} is outside 0..=7")]
    InvalidForecastDays(u8),
}
