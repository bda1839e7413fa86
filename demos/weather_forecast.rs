use tencent_weather::{TencentWeather, TencentWeatherError};

#[tokio::main]
async fn main() -> Result<(), TencentWeatherError> {
    let api_key = std::env::var("TENCENT_MAP_API_KEY")
        .expect("set TENCENT_MAP_API_KEY to a Tencent Map WebService API key");
    let query = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "39.90469,116.40717".to_string());

    let client = TencentWeather::builder().api_key(api_key).build()?;

    let daily = client
        .query_weather_forecast()
        .query(query.as_str())
        .forecast_days(3)
        .call()
        .await?;
    dbg!(&daily);

    let hourly = client
        .query_weather_forecast()
        .query(query.as_str())
        .forecast_days(1)
        .call()
        .await?;
    dbg!(&hourly);

    Ok(())
}
