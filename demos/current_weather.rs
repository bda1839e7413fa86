use tencent_weather::{query_current_weather, TencentWeatherError};

#[tokio::main]
async fn main() -> Result<(), TencentWeatherError> {
    let api_key = std::env::var("TENCENT_MAP_API_KEY")
        .expect("set TENCENT_MAP_API_KEY to a Tencent Map WebService API key");
    let query = std::env::args().nth(1).unwrap_or_else(|| "北京市".to_string());

    let res = query_current_weather(&api_key, &query).await?;
    dbg!(&res);
    Ok(())
}
