use std::fmt;

/// A data category understood by the common weather endpoint.
///
/// The endpoint multiplexes all categories behind one `weather_type` query
/// parameter; the response carries one keyed sub-object per requested
/// category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WeatherType {
    /// Real-time weather.
    Observe,
    /// Hourly forecast for the next 24 hours.
    Forecast1h,
    /// Daily forecast for the next 7 days.
    Forecast24h,
    /// Today's living index data.
    Index,
    /// Real-time weather alarms.
    Alarm,
    /// Today's car limit data.
    Limit,
    /// Today's weather tips.
    Tips,
    /// Sunrise and sunset data.
    Rise,
    /// Real-time air quality.
    Air,
}

impl WeatherType {
    pub fn as_str(&self) -> &'static str {
        match self {
            WeatherType::Observe => "observe",
            WeatherType::Forecast1h => "forecast_1h",
            WeatherType::Forecast24h => "forecast_24h",
            WeatherType::Index => "index",
            WeatherType::Alarm => "alarm",
            WeatherType::Limit => "limit",
            WeatherType::Tips => "tips",
            WeatherType::Rise => "rise",
            WeatherType::Air => "air",
        }
    }

    /// Renders a set of categories as the pipe-delimited `weather_type`
    /// query parameter.
    pub fn join(types: &[WeatherType]) -> String {
        types
            .iter()
            .map(WeatherType::as_str)
            .collect::<Vec<_>>()
            .join("|")
    }
}

impl fmt::Display for WeatherType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn join_renders_pipe_delimited_selector() {
        let selector = WeatherType::join(&[
            WeatherType::Observe,
            WeatherType::Rise,
            WeatherType::Air,
        ]);
        assert_eq!(selector, "observe|rise|air");
    }

    #[test]
    fn join_of_a_single_category_has_no_delimiter() {
        assert_eq!(WeatherType::join(&[WeatherType::Forecast1h]), "forecast_1h");
    }
}
