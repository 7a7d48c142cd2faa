//! Weather tools - getWeather and getTime over a fixed table of cities
//!
//! Readings are dummy data; only the clock in getTime is live.

use async_trait::async_trait;
use chrono::{FixedOffset, Utc};
use eyre::eyre;
use serde_json::json;

use super::{ParamType, ParameterSchema, Tool};
use crate::domain::{ExecutionResult, Parameters};

struct City {
    name: &'static str,
    utc_offset_minutes: i32,
    timezone: &'static str,
    temperature_c: f64,
    condition: &'static str,
    humidity: u32,
    wind_kph: u32,
}

const CITIES: &[City] = &[
    City {
        name: "London",
        utc_offset_minutes: 0,
        timezone: "GMT",
        temperature_c: 15.0,
        condition: "Cloudy",
        humidity: 72,
        wind_kph: 14,
    },
    City {
        name: "New York",
        utc_offset_minutes: -5 * 60,
        timezone: "EST",
        temperature_c: 22.0,
        condition: "Sunny",
        humidity: 55,
        wind_kph: 10,
    },
    City {
        name: "Tokyo",
        utc_offset_minutes: 9 * 60,
        timezone: "JST",
        temperature_c: 18.0,
        condition: "Rainy",
        humidity: 80,
        wind_kph: 8,
    },
    City {
        name: "Paris",
        utc_offset_minutes: 60,
        timezone: "CET",
        temperature_c: 17.0,
        condition: "Partly Cloudy",
        humidity: 65,
        wind_kph: 12,
    },
    City {
        name: "Sydney",
        utc_offset_minutes: 10 * 60,
        timezone: "AEST",
        temperature_c: 25.0,
        condition: "Sunny",
        humidity: 50,
        wind_kph: 18,
    },
    City {
        name: "Mumbai",
        utc_offset_minutes: 5 * 60 + 30,
        timezone: "IST",
        temperature_c: 31.0,
        condition: "Humid",
        humidity: 85,
        wind_kph: 9,
    },
];

fn lookup(location: &str) -> Option<&'static City> {
    let wanted = location.trim();
    CITIES.iter().find(|c| c.name.eq_ignore_ascii_case(wanted))
}

fn location(params: &Parameters) -> Result<&str, eyre::Error> {
    params
        .get("location")
        .and_then(|v| v.as_str())
        .filter(|s| !s.trim().is_empty())
        .ok_or_else(|| eyre!("location is required"))
}

fn known_locations() -> String {
    CITIES.iter().map(|c| c.name).collect::<Vec<_>>().join(", ")
}

fn location_schema(description: &str) -> ParameterSchema {
    ParameterSchema::object().required_property("location", ParamType::String, description)
}

pub struct GetWeatherTool;

#[async_trait]
impl Tool for GetWeatherTool {
    fn name(&self) -> &'static str {
        "getWeather"
    }

    fn description(&self) -> &'static str {
        "Get the current weather for a city"
    }

    fn parameters(&self) -> ParameterSchema {
        location_schema("City name, e.g. London")
    }

    async fn execute(&self, params: &Parameters) -> Result<ExecutionResult, eyre::Error> {
        let location = location(params)?;
        let Some(city) = lookup(location) else {
            return Ok(ExecutionResult::failure(format!(
                "No weather data available for {}. Known locations: {}",
                location,
                known_locations()
            )));
        };

        Ok(ExecutionResult::success(
            json!({
                "location": city.name,
                "temperature": city.temperature_c,
                "unit": "celsius",
                "condition": city.condition,
                "humidity": city.humidity,
                "wind_kph": city.wind_kph,
            }),
            format!(
                "Weather in {}: {}, {}°C",
                city.name, city.condition, city.temperature_c
            ),
        ))
    }
}

pub struct GetTimeTool;

#[async_trait]
impl Tool for GetTimeTool {
    fn name(&self) -> &'static str {
        "getTime"
    }

    fn description(&self) -> &'static str {
        "Get the current local time for a city"
    }

    fn parameters(&self) -> ParameterSchema {
        location_schema("City name, e.g. Tokyo")
    }

    async fn execute(&self, params: &Parameters) -> Result<ExecutionResult, eyre::Error> {
        let location = location(params)?;
        let Some(city) = lookup(location) else {
            return Ok(ExecutionResult::failure(format!(
                "No timezone data available for {}. Known locations: {}",
                location,
                known_locations()
            )));
        };

        let offset = FixedOffset::east_opt(city.utc_offset_minutes * 60)
            .ok_or_else(|| eyre!("invalid UTC offset for {}", city.name))?;
        let now = Utc::now().with_timezone(&offset);

        Ok(ExecutionResult::success(
            json!({
                "location": city.name,
                "timezone": city.timezone,
                "utc_offset": offset.to_string(),
                "time": now.format("%H:%M:%S").to_string(),
                "date": now.format("%Y-%m-%d").to_string(),
                "iso": now.to_rfc3339(),
            }),
            format!("Current time in {} is {} {}", city.name, now.format("%H:%M"), city.timezone),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(location: &str) -> Parameters {
        let mut p = Parameters::new();
        p.insert("location".to_string(), location.into());
        p
    }

    #[tokio::test]
    async fn test_weather_known_city_case_insensitive() {
        let result = GetWeatherTool.execute(&at("london")).await.unwrap();
        assert!(result.success);
        assert_eq!(result.data["location"], "London");
        assert_eq!(result.data["condition"], "Cloudy");
        assert!(result.message.starts_with("Weather in London"));
    }

    #[tokio::test]
    async fn test_weather_unknown_city_is_failure_result() {
        let result = GetWeatherTool.execute(&at("Atlantis")).await.unwrap();
        assert!(!result.success);
        assert!(result.message.contains("Atlantis"));
        assert!(result.message.contains("Tokyo"));
    }

    #[tokio::test]
    async fn test_weather_missing_location_is_error() {
        assert!(GetWeatherTool.execute(&Parameters::new()).await.is_err());
        assert!(GetWeatherTool.execute(&at("   ")).await.is_err());
    }

    #[tokio::test]
    async fn test_time_reports_offset() {
        let result = GetTimeTool.execute(&at("Mumbai")).await.unwrap();
        assert!(result.success);
        assert_eq!(result.data["timezone"], "IST");
        assert_eq!(result.data["utc_offset"], "+05:30");
        assert!(result.data["iso"].as_str().unwrap().ends_with("+05:30"));
    }

    #[tokio::test]
    async fn test_time_negative_offset() {
        let result = GetTimeTool.execute(&at("New York")).await.unwrap();
        assert_eq!(result.data["utc_offset"], "-05:00");
    }

    #[test]
    fn test_schema_requires_location() {
        assert_eq!(GetWeatherTool.parameters().required, vec!["location"]);
        assert_eq!(GetTimeTool.parameters().required, vec!["location"]);
    }
}
