//! Weather lookup with a deterministic fallback.
//!
//! When an API key is configured the tool asks an OpenWeatherMap-compatible
//! endpoint. Without a key, or on any provider failure, it reports simulated
//! weather derived from a stable hash of the city name so that the same city
//! always gets the same answer.

use async_trait::async_trait;
use schemars::JsonSchema;
use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;
use serde_json::{json, Value};
use sha2::{Digest, Sha256};
use std::time::Duration;

use shopdesk_core::{config::WeatherConfig, traits::Tool, types::ToolOutput, Error, Result};
use shopdesk_store::WeatherCondition;

use crate::args::{self, title_case};
use crate::kind::ToolKind;

const GOOD_SHIPPING: &str = "Good conditions for shipping.";
const DELAYED_SHIPPING: &str = "Potential shipping delays due to weather.";

#[derive(Debug, Deserialize, JsonSchema)]
pub struct WeatherArgs {
    /// City name. Take it from the customer's address when they do not say.
    pub city: String,
}

#[derive(Debug, Deserialize)]
struct ProviderResponse {
    weather: Vec<ProviderCondition>,
    main: ProviderMain,
}

#[derive(Debug, Deserialize)]
struct ProviderCondition {
    description: String,
}

#[derive(Debug, Deserialize)]
struct ProviderMain {
    temp: f64,
}

/// A weather reading, live or simulated.
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherReport {
    pub city: String,
    pub description: String,
    pub temperature_c: f64,
    pub condition: Option<WeatherCondition>,
    pub simulated: bool,
}

impl WeatherReport {
    /// Simulated reading: condition and 20-34 °C picked by hashing the city.
    pub fn simulated(city: &str) -> Self {
        let digest = Sha256::digest(city.trim().to_lowercase().as_bytes());
        let mut bytes = [0u8; 8];
        bytes.copy_from_slice(&digest[..8]);
        let hash = u64::from_be_bytes(bytes);

        let condition = WeatherCondition::ALL[(hash % WeatherCondition::ALL.len() as u64) as usize];
        Self {
            city: city.trim().to_string(),
            description: condition.as_str().to_string(),
            temperature_c: (20 + hash % 15) as f64,
            condition: Some(condition),
            simulated: true,
        }
    }

    fn advisory(&self) -> Option<&'static str> {
        self.condition.map(|c| {
            if c.delays_shipping() {
                DELAYED_SHIPPING
            } else {
                GOOD_SHIPPING
            }
        })
    }

    pub fn render(&self) -> String {
        let reading = format!(
            "Weather in {}: {}, {}°C.",
            self.city,
            title_case(&self.description),
            format_temp(self.temperature_c)
        );
        match self.advisory() {
            Some(advice) => format!("{} {}", reading, advice),
            None => reading,
        }
    }
}

fn format_temp(t: f64) -> String {
    if t.fract() == 0.0 {
        format!("{:.0}", t)
    } else {
        format!("{:.1}", t)
    }
}

pub struct WeatherTool {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<Secret<String>>,
}

impl WeatherTool {
    pub fn from_config(config: &WeatherConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            client,
            base_url: config.base_url.clone(),
            api_key: config.usable_api_key().map(|k| Secret::new(k.to_string())),
        }
    }

    async fn fetch(&self, city: &str, key: &str) -> Result<WeatherReport> {
        let resp = self
            .client
            .get(&self.base_url)
            .query(&[("q", city), ("appid", key), ("units", "metric")])
            .send()
            .await
            .map_err(|e| Error::tool_execution(format!("Weather request failed: {}", e)))?
            .error_for_status()
            .map_err(|e| Error::tool_execution(format!("Weather provider error: {}", e)))?;

        let body: ProviderResponse = resp
            .json()
            .await
            .map_err(|e| Error::tool_execution(format!("Malformed weather response: {}", e)))?;

        let description = body
            .weather
            .into_iter()
            .next()
            .map(|w| w.description)
            .ok_or_else(|| Error::tool_execution("Weather response has no conditions"))?;

        Ok(WeatherReport {
            city: city.to_string(),
            condition: description.parse().ok(),
            description,
            temperature_c: body.main.temp,
            simulated: false,
        })
    }

    /// Live reading when keyed, simulated otherwise. Never fails.
    pub async fn report(&self, city: &str) -> WeatherReport {
        let Some(key) = &self.api_key else {
            return WeatherReport::simulated(city);
        };

        match self.fetch(city.trim(), key.expose_secret()).await {
            Ok(report) => report,
            Err(e) => {
                tracing::warn!(city = city, error = %e, "Weather provider unavailable, using simulated weather");
                WeatherReport::simulated(city)
            }
        }
    }
}

#[async_trait]
impl Tool for WeatherTool {
    fn name(&self) -> &str {
        ToolKind::GetWeather.as_str()
    }

    fn description(&self) -> &str {
        "Get current weather for a city. You MUST call this tool for any weather question and never state weather without it. If no city is given, use the city from the customer's address."
    }

    fn parameters(&self) -> Value {
        args::schema::<WeatherArgs>()
    }

    async fn execute(&self, args: Value) -> Result<ToolOutput> {
        let args: WeatherArgs = args::parse(self.name(), args)?;
        if args.city.trim().is_empty() {
            return Ok(ToolOutput::rejected(
                "Please provide a city name so I can check the weather.",
            ));
        }

        let report = self.report(&args.city).await;
        Ok(ToolOutput::result(report.render()).with_data(json!({
            "city": report.city,
            "condition": report.condition.map(|c| c.as_str()),
            "temperature_c": report.temperature_c,
            "simulated": report.simulated,
        })))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simulated_weather_is_deterministic() {
        let a = WeatherReport::simulated("Seattle");
        let b = WeatherReport::simulated(" seattle ");
        assert_eq!(a.condition, b.condition);
        assert_eq!(a.temperature_c, b.temperature_c);
        assert!((20.0..=34.0).contains(&a.temperature_c));
    }

    #[test]
    fn test_advisory_matches_condition() {
        for city in ["London", "Paris", "Tokyo", "Lagos", "Lima", "Oslo"] {
            let report = WeatherReport::simulated(city);
            let text = report.render();
            match report.condition {
                Some(WeatherCondition::Sunny) | Some(WeatherCondition::Cloudy) => {
                    assert!(text.ends_with(GOOD_SHIPPING))
                }
                Some(_) => assert!(text.ends_with(DELAYED_SHIPPING)),
                None => panic!("Expected a simulated condition"),
            }
        }
    }

    #[tokio::test]
    async fn test_keyless_tool_output_is_stable() {
        let tool = WeatherTool::from_config(&WeatherConfig::default());

        let first = tool.execute(json!({ "city": "Chicago" })).await.unwrap();
        let second = tool.execute(json!({ "city": "Chicago" })).await.unwrap();
        assert_eq!(first.content, second.content);
        assert!(first.content.starts_with("RESULT: Weather in Chicago: "));
        assert_eq!(first.data.unwrap()["simulated"], true);
    }

    #[tokio::test]
    async fn test_unreachable_provider_falls_back() {
        let config = WeatherConfig {
            api_key: Some(Secret::new("test-key".to_string())),
            base_url: "http://127.0.0.1:9/data/2.5/weather".to_string(),
            timeout_secs: 1,
        };
        let tool = WeatherTool::from_config(&config);

        let out = tool.execute(json!({ "city": "Denver" })).await.unwrap();
        assert_eq!(
            out.content,
            format!("RESULT: {}", WeatherReport::simulated("Denver").render())
        );
    }

    #[test]
    fn test_provider_descriptions_render() {
        let report = WeatherReport {
            city: "Paris".into(),
            description: "light rain".into(),
            temperature_c: 12.34,
            condition: "light rain".parse().ok(),
            simulated: false,
        };
        assert_eq!(
            report.render(),
            "Weather in Paris: Light Rain, 12.3°C. Potential shipping delays due to weather."
        );
    }

    #[tokio::test]
    async fn test_blank_city_is_rejected() {
        let tool = WeatherTool::from_config(&WeatherConfig::default());
        let out = tool.execute(json!({ "city": "  " })).await.unwrap();
        assert!(!out.success);
    }
}
