//! Open-Meteo backed forecast provider.
//!
//! Three upstream endpoints: the forecast API (primary), the air-quality API
//! and the marine API (both best-effort). The three fetches run concurrently;
//! only a primary failure fails the call.

use async_trait::async_trait;
use chrono::{Datelike, NaiveDate, Timelike};
use reqwest::Client;
use serde::Deserialize;

use crate::{
    error::FetchError,
    location::Location,
    model::{
        AirQuality, CurrentConditions, DailySlot, ForecastBundle, HourlySlot, MarineConditions,
    },
    normalize,
    stories::{self, StoryInputs},
};

use super::ForecastProvider;

const FORECAST_URL: &str = "https://api.open-meteo.com/v1/forecast";
const AIR_QUALITY_URL: &str = "https://air-quality-api.open-meteo.com/v1/air-quality";
const MARINE_URL: &str = "https://marine-api.open-meteo.com/v1/marine";

const CURRENT_FIELDS: &str = "temperature_2m,relative_humidity_2m,apparent_temperature,\
                              weather_code,wind_speed_10m,wind_direction_10m,wind_gusts_10m,\
                              uv_index,pressure_msl,visibility,cloud_cover,dew_point_2m";
const HOURLY_FIELDS: &str = "temperature_2m,weather_code,precipitation_probability,wind_speed_10m";
const DAILY_FIELDS: &str = "temperature_2m_max,temperature_2m_min,weather_code,\
                            precipitation_probability_max,sunrise,sunset,precipitation_sum,\
                            wind_speed_10m_max,wind_gusts_10m_max";
const FORECAST_DAYS: u8 = 7;

pub const HOURLY_SLOTS: usize = 12;
pub const DAILY_SLOTS: usize = 7;

#[derive(Debug, Clone)]
pub struct OpenMeteoProvider {
    http: Client,
    forecast_url: String,
    air_quality_url: String,
    marine_url: String,
}

impl Default for OpenMeteoProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl OpenMeteoProvider {
    pub fn new() -> Self {
        Self {
            http: Client::new(),
            forecast_url: FORECAST_URL.to_string(),
            air_quality_url: AIR_QUALITY_URL.to_string(),
            marine_url: MARINE_URL.to_string(),
        }
    }

    /// Point the provider at alternative endpoints. Used by tests.
    pub fn with_base_urls(
        forecast_url: impl Into<String>,
        air_quality_url: impl Into<String>,
        marine_url: impl Into<String>,
    ) -> Self {
        Self {
            http: Client::new(),
            forecast_url: forecast_url.into(),
            air_quality_url: air_quality_url.into(),
            marine_url: marine_url.into(),
        }
    }

    async fn fetch_forecast_raw(&self, location: &Location) -> Result<OmResponse, FetchError> {
        let res = self
            .http
            .get(&self.forecast_url)
            .query(&[
                ("latitude", location.latitude.to_string()),
                ("longitude", location.longitude.to_string()),
                ("current", CURRENT_FIELDS.to_string()),
                ("hourly", HOURLY_FIELDS.to_string()),
                ("daily", DAILY_FIELDS.to_string()),
                ("timezone", location.timezone.to_string()),
                ("forecast_days", FORECAST_DAYS.to_string()),
            ])
            .send()
            .await?;

        let status = res.status();
        let body = res.text().await?;

        if !status.is_success() {
            return Err(FetchError::Status {
                status,
                body: truncate_body(&body),
            });
        }

        Ok(serde_json::from_str(&body)?)
    }

    /// Best-effort: any failure logs a warning and resolves to absent.
    async fn fetch_air_quality(&self, location: &Location) -> Option<AirQuality> {
        let res = match self
            .http
            .get(&self.air_quality_url)
            .query(&[
                ("latitude", location.latitude.to_string()),
                ("longitude", location.longitude.to_string()),
                ("current", "us_aqi,pm2_5,pm10".to_string()),
            ])
            .send()
            .await
        {
            Ok(res) => res,
            Err(err) => {
                tracing::warn!("air quality fetch failed: {err}");
                return None;
            }
        };

        if !res.status().is_success() {
            tracing::warn!("air quality fetch returned status {}", res.status());
            return None;
        }

        let parsed: OmAirQualityResponse = match res.json().await {
            Ok(parsed) => parsed,
            Err(err) => {
                tracing::warn!("air quality response parse failed: {err}");
                return None;
            }
        };

        Some(AirQuality {
            aqi: normalize::round(parsed.current.us_aqi),
            pm25: parsed.current.pm2_5,
            pm10: parsed.current.pm10,
        })
    }

    /// Best-effort, and only queried for coastal locations.
    async fn fetch_marine(&self, location: &Location) -> Option<MarineConditions> {
        if !location.coastal {
            return None;
        }

        let res = match self
            .http
            .get(&self.marine_url)
            .query(&[
                ("latitude", location.latitude.to_string()),
                ("longitude", location.longitude.to_string()),
                ("current", "wave_height,wave_period,wave_direction".to_string()),
            ])
            .send()
            .await
        {
            Ok(res) => res,
            Err(err) => {
                tracing::warn!("marine fetch failed: {err}");
                return None;
            }
        };

        if !res.status().is_success() {
            tracing::warn!("marine fetch returned status {}", res.status());
            return None;
        }

        let parsed: OmMarineResponse = match res.json().await {
            Ok(parsed) => parsed,
            Err(err) => {
                tracing::warn!("marine response parse failed: {err}");
                return None;
            }
        };

        Some(MarineConditions {
            wave_height_m: parsed.current.wave_height,
            wave_period_s: parsed.current.wave_period,
            wave_direction: normalize::wind_direction(parsed.current.wave_direction).to_string(),
        })
    }
}

#[async_trait]
impl ForecastProvider for OpenMeteoProvider {
    async fn forecast(&self, location: &Location) -> Result<ForecastBundle, FetchError> {
        // Independent fetches; overall latency is bounded by the slowest.
        let (primary, air_quality, marine) = tokio::join!(
            self.fetch_forecast_raw(location),
            self.fetch_air_quality(location),
            self.fetch_marine(location),
        );

        build_bundle(location, primary?, air_quality, marine)
    }
}

#[derive(Debug, Deserialize)]
struct OmResponse {
    current: OmCurrent,
    hourly: OmHourly,
    daily: OmDaily,
}

#[derive(Debug, Deserialize)]
struct OmCurrent {
    temperature_2m: f64,
    relative_humidity_2m: f64,
    apparent_temperature: f64,
    weather_code: i32,
    wind_speed_10m: f64,
    wind_direction_10m: f64,
    #[serde(default)]
    wind_gusts_10m: f64,
    #[serde(default)]
    uv_index: f64,
    #[serde(default)]
    pressure_msl: f64,
    #[serde(default)]
    visibility: f64,
    #[serde(default)]
    cloud_cover: f64,
    #[serde(default)]
    dew_point_2m: f64,
}

#[derive(Debug, Deserialize)]
struct OmHourly {
    time: Vec<String>,
    temperature_2m: Vec<f64>,
    weather_code: Vec<i32>,
    #[serde(default)]
    precipitation_probability: Vec<f64>,
    #[serde(default)]
    wind_speed_10m: Vec<f64>,
}

#[derive(Debug, Deserialize)]
struct OmDaily {
    time: Vec<String>,
    temperature_2m_max: Vec<f64>,
    temperature_2m_min: Vec<f64>,
    weather_code: Vec<i32>,
    #[serde(default)]
    precipitation_probability_max: Vec<f64>,
    #[serde(default)]
    sunrise: Vec<String>,
    #[serde(default)]
    sunset: Vec<String>,
    #[serde(default)]
    precipitation_sum: Vec<f64>,
    #[serde(default)]
    wind_speed_10m_max: Vec<f64>,
    #[serde(default)]
    wind_gusts_10m_max: Vec<f64>,
}

#[derive(Debug, Deserialize)]
struct OmAirQualityResponse {
    current: OmAirQualityCurrent,
}

#[derive(Debug, Deserialize)]
struct OmAirQualityCurrent {
    #[serde(default)]
    us_aqi: f64,
    #[serde(default)]
    pm2_5: f64,
    #[serde(default)]
    pm10: f64,
}

#[derive(Debug, Deserialize)]
struct OmMarineResponse {
    current: OmMarineCurrent,
}

#[derive(Debug, Deserialize)]
struct OmMarineCurrent {
    #[serde(default)]
    wave_height: f64,
    #[serde(default)]
    wave_period: f64,
    #[serde(default)]
    wave_direction: f64,
}

/// The provider's parallel arrays are not guaranteed to be equally long;
/// missing values read as zero, missing codes as out-of-table.
fn value_at(values: &[f64], index: usize) -> f64 {
    values.get(index).copied().unwrap_or(0.0)
}

fn code_at(codes: &[i32], index: usize) -> i32 {
    codes.get(index).copied().unwrap_or(-1)
}

fn build_bundle(
    location: &Location,
    raw: OmResponse,
    air_quality: Option<AirQuality>,
    marine: Option<MarineConditions>,
) -> Result<ForecastBundle, FetchError> {
    let current = &raw.current;
    let hourly = &raw.hourly;
    let daily = &raw.daily;

    if hourly.time.is_empty() {
        return Err(FetchError::MissingData("hourly data"));
    }
    if daily.time.is_empty() {
        return Err(FetchError::MissingData("daily data"));
    }

    let day_zero = NaiveDate::parse_from_str(&daily.time[0], "%Y-%m-%d")
        .map_err(|_| FetchError::MissingData("parsable daily dates"))?;
    let today_index = day_zero.weekday().num_days_from_sunday() as usize;
    let day_zero_rain = value_at(&daily.precipitation_probability_max, 0);

    let condition = normalize::condition_for_code(current.weather_code);

    let current_out = CurrentConditions {
        temperature: normalize::round(current.temperature_2m),
        feels_like: normalize::round(current.apparent_temperature),
        chance_of_rain: normalize::round(day_zero_rain),
        wind_speed: normalize::round(current.wind_speed_10m),
        wind_direction: normalize::wind_direction(current.wind_direction_10m).to_string(),
        condition,
        humidity: normalize::round(current.relative_humidity_2m),
        uv_index: normalize::round(current.uv_index),
        pressure: normalize::round(current.pressure_msl),
        visibility: normalize::metres_to_km(current.visibility),
        cloud_cover: normalize::round(current.cloud_cover),
        dew_point: normalize::round(current.dew_point_2m),
        wind_gusts: normalize::round(current.wind_gusts_10m),
    };

    let hourly_out: Vec<HourlySlot> = hourly
        .time
        .iter()
        .take(HOURLY_SLOTS)
        .enumerate()
        .map(|(index, timestamp)| {
            let hour = normalize::parse_local(timestamp)
                .map(|t| t.hour())
                .unwrap_or(0);
            HourlySlot {
                time_label: normalize::hourly_label(hour, index),
                temperature: normalize::round(value_at(&hourly.temperature_2m, index)),
                condition: normalize::condition_for_code(code_at(&hourly.weather_code, index)),
                is_peak_travel: normalize::is_peak_travel(hour),
                rain_prob: normalize::round(value_at(&hourly.precipitation_probability, index)),
                wind_speed: normalize::round(value_at(&hourly.wind_speed_10m, index)),
            }
        })
        .collect();

    let daily_out: Vec<DailySlot> = daily
        .time
        .iter()
        .take(DAILY_SLOTS)
        .enumerate()
        .map(|(index, _)| {
            let condition = normalize::condition_for_code(code_at(&daily.weather_code, index));
            DailySlot {
                day_label: normalize::daily_label(today_index, index),
                high: normalize::round(value_at(&daily.temperature_2m_max, index)),
                low: normalize::round(value_at(&daily.temperature_2m_min, index)),
                condition,
                rain_prob: normalize::round(value_at(&daily.precipitation_probability_max, index)),
                mood: normalize::mood_for(condition),
                sunrise: daily
                    .sunrise
                    .get(index)
                    .map(|s| normalize::clock_label(s))
                    .unwrap_or_default(),
                sunset: daily
                    .sunset
                    .get(index)
                    .map(|s| normalize::clock_label(s))
                    .unwrap_or_default(),
                precipitation_sum: normalize::round(value_at(&daily.precipitation_sum, index)),
                max_wind_speed: normalize::round(value_at(&daily.wind_speed_10m_max, index)),
                max_wind_gusts: normalize::round(value_at(&daily.wind_gusts_10m_max, index)),
            }
        })
        .collect();

    let story_inputs = StoryInputs {
        temperature: current.temperature_2m,
        humidity: current.relative_humidity_2m,
        wind_speed: current.wind_speed_10m,
        wind_gusts: current.wind_gusts_10m,
        rain_probability: day_zero_rain,
        uv_index: current.uv_index,
        condition,
        month: day_zero.month(),
        air_quality: air_quality.as_ref(),
        marine: marine.as_ref(),
    };
    let story_list = stories::derive_stories(location.key, &story_inputs);

    Ok(ForecastBundle {
        name: location.name.to_string(),
        current: current_out,
        hourly: hourly_out,
        daily: daily_out,
        stories: story_list,
        air_quality,
    })
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() > MAX {
        format!("{}...", &body[..MAX])
    } else {
        body.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Condition;
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_location(coastal: bool) -> Location {
        Location {
            key: "melbourne",
            name: "Melbourne",
            latitude: -37.8136,
            longitude: 144.9631,
            timezone: "Australia/Melbourne",
            coastal,
        }
    }

    fn provider_for(server: &MockServer) -> OpenMeteoProvider {
        OpenMeteoProvider::with_base_urls(
            format!("{}/forecast", server.uri()),
            format!("{}/air-quality", server.uri()),
            format!("{}/marine", server.uri()),
        )
    }

    // 2024-03-04 is a Monday.
    fn forecast_fixture() -> serde_json::Value {
        let hourly_times: Vec<String> =
            (0..12).map(|h| format!("2024-03-04T{h:02}:00")).collect();
        let daily_times: Vec<String> = (4..11).map(|d| format!("2024-03-{d:02}")).collect();

        json!({
            "current": {
                "temperature_2m": 21.6,
                "relative_humidity_2m": 55.0,
                "apparent_temperature": 19.4,
                "weather_code": 1,
                "wind_speed_10m": 18.2,
                "wind_direction_10m": 90.0,
                "wind_gusts_10m": 30.1,
                "uv_index": 6.4,
                "pressure_msl": 1014.2,
                "visibility": 24140.0,
                "cloud_cover": 40.0,
                "dew_point_2m": 12.6
            },
            "hourly": {
                "time": hourly_times,
                "temperature_2m": [15.2, 14.8, 14.5, 14.1, 13.9, 14.4, 15.8, 17.3, 18.9, 20.1, 21.0, 21.6],
                "weather_code": [1, 1, 2, 2, 3, 3, 2, 1, 1, 1, 0, 0],
                "precipitation_probability": [5.0, 5.0, 10.0, 10.0, 20.0, 20.0, 15.0, 10.0, 5.0, 5.0, 0.0, 0.0],
                "wind_speed_10m": [10.0, 11.0, 12.0, 12.0, 13.0, 14.0, 15.0, 16.0, 17.0, 18.0, 18.0, 18.2]
            },
            "daily": {
                "time": daily_times,
                "temperature_2m_max": [22.4, 24.1, 19.8, 18.2, 21.0, 25.6, 27.3],
                "temperature_2m_min": [12.1, 13.4, 11.0, 9.8, 10.5, 13.9, 15.2],
                "weather_code": [1, 3, 61, 95, 2, 0, 0],
                "precipitation_probability_max": [65.0, 30.0, 80.0, 90.0, 20.0, 5.0, 0.0],
                "sunrise": ["2024-03-04T06:45", "2024-03-05T06:46", "2024-03-06T06:47",
                            "2024-03-07T06:48", "2024-03-08T06:49", "2024-03-09T06:50",
                            "2024-03-10T06:51"],
                "sunset": ["2024-03-04T19:58", "2024-03-05T19:56", "2024-03-06T19:55",
                           "2024-03-07T19:53", "2024-03-08T19:52", "2024-03-09T19:50",
                           "2024-03-10T19:49"],
                "precipitation_sum": [4.2, 0.0, 12.6, 18.0, 0.4, 0.0, 0.0],
                "wind_speed_10m_max": [24.0, 20.0, 32.0, 45.0, 18.0, 15.0, 14.0],
                "wind_gusts_10m_max": [40.0, 35.0, 55.0, 70.0, 30.0, 24.0, 22.0]
            }
        })
    }

    fn air_quality_fixture() -> serde_json::Value {
        json!({ "current": { "us_aqi": 42.3, "pm2_5": 6.1, "pm10": 11.4 } })
    }

    fn marine_fixture() -> serde_json::Value {
        json!({ "current": { "wave_height": 1.4, "wave_period": 9.8, "wave_direction": 157.0 } })
    }

    #[tokio::test]
    async fn happy_path_produces_full_bundle() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/forecast"))
            .respond_with(ResponseTemplate::new(200).set_body_json(forecast_fixture()))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/air-quality"))
            .respond_with(ResponseTemplate::new(200).set_body_json(air_quality_fixture()))
            .mount(&server)
            .await;

        let provider = provider_for(&server);
        let bundle = provider
            .forecast(&test_location(false))
            .await
            .expect("forecast should succeed");

        assert_eq!(bundle.name, "Melbourne");

        assert_eq!(bundle.current.temperature, 22);
        assert_eq!(bundle.current.feels_like, 19);
        assert_eq!(bundle.current.chance_of_rain, 65);
        assert_eq!(bundle.current.wind_direction, "E");
        assert_eq!(bundle.current.condition, Condition::Clear);
        assert_eq!(bundle.current.uv_index, 6);
        assert_eq!(bundle.current.pressure, 1014);
        assert_eq!(bundle.current.visibility, 24);
        assert_eq!(bundle.current.wind_gusts, 30);

        assert_eq!(bundle.hourly.len(), 12);
        assert_eq!(bundle.hourly[0].time_label, "Now");
        assert_eq!(bundle.hourly[1].time_label, "1 AM");
        assert!(!bundle.hourly[0].is_peak_travel);
        assert!(bundle.hourly[7].is_peak_travel);
        assert_eq!(bundle.hourly[4].condition, Condition::Overcast);

        assert_eq!(bundle.daily.len(), 7);
        assert_eq!(bundle.daily[0].day_label, "Today");
        assert_eq!(bundle.daily[1].day_label, "Tue");
        assert_eq!(bundle.daily[6].day_label, "Sun");
        assert_eq!(bundle.daily[0].sunrise, "6:45 AM");
        assert_eq!(bundle.daily[0].sunset, "7:58 PM");
        assert_eq!(bundle.daily[2].condition, Condition::Rainy);
        assert_eq!(bundle.daily[3].condition, Condition::Stormy);
        assert_eq!(bundle.daily[0].precipitation_sum, 4);
        assert_eq!(bundle.daily[3].max_wind_gusts, 70);

        let titles: Vec<&str> = bundle.stories.iter().map(|s| s.title.as_str()).collect();
        assert_eq!(titles.first(), Some(&"Umbrella Index"));
        assert_eq!(titles.last(), Some(&"UV Index"));
        assert!(titles.contains(&"Tram Delay Likelihood"));
        assert_eq!(bundle.stories[0].value, "7/10");

        let air = bundle.air_quality.expect("air quality should be present");
        assert_eq!(air.aqi, 42);
        assert!((air.pm25 - 6.1).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn primary_failure_is_a_fetch_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/forecast"))
            .respond_with(ResponseTemplate::new(503).set_body_string("upstream down"))
            .mount(&server)
            .await;

        let provider = provider_for(&server);
        let err = provider
            .forecast(&test_location(false))
            .await
            .expect_err("forecast should fail");

        match err {
            FetchError::Status { status, body } => {
                assert_eq!(status.as_u16(), 503);
                assert!(body.contains("upstream down"));
            }
            other => panic!("expected status error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn air_quality_failure_is_swallowed() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/forecast"))
            .respond_with(ResponseTemplate::new(200).set_body_json(forecast_fixture()))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/air-quality"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let provider = provider_for(&server);
        let bundle = provider
            .forecast(&test_location(false))
            .await
            .expect("forecast should still succeed");

        assert!(bundle.air_quality.is_none());
        assert!(!bundle.stories.iter().any(|s| s.title == "Air Quality"));
    }

    #[tokio::test]
    async fn marine_is_queried_only_for_coastal_locations() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/forecast"))
            .respond_with(ResponseTemplate::new(200).set_body_json(forecast_fixture()))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/marine"))
            .respond_with(ResponseTemplate::new(200).set_body_json(marine_fixture()))
            .mount(&server)
            .await;

        let provider = provider_for(&server);

        let inland = provider
            .forecast(&test_location(false))
            .await
            .expect("forecast should succeed");
        assert!(!inland.stories.iter().any(|s| s.title == "Surf Outlook"));

        let coastal = provider
            .forecast(&test_location(true))
            .await
            .expect("forecast should succeed");
        let surf = coastal
            .stories
            .iter()
            .find(|s| s.title == "Surf Outlook")
            .expect("coastal location should have a surf story");
        assert_eq!(surf.value, "Fun (1.4 m)");
    }

    #[tokio::test]
    async fn empty_daily_block_is_missing_data() {
        let server = MockServer::start().await;
        let mut fixture = forecast_fixture();
        fixture["daily"] = json!({
            "time": [],
            "temperature_2m_max": [],
            "temperature_2m_min": [],
            "weather_code": []
        });
        Mock::given(method("GET"))
            .and(path("/forecast"))
            .respond_with(ResponseTemplate::new(200).set_body_json(fixture))
            .mount(&server)
            .await;

        let provider = provider_for(&server);
        let err = provider
            .forecast(&test_location(false))
            .await
            .expect_err("forecast should fail");
        assert!(matches!(err, FetchError::MissingData(_)));
    }
}
