use serde::{Deserialize, Serialize};

/// Normalized weather state used throughout the dashboard.
///
/// Every upstream weather code maps into this closed set; codes outside the
/// mapping table fall back to [`Condition::Cloudy`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Condition {
    Clear,
    #[default]
    Cloudy,
    Overcast,
    Rainy,
    Stormy,
    Snow,
}

impl Condition {
    pub fn as_str(&self) -> &'static str {
        match self {
            Condition::Clear => "clear",
            Condition::Cloudy => "cloudy",
            Condition::Overcast => "overcast",
            Condition::Rainy => "rainy",
            Condition::Stormy => "stormy",
            Condition::Snow => "snow",
        }
    }
}

impl std::fmt::Display for Condition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Coarse color grouping attached to a daily entry for UI styling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MoodTag {
    Orange,
    Gray,
    Blue,
}

impl MoodTag {
    pub fn as_str(&self) -> &'static str {
        match self {
            MoodTag::Orange => "orange",
            MoodTag::Gray => "gray",
            MoodTag::Blue => "blue",
        }
    }
}

/// How a story renders in the sidebar: a progress bar or plain text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RenderType {
    Bar,
    Text,
}

/// A short derived fact about current conditions.
///
/// Color tags are the utility-class strings the dashboard UI styles with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Story {
    pub title: String,
    pub value: String,
    #[serde(rename = "type")]
    pub render: RenderType,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentConditions {
    #[serde(rename = "temp")]
    pub temperature: i32,
    pub feels_like: i32,
    #[serde(rename = "chanceRain")]
    pub chance_of_rain: i32,
    pub wind_speed: i32,
    #[serde(rename = "windDir")]
    pub wind_direction: String,
    pub condition: Condition,
    pub humidity: i32,
    pub uv_index: i32,
    /// Sea-level pressure, hPa.
    pub pressure: i32,
    /// Kilometers, converted from the provider's meters.
    pub visibility: i32,
    pub cloud_cover: i32,
    pub dew_point: i32,
    pub wind_gusts: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HourlySlot {
    /// "Now" for the first slot, then "3 PM"-style labels.
    #[serde(rename = "time")]
    pub time_label: String,
    #[serde(rename = "temp")]
    pub temperature: i32,
    pub condition: Condition,
    #[serde(rename = "isPeak")]
    pub is_peak_travel: bool,
    pub rain_prob: i32,
    pub wind_speed: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailySlot {
    /// "Today" for the first slot, then short weekday names.
    #[serde(rename = "day")]
    pub day_label: String,
    pub high: i32,
    pub low: i32,
    pub condition: Condition,
    pub rain_prob: i32,
    pub mood: MoodTag,
    /// Local clock label, e.g. "6:45 AM".
    pub sunrise: String,
    pub sunset: String,
    /// Millimeters over the day.
    pub precipitation_sum: i32,
    pub max_wind_speed: i32,
    pub max_wind_gusts: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AirQuality {
    pub aqi: i32,
    pub pm25: f64,
    pub pm10: f64,
}

/// Current sea state near a coastal location. Feeds story derivation only;
/// it is not part of the serialized bundle.
#[derive(Debug, Clone, PartialEq)]
pub struct MarineConditions {
    pub wave_height_m: f64,
    pub wave_period_s: f64,
    pub wave_direction: String,
}

/// Complete normalized forecast for one location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastBundle {
    pub name: String,
    pub current: CurrentConditions,
    pub hourly: Vec<HourlySlot>,
    pub daily: Vec<DailySlot>,
    pub stories: Vec<Story>,
    pub air_quality: Option<AirQuality>,
}
