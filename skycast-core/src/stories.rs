//! Derived dashboard stories.
//!
//! A story is a small rule-based metric over the current conditions: a fixed
//! set of thresholds turns raw measurements into a display value and a color
//! tag. The umbrella index, fire danger rating and UV index appear for every
//! location; the rest are keyed off the location identifier through a
//! dispatch table, or appear only when the optional enrichment data arrived.

use crate::model::{AirQuality, Condition, MarineConditions, RenderType, Story};

/// Raw (unrounded) inputs to story derivation.
#[derive(Debug, Clone)]
pub struct StoryInputs<'a> {
    pub temperature: f64,
    pub humidity: f64,
    pub wind_speed: f64,
    pub wind_gusts: f64,
    /// Day-zero maximum precipitation probability, percent.
    pub rain_probability: f64,
    pub uv_index: f64,
    pub condition: Condition,
    /// Calendar month 1-12, from the first daily entry.
    pub month: u32,
    pub air_quality: Option<&'a AirQuality>,
    pub marine: Option<&'a MarineConditions>,
}

type LocalStoryFn = fn(&StoryInputs) -> Vec<Story>;

/// Location-specific story generators. Adding a location means adding a row
/// here, not growing a conditional chain.
const LOCAL_STORIES: &[(&str, LocalStoryFn)] = &[
    ("melbourne", melbourne_stories),
    ("sydney", sydney_stories),
    ("brisbane", brisbane_stories),
    ("tasmania", tasmania_stories),
];

/// Derive the full story list for a location, in display order: umbrella
/// index first, then local stories, enrichment-dependent stories, and the
/// UV index last.
pub fn derive_stories(location_key: &str, inputs: &StoryInputs) -> Vec<Story> {
    let mut stories = vec![umbrella_index(inputs)];

    if let Some((_, build)) = LOCAL_STORIES.iter().find(|(key, _)| *key == location_key) {
        stories.extend(build(inputs));
    }

    stories.push(fire_danger(inputs));

    if let Some(marine) = inputs.marine {
        stories.push(surf_outlook(marine));
    }
    if let Some(air) = inputs.air_quality {
        stories.push(air_quality_story(air));
    }

    stories.push(uv_story(inputs));
    stories
}

fn bar(title: &str, value: String, color: &str) -> Story {
    Story {
        title: title.to_string(),
        value,
        render: RenderType::Bar,
        color: color.to_string(),
    }
}

fn text(title: &str, value: &str, color: &str) -> Story {
    Story {
        title: title.to_string(),
        value: value.to_string(),
        render: RenderType::Text,
        color: color.to_string(),
    }
}

fn umbrella_index(inputs: &StoryInputs) -> Story {
    let index = ((inputs.rain_probability / 10.0).round() as i32).min(10);
    let color = if index > 6 {
        "bg-blue-500"
    } else if index > 3 {
        "bg-blue-400"
    } else {
        "bg-green-500"
    };
    bar("Umbrella Index", format!("{index}/10"), color)
}

fn melbourne_stories(inputs: &StoryInputs) -> Vec<Story> {
    let (delay, color) = if inputs.condition == Condition::Stormy || inputs.wind_speed > 40.0 {
        ("High", "text-red-500")
    } else if inputs.condition == Condition::Rainy || inputs.wind_speed > 25.0 {
        ("Moderate", "text-yellow-500")
    } else {
        ("Low", "text-green-500")
    };

    vec![
        text("Tram Delay Likelihood", delay, color),
        bar("Coffee Quality", "11/10".to_string(), "bg-amber-700"),
    ]
}

fn sydney_stories(inputs: &StoryInputs) -> Vec<Story> {
    let mut score = 10;
    if matches!(inputs.condition, Condition::Rainy | Condition::Stormy) {
        score -= 5;
    }
    if inputs.temperature < 20.0 {
        score -= 2;
    }
    if inputs.wind_speed > 30.0 {
        score -= 2;
    }
    let score = score.clamp(0, 10);
    let beach_color = if score > 7 {
        "bg-yellow-500"
    } else if score > 4 {
        "bg-orange-400"
    } else {
        "bg-gray-400"
    };

    let (humidity, humidity_color) = if inputs.humidity > 70.0 {
        ("High", "text-orange-400")
    } else if inputs.humidity > 50.0 {
        ("Moderate", "text-yellow-400")
    } else {
        ("Low", "text-green-400")
    };

    vec![
        bar("Beach Day Score", format!("{score}/10"), beach_color),
        text("Humidity", humidity, humidity_color),
    ]
}

fn brisbane_stories(inputs: &StoryInputs) -> Vec<Story> {
    let percent = inputs.humidity.round() as i32;
    let humidity_color = if percent > 80 {
        "bg-red-500"
    } else if percent > 60 {
        "bg-orange-500"
    } else {
        "bg-green-500"
    };

    let (storm, storm_color) = if inputs.condition == Condition::Stormy {
        ("High", "text-purple-500")
    } else if inputs.rain_probability > 50.0 || inputs.condition == Condition::Rainy {
        ("Moderate", "text-yellow-500")
    } else {
        ("Low", "text-green-500")
    };

    let (river, river_color) = if inputs.rain_probability > 70.0 {
        ("Rising", "text-red-500")
    } else if inputs.rain_probability > 40.0 {
        ("Elevated", "text-yellow-500")
    } else {
        ("Normal", "text-blue-500")
    };

    vec![
        bar("Humidity", format!("{percent}%"), humidity_color),
        text("Storm Risk", storm, storm_color),
        text("River Level", river, river_color),
    ]
}

fn tasmania_stories(inputs: &StoryInputs) -> Vec<Story> {
    let mut fireplace = if inputs.temperature < 10.0 {
        10
    } else if inputs.temperature < 15.0 {
        8
    } else if inputs.temperature < 18.0 {
        6
    } else if inputs.temperature < 22.0 {
        4
    } else {
        2
    };
    if inputs.wind_speed > 20.0 {
        fireplace = (fireplace + 1).min(10);
    }
    let fireplace_color = if fireplace > 7 {
        "bg-orange-600"
    } else if fireplace > 4 {
        "bg-orange-400"
    } else {
        "bg-yellow-400"
    };

    // Aurora watching wants the dark half of the year and a clear sky.
    let is_winter = (5..=9).contains(&inputs.month);
    let (aurora, aurora_color) = if is_winter && inputs.condition == Condition::Clear {
        ("Moderate", "text-green-400")
    } else {
        ("Low", "text-gray-400")
    };

    vec![
        bar("Fireplace Index", format!("{fireplace}/10"), fireplace_color),
        text("Aurora Chance", aurora, aurora_color),
        text("Oyster Quality", "Peak", "text-teal-500"),
    ]
}

/// Weighted threshold score over heat, dryness and wind, discounted by rain.
fn fire_danger(inputs: &StoryInputs) -> Story {
    let mut score = 0;

    score += if inputs.temperature >= 40.0 {
        40
    } else if inputs.temperature >= 35.0 {
        32
    } else if inputs.temperature >= 30.0 {
        24
    } else if inputs.temperature >= 25.0 {
        16
    } else if inputs.temperature >= 20.0 {
        8
    } else {
        0
    };

    score += if inputs.humidity < 15.0 {
        30
    } else if inputs.humidity < 25.0 {
        22
    } else if inputs.humidity < 35.0 {
        14
    } else if inputs.humidity < 50.0 {
        6
    } else {
        0
    };

    let wind = inputs.wind_speed.max(inputs.wind_gusts / 2.0);
    score += if wind >= 60.0 {
        30
    } else if wind >= 45.0 {
        22
    } else if wind >= 30.0 {
        14
    } else if wind >= 15.0 {
        6
    } else {
        0
    };

    score -= if inputs.rain_probability >= 60.0 {
        20
    } else if inputs.rain_probability >= 30.0 {
        10
    } else {
        0
    };

    let (label, color) = if score >= 90 {
        ("Catastrophic", "text-purple-600")
    } else if score >= 70 {
        ("Extreme", "text-red-500")
    } else if score >= 50 {
        ("High", "text-orange-500")
    } else if score >= 25 {
        ("Moderate", "text-yellow-500")
    } else {
        ("Low", "text-green-500")
    };

    text("Fire Danger Rating", label, color)
}

fn surf_outlook(marine: &MarineConditions) -> Story {
    let (label, color) = if marine.wave_height_m >= 2.0 {
        ("Solid", "text-blue-500")
    } else if marine.wave_height_m >= 1.0 {
        ("Fun", "text-teal-500")
    } else {
        ("Flat", "text-gray-400")
    };
    text(
        "Surf Outlook",
        &format!("{} ({:.1} m)", label, marine.wave_height_m),
        color,
    )
}

fn air_quality_story(air: &AirQuality) -> Story {
    let (label, color) = if air.aqi <= 50 {
        ("Good", "text-green-500")
    } else if air.aqi <= 100 {
        ("Moderate", "text-yellow-500")
    } else if air.aqi <= 150 {
        ("Poor", "text-orange-500")
    } else {
        ("Hazardous", "text-red-500")
    };
    text("Air Quality", label, color)
}

fn uv_story(inputs: &StoryInputs) -> Story {
    let (label, color) = if inputs.uv_index > 10.0 {
        ("Extreme", "text-purple-600")
    } else if inputs.uv_index > 7.0 {
        ("Very High", "text-red-500")
    } else if inputs.uv_index > 5.0 {
        ("High", "text-orange-500")
    } else if inputs.uv_index > 2.0 {
        ("Moderate", "text-yellow-500")
    } else {
        ("Low", "text-green-500")
    };
    text("UV Index", label, color)
}
