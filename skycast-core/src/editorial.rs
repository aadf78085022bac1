//! Static editorial content and the merge that produces the final
//! dashboard payload.
//!
//! Editorial content is curated per location: suburb chips, rotating
//! one-line microtext, and optional hand-written stories that only show
//! when no dynamic stories were derived.

use serde::{Deserialize, Serialize};

use crate::model::{AirQuality, CurrentConditions, DailySlot, ForecastBundle, HourlySlot, Story};

/// Curated per-location content.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CityContent {
    pub suburbs: Vec<String>,
    pub microtext: Vec<String>,
    #[serde(default)]
    pub stories: Vec<Story>,
}

/// The merged payload the dashboard renders: live forecast plus editorial.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CityDashboard {
    pub name: String,
    pub suburbs: Vec<String>,
    pub current: CurrentConditions,
    pub microtext: Vec<String>,
    pub hourly: Vec<HourlySlot>,
    pub daily: Vec<DailySlot>,
    pub stories: Vec<Story>,
    pub air_quality: Option<AirQuality>,
}

/// Merge a forecast bundle with editorial content. Dynamic stories win over
/// static ones; static stories only surface when derivation produced none.
pub fn merge(bundle: ForecastBundle, content: Option<CityContent>) -> CityDashboard {
    let content = content.unwrap_or_default();
    let stories = if bundle.stories.is_empty() {
        content.stories
    } else {
        bundle.stories
    };

    CityDashboard {
        name: bundle.name,
        suburbs: content.suburbs,
        current: bundle.current,
        microtext: content.microtext,
        hourly: bundle.hourly,
        daily: bundle.daily,
        stories,
        air_quality: bundle.air_quality,
    }
}

/// Built-in editorial catalog for the known locations.
pub fn content_for(key: &str) -> Option<CityContent> {
    let (suburbs, microtext): (&[&str], &[&str]) = match key {
        "melbourne" => (
            &["Fitzroy", "St Kilda", "Brunswick", "Richmond", "Footscray"],
            &[
                "Four seasons in one day, as usual.",
                "Tram tracks are slippery when wet.",
                "Good day for the NGV if the rain sets in.",
            ],
        ),
        "sydney" => (
            &["Bondi", "Manly", "Newtown", "Parramatta", "Coogee"],
            &[
                "Harbour breeze picks up after lunch.",
                "Sunscreen first, then coffee.",
                "Ferries may be choppy across the heads.",
            ],
        ),
        "brisbane" => (
            &["New Farm", "West End", "Paddington", "South Bank", "Wynnum"],
            &[
                "Storm season: keep an eye on the radar.",
                "CityCats running to schedule.",
                "The humidity does the heavy lifting today.",
            ],
        ),
        "tasmania" => (
            &["Battery Point", "Sandy Bay", "North Hobart", "Kingston", "Bellerive"],
            &[
                "kunanyi may have snow above 900 m.",
                "Fireplace-and-a-book weather.",
                "Bring a layer, the southerly bites.",
            ],
        ),
        _ => return None,
    };

    Some(CityContent {
        suburbs: suburbs.iter().map(|s| s.to_string()).collect(),
        microtext: microtext.iter().map(|s| s.to_string()).collect(),
        stories: Vec::new(),
    })
}
