//! Static location resolution.
//!
//! The known set is fixed at deployment time. Lookups are case-insensitive
//! and never fail: unknown keys resolve to the default location, so the
//! caller always gets usable coordinates. The fallback is silent on purpose;
//! the dashboard labels the result with the fallback location's own name.

/// A known dashboard location.
#[derive(Debug, Clone, PartialEq)]
pub struct Location {
    /// Short lowercase identifier, e.g. "melbourne".
    pub key: &'static str,
    pub name: &'static str,
    pub latitude: f64,
    pub longitude: f64,
    /// IANA timezone passed through to the upstream provider.
    pub timezone: &'static str,
    /// Gates the marine enrichment fetch.
    pub coastal: bool,
}

pub const DEFAULT_LOCATION_KEY: &str = "melbourne";

const LOCATIONS: &[Location] = &[
    Location {
        key: "melbourne",
        name: "Melbourne",
        latitude: -37.8136,
        longitude: 144.9631,
        timezone: "Australia/Melbourne",
        coastal: false,
    },
    Location {
        key: "sydney",
        name: "Sydney",
        latitude: -33.8688,
        longitude: 151.2093,
        timezone: "Australia/Sydney",
        coastal: true,
    },
    Location {
        key: "brisbane",
        name: "Brisbane",
        latitude: -27.4698,
        longitude: 153.0251,
        timezone: "Australia/Brisbane",
        coastal: true,
    },
    Location {
        key: "tasmania",
        name: "Tasmania",
        latitude: -42.8821,
        longitude: 147.3272,
        timezone: "Australia/Hobart",
        coastal: true,
    },
];

impl Location {
    /// All known locations, in display order.
    pub const fn all() -> &'static [Location] {
        LOCATIONS
    }

    /// Case-insensitive lookup of a known location key.
    pub fn find(key: &str) -> Option<&'static Location> {
        let lower = key.to_lowercase();
        LOCATIONS.iter().find(|location| location.key == lower)
    }

    /// Resolve a key to a location, falling back to the default when the key
    /// is unknown. The returned value is the fallback entry itself, so its
    /// key and display name describe the data actually served.
    pub fn resolve(key: &str) -> &'static Location {
        Location::find(key).unwrap_or_else(|| {
            tracing::warn!("unknown location key '{key}', falling back to {DEFAULT_LOCATION_KEY}");
            Location::default_location()
        })
    }

    pub fn default_location() -> &'static Location {
        // The default key is a member of LOCATIONS by construction.
        LOCATIONS
            .iter()
            .find(|location| location.key == DEFAULT_LOCATION_KEY)
            .unwrap_or(&LOCATIONS[0])
    }
}
