// Time zones known to the server (read-only system list)
use crate::cache::{Resource, ResourceCache};
use crate::display::Selectable;
use crate::xml::{parse_or_default, FieldMap, PropertyDump};
use chrono::FixedOffset;
use serde::Serialize;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct TimeZone {
    pub time_zone_id: i32,
    pub display_name: String,
    // Minutes added to local time to get UTC
    pub bias: i32,
    pub daylight_bias: i32,
    pub language_code: i32,
}

pub type TimeZones = ResourceCache<TimeZone>;

impl TimeZone {
    pub fn utc_offset(&self) -> Option<FixedOffset> {
        FixedOffset::west_opt(self.bias.checked_mul(60)?)
    }

    pub fn daylight_offset(&self) -> Option<FixedOffset> {
        let minutes = self.bias.checked_add(self.daylight_bias)?;
        FixedOffset::west_opt(minutes.checked_mul(60)?)
    }
}

impl FieldMap for TimeZone {
    fn set_field(&mut self, name: &str, value: &str) {
        match name {
            "TimeZoneId" => self.time_zone_id = parse_or_default(value),
            "DisplayName" => self.display_name = value.to_string(),
            "Bias" => self.bias = parse_or_default(value),
            "DaylightBias" => self.daylight_bias = parse_or_default(value),
            "LanguageCode" => self.language_code = parse_or_default(value),
            _ => (),
        }
    }
}

impl PropertyDump for TimeZone {
    fn properties(&self) -> Vec<(&'static str, String)> {
        vec![
            ("TimeZoneId", self.time_zone_id.to_string()),
            ("DisplayName", self.display_name.clone()),
            ("Bias", self.bias.to_string()),
            ("DaylightBias", self.daylight_bias.to_string()),
            ("LanguageCode", self.language_code.to_string()),
        ]
    }
}

impl Resource for TimeZone {
    type Key = i32;
    const RESOURCE_NAME: &'static str = "TimeZone";
    const ELEMENT_NAME: &'static str = "TimeZone";
    const COLLECTION_PATH: &'static str = "/timezones";

    fn key(&self) -> i32 {
        self.time_zone_id
    }
}

impl Selectable for TimeZone {
    fn unique_identifier(&self) -> String {
        self.time_zone_id.to_string()
    }

    fn selection_display_string(&self) -> String {
        self.display_name.clone()
    }
}

impl std::fmt::Display for TimeZone {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} [{}]", self.display_name, self.time_zone_id)
    }
}
