use chrono::Weekday;
use serde::de::{Deserializer, Error as DeError};
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Last representable minute of a day (23:59)
pub const LAST_MINUTE_OF_DAY: u16 = 24 * 60 - 1;

/// Opaque pharmacy identifier, kept exactly as the data file spells it
///
/// Any JSON number is accepted, negative and fractional ones included.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PharmacyId {
    Numeric(serde_json::Number),
    Text(String),
}

impl From<u64> for PharmacyId {
    fn from(id: u64) -> Self {
        PharmacyId::Numeric(id.into())
    }
}

impl fmt::Display for PharmacyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PharmacyId::Numeric(id) => write!(f, "{}", id),
            PharmacyId::Text(id) => f.write_str(id),
        }
    }
}

/// Pharmacy record as published in `pharmacies.json`
///
/// Field names on the wire are the French ones used by the published data set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pharmacy {
    pub id: PharmacyId,
    #[serde(rename = "nom")]
    pub name: String,
    #[serde(rename = "adresse")]
    pub address: String,
    #[serde(rename = "ville")]
    pub city: String,
    #[serde(rename = "codePostal", deserialize_with = "string_or_number")]
    pub postal_code: String,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(rename = "telephone", default)]
    pub phone: String,
    /// Pharmacie de garde: always open, whatever the schedule says
    #[serde(rename = "estDeGarde", default)]
    pub on_duty: bool,
    #[serde(rename = "horaires", default)]
    pub schedule: WeeklySchedule,
}

/// Accept `"76000"` as well as `76000`
fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(text) => Ok(text),
        serde_json::Value::Number(number) => Ok(number.to_string()),
        other => Err(D::Error::custom(format!("expected a string or a number, got {}", other))),
    }
}

/// Canonical weekday keys of a schedule, Sunday first
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DayKey {
    Sunday,
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
}

impl DayKey {
    pub const ALL: [DayKey; 7] = [
        DayKey::Sunday,
        DayKey::Monday,
        DayKey::Tuesday,
        DayKey::Wednesday,
        DayKey::Thursday,
        DayKey::Friday,
        DayKey::Saturday,
    ];

    /// Map chrono's weekday onto the schedule key
    pub fn from_weekday(weekday: Weekday) -> Self {
        match weekday {
            Weekday::Sun => DayKey::Sunday,
            Weekday::Mon => DayKey::Monday,
            Weekday::Tue => DayKey::Tuesday,
            Weekday::Wed => DayKey::Wednesday,
            Weekday::Thu => DayKey::Thursday,
            Weekday::Fri => DayKey::Friday,
            Weekday::Sat => DayKey::Saturday,
        }
    }

    /// Key as written in the data file
    pub fn as_str(&self) -> &'static str {
        match self {
            DayKey::Sunday => "dimanche",
            DayKey::Monday => "lundi",
            DayKey::Tuesday => "mardi",
            DayKey::Wednesday => "mercredi",
            DayKey::Thursday => "jeudi",
            DayKey::Friday => "vendredi",
            DayKey::Saturday => "samedi",
        }
    }
}

impl FromStr for DayKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DayKey::ALL
            .into_iter()
            .find(|day| day.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("Unknown day key: {}", s))
    }
}

/// Opening interval within a single day, in minutes since midnight
///
/// `open <= close` is expected but not enforced: a window whose close time is
/// earlier than its open time (spanning midnight) simply never matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    pub open: u16,
    pub close: u16,
}

impl TimeWindow {
    pub fn new(open: u16, close: u16) -> Self {
        Self { open, close }
    }

    pub fn from_hm(open_hour: u16, open_minute: u16, close_hour: u16, close_minute: u16) -> Self {
        Self {
            open: open_hour * 60 + open_minute,
            close: close_hour * 60 + close_minute,
        }
    }

    /// Inclusive on both ends
    #[inline]
    pub fn contains(&self, minutes: u16) -> bool {
        self.open <= minutes && minutes <= self.close
    }
}

/// Parse an `HH:MM` clock string into minutes since midnight.
///
/// `24:00` is accepted as the end of the day and maps to 23:59.
pub fn parse_clock(value: &str) -> Option<u16> {
    let (hours, minutes) = value.trim().split_once(':')?;
    let hours: u16 = hours.trim().parse().ok()?;
    let minutes: u16 = minutes.trim().parse().ok()?;

    match (hours, minutes) {
        (24, 0) => Some(LAST_MINUTE_OF_DAY),
        (0..=23, 0..=59) => Some(hours * 60 + minutes),
        _ => None,
    }
}

/// Format minutes since midnight as `HH:MM`
pub fn format_clock(minutes: u16) -> String {
    format!("{:02}:{:02}", minutes / 60, minutes % 60)
}

/// A window as written in the data file
#[derive(Debug, Clone, Serialize, Deserialize)]
struct RawTimeWindow {
    ouverture: String,
    fermeture: String,
}

impl From<&TimeWindow> for RawTimeWindow {
    fn from(window: &TimeWindow) -> Self {
        Self {
            ouverture: format_clock(window.open),
            fermeture: format_clock(window.close),
        }
    }
}

impl RawTimeWindow {
    fn parse(&self) -> Option<TimeWindow> {
        Some(TimeWindow {
            open: parse_clock(&self.ouverture)?,
            close: parse_clock(&self.fermeture)?,
        })
    }
}

/// Weekly opening schedule: day key to time windows
///
/// Entries that cannot be understood are dropped while deserializing, which
/// leaves the pharmacy closed for that slot.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WeeklySchedule {
    days: BTreeMap<DayKey, Vec<TimeWindow>>,
}

impl WeeklySchedule {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_day(mut self, day: DayKey, windows: Vec<TimeWindow>) -> Self {
        self.set_day(day, windows);
        self
    }

    /// Same windows for Monday through Friday
    pub fn with_weekdays(mut self, windows: Vec<TimeWindow>) -> Self {
        for day in [
            DayKey::Monday,
            DayKey::Tuesday,
            DayKey::Wednesday,
            DayKey::Thursday,
            DayKey::Friday,
        ] {
            self.set_day(day, windows.clone());
        }
        self
    }

    pub fn set_day(&mut self, day: DayKey, windows: Vec<TimeWindow>) {
        self.days.insert(day, windows);
    }

    /// Windows for a day; empty when the day is absent
    pub fn windows(&self, day: DayKey) -> &[TimeWindow] {
        self.days.get(&day).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn is_empty(&self) -> bool {
        self.days.values().all(Vec::is_empty)
    }
}

impl Serialize for WeeklySchedule {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.days.len()))?;
        for (day, windows) in &self.days {
            let raw: Vec<RawTimeWindow> = windows.iter().map(RawTimeWindow::from).collect();
            map.serialize_entry(day.as_str(), &raw)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for WeeklySchedule {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<BTreeMap<String, serde_json::Value>>::deserialize(deserializer)?
            .unwrap_or_default();

        let mut schedule = WeeklySchedule::new();
        for (key, value) in raw {
            let day = match key.parse::<DayKey>() {
                Ok(day) => day,
                Err(e) => {
                    tracing::warn!("Ignoring schedule entry: {}", e);
                    continue;
                }
            };

            let entries = match value {
                serde_json::Value::Array(entries) => entries,
                serde_json::Value::Null => Vec::new(),
                other => {
                    tracing::warn!("Schedule for {} is not a list ({}), treating as closed", key, other);
                    Vec::new()
                }
            };

            let windows = entries
                .into_iter()
                .filter_map(|entry| {
                    let window = serde_json::from_value::<RawTimeWindow>(entry.clone())
                        .ok()
                        .and_then(|raw| raw.parse());
                    if window.is_none() {
                        tracing::warn!("Skipping malformed time window on {}: {}", key, entry);
                    }
                    window
                })
                .collect();

            schedule.set_day(day, windows);
        }

        Ok(schedule)
    }
}

/// Point distances are measured from (user location or searched address)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReferencePosition {
    pub lat: f64,
    pub lng: f64,
}

impl ReferencePosition {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

/// Maximum distance accepted by the distance filter
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum DistanceLimit {
    #[default]
    Unlimited,
    Km(f64),
}

impl FromStr for DistanceLimit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() || s.eq_ignore_ascii_case("all") {
            return Ok(DistanceLimit::Unlimited);
        }
        let km: f64 = s
            .parse()
            .map_err(|_| format!("Invalid distance limit: {}", s))?;
        DistanceLimit::try_from(km)
    }
}

impl TryFrom<f64> for DistanceLimit {
    type Error = String;

    fn try_from(km: f64) -> Result<Self, Self::Error> {
        if km.is_nan() || km < 0.0 {
            return Err(format!("Distance limit must be a positive number, got {}", km));
        }
        Ok(DistanceLimit::Km(km))
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawDistanceLimit {
    Number(f64),
    Text(String),
}

impl Serialize for DistanceLimit {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            DistanceLimit::Unlimited => serializer.serialize_str("all"),
            DistanceLimit::Km(km) => serializer.serialize_f64(*km),
        }
    }
}

impl<'de> Deserialize<'de> for DistanceLimit {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        match RawDistanceLimit::deserialize(deserializer)? {
            RawDistanceLimit::Number(km) => DistanceLimit::try_from(km),
            RawDistanceLimit::Text(text) => text.parse(),
        }
        .map_err(D::Error::custom)
    }
}

/// Filter criteria coming from the user controls
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct FilterCriteria {
    #[serde(rename = "openOnly", default)]
    pub open_only: bool,
    #[serde(rename = "maxDistanceKm", default)]
    pub max_distance: DistanceLimit,
}

/// Pharmacy annotated by a ranking pass
///
/// The distance lives here rather than on the record, so it always belongs
/// to the reference position of the pass that produced it.
#[derive(Debug, Clone, Serialize)]
pub struct RankedPharmacy<'a> {
    #[serde(flatten)]
    pub pharmacy: &'a Pharmacy,
    #[serde(rename = "distanceKm")]
    pub distance_km: Option<f64>,
    #[serde(rename = "isOpen")]
    pub is_open: bool,
}

/// Geospatial bounding box
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lon: f64,
    pub max_lon: f64,
}
