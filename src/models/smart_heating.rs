//! Models for the `smart_heating` REST/WebSocket payloads.
//!
//! Types only; requests live in `crate::client`.
//!
//! Notes
//! - The backend is the source of truth; these structs are a display-side mirror.
//! - Keys we do not model explicitly are kept in an `extra` map so nothing is lost when a
//!   payload is echoed back (import/export, user updates).
//! - String enums tolerate unknown values through an `Other`/`Unknown` variant.

use chrono::{DateTime, NaiveDate, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

// =====================
// Identifiers
// =====================

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AreaId(pub String);

impl AreaId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for AreaId {
    fn from(value: &str) -> Self {
        AreaId(value.to_string())
    }
}

impl fmt::Display for AreaId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub String);

// =====================
// String enums
// =====================

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AreaState {
    Heating,
    Cooling,
    #[default]
    Idle,
    Off,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PresetMode {
    #[serde(rename = "none")]
    None_,
    Away,
    Eco,
    Comfort,
    Home,
    Sleep,
    Activity,
    Boost,
    #[serde(other)]
    Other,
}

impl PresetMode {
    /// Key prefix used by the per-area preset temperature settings (`comfort_temp`, ...).
    pub fn temperature_key(&self) -> Option<String> {
        match self {
            PresetMode::None_ | PresetMode::Other => None,
            other => crate::utils::serde_enum_name(other).map(|name| format!("{name}_temp")),
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HeatingType {
    #[default]
    Radiator,
    FloorHeating,
    Airco,
    #[serde(other)]
    Other,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HvacMode {
    Heat,
    Cool,
    HeatCool,
    Auto,
    Off,
    #[serde(other)]
    Other,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EfficiencyPeriod {
    Day,
    #[default]
    Week,
    Month,
    Year,
}

impl EfficiencyPeriod {
    pub fn as_str(&self) -> &'static str {
        match self {
            EfficiencyPeriod::Day => "day",
            EfficiencyPeriod::Week => "week",
            EfficiencyPeriod::Month => "month",
            EfficiencyPeriod::Year => "year",
        }
    }
}

/// Parse a CLI argument through the serde names so the accepted spelling matches the wire.
fn parse_wire_name<T: DeserializeOwned>(s: &str, what: &str) -> Result<T, String> {
    serde_json::from_value(Value::String(s.trim().to_ascii_lowercase()))
        .map_err(|_| format!("unknown {what}: {s}"))
}

impl FromStr for PresetMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match parse_wire_name(s, "preset mode")? {
            PresetMode::Other => Err(format!("unknown preset mode: {s}")),
            mode => Ok(mode),
        }
    }
}

impl FromStr for HeatingType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match parse_wire_name(s, "heating type")? {
            HeatingType::Other => Err(format!("unknown heating type: {s}")),
            kind => Ok(kind),
        }
    }
}

impl FromStr for HvacMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match parse_wire_name(s, "hvac mode")? {
            HvacMode::Other => Err(format!("unknown hvac mode: {s}")),
            mode => Ok(mode),
        }
    }
}

impl FromStr for EfficiencyPeriod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_wire_name(s, "period")
    }
}

// =====================
// Areas
// =====================

/// A presence/window sensor reference; the backend sends either a bare entity id or an
/// object with extra settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SensorRef {
    Entity(String),
    Detailed {
        entity_id: String,
        #[serde(flatten)]
        extra: BTreeMap<String, Value>,
    },
}

impl SensorRef {
    pub fn entity_id(&self) -> &str {
        match self {
            SensorRef::Entity(id) => id,
            SensorRef::Detailed { entity_id, .. } => entity_id,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Device {
    pub id: String,
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub device_type: Option<String>,
    pub entity_id: Option<String>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Schedule {
    pub id: Option<String>,
    #[serde(default)]
    pub days: Vec<String>,
    pub start_time: String,
    pub end_time: String,
    pub temperature: Option<f64>,
    pub preset_mode: Option<PresetMode>,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Area {
    pub id: AreaId,
    pub name: Option<String>,
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default)]
    pub hidden: bool,
    #[serde(default)]
    pub state: AreaState,
    pub target_temperature: f64,
    pub current_temperature: Option<f64>,
    pub effective_target_temperature: Option<f64>,
    pub preset_mode: Option<PresetMode>,
    #[serde(default)]
    pub manual_override: bool,
    #[serde(default)]
    pub heating_type: HeatingType,
    pub custom_overhead_temp: Option<f64>,
    pub hvac_mode: Option<HvacMode>,
    #[serde(default)]
    pub boost_mode_active: bool,
    pub boost_temp: Option<f64>,
    /// Boost duration in minutes.
    pub boost_duration: Option<u32>,
    #[serde(default)]
    pub devices: Vec<Device>,
    #[serde(default)]
    pub presence_sensors: Vec<SensorRef>,
    #[serde(default)]
    pub window_sensors: Vec<SensorRef>,
    #[serde(default)]
    pub auto_preset_enabled: bool,
    #[serde(default)]
    pub use_pid: bool,
    #[serde(default)]
    pub schedules: Vec<Schedule>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl Area {
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(self.id.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AreasResponse {
    #[serde(default)]
    pub areas: Vec<Area>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DevicesResponse {
    #[serde(default)]
    pub devices: Vec<Device>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemStatus {
    pub area_count: Option<u32>,
    pub active_areas: Option<u32>,
    pub version: Option<String>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

// =====================
// Global configuration
// =====================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GlobalConfig {
    pub opentherm_gateway_id: Option<String>,
    pub opentherm_enabled: Option<bool>,
    pub trv_heating_temp: Option<f64>,
    pub trv_idle_temp: Option<f64>,
    pub hysteresis: Option<f64>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct AdvancedControl {
    pub advanced_control_enabled: Option<bool>,
    pub heating_curve_enabled: Option<bool>,
    pub pwm_enabled: Option<bool>,
    pub pid_enabled: Option<bool>,
    pub overshoot_protection_enabled: Option<bool>,
    pub default_heating_curve_coefficient: Option<f64>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrostProtection {
    pub enabled: bool,
    pub temperature: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityState {
    pub entity_id: String,
    pub state: String,
    #[serde(default)]
    pub attributes: BTreeMap<String, Value>,
    pub last_changed: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityList {
    #[serde(default)]
    pub entities: Vec<EntityState>,
}

/// Global preset temperatures; only the presets present are sent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct GlobalPresets {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub away_temp: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub eco_temp: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comfort_temp: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub home_temp: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sleep_temp: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub activity_temp: Option<f64>,
}

// =====================
// Efficiency
// =====================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EfficiencyReport {
    pub area_id: Option<AreaId>,
    pub period: Option<EfficiencyPeriod>,
    pub energy_score: Option<f64>,
    pub heating_time_percentage: Option<f64>,
    pub heating_cycles: Option<u32>,
    pub avg_temp_delta: Option<f64>,
    #[serde(default)]
    pub recommendations: Vec<String>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllAreasEfficiency {
    pub period: Option<EfficiencyPeriod>,
    #[serde(default)]
    pub areas: Vec<EfficiencyReport>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonReport {
    pub period: Option<String>,
    #[serde(default)]
    pub comparisons: Vec<Value>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomComparison {
    pub start_a: DateTime<Utc>,
    pub end_a: DateTime<Utc>,
    pub start_b: DateTime<Utc>,
    pub end_b: DateTime<Utc>,
}

// =====================
// Import / export
// =====================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportResult {
    #[serde(default)]
    pub success: bool,
    pub backup_file: Option<String>,
    #[serde(default)]
    pub changes: BTreeMap<String, Value>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationResult {
    #[serde(default)]
    pub valid: bool,
    pub error: Option<String>,
    #[serde(default)]
    pub preview: BTreeMap<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Backup {
    pub filename: String,
    pub size: Option<u64>,
    pub created: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackupList {
    #[serde(default)]
    pub backups: Vec<Backup>,
}

// =====================
// Safety
// =====================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SafetySensor {
    pub sensor_id: String,
    pub alert_value: Option<Value>,
    #[serde(default = "default_true")]
    pub enabled: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SafetyStatus {
    #[serde(default)]
    pub sensors: Vec<SafetySensor>,
    #[serde(default)]
    pub alert_active: bool,
}

// =====================
// Users and presence
// =====================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub user_id: UserId,
    pub name: String,
    pub person_entity: Option<String>,
    #[serde(default)]
    pub areas: Vec<AreaId>,
    #[serde(default)]
    pub preset_preferences: BTreeMap<String, f64>,
    #[serde(default)]
    pub priority: i32,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UsersResponse {
    #[serde(default)]
    pub users: BTreeMap<String, User>,
    pub settings: Option<UserSettings>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct UserSettings {
    pub multi_user_strategy: Option<String>,
    pub enabled: Option<bool>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PresenceState {
    #[serde(default)]
    pub users_home: Vec<UserId>,
    #[serde(default)]
    pub users_away: Vec<UserId>,
    #[serde(default)]
    pub anyone_home: bool,
    pub active_preferences: Option<BTreeMap<String, f64>>,
}

// =====================
// Vacation
// =====================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct VacationMode {
    #[serde(default)]
    pub enabled: bool,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub preset_mode: Option<PresetMode>,
    pub frost_protection_override: Option<bool>,
    pub min_temperature: Option<f64>,
    pub auto_disable: Option<bool>,
}

// =====================
// OpenTherm
// =====================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpenThermLogEntry {
    pub timestamp: DateTime<Utc>,
    pub event_type: String,
    #[serde(default)]
    pub data: BTreeMap<String, Value>,
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpenThermLogs {
    #[serde(default)]
    pub logs: Vec<OpenThermLogEntry>,
    pub count: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpenThermCapabilities {
    pub gateway_id: Option<String>,
    pub modulation_supported: Option<bool>,
    pub dhw_supported: Option<bool>,
    pub max_setpoint: Option<f64>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpenThermGateway {
    pub gateway_id: Option<String>,
    #[serde(default)]
    pub enabled: bool,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpenThermGatewayList {
    #[serde(default)]
    pub gateways: Vec<OpenThermGatewayEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpenThermGatewayEntry {
    pub gateway_id: String,
    pub title: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalibrationResult {
    #[serde(default)]
    pub success: bool,
    pub opv: Option<f64>,
    pub message: Option<String>,
}

// =====================
// History and metrics
// =====================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub timestamp: DateTime<Utc>,
    pub current_temperature: Option<f64>,
    pub target_temperature: Option<f64>,
    pub state: Option<AreaState>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AreaHistory {
    pub area_id: Option<AreaId>,
    #[serde(default)]
    pub entries: Vec<HistoryEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryConfig {
    pub retention_days: u32,
    pub record_interval_seconds: Option<u32>,
    pub storage_backend: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdvancedMetrics {
    pub days: Option<u32>,
    #[serde(default)]
    pub metrics: Vec<Value>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}
