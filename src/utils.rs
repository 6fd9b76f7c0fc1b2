use serde::Serialize;

/// Serialize a serde-backed enum into its wire name (e.g. `floor_heating`).
pub fn serde_enum_name<T: Serialize>(val: &T) -> Option<String> {
    serde_json::to_value(val).ok()?.as_str().map(|s| s.to_string())
}

/// One decimal with a degree sign; `--` when the value is unknown.
pub fn format_temperature(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{:.1}°", v),
        None => "--".to_string(),
    }
}
