//! Plain-text rendering of area cards and settings panels.

use std::fmt::Write as _;

use crate::card::{AreaCard, Badge, PendingEdit};
use crate::models::smart_heating::*;
use crate::utils::{format_temperature, serde_enum_name};

fn enum_label<T: serde::Serialize>(value: &T) -> String {
    serde_enum_name(value).unwrap_or_else(|| "?".to_string())
}

pub fn render_badge(badge: &Badge) -> String {
    match badge {
        Badge::Disabled => "disabled".to_string(),
        Badge::Off => "off".to_string(),
        Badge::Hidden => "hidden".to_string(),
        Badge::ManualOverride => "manual".to_string(),
        Badge::Preset(mode) => format!("preset:{}", enum_label(mode)),
        Badge::Boost { temperature, minutes } => match minutes {
            Some(m) => format!("boost {} {}min", format_temperature(*temperature), m),
            None => format!("boost {}", format_temperature(*temperature)),
        },
        Badge::Scheduled => "scheduled".to_string(),
        Badge::HeatingType(kind) => enum_label(kind),
        Badge::Overhead(t) => format!("overhead +{:.1}°", t),
    }
}

pub fn render_card(card: &AreaCard) -> String {
    let area = card.area();
    let mut out = String::new();
    let _ = writeln!(out, "{} [{}]  {}", area.display_name(), area.id, enum_label(&area.state));

    let mut line = format!(
        "  now {}  target {}",
        format_temperature(area.current_temperature),
        format_temperature(Some(card.derived()))
    );
    match card.pending() {
        Some(PendingEdit::Dragging(v)) => {
            let _ = write!(line, "  (editing {})", format_temperature(Some(v)));
        }
        Some(PendingEdit::Committed(v)) => {
            let _ = write!(line, "  (saving {})", format_temperature(Some(v)));
        }
        None => {}
    }
    if let Some(mode) = area.hvac_mode {
        let _ = write!(line, "  hvac:{}", enum_label(&mode));
    }
    let _ = writeln!(out, "{}", line);

    let mut tags: Vec<String> = card.badges().iter().map(render_badge).collect();
    if !area.devices.is_empty() {
        tags.push(format!("{} device(s)", area.devices.len()));
    }
    if !area.presence_sensors.is_empty() {
        tags.push(format!("{} presence sensor(s)", area.presence_sensors.len()));
    }
    if !tags.is_empty() {
        let _ = writeln!(out, "  {}", tags.join(" · "));
    }
    out
}

/// Header plus one card per area. Hidden areas are left out unless `show_hidden`.
pub fn render_dashboard<'a>(cards: impl IntoIterator<Item = &'a AreaCard>, show_hidden: bool) -> String {
    let visible: Vec<&AreaCard> = cards
        .into_iter()
        .filter(|c| show_hidden || !c.area().hidden)
        .collect();
    let heating = visible
        .iter()
        .filter(|c| c.area().state == AreaState::Heating)
        .count();

    let mut out = format!("Smart Heating: {} area(s), {} heating\n", visible.len(), heating);
    for card in visible {
        out.push('\n');
        out.push_str(&render_card(card));
    }
    out
}

pub fn render_config(config: &GlobalConfig, frost: Option<&FrostProtection>) -> String {
    let mut out = String::from("Global settings\n");
    let _ = writeln!(
        out,
        "  opentherm gateway: {}",
        config.opentherm_gateway_id.as_deref().unwrap_or("none")
    );
    if let Some(h) = config.hysteresis {
        let _ = writeln!(out, "  hysteresis: {:.2}°", h);
    }
    if let Some(t) = config.trv_heating_temp {
        let _ = writeln!(out, "  trv heating temp: {}", format_temperature(Some(t)));
    }
    if let Some(t) = config.trv_idle_temp {
        let _ = writeln!(out, "  trv idle temp: {}", format_temperature(Some(t)));
    }
    if let Some(frost) = frost {
        let state = if frost.enabled { "on" } else { "off" };
        let _ = writeln!(
            out,
            "  frost protection: {} ({})",
            state,
            format_temperature(Some(frost.temperature))
        );
    }
    out
}

pub fn render_vacation(vacation: &VacationMode) -> String {
    if !vacation.enabled {
        return "Vacation mode: off\n".to_string();
    }
    let from = vacation.start_date.map(|d| d.to_string()).unwrap_or_else(|| "-".into());
    let to = vacation.end_date.map(|d| d.to_string()).unwrap_or_else(|| "-".into());
    let preset = vacation
        .preset_mode
        .map(|p| enum_label(&p))
        .unwrap_or_else(|| "away".into());
    format!("Vacation mode: on, {} to {}, preset {}\n", from, to, preset)
}

pub fn render_presence(users: &UsersResponse, presence: Option<&PresenceState>) -> String {
    let mut out = format!("Users: {}\n", users.users.len());
    for user in users.users.values() {
        let status = match presence {
            Some(p) if p.users_home.contains(&user.user_id) => "home",
            Some(p) if p.users_away.contains(&user.user_id) => "away",
            _ => "unknown",
        };
        let _ = writeln!(out, "  {} ({}) {}, {} area(s)", user.name, user.user_id.0, status, user.areas.len());
    }
    if let Some(strategy) = users.settings.as_ref().and_then(|s| s.multi_user_strategy.as_deref()) {
        let _ = writeln!(out, "  strategy: {}", strategy);
    }
    out
}

pub fn render_efficiency(area_id: &AreaId, report: &EfficiencyReport) -> String {
    let mut out = format!(
        "Efficiency for {} ({})\n",
        area_id,
        report.period.unwrap_or_default().as_str()
    );
    if let Some(score) = report.energy_score {
        let _ = writeln!(out, "  energy score: {:.0}", score);
    }
    if let Some(pct) = report.heating_time_percentage {
        let _ = writeln!(out, "  heating time: {:.1}%", pct);
    }
    if let Some(cycles) = report.heating_cycles {
        let _ = writeln!(out, "  heating cycles: {}", cycles);
    }
    for tip in &report.recommendations {
        let _ = writeln!(out, "  - {}", tip);
    }
    out
}

pub fn render_opentherm_logs(logs: &OpenThermLogs) -> String {
    let mut out = format!("OpenTherm log ({} entries)\n", logs.logs.len());
    for entry in &logs.logs {
        let detail = entry.message.clone().unwrap_or_else(|| {
            entry
                .data
                .iter()
                .map(|(k, v)| format!("{}={}", k, v))
                .collect::<Vec<_>>()
                .join(" ")
        });
        let _ = writeln!(
            out,
            "  {} {:<12} {}",
            entry.timestamp.format("%Y-%m-%d %H:%M:%S"),
            entry.event_type,
            detail
        );
    }
    out
}

pub fn render_backups(backups: &[Backup]) -> String {
    let mut out = format!("Backups: {}\n", backups.len());
    for backup in backups {
        let created = backup
            .created
            .map(|c| c.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(|| "-".into());
        let _ = writeln!(out, "  {}  {}", backup.filename, created);
    }
    out
}
