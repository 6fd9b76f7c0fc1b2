//! One-shot commands: each issues its request, prints the result and returns.

use crate::card::AreaCard;
use crate::cli::{Command, OpenThermAction, VacationAction};
use crate::client::{ClientError, SmartHeatingClient, Transport};
use crate::models::smart_heating::*;
use crate::render;
use log::{info, warn};
use serde_json::Value;
use std::fs;
use std::path::Path;
use std::sync::Arc;

fn failed(what: &str) -> impl Fn(ClientError) -> String + '_ {
    move |e| format!("{} failed: {}", what, e)
}

fn acknowledge(what: &str, result: Result<Value, ClientError>) -> Result<(), String> {
    result.map_err(failed(what))?;
    println!("{}: ok", what);
    Ok(())
}

/// Set a target through the area card so the usual optimistic/reload path is taken.
fn set_temperature<T: Transport>(client: &SmartHeatingClient<T>, area_id: &AreaId, value: f64) -> Result<(), String> {
    let area = client.get_area(area_id).map_err(failed("get_area"))?;
    let mut card = AreaCard::new(Arc::new(area));
    let sent = card.drag(value);
    if sent != value {
        info!("Area {}: {:.1} adjusted to {:.1} to fit the slider range", area_id, value, sent);
    }
    let outcome = card.commit(client).ok_or_else(|| "no pending edit to commit".to_string())?;
    print!("{}", render::render_card(&card));
    match outcome.write_error {
        Some(e) => Err(format!("set_temperature failed: {}", e)),
        None => Ok(()),
    }
}

fn import_file<T: Transport>(
    client: &SmartHeatingClient<T>,
    file: &Path,
    validate_only: bool,
    create_backup: bool,
) -> Result<(), String> {
    let raw = fs::read_to_string(file).map_err(|e| format!("failed to read {}: {}", file.display(), e))?;
    let data: Value = serde_json::from_str(&raw).map_err(|e| format!("{} is not JSON: {}", file.display(), e))?;

    let validation = client.validate_import(&data).map_err(failed("validate"))?;
    if !validation.valid {
        return Err(format!(
            "{} rejected: {}",
            file.display(),
            validation.error.as_deref().unwrap_or("invalid configuration")
        ));
    }
    for (section, preview) in &validation.preview {
        println!("  {}: {}", section, preview);
    }
    if validate_only {
        println!("{} is valid", file.display());
        return Ok(());
    }

    let result = client.import_config(&data, create_backup).map_err(failed("import"))?;
    if !result.success {
        return Err("import reported failure".to_string());
    }
    if let Some(backup) = result.backup_file {
        info!("Previous configuration saved as {}", backup);
    }
    println!("imported {}", file.display());
    Ok(())
}

pub fn execute<T: Transport>(client: &SmartHeatingClient<T>, command: Command) -> Result<(), String> {
    match command {
        Command::SetTemp { area, temperature } => set_temperature(client, &AreaId(area), temperature),
        Command::Boost {
            area,
            temperature,
            duration,
        } => acknowledge("boost", client.set_boost_mode(&AreaId(area), temperature, duration)),
        Command::CancelBoost { area } => acknowledge("cancel boost", client.cancel_boost(&AreaId(area))),
        Command::Override { area, enabled } => {
            acknowledge("manual override", client.set_manual_override(&AreaId(area), enabled))
        }
        Command::Hvac { area, mode } => acknowledge("hvac mode", client.set_hvac_mode(&AreaId(area), mode)),
        Command::Preset { area, mode } => acknowledge("preset", client.set_preset_mode(&AreaId(area), mode)),
        Command::HeatingType {
            area,
            heating_type,
            overhead,
        } => acknowledge(
            "heating type",
            client.set_heating_type(&AreaId(area), heating_type, overhead),
        ),
        Command::Enable { area } => acknowledge("enable", client.enable_area(&AreaId(area))),
        Command::Disable { area } => acknowledge("disable", client.disable_area(&AreaId(area))),
        Command::Hide { area } => acknowledge("hide", client.hide_area(&AreaId(area))),
        Command::Unhide { area } => acknowledge("unhide", client.unhide_area(&AreaId(area))),
        Command::CopySchedule {
            source,
            target,
            source_days,
            target_days,
        } => acknowledge(
            "copy schedule",
            client.copy_schedule(
                &AreaId(source),
                &AreaId(target),
                source_days.as_deref(),
                target_days.as_deref(),
            ),
        ),
        Command::Devices => {
            let devices = client.get_devices().map_err(failed("get_devices"))?;
            for d in devices {
                println!(
                    "{}  {}  {}",
                    d.id,
                    d.device_type.as_deref().unwrap_or("-"),
                    d.name.as_deref().unwrap_or("")
                );
            }
            Ok(())
        }
        Command::Efficiency { area: Some(area), period } => {
            let area_id = AreaId(area);
            let report = client
                .get_efficiency_report(&area_id, period)
                .map_err(failed("efficiency report"))?;
            print!("{}", render::render_efficiency(&area_id, &report));
            Ok(())
        }
        Command::Efficiency { area: None, period } => {
            let summary = client
                .get_all_areas_efficiency(period)
                .map_err(failed("efficiency summary"))?;
            for report in &summary.areas {
                let area_id = report.area_id.clone().unwrap_or_else(|| AreaId("?".into()));
                print!("{}", render::render_efficiency(&area_id, report));
            }
            Ok(())
        }
        Command::History { area, hours } => {
            let history = client
                .get_area_history(&AreaId(area), hours)
                .map_err(failed("history"))?;
            for entry in history.entries {
                println!(
                    "{}  {}  target {}",
                    entry.timestamp.format("%Y-%m-%d %H:%M"),
                    crate::utils::format_temperature(entry.current_temperature),
                    crate::utils::format_temperature(entry.target_temperature)
                );
            }
            Ok(())
        }
        Command::Metrics { days } => {
            let metrics = client.get_advanced_metrics(days).map_err(failed("metrics"))?;
            let pretty = serde_json::to_string_pretty(&metrics).map_err(|e| e.to_string())?;
            println!("{}", pretty);
            Ok(())
        }
        Command::Config => {
            let config = client.get_config().map_err(failed("get_config"))?;
            // Frost protection is informational here; a failure only drops that line.
            let frost = match client.get_frost_protection() {
                Ok(f) => Some(f),
                Err(e) => {
                    warn!("frost protection unavailable: {}", e);
                    None
                }
            };
            print!("{}", render::render_config(&config, frost.as_ref()));
            Ok(())
        }
        Command::Export { file } => {
            let bytes = client.export_config().map_err(failed("export"))?;
            fs::write(&file, &bytes).map_err(|e| format!("failed to write {}: {}", file.display(), e))?;
            println!("exported {} bytes to {}", bytes.len(), file.display());
            Ok(())
        }
        Command::Import {
            file,
            validate_only,
            no_backup,
        } => import_file(client, &file, validate_only, !no_backup),
        Command::Backups => {
            let backups = client.list_backups().map_err(failed("list backups"))?;
            print!("{}", render::render_backups(&backups));
            Ok(())
        }
        Command::Restore { filename } => {
            let result = client.restore_backup(&filename).map_err(failed("restore"))?;
            if result.success {
                println!("restored {}", filename);
                Ok(())
            } else {
                Err(format!("restore of {} reported failure", filename))
            }
        }
        Command::Safety => {
            let status = client.get_safety_sensors().map_err(failed("safety sensors"))?;
            println!("Safety alert: {}", if status.alert_active { "ACTIVE" } else { "none" });
            for sensor in status.sensors {
                println!("  {} ({})", sensor.sensor_id, if sensor.enabled { "enabled" } else { "disabled" });
            }
            Ok(())
        }
        Command::Users => {
            let users = client.get_users().map_err(failed("get_users"))?;
            // Presence is best effort; the user list is still useful without it.
            let presence = client.get_presence().ok();
            print!("{}", render::render_presence(&users, presence.as_ref()));
            Ok(())
        }
        Command::Vacation { action } => match action {
            VacationAction::Status => {
                let state = client.get_vacation_mode().map_err(failed("vacation status"))?;
                print!("{}", render::render_vacation(&state));
                Ok(())
            }
            VacationAction::Enable { start, end, preset } => {
                if end < start {
                    return Err(format!("vacation end {} is before start {}", end, start));
                }
                let settings = VacationMode {
                    enabled: true,
                    start_date: Some(start),
                    end_date: Some(end),
                    preset_mode: Some(preset),
                    ..Default::default()
                };
                let state = client
                    .enable_vacation_mode(&settings)
                    .map_err(failed("enable vacation"))?;
                print!("{}", render::render_vacation(&state));
                Ok(())
            }
            VacationAction::Disable => {
                let state = client.disable_vacation_mode().map_err(failed("disable vacation"))?;
                print!("{}", render::render_vacation(&state));
                Ok(())
            }
        },
        Command::Opentherm { action } => match action {
            OpenThermAction::Logs { limit } => {
                let logs = client.get_opentherm_logs(Some(limit)).map_err(failed("opentherm logs"))?;
                print!("{}", render::render_opentherm_logs(&logs));
                Ok(())
            }
            OpenThermAction::Capabilities { discover } => {
                let caps = if discover {
                    client.discover_opentherm_capabilities()
                } else {
                    client.get_opentherm_capabilities()
                }
                .map_err(failed("opentherm capabilities"))?;
                let pretty = serde_json::to_string_pretty(&caps).map_err(|e| e.to_string())?;
                println!("{}", pretty);
                Ok(())
            }
            OpenThermAction::Gateways => {
                let gateways = client.list_opentherm_gateways().map_err(failed("opentherm gateways"))?;
                for gw in gateways {
                    println!("{}  {}", gw.gateway_id, gw.title.as_deref().unwrap_or(""));
                }
                Ok(())
            }
            OpenThermAction::Calibrate => {
                let result = client.calibrate_opentherm().map_err(failed("calibrate"))?;
                match (result.success, result.opv) {
                    (true, Some(opv)) => println!("calibrated, overshoot protection value {:.1}", opv),
                    (true, None) => println!("calibrated"),
                    (false, _) => {
                        return Err(format!(
                            "calibration failed: {}",
                            result.message.as_deref().unwrap_or("no details")
                        ));
                    }
                }
                Ok(())
            }
        },
        Command::Areas { .. } | Command::Watch { .. } | Command::Console { .. } | Command::Demo { .. } => {
            Err("not a one-shot command".to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::transport::testing::RecordingTransport;
    use serde_json::json;

    #[test]
    fn set_temp_goes_through_the_card() {
        let client = SmartHeatingClient::with_transport(RecordingTransport::new());
        client
            .transport()
            .respond(200, r#"{"id":"a1","target_temperature":20.0,"preset_mode":"eco"}"#);
        client.transport().respond(200, "{}");
        client
            .transport()
            .respond(200, r#"{"id":"a1","target_temperature":21.5,"manual_override":true}"#);

        execute(
            &client,
            Command::SetTemp {
                area: "a1".into(),
                temperature: 21.3,
            },
        )
        .unwrap();
        let reqs = client.transport().requests();
        let paths: Vec<String> = reqs.iter().map(|r| r.path()).collect();
        assert_eq!(paths, vec!["/areas/a1", "/areas/a1/temperature", "/areas/a1"]);
        assert_eq!(reqs[1].body, Some(json!({ "temperature": 21.5 })));
    }

    #[test]
    fn set_temp_reports_write_failure() {
        let client = SmartHeatingClient::with_transport(RecordingTransport::new());
        client.transport().respond(200, r#"{"id":"a1","target_temperature":20.0}"#);
        client.transport().respond(503, "unavailable");
        let err = execute(
            &client,
            Command::SetTemp {
                area: "a1".into(),
                temperature: 22.0,
            },
        )
        .unwrap_err();
        assert_eq!(err, "set_temperature failed: http 503: unavailable");
    }

    #[test]
    fn vacation_range_is_checked() {
        let client = SmartHeatingClient::with_transport(RecordingTransport::new());
        let err = execute(
            &client,
            Command::Vacation {
                action: VacationAction::Enable {
                    start: chrono::NaiveDate::from_ymd_opt(2026, 12, 20).unwrap(),
                    end: chrono::NaiveDate::from_ymd_opt(2026, 12, 1).unwrap(),
                    preset: PresetMode::Away,
                },
            },
        )
        .unwrap_err();
        assert!(err.contains("before start"));
        assert!(client.transport().requests().is_empty());
    }

    #[test]
    fn import_validates_first() {
        let dir = std::env::temp_dir().join(format!("smart-heating-import-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let file = dir.join("config.json");
        fs::write(&file, r#"{"version":"1.0","areas":{}}"#).unwrap();

        let client = SmartHeatingClient::with_transport(RecordingTransport::new());
        client.transport().respond(200, r#"{"valid":false,"error":"unsupported version"}"#);
        let err = execute(
            &client,
            Command::Import {
                file: file.clone(),
                validate_only: false,
                no_backup: false,
            },
        )
        .unwrap_err();
        assert!(err.ends_with("rejected: unsupported version"), "{}", err);
        assert_eq!(client.transport().requests().len(), 1);

        client.transport().respond(200, r#"{"valid":true}"#);
        client.transport().respond(200, r#"{"success":true}"#);
        execute(
            &client,
            Command::Import {
                file,
                validate_only: false,
                no_backup: true,
            },
        )
        .unwrap();
        let last = client.transport().last();
        assert_eq!(last.path(), "/import");
        assert_eq!(last.body.unwrap()["create_backup"], json!(false));
        let _ = fs::remove_dir_all(&dir);
    }
}
