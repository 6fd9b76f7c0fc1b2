//! Line-oriented interactive session over the area cards.
//!
//! `drag` only moves the local slider; `commit` sends it. Preset temperature edits are
//! debounced and saved once the input has been quiet for `PRESET_SAVE_DEBOUNCE`.

use crate::card::AreaCard;
use crate::client::{SmartHeatingClient, Transport};
use crate::debounce::{Debouncer, PRESET_SAVE_DEBOUNCE};
use crate::models::smart_heating::{AreaId, PresetMode};
use crate::render::render_card;
use crate::services::watch::{Dashboard, refresh};
use log::{info, warn};
use std::io::BufRead;
use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread;
use std::time::{Duration, Instant};

const IDLE_WAIT: Duration = Duration::from_secs(3600);

#[derive(Debug, Clone, PartialEq)]
pub enum ConsoleCommand {
    Show,
    Refresh,
    Drag(AreaId, f64),
    Commit(AreaId),
    Cancel(AreaId),
    PresetTemp(PresetEdit),
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PresetEdit {
    pub area_id: AreaId,
    pub preset: PresetMode,
    pub temperature: f64,
}

impl PresetEdit {
    fn same_setting(&self, other: &PresetEdit) -> bool {
        self.area_id == other.area_id && self.preset == other.preset
    }
}

pub const HELP: &str = "commands: show | refresh | drag <area> <temp> | commit <area> | cancel <area> | \
preset-temp <area> <preset> <temp> | help | quit";

fn parse_temp(raw: Option<&str>) -> Result<f64, String> {
    let raw = raw.ok_or_else(|| "missing temperature".to_string())?;
    raw.parse::<f64>().map_err(|_| format!("not a temperature: {}", raw))
}

fn parse_area(raw: Option<&str>) -> Result<AreaId, String> {
    raw.map(AreaId::from).ok_or_else(|| "missing area id".to_string())
}

impl ConsoleCommand {
    pub fn parse(line: &str) -> Result<Self, String> {
        let mut words = line.split_whitespace();
        let Some(verb) = words.next() else {
            return Err("empty command".to_string());
        };
        let cmd = match verb {
            "show" | "ls" => ConsoleCommand::Show,
            "refresh" => ConsoleCommand::Refresh,
            "drag" => {
                let area = parse_area(words.next())?;
                ConsoleCommand::Drag(area, parse_temp(words.next())?)
            }
            "commit" => ConsoleCommand::Commit(parse_area(words.next())?),
            "cancel" => ConsoleCommand::Cancel(parse_area(words.next())?),
            "preset-temp" => {
                let area_id = parse_area(words.next())?;
                let raw = words.next().ok_or_else(|| "missing preset".to_string())?;
                let preset: PresetMode = raw.parse()?;
                if preset.temperature_key().is_none() {
                    return Err(format!("preset {} has no temperature", raw));
                }
                let temperature = parse_temp(words.next())?;
                ConsoleCommand::PresetTemp(PresetEdit {
                    area_id,
                    preset,
                    temperature,
                })
            }
            "help" | "?" => ConsoleCommand::Help,
            "quit" | "exit" => ConsoleCommand::Quit,
            other => return Err(format!("unknown command: {}", other)),
        };
        if let Some(extra) = words.next() {
            return Err(format!("unexpected argument: {}", extra));
        }
        Ok(cmd)
    }
}

fn save_preset<T: Transport>(client: &SmartHeatingClient<T>, edit: &PresetEdit) {
    match client.set_area_preset_temperature(&edit.area_id, edit.preset, edit.temperature) {
        Ok(_) => info!(
            "Area {}: {:?} preset saved at {:.1}",
            edit.area_id, edit.preset, edit.temperature
        ),
        Err(e) => warn!("Area {}: saving {:?} preset failed: {}", edit.area_id, edit.preset, e),
    }
}

fn with_card<'a>(dashboard: &'a mut Dashboard, area_id: &AreaId) -> Option<&'a mut AreaCard> {
    let card = dashboard.card_mut(area_id);
    if card.is_none() {
        println!("no such area: {}", area_id);
    }
    card
}

/// Apply one command. Returns false when the session should end.
pub fn execute<T: Transport>(
    client: &SmartHeatingClient<T>,
    dashboard: &mut Dashboard,
    presets: &mut Debouncer<PresetEdit>,
    command: ConsoleCommand,
    now: Instant,
) -> bool {
    match command {
        ConsoleCommand::Show => println!("{}", dashboard.render()),
        ConsoleCommand::Refresh => match refresh(client, dashboard) {
            Ok(changed) => println!("{} card(s) changed\n{}", changed, dashboard.render()),
            Err(e) => println!("refresh failed: {}", e),
        },
        ConsoleCommand::Drag(area_id, value) => {
            if let Some(card) = with_card(dashboard, &area_id) {
                card.drag(value);
                print!("{}", render_card(card));
            }
        }
        ConsoleCommand::Commit(area_id) => {
            if let Some(card) = with_card(dashboard, &area_id) {
                match card.commit(client) {
                    None => println!("nothing to commit for {}", area_id),
                    Some(outcome) => {
                        if let Some(e) = &outcome.write_error {
                            println!("saving {:.1}° failed: {}", outcome.temperature, e);
                        }
                        print!("{}", render_card(card));
                    }
                }
            }
        }
        ConsoleCommand::Cancel(area_id) => {
            if let Some(card) = with_card(dashboard, &area_id) {
                card.cancel_drag();
                print!("{}", render_card(card));
            }
        }
        ConsoleCommand::PresetTemp(edit) => {
            let switching = presets.peek().is_some_and(|p| !p.same_setting(&edit));
            if switching {
                if let Some(previous) = presets.flush() {
                    save_preset(client, &previous);
                }
            }
            presets.push(edit, now);
        }
        ConsoleCommand::Help => println!("{}", HELP),
        ConsoleCommand::Quit => return false,
    }
    true
}

/// Run the session on stdin until `quit` or end of input. Pending preset edits are saved
/// before returning.
pub fn run<T: Transport>(client: &SmartHeatingClient<T>, dashboard: &mut Dashboard) -> Result<(), String> {
    let (tx, rx) = mpsc::channel::<String>();
    thread::spawn(move || {
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            if tx.send(line).is_err() {
                break;
            }
        }
    });

    println!("{}", HELP);
    let mut presets = Debouncer::new(PRESET_SAVE_DEBOUNCE);
    loop {
        let wait = presets.remaining(Instant::now()).unwrap_or(IDLE_WAIT);
        match rx.recv_timeout(wait) {
            Ok(line) => {
                if line.trim().is_empty() {
                    continue;
                }
                match ConsoleCommand::parse(&line) {
                    Ok(cmd) => {
                        if !execute(client, dashboard, &mut presets, cmd, Instant::now()) {
                            break;
                        }
                    }
                    Err(e) => println!("{}", e),
                }
            }
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => break,
        }
        if let Some(edit) = presets.take_due(Instant::now()) {
            save_preset(client, &edit);
        }
    }

    if let Some(edit) = presets.flush() {
        save_preset(client, &edit);
    }
    Ok(())
}
