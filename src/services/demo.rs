//! Synthetic area snapshots so the dashboard can be exercised without a backend.
//!
//! Deterministic for a given seed. Every tick yields a fresh snapshot per area, the way the
//! push feed would deliver them.

use crate::models::smart_heating::{Area, AreaId, AreaState, HeatingType, HvacMode, PresetMode};
use log::info;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use std::collections::BTreeMap;

const AREA_NAMES: [&str; 8] = [
    "Living Room",
    "Kitchen",
    "Bedroom 1",
    "Bedroom 2",
    "Home Office",
    "Bathroom",
    "Hallway",
    "Nursery",
];

const PRESETS: [PresetMode; 5] = [
    PresetMode::Comfort,
    PresetMode::Eco,
    PresetMode::Home,
    PresetMode::Sleep,
    PresetMode::None_,
];

pub struct DemoFeed {
    rng: SmallRng,
    areas: Vec<Area>,
}

impl DemoFeed {
    pub fn new(area_count: usize, seed: u64) -> Self {
        let mut rng = SmallRng::seed_from_u64(seed);
        let count = area_count.clamp(1, AREA_NAMES.len());
        let areas = AREA_NAMES
            .iter()
            .take(count)
            .enumerate()
            .map(|(idx, name)| initial_area(&mut rng, idx, name))
            .collect();
        info!("Demo feed: {} synthetic area(s), seed {}", count, seed);
        DemoFeed { rng, areas }
    }

    /// Advance one step: rooms drift towards their target and presets occasionally change.
    pub fn tick(&mut self) -> Vec<Area> {
        for area in &mut self.areas {
            let target = crate::card::display_target_temperature(area);
            let current = area.current_temperature.unwrap_or(target);
            let heating = area.enabled && area.state != AreaState::Off && current < target - 0.2;
            let drift = if heating {
                self.rng.random_range(0.05..0.35)
            } else {
                -self.rng.random_range(0.0..0.2)
            };
            area.current_temperature = Some(((current + drift) * 10.0).round() / 10.0);
            if area.enabled && area.state != AreaState::Off {
                area.state = if heating { AreaState::Heating } else { AreaState::Idle };
            }

            if !area.manual_override && self.rng.random_bool(0.1) {
                let preset = PRESETS[self.rng.random_range(0..PRESETS.len())];
                area.preset_mode = Some(preset);
                area.effective_target_temperature = preset_temperature(preset);
            }
        }
        self.areas.clone()
    }
}

fn preset_temperature(preset: PresetMode) -> Option<f64> {
    match preset {
        PresetMode::Comfort => Some(21.5),
        PresetMode::Home => Some(20.5),
        PresetMode::Eco => Some(18.0),
        PresetMode::Sleep => Some(17.0),
        PresetMode::Away => Some(15.0),
        _ => None,
    }
}

fn initial_area(rng: &mut SmallRng, idx: usize, name: &str) -> Area {
    let heating_type = match idx % 4 {
        1 => HeatingType::FloorHeating,
        3 => HeatingType::Airco,
        _ => HeatingType::Radiator,
    };
    let preset = PRESETS[rng.random_range(0..PRESETS.len())];
    let enabled = idx != 6;
    Area {
        id: AreaId(name.to_lowercase().replace(' ', "_")),
        name: Some(name.to_string()),
        enabled,
        hidden: false,
        state: if enabled { AreaState::Idle } else { AreaState::Off },
        target_temperature: 20.0,
        current_temperature: Some(rng.random_range(16.0..21.0_f64).round()),
        effective_target_temperature: preset_temperature(preset),
        preset_mode: Some(preset),
        manual_override: false,
        heating_type,
        custom_overhead_temp: (heating_type == HeatingType::FloorHeating).then_some(8.0),
        hvac_mode: (heating_type == HeatingType::Airco).then_some(HvacMode::HeatCool),
        boost_mode_active: false,
        boost_temp: None,
        boost_duration: None,
        devices: Vec::new(),
        presence_sensors: Vec::new(),
        window_sensors: Vec::new(),
        auto_preset_enabled: false,
        use_pid: false,
        schedules: Vec::new(),
        extra: BTreeMap::new(),
    }
}
