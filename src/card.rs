//! Area card state: which target temperature to show, which badges to attach, and the
//! local slider value that the user edits.
//!
//! Display state is a pure function of the last server snapshot plus an optional pending
//! local edit. A drag overlay survives incoming snapshots; a committed overlay is dropped
//! by the next snapshot, which is the backend's answer to the write.

use std::sync::Arc;

use log::{info, warn};

use crate::client::{ClientError, SmartHeatingClient, Transport};
use crate::models::smart_heating::{Area, AreaState, HeatingType, PresetMode};

/// Minimum gap between the effective and the base target before the effective one is shown.
pub const EFFECTIVE_TARGET_THRESHOLD: f64 = 0.1;

/// The target temperature a card shows for `area`.
pub fn display_target_temperature(area: &Area) -> f64 {
    if !area.enabled || area.state == AreaState::Off {
        return area.target_temperature;
    }
    match area.effective_target_temperature {
        Some(effective)
            if !area.manual_override && (effective - area.target_temperature).abs() >= EFFECTIVE_TARGET_THRESHOLD =>
        {
            effective
        }
        _ => area.target_temperature,
    }
}

/// True when the number shown comes from the effective (preset/schedule) target.
pub fn shows_effective_target(area: &Area) -> bool {
    area.effective_target_temperature
        .is_some_and(|effective| display_target_temperature(area) == effective && effective != area.target_temperature)
}

#[derive(Debug, Clone, PartialEq)]
pub enum Badge {
    Disabled,
    Off,
    Hidden,
    ManualOverride,
    Preset(PresetMode),
    Boost { temperature: Option<f64>, minutes: Option<u32> },
    Scheduled,
    HeatingType(HeatingType),
    Overhead(f64),
}

pub fn card_badges(area: &Area) -> Vec<Badge> {
    let mut badges = Vec::new();
    if !area.enabled {
        badges.push(Badge::Disabled);
    }
    if area.state == AreaState::Off {
        badges.push(Badge::Off);
    }
    if area.hidden {
        badges.push(Badge::Hidden);
    }
    if area.manual_override {
        badges.push(Badge::ManualOverride);
    } else if let Some(mode) = area.preset_mode {
        if !matches!(mode, PresetMode::None_ | PresetMode::Other) {
            badges.push(Badge::Preset(mode));
        }
    }
    if area.boost_mode_active {
        badges.push(Badge::Boost {
            temperature: area.boost_temp,
            minutes: area.boost_duration,
        });
    }
    if shows_effective_target(area) {
        badges.push(Badge::Scheduled);
    }
    match area.heating_type {
        HeatingType::Radiator | HeatingType::Other => {}
        HeatingType::FloorHeating => {
            badges.push(Badge::HeatingType(HeatingType::FloorHeating));
            if let Some(overhead) = area.custom_overhead_temp {
                badges.push(Badge::Overhead(overhead));
            }
        }
        HeatingType::Airco => badges.push(Badge::HeatingType(HeatingType::Airco)),
    }
    badges
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct SliderBounds {
    pub min: f64,
    pub max: f64,
    pub step: f64,
}

impl SliderBounds {
    pub fn for_heating_type(heating_type: HeatingType) -> Self {
        match heating_type {
            HeatingType::Radiator | HeatingType::FloorHeating | HeatingType::Other => SliderBounds {
                min: 5.0,
                max: 30.0,
                step: 0.5,
            },
            HeatingType::Airco => SliderBounds {
                min: 16.0,
                max: 30.0,
                step: 0.5,
            },
        }
    }

    /// Clamp into range and snap to the nearest step.
    pub fn fit(&self, value: f64) -> f64 {
        let clamped = value.clamp(self.min, self.max);
        let snapped = self.min + ((clamped - self.min) / self.step).round() * self.step;
        snapped.min(self.max)
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub enum PendingEdit {
    Dragging(f64),
    Committed(f64),
}

impl PendingEdit {
    pub fn value(&self) -> f64 {
        match self {
            PendingEdit::Dragging(v) | PendingEdit::Committed(v) => *v,
        }
    }
}

/// What happened during a commit. Failures are logged and reported but never roll back the
/// optimistic state.
#[derive(Debug)]
pub struct CommitOutcome {
    pub temperature: f64,
    pub write_error: Option<ClientError>,
    pub reload_error: Option<ClientError>,
}

impl CommitOutcome {
    pub fn is_ok(&self) -> bool {
        self.write_error.is_none() && self.reload_error.is_none()
    }
}

#[derive(Debug, Clone)]
pub struct AreaCard {
    snapshot: Arc<Area>,
    derived: f64,
    pending: Option<PendingEdit>,
}

impl AreaCard {
    pub fn new(snapshot: Arc<Area>) -> Self {
        let derived = display_target_temperature(&snapshot);
        AreaCard {
            snapshot,
            derived,
            pending: None,
        }
    }

    pub fn area(&self) -> &Area {
        &self.snapshot
    }

    pub fn snapshot(&self) -> &Arc<Area> {
        &self.snapshot
    }

    pub fn bounds(&self) -> SliderBounds {
        SliderBounds::for_heating_type(self.snapshot.heating_type)
    }

    pub fn pending(&self) -> Option<PendingEdit> {
        self.pending
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.pending, Some(PendingEdit::Dragging(_)))
    }

    /// Value derived from the last snapshot alone.
    pub fn derived(&self) -> f64 {
        self.derived
    }

    /// Value the slider shows right now.
    pub fn displayed(&self) -> f64 {
        self.pending.map(|p| p.value()).unwrap_or(self.derived)
    }

    pub fn badges(&self) -> Vec<Badge> {
        card_badges(&self.snapshot)
    }

    /// Take a new server snapshot. Returns false when it is the snapshot already held, in
    /// which case nothing is recomputed.
    pub fn observe(&mut self, snapshot: Arc<Area>) -> bool {
        if Arc::ptr_eq(&self.snapshot, &snapshot) {
            return false;
        }
        self.derived = display_target_temperature(&snapshot);
        self.snapshot = snapshot;
        if matches!(self.pending, Some(PendingEdit::Committed(_))) {
            self.pending = None;
        }
        true
    }

    /// Move the slider locally; nothing is sent. Returns the value after clamping.
    pub fn drag(&mut self, value: f64) -> f64 {
        let value = self.bounds().fit(value);
        self.pending = Some(PendingEdit::Dragging(value));
        value
    }

    pub fn cancel_drag(&mut self) {
        if self.is_dragging() {
            self.pending = None;
        }
    }

    /// Send the dragged value, patch the local cache as a manual override, then reload the
    /// area. Returns `None` when no drag is in progress.
    pub fn commit<T: Transport>(&mut self, client: &SmartHeatingClient<T>) -> Option<CommitOutcome> {
        let temperature = match self.pending {
            Some(PendingEdit::Dragging(v)) => v,
            _ => return None,
        };
        let area_id = self.snapshot.id.clone();

        let write_error = match client.set_area_temperature(&area_id, temperature) {
            Ok(_) => {
                info!("Area {}: target set to {:.1}", area_id, temperature);
                None
            }
            Err(e) => {
                warn!("Area {}: setting target to {:.1} failed: {}", area_id, temperature, e);
                Some(e)
            }
        };

        let mut patched = Area::clone(&self.snapshot);
        patched.manual_override = true;
        patched.preset_mode = Some(PresetMode::None_);
        self.derived = display_target_temperature(&patched);
        self.snapshot = Arc::new(patched);
        self.pending = Some(PendingEdit::Committed(temperature));

        let reload_error = match client.get_area(&area_id) {
            Ok(fresh) => {
                self.observe(Arc::new(fresh));
                None
            }
            Err(e) => {
                warn!("Area {}: reload after write failed: {}", area_id, e);
                Some(e)
            }
        };

        Some(CommitOutcome {
            temperature,
            write_error,
            reload_error,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::transport::testing::RecordingTransport;
    use crate::models::smart_heating::AreasResponse;
    use serde_json::json;

    fn area(value: serde_json::Value) -> Area {
        let mut base = json!({
            "id": "living_room",
            "name": "Living Room",
            "target_temperature": 20.0,
            "state": "heating",
        });
        if let (Some(obj), Some(extra)) = (base.as_object_mut(), value.as_object()) {
            for (k, v) in extra {
                obj.insert(k.clone(), v.clone());
            }
        }
        serde_json::from_value(base).expect("valid area")
    }

    #[test]
    fn disabled_or_off_always_shows_base_target() {
        for patch in [
            json!({ "enabled": false, "effective_target_temperature": 23.0 }),
            json!({ "state": "off", "effective_target_temperature": 23.0 }),
            json!({ "enabled": false, "state": "off", "effective_target_temperature": 15.0 }),
        ] {
            assert_eq!(display_target_temperature(&area(patch)), 20.0);
        }
    }

    #[test]
    fn effective_target_wins_when_far_enough() {
        let a = area(json!({ "effective_target_temperature": 22.0 }));
        assert_eq!(display_target_temperature(&a), 22.0);
        let a = area(json!({ "effective_target_temperature": 20.1 }));
        assert_eq!(display_target_temperature(&a), 20.1);
        let a = area(json!({ "effective_target_temperature": 19.9 }));
        assert_eq!(display_target_temperature(&a), 19.9);
    }

    #[test]
    fn near_equal_effective_target_is_ignored() {
        let a = area(json!({ "effective_target_temperature": 20.05 }));
        assert_eq!(display_target_temperature(&a), 20.0);
        assert!(!shows_effective_target(&a));
    }

    #[test]
    fn manual_override_shows_base_target() {
        let a = area(json!({ "manual_override": true, "effective_target_temperature": 24.0 }));
        assert_eq!(display_target_temperature(&a), 20.0);
    }

    #[test]
    fn missing_effective_target_shows_base() {
        assert_eq!(display_target_temperature(&area(json!({}))), 20.0);
    }

    #[test]
    fn fixture_cards() {
        let json = std::fs::read_to_string("tests/data/areas.json").expect("fixture present");
        let resp: AreasResponse = serde_json::from_str(&json).expect("parse areas");
        let shown: Vec<f64> = resp.areas.iter().map(display_target_temperature).collect();
        assert_eq!(shown, vec![22.0, 19.5, 21.0]);

        let living = card_badges(&resp.areas[0]);
        assert_eq!(living, vec![Badge::Preset(PresetMode::Comfort), Badge::Scheduled]);

        let office = card_badges(&resp.areas[1]);
        assert!(office.contains(&Badge::Boost {
            temperature: Some(23.0),
            minutes: Some(45)
        }));
        assert!(office.contains(&Badge::HeatingType(HeatingType::Airco)));
        assert!(!office.contains(&Badge::Scheduled));

        let bath = card_badges(&resp.areas[2]);
        assert_eq!(
            bath,
            vec![
                Badge::Disabled,
                Badge::Off,
                Badge::ManualOverride,
                Badge::HeatingType(HeatingType::FloorHeating),
                Badge::Overhead(10.0),
            ]
        );
    }

    #[test]
    fn slider_bounds_clamp_and_snap() {
        let radiator = SliderBounds::for_heating_type(HeatingType::Radiator);
        assert_eq!(radiator.fit(21.3), 21.5);
        assert_eq!(radiator.fit(2.0), 5.0);
        assert_eq!(radiator.fit(40.0), 30.0);
        let airco = SliderBounds::for_heating_type(HeatingType::Airco);
        assert_eq!(airco.fit(10.0), 16.0);
        assert_eq!(SliderBounds::for_heating_type(HeatingType::Other), radiator);
    }

    #[test]
    fn unknown_heating_type_gets_no_badge() {
        let a = area(json!({ "heating_type": "heat_pump", "custom_overhead_temp": 5.0 }));
        assert_eq!(a.heating_type, HeatingType::Other);
        assert!(card_badges(&a)
            .iter()
            .all(|b| !matches!(b, Badge::HeatingType(_) | Badge::Overhead(_))));
    }

    #[test]
    fn same_snapshot_is_not_recomputed() {
        let snapshot = Arc::new(area(json!({})));
        let mut card = AreaCard::new(snapshot.clone());
        assert!(!card.observe(snapshot));
        assert!(card.observe(Arc::new(area(json!({})))));
    }

    #[test]
    fn new_snapshot_reseeds_slider() {
        let mut card = AreaCard::new(Arc::new(area(json!({}))));
        assert_eq!(card.displayed(), 20.0);
        card.observe(Arc::new(area(json!({ "effective_target_temperature": 18.0 }))));
        assert_eq!(card.displayed(), 18.0);
    }

    #[test]
    fn drag_survives_incoming_snapshots() {
        let mut card = AreaCard::new(Arc::new(area(json!({}))));
        assert_eq!(card.drag(23.2), 23.0);
        card.observe(Arc::new(area(json!({ "target_temperature": 19.0 }))));
        assert!(card.is_dragging());
        assert_eq!(card.displayed(), 23.0);
        assert_eq!(card.derived(), 19.0);

        card.cancel_drag();
        assert_eq!(card.displayed(), 19.0);
    }

    #[test]
    fn commit_without_drag_does_nothing() {
        let client = SmartHeatingClient::with_transport(RecordingTransport::new());
        let mut card = AreaCard::new(Arc::new(area(json!({}))));
        assert!(card.commit(&client).is_none());
        assert!(client.transport().requests().is_empty());
    }

    #[test]
    fn commit_writes_then_reloads() {
        let client = SmartHeatingClient::with_transport(RecordingTransport::new());
        client.transport().respond(200, r#"{"success":true}"#);
        client.transport().respond(
            200,
            r#"{"id":"living_room","target_temperature":22.5,"state":"heating","manual_override":true,"preset_mode":"none"}"#,
        );

        let mut card = AreaCard::new(Arc::new(area(json!({ "preset_mode": "eco" }))));
        card.drag(22.5);
        let outcome = card.commit(&client).expect("drag pending");
        assert!(outcome.is_ok());

        let reqs = client.transport().requests();
        assert_eq!(reqs.len(), 2);
        assert_eq!(reqs[0].path(), "/areas/living_room/temperature");
        assert_eq!(reqs[0].body, Some(json!({ "temperature": 22.5 })));
        assert_eq!(reqs[1].path(), "/areas/living_room");

        assert_eq!(card.pending(), None);
        assert_eq!(card.displayed(), 22.5);
        assert!(card.area().manual_override);
    }

    #[test]
    fn failed_write_keeps_optimistic_state() {
        let client = SmartHeatingClient::with_transport(RecordingTransport::new());
        client.transport().respond(500, "boom");
        client.transport().fail("backend unreachable");

        let mut card = AreaCard::new(Arc::new(area(json!({
            "preset_mode": "comfort",
            "effective_target_temperature": 22.0,
        }))));
        assert_eq!(card.displayed(), 22.0);
        card.drag(18.0);
        let outcome = card.commit(&client).expect("drag pending");
        assert!(outcome.write_error.is_some());
        assert!(outcome.reload_error.is_some());

        assert_eq!(card.pending(), Some(PendingEdit::Committed(18.0)));
        assert_eq!(card.displayed(), 18.0);
        assert!(card.area().manual_override);
        assert_eq!(card.area().preset_mode, Some(PresetMode::None_));
        assert_eq!(card.badges().first(), Some(&Badge::ManualOverride));

        // the next server snapshot is the source of truth
        card.observe(Arc::new(area(json!({ "target_temperature": 20.0 }))));
        assert_eq!(card.pending(), None);
        assert_eq!(card.displayed(), 20.0);
    }
}
