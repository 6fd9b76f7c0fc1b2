use crate::card::AreaCard;
use crate::client::{SmartHeatingClient, Transport};
use crate::models::smart_heating::{Area, AreaId};
use crate::render::render_dashboard;
use log::{info, warn};
use std::collections::BTreeMap;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

/// All area cards, keyed by area id, fed by polling or the push feed.
#[derive(Debug, Default)]
pub struct Dashboard {
    cards: BTreeMap<AreaId, AreaCard>,
    show_hidden: bool,
}

impl Dashboard {
    pub fn new(show_hidden: bool) -> Self {
        Dashboard {
            cards: BTreeMap::new(),
            show_hidden,
        }
    }

    pub fn card(&self, area_id: &AreaId) -> Option<&AreaCard> {
        self.cards.get(area_id)
    }

    pub fn card_mut(&mut self, area_id: &AreaId) -> Option<&mut AreaCard> {
        self.cards.get_mut(area_id)
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Merge area updates; cards keep their local edits. Every update is observed, but
    /// only cards whose area data differs count as changed.
    pub fn apply_update(&mut self, areas: Vec<Area>) -> usize {
        let mut changed = 0;
        for area in areas {
            let snapshot = Arc::new(area);
            match self.cards.get_mut(&snapshot.id) {
                Some(card) => {
                    let differs = **card.snapshot() != *snapshot;
                    card.observe(snapshot);
                    if differs {
                        changed += 1;
                    }
                }
                None => {
                    self.cards.insert(snapshot.id.clone(), AreaCard::new(snapshot));
                    changed += 1;
                }
            }
        }
        changed
    }

    /// Replace the full area list: like `apply_update`, and areas missing from `areas` go away.
    pub fn apply_snapshot(&mut self, areas: Vec<Area>) -> usize {
        let before = self.cards.len();
        let keep: Vec<AreaId> = areas.iter().map(|a| a.id.clone()).collect();
        self.cards.retain(|id, _| keep.contains(id));
        let removed = before - self.cards.len();
        removed + self.apply_update(areas)
    }

    pub fn render(&self) -> String {
        render_dashboard(self.cards.values(), self.show_hidden)
    }
}

/// Fetch the full area list once.
pub fn refresh<T: Transport>(client: &SmartHeatingClient<T>, dashboard: &mut Dashboard) -> Result<usize, String> {
    let areas = client.get_areas().map_err(|e| format!("get_areas failed: {}", e))?;
    Ok(dashboard.apply_snapshot(areas))
}

/// Poll the area list at a steady cadence and print the dashboard whenever it changes.
/// A failed poll is logged and retried on the next tick.
pub fn run_poll_loop<T: Transport>(
    client: &SmartHeatingClient<T>,
    dashboard: &mut Dashboard,
    interval: Duration,
) -> Result<(), String> {
    loop {
        let tick_start = Instant::now();

        match refresh(client, dashboard) {
            Ok(0) => {}
            Ok(changed) => {
                info!("Poll: {} area card(s) changed", changed);
                println!("{}", dashboard.render());
            }
            Err(e) => warn!("Poll failed: {}", e),
        }

        // Maintain steady cadence
        let elapsed = tick_start.elapsed();
        if elapsed < interval {
            thread::sleep(interval - elapsed);
        }
    }
}
