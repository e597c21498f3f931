//! Status bar and the short log behind it

use std::collections::VecDeque;
use std::sync::Arc;

use chrono::{DateTime, Local};
use egui::{Context, RichText, TopBottomPanel};
use parking_lot::Mutex;

use gm_core::events::{DatasetLoaded, DetailFailed, EventBus, PartitionFailed};
use gm_core::SyncSnapshot;

use crate::theme::{error_color, warning_color};

const MAX_ENTRIES: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusLevel {
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone)]
pub struct StatusEntry {
    pub level: StatusLevel,
    pub message: String,
    pub at: DateTime<Local>,
}

/// Bounded log of user-facing status messages, fed by the event bus
#[derive(Clone, Default)]
pub struct StatusLog {
    entries: Arc<Mutex<VecDeque<StatusEntry>>>,
}

impl StatusLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, level: StatusLevel, message: impl Into<String>) {
        let mut entries = self.entries.lock();
        if entries.len() == MAX_ENTRIES {
            entries.pop_front();
        }
        entries.push_back(StatusEntry { level, message: message.into(), at: Local::now() });
    }

    pub fn latest(&self) -> Option<StatusEntry> {
        self.entries.lock().back().cloned()
    }

    pub fn entries(&self) -> Vec<StatusEntry> {
        self.entries.lock().iter().cloned().collect()
    }

    pub fn clear(&self) {
        self.entries.lock().clear();
    }

    /// Log loader and detail events as they are published
    pub fn attach(&self, bus: &EventBus) {
        let log = self.clone();
        bus.on(move |e: &DatasetLoaded| {
            let level = if e.partitions_failed > 0 { StatusLevel::Warning } else { StatusLevel::Info };
            log.push(
                level,
                format!(
                    "Loaded {} games from {} ({} of {} partitions)",
                    e.record_count,
                    e.source_name,
                    e.partitions_loaded,
                    e.partitions_loaded + e.partitions_failed
                ),
            );
        });

        let log = self.clone();
        bus.on(move |e: &PartitionFailed| {
            log.push(StatusLevel::Warning, format!("Partition {} skipped: {}", e.partition, e.error));
        });

        let log = self.clone();
        bus.on(move |e: &DetailFailed| {
            log.push(StatusLevel::Error, format!("Details for {} unavailable: {}", e.id, e.error));
        });
    }
}

pub fn status_bar(ctx: &Context, log: &StatusLog, snapshot: Option<&SyncSnapshot>, total: usize) {
    TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
        ui.horizontal(|ui| {
            if let Some(snapshot) = snapshot {
                ui.label(format!("{} / {} games", snapshot.filtered.len(), total));
                if let Some(selected) = &snapshot.filter.selected {
                    ui.separator();
                    let name = snapshot.filtered.get(selected).map_or(selected.as_str(), |r| r.name.as_str());
                    ui.label(format!("Selected: {}", name));
                }
                ui.separator();
            }

            if let Some(entry) = log.latest() {
                let text = RichText::new(format!("[{}] {}", entry.at.format("%H:%M:%S"), entry.message));
                let text = match entry.level {
                    StatusLevel::Info => text.weak(),
                    StatusLevel::Warning => text.color(warning_color()),
                    StatusLevel::Error => text.color(error_color()),
                };
                ui.label(text).on_hover_ui(|ui| {
                    for entry in log.entries().iter().rev().take(10) {
                        ui.label(format!("[{}] {}", entry.at.format("%H:%M:%S"), entry.message));
                    }
                });
            }
        });
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_events_become_status_entries() {
        let bus = EventBus::new();
        let log = StatusLog::new();
        log.attach(&bus);

        bus.publish(PartitionFailed { partition: 4, error: "invalid JSON".to_string() });
        bus.publish(DatasetLoaded {
            source_name: "data".to_string(),
            record_count: 120,
            partitions_loaded: 9,
            partitions_failed: 1,
        });

        let entries = log.entries();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].message, "Partition 4 skipped: invalid JSON");
        assert_eq!(entries[1].level, StatusLevel::Warning);
        assert_eq!(entries[1].message, "Loaded 120 games from data (9 of 10 partitions)");
    }

    #[test]
    fn test_log_is_bounded() {
        let log = StatusLog::new();
        for i in 0..(MAX_ENTRIES + 5) {
            log.push(StatusLevel::Info, i.to_string());
        }
        assert_eq!(log.entries().len(), MAX_ENTRIES);
        assert_eq!(log.entries()[0].message, "5");
    }
}
