//! Forwards synchronizer notifications onto the event bus

use std::sync::Arc;

use gm_core::events::{FiltersChanged, SelectionChanged};
use gm_core::{EventBus, SyncSnapshot, ViewSubscriber};

pub struct EventBridge {
    bus: Arc<EventBus>,
    total: usize,
}

impl EventBridge {
    pub fn new(bus: Arc<EventBus>, total: usize) -> Self {
        Self { bus, total }
    }
}

impl ViewSubscriber for EventBridge {
    fn on_filter_change(&self, snapshot: &SyncSnapshot) {
        tracing::debug!(
            "Generation {}: {} of {} visible",
            snapshot.generation,
            snapshot.filtered.len(),
            self.total
        );
        self.bus.publish(FiltersChanged {
            generation: snapshot.generation,
            visible: snapshot.filtered.len(),
            total: self.total,
            active_legend: snapshot.filter.active_legend,
        });

        if snapshot.selection.changed() {
            self.bus.publish(SelectionChanged {
                previous: snapshot.selection.previous.clone(),
                current: snapshot.selection.current.clone(),
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gm_core::{Dataset, GameId, Record, ViewSynchronizer};
    use parking_lot::Mutex;

    #[test]
    fn test_selection_events_follow_clicks() {
        let bus = Arc::new(EventBus::new());
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        bus.on(move |e: &SelectionChanged| sink.lock().push(e.current.clone()));

        let dataset = Dataset::from_records(vec![
            Record::new("1", "A").with_peak_ccu(5).with_release("2015"),
            Record::new("2", "B").with_peak_ccu(5).with_release("2016"),
        ]);
        let sync = ViewSynchronizer::new(Arc::new(dataset));
        let bridge = Arc::new(EventBridge::new(bus.clone(), 2));
        sync.add_subscriber(bridge.clone());

        sync.select_point(&GameId::from("1")).unwrap();
        sync.select_point(&GameId::from("1")).unwrap();
        sync.set_search_text("b");

        assert_eq!(*seen.lock(), vec![Some(GameId::from("1")), None]);
    }
}
