//! Status events published while exploring a dataset
//!
//! Handlers are keyed by event type and called outside the lock, so a handler
//! may publish again without deadlocking.

use std::any::{Any, TypeId};
use std::sync::Arc;

use ahash::AHashMap;
use parking_lot::RwLock;

use crate::owners::OwnerBucket;
use crate::record::GameId;

/// Marker for values that travel over the [`EventBus`]
pub trait Event: Any + Send + Sync {}

type Handler = Arc<dyn Fn(&dyn Any) + Send + Sync>;

/// Application-wide bus for load, filter and detail notifications
#[derive(Default)]
pub struct EventBus {
    handlers: RwLock<AHashMap<TypeId, Vec<Handler>>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Call `handler` for every published `E`
    pub fn on<E: Event>(&self, handler: impl Fn(&E) + Send + Sync + 'static) {
        let handler: Handler = Arc::new(move |event: &dyn Any| {
            if let Some(event) = event.downcast_ref::<E>() {
                handler(event);
            }
        });
        self.handlers.write().entry(TypeId::of::<E>()).or_default().push(handler);
    }

    pub fn publish<E: Event>(&self, event: E) {
        let handlers = match self.handlers.read().get(&TypeId::of::<E>()) {
            Some(handlers) => handlers.clone(),
            None => return,
        };
        for handler in handlers {
            handler(&event);
        }
    }

    pub fn handler_count<E: Event>(&self) -> usize {
        self.handlers.read().get(&TypeId::of::<E>()).map_or(0, Vec::len)
    }
}

/// All partitions have been attempted and the dataset is built
#[derive(Debug, Clone)]
pub struct DatasetLoaded {
    pub source_name: String,
    pub record_count: usize,
    pub partitions_loaded: usize,
    pub partitions_failed: usize,
}

/// One partition could not be loaded
#[derive(Debug, Clone)]
pub struct PartitionFailed {
    pub partition: usize,
    pub error: String,
}

#[derive(Debug, Clone)]
pub struct FiltersChanged {
    pub generation: u64,
    pub visible: usize,
    pub total: usize,
    pub active_legend: Option<OwnerBucket>,
}

#[derive(Debug, Clone)]
pub struct SelectionChanged {
    pub previous: Option<GameId>,
    pub current: Option<GameId>,
}

/// A detail request failed
#[derive(Debug, Clone)]
pub struct DetailFailed {
    pub id: GameId,
    pub error: String,
}

impl Event for DatasetLoaded {}
impl Event for PartitionFailed {}
impl Event for FiltersChanged {}
impl Event for SelectionChanged {}
impl Event for DetailFailed {}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;

    #[test]
    fn test_handler_receives_only_its_event() {
        let bus = EventBus::new();
        let seen = Arc::new(Mutex::new(Vec::new()));

        let sink = seen.clone();
        bus.on(move |event: &PartitionFailed| sink.lock().push(event.partition));

        bus.publish(PartitionFailed { partition: 3, error: "missing".to_string() });
        bus.publish(DetailFailed { id: "1".into(), error: "timeout".to_string() });
        bus.publish(PartitionFailed { partition: 7, error: "bad json".to_string() });

        assert_eq!(*seen.lock(), vec![3, 7]);
        assert_eq!(bus.handler_count::<PartitionFailed>(), 1);
        assert_eq!(bus.handler_count::<DetailFailed>(), 0);
    }

    #[test]
    fn test_handler_may_publish() {
        let bus = Arc::new(EventBus::new());
        let failures = Arc::new(Mutex::new(0));

        let relay = Arc::downgrade(&bus);
        bus.on(move |event: &PartitionFailed| {
            if let Some(bus) = relay.upgrade() {
                bus.publish(DetailFailed { id: event.partition.to_string().into(), error: event.error.clone() });
            }
        });
        let count = failures.clone();
        bus.on(move |_: &DetailFailed| *count.lock() += 1);

        bus.publish(PartitionFailed { partition: 2, error: "gone".to_string() });
        assert_eq!(*failures.lock(), 1);
    }
}
