//! In-memory event bus.
//!
//! Captures every published envelope in order. Used by the in-memory wiring
//! and by tests that assert on emitted events.

use async_trait::async_trait;
use std::sync::RwLock;

use crate::domain::foundation::{DomainError, ErrorCode, EventEnvelope};
use crate::ports::EventPublisher;

/// In-memory event bus.
///
/// # Example
///
/// ```ignore
/// let bus = Arc::new(InMemoryEventBus::new());
/// bus.publish(envelope).await?;
///
/// assert_eq!(bus.event_count(), 1);
/// assert!(bus.has_event("visa.issued.v1"));
/// ```
pub struct InMemoryEventBus {
    published: RwLock<Vec<EventEnvelope>>,
}

impl InMemoryEventBus {
    /// Creates a new empty event bus.
    pub fn new() -> Self {
        Self {
            published: RwLock::new(Vec::new()),
        }
    }

    // === Test Helpers ===

    /// Returns all published events in publication order.
    pub fn published_events(&self) -> Vec<EventEnvelope> {
        self.published
            .read()
            .map(|events| events.clone())
            .unwrap_or_else(|poisoned| poisoned.into_inner().clone())
    }

    /// Returns events of a specific type.
    pub fn events_of_type(&self, event_type: &str) -> Vec<EventEnvelope> {
        self.published_events()
            .into_iter()
            .filter(|e| e.event_type == event_type)
            .collect()
    }

    /// Returns events for a specific aggregate.
    pub fn events_for_aggregate(&self, aggregate_id: &str) -> Vec<EventEnvelope> {
        self.published_events()
            .into_iter()
            .filter(|e| e.aggregate_id == aggregate_id)
            .collect()
    }

    /// Returns count of published events.
    pub fn event_count(&self) -> usize {
        self.published_events().len()
    }

    /// Checks if a specific event type was published.
    pub fn has_event(&self, event_type: &str) -> bool {
        self.published_events()
            .iter()
            .any(|e| e.event_type == event_type)
    }

    /// Clears all published events.
    pub fn clear(&self) {
        if let Ok(mut events) = self.published.write() {
            events.clear();
        }
    }
}

impl Default for InMemoryEventBus {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EventPublisher for InMemoryEventBus {
    async fn publish(&self, event: EventEnvelope) -> Result<(), DomainError> {
        tracing::debug!(
            event_type = %event.event_type,
            aggregate_id = %event.aggregate_id,
            "event published"
        );
        self.published
            .write()
            .map_err(|_| {
                DomainError::new(ErrorCode::InternalError, "event bus lock poisoned")
            })?
            .push(event);
        Ok(())
    }

    async fn publish_all(&self, events: Vec<EventEnvelope>) -> Result<(), DomainError> {
        for event in events {
            self.publish(event).await?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::{EventId, EventMetadata, Timestamp};
    use serde_json::json;

    fn test_envelope(event_type: &str, aggregate_id: &str) -> EventEnvelope {
        EventEnvelope {
            event_id: EventId::new(),
            event_type: event_type.to_string(),
            schema_version: 1,
            aggregate_id: aggregate_id.to_string(),
            aggregate_type: "Document".to_string(),
            occurred_at: Timestamp::now(),
            payload: json!({}),
            metadata: EventMetadata::default(),
        }
    }

    #[tokio::test]
    async fn publish_stores_event() {
        let bus = InMemoryEventBus::new();
        bus.publish(test_envelope("document.created.v1", "doc-1"))
            .await
            .unwrap();

        assert_eq!(bus.event_count(), 1);
        assert!(bus.has_event("document.created.v1"));
        assert!(!bus.has_event("visa.issued.v1"));
    }

    #[tokio::test]
    async fn events_of_type_filters_correctly() {
        let bus = InMemoryEventBus::new();
        bus.publish(test_envelope("version.created.v1", "1")).await.unwrap();
        bus.publish(test_envelope("visa.issued.v1", "2")).await.unwrap();
        bus.publish(test_envelope("version.created.v1", "3")).await.unwrap();

        assert_eq!(bus.events_of_type("version.created.v1").len(), 2);
        assert_eq!(bus.events_for_aggregate("2").len(), 1);
    }

    #[tokio::test]
    async fn publish_all_keeps_order() {
        let bus = InMemoryEventBus::new();
        bus.publish_all(vec![
            test_envelope("visa.issued.v1", "v"),
            test_envelope("version.created.v1", "b"),
        ])
        .await
        .unwrap();

        let types: Vec<String> = bus
            .published_events()
            .into_iter()
            .map(|e| e.event_type)
            .collect();
        assert_eq!(types, vec!["visa.issued.v1", "version.created.v1"]);
    }

    #[tokio::test]
    async fn clear_removes_events() {
        let bus = InMemoryEventBus::new();
        bus.publish(test_envelope("document.diffused.v1", "d")).await.unwrap();
        bus.clear();
        assert_eq!(bus.event_count(), 0);
    }
}
