use chrono::Utc;
use std::collections::HashMap;

use super::{ActionEvent, ActionEventKind};
use crate::errors::InitializerError;

/// Almacenamiento de eventos append-only.
pub trait EventStore {
    /// Agrega un evento a partir de su kind y devuelve el evento completo (con seq y ts).
    fn append_kind(&mut self, namespace: &str, kind: ActionEventKind) -> Result<ActionEvent, InitializerError>;
    /// Lista eventos de un namespace (orden ascendente por seq).
    fn list(&self, namespace: &str) -> Result<Vec<ActionEvent>, InitializerError>;
}

#[derive(Debug, Default)]
pub struct InMemoryEventStore {
    pub inner: HashMap<String, Vec<ActionEvent>>,
}

impl EventStore for InMemoryEventStore {
    fn append_kind(&mut self, namespace: &str, kind: ActionEventKind) -> Result<ActionEvent, InitializerError> {
        let vec = self.inner.entry(namespace.to_string()).or_default();
        let seq = vec.len() as u64;
        let ev = ActionEvent { seq,
                               namespace: namespace.to_string(),
                               kind,
                               ts: Utc::now() };
        vec.push(ev.clone());
        Ok(ev)
    }

    fn list(&self, namespace: &str) -> Result<Vec<ActionEvent>, InitializerError> {
        Ok(self.inner.get(namespace).cloned().unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn seq_is_per_namespace() {
        let mut store = InMemoryEventStore::default();
        let apply_id = Uuid::new_v4();
        let a0 = store.append_kind("A", ActionEventKind::ApplyStarted { apply_id, action_count: 0 }).unwrap();
        let b0 = store.append_kind("B", ActionEventKind::ApplyStarted { apply_id, action_count: 0 }).unwrap();
        let a1 = store.append_kind("A",
                                   ActionEventKind::ApplyCompleted { apply_id,
                                                                     fingerprint: "fp".into() })
                      .unwrap();
        assert_eq!((a0.seq, b0.seq, a1.seq), (0, 0, 1));
        assert_eq!(store.list("A").unwrap().len(), 2);
        assert!(store.list("C").unwrap().is_empty());
    }
}
