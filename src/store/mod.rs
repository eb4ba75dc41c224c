//! The shared state store: one persisted record plus typed accessors and a
//! change-subscription interface used by both the timer controller and the UI.

use crate::model::TimerRecord;
use std::path::PathBuf;
use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::{Arc, Mutex, MutexGuard, Weak};
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to write state file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to encode state: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Identifies one field of the shared record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreKey {
    Timer,
    IsRunning,
    IsWorkSession,
    WorkMinutes,
    Tasks,
}

/// A typed field value carried by change events.
#[derive(Debug, Clone, PartialEq)]
pub enum StoreValue {
    Seconds(u64),
    Flag(bool),
    Minutes(u32),
    Tasks(Vec<crate::model::TodoItem>),
}

/// Pushed to subscribers whenever a write changes one of their keys.
#[derive(Debug, Clone)]
pub struct ChangeEvent {
    pub key: StoreKey,
    pub old: StoreValue,
    pub new: StoreValue,
}

struct Subscriber {
    id: u64,
    keys: Vec<StoreKey>,
    tx: Sender<ChangeEvent>,
}

struct StoreInner {
    record: TimerRecord,
    path: PathBuf,
    subscribers: Vec<Subscriber>,
    next_subscriber_id: u64,
}

impl StoreInner {
    /// Write the record to disk. Callers treat failures as non-fatal: the
    /// in-memory record stays authoritative for the rest of the run.
    fn persist(&self) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(&self.record)?;
        std::fs::write(&self.path, content)?;
        Ok(())
    }

    fn notify(&mut self, event: ChangeEvent) {
        // Drop subscribers whose receiving end has gone away.
        self.subscribers.retain(|sub| {
            if !sub.keys.contains(&event.key) {
                return true;
            }
            sub.tx.send(event.clone()).is_ok()
        });
    }
}

/// Cloneable handle to the shared record. Both components receive one at
/// startup instead of reaching for ambient globals.
#[derive(Clone)]
pub struct Store {
    inner: Arc<Mutex<StoreInner>>,
}

impl Store {
    /// Open the store backed by `path`, falling back to the default record
    /// when the file is missing or unreadable. The normalized record is
    /// written back immediately so a fresh install leaves a valid file
    /// behind (install/startup initialization).
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let mut record = match std::fs::read_to_string(&path) {
            Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
                warn!("state file is corrupt, starting from defaults: {e}");
                TimerRecord::default()
            }),
            Err(_) => TimerRecord::default(),
        };
        record.normalize();

        let store = Self {
            inner: Arc::new(Mutex::new(StoreInner {
                record,
                path,
                subscribers: Vec::new(),
                next_subscriber_id: 0,
            })),
        };
        if let Err(e) = store.lock().persist() {
            warn!("could not write initial state: {e}");
        }
        store
    }

    /// Open the store at its standard location in the platform data dir.
    pub fn open_default() -> Self {
        let data_dir = dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("tomodoro");
        Self::open(data_dir.join("state.json"))
    }

    fn lock(&self) -> MutexGuard<'_, StoreInner> {
        // A poisoned lock only means another thread panicked mid-write; the
        // record itself is still a complete value.
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    // -- Typed readers ------------------------------------------------------

    pub fn timer(&self) -> u64 {
        self.lock().record.timer
    }

    pub fn is_running(&self) -> bool {
        self.lock().record.is_running
    }

    pub fn is_work_session(&self) -> bool {
        self.lock().record.is_work_session
    }

    pub fn work_minutes(&self) -> u32 {
        self.lock().record.work_minutes
    }

    pub fn tasks(&self) -> Vec<crate::model::TodoItem> {
        self.lock().record.tasks.clone()
    }

    #[cfg(test)]
    pub fn snapshot(&self) -> TimerRecord {
        self.lock().record.clone()
    }

    // -- Writers ------------------------------------------------------------

    /// Apply a mutation to the record as one transition: persist once, then
    /// emit one `(key, old, new)` event per field that actually changed.
    pub fn apply(&self, mutate: impl FnOnce(&mut TimerRecord)) {
        let mut inner = self.lock();
        let before = inner.record.clone();
        mutate(&mut inner.record);
        let after = inner.record.clone();

        let mut events = Vec::new();
        if before.timer != after.timer {
            events.push(ChangeEvent {
                key: StoreKey::Timer,
                old: StoreValue::Seconds(before.timer),
                new: StoreValue::Seconds(after.timer),
            });
        }
        if before.is_running != after.is_running {
            events.push(ChangeEvent {
                key: StoreKey::IsRunning,
                old: StoreValue::Flag(before.is_running),
                new: StoreValue::Flag(after.is_running),
            });
        }
        if before.is_work_session != after.is_work_session {
            events.push(ChangeEvent {
                key: StoreKey::IsWorkSession,
                old: StoreValue::Flag(before.is_work_session),
                new: StoreValue::Flag(after.is_work_session),
            });
        }
        if before.work_minutes != after.work_minutes {
            events.push(ChangeEvent {
                key: StoreKey::WorkMinutes,
                old: StoreValue::Minutes(before.work_minutes),
                new: StoreValue::Minutes(after.work_minutes),
            });
        }
        if before.tasks != after.tasks {
            events.push(ChangeEvent {
                key: StoreKey::Tasks,
                old: StoreValue::Tasks(before.tasks),
                new: StoreValue::Tasks(after.tasks),
            });
        }
        if events.is_empty() {
            return;
        }

        if let Err(e) = inner.persist() {
            warn!("could not persist state transition: {e}");
        }
        for event in events {
            debug!(key = ?event.key, "store changed");
            inner.notify(event);
        }
    }

    pub fn set_timer(&self, seconds: u64) {
        self.apply(|record| record.timer = seconds);
    }

    pub fn set_running(&self, running: bool) {
        self.apply(|record| record.is_running = running);
    }

    pub fn set_tasks(&self, tasks: Vec<crate::model::TodoItem>) {
        self.apply(|record| record.tasks = tasks);
    }

    // -- Subscriptions ------------------------------------------------------

    /// Register for change events on the given keys. The subscription
    /// deregisters itself when dropped.
    pub fn subscribe(&self, keys: &[StoreKey]) -> Subscription {
        let (tx, rx) = channel();
        let mut inner = self.lock();
        let id = inner.next_subscriber_id;
        inner.next_subscriber_id += 1;
        inner.subscribers.push(Subscriber {
            id,
            keys: keys.to_vec(),
            tx,
        });
        Subscription {
            id,
            rx,
            store: Arc::downgrade(&self.inner),
        }
    }
}

/// A registered change listener. Poll it from the UI loop; dropping it
/// removes the registration from the store.
pub struct Subscription {
    id: u64,
    rx: Receiver<ChangeEvent>,
    store: Weak<Mutex<StoreInner>>,
}

impl Subscription {
    /// Non-blocking: returns the next pending event, if any.
    pub fn poll(&self) -> Option<ChangeEvent> {
        self.rx.try_recv().ok()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(inner) = self.store.upgrade() {
            let mut inner = inner.lock().unwrap_or_else(|e| e.into_inner());
            inner.subscribers.retain(|sub| sub.id != self.id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::TodoItem;
    use tempfile::tempdir;

    #[test]
    fn fresh_store_has_defaults() {
        let dir = tempdir().unwrap();
        let store = Store::open(dir.path().join("state.json"));
        assert_eq!(store.timer(), 1500);
        assert!(!store.is_running());
        assert!(store.is_work_session());
        assert_eq!(store.work_minutes(), 25);
        assert!(store.tasks().is_empty());
    }

    #[test]
    fn writes_survive_reopen() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("state.json");
        {
            let store = Store::open(&path);
            store.apply(|record| {
                record.work_minutes = 40;
                record.timer = 40 * 60;
            });
            store.set_tasks(vec![TodoItem::new("Write spec")]);
        }

        let store = Store::open(&path);
        assert_eq!(store.work_minutes(), 40);
        assert_eq!(store.timer(), 2400);
        assert_eq!(store.tasks().len(), 1);
        assert_eq!(store.tasks()[0].text, "Write spec");
        // Reopen forces the paused state regardless of what was stored.
        assert!(!store.is_running());
    }

    #[test]
    fn partial_state_file_fills_in_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("state.json");
        std::fs::write(&path, r#"{"timer": 90, "is_work_session": false}"#).unwrap();

        let store = Store::open(&path);
        assert_eq!(store.timer(), 90);
        assert!(!store.is_work_session());
        assert_eq!(store.work_minutes(), 25);
    }

    #[test]
    fn corrupt_state_file_falls_back_to_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("state.json");
        std::fs::write(&path, "not json {{{").unwrap();

        let store = Store::open(&path);
        assert_eq!(store.timer(), 1500);
        assert_eq!(store.work_minutes(), 25);
    }

    #[test]
    fn subscription_sees_old_and_new_values() {
        let dir = tempdir().unwrap();
        let store = Store::open(dir.path().join("state.json"));
        let sub = store.subscribe(&[StoreKey::Timer]);

        store.set_timer(1499);
        let event = sub.poll().expect("timer change event");
        assert_eq!(event.key, StoreKey::Timer);
        assert_eq!(event.old, StoreValue::Seconds(1500));
        assert_eq!(event.new, StoreValue::Seconds(1499));
    }

    #[test]
    fn subscription_only_receives_registered_keys() {
        let dir = tempdir().unwrap();
        let store = Store::open(dir.path().join("state.json"));
        let sub = store.subscribe(&[StoreKey::Timer]);

        store.set_running(true);
        store.set_tasks(vec![TodoItem::new("ignored")]);
        assert!(sub.poll().is_none());

        store.set_timer(10);
        assert!(sub.poll().is_some());
    }

    #[test]
    fn unchanged_writes_emit_no_events() {
        let dir = tempdir().unwrap();
        let store = Store::open(dir.path().join("state.json"));
        let sub = store.subscribe(&[StoreKey::Timer, StoreKey::IsRunning]);

        store.set_timer(1500);
        store.set_running(false);
        assert!(sub.poll().is_none());
    }

    #[test]
    fn dropping_subscription_deregisters() {
        let dir = tempdir().unwrap();
        let store = Store::open(dir.path().join("state.json"));
        let sub = store.subscribe(&[StoreKey::Timer]);
        drop(sub);

        // Would panic on a dangling sender if the registration survived;
        // mostly we assert the subscriber list shrank.
        store.set_timer(1);
        assert!(store.lock().subscribers.is_empty());
    }

    #[test]
    fn one_transition_emits_one_event_per_changed_field() {
        let dir = tempdir().unwrap();
        let store = Store::open(dir.path().join("state.json"));
        let sub = store.subscribe(&[
            StoreKey::Timer,
            StoreKey::IsRunning,
            StoreKey::IsWorkSession,
        ]);

        store.apply(|record| {
            record.timer = 300;
            record.is_work_session = false;
        });

        let keys: Vec<StoreKey> = std::iter::from_fn(|| sub.poll()).map(|e| e.key).collect();
        assert_eq!(keys, vec![StoreKey::Timer, StoreKey::IsWorkSession]);
    }
}
