//! Append-only match event log

use crate::core::{EntityId, IdAllocator};
use crate::game::Side;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

pub type EventId = EntityId<GameEvent>;

/// Severity classification of an event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventKind {
    Info,
    Action,
    System,
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventKind::Info => write!(f, "info"),
            EventKind::Action => write!(f, "action"),
            EventKind::System => write!(f, "system"),
        }
    }
}

/// Source of event timestamps
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventClock {
    /// Wall-clock milliseconds since the Unix epoch
    #[default]
    System,
    /// The event's sequence number in the log
    Logical,
}

/// One human-readable log line
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameEvent {
    pub id: EventId,
    /// Milliseconds since the Unix epoch, or the sequence number under
    /// `EventClock::Logical`
    pub timestamp: u64,
    pub message: String,
    pub kind: EventKind,
    /// Side the event is about, if any
    pub side: Option<Side>,
}

impl fmt::Display for GameEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EventLog {
    events: Vec<GameEvent>,
    ids: IdAllocator,
    #[serde(default)]
    clock: EventClock,
}

fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_clock(clock: EventClock) -> Self {
        EventLog {
            clock,
            ..Self::default()
        }
    }

    pub fn clock(&self) -> EventClock {
        self.clock
    }

    pub fn push(&mut self, kind: EventKind, side: Option<Side>, message: impl Into<String>) -> EventId {
        let id: EventId = self.ids.next_id();
        let timestamp = match self.clock {
            EventClock::System => now_millis(),
            EventClock::Logical => u64::from(id.as_u32()),
        };
        self.events.push(GameEvent {
            id,
            timestamp,
            message: message.into(),
            kind,
            side,
        });
        id
    }

    pub fn info(&mut self, side: Option<Side>, message: impl Into<String>) -> EventId {
        self.push(EventKind::Info, side, message)
    }

    pub fn action(&mut self, side: Option<Side>, message: impl Into<String>) -> EventId {
        self.push(EventKind::Action, side, message)
    }

    pub fn system(&mut self, side: Option<Side>, message: impl Into<String>) -> EventId {
        self.push(EventKind::System, side, message)
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, GameEvent> {
        self.events.iter()
    }

    /// Events appended after the first `start`
    pub fn since(&self, start: usize) -> &[GameEvent] {
        self.events.get(start..).unwrap_or(&[])
    }

    pub fn last(&self) -> Option<&GameEvent> {
        self.events.last()
    }

    /// Messages only, for assertions and replay comparison
    pub fn messages(&self) -> Vec<&str> {
        self.events.iter().map(|e| e.message.as_str()).collect()
    }

    /// Swap the side tags (used by `GameState::mirrored`)
    pub(crate) fn mirror_sides(&mut self) {
        for e in &mut self.events {
            e.side = e.side.map(|s| s.opponent());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_are_sequential() {
        let mut log = EventLog::new();
        let a = log.info(None, "match started");
        let b = log.action(Some(Side::Player), "Alice drew a card");
        assert_eq!(a.as_u32(), 0);
        assert_eq!(b.as_u32(), 1);
        assert_eq!(log.len(), 2);
        assert_eq!(log.since(1)[0].kind, EventKind::Action);
        assert!(log.since(5).is_empty());
    }

    #[test]
    fn test_logical_clock_replays_equal() {
        let record = || {
            let mut log = EventLog::with_clock(EventClock::Logical);
            log.system(None, "match started");
            log.action(Some(Side::Opponent), "Bob drew a card");
            log
        };
        let first = record();
        assert_eq!(first, record());
        let stamps: Vec<u64> = first.iter().map(|e| e.timestamp).collect();
        assert_eq!(stamps, vec![0, 1]);
        assert_eq!(EventLog::new().clock(), EventClock::System);
    }

    #[test]
    fn test_mirror_sides() {
        let mut log = EventLog::new();
        log.system(Some(Side::Player), "poison");
        log.system(None, "turn");
        log.mirror_sides();
        assert_eq!(log.iter().next().unwrap().side, Some(Side::Opponent));
        assert_eq!(log.last().unwrap().side, None);
    }
}
