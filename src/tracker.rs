//! Per-pointer tracking keyed by identifier.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::GestureError;
use crate::geometry::Point;

/// Literal id of the synthesized debug pointer.
pub const SYNTHETIC_ID: &str = "fake";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawPointerId", into = "RawPointerId")]
pub enum PointerId {
    Device(i64),
    Synthetic,
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum RawPointerId {
    Num(i64),
    Name(String),
}

impl TryFrom<RawPointerId> for PointerId {
    type Error = String;

    fn try_from(raw: RawPointerId) -> Result<Self, Self::Error> {
        match raw {
            RawPointerId::Num(n) => Ok(PointerId::Device(n)),
            RawPointerId::Name(s) if s == SYNTHETIC_ID => Ok(PointerId::Synthetic),
            RawPointerId::Name(s) => s
                .parse()
                .map(PointerId::Device)
                .map_err(|_| format!("pointer id must be an integer or \"{SYNTHETIC_ID}\", got {s:?}")),
        }
    }
}

impl From<PointerId> for RawPointerId {
    fn from(id: PointerId) -> Self {
        match id {
            PointerId::Device(n) => RawPointerId::Num(n),
            PointerId::Synthetic => RawPointerId::Name(SYNTHETIC_ID.to_string()),
        }
    }
}

impl fmt::Display for PointerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PointerId::Device(n) => write!(f, "{n}"),
            PointerId::Synthetic => f.write_str(SYNTHETIC_ID),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pointer {
    pub current: Point,
    /// Absent until the first move.
    pub previous: Option<Point>,
}

impl Pointer {
    fn at(p: Point) -> Self {
        Self {
            current: p,
            previous: None,
        }
    }
}

/// Active pointers in insertion order. Its length is the active pointer count.
#[derive(Debug, Default, Clone)]
pub struct PointerRegistry {
    entries: Vec<(PointerId, Pointer)>,
}

impl PointerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, id: PointerId) -> bool {
        self.get(id).is_some()
    }

    pub fn get(&self, id: PointerId) -> Option<&Pointer> {
        self.entries.iter().find(|(k, _)| *k == id).map(|(_, p)| p)
    }

    /// Places `id` at `p` with no history. An existing entry is overwritten
    /// in place and keeps its position.
    pub fn press(&mut self, id: PointerId, p: Point) {
        match self.entries.iter_mut().find(|(k, _)| *k == id) {
            Some((_, ptr)) => *ptr = Pointer::at(p),
            None => self.entries.push((id, Pointer::at(p))),
        }
    }

    /// Shifts current to previous and records `p`. Returns `false` for an
    /// untracked id.
    pub fn advance(&mut self, id: PointerId, p: Point) -> bool {
        match self.entries.iter_mut().find(|(k, _)| *k == id) {
            Some((_, ptr)) => {
                ptr.previous = Some(ptr.current);
                ptr.current = p;
                true
            }
            None => false,
        }
    }

    pub fn release(&mut self, id: PointerId) -> Option<Pointer> {
        let idx = self.entries.iter().position(|(k, _)| *k == id)?;
        Some(self.entries.remove(idx).1)
    }

    /// Counterpart lookup: the last-inserted pointer other than `id`.
    pub fn other_than(&self, id: PointerId) -> Result<PointerId, GestureError> {
        self.entries
            .iter()
            .rev()
            .map(|(k, _)| *k)
            .find(|k| *k != id)
            .ok_or(GestureError::PointerNotFound { id })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(x: f64, y: f64) -> Point {
        Point::new(x, y)
    }

    #[test]
    fn press_then_advance_keeps_history() {
        let mut reg = PointerRegistry::new();
        reg.press(PointerId::Device(1), p(10.0, 10.0));
        assert_eq!(reg.get(PointerId::Device(1)).unwrap().previous, None);

        assert!(reg.advance(PointerId::Device(1), p(10.0, 5.0)));
        let ptr = reg.get(PointerId::Device(1)).unwrap();
        assert_eq!(ptr.previous, Some(p(10.0, 10.0)));
        assert_eq!(ptr.current, p(10.0, 5.0));
    }

    #[test]
    fn advance_ignores_untracked() {
        let mut reg = PointerRegistry::new();
        assert!(!reg.advance(PointerId::Device(9), p(1.0, 1.0)));
        assert!(reg.is_empty());
    }

    #[test]
    fn press_overwrites_in_place() {
        let mut reg = PointerRegistry::new();
        reg.press(PointerId::Device(1), p(0.0, 0.0));
        reg.press(PointerId::Device(2), p(5.0, 5.0));
        reg.advance(PointerId::Device(1), p(1.0, 1.0));
        reg.press(PointerId::Device(1), p(7.0, 7.0));

        assert_eq!(reg.len(), 2);
        // 1 kept its slot, so 2 is still the last-seen counterpart
        assert_eq!(reg.other_than(PointerId::Synthetic), Ok(PointerId::Device(2)));
        assert_eq!(reg.get(PointerId::Device(1)).unwrap().previous, None);
    }

    #[test]
    fn other_than_returns_last_seen() {
        let mut reg = PointerRegistry::new();
        reg.press(PointerId::Device(1), p(0.0, 0.0));
        reg.press(PointerId::Device(2), p(1.0, 0.0));
        reg.press(PointerId::Synthetic, p(2.0, 0.0));

        assert_eq!(reg.other_than(PointerId::Device(1)), Ok(PointerId::Synthetic));
        assert_eq!(reg.other_than(PointerId::Synthetic), Ok(PointerId::Device(2)));
    }

    #[test]
    fn other_than_fails_when_alone() {
        let mut reg = PointerRegistry::new();
        reg.press(PointerId::Device(4), p(0.0, 0.0));
        assert_eq!(
            reg.other_than(PointerId::Device(4)),
            Err(GestureError::PointerNotFound {
                id: PointerId::Device(4)
            })
        );
    }

    #[test]
    fn release_removes_entry() {
        let mut reg = PointerRegistry::new();
        reg.press(PointerId::Device(1), p(0.0, 0.0));
        assert!(reg.release(PointerId::Device(1)).is_some());
        assert!(reg.release(PointerId::Device(1)).is_none());
        assert_eq!(reg.len(), 0);
    }

    #[test]
    fn pointer_id_parses_numbers_and_fake() {
        let id: PointerId = serde_json::from_str("3").unwrap();
        assert_eq!(id, PointerId::Device(3));
        let id: PointerId = serde_json::from_str("\"fake\"").unwrap();
        assert_eq!(id, PointerId::Synthetic);
        let id: PointerId = serde_json::from_str("\"12\"").unwrap();
        assert_eq!(id, PointerId::Device(12));
        assert!(serde_json::from_str::<PointerId>("\"thumb\"").is_err());

        assert_eq!(serde_json::to_string(&PointerId::Synthetic).unwrap(), "\"fake\"");
        assert_eq!(PointerId::Device(7).to_string(), "7");
    }
}
