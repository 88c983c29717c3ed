//! Pointer lifecycle: owns the registry and the gesture session, routes
//! moves to the single- or two-pointer path and publishes the result.

use log::{debug, trace};
use serde::Deserialize;

use crate::config::{Profile, Thresholds};
use crate::error::GestureError;
use crate::geometry::Point;
use crate::gestures::GestureSession;
use crate::params::ParameterStore;
use crate::publisher::StatePublisher;
use crate::tracker::{PointerId, PointerRegistry};

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum PointerEvent {
    Down { id: PointerId, x: f64, y: f64 },
    Move { id: PointerId, x: f64, y: f64 },
    Up { id: PointerId },
    Cancel { id: PointerId },
    #[serde(rename = "dblclick")]
    DoubleClick { x: f64, y: f64 },
    /// Removes the synthetic pointer placed by a double click.
    Dismiss,
}

pub struct Coordinator<P: StatePublisher> {
    registry: PointerRegistry,
    session: Option<GestureSession>,
    store: ParameterStore,
    thresholds: Thresholds,
    listening: bool,
    publisher: P,
}

impl<P: StatePublisher> Coordinator<P> {
    /// Publishes the initial state once.
    pub fn new(profile: &Profile, publisher: P) -> Self {
        let mut c = Self {
            registry: PointerRegistry::new(),
            session: None,
            store: ParameterStore::new(&profile.limits, &profile.surface),
            thresholds: profile.thresholds.clone(),
            listening: false,
            publisher,
        };
        c.publish();
        c
    }

    pub fn store(&self) -> &ParameterStore {
        &self.store
    }

    pub fn session(&self) -> Option<&GestureSession> {
        self.session.as_ref()
    }

    #[cfg(test)]
    pub fn registry(&self) -> &PointerRegistry {
        &self.registry
    }

    pub fn active_count(&self) -> usize {
        self.registry.len()
    }

    /// Whether move/up/cancel events are being consumed.
    pub fn is_listening(&self) -> bool {
        self.listening
    }

    #[cfg(test)]
    pub fn publisher(&self) -> &P {
        &self.publisher
    }

    pub fn handle(&mut self, ev: PointerEvent) -> Result<(), GestureError> {
        match ev {
            PointerEvent::Down { id, x, y } => self.on_pointer_down(id, x, y),
            PointerEvent::Move { id, x, y } => self.on_pointer_move(id, x, y),
            PointerEvent::Up { id } => {
                self.on_pointer_up(id);
                Ok(())
            }
            PointerEvent::Cancel { id } => {
                self.on_pointer_cancel(id);
                Ok(())
            }
            PointerEvent::DoubleClick { x, y } => self.on_double_click(x, y),
            PointerEvent::Dismiss => {
                self.dismiss_synthetic();
                Ok(())
            }
        }
    }

    pub fn on_pointer_down(&mut self, id: PointerId, x: f64, y: f64) -> Result<(), GestureError> {
        self.registry.press(id, Point::new(x, y));
        if !self.listening {
            debug!("pointer {id} down; listening for moves");
            self.listening = true;
        }
        self.open_session_if_needed(id)
    }

    pub fn on_pointer_move(&mut self, id: PointerId, x: f64, y: f64) -> Result<(), GestureError> {
        if !self.listening || !self.registry.contains(id) {
            trace!("ignoring move of untracked pointer {id}");
            return Ok(());
        }

        if self.registry.len() > 1 {
            // resolve before mutating so a failure leaves everything as it was
            let other = self.registry.other_than(id)?;
            self.registry.advance(id, Point::new(x, y));
            self.on_dual(id, other)?;
        } else {
            self.registry.advance(id, Point::new(x, y));
            if let Some(ptr) = self.registry.get(id) {
                self.store.pan_by(ptr, self.thresholds.vertical_pan_divisor);
            }
        }

        self.publish();
        Ok(())
    }

    /// Any release ends the session, however many pointers remain.
    pub fn on_pointer_up(&mut self, id: PointerId) {
        if self.registry.release(id).is_none() {
            trace!("ignoring release of untracked pointer {id}");
            return;
        }
        self.end_session(id);
        if self.registry.is_empty() && self.listening {
            debug!("all pointers released; idle");
            self.listening = false;
        }
    }

    pub fn on_pointer_cancel(&mut self, id: PointerId) {
        self.on_pointer_up(id);
    }

    /// Places the synthetic pointer unless it is already active.
    pub fn on_double_click(&mut self, x: f64, y: f64) -> Result<(), GestureError> {
        if self.registry.contains(PointerId::Synthetic) {
            return Ok(());
        }
        let at = Point::new(x, y);
        self.registry.press(PointerId::Synthetic, at);
        self.publisher.show_marker(at);
        debug!("synthetic pointer placed at {x}:{y}");
        self.open_session_if_needed(PointerId::Synthetic)
    }

    pub fn dismiss_synthetic(&mut self) {
        if self.registry.release(PointerId::Synthetic).is_none() {
            return;
        }
        self.publisher.hide_marker();
        self.end_session(PointerId::Synthetic);
        if self.registry.is_empty() {
            self.listening = false;
        }
    }

    fn position(&self, id: PointerId) -> Result<Point, GestureError> {
        self.registry
            .get(id)
            .map(|p| p.current)
            .ok_or(GestureError::PointerNotFound { id })
    }

    fn open_session_if_needed(&mut self, id: PointerId) -> Result<(), GestureError> {
        if self.session.is_some() || self.registry.len() < 2 {
            return Ok(());
        }
        let other = self.registry.other_than(id)?;
        let session = GestureSession::open(self.position(id)?, self.position(other)?);
        debug!("pointer {id} paired with {other}");
        self.session = Some(session);
        Ok(())
    }

    fn end_session(&mut self, by: PointerId) {
        if let Some(s) = self.session.take() {
            debug!("gesture session ({:?}) ended by release of {by}", s.kind());
        }
    }

    /// Measures from the pointer that moved to its counterpart.
    fn on_dual(&mut self, id: PointerId, other: PointerId) -> Result<(), GestureError> {
        let moved = self.position(id)?;
        let counterpart = self.position(other)?;

        let Some(session) = self.session.as_mut() else {
            trace!("no open session; two-pointer move of {id} ignored");
            return Ok(());
        };
        if let Some(kind) = session.update(moved, counterpart, &self.thresholds, &mut self.store) {
            debug!(
                "pointer {id} committed the session to {kind:?} (distance {:?}, angle {:?})",
                session.reference_distance(),
                session.reference_angle()
            );
        }
        Ok(())
    }

    fn publish(&mut self) {
        let state = self.store.snapshot();
        self.publisher.publish(&state);
    }
}
