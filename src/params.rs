//! Bounded pan / zoom / brightness values.

use log::trace;

use crate::config::{Limits, Range, Surface};
use crate::publisher::ViewState;
use crate::tracker::Pointer;

/// Scalar that is clamped into `[min, max]` on every mutation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounded {
    value: f64,
    min: f64,
    max: f64,
}

impl Bounded {
    /// An inverted range collapses onto `min`; `initial` is clamped.
    pub fn new(initial: f64, min: f64, max: f64) -> Self {
        let max = max.max(min);
        Self {
            value: initial.clamp(min, max),
            min,
            max,
        }
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    pub fn add(&mut self, delta: f64) -> f64 {
        self.value = (self.value + delta).clamp(self.min, self.max);
        self.value
    }
}

impl From<&Range> for Bounded {
    fn from(r: &Range) -> Self {
        Bounded::new(r.initial, r.min, r.max)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pan {
    pub x: Bounded,
    pub y: Bounded,
}

impl Pan {
    /// Horizontal travel spans the content overhang, starting left of centre;
    /// vertical travel spans the height overhang, starting at the top.
    pub fn for_surface(s: &Surface) -> Self {
        let min_x = (s.viewport_width - s.content_width).min(0.0);
        let x = min_x / 2.0 - s.viewport_width / 2.0;
        let max_y = (s.content_height - s.viewport_height).max(0.0);
        Self {
            x: Bounded::new(x, min_x, 0.0),
            y: Bounded::new(0.0, 0.0, max_y),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParameterStore {
    pan: Pan,
    zoom: Bounded,
    brightness: Bounded,
}

impl ParameterStore {
    pub fn new(limits: &Limits, surface: &Surface) -> Self {
        Self {
            pan: Pan::for_surface(surface),
            zoom: Bounded::from(&limits.zoom),
            brightness: Bounded::from(&limits.brightness),
        }
    }

    pub fn pan(&self) -> &Pan {
        &self.pan
    }

    pub fn zoom(&self) -> &Bounded {
        &self.zoom
    }

    pub fn brightness(&self) -> &Bounded {
        &self.brightness
    }

    /// Single-pointer drag. Upward motion raises pan-y, scaled down by
    /// `vertical_divisor` relative to the horizontal axis.
    pub fn pan_by(&mut self, pointer: &Pointer, vertical_divisor: f64) {
        let Some(prev) = pointer.previous else {
            return;
        };
        let dx = pointer.current.x - prev.x;
        let dy = (prev.y - pointer.current.y) / vertical_divisor;
        self.pan.x.add(dx);
        self.pan.y.add(dy);
        trace!(
            "pan dx={dx} dy={dy} -> ({}, {})",
            self.pan.x.value(),
            self.pan.y.value()
        );
    }

    pub fn zoom_by(&mut self, delta: f64) -> f64 {
        self.zoom.add(delta)
    }

    pub fn brighten_by(&mut self, delta: f64) -> f64 {
        self.brightness.add(delta)
    }

    pub fn snapshot(&self) -> ViewState {
        ViewState {
            pan_x: self.pan.x.value(),
            pan_y: self.pan.y.value(),
            zoom: self.zoom.value(),
            brightness: self.brightness.value(),
        }
    }
}
