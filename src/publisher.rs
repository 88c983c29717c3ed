//! Outbound view state for whatever paints the image.

use log::warn;
use serde::Serialize;
use std::io::Write;

use crate::geometry::Point;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ViewState {
    pub pan_x: f64,
    pub pan_y: f64,
    /// Percent.
    pub zoom: f64,
    /// Percent.
    pub brightness: f64,
}

impl ViewState {
    pub fn css_transform(&self) -> String {
        format!(
            "translate({}px, {}px)scale({})",
            self.pan_x,
            self.pan_y,
            self.zoom / 100.0
        )
    }

    pub fn css_filter(&self) -> String {
        format!("brightness({}%)", self.brightness)
    }

    pub fn zoom_label(&self) -> String {
        format!("Zoom: {}%", self.zoom as i64)
    }

    pub fn position_label(&self) -> String {
        format!("Position: {}:{}", -self.pan_x as i64, self.pan_y as i64)
    }

    pub fn brightness_label(&self) -> String {
        format!("Brightness: {}%", self.brightness as i64)
    }
}

/// Receives every state change and the synthetic pointer's marker.
pub trait StatePublisher {
    fn publish(&mut self, state: &ViewState);

    fn show_marker(&mut self, _at: Point) {}

    fn hide_marker(&mut self) {}
}

/// Human-readable labels, one line per publish.
pub struct TextPublisher<W: Write> {
    out: W,
}

impl<W: Write> TextPublisher<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    fn line(&mut self, s: &str) {
        if let Err(e) = writeln!(self.out, "{s}") {
            warn!("publish failed: {e}");
        }
    }
}

impl<W: Write> StatePublisher for TextPublisher<W> {
    fn publish(&mut self, state: &ViewState) {
        let s = format!(
            "{} | {} | {}",
            state.zoom_label(),
            state.position_label(),
            state.brightness_label()
        );
        self.line(&s);
    }

    fn show_marker(&mut self, at: Point) {
        self.line(&format!("marker at {}:{}", at.x, at.y));
    }

    fn hide_marker(&mut self) {
        self.line("marker hidden");
    }
}

#[derive(Serialize)]
#[serde(untagged)]
enum Record<'a> {
    State(&'a ViewState),
    Marker { marker: Option<Point> },
}

/// One JSON object per line.
pub struct JsonLinesPublisher<W: Write> {
    out: W,
}

impl<W: Write> JsonLinesPublisher<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    fn emit(&mut self, rec: &Record<'_>) {
        let res = serde_json::to_writer(&mut self.out, rec)
            .map_err(std::io::Error::from)
            .and_then(|_| self.out.write_all(b"\n"));
        if let Err(e) = res {
            warn!("publish failed: {e}");
        }
    }
}

impl<W: Write> StatePublisher for JsonLinesPublisher<W> {
    fn publish(&mut self, state: &ViewState) {
        self.emit(&Record::State(state));
    }

    fn show_marker(&mut self, at: Point) {
        self.emit(&Record::Marker { marker: Some(at) });
    }

    fn hide_marker(&mut self) {
        self.emit(&Record::Marker { marker: None });
    }
}
