//! Two-pointer session: one-shot pinch/twist classification followed by
//! incremental zoom or brightness updates.

use log::{debug, trace};

use crate::config::Thresholds;
use crate::geometry::{Point, angle, angle_delta, distance};
use crate::params::ParameterStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureKind {
    Unclassified,
    Pinch,
    Twist,
}

/// Each variant carries the baseline its updates are measured against.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Classification {
    Unclassified { ref_distance: f64, ref_angle: f64 },
    Pinch { ref_distance: f64 },
    Twist { ref_angle: f64 },
}

#[derive(Debug, Clone, PartialEq)]
pub struct GestureSession {
    state: Classification,
}

impl GestureSession {
    /// Baseline between the pointer that just went down and its counterpart.
    pub fn open(p1: Point, p2: Point) -> Self {
        let state = Classification::Unclassified {
            ref_distance: distance(p1, p2),
            ref_angle: angle(p1, p2),
        };
        debug!("gesture session opened: {state:?}");
        Self { state }
    }

    pub fn kind(&self) -> GestureKind {
        match self.state {
            Classification::Unclassified { .. } => GestureKind::Unclassified,
            Classification::Pinch { .. } => GestureKind::Pinch,
            Classification::Twist { .. } => GestureKind::Twist,
        }
    }

    pub fn reference_distance(&self) -> Option<f64> {
        match self.state {
            Classification::Unclassified { ref_distance, .. }
            | Classification::Pinch { ref_distance } => Some(ref_distance),
            Classification::Twist { .. } => None,
        }
    }

    pub fn reference_angle(&self) -> Option<f64> {
        match self.state {
            Classification::Unclassified { ref_angle, .. } | Classification::Twist { ref_angle } => {
                Some(ref_angle)
            }
            Classification::Pinch { .. } => None,
        }
    }

    /// Feeds one two-pointer sample: `p1` is the pointer that moved, `p2`
    /// its counterpart. Returns the kind committed by this sample, if any.
    pub fn update(
        &mut self,
        p1: Point,
        p2: Point,
        th: &Thresholds,
        store: &mut ParameterStore,
    ) -> Option<GestureKind> {
        let dist = distance(p1, p2);
        let ang = angle(p1, p2);

        let committed = match self.state {
            Classification::Unclassified {
                ref_distance,
                ref_angle,
            } => self.classify(dist, ang, ref_distance, ref_angle, th),
            _ => None,
        };

        match &mut self.state {
            Classification::Pinch { ref_distance } => {
                let delta = dist - *ref_distance;
                *ref_distance = dist;
                let zoom = store.zoom_by(delta);
                trace!("pinch delta={delta} zoom={zoom}");
            }
            Classification::Twist { ref_angle } => {
                let delta = angle_delta(*ref_angle, ang);
                *ref_angle = ang;
                let brightness = store.brighten_by(delta);
                trace!("twist delta={delta} brightness={brightness}");
            }
            Classification::Unclassified { .. } => {}
        }

        committed
    }

    // Distance is checked first, so a sample crossing both thresholds is a pinch.
    fn classify(
        &mut self,
        dist: f64,
        ang: f64,
        ref_distance: f64,
        ref_angle: f64,
        th: &Thresholds,
    ) -> Option<GestureKind> {
        let dist_diff = (dist - ref_distance).abs();
        let angle_diff = angle_delta(ref_angle, ang).abs();

        let (next, kind) = if dist_diff > th.pinch_distance_px {
            (Classification::Pinch { ref_distance: dist }, GestureKind::Pinch)
        } else if angle_diff > th.twist_angle_deg {
            (Classification::Twist { ref_angle: ang }, GestureKind::Twist)
        } else {
            return None;
        };

        debug!("gesture classified as {kind:?} (distance diff {dist_diff}, angle diff {angle_diff})");
        self.state = next;
        Some(kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Limits, Surface};

    fn p(x: f64, y: f64) -> Point {
        Point::new(x, y)
    }

    fn store() -> ParameterStore {
        ParameterStore::new(&Limits::default(), &Surface::default())
    }

    #[test]
    fn opens_unclassified_with_baseline() {
        let s = GestureSession::open(p(100.0, 0.0), p(0.0, 0.0));
        assert_eq!(s.kind(), GestureKind::Unclassified);
        assert_eq!(s.reference_distance(), Some(100.0));
        assert_eq!(s.reference_angle(), Some(270.0));
    }

    #[test]
    fn distance_change_commits_pinch() {
        let th = Thresholds::default();
        let mut st = store();
        let mut s = GestureSession::open(p(100.0, 0.0), p(0.0, 0.0));

        assert_eq!(s.update(p(150.0, 0.0), p(0.0, 0.0), &th, &mut st), Some(GestureKind::Pinch));
        assert_eq!(s.reference_distance(), Some(150.0));
        // the committing sample only rebases
        assert_eq!(st.zoom().value(), 100.0);

        assert_eq!(s.update(p(190.0, 0.0), p(0.0, 0.0), &th, &mut st), None);
        assert_eq!(st.zoom().value(), 140.0);
        assert_eq!(st.brightness().value(), 100.0);
    }

    #[test]
    fn angle_change_commits_twist() {
        let th = Thresholds::default();
        let mut st = store();
        let mut s = GestureSession::open(p(0.0, 100.0), p(0.0, 0.0));
        assert_eq!(s.reference_angle(), Some(180.0));

        assert_eq!(s.update(p(30.0, 100.0), p(0.0, 0.0), &th, &mut st), Some(GestureKind::Twist));
        assert_eq!(s.reference_angle(), Some(197.0));
        assert_eq!(st.brightness().value(), 100.0);

        // atan2(60, 100) = 30.96° -> 211
        s.update(p(60.0, 100.0), p(0.0, 0.0), &th, &mut st);
        assert_eq!(st.brightness().value(), 114.0);
        assert_eq!(st.zoom().value(), 100.0);
    }

    #[test]
    fn small_jitter_stays_unclassified() {
        let th = Thresholds::default();
        let mut st = store();
        let mut s = GestureSession::open(p(0.0, 100.0), p(0.0, 0.0));
        for (x, y) in [(2.0, 101.0), (-3.0, 110.0), (5.0, 95.0), (0.0, 120.0)] {
            assert_eq!(s.update(p(x, y), p(0.0, 0.0), &th, &mut st), None);
        }
        assert_eq!(s.kind(), GestureKind::Unclassified);
        assert_eq!(s.reference_distance(), Some(100.0));
        assert_eq!(st.snapshot(), store().snapshot());
    }

    #[test]
    fn pinch_wins_tie() {
        let th = Thresholds::default();
        let mut st = store();
        let mut s = GestureSession::open(p(0.0, 100.0), p(0.0, 0.0));
        // distance 100 -> 223, angle 180 -> 243
        assert_eq!(s.update(p(200.0, 100.0), p(0.0, 0.0), &th, &mut st), Some(GestureKind::Pinch));
    }

    #[test]
    fn commitment_is_one_shot() {
        let th = Thresholds::default();
        let mut st = store();
        let mut s = GestureSession::open(p(100.0, 0.0), p(0.0, 0.0));
        s.update(p(150.0, 0.0), p(0.0, 0.0), &th, &mut st);
        assert_eq!(s.kind(), GestureKind::Pinch);

        // large rotations after the commit only ever feed zoom
        for i in 0..36 {
            let r = (i as f64 * 10.0).to_radians();
            let committed = s.update(p(r.sin() * 150.0, r.cos() * 150.0), p(0.0, 0.0), &th, &mut st);
            assert_eq!(committed, None);
            assert_eq!(s.kind(), GestureKind::Pinch);
        }
        assert_eq!(st.brightness().value(), 100.0);
    }

    #[test]
    fn rebasing_is_additive() {
        let th = Thresholds::default();
        let commit = |st: &mut ParameterStore| {
            let mut s = GestureSession::open(p(100.0, 0.0), p(0.0, 0.0));
            s.update(p(140.0, 0.0), p(0.0, 0.0), &th, st);
            s
        };

        let mut stepped = store();
        let mut s = commit(&mut stepped);
        s.update(p(152.0, 0.0), p(0.0, 0.0), &th, &mut stepped);
        s.update(p(171.0, 0.0), p(0.0, 0.0), &th, &mut stepped);

        let mut direct = store();
        let mut s = commit(&mut direct);
        s.update(p(171.0, 0.0), p(0.0, 0.0), &th, &mut direct);

        assert_eq!(stepped.zoom().value(), direct.zoom().value());
        assert_eq!(direct.zoom().value(), 131.0);
    }

    #[test]
    fn twist_across_wrap_uses_short_arc() {
        let th = Thresholds::default();
        let mut st = store();
        // p1 slightly left of straight above p2: angle just past 0
        let mut s = GestureSession::open(p(-10.0, -100.0), p(0.0, 0.0));
        assert_eq!(s.reference_angle(), Some(6.0));

        // swing right of vertical: 354, i.e. 12 degrees back across the wrap
        assert_eq!(s.update(p(10.0, -100.0), p(0.0, 0.0), &th, &mut st), Some(GestureKind::Twist));
        assert_eq!(s.reference_angle(), Some(354.0));
        // 348: -6 degrees, not +354
        s.update(p(21.0, -100.0), p(0.0, 0.0), &th, &mut st);
        assert_eq!(st.brightness().value(), 94.0);
    }

    #[test]
    fn zoom_and_brightness_stay_clamped() {
        let th = Thresholds::default();
        let mut st = store();
        let mut s = GestureSession::open(p(100.0, 0.0), p(0.0, 0.0));
        s.update(p(150.0, 0.0), p(0.0, 0.0), &th, &mut st);
        s.update(p(5000.0, 0.0), p(0.0, 0.0), &th, &mut st);
        assert_eq!(st.zoom().value(), 200.0);
        s.update(p(1.0, 0.0), p(0.0, 0.0), &th, &mut st);
        assert_eq!(st.zoom().value(), 100.0);

        let at = |deg: f64| {
            let r = deg.to_radians();
            p(r.sin() * 100.0, r.cos() * 100.0)
        };
        let mut s = GestureSession::open(at(0.0), p(0.0, 0.0));
        assert_eq!(s.update(at(20.0), p(0.0, 0.0), &th, &mut st), Some(GestureKind::Twist));
        // 150 degrees clockwise in 10 degree steps
        for i in 3..=17 {
            s.update(at(i as f64 * 10.0), p(0.0, 0.0), &th, &mut st);
        }
        assert_eq!(st.brightness().value(), 150.0);
        // 340 degrees back
        for i in (-17..=16).rev() {
            s.update(at(i as f64 * 10.0), p(0.0, 0.0), &th, &mut st);
        }
        assert_eq!(st.brightness().value(), 50.0);
        assert_eq!(st.zoom().value(), 100.0);
    }
}
