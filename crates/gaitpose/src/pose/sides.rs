use crate::geometry::Point3;

/// Keeps left/right foot identity stable across consecutive frames.
#[derive(Debug, Clone)]
pub(crate) struct SideTracker {
    lookback: usize,
    last: Option<(usize, Point3, Point3)>,
}

impl SideTracker {
    pub(crate) fn new(lookback: usize) -> Self {
        Self {
            lookback,
            last: None,
        }
    }

    /// Label an unordered foot pair as `(left, right, side_reset)`.
    ///
    /// With a recent previous frame the pair keeps or swaps its order to
    /// minimize the summed distance to the previous feet (ties keep).
    /// Otherwise the foot with the smaller sensor x becomes left and the
    /// reset flag is raised.
    pub(crate) fn assign(&mut self, frame: usize, feet: [Point3; 2]) -> (Point3, Point3, bool) {
        let [a, b] = feet;
        let labeled = match self.last {
            Some((prev, left, right)) if frame.saturating_sub(prev) <= self.lookback => {
                let keep = (a - left).norm() + (b - right).norm();
                let swap = (b - left).norm() + (a - right).norm();
                if swap < keep {
                    (b, a, false)
                } else {
                    (a, b, false)
                }
            }
            _ => {
                if b.x < a.x {
                    (b, a, true)
                } else {
                    (a, b, true)
                }
            }
        };
        self.last = Some((frame, labeled.0, labeled.1));
        labeled
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_frame_resets_by_x() {
        let mut t = SideTracker::new(5);
        let a = Point3::new(100.0, 0.0, 0.0);
        let b = Point3::new(-100.0, 0.0, 0.0);
        assert_eq!(t.assign(0, [a, b]), (b, a, true));
    }

    #[test]
    fn tracking_survives_input_swaps() {
        let mut t = SideTracker::new(5);
        let mut left = Point3::new(0.0, 0.0, -100.0);
        let mut right = Point3::new(10.0, 0.0, 100.0);
        t.assign(0, [left, right]);
        for f in 1..20 {
            left.x += 15.0;
            right.x += 25.0;
            // Proposal order flips every other frame.
            let feet = if f % 2 == 0 { [left, right] } else { [right, left] };
            let (l, r, reset) = t.assign(f, feet);
            assert_eq!((l, r, reset), (left, right, false), "frame {}", f);
        }
    }

    #[test]
    fn long_gap_resets() {
        let mut t = SideTracker::new(5);
        let a = Point3::new(0.0, 0.0, 0.0);
        let b = Point3::new(50.0, 0.0, 0.0);
        t.assign(0, [b, a]);
        let (_, _, reset) = t.assign(3, [a, b]);
        assert!(!reset);
        let (_, _, reset) = t.assign(20, [a, b]);
        assert!(reset);
    }
}
