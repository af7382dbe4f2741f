use crate::geometry::{self, Vector3};
use crate::pose::Trajectory;

use super::PassConfig;

/// Horizontal walking direction per assigned frame.
///
/// The displacement spans the farthest assigned frames within
/// `direction_half_window` on each side (the frame itself when a side has
/// none). Frames whose horizontal speed is below `min_speed` get `None`.
pub fn frame_directions(
    trajectory: &Trajectory,
    up: &Vector3,
    config: &PassConfig,
) -> Vec<(usize, Option<Vector3>)> {
    let assigned: Vec<(usize, Vector3)> = trajectory
        .assigned()
        .map(|(f, a)| (f, a.head.coords))
        .collect();
    let w = config.direction_half_window;

    let mut lo = 0usize;
    let mut hi = 0usize;
    let mut out = Vec::with_capacity(assigned.len());
    for (i, &(frame, _)) in assigned.iter().enumerate() {
        while assigned[lo].0 + w < frame {
            lo += 1;
        }
        if hi < i {
            hi = i;
        }
        while hi + 1 < assigned.len() && assigned[hi + 1].0 <= frame + w {
            hi += 1;
        }

        let (f0, p0) = assigned[lo];
        let (f1, p1) = assigned[hi];
        let dir = if f1 > f0 {
            geometry::project_vector_plane(&(p1 - p0), up)
                .ok()
                .filter(|d| d.norm() / (f1 - f0) as f64 >= config.min_speed)
                .and_then(|d| geometry::unit(&d).ok())
        } else {
            None
        };
        out.push((frame, dir));
    }
    out
}
