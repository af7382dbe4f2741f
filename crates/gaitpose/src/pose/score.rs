use crate::geometry::Point3;

/// Symmetric deviation of a measured distance from its expected value.
///
/// `max(d/e, e/d)`, so `1.0` is a perfect match. `None` when either input is
/// non-positive or non-finite.
pub fn length_ratio(measured: f64, expected: f64) -> Option<f64> {
    if !(measured.is_finite() && expected.is_finite()) || measured <= 0.0 || expected <= 0.0 {
        return None;
    }
    Some((measured / expected).max(expected / measured))
}

/// Cost (`ratio - 1`) of the link `u → v`, or `None` when `v` lies outside
/// the shell `[expected / max_ratio, expected * max_ratio]` around `u`.
pub(crate) fn inside_spheres(
    u: &Point3,
    v: &Point3,
    expected: f64,
    max_ratio: f64,
) -> Option<f64> {
    let ratio = length_ratio((u - v).norm(), expected)?;
    (ratio <= max_ratio).then_some(ratio - 1.0)
}
