use nalgebra::DMatrix;

use super::types::{GeometryError, Point3, Vector3};

const NORM_EPS: f64 = 1e-12;

/// Unit vector along `v`.
pub fn unit(v: &Vector3) -> Result<Vector3, GeometryError> {
    let n = v.norm();
    if !n.is_finite() || n < NORM_EPS {
        return Err(GeometryError::ZeroNorm);
    }
    Ok(v / n)
}

/// Orthogonal projection of `p` onto the infinite line through `a` and `b`.
pub fn project_point_line(p: &Point3, a: &Point3, b: &Point3) -> Result<Point3, GeometryError> {
    let ab = b - a;
    let denom = ab.norm_squared();
    if denom < NORM_EPS {
        return Err(GeometryError::DegenerateLine);
    }
    let t = (p - a).dot(&ab) / denom;
    Ok(a + ab * t)
}

/// Distance from `p` to the infinite line through `a` and `b`.
pub fn distance_point_line(p: &Point3, a: &Point3, b: &Point3) -> Result<f64, GeometryError> {
    let proj = project_point_line(p, a, b)?;
    Ok((p - proj).norm())
}

/// Projection of `p` onto the plane through `plane_point` with normal `normal`.
pub fn project_point_plane(
    p: &Point3,
    plane_point: &Point3,
    normal: &Vector3,
) -> Result<Point3, GeometryError> {
    let n = unit(normal)?;
    Ok(p - n * (p - plane_point).dot(&n))
}

/// Component of `v` orthogonal to `normal`.
pub fn project_vector_plane(v: &Vector3, normal: &Vector3) -> Result<Vector3, GeometryError> {
    let n = unit(normal)?;
    Ok(v - n * v.dot(&n))
}

/// Signed lateral offset of `target` relative to a heading.
///
/// The lateral axis is `forward × up`. Positive values are to the right of
/// the heading, negative to the left. Magnitudes of `forward` and `up` do not
/// matter.
pub fn target_side_value(
    forward: &Vector3,
    up: &Vector3,
    target: &Vector3,
) -> Result<f64, GeometryError> {
    let lateral = unit(&forward.cross(up))?;
    Ok(lateral.dot(target))
}

/// Line of best fit through `points` (total least squares).
///
/// Returns the centroid and a unit direction. The direction is the principal
/// right-singular vector of the centered points, oriented from the first
/// point towards the last one.
pub fn best_fit_line(points: &[Point3]) -> Result<(Point3, Vector3), GeometryError> {
    let n = points.len();
    if n < 2 {
        return Err(GeometryError::TooFewPoints { needed: 2, got: n });
    }

    let centroid = points
        .iter()
        .fold(Vector3::zeros(), |acc, p| acc + p.coords)
        / n as f64;

    let centered = DMatrix::from_fn(n, 3, |r, c| points[r][c] - centroid[c]);
    let svd = centered.svd(false, true);
    let v_t = svd.v_t.ok_or(GeometryError::DegenerateLine)?;
    let (imax, smax) = svd.singular_values.argmax();
    if smax < NORM_EPS {
        return Err(GeometryError::DegenerateLine);
    }

    let mut direction = unit(&Vector3::new(
        v_t[(imax, 0)],
        v_t[(imax, 1)],
        v_t[(imax, 2)],
    ))?;
    if direction.dot(&(points[n - 1] - points[0])) < 0.0 {
        direction = -direction;
    }

    Ok((Point3::from(centroid), direction))
}
