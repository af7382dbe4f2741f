//! Vector, line and plane primitives on 3D sensor-space points.
//!
//! Stateless helpers; every function is independent and unit-tested here.

mod line;
mod types;

pub use line::{
    best_fit_line, distance_point_line, project_point_line, project_point_plane,
    project_vector_plane, target_side_value, unit,
};
pub use types::{GeometryError, Point3, Vector3};
