//! Vector type alias for cell velocities.

use nalgebra::Vector3;

/// 3D vector type for velocities and directions.
///
/// This is a simple alias for `nalgebra::Vector3<f32>`, used for wind source
/// velocities and per-cell velocity queries. Field storage itself stays
/// struct-of-arrays; vectors are only assembled at the API boundary.
pub type Vec3 = Vector3<f32>;
