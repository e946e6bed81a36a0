//! Decomposition of the runtime's 3x4 device-to-absolute transforms.

use nalgebra::{Matrix3x4, Quaternion, Vector3};

use crate::events::Pose;

/// Row-major rigid transform: a 3x3 rotation followed by the translation column.
pub type Transform = Matrix3x4<f64>;

pub fn transform_from_rows(rows: [[f32; 4]; 3]) -> Transform {
    Transform::from_fn(|r, c| rows[r][c] as f64)
}

pub fn position(m: &Transform) -> Vector3<f64> {
    Vector3::new(m[(0, 3)], m[(1, 3)], m[(2, 3)])
}

/// Rotation part of `m` as a unit quaternion.
///
/// Each component's magnitude comes from the diagonal alone; the signs of
/// x, y and z are then taken from the antisymmetric off-diagonal pairs, which
/// leaves `w` non-negative.
pub fn orientation(m: &Transform) -> Quaternion<f64> {
    let (m00, m11, m22) = (m[(0, 0)], m[(1, 1)], m[(2, 2)]);

    let w = f64::max(0.0, 1.0 + m00 + m11 + m22).sqrt() / 2.0;
    let x = f64::max(0.0, 1.0 + m00 - m11 - m22).sqrt() / 2.0;
    let y = f64::max(0.0, 1.0 - m00 + m11 - m22).sqrt() / 2.0;
    let z = f64::max(0.0, 1.0 - m00 - m11 + m22).sqrt() / 2.0;

    let x = copysign_positive_zero(x, m[(2, 1)] - m[(1, 2)]);
    let y = copysign_positive_zero(y, m[(0, 2)] - m[(2, 0)]);
    let z = copysign_positive_zero(z, m[(1, 0)] - m[(0, 1)]);

    Quaternion::new(w, x, y, z)
}

pub fn pose_from_transform(m: &Transform) -> Pose {
    Pose {
        position: position(m),
        orientation: orientation(m),
    }
}

/// `|magnitude|` carrying the sign of `reference`, where a zero reference of
/// either sign counts as positive. NaN references propagate.
pub fn copysign_positive_zero(magnitude: f64, reference: f64) -> f64 {
    if reference.is_nan() {
        f64::NAN
    } else if reference < 0.0 {
        -magnitude.abs()
    } else {
        magnitude.abs()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::{Rotation3, Unit, UnitQuaternion};

    const EPS: f64 = 1e-9;

    fn transform(rotation: Rotation3<f64>, translation: Vector3<f64>) -> Transform {
        let mut m = Transform::zeros();
        m.fixed_view_mut::<3, 3>(0, 0).copy_from(rotation.matrix());
        m.set_column(3, &translation);
        m
    }

    fn norm_sq(q: &Quaternion<f64>) -> f64 {
        q.w * q.w + q.i * q.i + q.j * q.j + q.k * q.k
    }

    /// Same rotation up to the global sign ambiguity.
    fn same_rotation(a: &Quaternion<f64>, b: &Quaternion<f64>, eps: f64) -> bool {
        let close = |s: f64| {
            (a.w - s * b.w).abs() < eps
                && (a.i - s * b.i).abs() < eps
                && (a.j - s * b.j).abs() < eps
                && (a.k - s * b.k).abs() < eps
        };
        close(1.0) || close(-1.0)
    }

    #[test]
    fn test_identity() {
        let m = transform(Rotation3::identity(), Vector3::zeros());
        let pose = pose_from_transform(&m);
        assert_eq!(pose.position, Vector3::zeros());
        assert_eq!(pose.orientation, Quaternion::new(1.0, 0.0, 0.0, 0.0));
    }

    #[test]
    fn test_position_is_translation_column() {
        let m = transform(
            Rotation3::from_euler_angles(0.3, -1.1, 2.0),
            Vector3::new(1.25, -0.5, 3.0),
        );
        assert_eq!(position(&m), Vector3::new(1.25, -0.5, 3.0));
    }

    #[test]
    fn test_half_turn_about_x() {
        let m = transform(
            Rotation3::from_axis_angle(&Vector3::x_axis(), std::f64::consts::PI),
            Vector3::zeros(),
        );
        let q = orientation(&m);
        assert!(same_rotation(&q, &Quaternion::new(0.0, 1.0, 0.0, 0.0), 1e-6), "{q:?}");
        assert!(!q.i.is_nan());
    }

    #[test]
    fn test_zero_reference_is_positive() {
        assert_eq!(copysign_positive_zero(0.5, 0.0), 0.5);
        assert_eq!(copysign_positive_zero(0.5, -0.0), 0.5);
        assert_eq!(copysign_positive_zero(-0.5, 0.0), 0.5);
        assert_eq!(copysign_positive_zero(0.5, -1e-12), -0.5);
        assert!(copysign_positive_zero(0.5, f64::NAN).is_nan());
    }

    #[test]
    fn test_unit_norm_and_matches_rotation() {
        let axes = [
            Vector3::new(1.0, 0.0, 0.0),
            Vector3::new(0.0, 1.0, 0.0),
            Vector3::new(0.0, 0.0, 1.0),
            Vector3::new(1.0, 2.0, -0.5),
            Vector3::new(-0.3, 0.1, 0.9),
        ];
        for axis in axes {
            let axis = Unit::new_normalize(axis);
            // At exactly a half turn the off-diagonal differences vanish and
            // the signs of x, y and z are no longer recoverable.
            for step in 1..24 {
                let angle = -std::f64::consts::PI + step as f64 * std::f64::consts::PI / 12.0;
                let expected = UnitQuaternion::from_axis_angle(&axis, angle);
                let m = transform(expected.to_rotation_matrix(), Vector3::zeros());
                let q = orientation(&m);
                assert!((norm_sq(&q) - 1.0).abs() < 1e-9, "axis {axis:?} angle {angle}");
                assert!(
                    same_rotation(&q, expected.quaternion(), 1e-6),
                    "axis {axis:?} angle {angle}: {q:?} vs {expected:?}"
                );
            }
        }
    }

    #[test]
    fn test_pure_function() {
        let m = transform(
            Rotation3::from_euler_angles(0.7, 0.2, -2.4),
            Vector3::new(0.1, 1.6, -0.4),
        );
        let a = pose_from_transform(&m);
        let b = pose_from_transform(&m);
        assert_eq!(a.position, b.position);
        assert_eq!(a.orientation, b.orientation);
    }

    #[test]
    fn test_rows_conversion() {
        let m = transform_from_rows([
            [1.0, 0.0, 0.0, 0.5],
            [0.0, 1.0, 0.0, 1.5],
            [0.0, 0.0, 1.0, -2.0],
        ]);
        assert_eq!(position(&m), Vector3::new(0.5, 1.5, -2.0));
        assert!((orientation(&m).w - 1.0).abs() < EPS);
    }
}
