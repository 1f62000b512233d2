use nalgebra::{Matrix3, Matrix4, Point3, Unit, Vector3};

/// Weight of the rotation term in the conformational distance metric
/// (Gendron et al. 2001).
const ROTATION_WEIGHT: f64 = 4.0;

/// A rigid homogeneous transformation: a 4x4 matrix whose upper-left 3x3 is
/// a rotation and whose last column is a translation. Stored column-major.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transfo {
    matrix: Matrix4<f64>,
}

impl Default for Transfo {
    fn default() -> Self {
        Transfo::identity()
    }
}

impl Transfo {
    pub fn identity() -> Self {
        Transfo {
            matrix: Matrix4::identity(),
        }
    }

    pub fn from_matrix(matrix: Matrix4<f64>) -> Self {
        Transfo { matrix }
    }

    pub fn matrix(&self) -> &Matrix4<f64> {
        &self.matrix
    }

    pub fn is_identity(&self, eps: f64) -> bool {
        (self.matrix - Matrix4::identity()).abs().max() < eps
    }

    /// Rotation about an arbitrary axis by `theta` radians.
    pub fn rotation(axis: &Vector3<f64>, theta: f64) -> Self {
        let rot = nalgebra::Rotation3::from_axis_angle(&Unit::new_normalize(*axis), theta);
        Transfo {
            matrix: rot.to_homogeneous(),
        }
    }

    pub fn rotation_x(theta: f64) -> Self {
        Transfo::rotation(&Vector3::x(), theta)
    }

    pub fn rotation_y(theta: f64) -> Self {
        Transfo::rotation(&Vector3::y(), theta)
    }

    pub fn rotation_z(theta: f64) -> Self {
        Transfo::rotation(&Vector3::z(), theta)
    }

    pub fn translation(t: Vector3<f64>) -> Self {
        Transfo {
            matrix: Matrix4::new_translation(&t),
        }
    }

    /// Composes `self` with a rotation by the three Euler angles, applied as
    /// Rx, then Ry, then Rz.
    pub fn rotate(&self, theta_x: f64, theta_y: f64, theta_z: f64) -> Self {
        *self
            * Transfo::rotation_x(theta_x)
            * Transfo::rotation_y(theta_y)
            * Transfo::rotation_z(theta_z)
    }

    pub fn translate(&self, t: Vector3<f64>) -> Self {
        *self * Transfo::translation(t)
    }

    /// The rotation part as a 3x3 matrix.
    pub fn rotation_part(&self) -> Matrix3<f64> {
        self.matrix.fixed_view::<3, 3>(0, 0).into_owned()
    }

    /// The translation column.
    pub fn translation_part(&self) -> Vector3<f64> {
        self.matrix.fixed_view::<3, 1>(0, 3).into_owned()
    }

    /// Inverse of a rigid transform: the rotation transposes, the
    /// translation is rotated back and negated.
    pub fn invert(&self) -> Self {
        let rt = self.rotation_part().transpose();
        let t = -(rt * self.translation_part());
        let mut m = rt.to_homogeneous();
        m.fixed_view_mut::<3, 1>(0, 3).copy_from(&t);
        Transfo { matrix: m }
    }

    /// Applies the transform to a point.
    pub fn apply(&self, p: &Point3<f64>) -> Point3<f64> {
        self.matrix.transform_point(p)
    }

    /// The rotation angle of this transform, in radians.
    pub fn rotation_angle(&self) -> f64 {
        let trace = self.rotation_part().trace();
        ((trace - 1.0) / 2.0).clamp(-1.0, 1.0).acos()
    }

    /// Conformational distance between two transforms:
    /// sqrt(|dt|^2 + k * (1 - cos theta)^2) over the relative transform.
    pub fn distance(&self, other: &Transfo) -> f64 {
        let rel = self.invert() * *other;
        let dt = rel.translation_part().norm_squared();
        let rot = 1.0 - rel.rotation_angle().cos();
        (dt + ROTATION_WEIGHT * rot * rot).sqrt()
    }

    /// The frame whose origin is `p1`, whose +X axis points along `p2 - p1`,
    /// and whose +Z axis points along `(p2 - p1) x (p3 - p1)`.
    pub fn align(p1: &Point3<f64>, p2: &Point3<f64>, p3: &Point3<f64>) -> Self {
        let x = (p2 - p1).normalize();
        let z = x.cross(&(p3 - p1)).normalize();
        let y = z.cross(&x);
        let mut m = Matrix4::identity();
        m.fixed_view_mut::<3, 1>(0, 0).copy_from(&x);
        m.fixed_view_mut::<3, 1>(0, 1).copy_from(&y);
        m.fixed_view_mut::<3, 1>(0, 2).copy_from(&z);
        m.fixed_view_mut::<3, 1>(0, 3).copy_from(&p1.coords);
        Transfo { matrix: m }
    }
}

impl std::ops::Mul for Transfo {
    type Output = Transfo;

    fn mul(self, rhs: Transfo) -> Transfo {
        Transfo {
            matrix: self.matrix * rhs.matrix,
        }
    }
}

impl std::ops::Mul<Point3<f64>> for Transfo {
    type Output = Point3<f64>;

    fn mul(self, rhs: Point3<f64>) -> Point3<f64> {
        self.apply(&rhs)
    }
}

/// The angle at `apex` formed by `a` and `c`, in radians.
pub fn angle(a: &Point3<f64>, apex: &Point3<f64>, c: &Point3<f64>) -> f64 {
    let u = a - apex;
    let v = c - apex;
    (u.dot(&v) / (u.norm() * v.norm())).clamp(-1.0, 1.0).acos()
}

/// The signed dihedral around the `b`-`c` axis for the chain `a`-`b`-`c`-`d`,
/// in (-pi, pi].
pub fn torsion_angle(
    a: &Point3<f64>,
    b: &Point3<f64>,
    c: &Point3<f64>,
    d: &Point3<f64>,
) -> f64 {
    let b1 = b - a;
    let b2 = c - b;
    let b3 = d - c;
    let n1 = b1.cross(&b2);
    let n2 = b2.cross(&b3);
    let m = n1.cross(&b2.normalize());
    let x = n1.dot(&n2);
    let y = m.dot(&n2);
    y.atan2(x)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::{FRAC_PI_2, PI};

    const TOLERANCE: f64 = 1e-9;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < TOLERANCE
    }

    #[test]
    fn invert_composes_to_identity() {
        let t = Transfo::rotation(&Vector3::new(1.0, 2.0, -0.5), 1.2)
            .translate(Vector3::new(3.0, -1.0, 2.5));
        assert!((t * t.invert()).is_identity(1e-12));
        assert!((t.invert() * t).is_identity(1e-12));
    }

    #[test]
    fn align_builds_the_documented_frame() {
        let p1 = Point3::new(1.0, 2.0, 3.0);
        let p2 = Point3::new(2.0, 2.0, 3.0);
        let p3 = Point3::new(1.0, 3.0, 3.0);
        let t = Transfo::align(&p1, &p2, &p3);

        // Origin is p1, local X maps onto p2 - p1, local Z onto the normal.
        assert!((t.apply(&Point3::origin()) - p1).norm() < TOLERANCE);
        assert!((t.apply(&Point3::new(1.0, 0.0, 0.0)) - Point3::new(2.0, 2.0, 3.0)).norm() < TOLERANCE);
        assert!((t.apply(&Point3::new(0.0, 0.0, 1.0)) - Point3::new(1.0, 2.0, 4.0)).norm() < TOLERANCE);
    }

    #[test]
    fn rotation_angle_recovers_theta() {
        let t = Transfo::rotation(&Vector3::new(0.0, 1.0, 0.0), 0.7);
        assert!(approx(t.rotation_angle(), 0.7));
    }

    #[test]
    fn distance_is_zero_on_equal_transforms_and_symmetric() {
        let a = Transfo::rotation_y(0.3).translate(Vector3::new(1.0, 0.0, 0.0));
        let b = Transfo::rotation_z(1.1).translate(Vector3::new(0.0, 2.0, 0.0));
        assert!(approx(a.distance(&a), 0.0));
        assert!(approx(a.distance(&b), b.distance(&a)));
    }

    #[test]
    fn torsion_angle_signs() {
        let a = Point3::new(1.0, 1.0, 0.0);
        let b = Point3::new(1.0, 0.0, 0.0);
        let c = Point3::new(-1.0, 0.0, 0.0);

        let d_cis = Point3::new(-1.0, 1.0, 0.0);
        assert!(approx(torsion_angle(&a, &b, &c, &d_cis), 0.0));

        let d_trans = Point3::new(-1.0, -1.0, 0.0);
        assert!(approx(torsion_angle(&a, &b, &c, &d_trans).abs(), PI));

        let d_quarter = Point3::new(-1.0, 0.0, 1.0);
        assert!(approx(torsion_angle(&a, &b, &c, &d_quarter).abs(), FRAC_PI_2));
    }

    #[test]
    fn angle_at_apex() {
        let apex = Point3::origin();
        let a = Point3::new(1.0, 0.0, 0.0);
        let c = Point3::new(0.0, 1.0, 0.0);
        assert!(approx(angle(&a, &apex, &c), FRAC_PI_2));
    }
}
