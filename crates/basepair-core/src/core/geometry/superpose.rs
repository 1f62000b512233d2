use super::transfo::Transfo;
use nalgebra::{Matrix3, Matrix4, Point3, Vector3};

/// Least-squares rigid superposition of paired point sets.
///
/// Returns the transform that moves each `mobile` point as close as possible
/// to its paired `target` point (Kabsch, via SVD), guarding against
/// reflections. Requires at least three non-degenerate pairs; fewer pairs
/// yield the identity.
pub fn superposition(pairs: &[(Point3<f64>, Point3<f64>)]) -> Transfo {
    if pairs.len() < 3 {
        return Transfo::identity();
    }

    let n = pairs.len() as f64;
    let mob_centroid: Vector3<f64> = pairs.iter().map(|(m, _)| m.coords).sum::<Vector3<f64>>() / n;
    let tgt_centroid: Vector3<f64> = pairs.iter().map(|(_, t)| t.coords).sum::<Vector3<f64>>() / n;

    let mut covariance = Matrix3::<f64>::zeros();
    for (m, t) in pairs {
        covariance += (t.coords - tgt_centroid) * (m.coords - mob_centroid).transpose();
    }

    let svd = covariance.svd(true, true);
    let (u, v_t) = match (svd.u, svd.v_t) {
        (Some(u), Some(v_t)) => (u, v_t),
        _ => return Transfo::identity(),
    };

    let mut d = Matrix3::identity();
    if (u * v_t).determinant() < 0.0 {
        d[(2, 2)] = -1.0;
    }
    let rotation = u * d * v_t;
    let translation = tgt_centroid - rotation * mob_centroid;

    let mut m = Matrix4::identity();
    m.fixed_view_mut::<3, 3>(0, 0).copy_from(&rotation);
    m.fixed_view_mut::<3, 1>(0, 3).copy_from(&translation);
    Transfo::from_matrix(m)
}

/// Root-mean-square deviation between paired points after applying `tfo` to
/// the mobile member of each pair.
pub fn rmsd(pairs: &[(Point3<f64>, Point3<f64>)], tfo: &Transfo) -> f64 {
    if pairs.is_empty() {
        return 0.0;
    }
    let sum: f64 = pairs
        .iter()
        .map(|(m, t)| (tfo.apply(m) - t).norm_squared())
        .sum();
    (sum / pairs.len() as f64).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recovers_a_known_rigid_motion() {
        let motion = Transfo::rotation(&Vector3::new(0.3, 1.0, -0.2), 0.9)
            .translate(Vector3::new(5.0, -2.0, 1.0));
        let points = [
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.5, 0.0, 0.0),
            Point3::new(0.0, 2.0, 0.0),
            Point3::new(0.3, 0.1, 1.7),
        ];
        let pairs: Vec<_> = points.iter().map(|p| (*p, motion.apply(p))).collect();

        let recovered = superposition(&pairs);
        assert!(rmsd(&pairs, &recovered) < 1e-9);
    }

    #[test]
    fn degenerate_input_yields_identity() {
        let pairs = [(Point3::origin(), Point3::new(1.0, 0.0, 0.0))];
        assert!(superposition(&pairs).is_identity(1e-12));
    }
}
