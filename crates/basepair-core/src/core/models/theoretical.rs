//! Idealized residue coordinates.
//!
//! The base tables place each nucleobase in its canonical local frame
//! (glycosidic nitrogen near the origin); `set_theoretical` then finalizes,
//! re-expresses the residue in the identity referential, and derives
//! hydrogens and lone pairs. `set_full_theoretical` extends a base to a
//! complete C3'-endo / anti nucleotide.

use super::atom::Atom;
use super::res_id::ResId;
use super::residue::{Residue, ResidueError};
use crate::core::geometry::{angle, Transfo};
use crate::core::types::{AtomType, PropertyType, ResidueType};

impl Residue {
    /// Replaces this residue's content with idealized coordinates for its
    /// type: the nucleobase heavy atoms (plus hydrogens and lone pairs), a
    /// standalone phosphate, or a standalone ribose.
    pub fn set_theoretical(&mut self) -> Result<(), ResidueError> {
        self.clear();

        let atoms: &[(f64, f64, f64, AtomType)] = if self.res_type().is_a() {
            &[
                (0.213, 0.660, 1.287, AtomType::N9),
                (0.250, 2.016, 1.509, AtomType::C4),
                (0.016, 2.995, 0.619, AtomType::N3),
                (0.142, 4.189, 1.194, AtomType::C2),
                (0.451, 4.493, 2.459, AtomType::N1),
                (0.681, 3.485, 3.329, AtomType::C6),
                (0.990, 3.787, 4.592, AtomType::N6),
                (0.579, 2.170, 2.844, AtomType::C5),
                (0.747, 0.934, 3.454, AtomType::N7),
                (0.520, 0.074, 2.491, AtomType::C8),
            ]
        } else if self.res_type().is_c() {
            &[
                (0.212, 0.668, 1.294, AtomType::N1),
                (0.193, -0.043, 2.462, AtomType::C6),
                (0.374, 2.055, 1.315, AtomType::C2),
                (0.388, 2.673, 0.240, AtomType::O2),
                (0.511, 2.687, 2.504, AtomType::N3),
                (0.491, 1.984, 3.638, AtomType::C4),
                (0.631, 2.649, 4.788, AtomType::N4),
                (0.328, 0.569, 3.645, AtomType::C5),
            ]
        } else if self.res_type().is_g() {
            &[
                (0.214, 0.659, 1.283, AtomType::N9),
                (0.254, 2.014, 1.509, AtomType::C4),
                (0.034, 2.979, 0.591, AtomType::N3),
                (0.142, 4.190, 1.110, AtomType::C2),
                (-0.047, 5.269, 0.336, AtomType::N2),
                (0.444, 4.437, 2.427, AtomType::N1),
                (0.676, 3.459, 3.389, AtomType::C6),
                (0.941, 3.789, 4.552, AtomType::O6),
                (0.562, 2.154, 2.846, AtomType::C5),
                (0.712, 0.912, 3.448, AtomType::N7),
                (0.498, 0.057, 2.485, AtomType::C8),
            ]
        } else if self.res_type().is_u() {
            &[
                (0.212, 0.676, 1.281, AtomType::N1),
                (0.195, -0.023, 2.466, AtomType::C6),
                (0.370, 2.048, 1.265, AtomType::C2),
                (0.390, 2.698, 0.235, AtomType::O2),
                (0.505, 2.629, 2.502, AtomType::N3),
                (0.497, 1.990, 3.725, AtomType::C4),
                (0.629, 2.653, 4.755, AtomType::O4),
                (0.329, 0.571, 3.657, AtomType::C5),
            ]
        } else if self.res_type().is_t() {
            &[
                (0.214, 0.668, 1.296, AtomType::N1),
                (0.171, -0.052, 2.470, AtomType::C6),
                (0.374, 2.035, 1.303, AtomType::C2),
                (0.416, 2.705, 0.284, AtomType::O2),
                (0.483, 2.592, 2.553, AtomType::N3),
                (0.449, 1.933, 3.767, AtomType::C4),
                (0.560, 2.568, 4.812, AtomType::O4),
                (0.279, 0.500, 3.685, AtomType::C5),
                (0.231, -0.299, 4.949, AtomType::C5M),
            ]
        } else if self.res_type().is_phosphate() {
            &[
                (4.691, 0.327, -2.444, AtomType::P),
                (5.034, 1.678, -1.932, AtomType::O1P),
                (4.718, 0.068, -3.906, AtomType::O2P),
                (3.246, -0.057, -1.895, AtomType::O5Prime),
                (5.662, -0.712, -1.734, AtomType::O3Prime),
            ]
        } else if self.res_type().is_ribose() {
            &[
                (0.000, 0.000, 0.000, AtomType::C1Prime),
                (-0.694, -0.627, -1.210, AtomType::C2Prime),
                (0.499, -1.031, -2.067, AtomType::C3Prime),
                (1.509, -1.478, -1.022, AtomType::C4Prime),
                (2.957, -1.393, -1.443, AtomType::C5Prime),
                (1.286, -0.587, 0.103, AtomType::O4Prime),
            ]
        } else {
            return Err(ResidueError::UnsupportedType {
                residue: self.id(),
                res_type: self.res_type(),
            });
        };

        for &(x, y, z, t) in atoms {
            self.insert(Atom::from_coords(x, y, z, t));
        }
        if self.res_type().is_ribose() && self.res_type().is_rna() {
            self.insert(Atom::from_coords(-1.474, -1.731, -0.795, AtomType::O2Prime));
        }

        self.finalize();
        self.set_referential(&Transfo::identity());
        self.add_hydrogens();
        self.add_lone_pairs();
        Ok(())
    }

    /// Builds a complete theoretical nucleotide: the idealized base, a
    /// C3'-endo / anti ribose with both branches, and the 5' phosphate
    /// oxygens.
    pub fn set_full_theoretical(&mut self) -> Result<(), ResidueError> {
        if !self.res_type().is_nucleic_acid() {
            return Err(ResidueError::UnsupportedType {
                residue: self.id(),
                res_type: self.res_type(),
            });
        }
        self.set_theoretical()?;
        self.build_ribose_by_class(PropertyType::C3pEndo, PropertyType::Anti, true, true)
            .expect("theoretical nucleotide accepts a ribose");

        let po4 = Residue::create_phosphate_5p(self)?;
        self.insert(*po4.safe_find(AtomType::O1P)?);
        self.insert(*po4.safe_find(AtomType::O2P)?);
        Ok(())
    }

    /// Creates the standalone phosphate residue attached 5' of `reference`,
    /// posed so its P and O5' coincide with the reference's.
    pub fn create_phosphate_5p(reference: &Residue) -> Result<Residue, ResidueError> {
        let rib_phos = reference.pos(AtomType::P)?;
        let rib_oxy = reference.pos(AtomType::O5Prime)?;

        let mut po4 = Residue::new(ResidueType::Phosphate, ResId::new('p', 0));
        po4.set_theoretical()?;
        po4.set_referential(&Transfo::identity());

        let phos = po4.pos(AtomType::P)?;
        po4.transform(&Transfo::translation(rib_phos - phos));

        let oxy = po4.pos(AtomType::O5Prime)?;
        let u = oxy - rib_phos;
        let v = rib_oxy - rib_phos;
        let theta = angle(&oxy, &rib_phos, &rib_oxy);

        let pose = Transfo::translation(rib_phos.coords)
            * Transfo::rotation(&u.cross(&v).normalize(), theta)
            * Transfo::translation(-rib_phos.coords);
        po4.transform(&pose);
        Ok(po4)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::res_id::ResId;
    use std::f64::consts::PI;

    #[test]
    fn theoretical_base_sits_in_the_identity_referential() {
        let mut res = Residue::new(ResidueType::RG, ResId::new('A', 1));
        res.set_theoretical().unwrap();
        assert!(res.referential().is_identity(1e-6));
    }

    #[test]
    fn full_theoretical_has_backbone_and_phosphate() {
        let mut res = Residue::new(ResidueType::RA, ResId::new('A', 1));
        res.set_full_theoretical().unwrap();
        for t in [
            AtomType::C1Prime,
            AtomType::C5Prime,
            AtomType::O3Prime,
            AtomType::O5Prime,
            AtomType::O2Prime,
            AtomType::P,
            AtomType::O1P,
            AtomType::O2P,
        ] {
            assert!(res.contains(t), "missing {t}");
        }
    }

    #[test]
    fn full_theoretical_is_c3p_endo_anti(){
        let mut res = Residue::new(ResidueType::RG, ResId::new('A', 1));
        res.set_full_theoretical().unwrap();
        assert_eq!(res.pucker(), PropertyType::C3pEndo);
        assert_eq!(res.glycosyl(), PropertyType::Anti);

        // C3'-endo / anti midpoints: rho around 18 degrees, chi around pi.
        let rho = res.rho().unwrap();
        let chi = res.chi().unwrap().rem_euclid(2.0 * PI);
        assert!(rho < PI / 5.0, "rho = {rho}");
        assert!((chi - PI).abs() < PI / 2.0, "chi = {chi}");
    }

    #[test]
    fn phosphate_5p_is_posed_on_the_reference() {
        let mut res = Residue::new(ResidueType::RA, ResId::new('A', 1));
        res.set_full_theoretical().unwrap();
        let po4 = Residue::create_phosphate_5p(&res).unwrap();

        let p_ref = res.pos(AtomType::P).unwrap();
        let p_po4 = po4.pos(AtomType::P).unwrap();
        assert!((p_ref - p_po4).norm() < 1e-6);

        // O5' of the phosphate lies along the reference's P-O5' direction.
        let o5_ref = res.pos(AtomType::O5Prime).unwrap();
        let o5_po4 = po4.pos(AtomType::O5Prime).unwrap();
        let u = (o5_po4 - p_po4).normalize();
        let v = (o5_ref - p_ref).normalize();
        assert!(u.dot(&v) > 0.999);
    }

    #[test]
    fn unsupported_type_is_reported() {
        let mut res = Residue::new(ResidueType::Water, ResId::new('W', 1));
        assert!(matches!(
            res.set_theoretical(),
            Err(ResidueError::UnsupportedType { .. })
        ));
    }
}
