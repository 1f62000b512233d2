//! Hydrogen and lone-pair placement at fixed geometries (AMBER all_nuc94
//! bond lengths, idealized angles). Missing heavy anchors skip the affected
//! group with a warning; they never fail the operation.

use super::atom::Atom;
use super::residue::{Residue, ResidueError};
use crate::core::types::AtomType;
use nalgebra::{Point3, Vector3};
use tracing::warn;

pub(crate) const C_H_DIST_CYC: f64 = 1.08; // aromatic C-H
pub(crate) const C_H_DIST: f64 = 1.09; // sp3 C-H
pub(crate) const N_H_DIST: f64 = 1.01;
pub(crate) const O_H_DIST: f64 = 0.96;
pub(crate) const O_LP_DIST: f64 = 1.00;
pub(crate) const N_LP_DIST: f64 = 1.00;

const TAN19: f64 = 0.354; // O2' hydroxyl
const TAN54: f64 = 1.376;
const TAN60: f64 = 1.7320508; // NH2-like conformations
const TAN70: f64 = 2.7474774; // CH3-like conformations
const TAN30: f64 = 0.57735027;

/// Direction of a substituent on a planar ring atom: the bisector of the
/// two in-ring bond directions, pointing away from the ring.
fn ring_substituent(apex: &Point3<f64>, r1: &Point3<f64>, r2: &Point3<f64>) -> Vector3<f64> {
    let x = (apex - r1).normalize();
    let y = (apex - r2).normalize();
    (x + y).normalize()
}

/// Directions of the two substituents of an sp2 exocyclic group (amine
/// hydrogens or carbonyl lone pairs), in the base plane defined by the two
/// ring bonds of `ring_apex`. Returned as (direction toward the ring's
/// "up-cross" side, direction toward the other side).
fn exocyclic_pair(
    ring_apex: &Point3<f64>,
    r1: &Point3<f64>,
    r2: &Point3<f64>,
    tip: &Point3<f64>,
) -> (Vector3<f64>, Vector3<f64>) {
    let x = (ring_apex - r1).normalize();
    let y = (ring_apex - r2).normalize();
    let z = (tip - ring_apex).normalize();
    let up = x.cross(&y).normalize();
    let a = (z + up.cross(&z).normalize() * TAN60).normalize();
    let b = (z + z.cross(&up).normalize() * TAN60).normalize();
    (a, b)
}

impl Residue {
    /// Runs a placement group, demoting a missing heavy anchor to a logged
    /// warning.
    fn place<F>(&mut self, group: &str, build: F)
    where
        F: FnOnce(&Residue) -> Result<Vec<Atom>, ResidueError>,
    {
        match build(self) {
            Ok(atoms) => {
                for atom in atoms {
                    self.insert(atom);
                }
            }
            Err(err) => {
                warn!(residue = %self.id(), %err, "failed to place {group}");
            }
        }
    }

    /// Adds base and ribose hydrogens at idealized positions.
    pub fn add_hydrogens(&mut self) {
        if self.res_type().is_a() {
            self.place("H2", |r| {
                let c2 = r.pos(AtomType::C2)?;
                let z = ring_substituent(&c2, &r.pos(AtomType::N1)?, &r.pos(AtomType::N3)?);
                Ok(vec![Atom::new(c2 + z * C_H_DIST_CYC, AtomType::H2)])
            });
            self.place("H8", |r| {
                let c8 = r.pos(AtomType::C8)?;
                let z = ring_substituent(&c8, &r.pos(AtomType::N7)?, &r.pos(AtomType::N9)?);
                Ok(vec![Atom::new(c8 + z * C_H_DIST_CYC, AtomType::H8)])
            });
            self.place("H61/H62", |r| {
                let c6 = r.pos(AtomType::C6)?;
                let n6 = r.pos(AtomType::N6)?;
                let (a, b) = exocyclic_pair(
                    &c6,
                    &r.pos(AtomType::N1)?,
                    &r.pos(AtomType::C5)?,
                    &n6,
                );
                Ok(vec![
                    Atom::new(n6 + a * N_H_DIST, AtomType::H61),
                    Atom::new(n6 + b * N_H_DIST, AtomType::H62),
                ])
            });
        } else if self.res_type().is_g() {
            self.place("H1", |r| {
                let n1 = r.pos(AtomType::N1)?;
                let z = ring_substituent(&n1, &r.pos(AtomType::C2)?, &r.pos(AtomType::C6)?);
                Ok(vec![Atom::new(n1 + z * N_H_DIST, AtomType::H1)])
            });
            self.place("H8", |r| {
                let c8 = r.pos(AtomType::C8)?;
                let z = ring_substituent(&c8, &r.pos(AtomType::N7)?, &r.pos(AtomType::N9)?);
                Ok(vec![Atom::new(c8 + z * C_H_DIST_CYC, AtomType::H8)])
            });
            self.place("H21/H22", |r| {
                let c2 = r.pos(AtomType::C2)?;
                let n2 = r.pos(AtomType::N2)?;
                let (a, b) = exocyclic_pair(
                    &c2,
                    &r.pos(AtomType::N1)?,
                    &r.pos(AtomType::N3)?,
                    &n2,
                );
                Ok(vec![
                    Atom::new(n2 + b * N_H_DIST, AtomType::H21),
                    Atom::new(n2 + a * N_H_DIST, AtomType::H22),
                ])
            });
        } else if self.res_type().is_c() {
            self.place("H5", |r| {
                let c5 = r.pos(AtomType::C5)?;
                let z = ring_substituent(&c5, &r.pos(AtomType::C4)?, &r.pos(AtomType::C6)?);
                Ok(vec![Atom::new(c5 + z * C_H_DIST, AtomType::H5)])
            });
            self.place("H6", |r| {
                let c6 = r.pos(AtomType::C6)?;
                let z = ring_substituent(&c6, &r.pos(AtomType::C5)?, &r.pos(AtomType::N1)?);
                Ok(vec![Atom::new(c6 + z * C_H_DIST_CYC, AtomType::H6)])
            });
            self.place("H41/H42", |r| {
                let c4 = r.pos(AtomType::C4)?;
                let n4 = r.pos(AtomType::N4)?;
                let (a, b) = exocyclic_pair(
                    &c4,
                    &r.pos(AtomType::N3)?,
                    &r.pos(AtomType::C5)?,
                    &n4,
                );
                Ok(vec![
                    Atom::new(n4 + b * N_H_DIST, AtomType::H41),
                    Atom::new(n4 + a * N_H_DIST, AtomType::H42),
                ])
            });
        } else if self.res_type().is_u() {
            self.place("H3", |r| {
                let n3 = r.pos(AtomType::N3)?;
                let z = ring_substituent(&n3, &r.pos(AtomType::C2)?, &r.pos(AtomType::C4)?);
                Ok(vec![Atom::new(n3 + z * C_H_DIST, AtomType::H3)])
            });
            self.place("H5", |r| {
                let c5 = r.pos(AtomType::C5)?;
                let z = ring_substituent(&c5, &r.pos(AtomType::C4)?, &r.pos(AtomType::C6)?);
                Ok(vec![Atom::new(c5 + z * C_H_DIST, AtomType::H5)])
            });
            self.place("H6", |r| {
                let c6 = r.pos(AtomType::C6)?;
                let z = ring_substituent(&c6, &r.pos(AtomType::C5)?, &r.pos(AtomType::N1)?);
                Ok(vec![Atom::new(c6 + z * C_H_DIST_CYC, AtomType::H6)])
            });
        } else if self.res_type().is_t() {
            self.place("H3", |r| {
                let n3 = r.pos(AtomType::N3)?;
                let z = ring_substituent(&n3, &r.pos(AtomType::C2)?, &r.pos(AtomType::C4)?);
                Ok(vec![Atom::new(n3 + z * C_H_DIST, AtomType::H3)])
            });
            self.place("H6", |r| {
                let c6 = r.pos(AtomType::C6)?;
                let z = ring_substituent(&c6, &r.pos(AtomType::C5)?, &r.pos(AtomType::N1)?);
                Ok(vec![Atom::new(c6 + z * C_H_DIST_CYC, AtomType::H6)])
            });
            self.place("methyl hydrogens", |r| {
                let c5m = r.pos(AtomType::C5M)?;
                let x = (c5m - r.pos(AtomType::C5)?).normalize();
                let y = (r.pos(AtomType::C5)? - r.pos(AtomType::C4)?).normalize();
                let up = x.cross(&y).normalize();
                let z = x.cross(&up);

                let h1 = c5m + (x + z * TAN70).normalize() * C_H_DIST;
                let a = (up - z * TAN30).normalize();
                let h2 = c5m + (x + a * TAN70).normalize() * C_H_DIST;
                let b = (-up - z * TAN30).normalize();
                let h3 = c5m + (x + b * TAN70).normalize() * C_H_DIST;
                Ok(vec![
                    Atom::new(h1, AtomType::H5M1),
                    Atom::new(h2, AtomType::H5M2),
                    Atom::new(h3, AtomType::H5M3),
                ])
            });
        }

        self.add_ribose_hydrogens();
    }

    /// Adds the sugar hydrogens shared between full residues and rebuilt
    /// riboses. Skips any hydrogen already present; a residue without a
    /// sugar has nothing to do.
    pub(crate) fn add_ribose_hydrogens(&mut self) {
        if !self.contains(AtomType::C1Prime) {
            return;
        }
        if !self.contains(AtomType::H1Prime) {
            self.place("H1'", |r| {
                let c1p = r.pos(AtomType::C1Prime)?;
                let n = if r.res_type().is_purine() {
                    r.pos(AtomType::N9)?
                } else {
                    r.pos(AtomType::N1)?
                };
                let x = (c1p - r.pos(AtomType::C2Prime)?).normalize();
                let y = (c1p - n).normalize();
                let z = (c1p - r.pos(AtomType::O4Prime)?).normalize();
                Ok(vec![Atom::new(
                    c1p + (x + y + z).normalize() * C_H_DIST,
                    AtomType::H1Prime,
                )])
            });
        }
        if !self.contains(AtomType::H3Prime) {
            self.place("H3'", |r| {
                let c3p = r.pos(AtomType::C3Prime)?;
                let x = (c3p - r.pos(AtomType::C2Prime)?).normalize();
                let y = (c3p - r.pos(AtomType::O3Prime)?).normalize();
                let z = (c3p - r.pos(AtomType::C4Prime)?).normalize();
                Ok(vec![Atom::new(
                    c3p + (x + y + z).normalize() * C_H_DIST,
                    AtomType::H3Prime,
                )])
            });
        }
        if !self.contains(AtomType::H4Prime) {
            self.place("H4'", |r| {
                let c4p = r.pos(AtomType::C4Prime)?;
                let x = (c4p - r.pos(AtomType::C3Prime)?).normalize();
                let y = (c4p - r.pos(AtomType::O4Prime)?).normalize();
                let z = (c4p - r.pos(AtomType::C5Prime)?).normalize();
                Ok(vec![Atom::new(
                    c4p + (x + y + z).normalize() * C_H_DIST,
                    AtomType::H4Prime,
                )])
            });
        }
        if !self.contains(AtomType::H5Prime1) || !self.contains(AtomType::H5Prime2) {
            self.place("H5'/H5''", |r| {
                let c5p = r.pos(AtomType::C5Prime)?;
                let x = (c5p - r.pos(AtomType::C4Prime)?).normalize();
                let y = (c5p - r.pos(AtomType::O5Prime)?).normalize();
                let z = (x + y).normalize();
                let up = x.cross(&y).normalize();
                Ok(vec![
                    Atom::new(
                        c5p + (up * TAN54 + z).normalize() * C_H_DIST,
                        AtomType::H5Prime1,
                    ),
                    Atom::new(
                        c5p + (-up * TAN54 + z).normalize() * C_H_DIST,
                        AtomType::H5Prime2,
                    ),
                ])
            });
        }

        // O2' present -> RNA ribose: H2' and HO2'. Absent -> DNA: H2'1, H2'2.
        if !self.contains(AtomType::O2Prime) {
            if !self.contains(AtomType::H2Prime1) || !self.contains(AtomType::H2Prime2) {
                self.place("H2'1/H2'2", |r| {
                    let c2p = r.pos(AtomType::C2Prime)?;
                    let x = (c2p - r.pos(AtomType::C1Prime)?).normalize();
                    let y = (c2p - r.pos(AtomType::C3Prime)?).normalize();
                    let z = (x + y).normalize();
                    let up = x.cross(&y).normalize();
                    Ok(vec![
                        Atom::new(
                            c2p + (up * TAN54 + z).normalize() * C_H_DIST,
                            AtomType::H2Prime1,
                        ),
                        Atom::new(
                            c2p + (-up * TAN54 + z).normalize() * C_H_DIST,
                            AtomType::H2Prime2,
                        ),
                    ])
                });
            }
        } else {
            if !self.contains(AtomType::H2Prime) {
                self.place("H2'", |r| {
                    let c2p = r.pos(AtomType::C2Prime)?;
                    let x = (c2p - r.pos(AtomType::C1Prime)?).normalize();
                    let y = (c2p - r.pos(AtomType::C3Prime)?).normalize();
                    let z = (c2p - r.pos(AtomType::O2Prime)?).normalize();
                    Ok(vec![Atom::new(
                        c2p + (x + y + z).normalize() * C_H_DIST,
                        AtomType::H2Prime,
                    )])
                });
            }
            if !self.contains(AtomType::HO2Prime) {
                self.place("HO2'", |r| {
                    let o2p = r.pos(AtomType::O2Prime)?;
                    let x = (r.pos(AtomType::C2Prime)? - r.pos(AtomType::C1Prime)?).normalize();
                    let y = (o2p - r.pos(AtomType::C2Prime)?).normalize();
                    let z = x.cross(&y).cross(&y).normalize();
                    Ok(vec![Atom::new(
                        o2p + (y * TAN19 - z).normalize() * O_H_DIST,
                        AtomType::HO2Prime,
                    )])
                });
            }
        }
    }

    /// Adds the terminal 3' hydroxyl hydrogen for chain-ending residues.
    pub fn add_ho3p(&mut self) {
        if !self.contains(AtomType::HO3Prime) {
            self.place("HO3'", |r| {
                let o3p = r.pos(AtomType::O3Prime)?;
                let x = (r.pos(AtomType::C3Prime)? - r.pos(AtomType::C4Prime)?).normalize();
                let y = (o3p - r.pos(AtomType::C3Prime)?).normalize();
                let z = x.cross(&y).cross(&y).normalize();
                Ok(vec![Atom::new(
                    o3p + (y * TAN19 + z).normalize() * O_H_DIST,
                    AtomType::HO3Prime,
                )])
            });
        }
    }

    /// Adds base lone pairs at idealized positions.
    pub fn add_lone_pairs(&mut self) {
        if self.res_type().is_a() {
            self.place("LP1", |r| {
                let n1 = r.pos(AtomType::N1)?;
                let z = ring_substituent(&n1, &r.pos(AtomType::C2)?, &r.pos(AtomType::C6)?);
                Ok(vec![Atom::new(n1 + z * N_LP_DIST, AtomType::LP1)])
            });
            self.place("LP3", |r| {
                let n3 = r.pos(AtomType::N3)?;
                let z = ring_substituent(&n3, &r.pos(AtomType::C2)?, &r.pos(AtomType::C4)?);
                Ok(vec![Atom::new(n3 + z * N_LP_DIST, AtomType::LP3)])
            });
            self.place("LP7", |r| {
                let n7 = r.pos(AtomType::N7)?;
                let z = ring_substituent(&n7, &r.pos(AtomType::C5)?, &r.pos(AtomType::C8)?);
                Ok(vec![Atom::new(n7 + z * N_LP_DIST, AtomType::LP7)])
            });
        } else if self.res_type().is_g() {
            self.place("LP3", |r| {
                let n3 = r.pos(AtomType::N3)?;
                let z = ring_substituent(&n3, &r.pos(AtomType::C2)?, &r.pos(AtomType::C4)?);
                Ok(vec![Atom::new(n3 + z * N_LP_DIST, AtomType::LP3)])
            });
            self.place("LP7", |r| {
                let n7 = r.pos(AtomType::N7)?;
                let z = ring_substituent(&n7, &r.pos(AtomType::C5)?, &r.pos(AtomType::C8)?);
                Ok(vec![Atom::new(n7 + z * N_LP_DIST, AtomType::LP7)])
            });
            self.place("LP61/LP62", |r| {
                let c6 = r.pos(AtomType::C6)?;
                let o6 = r.pos(AtomType::O6)?;
                let (a, b) = exocyclic_pair(
                    &c6,
                    &r.pos(AtomType::N1)?,
                    &r.pos(AtomType::C5)?,
                    &o6,
                );
                Ok(vec![
                    Atom::new(o6 + b * O_LP_DIST, AtomType::LP61),
                    Atom::new(o6 + a * O_LP_DIST, AtomType::LP62),
                ])
            });
        } else if self.res_type().is_c() {
            self.place("LP3", |r| {
                let n3 = r.pos(AtomType::N3)?;
                let z = ring_substituent(&n3, &r.pos(AtomType::C2)?, &r.pos(AtomType::C4)?);
                Ok(vec![Atom::new(n3 + z * N_LP_DIST, AtomType::LP3)])
            });
            self.place("LP21/LP22", |r| {
                let c2 = r.pos(AtomType::C2)?;
                let o2 = r.pos(AtomType::O2)?;
                let (a, b) = exocyclic_pair(
                    &c2,
                    &r.pos(AtomType::N1)?,
                    &r.pos(AtomType::N3)?,
                    &o2,
                );
                Ok(vec![
                    Atom::new(o2 + a * O_LP_DIST, AtomType::LP21),
                    Atom::new(o2 + b * O_LP_DIST, AtomType::LP22),
                ])
            });
        } else if self.res_type().is_u() || self.res_type().is_t() {
            self.place("LP21/LP22", |r| {
                let c2 = r.pos(AtomType::C2)?;
                let o2 = r.pos(AtomType::O2)?;
                let (a, b) = exocyclic_pair(
                    &c2,
                    &r.pos(AtomType::N1)?,
                    &r.pos(AtomType::N3)?,
                    &o2,
                );
                Ok(vec![
                    Atom::new(o2 + a * O_LP_DIST, AtomType::LP21),
                    Atom::new(o2 + b * O_LP_DIST, AtomType::LP22),
                ])
            });
            self.place("LP41/LP42", |r| {
                let c4 = r.pos(AtomType::C4)?;
                let o4 = r.pos(AtomType::O4)?;
                let (a, b) = exocyclic_pair(
                    &c4,
                    &r.pos(AtomType::N3)?,
                    &r.pos(AtomType::C5)?,
                    &o4,
                );
                Ok(vec![
                    Atom::new(o4 + b * O_LP_DIST, AtomType::LP41),
                    Atom::new(o4 + a * O_LP_DIST, AtomType::LP42),
                ])
            });
        }
    }

    /// Strips non-topology atoms, then regenerates hydrogens and lone
    /// pairs.
    pub fn setup_hlp(&mut self) {
        self.remove_optionals();
        self.add_hydrogens();
        self.add_lone_pairs();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::res_id::ResId;
    use crate::core::types::ResidueType;

    fn theoretical(res_type: ResidueType) -> Residue {
        let mut res = Residue::new(res_type, ResId::new('A', 1));
        res.set_theoretical().unwrap();
        res
    }

    #[test]
    fn adenine_gets_its_hydrogens_and_lone_pairs() {
        let res = theoretical(ResidueType::RA);
        for t in [
            AtomType::H2,
            AtomType::H8,
            AtomType::H61,
            AtomType::H62,
            AtomType::LP1,
            AtomType::LP3,
            AtomType::LP7,
        ] {
            assert!(res.contains(t), "missing {t}");
        }
    }

    #[test]
    fn guanine_gets_carbonyl_lone_pairs() {
        let res = theoretical(ResidueType::RG);
        for t in [
            AtomType::H1,
            AtomType::H8,
            AtomType::H21,
            AtomType::H22,
            AtomType::LP3,
            AtomType::LP7,
            AtomType::LP61,
            AtomType::LP62,
        ] {
            assert!(res.contains(t), "missing {t}");
        }
    }

    #[test]
    fn thymine_gets_three_methyl_hydrogens() {
        let res = theoretical(ResidueType::DT);
        for t in [AtomType::H5M1, AtomType::H5M2, AtomType::H5M3] {
            assert!(res.contains(t), "missing {t}");
        }
    }

    #[test]
    fn bond_lengths_match_the_constants() {
        let res = theoretical(ResidueType::RA);
        let c2 = res.find(AtomType::C2).unwrap();
        let h2 = res.find(AtomType::H2).unwrap();
        assert!((c2.distance(h2) - C_H_DIST_CYC).abs() < 1e-9);

        let n6 = res.find(AtomType::N6).unwrap();
        let h61 = res.find(AtomType::H61).unwrap();
        assert!((n6.distance(h61) - N_H_DIST).abs() < 1e-9);

        let n1 = res.find(AtomType::N1).unwrap();
        let lp1 = res.find(AtomType::LP1).unwrap();
        assert!((n1.distance(lp1) - N_LP_DIST).abs() < 1e-9);
    }

    #[test]
    fn missing_heavy_anchor_skips_the_group_without_failing() {
        let mut res = theoretical(ResidueType::RA);
        res.erase(AtomType::N6);
        res.erase(AtomType::H61);
        res.erase(AtomType::H62);
        res.add_hydrogens();
        assert!(!res.contains(AtomType::H61));
        assert!(res.contains(AtomType::H2));
    }
}
