use super::atom::Atom;
use super::res_id::ResId;
use super::topology;
use crate::core::geometry::{superpose, torsion_angle, Transfo};
use crate::core::types::{AtomSet, AtomType, PropertyType, ResidueType};
use nalgebra::Point3;
use std::collections::HashMap;
use std::f64::consts::PI;
use thiserror::Error;
use tracing::{debug, warn};

const TWO_PI: f64 = 2.0 * PI;
const RAD_36: f64 = PI / 5.0;
const RAD_90: f64 = PI / 2.0;
const RAD_270: f64 = 3.0 * PI / 2.0;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ResidueError {
    #[error("residue {residue} is missing atom {atom}")]
    NoSuchAtom { residue: ResId, atom: AtomType },
    #[error("operation not defined for residue {residue} of type {res_type}")]
    UnsupportedType {
        residue: ResId,
        res_type: ResidueType,
    },
}

/// A residue: an identifier, a type tag, and a set of atoms keyed by atom
/// type.
///
/// Lifecycle: constructed empty, atoms inserted, then [`Residue::finalize`]
/// computes the pseudo-atoms that make the referential well-defined.
/// Hydrogens and lone pairs are optional derived atoms added on demand.
#[derive(Debug, Clone)]
pub struct Residue {
    id: ResId,
    res_type: ResidueType,
    atoms: Vec<Atom>,
    index: HashMap<AtomType, usize>,
    pub(crate) rib_built_valid: bool,
    pub(crate) rib_built_count: u32,
}

impl Residue {
    pub fn new(res_type: ResidueType, id: ResId) -> Self {
        Residue {
            id,
            res_type,
            atoms: Vec::new(),
            index: HashMap::new(),
            rib_built_valid: false,
            rib_built_count: 0,
        }
    }

    pub fn with_atoms(res_type: ResidueType, id: ResId, atoms: Vec<Atom>) -> Self {
        let mut res = Residue::new(res_type, id);
        for atom in atoms {
            res.insert(atom);
        }
        res
    }

    pub fn id(&self) -> ResId {
        self.id
    }

    pub fn set_id(&mut self, id: ResId) {
        self.id = id;
    }

    pub fn res_type(&self) -> ResidueType {
        self.res_type
    }

    pub fn set_res_type(&mut self, res_type: ResidueType) {
        self.res_type = res_type;
    }

    /// True once the last ribose rebuild passed its validity test.
    pub fn validate_ribose_building(&self) -> bool {
        self.rib_built_valid
    }

    /// Number of parametric ribose constructions performed by the last
    /// optimization run.
    pub fn ribose_built_count(&self) -> u32 {
        self.rib_built_count
    }

    // --- Atom container -----------------------------------------------------

    /// Inserts an atom; an atom of the same type is replaced in place.
    pub fn insert(&mut self, atom: Atom) {
        match self.index.get(&atom.atom_type) {
            Some(&pos) => self.atoms[pos] = atom,
            None => {
                self.index.insert(atom.atom_type, self.atoms.len());
                self.atoms.push(atom);
            }
        }
    }

    /// Removes and returns the atom of the given type, if present.
    pub fn erase(&mut self, atom_type: AtomType) -> Option<Atom> {
        let pos = self.index.remove(&atom_type)?;
        let atom = self.atoms.remove(pos);
        for idx in self.index.values_mut() {
            if *idx > pos {
                *idx -= 1;
            }
        }
        Some(atom)
    }

    pub fn find(&self, atom_type: AtomType) -> Option<&Atom> {
        self.index.get(&atom_type).map(|&pos| &self.atoms[pos])
    }

    pub fn safe_find(&self, atom_type: AtomType) -> Result<&Atom, ResidueError> {
        self.find(atom_type).ok_or(ResidueError::NoSuchAtom {
            residue: self.id,
            atom: atom_type,
        })
    }

    pub fn contains(&self, atom_type: AtomType) -> bool {
        self.index.contains_key(&atom_type)
    }

    /// Position of the given atom, or `NoSuchAtom`.
    pub(crate) fn pos(&self, atom_type: AtomType) -> Result<Point3<f64>, ResidueError> {
        self.safe_find(atom_type).map(|a| a.position)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Atom> {
        self.atoms.iter()
    }

    /// Iterates atoms matching the filter expression.
    pub fn iter_filtered<'a>(&'a self, filter: &'a AtomSet) -> impl Iterator<Item = &'a Atom> {
        self.atoms.iter().filter(move |a| filter.matches(a.atom_type))
    }

    pub fn len(&self) -> usize {
        self.atoms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.atoms.is_empty()
    }

    pub fn clear(&mut self) {
        self.atoms.clear();
        self.index.clear();
        self.rib_built_valid = false;
    }

    /// Copies coordinates from a residue of the same type, atom by atom.
    pub fn atom_copy(&mut self, other: &Residue) -> Result<(), ResidueError> {
        if self.res_type != other.res_type {
            return Err(ResidueError::UnsupportedType {
                residue: other.id,
                res_type: other.res_type,
            });
        }
        let types: Vec<AtomType> = self.atoms.iter().map(|a| a.atom_type).collect();
        for t in types {
            if let Some(src) = other.find(t) {
                self.insert(*src);
            }
        }
        Ok(())
    }

    // --- Referential --------------------------------------------------------

    /// Computes and inserts the pseudo-atoms that pin the referential:
    /// `PSY`/`PSZ` for nucleobases (glycosidic-N frame), `PSAZ` for amino
    /// acids. Partial residues (phosphate, ribose) need none. Missing heavy
    /// anchors demote to a logged warning.
    pub fn finalize(&mut self) {
        let pivots = if self.res_type.is_purine() {
            Some((AtomType::N9, AtomType::C8, AtomType::C4))
        } else if self.res_type.is_pyrimidine() {
            Some((AtomType::N1, AtomType::C6, AtomType::C2))
        } else {
            None
        };

        if let Some((origin, left, right)) = pivots {
            match (self.pos(origin), self.pos(left), self.pos(right)) {
                (Ok(v1), Ok(v2), Ok(v3)) => {
                    let a = (v2 - v1).normalize();
                    let b = (v3 - v1).normalize();
                    let y = v1 + (a + b).normalize();
                    let z = v1 + b.cross(&a).normalize();
                    self.insert(Atom::new(y, AtomType::PSY));
                    self.insert(Atom::new(z, AtomType::PSZ));
                }
                _ => {
                    warn!(residue = %self.id, "missing anchors for pseudo-atoms");
                }
            }
        } else if self.res_type.is_amino_acid() {
            match (
                self.pos(AtomType::CA),
                self.pos(AtomType::N),
                self.pos(AtomType::C),
            ) {
                (Ok(v1), Ok(v2), Ok(v3)) => {
                    let a = (v2 - v1).normalize();
                    let b = (v3 - v1).normalize();
                    let z = v1 + b.cross(&a).normalize();
                    self.insert(Atom::new(z, AtomType::PSAZ));
                }
                _ => {
                    warn!(residue = %self.id, "missing anchors for pseudo-atoms");
                }
            }
        }
    }

    /// Pivot triple defining the local frame for this residue type.
    fn referential_pivots(&self) -> Option<(AtomType, AtomType, AtomType)> {
        if self.res_type.is_purine() {
            Some((AtomType::N9, AtomType::PSY, AtomType::PSZ))
        } else if self.res_type.is_pyrimidine() {
            Some((AtomType::N1, AtomType::PSY, AtomType::PSZ))
        } else if self.res_type.is_phosphate() {
            Some((AtomType::P, AtomType::O3Prime, AtomType::O5Prime))
        } else if self.res_type.is_ribose() {
            Some((AtomType::C1Prime, AtomType::C2Prime, AtomType::O4Prime))
        } else if self.res_type.is_amino_acid() {
            Some((AtomType::CA, AtomType::N, AtomType::PSAZ))
        } else {
            None
        }
    }

    /// The rigid frame attached to this residue. Falls back to the first
    /// three atoms when the type is unknown, and to identity when even that
    /// is impossible.
    pub fn referential(&self) -> Transfo {
        if let Some((p1, p2, p3)) = self.referential_pivots() {
            match (self.pos(p1), self.pos(p2), self.pos(p3)) {
                (Ok(a), Ok(b), Ok(c)) => return Transfo::align(&a, &b, &c),
                _ => {
                    debug!(residue = %self.id, "no referential pivots, using fallback");
                }
            }
        }
        if self.atoms.len() >= 3 {
            return Transfo::align(
                &self.atoms[0].position,
                &self.atoms[1].position,
                &self.atoms[2].position,
            );
        }
        Transfo::identity()
    }

    /// Rigidly transforms the residue so that its referential aligns with
    /// `target`.
    pub fn set_referential(&mut self, target: &Transfo) {
        let t = *target * self.referential().invert();
        self.transform(&t);
    }

    /// Applies a rigid transform to every atom.
    pub fn transform(&mut self, tfo: &Transfo) {
        for atom in &mut self.atoms {
            atom.transform(tfo);
        }
    }

    // --- Validation ---------------------------------------------------------

    /// Checks the obligatory atom set for this residue type.
    ///
    /// Fixes O3P/O3' mismatches first (renames O3P to O3' when O3' is
    /// absent, drops it otherwise). If an obligatory atom is missing, the
    /// residue type is marked invalid and `false` is returned.
    pub fn validate(&mut self) -> bool {
        if !self.res_type.is_nucleic_acid() && !self.res_type.is_amino_acid() {
            debug!(residue = %self.id, res_type = %self.res_type, "validate called on a type without topology");
            return true;
        }

        if let Some(o3_alt) = self.find(AtomType::O3P).copied() {
            if self.contains(AtomType::O3Prime) {
                self.erase(AtomType::O3P);
                debug!(residue = %self.id, "removed redundant O3P");
            } else {
                self.erase(AtomType::O3P);
                self.insert(Atom::new(o3_alt.position, AtomType::O3Prime));
                debug!(residue = %self.id, "renamed O3P to O3'");
            }
        }

        let missing: Vec<AtomType> = topology::obligatory_atoms(self.res_type)
            .into_iter()
            .filter(|t| !self.contains(*t))
            .collect();

        if missing.is_empty() {
            true
        } else {
            warn!(residue = %self.id, ?missing, "obligatory atoms missing, invalidating type");
            self.res_type = self.res_type.invalidate();
            false
        }
    }

    /// Drops every atom that is neither obligatory nor optional for the
    /// residue type.
    pub fn remove_optionals(&mut self) {
        if !self.res_type.is_nucleic_acid() && !self.res_type.is_amino_acid() {
            return;
        }
        let obligatory = topology::obligatory_atoms(self.res_type);
        let keep: Vec<AtomType> = self
            .atoms
            .iter()
            .map(|a| a.atom_type)
            .filter(|t| obligatory.contains(t) || topology::is_optional_atom(self.res_type, *t))
            .collect();
        let drop: Vec<AtomType> = self
            .atoms
            .iter()
            .map(|a| a.atom_type)
            .filter(|t| !keep.contains(t))
            .collect();
        for t in drop {
            self.erase(t);
        }
    }

    // --- Conformation -------------------------------------------------------

    /// Furanose pseudorotation phase, mapped to [0, 2pi).
    pub fn rho(&self) -> Result<f64, ResidueError> {
        let c1p = self.pos(AtomType::C1Prime)?;
        let c2p = self.pos(AtomType::C2Prime)?;
        let c3p = self.pos(AtomType::C3Prime)?;
        let c4p = self.pos(AtomType::C4Prime)?;
        let o4p = self.pos(AtomType::O4Prime)?;

        let nu0 = torsion_angle(&c4p, &o4p, &c1p, &c2p);
        let nu1 = torsion_angle(&o4p, &c1p, &c2p, &c3p);
        let nu2 = torsion_angle(&c1p, &c2p, &c3p, &c4p);
        let nu3 = torsion_angle(&c2p, &c3p, &c4p, &o4p);
        let nu4 = torsion_angle(&c3p, &c4p, &o4p, &c1p);
        let rho = (nu4 + nu1 - nu3 - nu0).atan2(nu2 * 3.07768354);

        Ok(if rho > 0.0 { rho } else { TWO_PI + rho })
    }

    /// Glycosyl torsion about the base-sugar bond: O4'-C1'-N9-C4 for
    /// purines, O4'-C1'-N1-C2 for pyrimidines.
    pub fn chi(&self) -> Result<f64, ResidueError> {
        let (n, c) = if self.res_type.is_purine() {
            (AtomType::N9, AtomType::C4)
        } else if self.res_type.is_pyrimidine() {
            (AtomType::N1, AtomType::C2)
        } else {
            return Err(ResidueError::UnsupportedType {
                residue: self.id,
                res_type: self.res_type,
            });
        };
        let c1p = self.pos(AtomType::C1Prime)?;
        let o4p = self.pos(AtomType::O4Prime)?;
        let n_pos = self.pos(n)?;
        let c_pos = self.pos(c)?;
        Ok(torsion_angle(&o4p, &c1p, &n_pos, &c_pos))
    }

    /// Sugar pucker class of this residue, `Undefined` when the ring is
    /// incomplete.
    pub fn pucker(&self) -> PropertyType {
        match self.rho() {
            Ok(rho) => Residue::pucker_type(rho),
            Err(err) => {
                debug!(residue = %self.id, %err, "failed to compute pseudorotation");
                PropertyType::Undefined
            }
        }
    }

    /// Glycosyl class of this residue, `Undefined` when atoms are missing.
    pub fn glycosyl(&self) -> PropertyType {
        match self.chi() {
            Ok(chi) => Residue::glycosyl_type(chi),
            Err(err) => {
                debug!(residue = %self.id, %err, "failed to compute glycosyl torsion");
                PropertyType::Undefined
            }
        }
    }

    /// Pucker class for a pseudorotation value: equal 36 degree bins
    /// starting at C3'-endo.
    pub fn pucker_type(rho: f64) -> PropertyType {
        let rho = rho.rem_euclid(TWO_PI);
        const CLASSES: [PropertyType; 10] = [
            PropertyType::C3pEndo,
            PropertyType::C4pExo,
            PropertyType::O4pEndo,
            PropertyType::C1pExo,
            PropertyType::C2pEndo,
            PropertyType::C3pExo,
            PropertyType::C4pEndo,
            PropertyType::O4pExo,
            PropertyType::C1pEndo,
            PropertyType::C2pExo,
        ];
        CLASSES[((rho / RAD_36) as usize).min(9)]
    }

    /// Glycosyl class for a torsion value: syn in [-90, 90) degrees, anti
    /// otherwise.
    pub fn glycosyl_type(chi: f64) -> PropertyType {
        let mut chi = chi;
        while chi < -RAD_90 {
            chi += TWO_PI;
        }
        while chi > RAD_270 {
            chi -= TWO_PI;
        }
        if chi < RAD_90 {
            PropertyType::Syn
        } else {
            PropertyType::Anti
        }
    }

    /// Lower pseudorotation bound of a pucker class.
    pub fn min_rho(pucker: PropertyType) -> Option<f64> {
        Residue::pucker_bin(pucker).map(|bin| bin as f64 * RAD_36)
    }

    /// Upper pseudorotation bound of a pucker class.
    pub fn max_rho(pucker: PropertyType) -> Option<f64> {
        Residue::pucker_bin(pucker).map(|bin| (bin + 1) as f64 * RAD_36)
    }

    fn pucker_bin(pucker: PropertyType) -> Option<u32> {
        match pucker {
            PropertyType::C3pEndo => Some(0),
            PropertyType::C4pExo => Some(1),
            PropertyType::O4pEndo => Some(2),
            PropertyType::C1pExo => Some(3),
            PropertyType::C2pEndo => Some(4),
            PropertyType::C3pExo => Some(5),
            PropertyType::C4pEndo => Some(6),
            PropertyType::O4pExo => Some(7),
            PropertyType::C1pEndo => Some(8),
            PropertyType::C2pExo => Some(9),
            _ => None,
        }
    }

    /// Lower glycosyl torsion bound of a class.
    pub fn min_chi(glycosyl: PropertyType) -> Option<f64> {
        match glycosyl {
            PropertyType::Syn => Some(-RAD_90),
            PropertyType::Anti => Some(RAD_90),
            _ => None,
        }
    }

    /// Upper glycosyl torsion bound of a class.
    pub fn max_chi(glycosyl: PropertyType) -> Option<f64> {
        match glycosyl {
            PropertyType::Syn => Some(RAD_90),
            PropertyType::Anti => Some(RAD_270),
            _ => None,
        }
    }

    // --- Comparison ---------------------------------------------------------

    /// Conformational distance between two nucleic acid residues: the RMSD
    /// of the heavy backbone atoms after aligning the other residue's
    /// referential onto this one. O2' is excluded so RNA and DNA compare.
    pub fn distance_to(&self, other: &Residue) -> Option<f64> {
        if !self.res_type.is_nucleic_acid() || !other.res_type.is_nucleic_acid() {
            return None;
        }
        let to_self = self.referential() * other.referential().invert();
        let pairs: Vec<(Point3<f64>, Point3<f64>)> = self
            .atoms
            .iter()
            .filter(|a| {
                a.atom_type.is_backbone()
                    && !a.atom_type.is_hydrogen()
                    && a.atom_type != AtomType::O2Prime
            })
            .filter_map(|a| {
                other
                    .find(a.atom_type)
                    .map(|b| (to_self.apply(&b.position), a.position))
            })
            .collect();
        if pairs.is_empty() {
            return None;
        }
        let sum: f64 = pairs.iter().map(|(b, a)| (a - b).norm_squared()).sum();
        Some((sum / pairs.len() as f64).sqrt())
    }

    /// Optimal rigid superposition of the shared atom types of two residues.
    pub fn superposition_onto(&self, target: &Residue) -> Transfo {
        let pairs: Vec<(Point3<f64>, Point3<f64>)> = self
            .atoms
            .iter()
            .filter_map(|a| {
                target
                    .find(a.atom_type)
                    .map(|b| (a.position, b.position))
            })
            .collect();
        superpose::superposition(&pairs)
    }
}

impl PartialEq for Residue {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id && self.res_type == other.res_type
    }
}

impl Eq for Residue {}

impl std::fmt::Display for Residue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.id, self.res_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::parse_residue_type;
    use nalgebra::Vector3;

    fn approx(a: f64, b: f64, eps: f64) -> bool {
        (a - b).abs() < eps
    }

    mod container {
        use super::*;

        #[test]
        fn insert_replaces_same_type() {
            let mut res = Residue::new(ResidueType::RA, ResId::new('A', 1));
            res.insert(Atom::from_coords(0.0, 0.0, 0.0, AtomType::N9));
            res.insert(Atom::from_coords(1.0, 0.0, 0.0, AtomType::N9));
            assert_eq!(res.len(), 1);
            assert!(approx(res.find(AtomType::N9).unwrap().position.x, 1.0, 1e-12));
        }

        #[test]
        fn erase_keeps_index_consistent() {
            let mut res = Residue::new(ResidueType::RA, ResId::new('A', 1));
            res.insert(Atom::from_coords(0.0, 0.0, 0.0, AtomType::N9));
            res.insert(Atom::from_coords(1.0, 0.0, 0.0, AtomType::C8));
            res.insert(Atom::from_coords(2.0, 0.0, 0.0, AtomType::C4));

            let erased = res.erase(AtomType::C8).unwrap();
            assert_eq!(erased.atom_type, AtomType::C8);
            assert_eq!(res.len(), 2);
            assert!(approx(res.find(AtomType::C4).unwrap().position.x, 2.0, 1e-12));
            assert!(res.erase(AtomType::C8).is_none());
        }

        #[test]
        fn safe_find_reports_missing_atom() {
            let res = Residue::new(ResidueType::RA, ResId::new('A', 7));
            let err = res.safe_find(AtomType::N9).unwrap_err();
            assert_eq!(
                err,
                ResidueError::NoSuchAtom {
                    residue: ResId::new('A', 7),
                    atom: AtomType::N9
                }
            );
        }

        #[test]
        fn filtered_iteration_skips_non_matching_atoms() {
            let mut res = Residue::new(ResidueType::RA, ResId::new('A', 1));
            res.insert(Atom::from_coords(0.0, 0.0, 0.0, AtomType::N9));
            res.insert(Atom::from_coords(0.0, 0.0, 0.0, AtomType::C1Prime));
            res.insert(Atom::from_coords(0.0, 0.0, 0.0, AtomType::H8));

            let filter = AtomSet::SideChain;
            let kept: Vec<AtomType> =
                res.iter_filtered(&filter).map(|a| a.atom_type).collect();
            assert_eq!(kept, vec![AtomType::N9, AtomType::H8]);
        }
    }

    mod referential {
        use super::*;

        #[test]
        fn set_referential_round_trips() {
            let mut res = Residue::new(ResidueType::RA, ResId::new('A', 1));
            res.set_theoretical().unwrap();

            let target = Transfo::rotation(&Vector3::new(0.2, 1.0, 0.4), 0.8)
                .translate(Vector3::new(4.0, -3.0, 7.0));
            res.set_referential(&target);

            let diff = res.referential().matrix() - target.matrix();
            assert!(diff.abs().max() < 1e-4);
        }
    }

    mod validation {
        use super::*;

        #[test]
        fn o3p_is_renamed_when_o3_prime_is_absent() {
            let mut res = Residue::new(ResidueType::RA, ResId::new('A', 1));
            res.set_full_theoretical().unwrap();
            let o3p = res.erase(AtomType::O3Prime).unwrap();
            res.insert(Atom::new(o3p.position, AtomType::O3P));

            assert!(res.validate());
            assert!(res.contains(AtomType::O3Prime));
            assert!(!res.contains(AtomType::O3P));
        }

        #[test]
        fn missing_obligatory_atom_invalidates_type() {
            let mut res = Residue::new(ResidueType::RA, ResId::new('A', 1));
            res.set_full_theoretical().unwrap();
            res.erase(AtomType::N9);
            assert!(!res.validate());
            assert_eq!(res.res_type(), ResidueType::Invalid);
        }

        #[test]
        fn remove_optionals_strips_derived_atoms() {
            let mut res = Residue::new(ResidueType::RG, ResId::new('A', 1));
            res.set_full_theoretical().unwrap();
            assert!(res.contains(AtomType::H8));
            assert!(res.contains(AtomType::PSY));

            res.remove_optionals();
            // Optionals stay, unknown-to-topology atoms are kept out only
            // if present; derived H/LP/pseudo atoms are all optional.
            assert!(res.contains(AtomType::H8));

            let mut stripped = Residue::new(ResidueType::RG, ResId::new('A', 2));
            stripped.set_full_theoretical().unwrap();
            stripped.insert(Atom::from_coords(0.0, 0.0, 0.0, AtomType::CA));
            stripped.remove_optionals();
            assert!(!stripped.contains(AtomType::CA));
        }
    }

    mod conformation {
        use super::*;

        #[test]
        fn pucker_bins_cover_the_circle() {
            assert_eq!(Residue::pucker_type(0.1), PropertyType::C3pEndo);
            assert_eq!(Residue::pucker_type(RAD_36 + 0.1), PropertyType::C4pExo);
            assert_eq!(Residue::pucker_type(TWO_PI - 0.1), PropertyType::C2pExo);
            assert_eq!(Residue::pucker_type(-0.1), PropertyType::C2pExo);
        }

        #[test]
        fn glycosyl_split_at_90_degrees() {
            assert_eq!(Residue::glycosyl_type(0.0), PropertyType::Syn);
            assert_eq!(Residue::glycosyl_type(-1.0), PropertyType::Syn);
            assert_eq!(Residue::glycosyl_type(PI), PropertyType::Anti);
            assert_eq!(Residue::glycosyl_type(RAD_270 - 0.01), PropertyType::Anti);
        }

        #[test]
        fn rho_and_chi_bounds_match_bins() {
            assert!(approx(
                Residue::min_rho(PropertyType::C3pEndo).unwrap(),
                0.0,
                1e-12
            ));
            assert!(approx(
                Residue::max_rho(PropertyType::C3pEndo).unwrap(),
                RAD_36,
                1e-12
            ));
            assert!(approx(
                Residue::min_chi(PropertyType::Anti).unwrap(),
                RAD_90,
                1e-12
            ));
            assert!(Residue::min_rho(PropertyType::Syn).is_none());
        }
    }

    #[test]
    fn display_concatenates_id_and_type() {
        let res = Residue::new(parse_residue_type("G").unwrap(), ResId::new('B', 12));
        assert_eq!(res.to_string(), "B12RG");
    }
}
