use super::faces::face_of;
use crate::core::flow::{Capacity, MaximumFlowGraph};
use crate::core::geometry::{torsion_angle, Transfo};
use crate::core::models::{Atom, ResId, Residue, ResidueError};
use crate::core::pairing::{translate_pairing, HBond, HBondFlow};
use crate::core::types::{AtomSet, AtomType, PropertyType, ResidueType};
use bitflags::bitflags;
use itertools::iproduct;
use nalgebra::{Point3, Vector3};
use std::collections::{BTreeSet, HashMap};
use std::f64::consts::{FRAC_PI_2, PI};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, warn};

/// Pairing annotation cutoffs.
pub const PAIRING_CUTOFF: f64 = 0.8;
pub const TWO_BONDS_CUTOFF: f64 = 1.5;
pub const THREE_BONDS_CUTOFF: f64 = 2.1;
pub const HBOND_DIST_MAX: f64 = 1.7;

/// Other annotation cutoffs, respectively:
///
/// - O3'-P squared bond length cutoff between adjacent nucleotides (squared angstroms).
/// - base ring center squared distance cutoff for a stacking (squared angstroms).
/// - base plane tilt cutoff for a stacking (radians).
/// - base plane overlap cutoff for a stacking (radians).
const ADJACENCY_DISTANCE_CUTOFF_SQUARE: f64 = 4.00; // 2.0 A
const STACK_DISTANCE_CUTOFF_SQUARE: f64 = 20.25; // 4.5 A
const STACK_TILT_CUTOFF: f64 = 0.61; // 35 deg
const STACK_OVERLAP_CUTOFF: f64 = 0.61; // 35 deg

bitflags! {
    /// Which of the four sub-analyses produced (or should produce) labels.
    #[derive(Default, Clone, Copy, Debug, PartialEq, Eq)]
    pub struct AnnotationFlags: u8 {
        const ADJACENT = 0b0001;
        const STACKING = 0b0010;
        const PAIRING  = 0b0100;
        const BACKBONE = 0b1000;
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("cannot find residue id {0}")]
pub struct UnknownResidue(pub ResId);

/// The annotated spatial relationship between an ordered pair of residues.
///
/// Carries the relative transform between the two local frames, the
/// annotation labels with their face tags, and the hydrogen-bond flows
/// behind a pairing decision. `invert` rewrites the relation as seen from
/// the other residue.
#[derive(Debug, Clone)]
pub struct Relation {
    ref_res: Arc<Residue>,
    res: Arc<Residue>,
    tfo: Transfo,
    po4_tfo: Transfo,
    ref_face: PropertyType,
    res_face: PropertyType,
    labels: BTreeSet<PropertyType>,
    flags: AnnotationFlags,
    hbonds: Vec<HBondFlow>,
    sum_flow: f64,
    paired_faces: Vec<(PropertyType, PropertyType)>,
}

impl Capacity for HBond {
    fn capacity(&self) -> f64 {
        self.value()
    }
}

impl Relation {
    pub fn new(ref_res: Arc<Residue>, res: Arc<Residue>) -> Self {
        let tfo = ref_res.referential().invert() * res.referential();
        Relation {
            ref_res,
            res,
            tfo,
            po4_tfo: Transfo::identity(),
            ref_face: PropertyType::Null,
            res_face: PropertyType::Null,
            labels: BTreeSet::new(),
            flags: AnnotationFlags::empty(),
            hbonds: Vec::new(),
            sum_flow: 0.0,
            paired_faces: Vec::new(),
        }
    }

    /// Rebuilds a relation from serialized parts.
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn from_parts(
        ref_res: Arc<Residue>,
        res: Arc<Residue>,
        tfo: Transfo,
        po4_tfo: Transfo,
        ref_face: PropertyType,
        res_face: PropertyType,
        labels: BTreeSet<PropertyType>,
        flags: AnnotationFlags,
        hbonds: Vec<HBondFlow>,
        sum_flow: f64,
        paired_faces: Vec<(PropertyType, PropertyType)>,
    ) -> Self {
        Relation {
            ref_res,
            res,
            tfo,
            po4_tfo,
            ref_face,
            res_face,
            labels,
            flags,
            hbonds,
            sum_flow,
            paired_faces,
        }
    }

    pub fn ref_res(&self) -> &Arc<Residue> {
        &self.ref_res
    }

    pub fn res(&self) -> &Arc<Residue> {
        &self.res
    }

    pub fn tfo(&self) -> &Transfo {
        &self.tfo
    }

    /// Transform placing the linking phosphate, identity unless adjacent.
    pub fn po4_tfo(&self) -> &Transfo {
        &self.po4_tfo
    }

    pub fn ref_face(&self) -> PropertyType {
        self.ref_face
    }

    pub fn res_face(&self) -> PropertyType {
        self.res_face
    }

    pub fn labels(&self) -> &BTreeSet<PropertyType> {
        &self.labels
    }

    pub fn flags(&self) -> AnnotationFlags {
        self.flags
    }

    pub fn hbond_flows(&self) -> &[HBondFlow] {
        &self.hbonds
    }

    pub fn sum_flow(&self) -> f64 {
        self.sum_flow
    }

    pub fn paired_faces(&self) -> &[(PropertyType, PropertyType)] {
        &self.paired_faces
    }

    pub fn is_adjacent(&self) -> bool {
        self.flags.contains(AnnotationFlags::ADJACENT)
    }

    pub fn is_stacking(&self) -> bool {
        self.flags.contains(AnnotationFlags::STACKING)
    }

    pub fn is_pairing(&self) -> bool {
        self.flags.contains(AnnotationFlags::PAIRING)
    }

    /// Exact label membership.
    pub fn has(&self, label: PropertyType) -> bool {
        self.labels.contains(&label)
    }

    /// Hierarchy-aware label membership.
    pub fn is(&self, label: PropertyType) -> bool {
        self.labels.iter().any(|l| l.is(label))
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Runs the selected sub-analyses; returns true iff at least one label
    /// was assigned.
    pub fn annotate(&mut self, mask: AnnotationFlags) -> bool {
        if mask.contains(AnnotationFlags::ADJACENT) {
            self.are_adjacent();
        }
        if mask.contains(AnnotationFlags::STACKING) {
            self.are_stacked();
        }
        if mask.contains(AnnotationFlags::PAIRING) {
            self.are_paired();
        }
        if mask.contains(AnnotationFlags::BACKBONE) {
            self.are_h_bonded();
        }
        !self.is_empty()
    }

    /// Runs all four sub-analyses.
    pub fn annotate_all(&mut self) -> bool {
        self.annotate(AnnotationFlags::all())
    }

    /// Rewrites the relation as seen from the other residue: residues and
    /// faces swap, transforms invert, and direction-bearing labels flip.
    pub fn invert(&mut self) -> &mut Self {
        std::mem::swap(&mut self.ref_res, &mut self.res);
        std::mem::swap(&mut self.ref_face, &mut self.res_face);

        self.tfo = self.tfo.invert();
        if self.is_adjacent() {
            self.po4_tfo = self.tfo * self.po4_tfo;
        }

        self.labels = self.labels.iter().map(|l| l.invert()).collect();
        for faces in &mut self.paired_faces {
            std::mem::swap(&mut faces.0, &mut faces.1);
        }
        self
    }

    /// Re-resolves the residue handles through a lookup keyed by residue
    /// id, after a deep copy or a deserialize.
    pub fn reassign_residues(
        &mut self,
        lookup: &HashMap<ResId, Arc<Residue>>,
    ) -> Result<(), UnknownResidue> {
        self.ref_res = lookup
            .get(&self.ref_res.id())
            .ok_or(UnknownResidue(self.ref_res.id()))?
            .clone();
        self.res = lookup
            .get(&self.res.id())
            .ok_or(UnknownResidue(self.res.id()))?
            .clone();
        Ok(())
    }

    // --- Adjacency ----------------------------------------------------------

    fn are_adjacent(&mut self) {
        let close = |a: Option<&Atom>, b: Option<&Atom>| match (a, b) {
            (Some(a), Some(b)) => a.square_distance(b) <= ADJACENCY_DISTANCE_CUTOFF_SQUARE,
            _ => false,
        };

        let adj_type = if close(
            self.ref_res.find(AtomType::O3Prime),
            self.res.find(AtomType::P),
        ) {
            PropertyType::Adjacent5p
        } else if close(
            self.res.find(AtomType::O3Prime),
            self.ref_res.find(AtomType::P),
        ) {
            PropertyType::Adjacent3p
        } else if close(self.ref_res.find(AtomType::C), self.res.find(AtomType::N)) {
            PropertyType::Adjacent5p
        } else if close(self.res.find(AtomType::C), self.ref_res.find(AtomType::N)) {
            PropertyType::Adjacent3p
        } else {
            PropertyType::Null
        };

        if adj_type != PropertyType::Null {
            self.labels.insert(adj_type);
            self.flags |= AnnotationFlags::ADJACENT;
        }

        // Relative transform placing the linking phosphate, for adjacent
        // nucleic acids only.
        self.po4_tfo = Transfo::identity();
        if self.ref_res.res_type().is_nucleic_acid()
            && self.res.res_type().is_nucleic_acid()
            && adj_type.is_adjacent()
        {
            match self.phosphate_tfo(adj_type) {
                Ok(tfo) => self.po4_tfo = tfo,
                Err(err) => {
                    debug!(%err, "unable to compute phosphate transfo in adjacent relation");
                    self.po4_tfo = Transfo::identity();
                }
            }
        }
    }

    fn phosphate_tfo(&self, adj_type: PropertyType) -> Result<Transfo, ResidueError> {
        let (o3_side, po4_side) = if adj_type == PropertyType::Adjacent5p {
            (&self.ref_res, &self.res)
        } else {
            (&self.res, &self.ref_res)
        };

        let mut po4 = Residue::new(ResidueType::Phosphate, ResId::default());
        po4.insert(*o3_side.safe_find(AtomType::O3Prime)?);
        po4.insert(*po4_side.safe_find(AtomType::P)?);
        po4.insert(*po4_side.safe_find(AtomType::O1P)?);
        po4.insert(*po4_side.safe_find(AtomType::O2P)?);
        po4.insert(*po4_side.safe_find(AtomType::O5Prime)?);
        po4.finalize();

        Ok(self.ref_res.referential().invert() * po4.referential())
    }

    // --- Stacking -----------------------------------------------------------

    pub(crate) fn pyrimidine_ring_center(res: &Residue) -> Result<Point3<f64>, ResidueError> {
        let sum = res.pos(AtomType::N1)?.coords
            + res.pos(AtomType::C2)?.coords
            + res.pos(AtomType::N3)?.coords
            + res.pos(AtomType::C4)?.coords
            + res.pos(AtomType::C5)?.coords
            + res.pos(AtomType::C6)?.coords;
        Ok(Point3::from(sum / 6.0))
    }

    fn imidazole_ring_center(res: &Residue) -> Result<Point3<f64>, ResidueError> {
        let sum = res.pos(AtomType::C4)?.coords
            + res.pos(AtomType::C5)?.coords
            + res.pos(AtomType::N7)?.coords
            + res.pos(AtomType::C8)?.coords
            + res.pos(AtomType::N9)?.coords;
        Ok(Point3::from(sum / 5.0))
    }

    /// Normal of the six-membered ring plane: two orthogonal in-plane
    /// combinations of the ring atoms, crossed and normalized. Flipped for
    /// purines so both base families expose the same sense.
    pub(crate) fn pyrimidine_ring_normal(
        res: &Residue,
        center: &Point3<f64>,
    ) -> Result<Vector3<f64>, ResidueError> {
        let at = |t: AtomType| -> Result<Vector3<f64>, ResidueError> { Ok(res.pos(t)? - center) };

        let r1 = at(AtomType::N1)? + at(AtomType::C2)? * 0.5 - at(AtomType::N3)? * 0.5
            - at(AtomType::C4)?
            - at(AtomType::C5)? * 0.5
            + at(AtomType::C6)? * 0.5;
        let r2 = (at(AtomType::C2)? + at(AtomType::N3)? - at(AtomType::C5)? - at(AtomType::C6)?)
            * 0.8660254;

        let normal = r1.cross(&r2).normalize();
        Ok(if res.res_type().is_purine() {
            -normal
        } else {
            normal
        })
    }

    fn imidazole_ring_normal(
        res: &Residue,
        center: &Point3<f64>,
    ) -> Result<Vector3<f64>, ResidueError> {
        let at = |t: AtomType| -> Result<Vector3<f64>, ResidueError> { Ok(res.pos(t)? - center) };

        let r1 = at(AtomType::C4)? + at(AtomType::C5)? * 0.30901699
            - at(AtomType::N7)? * 0.80901699
            - at(AtomType::C8)? * 0.80901699
            + at(AtomType::N9)? * 0.30901699;
        let r2 = at(AtomType::C5)? * 0.95105652 + at(AtomType::N7)? * 0.58778525
            - at(AtomType::C8)? * 0.58778525
            - at(AtomType::N9)? * 0.95105652;

        Ok(r1.cross(&r2).normalize())
    }

    /// Stacking test between two ring planes. The two-bit encoding maps
    /// (overlap obtuse, tilt obtuse) to the four stacking senses.
    fn ring_stacking(
        center_a: &Point3<f64>,
        normal_a: &Vector3<f64>,
        center_b: &Point3<f64>,
        normal_b: &Vector3<f64>,
    ) -> Option<PropertyType> {
        if (center_b - center_a).norm_squared() > STACK_DISTANCE_CUTOFF_SQUARE {
            return None;
        }

        // Ring tilt, symmetric.
        let mut annotation = 0u8;
        let tilt = normal_a.dot(normal_b).clamp(-1.0, 1.0).acos();
        if tilt > STACK_TILT_CUTOFF {
            if PI - tilt < STACK_TILT_CUTOFF {
                annotation = 2;
            } else {
                return None;
            }
        }

        // Ring overlap. Not symmetric: stacked if either direction is
        // satisfying.
        let v = (center_b - center_a).normalize();
        let overlap_a = normal_a.dot(&v).clamp(-1.0, 1.0).acos();
        if overlap_a > STACK_OVERLAP_CUTOFF {
            if PI - overlap_a < STACK_OVERLAP_CUTOFF {
                annotation |= 1;
            } else {
                let overlap_b = normal_b.dot(&v).clamp(-1.0, 1.0).acos();
                if overlap_b < STACK_OVERLAP_CUTOFF || PI - overlap_b < STACK_OVERLAP_CUTOFF {
                    if overlap_a > FRAC_PI_2 {
                        annotation |= 1;
                    }
                } else {
                    return None;
                }
            }
        }

        Some(match annotation {
            0 => PropertyType::Upward,
            1 => PropertyType::Downward,
            2 => PropertyType::Inward,
            _ => PropertyType::Outward,
        })
    }

    fn are_stacked(&mut self) {
        if !self.ref_res.res_type().is_nucleic_acid() || !self.res.res_type().is_nucleic_acid() {
            return;
        }

        let rings = |res: &Residue| -> Result<
            (Point3<f64>, Vector3<f64>, Option<(Point3<f64>, Vector3<f64>)>),
            ResidueError,
        > {
            let pyr_center = Relation::pyrimidine_ring_center(res)?;
            let pyr_normal = Relation::pyrimidine_ring_normal(res, &pyr_center)?;
            let imid = if res.res_type().is_purine() {
                let center = Relation::imidazole_ring_center(res)?;
                let normal = Relation::imidazole_ring_normal(res, &center)?;
                Some((center, normal))
            } else {
                None
            };
            Ok((pyr_center, pyr_normal, imid))
        };

        let (ref_rings, res_rings) = match (rings(&self.ref_res), rings(&self.res)) {
            (Ok(a), Ok(b)) => (a, b),
            (Err(err), _) | (_, Err(err)) => {
                warn!(%err, "an error occurred during stacking annotation");
                return;
            }
        };

        let (pyr_ca, pyr_na, imid_a) = ref_rings;
        let (pyr_cb, pyr_nb, imid_b) = res_rings;

        // Try each ring combination in order until one stacks.
        let mut stacking = Relation::ring_stacking(&pyr_ca, &pyr_na, &pyr_cb, &pyr_nb);
        if stacking.is_none() {
            if let Some((ca, na)) = imid_a {
                stacking = Relation::ring_stacking(&ca, &na, &pyr_cb, &pyr_nb);
            }
        }
        if stacking.is_none() {
            if let Some((cb, nb)) = imid_b {
                stacking = Relation::ring_stacking(&pyr_ca, &pyr_na, &cb, &nb);
            }
        }
        if stacking.is_none() {
            if let (Some((ca, na)), Some((cb, nb))) = (imid_a, imid_b) {
                stacking = Relation::ring_stacking(&ca, &na, &cb, &nb);
            }
        }

        if let Some(label) = stacking {
            self.labels.insert(label);
            self.flags |= AnnotationFlags::STACKING;
        }
    }

    // --- Pairing ------------------------------------------------------------

    fn are_paired(&mut self) {
        if let Err(err) = self.try_pairing() {
            warn!(%err, "an error occurred during pairing annotation");
        }
    }

    fn try_pairing(&mut self) -> Result<(), ResidueError> {
        // Candidate donors and acceptors: side chain atoms, minus two of
        // the thymine methyl hydrogens.
        let candidate_set = AtomSet::SideChain.and(
            AtomSet::atom(AtomType::H5M2)
                .or(AtomSet::atom(AtomType::H5M3))
                .not(),
        );

        // Per residue, every (hydrogen-or-lone-pair, heavy partner) pair
        // closer than the bond distance cap.
        let endpoint_pairs = |res: &Residue| -> Vec<(Atom, Atom)> {
            let mut pairs = Vec::new();
            for heavy in res.iter_filtered(&candidate_set) {
                if !(heavy.atom_type.is_carbon()
                    || heavy.atom_type.is_nitrogen()
                    || heavy.atom_type.is_oxygen())
                {
                    continue;
                }
                for light in res.iter_filtered(&candidate_set) {
                    if (light.atom_type.is_hydrogen() || light.atom_type.is_lone_pair())
                        && heavy.distance(light) < HBOND_DIST_MAX
                    {
                        pairs.push((*light, *heavy));
                    }
                }
            }
            pairs
        };

        let ref_pairs = endpoint_pairs(&self.ref_res);
        let res_pairs = endpoint_pairs(&self.res);

        let mut graph: MaximumFlowGraph<HBond> = MaximumFlowGraph::new();
        let source = graph.add_vertex();
        let sink = graph.add_vertex();
        let mut node_of: HashMap<(bool, AtomType), usize> = HashMap::new();

        let mut add_candidate =
            |graph: &mut MaximumFlowGraph<HBond>,
             hbond: HBond,
             donor_key: (bool, AtomType),
             acceptor_key: (bool, AtomType)| {
                let donor_node = *node_of.entry(donor_key).or_insert_with(|| {
                    let node = graph.add_vertex();
                    graph.connect(source, node, HBond::unit_capacity());
                    node
                });
                let acceptor_node = *node_of.entry(acceptor_key).or_insert_with(|| {
                    let node = graph.add_vertex();
                    graph.connect(node, sink, HBond::unit_capacity());
                    node
                });
                graph.connect(donor_node, acceptor_node, hbond);
            };

        for ((light_ref, heavy_ref), (light_res, heavy_res)) in
            iproduct!(&ref_pairs, &res_pairs)
        {
            if light_ref.atom_type.is_hydrogen() && light_res.atom_type.is_lone_pair() {
                let mut hbond = HBond::new(
                    heavy_ref.atom_type,
                    light_ref.atom_type,
                    heavy_res.atom_type,
                    light_res.atom_type,
                );
                if hbond.eval_statistically(&self.ref_res, &self.res) > 0.01 {
                    add_candidate(
                        &mut graph,
                        hbond,
                        (false, light_ref.atom_type),
                        (true, light_res.atom_type),
                    );
                }
            } else if light_res.atom_type.is_hydrogen() && light_ref.atom_type.is_lone_pair() {
                let mut hbond = HBond::new(
                    heavy_res.atom_type,
                    light_res.atom_type,
                    heavy_ref.atom_type,
                    light_ref.atom_type,
                );
                if hbond.eval_statistically(&self.res, &self.ref_res) > 0.01 {
                    add_candidate(
                        &mut graph,
                        hbond,
                        (true, light_res.atom_type),
                        (false, light_ref.atom_type),
                    );
                }
            }
        }

        if graph.len() < 3 {
            self.hbonds.clear();
            return Ok(());
        }

        graph.pre_flow_push(source, sink);

        for (hbond, flow) in graph.edges_iter() {
            if hbond.has_atoms() {
                self.sum_flow += flow;
                self.hbonds.push(HBondFlow::new(hbond.clone(), flow));
            }
        }
        debug!(sum_flow = self.sum_flow, "pairing annotation sum flow");

        if self.sum_flow >= PAIRING_CUTOFF {
            self.add_pairing_labels()?;
        }
        Ok(())
    }

    fn add_pairing_labels(&mut self) -> Result<(), ResidueError> {
        self.flags |= AnnotationFlags::PAIRING;
        self.labels.insert(PropertyType::Pairing);
        if self.sum_flow < TWO_BONDS_CUTOFF {
            self.labels.insert(PropertyType::OneHbond);
        }

        // Parallel or antiparallel base planes.
        let ref_center = Relation::pyrimidine_ring_center(&self.ref_res)?;
        let res_center = Relation::pyrimidine_ring_center(&self.res)?;
        let ref_normal = Relation::pyrimidine_ring_normal(&self.ref_res, &ref_center)?;
        let res_normal = Relation::pyrimidine_ring_normal(&self.res, &res_center)?;
        let orientation = if ref_normal.dot(&res_normal) > 0.0 {
            PropertyType::Parallel
        } else {
            PropertyType::Antiparallel
        };
        self.labels.insert(orientation);

        // Flow-weighted contact points: hydrogens and lone pairs belonging
        // to each side.
        let mut pa = Vector3::zeros();
        let mut pb = Vector3::zeros();
        for hbf in &self.hbonds {
            let (side_a, side_b) = if hbf.hbond.donor_residue() == Some(self.ref_res.id()) {
                (
                    self.ref_res.safe_find(hbf.hbond.hydrogen)?,
                    self.res.safe_find(hbf.hbond.lonepair)?,
                )
            } else {
                (
                    self.ref_res.safe_find(hbf.hbond.lonepair)?,
                    self.res.safe_find(hbf.hbond.hydrogen)?,
                )
            };
            pa += side_a.position.coords * hbf.flow;
            pb += side_b.position.coords * hbf.flow;
        }
        let pa = Point3::from(pa / self.sum_flow);
        let pb = Point3::from(pb / self.sum_flow);

        self.ref_face = face_of(&self.ref_res, &pa);
        self.res_face = face_of(&self.res, &pb);

        if self.ref_face != PropertyType::Null && self.res_face != PropertyType::Null {
            self.paired_faces.push((self.ref_face, self.res_face));

            let size_hint = if self.sum_flow < TWO_BONDS_CUTOFF {
                1
            } else if self.sum_flow < THREE_BONDS_CUTOFF {
                2
            } else {
                3
            };
            let mut strongest = self.hbonds.clone();
            strongest.sort_by(|a, b| {
                b.flow
                    .partial_cmp(&a.flow)
                    .expect("hydrogen bond flows are finite")
            });
            strongest.truncate(size_hint);

            if let Some(pair_type) =
                translate_pairing(&self.ref_res, &self.res, orientation, &strongest, size_hint)
            {
                self.labels.insert(pair_type);
            }
        }

        // Cis or trans, from the torsion along the C1'-ring-center axis.
        let ref_c1p = self.ref_res.pos(AtomType::C1Prime)?;
        let ref_psy = self.ref_res.pos(AtomType::PSY)?;
        let res_c1p = self.res.pos(AtomType::C1Prime)?;
        let res_psy = self.res.pos(AtomType::PSY)?;
        let pc = ref_center + (ref_c1p - ref_psy);
        let pd = res_center + (res_c1p - res_psy);
        let rad = torsion_angle(&pc, &ref_center, &res_center, &pd).abs();
        self.labels.insert(if rad < FRAC_PI_2 {
            PropertyType::Cis
        } else {
            PropertyType::Trans
        });
        Ok(())
    }

    // --- Backbone hydrogen bonds --------------------------------------------

    fn are_h_bonded(&mut self) {
        if !self.ref_res.res_type().is_nucleic_acid() || !self.res.res_type().is_nucleic_acid() {
            return;
        }

        // Side chain atoms plus the backbone oxygens that can carry a
        // hydrogen bond.
        let contact_set = AtomSet::SideChain.or(AtomSet::atom(AtomType::O2Prime)
            .or(AtomSet::atom(AtomType::O2P).or(AtomSet::atom(AtomType::O1P))));

        let faces: Vec<(PropertyType, PropertyType)> = self
            .ref_res
            .iter_filtered(&contact_set)
            .filter(|i| i.atom_type.is_nitrogen() || i.atom_type.is_oxygen())
            .flat_map(|i| {
                self.res
                    .iter_filtered(&contact_set)
                    .filter(move |j| {
                        let crossed = (i.atom_type.is_nitrogen() && j.atom_type.is_backbone())
                            || (j.atom_type.is_nitrogen() && i.atom_type.is_backbone());
                        let dist = i.distance(j);
                        crossed && dist > HBOND_DIST_MAX && dist < 3.2
                    })
                    .map(move |j| (i, j))
            })
            .map(|(i, j)| {
                let face = |res: &Residue, atom: &Atom| {
                    if atom.atom_type.is_nitrogen() {
                        face_of(res, &atom.position)
                    } else if atom.atom_type == AtomType::O2Prime {
                        PropertyType::FaceRibose
                    } else {
                        PropertyType::FacePhosphate
                    }
                };
                (face(&self.ref_res, i), face(&self.res, j))
            })
            .collect();

        if !faces.is_empty() {
            self.labels.insert(PropertyType::Pairing);
            self.flags |= AnnotationFlags::PAIRING;
            self.paired_faces.extend(faces);
        }
    }
}

impl std::fmt::Display for Relation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{{{} -> {}:", self.ref_res, self.res)?;
        for label in &self.labels {
            write!(f, " {label}")?;
        }
        if self.is(PropertyType::Pairing) {
            for (a, b) in &self.paired_faces {
                write!(f, " {a}/{b}")?;
            }
        }
        write!(f, "}}")
    }
}
