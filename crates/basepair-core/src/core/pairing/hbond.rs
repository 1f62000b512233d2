use crate::core::geometry::angle;
use crate::core::models::{ResId, Residue};
use crate::core::types::AtomType;
use std::cmp::Ordering;

/// A hydrogen-bond candidate: the donor heavy atom and its hydrogen on one
/// residue, the acceptor heavy atom and its lone pair on the other.
///
/// Evaluation caches the score and records which residue carries the donor
/// group, so flow bookkeeping can later re-resolve atom positions.
#[derive(Debug, Clone, PartialEq)]
pub struct HBond {
    pub donor: AtomType,
    pub hydrogen: AtomType,
    pub acceptor: AtomType,
    pub lonepair: AtomType,
    value: f64,
    donor_res: Option<ResId>,
    acceptor_res: Option<ResId>,
}

/// Gaussian mixture over (H..LP distance, donor-side angle, acceptor-side
/// angle) scoring the plausibility that a candidate is a true base-pair
/// hydrogen bond. Seven components: six bond clusters of decreasing
/// strength, one broad background. Per component: mixture weight,
/// probability of a true bond, mean vector, diagonal inverse covariance.
const GAUSS_WEIGHT: [f64; 7] = [0.30, 0.15, 0.10, 0.10, 0.08, 0.07, 0.20];
const GAUSS_PROB_H: [f64; 7] = [1.00, 0.95, 0.90, 0.70, 0.50, 0.30, 0.005];
const GAUSS_MEAN: [[f64; 3]; 7] = [
    [1.00, 2.97, 2.97],
    [1.15, 2.80, 2.85],
    [0.90, 3.05, 2.75],
    [1.45, 2.55, 2.60],
    [1.80, 2.40, 2.40],
    [2.20, 2.30, 2.30],
    [3.00, 2.00, 2.00],
];
const GAUSS_COVAR_INV: [[f64; 3]; 7] = [
    [40.0, 8.0, 8.0],
    [25.0, 6.0, 6.0],
    [30.0, 7.0, 5.0],
    [12.0, 4.0, 4.0],
    [8.0, 3.0, 3.0],
    [5.0, 2.5, 2.5],
    [0.5, 0.8, 0.8],
];

impl HBond {
    pub fn new(donor: AtomType, hydrogen: AtomType, acceptor: AtomType, lonepair: AtomType) -> Self {
        HBond {
            donor,
            hydrogen,
            acceptor,
            lonepair,
            value: 0.0,
            donor_res: None,
            acceptor_res: None,
        }
    }

    /// Rebuilds a bond from serialized parts.
    pub(crate) fn from_parts(
        donor: AtomType,
        hydrogen: AtomType,
        acceptor: AtomType,
        lonepair: AtomType,
        value: f64,
        donor_res: Option<ResId>,
        acceptor_res: Option<ResId>,
    ) -> Self {
        HBond {
            donor,
            hydrogen,
            acceptor,
            lonepair,
            value,
            donor_res,
            acceptor_res,
        }
    }

    /// A source/sink capacity edge for the flow graph; carries no atoms.
    pub(crate) fn unit_capacity() -> Self {
        let mut h = HBond::new(AtomType::PSY, AtomType::PSY, AtomType::PSY, AtomType::PSY);
        h.value = 1.0;
        h
    }

    /// True for real candidates, false for source/sink capacity edges.
    pub fn has_atoms(&self) -> bool {
        self.donor != AtomType::PSY || self.acceptor != AtomType::PSY
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn donor_residue(&self) -> Option<ResId> {
        self.donor_res
    }

    pub fn acceptor_residue(&self) -> Option<ResId> {
        self.acceptor_res
    }

    pub(crate) fn set_residues(&mut self, donor_res: ResId, acceptor_res: ResId) {
        self.donor_res = Some(donor_res);
        self.acceptor_res = Some(acceptor_res);
    }

    /// Distance-based score in [0, 1]: full strength at the ideal
    /// hydrogen/lone-pair separation, decaying with excess distance.
    pub fn eval(&mut self, donor_res: &Residue, acceptor_res: &Residue) -> f64 {
        self.set_residues(donor_res.id(), acceptor_res.id());
        let (h, lp) = match (
            donor_res.find(self.hydrogen),
            acceptor_res.find(self.lonepair),
        ) {
            (Some(h), Some(lp)) => (h, lp),
            _ => {
                self.value = 0.0;
                return self.value;
            }
        };
        let excess = (h.distance(lp) - 1.0).max(0.0);
        self.value = (-0.5 * (excess / 0.8).powi(2)).exp();
        self.value
    }

    /// Statistical score in [0, 1]: posterior probability of a true
    /// base-pair hydrogen bond under the Gaussian mixture.
    pub fn eval_statistically(&mut self, donor_res: &Residue, acceptor_res: &Residue) -> f64 {
        self.set_residues(donor_res.id(), acceptor_res.id());
        let atoms = (
            donor_res.find(self.donor),
            donor_res.find(self.hydrogen),
            acceptor_res.find(self.acceptor),
            acceptor_res.find(self.lonepair),
        );
        let (d, h, a, lp) = match atoms {
            (Some(d), Some(h), Some(a), Some(lp)) => (d, h, a, lp),
            _ => {
                self.value = 0.0;
                return self.value;
            }
        };

        let features = [
            h.distance(lp),
            angle(&d.position, &h.position, &lp.position),
            angle(&a.position, &lp.position, &h.position),
        ];

        let mut total = 0.0;
        let mut bonded = 0.0;
        for k in 0..GAUSS_WEIGHT.len() {
            let mut quad = 0.0;
            let mut det = 1.0;
            for j in 0..3 {
                let delta = features[j] - GAUSS_MEAN[k][j];
                quad += delta * delta * GAUSS_COVAR_INV[k][j];
                det *= GAUSS_COVAR_INV[k][j];
            }
            let density = det.sqrt() * (-0.5 * quad).exp();
            total += GAUSS_WEIGHT[k] * density;
            bonded += GAUSS_WEIGHT[k] * GAUSS_PROB_H[k] * density;
        }

        self.value = if total > 0.0 { bonded / total } else { 0.0 };
        self.value
    }
}

/// A hydrogen bond with the flow assigned to it by the bipartite matcher.
#[derive(Debug, Clone, PartialEq)]
pub struct HBondFlow {
    pub hbond: HBond,
    pub flow: f64,
}

impl HBondFlow {
    pub fn new(hbond: HBond, flow: f64) -> Self {
        HBondFlow { hbond, flow }
    }
}

impl PartialOrd for HBondFlow {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.flow.partial_cmp(&other.flow)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::Atom;
    use crate::core::types::ResidueType;
    use nalgebra::Point3;

    /// Two synthetic residues holding a donor group and an acceptor group
    /// in a near-ideal linear arrangement along X.
    fn ideal_pair() -> (Residue, Residue) {
        let mut donor = Residue::new(ResidueType::RG, ResId::new('A', 1));
        donor.insert(Atom::from_coords(0.0, 0.0, 0.0, AtomType::N1));
        donor.insert(Atom::from_coords(1.01, 0.0, 0.0, AtomType::H1));

        let mut acceptor = Residue::new(ResidueType::RC, ResId::new('B', 1));
        acceptor.insert(Atom::from_coords(2.95, 0.0, 0.0, AtomType::N3));
        acceptor.insert(Atom::from_coords(1.95, 0.0, 0.0, AtomType::LP3));
        (donor, acceptor)
    }

    #[test]
    fn ideal_geometry_scores_high() {
        let (donor_res, acceptor_res) = ideal_pair();
        let mut bond = HBond::new(AtomType::N1, AtomType::H1, AtomType::N3, AtomType::LP3);
        let score = bond.eval_statistically(&donor_res, &acceptor_res);
        assert!(score > 0.9, "score = {score}");
        assert_eq!(bond.value(), score);
        assert_eq!(bond.donor_residue(), Some(ResId::new('A', 1)));
    }

    #[test]
    fn distant_geometry_is_rejected() {
        let (donor_res, mut acceptor_res) = ideal_pair();
        acceptor_res.insert(Atom::from_coords(8.0, 0.0, 0.0, AtomType::N3));
        acceptor_res.insert(Atom::from_coords(7.0, 0.0, 0.0, AtomType::LP3));
        let mut bond = HBond::new(AtomType::N1, AtomType::H1, AtomType::N3, AtomType::LP3);
        let score = bond.eval_statistically(&donor_res, &acceptor_res);
        assert!(score < 0.01, "score = {score}");
    }

    #[test]
    fn missing_atoms_score_zero() {
        let (donor_res, acceptor_res) = ideal_pair();
        let mut bond = HBond::new(AtomType::N2, AtomType::H21, AtomType::N3, AtomType::LP3);
        assert_eq!(bond.eval_statistically(&donor_res, &acceptor_res), 0.0);
    }

    #[test]
    fn simple_eval_decays_with_distance() {
        let (donor_res, acceptor_res) = ideal_pair();
        let mut near = HBond::new(AtomType::N1, AtomType::H1, AtomType::N3, AtomType::LP3);
        let near_score = near.eval(&donor_res, &acceptor_res);

        let (donor_res, mut far_res) = ideal_pair();
        far_res.insert(Atom::from_coords(4.5, 0.0, 0.0, AtomType::LP3));
        let mut far = HBond::new(AtomType::N1, AtomType::H1, AtomType::N3, AtomType::LP3);
        let far_score = far.eval(&donor_res, &far_res);

        assert!(near_score > far_score);
        assert!((0.0..=1.0).contains(&near_score));
        assert!((0.0..=1.0).contains(&far_score));
    }

    #[test]
    fn flows_order_by_flow_value() {
        let bond = HBond::new(AtomType::N1, AtomType::H1, AtomType::N3, AtomType::LP3);
        let mut flows = vec![
            HBondFlow::new(bond.clone(), 0.9),
            HBondFlow::new(bond.clone(), 0.2),
            HBondFlow::new(bond, 0.6),
        ];
        flows.sort_by(|a, b| a.partial_cmp(b).unwrap());
        let ordered: Vec<f64> = flows.iter().map(|f| f.flow).collect();
        assert_eq!(ordered, vec![0.2, 0.6, 0.9]);
    }
}
