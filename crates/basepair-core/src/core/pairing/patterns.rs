use super::hbond::HBondFlow;
use crate::core::models::Residue;
use crate::core::types::{AtomType, PropertyType, ResidueType};
use std::sync::LazyLock;

/// Base identity a pattern side requires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Base {
    A,
    C,
    G,
    U,
    T,
}

impl Base {
    fn matches(self, res_type: ResidueType) -> bool {
        match self {
            Base::A => res_type.is_a(),
            Base::C => res_type.is_c(),
            Base::G => res_type.is_g(),
            Base::U => res_type.is_u(),
            Base::T => res_type.is_t(),
        }
    }
}

/// One characteristic hydrogen bond of a pattern, directed from donor to
/// acceptor.
#[derive(Debug, Clone, Copy)]
struct PatternBond {
    donor_is_ref: bool,
    donor: AtomType,
    acceptor: AtomType,
}

/// A named base-pairing pattern: the required base identities, the base
/// plane orientation, and the characteristic bonds that must all be present
/// in the flow list for the pattern to match.
#[derive(Debug, Clone)]
pub struct PairingPattern {
    tag: PropertyType,
    ref_base: Base,
    res_base: Base,
    orientation: PropertyType,
    bonds: Vec<PatternBond>,
}

impl PairingPattern {
    fn new(
        tag: PropertyType,
        ref_base: Base,
        res_base: Base,
        orientation: PropertyType,
        bonds: Vec<(bool, AtomType, AtomType)>,
    ) -> Self {
        PairingPattern {
            tag,
            ref_base,
            res_base,
            orientation,
            bonds: bonds
                .into_iter()
                .map(|(donor_is_ref, donor, acceptor)| PatternBond {
                    donor_is_ref,
                    donor,
                    acceptor,
                })
                .collect(),
        }
    }

    /// The mirrored pattern, seen from the other residue.
    fn swapped(&self) -> Self {
        PairingPattern {
            tag: self.tag,
            ref_base: self.res_base,
            res_base: self.ref_base,
            orientation: self.orientation,
            bonds: self
                .bonds
                .iter()
                .map(|b| PatternBond {
                    donor_is_ref: !b.donor_is_ref,
                    ..*b
                })
                .collect(),
        }
    }

    pub fn size(&self) -> usize {
        self.bonds.len()
    }

    pub fn tag(&self) -> PropertyType {
        self.tag
    }

    /// Matches when the residue identities and orientation agree and every
    /// characteristic bond appears in the flow list on the right side.
    pub fn evaluate(
        &self,
        ref_res: &Residue,
        res: &Residue,
        orientation: PropertyType,
        flows: &[HBondFlow],
    ) -> Option<PropertyType> {
        if !self.ref_base.matches(ref_res.res_type())
            || !self.res_base.matches(res.res_type())
            || self.orientation != orientation
        {
            return None;
        }

        let found = |bond: &PatternBond| {
            flows.iter().any(|hbf| {
                let donor_side = if bond.donor_is_ref {
                    ref_res.id()
                } else {
                    res.id()
                };
                hbf.hbond.donor == bond.donor
                    && hbf.hbond.acceptor == bond.acceptor
                    && hbf.hbond.donor_residue() == Some(donor_side)
            })
        };
        self.bonds.iter().all(found).then_some(self.tag)
    }
}

/// The pattern catalog: canonical Watson-Crick pairs, the wobble pair, and
/// the frequent Hoogsteen and homo-purine/pyrimidine pairs, each registered
/// in both orientations. Built once, read-only afterwards.
static CATALOG: LazyLock<Vec<PairingPattern>> = LazyLock::new(|| {
    use AtomType::*;
    use PropertyType::{Antiparallel, Parallel};

    let seeds = vec![
        // G=C Watson-Crick, three bonds.
        PairingPattern::new(
            PropertyType::SaengerXIX,
            Base::G,
            Base::C,
            Antiparallel,
            vec![(true, N1, N3), (true, N2, O2), (false, N4, O6)],
        ),
        // A=U and A=T Watson-Crick.
        PairingPattern::new(
            PropertyType::SaengerXX,
            Base::A,
            Base::U,
            Antiparallel,
            vec![(true, N6, O4), (false, N3, N1)],
        ),
        PairingPattern::new(
            PropertyType::SaengerXX,
            Base::A,
            Base::T,
            Antiparallel,
            vec![(true, N6, O4), (false, N3, N1)],
        ),
        // Reverse Watson-Crick (parallel strands).
        PairingPattern::new(
            PropertyType::SaengerXXI,
            Base::A,
            Base::U,
            Parallel,
            vec![(true, N6, O2), (false, N3, N1)],
        ),
        PairingPattern::new(
            PropertyType::SaengerXXII,
            Base::G,
            Base::C,
            Parallel,
            vec![(true, N1, O2), (false, N4, O6)],
        ),
        // A=U Hoogsteen.
        PairingPattern::new(
            PropertyType::SaengerXXIII,
            Base::A,
            Base::U,
            Antiparallel,
            vec![(true, N6, O4), (false, N3, N7)],
        ),
        // G=U wobble.
        PairingPattern::new(
            PropertyType::SaengerXXVIII,
            Base::G,
            Base::U,
            Antiparallel,
            vec![(true, N1, O2), (false, N3, O6)],
        ),
        // G=A imino.
        PairingPattern::new(
            PropertyType::SaengerVIII,
            Base::G,
            Base::A,
            Antiparallel,
            vec![(true, N1, N1), (false, N6, O6)],
        ),
        // Symmetric homo pairs.
        PairingPattern::new(
            PropertyType::SaengerXI,
            Base::G,
            Base::G,
            Antiparallel,
            vec![(true, N1, O6), (false, N1, O6)],
        ),
        PairingPattern::new(
            PropertyType::SaengerI,
            Base::A,
            Base::A,
            Parallel,
            vec![(true, N6, N1), (false, N6, N1)],
        ),
        PairingPattern::new(
            PropertyType::SaengerV,
            Base::A,
            Base::A,
            Antiparallel,
            vec![(true, N6, N7), (false, N6, N7)],
        ),
        PairingPattern::new(
            PropertyType::SaengerXII,
            Base::U,
            Base::U,
            Antiparallel,
            vec![(true, N3, O4), (false, N3, O4)],
        ),
    ];

    let mut catalog = Vec::with_capacity(seeds.len() * 2);
    for pattern in seeds {
        let swapped = pattern.swapped();
        catalog.push(pattern);
        catalog.push(swapped);
    }
    catalog
});

/// Looks up the pair-type tag for an annotated pair: among the catalog
/// entries no larger than `size_hint` whose bonds are all present in the
/// flow list, the largest one wins.
pub fn translate_pairing(
    ref_res: &Residue,
    res: &Residue,
    orientation: PropertyType,
    flows: &[HBondFlow],
    size_hint: usize,
) -> Option<PropertyType> {
    let mut best: Option<(usize, PropertyType)> = None;
    for pattern in CATALOG.iter() {
        if pattern.size() > size_hint {
            continue;
        }
        if let Some(tag) = pattern.evaluate(ref_res, res, orientation, flows) {
            if best.map_or(true, |(size, _)| pattern.size() > size) {
                best = Some((pattern.size(), tag));
            }
        }
    }
    best.map(|(_, tag)| tag)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::ResId;
    use crate::core::pairing::hbond::HBond;

    fn flow(
        donor_res: &Residue,
        acceptor_res: &Residue,
        donor: AtomType,
        hydrogen: AtomType,
        acceptor: AtomType,
        lonepair: AtomType,
    ) -> HBondFlow {
        let mut hbond = HBond::new(donor, hydrogen, acceptor, lonepair);
        hbond.set_residues(donor_res.id(), acceptor_res.id());
        HBondFlow::new(hbond, 1.0)
    }

    fn residue(res_type: ResidueType, chain: char) -> Residue {
        Residue::new(res_type, ResId::new(chain, 1))
    }

    #[test]
    fn watson_crick_gc_matches_the_three_bond_pattern() {
        let g = residue(ResidueType::RG, 'A');
        let c = residue(ResidueType::RC, 'B');
        let flows = vec![
            flow(&g, &c, AtomType::N1, AtomType::H1, AtomType::N3, AtomType::LP3),
            flow(&g, &c, AtomType::N2, AtomType::H21, AtomType::O2, AtomType::LP21),
            flow(&c, &g, AtomType::N4, AtomType::H41, AtomType::O6, AtomType::LP61),
        ];

        let tag = translate_pairing(&g, &c, PropertyType::Antiparallel, &flows, 3);
        assert_eq!(tag, Some(PropertyType::SaengerXIX));
    }

    #[test]
    fn swapped_direction_matches_the_mirrored_entry() {
        let g = residue(ResidueType::RG, 'A');
        let c = residue(ResidueType::RC, 'B');
        let flows = vec![
            flow(&g, &c, AtomType::N1, AtomType::H1, AtomType::N3, AtomType::LP3),
            flow(&g, &c, AtomType::N2, AtomType::H21, AtomType::O2, AtomType::LP21),
            flow(&c, &g, AtomType::N4, AtomType::H41, AtomType::O6, AtomType::LP61),
        ];

        let tag = translate_pairing(&c, &g, PropertyType::Antiparallel, &flows, 3);
        assert_eq!(tag, Some(PropertyType::SaengerXIX));
    }

    #[test]
    fn size_hint_caps_the_candidate_patterns() {
        let g = residue(ResidueType::RG, 'A');
        let c = residue(ResidueType::RC, 'B');
        let flows = vec![
            flow(&g, &c, AtomType::N1, AtomType::H1, AtomType::N3, AtomType::LP3),
            flow(&g, &c, AtomType::N2, AtomType::H21, AtomType::O2, AtomType::LP21),
            flow(&c, &g, AtomType::N4, AtomType::H41, AtomType::O6, AtomType::LP61),
        ];

        // With a hint of two, the three-bond Watson-Crick entry is skipped.
        let tag = translate_pairing(&g, &c, PropertyType::Antiparallel, &flows, 2);
        assert_ne!(tag, Some(PropertyType::SaengerXIX));
    }

    #[test]
    fn wobble_gu_matches() {
        let g = residue(ResidueType::RG, 'A');
        let u = residue(ResidueType::RU, 'B');
        let flows = vec![
            flow(&g, &u, AtomType::N1, AtomType::H1, AtomType::O2, AtomType::LP21),
            flow(&u, &g, AtomType::N3, AtomType::H3, AtomType::O6, AtomType::LP61),
        ];
        let tag = translate_pairing(&g, &u, PropertyType::Antiparallel, &flows, 2);
        assert_eq!(tag, Some(PropertyType::SaengerXXVIII));
    }

    #[test]
    fn orientation_mismatch_rejects() {
        let g = residue(ResidueType::RG, 'A');
        let u = residue(ResidueType::RU, 'B');
        let flows = vec![
            flow(&g, &u, AtomType::N1, AtomType::H1, AtomType::O2, AtomType::LP21),
            flow(&u, &g, AtomType::N3, AtomType::H3, AtomType::O6, AtomType::LP61),
        ];
        let tag = translate_pairing(&g, &u, PropertyType::Parallel, &flows, 2);
        assert_eq!(tag, None);
    }
}
