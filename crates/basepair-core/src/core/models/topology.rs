use crate::core::types::{AtomType, ResidueType};

/// Obligatory heavy atoms per residue type.
///
/// Validation demotes a residue whose obligatory set is incomplete;
/// everything outside the obligatory and optional sets is stripped by
/// `Residue::remove_optionals`. Phosphate atoms are optional because
/// 5'-terminal residues legitimately lack them.
const PURINE_RING: &[AtomType] = &[
    AtomType::N9,
    AtomType::C8,
    AtomType::N7,
    AtomType::C5,
    AtomType::C6,
    AtomType::N1,
    AtomType::C2,
    AtomType::N3,
    AtomType::C4,
];

const PYRIMIDINE_RING: &[AtomType] = &[
    AtomType::N1,
    AtomType::C2,
    AtomType::N3,
    AtomType::C4,
    AtomType::C5,
    AtomType::C6,
];

const SUGAR: &[AtomType] = &[
    AtomType::C1Prime,
    AtomType::C2Prime,
    AtomType::C3Prime,
    AtomType::C4Prime,
    AtomType::C5Prime,
    AtomType::O3Prime,
    AtomType::O4Prime,
    AtomType::O5Prime,
];

const AMINO_BACKBONE: &[AtomType] = &[AtomType::N, AtomType::CA, AtomType::C, AtomType::O];

/// Exocyclic heavy atoms per base.
fn exocyclic(res_type: ResidueType) -> &'static [AtomType] {
    match res_type {
        t if t.is_a() => &[AtomType::N6],
        t if t.is_c() => &[AtomType::O2, AtomType::N4],
        t if t.is_g() => &[AtomType::N2, AtomType::O6],
        t if t.is_u() => &[AtomType::O2, AtomType::O4],
        t if t.is_t() => &[AtomType::O2, AtomType::O4, AtomType::C5M],
        _ => &[],
    }
}

/// The obligatory atom set, empty for types without topology knowledge.
pub fn obligatory_atoms(res_type: ResidueType) -> Vec<AtomType> {
    let mut set = Vec::new();
    if res_type.is_nucleic_acid() {
        set.extend_from_slice(SUGAR);
        if res_type.is_rna() {
            set.push(AtomType::O2Prime);
        }
        if res_type.is_purine() {
            set.extend_from_slice(PURINE_RING);
        } else {
            set.extend_from_slice(PYRIMIDINE_RING);
        }
        set.extend_from_slice(exocyclic(res_type));
    } else if res_type.is_amino_acid() {
        set.extend_from_slice(AMINO_BACKBONE);
    } else if res_type.is_phosphate() {
        set.extend_from_slice(&[
            AtomType::P,
            AtomType::O1P,
            AtomType::O2P,
            AtomType::O5Prime,
            AtomType::O3Prime,
        ]);
    } else if res_type.is_ribose() {
        set.extend_from_slice(&[
            AtomType::C1Prime,
            AtomType::C2Prime,
            AtomType::C3Prime,
            AtomType::C4Prime,
            AtomType::C5Prime,
            AtomType::O4Prime,
        ]);
        if res_type.is_rna() {
            set.push(AtomType::O2Prime);
        }
    }
    set
}

/// True when the atom is allowed on the residue type without being
/// obligatory: phosphate group, hydrogens, lone pairs, pseudo-atoms, and the
/// terminal 3' hydroxyl.
pub fn is_optional_atom(res_type: ResidueType, atom_type: AtomType) -> bool {
    if atom_type.is_hydrogen() || atom_type.is_lone_pair() || atom_type.is_pseudo() {
        return true;
    }
    if res_type.is_nucleic_acid() {
        return matches!(
            atom_type,
            AtomType::P | AtomType::O1P | AtomType::O2P | AtomType::O3P
        );
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rna_purine_needs_sugar_ring_and_o2_prime() {
        let set = obligatory_atoms(ResidueType::RA);
        assert!(set.contains(&AtomType::O2Prime));
        assert!(set.contains(&AtomType::N9));
        assert!(set.contains(&AtomType::C1Prime));
        assert!(!set.contains(&AtomType::P));
    }

    #[test]
    fn dna_has_no_o2_prime() {
        let set = obligatory_atoms(ResidueType::DT);
        assert!(!set.contains(&AtomType::O2Prime));
        assert!(set.contains(&AtomType::C5M));
    }

    #[test]
    fn phosphate_group_is_optional_on_nucleotides() {
        assert!(is_optional_atom(ResidueType::RG, AtomType::P));
        assert!(is_optional_atom(ResidueType::RG, AtomType::H1));
        assert!(is_optional_atom(ResidueType::RG, AtomType::LP3));
        assert!(!is_optional_atom(ResidueType::RG, AtomType::N1));
    }
}
