use serde::{Deserialize, Serialize};
use std::fmt;

/// Atom tags for nucleic acid and amino acid residues.
///
/// Covers the heavy atoms of the standard bases and the ribose/phosphate
/// backbone, the hydrogens and lone pairs placed by the core, the
/// pseudo-atoms used to define residue referentials, and the minimal amino
/// acid set needed for peptide adjacency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[allow(clippy::upper_case_acronyms)]
pub enum AtomType {
    // --- Backbone & sugar ---
    P,
    O1P,
    O2P,
    /// Alternate name for O3' seen in some coordinate files; renamed or
    /// dropped by `Residue::validate`.
    O3P,
    O5Prime,
    C5Prime,
    C4Prime,
    O4Prime,
    C3Prime,
    O3Prime,
    C2Prime,
    O2Prime,
    C1Prime,

    // --- Base heavy atoms ---
    N1,
    C2,
    N2,
    O2,
    N3,
    C4,
    N4,
    O4,
    C5,
    C5M,
    C6,
    N6,
    O6,
    N7,
    C8,
    N9,

    // --- Base hydrogens ---
    H1,
    H2,
    H3,
    H5,
    H6,
    H8,
    H21,
    H22,
    H41,
    H42,
    H61,
    H62,
    H5M1,
    H5M2,
    H5M3,

    // --- Sugar hydrogens ---
    H1Prime,
    H2Prime,
    H2Prime1,
    H2Prime2,
    H3Prime,
    H4Prime,
    H5Prime1,
    H5Prime2,
    HO2Prime,
    HO3Prime,

    // --- Lone pairs ---
    LP1,
    LP3,
    LP7,
    LP21,
    LP22,
    LP41,
    LP42,
    LP61,
    LP62,

    // --- Pseudo-atoms (referential pivots) ---
    PSY,
    PSZ,
    PSAZ,

    // --- Amino acid backbone ---
    CA,
    N,
    C,
    O,
    H,
}

static ATOM_TYPES: phf::Map<&'static str, AtomType> = phf::phf_map! {
    "P" => AtomType::P,
    "O1P" => AtomType::O1P,
    "OP1" => AtomType::O1P,
    "O2P" => AtomType::O2P,
    "OP2" => AtomType::O2P,
    "O3P" => AtomType::O3P,
    "OP3" => AtomType::O3P,
    "O5'" => AtomType::O5Prime,
    "O5*" => AtomType::O5Prime,
    "C5'" => AtomType::C5Prime,
    "C5*" => AtomType::C5Prime,
    "C4'" => AtomType::C4Prime,
    "C4*" => AtomType::C4Prime,
    "O4'" => AtomType::O4Prime,
    "O4*" => AtomType::O4Prime,
    "C3'" => AtomType::C3Prime,
    "C3*" => AtomType::C3Prime,
    "O3'" => AtomType::O3Prime,
    "O3*" => AtomType::O3Prime,
    "C2'" => AtomType::C2Prime,
    "C2*" => AtomType::C2Prime,
    "O2'" => AtomType::O2Prime,
    "O2*" => AtomType::O2Prime,
    "C1'" => AtomType::C1Prime,
    "C1*" => AtomType::C1Prime,
    "N1" => AtomType::N1,
    "C2" => AtomType::C2,
    "N2" => AtomType::N2,
    "O2" => AtomType::O2,
    "N3" => AtomType::N3,
    "C4" => AtomType::C4,
    "N4" => AtomType::N4,
    "O4" => AtomType::O4,
    "C5" => AtomType::C5,
    "C5M" => AtomType::C5M,
    "C7" => AtomType::C5M,
    "C6" => AtomType::C6,
    "N6" => AtomType::N6,
    "O6" => AtomType::O6,
    "N7" => AtomType::N7,
    "C8" => AtomType::C8,
    "N9" => AtomType::N9,
    "H1" => AtomType::H1,
    "H2" => AtomType::H2,
    "H3" => AtomType::H3,
    "H5" => AtomType::H5,
    "H6" => AtomType::H6,
    "H8" => AtomType::H8,
    "H21" => AtomType::H21,
    "1H2" => AtomType::H21,
    "H22" => AtomType::H22,
    "2H2" => AtomType::H22,
    "H41" => AtomType::H41,
    "1H4" => AtomType::H41,
    "H42" => AtomType::H42,
    "2H4" => AtomType::H42,
    "H61" => AtomType::H61,
    "1H6" => AtomType::H61,
    "H62" => AtomType::H62,
    "2H6" => AtomType::H62,
    "H5M1" => AtomType::H5M1,
    "1H5M" => AtomType::H5M1,
    "H71" => AtomType::H5M1,
    "H5M2" => AtomType::H5M2,
    "2H5M" => AtomType::H5M2,
    "H72" => AtomType::H5M2,
    "H5M3" => AtomType::H5M3,
    "3H5M" => AtomType::H5M3,
    "H73" => AtomType::H5M3,
    "H1'" => AtomType::H1Prime,
    "H1*" => AtomType::H1Prime,
    "H2'" => AtomType::H2Prime,
    "H2*" => AtomType::H2Prime,
    "H2'1" => AtomType::H2Prime1,
    "1H2'" => AtomType::H2Prime1,
    "1H2*" => AtomType::H2Prime1,
    "H2'2" => AtomType::H2Prime2,
    "2H2'" => AtomType::H2Prime2,
    "2H2*" => AtomType::H2Prime2,
    "H3'" => AtomType::H3Prime,
    "H3*" => AtomType::H3Prime,
    "H4'" => AtomType::H4Prime,
    "H4*" => AtomType::H4Prime,
    "H5'" => AtomType::H5Prime1,
    "1H5'" => AtomType::H5Prime1,
    "1H5*" => AtomType::H5Prime1,
    "H5''" => AtomType::H5Prime2,
    "2H5'" => AtomType::H5Prime2,
    "2H5*" => AtomType::H5Prime2,
    "HO2'" => AtomType::HO2Prime,
    "HO2*" => AtomType::HO2Prime,
    "2HO'" => AtomType::HO2Prime,
    "HO3'" => AtomType::HO3Prime,
    "HO3*" => AtomType::HO3Prime,
    "LP1" => AtomType::LP1,
    "LP3" => AtomType::LP3,
    "LP7" => AtomType::LP7,
    "LP21" => AtomType::LP21,
    "1LP2" => AtomType::LP21,
    "LP22" => AtomType::LP22,
    "2LP2" => AtomType::LP22,
    "LP41" => AtomType::LP41,
    "1LP4" => AtomType::LP41,
    "LP42" => AtomType::LP42,
    "2LP4" => AtomType::LP42,
    "LP61" => AtomType::LP61,
    "1LP6" => AtomType::LP61,
    "LP62" => AtomType::LP62,
    "2LP6" => AtomType::LP62,
    "PSY" => AtomType::PSY,
    "PSZ" => AtomType::PSZ,
    "PSAZ" => AtomType::PSAZ,
    "CA" => AtomType::CA,
    "N" => AtomType::N,
    "C" => AtomType::C,
    "O" => AtomType::O,
    "H" => AtomType::H,
};

/// Returns the canonical interned tag for a string key, or `None` for an
/// unrecognized key. Both PDB-v3 prime names (`O2'`) and legacy star names
/// (`O2*`) are accepted; the same tag value is returned for every parse of
/// the same key.
pub fn parse_atom_type(s: &str) -> Option<AtomType> {
    ATOM_TYPES.get(s.trim()).copied()
}

impl AtomType {
    /// Canonical string key for this tag.
    pub fn key(self) -> &'static str {
        use AtomType::*;
        match self {
            P => "P",
            O1P => "O1P",
            O2P => "O2P",
            O3P => "O3P",
            O5Prime => "O5'",
            C5Prime => "C5'",
            C4Prime => "C4'",
            O4Prime => "O4'",
            C3Prime => "C3'",
            O3Prime => "O3'",
            C2Prime => "C2'",
            O2Prime => "O2'",
            C1Prime => "C1'",
            N1 => "N1",
            C2 => "C2",
            N2 => "N2",
            O2 => "O2",
            N3 => "N3",
            C4 => "C4",
            N4 => "N4",
            O4 => "O4",
            C5 => "C5",
            C5M => "C5M",
            C6 => "C6",
            N6 => "N6",
            O6 => "O6",
            N7 => "N7",
            C8 => "C8",
            N9 => "N9",
            H1 => "H1",
            H2 => "H2",
            H3 => "H3",
            H5 => "H5",
            H6 => "H6",
            H8 => "H8",
            H21 => "H21",
            H22 => "H22",
            H41 => "H41",
            H42 => "H42",
            H61 => "H61",
            H62 => "H62",
            H5M1 => "H5M1",
            H5M2 => "H5M2",
            H5M3 => "H5M3",
            H1Prime => "H1'",
            H2Prime => "H2'",
            H2Prime1 => "H2'1",
            H2Prime2 => "H2'2",
            H3Prime => "H3'",
            H4Prime => "H4'",
            H5Prime1 => "H5'",
            H5Prime2 => "H5''",
            HO2Prime => "HO2'",
            HO3Prime => "HO3'",
            LP1 => "LP1",
            LP3 => "LP3",
            LP7 => "LP7",
            LP21 => "LP21",
            LP22 => "LP22",
            LP41 => "LP41",
            LP42 => "LP42",
            LP61 => "LP61",
            LP62 => "LP62",
            PSY => "PSY",
            PSZ => "PSZ",
            PSAZ => "PSAZ",
            CA => "CA",
            N => "N",
            C => "C",
            O => "O",
            H => "H",
        }
    }

    pub fn is_hydrogen(self) -> bool {
        use AtomType::*;
        matches!(
            self,
            H1 | H2
                | H3
                | H5
                | H6
                | H8
                | H21
                | H22
                | H41
                | H42
                | H61
                | H62
                | H5M1
                | H5M2
                | H5M3
                | H1Prime
                | H2Prime
                | H2Prime1
                | H2Prime2
                | H3Prime
                | H4Prime
                | H5Prime1
                | H5Prime2
                | HO2Prime
                | HO3Prime
                | H
        )
    }

    pub fn is_lone_pair(self) -> bool {
        use AtomType::*;
        matches!(self, LP1 | LP3 | LP7 | LP21 | LP22 | LP41 | LP42 | LP61 | LP62)
    }

    pub fn is_pseudo(self) -> bool {
        matches!(self, AtomType::PSY | AtomType::PSZ | AtomType::PSAZ)
    }

    pub fn is_carbon(self) -> bool {
        use AtomType::*;
        matches!(
            self,
            C1Prime | C2Prime | C3Prime | C4Prime | C5Prime | C2 | C4 | C5 | C5M | C6 | C8 | CA | C
        )
    }

    pub fn is_nitrogen(self) -> bool {
        use AtomType::*;
        matches!(self, N1 | N2 | N3 | N4 | N6 | N7 | N9 | N)
    }

    pub fn is_oxygen(self) -> bool {
        use AtomType::*;
        matches!(
            self,
            O1P | O2P | O3P | O2Prime | O3Prime | O4Prime | O5Prime | O2 | O4 | O6 | O
        )
    }

    pub fn is_phosphorus(self) -> bool {
        self == AtomType::P
    }

    /// Phosphodiester and sugar atoms, their hydrogens, and the amino acid
    /// main chain. Everything that is not part of a side chain, a lone pair,
    /// or a pseudo-atom.
    pub fn is_backbone(self) -> bool {
        use AtomType::*;
        matches!(
            self,
            P | O1P
                | O2P
                | O3P
                | O5Prime
                | C5Prime
                | C4Prime
                | O4Prime
                | C3Prime
                | O3Prime
                | C2Prime
                | O2Prime
                | C1Prime
                | H1Prime
                | H2Prime
                | H2Prime1
                | H2Prime2
                | H3Prime
                | H4Prime
                | H5Prime1
                | H5Prime2
                | HO2Prime
                | HO3Prime
                | CA
                | N
                | C
                | O
                | H
        )
    }

    /// Base atoms together with their hydrogens and lone pairs.
    pub fn is_side_chain(self) -> bool {
        !self.is_backbone() && !self.is_pseudo()
    }

    /// Member of a nucleic acid residue (standard bases and backbone).
    pub fn is_nucleic_acid(self) -> bool {
        use AtomType::*;
        !matches!(self, CA | N | C | O | H | PSAZ)
    }

    pub fn is_amino_acid(self) -> bool {
        use AtomType::*;
        matches!(self, CA | N | C | O | H | PSAZ)
    }
}

impl fmt::Display for AtomType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_returns_identical_tag_for_repeated_calls() {
        let a = parse_atom_type("C1'").unwrap();
        let b = parse_atom_type("C1'").unwrap();
        assert_eq!(a, b);
        assert_eq!(a, AtomType::C1Prime);
    }

    #[test]
    fn star_and_prime_names_intern_to_the_same_tag() {
        assert_eq!(parse_atom_type("O2*"), parse_atom_type("O2'"));
        assert_eq!(parse_atom_type("1H5M"), parse_atom_type("H5M1"));
        assert_eq!(parse_atom_type("2LP6"), parse_atom_type("LP62"));
    }

    #[test]
    fn unknown_key_does_not_parse() {
        assert!(parse_atom_type("XX9").is_none());
    }

    #[test]
    fn canonical_keys_round_trip() {
        for key in ["P", "O2'", "N9", "H61", "LP21", "PSY", "CA"] {
            let t = parse_atom_type(key).unwrap();
            assert_eq!(parse_atom_type(t.key()), Some(t));
        }
    }

    #[test]
    fn backbone_and_side_chain_partition_non_pseudo_atoms() {
        assert!(AtomType::P.is_backbone());
        assert!(AtomType::O2Prime.is_backbone());
        assert!(AtomType::H5Prime2.is_backbone());
        assert!(AtomType::N1.is_side_chain());
        assert!(AtomType::H61.is_side_chain());
        assert!(AtomType::LP7.is_side_chain());
        assert!(!AtomType::PSY.is_backbone());
        assert!(!AtomType::PSY.is_side_chain());
    }

    #[test]
    fn element_predicates_are_disjoint() {
        for t in [
            AtomType::C1Prime,
            AtomType::N9,
            AtomType::O6,
            AtomType::P,
            AtomType::H8,
            AtomType::LP1,
            AtomType::PSZ,
        ] {
            let classes = [
                t.is_carbon(),
                t.is_nitrogen(),
                t.is_oxygen(),
                t.is_phosphorus(),
                t.is_hydrogen(),
                t.is_lone_pair(),
                t.is_pseudo(),
            ];
            assert_eq!(classes.iter().filter(|&&c| c).count(), 1, "{t}");
        }
    }
}
