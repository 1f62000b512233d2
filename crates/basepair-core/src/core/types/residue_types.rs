use serde::{Deserialize, Serialize};
use std::fmt;

/// Residue tags.
///
/// Nucleic acid residues carry the RNA/DNA distinction needed by the ribose
/// builder (DNA lacks O2'); the standalone `Phosphate` and ribose tags name
/// the partial residues used as adjacency/conformation helpers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ResidueType {
    // --- Ribonucleotides ---
    RA,
    RC,
    RG,
    RU,

    // --- Deoxyribonucleotides ---
    DA,
    DC,
    DG,
    DT,

    // --- Partial nucleic acid residues ---
    Phosphate,
    RRibose,
    DRibose,

    // --- Amino acids ---
    Alanine,
    Arginine,
    Asparagine,
    AsparticAcid,
    Cysteine,
    GlutamicAcid,
    Glutamine,
    Glycine,
    Histidine,
    Isoleucine,
    Leucine,
    Lysine,
    Methionine,
    Phenylalanine,
    Proline,
    Serine,
    Threonine,
    Tryptophan,
    Tyrosine,
    Valine,

    // --- Other ---
    Water,
    /// A residue whose obligatory atoms failed validation, or an unparsed
    /// type.
    Invalid,
}

static RESIDUE_TYPES: phf::Map<&'static str, ResidueType> = phf::phf_map! {
    "A" => ResidueType::RA,
    "RA" => ResidueType::RA,
    "C" => ResidueType::RC,
    "RC" => ResidueType::RC,
    "G" => ResidueType::RG,
    "RG" => ResidueType::RG,
    "U" => ResidueType::RU,
    "RU" => ResidueType::RU,
    "DA" => ResidueType::DA,
    "DC" => ResidueType::DC,
    "DG" => ResidueType::DG,
    "DT" => ResidueType::DT,
    "T" => ResidueType::DT,
    "PO4" => ResidueType::Phosphate,
    "RIB" => ResidueType::RRibose,
    "DRIB" => ResidueType::DRibose,
    "ALA" => ResidueType::Alanine,
    "ARG" => ResidueType::Arginine,
    "ASN" => ResidueType::Asparagine,
    "ASP" => ResidueType::AsparticAcid,
    "CYS" => ResidueType::Cysteine,
    "GLU" => ResidueType::GlutamicAcid,
    "GLN" => ResidueType::Glutamine,
    "GLY" => ResidueType::Glycine,
    "HIS" => ResidueType::Histidine,
    "ILE" => ResidueType::Isoleucine,
    "LEU" => ResidueType::Leucine,
    "LYS" => ResidueType::Lysine,
    "MET" => ResidueType::Methionine,
    "PHE" => ResidueType::Phenylalanine,
    "PRO" => ResidueType::Proline,
    "SER" => ResidueType::Serine,
    "THR" => ResidueType::Threonine,
    "TRP" => ResidueType::Tryptophan,
    "TYR" => ResidueType::Tyrosine,
    "VAL" => ResidueType::Valine,
    "HOH" => ResidueType::Water,
    "WAT" => ResidueType::Water,
    "UNK" => ResidueType::Invalid,
};

/// Returns the canonical interned tag for a string key, or `None` for an
/// unrecognized key.
pub fn parse_residue_type(s: &str) -> Option<ResidueType> {
    RESIDUE_TYPES.get(s.trim().to_uppercase().as_str()).copied()
}

impl ResidueType {
    /// Canonical string key for this tag.
    pub fn key(self) -> &'static str {
        use ResidueType::*;
        match self {
            RA => "RA",
            RC => "RC",
            RG => "RG",
            RU => "RU",
            DA => "DA",
            DC => "DC",
            DG => "DG",
            DT => "DT",
            Phosphate => "PO4",
            RRibose => "RIB",
            DRibose => "DRIB",
            Alanine => "ALA",
            Arginine => "ARG",
            Asparagine => "ASN",
            AsparticAcid => "ASP",
            Cysteine => "CYS",
            GlutamicAcid => "GLU",
            Glutamine => "GLN",
            Glycine => "GLY",
            Histidine => "HIS",
            Isoleucine => "ILE",
            Leucine => "LEU",
            Lysine => "LYS",
            Methionine => "MET",
            Phenylalanine => "PHE",
            Proline => "PRO",
            Serine => "SER",
            Threonine => "THR",
            Tryptophan => "TRP",
            Tyrosine => "TYR",
            Valine => "VAL",
            Water => "HOH",
            Invalid => "UNK",
        }
    }

    pub fn is_rna(self) -> bool {
        use ResidueType::*;
        matches!(self, RA | RC | RG | RU | RRibose)
    }

    pub fn is_dna(self) -> bool {
        use ResidueType::*;
        matches!(self, DA | DC | DG | DT | DRibose)
    }

    /// A base-carrying nucleic acid residue (the partial phosphate/ribose
    /// helpers are excluded).
    pub fn is_nucleic_acid(self) -> bool {
        use ResidueType::*;
        matches!(self, RA | RC | RG | RU | DA | DC | DG | DT)
    }

    pub fn is_amino_acid(self) -> bool {
        use ResidueType::*;
        matches!(
            self,
            Alanine
                | Arginine
                | Asparagine
                | AsparticAcid
                | Cysteine
                | GlutamicAcid
                | Glutamine
                | Glycine
                | Histidine
                | Isoleucine
                | Leucine
                | Lysine
                | Methionine
                | Phenylalanine
                | Proline
                | Serine
                | Threonine
                | Tryptophan
                | Tyrosine
                | Valine
        )
    }

    pub fn is_phosphate(self) -> bool {
        self == ResidueType::Phosphate
    }

    pub fn is_ribose(self) -> bool {
        matches!(self, ResidueType::RRibose | ResidueType::DRibose)
    }

    pub fn is_water(self) -> bool {
        self == ResidueType::Water
    }

    pub fn is_a(self) -> bool {
        matches!(self, ResidueType::RA | ResidueType::DA)
    }

    pub fn is_c(self) -> bool {
        matches!(self, ResidueType::RC | ResidueType::DC)
    }

    pub fn is_g(self) -> bool {
        matches!(self, ResidueType::RG | ResidueType::DG)
    }

    pub fn is_u(self) -> bool {
        self == ResidueType::RU
    }

    pub fn is_t(self) -> bool {
        self == ResidueType::DT
    }

    pub fn is_purine(self) -> bool {
        self.is_a() || self.is_g()
    }

    pub fn is_pyrimidine(self) -> bool {
        self.is_c() || self.is_u() || self.is_t()
    }

    /// The tag a residue is demoted to when validation finds an obligatory
    /// atom missing.
    pub fn invalidate(self) -> ResidueType {
        ResidueType::Invalid
    }
}

impl fmt::Display for ResidueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_returns_identical_tag_for_repeated_calls() {
        assert_eq!(parse_residue_type("G"), parse_residue_type("rg"));
        assert_eq!(parse_residue_type("G"), Some(ResidueType::RG));
    }

    #[test]
    fn purine_pyrimidine_split_covers_all_bases() {
        for t in [ResidueType::RA, ResidueType::RG, ResidueType::DA, ResidueType::DG] {
            assert!(t.is_purine() && !t.is_pyrimidine());
        }
        for t in [ResidueType::RC, ResidueType::RU, ResidueType::DC, ResidueType::DT] {
            assert!(t.is_pyrimidine() && !t.is_purine());
        }
    }

    #[test]
    fn partial_residues_are_not_nucleic_acids() {
        assert!(!ResidueType::Phosphate.is_nucleic_acid());
        assert!(!ResidueType::RRibose.is_nucleic_acid());
        assert!(ResidueType::RRibose.is_rna());
        assert!(ResidueType::DRibose.is_dna());
    }

    #[test]
    fn invalidate_demotes_to_invalid() {
        assert_eq!(ResidueType::RA.invalidate(), ResidueType::Invalid);
    }
}
