use serde::{Deserialize, Serialize};
use std::fmt;

/// Relation and conformation labels.
///
/// One flat catalog covers annotation labels (adjacency, stacking, pairing
/// and their refinements), Leontis-Westhof face tags, sugar pucker and
/// glycosyl classes, and the Saenger pair-type repertoire. `is` follows the
/// label hierarchy (`Upward.is(Stack)` holds), `==` is identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum PropertyType {
    Null,
    Undefined,

    // --- Adjacency ---
    Adjacent,
    Adjacent5p,
    Adjacent3p,

    // --- Stacking ---
    Stack,
    Upward,
    Downward,
    Inward,
    Outward,

    // --- Pairing ---
    Pairing,
    OneHbond,
    Cis,
    Trans,
    Parallel,
    Antiparallel,

    // --- Faces ---
    FaceC8,
    FaceWw,
    FaceWh,
    FaceWs,
    FaceHh,
    FaceHw,
    FaceBh,
    FaceBs,
    FaceSw,
    FaceSs,
    FacePhosphate,
    FaceRibose,

    // --- Sugar pucker classes (36 degree bins of pseudorotation) ---
    C3pEndo,
    C4pExo,
    O4pEndo,
    C1pExo,
    C2pEndo,
    C3pExo,
    C4pEndo,
    O4pExo,
    C1pEndo,
    C2pExo,

    // --- Glycosyl torsion classes ---
    Syn,
    Anti,

    // --- Saenger pair types matched by the pattern catalog ---
    SaengerI,
    SaengerII,
    SaengerV,
    SaengerVIII,
    SaengerXI,
    SaengerXII,
    SaengerXIX,
    SaengerXX,
    SaengerXXI,
    SaengerXXII,
    SaengerXXIII,
    SaengerXXVIII,
}

static PROPERTY_TYPES: phf::Map<&'static str, PropertyType> = phf::phf_map! {
    "null" => PropertyType::Null,
    "undefined" => PropertyType::Undefined,
    "adjacent" => PropertyType::Adjacent,
    "adjacent_5p" => PropertyType::Adjacent5p,
    "adjacent_3p" => PropertyType::Adjacent3p,
    "stack" => PropertyType::Stack,
    "upward" => PropertyType::Upward,
    "downward" => PropertyType::Downward,
    "inward" => PropertyType::Inward,
    "outward" => PropertyType::Outward,
    "pairing" => PropertyType::Pairing,
    "one_hbond" => PropertyType::OneHbond,
    "cis" => PropertyType::Cis,
    "trans" => PropertyType::Trans,
    "parallel" => PropertyType::Parallel,
    "antiparallel" => PropertyType::Antiparallel,
    "C8" => PropertyType::FaceC8,
    "Ww" => PropertyType::FaceWw,
    "Wh" => PropertyType::FaceWh,
    "Ws" => PropertyType::FaceWs,
    "Hh" => PropertyType::FaceHh,
    "Hw" => PropertyType::FaceHw,
    "Bh" => PropertyType::FaceBh,
    "Bs" => PropertyType::FaceBs,
    "Sw" => PropertyType::FaceSw,
    "Ss" => PropertyType::FaceSs,
    "Phosphate" => PropertyType::FacePhosphate,
    "Ribose" => PropertyType::FaceRibose,
    "C3'_endo" => PropertyType::C3pEndo,
    "C4'_exo" => PropertyType::C4pExo,
    "O4'_endo" => PropertyType::O4pEndo,
    "C1'_exo" => PropertyType::C1pExo,
    "C2'_endo" => PropertyType::C2pEndo,
    "C3'_exo" => PropertyType::C3pExo,
    "C4'_endo" => PropertyType::C4pEndo,
    "O4'_exo" => PropertyType::O4pExo,
    "C1'_endo" => PropertyType::C1pEndo,
    "C2'_exo" => PropertyType::C2pExo,
    "syn" => PropertyType::Syn,
    "anti" => PropertyType::Anti,
    "I" => PropertyType::SaengerI,
    "II" => PropertyType::SaengerII,
    "V" => PropertyType::SaengerV,
    "VIII" => PropertyType::SaengerVIII,
    "XI" => PropertyType::SaengerXI,
    "XII" => PropertyType::SaengerXII,
    "XIX" => PropertyType::SaengerXIX,
    "XX" => PropertyType::SaengerXX,
    "XXI" => PropertyType::SaengerXXI,
    "XXII" => PropertyType::SaengerXXII,
    "XXIII" => PropertyType::SaengerXXIII,
    "XXVIII" => PropertyType::SaengerXXVIII,
};

/// Returns the canonical interned tag for a string key. Unrecognized keys
/// map to `Undefined` so that label streams never fail to parse.
pub fn parse_property_type(s: &str) -> PropertyType {
    PROPERTY_TYPES
        .get(s.trim())
        .copied()
        .unwrap_or(PropertyType::Undefined)
}

impl PropertyType {
    /// Canonical string key for this tag.
    pub fn key(self) -> &'static str {
        use PropertyType::*;
        match self {
            Null => "null",
            Undefined => "undefined",
            Adjacent => "adjacent",
            Adjacent5p => "adjacent_5p",
            Adjacent3p => "adjacent_3p",
            Stack => "stack",
            Upward => "upward",
            Downward => "downward",
            Inward => "inward",
            Outward => "outward",
            Pairing => "pairing",
            OneHbond => "one_hbond",
            Cis => "cis",
            Trans => "trans",
            Parallel => "parallel",
            Antiparallel => "antiparallel",
            FaceC8 => "C8",
            FaceWw => "Ww",
            FaceWh => "Wh",
            FaceWs => "Ws",
            FaceHh => "Hh",
            FaceHw => "Hw",
            FaceBh => "Bh",
            FaceBs => "Bs",
            FaceSw => "Sw",
            FaceSs => "Ss",
            FacePhosphate => "Phosphate",
            FaceRibose => "Ribose",
            C3pEndo => "C3'_endo",
            C4pExo => "C4'_exo",
            O4pEndo => "O4'_endo",
            C1pExo => "C1'_exo",
            C2pEndo => "C2'_endo",
            C3pExo => "C3'_exo",
            C4pEndo => "C4'_endo",
            O4pExo => "O4'_exo",
            C1pEndo => "C1'_endo",
            C2pExo => "C2'_exo",
            Syn => "syn",
            Anti => "anti",
            SaengerI => "I",
            SaengerII => "II",
            SaengerV => "V",
            SaengerVIII => "VIII",
            SaengerXI => "XI",
            SaengerXII => "XII",
            SaengerXIX => "XIX",
            SaengerXX => "XX",
            SaengerXXI => "XXI",
            SaengerXXII => "XXII",
            SaengerXXIII => "XXIII",
            SaengerXXVIII => "XXVIII",
        }
    }

    /// Parent label in the hierarchy, if any.
    fn parent(self) -> Option<PropertyType> {
        use PropertyType::*;
        match self {
            Adjacent5p | Adjacent3p => Some(Adjacent),
            Upward | Downward | Inward | Outward => Some(Stack),
            OneHbond | SaengerI | SaengerII | SaengerV | SaengerVIII | SaengerXI | SaengerXII
            | SaengerXIX | SaengerXX | SaengerXXI | SaengerXXII | SaengerXXIII
            | SaengerXXVIII => Some(Pairing),
            _ => None,
        }
    }

    /// Hierarchy-aware membership: a tag `is` itself and every ancestor.
    pub fn is(self, other: PropertyType) -> bool {
        let mut cur = Some(self);
        while let Some(t) = cur {
            if t == other {
                return true;
            }
            cur = t.parent();
        }
        false
    }

    /// Rewrites direction-bearing labels for an inverted relation:
    /// 5' adjacency becomes 3' adjacency and the up/down stacking sense
    /// flips; symmetric labels are unchanged.
    pub fn invert(self) -> PropertyType {
        use PropertyType::*;
        match self {
            Adjacent5p => Adjacent3p,
            Adjacent3p => Adjacent5p,
            Upward => Downward,
            Downward => Upward,
            other => other,
        }
    }

    pub fn is_adjacent(self) -> bool {
        self.is(PropertyType::Adjacent)
    }

    pub fn is_adjacent_5p(self) -> bool {
        self == PropertyType::Adjacent5p
    }

    pub fn is_adjacent_3p(self) -> bool {
        self == PropertyType::Adjacent3p
    }

    pub fn is_stacking(self) -> bool {
        self.is(PropertyType::Stack)
    }

    pub fn is_pairing(self) -> bool {
        self.is(PropertyType::Pairing)
    }

    pub fn is_face(self) -> bool {
        use PropertyType::*;
        matches!(
            self,
            FaceC8 | FaceWw | FaceWh | FaceWs | FaceHh | FaceHw | FaceBh | FaceBs | FaceSw
                | FaceSs | FacePhosphate | FaceRibose
        )
    }

    pub fn is_syn(self) -> bool {
        self == PropertyType::Syn
    }
}

impl fmt::Display for PropertyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_is_total_and_stable() {
        assert_eq!(parse_property_type("Ww"), PropertyType::FaceWw);
        assert_eq!(parse_property_type("Ww"), parse_property_type("Ww"));
        assert_eq!(parse_property_type("no-such-label"), PropertyType::Undefined);
    }

    #[test]
    fn hierarchy_membership() {
        assert!(PropertyType::Upward.is(PropertyType::Stack));
        assert!(PropertyType::Adjacent5p.is(PropertyType::Adjacent));
        assert!(PropertyType::SaengerXIX.is(PropertyType::Pairing));
        assert!(!PropertyType::Upward.is(PropertyType::Pairing));
        assert!(PropertyType::Stack.is(PropertyType::Stack));
    }

    #[test]
    fn inversion_swaps_directional_labels_only() {
        assert_eq!(PropertyType::Adjacent5p.invert(), PropertyType::Adjacent3p);
        assert_eq!(PropertyType::Upward.invert(), PropertyType::Downward);
        assert_eq!(PropertyType::Inward.invert(), PropertyType::Inward);
        assert_eq!(PropertyType::Cis.invert(), PropertyType::Cis);
        for t in [PropertyType::Adjacent5p, PropertyType::Upward, PropertyType::Pairing] {
            assert_eq!(t.invert().invert(), t);
        }
    }
}
