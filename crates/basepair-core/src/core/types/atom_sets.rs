use super::atom_types::AtomType;

/// Composable predicate over atom tags.
///
/// Residue iteration takes an optional `AtomSet` filter; the expression tree
/// is evaluated per atom with no allocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AtomSet {
    /// Matches every atom.
    All,
    Not(Box<AtomSet>),
    And(Box<AtomSet>, Box<AtomSet>),
    Or(Box<AtomSet>, Box<AtomSet>),
    SideChain,
    Backbone,
    Hydrogen,
    LonePair,
    /// Pseudo-atoms (referential pivots).
    Pse,
    /// Matches one specific atom tag.
    Atom(AtomType),
}

impl AtomSet {
    pub fn matches(&self, t: AtomType) -> bool {
        match self {
            AtomSet::All => true,
            AtomSet::Not(inner) => !inner.matches(t),
            AtomSet::And(a, b) => a.matches(t) && b.matches(t),
            AtomSet::Or(a, b) => a.matches(t) || b.matches(t),
            AtomSet::SideChain => t.is_side_chain(),
            AtomSet::Backbone => t.is_backbone(),
            AtomSet::Hydrogen => t.is_hydrogen(),
            AtomSet::LonePair => t.is_lone_pair(),
            AtomSet::Pse => t.is_pseudo(),
            AtomSet::Atom(a) => t == *a,
        }
    }

    pub fn not(self) -> AtomSet {
        AtomSet::Not(Box::new(self))
    }

    pub fn and(self, other: AtomSet) -> AtomSet {
        AtomSet::And(Box::new(self), Box::new(other))
    }

    pub fn or(self, other: AtomSet) -> AtomSet {
        AtomSet::Or(Box::new(self), Box::new(other))
    }

    pub fn atom(t: AtomType) -> AtomSet {
        AtomSet::Atom(t)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn combinators_compose() {
        // Side chain atoms plus the three backbone oxygens the pairing
        // analyzer treats as contact-capable.
        let set = AtomSet::SideChain
            .or(AtomSet::atom(AtomType::O2Prime))
            .or(AtomSet::atom(AtomType::O1P).or(AtomSet::atom(AtomType::O2P)));

        assert!(set.matches(AtomType::N1));
        assert!(set.matches(AtomType::O2Prime));
        assert!(set.matches(AtomType::O1P));
        assert!(!set.matches(AtomType::C1Prime));
        assert!(!set.matches(AtomType::P));
    }

    #[test]
    fn negation_excludes() {
        let set = AtomSet::SideChain.and(
            AtomSet::atom(AtomType::H5M2)
                .or(AtomSet::atom(AtomType::H5M3))
                .not(),
        );
        assert!(set.matches(AtomType::H5M1));
        assert!(!set.matches(AtomType::H5M2));
        assert!(!set.matches(AtomType::H5M3));
    }

    #[test]
    fn pse_matches_pseudo_atoms_only() {
        let non_pse = AtomSet::Pse.not();
        assert!(!non_pse.matches(AtomType::PSY));
        assert!(non_pse.matches(AtomType::C1Prime));
    }
}
