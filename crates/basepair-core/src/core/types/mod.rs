//! Interned symbolic tag catalogs.
//!
//! Tags are `Copy` enums compared by identity; parsing a string key always
//! yields the same canonical tag value. Predicates (`is_purine`,
//! `is_backbone`, ...) are constant lookups on the tag itself, so no
//! downcasting is ever needed.

pub mod atom_sets;
pub mod atom_types;
pub mod property_types;
pub mod residue_types;

pub use atom_sets::AtomSet;
pub use atom_types::{parse_atom_type, AtomType};
pub use property_types::{parse_property_type, PropertyType};
pub use residue_types::{parse_residue_type, ResidueType};
