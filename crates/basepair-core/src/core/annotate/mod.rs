//! Pairwise relation annotation: adjacency, stacking, pairing, backbone
//! hydrogen bonds, and the Leontis-Westhof face assignment behind them.

pub mod faces;
pub mod relation;

pub use relation::{AnnotationFlags, Relation, UnknownResidue};
