//! Ribose reconstruction.
//!
//! The furanose and its branches are rebuilt in the residue's local frame
//! from four parameters: pseudorotation `rho`, glycosyl torsion `chi`, and
//! the backbone torsions `gamma` (O5' from C5') and `beta` (P from O5').
//! Three strategies are provided: direct closed-form construction,
//! cyclic-coordinate bisection descent onto phosphate anchors, and a
//! closed-form estimator from the 3' anchor alone.

pub mod builder;

pub use builder::{CcmParams, RiboseError};
