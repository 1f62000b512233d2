//! Hydrogen-bond candidates, their geometric and statistical scores, and
//! the catalog of named base-pairing patterns.

pub mod hbond;
pub mod patterns;

pub use hbond::{HBond, HBondFlow};
pub use patterns::{translate_pairing, PairingPattern};
