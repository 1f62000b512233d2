//! Molecular data models: residue identifiers, atoms, and the residue
//! container with its referential frame and derived atoms.

pub mod atom;
pub mod protonation;
pub mod res_id;
pub mod residue;
pub mod theoretical;
pub mod topology;

pub use atom::Atom;
pub use res_id::ResId;
pub use residue::{Residue, ResidueError};
