//! Geometric primitives: homogeneous transforms, angles and torsions, and
//! rigid-body superposition.

pub mod superpose;
pub mod transfo;

pub use superpose::superposition;
pub use transfo::{angle, torsion_angle, Transfo};
