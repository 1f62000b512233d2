//! # Basepair Core Library
//!
//! An annotation and geometry engine for three-dimensional nucleic acid
//! structures. Given atomic coordinates of residues, it classifies pairwise
//! spatial relationships (backbone adjacency, base stacking, hydrogen-bonded
//! pairing with Leontis-Westhof face labels) and rebuilds missing ribose
//! atoms from conformational parameters and phosphate anchors.
//!
//! ## Architectural Philosophy
//!
//! The library is organized as a single computational core with a strict
//! bottom-up layering so that every level is independently testable:
//!
//! - **Type tables** ([`core::types`]) - interned symbolic tags for atoms,
//!   residues, and relation properties, with predicate bundles.
//! - **Geometry** ([`core::geometry`]) - vectors, homogeneous transforms,
//!   torsion angles, and rigid-body superposition.
//! - **Models** ([`core::models`]) - the residue container with its local
//!   referential, pseudo-atoms, and hydrogen/lone-pair placement.
//! - **Conformation** ([`core::ribose`]) - closed-form and descent-based
//!   ribose reconstruction from pseudorotation and glycosyl parameters.
//! - **Recognition** ([`core::pairing`], [`core::flow`],
//!   [`core::annotate`]) - hydrogen-bond scoring, capacity-constrained
//!   bipartite flow matching, and the per-pair relation analyzer.
//! - **Graph level** ([`core::graph`]) - contact extraction, the annotated
//!   residue graph, and minimum-cycle-basis queries used by motif detection.
//!
//! Text I/O (PDB and friends) is intentionally out of scope; the core
//! expects residues already populated from such streams and exposes binary
//! serialization hooks ([`core::io`]) with identity-preserving reattachment.

pub mod core;
