//! Binary serialization hooks.
//!
//! Fixed-width little-endian integers, IEEE-754 binary32 floats, tags as
//! length-prefixed canonical keys. Reading a relation re-resolves residue
//! ids against the live graph; a missing id is fatal for the record.

pub mod binary;

pub use binary::{
    read_model, read_relation, read_residue, write_model, write_relation, write_residue,
    DeserializeError,
};
