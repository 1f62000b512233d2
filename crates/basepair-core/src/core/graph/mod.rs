//! The annotated residue graph: contact extraction, relation edges, and
//! minimum-cycle-basis queries.

pub mod contacts;
pub mod cycles;
pub mod model;

pub use contacts::extract_contacts;
pub use cycles::CyclePath;
pub use model::{GraphModel, GraphModelError, RelationKey, ResidueKey};
