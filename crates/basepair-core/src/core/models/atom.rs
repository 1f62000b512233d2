use crate::core::geometry::Transfo;
use crate::core::types::AtomType;
use nalgebra::Point3;
use std::cmp::Ordering;

/// A positioned atom. Atoms carry no identity beyond (position, type);
/// equality and ordering are by type, which is unique within a residue.
#[derive(Debug, Clone, Copy)]
pub struct Atom {
    pub position: Point3<f64>,
    pub atom_type: AtomType,
}

impl Atom {
    pub fn new(position: Point3<f64>, atom_type: AtomType) -> Self {
        Atom {
            position,
            atom_type,
        }
    }

    pub fn from_coords(x: f64, y: f64, z: f64, atom_type: AtomType) -> Self {
        Atom::new(Point3::new(x, y, z), atom_type)
    }

    pub fn transform(&mut self, tfo: &Transfo) {
        self.position = tfo.apply(&self.position);
    }

    pub fn distance(&self, other: &Atom) -> f64 {
        (self.position - other.position).norm()
    }

    pub fn square_distance(&self, other: &Atom) -> f64 {
        (self.position - other.position).norm_squared()
    }
}

impl PartialEq for Atom {
    fn eq(&self, other: &Self) -> bool {
        self.atom_type == other.atom_type
    }
}

impl Eq for Atom {}

impl PartialOrd for Atom {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Atom {
    fn cmp(&self, other: &Self) -> Ordering {
        self.atom_type.cmp(&other.atom_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equality_is_by_type_only() {
        let a = Atom::from_coords(0.0, 0.0, 0.0, AtomType::C1Prime);
        let b = Atom::from_coords(1.0, 2.0, 3.0, AtomType::C1Prime);
        let c = Atom::from_coords(0.0, 0.0, 0.0, AtomType::N9);
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn squared_distance_matches_distance() {
        let a = Atom::from_coords(0.0, 0.0, 0.0, AtomType::P);
        let b = Atom::from_coords(3.0, 4.0, 0.0, AtomType::O3Prime);
        assert!((a.distance(&b) - 5.0).abs() < 1e-12);
        assert!((a.square_distance(&b) - 25.0).abs() < 1e-12);
    }
}
