//! Contact candidate enumeration by axis-aligned bounding boxes.
//!
//! Residue pairs are in contact when their per-axis ranges, padded by the
//! cutoff, overlap on all three axes. Each axis is swept over ranges sorted
//! by (lower, upper) bound; a pair counter reaches three only for pairs
//! overlapping everywhere. Output-sensitive: near-linear for sparse
//! molecules, quadratic in the worst case.

use crate::core::models::Residue;
use crate::core::types::AtomSet;
use std::collections::HashMap;

/// Per-residue bound along one axis.
struct ResidueRange<K> {
    key: K,
    lower: f64,
    upper: f64,
}

/// Enumerates the index pairs of residues whose bounding boxes (over
/// non-pseudo atoms) overlap within `cutoff` on all three axes. Keys are
/// returned in canonical (ascending) order.
pub fn extract_contacts<K: Copy + Ord + std::hash::Hash>(
    residues: &[(K, &Residue)],
    cutoff: f64,
) -> Vec<(K, K)> {
    let heavy = AtomSet::Pse.not();

    let mut x_range = Vec::with_capacity(residues.len());
    let mut y_range = Vec::with_capacity(residues.len());
    let mut z_range = Vec::with_capacity(residues.len());

    for &(key, res) in residues {
        let mut min = [f64::INFINITY; 3];
        let mut max = [f64::NEG_INFINITY; 3];
        for atom in res.iter_filtered(&heavy) {
            for axis in 0..3 {
                min[axis] = min[axis].min(atom.position[axis]);
                max[axis] = max[axis].max(atom.position[axis]);
            }
        }
        x_range.push(ResidueRange {
            key,
            lower: min[0],
            upper: max[0],
        });
        y_range.push(ResidueRange {
            key,
            lower: min[1],
            upper: max[1],
        });
        z_range.push(ResidueRange {
            key,
            lower: min[2],
            upper: max[2],
        });
    }

    let mut contact: HashMap<(K, K), u8> = HashMap::new();
    sweep_axis(&mut x_range, &mut contact, cutoff);
    sweep_axis(&mut y_range, &mut contact, cutoff);

    // Pairs must have overlapped on both axes so far.
    contact.retain(|_, count| *count >= 2);

    sweep_axis(&mut z_range, &mut contact, cutoff);

    let mut result: Vec<(K, K)> = contact
        .into_iter()
        .filter(|&(_, count)| count == 3)
        .map(|(pair, _)| pair)
        .collect();
    result.sort();
    result
}

/// Counts pair overlaps along one axis, given ranges sorted by bounds.
fn sweep_axis<K: Copy + Ord + std::hash::Hash>(
    ranges: &mut [ResidueRange<K>],
    contact: &mut HashMap<(K, K), u8>,
    cutoff: f64,
) {
    ranges.sort_by(|a, b| {
        (a.lower, a.upper)
            .partial_cmp(&(b.lower, b.upper))
            .expect("coordinates are finite")
    });

    for i in 0..ranges.len() {
        for j in (i + 1)..ranges.len() {
            if ranges[j].lower - cutoff > ranges[i].upper {
                break;
            }
            let pair = if ranges[i].key < ranges[j].key {
                (ranges[i].key, ranges[j].key)
            } else {
                (ranges[j].key, ranges[i].key)
            };
            *contact.entry(pair).or_insert(0) += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::geometry::Transfo;
    use crate::core::models::ResId;
    use crate::core::types::ResidueType;
    use nalgebra::Vector3;

    fn residue_at(number: i32, offset: Vector3<f64>) -> Residue {
        let mut res = Residue::new(ResidueType::RG, ResId::new('A', number));
        res.set_theoretical().unwrap();
        res.transform(&Transfo::translation(offset));
        res
    }

    #[test]
    fn chain_of_three_yields_the_two_near_pairs() {
        // Residues at 0, 8 and 16 angstroms: only consecutive boxes fall
        // within the 5 angstrom cutoff.
        let r1 = residue_at(1, Vector3::zeros());
        let r2 = residue_at(2, Vector3::new(8.0, 0.0, 0.0));
        let r3 = residue_at(3, Vector3::new(16.0, 0.0, 0.0));
        let list = [(0usize, &r1), (1, &r2), (2, &r3)];

        let contacts = extract_contacts(&list, 5.0);
        assert_eq!(contacts, vec![(0, 1), (1, 2)]);
    }

    #[test]
    fn far_residues_yield_no_contacts() {
        let r1 = residue_at(1, Vector3::zeros());
        let r2 = residue_at(2, Vector3::new(40.0, 40.0, 40.0));
        let list = [(0usize, &r1), (1, &r2)];
        assert!(extract_contacts(&list, 5.0).is_empty());
    }

    #[test]
    fn overlap_on_two_axes_only_is_not_a_contact() {
        // Same X and Y extent, separated along Z.
        let r1 = residue_at(1, Vector3::zeros());
        let r2 = residue_at(2, Vector3::new(0.0, 0.0, 30.0));
        let list = [(0usize, &r1), (1, &r2)];
        assert!(extract_contacts(&list, 5.0).is_empty());
    }

    #[test]
    fn pairs_are_canonically_ordered() {
        let r1 = residue_at(1, Vector3::zeros());
        let r2 = residue_at(2, Vector3::new(2.0, 0.0, 0.0));
        // Reverse insertion order does not change the canonical pair.
        let list = [(1usize, &r1), (0, &r2)];
        assert_eq!(extract_contacts(&list, 5.0), vec![(0, 1)]);
    }
}
