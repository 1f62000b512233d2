//! The face table: for each base, anchor points on the base edge labelled
//! with their Leontis-Westhof face tag.
//!
//! Anchors are hydrogen and lone-pair positions (and their midpoints) of
//! the theoretical residues, expressed in the base's local referential.
//! Built once on first use and read-only afterwards; lookups map a contact
//! point into the residue's frame and take the nearest anchor's tag.

use crate::core::models::{ResId, Residue};
use crate::core::types::{AtomType, PropertyType, ResidueType};
use nalgebra::Point3;
use std::sync::LazyLock;

struct FaceTable {
    a: Vec<(Point3<f64>, PropertyType)>,
    c: Vec<(Point3<f64>, PropertyType)>,
    g: Vec<(Point3<f64>, PropertyType)>,
    u: Vec<(Point3<f64>, PropertyType)>,
    t: Vec<(Point3<f64>, PropertyType)>,
}

fn anchor(res: &Residue, atom: AtomType) -> Point3<f64> {
    res.safe_find(atom)
        .expect("theoretical residues carry every derived atom")
        .position
}

fn midpoint(res: &Residue, a: AtomType, b: AtomType) -> Point3<f64> {
    nalgebra::center(&anchor(res, a), &anchor(res, b))
}

fn theoretical(res_type: ResidueType) -> Residue {
    let mut res = Residue::new(res_type, ResId::new(' ', 1));
    res.set_theoretical()
        .expect("standard bases have theoretical coordinates");
    res
}

static FACES: LazyLock<FaceTable> = LazyLock::new(|| {
    use AtomType::*;
    use PropertyType::*;

    let a = theoretical(ResidueType::RA);
    let faces_a = vec![
        (anchor(&a, H8), FaceC8),
        (midpoint(&a, H8, LP7), FaceHh),
        (midpoint(&a, H62, LP7), FaceHh),
        (anchor(&a, H62), FaceHw),
        (midpoint(&a, H61, H62), FaceBh),
        (anchor(&a, H61), FaceWh),
        (midpoint(&a, LP1, H61), FaceWw),
        (midpoint(&a, LP1, H2), FaceWw),
        (anchor(&a, H2), FaceBs),
        (midpoint(&a, H2, LP3), FaceSs),
        (anchor(&a, LP3), FaceSs),
    ];

    let c = theoretical(ResidueType::RC);
    let faces_c = vec![
        (anchor(&c, H6), FaceHh),
        (midpoint(&c, H41, H5), FaceHh),
        (anchor(&c, H41), FaceHw),
        (midpoint(&c, H41, H42), FaceBh),
        (anchor(&c, H42), FaceWh),
        (midpoint(&c, H42, LP3), FaceWw),
        (midpoint(&c, LP3, LP22), FaceWw),
        (anchor(&c, LP22), FaceWs),
        (midpoint(&c, LP22, LP21), FaceBs),
        (anchor(&c, LP21), FaceSs),
    ];

    let g = theoretical(ResidueType::RG);
    let faces_g = vec![
        (anchor(&g, H8), FaceC8),
        (midpoint(&g, H8, LP7), FaceHh),
        (midpoint(&g, LP61, LP7), FaceHh),
        (anchor(&g, LP61), FaceHw),
        (midpoint(&g, LP61, LP62), FaceBh),
        (anchor(&g, LP62), FaceWh),
        (midpoint(&g, LP62, H1), FaceWw),
        (midpoint(&g, H1, H22), FaceWw),
        (anchor(&g, H22), FaceWs),
        (midpoint(&g, H22, H21), FaceBs),
        (anchor(&g, H21), FaceSw),
        (midpoint(&g, H21, LP3), FaceSs),
    ];

    let u = theoretical(ResidueType::RU);
    let faces_u = vec![
        (anchor(&u, H6), FaceHh),
        (midpoint(&u, LP41, H5), FaceHh),
        (anchor(&u, LP41), FaceHw),
        (midpoint(&u, LP41, LP42), FaceBh),
        (anchor(&u, LP42), FaceWh),
        (midpoint(&u, LP42, H3), FaceWw),
        (anchor(&u, H3), FaceWw),
        (midpoint(&u, LP22, H3), FaceWs),
        (anchor(&u, LP22), FaceWs),
        (midpoint(&u, LP22, LP21), FaceBs),
        (anchor(&u, LP21), FaceSs),
    ];

    let t = theoretical(ResidueType::DT);
    let faces_t = vec![
        (anchor(&t, H6), FaceHh),
        (midpoint(&t, LP41, C5M), FaceHh),
        (anchor(&t, LP41), FaceHw),
        (midpoint(&t, LP41, LP42), FaceBh),
        (anchor(&t, LP42), FaceWh),
        (midpoint(&t, LP42, H3), FaceWw),
        (anchor(&t, H3), FaceWw),
        (midpoint(&t, LP22, H3), FaceWs),
        (anchor(&t, LP22), FaceWs),
        (midpoint(&t, LP22, LP21), FaceBs),
        (anchor(&t, LP21), FaceSs),
    ];

    FaceTable {
        a: faces_a,
        c: faces_c,
        g: faces_g,
        u: faces_u,
        t: faces_t,
    }
});

/// The face tag whose anchor lies nearest to `point`, with `point` given in
/// global coordinates and mapped into the residue's local frame. `Null` for
/// residues without a face table.
pub fn face_of(res: &Residue, point: &Point3<f64>) -> PropertyType {
    let table = if res.res_type().is_a() {
        &FACES.a
    } else if res.res_type().is_c() {
        &FACES.c
    } else if res.res_type().is_g() {
        &FACES.g
    } else if res.res_type().is_u() {
        &FACES.u
    } else if res.res_type().is_t() {
        &FACES.t
    } else {
        return PropertyType::Null;
    };

    let local = res.referential().invert().apply(point);
    table
        .iter()
        .min_by(|(p1, _), (p2, _)| {
            let d1 = (local - p1).norm_squared();
            let d2 = (local - p2).norm_squared();
            d1.partial_cmp(&d2).expect("distances are finite")
        })
        .map(|&(_, face)| face)
        .expect("face tables are never empty")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn watson_crick_edge_of_g_maps_to_ww() {
        let g = theoretical(ResidueType::RG);
        let probe = midpoint(&g, AtomType::LP62, AtomType::H1);
        assert_eq!(face_of(&g, &probe), PropertyType::FaceWw);
    }

    #[test]
    fn hoogsteen_edge_of_a_maps_to_hh() {
        let a = theoretical(ResidueType::RA);
        let probe = midpoint(&a, AtomType::H8, AtomType::LP7);
        assert_eq!(face_of(&a, &probe), PropertyType::FaceHh);
    }

    #[test]
    fn lookup_follows_the_residue_frame() {
        use crate::core::geometry::Transfo;
        use nalgebra::Vector3;

        // Move the residue; a probe moved the same way lands on the same
        // face.
        let mut g = theoretical(ResidueType::RG);
        let probe = midpoint(&g, AtomType::LP62, AtomType::H1);
        let motion = Transfo::rotation(&Vector3::new(1.0, 0.3, 0.2), 1.1)
            .translate(Vector3::new(8.0, -4.0, 2.0));
        g.transform(&motion);
        assert_eq!(face_of(&g, &motion.apply(&probe)), PropertyType::FaceWw);
    }

    #[test]
    fn residues_without_a_table_yield_null() {
        let mut po4 = Residue::new(ResidueType::Phosphate, ResId::new(' ', 1));
        po4.set_theoretical().unwrap();
        assert_eq!(face_of(&po4, &Point3::origin()), PropertyType::Null);
    }
}
