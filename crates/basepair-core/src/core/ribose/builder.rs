use crate::core::geometry::Transfo;
use crate::core::models::{Atom, ResId, Residue, ResidueError};
use crate::core::types::{AtomType, PropertyType};
use nalgebra::{Point3, Vector3};
use std::f64::consts::PI;
use thiserror::Error;
use tracing::trace;

const TWO_PI: f64 = 2.0 * PI;

// Cosine model of the O3' XZ-plane projection length as a function of
// pseudorotation, used by the analytic estimator.
const COSF_AMPLITUDE: f64 = 1.3305;
const COSF_VSHIFT: f64 = 2.0778;
const COSF_PHASE: f64 = 0.3041;

// Squared ideal anchor spans substituted for unconstrained branches in the
// objective.
const IDEAL_5P_SQUARE: f64 = 2.0736;
const IDEAL_3P_SQUARE: f64 = 2.047761;

// Furanose amplitude: 37.68 degrees in radians.
const NU_AMPLITUDE: f64 = 0.6576400621514634;
const RAD_144: f64 = 144.0 * PI / 180.0;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RiboseError {
    #[error("needs at least one phosphate anchor to build ribose for {residue}")]
    MissingAnchor { residue: ResId },
    #[error("cannot build a ribose on residue {residue}")]
    UnsupportedType { residue: ResId },
    #[error(transparent)]
    Residue(#[from] ResidueError),
}

/// Bisection-descent tuning for the CCM builders.
#[derive(Debug, Clone, Copy)]
pub struct CcmParams {
    /// Descent stops when every axis shift falls at or below this value.
    pub minshift: f64,
    /// Minimum objective improvement for a move to be accepted.
    pub mindrop: f64,
    /// Factor applied to all shifts when no axis improves.
    pub shiftrate: f64,
}

impl Default for CcmParams {
    fn default() -> Self {
        CcmParams {
            minshift: 0.1,
            mindrop: 1e-5,
            shiftrate: 0.5,
        }
    }
}

/// Ribose atoms under construction, in the residue's local referential.
struct RiboseWork {
    c1p: Point3<f64>,
    c2p: Point3<f64>,
    c3p: Point3<f64>,
    c4p: Point3<f64>,
    c5p: Point3<f64>,
    o4p: Point3<f64>,
    o2p: Option<Point3<f64>>,
    o5p: Option<Point3<f64>>,
    p: Option<Point3<f64>>,
    o3p: Option<Point3<f64>>,
}

impl RiboseWork {
    /// Closed-form construction from the local referential: each atom is a
    /// fixed -Y bond translation preceded by a +Z bond-angle rotation and a
    /// Y torsion rotation.
    fn build(rho: f64, chi: f64, gamma: f64, beta: f64, rna: bool, build5p: bool, build3p: bool) -> RiboseWork {
        let nu0 = NU_AMPLITUDE * (rho + 3.0 * RAD_144).cos();
        let nu1 = NU_AMPLITUDE * (rho + 4.0 * RAD_144).cos();

        let origin = Point3::origin();
        let rad = |deg: f64| deg * PI / 180.0;

        // C1' (only a translation is needed)
        let c1p_tfo = Transfo::translation(Vector3::new(0.0, -1.465, 0.0));
        let c1p = c1p_tfo.apply(&origin);

        // O4' with respect to chi (from C1')
        let o4p_tfo = c1p_tfo
            * Transfo::rotation_y(-chi)
            * Transfo::rotation_z(rad(71.47))
            * Transfo::translation(Vector3::new(0.0, -1.417, 0.0));
        let o4p = o4p_tfo.apply(&origin);

        // C2' with respect to chi (from C1')
        let c2p_tfo = c1p_tfo
            * Transfo::rotation_y(rad(118.44) - chi)
            * Transfo::rotation_z(rad(67.972))
            * Transfo::translation(Vector3::new(0.0, -1.529, 0.0));
        let c2p = c2p_tfo.apply(&origin);

        // C3' with respect to nu1 (from C2')
        let c3p = (c2p_tfo
            * Transfo::rotation_y(rad(240.838) - nu1)
            * Transfo::rotation_z(rad(78.554))
            * Transfo::translation(Vector3::new(0.0, -1.523, 0.0)))
        .apply(&origin);

        // O2' with respect to nu1 (from C2'), RNA only
        let o2p = rna.then(|| {
            (c2p_tfo
                * Transfo::rotation_y(rad(121.160) - nu1)
                * Transfo::rotation_z(rad(70.232))
                * Transfo::translation(Vector3::new(0.0, -1.414, 0.0)))
            .apply(&origin)
        });

        // C4' with respect to nu0 (from O4')
        let c4p = (o4p_tfo
            * Transfo::rotation_y(rad(121.335) - nu0)
            * Transfo::rotation_z(rad(70.3))
            * Transfo::translation(Vector3::new(0.0, -1.452, 0.0)))
        .apply(&origin);

        // C5' aligned on the furanose for the 5' branch
        let branch5p = Transfo::align(&c4p, &c3p, &o4p);
        let c5p_tfo = Transfo::rotation_y(rad(29.891))
            * Transfo::rotation_z(rad(64.614))
            * Transfo::translation(Vector3::new(0.0, -1.510, 0.0));
        let c5p = (branch5p * c5p_tfo).apply(&origin);

        let (o5p, p) = if build5p {
            // O5' from C5' according to gamma, P from O5' according to beta
            let o5p_tfo = c5p_tfo
                * Transfo::rotation_y(-gamma)
                * Transfo::rotation_z(rad(70.598))
                * Transfo::translation(Vector3::new(0.0, -1.440, 0.0));
            let p_tfo = o5p_tfo
                * Transfo::rotation_y(-beta)
                * Transfo::rotation_z(rad(59.066))
                * Transfo::translation(Vector3::new(0.0, -1.593, 0.0));
            (
                Some((branch5p * o5p_tfo).apply(&origin)),
                Some((branch5p * p_tfo).apply(&origin)),
            )
        } else {
            (None, None)
        };

        // O3' aligned on the furanose for the 3' branch
        let o3p = build3p.then(|| {
            (Transfo::align(&c3p, &c4p, &c2p)
                * Transfo::rotation_y(rad(30.291))
                * Transfo::rotation_z(rad(68.18))
                * Transfo::translation(Vector3::new(0.0, -1.431, 0.0)))
            .apply(&origin)
        });

        RiboseWork {
            c1p,
            c2p,
            c3p,
            c4p,
            c5p,
            o4p,
            o2p,
            o5p,
            p,
            o3p,
        }
    }

    fn transform(&mut self, tfo: &Transfo) {
        for point in [
            Some(&mut self.c1p),
            Some(&mut self.c2p),
            Some(&mut self.c3p),
            Some(&mut self.c4p),
            Some(&mut self.c5p),
            Some(&mut self.o4p),
            self.o2p.as_mut(),
            self.o5p.as_mut(),
            self.p.as_mut(),
            self.o3p.as_mut(),
        ]
        .into_iter()
        .flatten()
        {
            *point = tfo.apply(point);
        }
    }

    /// Squared-distance objective to the anchors. Unconstrained branches
    /// contribute their ideal squared span so the scale of the objective is
    /// stable.
    fn evaluate(
        &self,
        anchor_o5p: Option<&Point3<f64>>,
        anchor_o3p: Option<&Point3<f64>>,
    ) -> f64 {
        let term5 = match anchor_o5p {
            Some(a) => (self.c5p - a).norm_squared(),
            None => IDEAL_5P_SQUARE,
        };
        let term3 = match anchor_o3p {
            Some(a) => (self.c3p - a).norm_squared(),
            None => IDEAL_3P_SQUARE,
        };
        term5 + term3
    }
}

impl Residue {
    fn ribose_is_rna(&self) -> Result<bool, RiboseError> {
        if self.res_type().is_rna() {
            Ok(true)
        } else if self.res_type().is_dna() {
            Ok(false)
        } else {
            Err(RiboseError::UnsupportedType {
                residue: self.id(),
            })
        }
    }

    /// Anchor positions in the local referential. An anchor is the
    /// residue's own O5'/O3' position; the corresponding phosphate argument
    /// only marks it as constrained.
    fn ribose_anchors(
        &self,
        use_5p: bool,
        use_3p: bool,
    ) -> Result<(Option<Point3<f64>>, Option<Point3<f64>>, Transfo), RiboseError> {
        let referential = self.referential();
        let inv = referential.invert();
        let o5p = if use_5p {
            Some(inv.apply(&self.pos(AtomType::O5Prime)?))
        } else {
            None
        };
        let o3p = if use_3p {
            Some(inv.apply(&self.pos(AtomType::O3Prime)?))
        } else {
            None
        };
        Ok((o5p, o3p, referential))
    }

    /// Moves the built ribose back into the residue's referential, inserts
    /// the atoms, and regenerates the sugar hydrogens.
    fn commit_ribose(&mut self, mut work: RiboseWork, referential: &Transfo) {
        work.transform(referential);
        self.insert(Atom::new(work.c1p, AtomType::C1Prime));
        self.insert(Atom::new(work.c2p, AtomType::C2Prime));
        self.insert(Atom::new(work.c3p, AtomType::C3Prime));
        self.insert(Atom::new(work.c4p, AtomType::C4Prime));
        self.insert(Atom::new(work.c5p, AtomType::C5Prime));
        self.insert(Atom::new(work.o4p, AtomType::O4Prime));
        if let Some(o2p) = work.o2p {
            self.insert(Atom::new(o2p, AtomType::O2Prime));
        }
        if let Some(o5p) = work.o5p {
            self.insert(Atom::new(o5p, AtomType::O5Prime));
        }
        if let Some(p) = work.p {
            self.insert(Atom::new(p, AtomType::P));
        }
        if let Some(o3p) = work.o3p {
            self.insert(Atom::new(o3p, AtomType::O3Prime));
        }
        self.add_ribose_hydrogens();
    }

    /// Builds the ribose from explicit conformational parameters. The 5'
    /// branch adds O5' and P, the 3' branch adds O3'.
    pub fn build_ribose(
        &mut self,
        rho: f64,
        chi: f64,
        gamma: f64,
        beta: f64,
        build5p: bool,
        build3p: bool,
    ) -> Result<(), RiboseError> {
        let rna = self.ribose_is_rna()?;
        let referential = self.referential();
        let work = RiboseWork::build(rho, chi, gamma, beta, rna, build5p, build3p);
        self.rib_built_count += 1;
        self.commit_ribose(work, &referential);
        self.rib_built_valid = true;
        Ok(())
    }

    /// Builds the ribose at the midpoint of a pucker and glycosyl class,
    /// with gamma fixed at 1 rad and beta at pi.
    pub fn build_ribose_by_class(
        &mut self,
        pucker: PropertyType,
        glycosyl: PropertyType,
        build5p: bool,
        build3p: bool,
    ) -> Result<(), RiboseError> {
        let (p0, p1) = class_rho_range(Some(pucker));
        let (g0, g1) = class_chi_range(Some(glycosyl));
        self.build_ribose(
            p0 + (p1 - p0) / 2.0,
            g0 + (g1 - g0) / 2.0,
            1.0,
            PI,
            build5p,
            build3p,
        )
    }

    /// 4-D cyclic-coordinate descent onto the phosphate anchors with the
    /// default tuning. Returns the RMS anchor error in angstroms.
    pub fn build_ribose_by_ccm_4d(
        &mut self,
        po4_5p: Option<&Residue>,
        po4_3p: Option<&Residue>,
        pucker: Option<PropertyType>,
        glycosyl: Option<PropertyType>,
    ) -> Result<f64, RiboseError> {
        self.build_ribose_by_ccm_4d_with(po4_5p, po4_3p, &CcmParams::default(), pucker, glycosyl)
    }

    /// 4-D cyclic-coordinate descent with explicit tuning.
    pub fn build_ribose_by_ccm_4d_with(
        &mut self,
        po4_5p: Option<&Residue>,
        po4_3p: Option<&Residue>,
        params: &CcmParams,
        pucker: Option<PropertyType>,
        glycosyl: Option<PropertyType>,
    ) -> Result<f64, RiboseError> {
        self.ccm(po4_5p.is_some(), po4_3p.is_some(), params, pucker, glycosyl, false)
    }

    /// 2-D variant: only rho and chi are optimized, with gamma fixed at
    /// 55 degrees and beta at 180 degrees.
    pub fn build_ribose_by_ccm_2d(
        &mut self,
        po4_5p: Option<&Residue>,
        po4_3p: Option<&Residue>,
        pucker: Option<PropertyType>,
        glycosyl: Option<PropertyType>,
    ) -> Result<f64, RiboseError> {
        self.build_ribose_by_ccm_2d_with(po4_5p, po4_3p, &CcmParams::default(), pucker, glycosyl)
    }

    /// 2-D variant with explicit tuning.
    pub fn build_ribose_by_ccm_2d_with(
        &mut self,
        po4_5p: Option<&Residue>,
        po4_3p: Option<&Residue>,
        params: &CcmParams,
        pucker: Option<PropertyType>,
        glycosyl: Option<PropertyType>,
    ) -> Result<f64, RiboseError> {
        self.ccm(po4_5p.is_some(), po4_3p.is_some(), params, pucker, glycosyl, true)
    }

    fn ccm(
        &mut self,
        use_5p: bool,
        use_3p: bool,
        params: &CcmParams,
        pucker: Option<PropertyType>,
        glycosyl: Option<PropertyType>,
        two_d: bool,
    ) -> Result<f64, RiboseError> {
        if !use_5p && !use_3p {
            return Err(RiboseError::MissingAnchor {
                residue: self.id(),
            });
        }
        let rna = self.ribose_is_rna()?;
        let build5p = !use_5p;
        let build3p = !use_3p;
        let (anchor_o5p, anchor_o3p, referential) = self.ribose_anchors(use_5p, use_3p)?;

        let axes = if two_d { 2 } else { 4 };
        let mut p_min = [0.0_f64; 4];
        let mut p_max = [TWO_PI; 4];
        (p_min[0], p_max[0]) = class_rho_range(pucker);
        (p_min[1], p_max[1]) = class_chi_range(glycosyl);

        let mut x = [0.0_f64; 4];
        let mut shift = [0.0_f64; 4];
        for i in 0..4 {
            let range = p_max[i] - p_min[i];
            shift[i] = 0.25 * range;
            x[i] = p_min[i] + 0.5 * range;
        }
        if two_d {
            x[2] = 55.0 * PI / 180.0;
            x[3] = PI;
        }

        let mut builds: u32 = 0;
        let eval = |v: &[f64; 4], builds: &mut u32| -> f64 {
            *builds += 1;
            RiboseWork::build(v[0], v[1], v[2], v[3], rna, build5p, build3p)
                .evaluate(anchor_o5p.as_ref(), anchor_o3p.as_ref())
        };

        let mut eval_x = eval(&x, &mut builds);

        while shift[..axes].iter().any(|&s| s > params.minshift) {
            let mut not_shifted = true;

            for i in 0..axes {
                let mut candidate = x;
                candidate[i] = (x[i] + shift[i]).min(p_max[i]);
                let eval_up = eval(&candidate, &mut builds);

                if eval_up < eval_x - params.mindrop {
                    x = candidate;
                    eval_x = eval_up;
                    not_shifted = false;
                    continue;
                }

                candidate[i] = (x[i] - shift[i]).max(p_min[i]);
                let eval_down = eval(&candidate, &mut builds);
                if eval_down < eval_x - params.mindrop {
                    x = candidate;
                    eval_x = eval_down;
                    not_shifted = false;
                }
            }

            if not_shifted {
                for s in shift[..axes].iter_mut() {
                    *s *= params.shiftrate;
                }
            }
        }

        let work = RiboseWork::build(x[0], x[1], x[2], x[3], rna, build5p, build3p);
        builds += 1;
        let final_eval = work.evaluate(anchor_o5p.as_ref(), anchor_o3p.as_ref());
        trace!(residue = %self.id(), builds, objective = final_eval, "ccm converged");

        self.commit_ribose(work, &referential);
        self.rib_built_count = builds;
        self.rib_built_valid = true;
        Ok((final_eval / 2.0).sqrt())
    }

    /// Closed-form estimation from the 3' anchor alone.
    ///
    /// The pseudorotation is read off the anchor's XZ-plane projection
    /// length through the cosine model, both mirror solutions are built and
    /// Y-rotated onto the anchor azimuth, and the lower-error pose is kept.
    /// When the projection length falls outside the model's amplitude
    /// (with 0.2 tolerance), the ribose validity flag is cleared and an
    /// infinite error is returned.
    pub fn build_ribose_by_estimation(
        &mut self,
        po4_5p: Option<&Residue>,
        _po4_3p: &Residue,
    ) -> Result<f64, RiboseError> {
        let rna = self.ribose_is_rna()?;
        let build5p = po4_5p.is_none();
        let (anchor_o5p, anchor_o3p, referential) = self.ribose_anchors(!build5p, true)?;
        let anchor_o3p = anchor_o3p.expect("3' anchor was requested");

        self.rib_built_valid = true;
        self.rib_built_count = 0;

        // Pseudorotation estimate from the O3' XZ projection length.
        let (x, z) = (anchor_o3p.x, anchor_o3p.z);
        let xz_len = (x * x + z * z).sqrt();
        let amplitude = (xz_len - COSF_VSHIFT) / COSF_AMPLITUDE;
        if !(-1.2..=1.2).contains(&amplitude) {
            self.rib_built_valid = false;
            return Ok(f64::INFINITY);
        }

        let mut erho1 = amplitude.clamp(-1.0, 1.0).acos() - COSF_PHASE;
        let erho2 = if erho1 > 0.0 {
            TWO_PI - 2.0 * COSF_PHASE - erho1
        } else {
            erho1 += TWO_PI;
            2.0 * TWO_PI - 2.0 * COSF_PHASE - erho1
        };

        // Y rotation from the X axis to the anchored O3'.
        let azimuth = |x: f64, z: f64, len: f64| {
            if z < 0.0 {
                (x / len).acos()
            } else {
                TWO_PI - (x / len).acos()
            }
        };
        let anchor_yrot = azimuth(x, z, xz_len);

        // Build each mirror solution with the O3' present, rotate its
        // azimuth onto the anchor's, and evaluate.
        let pose = |rho: f64, builds: &mut u32| -> (RiboseWork, f64) {
            *builds += 1;
            let mut work = RiboseWork::build(rho, 0.0, 1.0, PI, rna, build5p, true);
            let o3p = work.o3p.expect("estimation builds the 3' branch");
            let len = (o3p.x * o3p.x + o3p.z * o3p.z).sqrt();
            let built_yrot = azimuth(o3p.x, o3p.z, len);
            work.transform(&Transfo::rotation_y(anchor_yrot - built_yrot));
            let value = work.evaluate(anchor_o5p.as_ref(), Some(&anchor_o3p));
            (work, value)
        };

        let mut builds = 0;
        let (work1, value1) = pose(erho1, &mut builds);
        let (work2, value2) = pose(erho2, &mut builds);

        let (mut work, final_value) = if value1 < value2 {
            (work1, value1)
        } else {
            (work2, value2)
        };

        // The 3' branch is always constrained: the anchor O3' stays, the
        // built one is discarded.
        work.o3p = None;
        self.commit_ribose(work, &referential);
        self.rib_built_count = builds;
        Ok((final_value / 2.0).sqrt())
    }
}

fn class_rho_range(pucker: Option<PropertyType>) -> (f64, f64) {
    match pucker {
        Some(p) => match (Residue::min_rho(p), Residue::max_rho(p)) {
            (Some(lo), Some(hi)) => (lo, hi),
            _ => (0.0, TWO_PI),
        },
        None => (0.0, TWO_PI),
    }
}

fn class_chi_range(glycosyl: Option<PropertyType>) -> (f64, f64) {
    match glycosyl {
        Some(g) => match (Residue::min_chi(g), Residue::max_chi(g)) {
            (Some(lo), Some(hi)) => (lo, hi),
            _ => (0.0, TWO_PI),
        },
        None => (0.0, TWO_PI),
    }
}
