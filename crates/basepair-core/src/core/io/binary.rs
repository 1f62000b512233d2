use crate::core::annotate::{AnnotationFlags, Relation, UnknownResidue};
use crate::core::geometry::Transfo;
use crate::core::graph::{GraphModel, ResidueKey};
use crate::core::models::{Atom, ResId, Residue};
use crate::core::pairing::{HBond, HBondFlow};
use crate::core::types::{
    parse_atom_type, parse_property_type, parse_residue_type, PropertyType,
};
use nalgebra::{Matrix4, Point3};
use std::collections::{BTreeSet, HashMap};
use std::io::{Read, Write};
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DeserializeError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    UnknownResidue(#[from] UnknownResidue),
    #[error("malformed record: {0}")]
    Malformed(String),
}

// --- Primitives -------------------------------------------------------------

fn write_u8<W: Write>(w: &mut W, v: u8) -> std::io::Result<()> {
    w.write_all(&[v])
}

fn write_u32<W: Write>(w: &mut W, v: u32) -> std::io::Result<()> {
    w.write_all(&v.to_le_bytes())
}

fn write_u64<W: Write>(w: &mut W, v: u64) -> std::io::Result<()> {
    w.write_all(&v.to_le_bytes())
}

fn write_i32<W: Write>(w: &mut W, v: i32) -> std::io::Result<()> {
    w.write_all(&v.to_le_bytes())
}

fn write_f32<W: Write>(w: &mut W, v: f32) -> std::io::Result<()> {
    w.write_all(&v.to_le_bytes())
}

fn write_str<W: Write>(w: &mut W, s: &str) -> std::io::Result<()> {
    write_u32(w, s.len() as u32)?;
    w.write_all(s.as_bytes())
}

fn read_u8<R: Read>(r: &mut R) -> std::io::Result<u8> {
    let mut buf = [0u8; 1];
    r.read_exact(&mut buf)?;
    Ok(buf[0])
}

fn read_u32<R: Read>(r: &mut R) -> std::io::Result<u32> {
    let mut buf = [0u8; 4];
    r.read_exact(&mut buf)?;
    Ok(u32::from_le_bytes(buf))
}

fn read_u64<R: Read>(r: &mut R) -> std::io::Result<u64> {
    let mut buf = [0u8; 8];
    r.read_exact(&mut buf)?;
    Ok(u64::from_le_bytes(buf))
}

fn read_i32<R: Read>(r: &mut R) -> std::io::Result<i32> {
    let mut buf = [0u8; 4];
    r.read_exact(&mut buf)?;
    Ok(i32::from_le_bytes(buf))
}

fn read_f32<R: Read>(r: &mut R) -> std::io::Result<f32> {
    let mut buf = [0u8; 4];
    r.read_exact(&mut buf)?;
    Ok(f32::from_le_bytes(buf))
}

fn read_str<R: Read>(r: &mut R) -> Result<String, DeserializeError> {
    let len = read_u32(r)? as usize;
    let mut buf = vec![0u8; len];
    r.read_exact(&mut buf)?;
    String::from_utf8(buf).map_err(|e| DeserializeError::Malformed(e.to_string()))
}

fn write_res_id<W: Write>(w: &mut W, id: ResId) -> std::io::Result<()> {
    write_u32(w, id.chain as u32)?;
    write_i32(w, id.number)?;
    write_u32(w, id.insertion as u32)
}

fn read_res_id<R: Read>(r: &mut R) -> Result<ResId, DeserializeError> {
    let chain = read_char(r)?;
    let number = read_i32(r)?;
    let insertion = read_char(r)?;
    Ok(ResId::with_insertion(chain, number, insertion))
}

fn read_char<R: Read>(r: &mut R) -> Result<char, DeserializeError> {
    let code = read_u32(r)?;
    char::from_u32(code)
        .ok_or_else(|| DeserializeError::Malformed(format!("invalid character code {code}")))
}

fn write_transfo<W: Write>(w: &mut W, tfo: &Transfo) -> std::io::Result<()> {
    for value in tfo.matrix().iter() {
        write_f32(w, *value as f32)?;
    }
    Ok(())
}

fn read_transfo<R: Read>(r: &mut R) -> Result<Transfo, DeserializeError> {
    let mut values = [0.0f64; 16];
    for value in &mut values {
        *value = read_f32(r)? as f64;
    }
    Ok(Transfo::from_matrix(Matrix4::from_column_slice(&values)))
}

fn write_property<W: Write>(w: &mut W, p: PropertyType) -> std::io::Result<()> {
    write_str(w, p.key())
}

fn read_property<R: Read>(r: &mut R) -> Result<PropertyType, DeserializeError> {
    Ok(parse_property_type(&read_str(r)?))
}

// --- Residue records --------------------------------------------------------

/// Residue record: type tag, id, atom count, atoms (position + type tag).
pub fn write_residue<W: Write>(w: &mut W, residue: &Residue) -> std::io::Result<()> {
    write_str(w, residue.res_type().key())?;
    write_res_id(w, residue.id())?;
    write_u64(w, residue.len() as u64)?;
    for atom in residue.iter() {
        write_f32(w, atom.position.x as f32)?;
        write_f32(w, atom.position.y as f32)?;
        write_f32(w, atom.position.z as f32)?;
        write_str(w, atom.atom_type.key())?;
    }
    Ok(())
}

pub fn read_residue<R: Read>(r: &mut R) -> Result<Residue, DeserializeError> {
    let type_key = read_str(r)?;
    let res_type = parse_residue_type(&type_key)
        .ok_or_else(|| DeserializeError::Malformed(format!("unknown residue type '{type_key}'")))?;
    let id = read_res_id(r)?;

    let mut residue = Residue::new(res_type, id);
    let count = read_u64(r)?;
    for _ in 0..count {
        let x = read_f32(r)? as f64;
        let y = read_f32(r)? as f64;
        let z = read_f32(r)? as f64;
        let atom_key = read_str(r)?;
        let atom_type = parse_atom_type(&atom_key).ok_or_else(|| {
            DeserializeError::Malformed(format!("unknown atom type '{atom_key}'"))
        })?;
        residue.insert(Atom::new(Point3::new(x, y, z), atom_type));
    }
    Ok(residue)
}

// --- Relation records -------------------------------------------------------

fn write_hbond_flow<W: Write>(w: &mut W, hbf: &HBondFlow) -> std::io::Result<()> {
    write_str(w, hbf.hbond.donor.key())?;
    write_str(w, hbf.hbond.hydrogen.key())?;
    write_str(w, hbf.hbond.acceptor.key())?;
    write_str(w, hbf.hbond.lonepair.key())?;
    write_res_id(w, hbf.hbond.donor_residue().unwrap_or_default())?;
    write_res_id(w, hbf.hbond.acceptor_residue().unwrap_or_default())?;
    write_f32(w, hbf.hbond.value() as f32)?;
    write_f32(w, hbf.flow as f32)
}

fn read_hbond_flow<R: Read>(r: &mut R) -> Result<HBondFlow, DeserializeError> {
    let mut atoms = [crate::core::types::AtomType::PSY; 4];
    for atom in &mut atoms {
        let key = read_str(r)?;
        *atom = parse_atom_type(&key)
            .ok_or_else(|| DeserializeError::Malformed(format!("unknown atom type '{key}'")))?;
    }
    let donor_res = read_res_id(r)?;
    let acceptor_res = read_res_id(r)?;
    let value = read_f32(r)? as f64;
    let flow = read_f32(r)? as f64;

    let hbond = HBond::from_parts(
        atoms[0],
        atoms[1],
        atoms[2],
        atoms[3],
        value,
        Some(donor_res),
        Some(acceptor_res),
    );
    Ok(HBondFlow::new(hbond, flow))
}

/// Relation record: residue ids, transforms, faces, labels, annotation
/// bitmask, hydrogen-bond flows, total flow, paired faces.
pub fn write_relation<W: Write>(w: &mut W, relation: &Relation) -> std::io::Result<()> {
    write_res_id(w, relation.ref_res().id())?;
    write_res_id(w, relation.res().id())?;
    write_transfo(w, relation.tfo())?;
    write_transfo(w, relation.po4_tfo())?;
    write_property(w, relation.ref_face())?;
    write_property(w, relation.res_face())?;
    write_u64(w, relation.labels().len() as u64)?;
    for &label in relation.labels() {
        write_property(w, label)?;
    }
    write_u8(w, relation.flags().bits())?;
    write_u64(w, relation.hbond_flows().len() as u64)?;
    for hbf in relation.hbond_flows() {
        write_hbond_flow(w, hbf)?;
    }
    write_f32(w, relation.sum_flow() as f32)?;
    write_u64(w, relation.paired_faces().len() as u64)?;
    for &(a, b) in relation.paired_faces() {
        write_property(w, a)?;
        write_property(w, b)?;
    }
    Ok(())
}

/// Reads a relation, re-resolving both residue ids against `residues`.
pub fn read_relation<R: Read>(
    r: &mut R,
    residues: &HashMap<ResId, Arc<Residue>>,
) -> Result<Relation, DeserializeError> {
    let ref_id = read_res_id(r)?;
    let res_id = read_res_id(r)?;
    let ref_res = residues
        .get(&ref_id)
        .ok_or(UnknownResidue(ref_id))?
        .clone();
    let res = residues.get(&res_id).ok_or(UnknownResidue(res_id))?.clone();

    let tfo = read_transfo(r)?;
    let po4_tfo = read_transfo(r)?;
    let ref_face = read_property(r)?;
    let res_face = read_property(r)?;

    let label_count = read_u64(r)?;
    let mut labels = BTreeSet::new();
    for _ in 0..label_count {
        labels.insert(read_property(r)?);
    }

    let flags = AnnotationFlags::from_bits_truncate(read_u8(r)?);

    let hbond_count = read_u64(r)?;
    let mut hbonds = Vec::with_capacity(hbond_count as usize);
    for _ in 0..hbond_count {
        hbonds.push(read_hbond_flow(r)?);
    }

    let sum_flow = read_f32(r)? as f64;

    let face_count = read_u64(r)?;
    let mut paired_faces = Vec::with_capacity(face_count as usize);
    for _ in 0..face_count {
        let a = read_property(r)?;
        let b = read_property(r)?;
        paired_faces.push((a, b));
    }

    Ok(Relation::from_parts(
        ref_res,
        res,
        tfo,
        po4_tfo,
        ref_face,
        res_face,
        labels,
        flags,
        hbonds,
        sum_flow,
        paired_faces,
    ))
}

// --- Model records ----------------------------------------------------------

/// Model record: residue count and residues in model order, then relation
/// count and relation records.
pub fn write_model<W: Write>(w: &mut W, model: &GraphModel) -> std::io::Result<()> {
    write_u64(w, model.len() as u64)?;
    for (_, residue) in model.residues_iter() {
        write_residue(w, residue)?;
    }
    write_u64(w, model.edge_count() as u64)?;
    for (_, relation) in model.edges_iter() {
        write_relation(w, relation)?;
    }
    Ok(())
}

/// Reads a model, reattaching every relation to the freshly read residues
/// by id.
pub fn read_model<R: Read>(r: &mut R) -> Result<GraphModel, DeserializeError> {
    let mut model = GraphModel::new();
    let mut by_id: HashMap<ResId, (ResidueKey, Arc<Residue>)> = HashMap::new();

    let residue_count = read_u64(r)?;
    for _ in 0..residue_count {
        let residue = read_residue(r)?;
        let id = residue.id();
        let key = model.insert(residue);
        let arc = model
            .residue(key)
            .expect("freshly inserted residue exists")
            .clone();
        by_id.insert(id, (key, arc));
    }

    let lookup: HashMap<ResId, Arc<Residue>> = by_id
        .iter()
        .map(|(&id, (_, arc))| (id, arc.clone()))
        .collect();

    let relation_count = read_u64(r)?;
    for _ in 0..relation_count {
        let relation = read_relation(r, &lookup)?;
        let from = by_id[&relation.ref_res().id()].0;
        let to = by_id[&relation.res().id()].0;
        model.insert_relation_edge(from, to, relation);
    }
    Ok(model)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::{AtomType, ResidueType};
    use std::io::{BufReader, BufWriter, Cursor, Seek, SeekFrom};

    fn full_residue(res_type: ResidueType, chain: char, number: i32) -> Residue {
        let mut res = Residue::new(res_type, ResId::new(chain, number));
        res.set_full_theoretical().unwrap();
        res
    }

    fn approx_points(a: &Point3<f64>, b: &Point3<f64>) -> bool {
        (a - b).norm() < 1e-4
    }

    #[test]
    fn residue_round_trips_through_a_buffer() {
        let residue = full_residue(ResidueType::RG, 'A', 7);
        let mut buf = Vec::new();
        write_residue(&mut buf, &residue).unwrap();

        let restored = read_residue(&mut Cursor::new(buf)).unwrap();
        assert_eq!(restored.id(), residue.id());
        assert_eq!(restored.res_type(), residue.res_type());
        assert_eq!(restored.len(), residue.len());
        for atom in residue.iter() {
            let restored_atom = restored.find(atom.atom_type).unwrap();
            assert!(
                approx_points(&atom.position, &restored_atom.position),
                "{} moved",
                atom.atom_type
            );
        }
    }

    #[test]
    fn relation_round_trips_and_reattaches_residues() {
        use crate::core::annotate::AnnotationFlags;
        use crate::core::geometry::Transfo;
        use nalgebra::Vector3;

        let a = full_residue(ResidueType::RA, 'A', 1);
        let mut g = full_residue(ResidueType::RG, 'A', 2);
        let o3p = a.pos(AtomType::O3Prime).unwrap();
        let p = g.pos(AtomType::P).unwrap();
        g.transform(&Transfo::translation(o3p + Vector3::new(1.6, 0.0, 0.0) - p));

        let mut relation = Relation::new(Arc::new(a.clone()), Arc::new(g.clone()));
        relation.annotate(AnnotationFlags::all());

        let mut buf = Vec::new();
        write_relation(&mut buf, &relation).unwrap();

        let mut residues = HashMap::new();
        residues.insert(a.id(), Arc::new(a.clone()));
        residues.insert(g.id(), Arc::new(g.clone()));
        let restored = read_relation(&mut Cursor::new(buf.clone()), &residues).unwrap();

        assert_eq!(restored.labels(), relation.labels());
        assert_eq!(restored.flags(), relation.flags());
        assert_eq!(restored.ref_face(), relation.ref_face());
        assert!((restored.sum_flow() - relation.sum_flow()).abs() < 1e-4);
        let diff = restored.tfo().matrix() - relation.tfo().matrix();
        assert!(diff.abs().max() < 1e-4);

        // A missing residue id is fatal for the record.
        residues.remove(&g.id());
        let err = read_relation(&mut Cursor::new(buf), &residues).unwrap_err();
        assert!(matches!(err, DeserializeError::UnknownResidue(_)));
    }

    #[test]
    fn model_round_trips_through_a_file() {
        let mut model = GraphModel::new();
        model.insert(full_residue(ResidueType::RA, 'A', 1));
        model.insert(full_residue(ResidueType::RG, 'A', 2));
        model.annotate();

        let mut file = tempfile::tempfile().unwrap();
        {
            let mut writer = BufWriter::new(&mut file);
            write_model(&mut writer, &model).unwrap();
        }
        file.seek(SeekFrom::Start(0)).unwrap();

        let restored = read_model(&mut BufReader::new(&mut file)).unwrap();
        assert_eq!(restored.len(), model.len());
        assert_eq!(restored.edge_count(), model.edge_count());

        // Edges resolve against the restored residues, not the originals.
        for (_, relation) in restored.edges_iter() {
            assert!(restored
                .residues_iter()
                .any(|(_, r)| Arc::ptr_eq(r, relation.ref_res())));
        }
    }

    #[test]
    fn truncated_stream_is_an_io_error() {
        let residue = full_residue(ResidueType::RG, 'A', 7);
        let mut buf = Vec::new();
        write_residue(&mut buf, &residue).unwrap();
        buf.truncate(buf.len() / 2);

        let err = read_residue(&mut Cursor::new(buf)).unwrap_err();
        assert!(matches!(err, DeserializeError::Io(_)));
    }
}
