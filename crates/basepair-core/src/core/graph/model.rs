use super::contacts::extract_contacts;
use super::cycles::{CycleGraph, CyclePath};
use crate::core::annotate::{Relation, UnknownResidue};
use crate::core::models::{ResId, Residue};
use rayon::prelude::*;
use slotmap::{new_key_type, SecondaryMap, SlotMap};
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};

new_key_type! {
    pub struct ResidueKey;
    pub struct RelationKey;
}

const CONTACT_CUTOFF: f64 = 5.0;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GraphModelError {
    #[error(transparent)]
    UnknownResidue(#[from] UnknownResidue),
}

/// The annotated residue graph.
///
/// Vertices are residues (shared by strong reference), edges are
/// [`Relation`] objects; every annotated directed edge has a symmetric
/// reverse edge carrying the inverted relation. Vertices and edges carry an
/// integer weight for the cycle-basis queries.
#[derive(Debug, Default)]
pub struct GraphModel {
    residues: SlotMap<ResidueKey, Arc<Residue>>,
    relations: SlotMap<RelationKey, Relation>,
    edges: HashMap<(ResidueKey, ResidueKey), RelationKey>,
    vertex_weights: SecondaryMap<ResidueKey, i32>,
    edge_weights: SecondaryMap<RelationKey, i32>,
    order: Vec<ResidueKey>,
    annotated: bool,
}

impl GraphModel {
    pub fn new() -> Self {
        GraphModel::default()
    }

    /// Inserts a residue with vertex weight zero and returns its key.
    pub fn insert(&mut self, residue: Residue) -> ResidueKey {
        let key = self.residues.insert(Arc::new(residue));
        self.vertex_weights.insert(key, 0);
        self.order.push(key);
        key
    }

    pub fn residue(&self, key: ResidueKey) -> Option<&Arc<Residue>> {
        self.residues.get(key)
    }

    /// Residues in model order.
    pub fn residues_iter(&self) -> impl Iterator<Item = (ResidueKey, &Arc<Residue>)> {
        self.order.iter().map(move |&k| (k, &self.residues[k]))
    }

    pub fn len(&self) -> usize {
        self.residues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.residues.is_empty()
    }

    pub fn relation(&self, key: RelationKey) -> Option<&Relation> {
        self.relations.get(key)
    }

    /// The relation on the directed edge (from, to), if annotated.
    pub fn edge(&self, from: ResidueKey, to: ResidueKey) -> Option<&Relation> {
        self.edges.get(&(from, to)).map(|&k| &self.relations[k])
    }

    pub fn edges_iter(&self) -> impl Iterator<Item = ((ResidueKey, ResidueKey), &Relation)> {
        self.edges.iter().map(move |(&pair, &k)| (pair, &self.relations[k]))
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn vertex_weight(&self, key: ResidueKey) -> Option<i32> {
        self.vertex_weights.get(key).copied()
    }

    pub fn set_vertex_weight(&mut self, key: ResidueKey, weight: i32) {
        if let Some(w) = self.vertex_weights.get_mut(key) {
            *w = weight;
        }
    }

    /// Removes a residue and every edge touching it.
    pub fn remove(&mut self, key: ResidueKey) -> Option<Arc<Residue>> {
        let removed = self.residues.remove(key)?;
        self.order.retain(|&k| k != key);
        let stale: Vec<(ResidueKey, ResidueKey)> = self
            .edges
            .keys()
            .filter(|&&(a, b)| a == key || b == key)
            .copied()
            .collect();
        for pair in stale {
            if let Some(rel_key) = self.edges.remove(&pair) {
                self.relations.remove(rel_key);
                self.edge_weights.remove(rel_key);
            }
        }
        Some(removed)
    }

    /// Drops every water residue.
    pub fn remove_water(&mut self) {
        let waters: Vec<ResidueKey> = self
            .residues
            .iter()
            .filter(|(_, r)| r.res_type().is_water())
            .map(|(k, _)| k)
            .collect();
        for key in waters {
            self.remove(key);
        }
    }

    /// Regenerates derived atoms on every residue: pseudo-atoms, hydrogens,
    /// lone pairs.
    fn add_hydrogens_and_lone_pairs(&mut self) {
        for (_, residue) in self.residues.iter_mut() {
            let res = Arc::make_mut(residue);
            res.finalize();
            res.add_hydrogens();
            res.add_lone_pairs();
        }
    }

    /// Annotates the model: waters are dropped, derived atoms are placed,
    /// contact candidates are enumerated at 5 angstroms, and every pair
    /// that annotates contributes its edge and the inverted reverse edge.
    ///
    /// Idempotent: previously computed edges are cleared first.
    pub fn annotate(&mut self) {
        self.relations.clear();
        self.edges.clear();
        self.edge_weights.clear();

        self.remove_water();
        self.add_hydrogens_and_lone_pairs();

        let list: Vec<(ResidueKey, &Residue)> = self
            .order
            .iter()
            .map(|&k| (k, self.residues[k].as_ref()))
            .collect();
        let contacts = extract_contacts(&list, CONTACT_CUTOFF);
        info!(count = contacts.len(), "possible contacts");

        // Per-pair annotation only reads the shared residues.
        let annotated: Vec<(ResidueKey, ResidueKey, Relation)> = contacts
            .par_iter()
            .filter_map(|&(i, j)| {
                let mut relation =
                    Relation::new(self.residues[i].clone(), self.residues[j].clone());
                relation.annotate_all().then_some((i, j, relation))
            })
            .collect();
        debug!(count = annotated.len(), "annotated relations");

        for (i, j, relation) in annotated {
            let mut inverted = relation.clone();
            inverted.invert();
            let forward = self.relations.insert(relation);
            let backward = self.relations.insert(inverted);
            self.edge_weights.insert(forward, 0);
            self.edge_weights.insert(backward, 0);
            self.edges.insert((i, j), forward);
            self.edges.insert((j, i), backward);
        }
        self.annotated = true;
    }

    pub fn is_annotated(&self) -> bool {
        self.annotated
    }

    /// Sorts the model order by residue id.
    pub fn sort(&mut self) {
        let residues = &self.residues;
        self.order.sort_by_key(|&k| residues[k].id());
    }

    /// Undirected projection of the annotated graph over model-order
    /// indices.
    fn undirected_projection(&self) -> CycleGraph {
        let index_of: HashMap<ResidueKey, usize> = self
            .order
            .iter()
            .enumerate()
            .map(|(i, &k)| (k, i))
            .collect();
        let mut graph = CycleGraph::new(self.order.len());
        for &(a, b) in self.edges.keys() {
            graph.connect(index_of[&a], index_of[&b]);
        }
        graph
    }

    fn paths_to_keys(&self, paths: Vec<CyclePath>) -> Vec<(Vec<ResidueKey>, i32)> {
        paths
            .into_iter()
            .map(|p| {
                (
                    p.vertices.into_iter().map(|i| self.order[i]).collect(),
                    p.value,
                )
            })
            .collect()
    }

    /// A minimum cycle basis of the annotated graph, as ordered residue-key
    /// sequences with their length values.
    pub fn cycle_base(&self) -> Vec<(Vec<ResidueKey>, i32)> {
        self.paths_to_keys(self.undirected_projection().cycle_base())
    }

    /// The union of every minimum cycle basis.
    pub fn cycle_base_union(&self) -> Vec<(Vec<ResidueKey>, i32)> {
        self.paths_to_keys(self.undirected_projection().cycle_base_union())
    }

    /// Inserts an already-built relation on a directed edge. Used by the
    /// deserializer after residue handles have been re-resolved.
    pub(crate) fn insert_relation_edge(
        &mut self,
        from: ResidueKey,
        to: ResidueKey,
        relation: Relation,
    ) {
        let key = self.relations.insert(relation);
        self.edge_weights.insert(key, 0);
        self.edges.insert((from, to), key);
    }

    /// Deep copy: residues are cloned and every relation is rewired through
    /// an id lookup. A relation referencing a residue absent from the model
    /// is an error.
    pub fn deep_copy(&self) -> Result<GraphModel, GraphModelError> {
        let mut copy = GraphModel::new();
        let mut key_map: HashMap<ResidueKey, ResidueKey> = HashMap::new();
        let mut id_map: HashMap<ResId, Arc<Residue>> = HashMap::new();

        for &key in &self.order {
            let residue = self.residues[key].as_ref().clone();
            let new_key = copy.insert(residue);
            copy.vertex_weights
                .insert(new_key, self.vertex_weights[key]);
            key_map.insert(key, new_key);
            id_map.insert(copy.residues[new_key].id(), copy.residues[new_key].clone());
        }

        for (&(a, b), &rel_key) in &self.edges {
            let mut relation = self.relations[rel_key].clone();
            relation.reassign_residues(&id_map)?;
            let new_rel = copy.relations.insert(relation);
            copy.edge_weights
                .insert(new_rel, self.edge_weights[rel_key]);
            copy.edges.insert((key_map[&a], key_map[&b]), new_rel);
        }
        copy.annotated = self.annotated;
        Ok(copy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::geometry::Transfo;
    use crate::core::types::{PropertyType, ResidueType};
    use nalgebra::Vector3;

    fn full_residue(res_type: ResidueType, number: i32, offset: Vector3<f64>) -> Residue {
        let mut res = Residue::new(res_type, ResId::new('A', number));
        res.set_full_theoretical().unwrap();
        res.transform(&Transfo::translation(offset));
        res
    }

    /// Two stacked copies of a base within contact range, one far residue.
    fn simple_model() -> GraphModel {
        let mut model = GraphModel::new();
        let g1 = full_residue(ResidueType::RG, 1, Vector3::zeros());

        let center = Relation::pyrimidine_ring_center(&g1).unwrap();
        let normal = Relation::pyrimidine_ring_normal(&g1, &center).unwrap();
        let mut g2 = full_residue(ResidueType::RG, 2, Vector3::zeros());
        g2.transform(&Transfo::translation(normal * 3.4));

        let far = full_residue(ResidueType::RC, 3, Vector3::new(60.0, 0.0, 0.0));

        model.insert(g1);
        model.insert(g2);
        model.insert(far);
        model
    }

    #[test]
    fn annotation_builds_symmetric_edges() {
        let mut model = simple_model();
        model.annotate();
        assert!(model.is_annotated());

        // One annotated pair, two directed edges.
        assert_eq!(model.edge_count(), 2);
        let keys: Vec<ResidueKey> = model.residues_iter().map(|(k, _)| k).collect();
        let forward = model.edge(keys[0], keys[1]).unwrap();
        let backward = model.edge(keys[1], keys[0]).unwrap();
        assert!(forward.is_stacking());
        assert!(backward.is_stacking());
        assert!(forward.has(PropertyType::Upward));
        assert!(backward.has(PropertyType::Downward));
    }

    #[test]
    fn annotation_is_idempotent() {
        let mut model = simple_model();
        model.annotate();
        let first = model.edge_count();
        model.annotate();
        assert_eq!(model.edge_count(), first);
    }

    #[test]
    fn water_is_removed_by_annotation() {
        let mut model = simple_model();
        let mut water = Residue::new(ResidueType::Water, ResId::new('W', 1));
        water.insert(crate::core::models::Atom::from_coords(
            0.0,
            0.0,
            0.0,
            crate::core::types::AtomType::O,
        ));
        model.insert(water);
        assert_eq!(model.len(), 4);

        model.annotate();
        assert_eq!(model.len(), 3);
    }

    #[test]
    fn sort_orders_by_residue_id() {
        let mut model = GraphModel::new();
        model.insert(full_residue(ResidueType::RG, 5, Vector3::zeros()));
        model.insert(full_residue(ResidueType::RA, 2, Vector3::new(30.0, 0.0, 0.0)));
        model.sort();

        let numbers: Vec<i32> = model.residues_iter().map(|(_, r)| r.id().number).collect();
        assert_eq!(numbers, vec![2, 5]);
    }

    #[test]
    fn cycle_base_counts_follow_the_graph_shape() {
        // Three residues pairwise in contact give one 3-cycle in the
        // undirected projection.
        let mut model = GraphModel::new();
        let g1 = full_residue(ResidueType::RG, 1, Vector3::zeros());
        let center = Relation::pyrimidine_ring_center(&g1).unwrap();
        let normal = Relation::pyrimidine_ring_normal(&g1, &center).unwrap();

        let mut g2 = full_residue(ResidueType::RG, 2, Vector3::zeros());
        g2.transform(&Transfo::translation(normal * 3.4));
        let mut g3 = full_residue(ResidueType::RG, 3, Vector3::zeros());
        g3.transform(&Transfo::translation(normal * 6.8));

        model.insert(g1);
        model.insert(g2);
        model.insert(g3);
        model.annotate();

        let undirected: usize = model.edge_count() / 2;
        let expected = undirected + 1 - model.len(); // connected components: 1
        assert_eq!(model.cycle_base().len(), expected);
    }

    #[test]
    fn deep_copy_rewires_relations_to_the_new_residues() {
        let mut model = simple_model();
        model.annotate();
        let copy = model.deep_copy().unwrap();

        assert_eq!(copy.len(), model.len());
        assert_eq!(copy.edge_count(), model.edge_count());
        for (_, relation) in copy.edges_iter() {
            // The rewired handles point at residues owned by the copy.
            let id = relation.ref_res().id();
            assert!(copy
                .residues_iter()
                .any(|(_, r)| Arc::ptr_eq(r, relation.ref_res()) && r.id() == id));
        }
    }

    #[test]
    fn annotate_assigns_adjacency_between_linked_residues() {
        let mut model = GraphModel::new();
        let a = full_residue(ResidueType::RA, 1, Vector3::zeros());
        let mut g = full_residue(ResidueType::RG, 2, Vector3::zeros());
        let o3p = a.pos(crate::core::types::AtomType::O3Prime).unwrap();
        let p = g.pos(crate::core::types::AtomType::P).unwrap();
        g.transform(&Transfo::translation(o3p + Vector3::new(1.6, 0.0, 0.0) - p));

        let ka = model.insert(a);
        let kg = model.insert(g);
        model.annotate();

        let forward = model.edge(ka, kg).expect("pair annotates");
        assert!(forward.has(PropertyType::Adjacent5p));
        let backward = model.edge(kg, ka).unwrap();
        assert!(backward.has(PropertyType::Adjacent3p));
    }
}
