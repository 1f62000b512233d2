//! Minimum cycle basis on an undirected graph (Horton's enumeration with
//! Gaussian elimination over GF(2)).
//!
//! Candidate cycles are formed per root vertex from breadth-first
//! shortest-path trees: the root's two disjoint paths to the endpoints of
//! an edge, closed by that edge. Sorted by length, a candidate enters the
//! basis when its edge-incidence vector is independent of the cycles
//! already kept. The union query keeps every candidate that is not a sum of
//! strictly shorter ones, which is exactly the union of all minimum bases.

use std::collections::{HashSet, VecDeque};

/// A cycle as an ordered vertex sequence plus its length value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CyclePath {
    pub vertices: Vec<usize>,
    pub value: i32,
}

/// Undirected simple graph over vertex indices `0..n`.
#[derive(Debug, Clone, Default)]
pub(crate) struct CycleGraph {
    vertex_count: usize,
    edges: Vec<(usize, usize)>,
    adjacency: Vec<Vec<(usize, usize)>>, // vertex -> (neighbor, edge index)
    edge_set: HashSet<(usize, usize)>,
}

/// Edge-incidence bitvector.
type EdgeBits = Vec<u64>;

fn bit_set(bits: &mut EdgeBits, index: usize) {
    bits[index / 64] |= 1 << (index % 64);
}

fn bits_xor(a: &mut EdgeBits, b: &EdgeBits) {
    for (x, y) in a.iter_mut().zip(b) {
        *x ^= y;
    }
}

fn bits_is_zero(bits: &EdgeBits) -> bool {
    bits.iter().all(|&w| w == 0)
}

fn leading_bit(bits: &EdgeBits) -> Option<usize> {
    bits.iter()
        .enumerate()
        .find(|(_, &w)| w != 0)
        .map(|(i, &w)| i * 64 + w.trailing_zeros() as usize)
}

/// Eliminates `bits` against a basis whose members carry pairwise distinct
/// leading bits. Each round clears the current leading bit, so the loop
/// terminates.
fn reduce(basis: &[EdgeBits], bits: &mut EdgeBits) {
    loop {
        let Some(lead) = leading_bit(bits) else {
            return;
        };
        match basis.iter().find(|b| leading_bit(b) == Some(lead)) {
            Some(b) => bits_xor(bits, b),
            None => return,
        }
    }
}

fn in_span(basis: &[EdgeBits], bits: &EdgeBits) -> bool {
    let mut reduced = bits.clone();
    reduce(basis, &mut reduced);
    bits_is_zero(&reduced)
}

impl CycleGraph {
    pub fn new(vertex_count: usize) -> Self {
        CycleGraph {
            vertex_count,
            edges: Vec::new(),
            adjacency: vec![Vec::new(); vertex_count],
            edge_set: HashSet::new(),
        }
    }

    pub fn connect(&mut self, u: usize, v: usize) {
        let key = (u.min(v), u.max(v));
        if u == v || self.edge_set.contains(&key) {
            return;
        }
        let id = self.edges.len();
        self.edges.push(key);
        self.edge_set.insert(key);
        self.adjacency[u].push((v, id));
        self.adjacency[v].push((u, id));
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Number of connected components.
    fn component_count(&self) -> usize {
        let mut seen = vec![false; self.vertex_count];
        let mut components = 0;
        for start in 0..self.vertex_count {
            if seen[start] {
                continue;
            }
            components += 1;
            let mut queue = VecDeque::from([start]);
            seen[start] = true;
            while let Some(u) = queue.pop_front() {
                for &(v, _) in &self.adjacency[u] {
                    if !seen[v] {
                        seen[v] = true;
                        queue.push_back(v);
                    }
                }
            }
        }
        components
    }

    /// Dimension of the cycle space: |E| - |V| + components.
    pub fn cyclomatic_number(&self) -> usize {
        self.edge_count() + self.component_count() - self.vertex_count
    }

    /// Breadth-first parents and distances from `root`.
    fn bfs(&self, root: usize) -> (Vec<Option<usize>>, Vec<Option<u32>>) {
        let mut parent = vec![None; self.vertex_count];
        let mut dist = vec![None; self.vertex_count];
        dist[root] = Some(0);
        let mut queue = VecDeque::from([root]);
        while let Some(u) = queue.pop_front() {
            for &(v, _) in &self.adjacency[u] {
                if dist[v].is_none() {
                    dist[v] = dist[u].map(|d| d + 1);
                    parent[v] = Some(u);
                    queue.push_back(v);
                }
            }
        }
        (parent, dist)
    }

    fn path_to_root(parent: &[Option<usize>], mut v: usize) -> Vec<usize> {
        let mut path = vec![v];
        while let Some(p) = parent[v] {
            path.push(p);
            v = p;
        }
        path
    }

    fn edge_index(&self, u: usize, v: usize) -> Option<usize> {
        self.adjacency[u]
            .iter()
            .find(|&&(w, _)| w == v)
            .map(|&(_, id)| id)
    }

    /// Horton candidates: for every root and every edge, the cycle closing
    /// the two root paths, kept when the paths share only the root.
    /// Deduplicated by edge set and sorted by length.
    fn horton_candidates(&self) -> Vec<(EdgeBits, Vec<usize>)> {
        let words = self.edge_count().div_ceil(64).max(1);
        let mut seen: HashSet<EdgeBits> = HashSet::new();
        let mut candidates = Vec::new();

        for root in 0..self.vertex_count {
            let (parent, dist) = self.bfs(root);

            for &(u, v) in &self.edges {
                if dist[u].is_none() || dist[v].is_none() {
                    continue;
                }
                let path_u = Self::path_to_root(&parent, u);
                let path_v = Self::path_to_root(&parent, v);

                // The two paths must be disjoint apart from the root.
                let set_u: HashSet<usize> = path_u.iter().copied().collect();
                let shared = path_v.iter().filter(|w| set_u.contains(w)).count();
                if shared != 1 || path_u.last() != Some(&root) {
                    continue;
                }

                // Vertex sequence: root .. u, then v .. back toward root.
                let mut vertices: Vec<usize> = path_u.into_iter().rev().collect();
                vertices.extend(path_v.into_iter().take_while(|&w| w != root));

                let mut bits = vec![0u64; words];
                for i in 0..vertices.len() {
                    let a = vertices[i];
                    let b = vertices[(i + 1) % vertices.len()];
                    let id = self
                        .edge_index(a, b)
                        .expect("consecutive cycle vertices are connected");
                    bit_set(&mut bits, id);
                }

                if seen.insert(bits.clone()) {
                    candidates.push((bits, vertices));
                }
            }
        }

        candidates.sort_by_key(|(_, vertices)| vertices.len());
        candidates
    }

    /// One minimum cycle basis: |E| - |V| + components cycles.
    pub fn cycle_base(&self) -> Vec<CyclePath> {
        let target = self.cyclomatic_number();
        let mut basis: Vec<EdgeBits> = Vec::new();
        let mut result = Vec::new();

        for (bits, vertices) in self.horton_candidates() {
            if result.len() == target {
                break;
            }
            let mut reduced = bits;
            reduce(&basis, &mut reduced);
            if !bits_is_zero(&reduced) {
                basis.push(reduced);
                let value = vertices.len() as i32;
                result.push(CyclePath { vertices, value });
            }
        }
        result
    }

    /// Union of every minimum cycle basis: the candidates that are not a
    /// GF(2) sum of strictly shorter candidates.
    pub fn cycle_base_union(&self) -> Vec<CyclePath> {
        let candidates = self.horton_candidates();
        let mut result = Vec::new();
        let mut shorter_basis: Vec<EdgeBits> = Vec::new();
        let mut group_start = 0;

        while group_start < candidates.len() {
            let length = candidates[group_start].1.len();
            let group_end = candidates[group_start..]
                .iter()
                .position(|(_, v)| v.len() != length)
                .map(|p| group_start + p)
                .unwrap_or(candidates.len());

            // Membership tests against strictly shorter cycles only.
            for (bits, vertices) in &candidates[group_start..group_end] {
                if !in_span(&shorter_basis, bits) {
                    result.push(CyclePath {
                        vertices: vertices.clone(),
                        value: vertices.len() as i32,
                    });
                }
            }

            // Then fold the whole group into the span.
            for (bits, _) in &candidates[group_start..group_end] {
                let mut reduced = bits.clone();
                reduce(&shorter_basis, &mut reduced);
                if !bits_is_zero(&reduced) {
                    shorter_basis.push(reduced);
                }
            }

            group_start = group_end;
        }
        result
    }
}
