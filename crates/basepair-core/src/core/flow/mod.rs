//! Capacity-constrained bipartite matching.
//!
//! A directed flow graph solved by preflow-push, modified so that a node
//! with excess splits its push across parallel residual edges instead of
//! saturating one of them. In the hydrogen-bond setting this preserves
//! bifurcated geometries when the data supports them.

use std::collections::VecDeque;
use tracing::trace;

/// Excess below this magnitude is clamped to zero to stabilize
/// termination.
const EXCESS_EPSILON: f64 = 1e-5;

/// Edge payloads expose the capacity the flow may not exceed.
pub trait Capacity {
    fn capacity(&self) -> f64;
}

impl Capacity for f64 {
    fn capacity(&self) -> f64 {
        *self
    }
}

#[derive(Debug, Clone)]
struct FlowEdge<E> {
    from: usize,
    to: usize,
    payload: E,
    flow: f64,
}

/// Directed graph with edge capacities and per-edge flow.
#[derive(Debug, Clone, Default)]
pub struct MaximumFlowGraph<E> {
    vertex_count: usize,
    edges: Vec<FlowEdge<E>>,
    out_adj: Vec<Vec<usize>>,
    in_adj: Vec<Vec<usize>>,
}

impl<E: Capacity> MaximumFlowGraph<E> {
    pub fn new() -> Self {
        MaximumFlowGraph {
            vertex_count: 0,
            edges: Vec::new(),
            out_adj: Vec::new(),
            in_adj: Vec::new(),
        }
    }

    /// Adds a vertex and returns its label.
    pub fn add_vertex(&mut self) -> usize {
        self.out_adj.push(Vec::new());
        self.in_adj.push(Vec::new());
        self.vertex_count += 1;
        self.vertex_count - 1
    }

    pub fn len(&self) -> usize {
        self.vertex_count
    }

    pub fn is_empty(&self) -> bool {
        self.vertex_count == 0
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Connects two vertex labels with a directed edge carrying `payload`.
    pub fn connect(&mut self, from: usize, to: usize, payload: E) -> bool {
        if from >= self.vertex_count || to >= self.vertex_count {
            return false;
        }
        let id = self.edges.len();
        self.edges.push(FlowEdge {
            from,
            to,
            payload,
            flow: 0.0,
        });
        self.out_adj[from].push(id);
        self.in_adj[to].push(id);
        true
    }

    /// Iterates `(payload, flow)` over every edge.
    pub fn edges_iter(&self) -> impl Iterator<Item = (&E, f64)> {
        self.edges.iter().map(|e| (&e.payload, e.flow))
    }

    /// Total flow arriving into a vertex.
    pub fn in_flow(&self, vertex: usize) -> f64 {
        self.in_adj[vertex].iter().map(|&e| self.edges[e].flow).sum()
    }

    /// Total flow leaving a vertex.
    pub fn out_flow(&self, vertex: usize) -> f64 {
        self.out_adj[vertex].iter().map(|&e| self.edges[e].flow).sum()
    }

    /// Preflow-push between `source` and `sink`.
    ///
    /// Distance labels are initialized by a breadth-first sweep over the
    /// bidirectional edge set, the source floods its out-edges, and active
    /// vertices push their excess until none remains.
    pub fn pre_flow_push(&mut self, source: usize, sink: usize) {
        if source >= self.vertex_count || sink >= self.vertex_count {
            return;
        }

        let mut labels = vec![i64::MAX; self.vertex_count];
        let mut excess = vec![0.0_f64; self.vertex_count];
        let mut queue = VecDeque::new();

        labels[source] = 0;
        queue.push_back(source);
        while let Some(front) = queue.pop_front() {
            let distance = labels[front] + 1;
            let neighbors: Vec<usize> = self.out_adj[front]
                .iter()
                .map(|&e| self.edges[e].to)
                .chain(self.in_adj[front].iter().map(|&e| self.edges[e].from))
                .collect();
            for v in neighbors {
                if labels[v] > distance {
                    labels[v] = distance;
                    queue.push_back(v);
                }
            }
        }
        trace!(?labels, "initial distance labels");

        // Flood from the source.
        let mut active = VecDeque::new();
        for &e in &self.out_adj[source].clone() {
            let cap = self.edges[e].payload.capacity();
            self.edges[e].flow = cap;
            let to = self.edges[e].to;
            excess[to] = cap;
            excess[source] -= cap;
            active.push_back(to);
        }

        while let Some(&front) = active.front() {
            self.push_relabel(front, &mut active, &mut excess, &mut labels, source, sink);
            if excess[front] == 0.0 {
                active.pop_front();
            }
        }
    }

    fn push_relabel(
        &mut self,
        front: usize,
        active: &mut VecDeque<usize>,
        excess: &mut [f64],
        labels: &mut [i64],
        source: usize,
        sink: usize,
    ) {
        // Forward pushes along unsaturated out-edges toward larger labels.
        if excess[front] > 0.0 {
            let eligible: Vec<usize> = self.out_adj[front]
                .iter()
                .copied()
                .filter(|&e| {
                    labels[self.edges[e].to] > labels[front]
                        && self.edges[e].flow < self.edges[e].payload.capacity()
                })
                .collect();
            let caps: Vec<f64> = eligible
                .iter()
                .map(|&e| self.edges[e].payload.capacity() - self.edges[e].flow)
                .collect();
            let share = equilibrate_flow(caps, excess[front]);

            for e in eligible {
                let residual = self.edges[e].payload.capacity() - self.edges[e].flow;
                let delta = share.min(residual);
                let to = self.edges[e].to;
                trace!(from = front, to, delta, "push forward");
                self.edges[e].flow += delta;
                excess[front] -= delta;
                if excess[front].abs() < EXCESS_EPSILON {
                    excess[front] = 0.0;
                }
                if to != source && to != sink {
                    active.push_back(to);
                }
                excess[to] += delta;
            }
        }

        // Backward pushes returning flow along in-edges.
        if excess[front] > 0.0 {
            let eligible: Vec<usize> = self.in_adj[front]
                .iter()
                .copied()
                .filter(|&e| labels[self.edges[e].from] > labels[front] && self.edges[e].flow > 0.0)
                .collect();
            let caps: Vec<f64> = eligible.iter().map(|&e| self.edges[e].flow).collect();
            let share = equilibrate_flow(caps, excess[front]);

            for e in eligible {
                let delta = share.min(self.edges[e].flow);
                let from = self.edges[e].from;
                trace!(to = front, from, delta, "push back");
                self.edges[e].flow -= delta;
                excess[front] -= delta;
                if excess[front].abs() < EXCESS_EPSILON {
                    excess[front] = 0.0;
                }
                if from != source && from != sink {
                    active.push_back(from);
                }
                excess[from] += delta;
            }
        }

        // Relabel below the furthest residual neighbor.
        if excess[front] > 0.0 {
            let mut max_dist = -2 * self.vertex_count as i64;
            for &e in &self.out_adj[front] {
                if self.edges[e].payload.capacity() - self.edges[e].flow > 0.0 {
                    max_dist = max_dist.max(labels[self.edges[e].to]);
                }
            }
            for &e in &self.in_adj[front] {
                if self.edges[e].flow > 0.0 {
                    max_dist = max_dist.max(labels[self.edges[e].from]);
                }
            }
            trace!(vertex = front, from = labels[front], to = max_dist - 1, "relabel");
            labels[front] = max_dist - 1;
        }
    }
}

/// Splits an excess across sorted residual capacities: capacities below the
/// running equal share are taken whole, the remainder is divided equally
/// among the rest. Returns the per-edge share.
fn equilibrate_flow(mut capacities: Vec<f64>, mut excess: f64) -> f64 {
    capacities.sort_by(|a, b| a.partial_cmp(b).expect("capacities are finite"));
    let n = capacities.len();
    let mut i = 0;
    while i < n {
        if capacities[i] < excess / (n - i) as f64 {
            excess -= capacities[i];
            i += 1;
        } else {
            break;
        }
    }
    if i == n {
        // No capacity is exceeded by the equal share: give everything.
        1.0
    } else {
        excess / (n - i) as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOLERANCE: f64 = 1e-4;

    /// Bipartite graph shaped like the pairing use: source -> donors ->
    /// acceptors -> sink, unit node capacities on terminal edges.
    fn bipartite() -> (MaximumFlowGraph<f64>, usize, usize, Vec<usize>, Vec<usize>) {
        let mut graph = MaximumFlowGraph::new();
        let source = graph.add_vertex();
        let sink = graph.add_vertex();
        let donors: Vec<usize> = (0..2).map(|_| graph.add_vertex()).collect();
        let acceptors: Vec<usize> = (0..2).map(|_| graph.add_vertex()).collect();
        for &d in &donors {
            graph.connect(source, d, 1.0);
        }
        for &a in &acceptors {
            graph.connect(a, sink, 1.0);
        }
        (graph, source, sink, donors, acceptors)
    }

    #[test]
    fn flow_is_conserved_at_every_internal_vertex() {
        let (mut graph, source, sink, donors, acceptors) = bipartite();
        graph.connect(donors[0], acceptors[0], 0.9);
        graph.connect(donors[0], acceptors[1], 0.8);
        graph.connect(donors[1], acceptors[1], 0.7);

        graph.pre_flow_push(source, sink);

        for v in donors.iter().chain(acceptors.iter()) {
            let balance = graph.in_flow(*v) - graph.out_flow(*v);
            assert!(balance.abs() < TOLERANCE, "vertex {v} balance {balance}");
        }
    }

    #[test]
    fn flow_reaches_the_sink_through_a_chain() {
        let mut graph = MaximumFlowGraph::new();
        let source = graph.add_vertex();
        let sink = graph.add_vertex();
        let mid = graph.add_vertex();
        graph.connect(source, mid, 0.6);
        graph.connect(mid, sink, 1.0);

        graph.pre_flow_push(source, sink);
        assert!((graph.in_flow(sink) - 0.6).abs() < TOLERANCE);
    }

    #[test]
    fn node_capacity_limits_competing_bonds() {
        // One donor feeding two acceptors: total outflow cannot exceed the
        // source-side capacity of one.
        let (mut graph, source, sink, donors, acceptors) = bipartite();
        graph.connect(donors[0], acceptors[0], 1.0);
        graph.connect(donors[0], acceptors[1], 1.0);

        graph.pre_flow_push(source, sink);
        assert!(graph.out_flow(donors[0]) <= 1.0 + TOLERANCE);
        assert!(graph.in_flow(sink) <= 2.0 + TOLERANCE);
    }

    #[test]
    fn bifurcated_flow_is_split_rather_than_saturated() {
        // Two equal parallel bonds from one donor: the equilibration step
        // must spread the single unit of flow over both.
        let (mut graph, source, sink, donors, acceptors) = bipartite();
        let e1 = graph.edge_count();
        graph.connect(donors[0], acceptors[0], 1.0);
        let e2 = graph.edge_count();
        graph.connect(donors[0], acceptors[1], 1.0);

        graph.pre_flow_push(source, sink);

        let flows: Vec<f64> = graph.edges_iter().map(|(_, f)| f).collect();
        assert!(flows[e1] > 0.1 && flows[e2] > 0.1, "flows {flows:?}");
        assert!((flows[e1] - flows[e2]).abs() < 0.2, "flows {flows:?}");
    }

    #[test]
    fn empty_candidate_graph_produces_no_flow() {
        let (mut graph, source, sink, _, acceptors) = bipartite();
        graph.pre_flow_push(source, sink);
        for a in acceptors {
            assert_eq!(graph.in_flow(a), 0.0);
        }
    }

    #[test]
    fn equilibrate_splits_the_excess_evenly() {
        // Excess 1.0 over capacities [0.2, 0.9]: the small edge is taken
        // whole, the rest goes to the large one.
        let share = equilibrate_flow(vec![0.2, 0.9], 1.0);
        assert!((share - 0.8).abs() < 1e-12);

        // Equal large capacities split evenly.
        let share = equilibrate_flow(vec![0.9, 0.9], 1.0);
        assert!((share - 0.5).abs() < 1e-12);

        // All capacities below their share: everything fits.
        let share = equilibrate_flow(vec![0.1, 0.1], 1.0);
        assert!((share - 1.0).abs() < 1e-12);
    }
}
