//! Topology strategies: planted rings, noise edges and the re-registration
//! pass.
//!
//! Everything works on zero-based account indices and converts to labels only
//! when the [`GraphFile`] is assembled.

use std::cmp::Ordering;

use rand::Rng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use ringscan_core::{EdgeRecord, GraphFile};

use super::{Generated, GeneratorConfig, Topology};

/// Label of the account with zero-based index `i`.
pub fn node_label(i: usize) -> String {
    format!("Node{}", i + 1)
}

/// Builds a complete graph from the generator configuration.
///
/// Order of operations: register every account, add ring edges, add noise
/// edges, then re-register `num_isolated` random accounts. Re-registration is
/// a no-op on the loaded graph; it is kept so the file replays the same
/// sequence of graph operations.
pub fn build_graph(config: &GeneratorConfig, rng: &mut StdRng) -> Generated {
    let n = config.num_nodes;
    let labels: Vec<String> = (0..n).map(node_label).collect();
    if n == 0 {
        return Generated {
            file: GraphFile::default(),
            rings: Vec::new(),
        };
    }

    let mut pairs: Vec<(usize, usize)> =
        Vec::with_capacity(config.num_rings * config.ring_size + config.num_random_edges);

    let rings = match config.topology {
        Topology::Random => {
            let rings = random_rings(n, config.num_rings, config.ring_size, rng);
            for ring in &rings {
                ring_edges(ring, &mut pairs);
            }
            noise_edges(n, config.num_random_edges, rng, &mut pairs);
            rings
        }
        Topology::DisjointRings => {
            let (rings, rank) = disjoint_rings(n, config.num_rings, config.ring_size, rng);
            for ring in &rings {
                ring_edges(ring, &mut pairs);
            }
            forward_edges(&rank, config.num_random_edges, rng, &mut pairs);
            rings
        }
    };

    let mut nodes = labels.clone();
    nodes.extend((0..config.num_isolated).map(|_| labels[rng.gen_range(0..n)].clone()));

    let edges = pairs
        .into_iter()
        .map(|(u, v)| EdgeRecord {
            source: labels[u].clone(),
            target: labels[v].clone(),
        })
        .collect();

    let rings = rings
        .into_iter()
        .map(|ring| ring.into_iter().map(|i| labels[i].clone()).collect())
        .collect();

    Generated {
        file: GraphFile { nodes, edges },
        rings,
    }
}

/// Draws `count` rings of `size` members uniformly with replacement.
fn random_rings(n: usize, count: usize, size: usize, rng: &mut StdRng) -> Vec<Vec<usize>> {
    (0..count)
        .map(|_| (0..size).map(|_| rng.gen_range(0..n)).collect())
        .collect()
}

/// Draws rings without replacement and ranks every account by component.
///
/// Ring `r` has rank `r`; accounts outside any ring get ranks after the last
/// ring, one each. The ring count is capped so every ring fits, and rings of
/// fewer than two members are not planted.
fn disjoint_rings(
    n: usize,
    count: usize,
    size: usize,
    rng: &mut StdRng,
) -> (Vec<Vec<usize>>, Vec<usize>) {
    let mut order: Vec<usize> = (0..n).collect();
    order.shuffle(rng);

    let count = if size < 2 { 0 } else { count.min(n / size) };
    let planted = count * size;
    let rings: Vec<Vec<usize>> = if count == 0 {
        Vec::new()
    } else {
        order
            .chunks_exact(size)
            .take(count)
            .map(<[usize]>::to_vec)
            .collect()
    };

    let mut rank = vec![0; n];
    for (pos, &node) in order.iter().enumerate() {
        rank[node] = if pos < planted {
            pos / size
        } else {
            count + (pos - planted)
        };
    }
    (rings, rank)
}

fn ring_edges(ring: &[usize], pairs: &mut Vec<(usize, usize)>) {
    let k = ring.len();
    for j in 0..k {
        pairs.push((ring[j], ring[(j + 1) % k]));
    }
}

/// Uniform noise edges; self-loop draws are skipped.
fn noise_edges(n: usize, draws: usize, rng: &mut StdRng, pairs: &mut Vec<(usize, usize)>) {
    for _ in 0..draws {
        let u = rng.gen_range(0..n);
        let v = rng.gen_range(0..n);
        if u != v {
            pairs.push((u, v));
        }
    }
}

/// Noise edges oriented from lower to higher rank; draws inside one
/// component are skipped.
fn forward_edges(
    rank: &[usize],
    draws: usize,
    rng: &mut StdRng,
    pairs: &mut Vec<(usize, usize)>,
) {
    let n = rank.len();
    for _ in 0..draws {
        let u = rng.gen_range(0..n);
        let v = rng.gen_range(0..n);
        match rank[u].cmp(&rank[v]) {
            Ordering::Less => pairs.push((u, v)),
            Ordering::Greater => pairs.push((v, u)),
            Ordering::Equal => {}
        }
    }
}
