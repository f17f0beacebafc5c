//! Graph fixtures shared by the strategy tests.

use rand::rngs::StdRng;
use rand::{RngExt, SeedableRng};
use wayfind_core::{Graph, GraphBuilder, NodeId, NodeIx};

use crate::traits::Search;

/// Handle of the node with id `id`.
pub(crate) fn ix(g: &Graph, id: NodeId) -> NodeIx {
    g.lookup(id).unwrap()
}

/// Linear chain `1 - 2 - ... - n` with unit spacing (every weight is 1).
pub(crate) fn chain(n: u64) -> Graph {
    let mut b = GraphBuilder::new();
    for id in 1..=n {
        b.add_node(id, (id - 1) as f64, 0.0).unwrap();
    }
    for id in 1..n {
        b.add_edge(id, id + 1, None).unwrap();
    }
    b.build()
}

/// `w × h` lattice with unit spacing. Ids are `y * w + x`; each node links
/// right then down.
pub(crate) fn grid(w: u64, h: u64) -> Graph {
    let mut b = GraphBuilder::new();
    for y in 0..h {
        for x in 0..w {
            b.add_node(y * w + x, x as f64, y as f64).unwrap();
        }
    }
    for y in 0..h {
        for x in 0..w {
            let id = y * w + x;
            if x + 1 < w {
                b.add_edge(id, id + 1, None).unwrap();
            }
            if y + 1 < h {
                b.add_edge(id, id + w, None).unwrap();
            }
        }
    }
    b.build()
}

/// Two triangles with no edge between them: ids 1..=3 and 10..=12.
pub(crate) fn disconnected() -> Graph {
    let mut b = GraphBuilder::new();
    for (id, lon, lat) in [
        (1, 0.0, 0.0),
        (2, 1.0, 0.0),
        (3, 0.5, 1.0),
        (10, 5.0, 0.0),
        (11, 6.0, 0.0),
        (12, 5.5, 1.0),
    ] {
        b.add_node(id, lon, lat).unwrap();
    }
    for (a, z) in [(1, 2), (2, 3), (3, 1), (10, 11), (11, 12), (12, 10)] {
        b.add_edge(a, z, None).unwrap();
    }
    b.build()
}

/// Connected random geometric graph in the unit square: a random spanning
/// tree plus `extra` random chords. With `stretch`, every weight is the planar
/// distance scaled by a factor in `[1, 2)`, which keeps the Euclidean
/// heuristic consistent.
pub(crate) fn random_graph(seed: u64, n: u64, extra: usize, stretch: bool) -> Graph {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut b = GraphBuilder::new();
    let mut coords = Vec::new();
    for id in 0..n {
        let (lon, lat) = (rng.random_range(0.0..1.0), rng.random_range(0.0..1.0));
        coords.push((lon, lat));
        b.add_node(id, lon, lat).unwrap();
    }
    let weight = |rng: &mut StdRng, a: u64, z: u64| {
        let (pa, pz): ((f64, f64), (f64, f64)) = (coords[a as usize], coords[z as usize]);
        let d = (pa.0 - pz.0).hypot(pa.1 - pz.1);
        if stretch {
            Some(d * rng.random_range(1.0..2.0))
        } else {
            None
        }
    };
    for id in 1..n {
        let parent = rng.random_range(0..id);
        let w = weight(&mut rng, id, parent);
        b.add_edge(id, parent, w).unwrap();
    }
    for _ in 0..extra {
        let a = rng.random_range(0..n);
        let z = rng.random_range(0..n);
        if a != z {
            let w = weight(&mut rng, a, z);
            b.add_edge(a, z, w).unwrap();
        }
    }
    b.build()
}

/// Random tree plus chords like [`random_graph`], with every weight 1.
pub(crate) fn random_unit_graph(seed: u64, n: u64, extra: usize) -> Graph {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut b = GraphBuilder::new();
    for id in 0..n {
        // Packed into a 0.1 box so a unit weight never undercuts the
        // Euclidean heuristic.
        b.add_node(id, rng.random_range(0.0..0.1), rng.random_range(0.0..0.1))
            .unwrap();
    }
    for id in 1..n {
        let parent = rng.random_range(0..id);
        b.add_edge(id, parent, Some(1.0)).unwrap();
    }
    for _ in 0..extra {
        let a = rng.random_range(0..n);
        let z = rng.random_range(0..n);
        if a != z {
            b.add_edge(a, z, Some(1.0)).unwrap();
        }
    }
    b.build()
}

/// Step `search` until it finishes, returning the number of calls made.
pub(crate) fn drive(search: &mut impl Search, graph: &mut Graph) -> usize {
    let mut steps = 0;
    while !search.is_finished() {
        search.next_step(graph);
        steps += 1;
        assert!(steps <= 4 * graph.len() + 4, "search did not terminate");
    }
    steps
}
