//! Algorithm names and the closed set of strategies behind them.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use thiserror::Error;
use wayfind_core::{Graph, GraphResult, NodeIx};

use crate::astar::AStar;
use crate::bfs::Bfs;
use crate::bidir_astar::BidirectionalAStar;
use crate::bidirectional::BidirectionalBfs;
use crate::dfs::Dfs;
use crate::dijkstra::Dijkstra;
use crate::greedy::Greedy;
use crate::hubs::HubIndex;
use crate::lookup::{BidirectionalAStarLookup, DEFAULT_DISCOUNT};
use crate::traits::Search;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown algorithm '{0}'")]
pub struct UnknownAlgorithm(pub String);

/// The selectable search algorithms, by their external names.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum Algorithm {
    Bfs,
    Dfs,
    Dijkstra,
    Greedy,
    #[cfg_attr(feature = "serde", serde(rename = "astar"))]
    AStar,
    Bidirectional,
    #[cfg_attr(feature = "serde", serde(rename = "bidirectional-astar"))]
    BidirectionalAStar,
    #[cfg_attr(feature = "serde", serde(rename = "bidirectional-astar-lookup"))]
    BidirectionalAStarLookup,
}

impl Algorithm {
    pub const ALL: [Algorithm; 8] = [
        Algorithm::Bfs,
        Algorithm::Dfs,
        Algorithm::Dijkstra,
        Algorithm::Greedy,
        Algorithm::AStar,
        Algorithm::Bidirectional,
        Algorithm::BidirectionalAStar,
        Algorithm::BidirectionalAStarLookup,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            Algorithm::Bfs => "bfs",
            Algorithm::Dfs => "dfs",
            Algorithm::Dijkstra => "dijkstra",
            Algorithm::Greedy => "greedy",
            Algorithm::AStar => "astar",
            Algorithm::Bidirectional => "bidirectional",
            Algorithm::BidirectionalAStar => "bidirectional-astar",
            Algorithm::BidirectionalAStarLookup => "bidirectional-astar-lookup",
        }
    }

    /// Whether the algorithm needs a hub index.
    #[inline]
    pub fn uses_hubs(self) -> bool {
        matches!(self, Algorithm::BidirectionalAStarLookup)
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Algorithm {
    type Err = UnknownAlgorithm;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Algorithm::ALL
            .into_iter()
            .find(|a| a.name() == s)
            .ok_or_else(|| UnknownAlgorithm(s.to_owned()))
    }
}

// ---------------------------------------------------------------------------
// Strategy
// ---------------------------------------------------------------------------

/// A running instance of one of the [`Algorithm`]s.
#[derive(Debug)]
pub enum Strategy {
    Bfs(Bfs),
    Dfs(Dfs),
    Dijkstra(Dijkstra),
    Greedy(Greedy),
    AStar(AStar),
    Bidirectional(BidirectionalBfs),
    BidirectionalAStar(BidirectionalAStar),
    BidirectionalAStarLookup(BidirectionalAStarLookup),
}

macro_rules! dispatch {
    ($self:expr, $s:ident => $body:expr) => {
        match $self {
            Strategy::Bfs($s) => $body,
            Strategy::Dfs($s) => $body,
            Strategy::Dijkstra($s) => $body,
            Strategy::Greedy($s) => $body,
            Strategy::AStar($s) => $body,
            Strategy::Bidirectional($s) => $body,
            Strategy::BidirectionalAStar($s) => $body,
            Strategy::BidirectionalAStarLookup($s) => $body,
        }
    };
}

impl Strategy {
    /// A fresh strategy for `algorithm`. The lookup variant gets an empty hub
    /// index; use [`Strategy::lookup`] to supply a real one.
    pub fn new(algorithm: Algorithm) -> Self {
        match algorithm {
            Algorithm::Bfs => Strategy::Bfs(Bfs::new()),
            Algorithm::Dfs => Strategy::Dfs(Dfs::new()),
            Algorithm::Dijkstra => Strategy::Dijkstra(Dijkstra::new()),
            Algorithm::Greedy => Strategy::Greedy(Greedy::new()),
            Algorithm::AStar => Strategy::AStar(AStar::new()),
            Algorithm::Bidirectional => Strategy::Bidirectional(BidirectionalBfs::new()),
            Algorithm::BidirectionalAStar => {
                Strategy::BidirectionalAStar(BidirectionalAStar::new())
            }
            Algorithm::BidirectionalAStarLookup => {
                Self::lookup(Arc::new(HubIndex::empty()), DEFAULT_DISCOUNT)
            }
        }
    }

    pub fn lookup(index: Arc<HubIndex>, discount: f64) -> Self {
        Strategy::BidirectionalAStarLookup(BidirectionalAStarLookup::with_discount(
            index, discount,
        ))
    }

    pub fn algorithm(&self) -> Algorithm {
        match self {
            Strategy::Bfs(_) => Algorithm::Bfs,
            Strategy::Dfs(_) => Algorithm::Dfs,
            Strategy::Dijkstra(_) => Algorithm::Dijkstra,
            Strategy::Greedy(_) => Algorithm::Greedy,
            Strategy::AStar(_) => Algorithm::AStar,
            Strategy::Bidirectional(_) => Algorithm::Bidirectional,
            Strategy::BidirectionalAStar(_) => Algorithm::BidirectionalAStar,
            Strategy::BidirectionalAStarLookup(_) => Algorithm::BidirectionalAStarLookup,
        }
    }

    /// Meeting node of a bidirectional run.
    pub fn meeting_node(&self) -> Option<NodeIx> {
        match self {
            Strategy::Bidirectional(s) => s.meeting_node(),
            Strategy::BidirectionalAStar(s) => s.meeting_node(),
            Strategy::BidirectionalAStarLookup(s) => s.meeting_node(),
            _ => None,
        }
    }
}

impl Search for Strategy {
    fn start(&mut self, graph: &mut Graph, start: NodeIx, end: NodeIx) -> GraphResult<()> {
        dispatch!(self, s => s.start(graph, start, end))
    }

    fn next_step(&mut self, graph: &mut Graph) -> Vec<NodeIx> {
        dispatch!(self, s => s.next_step(graph))
    }

    fn is_finished(&self) -> bool {
        dispatch!(self, s => s.is_finished())
    }

    fn path(&self, graph: &Graph) -> Option<Vec<NodeIx>> {
        dispatch!(self, s => s.path(graph))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{chain, drive, ix, random_unit_graph};

    #[test]
    fn names_round_trip() {
        for a in Algorithm::ALL {
            assert_eq!(a.name().parse::<Algorithm>(), Ok(a));
            assert_eq!(a.to_string(), a.name());
        }
    }

    #[test]
    fn unknown_name_is_an_error() {
        let err = "a-star".parse::<Algorithm>().unwrap_err();
        assert_eq!(err, UnknownAlgorithm("a-star".into()));
        assert_eq!(err.to_string(), "unknown algorithm 'a-star'");
        assert!("BFS".parse::<Algorithm>().is_err());
    }

    #[test]
    fn factory_builds_the_named_strategy() {
        for a in Algorithm::ALL {
            assert_eq!(Strategy::new(a).algorithm(), a);
        }
        assert!(Algorithm::BidirectionalAStarLookup.uses_hubs());
        assert!(!Algorithm::AStar.uses_hubs());
    }

    #[test]
    fn every_strategy_solves_the_chain() {
        for a in Algorithm::ALL {
            let mut g = chain(5);
            let (s, e) = (ix(&g, 1), ix(&g, 5));
            let mut strategy = Strategy::new(a);
            strategy.start(&mut g, s, e).unwrap();
            drive(&mut strategy, &mut g);
            let path = strategy.path(&g).unwrap();
            assert_eq!(g.ids(&path), vec![1, 2, 3, 4, 5], "{a}");
            assert_eq!(g.path_cost(&path), Some(4.0), "{a}");
        }
    }

    #[test]
    fn explored_marks_only_accumulate() {
        for a in Algorithm::ALL {
            for seed in 0..10 {
                let mut g = random_unit_graph(seed, 30, 20);
                let (s, e) = (ix(&g, 0), ix(&g, 29));
                let mut strategy = Strategy::new(a);
                strategy.start(&mut g, s, e).unwrap();

                let snapshot = |g: &Graph| -> (Vec<bool>, Vec<bool>) {
                    (
                        g.node_indices().map(|n| g.state(n).visited).collect(),
                        g.edge_indices().map(|e| g.edge(e).visited()).collect(),
                    )
                };
                let mut before = snapshot(&g);
                while !strategy.is_finished() {
                    strategy.next_step(&mut g);
                    let now = snapshot(&g);
                    let kept =
                        |was: &[bool], is: &[bool]| was.iter().zip(is).all(|(w, i)| !w || *i);
                    assert!(kept(&before.0, &now.0), "{a} seed {seed}: node unvisited");
                    assert!(kept(&before.1, &now.1), "{a} seed {seed}: edge unmarked");
                    before = now;
                }
            }
        }
    }

    #[test]
    fn only_bidirectional_runs_report_a_meeting() {
        let mut g = chain(5);
        let (s, e) = (ix(&g, 1), ix(&g, 5));
        for a in Algorithm::ALL {
            g.reset();
            let mut strategy = Strategy::new(a);
            strategy.start(&mut g, s, e).unwrap();
            drive(&mut strategy, &mut g);
            let bidirectional = matches!(
                a,
                Algorithm::Bidirectional
                    | Algorithm::BidirectionalAStar
                    | Algorithm::BidirectionalAStarLookup
            );
            assert_eq!(strategy.meeting_node().is_some(), bidirectional, "{a}");
        }
    }
}
