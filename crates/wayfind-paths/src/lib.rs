//! Stepwise search strategies over a road [`Graph`](wayfind_core::Graph).
//!
//! Every strategy implements [`Search`]: it is started once with two node
//! handles and then advanced one unit of work per
//! [`next_step`](Search::next_step), each call reporting the nodes whose
//! visible state changed so a renderer can animate the run.
//!
//! | Algorithm | Type | Optimal |
//! |---|---|---|
//! | breadth-first | [`Bfs`] | in hops |
//! | depth-first | [`Dfs`] | no |
//! | Dijkstra | [`Dijkstra`] | yes |
//! | greedy best-first | [`Greedy`] | no |
//! | A\* | [`AStar`] | yes |
//! | bidirectional BFS | [`BidirectionalBfs`] | in hops on balanced frontiers |
//! | bidirectional A\* | [`BidirectionalAStar`] | yes |
//! | bidirectional A\* with hub lookup | [`BidirectionalAStarLookup`] | no |
//!
//! [`Strategy`] is the closed set of the above, built from an [`Algorithm`]
//! name. [`HubIndex`] holds the precomputed hub-to-hub routes consumed by the
//! lookup variant.

mod algorithm;
mod astar;
mod bfs;
mod bidir_astar;
mod bidirectional;
mod dfs;
mod dijkstra;
mod frontier;
mod greedy;
mod hubs;
mod lookup;
mod traits;

#[cfg(test)]
mod testutil;

pub use algorithm::{Algorithm, Strategy, UnknownAlgorithm};
pub use astar::AStar;
pub use bfs::Bfs;
pub use bidir_astar::{BidirectionalAStar, Shortcuts};
pub use bidirectional::BidirectionalBfs;
pub use dfs::Dfs;
pub use dijkstra::{Dijkstra, ShortestPathTree, shortest_path_tree};
pub use greedy::Greedy;
pub use hubs::{HubConfig, HubIndex, HubStats, Route, RouteKey, RouteSummary};
pub use lookup::{BidirectionalAStarLookup, DEFAULT_DISCOUNT, LookupKind};
pub use traits::Search;
