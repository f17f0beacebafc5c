use std::sync::Arc;

use wayfind_core::{Graph, NodeId, NodeIx};
use wayfind_paths::{Algorithm, HubIndex, HubStats, Search, Strategy};

use crate::config::{AlgorithmParams, EngineConfig};
use crate::delta::StepDelta;
use crate::error::{SessionError, SessionResult};

/// The selected algorithm and the strategy instance running it.
#[derive(Debug)]
struct Run {
    algorithm: Algorithm,
    params: AlgorithmParams,
    strategy: Strategy,
}

/// Region an index was built for: the whole graph, or a radius around an
/// anchor node.
#[derive(Clone, Copy, Debug, PartialEq)]
struct HubScope {
    radius_km: Option<f64>,
    anchor: Option<NodeIx>,
}

#[derive(Debug)]
struct HubCache {
    scope: HubScope,
    index: Arc<HubIndex>,
}

/// Binds a graph, a pair of endpoints and the active search run.
///
/// A session is the single entry point for driving searches: select
/// endpoints, select an algorithm, then call [`step`](Self::step) at whatever
/// pace the caller likes. Each step returns a [`StepDelta`] describing only
/// the nodes that changed.
#[derive(Debug)]
pub struct Session {
    graph: Graph,
    config: EngineConfig,
    endpoints: Option<(NodeIx, NodeIx)>,
    run: Option<Run>,
    hubs: Option<HubCache>,
}

impl Session {
    /// A session over `graph` with the default configuration.
    pub fn new(graph: Graph) -> Self {
        Self {
            graph,
            config: EngineConfig::default(),
            endpoints: None,
            run: None,
            hubs: None,
        }
    }

    /// A session over `graph` with a validated configuration.
    pub fn with_config(graph: Graph, config: EngineConfig) -> SessionResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            ..Self::new(graph)
        })
    }

    #[inline]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    #[inline]
    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    /// Choose the start and end nodes by external id.
    ///
    /// Both ids are resolved before anything changes; an id the graph does not
    /// hold fails with [`SessionError::InvalidEndpoint`]. The active run, if any,
    /// is discarded; the graph's search marks are left for
    /// [`reset`](Self::reset) or the next selection to clear.
    pub fn set_endpoints(&mut self, start: NodeId, end: NodeId) -> SessionResult<()> {
        let s = self.endpoint(start)?;
        let e = self.endpoint(end)?;
        self.endpoints = Some((s, e));
        self.run = None;
        log::debug!("session: endpoints {start} -> {end}");
        Ok(())
    }

    fn endpoint(&self, id: NodeId) -> SessionResult<NodeIx> {
        self.graph
            .lookup(id)
            .ok_or(SessionError::InvalidEndpoint(id))
    }

    /// Current endpoints as external ids.
    pub fn endpoints(&self) -> Option<(NodeId, NodeId)> {
        self.endpoints
            .map(|(s, e)| (self.graph.id(s), self.graph.id(e)))
    }

    /// Select an algorithm by name and start it. See [`select`](Self::select).
    pub fn select_algorithm(&mut self, name: &str, params: AlgorithmParams) -> SessionResult<()> {
        let algorithm: Algorithm = name.parse()?;
        self.select(algorithm, params)
    }

    /// Clear the graph's search state and start `algorithm` between the
    /// current endpoints.
    pub fn select(&mut self, algorithm: Algorithm, params: AlgorithmParams) -> SessionResult<()> {
        let (start, end) = self.endpoints.ok_or(SessionError::MissingEndpoints)?;
        params.validate()?;
        self.run = None;
        self.graph.reset();

        let mut strategy = if algorithm.uses_hubs() {
            let radius = params.radius_km.or(self.config.default_radius_km);
            let index = self.hub_index_for(radius, start);
            Strategy::lookup(index, self.config.shortcut_discount)
        } else {
            Strategy::new(algorithm)
        };
        strategy.start(&mut self.graph, start, end)?;
        self.graph.take_marked_edges();
        log::debug!(
            "session: {algorithm} from {} to {}",
            self.graph.id(start),
            self.graph.id(end)
        );

        self.run = Some(Run {
            algorithm,
            params,
            strategy,
        });
        Ok(())
    }

    /// Clear all search state and drop the active run. Endpoints and the hub
    /// index are kept.
    pub fn reset(&mut self) {
        self.graph.reset();
        self.run = None;
    }

    /// Start the current algorithm again from scratch.
    pub fn restart(&mut self) -> SessionResult<()> {
        let run = self.run.as_ref().ok_or(SessionError::NoAlgorithmSelected)?;
        let (algorithm, params) = (run.algorithm, run.params);
        self.select(algorithm, params)
    }

    /// Advance the active run by one unit of work.
    ///
    /// Stepping a finished run is a no-op that returns an empty delta.
    pub fn step(&mut self) -> SessionResult<StepDelta> {
        let run = self.run.as_mut().ok_or(SessionError::NoAlgorithmSelected)?;
        if run.strategy.is_finished() {
            return Ok(StepDelta {
                finished: true,
                ..StepDelta::default()
            });
        }
        let touched = run.strategy.next_step(&mut self.graph);
        let marked = self.graph.take_marked_edges();
        let finished = run.strategy.is_finished();
        log::trace!(
            "session: {} step touched {} nodes, {} edges{}",
            run.algorithm,
            touched.len(),
            marked.len(),
            if finished { ", finished" } else { "" }
        );
        if finished {
            log::debug!(
                "session: {} finished, {}",
                run.algorithm,
                if run.strategy.path(&self.graph).is_some() {
                    "path found"
                } else {
                    "no path"
                }
            );
        }
        Ok(StepDelta::capture(&self.graph, &touched, &marked, finished))
    }

    /// Step until the run finishes, returning the number of steps taken.
    pub fn run_to_end(&mut self) -> SessionResult<usize> {
        let mut steps = 0;
        while !self.step()?.finished {
            steps += 1;
        }
        Ok(steps + 1)
    }

    /// Whether the active run is finished. `false` with no run.
    pub fn is_finished(&self) -> bool {
        self.run.as_ref().is_some_and(|r| r.strategy.is_finished())
    }

    /// The algorithm of the active run.
    pub fn algorithm(&self) -> Option<Algorithm> {
        self.run.as_ref().map(|r| r.algorithm)
    }

    /// Meeting node of a bidirectional run, once known.
    pub fn meeting_node(&self) -> Option<NodeId> {
        let run = self.run.as_ref()?;
        run.strategy.meeting_node().map(|ix| self.graph.id(ix))
    }

    /// The path found by the active run, as external ids.
    pub fn path(&self) -> Option<Vec<NodeId>> {
        self.path_handles().map(|p| self.graph.ids(&p))
    }

    /// Total edge weight of [`path`](Self::path).
    pub fn path_cost(&self) -> Option<f64> {
        self.path_handles().and_then(|p| self.graph.path_cost(&p))
    }

    fn path_handles(&self) -> Option<Vec<NodeIx>> {
        let run = self.run.as_ref()?;
        if !run.strategy.is_finished() {
            return None;
        }
        run.strategy.path(&self.graph)
    }

    /// The most recently built hub index, if any.
    pub fn hub_index(&self) -> Option<&Arc<HubIndex>> {
        self.hubs.as_ref().map(|c| &c.index)
    }

    pub fn hub_stats(&self) -> Option<HubStats> {
        self.hub_index().map(|i| i.stats())
    }

    /// Swap in a new graph. Endpoints, the active run and the hub index all
    /// refer to the old graph and are dropped.
    pub fn replace_graph(&mut self, graph: Graph) {
        self.graph = graph;
        self.endpoints = None;
        self.run = None;
        self.hubs = None;
        log::debug!(
            "session: graph replaced ({} nodes, {} edges)",
            self.graph.len(),
            self.graph.edge_count()
        );
    }

    fn hub_index_for(&mut self, radius_km: Option<f64>, start: NodeIx) -> Arc<HubIndex> {
        let scope = HubScope {
            radius_km,
            anchor: radius_km.map(|_| start),
        };
        if let Some(cache) = &self.hubs {
            if cache.scope == scope {
                return Arc::clone(&cache.index);
            }
        }
        let index = match radius_km {
            Some(r) => HubIndex::build_around(&self.graph, &self.config.hubs, start, r),
            None => HubIndex::build(&self.graph, &self.config.hubs),
        };
        let index = Arc::new(index);
        log::debug!(
            "session: built hub index with {} hubs, {} routes",
            index.hub_count(),
            index.route_count()
        );
        self.hubs = Some(HubCache {
            scope,
            index: Arc::clone(&index),
        });
        index
    }
}
