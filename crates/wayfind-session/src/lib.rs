//! **wayfind-session**: the controller that drives stepwise searches.
//!
//! A [`Session`] owns a road [`Graph`](wayfind_core::Graph), the chosen start
//! and end nodes, the active [`Strategy`](wayfind_paths::Strategy) and, for
//! the hub lookup variant, a cached [`HubIndex`]. Callers step it at their own
//! pace and receive a [`StepDelta`] per step:
//!
//! ```
//! use wayfind_core::GraphBuilder;
//! use wayfind_session::{AlgorithmParams, Session};
//!
//! let mut b = GraphBuilder::new();
//! for id in 1..=3 {
//!     b.add_node(id, id as f64, 0.0).unwrap();
//! }
//! b.add_edge(1, 2, None).unwrap();
//! b.add_edge(2, 3, None).unwrap();
//!
//! let mut session = Session::new(b.build());
//! session.set_endpoints(1, 3).unwrap();
//! session.select_algorithm("astar", AlgorithmParams::default()).unwrap();
//! while !session.step().unwrap().finished {}
//! assert_eq!(session.path(), Some(vec![1, 2, 3]));
//! ```

mod config;
mod delta;
mod error;
mod session;

pub use config::{AlgorithmParams, EngineConfig};
pub use delta::{EdgeUpdate, NodeUpdate, StepDelta};
pub use error::{SessionError, SessionResult};
pub use session::Session;

pub use wayfind_paths::{Algorithm, HubConfig, HubIndex, HubStats};
