//! Construction planning over a loaded bytecode image.
//!
//! Given a [`summon_image::View`], this crate answers "how do I obtain a
//! value of this type?" as a [`Plan`]: a topologically ordered list of
//! construction steps. [`Miner`] turns nodes into their candidate
//! dependencies; [`Solver`] runs budget-bounded randomized descents over that
//! AND/OR graph and keeps the cheapest plan found.

mod mine;
mod node;
mod solve;

pub use mine::Miner;
pub use node::{Dependency, Node, Plan};
pub use solve::{Solver, SolverOptions};
