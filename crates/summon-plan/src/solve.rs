//! Monte Carlo plan search.
//!
//! The construction graph is an AND/OR graph with cycles and, through upcasts
//! and producer chains, no finite bound: exhaustive search is off the table.
//! Instead the solver runs independent randomized descents, each bounded by
//! cost and depth, and keeps the cheapest plan that completes. Within one
//! trial a node is satisfied at most once, so shared requirements are paid
//! for once and cycles only ever show up as depth.

use std::collections::{HashMap, HashSet};

use rand::{Rng, RngCore};
use summon_image::View;

use crate::mine::Miner;
use crate::node::{Dependency, Node, Plan};

#[derive(Clone, Copy, Debug)]
pub struct SolverOptions {
    /// Number of independent descents to attempt.
    pub trials: u32,
    /// A trial whose running cost exceeds this is abandoned.
    pub cost_limit: u32,
    /// A trial descending deeper than this is abandoned.
    pub depth_limit: u32,
    /// Completed trials cheaper than this are discarded, letting callers
    /// demand a minimum construction complexity.
    pub min_cost: u32,
}

impl Default for SolverOptions {
    fn default() -> Self {
        Self {
            trials: 1000,
            cost_limit: 50,
            depth_limit: 16,
            min_cost: 0,
        }
    }
}

/// Single-owner search engine over one view.
///
/// The mined OR-lists are memoized across trials and across `solve` calls.
/// The injected RNG is the only source of nondeterminism: a fixed seed over
/// the same view yields identical plans.
pub struct Solver<'a, V: View> {
    miner: Miner<'a, V>,
    options: SolverOptions,
    rng: Box<dyn RngCore>,
    memo: HashMap<Node, Vec<Dependency>>,
}

#[derive(Default)]
struct Trial {
    created: HashSet<Node>,
    creation_order: Vec<Node>,
    dependency_order: Vec<Dependency>,
    cost: u32,
}

impl<'a, V: View> Solver<'a, V> {
    pub fn new(view: &'a V, options: SolverOptions, rng: Box<dyn RngCore>) -> Self {
        Self {
            miner: Miner::new(view),
            options,
            rng,
            memo: HashMap::new(),
        }
    }

    /// Search for the cheapest plan the trial budget can find, or `None` when
    /// no trial completes within the limits.
    pub fn solve(&mut self, target: &Node) -> Option<Plan> {
        let mut best: Option<Plan> = None;

        for trial_index in 0..self.options.trials {
            let mut trial = Trial::default();
            if !self.descend(&mut trial, target, 0) {
                continue;
            }
            if trial.cost < self.options.min_cost {
                continue;
            }
            if best.as_ref().is_some_and(|plan| plan.cost <= trial.cost) {
                continue;
            }
            tracing::debug!(trial = trial_index, cost = trial.cost, steps = trial.creation_order.len(), "adopting plan");
            best = Some(Plan {
                target: target.clone(),
                creation_order: trial.creation_order,
                dependency_order: trial.dependency_order,
                cost: trial.cost,
            });
        }

        best
    }

    /// One randomized descent step. On success the node and its chosen
    /// dependency have been appended after everything they require.
    fn descend(&mut self, trial: &mut Trial, node: &Node, depth: u32) -> bool {
        if trial.created.contains(node) {
            return true;
        }
        if depth > self.options.depth_limit {
            return false;
        }

        let candidate_count = self.candidates(node);
        if candidate_count == 0 {
            return false;
        }
        let pick = self.rng.gen_range(0..candidate_count);
        let dependency = self.memo[node][pick].clone();

        trial.cost += dependency.cost();
        if trial.cost > self.options.cost_limit {
            return false;
        }

        for requirement in dependency.requirements() {
            if !self.descend(trial, &requirement, depth + 1) {
                return false;
            }
        }

        trial.created.insert(node.clone());
        trial.creation_order.push(node.clone());
        trial.dependency_order.push(dependency);
        true
    }

    /// Number of mined candidates for `node`, mining and memoizing on first
    /// use. Entries are immutable once inserted.
    fn candidates(&mut self, node: &Node) -> usize {
        if !self.memo.contains_key(node) {
            let mined = self.miner.dependencies(node);
            self.memo.insert(node.clone(), mined);
        }
        self.memo[node].len()
    }
}
