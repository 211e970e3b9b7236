//! Reachability / returnability closure of the safe set.
//!
//! # Algorithm
//!
//! An edge `s --a--> t` is *usable* when it is in the seed, or when its
//! flag is set and both `s` and `t` carry the state-level flag.
//!
//! 1. **Reachable** `R`: worklist saturation forward from the seed states
//!    over usable edges.
//! 2. **Returnable** `Ret`: worklist saturation backward (over predecessors)
//!    from the seed states over usable edges.
//! 3. `S_hat[s, stay] = s ∈ R ∩ Ret` (and `s` carries the state flag), and
//!    `S_hat[s, a] = s ∈ R ∧ usable(s, a) ∧ t ∈ Ret`.
//! 4. The seed is OR-ed in unconditionally.
//!
//! Each state enters a worklist at most once, so a pass costs
//! O(states + edges). The closure is recomputed from scratch on every call
//! and is deterministic, hence idempotent for identical inputs.
//!
//! ```text
//!  seed ●──► ○──► ○      R   = {●, ○, ○, ◇}
//!       ▲    │    │      Ret = {●, ○}
//!       └────┘    ▼
//!                 ◇      S_hat keeps ● and the first ○
//! ```

use log::{debug, warn};

use crate::core::Action;
use crate::error::{ExploreError, Result};
use crate::grid::GridGraph;

use super::{SafetyMatrix, SeedSet};

/// Computes the certified reachable-and-returnable safe set.
#[derive(Clone, Debug, Default)]
pub struct SafeSetPropagator {
    /// Maximum worklist expansions per pass. `None` = number of states.
    iteration_cap: Option<usize>,
}

impl SafeSetPropagator {
    /// Create a propagator with the default expansion cap.
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the per-pass expansion cap.
    pub fn with_iteration_cap(cap: usize) -> Self {
        Self {
            iteration_cap: Some(cap),
        }
    }

    /// Compute S_hat from per-edge flags and the seed.
    ///
    /// `safe` holds the state-level flag in column 0 and the pessimistic
    /// per-edge flags in columns 1..=4.
    pub fn compute(
        &self,
        graph: &GridGraph,
        safe: &SafetyMatrix,
        seed: &SeedSet,
    ) -> Result<SafetyMatrix> {
        let usable = Usable { graph, safe, seed };

        let reachable = self.reachable_with(&usable)?;
        let returnable = self.returnable_with(&usable)?;

        let mut s_hat = SafetyMatrix::new(graph.state_count());
        for s in 0..graph.state_count() {
            if !reachable[s] {
                continue;
            }
            if returnable[s] && usable.state(s) {
                s_hat.set(s, Action::Stay, true);
            }
            for action in Action::MOVES {
                if let Some(t) = graph.target(s, action)
                    && returnable[t]
                    && usable.edge(s, action, t)
                {
                    s_hat.set(s, action, true);
                }
            }
        }

        let certified = s_hat.count();
        s_hat.union_with(seed.matrix());

        debug!(
            "[SafeSet] reachable={} returnable={} certified={} (with seed: {})",
            reachable.iter().filter(|&&r| r).count(),
            returnable.iter().filter(|&&r| r).count(),
            certified,
            s_hat.count()
        );

        Ok(s_hat)
    }

    /// States reachable from the seed over usable edges.
    pub fn reachable_states(
        &self,
        graph: &GridGraph,
        safe: &SafetyMatrix,
        seed: &SeedSet,
    ) -> Result<Vec<bool>> {
        self.reachable_with(&Usable { graph, safe, seed })
    }

    /// States with a usable path back into the seed.
    pub fn returnable_states(
        &self,
        graph: &GridGraph,
        safe: &SafetyMatrix,
        seed: &SeedSet,
    ) -> Result<Vec<bool>> {
        self.returnable_with(&Usable { graph, safe, seed })
    }

    fn cap(&self, graph: &GridGraph) -> usize {
        self.iteration_cap.unwrap_or(graph.state_count())
    }

    fn reachable_with(&self, usable: &Usable<'_>) -> Result<Vec<bool>> {
        let graph = usable.graph;
        let mut marked = vec![false; graph.state_count()];
        let mut worklist: Vec<usize> = usable.seed.states().collect();
        for &s in &worklist {
            marked[s] = true;
        }

        let cap = self.cap(graph);
        let mut expansions = 0usize;
        while let Some(s) = worklist.pop() {
            expansions += 1;
            check_cap(expansions, cap)?;

            for action in Action::MOVES {
                if let Some(t) = graph.target(s, action)
                    && !marked[t]
                    && usable.edge(s, action, t)
                {
                    marked[t] = true;
                    worklist.push(t);
                }
            }
        }
        Ok(marked)
    }

    fn returnable_with(&self, usable: &Usable<'_>) -> Result<Vec<bool>> {
        let graph = usable.graph;
        let mut marked = vec![false; graph.state_count()];
        let mut worklist: Vec<usize> = usable.seed.states().collect();
        for &s in &worklist {
            marked[s] = true;
        }

        let cap = self.cap(graph);
        let mut expansions = 0usize;
        while let Some(t) = worklist.pop() {
            expansions += 1;
            check_cap(expansions, cap)?;

            for (p, action) in graph.predecessors(t) {
                if !marked[p] && usable.edge(p, action, t) {
                    marked[p] = true;
                    worklist.push(p);
                }
            }
        }
        Ok(marked)
    }
}

fn check_cap(expansions: usize, cap: usize) -> Result<()> {
    if expansions > cap {
        warn!(
            "[SafeSet] closure exceeded {} expansions, aborting pass",
            cap
        );
        return Err(ExploreError::ClosureDidNotConverge {
            iterations: expansions,
            cap,
        });
    }
    Ok(())
}

/// Edge usability predicate shared by both passes.
struct Usable<'a> {
    graph: &'a GridGraph,
    safe: &'a SafetyMatrix,
    seed: &'a SeedSet,
}

impl Usable<'_> {
    #[inline]
    fn state(&self, s: usize) -> bool {
        self.seed.contains(s, Action::Stay) || self.safe.get(s, Action::Stay)
    }

    #[inline]
    fn edge(&self, s: usize, action: Action, t: usize) -> bool {
        debug_assert_eq!(self.graph.target(s, action), Some(t));
        self.seed.contains(s, action)
            || (self.safe.get(s, action)
                && self.safe.get(s, Action::Stay)
                && self.safe.get(t, Action::Stay))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::GridConfig;

    fn graph(rows: usize, cols: usize) -> GridGraph {
        GridGraph::new(&GridConfig::new(rows, cols)).unwrap()
    }

    /// All states safe, every move safe.
    fn all_safe(g: &GridGraph) -> SafetyMatrix {
        let mut m = SafetyMatrix::from_state_flags(&vec![true; g.state_count()]);
        for (s, a, _) in g.edges() {
            m.set(s, a, true);
        }
        m
    }

    #[test]
    fn test_everything_safe_covers_grid() {
        let g = graph(3, 4);
        let seed = SeedSet::single_state(&g, 0, &[Action::Stay]).unwrap();
        let s_hat = SafeSetPropagator::new()
            .compute(&g, &all_safe(&g), &seed)
            .unwrap();
        assert_eq!(s_hat, all_safe(&g));
    }

    #[test]
    fn test_one_way_edge_not_returnable() {
        // 1x3 line: 0 <-> 1 -> 2 (2 cannot come back)
        let g = graph(1, 3);
        let mut safe = all_safe(&g);
        safe.set(2, Action::Left, false);
        let seed = SeedSet::single_state(&g, 0, &[Action::Stay]).unwrap();

        let p = SafeSetPropagator::new();
        let reach = p.reachable_states(&g, &safe, &seed).unwrap();
        let ret = p.returnable_states(&g, &safe, &seed).unwrap();
        assert_eq!(reach, vec![true, true, true]);
        assert_eq!(ret, vec![true, true, false]);

        let s_hat = p.compute(&g, &safe, &seed).unwrap();
        assert!(s_hat.get(1, Action::Stay));
        assert!(s_hat.get(0, Action::Right));
        assert!(s_hat.get(1, Action::Left));
        assert!(!s_hat.get(1, Action::Right));
        assert!(!s_hat.get(2, Action::Stay));
    }

    #[test]
    fn test_unsafe_state_blocks_propagation() {
        let g = graph(1, 3);
        let mut safe = all_safe(&g);
        safe.set(1, Action::Stay, false);
        let seed = SeedSet::single_state(&g, 0, &[Action::Stay]).unwrap();
        let s_hat = SafeSetPropagator::new().compute(&g, &safe, &seed).unwrap();
        assert_eq!(s_hat.count(), 1);
    }

    #[test]
    fn test_seed_kept_even_if_unsafe() {
        let g = graph(1, 2);
        let safe = SafetyMatrix::new(g.state_count());
        let seed = SeedSet::single_state(&g, 0, &[Action::Stay, Action::Right]).unwrap();
        let s_hat = SafeSetPropagator::new().compute(&g, &safe, &seed).unwrap();
        assert!(seed.matrix().is_subset_of(&s_hat));
        assert_eq!(s_hat.count(), 2);
    }

    #[test]
    fn test_idempotent() {
        let g = graph(4, 4);
        let mut safe = all_safe(&g);
        safe.set(5, Action::Down, false);
        safe.set(10, Action::Up, false);
        let seed = SeedSet::single_state(&g, 0, &[Action::Stay]).unwrap();
        let p = SafeSetPropagator::new();
        let first = p.compute(&g, &safe, &seed).unwrap();
        let second = p.compute(&g, &safe, &seed).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_iteration_cap() {
        let g = graph(3, 3);
        let seed = SeedSet::single_state(&g, 4, &[Action::Stay]).unwrap();
        let err = SafeSetPropagator::with_iteration_cap(2)
            .compute(&g, &all_safe(&g), &seed)
            .unwrap_err();
        assert!(matches!(
            err,
            ExploreError::ClosureDidNotConverge { cap: 2, .. }
        ));
    }
}
