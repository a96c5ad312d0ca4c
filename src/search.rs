//! MCTS search driver.
//!
//! Implements the search loop:
//! 1. Selection / Expansion: walk fully expanded nodes with UCB, then add one child
//! 2. Simulation: play a copy of the state to the end of the round
//! 3. Backpropagation: record the outcome on the path back to the root
//! 4. Extraction: pick the root child with the best advantage (no exploration)

use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};
use tracing::{debug, trace, warn};

use crate::config::SearchConfig;
use crate::error::SearchError;
use crate::node::{NodeId, NodeStats, Outcome};
use crate::rollout::RolloutPolicy;
use crate::tree::{SearchTree, TreeStats};
use crate::{GameState, PlayerId};

/// Statistics for one root child after a search.
#[derive(Debug, Clone)]
pub struct ChildStatistics<M> {
    pub mv: M,
    pub stats: NodeStats,
}

/// Statistics about a finished search.
#[derive(Debug, Clone)]
pub struct SearchStatistics<M> {
    /// Root children in expansion order, relative to the searching player
    pub children: Vec<ChildStatistics<M>>,
    /// Simulations recorded at the root(s); equals the iteration budget
    pub root_visits: u32,
    /// Nodes allocated across all trees
    pub total_nodes: usize,
    /// Deepest node across all trees
    pub max_depth: u32,
    /// Number of trees that were searched
    pub workers: usize,
}

/// Result of a search.
#[derive(Debug, Clone)]
pub struct SearchResult<M> {
    pub best_move: M,
    pub stats: SearchStatistics<M>,
}

/// The MCTS engine.
///
/// One search runs to completion inside each call. Trees are never reused:
/// every call builds a fresh tree from the true current state and drops it
/// once the move is extracted.
pub struct Mcts<P> {
    config: SearchConfig,
    /// Rollout policy, injected once
    policy: P,
    /// Thread pool for root-parallel search, if more than one worker
    pool: Option<ThreadPool>,
}

impl<P> Mcts<P> {
    /// Creates a new MCTS engine.
    ///
    /// # Arguments
    /// * `config` - Search parameters; validated here
    /// * `policy` - Move chooser used during simulations
    pub fn new(config: SearchConfig, policy: P) -> Result<Self, SearchError> {
        config.validate()?;
        let threads = config.effective_threads();
        let pool = if threads > 1 {
            Some(ThreadPoolBuilder::new().num_threads(threads).build()?)
        } else {
            None
        };
        Ok(Self {
            config,
            policy,
            pool,
        })
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    pub fn policy(&self) -> &P {
        &self.policy
    }

    /// Selects a move for `player` at `state`.
    ///
    /// `legal_moves` must be the legal-move set for `player` at `state`. The
    /// returned move is always one of them. A single legal move is returned
    /// immediately without building a tree.
    ///
    /// # Errors
    /// `InvalidState` if `legal_moves` is empty or the round is already over;
    /// `IllegalRolloutMove` if the policy misbehaves during a simulation.
    pub fn select_move<S>(
        &mut self,
        legal_moves: &[S::Move],
        state: &S,
        player: PlayerId,
    ) -> Result<S::Move, SearchError>
    where
        S: GameState,
        P: RolloutPolicy<S>,
    {
        if let [only] = legal_moves {
            return Ok(only.clone());
        }
        self.search(legal_moves, state, player).map(|result| result.best_move)
    }

    /// Runs a full search and returns the best move with its statistics.
    ///
    /// Unlike `select_move` this always searches, even for a single legal move.
    pub fn search<S>(
        &mut self,
        legal_moves: &[S::Move],
        state: &S,
        player: PlayerId,
    ) -> Result<SearchResult<S::Move>, SearchError>
    where
        S: GameState,
        P: RolloutPolicy<S>,
    {
        check_root(legal_moves, state)?;
        debug!(
            %player,
            legal = legal_moves.len(),
            iterations = self.config.iterations,
            "Starting search"
        );

        let stats = match &self.pool {
            Some(pool) => run_root_parallel(
                pool,
                &self.config,
                &mut self.policy,
                legal_moves,
                state,
                player,
            )?,
            None => {
                let tree = run_tree(
                    &self.config,
                    &mut self.policy,
                    legal_moves,
                    state,
                    player,
                    self.config.iterations,
                    0,
                )?;
                collect_statistics(vec![tree])
            }
        };

        let best_move = best_merged_child(&stats.children)
            .map(|child| child.mv.clone())
            .ok_or_else(|| {
                SearchError::InvalidState("search produced no root children".to_string())
            })?;

        debug!(
            best = ?best_move,
            root_visits = stats.root_visits,
            total_nodes = stats.total_nodes,
            max_depth = stats.max_depth,
            "Search complete"
        );

        Ok(SearchResult { best_move, stats })
    }

    /// Runs the sequential search and returns the tree for inspection.
    pub fn build_tree<S>(
        &mut self,
        legal_moves: &[S::Move],
        state: &S,
        player: PlayerId,
    ) -> Result<SearchTree<S>, SearchError>
    where
        S: GameState,
        P: RolloutPolicy<S>,
    {
        check_root(legal_moves, state)?;
        run_tree(
            &self.config,
            &mut self.policy,
            legal_moves,
            state,
            player,
            self.config.iterations,
            0,
        )
    }
}

/// Splits the budget over independent trees, one per worker.
///
/// Workers get forked policies; afterwards the base policy is moved past
/// every forked stream so the next search starts fresh.
fn run_root_parallel<S, P>(
    pool: &ThreadPool,
    config: &SearchConfig,
    policy: &mut P,
    legal_moves: &[S::Move],
    state: &S,
    player: PlayerId,
) -> Result<SearchStatistics<S::Move>, SearchError>
where
    S: GameState,
    P: RolloutPolicy<S>,
{
    let budget = config.iterations;
    let workers = pool.current_num_threads().min(budget as usize).max(1);
    if workers < pool.current_num_threads() {
        warn!(
            threads = pool.current_num_threads(),
            budget, "More workers than iterations, some stay idle"
        );
    }

    let jobs: Vec<(usize, u32, P)> = (0..workers)
        .map(|w| {
            let extra = u32::from((w as u32) < budget % workers as u32);
            let share = budget / workers as u32 + extra;
            (w, share, RolloutPolicy::<S>::fork(&*policy, w))
        })
        .collect();
    *policy = RolloutPolicy::<S>::fork(&*policy, workers);

    let trees = pool.install(|| {
        jobs.into_par_iter()
            .map(|(w, share, mut policy)| {
                run_tree(config, &mut policy, legal_moves, state, player, share, w as u64)
            })
            .collect::<Result<Vec<_>, _>>()
    })?;

    Ok(collect_statistics(trees))
}

/// Rejects an empty legal-move set and a root whose round is already over.
fn check_root<S: GameState>(legal_moves: &[S::Move], state: &S) -> Result<(), SearchError> {
    if legal_moves.is_empty() {
        return Err(SearchError::InvalidState(
            "no legal moves for the player to move".to_string(),
        ));
    }
    if !state.tiles_remaining() {
        return Err(SearchError::InvalidState(
            "round is already over, nothing to search".to_string(),
        ));
    }
    Ok(())
}

/// Builds one tree from `state` and runs `iterations` iterations on it.
fn run_tree<S, P>(
    config: &SearchConfig,
    policy: &mut P,
    legal_moves: &[S::Move],
    state: &S,
    player: PlayerId,
    iterations: u32,
    stream: u64,
) -> Result<SearchTree<S>, SearchError>
where
    S: GameState,
    P: RolloutPolicy<S>,
{
    let mut tree = SearchTree::new(
        state.clone(),
        player,
        legal_moves.to_vec(),
        config.move_order,
        stream,
    );

    for i in 0..iterations {
        let leaf = expansion_policy(&mut tree, config.exploration);
        let node = tree.get(leaf);
        let outcome = simulate(node.state(), node.acting_player(), node.mover(), policy)?;
        tree.backpropagate(leaf, outcome);
        trace!(iteration = i, leaf = leaf.0, ?outcome, "Iteration complete");
    }

    Ok(tree)
}

/// Walks down from the root to the node that should be simulated next.
///
/// Stops at a terminal node, or expands the first node that still has
/// untried moves and returns the new child. Fully expanded nodes are
/// descended with the UCB rule.
fn expansion_policy<S: GameState>(tree: &mut SearchTree<S>, exploration: f64) -> NodeId {
    let mut current = tree.root();
    loop {
        let node = tree.get(current);
        if node.is_terminal() {
            return current;
        }
        if !node.is_fully_expanded() {
            if let Some(child) = tree.expand(current) {
                return child;
            }
        }
        match tree.best_child(current, exploration) {
            Some(child) => current = child,
            // Not terminal but no moves at all: simulate from here
            None => return current,
        }
    }
}

/// Plays a copy of `state` to the end of the round, starting with `player`.
///
/// Returns the outcome relative to `perspective`, normally the mover of the
/// simulated node.
fn simulate<S, P>(
    state: &S,
    player: PlayerId,
    perspective: PlayerId,
    policy: &mut P,
) -> Result<Outcome, SearchError>
where
    S: GameState,
    P: RolloutPolicy<S>,
{
    let mut sim = state.clone();
    let mut current = player;

    while sim.tiles_remaining() {
        let moves = current.available_moves(&sim);
        if moves.is_empty() {
            return Err(SearchError::InvalidState(format!(
                "{} has no moves but tiles remain",
                current
            )));
        }
        let mv = policy.choose_move(&moves, &sim, current);
        if !moves.contains(&mv) {
            return Err(SearchError::IllegalRolloutMove(format!("{:?}", mv)));
        }
        sim.execute_move(current, &mv);
        current = current.opponent();
    }

    let own = perspective.final_score(&mut sim);
    let other = perspective.opponent().final_score(&mut sim);
    Ok(Outcome::from_scores(own, other))
}

/// Sums root children by move across trees, keeping first-seen order.
fn collect_statistics<S: GameState>(trees: Vec<SearchTree<S>>) -> SearchStatistics<S::Move> {
    let mut stats = SearchStatistics {
        children: Vec::new(),
        root_visits: 0,
        total_nodes: 0,
        max_depth: 0,
        workers: trees.len(),
    };

    for tree in &trees {
        let TreeStats {
            total_nodes,
            root_visits,
            max_depth,
        } = tree.stats();
        stats.root_visits += root_visits;
        stats.total_nodes += total_nodes;
        stats.max_depth = stats.max_depth.max(max_depth);

        for (mv, child_stats) in tree.root_children() {
            match stats.children.iter_mut().find(|c| c.mv == mv) {
                Some(existing) => existing.stats.merge(&child_stats),
                None => stats.children.push(ChildStatistics {
                    mv,
                    stats: child_stats,
                }),
            }
        }
    }

    stats
}

/// Best child with zero exploration: highest advantage, first on ties.
/// Unvisited children are skipped.
fn best_merged_child<M>(children: &[ChildStatistics<M>]) -> Option<&ChildStatistics<M>> {
    let mut best: Option<(&ChildStatistics<M>, f64)> = None;
    for child in children.iter().filter(|c| c.stats.visits() > 0) {
        let score = child.stats.advantage();
        match best {
            Some((_, best_score)) if score <= best_score => {}
            _ => best = Some((child, score)),
        }
    }
    best.map(|(child, _)| child)
}
