//! Search tree with arena allocation.
//!
//! Nodes live in a contiguous Vec and refer to each other by [`NodeId`].
//! The arena owns every node, a node's `children` list is its owning edge
//! set, and `parent` is a plain back-index used for the backpropagation walk.

use rand_xoshiro::Xoshiro256PlusPlus;

use crate::config::MoveOrder;
use crate::node::{NodeId, NodeStats, Outcome, TreeNode};
use crate::{GameState, PlayerId};

/// Search tree rooted at the true current game state.
pub struct SearchTree<S: GameState> {
    /// Arena storing all nodes
    nodes: Vec<TreeNode<S>>,
    /// Expansion order applied to each new node's legal moves
    move_order: MoveOrder,
    /// Generator for `MoveOrder::Shuffled`
    order_rng: Option<Xoshiro256PlusPlus>,
}

impl<S: GameState> SearchTree<S> {
    /// Create a tree whose root is `state` with `player` to move.
    ///
    /// `legal_moves` becomes the root's untried set as given by the caller,
    /// so the extracted move is always one of them. `stream` separates the
    /// shuffle generators of root-parallel workers.
    pub fn new(
        state: S,
        player: PlayerId,
        legal_moves: Vec<S::Move>,
        move_order: MoveOrder,
        stream: u64,
    ) -> Self {
        let mut order_rng = move_order.rng(stream);
        let untried = move_order.arrange(legal_moves, order_rng.as_mut());
        let root = TreeNode::new(state, player, None, None, untried);
        Self {
            nodes: vec![root],
            move_order,
            order_rng,
        }
    }

    /// Get the root node ID (always 0).
    #[inline]
    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    #[inline]
    pub fn get(&self, id: NodeId) -> &TreeNode<S> {
        &self.nodes[id.index()]
    }

    #[inline]
    fn get_mut(&mut self, id: NodeId) -> &mut TreeNode<S> {
        &mut self.nodes[id.index()]
    }

    /// Get the total number of nodes in the tree.
    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Never true after construction.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Iterate over all nodes with their ids, in creation order.
    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &TreeNode<S>)> {
        self.nodes
            .iter()
            .enumerate()
            .map(|(i, node)| (NodeId(i as u32), node))
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.get(id).children
    }

    /// Materialize one untried move of `parent_id` as a new child.
    ///
    /// The parent's state is deep-copied and the move applied for the
    /// parent's acting player; the child's acting player is the opponent.
    /// Returns None if the parent is fully expanded.
    pub fn expand(&mut self, parent_id: NodeId) -> Option<NodeId> {
        let mv = self.get_mut(parent_id).untried_moves.pop()?;

        let parent = self.get(parent_id);
        let mover = parent.acting_player;
        let mut child_state = parent.state.clone();
        child_state.execute_move(mover, &mv);

        let child_player = mover.opponent();
        let legal = child_state.get_available_moves(child_player);
        let untried = self.move_order.arrange(legal, self.order_rng.as_mut());

        let child_id = NodeId(self.nodes.len() as u32);
        self.nodes.push(TreeNode::new(
            child_state,
            child_player,
            Some(parent_id),
            Some(mv),
            untried,
        ));
        self.get_mut(parent_id).children.push(child_id);

        Some(child_id)
    }

    /// Select the best child of a node with the UCB rule.
    ///
    /// Ties keep the first child encountered; only a strictly greater score
    /// replaces the current best. Returns None if the node has no children.
    pub fn best_child(&self, node_id: NodeId, exploration: f64) -> Option<NodeId> {
        let node = self.get(node_id);
        let parent_visits = node.stats.visits();

        let mut best: Option<(NodeId, f64)> = None;
        for &child_id in &node.children {
            let score = self.get(child_id).stats.ucb(parent_visits, exploration);
            match best {
                Some((_, best_score)) if score <= best_score => {}
                _ => best = Some((child_id, score)),
            }
        }
        best.map(|(id, _)| id)
    }

    /// Record `outcome` on `leaf_id` and every ancestor up to the root.
    ///
    /// `outcome` is relative to the leaf's mover. Players alternate by level,
    /// so the outcome is flipped at each step up.
    pub fn backpropagate(&mut self, leaf_id: NodeId, outcome: Outcome) {
        let mut current = Some(leaf_id);
        let mut outcome = outcome;

        while let Some(id) = current {
            let node = self.get_mut(id);
            node.stats.record(outcome);
            outcome = outcome.flip();
            current = node.parent;
        }
    }

    /// (move, stats) for each root child, in creation order.
    pub fn root_children(&self) -> Vec<(S::Move, NodeStats)> {
        self.children(self.root())
            .iter()
            .filter_map(|&id| {
                let child = self.get(id);
                child.parent_action.clone().map(|mv| (mv, child.stats))
            })
            .collect()
    }

    /// Get statistics about the tree for debugging.
    pub fn stats(&self) -> TreeStats {
        TreeStats {
            total_nodes: self.nodes.len(),
            root_visits: self.get(self.root()).stats.visits(),
            max_depth: self.compute_max_depth(),
        }
    }

    fn compute_max_depth(&self) -> u32 {
        // Children are always allocated after their parent, so one forward
        // pass sees every parent's depth before its children.
        let mut depths = vec![0u32; self.nodes.len()];
        let mut max_depth = 0;
        for (i, node) in self.nodes.iter().enumerate() {
            if let Some(parent) = node.parent {
                depths[i] = depths[parent.index()] + 1;
                max_depth = max_depth.max(depths[i]);
            }
        }
        max_depth
    }
}

/// Statistics about a search tree.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TreeStats {
    pub total_nodes: usize,
    pub root_visits: u32,
    pub max_depth: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::tile_line::{TileLineMove, TileLineState};

    fn new_tree(tiles: Vec<u8>) -> SearchTree<TileLineState> {
        let state = TileLineState::new(tiles);
        let legal = state.get_available_moves(PlayerId::FIRST);
        SearchTree::new(state, PlayerId::FIRST, legal, MoveOrder::Insertion, 0)
    }

    #[test]
    fn test_new_tree() {
        let tree = new_tree(vec![1, 2, 3]);

        assert_eq!(tree.len(), 1);
        assert_eq!(tree.root(), NodeId(0));

        let root = tree.get(tree.root());
        assert!(root.parent().is_none());
        assert!(root.parent_action().is_none());
        assert_eq!(root.acting_player(), PlayerId::FIRST);
        assert_eq!(root.untried_moves().len(), 2);
        assert_eq!(root.stats().visits(), 0);
    }

    #[test]
    fn test_expand_applies_move_and_alternates_player() {
        let mut tree = new_tree(vec![1, 2, 3]);

        let child_id = tree.expand(tree.root()).unwrap();
        assert_eq!(child_id, NodeId(1));

        let child = tree.get(child_id);
        assert_eq!(child.parent(), Some(tree.root()));
        assert_eq!(child.parent_action(), Some(&TileLineMove::Left));
        assert_eq!(child.acting_player(), PlayerId::SECOND);

        let mut expected = TileLineState::new(vec![1, 2, 3]);
        expected.execute_move(PlayerId::FIRST, &TileLineMove::Left);
        assert_eq!(child.state(), &expected);

        // Child moves were generated for the child's acting player
        assert_eq!(child.untried_moves().len(), 2);
        assert_eq!(tree.children(tree.root()), &[child_id]);
    }

    #[test]
    fn test_expand_exhausts_untried_moves() {
        let mut tree = new_tree(vec![1, 2, 3]);

        let first = tree.expand(tree.root()).unwrap();
        let second = tree.expand(tree.root()).unwrap();
        assert!(tree.expand(tree.root()).is_none());
        assert!(tree.get(tree.root()).is_fully_expanded());

        let tried: Vec<_> = [first, second]
            .iter()
            .map(|&id| tree.get(id).parent_action().cloned().unwrap())
            .collect();
        assert_eq!(tried, vec![TileLineMove::Left, TileLineMove::Right]);
    }

    #[test]
    fn test_backpropagate_flips_perspective() {
        let mut tree = new_tree(vec![1, 2, 3]);

        // Create a chain: root -> child -> grandchild
        let child_id = tree.expand(tree.root()).unwrap();
        let grandchild_id = tree.expand(child_id).unwrap();

        tree.backpropagate(grandchild_id, Outcome::Win);

        for id in [grandchild_id, child_id, tree.root()] {
            assert_eq!(tree.get(id).stats().visits(), 1);
        }
        assert_eq!(tree.get(grandchild_id).stats().count(Outcome::Win), 1);
        assert_eq!(tree.get(child_id).stats().count(Outcome::Loss), 1);
        assert_eq!(tree.get(tree.root()).stats().count(Outcome::Win), 1);

        tree.backpropagate(grandchild_id, Outcome::Draw);
        assert_eq!(tree.get(tree.root()).stats().count(Outcome::Draw), 1);
        assert_eq!(tree.get(tree.root()).stats().visits(), 2);
    }

    #[test]
    fn test_best_child_prefers_advantage_and_breaks_ties_first() {
        let mut tree = new_tree(vec![1, 2, 3]);
        let left = tree.expand(tree.root()).unwrap();
        let right = tree.expand(tree.root()).unwrap();

        tree.backpropagate(left, Outcome::Draw);
        tree.backpropagate(right, Outcome::Draw);
        // Equal scores: first encountered wins
        assert_eq!(tree.best_child(tree.root(), 0.0), Some(left));

        tree.backpropagate(right, Outcome::Win);
        assert_eq!(tree.best_child(tree.root(), 0.0), Some(right));
    }

    #[test]
    fn test_best_child_exploration_favors_less_visited() {
        let mut tree = new_tree(vec![1, 2, 3]);
        let left = tree.expand(tree.root()).unwrap();
        let right = tree.expand(tree.root()).unwrap();

        for _ in 0..10 {
            tree.backpropagate(left, Outcome::Draw);
        }
        tree.backpropagate(right, Outcome::Draw);

        assert_eq!(tree.best_child(tree.root(), 0.0), Some(left));
        assert_eq!(tree.best_child(tree.root(), 1.0), Some(right));
    }

    #[test]
    fn test_best_child_of_leaf_is_none() {
        let tree = new_tree(vec![1, 2, 3]);
        assert!(tree.best_child(tree.root(), 1.0).is_none());
    }

    #[test]
    fn test_tree_stats() {
        let mut tree = new_tree(vec![1, 2, 3]);
        let child_id = tree.expand(tree.root()).unwrap();
        let grandchild_id = tree.expand(child_id).unwrap();
        tree.expand(tree.root()).unwrap();
        tree.backpropagate(grandchild_id, Outcome::Loss);

        let stats = tree.stats();
        assert_eq!(stats.total_nodes, 4);
        assert_eq!(stats.max_depth, 2);
        assert_eq!(stats.root_visits, 1);
    }

    #[test]
    fn test_root_children_in_creation_order() {
        let mut tree = new_tree(vec![1, 2, 3]);
        let left = tree.expand(tree.root()).unwrap();
        tree.expand(tree.root()).unwrap();
        tree.backpropagate(left, Outcome::Win);

        let children = tree.root_children();
        assert_eq!(children.len(), 2);
        assert_eq!(children[0].0, TileLineMove::Left);
        assert_eq!(children[0].1.count(Outcome::Win), 1);
        assert_eq!(children[1].1.visits(), 0);
    }
}
