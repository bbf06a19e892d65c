//! Per-decision search tree.
//!
//! Nodes live in one `Vec` and point at each other through `NodeId`
//! indices. Parent links are plain indices, so path walks are loops rather
//! than recursion.
//!
//! The untried action a node expands next is drawn uniformly at random, not
//! taken from the end of its list, so the order in which an environment
//! reports legal actions never biases which subtree is grown first.

use rand::Rng;

use crate::node::{MctsNode, NodeId};

/// Relative tolerance used when comparing scores for ties.
const TIE_EPSILON: f64 = 1e-12;

/// Search tree for one decision. Dropped when the decision returns.
#[derive(Debug)]
pub struct MctsTree<S, A> {
    /// Every node, root first
    nodes: Vec<MctsNode<S, A>>,

    /// Always `NodeId(0)`
    root: NodeId,
}

impl<S, A: Copy> MctsTree<S, A> {
    /// Create a new tree rooted at the given state with its legal actions.
    pub fn new(root_state: S, legal_actions: Vec<A>) -> Self {
        let root_node = MctsNode::new_root(root_state, legal_actions);
        Self {
            nodes: vec![root_node],
            root: NodeId(0),
        }
    }

    /// Get the root node ID.
    #[inline]
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Node by id. Panics on an id from another tree.
    #[inline]
    pub fn get(&self, id: NodeId) -> &MctsNode<S, A> {
        &self.nodes[id.0 as usize]
    }

    #[inline]
    pub fn get_mut(&mut self, id: NodeId) -> &mut MctsNode<S, A> {
        &mut self.nodes[id.0 as usize]
    }

    /// Number of nodes, root included.
    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always false: the root exists from construction.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Link a freshly expanded child under `parent_id`.
    pub fn add_child(
        &mut self,
        parent_id: NodeId,
        action: A,
        state: Option<S>,
        untried: Vec<A>,
        terminal_value: Option<f64>,
    ) -> NodeId {
        let depth = self.get(parent_id).depth + 1;
        let child = MctsNode::new_child(parent_id, depth, action, state, untried, terminal_value);
        let child_id = NodeId(self.nodes.len() as u32);
        self.nodes.push(child);

        self.get_mut(parent_id).children.push(child_id);

        child_id
    }

    /// Remove and return one untried action of `node_id`, chosen uniformly.
    pub fn pop_untried<R: Rng>(&mut self, node_id: NodeId, rng: &mut R) -> Option<A> {
        let untried = &mut self.get_mut(node_id).untried;
        if untried.is_empty() {
            return None;
        }
        let idx = rng.gen_range(0..untried.len());
        Some(untried.swap_remove(idx))
    }

    /// Actions along the path from the root to `node_id`, root-first.
    pub fn path_actions(&self, node_id: NodeId) -> Vec<A> {
        let mut actions = Vec::with_capacity(self.get(node_id).depth as usize);
        let mut current = node_id;
        while current.is_some() {
            let node = self.get(current);
            if let Some(action) = node.action {
                actions.push(action);
            }
            current = node.parent;
        }
        actions.reverse();
        actions
    }

    /// Select the child of `node_id` maximizing UCB1, breaking ties uniformly at random.
    pub fn select_child<R: Rng>(
        &self,
        node_id: NodeId,
        exploration: f64,
        rng: &mut R,
    ) -> Option<NodeId> {
        let node = self.get(node_id);
        // ln(N) once for every child comparison
        let ln_parent = f64::from(node.visit_count.max(1)).ln();
        let scored: Vec<(NodeId, f64)> = node
            .children
            .iter()
            .map(|&id| (id, self.get(id).ucb1(ln_parent, exploration)))
            .collect();
        pick_max(&scored, rng)
    }

    /// Add `reward` and one visit to every node from `leaf_id` up to the root,
    /// refreshing the closed flags on the way.
    pub fn backpropagate(&mut self, leaf_id: NodeId, reward: f64) {
        let mut current_id = leaf_id;

        while current_id.is_some() {
            let closed = {
                let node = self.get(current_id);
                node.is_terminal
                    || (node.untried.is_empty()
                        && node.children.iter().all(|&id| self.get(id).closed))
            };

            let node = self.get_mut(current_id);
            node.visit_count += 1;
            node.reward_sum += reward;
            node.closed = closed;

            current_id = node.parent;
        }
    }

    /// Get the best root action based on visit counts, ties broken uniformly at random.
    /// Returns None if the root has no children.
    pub fn best_action<R: Rng>(&self, rng: &mut R) -> Option<(A, u32)> {
        let root = self.get(self.root);
        let scored: Vec<(NodeId, f64)> = root
            .children
            .iter()
            .map(|&id| (id, f64::from(self.get(id).visit_count)))
            .collect();
        let best = pick_max(&scored, rng)?;
        let node = self.get(best);
        node.action.map(|action| (action, node.visit_count))
    }

    /// Shape and root value, for logging.
    pub fn stats(&self) -> TreeStats {
        let root = self.get(self.root);
        TreeStats {
            total_nodes: self.nodes.len(),
            root_visits: root.visit_count,
            root_value: root.mean_reward(),
            max_depth: self.nodes.iter().map(|n| n.depth).max().unwrap_or(0),
        }
    }
}

/// Uniformly random choice among the entries sharing the maximum score.
fn pick_max<R: Rng>(scored: &[(NodeId, f64)], rng: &mut R) -> Option<NodeId> {
    let best = scored
        .iter()
        .map(|(_, s)| *s)
        .fold(f64::NEG_INFINITY, f64::max);
    let ties: Vec<NodeId> = scored
        .iter()
        .filter(|(_, s)| is_tie(*s, best))
        .map(|(id, _)| *id)
        .collect();
    match ties.len() {
        0 => None,
        1 => Some(ties[0]),
        n => Some(ties[rng.gen_range(0..n)]),
    }
}

#[inline]
fn is_tie(score: f64, best: f64) -> bool {
    if score.is_infinite() || best.is_infinite() {
        return score == best;
    }
    (score - best).abs() <= TIE_EPSILON * best.abs().max(1.0)
}

/// Shape of a search tree.
#[derive(Debug, Clone)]
pub struct TreeStats {
    pub total_nodes: usize,
    pub root_visits: u32,
    pub root_value: f64,
    pub max_depth: u32,
}
