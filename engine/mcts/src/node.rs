//! Search tree nodes and their arena ids.
//!
//! Each node records the action that reached it from its parent, plus the
//! visit statistics used for UCB1 selection. The resulting state is stored
//! only when state caching is enabled.

/// Index of a node in its tree's arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub u32);

impl NodeId {
    pub const NONE: NodeId = NodeId(u32::MAX);

    pub fn is_none(self) -> bool {
        self == Self::NONE
    }

    pub fn is_some(self) -> bool {
        !self.is_none()
    }
}

/// One action edge of the search tree with its statistics.
#[derive(Debug, Clone)]
pub struct MctsNode<S, A> {
    /// `NodeId::NONE` on the root
    pub parent: NodeId,

    /// Action that led to this node from parent (None for root)
    pub action: Option<A>,

    /// Cached state at this node. Always present on the root; present on
    /// other nodes only when state caching is enabled.
    pub state: Option<S>,

    /// Edges from the root
    pub depth: u32,

    /// Backpropagations through this node
    pub visit_count: u32,

    /// Sum of rollout rewards backpropagated through this node.
    pub reward_sum: f64,

    /// Expanded children, in creation order.
    pub children: Vec<NodeId>,

    /// Legal actions not yet expanded.
    pub untried: Vec<A>,

    /// Whether the state is terminal (won, lost, or without legal actions)
    pub is_terminal: bool,

    /// Score of the terminal state against the root (only valid if is_terminal)
    pub terminal_value: f64,

    /// Set once the subtree below this node is fully enumerated.
    pub closed: bool,
}

impl<S, A> MctsNode<S, A> {
    /// Root of a decision: always keeps its state.
    pub fn new_root(state: S, untried: Vec<A>) -> Self {
        Self {
            parent: NodeId::NONE,
            action: None,
            state: Some(state),
            depth: 0,
            visit_count: 0,
            reward_sum: 0.0,
            children: Vec::new(),
            untried,
            is_terminal: false,
            terminal_value: 0.0,
            closed: false,
        }
    }

    /// Child reached by `action`. Terminal children start closed.
    pub fn new_child(
        parent: NodeId,
        depth: u32,
        action: A,
        state: Option<S>,
        untried: Vec<A>,
        terminal_value: Option<f64>,
    ) -> Self {
        let is_terminal = terminal_value.is_some();
        Self {
            parent,
            action: Some(action),
            state,
            depth,
            visit_count: 0,
            reward_sum: 0.0,
            children: Vec::new(),
            untried: if is_terminal { Vec::new() } else { untried },
            is_terminal,
            terminal_value: terminal_value.unwrap_or(0.0),
            closed: is_terminal,
        }
    }

    /// Mean rollout reward. Returns 0.0 if never visited.
    #[inline]
    pub fn mean_reward(&self) -> f64 {
        if self.visit_count == 0 {
            0.0
        } else {
            self.reward_sum / f64::from(self.visit_count)
        }
    }

    /// UCB1 score for selecting this node from a parent with
    /// `ln_parent_visits = ln(N_parent)`:
    /// `mean + sqrt(exploration * ln(N_parent) / N)`.
    ///
    /// Unvisited nodes score infinity so they are always tried first.
    #[inline]
    pub fn ucb1(&self, ln_parent_visits: f64, exploration: f64) -> f64 {
        if self.visit_count == 0 {
            return f64::INFINITY;
        }
        let n = f64::from(self.visit_count);
        self.mean_reward() + (exploration * ln_parent_visits / n).sqrt()
    }

    /// Whether there are still legal actions to expand.
    #[inline]
    pub fn has_untried(&self) -> bool {
        !self.untried.is_empty()
    }

    /// Check if this is a leaf for the tree policy (terminal or nothing to descend into).
    #[inline]
    pub fn is_leaf(&self) -> bool {
        self.is_terminal || (self.untried.is_empty() && self.children.is_empty())
    }
}
