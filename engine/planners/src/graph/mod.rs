//! Search graph shared by the uninformed and informed graph planners.
//!
//! Nodes live in an arena and point at their parent by index. Every node has at
//! most one parent at a time; relaxation rewrites the parent index instead of
//! adding a second edge, so the arena always forms a tree of best-known paths.

pub mod informed;
pub mod uninformed;

/// Index of a node in the [`SearchGraph`] arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u32);

impl NodeId {
    pub const ROOT: NodeId = NodeId(0);

    #[inline]
    fn index(self) -> usize {
        self.0 as usize
    }
}

/// A reached state and how it was reached.
#[derive(Debug, Clone)]
pub struct GraphNode<S, A> {
    pub state: S,
    /// Action taken from the parent (None for the root)
    pub action: Option<A>,
    pub parent: Option<NodeId>,
    /// Path length from the root (g)
    pub depth: u32,
    /// Heuristic estimate at `state` (h)
    pub heuristic: f64,
    /// `depth + heuristic`
    pub total_cost: f64,
}

/// Arena of graph nodes rooted at the decision state.
#[derive(Debug)]
pub struct SearchGraph<S, A> {
    nodes: Vec<GraphNode<S, A>>,
}

impl<S, A: Copy> SearchGraph<S, A> {
    pub fn new(root_state: S, heuristic: f64) -> Self {
        let root = GraphNode {
            state: root_state,
            action: None,
            parent: None,
            depth: 0,
            heuristic,
            total_cost: heuristic,
        };
        Self { nodes: vec![root] }
    }

    #[inline]
    pub fn get(&self, id: NodeId) -> &GraphNode<S, A> {
        &self.nodes[id.index()]
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Add the node reached from `parent` by `action`.
    pub fn add_child(&mut self, parent: NodeId, action: A, state: S, heuristic: f64) -> NodeId {
        let depth = self.get(parent).depth + 1;
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(GraphNode {
            state,
            action: Some(action),
            parent: Some(parent),
            depth,
            heuristic,
            total_cost: f64::from(depth) + heuristic,
        });
        id
    }

    /// Point `id` at a cheaper parent. Depth and total cost follow the new path.
    pub fn relax(&mut self, id: NodeId, parent: NodeId, action: A) {
        let depth = self.get(parent).depth + 1;
        let node = &mut self.nodes[id.index()];
        node.parent = Some(parent);
        node.action = Some(action);
        node.depth = depth;
        node.total_cost = f64::from(depth) + node.heuristic;
    }

    /// First action on the path from the root to `id`: the action of the
    /// ancestor that is a direct child of the root. None for the root itself.
    pub fn first_action(&self, id: NodeId) -> Option<A> {
        let mut current = self.get(id);
        let mut action = current.action;
        while let Some(parent) = current.parent {
            action = current.action;
            current = self.get(parent);
        }
        action
    }

    /// Actions from the root to `id`, root first.
    pub fn path(&self, id: NodeId) -> Vec<A> {
        let mut actions = Vec::with_capacity(self.get(id).depth as usize);
        let mut current = self.get(id);
        while let (Some(parent), Some(action)) = (current.parent, current.action) {
            actions.push(action);
            current = self.get(parent);
        }
        actions.reverse();
        actions
    }
}
