use crate::error::StreamError;
use crate::node::Node;
use crate::node_id::NodeId;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

// -------- Pipeline + nodes --------

/// Graph container shared by every stream handle built on it.
///
/// A node accepts exactly one downstream stage or one terminal. Once linked it
/// cannot be operated upon again.
///
/// A `Pipeline` is meant to be short-lived: build a chain, run its terminal,
/// drop it. Nodes are never removed, so consumed chains can still be
/// [`explain`](crate::PCollection::explain)ed, and a source that is built but
/// never run keeps its backing resource (the open file of a
/// [`lines`](fn@crate::io::lines) source, for one) until the last clone of the
/// `Pipeline` and of every handle on it is dropped. A source that did run
/// releases its resource as soon as its terminal returns.
///
/// ```
/// use ironstream::*;
///
/// let p = Pipeline::default();
/// let evens = range(&p, 0u32, 10).filter(|n| n % 2 == 0).count()?;
/// assert_eq!(evens, 5);
/// drop(p);
/// # anyhow::Result::<()>::Ok(())
/// ```
pub struct Pipeline {
    pub(crate) inner: Arc<Mutex<PipelineInner>>,
}

pub struct PipelineInner {
    pub next_id: u64,
    pub nodes: HashMap<NodeId, Node>,
    pub edges: Vec<(NodeId, NodeId)>,
    /// Nodes that already have a downstream stage or ran a terminal.
    pub linked: HashSet<NodeId>,
}

impl Default for Pipeline {
    fn default() -> Self {
        Self {
            inner: Arc::new(Mutex::new(PipelineInner {
                next_id: 0,
                nodes: HashMap::new(),
                edges: Vec::new(),
                linked: HashSet::new(),
            })),
        }
    }
}

/// Allow `Pipeline` cloning.
impl Clone for Pipeline {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl Pipeline {
    fn lock(&self) -> MutexGuard<'_, PipelineInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Insert a root node (a source).
    pub(crate) fn insert_node(&self, node: Node) -> NodeId {
        let mut g = self.lock();
        insert(&mut g, node)
    }

    /// Insert `node` downstream of `from`, linking `from`.
    pub(crate) fn attach(&self, from: NodeId, node: Node) -> Result<NodeId, StreamError> {
        let mut g = self.lock();
        if !g.nodes.contains_key(&from) {
            return Err(StreamError::MissingNode(from));
        }
        if !g.linked.insert(from) {
            return Err(StreamError::AlreadyConsumed);
        }
        let id = insert(&mut g, node);
        g.edges.push((from, id));
        Ok(id)
    }

    /// Mark `id` as consumed by a terminal.
    pub(crate) fn consume(&self, id: NodeId) -> Result<(), StreamError> {
        let mut g = self.lock();
        if !g.nodes.contains_key(&id) {
            return Err(StreamError::MissingNode(id));
        }
        if g.linked.insert(id) {
            Ok(())
        } else {
            Err(StreamError::AlreadyConsumed)
        }
    }

    /// Whether `id` already has a downstream stage or ran a terminal.
    #[must_use]
    pub fn is_linked(&self, id: NodeId) -> bool {
        self.lock().linked.contains(&id)
    }

    /// Clone the current nodes and edges.
    #[must_use]
    pub fn snapshot(&self) -> (HashMap<NodeId, Node>, Vec<(NodeId, NodeId)>) {
        let g = self.lock();
        (g.nodes.clone(), g.edges.clone())
    }
}

fn insert(g: &mut PipelineInner, node: Node) -> NodeId {
    let id = NodeId::new(g.next_id);
    g.next_id += 1;
    g.nodes.insert(id, node);
    id
}
