use crate::node::Node;
use crate::node_id::NodeId;
use crate::pipeline::Pipeline;
use crate::runner::ExecMode;
use std::marker::PhantomData;

/// Bound shared by every element type flowing through a pipeline.
pub trait RFBound: 'static + Send + Sync + Clone {}
impl<T> RFBound for T where T: 'static + Send + Sync + Clone {}

/// Handle to one stage of a lazily built stream.
///
/// A handle is cheap to clone, but the stream behind it is single-use: the
/// first stage or terminal attached to it links it, and any later attempt
/// through another clone is an illegal reuse. Intermediate stages panic on
/// illegal reuse; terminals return [`StreamError::AlreadyConsumed`](crate::StreamError::AlreadyConsumed).
#[derive(Clone)]
pub struct PCollection<T> {
    pub(crate) pipeline: Pipeline,
    pub(crate) id: NodeId,
    pub(crate) mode: ExecMode,
    pub(crate) _t: PhantomData<T>,
}

impl<T: RFBound> PCollection<T> {
    pub(crate) fn root(pipeline: &Pipeline, id: NodeId) -> Self {
        Self {
            pipeline: pipeline.clone(),
            id,
            mode: ExecMode::Sequential,
            _t: PhantomData,
        }
    }

    /// Attach `node` downstream of this handle.
    ///
    /// # Panics
    /// If this handle was already operated upon or consumed.
    pub(crate) fn chain<O: RFBound>(self, node: Node) -> PCollection<O> {
        let id = match self.pipeline.attach(self.id, node) {
            Ok(id) => id,
            Err(e) => panic!("{e}"),
        };
        PCollection {
            pipeline: self.pipeline,
            id,
            mode: self.mode,
            _t: PhantomData,
        }
    }

    /// Node this handle points at.
    #[must_use]
    pub fn node_id(&self) -> NodeId {
        self.id
    }

    /// Execution mode terminals on this handle will use.
    #[must_use]
    pub fn exec_mode(&self) -> ExecMode {
        self.mode
    }

    /// Whether this stream already has a downstream stage or was consumed.
    #[must_use]
    pub fn is_consumed(&self) -> bool {
        self.pipeline.is_linked(self.id)
    }

    /// Run terminals in parallel on the shared rayon pool.
    #[must_use]
    pub fn parallel(self) -> Self {
        self.with_mode(ExecMode::Parallel {
            threads: None,
            min_split_len: None,
        })
    }

    /// Run terminals in parallel, optionally on a dedicated pool of `threads`
    /// workers and with a fixed leaf size.
    #[must_use]
    pub fn parallel_with(self, threads: Option<usize>, min_split_len: Option<usize>) -> Self {
        self.with_mode(ExecMode::Parallel {
            threads,
            min_split_len,
        })
    }

    /// Run terminals on the caller's thread (the default).
    #[must_use]
    pub fn sequential(self) -> Self {
        self.with_mode(ExecMode::Sequential)
    }

    #[must_use]
    pub fn with_mode(mut self, mode: ExecMode) -> Self {
        self.mode = mode;
        self
    }
}

/// Accumulation recipe for terminals, shaped like a collector:
/// `create` a container, `add_input` each element, `merge` partial containers
/// from parallel leaves (in source order), then `finish`.
///
/// `merge` must be associative for parallel runs to match sequential ones.
pub trait CombineFn<V, A, O>: Send + Sync + 'static {
    fn create(&self) -> A;
    fn add_input(&self, acc: &mut A, v: V);
    fn merge(&self, acc: &mut A, other: A);
    fn finish(&self, acc: A) -> O;
}

#[derive(Clone, Copy, Debug, Default)]
pub struct Count;
impl<V> CombineFn<V, u64, u64> for Count {
    fn create(&self) -> u64 {
        0
    }
    fn add_input(&self, acc: &mut u64, _v: V) {
        *acc += 1;
    }
    fn merge(&self, acc: &mut u64, other: u64) {
        *acc += other;
    }
    fn finish(&self, acc: u64) -> u64 {
        acc
    }
}
