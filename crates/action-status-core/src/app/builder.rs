//! ActionStatusBuilder - tracker の構築とワイヤリング
//!
//! 起動時に検証できるものは build() で弾きます（Fail-fast）。
//! 今のところ検証対象は tokio runtime の有無と options の JSON です。

use std::marker::PhantomData;
use std::sync::Arc;
use std::time::Duration;

use tokio::runtime::Handle;

use super::options::ActionOptions;
use super::tracker::{ActionStatus, Shared};
use crate::domain::BuildError;
use crate::ports::{Clock, IdGenerator, Operation, StatusObserver, SystemClock, UlidGenerator};

/// Builds an [`ActionStatus`].
///
/// # 使用例
/// ```ignore
/// let tracker = ActionStatus::builder(op)
///     .delay_timeout(Duration::from_millis(300))
///     .observer(LogObserver::named("search"))
///     .build()?;
/// ```
pub struct ActionStatusBuilder<A, O> {
    op: O,
    options: ActionOptions,
    observers: Vec<Arc<dyn StatusObserver>>,
    clock: Option<Arc<dyn Clock>>,
    ids: Option<Arc<dyn IdGenerator>>,
    runtime: Option<Handle>,
    _args: PhantomData<fn(A)>,
}

impl<A, O: Operation<A>> ActionStatusBuilder<A, O> {
    pub fn new(op: O) -> Self {
        Self {
            op,
            options: ActionOptions::default(),
            observers: Vec::new(),
            clock: None,
            ids: None,
            runtime: None,
            _args: PhantomData,
        }
    }

    /// Replace all options.
    pub fn options(mut self, options: ActionOptions) -> Self {
        self.options = options;
        self
    }

    /// Parse options from JSON (e.g. `{"delay_timeout_ms": 300}`).
    pub fn options_json(self, json: &str) -> Result<Self, BuildError> {
        let options = ActionOptions::from_json(json)?;
        Ok(self.options(options))
    }

    pub fn delay_timeout(mut self, delay: Duration) -> Self {
        self.options = self.options.with_delay_timeout(delay);
        self
    }

    /// Register an observer. Observers are notified in registration order.
    pub fn observer(self, observer: impl StatusObserver + 'static) -> Self {
        self.shared_observer(Arc::new(observer))
    }

    /// Register an observer the caller keeps a handle to.
    pub fn shared_observer(mut self, observer: Arc<dyn StatusObserver>) -> Self {
        self.observers.push(observer);
        self
    }

    pub fn clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Some(Arc::new(clock));
        self
    }

    pub fn id_generator(mut self, ids: impl IdGenerator + 'static) -> Self {
        self.ids = Some(Arc::new(ids));
        self
    }

    /// Runtime used for the operation and timer tasks.
    /// Defaults to the runtime `build()` is called from.
    pub fn runtime(mut self, handle: Handle) -> Self {
        self.runtime = Some(handle);
        self
    }

    pub fn build(self) -> Result<ActionStatus<A, O>, BuildError> {
        let runtime = match self.runtime {
            Some(handle) => handle,
            None => Handle::try_current().map_err(|_| BuildError::NoRuntime)?,
        };
        let clock = self
            .clock
            .unwrap_or_else(|| Arc::new(SystemClock) as Arc<dyn Clock>);
        let ids = self
            .ids
            .unwrap_or_else(|| Arc::new(UlidGenerator::new(Arc::clone(&clock))) as Arc<dyn IdGenerator>);

        let shared = Shared::new(self.observers, clock, ids, runtime);
        Ok(ActionStatus::from_parts(self.op, self.options, shared))
    }
}
