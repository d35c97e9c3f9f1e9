//! ActionStatus - 非同期処理 1 本のライフサイクルを追跡する
//!
//! # 状態の分け方
//! - **reactive**: `Snapshot`（status / error）。watch と observer に流す
//! - **identity**: active invocation の ID・settle 用 sender・timer handle。
//!   ロックの中だけで触り、外には出さない
//!
//! operation / timer の continuation は自分の `InvocationId` を捕まえておき、
//! active と一致するときだけ状態を変更します。古い invocation が遅れて
//! 完了しても、何も起きません。

use std::future::Future;
use std::marker::PhantomData;
use std::pin::Pin;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::task::{Context, Poll};
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::sync::oneshot::{self, error::TryRecvError};
use tokio::sync::watch;
use tokio::task::{JoinError, JoinHandle};

use super::builder::ActionStatusBuilder;
use super::options::ActionOptions;
use crate::domain::{ActionError, InvocationId, Snapshot, Status, StatusView, Transition};
use crate::ports::{Clock, IdGenerator, Operation, StatusObserver};

type Settlement<T, E> = Result<T, ActionError<E>>;

/// The invocation currently allowed to mutate status and settle its future.
struct ActiveInvocation<T, E> {
    id: InvocationId,
    settle: oneshot::Sender<Settlement<T, E>>,
    /// Delayed-feedback timer. Owned by this invocation only.
    timer: Option<JoinHandle<()>>,
}

impl<T, E> ActiveInvocation<T, E> {
    fn disarm(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.abort();
        }
    }

    /// Disarm the timer, then settle. The caller may have dropped the
    /// receiver already, which is fine.
    fn settle(mut self, result: Settlement<T, E>) {
        self.disarm();
        let _ = self.settle.send(result);
    }
}

struct TrackerState<T, E> {
    status: Status,
    active: Option<ActiveInvocation<T, E>>,
}

/// Everything the spawned operation and timer tasks need.
pub(crate) struct Shared<T, E> {
    state: Mutex<TrackerState<T, E>>,
    snapshot_tx: watch::Sender<Snapshot<E>>,
    observers: Vec<Arc<dyn StatusObserver>>,
    clock: Arc<dyn Clock>,
    ids: Arc<dyn IdGenerator>,
    runtime: Handle,
}

impl<T, E> Shared<T, E>
where
    T: Send + 'static,
    E: Send + Sync + 'static,
{
    pub(crate) fn new(
        observers: Vec<Arc<dyn StatusObserver>>,
        clock: Arc<dyn Clock>,
        ids: Arc<dyn IdGenerator>,
        runtime: Handle,
    ) -> Self {
        let (snapshot_tx, _) = watch::channel(Snapshot::idle(clock.now()));
        Self {
            state: Mutex::new(TrackerState {
                status: Status::Idle,
                active: None,
            }),
            snapshot_tx,
            observers,
            clock,
            ids,
            runtime,
        }
    }

    fn lock(&self) -> MutexGuard<'_, TrackerState<T, E>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Apply a status change and publish it. Must be called with the lock held.
    fn transition(
        &self,
        state: &mut TrackerState<T, E>,
        invocation: InvocationId,
        to: Status,
        error: Option<Arc<E>>,
    ) {
        let from = state.status;
        state.status = to;

        let at = self.clock.now();
        tracing::debug!(invocation = %invocation, %from, %to, "status transition");

        let transition = Transition {
            invocation,
            from,
            to,
            at,
        };
        for observer in &self.observers {
            observer.on_transition(&transition);
        }

        self.snapshot_tx.send_replace(Snapshot {
            status: to,
            error,
            invocation: Some(invocation),
            updated_at: at,
        });
    }

    /// Remove `id` from the active slot, or `None` if it was superseded.
    fn take_if_active(
        &self,
        state: &mut TrackerState<T, E>,
        id: InvocationId,
    ) -> Option<ActiveInvocation<T, E>> {
        let active = state.active.take_if(|active| active.id == id);
        if active.is_none() {
            tracing::debug!(invocation = %id, "ignoring settlement of inactive invocation");
        }
        active
    }

    /// Timer callback: `Pending -> Delayed` if `id` is still active.
    fn mark_delayed(&self, id: InvocationId) {
        let mut state = self.lock();
        let still_active = matches!(&state.active, Some(active) if active.id == id);
        if !still_active || state.status != Status::Pending {
            return;
        }
        if let Some(active) = state.active.as_mut() {
            // fired; the handle belongs to the task running this code
            active.timer = None;
        }
        self.transition(&mut state, id, Status::Delayed, None);
    }

    /// Operation callback: settle `id` with the operation's outcome.
    fn complete(&self, id: InvocationId, result: Result<T, E>) {
        let mut state = self.lock();
        let Some(mut active) = self.take_if_active(&mut state, id) else {
            return;
        };
        active.disarm();

        match result {
            Ok(value) => {
                self.transition(&mut state, id, Status::Done, None);
                active.settle(Ok(value));
            }
            Err(error) => {
                let error = Arc::new(error);
                self.transition(&mut state, id, Status::Error, Some(Arc::clone(&error)));
                active.settle(Err(ActionError::Failed(error)));
            }
        }
    }

    /// The operation task never produced a result.
    fn abandon(&self, id: InvocationId, join_error: JoinError) {
        let mut state = self.lock();
        let Some(mut active) = self.take_if_active(&mut state, id) else {
            return;
        };
        active.disarm();

        if join_error.is_panic() {
            let message = panic_message(join_error);
            tracing::warn!(invocation = %id, panic = %message, "operation panicked");
            self.transition(&mut state, id, Status::Error, None);
            active.settle(Err(ActionError::Panicked(message)));
        } else {
            // runtime shutting down
            active.settle(Err(ActionError::Unmounted));
        }
    }

    /// Disarm the timer and reject the active invocation with `Unmounted`.
    /// Status is left as is.
    fn teardown(&self) {
        let mut state = self.lock();
        match state.active.take() {
            Some(active) => {
                tracing::info!(invocation = %active.id, "tracker disposed with an invocation in flight");
                active.settle(Err(ActionError::Unmounted));
            }
            None => tracing::debug!("tracker disposed"),
        }
    }
}

fn panic_message(join_error: JoinError) -> String {
    let payload = join_error.into_panic();
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

/// Tracks the status of one logical asynchronous operation.
///
/// Each call to [`action`](Self::action) starts a new invocation and
/// supersedes the previous one: the older future is rejected with
/// [`ActionError::Superseded`] right away and its eventual outcome is dropped.
/// The underlying operation is not aborted.
///
/// Dropping the tracker (or calling [`dispose`](Self::dispose)) disarms the
/// delay timer and rejects an in-flight invocation with
/// [`ActionError::Unmounted`].
///
/// # 使用例
/// ```ignore
/// let tracker = ActionStatus::builder(|q: String| async move { search(&q).await })
///     .delay_timeout(Duration::from_millis(300))
///     .build()?;
///
/// match tracker.action("rust".into()).await {
///     Ok(hits) => render(hits),
///     Err(e) if e.is_cancelled() => {}
///     Err(e) => show_error(e),
/// }
/// ```
pub struct ActionStatus<A, O: Operation<A>> {
    op: O,
    options: ActionOptions,
    shared: Arc<Shared<O::Output, O::Error>>,
    _args: PhantomData<fn(A)>,
}

impl<A, O: Operation<A>> ActionStatus<A, O> {
    pub fn builder(op: O) -> ActionStatusBuilder<A, O> {
        ActionStatusBuilder::new(op)
    }

    pub(crate) fn from_parts(
        op: O,
        options: ActionOptions,
        shared: Shared<O::Output, O::Error>,
    ) -> Self {
        Self {
            op,
            options,
            shared: Arc::new(shared),
            _args: PhantomData,
        }
    }

    /// Start a new invocation of the wrapped operation.
    ///
    /// Synchronously, before returning: the previous invocation (if any) is
    /// rejected with `Superseded` and its timer disarmed, status becomes
    /// `Pending`, `error` is cleared and the delay timer is armed. The
    /// operation itself runs on the tracker's runtime.
    pub fn action(&self, args: A) -> PendingAction<O::Output, O::Error> {
        let id = self.shared.ids.generate_invocation_id();
        let (settle, rx) = oneshot::channel();

        {
            let mut state = self.shared.lock();

            if let Some(previous) = state.active.take() {
                tracing::debug!(superseded = %previous.id, invocation = %id, "superseding invocation");
                previous.settle(Err(ActionError::Superseded));
            }

            state.active = Some(ActiveInvocation {
                id,
                settle,
                timer: None,
            });
            self.shared
                .transition(&mut state, id, Status::Pending, None);

            if let Some(delay) = self.options.delay_timeout() {
                let timer = self.arm_delay(id, delay);
                if let Some(active) = state.active.as_mut() {
                    active.timer = Some(timer);
                }
            }
        }

        let fut = self.op.call(args);
        let operation = self.shared.runtime.spawn(fut);
        let shared = Arc::clone(&self.shared);
        self.shared.runtime.spawn(async move {
            match operation.await {
                Ok(result) => shared.complete(id, result),
                Err(join_error) => shared.abandon(id, join_error),
            }
        });

        PendingAction { id, rx: Some(rx) }
    }

    fn arm_delay(&self, id: InvocationId, delay: Duration) -> JoinHandle<()> {
        let shared = Arc::clone(&self.shared);
        self.shared.runtime.spawn(async move {
            tokio::time::sleep(delay).await;
            shared.mark_delayed(id);
        })
    }

    pub fn status(&self) -> Status {
        self.shared.snapshot_tx.borrow().status
    }

    /// Last operation error; `None` unless status is `Error`.
    ///
    /// A panicked operation also ends in `Error` but leaves this `None`:
    /// the panic payload is not an `O::Error`. It is only reported through
    /// [`ActionError::Panicked`] on the invocation's future.
    pub fn error(&self) -> Option<Arc<O::Error>> {
        self.shared.snapshot_tx.borrow().error.clone()
    }

    pub fn is_pending(&self) -> bool {
        self.status().is_pending()
    }

    pub fn is_delayed(&self) -> bool {
        self.status().is_delayed()
    }

    pub fn is_error(&self) -> bool {
        self.status().is_error()
    }

    pub fn is_success(&self) -> bool {
        self.status().is_success()
    }

    pub fn snapshot(&self) -> Snapshot<O::Error> {
        self.shared.snapshot_tx.borrow().clone()
    }

    /// Reactive handle for observers that re-read state on change.
    pub fn subscribe(&self) -> watch::Receiver<Snapshot<O::Error>> {
        self.shared.snapshot_tx.subscribe()
    }

    pub fn view(&self) -> StatusView
    where
        O::Error: std::fmt::Display,
    {
        StatusView::from(&*self.shared.snapshot_tx.borrow())
    }

    pub fn options(&self) -> ActionOptions {
        self.options
    }

    /// Tear the tracker down. Same as dropping it.
    pub fn dispose(self) {
        drop(self);
    }
}

impl<A, O: Operation<A>> Drop for ActionStatus<A, O> {
    fn drop(&mut self) {
        self.shared.teardown();
    }
}

/// Future returned by [`ActionStatus::action`].
///
/// Always settles: with the operation's value, `Failed` with its error,
/// `Superseded`, `Unmounted` or `Panicked`.
#[must_use = "the outcome of the invocation is only observable through this future"]
pub struct PendingAction<T, E> {
    id: InvocationId,
    /// `None` once the settlement has been handed out.
    rx: Option<oneshot::Receiver<Settlement<T, E>>>,
}

impl<T, E> PendingAction<T, E> {
    pub fn id(&self) -> InvocationId {
        self.id
    }

    /// Non-blocking check.
    ///
    /// The settlement is handed out once, either here or by awaiting.
    /// Afterwards both this method and the future yield `Unmounted`.
    pub fn try_result(&mut self) -> Option<Settlement<T, E>> {
        let Some(rx) = self.rx.as_mut() else {
            return Some(Err(ActionError::Unmounted));
        };
        let result = match rx.try_recv() {
            Ok(result) => result,
            Err(TryRecvError::Empty) => return None,
            Err(TryRecvError::Closed) => Err(ActionError::Unmounted),
        };
        self.rx = None;
        Some(result)
    }
}

impl<T, E> Future for PendingAction<T, E> {
    type Output = Settlement<T, E>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.get_mut();
        let Some(rx) = this.rx.as_mut() else {
            return Poll::Ready(Err(ActionError::Unmounted));
        };
        match Pin::new(rx).poll(cx) {
            Poll::Ready(received) => {
                this.rx = None;
                // sender dropped without settling: the tracker is gone
                Poll::Ready(received.unwrap_or_else(|_| Err(ActionError::Unmounted)))
            }
            Poll::Pending => Poll::Pending,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::impls::RecordingObserver;
    use crate::ports::{ActionHandler, HandlerOperation};
    use async_trait::async_trait;
    use rstest::rstest;
    use std::sync::atomic::{AtomicBool, Ordering};
    use tokio::time::{Instant, sleep};

    #[derive(Debug, PartialEq)]
    struct Boom(&'static str);

    impl std::fmt::Display for Boom {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.write_str(self.0)
        }
    }

    /// Settles after `latency_ms`, failing when `fail` is set.
    async fn simulated(latency_ms: u64, fail: bool) -> Result<&'static str, Boom> {
        sleep(Duration::from_millis(latency_ms)).await;
        if fail { Err(Boom("boom")) } else { Ok("ok") }
    }

    fn recorded<A, O: Operation<A>>(
        builder: ActionStatusBuilder<A, O>,
    ) -> (ActionStatus<A, O>, Arc<RecordingObserver>) {
        let rec = Arc::new(RecordingObserver::new());
        let tracker = builder
            .shared_observer(Arc::clone(&rec) as Arc<dyn StatusObserver>)
            .build()
            .unwrap();
        (tracker, rec)
    }

    #[tokio::test(start_paused = true)]
    async fn success_goes_idle_pending_done() {
        let (tracker, rec) = recorded(ActionStatus::builder(|(): ()| simulated(10, false)));

        let pending = tracker.action(());
        assert_eq!(tracker.status(), Status::Pending);
        assert!(tracker.is_pending());

        assert_eq!(pending.await.unwrap(), "ok");
        assert_eq!(tracker.status(), Status::Done);
        assert!(tracker.is_success());
        assert!(tracker.error().is_none());
        assert_eq!(rec.statuses(), vec![Status::Idle, Status::Pending, Status::Done]);
    }

    #[tokio::test(start_paused = true)]
    async fn failure_goes_idle_pending_error() {
        let (tracker, rec) = recorded(ActionStatus::builder(|(): ()| simulated(10, true)));

        let err = tracker.action(()).await.unwrap_err();

        let stored = tracker.error().expect("error is stored");
        assert!(Arc::ptr_eq(err.operation_error().unwrap(), &stored));
        assert_eq!(*stored, Boom("boom"));
        assert!(tracker.is_error());
        assert!(!tracker.is_pending());
        assert_eq!(rec.statuses(), vec![Status::Idle, Status::Pending, Status::Error]);
    }

    #[tokio::test(start_paused = true)]
    async fn delay_timeline_pending_delayed_done() {
        let (tracker, rec) = recorded(
            ActionStatus::builder(|(): ()| simulated(100, false))
                .delay_timeout(Duration::from_millis(50)),
        );
        let start = Instant::now();

        let pending = tracker.action(());
        assert_eq!(tracker.status(), Status::Pending);

        sleep(Duration::from_millis(60)).await;
        assert_eq!(tracker.status(), Status::Delayed);
        assert!(tracker.is_delayed());
        assert!(tracker.is_pending());

        assert_eq!(pending.await.unwrap(), "ok");
        assert!(start.elapsed() >= Duration::from_millis(100));
        assert_eq!(tracker.status(), Status::Done);
        assert_eq!(
            rec.statuses(),
            vec![Status::Idle, Status::Pending, Status::Delayed, Status::Done]
        );
    }

    #[rstest]
    #[case::fast_success(10, false, vec![Status::Idle, Status::Pending, Status::Done])]
    #[case::fast_failure(10, true, vec![Status::Idle, Status::Pending, Status::Error])]
    #[case::slow_success(100, false, vec![Status::Idle, Status::Pending, Status::Delayed, Status::Done])]
    #[case::slow_failure(100, true, vec![Status::Idle, Status::Pending, Status::Delayed, Status::Error])]
    #[tokio::test(start_paused = true)]
    async fn delayed_only_when_slower_than_timeout(
        #[case] latency_ms: u64,
        #[case] fail: bool,
        #[case] expected: Vec<Status>,
    ) {
        let (tracker, rec) = recorded(
            ActionStatus::builder(move |(): ()| simulated(latency_ms, fail))
                .delay_timeout(Duration::from_millis(50)),
        );

        let _ = tracker.action(()).await;
        // a leaked timer would show up here
        sleep(Duration::from_millis(200)).await;

        assert_eq!(rec.statuses(), expected);
    }

    #[tokio::test(start_paused = true)]
    async fn no_delay_timeout_never_delays() {
        let (tracker, rec) = recorded(ActionStatus::builder(|(): ()| simulated(10_000, false)));

        tracker.action(()).await.unwrap();

        assert!(!rec.statuses().contains(&Status::Delayed));
    }

    #[tokio::test(start_paused = true)]
    async fn zero_delay_timeout_is_disabled() {
        let (tracker, rec) = recorded(
            ActionStatus::builder(|(): ()| simulated(100, false))
                .options(ActionOptions::from_json(r#"{"delay_timeout_ms": 0}"#).unwrap()),
        );

        tracker.action(()).await.unwrap();

        assert!(!rec.statuses().contains(&Status::Delayed));
    }

    #[tokio::test(start_paused = true)]
    async fn newer_call_supersedes_older_one() {
        // 1 is slow, 2 is fast: the stale success of 1 arrives last
        let (tracker, rec) = recorded(ActionStatus::builder(|n: u64| async move {
            sleep(Duration::from_millis(if n == 1 { 100 } else { 10 })).await;
            Ok::<_, Boom>(n * 10)
        }));

        let mut first = tracker.action(1);
        let second = tracker.action(2);
        let second_id = second.id();

        // rejected synchronously, before anything ran
        assert!(matches!(first.try_result(), Some(Err(ActionError::Superseded))));

        assert_eq!(second.await.unwrap(), 20);
        sleep(Duration::from_millis(200)).await;

        let snapshot = tracker.snapshot();
        assert_eq!(snapshot.status, Status::Done);
        assert_eq!(snapshot.invocation, Some(second_id));
        assert_eq!(
            rec.statuses(),
            vec![Status::Idle, Status::Pending, Status::Pending, Status::Done]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn stale_completion_does_not_touch_state() {
        // 1 is fast but superseded: its failure must not surface
        let (tracker, _rec) = recorded(ActionStatus::builder(|n: u64| async move {
            sleep(Duration::from_millis(if n == 1 { 10 } else { 100 })).await;
            if n == 1 { Err(Boom("stale")) } else { Ok(n) }
        }));

        let first = tracker.action(1);
        let second = tracker.action(2);

        assert!(matches!(first.await, Err(ActionError::Superseded)));

        sleep(Duration::from_millis(50)).await;
        assert_eq!(tracker.status(), Status::Pending);
        assert!(tracker.error().is_none());

        assert_eq!(second.await.unwrap(), 2);
        assert_eq!(tracker.status(), Status::Done);
    }

    #[tokio::test(start_paused = true)]
    async fn superseded_timer_never_fires() {
        let (tracker, rec) = recorded(
            ActionStatus::builder(|n: u64| async move {
                sleep(Duration::from_millis(if n == 1 { 1_000 } else { 10 })).await;
                Ok::<_, Boom>(n)
            })
            .delay_timeout(Duration::from_millis(50)),
        );

        let _first = tracker.action(1);
        sleep(Duration::from_millis(30)).await;
        tracker.action(2).await.unwrap();
        sleep(Duration::from_millis(2_000)).await;

        assert_eq!(
            rec.statuses(),
            vec![Status::Idle, Status::Pending, Status::Pending, Status::Done]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn delayed_invocation_can_be_superseded() {
        let (tracker, rec) = recorded(
            ActionStatus::builder(|n: u64| async move {
                sleep(Duration::from_millis(if n == 1 { 1_000 } else { 100 })).await;
                Ok::<_, Boom>(n)
            })
            .delay_timeout(Duration::from_millis(50)),
        );

        let first = tracker.action(1);
        sleep(Duration::from_millis(60)).await;
        assert_eq!(tracker.status(), Status::Delayed);

        let second = tracker.action(2);
        assert_eq!(tracker.status(), Status::Pending);
        assert!(matches!(first.await, Err(ActionError::Superseded)));

        assert_eq!(second.await.unwrap(), 2);
        // 1 settles at 1s; nothing may change after that
        sleep(Duration::from_millis(2_000)).await;

        assert_eq!(tracker.status(), Status::Done);
        assert_eq!(
            rec.statuses(),
            vec![
                Status::Idle,
                Status::Pending,
                Status::Delayed,
                Status::Pending,
                Status::Delayed,
                Status::Done,
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn settlement_is_handed_out_once() {
        let (tracker, _rec) = recorded(ActionStatus::builder(|n: u64| simulated(10 * n, false)));

        let mut first = tracker.action(1);
        let _second = tracker.action(2);

        assert!(matches!(first.try_result(), Some(Err(ActionError::Superseded))));
        assert!(matches!(first.try_result(), Some(Err(ActionError::Unmounted))));
        assert!(matches!(first.await, Err(ActionError::Unmounted)));
    }

    #[tokio::test(start_paused = true)]
    async fn awaiting_after_settlement_does_not_panic() {
        let (tracker, _rec) = recorded(ActionStatus::builder(|(): ()| simulated(10, false)));

        let mut pending = tracker.action(());
        assert!(pending.try_result().is_none());
        assert_eq!((&mut pending).await.unwrap(), "ok");

        assert!(matches!(pending.try_result(), Some(Err(ActionError::Unmounted))));
        assert!(matches!(pending.await, Err(ActionError::Unmounted)));
    }

    #[tokio::test(start_paused = true)]
    async fn error_is_cleared_when_next_call_starts() {
        let (tracker, _rec) = recorded(ActionStatus::builder(|fail: bool| simulated(10, fail)));

        assert!(tracker.action(true).await.is_err());
        assert!(tracker.error().is_some());

        let pending = tracker.action(false);
        assert!(tracker.error().is_none());
        assert_eq!(tracker.status(), Status::Pending);

        pending.await.unwrap();
        assert!(tracker.error().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn idle_is_never_reentered() {
        let (tracker, rec) = recorded(ActionStatus::builder(|(): ()| simulated(10, false)));

        tracker.action(()).await.unwrap();
        tracker.action(()).await.unwrap();

        assert_eq!(rec.statuses().iter().filter(|s| **s == Status::Idle).count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn dispose_rejects_in_flight_invocation() {
        let finished = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&finished);
        let (tracker, rec) = recorded(
            ActionStatus::builder(move |(): ()| {
                let flag = Arc::clone(&flag);
                async move {
                    sleep(Duration::from_millis(100)).await;
                    flag.store(true, Ordering::SeqCst);
                    Ok::<_, Boom>("late")
                }
            })
            .delay_timeout(Duration::from_millis(50)),
        );
        let rx = tracker.subscribe();

        let pending = tracker.action(());
        tracker.dispose();

        assert!(matches!(pending.await, Err(ActionError::Unmounted)));

        sleep(Duration::from_millis(500)).await;
        // the operation itself was not aborted
        assert!(finished.load(Ordering::SeqCst));
        // but neither its result nor the timer changed anything
        assert_eq!(rec.statuses(), vec![Status::Idle, Status::Pending]);
        assert_eq!(rx.borrow().status, Status::Pending);
    }

    #[tokio::test(start_paused = true)]
    async fn dispose_when_idle_is_quiet() {
        let (tracker, rec) = recorded(ActionStatus::builder(|(): ()| simulated(10, false)));
        drop(tracker);
        assert!(rec.transitions().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn panicking_operation_still_settles() {
        let (tracker, _rec) = recorded(
            ActionStatus::builder(|(): ()| async move {
                sleep(Duration::from_millis(10)).await;
                if true {
                    panic!("kaboom");
                }
                Ok::<(), Boom>(())
            })
            .delay_timeout(Duration::from_millis(50)),
        );

        let err = tracker.action(()).await.unwrap_err();

        assert!(matches!(&err, ActionError::Panicked(msg) if msg == "kaboom"));
        assert_eq!(tracker.status(), Status::Error);
        assert!(tracker.error().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn subscribers_see_changes() {
        let (tracker, _rec) = recorded(ActionStatus::builder(|(): ()| simulated(10, false)));
        let mut rx = tracker.subscribe();
        assert_eq!(rx.borrow_and_update().status, Status::Idle);

        let pending = tracker.action(());
        rx.changed().await.unwrap();
        assert_eq!(rx.borrow_and_update().status, Status::Pending);

        pending.await.unwrap();
        rx.changed().await.unwrap();
        assert_eq!(rx.borrow_and_update().status, Status::Done);
    }

    #[tokio::test(start_paused = true)]
    async fn view_reports_error_text() {
        let (tracker, _rec) = recorded(ActionStatus::builder(|(): ()| simulated(10, true)));

        let _ = tracker.action(()).await;
        let view = tracker.view();

        assert_eq!(view.status, Status::Error);
        assert!(view.is_error);
        assert_eq!(view.error.as_deref(), Some("boom"));
        assert!(view.invocation.is_some());
    }

    struct Echo;

    #[async_trait]
    impl ActionHandler<String> for Echo {
        type Output = String;
        type Error = Boom;

        async fn handle(&self, s: String) -> Result<String, Boom> {
            sleep(Duration::from_millis(5)).await;
            Ok(s.to_uppercase())
        }
    }

    #[tokio::test(start_paused = true)]
    async fn handler_operation_can_be_tracked() {
        let tracker = ActionStatus::builder(HandlerOperation::new(Echo))
            .build()
            .unwrap();

        assert_eq!(tracker.action("hi".to_string()).await.unwrap(), "HI");
        assert!(tracker.is_success());
    }
}
