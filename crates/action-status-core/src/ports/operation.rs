//! Operation port - tracker が包む非同期処理
//!
//! # 二層構造
//! - **Operation<A>**: tracker が直接使う trait。クロージャには blanket impl がある
//! - **ActionHandler<A>**: `#[async_trait]` で書ける struct 向けの trait。
//!   `HandlerOperation` で `Operation<A>` に変換する（type erasure）

use std::future::Future;
use std::marker::PhantomData;
use std::pin::Pin;
use std::sync::Arc;

use async_trait::async_trait;

/// The asynchronous operation wrapped by an `ActionStatus`.
///
/// `call` must not block; the returned future is spawned on the tracker's
/// runtime and runs to completion even if the invocation is superseded.
pub trait Operation<A>: Send + Sync + 'static {
    type Output: Send + 'static;
    type Error: Send + Sync + 'static;
    type Future: Future<Output = Result<Self::Output, Self::Error>> + Send + 'static;

    fn call(&self, args: A) -> Self::Future;
}

impl<A, F, Fut, T, E> Operation<A> for F
where
    F: Fn(A) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<T, E>> + Send + 'static,
    T: Send + 'static,
    E: Send + Sync + 'static,
{
    type Output = T;
    type Error = E;
    type Future = Fut;

    fn call(&self, args: A) -> Fut {
        self(args)
    }
}

/// Handler-style operation for types that carry their own dependencies.
///
/// # 使用例
/// ```ignore
/// struct Search { client: Client }
///
/// #[async_trait]
/// impl ActionHandler<String> for Search {
///     type Output = Vec<Hit>;
///     type Error = SearchError;
///
///     async fn handle(&self, query: String) -> Result<Vec<Hit>, SearchError> {
///         self.client.search(&query).await
///     }
/// }
///
/// let tracker = ActionStatus::builder(HandlerOperation::new(Search { client })).build()?;
/// ```
#[async_trait]
pub trait ActionHandler<A: Send + 'static>: Send + Sync + 'static {
    type Output: Send + 'static;
    type Error: Send + Sync + 'static;

    async fn handle(&self, args: A) -> Result<Self::Output, Self::Error>;
}

type BoxFuture<T> = Pin<Box<dyn Future<Output = T> + Send + 'static>>;

/// Adapts an [`ActionHandler`] into an [`Operation`].
pub struct HandlerOperation<A, H> {
    handler: Arc<H>,
    _marker: PhantomData<fn(A)>,
}

impl<A, H> HandlerOperation<A, H> {
    pub fn new(handler: H) -> Self {
        Self::from_arc(Arc::new(handler))
    }

    pub fn from_arc(handler: Arc<H>) -> Self {
        Self {
            handler,
            _marker: PhantomData,
        }
    }
}

impl<A, H> Operation<A> for HandlerOperation<A, H>
where
    A: Send + 'static,
    H: ActionHandler<A>,
{
    type Output = H::Output;
    type Error = H::Error;
    type Future = BoxFuture<Result<H::Output, H::Error>>;

    fn call(&self, args: A) -> Self::Future {
        let handler = Arc::clone(&self.handler);
        Box::pin(async move { handler.handle(args).await })
    }
}
