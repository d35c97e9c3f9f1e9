//! Domain model (ids, status, errors).

pub mod errors;
pub mod ids;
pub mod state;

pub use self::errors::{ActionError, BuildError, CANCEL_PENDING, UNMOUNT};
pub use self::ids::{InvocationId, Invocation};
pub use self::state::{Snapshot, Status, StatusView, Transition};
