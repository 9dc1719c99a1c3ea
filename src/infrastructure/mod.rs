pub mod waiter;

pub use waiter::{RetryPolicy, TokioWaiter, Waiter};
