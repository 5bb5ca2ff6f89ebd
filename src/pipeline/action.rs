// ABOUTME: A single named pipeline step with an optional compensation.
// ABOUTME: Both operations are owned, run-once futures boxed for dynamic dispatch.

use futures::future::{BoxFuture, FutureExt};
use std::borrow::Cow;
use std::fmt;
use std::future::Future;

/// Future returned by a step operation.
pub type StepFuture<'a, E> = BoxFuture<'a, Result<(), E>>;

pub(crate) type Operation<'a, E> = Box<dyn FnOnce() -> StepFuture<'a, E> + Send + 'a>;

/// One unit of work in a [`Pipeline`](super::Pipeline).
///
/// The compensation attached to an action does not undo the action itself:
/// it undoes the net effect of the actions that ran *before* it. It must be
/// safe to invoke even when the remote state it targets has already been
/// restored by another compensation.
pub struct Action<'a, E> {
    pub(crate) name: Cow<'static, str>,
    pub(crate) forward: Operation<'a, E>,
    pub(crate) compensation: Option<Operation<'a, E>>,
}

impl<'a, E: 'a> Action<'a, E> {
    pub fn new<F, Fut>(name: impl Into<Cow<'static, str>>, forward: F) -> Self
    where
        F: FnOnce() -> Fut + Send + 'a,
        Fut: Future<Output = Result<(), E>> + Send + 'a,
    {
        Self {
            name: name.into(),
            forward: boxed(forward),
            compensation: None,
        }
    }

    /// Attach the operation that reverts what earlier actions did.
    pub fn compensates_prior<F, Fut>(mut self, compensation: F) -> Self
    where
        F: FnOnce() -> Fut + Send + 'a,
        Fut: Future<Output = Result<(), E>> + Send + 'a,
    {
        self.compensation = Some(boxed(compensation));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

fn boxed<'a, E, F, Fut>(operation: F) -> Operation<'a, E>
where
    E: 'a,
    F: FnOnce() -> Fut + Send + 'a,
    Fut: Future<Output = Result<(), E>> + Send + 'a,
{
    Box::new(move || operation().boxed())
}

impl<E> fmt::Debug for Action<'_, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Action")
            .field("name", &self.name)
            .field("has_compensation", &self.compensation.is_some())
            .finish()
    }
}
