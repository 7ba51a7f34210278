//! Cold, single-shot asynchronous stream.
//!
//! # Design
//! `Single` wraps a boxed future that resolves to `Result<T, E>`. Nothing runs
//! until the first poll; the stream yields that one result and then ends.
//! It is also a `Future`, so callers who only want the value can `.await` it.
//! Both sides are fused: `is_terminated` reports when the one result has
//! been taken, so `select!` loops skip a finished `Single`.
//! Dropping a `Single` drops the underlying future, which abandons waiting
//! for the remote call.

use std::convert::Infallible;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use futures::future::{BoxFuture, FusedFuture};
use futures::stream::{FusedStream, Stream};

use crate::error::RemoteError;

/// A stream that emits exactly one `Result<T, E>` and then completes.
#[must_use = "a Single does nothing unless polled"]
pub struct Single<T, E = RemoteError> {
    inner: Option<BoxFuture<'static, Result<T, E>>>,
}

impl<T, E> Single<T, E> {
    pub fn new<F>(future: F) -> Self
    where
        F: Future<Output = Result<T, E>> + Send + 'static,
    {
        Self {
            inner: Some(Box::pin(future)),
        }
    }

    /// Transform the success value once it arrives.
    pub fn map<U, F>(self, f: F) -> Single<U, E>
    where
        F: FnOnce(T) -> U + Send + 'static,
        T: Send + 'static,
        U: Send + 'static,
        E: Send + 'static,
    {
        Single {
            inner: self.inner.map(|fut| -> BoxFuture<'static, Result<U, E>> {
                Box::pin(async move { fut.await.map(f) })
            }),
        }
    }

    /// Turn the error into a success value. The resulting `Single` can carry
    /// any error type since it never fails.
    pub fn recover<E2, F>(self, f: F) -> Single<T, E2>
    where
        F: FnOnce(E) -> T + Send + 'static,
        T: Send + 'static,
        E: Send + 'static,
    {
        Single {
            inner: self.inner.map(|fut| -> BoxFuture<'static, Result<T, E2>> {
                Box::pin(async move { Ok(fut.await.unwrap_or_else(f)) })
            }),
        }
    }
}

impl<T: Send + 'static, E: Send + 'static> Single<T, E> {
    /// Already resolved with `value`.
    pub fn ok(value: T) -> Self {
        Self::new(futures::future::ready(Ok(value)))
    }

    /// Already failed with `error`.
    pub fn err(error: E) -> Self {
        Self::new(futures::future::ready(Err(error)))
    }
}

impl<T> Single<T, Infallible> {
    /// Unwrap the never-failing result.
    pub async fn value(self) -> T {
        match self.await {
            Ok(value) => value,
            Err(never) => match never {},
        }
    }
}

impl<T, E> Stream for Single<T, E> {
    type Item = Result<T, E>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let Some(fut) = self.inner.as_mut() else {
            return Poll::Ready(None);
        };
        match fut.as_mut().poll(cx) {
            Poll::Ready(out) => {
                self.inner = None;
                Poll::Ready(Some(out))
            }
            Poll::Pending => Poll::Pending,
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.inner.is_some() {
            (1, Some(1))
        } else {
            (0, Some(0))
        }
    }
}

impl<T, E> FusedStream for Single<T, E> {
    fn is_terminated(&self) -> bool {
        self.inner.is_none()
    }
}

impl<T, E> Future for Single<T, E> {
    type Output = Result<T, E>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        match self.as_mut().poll_next(cx) {
            Poll::Ready(Some(out)) => Poll::Ready(out),
            Poll::Ready(None) => panic!("Single polled after completion"),
            Poll::Pending => Poll::Pending,
        }
    }
}

impl<T, E> FusedFuture for Single<T, E> {
    fn is_terminated(&self) -> bool {
        self.inner.is_none()
    }
}

impl<T, E> fmt::Debug for Single<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Single")
            .field("terminated", &self.inner.is_none())
            .finish()
    }
}
