//! Shared chat-completion call path: deadline-bounded attempts under the
//! retry policy.

use std::future::Future;

use deckhand::{
    with_retry, ChatCompletion, ChatCompletionProvider, ChatRequest, RetryPolicy, UpstreamError,
};
use tokio::time::Instant;

/// Call `llm` with retries, converting each successful response with `parse`.
///
/// A `parse` failure counts as a failed attempt and is retried like any
/// other retryable error.
pub async fn complete_with_retry<T, P>(
    llm: &dyn ChatCompletionProvider,
    request: &ChatRequest,
    retry: &RetryPolicy,
    deadline: Option<Instant>,
    parse: P,
) -> Result<T, UpstreamError>
where
    P: Fn(ChatCompletion) -> Result<T, UpstreamError>,
{
    let parse = &parse;
    with_retry(retry, deadline, move || async move {
        let completion = within_deadline(deadline, llm.complete(request)).await?;
        parse(completion)
    })
    .await
}

/// Bound one attempt by the caller's deadline; elapsing is a timeout
async fn within_deadline<T>(
    deadline: Option<Instant>,
    fut: impl Future<Output = Result<T, UpstreamError>>,
) -> Result<T, UpstreamError> {
    match deadline {
        Some(deadline) => tokio::time::timeout_at(deadline, fut)
            .await
            .unwrap_or(Err(UpstreamError::Timeout)),
        None => fut.await,
    }
}
