//! Call-counting and call-history wrappers.
//!
//! Each wrapper takes the store handle, the operation's identity string, and
//! the operation itself as an async closure, and yields the operation's own
//! result. The two compose by nesting; the facade wires them recorder
//! outermost, counter innermost, so every journaled call is also counted.
//!
//! Both wrappers are best-effort: a store failure while counting or
//! recording is logged and swallowed, and the wrapped operation still runs.

use crate::backend::KvBackend;
use crate::error::Result;
use crate::key;
use std::future::Future;

/// How a wrapped operation's result appears in its output history.
pub trait CallOutput {
    fn record_repr(&self) -> Vec<u8>;
}

impl CallOutput for String {
    fn record_repr(&self) -> Vec<u8> {
        self.as_bytes().to_vec()
    }
}

impl CallOutput for &str {
    fn record_repr(&self) -> Vec<u8> {
        self.as_bytes().to_vec()
    }
}

impl CallOutput for Vec<u8> {
    fn record_repr(&self) -> Vec<u8> {
        self.clone()
    }
}

impl CallOutput for i64 {
    fn record_repr(&self) -> Vec<u8> {
        self.to_string().into_bytes()
    }
}

/// Run `op`, incrementing the call counter at `identity` first.
///
/// The increment happens exactly once per invocation, before the wrapped
/// operation executes, whether or not the operation then succeeds.
pub async fn counted<B, F, Fut, T>(backend: &B, identity: &str, op: F) -> Result<T>
where
    B: KvBackend,
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    if let Err(e) = backend.incr(identity).await {
        warn!("call count skipped for {}: {}", identity, e);
    }
    op().await
}

/// Run `op`, journaling its input before and its output after execution.
///
/// The input lands in `<identity>:inputs` strictly before the operation
/// runs; the output lands in `<identity>:outputs` strictly after it
/// succeeds. A failing operation propagates its error with the input
/// already recorded and no matching output, so the two lists can differ in
/// length by at most the in-flight call.
pub async fn recorded<B, F, Fut, T>(backend: &B, identity: &str, input: &str, op: F) -> Result<T>
where
    B: KvBackend,
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<T>>,
    T: CallOutput,
{
    let inputs = key::inputs_key(identity);
    if let Err(e) = backend.rpush(&inputs, input.as_bytes().to_vec()).await {
        warn!("input history skipped for {}: {}", identity, e);
    }

    let output = op().await?;

    let outputs = key::outputs_key(identity);
    if let Err(e) = backend.rpush(&outputs, output.record_repr()).await {
        warn!("output history skipped for {}: {}", identity, e);
    }
    Ok(output)
}
