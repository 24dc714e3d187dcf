//! Async boundary between the drawing pipeline and its consumer.
//!
//! The pipeline itself is synchronous. [`render_async`] runs it on the
//! blocking pool and hands the outcome back over a oneshot channel, so the
//! consumer sees exactly one signal per render: the finished buffer or
//! the error, never both and never a partial buffer.

use std::time::Duration;

use tokio::sync::oneshot;

use crate::composer::DocumentComposer;
use crate::error::RenderError;
use crate::record::BillingRecord;

/// Render `record` off the async executor.
///
/// Resolves only once the document has been sealed (or has failed).
/// If the render thread dies without reporting, the result is
/// [`RenderError::Aborted`].
pub async fn render_async(
    composer: DocumentComposer,
    record: BillingRecord,
) -> Result<Vec<u8>, RenderError> {
    let (done, signal) = oneshot::channel();
    tokio::task::spawn_blocking(move || {
        let outcome = composer.render(&record);
        // `send` consumes the sender: the signal can only fire once.
        if done.send(outcome).is_err() {
            log::debug!(
                "render of {} finished after its consumer stopped waiting; output dropped",
                composer.invoice_number(&record)
            );
        }
    });
    signal.await.map_err(|_| RenderError::Aborted)?
}

/// [`render_async`] with a caller-imposed deadline.
///
/// When the deadline passes first the render's output is discarded and
/// [`RenderError::DeadlineExceeded`] is returned; a late buffer is never
/// delivered.
pub async fn render_with_deadline(
    composer: DocumentComposer,
    record: BillingRecord,
    deadline: Duration,
) -> Result<Vec<u8>, RenderError> {
    match tokio::time::timeout(deadline, render_async(composer, record)).await {
        Ok(outcome) => outcome,
        Err(_) => {
            log::warn!("render exceeded its {:?} deadline; output discarded", deadline);
            Err(RenderError::DeadlineExceeded(deadline))
        }
    }
}
