use super::{ResponseHandler, ResponseSource};
use crate::error::Result;
use log::debug;

/// Receives responses until the server closes its side, passing each one to
/// `handler`. Returns the number of responses delivered.
///
/// The first receive error ends the loop; nothing further is drained.
/// Results are passed through untouched, including empty entries.
pub async fn collect<S, H>(source: &mut S, handler: &mut H) -> Result<usize>
where
    S: ResponseSource + ?Sized,
    H: ResponseHandler + ?Sized,
{
    let mut received = 0;
    while let Some(response) = source.recv().await? {
        received += 1;
        debug!(
            "Received response {} with {} results",
            received,
            response.results.len()
        );
        handler.handle(response);
    }

    debug!("Server closed the stream after {} responses", received);
    Ok(received)
}
