//! Incremental output for streamed answers

use futures::{Stream, StreamExt};
use std::io::Write;

/// Writes each fragment as it arrives and returns the full text.
///
/// Stops at the first error; fragments written before it stay on `out`.
pub async fn print_stream<S, E, W>(mut stream: S, out: &mut W) -> Result<String, E>
where
    S: Stream<Item = Result<String, E>> + Unpin,
    E: From<std::io::Error>,
    W: Write,
{
    let mut full = String::new();
    while let Some(fragment) = stream.next().await {
        let fragment = fragment?;
        out.write_all(fragment.as_bytes())?;
        out.flush()?;
        full.push_str(&fragment);
    }
    out.write_all(b"\n")?;
    out.flush()?;
    Ok(full)
}
