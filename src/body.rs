//! Bounded, rewindable request body capture.
//!
//! The capture reads a prefix of the body stream, decodes it best-effort
//! with the declared (or default) encoding, and always rewinds the stream so
//! the downstream handler sees the full, untouched body.

use std::io::SeekFrom;

use encoding_rs::Encoding;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncSeek, AsyncSeekExt};

use crate::truncate::truncate;

/// Slack on top of the character budget so a cut that lands mid-sequence
/// still yields at least `max_length` clean characters after decoding.
const CAPTURE_SLACK: usize = 256;

/// Widest bytes-per-character across the encodings a charset label can
/// resolve to; bounds the byte read for a given character budget.
const MAX_BYTES_PER_CHAR: usize = 4;

/// Read at most `max_length + 256` characters worth of body text from the
/// start of `reader`, truncate to `max_length`, and rewind.
///
/// The rewind runs on every exit path: a failed read still attempts to
/// restore the stream before the error propagates, so downstream consumers
/// never observe a partially consumed body. Byte sequences that are
/// malformed for `encoding` are replaced with U+FFFD rather than failing -
/// capture is best-effort.
pub async fn capture_body<R>(
    reader: &mut R,
    encoding: &'static Encoding,
    max_length: usize,
) -> std::io::Result<String>
where
    R: AsyncRead + AsyncSeek + Unpin,
{
    let char_budget = max_length.saturating_add(CAPTURE_SLACK);
    let byte_budget = char_budget.saturating_mul(MAX_BYTES_PER_CHAR);

    let mut buffer = vec![0u8; byte_budget];
    let read_result = fill_prefix(reader, &mut buffer).await;
    let rewind_result = reader.seek(SeekFrom::Start(0)).await;

    let filled = read_result?;
    rewind_result?;

    let (decoded, _) = encoding.decode_without_bom_handling(&buffer[..filled]);
    let window: String = decoded.chars().take(char_budget).collect();

    Ok(truncate(&window, max_length))
}

/// Read until the buffer is full or the stream ends.
async fn fill_prefix<R>(reader: &mut R, buffer: &mut [u8]) -> std::io::Result<usize>
where
    R: AsyncRead + Unpin,
{
    let mut filled = 0;
    while filled < buffer.len() {
        let n = reader.read(&mut buffer[filled..]).await?;
        if n == 0 {
            break;
        }
        filled += n;
    }
    Ok(filled)
}
