//! The transport loop: line-at-a-time protocol service over standard I/O.
//!
//! The loop reads one line from the input stream, dispatches it through the
//! runtime, and writes exactly one response line, flushed immediately,
//! before reading the next line. This gives strict FIFO correspondence
//! between input and output lines, so identifier matching is a safety net
//! rather than a pairing requirement.

use std::io::{self, BufRead, BufReader, Write};

use tracing::debug;

use mason_plugin_protocol::{Request, Response, RpcError, decode_line, encode_line};

use crate::error::ServeError;
use crate::runtime::Plugin;

/// Tracing target for transport operations.
const TRANSPORT_TARGET: &str = "mason_plugin_sdk::transport";

/// Identifier echoed when the request line could not be parsed.
///
/// The malformed line's intended identifier cannot be recovered, so the
/// protocol fixes it at zero.
const UNPARSEABLE_REQUEST_ID: i64 = 0;

/// Serves requests from `reader`, writing one response line per non-blank
/// input line to `writer`, until end-of-stream.
///
/// Blank lines are skipped with no response. Malformed lines are answered
/// with a `-32700` parse error carrying identifier `0`; the loop then
/// continues with the next line, so one bad line never takes the plugin
/// down.
///
/// # Errors
///
/// Returns a [`ServeError`] only when the streams themselves fail (read,
/// serialise, write, or flush). Protocol errors are answered in-band.
pub fn serve(
    plugin: &Plugin,
    reader: &mut impl BufRead,
    writer: &mut impl Write,
) -> Result<(), ServeError> {
    let mut line = String::new();
    loop {
        line.clear();
        let bytes_read = reader
            .read_line(&mut line)
            .map_err(|source| ServeError::Read { source })?;
        if bytes_read == 0 {
            debug!(target: TRANSPORT_TARGET, "end of input stream, shutting down");
            return Ok(());
        }

        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        let response = match decode_line::<Request>(trimmed) {
            Ok(request) => plugin.handle_request(&request),
            Err(error) => {
                debug!(
                    target: TRANSPORT_TARGET,
                    %error,
                    "request line was not parseable"
                );
                Response::failure(UNPARSEABLE_REQUEST_ID, RpcError::parse_error(error))
            }
        };

        write_response(writer, &response)?;
    }
}

/// Serves requests over locked stdin/stdout until end-of-stream.
///
/// # Errors
///
/// Returns a [`ServeError`] when standard I/O fails; see [`serve`].
pub fn run(plugin: &Plugin) -> Result<(), ServeError> {
    let stdin = io::stdin();
    let mut reader = BufReader::new(stdin.lock());
    let stdout = io::stdout();
    let mut writer = stdout.lock();
    serve(plugin, &mut reader, &mut writer)
}

/// Writes one response as a JSONL line and flushes immediately.
fn write_response(writer: &mut impl Write, response: &Response) -> Result<(), ServeError> {
    let payload = encode_line(response).map_err(|source| ServeError::Serialise { source })?;
    writer
        .write_all(payload.as_bytes())
        .map_err(|source| ServeError::Write { source })?;
    writer
        .write_all(b"\n")
        .map_err(|source| ServeError::Write { source })?;
    writer
        .flush()
        .map_err(|source| ServeError::Write { source })
}
