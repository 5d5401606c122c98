//! Line-oriented console host: one JSON command per input line, one JSON reply per
//! output line.

/// CSV serializer for history exports.
pub mod csv;
/// Command dispatch and session gating.
pub mod handler;

use std::io;

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, info};

use crate::{
    console::handler::ConsoleHandler,
    dto::console::{ConsoleReply, Notice},
    state::SharedState,
};

/// Serve a single console session until `input` reaches end of file.
pub async fn run<R, W>(state: SharedState, input: R, mut output: W) -> io::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut handler = ConsoleHandler::new(state);
    info!(session_id = %handler.session().id(), "console session started");

    let greeting: ConsoleReply =
        Notice::info("log in as admin or enter visitor mode to continue").into();
    write_reply(&mut output, &greeting).await?;

    let mut lines = input.lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let reply = handler.handle_line(line).await;
        write_reply(&mut output, &reply).await?;
    }

    debug!(session_id = %handler.session().id(), "console input closed");
    Ok(())
}

async fn write_reply<W>(output: &mut W, reply: &ConsoleReply) -> io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    let mut payload = serde_json::to_vec(reply).map_err(io::Error::other)?;
    payload.push(b'\n');
    output.write_all(&payload).await?;
    output.flush().await
}
