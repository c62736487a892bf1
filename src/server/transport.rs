//! Line-delimited stdio transport.

use serde_json::Value;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader, BufWriter};

use super::handler::Handler;
use super::protocol::{Response, RpcError};

/// Serve requests from stdin until it closes.
pub async fn serve_stdio(handler: Handler) -> std::io::Result<()> {
    let stdin = BufReader::new(tokio::io::stdin());
    let stdout = BufWriter::new(tokio::io::stdout());
    serve(handler, stdin, stdout).await
}

/// Serve requests from any line reader, writing one response per line.
///
/// Requests are handled in order. Only I/O failures on the streams end the
/// loop; every request-level failure is answered and the loop continues.
/// A line that is not UTF-8 is answered with a parse error.
pub async fn serve<R, W>(handler: Handler, mut reader: R, mut writer: W) -> std::io::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut buf = Vec::new();
    tracing::info!("cypher advisor listening on stdio");

    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf).await? == 0 {
            break;
        }

        let response = match std::str::from_utf8(&buf) {
            Ok(line) => handler.handle_line(line).await,
            Err(err) => {
                tracing::warn!(error = %err, "request line is not UTF-8");
                Some(Response::failure(Value::Null, &RpcError::Parse(err.to_string())))
            }
        };

        if let Some(response) = response {
            write_response(&mut writer, &response).await?;
        }
    }

    tracing::info!("input closed, shutting down");
    Ok(())
}

async fn write_response<W>(writer: &mut W, response: &Response) -> std::io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    let mut line = serde_json::to_string(response)?;
    line.push('\n');
    writer.write_all(line.as_bytes()).await?;
    writer.flush().await
}
