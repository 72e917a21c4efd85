//! Stdio transport for local MCP clients.
//!
//! Newline-delimited JSON-RPC over stdin/stdout.

use tokio::io::{self, AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};

use crate::protocol::{IncomingMessage, JsonRpcResponse};

/// Transport for reading/writing JSON-RPC messages.
pub struct StdioTransport {
    reader: Box<dyn AsyncBufRead + Send + Unpin>,
    writer: Box<dyn AsyncWrite + Send + Unpin>,
}

impl StdioTransport {
    /// Create a transport using stdin/stdout.
    pub fn stdio() -> Self {
        Self::new(Box::new(BufReader::new(io::stdin())), Box::new(io::stdout()))
    }

    pub fn new(
        reader: Box<dyn AsyncBufRead + Send + Unpin>,
        writer: Box<dyn AsyncWrite + Send + Unpin>,
    ) -> Self {
        Self { reader, writer }
    }

    /// Read the next message, skipping blank lines. `None` on EOF.
    pub async fn read_message(&mut self) -> io::Result<Option<IncomingMessage>> {
        let mut line = String::new();

        loop {
            line.clear();
            if self.reader.read_line(&mut line).await? == 0 {
                return Ok(None);
            }

            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }

            tracing::debug!("Received: {}", trimmed);

            return IncomingMessage::parse(trimmed).map(Some).map_err(|e| {
                tracing::warn!("Failed to parse message: {}", e);
                io::Error::new(
                    io::ErrorKind::InvalidData,
                    format!("Invalid JSON-RPC message: {}", e),
                )
            });
        }
    }

    /// Write a JSON-RPC response followed by a newline.
    pub async fn write_response(&mut self, response: &JsonRpcResponse) -> io::Result<()> {
        let mut json = serde_json::to_string(response).map_err(|e| {
            io::Error::new(io::ErrorKind::InvalidData, format!("Serialization error: {}", e))
        })?;
        json.push('\n');

        tracing::debug!("Sending: {}", json.trim_end());

        self.writer.write_all(json.as_bytes()).await?;
        self.writer.flush().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::RequestId;
    use std::pin::Pin;
    use std::sync::{Arc, Mutex};
    use std::task::{Context, Poll};

    fn reader(input: &str) -> Box<dyn AsyncBufRead + Send + Unpin> {
        Box::new(BufReader::new(std::io::Cursor::new(input.as_bytes().to_vec())))
    }

    /// Writer that keeps everything written to it.
    #[derive(Clone, Default)]
    struct SharedWriter(Arc<Mutex<Vec<u8>>>);

    impl AsyncWrite for SharedWriter {
        fn poll_write(
            self: Pin<&mut Self>,
            _cx: &mut Context<'_>,
            buf: &[u8],
        ) -> Poll<std::io::Result<usize>> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Poll::Ready(Ok(buf.len()))
        }

        fn poll_flush(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<std::io::Result<()>> {
            Poll::Ready(Ok(()))
        }

        fn poll_shutdown(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<std::io::Result<()>> {
            Poll::Ready(Ok(()))
        }
    }

    #[tokio::test]
    async fn test_read_request() {
        let input = "{\"jsonrpc\":\"2.0\",\"id\":1,\"method\":\"tools/list\"}\n";
        let mut transport = StdioTransport::new(reader(input), Box::new(SharedWriter::default()));

        match transport.read_message().await.unwrap() {
            Some(IncomingMessage::Request(req)) => {
                assert_eq!(req.method, "tools/list");
                assert_eq!(req.id, RequestId::Number(1));
            }
            _ => panic!("Expected request"),
        }
    }

    #[tokio::test]
    async fn test_read_notification_after_blank_lines() {
        let input = "\n\n{\"jsonrpc\":\"2.0\",\"method\":\"notifications/initialized\"}\n";
        let mut transport = StdioTransport::new(reader(input), Box::new(SharedWriter::default()));

        match transport.read_message().await.unwrap() {
            Some(IncomingMessage::Notification(notif)) => {
                assert_eq!(notif.method, "notifications/initialized");
            }
            _ => panic!("Expected notification"),
        }
        assert!(transport.read_message().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_read_invalid() {
        let mut transport =
            StdioTransport::new(reader("not json\n"), Box::new(SharedWriter::default()));

        let err = transport.read_message().await.unwrap_err();
        assert_eq!(err.kind(), std::io::ErrorKind::InvalidData);
    }

    #[tokio::test]
    async fn test_write_response() {
        let writer = SharedWriter::default();
        let mut transport = StdioTransport::new(reader(""), Box::new(writer.clone()));

        let response =
            JsonRpcResponse::success(RequestId::String("a".into()), serde_json::json!({}));
        transport.write_response(&response).await.unwrap();

        let output = String::from_utf8(writer.0.lock().unwrap().clone()).unwrap();
        assert_eq!(output, "{\"jsonrpc\":\"2.0\",\"result\":{},\"id\":\"a\"}\n");
    }
}
