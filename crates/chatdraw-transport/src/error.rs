/// Errors that can occur in the transport layer.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// Opening the connection failed (DNS, TCP, TLS or WebSocket upgrade).
    #[error("dial {url} failed: {source}")]
    DialFailed {
        url: String,
        #[source]
        source: std::io::Error,
    },

    /// Sending data failed.
    #[error("send failed: {0}")]
    SendFailed(#[source] std::io::Error),

    /// Receiving data failed.
    #[error("receive failed: {0}")]
    ReceiveFailed(#[source] std::io::Error),

    /// The connection was already closed.
    #[error("connection closed: {0}")]
    ConnectionClosed(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dial_failed_display_names_url() {
        let err = TransportError::DialFailed {
            url: "wss://relay.example:443".into(),
            source: std::io::Error::new(
                std::io::ErrorKind::ConnectionRefused,
                "refused",
            ),
        };
        let text = err.to_string();
        assert!(text.contains("wss://relay.example:443"));
        assert!(text.contains("refused"));
    }
}
