use thiserror::Error;

/// Boxed error type handlers may fail with.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Error taxonomy shared by the client and server.
///
/// The transport and parse variants are transparent so that callers see the
/// underlying error unmodified: a rejected call carries the socket error as
/// is, and a 500 body produced from a decode failure carries the JSON
/// parser's own message.
#[derive(Error, Debug)]
pub enum RpcError {
    /// Socket-level failure (connect, read, write) on either side.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// HTTP-level failure reported by hyper.
    #[error(transparent)]
    Http(#[from] hyper::Error),

    /// Malformed JSON in a request or response body.
    #[error(transparent)]
    Protocol(#[from] serde_json::Error),

    /// The decoded method name is not in the handler registry.
    #[error("unknown method {0}")]
    UnknownMethod(String),

    /// A method name was registered twice. Raised at setup time, never
    /// while serving.
    #[error("handler {0} already registered")]
    DuplicateHandler(String),

    /// A handler failed; the message becomes the reply's `error` field.
    #[error("{0}")]
    Handler(String),

    /// A request could not be assembled from the configured values.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// TLS material could not be loaded or the TLS setup is inconsistent.
    #[error("tls error: {0}")]
    Tls(String),
}

pub type Result<T> = std::result::Result<T, RpcError>;
