pub mod envelope;
pub mod error;
pub mod reply;

pub use envelope::Envelope;
pub use error::{BoxError, Result, RpcError};
pub use reply::{HeaderValue, Headers, Reply};
