//! Body providers for the dispatcher.
mod lines;
mod static_body;


use async_trait::async_trait;

pub use lines::LineReader;
pub use static_body::StaticBody;

/// A lazy sequence of request bodies. `None` means the input is exhausted.
#[async_trait]
pub trait RequestSource: Send {
    async fn next_body(&mut self) -> Option<String>;
}
