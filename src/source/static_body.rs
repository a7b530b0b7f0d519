use async_trait::async_trait;

use super::RequestSource;

/// Repeats one body forever; the dispatcher's request cap bounds it.
#[derive(Debug, Clone)]
pub struct StaticBody {
    body: String,
}

impl StaticBody {
    #[must_use]
    pub const fn new(body: String) -> Self {
        Self { body }
    }
}

#[async_trait]
impl RequestSource for StaticBody {
    async fn next_body(&mut self) -> Option<String> {
        Some(self.body.clone())
    }
}
