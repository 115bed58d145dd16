use serde::{Deserialize, Serialize};

/// `/api/info` accepts up to 100 fullnames per request.
pub const MAX_API_INFO_AMOUNT: usize = 100;

/// `/api/morechildren` accepts up to 20 ids per request.
pub const MAX_API_MORECHILDREN_AMOUNT: usize = 20;

pub const DEFAULT_BASE_URL: &str = "https://oauth.reddit.com";

/// Batch sizing and scheduling for stub expansion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpandConfig {
    /// Ids per flat lookup request.
    #[serde(default = "default_info_limit")]
    pub info_batch_limit: usize,

    /// Ids per tree expansion request.
    #[serde(default = "default_morechildren_limit")]
    pub morechildren_batch_limit: usize,

    /// Expand stubs echoed back by the server concurrently instead of one after another.
    #[serde(default)]
    pub parallel_branches: bool,
}

fn default_info_limit() -> usize {
    MAX_API_INFO_AMOUNT
}

fn default_morechildren_limit() -> usize {
    MAX_API_MORECHILDREN_AMOUNT
}

impl ExpandConfig {
    pub fn new() -> Self {
        Self {
            info_batch_limit: MAX_API_INFO_AMOUNT,
            morechildren_batch_limit: MAX_API_MORECHILDREN_AMOUNT,
            parallel_branches: false,
        }
    }

    /// Limits are clamped to at least 1 so a batch is never empty.
    pub fn with_info_batch_limit(mut self, limit: usize) -> Self {
        self.info_batch_limit = limit.max(1);
        self
    }

    pub fn with_morechildren_batch_limit(mut self, limit: usize) -> Self {
        self.morechildren_batch_limit = limit.max(1);
        self
    }

    pub fn with_parallel_branches(mut self, parallel: bool) -> Self {
        self.parallel_branches = parallel;
        self
    }
}

impl Default for ExpandConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Connection settings for [`crate::api::RedditClient`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    pub base_url: String,
    pub user_agent: String,
    /// OAuth bearer token. Requests go out unauthenticated when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
}

impl ClientConfig {
    pub fn new(user_agent: impl Into<String>) -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.into(),
            user_agent: user_agent.into(),
            access_token: None,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_access_token(mut self, token: impl Into<String>) -> Self {
        self.access_token = Some(token.into());
        self
    }

    /// Joins `path` onto the base url without doubling the slash.
    pub fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}
