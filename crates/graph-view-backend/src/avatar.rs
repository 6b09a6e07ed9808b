//! Avatar resolver contract

use async_trait::async_trait;

#[async_trait]
pub trait AvatarResolver: Send + Sync {
    /// Cached avatar for `email` as a data URI, if one has been fetched before
    async fn get_avatar_image(&self, email: &str) -> Option<String>;

    /// Start fetching the avatar for `email` in the background
    ///
    /// Returns immediately. The resolved image is delivered later through the
    /// controller's avatar relay.
    fn fetch_avatar_image(&self, email: &str, repo: &str, remote: Option<&str>, commits: &[String]);
}
