//! Authenticated session tracking.
//!
//! Authentication itself happens with an external provider; the frontend
//! reports the resulting account id and the backend keeps it as the active
//! session for identity resolution.

use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Source of the currently authenticated account, if any
#[async_trait]
pub trait SessionProvider: Send + Sync {
    async fn current_account(&self) -> Result<Option<String>>;
}

/// In-process session shared by all request handlers
#[derive(Clone, Default)]
pub struct SessionState {
    account: Arc<RwLock<Option<String>>>,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `account_id` as signed in
    ///
    /// Returns `true` when this is a sign-in transition and `false` when the
    /// same account already held the session.
    pub async fn sign_in(&self, account_id: &str) -> bool {
        let mut account = self.account.write().await;
        if account.as_deref() == Some(account_id) {
            return false;
        }
        *account = Some(account_id.to_string());
        true
    }

    /// Clear the session, returning the account that was signed in
    pub async fn sign_out(&self) -> Option<String> {
        self.account.write().await.take()
    }
}

#[async_trait]
impl SessionProvider for SessionState {
    async fn current_account(&self) -> Result<Option<String>> {
        Ok(self.account.read().await.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_sign_in_transitions() {
        let session = SessionState::new();
        assert_eq!(session.current_account().await.unwrap(), None);

        assert!(session.sign_in("account-1").await);
        assert!(!session.sign_in("account-1").await);
        assert!(session.sign_in("account-2").await);
        assert_eq!(session.current_account().await.unwrap().as_deref(), Some("account-2"));

        assert_eq!(session.sign_out().await.as_deref(), Some("account-2"));
        assert_eq!(session.current_account().await.unwrap(), None);
        assert_eq!(session.sign_out().await, None);
    }
}
