//! Resolution of the active logical user.
//!
//! A signed-in account always wins. Without a session the user is identified
//! by a random device id that is generated once and kept in the local cache.

use std::fmt;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::domain::session::SessionProvider;
use crate::storage::local::{read_json, write_json};
use crate::storage::{CacheKey, LocalCache};

/// The user on whose behalf data is read and written
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserIdentity {
    /// Server-issued account id of a signed-in user
    Account(String),
    /// Locally generated id of an anonymous device
    Device(String),
}

impl UserIdentity {
    pub fn as_str(&self) -> &str {
        match self {
            UserIdentity::Account(id) | UserIdentity::Device(id) => id,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, UserIdentity::Account(_))
    }
}

impl fmt::Display for UserIdentity {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone)]
pub struct IdentityResolver {
    session: Arc<dyn SessionProvider>,
    cache: Arc<dyn LocalCache>,
    /// Serializes device id generation across clones
    generation_lock: Arc<Mutex<()>>,
}

impl IdentityResolver {
    pub fn new(session: Arc<dyn SessionProvider>, cache: Arc<dyn LocalCache>) -> Self {
        Self {
            session,
            cache,
            generation_lock: Arc::new(Mutex::new(())),
        }
    }

    /// Resolve the active user; never fails
    pub async fn resolve_user_id(&self) -> UserIdentity {
        match self.session.current_account().await {
            Ok(Some(account_id)) => return UserIdentity::Account(account_id),
            Ok(None) => {}
            Err(e) => warn!("Session lookup failed, treating as signed out: {}", e),
        }

        UserIdentity::Device(self.device_id().await)
    }

    /// The device id already stored on this device, without generating one
    pub fn stored_device_id(&self) -> Option<String> {
        match read_json::<String>(self.cache.as_ref(), CacheKey::DeviceId) {
            Ok(id) => id.filter(|id| !id.is_empty()),
            Err(e) => {
                warn!("Failed to read device id: {}", e);
                None
            }
        }
    }

    async fn device_id(&self) -> String {
        if let Some(id) = self.stored_device_id() {
            return id;
        }

        let _guard = self.generation_lock.lock().await;
        // Another request may have generated one while we waited
        if let Some(id) = self.stored_device_id() {
            return id;
        }

        let id = uuid::Uuid::new_v4().to_string();
        match write_json(self.cache.as_ref(), CacheKey::DeviceId, &id) {
            Ok(()) => info!("Generated new device id {}", id),
            Err(e) => warn!("Generated device id {} but could not persist it: {}", id, e),
        }
        id
    }
}
