use std::collections::HashMap;
use std::fmt;
use std::sync::{Mutex, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::{SystemTime, UNIX_EPOCH};

use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::debug;

use crate::errors::{SessionStoreError, StoreResult};
use crate::random::{generate_token, random_password, random_username, USERNAME_SPACE};
use crate::session::store::{SessionStore, ADMIN_PASSWORD, ADMIN_USERNAME};
use crate::types::UserListing;

/// Both tables live under one lock so a reader never sees them out of step.
#[derive(Default)]
struct Tables {
    /// username -> plaintext password
    users: HashMap<String, String>,
    /// token -> username
    tokens: HashMap<String, String>,
}

/// In-memory implementation of SessionStore
pub struct InMemorySessionStore {
    tables: RwLock<Tables>,
    rng: Mutex<StdRng>,
}

impl InMemorySessionStore {
    /// Create a store seeded with `admin` plus `seed_users` random users,
    /// drawing randomness from a generator seeded with the current time.
    pub fn new(seed_users: usize) -> StoreResult<Self> {
        let seed = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or_default();
        Self::with_rng(StdRng::seed_from_u64(seed), seed_users)
    }

    /// Create a store around an injected generator.
    pub fn with_rng(mut rng: StdRng, seed_users: usize) -> StoreResult<Self> {
        if seed_users > USERNAME_SPACE {
            return Err(SessionStoreError::InvalidInput(format!(
                "cannot seed {} users, only {} distinct names exist",
                seed_users, USERNAME_SPACE
            )));
        }

        let mut tables = Tables::default();
        tables
            .users
            .insert(ADMIN_USERNAME.to_string(), ADMIN_PASSWORD.to_string());

        let mut generated = 0;
        while generated < seed_users {
            let username = random_username(&mut rng);
            if tables.users.contains_key(&username) {
                continue;
            }
            let password = random_password(&mut rng);
            debug!(username = %username, "Seeded user");
            tables.users.insert(username, password);
            generated += 1;
        }

        Ok(Self {
            tables: RwLock::new(tables),
            rng: Mutex::new(rng),
        })
    }

    fn read(&self) -> StoreResult<RwLockReadGuard<'_, Tables>> {
        self.tables.read().map_err(|e| {
            SessionStoreError::Storage(format!("Failed to acquire read lock: {}", e))
        })
    }

    fn write(&self) -> StoreResult<RwLockWriteGuard<'_, Tables>> {
        self.tables.write().map_err(|e| {
            SessionStoreError::Storage(format!("Failed to acquire write lock: {}", e))
        })
    }

    fn next_token(&self) -> StoreResult<String> {
        let mut rng = self.rng.lock().map_err(|e| {
            SessionStoreError::Storage(format!("Failed to acquire generator lock: {}", e))
        })?;
        Ok(generate_token(&mut *rng))
    }
}

impl fmt::Debug for InMemorySessionStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = f.debug_struct("InMemorySessionStore");
        match self.tables.try_read() {
            Ok(tables) => out
                .field("users", &tables.users.len())
                .field("tokens", &tables.tokens.len()),
            Err(_) => out.field("tables", &"<locked>"),
        };
        out.finish()
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn register(&self, username: &str, password: &str) -> StoreResult<()> {
        if username.is_empty() || password.is_empty() {
            return Err(SessionStoreError::InvalidInput(
                "username and password are required".to_string(),
            ));
        }

        let mut tables = self.write()?;
        if tables.users.contains_key(username) {
            return Err(SessionStoreError::AlreadyExists(username.to_string()));
        }
        tables
            .users
            .insert(username.to_string(), password.to_string());

        debug!(username = %username, "Registered user");
        Ok(())
    }

    async fn login(&self, username: &str, password: &str) -> StoreResult<String> {
        {
            let tables = self.read()?;
            match tables.users.get(username) {
                Some(stored) if stored == password => {}
                _ => return Err(SessionStoreError::InvalidCredentials),
            }
        }

        // Issued in a second critical section; uniqueness rests on the 62^32 token space.
        let token = self.next_token()?;
        self.write()?
            .tokens
            .insert(token.clone(), username.to_string());

        debug!(username = %username, "Issued token");
        Ok(token)
    }

    async fn logout(&self, token: &str) -> StoreResult<String> {
        let username = self.authenticate(token).await?;

        if self.write()?.tokens.remove(token).is_none() {
            return Err(SessionStoreError::Unauthorized);
        }

        debug!(username = %username, "Revoked token");
        Ok(username)
    }

    async fn list_users(&self, token: &str) -> StoreResult<UserListing> {
        let me = self.authenticate(token).await?;

        let mut users: Vec<String> = self.read()?.users.keys().cloned().collect();
        users.sort();

        Ok(UserListing { users, me })
    }

    async fn authenticate(&self, token: &str) -> StoreResult<String> {
        self.read()?
            .tokens
            .get(token)
            .cloned()
            .ok_or(SessionStoreError::Unauthorized)
    }

    async fn user_count(&self) -> StoreResult<usize> {
        Ok(self.read()?.users.len())
    }

    async fn active_sessions(&self) -> StoreResult<usize> {
        Ok(self.read()?.tokens.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::TOKEN_LEN;
    use crate::session::DEFAULT_SEED_USERS as DEFAULT_SEED;
    use std::collections::HashSet;
    use std::sync::Arc;

    fn store() -> InMemorySessionStore {
        InMemorySessionStore::with_rng(StdRng::seed_from_u64(1), 0).unwrap()
    }

    #[tokio::test]
    async fn test_fresh_store_has_admin() {
        let store = store();
        assert_eq!(store.user_count().await.unwrap(), 1);

        let token = store.login("admin", "admin").await.unwrap();
        assert_eq!(token.len(), TOKEN_LEN);
    }

    #[tokio::test]
    async fn test_seeding_adds_distinct_users() {
        let store =
            InMemorySessionStore::with_rng(StdRng::seed_from_u64(99), DEFAULT_SEED).unwrap();
        assert_eq!(store.user_count().await.unwrap(), 1 + DEFAULT_SEED);

        let token = store.login("admin", "admin").await.unwrap();
        let listing = store.list_users(&token).await.unwrap();
        let distinct: HashSet<&String> = listing.users.iter().collect();

        assert_eq!(listing.users.len(), 1 + DEFAULT_SEED);
        assert_eq!(distinct.len(), listing.users.len());
        assert!(listing.users.iter().any(|u| u == "admin"));
    }

    #[tokio::test]
    async fn test_time_seeded_store_builds() {
        let store = InMemorySessionStore::new(DEFAULT_SEED).unwrap();
        assert_eq!(store.user_count().await.unwrap(), 1 + DEFAULT_SEED);
    }

    #[test]
    fn test_seeding_beyond_name_space_is_rejected() {
        let result = InMemorySessionStore::with_rng(StdRng::seed_from_u64(1), USERNAME_SPACE + 1);
        assert!(matches!(result, Err(SessionStoreError::InvalidInput(_))));
    }

    #[tokio::test]
    async fn test_register_once() {
        let store = store();
        store.register("alice", "pw1").await.unwrap();

        let again = store.register("alice", "other").await;
        assert_eq!(again, Err(SessionStoreError::AlreadyExists("alice".into())));

        // The original password still wins
        assert!(store.login("alice", "pw1").await.is_ok());
        assert_eq!(
            store.login("alice", "other").await,
            Err(SessionStoreError::InvalidCredentials)
        );
    }

    #[tokio::test]
    async fn test_register_rejects_empty_fields() {
        let store = store();
        assert!(matches!(
            store.register("", "pw").await,
            Err(SessionStoreError::InvalidInput(_))
        ));
        assert!(matches!(
            store.register("bob", "").await,
            Err(SessionStoreError::InvalidInput(_))
        ));
        assert_eq!(store.user_count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_login_failures() {
        let store = store();
        store.register("alice", "pw1").await.unwrap();

        assert_eq!(
            store.login("alice", "PW1").await,
            Err(SessionStoreError::InvalidCredentials)
        );
        assert_eq!(
            store.login("nobody", "pw1").await,
            Err(SessionStoreError::InvalidCredentials)
        );
        assert_eq!(
            store.login("", "").await,
            Err(SessionStoreError::InvalidCredentials)
        );
        assert_eq!(store.active_sessions().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_token_lifecycle() {
        let store = store();
        store.register("alice", "pw1").await.unwrap();

        let token = store.login("alice", "pw1").await.unwrap();
        assert_eq!(store.authenticate(&token).await.unwrap(), "alice");

        let listing = store.list_users(&token).await.unwrap();
        assert_eq!(listing.me, "alice");
        assert_eq!(listing.users, vec!["admin".to_string(), "alice".to_string()]);

        assert_eq!(store.logout(&token).await.unwrap(), "alice");

        assert_eq!(
            store.authenticate(&token).await,
            Err(SessionStoreError::Unauthorized)
        );
        assert_eq!(
            store.logout(&token).await,
            Err(SessionStoreError::Unauthorized)
        );
        assert_eq!(
            store.list_users(&token).await,
            Err(SessionStoreError::Unauthorized)
        );
    }

    #[tokio::test]
    async fn test_multiple_sessions_per_user() {
        let store = store();
        let first = store.login("admin", "admin").await.unwrap();
        let second = store.login("admin", "admin").await.unwrap();

        assert_ne!(first, second);
        assert_eq!(store.active_sessions().await.unwrap(), 2);

        store.logout(&first).await.unwrap();
        assert_eq!(store.authenticate(&second).await.unwrap(), "admin");
    }

    #[tokio::test]
    async fn test_unknown_tokens_are_unauthorized() {
        let store = store();
        assert_eq!(
            store.authenticate("").await,
            Err(SessionStoreError::Unauthorized)
        );
        assert_eq!(
            store.list_users("not-a-token").await,
            Err(SessionStoreError::Unauthorized)
        );
    }

    #[tokio::test]
    async fn test_debug_hides_secrets() {
        let store = store();
        let token = store.login("admin", "admin").await.unwrap();
        let rendered = format!("{:?}", store);

        assert!(rendered.contains("users: 1"));
        assert!(!rendered.contains(&token));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_distinct_registrations() {
        let store = Arc::new(store());

        let handles: Vec<_> = (0..64)
            .map(|i| {
                let store = Arc::clone(&store);
                tokio::spawn(async move { store.register(&format!("user-{}", i), "pw").await })
            })
            .collect();

        for handle in handles {
            handle.await.unwrap().unwrap();
        }
        assert_eq!(store.user_count().await.unwrap(), 65);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_same_registration() {
        let store = Arc::new(store());

        let handles: Vec<_> = (0..64)
            .map(|_| {
                let store = Arc::clone(&store);
                tokio::spawn(async move { store.register("carol", "pw").await })
            })
            .collect();

        let mut ok = 0;
        let mut exists = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(()) => ok += 1,
                Err(SessionStoreError::AlreadyExists(_)) => exists += 1,
                Err(e) => panic!("unexpected error: {}", e),
            }
        }

        assert_eq!(ok, 1);
        assert_eq!(exists, 63);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_logins_issue_distinct_tokens() {
        let store = Arc::new(store());

        let handles: Vec<_> = (0..32)
            .map(|_| {
                let store = Arc::clone(&store);
                tokio::spawn(async move { store.login("admin", "admin").await })
            })
            .collect();

        let mut tokens = HashSet::new();
        for handle in handles {
            tokens.insert(handle.await.unwrap().unwrap());
        }

        assert_eq!(tokens.len(), 32);
        assert_eq!(store.active_sessions().await.unwrap(), 32);
    }
}
