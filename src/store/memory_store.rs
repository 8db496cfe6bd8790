use std::{collections::HashMap, fmt, marker::PhantomData};

use parking_lot::Mutex;
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;
use tracing::trace;
use zeroize::Zeroizing;

use super::{check_len, CredentialStore, StoreError};

/// An in-memory [`CredentialStore`].
///
/// Passwords are never kept: each entry holds `D(password ++ secret)`, where `secret` is fixed
/// for the lifetime of the store. Every operation holds one lock for its whole duration, so
/// set, delete and validate calls from any number of connections are applied in a single
/// total order.
///
/// Nothing is persisted; the users are gone when the store is dropped.
pub struct MemoryStore<D = Sha256> {
    users: Mutex<HashMap<Vec<u8>, Vec<u8>>>,
    secret: Zeroizing<Vec<u8>>,
    _digest: PhantomData<fn() -> D>,
}

impl MemoryStore<Sha256> {
    /// Creates an empty store that hashes with SHA-256.
    pub fn new(secret: impl Into<Vec<u8>>) -> Self {
        Self::with_digest(secret)
    }
}

impl<D> MemoryStore<D>
where
    D: Digest,
{
    /// Creates an empty store that hashes with `D`, e.g. `MemoryStore::<Sha512>::with_digest(..)`.
    pub fn with_digest(secret: impl Into<Vec<u8>>) -> Self {
        MemoryStore {
            users: Mutex::new(HashMap::new()),
            secret: Zeroizing::new(secret.into()),
            _digest: PhantomData,
        }
    }

    pub fn len(&self) -> usize {
        self.users.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.lock().is_empty()
    }

    pub fn contains(&self, username: &[u8]) -> bool {
        self.users.lock().contains_key(username)
    }

    fn hash(&self, password: &[u8]) -> Vec<u8> {
        digest::<D>(password, &self.secret)
    }
}

fn digest<D: Digest>(password: &[u8], secret: &[u8]) -> Vec<u8> {
    D::new()
        .chain_update(password)
        .chain_update(secret)
        .finalize()
        .to_vec()
}

impl<D> CredentialStore for MemoryStore<D>
where
    D: Digest,
{
    fn set(&self, username: &[u8], password: &[u8]) -> Result<(), StoreError> {
        check_len("username", username)?;
        check_len("password", password)?;

        let mut users = self.users.lock();
        users.insert(username.to_vec(), self.hash(password));
        trace!(username = %String::from_utf8_lossy(username), "Stored user");
        Ok(())
    }

    fn delete(&self, username: &[u8]) -> Result<(), StoreError> {
        let mut users = self.users.lock();
        match users.remove(username) {
            Some(_) => Ok(()),
            None => Err(StoreError::UserNotExist {
                username: username.to_vec(),
            }),
        }
    }

    fn validate(&self, username: &[u8], password: &[u8]) -> Result<(), StoreError> {
        let users = self.users.lock();
        let Some(stored) = users.get(username) else {
            return Err(StoreError::UserNotExist {
                username: username.to_vec(),
            });
        };

        if bool::from(self.hash(password).ct_eq(stored)) {
            Ok(())
        } else {
            Err(StoreError::BadPassword {
                username: username.to_vec(),
            })
        }
    }
}

impl<D> fmt::Debug for MemoryStore<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryStore")
            .field("users", &self.users.lock().len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::{sync::Arc, thread};

    use sha2::Sha512;

    use super::*;

    #[test]
    fn validates_the_most_recent_password() {
        let store = MemoryStore::new("secret");
        store.set(b"alice", b"first").unwrap();
        store.set(b"alice", b"second").unwrap();

        assert_eq!(store.validate(b"alice", b"second"), Ok(()));
        assert_eq!(
            store.validate(b"alice", b"first"),
            Err(StoreError::BadPassword {
                username: b"alice".to_vec()
            })
        );
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn set_is_idempotent() {
        let store = MemoryStore::new("secret");
        store.set(b"alice", b"pw").unwrap();
        let before = store.users.lock().clone();
        store.set(b"alice", b"pw").unwrap();

        assert_eq!(*store.users.lock(), before);
    }

    #[test]
    fn stores_digest_not_password() {
        let store = MemoryStore::new("secret");
        store.set(b"alice", b"password").unwrap();

        let users = store.users.lock();
        let stored = &users[b"alice".as_slice()];
        assert_eq!(stored.len(), 32);
        assert_ne!(stored.as_slice(), b"password");
        assert_eq!(*stored, digest::<Sha256>(b"password", b"secret"));
    }

    #[test]
    fn secret_changes_the_digest() {
        let first = MemoryStore::new("one");
        let second = MemoryStore::new("two");
        first.set(b"alice", b"pw").unwrap();
        second.set(b"alice", b"pw").unwrap();

        let first = first.users.lock()[b"alice".as_slice()].clone();
        let second = second.users.lock()[b"alice".as_slice()].clone();
        assert_ne!(first, second);
    }

    #[test]
    fn unknown_user() {
        let store = MemoryStore::new("secret");
        let missing = Err(StoreError::UserNotExist {
            username: b"bob".to_vec(),
        });

        assert_eq!(store.validate(b"bob", b"x"), missing);
        assert_eq!(store.delete(b"bob"), missing);
    }

    #[test]
    fn delete_leaves_no_residue() {
        let store = MemoryStore::new("secret");
        store.set(b"alice", b"pw").unwrap();
        store.delete(b"alice").unwrap();

        assert!(!store.contains(b"alice"));
        assert!(store.is_empty());
        assert!(matches!(
            store.validate(b"alice", b"pw"),
            Err(StoreError::UserNotExist { .. })
        ));
        assert!(matches!(
            store.delete(b"alice"),
            Err(StoreError::UserNotExist { .. })
        ));
    }

    #[test]
    fn rejects_unsendable_credentials() {
        let store = MemoryStore::new("secret");

        assert!(matches!(
            store.set(b"", b"pw"),
            Err(StoreError::InvalidLength { field: "username", len: 0 })
        ));
        assert!(matches!(
            store.set(b"alice", &[0; 256]),
            Err(StoreError::InvalidLength { field: "password", len: 256 })
        ));
        assert!(store.is_empty());
    }

    #[test]
    fn other_digests() {
        let store = MemoryStore::<Sha512>::with_digest(b"secret".to_vec());
        store.set(b"alice", b"pw").unwrap();

        assert_eq!(store.users.lock()[b"alice".as_slice()].len(), 64);
        assert_eq!(store.validate(b"alice", b"pw"), Ok(()));
        assert!(store.validate(b"alice", b"pW").is_err());
    }

    #[test]
    fn concurrent_sets_are_not_lost() {
        const USERS: usize = 64;
        let store = Arc::new(MemoryStore::new("secret"));

        thread::scope(|scope| {
            for i in 0..USERS {
                let store = &store;
                scope.spawn(move || {
                    store
                        .set(format!("user{i}").as_bytes(), format!("pw{i}").as_bytes())
                        .unwrap();
                });
            }
        });
        assert_eq!(store.len(), USERS);

        thread::scope(|scope| {
            for i in 0..USERS {
                let store = &store;
                scope.spawn(move || {
                    assert_eq!(
                        store.validate(format!("user{i}").as_bytes(), format!("pw{i}").as_bytes()),
                        Ok(())
                    );
                });
            }
        });
    }
}
