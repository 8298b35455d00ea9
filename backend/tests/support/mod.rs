//! Shared helpers for integration tests.

use std::sync::{Mutex, MutexGuard};

/// Tests in one binary run on parallel threads but share the process
/// environment.
static ENV_LOCK: Mutex<()> = Mutex::new(());

/// Exclusive, self-restoring access to process environment variables.
///
/// ```ignore
/// let _env = TestEnv::lock().set("REPOSITORY_TYPE", "local").unset("DATABASE_URL");
/// ```
///
/// Every touched variable gets its previous value back when the guard drops,
/// including on panic.
pub struct TestEnv {
    previous: Vec<(String, Option<String>)>,
    _lock: MutexGuard<'static, ()>,
}

impl TestEnv {
    pub fn lock() -> Self {
        // A failed assertion in another test poisons the lock; the data is `()`.
        let lock = ENV_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        Self {
            previous: Vec::new(),
            _lock: lock,
        }
    }

    pub fn set(mut self, key: &str, value: &str) -> Self {
        self.remember(key);
        std::env::set_var(key, value);
        self
    }

    pub fn unset(mut self, key: &str) -> Self {
        self.remember(key);
        std::env::remove_var(key);
        self
    }

    fn remember(&mut self, key: &str) {
        self.previous.push((key.to_string(), std::env::var(key).ok()));
    }
}

impl Drop for TestEnv {
    fn drop(&mut self) {
        // Reverse order so a key touched twice ends at its original value.
        while let Some((key, value)) = self.previous.pop() {
            match value {
                Some(value) => std::env::set_var(&key, value),
                None => std::env::remove_var(&key),
            }
        }
    }
}
