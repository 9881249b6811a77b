//! RAII guards for process-global state in tests.
//!
//! Tests that mutate environment variables must guarantee restoration even if
//! the test panics. The guard snapshots the variable in `new()` and restores
//! it in `Drop`.
//!
//! Tests using these guards should still be marked `#[serial]` since the
//! environment is process-global and cannot be isolated between concurrent
//! tests.

use std::env;
use std::ffi::OsString;

/// RAII guard that restores an environment variable on drop.
///
/// # Example
///
/// ```ignore
/// #[test]
/// #[serial]
/// fn test_something() {
///     let _guard = unsafe { EnvGuard::set("WATCHLIST_ACCESS_TOKEN", "token") };
///     // restored when _guard goes out of scope
/// }
/// ```
pub struct EnvGuard {
    key: String,
    original: Option<OsString>,
}

impl EnvGuard {
    /// Create a new guard that snapshots the current value of `key`.
    pub fn new(key: &str) -> Self {
        let original = env::var_os(key);
        Self {
            key: key.to_string(),
            original,
        }
    }

    /// Snapshot `key` and immediately set it to `value`.
    ///
    /// # Safety
    /// Calls `std::env::set_var`, which is unsafe in Rust 2024 edition due to
    /// potential data races. Tests using this should be marked `#[serial]`.
    pub unsafe fn set(key: &str, value: impl AsRef<std::ffi::OsStr>) -> Self {
        let guard = Self::new(key);
        unsafe { env::set_var(key, value) };
        guard
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        // SAFETY: runs during test teardown; callers are #[serial].
        match &self.original {
            Some(val) => unsafe { env::set_var(&self.key, val) },
            None => unsafe { env::remove_var(&self.key) },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_env_guard_restores_existing_var() {
        let key = "WATCHLIST_TEST_GUARD_EXISTING";
        unsafe { env::set_var(key, "original") };
        {
            let _guard = unsafe { EnvGuard::set(key, "changed") };
            assert_eq!(env::var(key).unwrap(), "changed");
        }
        assert_eq!(env::var(key).unwrap(), "original");
        unsafe { env::remove_var(key) };
    }

    #[test]
    #[serial]
    fn test_env_guard_removes_var_that_was_absent() {
        let key = "WATCHLIST_TEST_GUARD_ABSENT";
        unsafe { env::remove_var(key) };
        {
            let _guard = unsafe { EnvGuard::set(key, "temporary") };
            assert!(env::var(key).is_ok());
        }
        assert!(env::var(key).is_err());
    }
}
