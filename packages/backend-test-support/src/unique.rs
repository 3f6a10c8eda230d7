use std::sync::atomic::{AtomicU64, Ordering};

static COUNTER: AtomicU64 = AtomicU64::new(1);

/// `prefix` plus a process-unique suffix, e.g. `user_17`.
///
/// Only ASCII letters, digits and `_` are produced so the result passes the
/// user-name rules as long as `prefix` does.
pub fn unique_name(prefix: &str) -> String {
    format!("{prefix}_{}", COUNTER.fetch_add(1, Ordering::Relaxed))
}
