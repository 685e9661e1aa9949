//! Find an existing per-user data directory anywhere on the machine, or
//! provision, hide, lock down, and seed a new one.

pub mod config;
pub mod engine;
pub mod error;
pub mod finder;
pub mod platform;
pub mod provision;
pub mod seed;

pub use config::EngineConfig;
pub use engine::{Provisioned, RunReport, run};
pub use error::EngineError;
pub use platform::{PlatformOps, detect};

#[cfg(test)]
mod testutil {
    use std::path::PathBuf;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::{SystemTime, UNIX_EPOCH};

    static COUNTER: AtomicUsize = AtomicUsize::new(0);

    /// Fresh, not yet created, scratch path under the system temp dir.
    pub fn unique_temp_dir() -> PathBuf {
        let ts = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        let seq = COUNTER.fetch_add(1, Ordering::SeqCst);
        std::env::temp_dir().join(format!("devdata-test-{}-{ts}-{seq}", std::process::id()))
    }
}
