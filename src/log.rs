//! Optional iteration trace, gated behind the `additional_log_info` feature
//!
//! Gathers a textual debugging trace behind a crate feature, built on
//! `chrono` and `whoami` for the timestamp and runner identification. The
//! steady-state hot path here must stay allocation-free, so when the
//! feature is disabled [`SolverLog`] compiles down to a zero-sized type
//! whose methods are no-ops; when it is enabled, it accumulates a
//! human-readable trace of solver-level events.
#[cfg(feature = "additional_log_info")]
mod enabled {
    use chrono::prelude::*;

    /// Accumulates a textual trace of solver-level events: extrapolation
    /// origin changes, homotopy bisection depth, cache hits and tree
    /// rebuilds.
    pub struct SolverLog {
        content: String,
    }

    impl SolverLog {
        pub fn new() -> Self {
            let mut content = String::new();
            content.push_str("Runner information\n");
            content.push_str("===================\n\n");
            content.push_str("OS: ");
            content.push_str(&whoami::distro());
            content.push('\n');
            content.push_str("Username: ");
            content.push_str(&whoami::username());
            content.push('\n');
            const VERSION: &str = env!("CARGO_PKG_VERSION");
            content.push_str("homotopy_rootfinder version: ");
            content.push_str(VERSION);
            content.push('\n');

            let utc: DateTime<Utc> = Utc::now();
            content.push_str("Session start (UTC): ");
            content.push_str(&utc.to_rfc2822());
            content.push_str("\n\n");

            SolverLog { content }
        }

        pub fn record(&mut self, message: &str) {
            self.content.push_str(message);
            self.content.push('\n');
        }

        pub fn as_str(&self) -> &str {
            &self.content
        }
    }

    impl Default for SolverLog {
        fn default() -> Self {
            Self::new()
        }
    }
}

#[cfg(not(feature = "additional_log_info"))]
mod disabled {
    /// No-op trace: compiled out entirely when `additional_log_info` is
    /// disabled so the hot path carries no logging cost.
    #[derive(Default)]
    pub struct SolverLog;

    impl SolverLog {
        pub fn new() -> Self {
            SolverLog
        }

        #[inline]
        pub fn record(&mut self, _message: &str) {}

        pub fn as_str(&self) -> &str {
            ""
        }
    }
}

#[cfg(feature = "additional_log_info")]
pub use enabled::SolverLog;

#[cfg(not(feature = "additional_log_info"))]
pub use disabled::SolverLog;
