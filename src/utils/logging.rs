//! Logging setup
//!
//! Installs the tracing subscriber and hands back a `LogControl` that owns
//! the verbosity switch. Components never read a global verbose flag; the
//! REPL holds the control and flips it on request.

use tracing_subscriber::{fmt, layer::SubscriberExt, reload, util::SubscriberInitExt, EnvFilter, Registry};

use crate::utils::error::{AppError, AppResult};

const QUIET_DIRECTIVE: &str = "warn";
const VERBOSE_DIRECTIVE: &str = "info";

/// Filter directive for the given verbosity
pub fn filter_directive(verbose: bool) -> &'static str {
    if verbose {
        VERBOSE_DIRECTIVE
    } else {
        QUIET_DIRECTIVE
    }
}

/// Runtime handle for log verbosity
pub struct LogControl {
    handle: reload::Handle<EnvFilter, Registry>,
    verbose: bool,
}

impl LogControl {
    /// Install the global subscriber. `RUST_LOG`, when set, decides the
    /// initial filter; otherwise `verbose` does.
    pub fn init(verbose: bool) -> AppResult<Self> {
        let initial = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(filter_directive(verbose)));
        let (filter, handle) = reload::Layer::new(initial);

        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
            .try_init()
            .map_err(|e| AppError::internal(format!("failed to install logger: {}", e)))?;

        Ok(Self { handle, verbose })
    }

    pub fn is_verbose(&self) -> bool {
        self.verbose
    }

    pub fn set_verbose(&mut self, verbose: bool) -> AppResult<()> {
        self.handle
            .reload(EnvFilter::new(filter_directive(verbose)))
            .map_err(|e| AppError::internal(format!("failed to change log level: {}", e)))?;
        self.verbose = verbose;
        Ok(())
    }

    /// Flip verbosity and return the new setting
    pub fn toggle(&mut self) -> AppResult<bool> {
        let next = !self.verbose;
        self.set_verbose(next)?;
        Ok(next)
    }
}
