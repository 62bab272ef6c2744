//! Diagnostic output for lifecycle objects.
//!
//! Each lifecycle object carries its own [`Logger`], built from the
//! [`Logging`] option it was created with. By default messages go to
//! `tracing`, inside a span that names the entry point and project.

use std::fmt;
use std::sync::Arc;
use tracing::Span;

/// Receiver for diagnostics when the host wants to route them itself.
pub trait LogSink: Send + Sync {
    fn debug(&self, message: &str);
    fn info(&self, message: &str);
    fn warn(&self, message: &str);
    fn error(&self, message: &str);
}

/// Where lifecycle diagnostics go.
#[derive(Clone, Default)]
pub enum Logging {
    /// Drop everything.
    Off,
    /// Emit `tracing` events.
    #[default]
    Tracing,
    /// Forward formatted messages to a host-provided sink.
    Custom(Arc<dyn LogSink>),
}

impl fmt::Debug for Logging {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Off => f.write_str("Off"),
            Self::Tracing => f.write_str("Tracing"),
            Self::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

impl From<bool> for Logging {
    fn from(enabled: bool) -> Self {
        if enabled { Self::Tracing } else { Self::Off }
    }
}

#[derive(Debug, Clone, Copy)]
enum Level {
    Debug,
    Info,
    Warn,
    Error,
}

/// Logger bound to one lifecycle object.
#[derive(Debug, Clone)]
pub struct Logger {
    logging: Logging,
    span: Span,
}

impl Logger {
    pub fn new(logging: Logging, span: Span) -> Self {
        Self { logging, span }
    }

    /// A logger that drops every message.
    #[must_use]
    pub fn silent() -> Self {
        Self::new(Logging::Off, Span::none())
    }

    pub fn debug(&self, args: fmt::Arguments<'_>) {
        self.emit(Level::Debug, args);
    }

    pub fn info(&self, args: fmt::Arguments<'_>) {
        self.emit(Level::Info, args);
    }

    pub fn warn(&self, args: fmt::Arguments<'_>) {
        self.emit(Level::Warn, args);
    }

    pub fn error(&self, args: fmt::Arguments<'_>) {
        self.emit(Level::Error, args);
    }

    fn emit(&self, level: Level, args: fmt::Arguments<'_>) {
        match &self.logging {
            Logging::Off => {}
            Logging::Tracing => self.span.in_scope(|| match level {
                Level::Debug => tracing::debug!("{args}"),
                Level::Info => tracing::info!("{args}"),
                Level::Warn => tracing::warn!("{args}"),
                Level::Error => tracing::error!("{args}"),
            }),
            Logging::Custom(sink) => {
                let message = args.to_string();
                match level {
                    Level::Debug => sink.debug(&message),
                    Level::Info => sink.info(&message),
                    Level::Warn => sink.warn(&message),
                    Level::Error => sink.error(&message),
                }
            }
        }
    }
}
