//! Event logging for the deobfuscation pipeline.
//!
//! Every pass records what it did (and what it skipped) into an
//! [`EventLog`]; summary statistics are derived from the log rather than
//! tracked separately. The core is strictly single-threaded, so the log is
//! a plain vector with `&mut` recording.
//!
//! # Example
//!
//! ```rust
//! use trimscope::deobfuscation::{EventKind, EventLog};
//!
//! let mut log = EventLog::new();
//! log.record(EventKind::StringDecrypted)
//!     .subject("System.Void Game.Boot::Init()")
//!     .message("decrypted: \"https://cdn.example\"");
//! assert_eq!(log.count_kind(EventKind::StringDecrypted), 1);
//! ```

use std::fmt;

/// Categories of events the passes can log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// A method was identified as a string-decryption helper.
    DecryptorIdentified,
    /// A decryption call site was folded into a literal string.
    StringDecrypted,
    /// A dead method's body was blanked.
    BodyInvalidated,
    /// A type's method list was partitioned live-first.
    MethodsReordered,
    /// A dead method received a synthetic name.
    MethodRenamed,
    /// A dead type received a synthetic name.
    TypeRenamed,
    /// Informational message.
    Info,
    /// Something unexpected but recoverable (skipped call site,
    /// unresolvable reference).
    Warning,
}

impl EventKind {
    /// Human-readable description of this event kind.
    #[must_use]
    pub fn description(&self) -> &'static str {
        match self {
            Self::DecryptorIdentified => "decryptor identified",
            Self::StringDecrypted => "string decrypted",
            Self::BodyInvalidated => "body invalidated",
            Self::MethodsReordered => "methods reordered",
            Self::MethodRenamed => "method renamed",
            Self::TypeRenamed => "type renamed",
            Self::Info => "info",
            Self::Warning => "warning",
        }
    }

    /// True if this event represents a change to the assembly.
    #[must_use]
    pub fn is_transformation(&self) -> bool {
        matches!(
            self,
            Self::StringDecrypted
                | Self::BodyInvalidated
                | Self::MethodsReordered
                | Self::MethodRenamed
                | Self::TypeRenamed
        )
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

/// A single logged event.
#[derive(Debug, Clone)]
pub struct Event {
    /// The kind of event.
    pub kind: EventKind,
    /// Full name of the method or type involved, if applicable.
    pub subject: Option<String>,
    /// Human-readable description.
    pub message: String,
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.subject {
            Some(subject) => write!(f, "[{}] {}: {}", self.kind, subject, self.message),
            None => write!(f, "[{}] {}", self.kind, self.message),
        }
    }
}

/// Fluent builder returned by [`EventLog::record`].
///
/// The event is appended to the log when the builder drops.
pub struct EventBuilder<'a> {
    log: &'a mut EventLog,
    kind: EventKind,
    subject: Option<String>,
    message: Option<String>,
}

impl EventBuilder<'_> {
    /// Sets the method or type full name the event concerns.
    pub fn subject(mut self, full_name: impl Into<String>) -> Self {
        self.subject = Some(full_name.into());
        self
    }

    /// Sets a custom message describing the event.
    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

impl Drop for EventBuilder<'_> {
    fn drop(&mut self) {
        let message = self
            .message
            .take()
            .unwrap_or_else(|| self.kind.description().to_string());
        self.log.events.push(Event {
            kind: self.kind,
            subject: self.subject.take(),
            message,
        });
    }
}

/// Collection of events from one pipeline run.
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    events: Vec<Event>,
}

impl EventLog {
    /// Creates an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// True if nothing has been logged.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Total number of events.
    #[must_use]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Starts building an event of the given kind; it is appended when the
    /// builder drops.
    pub fn record(&mut self, kind: EventKind) -> EventBuilder<'_> {
        EventBuilder {
            log: self,
            kind,
            subject: None,
            message: None,
        }
    }

    /// Records an informational message.
    pub fn info(&mut self, message: impl Into<String>) {
        self.record(EventKind::Info).message(message);
    }

    /// Records a warning.
    pub fn warn(&mut self, message: impl Into<String>) {
        self.record(EventKind::Warning).message(message);
    }

    /// Iterates all events in recording order.
    pub fn iter(&self) -> impl Iterator<Item = &Event> {
        self.events.iter()
    }

    /// Counts events of the given kind.
    #[must_use]
    pub fn count_kind(&self, kind: EventKind) -> usize {
        self.events.iter().filter(|e| e.kind == kind).count()
    }

    /// Iterates events of a specific kind.
    pub fn filter_kind(&self, kind: EventKind) -> impl Iterator<Item = &Event> + '_ {
        self.events.iter().filter(move |e| e.kind == kind)
    }

    /// Iterates warning events.
    pub fn warnings(&self) -> impl Iterator<Item = &Event> + '_ {
        self.filter_kind(EventKind::Warning)
    }
}

impl<'a> IntoIterator for &'a EventLog {
    type Item = &'a Event;
    type IntoIter = std::slice::Iter<'a, Event>;

    fn into_iter(self) -> Self::IntoIter {
        self.events.iter()
    }
}
