//! Diagnostics: the non-fatal outcomes of a diagram edit.
//!
//! Every operation returns the diagnostics it produced instead of writing
//! them to a shared logger. Each diagnostic is also emitted as a `tracing`
//! event when it is recorded, so hosts with a subscriber see them in their
//! logs without collecting anything.

use std::sync::Arc;

use crate::error::SyncError;

// ============================================================================
// DIAGNOSTIC TYPES
// ============================================================================

/// Severity level of a diagnostic.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Severity {
    Error,
    Warning,
    Info,
    Hint,
}

/// A diagnostic message produced by an operation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Diagnostic {
    pub severity: Severity,
    /// Stable code (e.g., "W0001"), see [`codes`].
    pub code: Arc<str>,
    pub message: Arc<str>,
}

impl Diagnostic {
    fn new(severity: Severity, code: &str, message: impl Into<Arc<str>>) -> Self {
        Self {
            severity,
            code: code.into(),
            message: message.into(),
        }
    }

    /// Create an error diagnostic.
    pub fn error(code: &str, message: impl Into<Arc<str>>) -> Self {
        Self::new(Severity::Error, code, message)
    }

    /// Create a warning diagnostic.
    pub fn warning(code: &str, message: impl Into<Arc<str>>) -> Self {
        Self::new(Severity::Warning, code, message)
    }

    /// Create an informational diagnostic.
    pub fn info(code: &str, message: impl Into<Arc<str>>) -> Self {
        Self::new(Severity::Info, code, message)
    }

    /// Create a hint diagnostic.
    pub fn hint(code: &str, message: impl Into<Arc<str>>) -> Self {
        Self::new(Severity::Hint, code, message)
    }

    fn emit(&self) {
        let code: &str = &self.code;
        let message: &str = &self.message;
        match self.severity {
            Severity::Error => tracing::error!(code, "{message}"),
            Severity::Warning => tracing::warn!(code, "{message}"),
            Severity::Info => tracing::info!(code, "{message}"),
            Severity::Hint => tracing::debug!(code, "{message}"),
        }
    }
}

impl From<&SyncError> for Diagnostic {
    /// The error-level diagnostic a host shows for a failed operation.
    fn from(error: &SyncError) -> Self {
        let code = match error {
            SyncError::InvalidDrop(_) => codes::INVALID_DROP,
            SyncError::InvalidReconnection(_) => codes::INVALID_RECONNECTION,
            _ => codes::OPERATION_FAILED,
        };
        Self::error(code, error.to_string())
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

// ============================================================================
// DIAGNOSTIC CODES
// ============================================================================

/// Stable diagnostic codes.
///
/// ## Code Ranges
///
/// - **E0001-E0099**: operation failures carried by an error
/// - **W0001-W0099**: non-fatal failures (nothing was changed)
/// - **I0001-I0099**: informational notes
pub mod codes {
    // ========================================================================
    // ERRORS (E0001-E0099)
    // ========================================================================

    /// The drop was rejected.
    pub const INVALID_DROP: &str = "E0001";
    /// The reconnection was rejected.
    pub const INVALID_RECONNECTION: &str = "E0002";
    /// The operation referenced something that does not exist or is read-only.
    pub const OPERATION_FAILED: &str = "E0003";

    // ========================================================================
    // WARNINGS (W0001-W0099)
    // ========================================================================

    /// No mapping can represent the element at the requested place.
    pub const UNREPRESENTABLE_ELEMENT: &str = "W0001";
    /// The domain-based edge is already displayed.
    pub const ALREADY_REPRESENTED: &str = "W0002";
    /// An edge endpoint cannot be displayed.
    pub const UNRESOLVED_ENDPOINT: &str = "W0003";
    /// No edge tool accepts the pair of elements.
    pub const NO_CONNECTOR_TOOL: &str = "W0004";
    /// The element has no semantic source or target.
    pub const MISSING_ENDPOINT: &str = "W0005";
    /// The view for the element already exists.
    pub const DUPLICATE_VIEW: &str = "W0006";
    /// The tool is not offered on the selected view.
    pub const TOOL_NOT_APPLICABLE: &str = "W0007";

    // ========================================================================
    // INFORMATIONAL (I0001-I0099)
    // ========================================================================

    /// Several mappings ranked equally; the first declared was used.
    pub const AMBIGUOUS_MAPPING: &str = "I0001";
    /// The drop did not change anything.
    pub const NO_OP: &str = "I0002";
}

// ============================================================================
// DIAGNOSTIC COLLECTOR
// ============================================================================

/// Diagnostics collected during one operation.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Diagnostics {
    items: Vec<Diagnostic>,
}

impl Diagnostics {
    /// Create a new empty collector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a diagnostic and emit it as a tracing event.
    pub fn push(&mut self, diagnostic: Diagnostic) {
        diagnostic.emit();
        self.items.push(diagnostic);
    }

    /// Record a warning.
    pub fn warn(&mut self, code: &str, message: impl Into<Arc<str>>) {
        self.push(Diagnostic::warning(code, message));
    }

    /// Record an informational note.
    pub fn info(&mut self, code: &str, message: impl Into<Arc<str>>) {
        self.push(Diagnostic::info(code, message));
    }

    /// Move every diagnostic of `other` into `self` (without re-emitting).
    pub fn extend(&mut self, other: Diagnostics) {
        self.items.extend(other.items);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Returns true if any diagnostic is an error.
    pub fn has_errors(&self) -> bool {
        self.items.iter().any(|d| d.severity == Severity::Error)
    }

    /// Returns true if any diagnostic is a warning.
    pub fn has_warnings(&self) -> bool {
        self.items.iter().any(|d| d.severity == Severity::Warning)
    }

    /// Returns true if a diagnostic with `code` was recorded.
    pub fn contains_code(&self, code: &str) -> bool {
        self.items.iter().any(|d| &*d.code == code)
    }

    pub fn into_vec(self) -> Vec<Diagnostic> {
        self.items
    }
}

impl IntoIterator for Diagnostics {
    type Item = Diagnostic;
    type IntoIter = std::vec::IntoIter<Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

/// A value together with the diagnostics produced while computing it.
#[derive(Clone, Debug)]
pub struct Reported<T> {
    pub value: T,
    pub diagnostics: Diagnostics,
}

impl<T> Reported<T> {
    pub fn new(value: T, diagnostics: Diagnostics) -> Self {
        Self { value, diagnostics }
    }

    /// Split into value and diagnostics.
    pub fn into_parts(self) -> (T, Diagnostics) {
        (self.value, self.diagnostics)
    }
}
