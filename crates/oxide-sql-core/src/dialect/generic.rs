//! Generic SQL dialect.

use super::Dialect;

/// A generic SQL dialect using ANSI SQL standards.
///
/// Used by the default grammar implementations and in tests; it supports
/// none of the optional capabilities.
#[derive(Debug, Default, Clone, Copy)]
pub struct GenericDialect;

impl GenericDialect {
    /// Creates a new generic dialect.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Dialect for GenericDialect {
    fn name(&self) -> &'static str {
        "generic"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialect::LockSupport;
    use crate::query::{LockStrength, LockWait};

    #[test]
    fn generic_capabilities() {
        let dialect = GenericDialect::new();
        assert_eq!(dialect.name(), "generic");
        assert_eq!(dialect.placeholder(3), "?");
        assert!(!dialect.supports_returning());
        assert!(!dialect.supports_upsert());
        assert_eq!(
            dialect.lock_support(LockStrength::Share),
            LockSupport::Native
        );
        assert!(!dialect.supports_lock_wait(LockWait::SkipLocked));
    }

    #[test]
    fn quoting() {
        let dialect = GenericDialect::new();
        assert_eq!(dialect.quote_identifier("users"), "\"users\"");
        assert_eq!(dialect.quote_identifier("u.id"), "\"u\".\"id\"");
        assert_eq!(dialect.quote_identifier("u.*"), "\"u\".*");
        assert_eq!(dialect.quote_identifier("we\"ird"), "\"we\"\"ird\"");
    }
}
