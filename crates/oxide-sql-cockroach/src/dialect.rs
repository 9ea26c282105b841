//! CockroachDB dialect.

use oxide_sql_core::dialect::{Dialect, LockSupport};
use oxide_sql_core::query::{LockStrength, LockWait};

/// CockroachDB dialect: PostgreSQL wire syntax with its own locking rules.
#[derive(Debug, Default, Clone, Copy)]
pub struct CockroachDialect;

impl CockroachDialect {
    /// Creates a new CockroachDB dialect.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Dialect for CockroachDialect {
    fn name(&self) -> &'static str {
        "cockroachdb"
    }

    fn placeholder(&self, index: usize) -> String {
        format!("${index}")
    }

    fn supports_returning(&self) -> bool {
        true
    }

    fn supports_upsert(&self) -> bool {
        true
    }

    fn supports_upsert_statement(&self) -> bool {
        true
    }

    fn supports_limited_mutations(&self) -> bool {
        true
    }

    fn supports_mutation_joins(&self) -> bool {
        true
    }

    // FOR NO KEY UPDATE and FOR KEY SHARE parse but behave like their
    // stronger siblings, so they are spelled that way.
    fn lock_support(&self, strength: LockStrength) -> LockSupport {
        match strength {
            LockStrength::Update | LockStrength::Share => LockSupport::Native,
            LockStrength::NoKeyUpdate => LockSupport::Substitute(LockStrength::Update),
            LockStrength::KeyShare => LockSupport::Substitute(LockStrength::Share),
        }
    }

    fn supports_lock_wait(&self, _wait: LockWait) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbered_placeholders() {
        let dialect = CockroachDialect::new();
        assert_eq!(dialect.placeholder(1), "$1");
        assert_eq!(dialect.placeholder(12), "$12");
    }

    #[test]
    fn lock_policy() {
        let dialect = CockroachDialect::new();
        assert_eq!(dialect.lock_support(LockStrength::Update), LockSupport::Native);
        assert_eq!(
            dialect.lock_support(LockStrength::NoKeyUpdate),
            LockSupport::Substitute(LockStrength::Update)
        );
        assert_eq!(
            dialect.lock_support(LockStrength::KeyShare),
            LockSupport::Substitute(LockStrength::Share)
        );
        assert!(dialect.supports_lock_wait(LockWait::SkipLocked));
    }

    #[test]
    fn capabilities() {
        let dialect = CockroachDialect::new();
        assert!(dialect.supports_returning());
        assert!(dialect.supports_upsert_statement());
        assert!(!dialect.supports_full_text());
        assert_eq!(dialect.quote_identifier("public.users"), r#""public"."users""#);
    }
}
