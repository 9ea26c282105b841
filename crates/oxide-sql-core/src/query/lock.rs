//! Row-level lock requests attached to SELECT queries.

/// Row lock strength, strongest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LockStrength {
    /// `FOR UPDATE`.
    Update,
    /// `FOR NO KEY UPDATE`.
    NoKeyUpdate,
    /// `FOR SHARE`.
    Share,
    /// `FOR KEY SHARE`.
    KeyShare,
}

impl LockStrength {
    /// Returns the SQL clause for this strength.
    #[must_use]
    pub const fn as_sql(self) -> &'static str {
        match self {
            Self::Update => "FOR UPDATE",
            Self::NoKeyUpdate => "FOR NO KEY UPDATE",
            Self::Share => "FOR SHARE",
            Self::KeyShare => "FOR KEY SHARE",
        }
    }
}

/// What a locking read does when a row is already locked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LockWait {
    /// Block until the lock is released.
    #[default]
    Wait,
    /// Fail immediately.
    NoWait,
    /// Skip locked rows.
    SkipLocked,
}

impl LockWait {
    /// Returns the SQL modifier, if any.
    #[must_use]
    pub const fn as_sql(self) -> Option<&'static str> {
        match self {
            Self::Wait => None,
            Self::NoWait => Some("NOWAIT"),
            Self::SkipLocked => Some("SKIP LOCKED"),
        }
    }
}

/// A lock request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lock {
    /// A structured row lock.
    Row {
        /// Lock strength.
        strength: LockStrength,
        /// Wait policy.
        wait: LockWait,
    },
    /// A lock clause supplied verbatim by the caller.
    Raw(String),
}

impl Lock {
    /// `FOR UPDATE`.
    #[must_use]
    pub const fn for_update() -> Self {
        Self::Row {
            strength: LockStrength::Update,
            wait: LockWait::Wait,
        }
    }

    /// `FOR SHARE`.
    #[must_use]
    pub const fn shared() -> Self {
        Self::Row {
            strength: LockStrength::Share,
            wait: LockWait::Wait,
        }
    }

    /// A lock of the given strength.
    #[must_use]
    pub const fn with_strength(strength: LockStrength) -> Self {
        Self::Row {
            strength,
            wait: LockWait::Wait,
        }
    }

    /// Sets `NOWAIT`. No effect on raw locks.
    #[must_use]
    pub fn nowait(self) -> Self {
        self.with_wait(LockWait::NoWait)
    }

    /// Sets `SKIP LOCKED`. No effect on raw locks.
    #[must_use]
    pub fn skip_locked(self) -> Self {
        self.with_wait(LockWait::SkipLocked)
    }

    fn with_wait(self, wait: LockWait) -> Self {
        match self {
            Self::Row { strength, .. } => Self::Row { strength, wait },
            raw @ Self::Raw(_) => raw,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wait_policy_applies_to_row_locks_only() {
        assert_eq!(
            Lock::for_update().skip_locked(),
            Lock::Row {
                strength: LockStrength::Update,
                wait: LockWait::SkipLocked
            }
        );
        let raw = Lock::Raw(String::from("FOR UPDATE"));
        assert_eq!(raw.clone().nowait(), raw);
    }
}
