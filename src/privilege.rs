//! Privilege guard run before any hardening or rollback action.

use crate::error::{HardenError, Result};

/// Effective user ID of the current process.
#[cfg(unix)]
pub fn effective_uid() -> u32 {
    unsafe { libc::geteuid() }
}

/// Check whether `euid` is allowed to modify the host.
pub fn check(euid: u32) -> Result<()> {
    if euid == 0 {
        Ok(())
    } else {
        Err(HardenError::NotRoot { euid })
    }
}

/// Fail unless the process runs with administrative privileges.
#[cfg(unix)]
pub fn require_root() -> Result<()> {
    check(effective_uid())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_passes() {
        assert!(check(0).is_ok());
    }

    #[test]
    fn test_unprivileged_user_rejected() {
        match check(1000) {
            Err(HardenError::NotRoot { euid }) => assert_eq!(euid, 1000),
            other => panic!("expected NotRoot, got {:?}", other),
        }
    }

    #[test]
    fn test_require_root_matches_effective_uid() {
        let expected_ok = effective_uid() == 0;
        assert_eq!(require_root().is_ok(), expected_ok);
    }
}
