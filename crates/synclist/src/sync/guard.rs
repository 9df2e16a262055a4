#![forbid(unsafe_code)]

//! Re-entrancy guard for sync passes.
//!
//! The synchronizer is a two-state machine, `Idle` and `Applying`. A pass may
//! only start from `Idle`; [`SyncGuard::try_enter`] returns `None` while
//! another pass is applying, and dropping the guard returns to `Idle` even
//! when the pass exits early with an error or unwinds.
//!
//! This is not a lock. It only stops a mutation made by the synchronizer
//! from feeding back into the synchronizer on the same thread.

use std::cell::Cell;

/// RAII token for the `Applying` state.
#[must_use = "dropping the guard immediately ends the sync pass"]
pub struct SyncGuard<'a> {
    flag: &'a Cell<bool>,
}

impl<'a> SyncGuard<'a> {
    /// Enter `Applying` if currently `Idle`.
    pub fn try_enter(flag: &'a Cell<bool>) -> Option<Self> {
        if flag.replace(true) {
            return None;
        }
        Some(Self { flag })
    }
}

impl Drop for SyncGuard<'_> {
    fn drop(&mut self) {
        self.flag.set(false);
    }
}

impl std::fmt::Debug for SyncGuard<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SyncGuard").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enter_then_release() {
        let flag = Cell::new(false);
        {
            let _guard = SyncGuard::try_enter(&flag).expect("idle");
            assert!(flag.get());
        }
        assert!(!flag.get());
    }

    #[test]
    fn nested_enter_is_refused() {
        let flag = Cell::new(false);
        let _outer = SyncGuard::try_enter(&flag).expect("idle");
        assert!(SyncGuard::try_enter(&flag).is_none());
        // The refused attempt must not clear the outer state.
        assert!(flag.get());
    }

    #[test]
    fn released_on_early_return() {
        fn pass(flag: &Cell<bool>) -> Result<(), ()> {
            let _guard = SyncGuard::try_enter(flag).ok_or(())?;
            Err(())
        }

        let flag = Cell::new(false);
        assert!(pass(&flag).is_err());
        assert!(!flag.get());
    }

    #[test]
    fn released_on_unwind() {
        let flag = Cell::new(false);
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _guard = SyncGuard::try_enter(&flag).expect("idle");
            panic!("factory failed");
        }));
        assert!(result.is_err());
        assert!(!flag.get());
    }
}
