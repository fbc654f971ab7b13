//! Lock recovery for poisoned RwLocks.
//!
//! A resolver that panics never runs under a cache lock, and the critical
//! sections below cannot leave a table half-updated, so a poisoned lock
//! still guards consistent data.

use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

pub(crate) fn recover_read<'a, T>(lock: &'a RwLock<T>, context: &str) -> RwLockReadGuard<'a, T> {
    match lock.read() {
        Ok(guard) => guard,
        Err(poisoned) => {
            log::debug!("[typecache] {} poisoned, recovering", context);
            poisoned.into_inner()
        }
    }
}

pub(crate) fn recover_write<'a, T>(lock: &'a RwLock<T>, context: &str) -> RwLockWriteGuard<'a, T> {
    match lock.write() {
        Ok(guard) => guard,
        Err(poisoned) => {
            log::debug!("[typecache] {} poisoned, recovering", context);
            poisoned.into_inner()
        }
    }
}
