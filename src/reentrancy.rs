//! Tracks which `ChainTable` operation is walking the table.
//!
//! Each engine entry point opens an `OpScope` naming itself. The only user
//! code that can run inside one is a key's `Address`, an equality
//! predicate, or a value's drop glue; if any of those calls back into the
//! same table, debug builds panic with both operation names. Release
//! builds keep nothing but the `!Sync` marker.

use core::cell::Cell;
use core::fmt;
#[cfg(not(debug_assertions))]
use core::marker::PhantomData;

/// Engine operations that touch buckets or chains.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ChainOp {
    Find,
    Insert,
    Grow,
    Remove,
    Clear,
}

impl fmt::Display for ChainOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ChainOp::Find => "find",
            ChainOp::Insert => "insert",
            ChainOp::Grow => "grow",
            ChainOp::Remove => "remove",
            ChainOp::Clear => "clear",
        })
    }
}

#[derive(Debug, Default)]
pub(crate) struct ActiveOp {
    #[cfg(debug_assertions)]
    current: Cell<Option<ChainOp>>,
    #[cfg(not(debug_assertions))]
    _nosync: PhantomData<Cell<()>>,
}

impl ActiveOp {
    /// Marks `op` as running until the returned scope drops.
    #[inline]
    pub(crate) fn begin(&self, op: ChainOp) -> OpScope<'_> {
        #[cfg(debug_assertions)]
        {
            if let Some(active) = self.current.get() {
                panic!("chain table re-entered: {op} called while {active} is in progress");
            }
            self.current.set(Some(op));
            return OpScope { tracker: self };
        }

        #[cfg(not(debug_assertions))]
        {
            let _ = op;
            return OpScope {
                _tracker: PhantomData,
            };
        }
    }

    #[cfg(all(test, debug_assertions))]
    pub(crate) fn current(&self) -> Option<ChainOp> {
        self.current.get()
    }

    /// Leaves `op` recorded as running with no scope to clear it.
    #[cfg(all(test, debug_assertions))]
    pub(crate) fn mark_active(&self, op: ChainOp) {
        self.current.set(Some(op));
    }
}

pub(crate) struct OpScope<'a> {
    #[cfg(debug_assertions)]
    tracker: &'a ActiveOp,
    #[cfg(not(debug_assertions))]
    _tracker: PhantomData<&'a ActiveOp>,
}

#[cfg(debug_assertions)]
impl Drop for OpScope<'_> {
    fn drop(&mut self) {
        self.tracker.current.set(None);
    }
}
