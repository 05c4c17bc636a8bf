//! Table aliases.
//!
//! A `TableAlias` names one row-source instance inside a compiled tree. The
//! same entity type may appear several times in one query (self-joins,
//! nested relations), so aliases are allocated per compilation rather than
//! derived from table names.

use std::cell::Cell;
use std::fmt;

/// Unique token identifying one row source within a compilation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TableAlias(u32);

impl TableAlias {
    #[must_use]
    pub fn id(self) -> u32 {
        self.0
    }
}

impl fmt::Display for TableAlias {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "t{}", self.0)
    }
}

/// Monotonic alias source owned by one translate context
#[derive(Debug, Default)]
pub struct AliasGenerator {
    next: Cell<u32>,
}

impl AliasGenerator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a fresh alias
    pub fn next_alias(&self) -> TableAlias {
        let id = self.next.get();
        self.next.set(id + 1);
        TableAlias(id)
    }

    /// Number of aliases handed out so far
    #[must_use]
    pub fn allocated(&self) -> u32 {
        self.next.get()
    }
}
