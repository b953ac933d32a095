//! Guarded allocation bookkeeping for debugging.
//!
//! Optional layer recording one entry per allocation: the caller's
//! source location, the cell range served, and a sentinel mark. The
//! sentinels cannot be overrun from safe code, so what `check_marks`
//! actually audits is the guard's own bookkeeping against the arena
//! state: every recorded block must carry an intact mark and map to
//! cells the arena really handed out. `dump_live` renders the records
//! grouped by allocation site, which is the practical tool — it shows
//! which call sites are still holding arena space at reset time.

use std::fmt;
use std::panic::Location;

use crate::CellRange;

/// Sentinel written into every allocation record.
const MARK: u32 = 0xCDCD_CDCD;

/// One recorded allocation.
#[derive(Clone, Copy)]
struct AllocRecord {
    /// Caller that requested the allocation.
    site: &'static Location<'static>,
    /// Cells served.
    range: CellRange,
    /// Sentinel, checked by [`AllocGuard::check_marks`].
    mark: u32,
}

/// Allocation journal attached to an arena when guarding is enabled.
#[derive(Default)]
pub(crate) struct AllocGuard {
    records: Vec<AllocRecord>,
}

impl AllocGuard {
    /// Record an allocation of `range` cells from `site`.
    pub(crate) fn record(&mut self, site: &'static Location<'static>, range: CellRange) {
        self.records.push(AllocRecord {
            site,
            range,
            mark: MARK,
        });
    }

    /// Forget all records (whole-arena reset).
    pub(crate) fn clear(&mut self) {
        self.records.clear();
    }

    /// Number of live recorded blocks.
    pub(crate) fn live_blocks(&self) -> usize {
        self.records.len()
    }

    /// Verify every record against the arena's allocated cell count.
    ///
    /// Returns the first corrupt record as `(site, range)`, or `None`
    /// when all marks are intact and in bounds.
    pub(crate) fn check_marks(
        &self,
        allocated_cells: u32,
    ) -> Option<(&'static Location<'static>, CellRange)> {
        for rec in &self.records {
            let in_bounds = rec.range.start + rec.range.len <= allocated_cells;
            if rec.mark != MARK || !in_bounds {
                return Some((rec.site, rec.range));
            }
        }
        None
    }

    /// Write a live-block dump grouped by allocation site.
    pub(crate) fn dump_live(&self, out: &mut impl fmt::Write) -> fmt::Result {
        writeln!(out, "live blocks: {}", self.records.len())?;
        for rec in &self.records {
            writeln!(
                out,
                "  {}:{} cells {}..{} ({} cells)",
                rec.site.file(),
                rec.site.line(),
                rec.range.start,
                rec.range.start + rec.range.len,
                rec.range.len,
            )?;
        }
        Ok(())
    }
}
