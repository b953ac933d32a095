//! Paged arena allocation for the Rook runtime.
//!
//! Two arenas back every interpreter instance: one holds the AST and
//! other interpreter-lifetime metadata, the other holds per-run
//! variable storage and is reset between runs. Neither supports
//! per-object free — reclamation is whole-arena only.
//!
//! # Design
//!
//! - Cells are typed (`Arena<T>`) and addressed by `CellId(u32)`
//!   indices, not pointers, so handles stay valid under `deny(unsafe_code)`
//!   and can be stored inside other arena cells (index-linked lists).
//! - Pages are `Vec<T>`s whose capacity is fixed at creation and never
//!   reallocated, so a served index is stable for the arena's lifetime.
//! - An allocation is served from the current page when it has room;
//!   otherwise a fresh page of `max(request, page_cells)` cells is
//!   opened. Tail cells of an abandoned page are wasted, never reused —
//!   the same policy as a classic page/cell storage.
//!
//! An optional guard layer ([`Arena::guarded`]) journals every
//! allocation with its caller location for corruption checks and
//! live-block dumps; see the `guard` module.

mod cell_id;
mod guard;

pub use cell_id::{CellId, CellRange};

use std::fmt;
use std::panic::Location;

use tracing::trace;

/// Default page capacity, in cells.
pub const DEFAULT_PAGE_CELLS: usize = 1024;

/// One fixed-capacity page.
struct Page<T> {
    /// Global index of this page's first cell.
    start: u32,
    /// Cells served so far; capacity is fixed at page creation.
    cells: Vec<T>,
}

impl<T> Page<T> {
    fn spare(&self) -> usize {
        self.cells.capacity() - self.cells.len()
    }
}

/// Typed paged arena with whole-arena reclamation.
pub struct Arena<T> {
    /// Pages in creation order; allocation serves from the last one.
    pages: Vec<Page<T>>,
    /// Minimum capacity of a freshly opened page.
    page_cells: usize,
    /// Total cells served (not counting wasted page tails).
    live: u32,
    /// Optional allocation journal.
    guard: Option<guard::AllocGuard>,
}

impl<T> Arena<T> {
    /// Create an arena with the default page size.
    pub fn new() -> Self {
        Self::with_page_size(DEFAULT_PAGE_CELLS)
    }

    /// Create an arena whose pages hold at least `page_cells` cells.
    ///
    /// A `page_cells` of zero falls back to [`DEFAULT_PAGE_CELLS`].
    pub fn with_page_size(page_cells: usize) -> Self {
        let page_cells = if page_cells == 0 {
            DEFAULT_PAGE_CELLS
        } else {
            page_cells
        };
        Arena {
            pages: Vec::new(),
            page_cells,
            live: 0,
            guard: None,
        }
    }

    /// Create a guarded arena: every allocation is journaled with its
    /// caller location for [`check_marks`](Arena::check_marks) and
    /// [`dump_live`](Arena::dump_live).
    pub fn guarded(page_cells: usize) -> Self {
        let mut arena = Self::with_page_size(page_cells);
        arena.guard = Some(guard::AllocGuard::default());
        arena
    }

    /// Allocate one cell, returning its ID.
    #[track_caller]
    pub fn alloc(&mut self, value: T) -> CellId {
        let site = Location::caller();
        let id = self.next_id(1);
        let page = self.current_page();
        page.cells.push(value);
        if let Some(guard) = &mut self.guard {
            guard.record(site, CellRange::new(id.index(), 1));
        }
        id
    }

    /// Allocate a contiguous run of cells, returning its range.
    ///
    /// The whole run lands on a single page; a run larger than the
    /// page size gets a dedicated page of its own.
    #[track_caller]
    pub fn alloc_extend<I>(&mut self, items: I) -> CellRange
    where
        I: IntoIterator<Item = T>,
        I::IntoIter: ExactSizeIterator,
    {
        let site = Location::caller();
        let items = items.into_iter();
        let len = items.len();
        if len == 0 {
            return CellRange::EMPTY;
        }
        let first = self.next_id(len);
        let page = self.current_page();
        page.cells.extend(items);
        let range = CellRange::new(first.index(), cell_count(len));
        if let Some(guard) = &mut self.guard {
            guard.record(site, range);
        }
        range
    }

    /// Get a cell by ID.
    ///
    /// # Panics
    /// Panics if `id` was not produced by this arena since its last reset.
    #[inline]
    #[track_caller]
    pub fn get(&self, id: CellId) -> &T {
        let (page, offset) = self.locate(id.index());
        &page.cells[offset]
    }

    /// Get a cell mutably by ID.
    ///
    /// # Panics
    /// Panics if `id` was not produced by this arena since its last reset.
    #[inline]
    #[track_caller]
    pub fn get_mut(&mut self, id: CellId) -> &mut T {
        let page_idx = self.locate_page(id.index());
        let page = &mut self.pages[page_idx];
        let offset = (id.index() - page.start) as usize;
        &mut page.cells[offset]
    }

    /// Borrow a run of cells as a slice.
    ///
    /// # Panics
    /// Panics if `range` was not produced by this arena since its last reset.
    #[inline]
    #[track_caller]
    pub fn get_slice(&self, range: CellRange) -> &[T] {
        if range.is_empty() {
            return &[];
        }
        let (page, offset) = self.locate(range.start);
        &page.cells[offset..offset + range.len()]
    }

    /// Total cells served since the last reset.
    #[inline]
    pub fn len(&self) -> usize {
        self.live as usize
    }

    /// True when nothing has been allocated since the last reset.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    /// Number of pages currently open.
    #[inline]
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Drop every page at once, invalidating all outstanding IDs.
    pub fn reset(&mut self) {
        trace!(pages = self.pages.len(), cells = self.live, "arena reset");
        self.pages.clear();
        self.live = 0;
        if let Some(guard) = &mut self.guard {
            guard.clear();
        }
    }

    /// Verify the allocation journal (guarded arenas only).
    ///
    /// # Panics
    /// Panics with the offending site when a journaled block is corrupt.
    pub fn check_marks(&self) {
        let Some(guard) = &self.guard else { return };
        let allocated = self.allocated_cells();
        if let Some((site, range)) = guard.check_marks(allocated) {
            panic!(
                "arena guard: bad block {:?} allocated at {}:{}",
                range,
                site.file(),
                site.line(),
            );
        }
    }

    /// Number of journaled live blocks (guarded arenas only).
    pub fn live_blocks(&self) -> usize {
        self.guard.as_ref().map_or(0, guard::AllocGuard::live_blocks)
    }

    /// Write a live-block dump grouped by allocation site (guarded
    /// arenas only; a no-op otherwise).
    pub fn dump_live(&self, out: &mut impl fmt::Write) -> fmt::Result {
        match &self.guard {
            Some(guard) => guard.dump_live(out),
            None => Ok(()),
        }
    }

    /// Reserve room for `request` cells and return the ID the next cell
    /// will be served at.
    fn next_id(&mut self, request: usize) -> CellId {
        let has_room = self
            .pages
            .last()
            .is_some_and(|page| page.spare() >= request);
        if !has_room {
            self.open_page(request);
        }
        // Room is guaranteed; compute the global index of the next cell.
        let page = match self.pages.last() {
            Some(page) => page,
            None => unreachable!("open_page always leaves a current page"),
        };
        let id = CellId::new(page.start + cell_count(page.cells.len()));
        self.live += cell_count(request);
        id
    }

    /// The current (last-opened) page, which `next_id` guarantees has room.
    fn current_page(&mut self) -> &mut Page<T> {
        match self.pages.last_mut() {
            Some(page) => page,
            None => unreachable!("next_id always leaves a current page"),
        }
    }

    /// Open a fresh page of `max(request, page_cells)` cells.
    fn open_page(&mut self, request: usize) {
        let capacity = request.max(self.page_cells);
        let start = match self.pages.last() {
            Some(page) => page
                .start
                .checked_add(cell_count(page.cells.capacity()))
                .unwrap_or_else(|| panic!("arena exhausted: cell index space overflow")),
            None => 0,
        };
        assert!(
            u32::try_from(capacity).is_ok() && start.checked_add(cell_count(capacity)).is_some(),
            "arena exhausted: cell index space overflow",
        );
        trace!(capacity, start, page = self.pages.len(), "arena page opened");
        self.pages.push(Page {
            start,
            cells: Vec::with_capacity(capacity),
        });
    }

    /// Locate the page holding `index` and the offset within it.
    fn locate(&self, index: u32) -> (&Page<T>, usize) {
        let page = &self.pages[self.locate_page(index)];
        (page, (index - page.start) as usize)
    }

    /// Index of the page holding `index`.
    ///
    /// Pages are sorted by `start`, so a partition point finds the
    /// last page at or before the index.
    #[inline]
    fn locate_page(&self, index: u32) -> usize {
        let after = self.pages.partition_point(|page| page.start <= index);
        assert!(after > 0, "cell id {index} from a different arena");
        after - 1
    }

    /// Upper bound of the served cell index space.
    fn allocated_cells(&self) -> u32 {
        self.pages
            .last()
            .map_or(0, |page| page.start + cell_count(page.cells.len()))
    }
}

impl<T> Default for Arena<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for Arena<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Arena")
            .field("pages", &self.pages.len())
            .field("cells", &self.live)
            .field("page_cells", &self.page_cells)
            .field("guarded", &self.guard.is_some())
            .finish()
    }
}

/// Cell counts are u32 everywhere; a request that does not fit is an
/// allocation failure, which is fatal by contract.
#[inline]
fn cell_count(n: usize) -> u32 {
    u32::try_from(n).unwrap_or_else(|_| panic!("arena exhausted: {n} cells requested"))
}
