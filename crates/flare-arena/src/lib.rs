//! Column-oriented property storage and index-range allocation for Flare.
//!
//! # Architecture
//!
//! ```text
//! SharedAllocator (Rc<RefCell<..>>, one per memory layout)
//! └── Allocator
//!     ├── PropertyStore: PropertyKey → RefCell<Column>, len == capacity
//!     ├── reservation table (ReservationId → IndexRange, generational)
//!     └── live list, ascending by start index
//! ```
//!
//! Emitters hold a [`Reservation`], an RAII handle to one contiguous index
//! range. Growth and defragmentation relocate the range but never
//! invalidate the handle. Released ranges are reused without being
//! cleared, so newly reserved slots carry whatever the previous owner
//! left behind.
//!
//! Nothing here is thread-safe. One `Allocator` is shared between
//! emitters on a single simulation thread.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod allocator;
pub mod column;
pub mod config;
pub mod error;
pub mod reservation;
pub mod store;

pub use allocator::{Allocator, AllocatorStats, IndexRange};
pub use column::{Column, ColumnValue};
pub use config::AllocatorConfig;
pub use error::ArenaError;
pub use reservation::{Reservation, SharedAllocator};
pub use store::PropertyStore;
