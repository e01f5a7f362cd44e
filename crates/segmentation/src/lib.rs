//! Customer segmentation engine: declarative criteria, deterministic
//! matching, cached segment statistics, a persisted segment catalog,
//! read-only quick segments, and selection tracking for the CRM UI.

pub mod aggregate;
pub mod builder;
pub mod builtin;
pub mod catalog;
pub mod criteria;
pub mod engine;
pub mod selection;
pub mod store;

pub use aggregate::{aggregate, SegmentStats};
pub use builder::CriteriaBuilder;
pub use builtin::QuickSegment;
pub use catalog::{Segment, SegmentCatalog, SegmentUpdate};
pub use criteria::{SegmentCriteria, SegmentRule};
pub use engine::SegmentationEngine;
pub use selection::{SegmentRef, SelectionCoordinator, SelectionObserver};
pub use store::{FileStore, MemoryStore, SegmentStore};
