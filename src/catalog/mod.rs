//! Content catalog wiring.
//!
//! This module wraps the JSON catalog under `data/catalog.json` so tools can
//! load a validated snapshot and share one set of identifiers and
//! enumerations. Callers use `CatalogIndex` to load and look up entries and
//! `ContentStore` to own the items for a session.

pub mod identity;
pub mod index;
pub mod model;
pub mod repository;

pub use identity::{
    Category, ContentId, ContentType, EstimatedTime, Format, Grade, KnowledgeArea, ParseError,
    SkillCode, Stage, Subject, TrackId, Visibility,
};
pub use index::CatalogIndex;
pub use model::{
    AiIndexing, CatalogMetadata, ContentCatalog, ContentItem, LearningTrack, TrackItem,
};
pub use repository::ContentStore;

pub use model::load_catalog_from_path;
