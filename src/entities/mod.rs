//! Entities module - the time/layer data model and collaborator interfaces.
//!
//! `core` depends on these types, never the other way around: collaborator
//! traits live here so the engine can drive application-owned layer sets,
//! cameras and indicator widgets without knowing their concrete types.

pub mod layer;
pub mod sequence;
pub mod time;
pub mod traits;

pub use layer::Layer;
pub use sequence::TimeSequence;
pub use time::{TimePoint, TimeRange};
pub use traits::{LayerStack, Renderer, TransportPanel, Viewpoint};
