#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

//! Rekenkern voor anatomische voetopmetingen: landmarkpunten, afgeleide
//! punten, segmenten en zeven klinische maten, bijgehouden door een
//! afhankelijkheidsgedreven propagatie-engine.

pub mod engine;
pub mod geom;
pub mod measure;
pub mod registry;
pub mod scene;
pub mod snapshot;
#[cfg(feature = "wasm")]
pub mod wasm;

pub use engine::{Degeneracy, Engine, EngineError, PlacementDelta};
pub use measure::{Param, Parameters};
pub use scene::{Landmark, Mark, Scene, Segment, SegmentKey};
pub use snapshot::{Snapshot, SnapshotError};
