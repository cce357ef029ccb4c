//! Visibility and level-of-detail scene management

pub mod node;
pub mod graph;
pub mod frustum;
pub mod lod;
pub mod manager;
pub mod picker;

pub use node::{DetailState, LocalTransform, LodEntry, NodeId, SceneNode};
pub use graph::SceneGraph;
pub use frustum::ViewFrustum;
pub use lod::{LodConfig, select_level};
pub use manager::{SceneManager, UpdateStats};
