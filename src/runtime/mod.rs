//! Session runtime abstraction
//!
//! The runtime owns actors, meshes and avatar attachments. The hat session
//! only ever talks to it through [`SessionRuntime`], so the same controller
//! drives a real client connection or the in-process [`HeadlessRuntime`].

use crate::assets::Prefab;
use crate::utils::math::identity_rotation;
use crate::world::UserId;
use cgmath::{Quaternion, Vector3};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

pub mod headless;
pub mod scene;

pub use headless::HeadlessRuntime;
pub use scene::{SceneGraph, SceneNode};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ActorId(Uuid);

impl ActorId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ActorId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ActorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "actor:{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MeshId(Uuid);

impl MeshId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for MeshId {
    fn default() -> Self {
        Self::new()
    }
}

/// Local transform relative to the parent (or attach point)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub position: Vector3<f32>,
    pub rotation: Quaternion<f32>,
    pub scale: Vector3<f32>,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vector3::new(0.0, 0.0, 0.0),
            rotation: identity_rotation(),
            scale: Vector3::new(1.0, 1.0, 1.0),
        }
    }
}

impl Transform {
    pub fn at(x: f32, y: f32, z: f32) -> Self {
        Self {
            position: Vector3::new(x, y, z),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAnchor {
    TopLeft,
    TopCenter,
    MiddleLeft,
    MiddleCenter,
    BottomLeft,
    BottomCenter,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color3 {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color3 {
    pub fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    pub fn white() -> Self {
        Self::new(1.0, 1.0, 1.0)
    }

    pub fn yellow() -> Self {
        Self::new(1.0, 1.0, 0.0)
    }
}

/// Text rendered on an actor
#[derive(Debug, Clone, PartialEq)]
pub struct TextSpec {
    pub contents: String,
    pub height: f32,
    pub anchor: TextAnchor,
    pub color: Color3,
}

impl TextSpec {
    pub fn new(contents: impl Into<String>, height: f32, anchor: TextAnchor) -> Self {
        Self {
            contents: contents.into(),
            height,
            anchor,
            color: Color3::white(),
        }
    }

    pub fn color(mut self, color: Color3) -> Self {
        self.color = color;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColliderShape {
    /// Derived from the actor's mesh
    Auto,
}

/// Named attachment points on a user's avatar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AttachPoint {
    Head,
    Neck,
    Spine,
    Hips,
    LeftHand,
    RightHand,
}

impl Default for AttachPoint {
    fn default() -> Self {
        AttachPoint::Head
    }
}

impl fmt::Display for AttachPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AttachPoint::Head => "head",
            AttachPoint::Neck => "neck",
            AttachPoint::Spine => "spine",
            AttachPoint::Hips => "hips",
            AttachPoint::LeftHand => "left-hand",
            AttachPoint::RightHand => "right-hand",
        };
        f.write_str(name)
    }
}

/// Actor bound to a user's avatar
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Attachment {
    pub user: UserId,
    pub point: AttachPoint,
}

/// Everything needed to create an actor
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ActorSpec {
    pub name: String,
    pub parent: Option<ActorId>,
    pub transform: Transform,
    pub appearance: Option<MeshId>,
    pub collider: Option<ColliderShape>,
    pub text: Option<TextSpec>,
    pub attachment: Option<Attachment>,
}

impl ActorSpec {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn parent(mut self, parent: ActorId) -> Self {
        self.parent = Some(parent);
        self
    }

    pub fn transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    pub fn appearance(mut self, mesh: MeshId) -> Self {
        self.appearance = Some(mesh);
        self
    }

    pub fn collider(mut self, shape: ColliderShape) -> Self {
        self.collider = Some(shape);
        self
    }

    pub fn text(mut self, text: TextSpec) -> Self {
        self.text = Some(text);
        self
    }

    pub fn attach_to(mut self, user: UserId, point: AttachPoint) -> Self {
        self.attachment = Some(Attachment { user, point });
        self
    }
}

/// Primitives the hat session needs from the host runtime
pub trait SessionRuntime {
    /// Create a box mesh usable as actor appearance
    fn create_box_mesh(&mut self, name: &str, width: f32, height: f32, depth: f32) -> MeshId;

    fn create_actor(&mut self, spec: ActorSpec) -> ActorId;

    /// Instantiate a loaded prefab as a new actor
    fn create_from_prefab(&mut self, prefab: &Prefab, spec: ActorSpec) -> ActorId;

    /// Make the actor clickable; clicks arrive as session events
    fn enable_button(&mut self, actor: ActorId);

    /// Destroy an actor and its children. Unknown actors are ignored.
    fn destroy_actor(&mut self, actor: ActorId);
}
