use super::{ActorId, ActorSpec, MeshId, SceneGraph, SceneNode, SessionRuntime};
use crate::assets::Prefab;
use std::collections::HashMap;
use tracing::{debug, warn};

/// Box mesh dimensions
#[derive(Debug, Clone, PartialEq)]
pub struct BoxMesh {
    pub name: String,
    pub width: f32,
    pub height: f32,
    pub depth: f32,
}

/// In-process runtime that records the scene instead of rendering it
#[derive(Debug, Default)]
pub struct HeadlessRuntime {
    scene: SceneGraph,
    meshes: HashMap<MeshId, BoxMesh>,
    destroyed: Vec<ActorId>,
}

impl HeadlessRuntime {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn scene(&self) -> &SceneGraph {
        &self.scene
    }

    pub fn mesh(&self, id: MeshId) -> Option<&BoxMesh> {
        self.meshes.get(&id)
    }

    /// Every actor destroyed so far, in order
    pub fn destroyed(&self) -> &[ActorId] {
        &self.destroyed
    }

    fn spawn(&mut self, spec: ActorSpec, prefab: Option<&Prefab>) -> ActorId {
        if let Some(parent) = spec.parent {
            if !self.scene.contains(parent) {
                warn!("⚠️ Actor '{}' parented to missing {}", spec.name, parent);
            }
        }

        let id = ActorId::new();
        let mut node = SceneNode::new(id, spec);
        node.prefab = prefab.map(|p| p.id);
        debug!("🧱 Created {} '{}'", id, node.spec.name);
        self.scene.add_node(node);
        id
    }
}

impl SessionRuntime for HeadlessRuntime {
    fn create_box_mesh(&mut self, name: &str, width: f32, height: f32, depth: f32) -> MeshId {
        let id = MeshId::new();
        self.meshes.insert(
            id,
            BoxMesh {
                name: name.to_string(),
                width,
                height,
                depth,
            },
        );
        id
    }

    fn create_actor(&mut self, spec: ActorSpec) -> ActorId {
        self.spawn(spec, None)
    }

    fn create_from_prefab(&mut self, prefab: &Prefab, spec: ActorSpec) -> ActorId {
        self.spawn(spec, Some(prefab))
    }

    fn enable_button(&mut self, actor: ActorId) {
        match self.scene.get_mut(actor) {
            Some(node) => node.clickable = true,
            None => warn!("⚠️ Cannot make missing {} clickable", actor),
        }
    }

    fn destroy_actor(&mut self, actor: ActorId) {
        let removed = self.scene.remove_subtree(actor);
        if removed.is_empty() {
            debug!("🗑️ {} already gone", actor);
        }
        for id in removed {
            debug!("🗑️ Destroyed {}", id);
            self.destroyed.push(id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::{AttachPoint, Transform};
    use crate::world::UserId;
    use uuid::Uuid;

    #[test]
    fn test_prefab_actor_is_recorded_with_attachment() {
        let mut runtime = HeadlessRuntime::new();
        let prefab = Prefab {
            id: Uuid::new_v4(),
            resource: "cap.glb".to_string(),
            name: None,
            root_nodes: 1,
        };
        let user = UserId::new();

        let actor = runtime.create_from_prefab(
            &prefab,
            ActorSpec::named("cap")
                .transform(Transform::at(0.0, 0.1, 0.0))
                .attach_to(user, AttachPoint::Head),
        );

        let node = runtime.scene().get(actor).unwrap();
        assert_eq!(node.prefab, Some(prefab.id));
        assert_eq!(runtime.scene().attached_to(user).count(), 1);

        runtime.destroy_actor(actor);
        runtime.destroy_actor(actor);
        assert!(runtime.scene().is_empty());
        assert_eq!(runtime.destroyed(), &[actor]);
    }

    #[test]
    fn test_box_mesh_and_button() {
        let mut runtime = HeadlessRuntime::new();
        let mesh = runtime.create_box_mesh("button", 0.3, 0.3, 0.01);
        let button = runtime.create_actor(ActorSpec::named("button").appearance(mesh));
        runtime.enable_button(button);

        assert_eq!(runtime.mesh(mesh).unwrap().depth, 0.01);
        assert!(runtime.scene().get(button).unwrap().clickable);
    }
}
