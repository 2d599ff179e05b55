use super::{ActorId, ActorSpec};
use crate::world::UserId;
use std::collections::HashMap;
use uuid::Uuid;

/// One actor in the scene
#[derive(Debug, Clone, PartialEq)]
pub struct SceneNode {
    pub id: ActorId,
    pub spec: ActorSpec,
    /// Prefab the actor was instantiated from
    pub prefab: Option<Uuid>,
    pub clickable: bool,
}

impl SceneNode {
    pub fn new(id: ActorId, spec: ActorSpec) -> Self {
        Self {
            id,
            spec,
            prefab: None,
            clickable: false,
        }
    }
}

/// Actors with parent links, kept in creation order
#[derive(Debug, Default)]
pub struct SceneGraph {
    nodes: HashMap<ActorId, SceneNode>,
    order: Vec<ActorId>,
}

impl SceneGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_node(&mut self, node: SceneNode) {
        self.order.push(node.id);
        self.nodes.insert(node.id, node);
    }

    pub fn get(&self, id: ActorId) -> Option<&SceneNode> {
        self.nodes.get(&id)
    }

    pub fn get_mut(&mut self, id: ActorId) -> Option<&mut SceneNode> {
        self.nodes.get_mut(&id)
    }

    pub fn contains(&self, id: ActorId) -> bool {
        self.nodes.contains_key(&id)
    }

    /// Remove an actor and everything parented below it; returns the removed ids
    pub fn remove_subtree(&mut self, id: ActorId) -> Vec<ActorId> {
        if !self.nodes.contains_key(&id) {
            return Vec::new();
        }

        let mut removed = vec![id];
        let mut cursor = 0;
        while cursor < removed.len() {
            let parent = removed[cursor];
            removed.extend(self.children_of(parent).map(|child| child.id));
            cursor += 1;
        }

        for actor in &removed {
            self.nodes.remove(actor);
        }
        self.order.retain(|actor| self.nodes.contains_key(actor));
        removed
    }

    /// Direct children of `parent`, in creation order
    pub fn children_of(&self, parent: ActorId) -> impl Iterator<Item = &SceneNode> + '_ {
        self.iter().filter(move |node| node.spec.parent == Some(parent))
    }

    /// Actors attached to `user`'s avatar
    pub fn attached_to(&self, user: UserId) -> impl Iterator<Item = &SceneNode> + '_ {
        self.iter()
            .filter(move |node| node.spec.attachment.map(|a| a.user) == Some(user))
    }

    /// All actors in creation order
    pub fn iter(&self) -> impl Iterator<Item = &SceneNode> + '_ {
        self.order.iter().filter_map(|id| self.nodes.get(id))
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn add(graph: &mut SceneGraph, name: &str, parent: Option<ActorId>) -> ActorId {
        let id = ActorId::new();
        let mut spec = ActorSpec::named(name);
        spec.parent = parent;
        graph.add_node(SceneNode::new(id, spec));
        id
    }

    #[test]
    fn test_children_in_creation_order() {
        let mut graph = SceneGraph::new();
        let root = add(&mut graph, "menu", None);
        add(&mut graph, "a", Some(root));
        add(&mut graph, "b", Some(root));
        add(&mut graph, "loose", None);

        let names: Vec<&str> = graph.children_of(root).map(|n| n.spec.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b"]);
    }

    #[test]
    fn test_remove_subtree() {
        let mut graph = SceneGraph::new();
        let root = add(&mut graph, "root", None);
        let child = add(&mut graph, "child", Some(root));
        add(&mut graph, "grandchild", Some(child));
        let other = add(&mut graph, "other", None);

        let removed = graph.remove_subtree(root);
        assert_eq!(removed.len(), 3);
        assert_eq!(graph.len(), 1);
        assert!(graph.contains(other));
        assert!(graph.remove_subtree(root).is_empty());
    }
}
