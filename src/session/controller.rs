use super::attachments::{AttachmentTable, HatState};
use super::menu::{build_menu, Menu, MenuLayout};
use super::{SessionError, SessionResult};
use crate::assets::{preload, AssetSource, PrefabTable, PreloadReport};
use crate::catalog::{HatCatalog, HatDescriptor, HatId};
use crate::runtime::{ActorId, ActorSpec, AttachPoint, SessionRuntime, Transform};
use crate::world::{SessionEvent, User, UserId};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Lifecycle of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// Nothing loaded yet
    Created,
    /// Hat models loaded, menu not built
    Preloaded,
    /// Menu is up and accepting clicks
    Ready,
}

/// One line of the session status
#[derive(Debug, Clone, PartialEq)]
pub struct UserStatus {
    pub user: UserId,
    pub name: Option<String>,
    pub hat: HatState,
}

/// Coordinates hat selection for one session
pub struct HatSessionController<R: SessionRuntime> {
    catalog: Arc<HatCatalog>,
    source: Arc<dyn AssetSource>,
    runtime: R,
    layout: MenuLayout,
    attach_point: AttachPoint,
    phase: SessionPhase,
    prefabs: PrefabTable,
    menu: Option<Menu>,
    attachments: AttachmentTable,
    users: HashMap<UserId, String>,
}

impl<R: SessionRuntime> HatSessionController<R> {
    pub fn new(catalog: Arc<HatCatalog>, source: Arc<dyn AssetSource>, runtime: R) -> Self {
        Self {
            catalog,
            source,
            runtime,
            layout: MenuLayout::default(),
            attach_point: AttachPoint::Head,
            phase: SessionPhase::Created,
            prefabs: PrefabTable::new(),
            menu: None,
            attachments: AttachmentTable::new(),
            users: HashMap::new(),
        }
    }

    pub fn with_attach_point(mut self, attach_point: AttachPoint) -> Self {
        self.attach_point = attach_point;
        self
    }

    pub fn with_menu_layout(mut self, layout: MenuLayout) -> Self {
        self.layout = layout;
        self
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn catalog(&self) -> &HatCatalog {
        &self.catalog
    }

    pub fn prefabs(&self) -> &PrefabTable {
        &self.prefabs
    }

    pub fn menu(&self) -> Option<&Menu> {
        self.menu.as_ref()
    }

    pub fn runtime(&self) -> &R {
        &self.runtime
    }

    pub fn runtime_mut(&mut self) -> &mut R {
        &mut self.runtime
    }

    /// Preload every hat model, then build the menu
    pub async fn start(&mut self) -> SessionResult<PreloadReport> {
        info!("🎩 Session starting with {} hats", self.catalog.len());
        let report = self.preload_assets().await?;
        self.build_menu()?;
        Ok(report)
    }

    /// Load all hat models; returns once every load has settled
    pub async fn preload_assets(&mut self) -> SessionResult<PreloadReport> {
        if self.phase != SessionPhase::Created {
            return Err(SessionError::AlreadyStarted);
        }

        let report = preload(&self.catalog, Arc::clone(&self.source)).await;
        self.prefabs = report.prefabs.clone();
        self.phase = SessionPhase::Preloaded;
        Ok(report)
    }

    /// Build the menu. Only valid once the preload has settled, so no button
    /// can be clicked while its model is still loading.
    pub fn build_menu(&mut self) -> SessionResult<&Menu> {
        match self.phase {
            SessionPhase::Created => return Err(SessionError::NotPreloaded),
            SessionPhase::Ready => return Err(SessionError::MenuAlreadyBuilt),
            SessionPhase::Preloaded => {}
        }

        let menu = build_menu(&mut self.runtime, &self.catalog, &self.layout);
        self.phase = SessionPhase::Ready;
        Ok(self.menu.insert(menu))
    }

    /// Put `hat_id` on `user`, replacing whatever they wore.
    ///
    /// The current hat is always destroyed first, even when the same hat is
    /// selected again. Selecting the "no hat" entry leaves the user bare.
    /// Unknown hats change nothing; a hat whose model failed to load leaves
    /// the user bare.
    pub fn wear_hat(&mut self, hat_id: &HatId, user: UserId) -> HatState {
        let Some(descriptor) = self.catalog.get(hat_id) else {
            warn!("⚠️ {} selected unknown hat '{}'", user, hat_id);
            return self.attachments.state(&user);
        };

        if let Some(previous) = self.attachments.take(&user) {
            debug!("🎩 Removing {} from {}", previous.hat, user);
            self.runtime.destroy_actor(previous.actor);
        }

        if descriptor.is_removal() {
            info!("🎩 {} took off their hat", user);
            return HatState::NoHat;
        }

        let Some(prefab) = self.prefabs.get(hat_id) else {
            warn!("⚠️ No model loaded for '{}', {} stays bare", hat_id, user);
            return HatState::NoHat;
        };

        let spec = ActorSpec::named(hat_id.as_str())
            .transform(hat_transform(descriptor))
            .attach_to(user, self.attach_point);
        let actor = self.runtime.create_from_prefab(prefab, spec);
        self.attachments.record(user, hat_id.clone(), actor);

        info!("🎩 {} is wearing '{}'", user, descriptor.display_name);
        HatState::Wearing {
            hat: hat_id.clone(),
            actor,
        }
    }

    /// Dispatch a click on a menu button. Returns `None` for actors that are
    /// not menu buttons.
    pub fn click(&mut self, button: ActorId, user: UserId) -> Option<HatState> {
        let hat_id = match self.menu.as_ref().and_then(|menu| menu.hat_for_button(button)) {
            Some(hat_id) => hat_id.clone(),
            None => {
                debug!("🖱️ Click on {} is not a menu button", button);
                return None;
            }
        };
        Some(self.wear_hat(&hat_id, user))
    }

    pub fn user_joined(&mut self, user: User) {
        info!("👋 {} joined as {}", user.name, user.id);
        self.users.insert(user.id, user.name);
    }

    /// Drop the user's hat, if any. Safe to call repeatedly.
    pub fn user_left(&mut self, user: UserId) {
        if let Some(worn) = self.attachments.take(&user) {
            debug!("🎩 Removing {} from departing {}", worn.hat, user);
            self.runtime.destroy_actor(worn.actor);
        }
        if let Some(name) = self.users.remove(&user) {
            info!("👋 {} left", name);
        }
    }

    pub async fn handle_event(&mut self, event: SessionEvent) -> SessionResult<()> {
        match event {
            SessionEvent::Started => {
                self.start().await?;
            }
            SessionEvent::UserJoined(user) => self.user_joined(user),
            SessionEvent::UserLeft(user) => self.user_left(user),
            SessionEvent::ButtonClicked { actor, user } => {
                self.click(actor, user);
            }
        }
        Ok(())
    }

    pub fn hat_state(&self, user: &UserId) -> HatState {
        self.attachments.state(user)
    }

    /// Known users and what they wear, ordered by name
    pub fn status(&self) -> Vec<UserStatus> {
        let mut users: Vec<UserId> = self.users.keys().copied().collect();
        for (user, _) in self.attachments.iter() {
            if !self.users.contains_key(user) {
                users.push(*user);
            }
        }

        let mut status: Vec<UserStatus> = users
            .into_iter()
            .map(|user| UserStatus {
                user,
                name: self.users.get(&user).cloned(),
                hat: self.attachments.state(&user),
            })
            .collect();
        status.sort_by(|a, b| a.name.cmp(&b.name).then(a.user.cmp(&b.user)));
        status
    }
}

fn hat_transform(descriptor: &HatDescriptor) -> Transform {
    let placement = &descriptor.transform;
    Transform {
        position: placement.position.into(),
        rotation: placement.rotation_quaternion(),
        scale: placement.scale.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::{Asset, AssetError, AssetResult, Prefab};
    use crate::catalog::{HatDescriptor, HatTransform};
    use crate::runtime::HeadlessRuntime;
    use crate::utils::math::Vector3;
    use async_trait::async_trait;
    use uuid::Uuid;

    struct OnePrefabEach;

    #[async_trait]
    impl AssetSource for OnePrefabEach {
        async fn load(&self, resource: &str) -> AssetResult<Vec<Asset>> {
            if resource == "broken.glb" {
                return Err(AssetError::NoPrefab { resource: resource.to_string() });
            }
            Ok(vec![Asset::Prefab(Prefab {
                id: Uuid::new_v4(),
                resource: resource.to_string(),
                name: None,
                root_nodes: 1,
            })])
        }

        fn describe(&self) -> String {
            "test".to_string()
        }
    }

    fn controller() -> HatSessionController<HeadlessRuntime> {
        let cap = HatTransform {
            position: Vector3::new(0.0, 0.1, 0.0),
            ..HatTransform::default()
        };
        let catalog = HatCatalog::new(vec![
            (HatId::from("none"), HatDescriptor::none("None")),
            (HatId::from("cap"), HatDescriptor::with_resource("Cap", "cap.glb", cap)),
            (HatId::from("broken"), HatDescriptor::with_resource("Broken", "broken.glb", cap)),
        ])
        .unwrap();
        HatSessionController::new(Arc::new(catalog), Arc::new(OnePrefabEach), HeadlessRuntime::new())
    }

    #[tokio::test]
    async fn test_phases() {
        let mut session = controller();
        assert_eq!(session.build_menu().unwrap_err(), SessionError::NotPreloaded);

        session.preload_assets().await.unwrap();
        assert_eq!(session.phase(), SessionPhase::Preloaded);
        assert!(session.menu().is_none());

        session.build_menu().unwrap();
        assert_eq!(session.phase(), SessionPhase::Ready);
        assert_eq!(session.build_menu().unwrap_err(), SessionError::MenuAlreadyBuilt);
        assert_eq!(session.start().await.unwrap_err(), SessionError::AlreadyStarted);
    }

    #[tokio::test]
    async fn test_click_before_menu_is_ignored() {
        let mut session = controller();
        assert!(session.click(ActorId::new(), UserId::new()).is_none());
    }

    #[tokio::test]
    async fn test_unknown_hat_keeps_current_hat() {
        let mut session = controller();
        session.start().await.unwrap();
        let user = UserId::new();

        let wearing = session.wear_hat(&HatId::from("cap"), user);
        assert_eq!(session.wear_hat(&HatId::from("sombrero"), user), wearing);
        assert!(session.runtime().destroyed().is_empty());
    }

    #[tokio::test]
    async fn test_failed_model_leaves_user_bare() {
        let mut session = controller();
        session.start().await.unwrap();
        let user = UserId::new();

        session.wear_hat(&HatId::from("cap"), user);
        assert_eq!(session.wear_hat(&HatId::from("broken"), user), HatState::NoHat);
        assert_eq!(session.hat_state(&user), HatState::NoHat);
        assert_eq!(session.runtime().destroyed().len(), 1);
    }

    #[tokio::test]
    async fn test_status_lists_joined_users() {
        let mut session = controller();
        session.start().await.unwrap();
        let alice = User::new("alice");
        let bob = User::new("bob");
        session.user_joined(bob.clone());
        session.user_joined(alice.clone());
        session.wear_hat(&HatId::from("cap"), bob.id);

        let status = session.status();
        assert_eq!(status.len(), 2);
        assert_eq!(status[0].name.as_deref(), Some("alice"));
        assert_eq!(status[0].hat, HatState::NoHat);
        assert_eq!(status[1].hat.hat(), Some(&HatId::from("cap")));

        session.user_left(bob.id);
        assert_eq!(session.status().len(), 1);
    }
}
