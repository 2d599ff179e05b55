//! Hat selection menu
//!
//! A column of buttons, one per catalog entry in catalog order, each with a
//! label to its right, and a title above the column. Buttons are mapped to
//! hat ids in a single table that the click dispatcher consults.

use crate::catalog::{HatCatalog, HatId};
use crate::runtime::{
    ActorId, ActorSpec, Color3, ColliderShape, SessionRuntime, TextAnchor, TextSpec, Transform,
};
use std::collections::HashMap;
use tracing::{debug, info};

/// Menu geometry
#[derive(Debug, Clone, PartialEq)]
pub struct MenuLayout {
    pub title: String,
    /// Offset of the first row
    pub first_row_y: f32,
    /// Vertical distance between rows
    pub row_step: f32,
    /// Button box size (width, height, depth)
    pub button_size: (f32, f32, f32),
    pub label_x: f32,
    pub label_height: f32,
    /// Gap between the last row and the title
    pub title_gap: f32,
    pub title_height: f32,
    pub title_color: Color3,
}

impl Default for MenuLayout {
    fn default() -> Self {
        Self {
            title: "Wear a hat!".to_string(),
            first_row_y: 0.3,
            row_step: 0.5,
            button_size: (0.3, 0.3, 0.01),
            label_x: 0.5,
            label_height: 0.5,
            title_gap: 0.25,
            title_height: 0.8,
            title_color: Color3::yellow(),
        }
    }
}

/// One menu row
#[derive(Debug, Clone, PartialEq)]
pub struct MenuEntry {
    pub hat: HatId,
    pub button: ActorId,
    pub label: ActorId,
    pub y: f32,
}

/// The built menu
#[derive(Debug, Clone)]
pub struct Menu {
    pub container: ActorId,
    pub entries: Vec<MenuEntry>,
    pub title: ActorId,
    buttons: HashMap<ActorId, HatId>,
}

impl Menu {
    /// Hat selected by clicking `button`
    pub fn hat_for_button(&self, button: ActorId) -> Option<&HatId> {
        self.buttons.get(&button)
    }

    pub fn button_for_hat(&self, hat: &HatId) -> Option<ActorId> {
        self.entries.iter().find(|entry| &entry.hat == hat).map(|entry| entry.button)
    }
}

/// Create the menu actors for `catalog`
pub fn build_menu<R: SessionRuntime + ?Sized>(
    runtime: &mut R,
    catalog: &HatCatalog,
    layout: &MenuLayout,
) -> Menu {
    let container = runtime.create_actor(ActorSpec::named("menu"));
    let (width, height, depth) = layout.button_size;
    let button_mesh = runtime.create_box_mesh("button", width, height, depth);

    let mut entries = Vec::with_capacity(catalog.len());
    let mut buttons = HashMap::with_capacity(catalog.len());
    let mut y = layout.first_row_y;

    for (hat_id, descriptor) in catalog.iter() {
        let button = runtime.create_actor(
            ActorSpec::named(hat_id.as_str())
                .parent(container)
                .appearance(button_mesh)
                .collider(ColliderShape::Auto)
                .transform(Transform::at(0.0, y, 0.0)),
        );
        runtime.enable_button(button);

        let label = runtime.create_actor(
            ActorSpec::named("label")
                .parent(container)
                .text(TextSpec::new(
                    descriptor.display_name.clone(),
                    layout.label_height,
                    TextAnchor::MiddleLeft,
                ))
                .transform(Transform::at(layout.label_x, y, 0.0)),
        );

        debug!("🔘 Menu row '{}' at y={}", descriptor.display_name, y);
        buttons.insert(button, hat_id.clone());
        entries.push(MenuEntry {
            hat: hat_id.clone(),
            button,
            label,
            y,
        });
        y += layout.row_step;
    }

    // `y` is now one row step past the last row
    let title_y = y + layout.title_gap;
    let title = runtime.create_actor(
        ActorSpec::named("title")
            .parent(container)
            .text(
                TextSpec::new(layout.title.clone(), layout.title_height, TextAnchor::MiddleCenter)
                    .color(layout.title_color),
            )
            .transform(Transform::at(layout.label_x, title_y, 0.0)),
    );

    info!("📋 Menu built with {} hats", entries.len());
    Menu {
        container,
        entries,
        title,
        buttons,
    }
}
