//! Hat descriptors as read from the hat database

use super::{CatalogError, CatalogResult};
use crate::utils::math::{quaternion_from_euler_degrees, Vector3};
use cgmath::Quaternion;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a hat in the catalog (the JSON key)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HatId(String);

impl HatId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for HatId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for HatId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for HatId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Local placement of a hat relative to the attach point
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HatTransform {
    pub position: Vector3,
    /// Euler angles in degrees, X then Y then Z
    pub rotation: Vector3,
    pub scale: Vector3,
}

impl Default for HatTransform {
    fn default() -> Self {
        Self {
            position: Vector3::zero(),
            rotation: Vector3::zero(),
            scale: Vector3::one(),
        }
    }
}

impl HatTransform {
    pub fn rotation_quaternion(&self) -> Quaternion<f32> {
        quaternion_from_euler_degrees(self.rotation)
    }
}

/// One entry of the hat database
#[derive(Debug, Clone, PartialEq)]
pub struct HatDescriptor {
    /// Text shown next to the menu button
    pub display_name: String,
    /// Model to load; `None` marks the "no hat" entry
    pub resource_name: Option<String>,
    pub transform: HatTransform,
}

impl HatDescriptor {
    /// Descriptor for the "remove my hat" entry
    pub fn none(display_name: impl Into<String>) -> Self {
        Self {
            display_name: display_name.into(),
            resource_name: None,
            transform: HatTransform::default(),
        }
    }

    pub fn with_resource(
        display_name: impl Into<String>,
        resource_name: impl Into<String>,
        transform: HatTransform,
    ) -> Self {
        let resource_name: String = resource_name.into();
        Self {
            display_name: display_name.into(),
            resource_name: normalize_resource(Some(resource_name)),
            transform,
        }
    }

    /// The resource to load, if this entry has one
    pub fn resource(&self) -> Option<&str> {
        self.resource_name.as_deref()
    }

    pub fn is_removal(&self) -> bool {
        self.resource_name.is_none()
    }
}

fn normalize_resource(resource: Option<String>) -> Option<String> {
    resource.filter(|name| !name.trim().is_empty())
}

/// Wire shape of a catalog entry before validation
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub(super) struct RawHatEntry {
    display_name: String,
    #[serde(default)]
    resource_name: Option<String>,
    #[serde(default)]
    scale: Option<Vector3>,
    #[serde(default)]
    rotation: Option<Vector3>,
    #[serde(default)]
    position: Option<Vector3>,
}

impl RawHatEntry {
    /// Entries that carry a model must spell out their full placement.
    /// The "no hat" entry may omit it.
    pub(super) fn into_descriptor(self, hat_id: &HatId) -> CatalogResult<HatDescriptor> {
        let resource_name = normalize_resource(self.resource_name);
        let defaults = HatTransform::default();

        let transform = if resource_name.is_some() {
            HatTransform {
                position: require(hat_id, "position", self.position)?,
                rotation: require(hat_id, "rotation", self.rotation)?,
                scale: require(hat_id, "scale", self.scale)?,
            }
        } else {
            HatTransform {
                position: self.position.unwrap_or(defaults.position),
                rotation: self.rotation.unwrap_or(defaults.rotation),
                scale: self.scale.unwrap_or(defaults.scale),
            }
        };

        Ok(HatDescriptor {
            display_name: self.display_name,
            resource_name,
            transform,
        })
    }
}

fn require(hat_id: &HatId, field: &'static str, value: Option<Vector3>) -> CatalogResult<Vector3> {
    value.ok_or_else(|| CatalogError::MissingTransform {
        hat_id: hat_id.clone(),
        field,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_resource_is_removal() {
        let raw: RawHatEntry =
            serde_json::from_str(r#"{"displayName": "None", "resourceName": "  "}"#).unwrap();
        let descriptor = raw.into_descriptor(&HatId::from("none")).unwrap();
        assert!(descriptor.is_removal());
        assert_eq!(descriptor.resource(), None);
        assert_eq!(descriptor.transform, HatTransform::default());
    }

    #[test]
    fn test_hat_with_resource_requires_transform() {
        let raw: RawHatEntry = serde_json::from_str(
            r#"{"displayName": "Cap", "resourceName": "cap.glb",
                "position": {"x": 0, "y": 0.1, "z": 0},
                "scale": {"x": 1, "y": 1, "z": 1}}"#,
        )
        .unwrap();
        let err = raw.into_descriptor(&HatId::from("cap")).unwrap_err();
        assert!(matches!(err, CatalogError::MissingTransform { field: "rotation", .. }));
    }

    #[test]
    fn test_unknown_field_is_rejected() {
        let result = serde_json::from_str::<RawHatEntry>(r#"{"displayName": "Cap", "colour": "red"}"#);
        assert!(result.is_err());
    }
}
