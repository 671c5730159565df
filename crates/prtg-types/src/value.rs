//! Values that can be placed in a tree.
//!
//! Populating these from PRTG responses is the job of the API client; the
//! tree only needs the handful of fields exposed through [`TreeValue`].

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::object::ObjectId;
use crate::status::Status;

/// A value that can be wrapped by a tree node.
///
/// Only `id` and `name` are mandatory. The remaining accessors feed the
/// difference classification of the diff engine and default to "not
/// applicable".
pub trait TreeValue: fmt::Debug + Send + Sync {
    /// Identity used to align two trees. `None` for values without an ID.
    fn id(&self) -> Option<ObjectId>;

    /// Display name.
    fn name(&self) -> &str;

    /// ID of the object this value lives under.
    fn parent_id(&self) -> Option<ObjectId> {
        None
    }

    /// Display position among its siblings.
    fn position(&self) -> Option<u32> {
        None
    }

    /// Current status, for values that have one.
    fn status(&self) -> Option<Status> {
        None
    }

    /// Raw payload for property-like values.
    fn property_value(&self) -> Option<&str> {
        None
    }
}

/// Shared handle to a tree value.
pub type ValueRef = Arc<dyn TreeValue>;

/// A probe, group, device or sensor.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonitorObject {
    pub id: ObjectId,
    pub name: String,
    #[serde(default)]
    pub parent_id: Option<ObjectId>,
    #[serde(default)]
    pub position: Option<u32>,
    #[serde(default)]
    pub status: Option<Status>,
}

impl MonitorObject {
    /// Create an object with just an ID and a name.
    pub fn new(id: impl Into<ObjectId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            parent_id: None,
            position: None,
            status: None,
        }
    }

    pub fn with_parent(mut self, parent_id: impl Into<ObjectId>) -> Self {
        self.parent_id = Some(parent_id.into());
        self
    }

    pub fn with_position(mut self, position: u32) -> Self {
        self.position = Some(position);
        self
    }

    pub fn with_status(mut self, status: Status) -> Self {
        self.status = Some(status);
        self
    }

    /// Convert into a shared tree value.
    pub fn into_value(self) -> ValueRef {
        Arc::new(self)
    }
}

impl TreeValue for MonitorObject {
    fn id(&self) -> Option<ObjectId> {
        Some(self.id)
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn parent_id(&self) -> Option<ObjectId> {
        self.parent_id
    }

    fn position(&self) -> Option<u32> {
        self.position
    }

    fn status(&self) -> Option<Status> {
        self.status
    }
}

/// A notification trigger attached to an object.
///
/// Triggers are identified by their sub ID, which is unique below
/// `object_id` only.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationTrigger {
    pub object_id: ObjectId,
    pub sub_id: ObjectId,
    pub name: String,
}

impl NotificationTrigger {
    pub fn new(object_id: impl Into<ObjectId>, sub_id: impl Into<ObjectId>, name: impl Into<String>) -> Self {
        Self {
            object_id: object_id.into(),
            sub_id: sub_id.into(),
            name: name.into(),
        }
    }
}

impl TreeValue for NotificationTrigger {
    fn id(&self) -> Option<ObjectId> {
        Some(self.sub_id)
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn parent_id(&self) -> Option<ObjectId> {
        Some(self.object_id)
    }
}

/// A single named property of an object.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyValue {
    #[serde(default)]
    pub object_id: Option<ObjectId>,
    pub name: String,
    #[serde(default)]
    pub value: Option<String>,
}

impl PropertyValue {
    pub fn new(name: impl Into<String>, value: Option<String>) -> Self {
        Self {
            object_id: None,
            name: name.into(),
            value,
        }
    }

    pub fn on_object(mut self, object_id: impl Into<ObjectId>) -> Self {
        self.object_id = Some(object_id.into());
        self
    }
}

impl TreeValue for PropertyValue {
    fn id(&self) -> Option<ObjectId> {
        None
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn parent_id(&self) -> Option<ObjectId> {
        self.object_id
    }

    fn property_value(&self) -> Option<&str> {
        self.value.as_deref()
    }
}
