use std::fmt;

use serde::{Deserialize, Serialize};

/// The kind of entity a tree node models.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrtgNodeType {
    /// A probe: the top level object sensors report through.
    Probe,
    /// A group of devices and/or other groups.
    Group,
    /// A device hosting sensors.
    Device,
    /// A sensor.
    Sensor,
    /// A notification trigger attached to an object.
    Trigger,
    /// A single object property.
    Property,
    /// A grouping node with no value of its own (e.g. "Triggers").
    Collection,
}

impl PrtgNodeType {
    /// Returns `true` for node types that represent a PRTG object with an ID.
    pub fn is_object(&self) -> bool {
        matches!(self, Self::Probe | Self::Group | Self::Device | Self::Sensor)
    }
}

impl fmt::Display for PrtgNodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Probe => write!(f, "Probe"),
            Self::Group => write!(f, "Group"),
            Self::Device => write!(f, "Device"),
            Self::Sensor => write!(f, "Sensor"),
            Self::Trigger => write!(f, "Trigger"),
            Self::Property => write!(f, "Property"),
            Self::Collection => write!(f, "Collection"),
        }
    }
}
