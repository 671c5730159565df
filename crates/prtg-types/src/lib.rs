//! Foundation types for PRTG object trees.
//!
//! This crate provides the identifier, classification and value types that the
//! tree, diff and rendering crates build on. Every other crate in the
//! workspace depends on `prtg-types`.
//!
//! # Key Types
//!
//! - [`ObjectId`] — PRTG object identifier (probes, groups, devices, sensors, trigger sub IDs)
//! - [`PrtgNodeType`] — The kind of entity a tree node models
//! - [`Status`] — Sensor / object status as reported by PRTG
//! - [`TreeValue`] — Trait every value that can be placed in a tree implements
//! - [`MonitorObject`], [`NotificationTrigger`], [`PropertyValue`] — Minimal tree values

pub mod error;
pub mod node_type;
pub mod object;
pub mod status;
pub mod value;

pub use error::TypeError;
pub use node_type::PrtgNodeType;
pub use object::ObjectId;
pub use status::Status;
pub use value::{MonitorObject, NotificationTrigger, PropertyValue, TreeValue, ValueRef};
