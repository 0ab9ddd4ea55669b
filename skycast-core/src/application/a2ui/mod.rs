//! A2UI directive pipeline: schema, extraction, repair and validation.

pub mod directive;
mod error;
mod extract;
mod repair;
mod validate;

pub use directive::{
    Action, BeginRendering, Button, CheckBox, Children, Component, ComponentKind, ContextBinding,
    DataEntry, DataModelUpdate, DeleteSurface, Directive, DirectiveBatch, Flex, SurfaceUpdate,
    Text, TextUsage, ValueRef,
};
pub use error::{PayloadError, ValidationError};
pub use extract::{ExtractedReply, extract};
pub use repair::{repair, repair_intensified};
pub use validate::{BATCH_SCHEMA, validate};
