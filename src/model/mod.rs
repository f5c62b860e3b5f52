//! Active-record mapping of entity types onto tables.

mod descriptor;
mod entity;
mod record;

pub use descriptor::EntityDescriptor;
pub use entity::{ActiveRecord, Entity, EntityQuery, Saved};
pub use record::Record;
