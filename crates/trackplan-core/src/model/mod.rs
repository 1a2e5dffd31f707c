pub mod document;
pub mod event;
pub mod group;

pub use document::{Inventory, PlanDocument, TargetPlan};
pub use event::{Event, EventCategory, EventSource, EventStatus, ObservedEvent, PropertySpec};
pub use group::{Attributions, GroupInstance, GroupType};
