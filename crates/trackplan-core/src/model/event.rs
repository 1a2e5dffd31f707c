use serde::{Deserialize, Serialize};

/// Which side of a reconciliation an event was read from
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventSource {
    Inventory,
    Target,
}

/// Whether an observed event is still emitted by live code
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum EventStatus {
    /// A tracking call still reachable in the codebase
    #[default]
    Live,
    /// Defined or documented, but nothing fires it any more
    Orphaned,
}

/// Informational category of an event
///
/// Categories never influence matching or classification.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum EventCategory {
    Lifecycle,
    CoreValue,
    Collaboration,
    Configuration,
    Billing,
    Navigation,
    #[default]
    #[serde(other)]
    Other,
}

/// A single property carried by an event
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PropertySpec {
    pub name: String,

    /// Declared value type (`string`, `number`, `boolean`, ...). Compared
    /// case-insensitively.
    #[serde(rename = "type", default = "default_property_type")]
    pub kind: String,

    #[serde(default)]
    pub required: bool,
}

fn default_property_type() -> String {
    "string".to_string()
}

impl PropertySpec {
    pub fn new(name: impl Into<String>, kind: impl Into<String>, required: bool) -> Self {
        Self {
            name: name.into(),
            kind: kind.into(),
            required,
        }
    }

    /// True if both specs declare the same value type
    pub fn same_type(&self, other: &PropertySpec) -> bool {
        self.kind.eq_ignore_ascii_case(&other.kind)
    }
}

/// An analytics event definition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    /// Unique within its document
    pub name: String,

    /// Unique by name within the event
    pub properties: Vec<PropertySpec>,

    pub category: EventCategory,

    /// Group type the event is scoped to, if any
    pub group_level: Option<String>,

    pub source: EventSource,
}

impl Event {
    /// Create an event with no properties, no group level and the default category
    pub fn new(name: impl Into<String>, source: EventSource) -> Self {
        Self {
            name: name.into(),
            properties: Vec::new(),
            category: EventCategory::default(),
            group_level: None,
            source,
        }
    }

    /// Shorthand for a target-plan event
    pub fn target(name: impl Into<String>) -> Self {
        Self::new(name, EventSource::Target)
    }

    pub fn with_property(mut self, property: PropertySpec) -> Self {
        self.properties.push(property);
        self
    }

    pub fn with_category(mut self, category: EventCategory) -> Self {
        self.category = category;
        self
    }

    pub fn with_group_level(mut self, group_level: impl Into<String>) -> Self {
        self.group_level = Some(group_level.into());
        self
    }
}

/// An inventory event together with its observed status
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObservedEvent {
    pub event: Event,
    pub status: EventStatus,
}

impl ObservedEvent {
    /// Shorthand for a live inventory event
    pub fn live(name: impl Into<String>) -> Self {
        Self {
            event: Event::new(name, EventSource::Inventory),
            status: EventStatus::Live,
        }
    }

    /// Shorthand for an orphaned inventory event
    pub fn orphaned(name: impl Into<String>) -> Self {
        Self {
            event: Event::new(name, EventSource::Inventory),
            status: EventStatus::Orphaned,
        }
    }

    pub fn with_property(mut self, property: PropertySpec) -> Self {
        self.event.properties.push(property);
        self
    }

    pub fn with_category(mut self, category: EventCategory) -> Self {
        self.event.category = category;
        self
    }

    pub fn with_group_level(mut self, group_level: impl Into<String>) -> Self {
        self.event.group_level = Some(group_level.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.event.name
    }
}
