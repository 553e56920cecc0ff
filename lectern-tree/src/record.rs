use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Identifier shared by records and their parent references.
pub type RecordId = i64;

/// Field names tried, in order, when resolving a display title.
const TITLE_FIELDS: [&str; 4] = ["title", "menuName", "name", "categoryName"];

/// Trait implemented by flat, parent-referencing records.
pub trait Record {
    /// Identifier, unique across the collection.
    fn id(&self) -> RecordId;
    /// Parent identifier, `None` for root records.
    fn parent_id(&self) -> Option<RecordId>;
    /// Sibling sort key.
    fn order_num(&self) -> i64;
}

/// Menu or category row as returned by the admin REST API.
///
/// Only `id`, `parentId` and `orderNum` are interpreted. Every other field
/// is kept verbatim and written back unchanged on serialization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuRecord {
    pub id: RecordId,
    #[serde(default)]
    pub parent_id: Option<RecordId>,
    #[serde(default)]
    pub order_num: i64,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl MenuRecord {
    pub fn new(
        id: RecordId,
        parent_id: Option<RecordId>,
        order_num: i64,
    ) -> Self {
        Self {
            id,
            parent_id,
            order_num,
            fields: Map::new(),
        }
    }

    /// Attach a pass-through field.
    pub fn with_field(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.fields.insert(name.to_owned(), value.into());
        self
    }

    /// Return a pass-through field by name.
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    /// Return a pass-through field when it holds a string.
    pub fn str_field(&self, name: &str) -> Option<&str> {
        self.field(name).and_then(Value::as_str)
    }

    /// Human readable label, taken from the first known title field.
    pub fn title(&self) -> Option<&str> {
        TITLE_FIELDS.iter().find_map(|name| self.str_field(name))
    }
}

impl Record for MenuRecord {
    fn id(&self) -> RecordId {
        self.id
    }

    fn parent_id(&self) -> Option<RecordId> {
        self.parent_id
    }

    fn order_num(&self) -> i64 {
        self.order_num
    }
}

impl<R: Record> Record for &R {
    fn id(&self) -> RecordId {
        (*self).id()
    }

    fn parent_id(&self) -> Option<RecordId> {
        (*self).parent_id()
    }

    fn order_num(&self) -> i64 {
        (*self).order_num()
    }
}
