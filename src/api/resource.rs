use fake::Dummy;

/// Specifies the searchable entity collections exposed by the registry.
///
#[derive(Clone, Copy, Debug, Dummy, PartialEq, Eq, Hash)]
pub enum EntityType {
    Organization,
    Ministry,
    Region,
}

impl EntityType {
    /// All entity types in tab order.
    ///
    pub const ALL: [EntityType; 3] = [
        EntityType::Organization,
        EntityType::Ministry,
        EntityType::Region,
    ];

    /// Returns the lowercase tag used for the `entity_type` form field.
    ///
    pub fn tag(&self) -> &'static str {
        match self {
            EntityType::Organization => "organization",
            EntityType::Ministry => "ministry",
            EntityType::Region => "region",
        }
    }

    /// Returns the API search path for this collection.
    ///
    pub fn search_path(&self) -> &'static str {
        match self {
            EntityType::Organization => "/api/organizations",
            EntityType::Ministry => "/api/ministries",
            EntityType::Region => "/api/regions",
        }
    }

    /// Returns the name of the hidden form field carrying the selected id.
    ///
    pub fn field_name(&self) -> &'static str {
        match self {
            EntityType::Organization => "organization_id",
            EntityType::Ministry => "ministry_id",
            EntityType::Region => "region_id",
        }
    }

    /// Returns the display title for this collection.
    ///
    pub fn title(&self) -> &'static str {
        match self {
            EntityType::Organization => "Organizations",
            EntityType::Ministry => "Ministries",
            EntityType::Region => "Regions",
        }
    }

    /// Returns the next entity type in tab order, wrapping around.
    ///
    pub fn next(&self) -> EntityType {
        match self {
            EntityType::Organization => EntityType::Ministry,
            EntityType::Ministry => EntityType::Region,
            EntityType::Region => EntityType::Organization,
        }
    }

    /// Returns the previous entity type in tab order, wrapping around.
    ///
    pub fn prev(&self) -> EntityType {
        match self {
            EntityType::Organization => EntityType::Region,
            EntityType::Ministry => EntityType::Organization,
            EntityType::Region => EntityType::Ministry,
        }
    }
}

/// Defines a single search result row. Organizations carry their OKPO and
/// YNP codes and an optional owning ministry name; ministries and regions
/// only carry a name.
///
#[derive(Clone, Debug, Dummy, PartialEq, Eq)]
pub struct EntityHit {
    pub id: i64,
    pub name: String,
    pub okpo: Option<String>,
    pub ynp: Option<String>,
    pub ministry: Option<String>,
}

/// Defines a notification feed entry.
///
#[derive(Clone, Debug, Dummy, PartialEq, Eq)]
pub struct Notification {
    pub message: String,
    pub created_at: String,
    pub is_read: bool,
}
