// Partition membership of one search space
use crate::cache::{Resource, ResourceCache};
use crate::display::Selectable;
use crate::error::CacheError;
use crate::transport::ConnectionServer;
use crate::xml::{parse_or_default, FieldMap, PropertyDump};
use serde::Serialize;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct SearchSpaceMember {
    pub object_id: String,
    pub search_space_object_id: String,
    pub partition_object_id: String,
    pub partition_name: String,
    pub sort_order: i32,
}

pub type SearchSpaceMembers = ResourceCache<SearchSpaceMember>;

impl SearchSpaceMember {
    pub fn members_of(
        server: &ConnectionServer,
        search_space_id: &str,
    ) -> Result<SearchSpaceMembers, CacheError> {
        let path = format!("/searchspaces/{}{}", search_space_id, Self::COLLECTION_PATH);
        SearchSpaceMembers::load_at(server, &path)
    }
}

impl SearchSpaceMembers {
    // Ascending sort order is the order partitions are searched
    pub fn in_search_order(&self) -> Vec<&SearchSpaceMember> {
        let mut members: Vec<&SearchSpaceMember> = self.iter().collect();
        members.sort_by_key(|m| m.sort_order);
        members
    }
}

impl FieldMap for SearchSpaceMember {
    fn set_field(&mut self, name: &str, value: &str) {
        match name {
            "ObjectId" => self.object_id = value.to_string(),
            "SearchSpaceObjectId" => self.search_space_object_id = value.to_string(),
            "PartitionObjectId" => self.partition_object_id = value.to_string(),
            "PartitionName" => self.partition_name = value.to_string(),
            "SortOrder" => self.sort_order = parse_or_default(value),
            _ => (),
        }
    }
}

impl PropertyDump for SearchSpaceMember {
    fn properties(&self) -> Vec<(&'static str, String)> {
        vec![
            ("ObjectId", self.object_id.clone()),
            ("SearchSpaceObjectId", self.search_space_object_id.clone()),
            ("PartitionObjectId", self.partition_object_id.clone()),
            ("PartitionName", self.partition_name.clone()),
            ("SortOrder", self.sort_order.to_string()),
        ]
    }
}

impl Resource for SearchSpaceMember {
    type Key = String;
    const RESOURCE_NAME: &'static str = "SearchSpaceMember";
    const ELEMENT_NAME: &'static str = "SearchSpaceMember";
    const COLLECTION_PATH: &'static str = "/searchspacemembers";

    fn key(&self) -> String {
        self.object_id.clone()
    }
}

impl Selectable for SearchSpaceMember {
    fn unique_identifier(&self) -> String {
        self.object_id.clone()
    }

    fn selection_display_string(&self) -> String {
        self.partition_name.clone()
    }
}
