/// Payloads exchanged with the library API
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Uniform response wrapper of every `/api/v1` endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Envelope {
    #[serde(default)]
    pub ok: bool,
    #[serde(default)]
    pub data: Value,
    #[serde(default)]
    pub error: Option<EnvelopeError>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct EnvelopeError {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum NodeType {
    #[default]
    Node,
    Book,
    Story,
}

/// `kind` filter of a library listing.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum KindFilter {
    #[default]
    All,
    Node,
    Book,
    Story,
}

impl KindFilter {
    pub fn as_str(&self) -> &'static str {
        match self {
            KindFilter::All => "all",
            KindFilter::Node => "node",
            KindFilter::Book => "book",
            KindFilter::Story => "story",
        }
    }

    pub fn parse(value: &str) -> KindFilter {
        match value.trim().to_lowercase().as_str() {
            "node" => KindFilter::Node,
            "book" => KindFilter::Book,
            "story" => KindFilter::Story,
            _ => KindFilter::All,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct Breadcrumb {
    pub name: String,
    pub path: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct NodeRef {
    pub path_rel: String,
    pub name: String,
    pub node_type: NodeType,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct StorySummary {
    pub story_rel_path: String,
    pub story_id: String,
    pub title: String,
    pub status: String,
    pub book_rel_path: String,
    pub pages: u32,
    pub slots: u32,
    pub alternatives: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct LibraryChild {
    pub path_rel: String,
    pub name: String,
    pub node_type: NodeType,
    pub story: Option<StorySummary>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct ListingFilters {
    pub q: String,
    pub kind: String,
    pub status: String,
}

/// Result of `GET /library/node`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct LibraryListing {
    pub node: NodeRef,
    pub breadcrumbs: Vec<Breadcrumb>,
    pub children: Vec<LibraryChild>,
    pub filters: ListingFilters,
    pub counts: Value,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct StoryMeta {
    pub story_rel_path: String,
    pub story_id: String,
    pub title: String,
    pub status: String,
    pub schema_version: String,
    pub book_rel_path: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct Pagination {
    pub page_numbers: Vec<u32>,
    pub selected_page: u32,
    pub prev_page: Option<u32>,
    pub next_page: Option<u32>,
    pub missing_pages: Vec<u32>,
}

/// Original and edited versions of a text.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct Revision {
    pub original: String,
    pub current: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct Alternative {
    pub id: String,
    pub slug: String,
    pub asset_rel_path: String,
    pub mime_type: String,
    pub status: String,
    pub created_at: String,
    pub notes: String,
    pub image_exists: bool,
    pub image_url: Option<String>,
    pub is_active: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct Slot {
    pub slot_name: String,
    pub status: String,
    pub prompt: Revision,
    pub active_id: String,
    pub definitive_image_url: Option<String>,
    pub alternatives: Vec<Alternative>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct StoryPage {
    pub page_number: u32,
    pub status: String,
    pub text: Revision,
    pub slots: Vec<Slot>,
}

/// Result of `GET /stories/<path>` and of every page/slot mutation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct StoryDetail {
    pub story: StoryMeta,
    pub pagination: Pagination,
    pub page: Option<StoryPage>,
    pub breadcrumbs: Vec<Breadcrumb>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct Health {
    pub library_root_exists: bool,
    pub library_root: String,
    pub storage_mode: String,
}

/// Editable fields of a page, sent with PATCH.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct PageEdit {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_current: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub main_prompt_current: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secondary_prompt_current: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_envelope_tolerates_missing_fields() {
        let envelope: Envelope = serde_json::from_value(json!({"ok": true})).unwrap();

        assert!(envelope.ok);
        assert_eq!(envelope.data, Value::Null);
        assert!(envelope.error.is_none());
    }

    #[test]
    fn test_library_listing_deserialization() {
        let listing: LibraryListing = serde_json::from_value(json!({
            "node": {"path_rel": "clasicos", "name": "clasicos", "node_type": "book"},
            "breadcrumbs": [{"name": "biblioteca", "path": ""}, {"name": "clasicos", "path": "clasicos"}],
            "children": [{
                "path_rel": "clasicos/caperucita",
                "name": "caperucita",
                "node_type": "story",
                "story": {"title": "Caperucita", "status": "ready", "pages": 12}
            }],
            "filters": {"q": "", "kind": "all", "status": "all"},
            "counts": {"stories": 1}
        }))
        .unwrap();

        assert_eq!(listing.node.node_type, NodeType::Book);
        assert_eq!(listing.breadcrumbs.len(), 2);
        let story = listing.children[0].story.as_ref().unwrap();
        assert_eq!(story.title, "Caperucita");
        assert_eq!(story.pages, 12);
        assert_eq!(story.slots, 0);
    }

    #[test]
    fn test_story_detail_deserialization() {
        let detail: StoryDetail = serde_json::from_value(json!({
            "story": {"story_rel_path": "clasicos/caperucita", "title": "Caperucita"},
            "pagination": {"page_numbers": [1, 2, 4], "selected_page": 2, "prev_page": 1, "next_page": 4, "missing_pages": [3]},
            "page": {
                "page_number": 2,
                "text": {"original": "Habia una vez", "current": "Habia una vez..."},
                "slots": [{
                    "slot_name": "main",
                    "active_id": "alt-1",
                    "definitive_image_url": null,
                    "alternatives": [{"id": "alt-1", "image_exists": true, "image_url": "/media/a.png", "is_active": true}]
                }]
            },
            "breadcrumbs": []
        }))
        .unwrap();

        assert_eq!(detail.pagination.missing_pages, vec![3]);
        assert_eq!(detail.pagination.next_page, Some(4));
        let page = detail.page.unwrap();
        assert_eq!(page.text.current, "Habia una vez...");
        assert!(page.slots[0].alternatives[0].is_active);
        assert!(page.slots[0].definitive_image_url.is_none());
    }

    #[test]
    fn test_page_edit_skips_unset_fields() {
        let edit = PageEdit {
            text_current: Some("Nuevo texto".to_string()),
            ..PageEdit::default()
        };

        assert_eq!(serde_json::to_value(&edit).unwrap(), json!({"text_current": "Nuevo texto"}));
    }

    #[test]
    fn test_kind_filter_parse() {
        assert_eq!(KindFilter::parse("Story"), KindFilter::Story);
        assert_eq!(KindFilter::parse("whatever"), KindFilter::All);
        assert_eq!(KindFilter::Book.as_str(), "book");
    }
}
