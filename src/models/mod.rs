use std::fmt::Display;

use serde::{Deserialize, Serialize};

/// One row of an IMDb list export, trimmed and ready for processing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportRecord {
    /// Title text, e.g. "The Matrix"
    pub title: String,
    /// Free-text type label from the export, e.g. "Movie", "TV Series"
    pub title_type: String,
    /// Year field as exported; may be blank or non-numeric
    pub year: String,
}

/// JustWatch object type used in search filters
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ObjectType {
    Movie,
    Show,
}

impl ObjectType {
    /// Maps an IMDb title-type label to a JustWatch object type.
    ///
    /// Keyword matching is deliberate: "Movie" also catches "tvMovie",
    /// "Series" also catches "tvSeries" and "miniSeries". Anything else
    /// (documentaries, shorts, video games) is unsupported and the caller
    /// must skip the record.
    pub fn from_export_label(label: &str) -> Option<Self> {
        if label.contains("Movie") {
            return Some(ObjectType::Movie);
        }
        if label.contains("Series") {
            return Some(ObjectType::Show);
        }
        tracing::warn!(title_type = %label, "Unsupported IMDb title type, skipping");
        None
    }
}

impl Display for ObjectType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ObjectType::Movie => write!(f, "MOVIE"),
            ObjectType::Show => write!(f, "SHOW"),
        }
    }
}

/// Best catalog match for an exported row: the first edge of a ranked
/// single-result search, trusted without secondary verification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogMatch {
    /// Opaque JustWatch title id, e.g. "tm92641"
    pub id: String,
    pub object_type: Option<ObjectType>,
    pub title: String,
    pub release_year: Option<i32>,
}

// ============================================================================
// JustWatch GraphQL Wire Types
// ============================================================================

/// Top-level GraphQL response envelope
#[derive(Debug, Deserialize)]
pub struct GraphqlResponse<T> {
    pub data: Option<T>,
}

/// `data` payload of the `GetSearchTitles` query
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchData {
    pub popular_titles: Option<PopularTitles>,
}

#[derive(Debug, Deserialize)]
pub struct PopularTitles {
    #[serde(default)]
    pub edges: Vec<TitleEdge>,
}

#[derive(Debug, Deserialize)]
pub struct TitleEdge {
    pub node: TitleNode,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TitleNode {
    pub id: String,
    #[serde(default)]
    pub object_type: Option<ObjectType>,
    pub content: TitleContent,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TitleContent {
    pub title: String,
    #[serde(default)]
    pub original_release_year: Option<i32>,
}

impl From<TitleNode> for CatalogMatch {
    fn from(node: TitleNode) -> Self {
        CatalogMatch {
            id: node.id,
            object_type: node.object_type,
            title: node.content.title,
            release_year: node.content.original_release_year,
        }
    }
}

/// `data` payload of the `SetInWatchlist` mutation
#[derive(Debug, Deserialize)]
pub struct SetInWatchlistData {
    #[serde(rename = "setInWatchlistV2")]
    pub set_in_watchlist: Option<MutationPayload>,
}

/// `data` payload of the `SetInSeenlist` mutation
#[derive(Debug, Deserialize)]
pub struct SetInSeenlistData {
    #[serde(rename = "setInSeenlist")]
    pub set_in_seenlist: Option<MutationPayload>,
}

/// A mutation is acknowledged only when the catalog echoes the title back
#[derive(Debug, Deserialize)]
pub struct MutationPayload {
    pub title: Option<TitleRef>,
}

#[derive(Debug, Deserialize)]
pub struct TitleRef {
    pub id: String,
}

impl SetInWatchlistData {
    pub fn acknowledged_title(&self) -> Option<&TitleRef> {
        self.set_in_watchlist.as_ref().and_then(|p| p.title.as_ref())
    }
}

impl SetInSeenlistData {
    pub fn acknowledged_title(&self) -> Option<&TitleRef> {
        self.set_in_seenlist.as_ref().and_then(|p| p.title.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_map_movie_labels() {
        assert_eq!(
            ObjectType::from_export_label("Movie"),
            Some(ObjectType::Movie)
        );
        assert_eq!(
            ObjectType::from_export_label("tvMovie"),
            Some(ObjectType::Movie)
        );
    }

    #[test]
    fn test_map_series_labels() {
        assert_eq!(
            ObjectType::from_export_label("TV Series"),
            Some(ObjectType::Show)
        );
        assert_eq!(
            ObjectType::from_export_label("tvSeries"),
            Some(ObjectType::Show)
        );
        assert_eq!(
            ObjectType::from_export_label("miniSeries"),
            Some(ObjectType::Show)
        );
    }

    #[test]
    fn test_map_movie_rule_wins_over_series() {
        // Both keywords present: the Movie rule is checked first
        assert_eq!(
            ObjectType::from_export_label("Movie Series"),
            Some(ObjectType::Movie)
        );
    }

    #[test]
    fn test_map_unsupported_labels() {
        assert_eq!(ObjectType::from_export_label("Documentary"), None);
        assert_eq!(ObjectType::from_export_label("Short"), None);
        assert_eq!(ObjectType::from_export_label("Video Game"), None);
        assert_eq!(ObjectType::from_export_label(""), None);
    }

    #[test]
    fn test_map_is_case_sensitive() {
        assert_eq!(ObjectType::from_export_label("movie"), None);
        assert_eq!(ObjectType::from_export_label("series"), None);
    }

    #[test]
    fn test_object_type_wire_serialization() {
        assert_eq!(
            serde_json::to_string(&ObjectType::Movie).unwrap(),
            "\"MOVIE\""
        );
        assert_eq!(
            serde_json::to_string(&ObjectType::Show).unwrap(),
            "\"SHOW\""
        );
    }

    #[test]
    fn test_search_response_deserialization() {
        let json = r#"{
            "data": {
                "popularTitles": {
                    "edges": [
                        {
                            "node": {
                                "id": "tm92641",
                                "objectType": "MOVIE",
                                "content": {
                                    "title": "The Matrix",
                                    "originalReleaseYear": 1999
                                }
                            }
                        }
                    ]
                }
            }
        }"#;

        let response: GraphqlResponse<SearchData> = serde_json::from_str(json).unwrap();
        let edges = response
            .data
            .unwrap()
            .popular_titles
            .unwrap()
            .edges;
        assert_eq!(edges.len(), 1);

        let matched = CatalogMatch::from(edges.into_iter().next().unwrap().node);
        assert_eq!(matched.id, "tm92641");
        assert_eq!(matched.object_type, Some(ObjectType::Movie));
        assert_eq!(matched.title, "The Matrix");
        assert_eq!(matched.release_year, Some(1999));
    }

    #[test]
    fn test_search_response_empty_edges() {
        let json = r#"{"data": {"popularTitles": {"edges": []}}}"#;
        let response: GraphqlResponse<SearchData> = serde_json::from_str(json).unwrap();
        assert!(response
            .data
            .unwrap()
            .popular_titles
            .unwrap()
            .edges
            .is_empty());
    }

    #[test]
    fn test_watchlist_ack_present() {
        let json = r#"{"data": {"setInWatchlistV2": {"title": {"id": "tm92641"}}}}"#;
        let response: GraphqlResponse<SetInWatchlistData> = serde_json::from_str(json).unwrap();
        let data = response.data.unwrap();
        assert_eq!(data.acknowledged_title().unwrap().id, "tm92641");
    }

    #[test]
    fn test_watchlist_ack_missing_title() {
        let json = r#"{"data": {"setInWatchlistV2": {"title": null}}}"#;
        let response: GraphqlResponse<SetInWatchlistData> = serde_json::from_str(json).unwrap();
        assert!(response.data.unwrap().acknowledged_title().is_none());
    }

    #[test]
    fn test_seenlist_ack_null_data() {
        // GraphQL errors come back as {"data": null, "errors": [...]}
        let json = r#"{"data": null, "errors": [{"message": "unauthorized"}]}"#;
        let response: GraphqlResponse<SetInSeenlistData> = serde_json::from_str(json).unwrap();
        assert!(response.data.is_none());
    }
}
