//! Catalog record definitions.
//!
//! Defines [`SlideId`] (the opaque slide identifier), [`Slide`] (one catalog
//! entry as returned by the REST and search endpoints), [`FilterOptions`] (the
//! template/section vocabulary) and [`SlideUrl`] (the signed-URL exchange
//! result).

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};

/// Opaque slide identifier.
///
/// Catalog rows use integer keys, but the backend is free to hand out string
/// ids; both are accepted and written back in the shape they were read in.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SlideId {
    Int(i64),
    Text(String),
}

impl std::fmt::Display for SlideId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Int(id) => write!(f, "{id}"),
            Self::Text(id) => f.write_str(id),
        }
    }
}

impl std::str::FromStr for SlideId {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.parse::<i64>() {
            Ok(id) => Self::Int(id),
            Err(_) => Self::Text(s.to_string()),
        })
    }
}

impl From<i64> for SlideId {
    fn from(id: i64) -> Self {
        Self::Int(id)
    }
}

impl From<&str> for SlideId {
    fn from(id: &str) -> Self {
        Self::Text(id.to_string())
    }
}

/// A catalog entry, matching a row of the `slides` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Slide {
    pub id: SlideId,
    /// Display title.
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    /// `null` entries inside the array are dropped.
    #[serde(default, deserialize_with = "tags_skipping_nulls")]
    pub tags: Option<Vec<String>>,
    #[serde(default)]
    pub template_type: Option<String>,
    /// Only meaningful together with `template_type`.
    #[serde(default)]
    pub section_name: Option<String>,
    /// Preview image URL.
    #[serde(default)]
    pub thumb_url: Option<String>,
    /// Public asset URL. Private assets go through [`SlideUrl`] instead.
    #[serde(default)]
    pub file_url: Option<String>,
    /// Vector produced by the embedding job. Never interpreted client-side.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub embedding: Option<serde_json::Value>,
}

fn tags_skipping_nulls<'de, D>(deserializer: D) -> Result<Option<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    let tags = Option::<Vec<Option<String>>>::deserialize(deserializer)?;
    Ok(tags.map(|tags| tags.into_iter().flatten().collect()))
}

impl Slide {
    pub fn new(id: impl Into<SlideId>) -> Self {
        Self {
            id: id.into(),
            name: None,
            description: None,
            tags: None,
            template_type: None,
            section_name: None,
            thumb_url: None,
            file_url: None,
            embedding: None,
        }
    }

    pub fn name(&self) -> &str {
        self.name.as_deref().unwrap_or_default()
    }

    pub fn description(&self) -> &str {
        self.description.as_deref().unwrap_or_default()
    }

    pub fn tags(&self) -> &[String] {
        self.tags.as_deref().unwrap_or_default()
    }
}

/// Template types and, per template, the sections that exist under it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterOptions {
    #[serde(default)]
    pub template_types: Vec<String>,
    #[serde(default)]
    pub sections_by_template: BTreeMap<String, Vec<String>>,
}

impl FilterOptions {
    pub fn sections_for(&self, template: &str) -> &[String] {
        self.sections_by_template
            .get(template)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }
}

/// Result of exchanging a slide id for a short-lived download URL.
///
/// The URL is valid for a few minutes and is meant for exactly one download.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlideUrl {
    pub url: String,
    /// Host-internal id of the single slide to take from the source deck.
    #[serde(rename = "slideId", default)]
    pub host_slide_id: Option<String>,
    /// Position of that slide inside the source deck.
    #[serde(rename = "slideIndex", default)]
    pub slide_index: Option<u32>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn slide_id_accepts_numbers_and_strings() {
        let ids: Vec<SlideId> = serde_json::from_value(json!([7, "abc-1"])).unwrap();
        assert_eq!(ids, vec![SlideId::Int(7), SlideId::Text("abc-1".into())]);
        assert_eq!(serde_json::to_value(&ids[0]).unwrap(), json!(7));
        assert_eq!("42".parse::<SlideId>().unwrap(), SlideId::Int(42));
        assert_eq!("x42".parse::<SlideId>().unwrap(), SlideId::Text("x42".into()));
    }

    #[test]
    fn sparse_slide_row_deserializes() {
        let slide: Slide = serde_json::from_value(json!({
            "id": 3,
            "name": "Pricing",
            "tags": null,
            "embedding": "[0.1,0.2]",
            "created_at": "2025-01-01T00:00:00Z"
        }))
        .unwrap();
        assert_eq!(slide.id, SlideId::Int(3));
        assert_eq!(slide.name(), "Pricing");
        assert_eq!(slide.description(), "");
        assert!(slide.tags().is_empty());
        assert!(slide.embedding.is_some());
    }

    #[test]
    fn null_tag_entries_are_dropped() {
        let slide: Slide = serde_json::from_value(json!({
            "id": 1,
            "tags": ["sales", null, "intro"]
        }))
        .unwrap();
        assert_eq!(slide.tags(), ["sales".to_string(), "intro".to_string()]);
    }

    #[test]
    fn slide_url_reads_host_fields() {
        let url: SlideUrl = serde_json::from_value(json!({
            "url": "https://x/signed?token=1",
            "slideId": "257#",
            "slideIndex": 2
        }))
        .unwrap();
        assert_eq!(url.host_slide_id.as_deref(), Some("257#"));
        assert_eq!(url.slide_index, Some(2));

        let bare: SlideUrl = serde_json::from_value(json!({ "url": "https://x" })).unwrap();
        assert!(bare.host_slide_id.is_none());
    }

    #[test]
    fn sections_for_unknown_template_is_empty() {
        let options: FilterOptions = serde_json::from_value(json!({
            "template_types": ["Sales"],
            "sections_by_template": { "Sales": ["Intro", "Pricing"] }
        }))
        .unwrap();
        assert_eq!(options.sections_for("Sales").len(), 2);
        assert!(options.sections_for("HR").is_empty());
    }
}
