//! Core types for ArticleKit

use schemars::gen::SchemaGenerator;
use schemars::schema::{InstanceType, Schema, SchemaObject, StringValidation, SubschemaValidation};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize, Serializer};
use std::collections::BTreeSet;

/// Request to extract the article behind a URL
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct ExtractionRequest {
    /// The URL to fetch (required, must be http:// or https://)
    pub url: String,
}

impl ExtractionRequest {
    /// Create a new request with the given URL
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }
}

/// Fetched HTML together with the URL it came from
#[derive(Debug, Clone)]
pub struct RawDocument {
    url: String,
    html: String,
}

impl RawDocument {
    pub fn new(url: impl Into<String>, html: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            html: html.into(),
        }
    }

    /// Originating URL
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Decoded HTML text
    pub fn html(&self) -> &str {
        &self.html
    }
}

/// Primary image candidate picked by the document analyzer
///
/// Unknown values serialize as `""` to keep the wire shape stable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct TopImage {
    /// Image URL, absolute when the page URL allowed resolving it
    pub image_src: String,

    /// Height in pixels
    #[serde(serialize_with = "number_or_empty")]
    #[schemars(schema_with = "number_or_empty_schema")]
    pub image_height: Option<u32>,

    /// Width in pixels
    #[serde(serialize_with = "number_or_empty")]
    #[schemars(schema_with = "number_or_empty_schema")]
    pub image_width: Option<u32>,

    /// How the image was located: "opengraph", "linktag" or "bigimage"
    pub image_extraction_type: String,

    /// Size of the image file; images are never downloaded, so this stays unknown
    #[serde(serialize_with = "number_or_empty")]
    #[schemars(schema_with = "number_or_empty_schema")]
    pub image_bytes: Option<u64>,
}

/// Structured article fields produced by a document analyzer
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ArticleFields {
    pub title: String,
    pub meta_description: String,
    pub meta_keywords: Vec<String>,
    pub canonical_link: String,
    pub domain: String,
    pub tags: BTreeSet<String>,
    pub links: Vec<String>,
    pub videos: Vec<String>,
    /// Cleaned body text, one block per paragraph
    pub article_text: String,
    /// Same value as `tags`
    pub entities: BTreeSet<String>,
    pub top_image: TopImage,
}

/// Successful extraction: article fields plus the resolved main image
#[derive(Debug, Clone, PartialEq, Eq, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ExtractionResult {
    #[serde(flatten)]
    pub article: ArticleFields,

    /// Output of the main-image resolver, possibly empty
    pub main_image: String,
}

/// Error body returned to clients
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ErrorResult {
    pub error: String,
}

impl ErrorResult {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

/// Outcome of running the pipeline over a fetched document
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Extraction {
    Article(Box<ExtractionResult>),
    /// The analyzer gave up on the document
    Failed(ErrorResult),
}

impl Extraction {
    /// Article result, if the analyzer succeeded
    pub fn article(&self) -> Option<&ExtractionResult> {
        match self {
            Extraction::Article(result) => Some(result),
            Extraction::Failed(_) => None,
        }
    }

    /// Error message, if the analyzer failed
    pub fn error(&self) -> Option<&str> {
        match self {
            Extraction::Article(_) => None,
            Extraction::Failed(err) => Some(&err.error),
        }
    }
}

fn number_or_empty<T, S>(value: &Option<T>, serializer: S) -> Result<S::Ok, S::Error>
where
    T: Serialize,
    S: Serializer,
{
    match value {
        Some(v) => v.serialize(serializer),
        None => serializer.serialize_str(""),
    }
}

/// Schema matching `number_or_empty`: a non-negative integer or `""`
fn number_or_empty_schema(gen: &mut SchemaGenerator) -> Schema {
    let empty = SchemaObject {
        instance_type: Some(InstanceType::String.into()),
        string: Some(Box::new(StringValidation {
            max_length: Some(0),
            ..Default::default()
        })),
        ..Default::default()
    };
    SchemaObject {
        subschemas: Some(Box::new(SubschemaValidation {
            any_of: Some(vec![gen.subschema_for::<u64>(), empty.into()]),
            ..Default::default()
        })),
        ..Default::default()
    }
    .into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_builder() {
        let req = ExtractionRequest::new("https://example.com");
        assert_eq!(req.url, "https://example.com");
    }

    #[test]
    fn test_empty_top_image_serializes_blank_strings() {
        let value = serde_json::to_value(TopImage::default()).unwrap();
        assert_eq!(
            value,
            json!({
                "imageSrc": "",
                "imageHeight": "",
                "imageWidth": "",
                "imageExtractionType": "",
                "imageBytes": ""
            })
        );
    }

    #[test]
    fn test_known_dimensions_serialize_as_numbers() {
        let image = TopImage {
            image_src: "https://example.com/a.jpg".to_string(),
            image_height: Some(400),
            image_width: Some(600),
            image_extraction_type: "opengraph".to_string(),
            image_bytes: None,
        };
        let value = serde_json::to_value(image).unwrap();
        assert_eq!(value["imageHeight"], 400);
        assert_eq!(value["imageWidth"], 600);
        assert_eq!(value["imageBytes"], "");
    }

    #[test]
    fn test_top_image_schema_allows_blank_numbers() {
        let schema = serde_json::to_value(schemars::schema_for!(TopImage)).unwrap();
        for key in ["imageHeight", "imageWidth", "imageBytes"] {
            let any_of = schema["properties"][key]["anyOf"]
                .as_array()
                .unwrap_or_else(|| panic!("{key} has no anyOf"));
            assert!(any_of.iter().any(|s| s["type"] == "integer"), "{key}");
            assert!(
                any_of
                    .iter()
                    .any(|s| s["type"] == "string" && s["maxLength"] == 0),
                "{key}"
            );
        }
    }

    #[test]
    fn test_result_field_names() {
        let mut article = ArticleFields {
            title: "Title".to_string(),
            ..Default::default()
        };
        article.tags.insert("rust".to_string());
        article.entities = article.tags.clone();

        let result = Extraction::Article(Box::new(ExtractionResult {
            article,
            main_image: String::new(),
        }));
        let value = serde_json::to_value(&result).unwrap();

        for key in [
            "title",
            "metaDescription",
            "metaKeywords",
            "canonicalLink",
            "domain",
            "tags",
            "links",
            "videos",
            "articleText",
            "entities",
            "topImage",
            "mainImage",
        ] {
            assert!(value.get(key).is_some(), "missing key {key}");
        }
        assert_eq!(value["tags"], json!(["rust"]));
        assert_eq!(value["entities"], value["tags"]);
        assert_eq!(value["mainImage"], "");
    }

    #[test]
    fn test_failed_extraction_shape() {
        let failed = Extraction::Failed(ErrorResult::new("Error extracting article: x"));
        assert_eq!(
            serde_json::to_value(&failed).unwrap(),
            json!({"error": "Error extracting article: x"})
        );
        assert_eq!(failed.error(), Some("Error extracting article: x"));
        assert!(failed.article().is_none());
    }
}
