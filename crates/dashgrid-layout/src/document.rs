#![forbid(unsafe_code)]

//! Serialized layout documents.
//!
//! A [`LayoutDocument`] is the persisted form of a root layout: a schema
//! version plus the tree. Loading checks the version and runs full layout
//! validation, so a [`Layout`] obtained from a document always satisfies
//! the size and nesting invariants.

use serde::{Deserialize, Serialize};

use crate::config::LayoutConfig;
use crate::tree::{Layout, LayoutModelError};

/// Version written by [`Layout::to_document`].
pub const LAYOUT_DOCUMENT_SCHEMA_VERSION: u16 = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutDocument {
    pub schema_version: u16,
    pub layout: Layout,
}

impl LayoutDocument {
    /// Parse a JSON document without validating it.
    pub fn from_json_str(input: &str) -> Result<Self, DocumentError> {
        serde_json::from_str(input).map_err(DocumentError::Json)
    }

    pub fn to_json_string(&self) -> Result<String, DocumentError> {
        serde_json::to_string(self).map_err(DocumentError::Json)
    }

    pub fn to_json_value(&self) -> Result<serde_json::Value, DocumentError> {
        serde_json::to_value(self).map_err(DocumentError::Json)
    }
}

impl Layout {
    /// Validate and unwrap a document.
    pub fn from_document(
        document: LayoutDocument,
        config: &LayoutConfig,
    ) -> Result<Layout, LayoutModelError> {
        if document.schema_version != LAYOUT_DOCUMENT_SCHEMA_VERSION {
            return Err(LayoutModelError::UnsupportedSchemaVersion {
                found: document.schema_version,
                expected: LAYOUT_DOCUMENT_SCHEMA_VERSION,
            });
        }
        document.layout.validate(config.max_nesting_depth)?;
        tracing::debug!(
            target: "dashgrid.document",
            sections = document.layout.section_count(),
            items = document.layout.item_count(),
            "layout document loaded"
        );
        Ok(document.layout)
    }

    /// Parse, then validate, a JSON document.
    pub fn from_json_document(input: &str, config: &LayoutConfig) -> Result<Layout, DocumentError> {
        let document = LayoutDocument::from_json_str(input)?;
        Layout::from_document(document, config).map_err(DocumentError::Invalid)
    }

    #[must_use]
    pub fn to_document(&self) -> LayoutDocument {
        LayoutDocument {
            schema_version: LAYOUT_DOCUMENT_SCHEMA_VERSION,
            layout: self.clone(),
        }
    }
}

/// Errors that can occur when reading or writing a document.
#[derive(Debug)]
pub enum DocumentError {
    Json(serde_json::Error),
    Invalid(LayoutModelError),
}

impl std::fmt::Display for DocumentError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Json(e) => write!(f, "JSON error: {e}"),
            Self::Invalid(e) => write!(f, "invalid layout document: {e}"),
        }
    }
}

impl std::error::Error for DocumentError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Json(e) => Some(e),
            Self::Invalid(e) => Some(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn document() -> serde_json::Value {
        json!({
            "schemaVersion": 1,
            "layout": {
                "sections": [
                    {
                        "header": { "title": "Overview" },
                        "items": [
                            {
                                "size": { "xl": { "gridWidth": 6, "heightAsRatio": 50 } },
                                "content": { "type": "widget", "identity": "w1", "kind": "insight" }
                            },
                            {
                                "size": {
                                    "xl": { "gridWidth": 12 },
                                    "md": { "gridWidth": 12, "gridHeight": 8 }
                                },
                                "content": {
                                    "type": "layout",
                                    "sections": [
                                        {
                                            "items": [
                                                {
                                                    "size": { "xl": { "gridWidth": 4, "gridHeight": 10 } },
                                                    "content": {
                                                        "type": "widget",
                                                        "identity": "w2",
                                                        "kind": "kpi",
                                                        "title": "Revenue"
                                                    }
                                                }
                                            ]
                                        }
                                    ]
                                }
                            }
                        ]
                    }
                ]
            }
        })
    }

    #[test]
    fn loads_and_reserializes_unchanged() {
        let raw = document();
        let parsed: LayoutDocument = serde_json::from_value(raw.clone()).expect("parse");
        let layout = Layout::from_document(parsed, &LayoutConfig::default()).expect("valid");
        assert_eq!(layout.depth(), 2);
        assert_eq!(layout.item_count(), 3);
        assert_eq!(layout.to_document().to_json_value().expect("serialize"), raw);
    }

    #[test]
    fn wrong_version_is_rejected() {
        let mut raw = document();
        raw["schemaVersion"] = json!(7);
        let parsed: LayoutDocument = serde_json::from_value(raw).expect("parse");
        assert_eq!(
            Layout::from_document(parsed, &LayoutConfig::default()),
            Err(LayoutModelError::UnsupportedSchemaVersion {
                found: 7,
                expected: LAYOUT_DOCUMENT_SCHEMA_VERSION
            })
        );
    }

    #[test]
    fn invalid_size_is_reported_with_path() {
        let mut raw = document();
        raw["layout"]["sections"][0]["items"][1]["content"]["sections"][0]["items"][0]["size"]
            ["xl"]["gridWidth"] = json!(14);
        let err = Layout::from_json_document(&raw.to_string(), &LayoutConfig::default())
            .expect_err("width 14");
        match err {
            DocumentError::Invalid(LayoutModelError::InvalidSize { path, .. }) => {
                assert_eq!(path.to_string(), "0_1-0_0");
            }
            other => panic!("unexpected error {other}"),
        }
    }

    #[test]
    fn depth_limit_applies() {
        let config = LayoutConfig {
            max_nesting_depth: 1,
            ..LayoutConfig::default()
        };
        let err = Layout::from_json_document(&document().to_string(), &config)
            .expect_err("too deep");
        assert!(matches!(
            err,
            DocumentError::Invalid(LayoutModelError::NestingTooDeep { depth: 2, max: 1 })
        ));
    }

    #[test]
    fn malformed_json_is_a_json_error() {
        let err = LayoutDocument::from_json_str("{ not json").expect_err("bad");
        assert!(matches!(err, DocumentError::Json(_)));
    }
}
