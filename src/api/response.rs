//! Response shapes returned by the data bridges endpoints.

use crate::error::{LabelError, Result};
use crate::frame::frame_from_records;
use polars::prelude::DataFrame;
use serde_json::Value;

/// A decoded API response
///
/// Endpoints answer with a page object carrying `items` and `totalItems`,
/// a bare array of records, or a single record. The shape is resolved once
/// when the payload is decoded.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiResponse {
    Paged { items: Vec<Value>, total_items: usize },
    List(Vec<Value>),
    Single(Value),
}

impl ApiResponse {
    /// Resolve the shape of a decoded JSON payload
    pub fn from_json(value: Value) -> Result<Self> {
        match value {
            Value::Array(items) => Ok(ApiResponse::List(items)),
            Value::Object(mut object) => {
                let Some(items) = object.remove("items") else {
                    return Ok(ApiResponse::Single(Value::Object(object)));
                };
                let Value::Array(items) = items else {
                    return Err(LabelError::InvalidResponse {
                        reason: "'items' must be an array".to_string(),
                    });
                };
                let total_items = object
                    .get("totalItems")
                    .or_else(|| object.get("total_items"))
                    .and_then(Value::as_u64)
                    .map(|total| total as usize)
                    .unwrap_or(items.len());
                Ok(ApiResponse::Paged { items, total_items })
            }
            other => Err(LabelError::InvalidResponse {
                reason: format!("expected an object or an array, got {other}"),
            }),
        }
    }

    /// Decode and resolve a raw response body
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        Self::from_json(serde_json::from_slice(bytes)?)
    }

    /// Number of records carried by this response
    pub fn len(&self) -> usize {
        match self {
            ApiResponse::Paged { items, .. } | ApiResponse::List(items) => items.len(),
            ApiResponse::Single(_) => 1,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The response's records, one per output row
    pub fn into_items(self) -> Vec<Value> {
        match self {
            ApiResponse::Paged { items, .. } | ApiResponse::List(items) => items,
            ApiResponse::Single(item) => vec![item],
        }
    }

    pub fn to_frame(&self) -> Result<DataFrame> {
        match self {
            ApiResponse::Paged { items, .. } | ApiResponse::List(items) => {
                frame_from_records(items)
            }
            ApiResponse::Single(item) => frame_from_records(std::slice::from_ref(item)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_paged_shape() {
        let response = ApiResponse::from_json(json!({
            "items": [{"id": 1}, {"id": 2}],
            "page": 1,
            "totalItems": 40
        }))
        .unwrap();

        match &response {
            ApiResponse::Paged { items, total_items } => {
                assert_eq!(items.len(), 2);
                assert_eq!(*total_items, 40);
            }
            other => panic!("Expected Paged response, got {other:?}"),
        }
        assert_eq!(response.to_frame().unwrap().height(), 2);
    }

    #[test]
    fn test_paged_without_total_uses_item_count() {
        let response = ApiResponse::from_json(json!({"items": [{"id": 1}]})).unwrap();
        assert_eq!(
            response,
            ApiResponse::Paged {
                items: vec![json!({"id": 1})],
                total_items: 1
            }
        );
    }

    #[test]
    fn test_list_shape() {
        let response = ApiResponse::from_slice(br#"[{"id": 1}, {"id": 2}, {"id": 3}]"#).unwrap();
        assert!(matches!(response, ApiResponse::List(_)));
        assert_eq!(response.len(), 3);
    }

    #[test]
    fn test_single_shape_becomes_one_row() {
        let response =
            ApiResponse::from_json(json!({"region": "Global", "peopleInNeed": 300})).unwrap();
        assert!(matches!(response, ApiResponse::Single(_)));

        let df = response.to_frame().unwrap();
        assert_eq!(df.height(), 1);
        assert_eq!(response.into_items().len(), 1);
    }

    #[test]
    fn test_invalid_shapes() {
        assert!(matches!(
            ApiResponse::from_json(json!(42)).unwrap_err(),
            LabelError::InvalidResponse { .. }
        ));
        assert!(matches!(
            ApiResponse::from_json(json!({"items": "none"})).unwrap_err(),
            LabelError::InvalidResponse { .. }
        ));
    }

    #[test]
    fn test_empty_list_frame() {
        let response = ApiResponse::List(Vec::new());
        assert!(response.is_empty());
        assert_eq!(response.to_frame().unwrap().height(), 0);
    }
}
