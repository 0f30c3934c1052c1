//! Data Transfer Objects - request/response types for the API.

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

/// Body of a post create or replace request.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct BlogPostRequest {
    #[validate(
        length(min = 3, max = 32, message = "title must be between 3 and 32 characters"),
        custom(function = "validate_title")
    )]
    pub title: String,

    #[validate(length(max = 4096, message = "description must be at most 4096 characters"))]
    #[serde(default)]
    pub description: Option<String>,
}

/// Body of a comment create request.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CommentRequest {
    #[validate(length(min = 3, max = 24, message = "author must be between 3 and 24 characters"))]
    pub author: String,

    #[validate(length(max = 256, message = "content must be at most 256 characters"))]
    #[serde(default)]
    pub content: Option<String>,
}

/// Post as returned by the v1 API: no comments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlogPostSummary {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
}

/// Query string of the v2 list endpoints.
///
/// A missing or negative `pageIndex` on the plain list endpoint asks for the
/// whole collection.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageQuery {
    pub page_index: Option<i64>,
    pub page_size: Option<i64>,
}

/// Titles start with an uppercase letter followed by letters, digits,
/// whitespace or dashes.
pub fn validate_title(title: &str) -> Result<(), ValidationError> {
    let mut chars = title.chars();
    let starts_upper = chars.next().is_some_and(|c| c.is_ascii_uppercase());
    let rest_ok = chars.all(|c| c.is_ascii_alphanumeric() || c.is_whitespace() || c == '-');

    if starts_upper && rest_ok {
        Ok(())
    } else {
        let mut error = ValidationError::new("title_format");
        error.message = Some(
            "title should start with a capital letter and consist of letters, numbers, whitespaces and dashes"
                .into(),
        );
        Err(error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn post(title: &str) -> BlogPostRequest {
        BlogPostRequest {
            title: title.to_string(),
            description: None,
        }
    }

    #[test]
    fn test_title_rules() {
        assert!(post("Hello World").validate().is_ok());
        assert!(post("A-1 b").validate().is_ok());
        assert!(post("Ab").validate().is_err());
        assert!(post("hello").validate().is_err());
        assert!(post("Hello!").validate().is_err());
        assert!(post(&format!("T{}", "x".repeat(32))).validate().is_err());
    }

    #[test]
    fn test_description_limit() {
        let mut request = post("Valid");
        request.description = Some("d".repeat(4096));
        assert!(request.validate().is_ok());

        request.description = Some("d".repeat(4097));
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_comment_rules() {
        let ok = CommentRequest {
            author: "Bob".into(),
            content: Some("Nice".into()),
        };
        assert!(ok.validate().is_ok());

        let short_author = CommentRequest {
            author: "Al".into(),
            content: None,
        };
        assert!(short_author.validate().is_err());

        let long_content = CommentRequest {
            author: "Alice".into(),
            content: Some("c".repeat(257)),
        };
        assert!(long_content.validate().is_err());
    }

    #[test]
    fn test_page_query_camel_case() {
        let query: PageQuery =
            serde_json::from_str(r#"{"pageIndex": 2, "pageSize": 10}"#).unwrap();
        assert_eq!(query.page_index, Some(2));
        assert_eq!(query.page_size, Some(10));
    }
}
