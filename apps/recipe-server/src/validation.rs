//! Request body validation.
//!
//! Checks accumulate per field in a [`Validator`] so a single response can
//! report every problem with the submitted body.

use std::sync::LazyLock;

use api_protocol::{requests::RecipeRequest, FieldErrors};

use crate::error::{ServerError, ServerResult};

/// Longest accepted value for bounded text fields.
pub const MAX_FIELD_LENGTH: usize = 255;

const REQUIRED: &str = "This field is required.";
const BLANK: &str = "This field may not be blank.";

static EMAIL_RE: LazyLock<regex::Regex> = LazyLock::new(|| {
    regex::Regex::new(r"^[^\s@]+@[^\s@.]+(\.[^\s@.]+)*$").expect("regex pattern is valid")
});

/// Collects field-level validation messages.
#[derive(Debug, Default)]
pub struct Validator {
    errors: FieldErrors,
}

impl Validator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a message against `field`.
    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.errors
            .entry(field.to_string())
            .or_default()
            .push(message.into());
    }

    /// Fails with [`ServerError::Validation`] if any message was recorded.
    pub fn finish(self) -> ServerResult<()> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(ServerError::Validation(self.errors))
        }
    }

    /// Checks a required, bounded text field. Returns false if a message was
    /// recorded.
    pub fn text(&mut self, field: &str, value: &str) -> bool {
        if value.trim().is_empty() {
            self.add(field, BLANK);
            return false;
        }
        self.max_length(field, value)
    }

    /// Checks an optional, bounded text field.
    pub fn max_length(&mut self, field: &str, value: &str) -> bool {
        if value.chars().count() > MAX_FIELD_LENGTH {
            self.add(
                field,
                format!("Ensure this field has no more than {MAX_FIELD_LENGTH} characters."),
            );
            return false;
        }
        true
    }

    pub fn email(&mut self, field: &str, value: &str) {
        if self.text(field, value) && !EMAIL_RE.is_match(value) {
            self.add(field, "Enter a valid email address.");
        }
    }

    pub fn password(&mut self, field: &str, value: &str, min_length: usize) {
        if value.is_empty() {
            self.add(field, BLANK);
        } else if value.chars().count() < min_length {
            self.add(
                field,
                format!("Ensure this field has at least {min_length} characters."),
            );
        }
    }

    /// Records `This field is required.` when a required field is absent.
    pub fn require<T>(&mut self, field: &str, value: Option<&T>, required: bool) {
        if required && value.is_none() {
            self.add(field, REQUIRED);
        }
    }
}

/// Validates a recipe body. `partial` bodies (PATCH) may omit any field.
pub fn validate_recipe(request: &RecipeRequest, partial: bool) -> ServerResult<()> {
    let mut v = Validator::new();

    v.require("title", request.title.as_ref(), !partial);
    v.require("time_minutes", request.time_minutes.as_ref(), !partial);
    v.require("price", request.price.as_ref(), !partial);

    if let Some(title) = &request.title {
        v.text("title", title);
    }
    if let Some(link) = &request.link {
        v.max_length("link", link);
    }
    if let Some(tags) = &request.tags {
        for tag in tags {
            v.text("tags", &tag.name);
        }
    }

    v.finish()
}
