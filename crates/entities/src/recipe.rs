//! Recipe entity definitions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Price, Tag};

/// A recipe owned by a single user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recipe {
    /// Store-assigned identifier; newer recipes have larger ids.
    pub id: i64,
    /// Owning user. Never changes after creation.
    pub user_id: Uuid,
    /// Recipe title.
    pub title: String,
    /// Preparation time in minutes.
    pub time_minutes: i32,
    /// Price with two fraction digits.
    pub price: Price,
    /// Optional external link; empty when unset.
    pub link: String,
    /// Optional long description; empty when unset.
    pub description: String,
    /// Tags attached to this recipe, all owned by `user_id`.
    pub tags: Vec<Tag>,
    /// When this record was created.
    pub created_at: DateTime<Utc>,
    /// When this record was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Recipe {
    /// Returns true if this recipe belongs to the given user.
    pub fn is_owned_by(&self, user_id: Uuid) -> bool {
        self.user_id == user_id
    }

    /// Returns the ids of the attached tags.
    pub fn tag_ids(&self) -> Vec<i64> {
        self.tags.iter().map(|t| t.id).collect()
    }
}

/// A recipe that has not been persisted yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRecipe {
    /// Owning user.
    pub user_id: Uuid,
    /// Recipe title.
    pub title: String,
    /// Preparation time in minutes.
    pub time_minutes: i32,
    /// Price with two fraction digits.
    pub price: Price,
    /// Optional external link.
    pub link: String,
    /// Optional long description.
    pub description: String,
    /// Tags to attach; must be owned by `user_id`.
    pub tags: Vec<Tag>,
}

impl NewRecipe {
    /// Creates a new recipe draft without link, description or tags.
    pub fn new(user_id: Uuid, title: impl Into<String>, time_minutes: i32, price: Price) -> Self {
        Self {
            user_id,
            title: title.into(),
            time_minutes,
            price,
            link: String::new(),
            description: String::new(),
            tags: Vec::new(),
        }
    }

    /// Sets the link.
    pub fn with_link(mut self, link: impl Into<String>) -> Self {
        self.link = link.into();
        self
    }

    /// Sets the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Sets the tags to attach.
    pub fn with_tags(mut self, tags: Vec<Tag>) -> Self {
        self.tags = tags;
        self
    }

    /// Materializes the draft with a store-assigned id.
    pub fn into_recipe(self, id: i64) -> Recipe {
        let now = Utc::now();
        Recipe {
            id,
            user_id: self.user_id,
            title: self.title,
            time_minutes: self.time_minutes,
            price: self.price,
            link: self.link,
            description: self.description,
            tags: self.tags,
            created_at: now,
            updated_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_recipe_builder() {
        let owner = Uuid::new_v4();
        let recipe = NewRecipe::new(owner, "Sample Recipe", 5, Price::from_cents(550))
            .with_link("http://example.com/recipe.pdf")
            .with_description("A sample recipe")
            .into_recipe(7);

        assert_eq!(recipe.id, 7);
        assert_eq!(recipe.title, "Sample Recipe");
        assert_eq!(recipe.link, "http://example.com/recipe.pdf");
        assert_eq!(recipe.description, "A sample recipe");
        assert!(recipe.is_owned_by(owner));
        assert!(!recipe.is_owned_by(Uuid::new_v4()));
        assert!(recipe.tags.is_empty());
    }
}
