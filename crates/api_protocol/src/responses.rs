//! API response bodies.

use entities::{Price, Recipe, Tag, User};
use serde::{Deserialize, Serialize};

// ============================================================================
// User Responses
// ============================================================================

/// Public view of an account. Never carries the password.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserResponse {
    pub email: String,
    pub name: String,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            email: user.email.clone(),
            name: user.name.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    pub token: String,
}

// ============================================================================
// Recipe Responses
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagResponse {
    pub id: i64,
    pub name: String,
}

impl From<&Tag> for TagResponse {
    fn from(tag: &Tag) -> Self {
        Self {
            id: tag.id,
            name: tag.name.clone(),
        }
    }
}

/// List representation of a recipe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipeResponse {
    pub id: i64,
    pub title: String,
    pub time_minutes: i32,
    pub price: Price,
    pub link: String,
    pub tags: Vec<TagResponse>,
}

impl From<&Recipe> for RecipeResponse {
    fn from(recipe: &Recipe) -> Self {
        Self {
            id: recipe.id,
            title: recipe.title.clone(),
            time_minutes: recipe.time_minutes,
            price: recipe.price,
            link: recipe.link.clone(),
            tags: recipe.tags.iter().map(TagResponse::from).collect(),
        }
    }
}

/// Detail representation of a recipe: the list fields plus `description`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipeDetailResponse {
    #[serde(flatten)]
    pub recipe: RecipeResponse,
    pub description: String,
}

impl From<&Recipe> for RecipeDetailResponse {
    fn from(recipe: &Recipe) -> Self {
        Self {
            recipe: RecipeResponse::from(recipe),
            description: recipe.description.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use entities::NewRecipe;

    use super::*;

    fn sample_recipe() -> Recipe {
        let user = User::new("test@example.com", "hash");
        NewRecipe::new(user.id, "Sample recipe", 22, Price::from_cents(525))
            .with_description("Sample description")
            .with_link("http://example.com/recipe.pdf")
            .into_recipe(1)
    }

    #[test]
    fn test_list_representation_omits_description() {
        let json = serde_json::to_value(RecipeResponse::from(&sample_recipe())).unwrap();

        assert_eq!(json["price"], "5.25");
        assert_eq!(json["link"], "http://example.com/recipe.pdf");
        assert!(json.get("description").is_none());
        assert!(json.get("user_id").is_none());
    }

    #[test]
    fn test_detail_representation_is_flat() {
        let json = serde_json::to_value(RecipeDetailResponse::from(&sample_recipe())).unwrap();

        assert_eq!(json["id"], 1);
        assert_eq!(json["title"], "Sample recipe");
        assert_eq!(json["description"], "Sample description");
        assert_eq!(json["tags"], serde_json::json!([]));
    }

    #[test]
    fn test_user_response_has_no_password() {
        let user = User::new("test@example.com", "secret-hash").with_name("Test Name");
        let json = serde_json::to_value(UserResponse::from(&user)).unwrap();

        assert_eq!(json, serde_json::json!({"email": "test@example.com", "name": "Test Name"}));
    }
}
