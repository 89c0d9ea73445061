use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Application error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] redb::Error),

    #[error("Transaction error: {0}")]
    Transaction(#[from] redb::TransactionError),

    #[error("Table error: {0}")]
    Table(#[from] redb::TableError),

    #[error("Storage error: {0}")]
    Storage(#[from] redb::StorageError),

    #[error("Commit error: {0}")]
    Commit(#[from] redb::CommitError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] bincode::error::EncodeError),

    #[error("Deserialization error: {0}")]
    Deserialization(#[from] bincode::error::DecodeError),

    #[error("Task join error: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),

    #[error("Username already taken")]
    UserAlreadyExists,

    #[error("User not found")]
    UserNotFound,

    #[error("Recipe not found")]
    RecipeNotFound,

    #[error("Ingredient not found")]
    IngredientNotFound,

    #[error("Tag not found")]
    TagNotFound,

    #[error("Tag slug already in use")]
    TagSlugTaken,

    #[error("Recipe already favorited")]
    AlreadyFavorited,

    #[error("Recipe is not in favorites")]
    NotFavorited,

    #[error("Recipe already in shopping cart")]
    AlreadyInCart,

    #[error("Recipe is not in shopping cart")]
    NotInCart,

    #[error("Subscription already exists")]
    AlreadySubscribed,

    #[error("Subscription does not exist")]
    NotSubscribed,

    #[error("Cannot subscribe to yourself")]
    SelfSubscription,

    #[error("Only the author may modify this recipe")]
    NotRecipeAuthor,

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Implement IntoResponse to convert AppError into HTTP responses
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::Database(ref e) => {
                tracing::error!("Database error: {:?}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
            }
            AppError::Transaction(ref e) => {
                tracing::error!("Transaction error: {:?}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
            }
            AppError::Table(ref e) => {
                tracing::error!("Table error: {:?}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
            }
            AppError::Storage(ref e) => {
                tracing::error!("Storage error: {:?}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
            }
            AppError::Commit(ref e) => {
                tracing::error!("Commit error: {:?}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
            }
            AppError::Serialization(ref e) => {
                tracing::error!("Serialization error: {:?}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
            }
            AppError::Deserialization(ref e) => {
                tracing::error!("Deserialization error: {:?}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
            }
            AppError::TaskJoin(ref e) => {
                tracing::error!("Task join error: {:?}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
            }
            AppError::UserAlreadyExists => (StatusCode::CONFLICT, "Username already taken"),
            AppError::UserNotFound => (StatusCode::NOT_FOUND, "User not found"),
            AppError::RecipeNotFound => (StatusCode::NOT_FOUND, "Recipe not found"),
            AppError::IngredientNotFound => (StatusCode::NOT_FOUND, "Ingredient not found"),
            AppError::TagNotFound => (StatusCode::NOT_FOUND, "Tag not found"),
            AppError::TagSlugTaken => (StatusCode::BAD_REQUEST, "Tag slug already in use"),
            AppError::AlreadyFavorited => {
                (StatusCode::BAD_REQUEST, "Recipe already favorited")
            }
            AppError::NotFavorited => (StatusCode::NOT_FOUND, "Recipe is not in favorites"),
            AppError::AlreadyInCart => {
                (StatusCode::BAD_REQUEST, "Recipe already in shopping cart")
            }
            AppError::NotInCart => (StatusCode::NOT_FOUND, "Recipe is not in shopping cart"),
            AppError::AlreadySubscribed => {
                (StatusCode::BAD_REQUEST, "Subscription already exists")
            }
            AppError::NotSubscribed => (StatusCode::NOT_FOUND, "Subscription does not exist"),
            AppError::SelfSubscription => {
                (StatusCode::BAD_REQUEST, "Cannot subscribe to yourself")
            }
            AppError::NotRecipeAuthor => {
                (StatusCode::FORBIDDEN, "Only the author may modify this recipe")
            }
            AppError::InvalidInput(ref msg) => (StatusCode::BAD_REQUEST, msg.as_str()),
        };

        let body = Json(json!({
            "error": error_message
        }));

        (status, body).into_response()
    }
}

/// Result type alias for application results
pub type Result<T> = std::result::Result<T, AppError>;
