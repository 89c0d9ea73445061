//! Integration tests for the Recipebox Server API
//!
//! These tests verify the complete request/response cycle for all endpoints.

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::ServiceExt;

use recipebox_server::{app_router, open_database, AppState, Config};

// =============================================================================
// Test Helpers
// =============================================================================

/// Create a test configuration
fn test_config() -> Config {
    Config {
        server_host: "127.0.0.1".to_string(),
        server_port: 0,                // Random port
        database_path: "".to_string(), // Will be set per test
        allowed_origins: vec!["http://localhost:5173".to_string()],
        environment: "test".to_string(),
    }
}

/// Create a test app backed by a database in a temporary directory
fn create_test_app(temp_dir: &TempDir) -> Router {
    let db_path = temp_dir.path().join("test.db");
    let db = open_database(&db_path).expect("Failed to create test database");
    app_router(AppState::new(db, test_config()))
}

/// Parse response body as JSON
async fn body_to_json(body: Body) -> Value {
    let bytes = body.collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Read response body as a UTF-8 string
async fn body_to_string(body: Body) -> String {
    let bytes = body.collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

/// Create a request with a JSON body
fn make_json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

/// Create a GET request
fn make_get_request(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

/// Register a user and return its id
async fn register_user(app: &Router, username: &str) -> u64 {
    let response = app
        .clone()
        .oneshot(make_json_request(
            "POST",
            "/api/users",
            json!({
                "username": username,
                "email": format!("{}@example.com", username),
                "first_name": "Test",
                "last_name": "User",
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_to_json(response.into_body()).await;
    body["id"].as_u64().unwrap()
}

/// Create a catalog ingredient and return its id
async fn create_ingredient(app: &Router, name: &str, unit: &str) -> u64 {
    let response = app
        .clone()
        .oneshot(make_json_request(
            "POST",
            "/api/ingredients",
            json!({ "name": name, "measurement_unit": unit }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_to_json(response.into_body()).await;
    body["id"].as_u64().unwrap()
}

/// Create a tag and return its id
async fn create_tag(app: &Router, name: &str, slug: &str) -> u64 {
    let response = app
        .clone()
        .oneshot(make_json_request(
            "POST",
            "/api/tags",
            json!({ "name": name, "color": "#ff8800", "slug": slug }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_to_json(response.into_body()).await;
    body["id"].as_u64().unwrap()
}

/// Create a recipe and return its id
async fn create_recipe(
    app: &Router,
    author_id: u64,
    name: &str,
    tags: Vec<u64>,
    ingredients: Vec<(u64, u32)>,
) -> u64 {
    let ingredient_items: Vec<Value> = ingredients
        .into_iter()
        .map(|(id, amount)| json!({ "id": id, "amount": amount }))
        .collect();

    let response = app
        .clone()
        .oneshot(make_json_request(
            "POST",
            "/api/recipes",
            json!({
                "user_id": author_id,
                "name": name,
                "image": "aW1hZ2U=",
                "text": "Mix and bake",
                "tags": tags,
                "ingredients": ingredient_items,
                "cooking_time": 30,
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_to_json(response.into_body()).await;
    body["id"].as_u64().unwrap()
}

// =============================================================================
// Health
// =============================================================================

#[tokio::test]
async fn test_health_check() {
    let temp_dir = TempDir::new().unwrap();
    let app = create_test_app(&temp_dir);

    let response = app.oneshot(make_get_request("/health")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_to_json(response.into_body()).await;
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["database"], "connected");
}

// =============================================================================
// Users
// =============================================================================

#[tokio::test]
async fn test_register_user_success() {
    let temp_dir = TempDir::new().unwrap();
    let app = create_test_app(&temp_dir);

    let id = register_user(&app, "chef_anna").await;
    assert_eq!(id, 1);

    let response = app
        .oneshot(make_get_request("/api/users/1"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_to_json(response.into_body()).await;
    assert_eq!(body["username"], "chef_anna");
    assert_eq!(body["is_subscribed"], false);
}

#[tokio::test]
async fn test_register_user_duplicate_username() {
    let temp_dir = TempDir::new().unwrap();
    let app = create_test_app(&temp_dir);

    register_user(&app, "chef_anna").await;

    let response = app
        .oneshot(make_json_request(
            "POST",
            "/api/users",
            json!({
                "username": "chef_anna",
                "email": "other@example.com",
                "first_name": "Other",
                "last_name": "User",
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_register_user_invalid_email() {
    let temp_dir = TempDir::new().unwrap();
    let app = create_test_app(&temp_dir);

    let response = app
        .oneshot(make_json_request(
            "POST",
            "/api/users",
            json!({
                "username": "chef_anna",
                "email": "not-an-email",
                "first_name": "Anna",
                "last_name": "Smith",
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_get_user_not_found() {
    let temp_dir = TempDir::new().unwrap();
    let app = create_test_app(&temp_dir);

    let response = app
        .oneshot(make_get_request("/api/users/999"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// =============================================================================
// Ingredients
// =============================================================================

#[tokio::test]
async fn test_ingredient_search_by_prefix() {
    let temp_dir = TempDir::new().unwrap();
    let app = create_test_app(&temp_dir);

    create_ingredient(&app, "Flour", "g").await;
    create_ingredient(&app, "flaxseed", "g").await;
    create_ingredient(&app, "sugar", "g").await;

    let response = app
        .clone()
        .oneshot(make_get_request("/api/ingredients?name=fl"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_to_json(response.into_body()).await;
    let names: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|i| i["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Flour", "flaxseed"]);

    // No filter returns the whole catalog
    let response = app
        .oneshot(make_get_request("/api/ingredients"))
        .await
        .unwrap();
    let body = body_to_json(response.into_body()).await;
    assert_eq!(body.as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_ingredient_not_found() {
    let temp_dir = TempDir::new().unwrap();
    let app = create_test_app(&temp_dir);

    let response = app
        .oneshot(make_get_request("/api/ingredients/42"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_ingredient_blank_name_rejected() {
    let temp_dir = TempDir::new().unwrap();
    let app = create_test_app(&temp_dir);

    let response = app
        .oneshot(make_json_request(
            "POST",
            "/api/ingredients",
            json!({ "name": "  ", "measurement_unit": "g" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// =============================================================================
// Tags
// =============================================================================

#[tokio::test]
async fn test_tag_slug_uniqueness() {
    let temp_dir = TempDir::new().unwrap();
    let app = create_test_app(&temp_dir);

    create_tag(&app, "Breakfast", "breakfast").await;

    let response = app
        .oneshot(make_json_request(
            "POST",
            "/api/tags",
            json!({ "name": "Morning", "slug": "breakfast" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_tag_invalid_color() {
    let temp_dir = TempDir::new().unwrap();
    let app = create_test_app(&temp_dir);

    let response = app
        .oneshot(make_json_request(
            "POST",
            "/api/tags",
            json!({ "name": "Dinner", "color": "red", "slug": "dinner" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_list_tags() {
    let temp_dir = TempDir::new().unwrap();
    let app = create_test_app(&temp_dir);

    create_tag(&app, "Breakfast", "breakfast").await;
    create_tag(&app, "Dinner", "dinner").await;

    let response = app.oneshot(make_get_request("/api/tags")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_to_json(response.into_body()).await;
    assert_eq!(body.as_array().unwrap().len(), 2);
}

// =============================================================================
// Recipes
// =============================================================================

#[tokio::test]
async fn test_create_recipe_full_representation() {
    let temp_dir = TempDir::new().unwrap();
    let app = create_test_app(&temp_dir);

    let author = register_user(&app, "chef_anna").await;
    let flour = create_ingredient(&app, "flour", "g").await;
    let tag = create_tag(&app, "Breakfast", "breakfast").await;

    let id = create_recipe(&app, author, "Pancakes", vec![tag], vec![(flour, 200)]).await;

    let response = app
        .oneshot(make_get_request(&format!(
            "/api/recipes/{}?user_id={}",
            id, author
        )))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_to_json(response.into_body()).await;

    assert_eq!(body["name"], "Pancakes");
    assert_eq!(body["author"]["username"], "chef_anna");
    assert_eq!(body["tags"][0]["slug"], "breakfast");
    assert_eq!(body["ingredients"][0]["name"], "flour");
    assert_eq!(body["ingredients"][0]["measurement_unit"], "g");
    assert_eq!(body["ingredients"][0]["amount"], 200);
    assert_eq!(body["is_favorited"], false);
    assert_eq!(body["is_in_shopping_cart"], false);
}

#[tokio::test]
async fn test_create_recipe_zero_amount_rejected() {
    let temp_dir = TempDir::new().unwrap();
    let app = create_test_app(&temp_dir);

    let author = register_user(&app, "chef_anna").await;
    let flour = create_ingredient(&app, "flour", "g").await;

    let response = app
        .oneshot(make_json_request(
            "POST",
            "/api/recipes",
            json!({
                "user_id": author,
                "name": "Pancakes",
                "ingredients": [{ "id": flour, "amount": 0 }],
                "cooking_time": 30,
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_create_recipe_duplicate_ingredient_rejected() {
    let temp_dir = TempDir::new().unwrap();
    let app = create_test_app(&temp_dir);

    let author = register_user(&app, "chef_anna").await;
    let flour = create_ingredient(&app, "flour", "g").await;

    let response = app
        .oneshot(make_json_request(
            "POST",
            "/api/recipes",
            json!({
                "user_id": author,
                "name": "Pancakes",
                "ingredients": [
                    { "id": flour, "amount": 100 },
                    { "id": flour, "amount": 50 },
                ],
                "cooking_time": 30,
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_create_recipe_unknown_ingredient() {
    let temp_dir = TempDir::new().unwrap();
    let app = create_test_app(&temp_dir);

    let author = register_user(&app, "chef_anna").await;

    let response = app
        .oneshot(make_json_request(
            "POST",
            "/api/recipes",
            json!({
                "user_id": author,
                "name": "Pancakes",
                "ingredients": [{ "id": 42, "amount": 100 }],
                "cooking_time": 30,
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_list_recipes_newest_first_with_filters() {
    let temp_dir = TempDir::new().unwrap();
    let app = create_test_app(&temp_dir);

    let anna = register_user(&app, "chef_anna").await;
    let boris = register_user(&app, "chef_boris").await;
    let flour = create_ingredient(&app, "flour", "g").await;
    let breakfast = create_tag(&app, "Breakfast", "breakfast").await;

    let first = create_recipe(&app, anna, "Pancakes", vec![breakfast], vec![(flour, 200)]).await;
    let second = create_recipe(&app, boris, "Bread", vec![], vec![(flour, 500)]).await;

    // Newest first
    let response = app
        .clone()
        .oneshot(make_get_request("/api/recipes"))
        .await
        .unwrap();
    let body = body_to_json(response.into_body()).await;
    let ids: Vec<u64> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["id"].as_u64().unwrap())
        .collect();
    assert_eq!(ids, vec![second, first]);

    // Author filter
    let response = app
        .clone()
        .oneshot(make_get_request(&format!("/api/recipes?author={}", anna)))
        .await
        .unwrap();
    let body = body_to_json(response.into_body()).await;
    assert_eq!(body.as_array().unwrap().len(), 1);
    assert_eq!(body[0]["id"].as_u64().unwrap(), first);

    // Tag slug filter
    let response = app
        .clone()
        .oneshot(make_get_request("/api/recipes?tags=breakfast"))
        .await
        .unwrap();
    let body = body_to_json(response.into_body()).await;
    assert_eq!(body.as_array().unwrap().len(), 1);
    assert_eq!(body[0]["id"].as_u64().unwrap(), first);

    // Unknown slug matches nothing
    let response = app
        .oneshot(make_get_request("/api/recipes?tags=unknown"))
        .await
        .unwrap();
    let body = body_to_json(response.into_body()).await;
    assert!(body.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_update_recipe_author_only() {
    let temp_dir = TempDir::new().unwrap();
    let app = create_test_app(&temp_dir);

    let anna = register_user(&app, "chef_anna").await;
    let boris = register_user(&app, "chef_boris").await;
    let flour = create_ingredient(&app, "flour", "g").await;
    let id = create_recipe(&app, anna, "Pancakes", vec![], vec![(flour, 200)]).await;

    let update_body = |user_id: u64| {
        json!({
            "user_id": user_id,
            "name": "Thin Pancakes",
            "ingredients": [{ "id": flour, "amount": 150 }],
            "cooking_time": 20,
        })
    };

    // Not the author
    let response = app
        .clone()
        .oneshot(make_json_request(
            "PUT",
            &format!("/api/recipes/{}", id),
            update_body(boris),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // The author
    let response = app
        .oneshot(make_json_request(
            "PUT",
            &format!("/api/recipes/{}", id),
            update_body(anna),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_to_json(response.into_body()).await;
    assert_eq!(body["name"], "Thin Pancakes");
    assert_eq!(body["ingredients"][0]["amount"], 150);
}

#[tokio::test]
async fn test_delete_recipe_cascades_collections() {
    let temp_dir = TempDir::new().unwrap();
    let app = create_test_app(&temp_dir);

    let anna = register_user(&app, "chef_anna").await;
    let boris = register_user(&app, "chef_boris").await;
    let flour = create_ingredient(&app, "flour", "g").await;
    let id = create_recipe(&app, anna, "Pancakes", vec![], vec![(flour, 200)]).await;

    // Boris favorites and carts the recipe
    let response = app
        .clone()
        .oneshot(make_json_request(
            "POST",
            &format!("/api/recipes/{}/favorite", id),
            json!({ "user_id": boris }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = app
        .clone()
        .oneshot(make_json_request(
            "POST",
            &format!("/api/recipes/{}/shopping_cart", id),
            json!({ "user_id": boris }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    // Only the author may delete
    let response = app
        .clone()
        .oneshot(make_json_request(
            "DELETE",
            &format!("/api/recipes/{}", id),
            json!({ "user_id": boris }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = app
        .clone()
        .oneshot(make_json_request(
            "DELETE",
            &format!("/api/recipes/{}", id),
            json!({ "user_id": anna }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // Cascade removed Boris's cart entry, so his shopping list is empty
    let response = app
        .oneshot(make_get_request(&format!(
            "/api/recipes/download_shopping_cart?user_id={}",
            boris
        )))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_to_string(response.into_body()).await;
    assert!(body.is_empty());
}

// =============================================================================
// Favorites
// =============================================================================

#[tokio::test]
async fn test_favorite_add_and_remove() {
    let temp_dir = TempDir::new().unwrap();
    let app = create_test_app(&temp_dir);

    let anna = register_user(&app, "chef_anna").await;
    let flour = create_ingredient(&app, "flour", "g").await;
    let id = create_recipe(&app, anna, "Pancakes", vec![], vec![(flour, 200)]).await;

    let uri = format!("/api/recipes/{}/favorite", id);

    let response = app
        .clone()
        .oneshot(make_json_request("POST", &uri, json!({ "user_id": anna })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_to_json(response.into_body()).await;
    assert_eq!(body["name"], "Pancakes");

    // Duplicate add
    let response = app
        .clone()
        .oneshot(make_json_request("POST", &uri, json!({ "user_id": anna })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // The recipe now reports is_favorited for this user
    let response = app
        .clone()
        .oneshot(make_get_request(&format!(
            "/api/recipes/{}?user_id={}",
            id, anna
        )))
        .await
        .unwrap();
    let body = body_to_json(response.into_body()).await;
    assert_eq!(body["is_favorited"], true);

    // Remove, then removing again is 404
    let response = app
        .clone()
        .oneshot(make_json_request("DELETE", &uri, json!({ "user_id": anna })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .oneshot(make_json_request("DELETE", &uri, json!({ "user_id": anna })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_favorite_missing_recipe() {
    let temp_dir = TempDir::new().unwrap();
    let app = create_test_app(&temp_dir);

    let anna = register_user(&app, "chef_anna").await;

    let response = app
        .oneshot(make_json_request(
            "POST",
            "/api/recipes/999/favorite",
            json!({ "user_id": anna }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// =============================================================================
// Shopping cart & aggregation
// =============================================================================

#[tokio::test]
async fn test_download_shopping_cart_aggregates() {
    let temp_dir = TempDir::new().unwrap();
    let app = create_test_app(&temp_dir);

    let anna = register_user(&app, "chef_anna").await;
    let flour = create_ingredient(&app, "flour", "g").await;
    let sugar = create_ingredient(&app, "sugar", "g").await;

    // Recipe A: flour 200 g; Recipe B: flour 100 g, sugar 50 g
    let a = create_recipe(&app, anna, "Recipe A", vec![], vec![(flour, 200)]).await;
    let b = create_recipe(
        &app,
        anna,
        "Recipe B",
        vec![],
        vec![(flour, 100), (sugar, 50)],
    )
    .await;

    for id in [a, b] {
        let response = app
            .clone()
            .oneshot(make_json_request(
                "POST",
                &format!("/api/recipes/{}/shopping_cart", id),
                json!({ "user_id": anna }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let response = app
        .oneshot(make_get_request(&format!(
            "/api/recipes/download_shopping_cart?user_id={}",
            anna
        )))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let disposition = response
        .headers()
        .get("content-disposition")
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    assert!(disposition.contains("wishlist.txt"));

    let body = body_to_string(response.into_body()).await;
    assert_eq!(body, "flour - 300 g\nsugar - 50 g\n");
}

#[tokio::test]
async fn test_download_shopping_cart_empty() {
    let temp_dir = TempDir::new().unwrap();
    let app = create_test_app(&temp_dir);

    let anna = register_user(&app, "chef_anna").await;

    let response = app
        .oneshot(make_get_request(&format!(
            "/api/recipes/download_shopping_cart?user_id={}",
            anna
        )))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_to_string(response.into_body()).await;
    assert!(body.is_empty());
}

#[tokio::test]
async fn test_cart_duplicate_and_missing_entries() {
    let temp_dir = TempDir::new().unwrap();
    let app = create_test_app(&temp_dir);

    let anna = register_user(&app, "chef_anna").await;
    let flour = create_ingredient(&app, "flour", "g").await;
    let id = create_recipe(&app, anna, "Pancakes", vec![], vec![(flour, 200)]).await;

    let uri = format!("/api/recipes/{}/shopping_cart", id);

    let response = app
        .clone()
        .oneshot(make_json_request("POST", &uri, json!({ "user_id": anna })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = app
        .clone()
        .oneshot(make_json_request("POST", &uri, json!({ "user_id": anna })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app
        .clone()
        .oneshot(make_json_request("DELETE", &uri, json!({ "user_id": anna })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .oneshot(make_json_request("DELETE", &uri, json!({ "user_id": anna })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// =============================================================================
// Subscriptions
// =============================================================================

#[tokio::test]
async fn test_subscription_lifecycle() {
    let temp_dir = TempDir::new().unwrap();
    let app = create_test_app(&temp_dir);

    let anna = register_user(&app, "chef_anna").await;
    let boris = register_user(&app, "chef_boris").await;
    let flour = create_ingredient(&app, "flour", "g").await;
    create_recipe(&app, boris, "Bread", vec![], vec![(flour, 500)]).await;

    let uri = format!("/api/users/{}/subscribe", boris);

    // Self-subscription
    let response = app
        .clone()
        .oneshot(make_json_request(
            "POST",
            &format!("/api/users/{}/subscribe", anna),
            json!({ "user_id": anna }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // Subscribe
    let response = app
        .clone()
        .oneshot(make_json_request("POST", &uri, json!({ "user_id": anna })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    // Duplicate
    let response = app
        .clone()
        .oneshot(make_json_request("POST", &uri, json!({ "user_id": anna })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // The author profile now reports is_subscribed for Anna
    let response = app
        .clone()
        .oneshot(make_get_request(&format!(
            "/api/users/{}?user_id={}",
            boris, anna
        )))
        .await
        .unwrap();
    let body = body_to_json(response.into_body()).await;
    assert_eq!(body["is_subscribed"], true);

    // Subscription listing includes the author's recipes
    let response = app
        .clone()
        .oneshot(make_get_request(&format!(
            "/api/users/subscriptions?user_id={}",
            anna
        )))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_to_json(response.into_body()).await;
    assert_eq!(body.as_array().unwrap().len(), 1);
    assert_eq!(body[0]["username"], "chef_boris");
    assert_eq!(body[0]["recipe_count"], 1);
    assert_eq!(body[0]["recipes"][0]["name"], "Bread");

    // Unsubscribe, then unsubscribing again is 404
    let response = app
        .clone()
        .oneshot(make_json_request("DELETE", &uri, json!({ "user_id": anna })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .oneshot(make_json_request("DELETE", &uri, json!({ "user_id": anna })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_subscribe_to_unknown_author() {
    let temp_dir = TempDir::new().unwrap();
    let app = create_test_app(&temp_dir);

    let anna = register_user(&app, "chef_anna").await;

    let response = app
        .oneshot(make_json_request(
            "POST",
            "/api/users/999/subscribe",
            json!({ "user_id": anna }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
