//! HTTP handlers for the location API
//!
//! - GET  /health: liveness probe
//! - GET  /api/locations: every formatted location
//! - POST /api/conversation: keyword recommendation for the latest user turn

use super::dataset::Dataset;
use crate::assistant::IntentClassifier;
use crate::error::ApiError;
use crate::feed::{matches_category, LocationsResponse};
use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Prompt returned when a conversation has no user turn to classify
pub const OPENING_QUESTION: &str =
    "Could you tell me what kind of place you're looking for in Singapore?";

/// Shared state for location handlers
#[derive(Clone)]
pub struct LocationsState {
    pub dataset: Arc<Dataset>,
    pub classifier: Arc<IntentClassifier>,
    pub top_k: usize,
}

/// Create the location API router
pub fn locations_router(state: LocationsState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/api/locations", get(list_locations))
        .route("/api/conversation", post(process_conversation))
        .with_state(state)
}

// =============================================================================
// Request / response types
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationTurn {
    pub role: String,
    pub content: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ConversationRequest {
    #[serde(default)]
    pub conversation: Vec<ConversationTurn>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetrievedLocation {
    pub id: String,
    pub title: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub retrieved_locations: Vec<RetrievedLocation>,
    pub clarifying_question: String,
}

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    version: String,
}

// =============================================================================
// Handlers
// =============================================================================

/// GET /health
async fn health_check() -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// GET /api/locations
async fn list_locations(State(state): State<LocationsState>) -> axum::response::Response {
    if state.dataset.is_empty() {
        tracing::warn!("Locations requested but the dataset is empty");
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiError::internal("Location data not available")),
        )
            .into_response();
    }

    Json(LocationsResponse {
        locations: state.dataset.posts().to_vec(),
    })
    .into_response()
}

/// POST /api/conversation
async fn process_conversation(
    State(state): State<LocationsState>,
    Json(request): Json<ConversationRequest>,
) -> impl IntoResponse {
    Json(recommend(&state, &request.conversation))
}

/// Classify the latest user turn and pick the first `top_k` locations in
/// the commanded category
pub fn recommend(state: &LocationsState, conversation: &[ConversationTurn]) -> ConversationResponse {
    let latest = conversation
        .iter()
        .rev()
        .find(|turn| turn.role.eq_ignore_ascii_case("user"));

    let Some(turn) = latest else {
        return ConversationResponse {
            error: Some("No conversation provided".to_string()),
            retrieved_locations: Vec::new(),
            clarifying_question: OPENING_QUESTION.to_string(),
        };
    };

    let classification = state.classifier.classify(&turn.content);
    let retrieved_locations = match &classification.category {
        Some(category) => state
            .dataset
            .posts()
            .iter()
            .filter(|post| matches_category(post, category))
            .take(state.top_k)
            .map(|post| RetrievedLocation {
                id: post.id.clone(),
                title: post.title.clone(),
            })
            .collect(),
        None => Vec::new(),
    };

    tracing::debug!(
        category = ?classification.category,
        retrieved = retrieved_locations.len(),
        "Processed conversation"
    );

    ConversationResponse {
        error: None,
        retrieved_locations,
        clarifying_question: classification.response,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assistant::CLARIFICATION_PROMPT;
    use crate::feed::Post;
    use axum::body::Body;
    use axum::http::Request;
    use tower::ServiceExt;

    fn make_state(posts: Vec<Post>, top_k: usize) -> LocationsState {
        LocationsState {
            dataset: Arc::new(Dataset::from_posts(posts)),
            classifier: Arc::new(IntentClassifier::default()),
            top_k,
        }
    }

    fn sample_posts() -> Vec<Post> {
        vec![
            Post::new("1", "Lau Pa Sat", "Food & Beverage"),
            Post::new("2", "Siloso Beach", "Beach"),
            Post::new("3", "Maxwell Food Centre", "Food & Beverage"),
            Post::new("4", "Kampong Glam", "Heritage").with_themes(["Street Food"]),
        ]
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let body = axum::body::to_bytes(response.into_body(), 1024 * 64)
            .await
            .unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    fn post_conversation(body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/api/conversation")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let app = locations_router(make_state(vec![], 5));
        let resp = app
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(body_json(resp).await["status"], "ok");
    }

    #[tokio::test]
    async fn test_list_locations() {
        let app = locations_router(make_state(sample_posts(), 5));
        let resp = app
            .oneshot(
                Request::builder()
                    .uri("/api/locations")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::OK);
        let json = body_json(resp).await;
        let locations = json["locations"].as_array().unwrap();
        assert_eq!(locations.len(), 4);
        assert_eq!(locations[0]["title"], "Lau Pa Sat");
        assert_eq!(locations[0]["category_type"], "Food & Beverage");
        assert!(locations[0].get("liked").is_none());
    }

    #[tokio::test]
    async fn test_list_locations_empty_dataset() {
        let app = locations_router(make_state(vec![], 5));
        let resp = app
            .oneshot(
                Request::builder()
                    .uri("/api/locations")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let json = body_json(resp).await;
        assert_eq!(json["error"]["message"], "Location data not available");
    }

    #[tokio::test]
    async fn test_conversation_recommends_category() {
        let app = locations_router(make_state(sample_posts(), 2));
        let resp = app
            .oneshot(post_conversation(serde_json::json!({
                "conversation": [
                    {"role": "user", "content": "show me beaches"},
                    {"role": "assistant", "content": "Sure"},
                    {"role": "user", "content": "actually, where should I eat?"}
                ]
            })))
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::OK);
        let json = body_json(resp).await;
        let ids: Vec<_> = json["retrieved_locations"]
            .as_array()
            .unwrap()
            .iter()
            .map(|l| l["id"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(ids, vec!["1", "3"]);
        assert!(json.get("error").is_none());
        assert!(json["clarifying_question"]
            .as_str()
            .unwrap()
            .contains("food spots"));
    }

    #[tokio::test]
    async fn test_conversation_empty() {
        let app = locations_router(make_state(sample_posts(), 5));
        let resp = app
            .oneshot(post_conversation(serde_json::json!({"conversation": []})))
            .await
            .unwrap();

        let json = body_json(resp).await;
        assert_eq!(json["error"], "No conversation provided");
        assert!(json["retrieved_locations"].as_array().unwrap().is_empty());
        assert_eq!(json["clarifying_question"], OPENING_QUESTION);
    }

    #[test]
    fn test_recommend_fallback() {
        let state = make_state(sample_posts(), 5);
        let response = recommend(
            &state,
            &[ConversationTurn {
                role: "user".to_string(),
                content: "xyz123".to_string(),
            }],
        );
        assert!(response.retrieved_locations.is_empty());
        assert_eq!(response.clarifying_question, CLARIFICATION_PROMPT);
        assert!(response.error.is_none());
    }

    #[test]
    fn test_recommend_matches_theme_tags() {
        let state = make_state(sample_posts(), 5);
        let response = recommend(
            &state,
            &[ConversationTurn {
                role: "User".to_string(),
                content: "food".to_string(),
            }],
        );
        let ids: Vec<_> = response
            .retrieved_locations
            .iter()
            .map(|l| l.id.as_str())
            .collect();
        assert_eq!(ids, vec!["1", "3", "4"]);
    }
}
