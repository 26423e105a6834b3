use axum::http::{HeaderName, HeaderValue, StatusCode};
use axum_test::TestServer;
use serde_json::{json, Value};
use std::sync::Arc;

use movie_recommender::{
    config::Config,
    models::{Movie, Rating},
    routes::{create_router, AppState},
    services::{providers::InMemoryProvider, similarity::SimilarityMetric, RecommendationService},
};

fn movie(id: u32, title: &str, genre: &str, director: &str, cast: &str) -> Movie {
    let mut movie = Movie::new(id, title);
    movie.genre = Some(genre.to_string());
    movie.director = Some(director.to_string());
    movie.cast = Some(cast.to_string());
    movie
}

fn catalog() -> Vec<Movie> {
    let mut movies = vec![
        movie(1, "Alien", "Sci-Fi|Horror", "Ridley Scott", r#"["Sigourney Weaver"]"#),
        movie(2, "Heat", "Crime|Drama", "Michael Mann", r#"["Al Pacino"]"#),
        movie(3, "Up", "Animation", "Pete Docter", r#"["Ed Asner"]"#),
        movie(4, "Prometheus", "Sci-Fi|Horror", "Ridley Scott", r#"["Noomi Rapace"]"#),
        movie(5, "Collateral", "Crime|Thriller", "Michael Mann", r#"["Tom Cruise"]"#),
    ];
    let popularity = [(4.1, 300), (4.6, 250), (4.6, 900), (3.9, 120), (4.0, 80)];
    for (movie, (rating, total)) in movies.iter_mut().zip(popularity) {
        movie.rating = Some(rating);
        movie.total_ratings = Some(total);
    }
    movies
}

fn ratings() -> Vec<Rating> {
    vec![
        Rating::new(1, 1, 5),
        Rating::new(1, 2, 4),
        Rating::new(1, 3, 1),
        Rating::new(2, 1, 5),
        Rating::new(2, 2, 4),
        Rating::new(2, 3, 2),
        Rating::new(2, 4, 5),
        Rating::new(2, 5, 3),
    ]
}

fn create_test_server() -> TestServer {
    let config = Config::default();
    let provider = InMemoryProvider::new(catalog(), ratings());
    let recommender = RecommendationService::new(Arc::new(provider), SimilarityMetric::Pearson);
    let app = create_router(Arc::new(AppState::new(recommender, &config)));
    TestServer::new(app).unwrap()
}

fn movie_ids(recs: &[Value]) -> Vec<u64> {
    recs.iter().map(|r| r["movieId"].as_u64().unwrap()).collect()
}

#[tokio::test]
async fn test_health_check() {
    let server = create_test_server();
    let response = server.get("/health").await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_new_user_gets_popular_movies() {
    let server = create_test_server();

    let response = server
        .get("/api/v1/recommendations/user/42")
        .add_query_param("limit", 3)
        .await;
    response.assert_status_ok();

    let recs: Vec<Value> = response.json();
    // rating desc, then rating count desc
    assert_eq!(movie_ids(&recs), vec![3, 2, 1]);
    for rec in &recs {
        assert_eq!(rec["algorithm"], "popular");
        assert_eq!(rec["score"], 0.7);
        assert_eq!(rec["reason"], "popular movie you might like");
    }
}

#[tokio::test]
async fn test_hybrid_never_returns_rated_movies() {
    let server = create_test_server();

    let response = server.get("/api/v1/recommendations/user/1/hybrid").await;
    response.assert_status_ok();

    let recs: Vec<Value> = response.json();
    let ids = movie_ids(&recs);
    assert!(!ids.is_empty());
    for rated in [1, 2, 3] {
        assert!(!ids.contains(&rated));
    }
    // Prometheus comes from both branches
    assert_eq!(recs[0]["movieId"], 4);
    assert_eq!(recs[0]["algorithm"], "hybrid");
}

#[tokio::test]
async fn test_collaborative_endpoint() {
    let server = create_test_server();

    let response = server
        .get("/api/v1/recommendations/user/1/collaborative")
        .await;
    response.assert_status_ok();

    let recs: Vec<Value> = response.json();
    assert_eq!(movie_ids(&recs), vec![4, 5]);
    assert!(recs.iter().all(|r| r["algorithm"] == "collaborative"));
}

#[tokio::test]
async fn test_content_based_endpoint() {
    let server = create_test_server();

    let response = server
        .get("/api/v1/recommendations/user/1/content-based")
        .add_query_param("limit", 1)
        .await;
    response.assert_status_ok();

    let recs: Vec<Value> = response.json();
    assert_eq!(recs.len(), 1);
    assert_eq!(recs[0]["algorithm"], "content-based");
}

#[tokio::test]
async fn test_content_based_for_unknown_user_is_empty() {
    let server = create_test_server();

    let response = server
        .get("/api/v1/recommendations/user/42/content-based")
        .await;
    response.assert_status_ok();

    let recs: Vec<Value> = response.json();
    assert!(recs.is_empty());
}

#[tokio::test]
async fn test_predictions_endpoint() {
    let server = create_test_server();

    let response = server
        .get("/api/v1/recommendations/user/1/predictions")
        .await;
    response.assert_status_ok();

    let predictions: Value = response.json();
    let rating = predictions["4"].as_f64().unwrap();
    assert!((rating - 5.0).abs() < 1e-9);
}

#[tokio::test]
async fn test_limit_above_maximum_is_rejected() {
    let server = create_test_server();

    let response = server
        .get("/api/v1/recommendations/user/1")
        .add_query_param("limit", 1000)
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);

    let body: Value = response.json();
    assert!(body["error"].as_str().unwrap().contains("limit"));
}

#[tokio::test]
async fn test_request_id_is_echoed() {
    let server = create_test_server();

    let response = server
        .get("/health")
        .add_header(
            HeaderName::from_static("x-request-id"),
            HeaderValue::from_static("gw-42"),
        )
        .await;

    assert_eq!(response.header("x-request-id"), "gw-42");
}

#[tokio::test]
async fn test_evaluation_endpoint() {
    let server = create_test_server();

    let recommendations: Vec<Value> = [10, 20, 30, 40]
        .iter()
        .map(|id| {
            json!({
                "movieId": id,
                "title": format!("Film {}", id),
                "score": 0.5,
                "reason": "test",
                "algorithm": "hybrid"
            })
        })
        .collect();

    let response = server
        .post("/api/v1/evaluation")
        .add_query_param("k", 4)
        .json(&json!({
            "predicted": { "1": 4.0, "2": 3.0 },
            "actual": { "1": 5, "2": 3 },
            "recommendations": recommendations,
            "relevant": [20, 40, 99],
            "catalogIds": [10, 20, 30, 40, 50],
            "genres": { "10": ["drama"], "20": ["drama"], "30": ["comedy"], "40": ["comedy"] }
        }))
        .await;
    response.assert_status_ok();

    let result: Value = response.json();
    assert_eq!(result["mae"], 0.5);
    assert_eq!(result["precisionAtK"], 0.5);
    assert!((result["recallAtK"].as_f64().unwrap() - 2.0 / 3.0).abs() < 1e-12);
    assert!((result["map"].as_f64().unwrap() - 1.0 / 3.0).abs() < 1e-12);
    assert!((result["coverage"].as_f64().unwrap() - 0.8).abs() < 1e-12);
    assert_eq!(result["totalRecommendations"], 4);
    assert_eq!(result["relevantItems"], 3);
}

#[tokio::test]
async fn test_evaluation_rejects_zero_k() {
    let server = create_test_server();

    let response = server
        .post("/api/v1/evaluation")
        .add_query_param("k", 0)
        .json(&json!({}))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
}
