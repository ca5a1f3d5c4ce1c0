use axum::{
    extract::{rejection::JsonRejection, State},
    http::HeaderValue,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use autosocial_core::analysis;
use autosocial_core::domain::contract::{
    ContentSuggestionRequest, OverallAnalysisRequest, PostAnalysisRequest,
};
use autosocial_core::domain::report::{
    ContentSuggestionsResponse, OverallInsights, PostAnalysisResponse,
};
use autosocial_core::inference::{Device, ModelRegistry};

mod error;

use error::ApiError;

const SERVICE_NAME: &str = "AutoSocial AI Analysis Service";
const ANALYSIS_ENDPOINTS: [&str; 3] = [
    "/analyze-posts",
    "/generate-content-suggestions",
    "/analyze-overall-patterns",
];

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let settings = autosocial_core::config::Settings::from_env()?;
    let _sentry_guard = init_sentry(&settings);

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer())
        .with(sentry_tracing::layer())
        .init();

    let models = match ModelRegistry::load(&settings).await {
        Ok(models) => models,
        Err(e) => {
            sentry_anyhow::capture_anyhow(&e);
            tracing::error!(error = %format!("{e:#}"), "failed to load models");
            return Err(e);
        }
    };

    let state = AppState { models };
    let app = router(state).layer(cors_layer(&settings.cors_allowed_origins)?);

    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], settings.port));

    tracing::info!(%addr, "api listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

#[derive(Debug, Clone)]
struct AppState {
    models: ModelRegistry,
}

fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/analyze-posts", post(analyze_posts))
        .route(
            "/generate-content-suggestions",
            post(generate_content_suggestions),
        )
        .route("/analyze-overall-patterns", post(analyze_overall_patterns))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

fn cors_layer(origins: &[String]) -> anyhow::Result<CorsLayer> {
    let origins = origins
        .iter()
        .map(|o| HeaderValue::from_str(o))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_credentials(true)
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request()))
}

async fn root() -> Json<Value> {
    let endpoints: Vec<&str> = std::iter::once("/health")
        .chain(ANALYSIS_ENDPOINTS)
        .collect();
    Json(json!({
        "message": SERVICE_NAME,
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": endpoints,
    }))
}

async fn health(State(state): State<AppState>) -> Json<Value> {
    let device = state.models.device();
    let gpu_info = match device {
        Device::Cuda { gpu_name } => json!({
            "gpu_available": true,
            "gpu_name": gpu_name.as_deref().unwrap_or("unknown"),
        }),
        Device::Cpu => json!({
            "gpu_available": false,
            "using_device": device.display_name(),
        }),
    };

    Json(json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "device": device.display_name(),
        "models_loaded": state.models.models_loaded(),
        "gpu_info": gpu_info,
        "available_endpoints": ANALYSIS_ENDPOINTS,
    }))
}

async fn analyze_posts(
    State(state): State<AppState>,
    payload: Result<Json<PostAnalysisRequest>, JsonRejection>,
) -> Result<Json<PostAnalysisResponse>, ApiError> {
    let Json(request) = payload?;
    analysis::analyze_posts(&state.models, &request)
        .await
        .map(Json)
        .map_err(|e| ApiError::from_analysis("Analysis failed", e))
}

async fn generate_content_suggestions(
    payload: Result<Json<ContentSuggestionRequest>, JsonRejection>,
) -> Result<Json<ContentSuggestionsResponse>, ApiError> {
    let Json(request) = payload?;
    Ok(Json(analysis::generate_content_suggestions(&request)))
}

async fn analyze_overall_patterns(
    payload: Result<Json<OverallAnalysisRequest>, JsonRejection>,
) -> Result<Json<OverallInsights>, ApiError> {
    let Json(request) = payload?;
    analysis::analyze_overall_patterns(&request)
        .map(Json)
        .map_err(|e| ApiError::from_analysis("Overall analysis failed", e))
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
}

fn init_sentry(settings: &autosocial_core::config::Settings) -> Option<sentry::ClientInitGuard> {
    let dsn = settings.sentry_dsn.as_deref()?;
    Some(sentry::init((
        dsn,
        sentry::ClientOptions {
            release: sentry::release_name!(),
            ..Default::default()
        },
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use autosocial_core::inference::{
        SentimentModel, SentimentPrediction, ZeroShotClassifier, ZeroShotPrediction,
    };
    use axum::body::Body;
    use axum::http::{header, Method, Request, StatusCode};
    use std::sync::Arc;
    use tower::ServiceExt;

    struct AlwaysPositive;

    #[async_trait::async_trait]
    impl SentimentModel for AlwaysPositive {
        fn model_id(&self) -> &str {
            "always-positive"
        }

        async fn classify(&self, _text: &str) -> anyhow::Result<SentimentPrediction> {
            Ok(SentimentPrediction {
                label: "LABEL_2".to_string(),
                score: 0.95,
            })
        }
    }

    struct AlwaysEntertainment;

    #[async_trait::async_trait]
    impl ZeroShotClassifier for AlwaysEntertainment {
        fn model_id(&self) -> &str {
            "always-entertainment"
        }

        async fn classify(
            &self,
            _text: &str,
            candidate_labels: &[&str],
        ) -> anyhow::Result<ZeroShotPrediction> {
            anyhow::ensure!(candidate_labels.contains(&"Entertainment"));
            Ok(ZeroShotPrediction {
                labels: vec!["Entertainment".to_string()],
                scores: vec![0.8],
            })
        }
    }

    fn test_app(device: Device) -> Router {
        let models = ModelRegistry::new(
            Arc::new(AlwaysPositive),
            Arc::new(AlwaysEntertainment),
            device,
        );
        router(AppState { models })
    }

    async fn call(app: Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(v) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(v.to_string())
            }
            None => Body::empty(),
        };
        let res = app.oneshot(builder.body(body).unwrap()).await.unwrap();
        let status = res.status();
        let bytes = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn analyze_posts_returns_trend_summary() {
        let (status, body) = call(
            test_app(Device::Cpu),
            Method::POST,
            "/analyze-posts",
            Some(json!({
                "group_key": "premiere-week",
                "posts": [
                    {"content": "That finale! #showtime", "engagement_score": 900, "platform": "x"},
                    {"content": "Cannot stop watching", "engagement_score": 300}
                ]
            })),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["category"], "Entertainment");
        assert_eq!(body["trend_title"], "Entertainment Viral Trend: premiere-week");
        assert_eq!(body["ai_sentiment"], "positive (confidence: 0.95)");
        assert_eq!(body["insights"][1], "Average engagement score: 600.0");
        assert_eq!(body["content_themes"][0], "#showtime");
    }

    #[tokio::test]
    async fn analyze_posts_without_posts_is_400() {
        let (status, body) = call(
            test_app(Device::Cpu),
            Method::POST,
            "/analyze-posts",
            Some(json!({"group_key": "g", "posts": []})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["detail"], "No valid content found in posts");
    }

    #[tokio::test]
    async fn analyze_posts_with_bad_engagement_is_500() {
        let (status, body) = call(
            test_app(Device::Cpu),
            Method::POST,
            "/analyze-posts",
            Some(json!({"group_key": "g", "posts": [{"content": "hi", "engagement_score": "many"}]})),
        )
        .await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body["detail"]
            .as_str()
            .unwrap()
            .starts_with("Analysis failed: engagement_score"));
    }

    #[tokio::test]
    async fn malformed_body_is_rejected_with_detail() {
        let (status, body) = call(
            test_app(Device::Cpu),
            Method::POST,
            "/analyze-posts",
            Some(json!({"posts": "not a list"})),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(body["detail"].is_string());
    }

    #[tokio::test]
    async fn suggestions_always_has_four_entries() {
        let (status, body) = call(
            test_app(Device::Cpu),
            Method::POST,
            "/generate-content-suggestions",
            Some(json!({
                "trend_analysis": {"category": "Lifestyle"},
                "ai_insights": {"content_themes": ["#morning"], "viral_factors": []}
            })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let suggestions = body["suggestions"].as_array().unwrap();
        assert_eq!(suggestions.len(), 4);
        let confidences: Vec<f64> = suggestions
            .iter()
            .map(|s| s["confidence_score"].as_f64().unwrap())
            .collect();
        assert_eq!(confidences, vec![0.85, 0.80, 0.75, 0.78]);
    }

    #[tokio::test]
    async fn overall_patterns_without_posts_is_400() {
        let (status, body) = call(
            test_app(Device::Cpu),
            Method::POST,
            "/analyze-overall-patterns",
            Some(json!({"all_posts": []})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["detail"], "No posts provided for analysis");
    }

    #[tokio::test]
    async fn overall_patterns_reports_top_platform() {
        let (status, body) = call(
            test_app(Device::Cpu),
            Method::POST,
            "/analyze-overall-patterns",
            Some(json!({"all_posts": [
                {"platform": "instagram", "engagement_score": 50},
                {"platform": "tiktok", "engagement_score": 75}
            ]})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body["virality_insights"][1],
            "Tiktok shows highest engagement performance"
        );
        assert_eq!(
            body["platform_recommendations"]["instagram"],
            "Focus on instagram content - showing 50 engagement points"
        );
    }

    #[tokio::test]
    async fn health_reports_device_and_models() {
        let (status, body) = call(test_app(Device::Cpu), Method::GET, "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["device"], "CPU");
        assert_eq!(body["models_loaded"], 2);
        assert_eq!(body["gpu_info"]["gpu_available"], false);
        assert_eq!(body["available_endpoints"].as_array().unwrap().len(), 3);

        let gpu = Device::Cuda {
            gpu_name: Some("A10G".to_string()),
        };
        let (_, body) = call(test_app(gpu), Method::GET, "/health", None).await;
        assert_eq!(body["device"], "GPU (CUDA)");
        assert_eq!(body["gpu_info"]["gpu_name"], "A10G");
    }

    #[tokio::test]
    async fn root_reports_service_metadata() {
        let (status, body) = call(test_app(Device::Cpu), Method::GET, "/", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], SERVICE_NAME);
        assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
        assert_eq!(
            body["endpoints"],
            json!([
                "/health",
                "/analyze-posts",
                "/generate-content-suggestions",
                "/analyze-overall-patterns"
            ])
        );
    }

    #[test]
    fn cors_layer_rejects_invalid_origin() {
        assert!(cors_layer(&["http://localhost:3000".to_string()]).is_ok());
        assert!(cors_layer(&["bad\norigin".to_string()]).is_err());
    }
}
