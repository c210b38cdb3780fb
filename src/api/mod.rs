use crate::config::ApiConfig;
use crate::resolver::{ResolveError, Resolver};
use actix_cors::Cors;
use actix_web::{web, App, Error, HttpResponse, HttpServer};
use serde_json::json;
use std::sync::Arc;
use tracing::error;
use uuid::Uuid;

/// Generate a short request ID for correlation
fn generate_request_id() -> String {
    Uuid::new_v4().to_string()[..8].to_string()
}

/// Liveness endpoint: static payload, no tier traffic.
pub async fn health_check() -> Result<HttpResponse, Error> {
    Ok(HttpResponse::Ok().json(json!({ "status": "ok" })))
}

/// GET /calculator/{op}/{a}/{b}
/// Domain failures come back as 400 with the error text; collaborator
/// failures as 500.
pub async fn calculate(
    path: web::Path<(String, String, String)>,
    resolver: web::Data<Resolver>,
) -> Result<HttpResponse, Error> {
    let request_id = generate_request_id();
    let (op, a, b) = path.into_inner();

    match resolver.resolve(&op, &a, &b).await {
        Ok(resolution) => Ok(HttpResponse::Ok().json(json!({
            "result": resolution.result,
            "source": resolution.source,
            "request_id": request_id
        }))),
        Err(ResolveError::Calc(e)) => Ok(HttpResponse::BadRequest().json(json!({
            "error": e.to_string(),
            "request_id": request_id
        }))),
        Err(e) => {
            error!("[{}] Resolution failed: {}", request_id, e);
            Ok(HttpResponse::InternalServerError().json(json!({
                "error": e.to_string(),
                "request_id": request_id
            })))
        }
    }
}

/// Route table shared by the server factory and the HTTP tests.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health_check))
        .route("/calculator/{op}/{a}/{b}", web::get().to(calculate));
}

pub fn start_api_server(
    config: &ApiConfig,
    resolver: Arc<Resolver>,
) -> impl std::future::Future<Output = std::io::Result<()>> {
    let bind_addr = config.bind_addr();
    let resolver_data = web::Data::from(resolver);

    let http_server = HttpServer::new(move || {
        let cors = Cors::default()
            .allow_any_origin()
            .allowed_methods(vec!["GET"])
            .allowed_headers(vec![actix_web::http::header::CONTENT_TYPE])
            .max_age(3600);

        App::new()
            .app_data(resolver_data.clone())
            .wrap(cors)
            .configure(configure_routes)
    });

    http_server
        .bind(bind_addr.clone())
        .unwrap_or_else(|e| panic!("Failed to bind to {}: {}", bind_addr, e))
        .run()
}
