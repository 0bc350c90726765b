mod categorizer;
mod context;
mod dashboard;
mod database;
mod error;
mod handlers;
mod middlewares;
mod mirror;
mod models;
mod notifier;
mod response;
mod storer;
mod validation;

use std::sync::Arc;

use actix_web::web::{get, post, put, scope, Data};
use actix_web::{App, HttpServer};
use sqlx::postgres::PgPoolOptions;

use categorizer::CategoryAnalyzer;
use database::members::MemberRepository;
use middlewares::jwt::{Jwt, JWT_SECRET};
use mirror::{LogMirror, SheetMirror, WebhookMirror};
use notifier::{LogNotifier, Notifier, WebhookNotifier};
use storer::{FallbackStore, FileStore, LocalStore, S3Store};

#[actix_web::main]
async fn main() -> Result<(), std::io::Error> {
    dotenv::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let database_url = dotenv::var("DATABASE_URL").expect("environment variable DATABASE_URL not been set");
    let jwt_secret = dotenv::var(JWT_SECRET).expect("environment variable JWT_SECRET not been set");
    let upload_path = dotenv::var("UPLOAD_PATH").unwrap_or_else(|_| "uploads".to_owned());
    let public_base_url = dotenv::var("PUBLIC_BASE_URL").unwrap_or_else(|_| "http://localhost:8000".to_owned());

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await
        .expect("failed to connect to database");

    let store: Arc<dyn FileStore> = match dotenv::var("STORAGE_TYPE").as_deref() {
        Ok("s3") => {
            let bucket = dotenv::var("S3_BUCKET").expect("environment variable S3_BUCKET not been set");
            Arc::new(FallbackStore::new(
                S3Store::from_env(bucket).await,
                LocalStore::new(&upload_path, &public_base_url),
            ))
        }
        _ => Arc::new(LocalStore::new(&upload_path, &public_base_url)),
    };
    let notifier: Arc<dyn Notifier> = match dotenv::var("ADMIN_WEBHOOK_URL") {
        Ok(endpoint) => Arc::new(WebhookNotifier::new(endpoint)),
        Err(_) => Arc::new(LogNotifier),
    };
    let sheet_mirror: Arc<dyn SheetMirror> = match dotenv::var("SHEET_WEBHOOK_URL") {
        Ok(endpoint) => Arc::new(WebhookMirror::new(endpoint)),
        Err(_) => Arc::new(LogMirror),
    };
    let analyzer = CategoryAnalyzer::new(
        dotenv::var("LLM_API_BASE").unwrap_or_else(|_| "https://api.openai.com/v1".to_owned()),
        dotenv::var("LLM_API_KEY").unwrap_or_default(),
        dotenv::var("LLM_MODEL").unwrap_or_else(|_| "gpt-4o-mini".to_owned()),
    );

    let store = Data::from(store);
    let notifier = Data::from(notifier);
    let sheet_mirror = Data::from(sheet_mirror);
    let analyzer = Data::new(analyzer);

    HttpServer::new(move || {
        App::new()
            .wrap(actix_web::middleware::Logger::default())
            .app_data(Data::new(MemberRepository::new(pool.clone())))
            .app_data(store.clone())
            .app_data(notifier.clone())
            .app_data(sheet_mirror.clone())
            .app_data(analyzer.clone())
            .service(
                scope("/api")
                    .service(
                        scope("/members")
                            .route("", post().to(handlers::member::submit))
                            .route("/analyze_category", post().to(handlers::member::analyze_category)),
                    )
                    .route("/upload", post().to(handlers::upload::create))
                    .service(
                        scope("/admin")
                            .wrap(Jwt::new(jwt_secret.as_bytes()))
                            .service(
                                scope("/members")
                                    .route("", get().to(handlers::admin::list))
                                    .route("/export", get().to(handlers::admin::export))
                                    .route("/{member_id}", get().to(handlers::admin::detail))
                                    .route("/{member_id}/status", put().to(handlers::admin::update_status)),
                            ),
                    ),
            )
            .route("/health", get().to(handlers::health))
            .service(actix_files::Files::new("/static", &upload_path))
    })
    .bind(("0.0.0.0", 8000))?
    .run()
    .await
}
