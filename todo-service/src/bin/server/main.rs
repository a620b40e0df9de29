use std::sync::Arc;

use sqlx::postgres::PgPoolOptions;
use todo_service::config::Config;
use todo_service::domain::authentication::ports::AuthenticationServicePort;
use todo_service::domain::authentication::service::AuthenticationService;
use todo_service::domain::user::ports::UserRepository;
use todo_service::domain::user::ports::UserServicePort;
use todo_service::domain::user::service::UserService;
use todo_service::inbound::http::router::create_router;
use todo_service::outbound::repositories::InMemoryUserRepository;
use todo_service::outbound::repositories::PostgresUserRepository;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "todo_service=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        service = "todo-service",
        version = env!("CARGO_PKG_VERSION"),
        "Service starting"
    );

    let config = Config::load()?;

    tracing::info!(
        http_port = config.server.http_port,
        database_configured = config.database.url.is_some(),
        access_token_expiry_minutes = config.jwt.access_token_expiry_minutes,
        refresh_token_expiry_hours = config.jwt.refresh_token_expiry_hours,
        "Configuration loaded"
    );

    let auth_config = config.jwt.auth_config()?;

    let (user_service, auth_service) = match &config.database.url {
        Some(url) => {
            let pg_pool = PgPoolOptions::new()
                .max_connections(5)
                .connect(url)
                .await?;
            tracing::info!(
                max_connections = 5,
                database = "postgresql",
                "Database connection pool created"
            );

            sqlx::migrate!("./migrations").run(&pg_pool).await?;
            tracing::info!(database = "postgresql", "Database migrations completed");

            build_services(Arc::new(PostgresUserRepository::new(pg_pool)), &auth_config)
        }
        None => {
            tracing::warn!("No database configured, users are kept in memory");
            build_services(Arc::new(InMemoryUserRepository::new()), &auth_config)
        }
    };

    let http_address = format!("0.0.0.0:{}", config.server.http_port);
    let http_listener = tokio::net::TcpListener::bind(&http_address).await?;
    tracing::info!(
        address = %http_address,
        port = config.server.http_port,
        protocol = "http",
        "Http server listening"
    );

    axum::serve(http_listener, create_router(user_service, auth_service)).await?;

    tracing::info!("Server exited successfully");
    Ok(())
}

fn build_services<UR: UserRepository>(
    repository: Arc<UR>,
    auth_config: &auth::AuthConfig,
) -> (
    Arc<dyn UserServicePort>,
    Arc<dyn AuthenticationServicePort>,
) {
    let user_service: Arc<dyn UserServicePort> =
        Arc::new(UserService::new(Arc::clone(&repository)));
    let auth_service: Arc<dyn AuthenticationServicePort> =
        Arc::new(AuthenticationService::new(repository, auth_config));
    (user_service, auth_service)
}
