use std::process;
use std::sync::Arc;

use tracing::{Dispatch, Level, dispatcher, error, info};
use tracing_subscriber::fmt as tracing_fmt;

use vetrina::{
    application::{catalog::CatalogService, repos::ProductsRepo},
    cache::{CacheConfig, CatalogCache},
    config,
    infra::{
        db::PostgresRepositories,
        error::InfraError,
        http::{self, ApiState},
        telemetry,
    },
    reviews::{HttpReviewsClient, ReviewsClient},
};

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        report_application_error(&error);
        process::exit(1);
    }
}

fn report_application_error(error: &InfraError) {
    if dispatcher::has_been_set() {
        error!(error = %error, "application error");
        return;
    }

    let subscriber = tracing_fmt().with_max_level(Level::ERROR).finish();
    let dispatch = Dispatch::new(subscriber);
    dispatcher::with_default(&dispatch, || {
        error!(error = %error, "application error");
    });
}

async fn run() -> Result<(), InfraError> {
    let (cli_args, settings) = config::load_with_cli()
        .map_err(|err| InfraError::configuration(format!("failed to load configuration: {err}")))?;

    let command = cli_args
        .command
        .unwrap_or(config::Command::Serve(Box::<config::ServeArgs>::default()));

    telemetry::init(&settings.logging)?;

    match command {
        config::Command::Serve(_) => run_serve(settings).await,
    }
}

async fn run_serve(settings: config::Settings) -> Result<(), InfraError> {
    let repositories = init_repositories(&settings).await?;

    let cache = Arc::new(CatalogCache::new(CacheConfig::from(&settings.cache)));
    let reviews: Arc<dyn ReviewsClient> = Arc::new(HttpReviewsClient::new(&settings.reviews)?);
    let products: Arc<dyn ProductsRepo> = repositories;

    let catalog = Arc::new(CatalogService::new(products, reviews, cache));
    let router = http::build_router(ApiState { catalog });

    let addr = settings.server.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(InfraError::Io)?;

    info!(
        target = "vetrina::server",
        addr = %addr,
        "Catalog service listening"
    );

    axum::serve(listener, router.into_make_service())
        .await
        .map_err(InfraError::Io)?;

    Ok(())
}

async fn init_repositories(
    settings: &config::Settings,
) -> Result<Arc<PostgresRepositories>, InfraError> {
    let database_url = settings
        .database
        .url
        .as_ref()
        .ok_or_else(|| InfraError::configuration("database url is not configured"))?;

    let pool =
        PostgresRepositories::connect(database_url, settings.database.max_connections.get())
            .await
            .map_err(|err| InfraError::database(err.to_string()))?;

    PostgresRepositories::run_migrations(&pool)
        .await
        .map_err(|err| InfraError::database(err.to_string()))?;

    Ok(Arc::new(PostgresRepositories::new(pool)))
}
