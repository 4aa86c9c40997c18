use std::sync::Arc;

use anyhow::Context;
use sea_orm::DatabaseConnection;

use crate::{
    catalog, config::Config, database, gateway::DealershipService, sentiment::SentimentService,
};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub db: DatabaseConnection,
    pub dealerships: DealershipService,
    pub sentiment: SentimentService,
}

impl AppState {
    pub async fn new(config: Config) -> anyhow::Result<AppState> {
        info!("connecting to database...");
        let db = database::connect(&config.database_url).await?;
        catalog::seed_if_empty(&db).await?;

        AppState::with_connection(config, db)
    }

    pub fn with_connection(config: Config, db: DatabaseConnection) -> anyhow::Result<AppState> {
        let client = reqwest::Client::builder()
            .timeout(config.upstream_timeout)
            .build()
            .context("failed to build http client")?;

        info!(
            "dealership service: {}, sentiment service: {}",
            config.dealership_api_url, config.sentiment_api_url
        );

        Ok(AppState {
            dealerships: DealershipService::new(client.clone(), config.dealership_api_url.clone()),
            sentiment: SentimentService::new(client, config.sentiment_api_url.clone()),
            config: Arc::new(config),
            db,
        })
    }
}
