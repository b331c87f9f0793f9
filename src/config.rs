// src/config.rs

use anyhow::Context;
use sqlx::{postgres::PgPoolOptions, PgPool};
use std::{env, str::FromStr, time::Duration};

use crate::{
    db::{ProductRepository, PropertyRepository, TicketRepository, WarrantyRepository},
    services::{
        dashboard_service::DashboardService,
        ticket_service::TicketService,
        warranty::{ForecastPolicy, DEFAULT_LOOKAHEAD_DAYS, DEFAULT_UPCOMING_LIMIT},
        warranty_service::WarrantyService,
    },
};

// Configurações lidas do ambiente (.env)
#[derive(Debug, Clone)]
pub struct Settings {
    pub database_url: String,
    pub app_addr: String,
    pub db_max_connections: u32,
    pub db_acquire_timeout: Duration,
    pub policy: ForecastPolicy,
}

fn parse_or<T, F>(lookup: &F, key: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("{} inválido: {:?}", key, raw)),
        None => Ok(default),
    }
}

impl Settings {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup("DATABASE_URL").context("DATABASE_URL deve ser definida")?;
        let app_addr = lookup("APP_ADDR").unwrap_or_else(|| "0.0.0.0:3000".to_string());

        let db_max_connections = parse_or(&lookup, "DB_MAX_CONNECTIONS", 5u32)?;
        let acquire_secs = parse_or(&lookup, "DB_ACQUIRE_TIMEOUT_SECS", 3u64)?;

        let policy = ForecastPolicy {
            lookahead_days: parse_or(&lookup, "LOOKAHEAD_DIAS", DEFAULT_LOOKAHEAD_DAYS)?,
            upcoming_limit: parse_or(&lookup, "DASHBOARD_LIMITE_PREVENTIVOS", DEFAULT_UPCOMING_LIMIT)?,
        };

        Ok(Self {
            database_url,
            app_addr,
            db_max_connections,
            db_acquire_timeout: Duration::from_secs(acquire_secs),
            policy,
        })
    }
}

#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub warranty_service: WarrantyService,
    pub ticket_service: TicketService,
    pub dashboard_service: DashboardService,
}

impl AppState {
    pub async fn new(settings: &Settings) -> anyhow::Result<Self> {
        // Conecta ao banco de dados, usando '?' para propagar erros
        let db_pool = PgPoolOptions::new()
            .max_connections(settings.db_max_connections)
            .acquire_timeout(settings.db_acquire_timeout)
            .connect(&settings.database_url)
            .await
            .context("Falha ao conectar ao banco de dados")?;

        tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");

        Ok(Self::with_pool(db_pool, settings.policy))
    }

    // --- Monta o gráfico de dependências ---
    pub fn with_pool(db_pool: PgPool, policy: ForecastPolicy) -> Self {
        let property_repo = PropertyRepository::new();
        let product_repo = ProductRepository::new();
        let warranty_repo = WarrantyRepository::new();
        let ticket_repo = TicketRepository::new();

        let warranty_service = WarrantyService::new(
            warranty_repo.clone(),
            property_repo.clone(),
            product_repo.clone(),
        );
        let ticket_service = TicketService::new(ticket_repo.clone(), warranty_service.clone());
        let dashboard_service = DashboardService::new(
            property_repo,
            product_repo,
            warranty_repo,
            ticket_repo,
            policy,
        );

        Self {
            db_pool,
            warranty_service,
            ticket_service,
            dashboard_service,
        }
    }
}
