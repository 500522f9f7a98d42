use std::{env, fs, ops::Deref, str::FromStr, sync::Arc};

use crate::{
    dao::get_path,
    error::Error,
    provider::{DatabasePool, HTTP},
    types::Urgency,
};

#[derive(Debug)]
pub struct AppState<T>(Arc<T>);

impl<T> AppState<T> {
    pub fn new(state: T) -> AppState<T> {
        AppState(Arc::new(state))
    }
}

impl<T> Clone for AppState<T> {
    fn clone(&self) -> AppState<T> {
        AppState(Arc::clone(&self.0))
    }
}

impl<T> Deref for AppState<T> {
    type Target = Arc<T>;

    fn deref(&self) -> &Arc<T> {
        &self.0
    }
}

#[derive(Debug)]
pub struct State {
    pub config: Config,
    pub database: DatabasePool,
    pub http: HTTP,
}

impl State {
    pub async fn new(
        config: Config,
        database: DatabasePool,
        http: HTTP,
    ) -> Result<State, Error> {
        Self::init_migrations(&database).await?;
        Ok(Self {
            config,
            database,
            http,
        })
    }

    async fn init_migrations(database: &DatabasePool) -> Result<(), Error> {
        let files = vec!["push_subscription.sql"];

        let dir = env!("CARGO_MANIFEST_DIR");

        for file in files {
            let data = get_path(dir, file)?;
            sqlx::query(data.as_str()).execute(&database.pool).await?;
        }

        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub server_host: String,
    pub port: u16,
    pub allowed_origins: Vec<String>,
    pub static_dir: String,
    pub database_url: String,
    pub timeout: u64,
    pub subject: String,
    pub ttl: i64,
    pub urgency: Urgency,
    pub expired_status_codes: Vec<u16>,
    pub vapid_private_key: Vec<u8>,
    pub vapid_public_key: Vec<u8>,
}

impl Config {
    /// Both halves of the VAPID key pair must be present before any
    /// delivery is attempted.
    pub fn has_vapid_keys(&self) -> bool {
        !self.vapid_private_key.is_empty()
            && !self.vapid_public_key.is_empty()
    }

    pub fn public_key_string(&self) -> String {
        String::from_utf8(self.vapid_public_key.clone())
            .map(|key| key.trim().to_owned())
            .unwrap_or_default()
    }
}

fn parse_config_vapid_keys() -> (Vec<u8>, Vec<u8>) {
    let directory = env!("CARGO_MANIFEST_DIR");
    let private_key_dir = format!("{}/cert/vapid_private.pem", directory);
    let public_key_dir = format!("{}/cert/vapid_public.b64", directory);

    let private_key = fs::read(&private_key_dir).unwrap_or_else(|_| {
        tracing::warn!("VAPID private key not found at {}", private_key_dir);
        Vec::new()
    });
    let public_key = fs::read(&public_key_dir).unwrap_or_else(|_| {
        tracing::warn!("VAPID public key not found at {}", public_key_dir);
        Vec::new()
    });

    (private_key, public_key)
}

pub fn get_configuration() -> Result<Config, Error> {
    let server_host = env::var("SERVER_HOST")?;
    let port: u16 = env::var("PORT")?.parse()?;
    let allowed_origins = env::var("ALLOWED_ORIGINS")?
        .split(',')
        .map(|item| item.to_owned())
        .collect::<Vec<String>>();
    let static_dir = format!(
        "{}/{}",
        env!("CARGO_MANIFEST_DIR"),
        env::var("STATIC_DIRECTORY")?
    );
    let database_url = env::var("DATABASE_URL")?;
    let timeout = env::var("TIMEOUT")?.parse()?;

    let subject = env::var("SUBJECT")?;
    let ttl: i64 = env::var("TTL")?.parse()?;
    let urgency = Urgency::from_str(&env::var("URGENCY")?)?;

    let codes = env::var("EXPIRED_STATUS_CODES")?
        .split(',')
        .map(|item| item.to_string())
        .collect::<Vec<String>>();
    let mut expired_status_codes = vec![];

    for code in codes {
        expired_status_codes.push(code.trim().parse::<u16>()?);
    }

    let (vapid_private_key, vapid_public_key) = parse_config_vapid_keys();

    let config = Config {
        server_host,
        port,
        allowed_origins,
        static_dir,
        database_url,
        timeout,
        subject,
        ttl,
        urgency,
        expired_status_codes,
        vapid_private_key,
        vapid_public_key,
    };

    Ok(config)
}

pub fn set_configuration() -> Result<(), Error> {
    let config_file: &str = ".env";

    let directory = env!("CARGO_MANIFEST_DIR");
    let path = format!("{}/{}", directory, config_file);

    let config_string = fs::read_to_string(path)?;
    parse_config_string(config_string)?;

    Ok(())
}

fn parse_config_string(config: String) -> Result<(), Error> {
    let params: Vec<Option<(&str, &str)>> = config
        .split('\n')
        .map(|s| {
            let element = s.find('=');
            if let Some(e) = element {
                return Some(s.split_at(e));
            }
            None
        })
        .map(|value| {
            if let Some((k, v)) = value {
                return Some((k, &v[1..]));
            }
            None
        })
        .collect();

    for (key, value) in params.into_iter().flatten() {
        std::env::set_var(key, value);
    }

    Ok(())
}
