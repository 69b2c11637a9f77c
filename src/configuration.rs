use std::{env, fs, ops::Deref, sync::Arc};

use crate::{
    dao::get_path, error::Error, provider::DatabasePool, push::WebPushClient,
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
    pub push: WebPushClient,
}

impl State {
    pub async fn new(
        config: Config,
        database: DatabasePool,
    ) -> Result<State, Error> {
        Self::init_migrations(&database).await?;
        let push = WebPushClient::new(&config)?;
        Ok(Self {
            config,
            database,
            push,
        })
    }

    async fn init_migrations(database: &DatabasePool) -> Result<(), Error> {
        let files = vec![
            "push_subscription.sql",
            "reminder_schedule.sql",
            "medicine_reminder.sql",
        ];

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
    pub database_url: String,
    pub timeout: u64,
    pub dispatch_interval: u64,
    pub sweep_interval: u64,
    pub mail_to: String,
    pub vapid_private_key: Vec<u8>,
    pub vapid_public_key: Vec<u8>,
}

fn parse_config_vapid_keys() -> Result<(Vec<u8>, Vec<u8>), Error> {
    let directory = env!("CARGO_MANIFEST_DIR");
    let private_key_dir = format!("{}/cert/vapid_private.pem", directory);
    let public_key_dir = format!("{}/cert/vapid_public.b64", directory);

    let private_key = fs::read(private_key_dir)?;
    let public_key = fs::read(public_key_dir)?;

    Ok((private_key, public_key))
}

fn env_u64_or(key: &str, default: u64) -> Result<u64, Error> {
    match env::var(key) {
        Ok(value) => Ok(value.parse()?),
        Err(_) => Ok(default),
    }
}

pub fn get_configuration() -> Result<Config, Error> {
    let database_url = env::var("DATABASE_URL")?;
    let timeout = env::var("TIMEOUT")?.parse()?;
    let dispatch_interval = env_u64_or("DISPATCH_INTERVAL_IN_SEC", 60)?;
    let sweep_interval = env_u64_or("SWEEP_INTERVAL_IN_SEC", 24 * 60 * 60)?;
    let mail_to: String = env::var("MAIL_TO")?;

    let (vapid_private_key, vapid_public_key) = parse_config_vapid_keys()?;

    let config = Config {
        database_url,
        timeout,
        dispatch_interval,
        sweep_interval,
        mail_to,
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
        if key.is_empty() {
            continue;
        }
        env::set_var(key, value);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interval_falls_back_to_default_when_unset() {
        env::remove_var("MEDTRAX_UNSET_INTERVAL");
        assert_eq!(env_u64_or("MEDTRAX_UNSET_INTERVAL", 60).unwrap(), 60);
    }

    #[test]
    fn interval_env_var_overrides_the_default() {
        env::set_var("MEDTRAX_SET_INTERVAL", "15");
        assert_eq!(env_u64_or("MEDTRAX_SET_INTERVAL", 60).unwrap(), 15);
    }

    #[test]
    fn non_numeric_interval_is_an_error() {
        env::set_var("MEDTRAX_BAD_INTERVAL", "soon");
        assert!(env_u64_or("MEDTRAX_BAD_INTERVAL", 60).is_err());
    }

    #[test]
    fn config_lines_without_a_key_are_skipped() {
        let config = String::from(
            "=orphan\nMEDTRAX_PARSED_KEY=value\nno_equals_line\n",
        );

        parse_config_string(config).unwrap();

        assert_eq!(env::var("MEDTRAX_PARSED_KEY").unwrap(), "value");
    }
}
