use tracing::{error, Level};

use medtrax_reminders::{
    configuration::{
        get_configuration, set_configuration, AppState, Config, State,
    },
    error::Error,
    provider::DatabasePool,
    scheduler::Scheduler,
};

#[tokio::main]
async fn main() -> Result<(), Error> {
    let result = app_main().await;

    if let Err(err) = &result {
        error!("{}", err);
    }

    result
}

async fn app_main() -> Result<(), Error> {
    let subscriber = tracing_subscriber::fmt()
        .compact()
        .with_level(true)
        .with_max_level(Level::INFO)
        .with_file(true)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    let (config, database) = match init().await {
        Ok((config, database)) => (config, database),
        Err(e) => return Err(Error::ConfigurationError(e.to_string())),
    };

    let state = State::new(config, database).await?;
    let app_state = AppState::new(state);

    let mut scheduler = Scheduler::new(app_state);
    scheduler.start();

    tokio::signal::ctrl_c().await?;

    scheduler.shutdown().await
}

async fn init() -> Result<(Config, DatabasePool), Error> {
    set_configuration()?;
    let config = get_configuration()?;
    let database = DatabasePool::new(&config).await?;
    Ok((config, database))
}
