mod retrain;
mod stats;

pub use retrain::RetrainCommand;
pub use stats::StatsCommand;

use crate::configuration::{get_configuration, Settings};
use crate::services::Responder;
use sqlx::PgPool;

async fn connect() -> Result<(Settings, PgPool, Responder), Box<dyn std::error::Error>> {
    let settings = get_configuration()?;
    let db_pool = PgPool::connect(&settings.database.connection_string()).await?;
    let responder = Responder::from_settings(&settings);

    Ok((settings, db_pool, responder))
}
