use crate::services::trainer;
use actix_web::rt;

/// Prints the model performance summary as JSON.
pub struct StatsCommand;

impl StatsCommand {
    pub fn new() -> Self {
        Self
    }
}

impl crate::console::commands::CallableTrait for StatsCommand {
    fn call(&self) -> Result<(), Box<dyn std::error::Error>> {
        rt::System::new().block_on(async {
            let (_settings, db_pool, responder) = super::connect().await?;
            let performance = trainer::performance(&db_pool, &responder).await?;
            println!("{}", serde_json::to_string_pretty(&performance)?);

            Ok(())
        })
    }
}
