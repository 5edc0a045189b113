use crate::services::trainer;
use actix_web::rt;

pub struct RetrainCommand;

impl RetrainCommand {
    pub fn new() -> Self {
        Self
    }
}

impl crate::console::commands::CallableTrait for RetrainCommand {
    fn call(&self) -> Result<(), Box<dyn std::error::Error>> {
        rt::System::new().block_on(async {
            let (_settings, db_pool, responder) = super::connect().await?;
            let performance = trainer::retrain(&db_pool, &responder).await?;
            println!(
                "Model {} retrained ({} sessions), exploration rate {:.3}",
                performance.model_version,
                performance.training_sessions,
                performance.parameters.exploration_rate
            );

            Ok(())
        })
    }
}
