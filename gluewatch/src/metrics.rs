use prometheus::Registry;

use crate::cloudwatch;
use crate::engine;
use crate::glue;
use crate::phases::eligibility;
use crate::Result;

#[tracing::instrument(level = "trace")]
pub fn register_metrics(registry: &Registry) -> Result<()> {
    registry.register(Box::new(glue::GLUE_API_TIME.clone()))?;
    registry.register(Box::new(glue::GLUE_ERRORS.clone()))?;

    registry.register(Box::new(eligibility::ELIGIBILITY_SELECTED_RUNS.clone()))?;

    registry.register(Box::new(cloudwatch::PUBLISH_TIME.clone()))?;
    registry.register(Box::new(cloudwatch::PUBLISHED_POINTS.clone()))?;
    registry.register(Box::new(cloudwatch::PUBLISH_ERRORS.clone()))?;

    registry.register(Box::new(engine::SWEEP_TIME.clone()))?;
    Ok(())
}

/// Render the registry in the prometheus text exposition format.
pub fn render_metrics(registry: &Registry) -> Result<String> {
    use prometheus::Encoder;

    let encoder = prometheus::TextEncoder::new();
    let mut buffer = Vec::new();
    encoder.encode(&registry.gather(), &mut buffer)?;
    Ok(String::from_utf8(buffer)?)
}
