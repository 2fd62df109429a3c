use log::{debug, info};

use crate::{
    error::SubmissionError,
    fusion_api::{MODELS_PATH, ModelDescriptor, RUN_PATH, RunParams, RunResponse},
    job::{GenerationRequest, Job},
    transport::{Form, Transport},
};

/// Starts a text-to-image job and returns it in the `Submitted` state.
///
/// The first model the service lists is used. The run request is sent exactly
/// once; a failed POST is never retried so no duplicate job can be created.
pub async fn submit<T: Transport + ?Sized>(
    request: &GenerationRequest,
    transport: &T,
) -> Result<Job, SubmissionError> {
    let models = transport.get_json(MODELS_PATH).await?;
    debug!("Models: {models}");
    let models: Vec<ModelDescriptor> = serde_json::from_value(models)
        .map_err(|e| SubmissionError::failed(format!("malformed model list: {e}")))?;
    let model = models
        .into_iter()
        .next()
        .ok_or_else(|| SubmissionError::failed("the service offers no models"))?;
    info!(
        "Using model {} ({})",
        model.id.0,
        model.name.as_deref().unwrap_or("unnamed")
    );

    let params = serde_json::to_string(&RunParams::from_request(request))
        .map_err(|e| SubmissionError::failed(format!("could not encode params: {e}")))?;
    let form = Form::new().text("model_id", model.id.0).json("params", params);

    let response = transport.post_multipart(RUN_PATH, form).await?;
    debug!("Run response: {response}");
    let response: RunResponse = serde_json::from_value(response)
        .map_err(|e| SubmissionError::failed(format!("malformed run response: {e}")))?;
    let uuid = response
        .uuid
        .filter(|id| !id.is_empty())
        .ok_or_else(|| SubmissionError::failed("run response carries no job id"))?;

    info!(
        "Submitted job {uuid} (status {})",
        response.status.as_deref().unwrap_or("unknown")
    );
    Ok(Job::submitted(uuid, request.prompt().to_string()))
}
