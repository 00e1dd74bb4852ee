//! Custom request queue commands.

use std::io::Write;

use atelier_client::{ApiClient, CustomRequestWorkflow};
use atelier_core::{CustomRequest, CustomRequestId, RequestAction};

use super::{CommandError, require_admin};

pub async fn list(api: &ApiClient, out: &mut impl Write) -> Result<(), CommandError> {
    require_admin(api).await?;
    let requests = CustomRequestWorkflow::new(api.clone()).refresh().await?;
    write_requests(&requests, out)?;
    Ok(())
}

pub async fn accept(
    api: &ApiClient,
    id: CustomRequestId,
    out: &mut impl Write,
) -> Result<(), CommandError> {
    transition(api, id, RequestAction::Accept, out).await
}

pub async fn reject(
    api: &ApiClient,
    id: CustomRequestId,
    out: &mut impl Write,
) -> Result<(), CommandError> {
    transition(api, id, RequestAction::Reject, out).await
}

pub async fn complete(
    api: &ApiClient,
    id: CustomRequestId,
    out: &mut impl Write,
) -> Result<(), CommandError> {
    transition(api, id, RequestAction::Complete, out).await
}

async fn transition(
    api: &ApiClient,
    id: CustomRequestId,
    action: RequestAction,
    out: &mut impl Write,
) -> Result<(), CommandError> {
    require_admin(api).await?;
    let workflow = CustomRequestWorkflow::new(api.clone());
    workflow.refresh().await?;
    let requests = workflow.apply(id, action).await?;
    if let Some(status) = workflow.status_of(id).await {
        tracing::info!("Request #{id} is now {status}");
    }
    write_requests(&requests, out)?;
    Ok(())
}

fn write_requests(requests: &[CustomRequest], out: &mut impl Write) -> std::io::Result<()> {
    for request in requests {
        writeln!(
            out,
            "#{:<5} {:<11} {:<24} {} <{}>  budget: {}  timeline: {}",
            request.id,
            request.status.as_str(),
            request.project_title,
            request.customer_name,
            request.customer_email,
            request.budget_range.as_deref().unwrap_or("-"),
            request.timeline.as_deref().unwrap_or("-"),
        )?;
    }
    Ok(())
}
