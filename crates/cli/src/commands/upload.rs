//! Upload commands.

use std::io::Write;
use std::path::Path;

use atelier_client::ApiClient;

use super::{CommandError, require_admin};

pub async fn upload(api: &ApiClient, path: &Path, out: &mut impl Write) -> Result<(), CommandError> {
    require_admin(api).await?;
    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or(CommandError::MissingArgument("FILE name"))?
        .to_owned();
    let bytes = tokio::fs::read(path).await?;

    let uploaded = api.upload(&file_name, bytes).await?;
    writeln!(out, "{}", api.resolve(&uploaded.url)?)?;
    tracing::info!(stored_as = %uploaded.filename, "Uploaded {file_name}");
    Ok(())
}

pub async fn delete(api: &ApiClient, name: &str) -> Result<(), CommandError> {
    require_admin(api).await?;
    let response = api.delete_upload(name).await?;
    tracing::info!("{}", response.message);
    Ok(())
}
