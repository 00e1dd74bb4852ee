//! Page content commands.

use std::io::Write;

use atelier_client::ApiClient;

use super::{CommandError, require_admin};

pub async fn list(api: &ApiClient, out: &mut impl Write) -> Result<(), CommandError> {
    require_admin(api).await?;
    for block in api.list_content().await? {
        writeln!(
            out,
            "{:<24} {:<5} {}",
            block.page_key,
            block.content_type.as_str(),
            block.updated_at
        )?;
    }
    Ok(())
}

pub async fn show(api: &ApiClient, key: &str, out: &mut impl Write) -> Result<(), CommandError> {
    require_admin(api).await?;
    let block = api.get_content(key).await?;
    writeln!(out, "{}", block.content)?;
    Ok(())
}
