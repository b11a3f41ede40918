//! API token commands

use clicktick_domain::constants::{TOKEN_DELETED_MESSAGE, TOKEN_SAVED_MESSAGE};
use clicktick_domain::Result;
use clicktick_infra::api::TokenStatus;
use tracing::info;

use crate::context::AppContext;
use crate::utils::command_helpers::execute_command;

/// Store a token for later runs and drop the cached user of the old one.
///
/// # Errors
/// `InvalidInput` when the token is malformed; nothing is stored then.
pub async fn set_token(ctx: &AppContext, token: &str) -> Result<&'static str> {
    execute_command("token::set", || async {
        ctx.tokens.set(token).await?;
        ctx.catalog.reset_user().await?;
        ctx.catalog.reset_teams().await?;
        Ok(TOKEN_SAVED_MESSAGE)
    })
    .await
}

/// Remove the stored token. `None` when there was nothing to delete.
pub async fn delete_token(ctx: &AppContext) -> Result<Option<&'static str>> {
    execute_command("token::delete", || async {
        let deleted = ctx.tokens.delete().await?;
        if deleted {
            ctx.catalog.reset_user().await?;
        }
        info!(deleted, "Stored token removed");
        Ok(deleted.then_some(TOKEN_DELETED_MESSAGE))
    })
    .await
}

/// Which token requests would use, masked.
pub async fn token_status(ctx: &AppContext) -> Result<TokenStatus> {
    execute_command("token::status", || async { ctx.tokens.status().await }).await
}
