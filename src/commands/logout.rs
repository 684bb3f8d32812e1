//! Tracker server logout command.
//!
//! Stops any active session first so the user is never left clocked in
//! after walking away; a failed stop is reported but does not block the
//! logout. The server-side token invalidation is best-effort, the local
//! token and cached password are always removed.

use crate::api::tracker::{PASSWORD_FILE, TOKEN_KEY};
use crate::libs::context::AppContext;
use crate::libs::messages::Message;
use crate::libs::secret::{Secret, TokenStore};
use crate::{msg_debug, msg_success};
use anyhow::Result;

pub async fn cmd() -> Result<()> {
    match AppContext::build() {
        Ok(ctx) => {
            ctx.tracker.reconcile().await?;
            ctx.tracker.stop_for_logout().await?;
            if let Err(err) = ctx.gateway.logout().await {
                msg_debug!(Message::ApiRequestFailed(err.to_string()));
            }
        }
        // Not logged in or not configured; still clear local credentials.
        Err(err) => msg_debug!(Message::ApiRequestFailed(err.to_string())),
    }

    TokenStore::remove(TOKEN_KEY)?;
    Secret::new(PASSWORD_FILE, "").delete()?;

    msg_success!(Message::LogoutCompleted);
    Ok(())
}
