//! Tracker server login command.
//!
//! Exchanges the configured email plus an interactively prompted password
//! for a bearer token, resolves the employee identity behind the token and
//! records the employee id in the configuration for later session queries.
//! The password is cached encrypted so a token refresh does not re-prompt;
//! the token itself lives in the encrypted [`TokenStore`].

use crate::api::tracker::{HttpGateway, PASSWORD_FILE, TOKEN_KEY};
use crate::api::GatewayError;
use crate::libs::config::Config;
use crate::libs::messages::Message;
use crate::libs::secret::{Secret, TokenStore};
use crate::{msg_bail_anyhow, msg_print, msg_success};
use anyhow::Result;

const LOGIN_ATTEMPTS: i32 = 3;

pub async fn cmd() -> Result<()> {
    let mut config = Config::read()?;
    let Some(mut tracker_config) = config.tracker.clone() else {
        msg_bail_anyhow!(Message::TrackerConfigNotFound);
    };

    let secret = Secret::new(PASSWORD_FILE, &Message::PromptEmployeePassword.to_string());
    let mut password = secret.get_or_prompt()?;

    let mut attempts_left = LOGIN_ATTEMPTS;
    let token = loop {
        match HttpGateway::login(&tracker_config, &tracker_config.email, &password).await {
            Ok(token) => break token,
            Err(GatewayError::Status { status: 401, .. }) => {
                attempts_left -= 1;
                if attempts_left == 0 {
                    msg_bail_anyhow!(Message::LoginFailed);
                }
                msg_print!(Message::WrongPassword(attempts_left));
                password = secret.prompt()?;
            }
            Err(err) => return Err(err.into()),
        }
    };

    TokenStore::set(TOKEN_KEY, &token)?;

    let gateway = HttpGateway::new(&tracker_config, &token);
    let me = gateway.me().await?;
    tracker_config.employee_id = Some(me.id);
    config.tracker = Some(tracker_config);
    config.save()?;

    msg_success!(Message::LoginSucceeded(me.name));
    Ok(())
}
