//! HTTP client for the tracker server.
//!
//! Implements [`Gateway`] over the tracker's REST API: form-based JWT login,
//! JSON time-entry mutations and multipart screenshot uploads, all under
//! `/api/v1`. The bearer token is obtained by `timecap login` and persisted
//! through the encrypted [`TokenStore`](crate::libs::secret::TokenStore).

use crate::api::{Gateway, GatewayError, TaskRef};
use crate::libs::action::ScreenshotPayload;
use crate::libs::config::ConfigModule;
use crate::libs::messages::Message;
use crate::libs::network::NetIdentity;
use crate::libs::session::Session;
use anyhow::Result;
use chrono::{DateTime, Local, Utc};
use dialoguer::{theme::ColorfulTheme, Input};
use reqwest::{multipart, Client, Response};
use serde::{Deserialize, Serialize};

const API_PREFIX: &str = "api/v1";
const TOKEN_URL: &str = "auth/token";
const LOGOUT_URL: &str = "auth/logout";
const ME_URL: &str = "employees/me";
const TIME_ENTRIES_URL: &str = "time_entries";
const TASKS_URL: &str = "tasks";
const SCREENSHOTS_URL: &str = "screenshots";
const HEALTH_URL: &str = "health";

/// Key under which the bearer token is kept in the token store.
pub const TOKEN_KEY: &str = "tracker_token";

/// Encrypted file holding the cached login password.
pub const PASSWORD_FILE: &str = ".password";

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
}

/// Employee identity as reported by `employees/me`.
#[derive(Debug, Clone, Deserialize)]
pub struct EmployeeInfo {
    pub id: i64,
    pub email: String,
    pub name: String,
}

/// Wire shape of a time entry; timestamps arrive timezone-aware and are
/// converted to local naive time for storage and display.
#[derive(Deserialize)]
struct TimeEntryDto {
    id: i64,
    employee_id: i64,
    task_id: i64,
    start_time: DateTime<Utc>,
    end_time: Option<DateTime<Utc>>,
    is_active: bool,
}

impl From<TimeEntryDto> for Session {
    fn from(dto: TimeEntryDto) -> Self {
        Session {
            id: dto.id,
            employee_id: dto.employee_id,
            task_id: dto.task_id,
            start_time: dto.start_time.with_timezone(&Local).naive_local(),
            end_time: dto.end_time.map(|t| t.with_timezone(&Local).naive_local()),
            active: dto.is_active,
        }
    }
}

#[derive(Serialize)]
struct TimeEntryCreateBody {
    task_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    ip_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    mac_address: Option<String>,
}

/// Authenticated HTTP gateway against one tracker server.
pub struct HttpGateway {
    client: Client,
    config: TrackerConfig,
    token: String,
}

impl HttpGateway {
    pub fn new(config: &TrackerConfig, token: &str) -> Self {
        Self {
            client: Client::new(),
            config: config.clone(),
            token: token.to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}/{}", self.config.api_url.trim_end_matches('/'), API_PREFIX, path)
    }

    /// Maps a response into `GatewayError::Status` unless it is 2xx.
    async fn check(response: Response) -> Result<Response, GatewayError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(GatewayError::Status {
            status: status.as_u16(),
            body,
        })
    }

    /// Form login; returns the bearer token for the token store.
    pub async fn login(config: &TrackerConfig, email: &str, password: &str) -> Result<String, GatewayError> {
        let client = Client::new();
        let url = format!("{}/{}/{}", config.api_url.trim_end_matches('/'), API_PREFIX, TOKEN_URL);
        let form = [("email", email), ("password", password)];

        let response = client.post(url).form(&form).send().await?;
        let response = Self::check(response).await?;
        let token: TokenResponse = response.json().await.map_err(|e| GatewayError::Payload(e.to_string()))?;
        Ok(token.access_token)
    }

    /// Resolves the authenticated employee's identity.
    pub async fn me(&self) -> Result<EmployeeInfo, GatewayError> {
        let response = self.client.get(self.url(ME_URL)).bearer_auth(&self.token).send().await?;
        let response = Self::check(response).await?;
        response.json().await.map_err(|e| GatewayError::Payload(e.to_string()))
    }

    /// Invalidates the server-side token; best-effort.
    pub async fn logout(&self) -> Result<(), GatewayError> {
        let response = self.client.post(self.url(LOGOUT_URL)).bearer_auth(&self.token).send().await?;
        Self::check(response).await?;
        Ok(())
    }
}

impl Gateway for HttpGateway {
    async fn create_session(&self, task_id: i64, net: &NetIdentity) -> Result<Session, GatewayError> {
        let body = TimeEntryCreateBody {
            task_id,
            ip_address: net.ip.clone(),
            mac_address: net.mac.clone(),
        };

        let response = self.client.post(self.url(TIME_ENTRIES_URL)).bearer_auth(&self.token).json(&body).send().await?;
        let response = Self::check(response).await?;
        let dto: TimeEntryDto = response.json().await.map_err(|e| GatewayError::Payload(e.to_string()))?;
        Ok(dto.into())
    }

    async fn stop_session(&self, session_id: i64) -> Result<Session, GatewayError> {
        let url = self.url(&format!("{}/{}/stop", TIME_ENTRIES_URL, session_id));
        let response = self.client.post(url).bearer_auth(&self.token).send().await?;
        let response = Self::check(response).await?;
        let dto: TimeEntryDto = response.json().await.map_err(|e| GatewayError::Payload(e.to_string()))?;
        Ok(dto.into())
    }

    async fn active_session(&self, employee_id: i64) -> Result<Option<Session>, GatewayError> {
        let url = self.url(TIME_ENTRIES_URL);
        let response = self
            .client
            .get(url)
            .bearer_auth(&self.token)
            .query(&[("employee_id", employee_id.to_string()), ("active_only", "true".to_string())])
            .send()
            .await?;
        let response = Self::check(response).await?;
        let entries: Vec<TimeEntryDto> = response.json().await.map_err(|e| GatewayError::Payload(e.to_string()))?;
        Ok(entries.into_iter().next().map(Into::into))
    }

    async fn resolve_task(&self, task_id: i64) -> Result<TaskRef, GatewayError> {
        let url = self.url(&format!("{}/{}", TASKS_URL, task_id));
        let response = self.client.get(url).bearer_auth(&self.token).send().await?;
        let response = Self::check(response).await?;
        response.json().await.map_err(|e| GatewayError::Payload(e.to_string()))
    }

    async fn upload_screenshot(&self, shot: &ScreenshotPayload) -> Result<(), GatewayError> {
        let image = shot.image_bytes().map_err(|e| GatewayError::Payload(e.to_string()))?;
        let file_name = format!("capture_{}.png", shot.captured_at.format("%Y%m%d_%H%M%S"));

        let part = multipart::Part::bytes(image)
            .file_name(file_name)
            .mime_str("image/png")
            .map_err(|e| GatewayError::Payload(e.to_string()))?;

        let mut form = multipart::Form::new()
            .part("image", part)
            .text("employee_id", shot.employee_id.to_string())
            .text("time_entry_id", shot.session_id.to_string())
            .text("permission", shot.permission.to_string());

        if let Some(ip) = &shot.ip {
            form = form.text("ip", ip.clone());
        }
        if let Some(mac) = &shot.mac {
            form = form.text("mac", mac.clone());
        }

        let response = self.client.post(self.url(SCREENSHOTS_URL)).bearer_auth(&self.token).multipart(form).send().await?;
        Self::check(response).await?;
        Ok(())
    }

    async fn ping(&self) -> bool {
        let url = format!("{}/{}", self.config.api_url.trim_end_matches('/'), HEALTH_URL);
        match self.client.get(url).send().await {
            Ok(response) => response.status().is_success(),
            Err(_) => false,
        }
    }
}

/// Tracker server connection settings.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct TrackerConfig {
    pub api_url: String,
    pub email: String,
    /// Employee id resolved at login; required for the active-session
    /// reconciliation query.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub employee_id: Option<i64>,
}

impl TrackerConfig {
    pub fn module() -> ConfigModule {
        ConfigModule {
            key: "tracker".to_string(),
            name: "Tracker server".to_string(),
        }
    }

    pub fn init(config: &Option<TrackerConfig>) -> Result<Self> {
        let config = config.clone().unwrap_or(Self {
            api_url: "".to_string(),
            email: "".to_string(),
            employee_id: None,
        });
        crate::msg_print!(Message::ConfigModuleTracker);
        Ok(Self {
            api_url: Input::with_theme(&ColorfulTheme::default())
                .with_prompt(Message::PromptTrackerApiUrl.to_string())
                .default(config.api_url)
                .interact_text()?,
            email: Input::with_theme(&ColorfulTheme::default())
                .with_prompt(Message::PromptEmployeeEmail.to_string())
                .default(config.email)
                .interact_text()?,
            employee_id: config.employee_id,
        })
    }
}
