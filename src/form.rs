//! Contact form submission.
//!
//! The flow is `Idle -> Validating -> Submitting -> Success | Failed -> Idle`.
//! The [`Submitter`] drives it against three collaborators so it can run
//! against the browser (see `contact`) or against test doubles:
//!
//! * [`LocationLookup`] enriches the payload with IP geolocation. Its failure
//!   degrades to a placeholder record and never blocks the submission.
//! * [`Webhook`] posts the JSON body and reports the HTTP status.
//! * [`FormView`] is everything the user sees: the input, the button, alerts
//!   and the success message.

use std::cell::Cell;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::config::FormSettings;
use crate::error::SiteError;

/// `[^\s@]+@[^\s@]+\.[^\s@]+`: one "@", no whitespace, and a dot in the
/// domain with something on both sides of it.
pub fn validate_email(email: &str) -> Result<&str, SiteError> {
    let mut parts = email.split('@');
    let (local, domain) = match (parts.next(), parts.next(), parts.next()) {
        (Some(local), Some(domain), None) => (local, domain),
        _ => return Err(SiteError::InvalidEmail),
    };
    if local.is_empty() || local.chars().any(char::is_whitespace) {
        return Err(SiteError::InvalidEmail);
    }
    if domain.chars().any(char::is_whitespace) {
        return Err(SiteError::InvalidEmail);
    }
    let dotted = domain
        .char_indices()
        .any(|(i, c)| c == '.' && i > 0 && i + c.len_utf8() < domain.len());
    if dotted {
        Ok(email)
    } else {
        Err(SiteError::InvalidEmail)
    }
}

/// Raw answer of the geolocation service.
#[derive(Debug, Default, Deserialize)]
pub struct IpApiResponse {
    pub ip: Option<String>,
    pub country_name: Option<String>,
    pub country_code: Option<String>,
    pub region: Option<String>,
    pub city: Option<String>,
    pub timezone: Option<String>,
    pub org: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeoInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ip: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub isp: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
}

impl From<IpApiResponse> for GeoInfo {
    fn from(raw: IpApiResponse) -> Self {
        GeoInfo {
            ip: raw.ip,
            country: raw.country_name,
            country_code: raw.country_code,
            region: raw.region,
            city: raw.city,
            timezone: raw.timezone,
            isp: raw.org,
            latitude: raw.latitude,
            longitude: raw.longitude,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UnknownLocation {
    pub ip: &'static str,
    pub country: &'static str,
    pub error: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Location {
    Known(GeoInfo),
    Unknown(UnknownLocation),
}

impl Location {
    pub fn unknown() -> Location {
        Location::Unknown(UnknownLocation {
            ip: "unknown",
            country: "unknown",
            error: "Failed to retrieve location data",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientContext {
    pub timestamp: String,
    pub user_agent: String,
    pub referrer: String,
    pub url: String,
}

/// Webhook body: the email under `email_key`, then the client context and
/// the location fields flattened next to it.
pub fn build_payload(
    email_key: &str,
    email: &str,
    client: &ClientContext,
    location: &Location,
) -> Result<Value, SiteError> {
    let mut body = Map::new();
    body.insert(email_key.to_owned(), Value::String(email.to_owned()));
    for part in [serde_json::to_value(client)?, serde_json::to_value(location)?] {
        if let Value::Object(fields) = part {
            body.extend(fields);
        }
    }
    Ok(Value::Object(body))
}

#[allow(async_fn_in_trait)]
pub trait LocationLookup {
    async fn lookup(&self) -> Result<Location, SiteError>;
}

#[allow(async_fn_in_trait)]
pub trait Webhook {
    /// Posts `body` as JSON and returns the response status.
    async fn post(&self, body: String) -> Result<u16, SiteError>;
}

pub trait FormView {
    fn email(&self) -> String;
    fn client_context(&self) -> ClientContext;
    fn alert(&self, message: &str);
    fn set_submit(&self, enabled: bool, label: &str);
    fn clear_email(&self);
    fn show_success(&self);
    fn hide_success_after(&self, delay_ms: u32);
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FormState {
    Idle,
    Validating,
    Submitting,
    Success,
    Failed,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Submission {
    Rejected,
    Delivered,
    Failed,
    // Another submission was still in flight
    Ignored,
}

pub struct Submitter<L, W, V> {
    lookup: L,
    webhook: W,
    view: V,
    settings: FormSettings,
    state: Cell<FormState>,
}

impl<L, W, V> Submitter<L, W, V>
where
    L: LocationLookup,
    W: Webhook,
    V: FormView,
{
    pub fn new(lookup: L, webhook: W, view: V, settings: FormSettings) -> Self {
        Submitter {
            lookup,
            webhook,
            view,
            settings,
            state: Cell::new(FormState::Idle),
        }
    }

    pub fn state(&self) -> FormState {
        self.state.get()
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    fn transition(&self, next: FormState) {
        log::debug!("contact form {:?} -> {:?}", self.state.get(), next);
        self.state.set(next);
    }

    pub async fn submit(&self) -> Submission {
        if self.state.get() != FormState::Idle {
            log::warn!("submission already in progress");
            return Submission::Ignored;
        }

        self.transition(FormState::Validating);
        let raw = self.view.email();
        let email = match validate_email(raw.trim()) {
            Ok(email) => email.to_owned(),
            Err(_) => {
                self.view.alert(self.settings.invalid_email_alert);
                self.transition(FormState::Idle);
                return Submission::Rejected;
            }
        };

        self.transition(FormState::Submitting);
        self.view.set_submit(false, self.settings.busy_label);

        let outcome = match self.deliver(&email).await {
            Ok(()) => {
                self.transition(FormState::Success);
                self.view.clear_email();
                self.view.set_submit(true, self.settings.idle_label);
                self.view.show_success();
                self.view.hide_success_after(self.settings.success_hide_ms);
                Submission::Delivered
            }
            Err(err) => {
                self.transition(FormState::Failed);
                log::error!("form submission error: {}", err);
                self.view.alert(self.settings.failure_alert);
                self.view.set_submit(true, self.settings.idle_label);
                Submission::Failed
            }
        };
        self.transition(FormState::Idle);
        outcome
    }

    async fn deliver(&self, email: &str) -> Result<(), SiteError> {
        let location = match self.lookup.lookup().await {
            Ok(location) => location,
            Err(err) => {
                log::error!("error getting user info: {}", err);
                Location::unknown()
            }
        };
        let client = self.view.client_context();
        let body = build_payload(self.settings.email_key, email, &client, &location)?;
        let status = self.webhook.post(body.to_string()).await?;
        if (200..300).contains(&status) {
            Ok(())
        } else {
            Err(SiteError::Http(status))
        }
    }
}
