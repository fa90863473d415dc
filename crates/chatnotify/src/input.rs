use crate::error::{NotifyError, Result};

/// The six values that describe one validation result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationRequest {
    pub name: String,
    pub url: String,
    pub validation_id: String,
    pub validation_status: String,
    pub validation_url: String,
    pub validation_details: String,
}

/// Raw, possibly absent inputs as collected from flags and the CI host.
#[derive(Debug, Clone, Default)]
pub struct RawInputs {
    pub name: Option<String>,
    pub url: Option<String>,
    pub validation_id: Option<String>,
    pub validation_status: Option<String>,
    pub validation_url: Option<String>,
    pub validation_details: Option<String>,
}

impl RawInputs {
    /// Resolve every input, failing on the first one that is missing.
    pub fn into_request(self) -> Result<NotificationRequest> {
        self.resolve(true)
    }

    /// Like [`RawInputs::into_request`] but `url` may be absent; used when
    /// nothing is sent.
    pub fn into_preview(self) -> Result<NotificationRequest> {
        self.resolve(false)
    }

    fn resolve(self, need_url: bool) -> Result<NotificationRequest> {
        Ok(NotificationRequest {
            name: required("name", self.name)?,
            url: if need_url {
                required("url", self.url)?
            } else {
                self.url.unwrap_or_default()
            },
            validation_id: required("validationId", self.validation_id)?,
            validation_status: required("validationStatus", self.validation_status)?,
            validation_url: required("validationUrl", self.validation_url)?,
            validation_details: required("validationDetails", self.validation_details)?,
        })
    }
}

// CI hosts hand over unset inputs as empty strings.
fn required(name: &'static str, value: Option<String>) -> Result<String> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(NotifyError::MissingInput(name)),
    }
}
