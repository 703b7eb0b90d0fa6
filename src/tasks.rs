//! Task payload builders for the supported captcha families.
//!
//! Each builder is a thin field enumeration that serializes into the task
//! mapping sent inside the creation envelope; the shared solve lifecycle
//! consumes them uniformly through [`CaptchaTask`]. Validation of field
//! ranges is deliberately left to the service, which reports violations
//! through its ordinary error payloads.

use serde::Serialize;
use serde_json::Value;
use std::time::Duration;

/// A task-type-specific payload that can drive the shared solve lifecycle.
///
/// Implementors supply the wire `type` discriminator and, optionally, a
/// better first-poll delay for their task family; everything else comes from
/// the struct's own serialization.
pub trait CaptchaTask: Serialize {
    /// Wire value of the task `type` discriminator.
    fn task_type(&self) -> &'static str;

    /// Service-documented minimum solve time for this task family, used as
    /// the delay before the first result poll.
    fn initial_wait(&self) -> Duration {
        Duration::from_secs(5)
    }

    /// The task mapping with the `type` discriminator injected.
    fn to_task_value(&self) -> Value {
        let mut value = serde_json::to_value(self).unwrap_or_else(|_| Value::Object(Default::default()));
        if let Value::Object(map) = &mut value {
            map.insert("type".into(), Value::String(self.task_type().into()));
        }
        value
    }
}

// ---------------------------------------------------------------------------
// ImageToText
// ---------------------------------------------------------------------------

/// Classic image captcha: the worker types back the text in the picture.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageToText {
    /// Base64-encoded image file content.
    body: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    phrase: Option<bool>,

    #[serde(rename = "case", skip_serializing_if = "Option::is_none")]
    case_sensitive: Option<bool>,

    /// 0 = no requirement, 1 = digits only, 2 = no digits.
    #[serde(skip_serializing_if = "Option::is_none")]
    numeric: Option<u8>,

    #[serde(skip_serializing_if = "Option::is_none")]
    math: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    min_length: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    max_length: Option<u32>,

    /// Free-form hint shown to the worker alongside the image.
    #[serde(skip_serializing_if = "Option::is_none")]
    comment: Option<String>,
}

impl ImageToText {
    /// Build a task from raw image bytes.
    pub fn from_bytes(image: &[u8]) -> Self {
        use base64::Engine as _;
        Self::from_base64(base64::engine::general_purpose::STANDARD.encode(image))
    }

    /// Build a task from an already base64-encoded image.
    pub fn from_base64(body: impl Into<String>) -> Self {
        Self {
            body: body.into(),
            phrase: None,
            case_sensitive: None,
            numeric: None,
            math: None,
            min_length: None,
            max_length: None,
            comment: None,
        }
    }

    /// Require the answer to contain multiple words.
    pub fn phrase(mut self, phrase: bool) -> Self {
        self.phrase = Some(phrase);
        self
    }

    /// Require case-sensitive entry.
    pub fn case_sensitive(mut self, case_sensitive: bool) -> Self {
        self.case_sensitive = Some(case_sensitive);
        self
    }

    /// Constrain the answer alphabet (see field docs for the encoding).
    pub fn numeric(mut self, numeric: u8) -> Self {
        self.numeric = Some(numeric);
        self
    }

    /// Mark the captcha as a math expression to evaluate.
    pub fn math(mut self, math: bool) -> Self {
        self.math = Some(math);
        self
    }

    /// Bound the expected answer length.
    pub fn length_bounds(mut self, min: u32, max: u32) -> Self {
        self.min_length = Some(min);
        self.max_length = Some(max);
        self
    }

    /// Attach a worker-visible hint.
    pub fn comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }
}

impl CaptchaTask for ImageToText {
    fn task_type(&self) -> &'static str {
        "ImageToTextTask"
    }
}

// ---------------------------------------------------------------------------
// reCAPTCHA v2 / v3
// ---------------------------------------------------------------------------

/// reCAPTCHA v2 solved from the service's own proxies.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecaptchaV2 {
    #[serde(rename = "websiteURL")]
    website_url: String,
    website_key: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    is_invisible: Option<bool>,

    /// Value of the `data-s` attribute found on some Google-owned pages.
    #[serde(rename = "recaptchaDataSValue", skip_serializing_if = "Option::is_none")]
    data_s_value: Option<String>,
}

impl RecaptchaV2 {
    pub fn new(website_url: impl Into<String>, website_key: impl Into<String>) -> Self {
        Self {
            website_url: website_url.into(),
            website_key: website_key.into(),
            is_invisible: None,
            data_s_value: None,
        }
    }

    /// Mark the widget as the invisible variant.
    pub fn invisible(mut self, invisible: bool) -> Self {
        self.is_invisible = Some(invisible);
        self
    }

    pub fn data_s_value(mut self, value: impl Into<String>) -> Self {
        self.data_s_value = Some(value.into());
        self
    }
}

impl CaptchaTask for RecaptchaV2 {
    fn task_type(&self) -> &'static str {
        "RecaptchaV2TaskProxyless"
    }

    fn initial_wait(&self) -> Duration {
        Duration::from_secs(10)
    }
}

/// Score-based reCAPTCHA v3.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecaptchaV3 {
    #[serde(rename = "websiteURL")]
    website_url: String,
    website_key: String,

    /// Target score the token should reach; the service accepts 0.3/0.7/0.9.
    min_score: f64,

    #[serde(skip_serializing_if = "Option::is_none")]
    page_action: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    is_enterprise: Option<bool>,
}

impl RecaptchaV3 {
    pub fn new(
        website_url: impl Into<String>,
        website_key: impl Into<String>,
        min_score: f64,
    ) -> Self {
        Self {
            website_url: website_url.into(),
            website_key: website_key.into(),
            min_score,
            page_action: None,
            is_enterprise: None,
        }
    }

    /// Set the action name the target page passes to `grecaptcha.execute`.
    pub fn page_action(mut self, action: impl Into<String>) -> Self {
        self.page_action = Some(action.into());
        self
    }

    pub fn enterprise(mut self, enterprise: bool) -> Self {
        self.is_enterprise = Some(enterprise);
        self
    }
}

impl CaptchaTask for RecaptchaV3 {
    fn task_type(&self) -> &'static str {
        "RecaptchaV3TaskProxyless"
    }

    fn initial_wait(&self) -> Duration {
        Duration::from_secs(10)
    }
}

// ---------------------------------------------------------------------------
// FunCaptcha
// ---------------------------------------------------------------------------

/// Arkose Labs FunCaptcha.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FunCaptcha {
    #[serde(rename = "websiteURL")]
    website_url: String,
    website_public_key: String,

    #[serde(rename = "funcaptchaApiJSSubdomain", skip_serializing_if = "Option::is_none")]
    api_js_subdomain: Option<String>,

    /// Additional `data[blob]` payload some deployments require.
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<String>,
}

impl FunCaptcha {
    pub fn new(website_url: impl Into<String>, website_public_key: impl Into<String>) -> Self {
        Self {
            website_url: website_url.into(),
            website_public_key: website_public_key.into(),
            api_js_subdomain: None,
            data: None,
        }
    }

    pub fn api_js_subdomain(mut self, subdomain: impl Into<String>) -> Self {
        self.api_js_subdomain = Some(subdomain.into());
        self
    }

    pub fn data(mut self, data: impl Into<String>) -> Self {
        self.data = Some(data.into());
        self
    }
}

impl CaptchaTask for FunCaptcha {
    fn task_type(&self) -> &'static str {
        "FunCaptchaTaskProxyless"
    }

    fn initial_wait(&self) -> Duration {
        Duration::from_secs(10)
    }
}

// ---------------------------------------------------------------------------
// GeeTest
// ---------------------------------------------------------------------------

/// GeeTest slider/behavior captcha, versions 3 and 4.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeeTest {
    #[serde(rename = "websiteURL")]
    website_url: String,

    /// Site domain key (`gt`).
    gt: String,

    /// One-time challenge token; required for version 3, absent for 4.
    #[serde(skip_serializing_if = "Option::is_none")]
    challenge: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    version: Option<u8>,

    /// `initParameters` object passed to v4 widgets.
    #[serde(skip_serializing_if = "Option::is_none")]
    init_parameters: Option<Value>,
}

impl GeeTest {
    /// Version 3 task with its per-request challenge token.
    pub fn v3(
        website_url: impl Into<String>,
        gt: impl Into<String>,
        challenge: impl Into<String>,
    ) -> Self {
        Self {
            website_url: website_url.into(),
            gt: gt.into(),
            challenge: Some(challenge.into()),
            version: None,
            init_parameters: None,
        }
    }

    /// Version 4 task; the widget derives its own challenge.
    pub fn v4(website_url: impl Into<String>, gt: impl Into<String>) -> Self {
        Self {
            website_url: website_url.into(),
            gt: gt.into(),
            challenge: None,
            version: Some(4),
            init_parameters: None,
        }
    }

    pub fn init_parameters(mut self, params: Value) -> Self {
        self.init_parameters = Some(params);
        self
    }
}

impl CaptchaTask for GeeTest {
    fn task_type(&self) -> &'static str {
        "GeeTestTaskProxyless"
    }

    fn initial_wait(&self) -> Duration {
        Duration::from_secs(10)
    }
}

// ---------------------------------------------------------------------------
// Turnstile
// ---------------------------------------------------------------------------

/// Cloudflare Turnstile.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Turnstile {
    #[serde(rename = "websiteURL")]
    website_url: String,
    website_key: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    action: Option<String>,
}

impl Turnstile {
    pub fn new(website_url: impl Into<String>, website_key: impl Into<String>) -> Self {
        Self {
            website_url: website_url.into(),
            website_key: website_key.into(),
            action: None,
        }
    }

    pub fn action(mut self, action: impl Into<String>) -> Self {
        self.action = Some(action.into());
        self
    }
}

impl CaptchaTask for Turnstile {
    fn task_type(&self) -> &'static str {
        "TurnstileTaskProxyless"
    }

    fn initial_wait(&self) -> Duration {
        Duration::from_secs(10)
    }
}

// ---------------------------------------------------------------------------
// AntiGate (custom templated tasks)
// ---------------------------------------------------------------------------

/// Custom workflow executed by a worker following a named scenario template.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AntiGate {
    #[serde(rename = "websiteURL")]
    website_url: String,

    /// Name of the scenario template registered with the service.
    template_name: String,

    /// Free-form variables consumed by the template.
    variables: Value,
}

impl AntiGate {
    pub fn new(
        website_url: impl Into<String>,
        template_name: impl Into<String>,
        variables: Value,
    ) -> Self {
        Self {
            website_url: website_url.into(),
            template_name: template_name.into(),
            variables,
        }
    }
}

impl CaptchaTask for AntiGate {
    fn task_type(&self) -> &'static str {
        "AntiGateTask"
    }

    /// Template runs involve a full browser session; first poll comes later.
    fn initial_wait(&self) -> Duration {
        Duration::from_secs(15)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
