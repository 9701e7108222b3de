// Tool dispatch: maps a tool invocation onto one Veil Mail API request

use crate::protocol::CallToolResult;
use crate::tools::registry::{UnknownTool, VeilMailTool};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tracing::{debug, warn};
use veilmail_sdk::{path_segment, ApiRequest, QueryString, VeilMailClient, VeilMailError};

/// Errors raised while handling a tool call. All of them end up as
/// error-flagged text results.
#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    #[error("VEILMAIL_API_KEY environment variable is not set. Please set it to your VeilMail API key.")]
    MissingApiKey,

    #[error(transparent)]
    UnknownTool(#[from] UnknownTool),

    #[error("Invalid arguments for {tool}: {source}")]
    InvalidArguments {
        tool: VeilMailTool,
        #[source]
        source: serde_json::Error,
    },

    #[error(transparent)]
    Api(#[from] VeilMailError),

    #[error("Failed to serialize JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Rendered in place of an absent path argument; the API answers it as an
/// unknown id.
const ABSENT_SEGMENT: &str = "undefined";

// Argument shapes. Every field is optional: required-ness is documented in
// the schema and enforced by the API, not here. A field given as `null`
// stays `Some(Value::Null)` and is forwarded; only absent fields are dropped.

fn present<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct SendEmailArgs {
    #[serde(deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    from: Option<Value>,
    #[serde(deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    to: Option<Value>,
    #[serde(deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    subject: Option<Value>,
    #[serde(deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    html: Option<Value>,
    #[serde(deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    text: Option<Value>,
    #[serde(deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    template_id: Option<Value>,
    #[serde(deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    template_data: Option<Value>,
    #[serde(deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    cc: Option<Value>,
    #[serde(deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    bcc: Option<Value>,
    #[serde(deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    reply_to: Option<Value>,
    #[serde(deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    scheduled_for: Option<Value>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct IdArgs {
    #[serde(deserialize_with = "present")]
    id: Option<Value>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ListEmailsArgs {
    #[serde(deserialize_with = "present")]
    limit: Option<Value>,
    #[serde(deserialize_with = "present")]
    status: Option<Value>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
struct ValidateEmailArgs {
    #[serde(deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    email: Option<Value>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct LimitArgs {
    #[serde(deserialize_with = "present")]
    limit: Option<Value>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct AddSubscriberArgs {
    #[serde(deserialize_with = "present", skip_serializing)]
    audience_id: Option<Value>,
    #[serde(deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    email: Option<Value>,
    #[serde(deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    first_name: Option<Value>,
    #[serde(deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    last_name: Option<Value>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct AnalyticsArgs {
    #[serde(deserialize_with = "present")]
    days: Option<Value>,
}

impl VeilMailTool {
    /// Build the API request for this tool from its raw arguments.
    pub fn build_request(self, arguments: Value) -> Result<ApiRequest, DispatchError> {
        let request = match self {
            Self::SendEmail => {
                let args: SendEmailArgs = parse_args(self, arguments)?;
                ApiRequest::post("/v1/emails", serde_json::to_value(args)?)
            }
            Self::GetEmail => {
                let args: IdArgs = parse_args(self, arguments)?;
                ApiRequest::get(format!("/v1/emails/{}", segment(args.id.as_ref())))
            }
            Self::ListEmails => {
                let args: ListEmailsArgs = parse_args(self, arguments)?;
                let qs = QueryString::new()
                    .param("limit", args.limit.as_ref())
                    .param("status", args.status.as_ref());
                ApiRequest::get(format!("/v1/emails{}", qs))
            }
            Self::ValidateEmail => {
                let args: ValidateEmailArgs = parse_args(self, arguments)?;
                ApiRequest::post("/v1/emails/validate", serde_json::to_value(args)?)
            }
            Self::ListTemplates => {
                let args: LimitArgs = parse_args(self, arguments)?;
                let qs = QueryString::new().param("limit", args.limit.as_ref());
                ApiRequest::get(format!("/v1/templates{}", qs))
            }
            Self::GetTemplate => {
                let args: IdArgs = parse_args(self, arguments)?;
                ApiRequest::get(format!("/v1/templates/{}", segment(args.id.as_ref())))
            }
            Self::ListDomains => ApiRequest::get("/v1/domains"),
            Self::ListAudiences => ApiRequest::get("/v1/audiences"),
            Self::AddSubscriber => {
                let args: AddSubscriberArgs = parse_args(self, arguments)?;
                let audience = segment(args.audience_id.as_ref());
                ApiRequest::post(
                    format!("/v1/audiences/{}/subscribers", audience),
                    serde_json::to_value(args)?,
                )
            }
            Self::GetAnalytics => {
                let args: AnalyticsArgs = parse_args(self, arguments)?;
                let qs = QueryString::new().param("days", args.days.as_ref());
                ApiRequest::get(format!("/v1/analytics/overview{}", qs))
            }
        };

        Ok(request)
    }
}

fn parse_args<T: DeserializeOwned + Default>(
    tool: VeilMailTool,
    arguments: Value,
) -> Result<T, DispatchError> {
    if arguments.is_null() {
        return Ok(T::default());
    }
    serde_json::from_value(arguments)
        .map_err(|source| DispatchError::InvalidArguments { tool, source })
}

fn segment(value: Option<&Value>) -> String {
    value
        .map(path_segment)
        .unwrap_or_else(|| ABSENT_SEGMENT.to_string())
}

/// Executes tool calls against the Veil Mail API.
///
/// Holds only immutable configuration and the HTTP client, so clones can
/// serve concurrent calls without coordination.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    client: VeilMailClient,
}

impl Dispatcher {
    pub fn new(client: VeilMailClient) -> Self {
        Self { client }
    }

    /// Run one tool call. Failures are returned as error-flagged results.
    pub async fn invoke(&self, name: &str, arguments: Option<Value>) -> CallToolResult {
        match self.try_invoke(name, arguments.unwrap_or(Value::Null)).await {
            Ok(text) => CallToolResult::text(text),
            Err(e) => {
                warn!(tool = name, error = %e, "Tool call failed");
                CallToolResult::error(e.to_string())
            }
        }
    }

    async fn try_invoke(&self, name: &str, arguments: Value) -> Result<String, DispatchError> {
        if !self.client.has_api_key() {
            return Err(DispatchError::MissingApiKey);
        }

        let tool: VeilMailTool = name.parse()?;
        let request = tool.build_request(arguments)?;
        debug!(tool = %tool, method = %request.method, path = %request.path, "Dispatching tool call");

        let result = self.client.execute(&request).await?;
        Ok(serde_json::to_string_pretty(&result)?)
    }
}
