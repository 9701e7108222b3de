// Veil Mail tool definitions

use crate::protocol::ToolSchema;
use serde_json::json;
use std::fmt;
use std::str::FromStr;

/// The closed set of tools exposed over MCP.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VeilMailTool {
    SendEmail,
    GetEmail,
    ListEmails,
    ValidateEmail,
    ListTemplates,
    GetTemplate,
    ListDomains,
    ListAudiences,
    AddSubscriber,
    GetAnalytics,
}

impl VeilMailTool {
    /// Every tool, in listing order.
    pub const ALL: [VeilMailTool; 10] = [
        Self::SendEmail,
        Self::GetEmail,
        Self::ListEmails,
        Self::ValidateEmail,
        Self::ListTemplates,
        Self::GetTemplate,
        Self::ListDomains,
        Self::ListAudiences,
        Self::AddSubscriber,
        Self::GetAnalytics,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::SendEmail => "send_email",
            Self::GetEmail => "get_email",
            Self::ListEmails => "list_emails",
            Self::ValidateEmail => "validate_email",
            Self::ListTemplates => "list_templates",
            Self::GetTemplate => "get_template",
            Self::ListDomains => "list_domains",
            Self::ListAudiences => "list_audiences",
            Self::AddSubscriber => "add_subscriber",
            Self::GetAnalytics => "get_analytics",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Self::SendEmail => {
                "Send an email via Veil Mail. Supports HTML content, templates, attachments, and scheduling."
            }
            Self::GetEmail => "Get details of a sent email by ID",
            Self::ListEmails => "List sent emails with optional filters",
            Self::ValidateEmail => {
                "Validate an email address. Checks syntax, MX records, disposable domain, and role address."
            }
            Self::ListTemplates => "List available email templates",
            Self::GetTemplate => "Get a specific email template by ID",
            Self::ListDomains => "List verified sending domains",
            Self::ListAudiences => "List email audiences/contact lists",
            Self::AddSubscriber => "Add a subscriber to an audience",
            Self::GetAnalytics => {
                "Get email analytics overview including delivery rates, opens, clicks, and bounces"
            }
        }
    }

    /// JSON schema of the tool's arguments.
    pub fn input_schema(self) -> serde_json::Value {
        match self {
            Self::SendEmail => json_schema_object(
                json!({
                    "from": json_schema_string("Sender email address (must be from a verified domain)"),
                    "to": json_schema_string("Recipient email address"),
                    "subject": json_schema_string("Email subject line"),
                    "html": json_schema_string("HTML content of the email"),
                    "text": json_schema_string("Plain text fallback content"),
                    "templateId": json_schema_string("Template ID to use instead of html/text"),
                    "templateData": json_schema_any_object("Data to populate template variables"),
                    "cc": json_schema_string("CC recipient email address"),
                    "bcc": json_schema_string("BCC recipient email address"),
                    "replyTo": json_schema_string("Reply-to email address"),
                    "scheduledFor": json_schema_string("ISO 8601 datetime to schedule the email")
                }),
                vec!["from", "to", "subject"],
            ),
            Self::GetEmail => json_schema_object(
                json!({ "id": json_schema_string("Email ID") }),
                vec!["id"],
            ),
            Self::ListEmails => json_schema_object(
                json!({
                    "limit": json_schema_number("Number of emails to return (max 100)"),
                    "status": json_schema_string("Filter by status: queued, sent, delivered, bounced, failed")
                }),
                vec![],
            ),
            Self::ValidateEmail => json_schema_object(
                json!({ "email": json_schema_string("Email address to validate") }),
                vec!["email"],
            ),
            Self::ListTemplates => json_schema_object(
                json!({ "limit": json_schema_number("Number of templates to return") }),
                vec![],
            ),
            Self::GetTemplate => json_schema_object(
                json!({ "id": json_schema_string("Template ID") }),
                vec!["id"],
            ),
            Self::ListDomains | Self::ListAudiences => json_schema_object(json!({}), vec![]),
            Self::AddSubscriber => json_schema_object(
                json!({
                    "audienceId": json_schema_string("Audience ID to add the subscriber to"),
                    "email": json_schema_string("Subscriber email address"),
                    "firstName": json_schema_string("Subscriber first name"),
                    "lastName": json_schema_string("Subscriber last name")
                }),
                vec!["audienceId", "email"],
            ),
            Self::GetAnalytics => json_schema_object(
                json!({ "days": json_schema_number("Number of days to look back (default: 30)") }),
                vec![],
            ),
        }
    }

    pub fn schema(self) -> ToolSchema {
        ToolSchema {
            name: self.name().to_string(),
            description: self.description().to_string(),
            input_schema: self.input_schema(),
        }
    }
}

impl fmt::Display for VeilMailTool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when a name does not match any tool.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown tool: {0}")]
pub struct UnknownTool(pub String);

impl FromStr for VeilMailTool {
    type Err = UnknownTool;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|tool| tool.name() == name)
            .ok_or_else(|| UnknownTool(name.to_string()))
    }
}

/// Schemas of every tool, in listing order.
pub fn list_schemas() -> Vec<ToolSchema> {
    VeilMailTool::ALL.iter().map(|t| t.schema()).collect()
}

// Helper functions for creating tool schemas

pub fn json_schema_object(properties: serde_json::Value, required: Vec<&str>) -> serde_json::Value {
    let mut schema = json!({
        "type": "object",
        "properties": properties
    });
    if !required.is_empty() {
        schema["required"] = json!(required);
    }
    schema
}

pub fn json_schema_string(description: &str) -> serde_json::Value {
    json!({
        "type": "string",
        "description": description
    })
}

pub fn json_schema_number(description: &str) -> serde_json::Value {
    json!({
        "type": "number",
        "description": description
    })
}

/// A free-form object parameter.
pub fn json_schema_any_object(description: &str) -> serde_json::Value {
    json!({
        "type": "object",
        "description": description
    })
}
