use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

/// A citable reference record. `index` is the number the text cites it by.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Source {
    pub index: u32,
    pub title: String,
    pub url: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<SourceKind>,
}

impl Source {
    pub fn new(index: u32, title: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            index,
            title: title.into(),
            url: url.into(),
            kind: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    Page,
    Attachment,
}

impl SourceKind {
    /// Only the two exact spellings are recognised; anything else is dropped.
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "page" => Some(SourceKind::Page),
            "attachment" => Some(SourceKind::Attachment),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolCallStatus {
    Pending,
    Completed,
    Error,
    Interrupted,
    #[default]
    #[serde(other)]
    Unknown,
}

impl ToolCallStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ToolCallStatus::Pending => "pending",
            ToolCallStatus::Completed => "completed",
            ToolCallStatus::Error => "error",
            ToolCallStatus::Interrupted => "interrupted",
            ToolCallStatus::Unknown => "unknown",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolCall {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub args: Map<String, Value>,
    #[serde(default)]
    pub result: Option<String>,
    #[serde(default)]
    pub status: ToolCallStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageType {
    Human,
    #[serde(alias = "ai")]
    Assistant,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub id: String,
    #[serde(rename = "type")]
    pub message_type: MessageType,
    #[serde(default)]
    pub content: String,
}

/// Where the source list used for a render came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceOrigin {
    Conversation,
    ToolResults,
    MessageText,
    None,
}

impl SourceOrigin {
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceOrigin::Conversation => "conversation",
            SourceOrigin::ToolResults => "tool_results",
            SourceOrigin::MessageText => "message_text",
            SourceOrigin::None => "none",
        }
    }
}

// API Request/Response models
#[derive(Debug, Deserialize)]
pub struct RenderRequest {
    pub message: Message,
    #[serde(default)]
    pub tool_calls: Vec<ToolCall>,
    #[serde(default)]
    pub all_sources: Option<Vec<Source>>,
}

#[derive(Debug, Serialize)]
pub struct RenderResponse {
    pub request_id: Uuid,
    pub rendered_at: DateTime<Utc>,
    pub is_final_report: bool,
    pub source_origin: SourceOrigin,
    pub sources: Vec<Source>,
    pub cited_sources: Vec<Source>,
    pub content: String,
}

#[derive(Debug, Deserialize)]
pub struct SourcesRequest {
    #[serde(default)]
    pub tool_calls: Vec<ToolCall>,
}

#[derive(Debug, Deserialize)]
pub struct ContentRequest {
    #[serde(default)]
    pub content: String,
}

#[derive(Debug, Serialize)]
pub struct SourcesResponse {
    pub sources: Vec<Source>,
}

#[derive(Debug, Serialize)]
pub struct ClassifyResponse {
    pub is_final_report: bool,
    pub length: usize,
    pub citation_count: usize,
}
