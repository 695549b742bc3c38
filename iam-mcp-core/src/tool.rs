use schemars::JsonSchema;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Result types that tools can return.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ToolResult {
    /// Plain text response, returned to the host verbatim
    Text(String),

    /// Structured JSON data, returned to the host in compact form
    Json(Value),
}

impl ToolResult {
    /// Create a JSON result from any serializable type
    pub fn json<T: Serialize>(value: T) -> Result<Self, serde_json::Error> {
        Ok(Self::Json(serde_json::to_value(value)?))
    }

    /// Create a text result from a string
    pub fn text(s: impl Into<String>) -> Self {
        Self::Text(s.into())
    }

    /// Get the payload as text. JSON is rendered compactly.
    pub fn as_text(&self) -> String {
        match self {
            ToolResult::Text(s) => s.clone(),
            ToolResult::Json(v) => v.to_string(),
        }
    }

    /// Get a reference to the text content if this is a Text variant
    pub fn as_str(&self) -> Option<&str> {
        match self {
            ToolResult::Text(s) => Some(s),
            ToolResult::Json(_) => None,
        }
    }

    /// Consume the result and return the payload as text.
    pub fn into_text(self) -> String {
        match self {
            ToolResult::Text(s) => s,
            ToolResult::Json(v) => v.to_string(),
        }
    }
}

/// Convert strings directly to ToolResult::Text
impl From<String> for ToolResult {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<&str> for ToolResult {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

/// JSON type an argument is declared with in a tool's input schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ArgumentType {
    String,
    Integer,
    Number,
    Boolean,
    Object,
    Array,
    /// No usable type declaration (e.g. `$ref` or `anyOf`); any value is accepted
    Any,
}

impl ArgumentType {
    /// Parse a JSON schema `type` keyword. Nullable declarations such as
    /// `["string", "null"]` resolve to their non-null member.
    pub fn from_schema(type_decl: Option<&Value>) -> Self {
        match type_decl {
            Some(Value::String(name)) => Self::from_name(name),
            Some(Value::Array(names)) => names
                .iter()
                .filter_map(Value::as_str)
                .find(|name| *name != "null")
                .map(Self::from_name)
                .unwrap_or(Self::Any),
            _ => Self::Any,
        }
    }

    fn from_name(name: &str) -> Self {
        match name {
            "string" => Self::String,
            "integer" => Self::Integer,
            "number" => Self::Number,
            "boolean" => Self::Boolean,
            "object" => Self::Object,
            "array" => Self::Array,
            _ => Self::Any,
        }
    }

    /// Whether `value` satisfies this declared type.
    pub fn accepts(&self, value: &Value) -> bool {
        match self {
            Self::String => value.is_string(),
            Self::Integer => value.is_i64() || value.is_u64(),
            Self::Number => value.is_number(),
            Self::Boolean => value.is_boolean(),
            Self::Object => value.is_object(),
            Self::Array => value.is_array(),
            Self::Any => true,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Integer => "integer",
            Self::Number => "number",
            Self::Boolean => "boolean",
            Self::Object => "object",
            Self::Array => "array",
            Self::Any => "any",
        }
    }
}

impl fmt::Display for ArgumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Name of the JSON type of `value`, as used in argument error messages.
pub fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// One declared tool argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArgumentSpec {
    pub name: String,
    pub required: bool,
    pub kind: ArgumentType,
}

impl ArgumentSpec {
    pub fn required(name: impl Into<String>, kind: ArgumentType) -> Self {
        Self {
            name: name.into(),
            required: true,
            kind,
        }
    }

    pub fn optional(name: impl Into<String>, kind: ArgumentType) -> Self {
        Self {
            name: name.into(),
            required: false,
            kind,
        }
    }
}

/// Derive the ordered argument list from an object input schema.
///
/// Arguments follow the order of the schema's `properties`; an argument is
/// required when it is listed under `required`.
pub fn arguments_from_schema(schema: &Value) -> Vec<ArgumentSpec> {
    let required: Vec<&str> = schema
        .get("required")
        .and_then(Value::as_array)
        .map(|names| names.iter().filter_map(Value::as_str).collect())
        .unwrap_or_default();

    schema
        .get("properties")
        .and_then(Value::as_object)
        .map(|properties| {
            properties
                .iter()
                .map(|(name, property)| ArgumentSpec {
                    name: name.clone(),
                    required: required.contains(&name.as_str()),
                    kind: ArgumentType::from_schema(property.get("type")),
                })
                .collect()
        })
        .unwrap_or_default()
}

/// Why an argument was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgumentIssue {
    Missing,
    WrongType {
        expected: ArgumentType,
        actual: &'static str,
    },
}

impl fmt::Display for ArgumentIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgumentIssue::Missing => Ok(()),
            ArgumentIssue::WrongType { expected, actual } => {
                write!(f, " (expected {}, got {})", expected, actual)
            }
        }
    }
}

/// Errors that can occur during tool execution
#[derive(Debug, thiserror::Error)]
pub enum ToolError {
    /// The AWS config could not be resolved (no region)
    #[error("failed to load aws config: {0}")]
    Config(String),

    /// A declared argument is absent or has the wrong JSON type
    #[error("failed to get argument: {name}{issue}")]
    Argument { name: String, issue: ArgumentIssue },

    /// A remote call failed
    #[error("failed to {operation}: {message}")]
    Remote { operation: String, message: String },

    /// The response could not be serialized
    #[error("failed to marshal response: {0}")]
    Encoding(String),

    #[error("unknown tool: {0}")]
    UnknownTool(String),

    #[error("tool panicked: {0}")]
    Panicked(String),

    #[error("{0}")]
    Custom(String),
}

impl ToolError {
    pub fn missing_argument(name: impl Into<String>) -> Self {
        Self::Argument {
            name: name.into(),
            issue: ArgumentIssue::Missing,
        }
    }

    pub fn remote(operation: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::Remote {
            operation: operation.into(),
            message: message.to_string(),
        }
    }

    /// Returns true if the invocation was rejected before the tool ran.
    pub fn is_argument(&self) -> bool {
        matches!(self, Self::Argument { .. } | Self::UnknownTool(_))
    }
}

impl From<serde_json::Error> for ToolError {
    fn from(err: serde_json::Error) -> Self {
        Self::Encoding(err.to_string())
    }
}

impl From<String> for ToolError {
    fn from(s: String) -> Self {
        Self::Custom(s)
    }
}

impl From<&str> for ToolError {
    fn from(s: &str) -> Self {
        Self::Custom(s.to_string())
    }
}

/// Trait for implementing tools exposed to the host.
///
/// Tools define an input type with `#[derive(Deserialize, JsonSchema)]`. The
/// generated schema is published to the host and is also the argument
/// declaration the dispatcher validates against before `execute` runs.
///
/// ```rust
/// use iam_mcp_core::{Tool, ToolResult, ToolError};
/// use schemars::JsonSchema;
/// use serde::Deserialize;
///
/// #[derive(Deserialize, JsonSchema)]
/// struct EchoInput {
///     /// Text to send back
///     message: String,
/// }
///
/// struct EchoTool;
///
/// impl Tool for EchoTool {
///     type Input = EchoInput;
///
///     fn name(&self) -> &str { "echo" }
///     fn description(&self) -> &str { "Echo the message back" }
///
///     fn execute(&self, input: Self::Input) -> impl std::future::Future<Output = Result<ToolResult, ToolError>> + Send {
///         async move { Ok(input.message.into()) }
///     }
/// }
/// ```
pub trait Tool: Send + Sync {
    /// The input type for this tool. Must implement `Deserialize` and `JsonSchema`.
    type Input: DeserializeOwned + JsonSchema;

    /// The name of the tool (e.g., "list_roles")
    fn name(&self) -> &str;

    /// A description of what the tool does
    fn description(&self) -> &str;

    /// Execute the tool with typed input
    fn execute(
        &self,
        input: Self::Input,
    ) -> impl std::future::Future<Output = Result<ToolResult, ToolError>> + Send;

    /// Get the JSON schema for this tool's input.
    fn input_schema(&self) -> Value {
        let schema = schemars::schema_for!(Self::Input);
        serde_json::to_value(schema).unwrap_or_else(|_| serde_json::json!({"type": "object"}))
    }

    /// The ordered argument declaration, derived from [`Tool::input_schema`].
    fn arguments(&self) -> Vec<ArgumentSpec> {
        arguments_from_schema(&self.input_schema())
    }
}

/// Object-safe trait for dynamic tool dispatch (used by the registry).
///
/// Implement `Tool` instead and use `box_tool()` to convert.
pub trait DynTool: Send + Sync {
    fn name(&self) -> &str;
    fn description(&self) -> &str;
    fn input_schema(&self) -> Value;
    fn arguments(&self) -> Vec<ArgumentSpec>;
    fn execute_raw(
        &self,
        input: Value,
    ) -> std::pin::Pin<
        Box<dyn std::future::Future<Output = Result<ToolResult, ToolError>> + Send + '_>,
    >;
}

/// Convert a `Tool` into a type-erased `Box<dyn DynTool>` for storage in collections.
pub fn box_tool<T: Tool + 'static>(tool: T) -> Box<dyn DynTool> {
    Box::new(ToolWrapper(tool))
}

/// Create a `Vec<Box<dyn DynTool>>` from heterogeneous tool types.
///
/// ```ignore
/// let tools = box_tools![ListPoliciesTool::new(provider.clone()), ListRolesTool::new(provider)];
/// let registry = ToolRegistry::new(tools)?;
/// ```
#[macro_export]
macro_rules! box_tools {
    ($($tool:expr),* $(,)?) => {
        vec![$($crate::tool::box_tool($tool)),*]
    };
}

/// Internal wrapper that implements DynTool for any Tool
struct ToolWrapper<T>(T);

impl<T: Tool + 'static> DynTool for ToolWrapper<T> {
    fn name(&self) -> &str {
        self.0.name()
    }

    fn description(&self) -> &str {
        self.0.description()
    }

    fn input_schema(&self) -> Value {
        self.0.input_schema()
    }

    fn arguments(&self) -> Vec<ArgumentSpec> {
        self.0.arguments()
    }

    fn execute_raw(
        &self,
        input: Value,
    ) -> std::pin::Pin<
        Box<dyn std::future::Future<Output = Result<ToolResult, ToolError>> + Send + '_>,
    > {
        Box::pin(async move {
            let typed_input: T::Input = serde_json::from_value(input)
                .map_err(|e| ToolError::Custom(format!("failed to bind arguments: {}", e)))?;

            self.0.execute(typed_input).await
        })
    }
}
