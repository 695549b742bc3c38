//! Invocation routing.
//!
//! A request names a tool and carries a JSON argument object. Dispatch looks
//! the tool up, checks every declared argument for presence and JSON type,
//! runs the tool and folds every failure into an [`InvocationResult`] so a
//! bad call never takes the server down.

use crate::registry::ToolRegistry;
use crate::tool::{json_type_name, ArgumentIssue, ArgumentSpec, ToolError};
use futures::FutureExt;
use serde_json::{Map, Value};
use std::any::Any;
use std::panic::AssertUnwindSafe;

/// A tool call received from the host.
#[derive(Debug, Clone, PartialEq)]
pub struct InvocationRequest {
    pub tool_name: String,
    pub arguments: Map<String, Value>,
}

impl InvocationRequest {
    pub fn new(tool_name: impl Into<String>, arguments: Map<String, Value>) -> Self {
        Self {
            tool_name: tool_name.into(),
            arguments,
        }
    }

    /// Build a request from loosely typed arguments. Anything other than a
    /// JSON object is treated as no arguments.
    pub fn from_value(tool_name: impl Into<String>, arguments: Option<Value>) -> Self {
        let arguments = match arguments {
            Some(Value::Object(map)) => map,
            _ => Map::new(),
        };
        Self::new(tool_name, arguments)
    }
}

/// Outcome of one invocation.
#[derive(Debug)]
pub enum InvocationResult {
    /// The tool's text payload
    Success(String),
    /// Human-readable message plus the error it was rendered from
    Failure { message: String, error: ToolError },
}

impl InvocationResult {
    pub fn failure(error: ToolError) -> Self {
        Self::Failure {
            message: error.to_string(),
            error,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    /// Payload on success, message on failure.
    pub fn text(&self) -> &str {
        match self {
            Self::Success(text) => text,
            Self::Failure { message, .. } => message,
        }
    }

    pub fn error(&self) -> Option<&ToolError> {
        match self {
            Self::Success(_) => None,
            Self::Failure { error, .. } => Some(error),
        }
    }
}

/// Check `arguments` against the declared argument list.
///
/// Declarations are checked in order and the first violation is reported.
/// Undeclared keys are ignored. An argument set to `null` counts as absent.
pub fn bind_arguments(
    specs: &[ArgumentSpec],
    arguments: &Map<String, Value>,
) -> Result<(), ToolError> {
    for spec in specs {
        match arguments.get(&spec.name) {
            None | Some(Value::Null) => {
                if spec.required {
                    return Err(ToolError::missing_argument(&spec.name));
                }
            }
            Some(value) if !spec.kind.accepts(value) => {
                return Err(ToolError::Argument {
                    name: spec.name.clone(),
                    issue: ArgumentIssue::WrongType {
                        expected: spec.kind,
                        actual: json_type_name(value),
                    },
                })
            }
            Some(_) => {}
        }
    }
    Ok(())
}

impl ToolRegistry {
    /// Route a request to its tool and run it.
    ///
    /// Never fails and never panics: unknown tools, argument problems, tool
    /// errors and tool panics all come back as [`InvocationResult::Failure`].
    pub async fn dispatch(&self, request: &InvocationRequest) -> InvocationResult {
        let name = request.tool_name.as_str();

        let result = match self.get(name) {
            None => Err(ToolError::UnknownTool(name.to_string())),
            Some(tool) => match bind_arguments(&tool.arguments(), &request.arguments) {
                Err(e) => Err(e),
                Ok(()) => {
                    let input = Value::Object(request.arguments.clone());
                    AssertUnwindSafe(tool.execute_raw(input))
                        .catch_unwind()
                        .await
                        .unwrap_or_else(|payload| {
                            Err(ToolError::Panicked(panic_message(&payload)))
                        })
                }
            },
        };

        match result {
            Ok(output) => {
                let text = output.into_text();
                log::debug!("tool {} returned {} bytes", name, text.len());
                InvocationResult::Success(text)
            }
            Err(error) => {
                log::warn!("tool {} failed: {}", name, error);
                InvocationResult::failure(error)
            }
        }
    }
}

fn panic_message(payload: &Box<dyn Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{EchoTool, FailingTool};
    use crate::tool::ArgumentType;
    use crate::box_tools;
    use serde_json::json;

    fn args(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    #[test]
    fn test_bind_accepts_declared_arguments() {
        let specs = vec![ArgumentSpec::required("role", ArgumentType::String)];
        assert!(bind_arguments(&specs, &args(json!({"role": "admin"}))).is_ok());
    }

    #[test]
    fn test_bind_reports_missing_required() {
        let specs = vec![ArgumentSpec::required("role", ArgumentType::String)];
        let err = bind_arguments(&specs, &Map::new()).unwrap_err();
        assert_eq!(err.to_string(), "failed to get argument: role");
    }

    #[test]
    fn test_bind_reports_wrong_type() {
        let specs = vec![ArgumentSpec::required("role", ArgumentType::String)];
        let err = bind_arguments(&specs, &args(json!({"role": 5}))).unwrap_err();
        assert_eq!(
            err.to_string(),
            "failed to get argument: role (expected string, got number)"
        );
    }

    #[test]
    fn test_bind_null_required_is_missing() {
        let specs = vec![ArgumentSpec::required("role", ArgumentType::String)];
        let err = bind_arguments(&specs, &args(json!({"role": null}))).unwrap_err();
        assert_eq!(err.to_string(), "failed to get argument: role");
    }

    #[test]
    fn test_bind_first_violation_wins() {
        let specs = vec![
            ArgumentSpec::required("policy", ArgumentType::String),
            ArgumentSpec::required("role", ArgumentType::String),
        ];
        let err = bind_arguments(&specs, &Map::new()).unwrap_err();
        assert_eq!(err.to_string(), "failed to get argument: policy");
    }

    #[test]
    fn test_bind_ignores_extra_and_absent_optional() {
        let specs = vec![
            ArgumentSpec::required("role", ArgumentType::String),
            ArgumentSpec::optional("note", ArgumentType::String),
        ];
        let map = args(json!({"role": "admin", "note": null, "unused": [1, 2]}));
        assert!(bind_arguments(&specs, &map).is_ok());
    }

    #[test]
    fn test_request_from_non_object_has_no_arguments() {
        let request = InvocationRequest::from_value("list_roles", Some(json!("oops")));
        assert!(request.arguments.is_empty());

        let request = InvocationRequest::from_value("list_roles", None);
        assert!(request.arguments.is_empty());
    }

    #[test]
    fn test_panic_message_variants() {
        let payload: Box<dyn Any + Send> = Box::new("static message");
        assert_eq!(panic_message(&payload), "static message");

        let payload: Box<dyn Any + Send> = Box::new(String::from("owned message"));
        assert_eq!(panic_message(&payload), "owned message");

        let payload: Box<dyn Any + Send> = Box::new(42u8);
        assert_eq!(panic_message(&payload), "unknown panic");
    }

    fn registry() -> ToolRegistry {
        ToolRegistry::new(box_tools![
            EchoTool::default(),
            FailingTool::erroring("broken"),
            FailingTool::panicking("exploding"),
        ])
        .unwrap()
    }

    #[tokio::test]
    async fn test_tool_error_becomes_failure() {
        let result = registry()
            .dispatch(&InvocationRequest::from_value("broken", None))
            .await;
        assert_eq!(result.text(), "boom");
        assert!(matches!(result.error(), Some(ToolError::Custom(_))));
    }

    #[tokio::test]
    async fn test_panic_becomes_failure_and_registry_keeps_serving() {
        let registry = registry();

        let result = registry
            .dispatch(&InvocationRequest::from_value("exploding", None))
            .await;
        assert_eq!(result.text(), "tool panicked: boom");
        assert!(matches!(result.error(), Some(ToolError::Panicked(_))));

        let request = InvocationRequest::from_value("echo", Some(json!({"message": "still up"})));
        let result = registry.dispatch(&request).await;
        assert!(result.is_success());
        assert_eq!(result.text(), "still up");
    }
}
