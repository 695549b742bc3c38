//! Test utilities for iam-mcp-core.
//!
//! Enable with the `test-utils` feature:
//!
//! ```toml
//! [dev-dependencies]
//! iam-mcp-core = { version = "...", features = ["test-utils"] }
//! ```

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use schemars::JsonSchema;
use serde::Deserialize;

use crate::pagination::Page;
use crate::tool::{Tool, ToolError, ToolResult};

/// Replays a scripted sequence of pages and records the markers it was asked for.
///
/// Pass `|m| pages.next(m)` as the page fetcher of
/// [`fetch_all`](crate::pagination::fetch_all).
#[derive(Clone)]
pub struct ScriptedPages<T> {
    responses: Arc<Mutex<VecDeque<Result<Page<T>, String>>>>,
    markers: Arc<Mutex<Vec<Option<String>>>>,
}

impl<T> Default for ScriptedPages<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> ScriptedPages<T> {
    pub fn new() -> Self {
        Self {
            responses: Arc::new(Mutex::new(VecDeque::new())),
            markers: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn with_page(self, page: Page<T>) -> Self {
        self.responses.lock().unwrap().push_back(Ok(page));
        self
    }

    pub fn with_error(self, message: impl Into<String>) -> Self {
        self.responses.lock().unwrap().push_back(Err(message.into()));
        self
    }

    /// Serve the next scripted page.
    ///
    /// Running past the end of the script is an error rather than a panic so
    /// a runaway pagination loop shows up as a failed assertion.
    pub async fn next(&self, marker: Option<String>) -> Result<Page<T>, String> {
        self.markers.lock().unwrap().push(marker);
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err("no more scripted pages".to_string()))
    }

    /// Markers received so far, in call order.
    pub fn markers(&self) -> Vec<Option<String>> {
        self.markers.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.markers.lock().unwrap().len()
    }
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct EchoInput {
    /// Text to echo back
    pub message: String,
}

/// A tool that returns its `message` argument.
#[derive(Debug, Clone)]
pub struct EchoTool {
    name: String,
}

impl EchoTool {
    pub fn named(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl Default for EchoTool {
    fn default() -> Self {
        Self::named("echo")
    }
}

impl Tool for EchoTool {
    type Input = EchoInput;

    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        "Echo the message back"
    }

    async fn execute(&self, input: Self::Input) -> Result<ToolResult, ToolError> {
        Ok(ToolResult::text(input.message))
    }
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct NoInput {}

/// A tool that always fails or panics, for exercising error paths.
#[derive(Debug, Clone)]
pub struct FailingTool {
    name: String,
    panic: bool,
}

impl FailingTool {
    /// Returns `ToolError::Custom("boom")`.
    pub fn erroring(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            panic: false,
        }
    }

    /// Panics with "boom".
    pub fn panicking(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            panic: true,
        }
    }
}

impl Tool for FailingTool {
    type Input = NoInput;

    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        "Always fails"
    }

    async fn execute(&self, _input: Self::Input) -> Result<ToolResult, ToolError> {
        if self.panic {
            panic!("boom");
        }
        Err(ToolError::Custom("boom".to_string()))
    }
}
