use crate::tool::{ArgumentSpec, DynTool};
use serde_json::Value;

/// Public description of a registered tool.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolDescriptor {
    pub name: String,
    pub description: String,
    pub arguments: Vec<ArgumentSpec>,
    pub input_schema: Value,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("tool registered twice: {0}")]
    DuplicateTool(String),
}

/// Fixed set of tools, kept in registration order.
pub struct ToolRegistry {
    tools: Vec<Box<dyn DynTool>>,
}

impl ToolRegistry {
    pub fn new(tools: Vec<Box<dyn DynTool>>) -> Result<Self, RegistryError> {
        for (i, tool) in tools.iter().enumerate() {
            if tools[..i].iter().any(|t| t.name() == tool.name()) {
                return Err(RegistryError::DuplicateTool(tool.name().to_string()));
            }
        }
        Ok(Self { tools })
    }

    /// Descriptors for every tool, in registration order.
    pub fn descriptors(&self) -> Vec<ToolDescriptor> {
        self.tools
            .iter()
            .map(|tool| ToolDescriptor {
                name: tool.name().to_string(),
                description: tool.description().to_string(),
                arguments: tool.arguments(),
                input_schema: tool.input_schema(),
            })
            .collect()
    }

    pub fn get(&self, name: &str) -> Option<&dyn DynTool> {
        self.tools
            .iter()
            .find(|t| t.name() == name)
            .map(|t| t.as_ref())
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.tools.iter().map(|t| t.name())
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

impl std::fmt::Debug for ToolRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolRegistry")
            .field("tools", &self.names().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::box_tools;
    use crate::test_utils::EchoTool;

    #[test]
    fn test_descriptors_keep_registration_order() {
        let registry = ToolRegistry::new(box_tools![
            EchoTool::named("zeta"),
            EchoTool::named("alpha"),
            EchoTool::named("mid"),
        ])
        .unwrap();

        let names: Vec<String> = registry.descriptors().into_iter().map(|d| d.name).collect();
        assert_eq!(names, vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn test_duplicate_names_rejected() {
        let err = ToolRegistry::new(box_tools![EchoTool::named("echo"), EchoTool::named("echo")])
            .unwrap_err();
        assert_eq!(err, RegistryError::DuplicateTool("echo".to_string()));
    }

    #[test]
    fn test_descriptor_carries_arguments() {
        let registry = ToolRegistry::new(box_tools![EchoTool::named("echo")]).unwrap();
        let descriptor = &registry.descriptors()[0];

        assert_eq!(descriptor.arguments.len(), 1);
        assert_eq!(descriptor.arguments[0].name, "message");
        assert!(descriptor.arguments[0].required);
        assert_eq!(descriptor.input_schema["type"], "object");
    }

    #[test]
    fn test_get_unknown_is_none() {
        let registry = ToolRegistry::new(box_tools![EchoTool::named("echo")]).unwrap();
        assert!(registry.get("echo").is_some());
        assert!(registry.get("nope").is_none());
    }

    #[test]
    fn test_empty_registry() {
        let registry = ToolRegistry::new(Vec::new()).unwrap();
        assert!(registry.is_empty());
        assert!(registry.descriptors().is_empty());
    }
}
