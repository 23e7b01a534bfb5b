//! Tool definitions.

use std::collections::HashMap;

/// Describes a tool to an agent framework.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolDefinition {
    /// The tool name.
    pub name: String,
    /// Description of what the tool does.
    pub description: String,
    /// JSON Schema for the tool's arguments.
    pub input_schema: serde_json::Value,
}

impl ToolDefinition {
    /// Creates a new tool definition.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            input_schema: serde_json::json!({}),
        }
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, desc: impl Into<String>) -> Self {
        self.description = desc.into();
        self
    }

    /// Sets the input schema.
    #[must_use]
    pub fn with_input_schema(mut self, schema: serde_json::Value) -> Self {
        self.input_schema = schema;
        self
    }

    /// Converts to a dictionary representation.
    #[must_use]
    pub fn to_dict(&self) -> HashMap<String, serde_json::Value> {
        let mut map = HashMap::new();
        map.insert("name".to_string(), serde_json::json!(self.name));
        map.insert("description".to_string(), serde_json::json!(self.description));
        map.insert("input_schema".to_string(), self.input_schema.clone());
        map
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder() {
        let def = ToolDefinition::new("fetch")
            .with_description("Fetches a page")
            .with_input_schema(serde_json::json!({"type": "object"}));

        assert_eq!(def.name, "fetch");
        assert_eq!(def.description, "Fetches a page");
        assert_eq!(def.to_dict().get("input_schema").unwrap()["type"], "object");
    }
}
