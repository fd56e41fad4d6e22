//! Tool Registry - central registration and dispatch for all tools.
//!
//! This module provides:
//! - A registry of all available tools
//! - HTTP dispatch for tool calls (when http feature is enabled)
//! - Tool metadata for listing

use std::sync::Arc;
#[cfg(feature = "http")]
use tracing::warn;

use rmcp::model::Tool;

use crate::domains::prey::Session;

use super::definitions::{
    AccountGetTool, AutomationsGetTool, AutomationsListTool, DeviceActionTriggerTool,
    DeviceStatusSetTool, DevicesDeleteTool, DevicesGetTool, DevicesListTool,
    DevicesLocationHistoryTool, DevicesReportsGetTool, DevicesReportsListTool, LabelsCreateTool,
    LabelsGetTool, LabelsListTool, MassActionsGetTool, MassActionsListTool, UsersGetTool,
    UsersListTool, ZonesCreateTool, ZonesGetTool, ZonesListTool, ZonesUpdateTool,
};

// ============================================================================
// Tool Registry
// ============================================================================

/// Tool registry - manages all available tools.
///
/// This struct provides a central point for:
/// - Listing all available tools
/// - Dispatching HTTP tool calls (when http feature is enabled)
///
/// The HTTP transport builds a registry per request so header overrides
/// (X-Prey-URL, X-Prey-API-Key) can swap the session underneath.
pub struct ToolRegistry {
    session: Arc<Session>,
}

impl ToolRegistry {
    /// Create a new tool registry bound to a session.
    pub fn new(session: Arc<Session>) -> Self {
        Self { session }
    }

    /// Get all tool names.
    pub fn tool_names(&self) -> Vec<&'static str> {
        vec![
            AccountGetTool::NAME,
            DevicesListTool::NAME,
            DevicesGetTool::NAME,
            DevicesDeleteTool::NAME,
            DevicesReportsListTool::NAME,
            DevicesReportsGetTool::NAME,
            DevicesLocationHistoryTool::NAME,
            DeviceActionTriggerTool::NAME,
            DeviceStatusSetTool::NAME,
            UsersListTool::NAME,
            UsersGetTool::NAME,
            LabelsListTool::NAME,
            LabelsGetTool::NAME,
            LabelsCreateTool::NAME,
            ZonesListTool::NAME,
            ZonesGetTool::NAME,
            ZonesCreateTool::NAME,
            ZonesUpdateTool::NAME,
            AutomationsListTool::NAME,
            AutomationsGetTool::NAME,
            MassActionsListTool::NAME,
            MassActionsGetTool::NAME,
        ]
    }

    /// Get all tools as Tool models (metadata).
    ///
    /// This is the single source of truth for all available tools.
    /// Both HTTP and STDIO/TCP transports use this to get tool metadata.
    pub fn get_all_tools() -> Vec<Tool> {
        vec![
            AccountGetTool::to_tool(),
            DevicesListTool::to_tool(),
            DevicesGetTool::to_tool(),
            DevicesDeleteTool::to_tool(),
            DevicesReportsListTool::to_tool(),
            DevicesReportsGetTool::to_tool(),
            DevicesLocationHistoryTool::to_tool(),
            DeviceActionTriggerTool::to_tool(),
            DeviceStatusSetTool::to_tool(),
            UsersListTool::to_tool(),
            UsersGetTool::to_tool(),
            LabelsListTool::to_tool(),
            LabelsGetTool::to_tool(),
            LabelsCreateTool::to_tool(),
            ZonesListTool::to_tool(),
            ZonesGetTool::to_tool(),
            ZonesCreateTool::to_tool(),
            ZonesUpdateTool::to_tool(),
            AutomationsListTool::to_tool(),
            AutomationsGetTool::to_tool(),
            MassActionsListTool::to_tool(),
            MassActionsGetTool::to_tool(),
        ]
    }

    /// Dispatch an HTTP tool call to the appropriate handler.
    ///
    /// This is used by the HTTP transport to call tools. Returns the
    /// `{data, meta?}` envelope on success.
    #[cfg(feature = "http")]
    pub async fn call_tool(
        &self,
        name: &str,
        arguments: serde_json::Value,
    ) -> Result<serde_json::Value, String> {
        fn parse<P: serde::de::DeserializeOwned>(
            arguments: serde_json::Value,
        ) -> Result<P, String> {
            serde_json::from_value(arguments)
                .map_err(|e| super::ToolError::invalid_arguments(e.to_string()).to_string())
        }

        let session = &self.session;
        let outcome = match name {
            AccountGetTool::NAME => AccountGetTool::execute(&parse(arguments)?, session).await,
            DevicesListTool::NAME => DevicesListTool::execute(&parse(arguments)?, session).await,
            DevicesGetTool::NAME => DevicesGetTool::execute(&parse(arguments)?, session).await,
            DevicesDeleteTool::NAME => {
                DevicesDeleteTool::execute(&parse(arguments)?, session).await
            }
            DevicesReportsListTool::NAME => {
                DevicesReportsListTool::execute(&parse(arguments)?, session).await
            }
            DevicesReportsGetTool::NAME => {
                DevicesReportsGetTool::execute(&parse(arguments)?, session).await
            }
            DevicesLocationHistoryTool::NAME => {
                DevicesLocationHistoryTool::execute(&parse(arguments)?, session).await
            }
            DeviceActionTriggerTool::NAME => {
                DeviceActionTriggerTool::execute(&parse(arguments)?, session).await
            }
            DeviceStatusSetTool::NAME => {
                DeviceStatusSetTool::execute(&parse(arguments)?, session).await
            }
            UsersListTool::NAME => UsersListTool::execute(&parse(arguments)?, session).await,
            UsersGetTool::NAME => UsersGetTool::execute(&parse(arguments)?, session).await,
            LabelsListTool::NAME => LabelsListTool::execute(&parse(arguments)?, session).await,
            LabelsGetTool::NAME => LabelsGetTool::execute(&parse(arguments)?, session).await,
            LabelsCreateTool::NAME => LabelsCreateTool::execute(&parse(arguments)?, session).await,
            ZonesListTool::NAME => ZonesListTool::execute(&parse(arguments)?, session).await,
            ZonesGetTool::NAME => ZonesGetTool::execute(&parse(arguments)?, session).await,
            ZonesCreateTool::NAME => ZonesCreateTool::execute(&parse(arguments)?, session).await,
            ZonesUpdateTool::NAME => ZonesUpdateTool::execute(&parse(arguments)?, session).await,
            AutomationsListTool::NAME => {
                AutomationsListTool::execute(&parse(arguments)?, session).await
            }
            AutomationsGetTool::NAME => {
                AutomationsGetTool::execute(&parse(arguments)?, session).await
            }
            MassActionsListTool::NAME => {
                MassActionsListTool::execute(&parse(arguments)?, session).await
            }
            MassActionsGetTool::NAME => {
                MassActionsGetTool::execute(&parse(arguments)?, session).await
            }
            _ => {
                warn!("Unknown tool requested: {}", name);
                return Err(super::ToolError::not_found(name).to_string());
            }
        };
        outcome.map_err(|e| e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::PreyConfig;

    fn test_session() -> Arc<Session> {
        Arc::new(
            Session::new(PreyConfig {
                api_key: "k3y".to_string(),
                disable_rate_limit: true,
                ..PreyConfig::default()
            })
            .unwrap(),
        )
    }

    #[test]
    fn test_registry_tool_names() {
        let registry = ToolRegistry::new(test_session());
        let names = registry.tool_names();
        assert_eq!(names.len(), 22);
        assert!(names.contains(&"prey.account.get"));
        assert!(names.contains(&"prey.devices.list"));
        assert!(names.contains(&"prey.devices.get"));
        assert!(names.contains(&"prey.devices.delete"));
        assert!(names.contains(&"prey.devices.reports.list"));
        assert!(names.contains(&"prey.devices.reports.get"));
        assert!(names.contains(&"prey.devices.location_history.get"));
        assert!(names.contains(&"prey.devices.action.trigger"));
        assert!(names.contains(&"prey.devices.status.set"));
        assert!(names.contains(&"prey.users.list"));
        assert!(names.contains(&"prey.users.get"));
        assert!(names.contains(&"prey.labels.list"));
        assert!(names.contains(&"prey.labels.get"));
        assert!(names.contains(&"prey.labels.create"));
        assert!(names.contains(&"prey.zones.list"));
        assert!(names.contains(&"prey.zones.get"));
        assert!(names.contains(&"prey.zones.create"));
        assert!(names.contains(&"prey.zones.update"));
        assert!(names.contains(&"prey.automations.list"));
        assert!(names.contains(&"prey.automations.get"));
        assert!(names.contains(&"prey.mass_actions.list"));
        assert!(names.contains(&"prey.mass_actions.get"));
    }

    #[test]
    fn test_tool_metadata_matches_names() {
        let registry = ToolRegistry::new(test_session());
        let names = registry.tool_names();
        let tools = ToolRegistry::get_all_tools();
        assert_eq!(tools.len(), names.len());
        for tool in tools {
            assert!(names.contains(&tool.name.as_ref()));
        }
    }

    #[cfg(feature = "http")]
    #[tokio::test]
    async fn test_registry_call_unknown() {
        let registry = ToolRegistry::new(test_session());
        let result = registry.call_tool("unknown", serde_json::json!({})).await;
        assert!(result.is_err());
    }

    #[cfg(feature = "http")]
    #[tokio::test]
    async fn test_registry_call_validation_error() {
        let registry = ToolRegistry::new(test_session());
        let result = registry
            .call_tool("prey.devices.get", serde_json::json!({"deviceId": ""}))
            .await;
        assert_eq!(result.unwrap_err(), "deviceId is required");
    }
}
