//! Tool Router - builds the rmcp ToolRouter from the tool definitions.
//!
//! This module builds the ToolRouter for STDIO/TCP transport by delegating
//! to the tool definitions themselves. Each tool knows how to create its own route.

use std::sync::Arc;

use rmcp::handler::server::tool::ToolRouter;

use crate::domains::prey::Session;

use super::definitions::{
    AccountGetTool, AutomationsGetTool, AutomationsListTool, DeviceActionTriggerTool,
    DeviceStatusSetTool, DevicesDeleteTool, DevicesGetTool, DevicesListTool,
    DevicesLocationHistoryTool, DevicesReportsGetTool, DevicesReportsListTool, LabelsCreateTool,
    LabelsGetTool, LabelsListTool, MassActionsGetTool, MassActionsListTool, UsersGetTool,
    UsersListTool, ZonesCreateTool, ZonesGetTool, ZonesListTool, ZonesUpdateTool,
};

/// Build the tool router with all registered tools.
pub fn build_tool_router<S>(session: Arc<Session>) -> ToolRouter<S>
where
    S: Send + Sync + 'static,
{
    ToolRouter::new()
        .with_route(AccountGetTool::create_route(session.clone()))
        .with_route(DevicesListTool::create_route(session.clone()))
        .with_route(DevicesGetTool::create_route(session.clone()))
        .with_route(DevicesDeleteTool::create_route(session.clone()))
        .with_route(DevicesReportsListTool::create_route(session.clone()))
        .with_route(DevicesReportsGetTool::create_route(session.clone()))
        .with_route(DevicesLocationHistoryTool::create_route(session.clone()))
        .with_route(DeviceActionTriggerTool::create_route(session.clone()))
        .with_route(DeviceStatusSetTool::create_route(session.clone()))
        .with_route(UsersListTool::create_route(session.clone()))
        .with_route(UsersGetTool::create_route(session.clone()))
        .with_route(LabelsListTool::create_route(session.clone()))
        .with_route(LabelsGetTool::create_route(session.clone()))
        .with_route(LabelsCreateTool::create_route(session.clone()))
        .with_route(ZonesListTool::create_route(session.clone()))
        .with_route(ZonesGetTool::create_route(session.clone()))
        .with_route(ZonesCreateTool::create_route(session.clone()))
        .with_route(ZonesUpdateTool::create_route(session.clone()))
        .with_route(AutomationsListTool::create_route(session.clone()))
        .with_route(AutomationsGetTool::create_route(session.clone()))
        .with_route(MassActionsListTool::create_route(session.clone()))
        .with_route(MassActionsGetTool::create_route(session))
}
