//! Tool definitions module.
//!
//! This module exports all available tool definitions.
//! Each Prey resource family is defined in its own file.

pub mod account;
pub mod actions;
pub mod automations;
pub mod common;
pub mod devices;
pub mod labels;
pub mod mass_actions;
pub mod users;
pub mod zones;

pub use account::AccountGetTool;
pub use actions::{DeviceActionTriggerTool, DeviceStatusSetTool};
pub use automations::{AutomationsGetTool, AutomationsListTool};
pub use devices::{
    DevicesDeleteTool, DevicesGetTool, DevicesListTool, DevicesLocationHistoryTool,
    DevicesReportsGetTool, DevicesReportsListTool,
};
pub use labels::{LabelsCreateTool, LabelsGetTool, LabelsListTool};
pub use mass_actions::{MassActionsGetTool, MassActionsListTool};
pub use users::{UsersGetTool, UsersListTool};
pub use zones::{ZonesCreateTool, ZonesGetTool, ZonesListTool, ZonesUpdateTool};
