//! Per-call tool gate: allowlist membership and the write-permission flag.

use crate::core::config::PreyConfig;

use super::error::{ApiError, ApiResult};

/// True when no allowlist is configured or the tool name is listed.
pub fn is_tool_allowed(config: &PreyConfig, tool_name: &str) -> bool {
    config.allowed_tools.is_empty() || config.allowed_tools.contains(tool_name)
}

/// Reject tools outside the allowlist, and mutating tools while writes are
/// disabled. The two causes carry distinct errors.
pub fn ensure_tool_allowed(config: &PreyConfig, tool_name: &str, write: bool) -> ApiResult<()> {
    if !is_tool_allowed(config, tool_name) {
        return Err(ApiError::ToolNotAllowed(tool_name.to_string()));
    }
    if write && !config.allow_write {
        return Err(ApiError::WriteDisabled);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_with(allowed: &[&str], allow_write: bool) -> PreyConfig {
        PreyConfig {
            allowed_tools: allowed.iter().map(|s| s.to_string()).collect(),
            allow_write,
            ..PreyConfig::default()
        }
    }

    #[test]
    fn empty_allowlist_admits_any_tool() {
        let config = config_with(&[], false);
        assert!(is_tool_allowed(&config, "prey.devices.list"));
        assert!(ensure_tool_allowed(&config, "prey.devices.list", false).is_ok());
    }

    #[test]
    fn non_empty_allowlist_admits_only_listed_names() {
        let config = config_with(&["prey.devices.list"], false);
        assert!(ensure_tool_allowed(&config, "prey.devices.list", false).is_ok());
        let err = ensure_tool_allowed(&config, "prey.zones.list", false).unwrap_err();
        assert!(matches!(err, ApiError::ToolNotAllowed(_)));
    }

    #[test]
    fn mutating_tool_rejected_without_write_permission() {
        // Even a listed tool is rejected when writes are off.
        let config = config_with(&["prey.devices.delete"], false);
        let err = ensure_tool_allowed(&config, "prey.devices.delete", true).unwrap_err();
        assert!(matches!(err, ApiError::WriteDisabled));

        let config = config_with(&["prey.devices.delete"], true);
        assert!(ensure_tool_allowed(&config, "prey.devices.delete", true).is_ok());
    }

    #[test]
    fn allowlist_miss_wins_over_write_check() {
        let config = config_with(&["prey.devices.list"], false);
        let err = ensure_tool_allowed(&config, "prey.devices.delete", true).unwrap_err();
        assert!(matches!(err, ApiError::ToolNotAllowed(_)));
    }
}
