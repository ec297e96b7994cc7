use serde::Deserialize;
use slim_core::binding::BindingScope;
use tower_lsp::lsp_types::ConfigurationItem;
use tracing::{debug, warn};

use super::state::{SlimLanguageServer, lock};

pub(crate) const CONFIG_SECTION: &str = "slim.lsp";
const MAX_DEBOUNCE_MS: u64 = 5_000;

#[derive(Debug, Clone)]
pub(crate) struct ServerConfig {
    pub(crate) binding_scope: BindingScope,
    pub(crate) diagnostics_enabled: bool,
    pub(crate) debounce_ms: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            binding_scope: BindingScope::default(),
            diagnostics_enabled: true,
            debounce_ms: 250,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct SlimLspConfigSection {
    #[serde(default)]
    binding_scope: Option<BindingScope>,
    #[serde(default)]
    diagnostics: DiagnosticsConfig,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct DiagnosticsConfig {
    #[serde(default)]
    enabled: Option<bool>,
    #[serde(default)]
    debounce_ms: Option<u64>,
}

impl ServerConfig {
    /// Merge a `slim.lsp` section. Absent keys keep their current value.
    pub(crate) fn apply_section(&mut self, value: serde_json::Value) -> anyhow::Result<()> {
        let section: SlimLspConfigSection = serde_json::from_value(value)?;
        if let Some(scope) = section.binding_scope {
            self.binding_scope = scope;
        }
        if let Some(enabled) = section.diagnostics.enabled {
            self.diagnostics_enabled = enabled;
        }
        if let Some(ms) = section.diagnostics.debounce_ms {
            self.debounce_ms = ms.min(MAX_DEBOUNCE_MS);
        }
        Ok(())
    }
}

impl SlimLanguageServer {
    /// Pull the `slim.lsp` section from the client.
    pub(crate) async fn load_config(&self) {
        let Some(client) = &self.client else {
            return;
        };
        let items = vec![ConfigurationItem {
            scope_uri: None,
            section: Some(CONFIG_SECTION.to_string()),
        }];

        match client.configuration(items).await {
            Ok(values) => {
                if let Some(value) = values.into_iter().next().filter(|v| !v.is_null()) {
                    self.apply_config(value);
                }
            }
            Err(e) => debug!("client did not provide configuration: {e}"),
        }
    }

    /// Apply a section value and carry the binding scope into the store.
    pub(crate) fn apply_config(&self, value: serde_json::Value) {
        let scope = {
            let mut config = lock(&self.config);
            if let Err(e) = config.apply_section(value) {
                warn!("ignoring invalid {CONFIG_SECTION} configuration: {e}");
                return;
            }
            config.binding_scope
        };
        lock(&self.bindings).set_scope(scope);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn partial_section_keeps_defaults() {
        let mut config = ServerConfig::default();
        config.apply_section(json!({ "diagnostics": { "debounceMs": 40 } })).unwrap();
        assert_eq!(config.debounce_ms, 40);
        assert!(config.diagnostics_enabled);
        assert_eq!(config.binding_scope, BindingScope::Global);
    }

    #[test]
    fn scope_and_toggle_are_read() {
        let mut config = ServerConfig::default();
        config
            .apply_section(json!({ "bindingScope": "document", "diagnostics": { "enabled": false } }))
            .unwrap();
        assert_eq!(config.binding_scope, BindingScope::Document);
        assert!(!config.diagnostics_enabled);
    }

    #[test]
    fn debounce_is_capped() {
        let mut config = ServerConfig::default();
        config.apply_section(json!({ "diagnostics": { "debounceMs": 999_999 } })).unwrap();
        assert_eq!(config.debounce_ms, MAX_DEBOUNCE_MS);
    }

    #[test]
    fn unknown_scope_is_rejected() {
        let mut config = ServerConfig::default();
        assert!(config.apply_section(json!({ "bindingScope": "workspace" })).is_err());
        assert_eq!(config.binding_scope, BindingScope::Global);
    }
}
