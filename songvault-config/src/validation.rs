use crate::models::Config;

/// A non-fatal configuration problem surfaced at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigWarning {
    pub message: String,
    pub hint: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct ConfigWarnings {
    pub items: Vec<ConfigWarning>,
}

impl ConfigWarnings {
    pub fn push(&mut self, message: impl Into<String>) {
        self.items.push(ConfigWarning {
            message: message.into(),
            hint: None,
        });
    }

    pub fn push_with_hint(
        &mut self,
        message: impl Into<String>,
        hint: impl Into<String>,
    ) {
        self.items.push(ConfigWarning {
            message: message.into(),
            hint: Some(hint.into()),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Inspect a composed config for settings that work but are probably not
/// what the operator wants.
pub fn collect_warnings(config: &Config) -> ConfigWarnings {
    let mut warnings = ConfigWarnings::default();

    if config.cors.is_permissive() {
        warnings.push_with_hint(
            "CORS allows any origin",
            "Set CORS_ALLOWED_ORIGINS to the web client's origin(s)",
        );
    }

    if config.database.min_connections > config.database.max_connections {
        warnings.push(format!(
            "DB_MIN_CONNECTIONS ({}) exceeds DB_MAX_CONNECTIONS ({}); the pool will keep at most {} idle",
            config.database.min_connections,
            config.database.max_connections,
            config.database.max_connections
        ));
    }

    warnings
}
