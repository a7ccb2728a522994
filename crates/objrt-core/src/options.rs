//! Runtime configuration

/// Options for creating a [`Runtime`](crate::Runtime)
#[derive(Debug, Clone)]
pub struct RuntimeOptions {
    /// Selector name of the load hook, looked up among a metaclass's own methods
    pub load_selector: String,

    /// Selector name of the one-time initialization hook
    pub initialize_selector: String,

    /// Log the legacy negative-first-ivar-offset correction at warn level
    /// (debug otherwise)
    pub warn_legacy_ivar_offsets: bool,
}

impl Default for RuntimeOptions {
    fn default() -> Self {
        Self {
            load_selector: "load".to_string(),
            initialize_selector: "initialize".to_string(),
            warn_legacy_ivar_offsets: true,
        }
    }
}

impl RuntimeOptions {
    /// Use a different load hook selector
    pub fn with_load_selector(mut self, name: impl Into<String>) -> Self {
        self.load_selector = name.into();
        self
    }

    /// Use a different initialization hook selector
    pub fn with_initialize_selector(mut self, name: impl Into<String>) -> Self {
        self.initialize_selector = name.into();
        self
    }

    /// Choose the log level of the legacy ivar offset correction
    pub fn with_legacy_offset_warnings(mut self, warn: bool) -> Self {
        self.warn_legacy_ivar_offsets = warn;
        self
    }
}
