// Target module configuration for WebAssembly text output

/// Default export name of the program's entry function
pub const DEFAULT_ENTRY_EXPORT: &str = "main";

/// First linear-memory address handed out for static data; the bytes below
/// it belong to the runtime library.
pub const DEFAULT_DATA_BASE: u32 = 1024;

/// Heap block size of one string `read`, length header included.
pub const DEFAULT_STRING_SLOT_SIZE: u32 = 256;

/// Complete target configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetConfig {
    pub entry_export: String,
    pub data_base: u32,
    pub string_slot_size: u32,
}

impl TargetConfig {
    /// Override the string slot size, keeping room for the length header
    pub fn with_string_slot_size(mut self, size: u32) -> Self {
        self.string_slot_size = size.max(8);
        self
    }

    pub fn with_entry_export(mut self, name: impl Into<String>) -> Self {
        self.entry_export = name.into();
        self
    }

    /// Longest string a `read` can return
    pub fn string_capacity(&self) -> u32 {
        self.string_slot_size.saturating_sub(4)
    }
}

impl Default for TargetConfig {
    fn default() -> Self {
        Self {
            entry_export: DEFAULT_ENTRY_EXPORT.to_string(),
            data_base: DEFAULT_DATA_BASE,
            string_slot_size: DEFAULT_STRING_SLOT_SIZE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = TargetConfig::default();
        assert_eq!(config.entry_export, "main");
        assert_eq!(config.data_base, 1024);
        assert_eq!(config.string_capacity(), 252);
    }

    #[test]
    fn test_slot_size_keeps_header_room() {
        let config = TargetConfig::default().with_string_slot_size(2);
        assert_eq!(config.string_slot_size, 8);
        assert_eq!(config.string_capacity(), 4);
    }

    #[test]
    fn test_entry_override() {
        let config = TargetConfig::default().with_entry_export("_start");
        assert_eq!(config.entry_export, "_start");
    }
}
