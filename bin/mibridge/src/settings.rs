/// Identifier accessories are registered under.
pub const PLUGIN_NAME: &str = "homebridge-mi-air-purifier";

/// Selects the platform block in the configuration file.
pub const PLATFORM_NAME: &str = "MiAirPurifierPlugin";

pub const MANUFACTURER: &str = "Xiaomi";
