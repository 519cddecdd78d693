//! Constants and default values used throughout switchboard.

/// Default paths and configuration values
pub mod paths {
    /// Default location for the switchboard configuration file
    pub const DEFAULT_CONFIG_PATH: &str = "/etc/switchboard/switchboard.toml";

    /// Default directory containing the layered templates
    pub const DEFAULT_TEMPLATES_DIR: &str = "templates";

    /// Default output directory for generated configuration documents
    pub const DEFAULT_OUTPUT_DIR: &str = "configs/generated";

    /// Default location of the supported-builds matrix
    pub const DEFAULT_BUILDS_FILE: &str = "asterisk/supported-asterisk-builds.yml";
}

/// Layer naming conventions
pub mod naming {
    /// OS name prefixed onto bare distribution names ("trixie" -> "debian-trixie")
    pub const DEFAULT_OS_NAME: &str = "debian";

    /// Key of the single always-applied base layer
    pub const BASE_LAYER_KEY: &str = "asterisk-base";
}

/// Source tarball URL templates
pub mod urls {
    /// Regular release download URL ({version} substituted at render time)
    pub const ASTERISK_URL_TEMPLATE: &str =
        "https://downloads.asterisk.org/pub/telephony/asterisk/releases/asterisk-{version}.tar.gz";

    /// Certified release download URL
    pub const CERTIFIED_URL_TEMPLATE: &str =
        "https://downloads.asterisk.org/pub/telephony/certified-asterisk/releases/asterisk-certified-{version}.tar.gz";
}

/// Placeholders substituted into every string scalar of the merged document
pub mod placeholders {
    pub const VERSION: &str = "{{VERSION}}";
    pub const DISTRIBUTION: &str = "{{DISTRIBUTION}}";
    pub const VARIANT: &str = "{{VARIANT}}";
    pub const ADDONS_VERSION: &str = "{{ADDONS_VERSION}}";
}
