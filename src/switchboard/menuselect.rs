//! Menuselect module planning.
//!
//! Decides which Asterisk modules to enable or disable for a given version
//! and feature set, and renders the corresponding `menuselect/menuselect`
//! command lines. This is selection logic only; the Dockerfile that runs the
//! commands is rendered elsewhere.

use serde_yaml::Value;

use crate::template::VersionId;

/// Channel drivers for PJSIP-era versions.
const MODERN_CHANNELS: &[&str] = &[
    "chan_pjsip",
    "chan_iax2",
    "chan_local",
    "chan_bridge_media",
    "chan_websocket",
];

/// Channel drivers for the 1.2-1.8 series.
const LEGACY_CHANNELS: &[&str] = &["chan_sip", "chan_iax2", "chan_local", "chan_zap"];

const CORE_APPLICATIONS: &[&str] = &[
    "app_dial",
    "app_playback",
    "app_record",
    "app_echo",
    "app_hangup",
    "app_noop",
    "app_verbose",
    "app_waitexten",
];

const VOICEMAIL_APPLICATIONS: &[&str] = &["app_voicemail", "app_voicemailmain"];

const CALL_FEATURE_APPLICATIONS: &[&str] = &[
    "app_queue",
    "app_directory",
    "app_followme",
    "app_forkcdr",
    "app_mixmonitor",
    "app_monitor",
];

const CONTROL_APPLICATIONS: &[&str] = &[
    "app_if",
    "app_while",
    "app_goto",
    "app_gosub",
    "app_return",
    "app_stack",
];

const CONFERENCING_APPLICATIONS: &[&str] = &["app_confbridge", "app_meetme"];

const CORE_RESOURCES: &[&str] = &[
    "res_timing_timerfd",
    "res_crypto",
    "res_format_attr",
    "res_rtp_asterisk",
    "res_musiconhold",
];

const PJSIP_RESOURCES: &[&str] = &[
    "res_pjsip",
    "res_pjsip_session",
    "res_pjsip_registrar",
    "res_pjsip_outbound_registration",
    "res_pjsip_endpoint_identifier_user",
    "res_pjsip_endpoint_identifier_ip",
    "res_pjsip_authenticator_digest",
    "res_pjsip_caller_id",
    "res_pjsip_transport_websocket",
];

const DATABASE_RESOURCES: &[&str] = &[
    "res_config_pgsql",
    "res_config_odbc",
    "res_odbc",
    "res_config_curl",
];

const CDR_CEL_RESOURCES: &[&str] = &["res_cdr", "res_cel"];

const MONITORING_RESOURCES: &[&str] = &[
    "res_hep",
    "res_hep_pjsip",
    "res_hep_rtcp",
    "res_statsd",
    "res_prometheus",
];

const ARI_RESOURCES: &[&str] = &[
    "res_ari",
    "res_ari_applications",
    "res_ari_asterisk",
    "res_ari_bridges",
    "res_ari_channels",
    "res_ari_device_states",
    "res_ari_endpoints",
    "res_ari_events",
    "res_ari_mailboxes",
    "res_ari_model",
    "res_ari_playbacks",
    "res_ari_recordings",
    "res_ari_sounds",
];

const WEBSOCKET_RESOURCES: &[&str] = &["res_http_websocket", "res_websocket_client"];

const SECURITY_RESOURCES: &[&str] = &["res_srtp", "res_stun_monitor"];

const CDR_CORE: &[&str] = &["cdr_csv"];
const CDR_DATABASE: &[&str] = &["cdr_odbc", "cdr_pgsql", "cdr_mysql"];
const CEL_DATABASE: &[&str] = &["cel_odbc", "cel_pgsql", "cel_mysql"];

/// Hardware- or legacy-dependent modules disabled in every build.
const EXCLUDED_MODULES: &[&str] = &[
    "chan_dahdi",
    "chan_misdn",
    "app_festival",
    "app_flash",
    "res_pjsip_sdp_rtp",
    "codec_dahdi",
];

/// Sound and documentation categories never baked into images.
const DISABLED_CATEGORIES: &[&str] = &[
    "MENUSELECT_CORE_SOUNDS",
    "MENUSELECT_MOH",
    "MENUSELECT_EXTRA_SOUNDS",
];

const PJSIP_FLOOR: u32 = 12;
const ARI_FLOOR: u32 = 12;
const WEBSOCKET_FLOOR: u32 = 23;
const CONFBRIDGE_FLOOR: u32 = 10;
/// Last effective major of the legacy 1.2-1.8 series.
const LEGACY_CEILING: u32 = 8;

/// Optional feature toggles, all on by default.
#[derive(Debug, Clone, Copy)]
pub struct Features {
    pub postgresql: bool,
    pub odbc: bool,
    pub ari: bool,
    pub websocket: bool,
    pub srtp: bool,
    pub hep: bool,
}

impl Default for Features {
    fn default() -> Self {
        Self {
            postgresql: true,
            odbc: true,
            ari: true,
            websocket: true,
            srtp: true,
            hep: true,
        }
    }
}

impl Features {
    /// Read feature toggles from a merged configuration document's
    /// `features` mapping. Missing keys keep their defaults.
    pub fn from_config(config: &Value) -> Self {
        let mut features = Self::default();
        let flag = |name: &str, default: bool| {
            config["features"][name].as_bool().unwrap_or(default)
        };
        features.postgresql = flag("postgresql", features.postgresql);
        features.odbc = flag("odbc", features.odbc);
        features.ari = flag("ari", features.ari);
        features.websocket = flag("websockets", features.websocket);
        features.srtp = flag("srtp", features.srtp);
        features.hep = flag("hep", features.hep);
        features
    }
}

/// A resolved module selection: what to enable, disable, and which whole
/// categories to turn off. Lists are sorted and de-duplicated so the plan is
/// deterministic for a given input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuselectPlan {
    pub enable: Vec<String>,
    pub disable: Vec<String>,
    pub disable_categories: Vec<String>,
}

impl MenuselectPlan {
    /// Build the module plan for a version and feature set.
    pub fn for_version(version: &VersionId, features: Features) -> Self {
        let major = version.effective_major();
        let legacy = major <= LEGACY_CEILING;

        let mut enable: Vec<&str> = Vec::new();

        if legacy {
            enable.extend(LEGACY_CHANNELS);
        } else {
            enable.extend(MODERN_CHANNELS);
        }
        if major < WEBSOCKET_FLOOR {
            enable.retain(|module| *module != "chan_websocket");
        }

        enable.extend(CORE_APPLICATIONS);
        enable.extend(VOICEMAIL_APPLICATIONS);
        enable.extend(CALL_FEATURE_APPLICATIONS);
        enable.extend(CONTROL_APPLICATIONS);

        if !legacy && major >= CONFBRIDGE_FLOOR {
            enable.extend(CONFERENCING_APPLICATIONS);
        } else {
            enable.push("app_meetme");
        }

        enable.extend(CORE_RESOURCES);
        enable.extend(CDR_CEL_RESOURCES);

        if !legacy && major >= PJSIP_FLOOR {
            enable.extend(PJSIP_RESOURCES);
        }

        if features.postgresql {
            enable.extend(modules_matching(DATABASE_RESOURCES, "pgsql"));
            enable.extend(modules_matching(CDR_DATABASE, "pgsql"));
            enable.extend(modules_matching(CEL_DATABASE, "pgsql"));
        }
        if features.odbc {
            enable.extend(modules_matching(DATABASE_RESOURCES, "odbc"));
            enable.extend(modules_matching(CDR_DATABASE, "odbc"));
            enable.extend(modules_matching(CEL_DATABASE, "odbc"));
        }

        enable.extend(CDR_CORE);

        if major >= ARI_FLOOR && features.ari {
            enable.extend(ARI_RESOURCES);
        }

        if major >= WEBSOCKET_FLOOR {
            // Websocket transport and ARI are mandatory from 23, whatever
            // the feature flags say.
            enable.extend(WEBSOCKET_RESOURCES);
            enable.extend(ARI_RESOURCES);
        } else if features.websocket && !legacy {
            enable.extend(WEBSOCKET_RESOURCES);
        }

        if features.srtp && !legacy {
            enable.extend(SECURITY_RESOURCES);
        }
        if features.hep && !legacy {
            enable.extend(MONITORING_RESOURCES);
        }

        let mut enable: Vec<String> = enable.into_iter().map(str::to_string).collect();
        enable.sort();
        enable.dedup();

        let mut disable: Vec<String> =
            EXCLUDED_MODULES.iter().map(|m| (*m).to_string()).collect();
        disable.sort();
        disable.dedup();

        Self {
            enable,
            disable,
            disable_categories: DISABLED_CATEGORIES.iter().map(|c| (*c).to_string()).collect(),
        }
    }

    /// Render the plan as `menuselect/menuselect` command lines.
    pub fn commands(&self) -> Vec<String> {
        let mut commands = vec![
            "menuselect/menuselect --disable BUILD_NATIVE menuselect.makeopts".to_string(),
            "menuselect/menuselect --enable BETTER_BACKTRACES menuselect.makeopts".to_string(),
        ];
        for category in &self.disable_categories {
            commands.push(format!(
                "menuselect/menuselect --disable-category {category} menuselect.makeopts"
            ));
        }
        for module in &self.enable {
            commands.push(format!(
                "menuselect/menuselect --enable {module} menuselect.makeopts"
            ));
        }
        for module in &self.disable {
            commands.push(format!(
                "menuselect/menuselect --disable {module} menuselect.makeopts"
            ));
        }
        commands
    }
}

fn modules_matching<'a>(modules: &'a [&'a str], needle: &'a str) -> impl Iterator<Item = &'a str> {
    modules
        .iter()
        .copied()
        .filter(move |module| module.contains(needle))
}
