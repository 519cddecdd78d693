//! End-to-end resolution scenarios through the library API.

mod common;

use common::*;
use switchboard::template::resolve_variant;
use switchboard::{ConfigGenerator, TemplateError, Variant};

#[test]
fn modern_version_on_trixie_resolves_distribution_packages_and_excludes_chan_sip() {
    let store = fixture_store();
    let generator = ConfigGenerator::new(&store);

    assert_eq!(resolve_variant("22.5.2").unwrap(), Variant::Modern);

    let config = generator.generate("22.5.2", "trixie").unwrap();

    // The builder package list comes wholesale from the distribution layer
    // since neither base nor variant redefine it at higher precedence.
    assert_eq!(
        string_list(&config["build"]["stages"]["builder"]["packages"]),
        vec!["gcc-14", "make", "libssl-dev", "libedit-dev"]
    );

    // 22 >= 21, so the legacy SIP driver is force-excluded.
    assert!(string_list(&config["asterisk"]["menuselect"]["exclude"])
        .contains(&"chan_sip".to_string()));

    // 22 < 23: no websocket force-include.
    assert!(!string_list(&config["asterisk"]["menuselect"]["channels"])
        .contains(&"chan_websocket".to_string()));
}

#[test]
fn historic_versions_resolve_their_variants() {
    assert_eq!(resolve_variant("1.2.40").unwrap(), Variant::LegacyAddons);
    assert_eq!(resolve_variant("11.6-cert18").unwrap(), Variant::Asterisk10);
    assert_eq!(resolve_variant("23.0.0-rc2").unwrap(), Variant::Modern);
}

#[test]
fn websocket_override_applies_to_23_release_candidate() {
    let store = fixture_store();
    let generator = ConfigGenerator::new(&store);

    let config = generator.generate("23.0.0-rc2", "trixie").unwrap();

    assert!(string_list(&config["asterisk"]["menuselect"]["channels"])
        .contains(&"chan_websocket".to_string()));
    assert_eq!(
        config["features"]["websockets"],
        serde_yaml::Value::from(true)
    );
    // Both rules fire at 23.
    assert!(string_list(&config["asterisk"]["menuselect"]["exclude"])
        .contains(&"chan_sip".to_string()));
}

#[test]
fn legacy_addons_build_carries_mapped_addons_version() {
    let store = fixture_store();
    let generator = ConfigGenerator::new(&store);

    let config = generator.generate("1.2.40", "jessie").unwrap();

    assert_eq!(
        config["asterisk"]["addons"]["version"],
        serde_yaml::Value::from("1.2.9")
    );
    assert_eq!(config["variant"], serde_yaml::Value::from("legacy-addons"));
    // No modern overrides on a 1.2 build.
    assert!(string_list(&config["asterisk"]["menuselect"]["exclude"]).is_empty());
}

#[test]
fn unknown_distribution_fails_naming_the_request() {
    let store = fixture_store();
    let generator = ConfigGenerator::new(&store);

    let err = generator.generate("22.5.2", "fedora").unwrap_err();
    match &err {
        TemplateError::DistributionNotFound {
            distribution,
            available,
        } => {
            assert_eq!(distribution, "fedora");
            assert!(available.contains(&"debian-trixie".to_string()));
        }
        other => panic!("expected DistributionNotFound, got {other:?}"),
    }
    assert!(err.to_string().contains("fedora"));
}

#[test]
fn repeated_generation_is_byte_identical() {
    let store = fixture_store();
    let generator = ConfigGenerator::new(&store);

    let first = serde_yaml::to_string(&generator.generate("22.5.2", "trixie").unwrap()).unwrap();
    let second = serde_yaml::to_string(&generator.generate("22.5.2", "trixie").unwrap()).unwrap();
    assert_eq!(first, second);
}

#[test]
fn git_build_receives_every_newest_version_override() {
    let store = fixture_store();
    let generator = ConfigGenerator::new(&store);

    let config = generator.generate("git", "trixie").unwrap();

    assert!(string_list(&config["asterisk"]["menuselect"]["exclude"])
        .contains(&"chan_sip".to_string()));
    assert!(string_list(&config["asterisk"]["menuselect"]["channels"])
        .contains(&"chan_websocket".to_string()));
}
