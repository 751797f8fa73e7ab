//! Tests for resolving the whole configuration file.

use super::*;

const NOT_ENABLED: &str = "not.exist.example.com";
const WORKERS_OVERRIDE: &str = "workers.example.com";
const SAVE_OVERRIDE: &str = "save.example.com";
const RETAIN_OVERRIDE: &str = "retain.example.com";
const REGION_OVERRIDE: &str = "region.example.com";

/// One disabled server and four enabled servers, each overriding one value.
fn overrides() -> String {
    with_full_defaults(&format!(
        "[\"{NOT_ENABLED}\"]\nConcurrentWorkers = 3\n\n\
         [\"{WORKERS_OVERRIDE}\"]\nEnabled = true\nConcurrentWorkers = 3\n\n\
         [\"{SAVE_OVERRIDE}\"]\nEnabled = true\nSaveTimeoutMinutes = 20\n\n\
         [\"{RETAIN_OVERRIDE}\"]\nEnabled = true\nRetainImageMinutes = 45\n\n\
         [\"{REGION_OVERRIDE}\"]\nEnabled = true\nRegion = \"IAD\"\n"
    ))
}

mod errors {
    use super::*;

    #[test]
    fn no_server_sections() {
        let err = resolve(
            &RunArgs::new(),
            &format!("[DEFAULT]\nConcurrentWorkers = {WORKERS}\n"),
        )
        .unwrap_err();

        assert!(matches!(err, ConfigError::NoServers));
        assert_eq!(err.to_string(), "You must configure at least one server");
    }

    #[test]
    fn all_servers_disabled() {
        let err = resolve(
            &RunArgs::new(),
            &with_full_defaults("[\"a.example.com\"]\n[\"b.example.com\"]\nEnabled = false\n"),
        )
        .unwrap_err();

        assert_eq!(err.to_string(), "You must configure at least one server");
    }

    #[test]
    fn requested_server_not_configured_without_sections() {
        let err = resolve(
            &RunArgs::new().with_server("invalid.example.com"),
            &format!("[DEFAULT]\nConcurrentWorkers = {WORKERS}\n"),
        )
        .unwrap_err();

        assert_eq!(
            err.to_string(),
            "The specified server is not configured: invalid.example.com"
        );
    }

    #[test]
    fn requested_server_not_configured_among_valid_servers() {
        let err = resolve(&RunArgs::new().with_server("invalid.example.com"), &overrides())
            .unwrap_err();

        assert!(matches!(
            err,
            ConfigError::ServerNotConfigured(ref name) if name == "invalid.example.com"
        ));
    }

    #[test]
    fn requested_server_checked_before_other_sections() {
        // The broken section would fail resolution, but the unknown name is reported first
        let err = resolve(
            &RunArgs::new().with_server("invalid.example.com"),
            &format!("[DEFAULT]\nConcurrentWorkers = {WORKERS}\n\n[\"{SERVER}\"]\n"),
        )
        .unwrap_err();

        assert!(matches!(err, ConfigError::ServerNotConfigured(_)));
    }

    #[test]
    fn requested_server_is_case_sensitive() {
        let err = resolve(&RunArgs::new().with_server("TEST.example.com"), &minimal()).unwrap_err();

        assert!(matches!(err, ConfigError::ServerNotConfigured(_)));
    }

    #[test]
    fn workers_checked_before_servers() {
        let err = resolve(
            &RunArgs::new().with_server("invalid.example.com"),
            "[DEFAULT]\nConcurrentWorkers = 0\n",
        )
        .unwrap_err();

        assert_eq!(err.to_string(), "Concurrent workers must be greater than 0");
    }

    #[test]
    fn disabled_section_is_still_validated() {
        let err = resolve(
            &RunArgs::new(),
            &format!("{}\n[\"broken.example.com\"]\n", minimal()),
        )
        .unwrap_err();

        assert_eq!(
            err.to_string(),
            "Server Config for broken.example.com is missing Region"
        );
    }
}

mod minimal_config {
    use super::*;

    #[test]
    fn resolves_single_server() {
        let resolved = resolve(&RunArgs::new(), &minimal()).unwrap();

        assert_eq!(resolved.concurrent_workers(), WORKERS);
        assert_eq!(resolved.servers().len(), 1);

        let server = &resolved.servers()[0];
        assert_eq!(server.save_timeout_seconds(), u64::from(SAVE_TIMEOUT) * 60);
        assert_eq!(server.retain_image_seconds(), u64::from(RETAIN_IMAGE) * 60);
        assert!(server.enabled());
        assert!(!server.auto_enabled());
    }

    #[test]
    fn requested_on_command_line() {
        let resolved = resolve(&RunArgs::new().with_server(SERVER), &minimal()).unwrap();

        let server = resolved.server(SERVER).unwrap();
        assert_eq!(server.save_timeout_seconds(), u64::from(SAVE_TIMEOUT) * 60);
        assert!(server.auto_enabled());
    }

    #[test]
    fn requested_disabled_server_is_included() {
        let content = with_full_defaults(&format!("[\"{SERVER}\"]\nEnabled = false\n"));

        assert!(matches!(
            resolve(&RunArgs::new(), &content),
            Err(ConfigError::NoServers)
        ));

        let resolved = resolve(&RunArgs::new().with_server(SERVER), &content).unwrap();
        let server = resolved.server(SERVER).unwrap();
        assert!(server.enabled());
        assert!(server.auto_enabled());
    }

    #[test]
    fn lowercase_keys_resolve() {
        let content = format!(
            "[DEFAULT]\nconcurrentworkers = {WORKERS}\nsavetimeoutminutes = {SAVE_TIMEOUT}\n\
             retainimageminutes = {RETAIN_IMAGE}\n\n[\"{SERVER}\"]\nenabled = true\nregion = \"{REGION}\"\n"
        );

        let resolved = resolve(&RunArgs::new(), &content).unwrap();

        assert_eq!(resolved.concurrent_workers(), WORKERS);
        let server = resolved.server(SERVER).unwrap();
        assert_eq!(server.region(), REGION);
        assert!(server.enabled());
    }

    #[test]
    fn force_does_not_affect_resolution() {
        let plain = resolve(&RunArgs::new(), &minimal()).unwrap();
        let forced = resolve(&RunArgs::new().with_force(true), &minimal()).unwrap();

        assert_eq!(plain, forced);
    }
}

mod override_config {
    use super::*;

    fn names(resolved: &GlobalConfig) -> Vec<&str> {
        resolved.servers().iter().map(ServerConfig::name).collect()
    }

    #[test]
    fn disabled_server_is_excluded() {
        let resolved = resolve(&RunArgs::new(), &overrides()).unwrap();

        assert!(!names(&resolved).contains(&NOT_ENABLED));
        assert!(resolved.server(NOT_ENABLED).is_none());
    }

    #[test]
    fn enabled_servers_in_declaration_order() {
        let resolved = resolve(&RunArgs::new(), &overrides()).unwrap();

        assert_eq!(
            names(&resolved),
            vec![WORKERS_OVERRIDE, SAVE_OVERRIDE, RETAIN_OVERRIDE, REGION_OVERRIDE]
        );
        assert!(resolved.servers().iter().all(ServerConfig::enabled));
    }

    #[test]
    fn workers_cannot_be_overridden() {
        let resolved = resolve(&RunArgs::new(), &overrides()).unwrap();

        assert_eq!(resolved.concurrent_workers(), WORKERS);
    }

    #[test]
    fn each_override_applies_to_its_server_only() {
        let resolved = resolve(&RunArgs::new(), &overrides()).unwrap();

        let save = resolved.server(SAVE_OVERRIDE).unwrap();
        assert_eq!(save.save_timeout_minutes(), 20);
        assert_eq!(save.retain_image_minutes(), RETAIN_IMAGE);
        assert_eq!(save.region(), REGION);

        let retain = resolved.server(RETAIN_OVERRIDE).unwrap();
        assert_eq!(retain.retain_image_minutes(), 45);
        assert_eq!(retain.save_timeout_minutes(), SAVE_TIMEOUT);

        let region = resolved.server(REGION_OVERRIDE).unwrap();
        assert_eq!(region.region(), "IAD");
        assert_eq!(region.save_timeout_minutes(), SAVE_TIMEOUT);

        let workers = resolved.server(WORKERS_OVERRIDE).unwrap();
        assert_eq!(workers.save_timeout_minutes(), SAVE_TIMEOUT);
        assert_eq!(workers.retain_image_minutes(), RETAIN_IMAGE);
        assert_eq!(workers.region(), REGION);
    }

    #[test]
    fn targeting_adds_to_enabled_set() {
        let resolved = resolve(&RunArgs::new().with_server(NOT_ENABLED), &overrides()).unwrap();

        assert_eq!(resolved.servers().len(), 5);
        assert_eq!(names(&resolved)[0], NOT_ENABLED);
        assert!(resolved.server(NOT_ENABLED).unwrap().auto_enabled());
        assert!(!resolved.server(SAVE_OVERRIDE).unwrap().auto_enabled());
    }

    #[test]
    fn display_lists_servers() {
        let resolved = resolve(&RunArgs::new(), &overrides()).unwrap();
        let shown = resolved.to_string();

        assert!(shown.contains(&format!("concurrent_workers: {WORKERS}")));
        assert!(shown.contains(SAVE_OVERRIDE));
        assert!(!shown.contains(NOT_ENABLED));
    }
}
