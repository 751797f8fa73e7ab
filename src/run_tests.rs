//! Tests for the run module.

use super::*;
use imageroller::config::{AuthFile, Cli, ConfigFile};

const CONFIG: &str = r#"
[DEFAULT]
ConcurrentWorkers = 8
SaveTimeoutMinutes = 60
RetainImageMinutes = 120
Region = "DFW"

["web.example.com"]
Enabled = true

["db.example.com"]
Region = "IAD"
RetainImageMinutes = 10
"#;

const AUTH: &str = "[AUTH]\nApiUser = \"user\"\nApiKey = \"key\"\n";

fn validated(args: &[&str]) -> ValidatedConfig {
    let mut full_args = vec!["imageroller"];
    full_args.extend(args);
    let cli = Cli::parse_from_iter(full_args);

    ValidatedConfig::from_raw(
        &cli,
        &ConfigFile::parse(CONFIG).unwrap(),
        &AuthFile::parse(AUTH).unwrap(),
    )
    .unwrap()
}

mod plan {
    use super::*;

    #[test]
    fn one_entry_per_enabled_server() {
        let plan = RotationPlan::from(&validated(&[]));

        assert_eq!(plan.entries.len(), 1);
        assert_eq!(plan.entries[0].server, "web.example.com");
        assert!(!plan.force);
    }

    #[test]
    fn targeted_server_is_added() {
        let plan = RotationPlan::from(&validated(&["--server", "db.example.com", "--force"]));

        let servers: Vec<&str> = plan.entries.iter().map(|e| e.server.as_str()).collect();
        assert_eq!(servers, vec!["web.example.com", "db.example.com"]);
        assert!(plan.entries[1].auto_enabled);
        assert!(plan.force);
    }

    #[test]
    fn workers_capped_by_server_count() {
        let plan = RotationPlan::from(&validated(&[]));

        assert_eq!(plan.workers, 8);
        assert_eq!(plan.effective_workers(), 1);
    }

    #[test]
    fn summary_mentions_force() {
        let plan = RotationPlan::from(&validated(&["--force"]));

        assert_eq!(plan.summary(), "Rotating 1 server(s) with 1 worker(s), forced");
    }
}

mod describe {
    use super::*;

    #[test]
    fn shows_seconds() {
        let plan = RotationPlan::from(&validated(&[]));

        assert_eq!(
            plan.entries[0].describe(),
            "web.example.com [DFW]: save timeout 3600s, retain images 7200s"
        );
    }

    #[test]
    fn marks_auto_enabled() {
        let plan = RotationPlan::from(&validated(&["--server", "db.example.com"]));

        assert_eq!(
            plan.entries[1].describe(),
            "db.example.com [IAD]: save timeout 3600s, retain images 600s (enabled by --server)"
        );
    }
}
