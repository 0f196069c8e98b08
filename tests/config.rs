// ABOUTME: Integration tests for configuration parsing and validation.
// ABOUTME: Tests YAML parsing, defaults, secret resolution and file discovery.

use hearth::config::*;
use hearth::error::Error;
use std::time::Duration;

const MINIMAL: &str = r#"
deployment:
  hostname: mc.example.com
  zone: Z123
  instance: i-abc
power:
  describe: describe-instance
  start: start-instance
  stop: stop-instance
dns:
  upsert: dns-upsert
  delete: dns-delete
"#;

mod parsing {
    use super::*;

    #[test]
    fn parse_minimal_config() {
        let config = Config::from_yaml(MINIMAL).unwrap();
        assert_eq!(config.deployment.hostname.as_str(), "mc.example.com");
        assert_eq!(config.deployment.zone.as_str(), "Z123");
        assert_eq!(config.deployment.instance.as_str(), "i-abc");
        assert_eq!(config.power.describe, "describe-instance");
        assert_eq!(config.dns.delete, "dns-delete");
    }

    #[test]
    fn minimal_config_uses_defaults() {
        let config = Config::from_yaml(MINIMAL).unwrap();
        assert_eq!(config.ssh, SshConfig::default());
        assert_eq!(config.game, GameConfig::default());
        assert_eq!(config.timing.poll_interval, Duration::from_secs(10));
        assert_eq!(config.timing.power_timeout, Duration::from_secs(300));
        assert_eq!(config.timing.service_timeout, Duration::from_secs(600));
        assert_eq!(config.timing.idle_interval, Duration::from_secs(600));
    }

    #[test]
    fn parse_full_config() {
        let yaml = r#"
deployment:
  hostname: Play.Example.COM.
  zone: Z999
  instance: i-0123
power:
  describe: aws describe
  start: aws start
  stop: aws stop
dns:
  upsert: ./up.sh
  delete: ./down.sh
ssh:
  user: ubuntu
  port: 2222
  key: /keys/mc.pem
  trust_first_connection: false
  command_timeout: 2m
game:
  port: 25566
  start: ./run.sh
  rcon:
    client: rcon-cli
    host: 127.0.0.1
    port: 25580
    password: hunter2
timing:
  poll_interval: 5s
  settle: 30s
  idle_interval: 15m
"#;
        let config = Config::from_yaml(yaml).unwrap();
        assert_eq!(config.deployment.hostname.as_str(), "play.example.com");
        assert_eq!(config.ssh.user, "ubuntu");
        assert_eq!(config.ssh.port, 2222);
        assert!(config.ssh.host.is_none());
        assert!(!config.ssh.trust_first_connection);
        assert_eq!(config.ssh.command_timeout, Duration::from_secs(120));
        assert_eq!(config.game.port, 25566);
        assert_eq!(config.game.rcon.client, "rcon-cli");
        assert_eq!(
            config.game.rcon.password,
            SecretValue::Literal("hunter2".to_string())
        );
        assert_eq!(config.timing.poll_interval, Duration::from_secs(5));
        assert_eq!(config.timing.settle, Duration::from_secs(30));
        assert_eq!(config.timing.idle_interval, Duration::from_secs(900));
        // Unset timings keep their defaults.
        assert_eq!(config.timing.shutdown_timeout, Duration::from_secs(300));
    }

    #[test]
    fn ssh_shorthand_string() {
        let yaml = format!("{MINIMAL}ssh: ec2-user@10.0.0.9:2200\n");
        let config = Config::from_yaml(&yaml).unwrap();
        assert_eq!(config.ssh.host.as_deref(), Some("10.0.0.9"));
        assert_eq!(config.ssh.user, "ec2-user");
        assert_eq!(config.ssh.port, 2200);
    }

    #[test]
    fn unknown_field_returns_error() {
        let yaml = format!("{MINIMAL}servers: []\n");
        assert!(matches!(Config::from_yaml(&yaml), Err(Error::Yaml(_))));
    }

    #[test]
    fn unknown_timing_returns_error() {
        let yaml = format!("{MINIMAL}timing:\n  boot_timeout: 5m\n");
        assert!(matches!(Config::from_yaml(&yaml), Err(Error::Yaml(_))));
    }

    #[test]
    fn invalid_hostname_returns_error() {
        let yaml = MINIMAL.replace("mc.example.com", "mc_server.example.com");
        assert!(Config::from_yaml(&yaml).is_err());
    }

    #[test]
    fn missing_power_section_returns_error() {
        let yaml = r#"
deployment:
  hostname: mc.example.com
  zone: Z123
  instance: i-abc
dns:
  upsert: up
  delete: down
"#;
        assert!(Config::from_yaml(yaml).is_err());
    }

    #[test]
    fn template_parses() {
        temp_env::with_var("RCON_PASSWORD", Some("secret"), || {
            let config = Config::from_yaml(TEMPLATE).unwrap();
            assert_eq!(config.ssh.user, "ubuntu");
            assert_eq!(config.game.rcon.password.resolve().unwrap(), "secret");
        });
    }
}

mod validation {
    use super::*;

    fn invalid_message(yaml: &str) -> String {
        match Config::from_yaml(yaml) {
            Err(Error::InvalidConfig(msg)) => msg,
            other => panic!("expected invalid configuration, got {other:?}"),
        }
    }

    #[test]
    fn empty_command_is_rejected() {
        let yaml = MINIMAL.replace("dns-upsert", "\"  \"");
        assert_eq!(invalid_message(&yaml), "dns.upsert cannot be empty");
    }

    #[test]
    fn empty_instance_is_rejected() {
        let yaml = MINIMAL.replace("i-abc", "\"\"");
        match Config::from_yaml(&yaml) {
            Err(Error::Yaml(e)) => assert!(e.to_string().contains("instance id cannot be empty")),
            other => panic!("expected a parse error, got {other:?}"),
        }
    }

    #[test]
    fn zone_with_whitespace_is_rejected() {
        let yaml = MINIMAL.replace("zone: Z123", "zone: \"Z1 Z2\"");
        match Config::from_yaml(&yaml) {
            Err(Error::Yaml(e)) => assert!(e.to_string().contains("zone id contains whitespace")),
            other => panic!("expected a parse error, got {other:?}"),
        }
    }

    #[test]
    fn zero_poll_interval_is_rejected() {
        let yaml = format!("{MINIMAL}timing:\n  poll_interval: 0s\n");
        assert_eq!(
            invalid_message(&yaml),
            "timing.poll_interval must be greater than zero"
        );
    }

    #[test]
    fn zero_idle_interval_is_rejected() {
        let yaml = format!("{MINIMAL}timing:\n  idle_interval: 0s\n");
        assert_eq!(
            invalid_message(&yaml),
            "timing.idle_interval must be greater than zero"
        );
    }
}

mod secrets {
    use super::*;

    #[test]
    fn literal_password() {
        let yaml = format!("{MINIMAL}game:\n  rcon:\n    password: swordfish\n");
        let config = Config::from_yaml(&yaml).unwrap();
        assert_eq!(config.game.rcon.password.resolve().unwrap(), "swordfish");
    }

    #[test]
    fn password_from_environment() {
        let yaml = format!("{MINIMAL}game:\n  rcon:\n    password:\n      env: HEARTH_TEST_RCON\n");
        let config = Config::from_yaml(&yaml).unwrap();

        temp_env::with_var("HEARTH_TEST_RCON", Some("from_environment"), || {
            assert_eq!(
                config.game.rcon.password.resolve().unwrap(),
                "from_environment"
            );
        });
    }

    #[test]
    fn missing_environment_variable() {
        temp_env::with_var_unset("RCON_PASSWORD", || {
            let config = Config::from_yaml(MINIMAL).unwrap();
            match config.game.service_commands() {
                Err(Error::MissingEnvVar(var)) => assert_eq!(var, "RCON_PASSWORD"),
                other => panic!("expected missing env var, got {other:?}"),
            }
        });
    }

    #[test]
    fn service_commands_use_resolved_password() {
        temp_env::with_var("RCON_PASSWORD", Some("abc"), || {
            let config = Config::from_yaml(MINIMAL).unwrap();
            let commands = config.game.service_commands().unwrap();
            assert_eq!(commands.start, "systemctl start minecraft");
            assert_eq!(commands.console, "mcrcon -H 'localhost' -P 25575 -p 'abc'");
        });
    }
}

mod discovery {
    use super::*;
    use std::fs;

    #[test]
    fn finds_primary_filename() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(CONFIG_FILENAME), MINIMAL).unwrap();

        let path = Config::find(dir.path()).unwrap();
        assert_eq!(path, dir.path().join("hearth.yml"));
        assert!(Config::discover(dir.path()).is_ok());
    }

    #[test]
    fn finds_alternate_filenames() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join(".hearth")).unwrap();
        fs::write(dir.path().join(CONFIG_FILENAME_DIR), MINIMAL).unwrap();
        assert_eq!(
            Config::find(dir.path()).unwrap(),
            dir.path().join(".hearth/config.yml")
        );

        fs::write(dir.path().join(CONFIG_FILENAME_ALT), MINIMAL).unwrap();
        assert_eq!(
            Config::find(dir.path()).unwrap(),
            dir.path().join("hearth.yaml")
        );
    }

    #[test]
    fn missing_config_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            Config::discover(dir.path()),
            Err(Error::ConfigNotFound(_))
        ));
    }

    #[test]
    fn init_writes_template() {
        let dir = tempfile::tempdir().unwrap();
        let path = init_config(dir.path(), false).unwrap();
        assert_eq!(fs::read_to_string(path).unwrap(), TEMPLATE);
    }

    #[test]
    fn init_refuses_to_overwrite_without_force() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILENAME);
        fs::write(&path, "keep me").unwrap();

        assert!(matches!(
            init_config(dir.path(), false),
            Err(Error::AlreadyExists(_))
        ));
        assert_eq!(fs::read_to_string(&path).unwrap(), "keep me");

        init_config(dir.path(), true).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), TEMPLATE);
    }
}
