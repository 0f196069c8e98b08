// ABOUTME: Integration tests for the shell-script power and DNS providers.
// ABOUTME: Runs real `sh -c` commands and checks output parsing and context variables.

use std::fs;

use hearth::config::{DnsScripts, PowerScripts};
use hearth::providers::{
    DnsBinding, ExitCode, NameRegistrar, PowerProvider, PowerState, ProviderError, ScriptPower,
    ScriptRegistrar, run_script,
};
use hearth::types::{Hostname, InstanceId, ZoneId};

fn power(describe: &str) -> ScriptPower {
    ScriptPower::new(
        InstanceId::new("i-test").unwrap(),
        PowerScripts {
            describe: describe.to_string(),
            start: "true".to_string(),
            stop: "exit 3".to_string(),
        },
    )
}

// =============================================================================
// Power
// =============================================================================

/// Test: Describe output is parsed and the instance id is passed in the environment.
#[tokio::test]
async fn describe_parses_report() {
    let provider = power(
        r#"printf '{"id":"%s","state":"running","address":"198.51.100.4"}' "$HEARTH_INSTANCE_ID""#,
    );

    let handle = provider.describe().await.unwrap();
    assert_eq!(handle.id.as_str(), "i-test");
    assert_eq!(handle.address, Some("198.51.100.4".parse().unwrap()));
    assert_eq!(
        provider.power_state(&handle).await.unwrap(),
        PowerState::Running
    );
}

/// Test: Provider state names map onto the three power states.
#[tokio::test]
async fn power_state_maps_provider_names() {
    let provider = power(r#"echo '{"state":"stopping"}'"#);
    let handle = provider.describe().await.unwrap();
    assert!(handle.address.is_none());
    assert_eq!(
        provider.power_state(&handle).await.unwrap(),
        PowerState::Pending
    );

    let provider = power(r#"echo '{"state":"stopped"}'"#);
    assert_eq!(
        provider.power_state(&handle).await.unwrap(),
        PowerState::Stopped
    );
}

/// Test: Empty describe output means the instance does not exist.
#[tokio::test]
async fn empty_describe_is_not_found() {
    let err = power("true").describe().await.unwrap_err();
    assert!(matches!(err, ProviderError::NotFound(id) if id == "i-test"));
}

/// Test: Unparseable describe output is an invalid response.
#[tokio::test]
async fn bad_json_is_invalid_response() {
    let err = power("echo not-json").describe().await.unwrap_err();
    assert!(matches!(err, ProviderError::InvalidResponse(_)));
}

/// Test: An instance id that is not a single word is rejected.
#[tokio::test]
async fn malformed_reported_id_is_invalid_response() {
    let err = power(r#"echo '{"id":"i-1 i-2","state":"running"}'"#)
        .describe()
        .await
        .unwrap_err();
    assert!(matches!(err, ProviderError::InvalidResponse(_)));
}

/// Test: A failing power command carries its exit code and stderr.
#[tokio::test]
async fn failing_command_reports_exit_code() {
    let provider = power(r#"echo '{"state":"running"}'"#);
    let handle = provider.describe().await.unwrap();

    provider.power_on(&handle).await.unwrap();
    match provider.power_off(&handle).await.unwrap_err() {
        ProviderError::CommandFailed { code, .. } => assert_eq!(code, ExitCode(Some(3))),
        other => panic!("expected command failure, got {other:?}"),
    }
}

/// Test: run_script captures stdout and trims stderr on failure.
#[tokio::test]
async fn run_script_captures_output() {
    let output = run_script("echo \"$GREETING\"", &[("GREETING", "hi".to_string())])
        .await
        .unwrap();
    assert_eq!(output.stdout, "hi\n");

    let err = run_script("echo oops >&2; exit 1", &[]).await.unwrap_err();
    let message = err.to_string();
    assert!(matches!(err, ProviderError::CommandFailed { ref stderr, .. } if stderr == "oops"));
    assert_eq!(message, "command exited with status 1: oops");
}

// =============================================================================
// DNS
// =============================================================================

/// Test: Upsert and delete receive the record through HEARTH_* variables.
#[tokio::test]
async fn registrar_passes_record_in_environment() {
    let dir = tempfile::tempdir().unwrap();
    let upserted = dir.path().join("upsert.txt");
    let deleted = dir.path().join("delete.txt");

    let registrar = ScriptRegistrar::new(DnsScripts {
        upsert: format!(
            r#"echo "$HEARTH_ZONE $HEARTH_HOSTNAME $HEARTH_ADDRESS" > '{}'"#,
            upserted.display()
        ),
        delete: format!(
            r#"echo "$HEARTH_ZONE $HEARTH_HOSTNAME ${{HEARTH_ADDRESS:-none}}" > '{}'"#,
            deleted.display()
        ),
    });

    let zone = ZoneId::new("Z123").unwrap();
    let hostname = Hostname::new("mc.example.com").unwrap();
    registrar
        .upsert_record(&DnsBinding {
            zone: zone.clone(),
            hostname: hostname.clone(),
            address: "203.0.113.7".parse().unwrap(),
        })
        .await
        .unwrap();
    registrar.delete_record(&zone, &hostname).await.unwrap();

    assert_eq!(
        fs::read_to_string(&upserted).unwrap(),
        "Z123 mc.example.com 203.0.113.7\n"
    );
    assert_eq!(
        fs::read_to_string(&deleted).unwrap(),
        "Z123 mc.example.com none\n"
    );
}
