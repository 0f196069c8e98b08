// ABOUTME: Config scaffolding for new deployments.
// ABOUTME: Writes a commented hearth.yml template.

use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

use super::CONFIG_FILENAME;

pub const TEMPLATE: &str = r#"# hearth configuration

deployment:
  # Name players connect to. hearth points this record at the instance.
  hostname: mc.example.com
  zone: Z0123456789ABC
  instance: i-0123456789abcdef0

# Each command runs under `sh -c` with HEARTH_INSTANCE_ID, HEARTH_ZONE,
# HEARTH_HOSTNAME and HEARTH_ADDRESS set as relevant.
power:
  # Must print {"id": "...", "state": "running|stopped|...", "address": "..."}
  describe: >-
    aws ec2 describe-instances --instance-ids "$HEARTH_INSTANCE_ID"
    --query 'Reservations[0].Instances[0].{id: InstanceId, state: State.Name, address: PublicIpAddress}'
    --output json
  start: aws ec2 start-instances --instance-ids "$HEARTH_INSTANCE_ID"
  stop: aws ec2 stop-instances --instance-ids "$HEARTH_INSTANCE_ID"

dns:
  upsert: ./scripts/dns-upsert.sh
  delete: ./scripts/dns-delete.sh

# Omit host to connect to the instance's current address.
ssh:
  user: ubuntu
  # key: ~/.ssh/minecraft.pem
  trust_first_connection: true

game:
  port: 25565
  start: sudo systemctl start minecraft
  rcon:
    port: 25575
    password:
      env: RCON_PASSWORD

timing:
  poll_interval: 10s
  power_timeout: 5m
  service_timeout: 10m
  shutdown_timeout: 5m
  settle: 10s
  idle_interval: 10m
"#;

/// Write the template to `dir`, returning the path written.
pub fn init_config(dir: &Path, force: bool) -> Result<PathBuf> {
    let config_path = dir.join(CONFIG_FILENAME);

    if config_path.exists() && !force {
        return Err(Error::AlreadyExists(config_path));
    }

    std::fs::write(&config_path, TEMPLATE)?;
    Ok(config_path)
}
