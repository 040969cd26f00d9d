use serde::{Deserialize, Serialize};
use std::fmt;

/// Services disabled on every host regardless of mode.
pub const BASE_SERVICES: &[&str] = &["avahi-daemon", "cups", "postfix", "vsftpd"];

const WORKSTATION_EXTRA: &[&str] = &["smb", "nmb", "rpcbind", "nfs-server", "bluetooth"];

const SERVER_EXTRA: &[&str] = &["rpcbind", "nfs-server", "gdm", "cups-browsed", "bluetooth"];

/// Host profile; selects which extra services get disabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum HardeningMode {
    Workstation,
    Server,
}

impl HardeningMode {
    /// Ordered list of systemd units to stop and disable.
    ///
    /// Recomputed on every call; the base list always comes first.
    pub fn services(self) -> Vec<&'static str> {
        let extra = match self {
            HardeningMode::Workstation => WORKSTATION_EXTRA,
            HardeningMode::Server => SERVER_EXTRA,
        };
        BASE_SERVICES.iter().chain(extra).copied().collect()
    }
}

impl fmt::Display for HardeningMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HardeningMode::Workstation => write!(f, "workstation"),
            HardeningMode::Server => write!(f, "server"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_workstation_services() {
        assert_eq!(
            HardeningMode::Workstation.services(),
            vec![
                "avahi-daemon",
                "cups",
                "postfix",
                "vsftpd",
                "smb",
                "nmb",
                "rpcbind",
                "nfs-server",
                "bluetooth",
            ]
        );
    }

    #[test]
    fn test_server_services() {
        assert_eq!(
            HardeningMode::Server.services(),
            vec![
                "avahi-daemon",
                "cups",
                "postfix",
                "vsftpd",
                "rpcbind",
                "nfs-server",
                "gdm",
                "cups-browsed",
                "bluetooth",
            ]
        );
    }

    #[test]
    fn test_every_mode_starts_with_base_list() {
        for mode in [HardeningMode::Workstation, HardeningMode::Server] {
            let services = mode.services();
            assert_eq!(&services[..BASE_SERVICES.len()], BASE_SERVICES);
        }
    }

    #[test]
    fn test_display_matches_cli_value() {
        use clap::ValueEnum;
        for mode in HardeningMode::value_variants() {
            let pv = mode.to_possible_value().unwrap();
            assert_eq!(pv.get_name(), mode.to_string());
        }
    }
}
