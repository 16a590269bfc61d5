//! Value parsers for CLI arguments that clap cannot check on its own

use std::fs;
use std::net::Ipv4Addr;
use std::path::PathBuf;

/// Maximum number of migrations a single `--rollback` may revert
pub const MAX_ROLLBACK_STEPS: u32 = 100;

/// Port in 1..=65535
pub fn validate_port(port_str: &str) -> Result<u16, String> {
    let port: u16 = port_str.parse().map_err(|_| {
        format!(
            "Port must be a valid number between 1 and 65535, got: '{}'",
            port_str
        )
    })?;

    if port == 0 {
        return Err("Port must be between 1 and 65535. Port 0 is not allowed.".to_string());
    }

    Ok(port)
}

/// The file must exist and be readable
pub fn validate_config_file_path(path_str: &str) -> Result<PathBuf, String> {
    let path = PathBuf::from(path_str);

    if !path.is_file() {
        return Err(format!(
            "Configuration file does not exist or is not a file: '{}'",
            path_str
        ));
    }

    fs::File::open(&path)
        .map(|_| path)
        .map_err(|e| format!("Cannot read configuration file '{}': {}", path_str, e))
}

pub fn validate_rollback_steps(steps_str: &str) -> Result<u32, String> {
    let steps: u32 = steps_str.parse().map_err(|_| {
        format!(
            "Rollback steps must be a valid positive number, got: '{}'",
            steps_str
        )
    })?;

    if steps == 0 {
        return Err("Rollback steps must be greater than 0".to_string());
    }
    if steps > MAX_ROLLBACK_STEPS {
        return Err(format!(
            "Rollback steps cannot exceed {}",
            MAX_ROLLBACK_STEPS
        ));
    }

    Ok(steps)
}

/// Hostname or IPv4 address; dotted-digit strings must parse as IPv4
pub fn validate_host_address(host_str: &str) -> Result<String, String> {
    let host = host_str.trim();

    if host.is_empty() {
        return Err("Host address cannot be empty".to_string());
    }
    if host.contains(char::is_whitespace) {
        return Err("Host address cannot contain spaces".to_string());
    }
    if host.len() > 253 {
        return Err("Host address is too long (maximum 253 characters)".to_string());
    }
    if host.chars().all(|c| c.is_ascii_digit() || c == '.') && host.parse::<Ipv4Addr>().is_err()
    {
        return Err(format!("Invalid IPv4 address format: '{}'", host_str));
    }

    Ok(host.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_port_validation() {
        for port in ["1", "80", "3000", "65535"] {
            assert!(validate_port(port).is_ok(), "port {} should be valid", port);
        }
        for port in ["0", "65536", "abc", "-1", ""] {
            assert!(validate_port(port).is_err(), "port {} should be invalid", port);
        }
    }

    #[test]
    fn test_host_validation() {
        for host in ["localhost", "127.0.0.1", "0.0.0.0", "db.internal", "my-server.local"] {
            assert!(validate_host_address(host).is_ok(), "{} should be valid", host);
        }
        let long = "x".repeat(300);
        for host in ["", "   ", "host with spaces", "999.1.1.1", "1.2.3", long.as_str()] {
            assert!(validate_host_address(host).is_err(), "'{}' should be invalid", host);
        }
    }

    #[test]
    fn test_rollback_steps_validation() {
        assert_eq!(validate_rollback_steps("1"), Ok(1));
        assert_eq!(validate_rollback_steps("100"), Ok(100));
        for steps in ["0", "101", "-1", "abc"] {
            assert!(validate_rollback_steps(steps).is_err(), "'{}' should be invalid", steps);
        }
    }

    #[test]
    fn test_config_file_path() {
        let dir = tempfile::tempdir().unwrap();
        let file_path = dir.path().join("app.toml");
        let mut file = fs::File::create(&file_path).unwrap();
        writeln!(file, "[server]\nport = 4000").unwrap();

        let accepted = validate_config_file_path(file_path.to_str().unwrap()).unwrap();
        assert_eq!(accepted, file_path);

        assert!(validate_config_file_path(dir.path().to_str().unwrap()).is_err());
        assert!(
            validate_config_file_path(dir.path().join("missing.toml").to_str().unwrap()).is_err()
        );
    }
}
