//! Config load validation tests for gateway-probe-config.
// crates/gateway-probe-config/tests/load_validation.rs
// =============================================================================
// Module: Config Load Validation Tests
// Description: Validate config loading guards (path, size, encoding, schema).
// Purpose: Ensure config input handling is strict and fail-closed.
// =============================================================================

use std::io::Write;
use std::path::Path;

use gateway_probe_config::ConfigError;
use gateway_probe_config::GatewayProbeConfig;
use gateway_probe_config::LogLevel;
use tempfile::NamedTempFile;

type TestResult = Result<(), String>;

fn assert_invalid(result: Result<GatewayProbeConfig, ConfigError>, needle: &str) -> TestResult {
    match result {
        Err(error) => {
            let message = error.to_string();
            if message.contains(needle) {
                Ok(())
            } else {
                Err(format!("error {message} did not contain {needle}"))
            }
        }
        Ok(_) => Err("expected invalid config load".to_string()),
    }
}

fn write_config(contents: &str) -> Result<NamedTempFile, String> {
    let mut file = NamedTempFile::new().map_err(|err| err.to_string())?;
    file.write_all(contents.as_bytes()).map_err(|err| err.to_string())?;
    Ok(file)
}

#[test]
fn load_rejects_path_too_long() -> TestResult {
    let long_path = "a".repeat(5_000);
    let path = Path::new(&long_path);
    assert_invalid(GatewayProbeConfig::load(Some(path)), "config path exceeds max length")?;
    Ok(())
}

#[test]
fn load_rejects_path_component_too_long() -> TestResult {
    let long_component = "a".repeat(300);
    let path = Path::new(&long_component);
    assert_invalid(GatewayProbeConfig::load(Some(path)), "config path component too long")?;
    Ok(())
}

#[test]
fn load_rejects_missing_explicit_file() -> TestResult {
    let path = Path::new("definitely-missing-gateway-probe.toml");
    assert_invalid(GatewayProbeConfig::load(Some(path)), "config io error")?;
    Ok(())
}

#[test]
fn load_rejects_oversized_file() -> TestResult {
    let mut file = NamedTempFile::new().map_err(|err| err.to_string())?;
    let payload = vec![b'#'; 256 * 1024 + 1];
    file.write_all(&payload).map_err(|err| err.to_string())?;
    assert_invalid(GatewayProbeConfig::load(Some(file.path())), "config file exceeds size limit")?;
    Ok(())
}

#[test]
fn load_rejects_non_utf8_file() -> TestResult {
    let mut file = NamedTempFile::new().map_err(|err| err.to_string())?;
    file.write_all(&[0xFF, 0xFE, 0xFF]).map_err(|err| err.to_string())?;
    assert_invalid(GatewayProbeConfig::load(Some(file.path())), "config file must be utf-8")?;
    Ok(())
}

#[test]
fn load_rejects_unknown_fields() -> TestResult {
    let file = write_config("[gateway]\nbase_url = \"http://localhost:3000\"\nmystery = 1\n")?;
    assert_invalid(GatewayProbeConfig::load(Some(file.path())), "config parse error")?;
    Ok(())
}

#[test]
fn load_rejects_non_http_base_url() -> TestResult {
    let file = write_config("[gateway]\nbase_url = \"ftp://localhost\"\n")?;
    assert_invalid(GatewayProbeConfig::load(Some(file.path())), "must use http or https")?;
    Ok(())
}

#[test]
fn load_rejects_health_timeout_above_upload_timeout() -> TestResult {
    let file = write_config("[timeouts]\nhealth_ms = 40000\nupload_ms = 30000\n")?;
    assert_invalid(
        GatewayProbeConfig::load(Some(file.path())),
        "timeouts.health_ms must be shorter than timeouts.upload_ms",
    )?;
    Ok(())
}

#[test]
fn load_rejects_health_timeout_equal_to_upload_timeout() -> TestResult {
    let file = write_config("[timeouts]
health_ms = 30000
upload_ms = 30000
")?;
    assert_invalid(
        GatewayProbeConfig::load(Some(file.path())),
        "timeouts.health_ms must be shorter than timeouts.upload_ms",
    )?;
    Ok(())
}

#[test]
fn load_rejects_excessive_inter_probe_delay() -> TestResult {
    let file = write_config("[probes]\ninter_probe_delay_ms = 600000\n")?;
    assert_invalid(GatewayProbeConfig::load(Some(file.path())), "inter_probe_delay_ms")?;
    Ok(())
}

#[test]
fn load_rejects_blank_recipient() -> TestResult {
    let file = write_config("[probes]\nrecipient = \"   \"\n")?;
    assert_invalid(GatewayProbeConfig::load(Some(file.path())), "probes.recipient")?;
    Ok(())
}

#[test]
fn load_trims_padded_recipient() -> TestResult {
    let file = write_config(r#"[probes]
recipient = "  +15550100\t"
"#)?;
    let config = GatewayProbeConfig::load(Some(file.path())).map_err(|err| err.to_string())?;
    if config.probes.recipient != "+15550100" {
        return Err(format!("recipient not trimmed: '{}'", config.probes.recipient));
    }
    Ok(())
}

#[test]
fn load_accepts_partial_file_with_defaults() -> TestResult {
    let file = write_config(
        "[gateway]\nbase_url = \"http://127.0.0.1:8080\"\n\n[probes]\nimage = false\n\n\
         [logging]\nlevel = \"debug\"\n",
    )?;
    let config = GatewayProbeConfig::load(Some(file.path())).map_err(|err| err.to_string())?;
    if config.gateway.base_url != "http://127.0.0.1:8080" {
        return Err(format!("unexpected base url {}", config.gateway.base_url));
    }
    if config.gateway.health_path != "/health" {
        return Err("health path default not applied".to_string());
    }
    if config.probes.image || !config.probes.text || !config.probes.document {
        return Err("probe toggles not applied".to_string());
    }
    if config.logging.level != LogLevel::Debug {
        return Err("log level not applied".to_string());
    }
    Ok(())
}

#[test]
fn load_without_path_falls_back_to_defaults() -> TestResult {
    let config = GatewayProbeConfig::load(None).map_err(|err| err.to_string())?;
    if config != GatewayProbeConfig::default() {
        return Err("implicit load should yield defaults".to_string());
    }
    Ok(())
}
