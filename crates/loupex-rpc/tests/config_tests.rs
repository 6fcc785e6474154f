#![allow(clippy::unwrap_used, clippy::expect_used)]

use loupex_core::FacetAddress;
use loupex_rpc::config::LoupexConfig;
use std::io::Write;
use std::time::Duration;
use tempfile::NamedTempFile;

fn write_toml(table: &toml::Table) -> NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
    file.write_all(toml::to_string(table).unwrap().as_bytes())
        .unwrap();
    file
}

fn full_config() -> toml::Table {
    toml::from_str(
        r#"
[rpc]
url = "https://arb1.arbitrum.io/rpc"
timeout_ms = 5000

[enumeration]
concurrency = 8
deadline_ms = 20000
verify = true

[tenderly]
account = "acme"
project = "diamonds"
access_key = "tk_secret_value"

[blockscout.api_bases]
42161 = "https://arbitrum.blockscout.com/api"

[[diamonds]]
name = "main"
address = "0xf7993A8df974AD022647E63402d6315137c58ABf"
chain_id = 42161
"#,
    )
    .unwrap()
}

#[test]
fn test_load_full_file() {
    let file = write_toml(&full_config());
    let config = LoupexConfig::load(Some(file.path())).unwrap();

    assert_eq!(config.rpc.timeout(), Duration::from_millis(5000));
    let options = config.enumeration.options();
    assert_eq!(options.concurrency, 8);
    assert_eq!(options.deadline, Some(Duration::from_secs(20)));

    let tenderly = config.tenderly.as_ref().unwrap();
    assert_eq!(tenderly.api_base, "https://api.tenderly.co/api/v1");
    assert_eq!(tenderly.access_key.expose(), "tk_secret_value");

    let main = config.diamond("main").unwrap();
    let expected: FacetAddress = "0xf7993a8df974ad022647e63402d6315137c58abf".parse().unwrap();
    assert_eq!(main.address, expected);
    assert_eq!(main.chain_id, 42161);
    assert!(config.diamond("other").is_none());
}

#[test]
fn test_access_key_is_redacted_in_debug() {
    let file = write_toml(&full_config());
    let config = LoupexConfig::load(Some(file.path())).unwrap();
    assert!(!format!("{:?}", config).contains("tk_secret_value"));
}

#[test]
fn test_missing_file_is_config_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = LoupexConfig::load(Some(&dir.path().join("absent.toml"))).unwrap_err();
    assert!(matches!(err, loupex_core::LoupeError::Config { .. }));
}

#[test]
fn test_zero_concurrency_rejected() {
    let mut table = full_config();
    table
        .get_mut("enumeration")
        .and_then(toml::Value::as_table_mut)
        .unwrap()
        .insert("concurrency".to_string(), toml::Value::Integer(0));

    let file = write_toml(&table);
    let err = LoupexConfig::load(Some(file.path())).unwrap_err();
    assert!(err.to_string().contains("concurrency"));
}

#[test]
fn test_duplicate_diamond_names_rejected() {
    let mut table = full_config();
    let diamonds = table
        .get_mut("diamonds")
        .and_then(toml::Value::as_array_mut)
        .unwrap();
    let copy = diamonds[0].clone();
    diamonds.push(copy);

    let file = write_toml(&table);
    let err = LoupexConfig::load(Some(file.path())).unwrap_err();
    assert!(err.to_string().contains("used twice"));
}

#[test]
fn test_bad_diamond_address_rejected() {
    let err = LoupexConfig::from_toml(
        r#"
[rpc]
url = "http://localhost:8545"

[[diamonds]]
name = "broken"
address = "0x1234"
chain_id = 1
"#,
    )
    .unwrap_err();
    assert!(matches!(err, loupex_core::LoupeError::Config { .. }));
}

#[test]
fn test_empty_tenderly_key_rejected() {
    let err = LoupexConfig::from_toml(
        r#"
[rpc]
url = "http://localhost:8545"

[tenderly]
account = "acme"
project = "diamonds"
access_key = ""
"#,
    )
    .unwrap_err();
    assert!(err.to_string().contains("access_key"));
}
