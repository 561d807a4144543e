use std::path::PathBuf;

use dexarb::models::config::{DexArbConfig, GeneratorBackend};

#[test]
fn shipped_config_matches_defaults() {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../config/dexarb.toml");
    let text = std::fs::read_to_string(&path).unwrap();
    let config: DexArbConfig = toml::from_str(&text).unwrap();

    assert_eq!(config, DexArbConfig::default());
    assert_eq!(config.generator.backend, GeneratorBackend::ChatCompletions);
    assert_eq!(config.server.bind, "0.0.0.0:3000");
}
