//! Configuration file tests

use dato::frontend::config::{CompileConfig, ConfigError, OptLevel};
use dato::Compiler;
use std::io::Write;

#[test]
fn test_load_config_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("dato.ron");
    let mut file = std::fs::File::create(&path).unwrap();
    writeln!(file, "(\n    opt_level: O0,\n    max_passes: 8,\n)").unwrap();

    let config = CompileConfig::load(&path).unwrap();
    assert_eq!(config.opt_level, OptLevel::O0);
    assert_eq!(config.max_passes, 8);

    let compilation = Compiler::with_config(config)
        .compile(b"data: i4 x; logic: x = 1; ret x;")
        .unwrap();
    assert_eq!(compilation.doil(), "def x dword\nset x 1\nget x r0\nret r0\n");
}

#[test]
fn test_saved_config_loads_back() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("saved.ron");
    let config = CompileConfig::new().with_max_passes(3);
    std::fs::write(&path, config.to_ron_string().unwrap()).unwrap();
    assert_eq!(CompileConfig::load(&path).unwrap(), config);
}

#[test]
fn test_missing_config_file() {
    let dir = tempfile::tempdir().unwrap();
    let err = CompileConfig::load(dir.path().join("absent.ron")).unwrap_err();
    assert!(matches!(err, ConfigError::Io(_)));
}
