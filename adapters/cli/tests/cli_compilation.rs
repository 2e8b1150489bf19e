use std::process::Command;

#[test]
fn cli_compiles_without_warnings() {
    let status = Command::new(env!("CARGO"))
        .current_dir(env!("CARGO_MANIFEST_DIR"))
        .args(["check", "--quiet", "--bin", "force-field"])
        .status()
        .expect("failed to invoke cargo check for force-field CLI binary");

    assert!(status.success(), "cargo check --bin force-field should succeed");
}
