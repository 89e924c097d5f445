use assert_cmd::cargo::cargo_bin_cmd;

#[test]
fn help_lists_all_commands() {
    let mut cmd = cargo_bin_cmd!("sqldiff");
    cmd.arg("--help");
    let output = cmd.assert().success().get_output().stdout.clone();
    let stdout = String::from_utf8_lossy(&output);

    for name in [
        "extract",
        "diff",
        "drift",
        "sync",
        "deploy",
        "apply",
        "check-conn",
    ] {
        assert!(stdout.contains(name), "missing command: {}", name);
    }
}

#[test]
fn unknown_command_fails() {
    let mut cmd = cargo_bin_cmd!("sqldiff");
    cmd.arg("frobnicate");
    cmd.assert().failure();
}

#[test]
fn diff_without_sides_fails() {
    let mut cmd = cargo_bin_cmd!("sqldiff");
    cmd.arg("diff");
    cmd.assert().failure();
}
