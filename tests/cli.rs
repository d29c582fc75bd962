use assert_cmd::Command;
use predicates::prelude::*;

fn ring() -> Command {
    Command::cargo_bin("decoder-ring").unwrap()
}

#[test]
fn hex_encode_and_decode() {
    ring().args(["-encode", "hex"]).write_stdin("AB\n").assert().success().stdout("4142\n");
    ring().arg("hex").write_stdin("4142\n").assert().success().stdout("AB\n");
}

#[test]
fn rot13_is_the_same_both_ways() {
    ring().arg("rot13").write_stdin("Hello").assert().success().stdout("Uryyb\n");
    ring().args(["-e", "rot13"]).write_stdin("Uryyb").assert().success().stdout("Hello\n");
}

#[test]
fn float32_hex_keeps_trailing_space() {
    ring()
        .args(["--encode", "float32-hex"])
        .write_stdin("1.5\n")
        .assert()
        .success()
        .stdout("3FC00000 \n");
}

#[test]
fn base32_crockford_tolerates_separators() {
    ring()
        .arg("base32-crockford")
        .write_stdin("91jp-rv3f")
        .assert()
        .success()
        .stdout("Hello\n");
}

#[test]
fn hex_extended_has_no_extra_newline() {
    ring()
        .args(["-encode", "hex-extended"])
        .write_stdin("Hi")
        .assert()
        .success()
        .stdout(predicate::str::ends_with("|Hi|\n"));
}

#[test]
fn strip_and_emit_can_be_disabled() {
    ring()
        .args(["-encode", "-strip=false", "-emit=false", "hex"])
        .write_stdin("A\n")
        .assert()
        .success()
        .stdout("410a");
}

#[test]
fn charset_names_are_modes() {
    ring()
        .arg("latin1")
        .write_stdin(b"caf\xe9".to_vec())
        .assert()
        .success()
        .stdout("café\n");
    ring()
        .args(["-encode", "latin1"])
        .write_stdin("日")
        .assert()
        .code(1)
        .stdout("")
        .stderr(predicate::str::contains("Error:"));
}

#[test]
fn iana_charset_names_take_precedence() {
    ring()
        .args(["-emit=false", "ISO-8859-1"])
        .write_stdin(b"\x80".to_vec())
        .assert()
        .success()
        .stdout("\u{80}");
    ring()
        .args(["-emit=false", "windows-1252"])
        .write_stdin(b"\x80".to_vec())
        .assert()
        .success()
        .stdout("€");
    ring()
        .args(["-encode", "US-ASCII"])
        .write_stdin("é")
        .assert()
        .code(1);
    ring()
        .args(["-encode", "-emit=false", "UTF-32LE"])
        .write_stdin("A\n")
        .assert()
        .success()
        .stdout(&b"A\0\0\0"[..]);
}

#[test]
fn missing_direction_prints_usage() {
    ring()
        .arg("codepoint")
        .write_stdin("x")
        .assert()
        .code(2)
        .stdout("")
        .stderr(predicate::str::contains("Usage:").and(predicate::str::contains("hex-extended*")));
}

#[test]
fn unknown_mode_prints_usage() {
    ring()
        .arg("no-such-mode")
        .write_stdin("x")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("unknown mode: no-such-mode"));
}

#[test]
fn mode_count_must_be_one() {
    ring().assert().code(2).stderr(predicate::str::contains("Usage:"));
    ring().args(["hex", "rot13"]).assert().code(2);
}

#[test]
fn bad_flag_is_a_usage_error() {
    ring().args(["-strip=maybe", "hex"]).assert().code(2);
}

#[test]
fn help_exits_zero() {
    ring()
        .arg("-help")
        .assert()
        .success()
        .stdout(predicate::str::contains("base32-crockford"));
}

#[test]
fn transform_failure_writes_nothing() {
    ring()
        .arg("hex")
        .write_stdin("zz")
        .assert()
        .code(1)
        .stdout("")
        .stderr(predicate::str::starts_with("Error:"));
}

#[cfg(unix)]
#[test]
fn encoder_ring_name_defaults_to_encode() {
    let dir = tempfile::tempdir().unwrap();
    let link = dir.path().join("encoder-ring");
    std::os::unix::fs::symlink(assert_cmd::cargo::cargo_bin("decoder-ring"), &link).unwrap();

    Command::new(&link).arg("hex").write_stdin("AB").assert().success().stdout("4142\n");
    Command::new(&link)
        .args(["-encode=false", "hex"])
        .write_stdin("4142")
        .assert()
        .success()
        .stdout("AB\n");
}
