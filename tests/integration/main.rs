//! Integration tests for powboot

mod launcher_tests {
    use assert_cmd::{cargo::cargo_bin_cmd, Command};
    use predicates::prelude::*;
    use std::fs;
    use std::path::Path;
    use tempfile::{tempdir, TempDir};

    fn powboot() -> Command {
        cargo_bin_cmd!("powboot")
    }

    /// Write a config file pointing the cache at `cache_dir` with an
    /// unreachable release endpoint, so nothing ever leaves the machine.
    fn write_config(dir: &Path, cache_dir: &Path) -> std::path::PathBuf {
        let config_path = dir.join("config.toml");
        fs::write(
            &config_path,
            format!(
                concat!(
                    "[cache]\n",
                    "dir = \"{}\"\n",
                    "\n",
                    "[release]\n",
                    "base_url = \"http://127.0.0.1:1/\"\n",
                    "fallback_url = \"http://127.0.0.1:1/pow.py\"\n",
                ),
                cache_dir.display()
            ),
        )
        .unwrap();
        config_path
    }

    #[cfg(unix)]
    fn install_fake_artifact(cache_dir: &Path, script: &str) {
        use std::os::unix::fs::PermissionsExt;

        fs::create_dir_all(cache_dir).unwrap();
        let path = cache_dir.join("kctf");
        fs::write(&path, script).unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
    }

    fn fixture() -> (TempDir, std::path::PathBuf, std::path::PathBuf) {
        let dir = tempdir().unwrap();
        let cache_dir = dir.path().join("cache");
        let config_path = write_config(dir.path(), &cache_dir);
        (dir, config_path, cache_dir)
    }

    #[cfg(unix)]
    #[test]
    fn cached_artifact_receives_forwarded_args() {
        let (_dir, config_path, cache_dir) = fixture();
        install_fake_artifact(&cache_dir, "#!/bin/sh\necho \"$@\"\n");

        powboot()
            .env("POWBOOT_CONFIG", &config_path)
            .args(["--flag", "value"])
            .assert()
            .success()
            .stdout(predicate::str::contains("--flag value"));
    }

    #[cfg(unix)]
    #[test]
    fn exit_code_is_the_artifacts() {
        let (_dir, config_path, cache_dir) = fixture();
        install_fake_artifact(&cache_dir, "#!/bin/sh\nexit 7\n");

        powboot()
            .env("POWBOOT_CONFIG", &config_path)
            .assert()
            .code(7);
    }

    #[cfg(unix)]
    #[test]
    fn cache_hit_never_touches_the_network() {
        // The configured endpoint is unreachable; success proves no fetch.
        let (_dir, config_path, cache_dir) = fixture();
        install_fake_artifact(&cache_dir, "#!/bin/sh\necho ok\n");

        powboot()
            .env("POWBOOT_CONFIG", &config_path)
            .arg("ask")
            .assert()
            .success()
            .stdout(predicate::str::contains("ok"));
    }

    #[test]
    fn empty_cache_with_unreachable_endpoint_fails_in_fetch() {
        let (_dir, config_path, _cache_dir) = fixture();

        powboot()
            .env("POWBOOT_CONFIG", &config_path)
            .arg("solve")
            .assert()
            .failure()
            .stderr(predicate::str::contains("fetch"));
    }

    #[test]
    fn invalid_config_fails_with_diagnostic() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("config.toml");
        fs::write(&config_path, "release = \"not a table\"").unwrap();

        powboot()
            .env("POWBOOT_CONFIG", &config_path)
            .assert()
            .failure()
            .stderr(predicate::str::contains("config"));
    }
}
