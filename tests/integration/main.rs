//! Integration tests for the go launcher
//!
//! The fake toolchain is a shell script, so these only run on unix.

#![cfg(unix)]

mod launcher_tests {
    use assert_cmd::{cargo::cargo_bin_cmd, Command};
    use go_ape::cache::{user_cache_dir, MANIFEST_FILE};
    use go_ape::config::Toolchain;
    use go_ape::payload::{COMMON_PAYLOAD, PAYLOAD_ENTRIES};
    use go_ape::platform::Platform;
    use predicates::prelude::*;
    use serial_test::serial;
    use std::ffi::OsString;
    use std::fs;
    use std::io::Write;
    use std::os::unix::fs::PermissionsExt;
    use std::path::{Path, PathBuf};
    use tempfile::TempDir;

    /// Prints its arguments one per line and exits with `$FAKE_GO_EXIT`.
    const FAKE_GO: &str = "#!/bin/sh\nprintf '%s\\n' \"$@\"\nexit ${FAKE_GO_EXIT:-0}\n";

    struct Sandbox {
        root: TempDir,
    }

    impl Sandbox {
        fn new() -> Self {
            Self {
                root: TempDir::new().unwrap(),
            }
        }

        fn home(&self) -> PathBuf {
            self.root.path().join("home")
        }

        fn xdg(&self) -> PathBuf {
            self.root.path().join("xdg")
        }

        fn payload_dir(&self) -> PathBuf {
            self.root.path().join("payload")
        }

        /// Unpacked payload with the shared tree and the current platform's tree
        fn write_payload(&self, with_platform: bool) -> PathBuf {
            let payload = self.payload_dir();
            write_file(&payload.join("go.common/VERSION"), "go-test", 0o644);
            if with_platform {
                let tree = Platform::detect().unwrap().payload();
                write_file(&payload.join(tree).join("bin/go"), FAKE_GO, 0o755);
            }
            payload
        }

        fn cache_dir(&self) -> PathBuf {
            let platform = Platform::detect().unwrap();
            let toolchain = Toolchain::default();
            let home = self.home();
            let xdg = self.xdg();
            user_cache_dir(
                platform.os(),
                &toolchain.name,
                &toolchain.author,
                &toolchain.version,
                |name| match name {
                    "HOME" => Some(OsString::from(&home)),
                    "XDG_CACHE_HOME" => Some(OsString::from(&xdg)),
                    _ => None,
                },
            )
            .unwrap()
        }

        fn env(&self, mut cmd: Command, payload: &Path) -> Command {
            cmd.env("HOME", self.home())
                .env("XDG_CACHE_HOME", self.xdg())
                .env("GO_APE_PAYLOAD", payload)
                .env_remove("GO_APE_LOG")
                .env_remove("FAKE_GO_EXIT");
            cmd
        }

        fn go(&self, payload: &Path) -> Command {
            self.env(cargo_bin_cmd!("go"), payload)
        }
    }

    fn write_file(path: &Path, content: &str, mode: u32) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
        fs::set_permissions(path, fs::Permissions::from_mode(mode)).unwrap();
    }

    /// Zip with the shared tree and every platform tree; only
    /// `platform_tree` gets a runnable `bin/go`.
    fn payload_zip(platform_tree: &str) -> Vec<u8> {
        let mut writer = zip::ZipWriter::new(std::io::Cursor::new(Vec::new()));
        let file = zip::write::SimpleFileOptions::default()
            .compression_method(zip::CompressionMethod::Deflated)
            .unix_permissions(0o644);
        let exe = file.unix_permissions(0o755);

        writer.start_file("go.common/VERSION", file).unwrap();
        writer.write_all(b"go-test").unwrap();
        for tree in PAYLOAD_ENTRIES.iter().filter(|e| **e != COMMON_PAYLOAD) {
            writer.start_file(format!("{tree}/bin/go"), exe).unwrap();
            if *tree == platform_tree {
                writer.write_all(FAKE_GO.as_bytes()).unwrap();
            } else {
                writer.write_all(b"#!/bin/sh\nexit 99\n").unwrap();
            }
        }
        writer.finish().unwrap().into_inner()
    }

    #[test]
    #[serial]
    fn first_run_installs_and_forwards_arguments() {
        let sandbox = Sandbox::new();
        let payload = sandbox.write_payload(true);

        sandbox
            .go(&payload)
            .args(["build", "-o", "out dir", "./..."])
            .assert()
            .success()
            .stdout("build\n-o\nout dir\n./...\n");

        let cache_dir = sandbox.cache_dir();
        assert!(cache_dir.join("VERSION").is_file());
        assert!(cache_dir.join("bin/go").is_file());
        assert!(cache_dir.join(MANIFEST_FILE).is_file());
    }

    #[test]
    #[serial]
    fn exit_code_comes_from_toolchain() {
        let sandbox = Sandbox::new();
        let payload = sandbox.write_payload(true);

        sandbox
            .go(&payload)
            .env("FAKE_GO_EXIT", "7")
            .arg("vet")
            .assert()
            .code(7)
            .stdout("vet\n");

        sandbox
            .go(&payload)
            .env("FAKE_GO_EXIT", "0")
            .assert()
            .code(0);
    }

    #[test]
    #[serial]
    fn cached_toolchain_is_reused_without_payload() {
        let sandbox = Sandbox::new();
        let payload = sandbox.write_payload(true);
        sandbox.go(&payload).arg("env").assert().success();

        fs::remove_dir_all(&payload).unwrap();

        sandbox
            .go(&payload)
            .arg("version")
            .assert()
            .success()
            .stdout("version\n");
    }

    #[test]
    #[serial]
    fn failed_install_leaves_no_cache_directory() {
        let sandbox = Sandbox::new();
        let payload = sandbox.write_payload(false);

        sandbox
            .go(&payload)
            .arg("version")
            .assert()
            .code(125)
            .stderr(predicate::str::contains("Failed to install toolchain"));

        assert!(!sandbox.cache_dir().exists());
    }

    #[test]
    #[serial]
    fn missing_entry_point_in_cache_reports_not_found() {
        let sandbox = Sandbox::new();
        let payload = sandbox.write_payload(true);
        fs::create_dir_all(sandbox.cache_dir()).unwrap();

        sandbox
            .go(&payload)
            .assert()
            .code(127)
            .stderr(predicate::str::contains("Failed to launch"));
    }

    #[cfg(target_os = "linux")]
    #[test]
    #[serial]
    fn xdg_cache_home_without_home() {
        let sandbox = Sandbox::new();
        let payload = sandbox.write_payload(true);
        let version = Toolchain::default().version;

        let mut cmd = sandbox.go(&payload);
        cmd.env_remove("HOME").assert().success();

        assert!(sandbox.xdg().join("go").join(version).join("bin/go").is_file());
    }

    #[cfg(target_os = "linux")]
    #[test]
    #[serial]
    fn missing_home_is_reported() {
        let sandbox = Sandbox::new();
        let payload = sandbox.write_payload(true);

        let mut cmd = sandbox.go(&payload);
        cmd.env_remove("HOME")
            .env_remove("XDG_CACHE_HOME")
            .assert()
            .code(125)
            .stderr(predicate::str::contains("HOME not set"));

        let mut entries: Vec<_> = fs::read_dir(sandbox.root.path())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        entries.sort();
        assert_eq!(entries, ["payload"]);
        assert!(!sandbox.home().exists());
        assert!(!sandbox.xdg().exists());
    }

    #[test]
    #[serial]
    fn zip_payload_is_installed() {
        let sandbox = Sandbox::new();
        let zip_path = sandbox.root.path().join("payload.zip");
        fs::write(&zip_path, payload_zip(Platform::detect().unwrap().payload())).unwrap();

        sandbox
            .go(&zip_path)
            .arg("test")
            .assert()
            .success()
            .stdout("test\n");

        let mode = fs::metadata(sandbox.cache_dir().join("bin/go"))
            .unwrap()
            .permissions()
            .mode();
        assert_eq!(mode & 0o111, 0o111);
    }

    #[test]
    #[serial]
    fn payload_appended_to_executable_is_used() {
        let sandbox = Sandbox::new();
        let zip_path = sandbox.root.path().join("payload.zip");
        let launcher = sandbox.root.path().join("go-selfcontained");
        fs::write(&zip_path, payload_zip(Platform::detect().unwrap().payload())).unwrap();

        cargo_bin_cmd!("go-ape-pack")
            .arg(env!("CARGO_BIN_EXE_go"))
            .arg(&zip_path)
            .arg("--output")
            .arg(&launcher)
            .assert()
            .success()
            .stderr(predicate::str::contains("Wrote"));
        fs::remove_file(&zip_path).unwrap();

        let mut cmd = Command::new(&launcher);
        cmd.env("HOME", sandbox.home())
            .env("XDG_CACHE_HOME", sandbox.xdg())
            .env_remove("GO_APE_PAYLOAD")
            .arg("mod")
            .arg("tidy")
            .assert()
            .success()
            .stdout("mod\ntidy\n");

        assert!(sandbox.cache_dir().join("VERSION").is_file());
    }

    #[test]
    #[serial]
    fn bare_launcher_reports_missing_payload() {
        let sandbox = Sandbox::new();
        let launcher = sandbox.root.path().join("go-bare");
        write_file_bytes(&launcher, &fs::read(env!("CARGO_BIN_EXE_go")).unwrap());

        let mut cmd = Command::new(&launcher);
        cmd.env("HOME", sandbox.home())
            .env("XDG_CACHE_HOME", sandbox.xdg())
            .env_remove("GO_APE_PAYLOAD")
            .assert()
            .code(125)
            .stderr(predicate::str::contains("no payload is appended"));

        assert!(!sandbox.cache_dir().exists());
    }

    #[test]
    #[serial]
    fn pack_rejects_incomplete_payload() {
        let sandbox = Sandbox::new();
        let zip_path = sandbox.root.path().join("payload.zip");
        let output = sandbox.root.path().join("go-ape");
        let mut writer = zip::ZipWriter::new(std::io::Cursor::new(Vec::new()));
        writer
            .start_file("go.common/VERSION", zip::write::SimpleFileOptions::default())
            .unwrap();
        writer.write_all(b"go-test").unwrap();
        fs::write(&zip_path, writer.finish().unwrap().into_inner()).unwrap();

        cargo_bin_cmd!("go-ape-pack")
            .arg(env!("CARGO_BIN_EXE_go"))
            .arg(&zip_path)
            .arg("-o")
            .arg(&output)
            .assert()
            .code(1)
            .stderr(predicate::str::contains("missing go.windows-amd64"));

        assert!(!output.exists());
    }

    fn write_file_bytes(path: &Path, bytes: &[u8]) {
        let mut file = fs::File::create(path).unwrap();
        file.write_all(bytes).unwrap();
        file.sync_all().unwrap();
        drop(file);
        fs::set_permissions(path, fs::Permissions::from_mode(0o755)).unwrap();
    }
}
