//! Platform detection for payload selection
//!
//! The launcher ships one payload tree per supported OS and architecture.
//! Each supported pair maps to exactly one tree and one entry-point name;
//! every other pair is rejected before any filesystem work starts.

use crate::error::{LauncherError, LauncherResult};
use std::fmt;
use std::path::{Path, PathBuf};

/// Operating system family
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Os {
    Windows,
    MacOs,
    Linux,
}

impl Os {
    /// Parse a `std::env::consts::OS` value
    pub fn from_consts(os: &str) -> Option<Self> {
        match os {
            "windows" => Some(Os::Windows),
            "macos" => Some(Os::MacOs),
            "linux" => Some(Os::Linux),
            _ => None,
        }
    }

    /// Name used in payload entries (Go's GOOS)
    pub fn payload_name(&self) -> &'static str {
        match self {
            Os::Windows => "windows",
            Os::MacOs => "darwin",
            Os::Linux => "linux",
        }
    }
}

/// CPU architecture
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Arch {
    X86_64,
    Aarch64,
}

impl Arch {
    /// Parse a `std::env::consts::ARCH` value
    pub fn from_consts(arch: &str) -> Option<Self> {
        match arch {
            "x86_64" => Some(Arch::X86_64),
            "aarch64" => Some(Arch::Aarch64),
            _ => None,
        }
    }

    /// Name used in payload entries (Go's GOARCH)
    pub fn payload_name(&self) -> &'static str {
        match self {
            Arch::X86_64 => "amd64",
            Arch::Aarch64 => "arm64",
        }
    }
}

/// Payload layout for one supported platform
struct PlatformEntry {
    os: Os,
    arch: Arch,
    payload: &'static str,
    entry_point: &'static str,
}

const PLATFORMS: &[PlatformEntry] = &[
    PlatformEntry {
        os: Os::Windows,
        arch: Arch::X86_64,
        payload: "go.windows-amd64",
        entry_point: "go.exe",
    },
    PlatformEntry {
        os: Os::MacOs,
        arch: Arch::X86_64,
        payload: "go.darwin-amd64",
        entry_point: "go",
    },
    PlatformEntry {
        os: Os::Linux,
        arch: Arch::X86_64,
        payload: "go.linux-amd64",
        entry_point: "go",
    },
    PlatformEntry {
        os: Os::Windows,
        arch: Arch::Aarch64,
        payload: "go.windows-arm64",
        entry_point: "go.exe",
    },
    PlatformEntry {
        os: Os::MacOs,
        arch: Arch::Aarch64,
        payload: "go.darwin-arm64",
        entry_point: "go",
    },
    PlatformEntry {
        os: Os::Linux,
        arch: Arch::Aarch64,
        payload: "go.linux-arm64",
        entry_point: "go",
    },
];

/// A supported OS and architecture pair
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Platform {
    os: Os,
    arch: Arch,
    payload: &'static str,
    entry_point: &'static str,
}

impl Platform {
    /// Detect the platform this binary is running on
    pub fn detect() -> LauncherResult<Self> {
        Self::from_consts(std::env::consts::OS, std::env::consts::ARCH)
    }

    /// Resolve a platform from `std::env::consts` style identifiers
    pub fn from_consts(os: &str, arch: &str) -> LauncherResult<Self> {
        match (Os::from_consts(os), Arch::from_consts(arch)) {
            (Some(os), Some(arch)) => Self::new(os, arch),
            _ => Err(LauncherError::unsupported(os, arch)),
        }
    }

    /// Look up the payload layout for a pair
    pub fn new(os: Os, arch: Arch) -> LauncherResult<Self> {
        PLATFORMS
            .iter()
            .find(|p| p.os == os && p.arch == arch)
            .map(|p| Self {
                os: p.os,
                arch: p.arch,
                payload: p.payload,
                entry_point: p.entry_point,
            })
            .ok_or_else(|| LauncherError::unsupported(os.payload_name(), arch.payload_name()))
    }

    pub fn os(&self) -> Os {
        self.os
    }

    /// Name of the platform-specific payload tree (e.g. `go.linux-amd64`)
    pub fn payload(&self) -> &'static str {
        self.payload
    }

    /// File name of the toolchain executable (`go` or `go.exe`)
    pub fn entry_point_name(&self) -> &'static str {
        self.entry_point
    }

    /// Path of the toolchain executable inside an installed cache directory
    pub fn entry_point(&self, cache_dir: &Path) -> PathBuf {
        cache_dir.join("bin").join(self.entry_point_name())
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.os.payload_name(), self.arch.payload_name())
    }
}
