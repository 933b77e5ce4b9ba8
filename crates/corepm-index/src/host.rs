//! Host platform detection and flavour compatibility.
//!
//! Tool flavours are published per host triple (`x86_64-linux-gnu`,
//! `i686-mingw32`, `x86_64-apple-darwin`, ...). A flavour is usable on the
//! running machine when its triple matches the pattern for the current
//! OS/architecture pair.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

static ARM_LINUX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"arm.*-linux-gnueabihf").expect("valid regex"));
static ARM64_LINUX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(aarch64|arm64)-linux-gnu").expect("valid regex"));
static AMD64_LINUX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"x86_64-.*linux-gnu").expect("valid regex"));
static I386_LINUX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"i[3456]86-.*linux-gnu").expect("valid regex"));
static WINDOWS_32: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"i[3456]86-.*(mingw32|cygwin)").expect("valid regex"));
static WINDOWS_64: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(i[3456]86|x86_64)-.*(mingw32|cygwin)").expect("valid regex"));
static MAC_32: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"i[3456]86-apple-darwin.*").expect("valid regex"));
static MAC_64: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(i[3456]86|x86_64)-apple-darwin.*").expect("valid regex"));
static MAC_ARM64: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(arm64|aarch64)-apple-darwin.*").expect("valid regex"));
static ARM_BSD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"arm.*-freebsd[0-9]*").expect("valid regex"));
static X86_BSD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(i[3456]86|amd64|x86_64)-freebsd[0-9]*").expect("valid regex"));

/// The machine a tool flavour has to run on.
///
/// `os` and `arch` use the spelling of `std::env::consts`
/// (`linux`/`macos`/`windows`/`freebsd`, `x86_64`/`x86`/`aarch64`/`arm`).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct HostPlatform {
    /// Operating system.
    pub os: String,
    /// CPU architecture.
    pub arch: String,
}

impl HostPlatform {
    /// Create a host description.
    pub fn new(os: impl Into<String>, arch: impl Into<String>) -> Self {
        HostPlatform {
            os: os.into(),
            arch: arch.into(),
        }
    }

    /// The machine this binary is running on.
    pub fn current() -> Self {
        HostPlatform::new(std::env::consts::OS, std::env::consts::ARCH)
    }

    /// Whether a flavour published for `host_triple` runs on this machine.
    ///
    /// The special triple `all` matches every host. Emulated fallbacks are
    /// accepted: 64-bit Windows and macOS run 32-bit builds, and Apple
    /// silicon runs x86_64 builds.
    pub fn is_compatible(&self, host_triple: &str) -> bool {
        if host_triple == "all" {
            return true;
        }
        match (self.os.as_str(), self.arch.as_str()) {
            ("linux", "arm") => ARM_LINUX.is_match(host_triple),
            ("linux", "aarch64") => ARM64_LINUX.is_match(host_triple),
            ("linux", "x86_64") => AMD64_LINUX.is_match(host_triple),
            ("linux", "x86") => I386_LINUX.is_match(host_triple),
            ("windows", "x86") => WINDOWS_32.is_match(host_triple),
            ("windows", "x86_64") => WINDOWS_64.is_match(host_triple),
            ("macos", "x86") => MAC_32.is_match(host_triple),
            ("macos", "x86_64") => MAC_64.is_match(host_triple),
            ("macos", "aarch64") => {
                MAC_ARM64.is_match(host_triple) || MAC_64.is_match(host_triple)
            }
            ("freebsd", "arm") => ARM_BSD.is_match(host_triple),
            ("freebsd", "x86") | ("freebsd", "x86_64") => X86_BSD.is_match(host_triple),
            _ => false,
        }
    }
}

impl fmt::Display for HostPlatform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.os, self.arch)
    }
}
