//! Host system and distribution detection.

use crate::config::TargetPlatform;
use std::fmt;
use std::path::Path;

const OS_RELEASE: &str = "/etc/os-release";

/// Linux distribution family, by package manager.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DistroFamily {
    Deb,
    Rpm,
    Arch,
    Apk,
    Other,
}

impl DistroFamily {
    /// Detects the running distribution, `None` off Linux.
    pub fn detect() -> Option<Self> {
        if TargetPlatform::host() != TargetPlatform::Linux {
            return None;
        }
        match std::fs::read_to_string(OS_RELEASE) {
            Ok(content) => Some(Self::from_os_release(&content)),
            Err(_) => Some(Self::from_package_managers(|p| Path::new(p).exists())),
        }
    }

    /// Classifies by the `NAME=` line of an os-release file.
    pub fn from_os_release(content: &str) -> Self {
        let name = content
            .lines()
            .find_map(|l| l.strip_prefix("NAME="))
            .map(|v| v.trim().trim_matches('"').to_lowercase())
            .unwrap_or_default();

        let has = |needles: &[&str]| needles.iter().any(|n| name.contains(n));
        if has(&["ubuntu", "debian", "mint", "pop", "elementary"]) {
            DistroFamily::Deb
        } else if has(&["fedora", "rhel", "red hat", "centos", "rocky", "alma", "opensuse", "suse"]) {
            DistroFamily::Rpm
        } else if has(&["arch", "manjaro"]) {
            DistroFamily::Arch
        } else if has(&["alpine"]) {
            DistroFamily::Apk
        } else {
            DistroFamily::Other
        }
    }

    /// Classifies by which package manager binaries exist.
    pub fn from_package_managers(exists: impl Fn(&str) -> bool) -> Self {
        if exists("/usr/bin/apt") || exists("/usr/bin/dpkg") {
            DistroFamily::Deb
        } else if exists("/usr/bin/yum") || exists("/usr/bin/dnf") {
            DistroFamily::Rpm
        } else if exists("/usr/bin/pacman") {
            DistroFamily::Arch
        } else if exists("/sbin/apk") {
            DistroFamily::Apk
        } else {
            DistroFamily::Other
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            DistroFamily::Deb => "deb-based",
            DistroFamily::Rpm => "rpm-based",
            DistroFamily::Arch => "arch-based",
            DistroFamily::Apk => "apk-based",
            DistroFamily::Other => "other",
        }
    }
}

impl fmt::Display for DistroFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Basic facts about the host.
#[derive(Debug, Clone)]
pub struct SystemInfo {
    pub platform: TargetPlatform,
    pub arch: &'static str,
    pub distro: Option<DistroFamily>,
}

impl SystemInfo {
    pub fn detect() -> Self {
        Self {
            platform: TargetPlatform::host(),
            arch: std::env::consts::ARCH,
            distro: DistroFamily::detect(),
        }
    }

    /// e.g. `Linux (deb-based), x86_64`
    pub fn describe(&self) -> String {
        match self.distro {
            Some(distro) => format!("{} ({distro}), {}", self.platform, self.arch),
            None => format!("{}, {}", self.platform, self.arch),
        }
    }
}
