//! Installation hints for missing tools.

use super::system::DistroFamily;
use crate::config::TargetPlatform;

/// How to install `tool` on the given platform.
pub fn install_hint(tool: &str, platform: TargetPlatform, distro: Option<DistroFamily>) -> String {
    let how = match tool {
        "nuitka" => "pip install nuitka".to_string(),
        "pyinstaller" => "pip install pyinstaller".to_string(),
        "nfpm" => "go install github.com/goreleaser/nfpm/v2/cmd/nfpm@latest \
                   (or see https://nfpm.goreleaser.com/install/)"
            .to_string(),
        "fpm" => match platform {
            TargetPlatform::Linux => match distro {
                Some(DistroFamily::Rpm) => {
                    "sudo dnf install ruby ruby-devel rpm-build && sudo gem install --no-document fpm"
                }
                _ => "sudo apt install ruby-dev build-essential && sudo gem install --no-document fpm",
            }
            .to_string(),
            TargetPlatform::MacOs => "brew install fpm".to_string(),
            TargetPlatform::Windows => "run fpm under WSL or Docker".to_string(),
        },
        "clang" | "gcc" => match platform {
            TargetPlatform::Linux => format!("{} {tool}", package_install(distro)),
            TargetPlatform::MacOs => format!("xcode-select --install or brew install {tool}"),
            TargetPlatform::Windows => "install Visual Studio Build Tools or MinGW-w64".to_string(),
        },
        "dpkg-deb" => match distro {
            Some(DistroFamily::Deb) => "sudo apt install dpkg-dev".to_string(),
            Some(DistroFamily::Rpm) => "sudo dnf install dpkg-dev".to_string(),
            Some(DistroFamily::Arch) => "sudo pacman -S dpkg".to_string(),
            _ => "install dpkg-dev with your package manager".to_string(),
        },
        "rpmbuild" => match distro {
            Some(DistroFamily::Deb) => "sudo apt install rpm".to_string(),
            Some(DistroFamily::Rpm) => "sudo dnf install rpm-build".to_string(),
            Some(DistroFamily::Arch) => "sudo pacman -S rpm-tools".to_string(),
            _ => "install rpm-build with your package manager".to_string(),
        },
        _ => "see the tool's documentation".to_string(),
    };
    format!("install {tool}: {how}")
}

fn package_install(distro: Option<DistroFamily>) -> &'static str {
    match distro {
        Some(DistroFamily::Rpm) => "sudo dnf install",
        Some(DistroFamily::Arch) => "sudo pacman -S",
        Some(DistroFamily::Apk) => "sudo apk add",
        _ => "sudo apt install",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hints_follow_distro() {
        assert_eq!(
            install_hint("rpmbuild", TargetPlatform::Linux, Some(DistroFamily::Deb)),
            "install rpmbuild: sudo apt install rpm"
        );
        assert_eq!(
            install_hint("clang", TargetPlatform::Linux, Some(DistroFamily::Arch)),
            "install clang: sudo pacman -S clang"
        );
        assert!(install_hint("fpm", TargetPlatform::MacOs, None).contains("brew"));
        assert!(install_hint("unknown", TargetPlatform::Linux, None).contains("documentation"));
    }
}
