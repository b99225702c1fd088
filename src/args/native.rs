use super::{entry_arg, path_arg};
use crate::config::{CompilerToolchain, Configuration, TargetPlatform};
use crate::error::Result;

/// Arguments for the Nuitka backend.
///
/// Order: mode flags, unattended download flag, cleanup, toolchain, progress
/// output, console, Windows resource metadata, output location, jobs, icons,
/// plugins, import exclusions, then the entry file.
pub fn native_args(config: &Configuration) -> Result<Vec<String>> {
    let entry = entry_arg(config)?;
    let native = config.native();
    let platform = config.platform();

    let mut args = vec![config.backend().command().to_string()];

    if native.standalone {
        args.push("--standalone".into());
    }
    if native.effective_onefile() {
        args.push("--onefile".into());
    }
    args.push("--assume-yes-for-downloads".into());
    if native.remove_output {
        args.push("--remove-output".into());
    }

    if let Some(flag) = toolchain_flag(native.toolchain, platform) {
        args.push(flag.into());
    }

    if config.quiet() {
        args.push("--quiet".into());
    } else {
        args.push(if native.show_progressbar {
            "--show-progress".into()
        } else {
            "--no-progressbar".into()
        });
        args.push("--show-memory".into());
    }

    if !config.show_console() {
        args.push("--windows-disable-console".into());
    }

    if platform.supports_resource_metadata() {
        if !config.company_name().is_empty() {
            args.push(format!("--windows-company-name={}", config.company_name()));
        }
        if !config.version().is_empty() {
            args.push(format!("--windows-file-version={}", config.version()));
        }
        if config.uac_admin() {
            args.push("--windows-uac-admin".into());
        }
    }

    if !config.output_dir().is_empty() {
        args.push(format!("--output-dir={}", config.output_dir()));
    }
    if !config.app_name().is_empty() {
        args.push(format!("--output-filename={}", config.app_name()));
    }

    args.push(format!("--jobs={}", native.jobs));

    if let Some(icon) = config.icon_file() {
        let icon = path_arg(icon);
        args.push(format!("--windows-icon-from-ico={icon}"));
        args.push(format!("--linux-icon={icon}"));
    }

    args.extend(
        native
            .plugins
            .iter()
            .map(|plugin| format!("--enable-plugin={plugin}")),
    );
    args.extend(
        config
            .exclude_packages()
            .iter()
            .map(|package| format!("--nofollow-import-to={package}")),
    );

    args.push(entry);
    Ok(args)
}

/// Only clang has a flag outside Windows; the other toolchains are no-ops there.
fn toolchain_flag(toolchain: CompilerToolchain, platform: TargetPlatform) -> Option<&'static str> {
    match (platform, toolchain) {
        (TargetPlatform::Windows, CompilerToolchain::MinGw64) => Some("--mingw64"),
        (TargetPlatform::Windows, CompilerToolchain::Msvc) => Some("--msvc=latest"),
        (_, CompilerToolchain::Clang) => Some("--clang"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ConfigurationBuilder, NativeSettings};

    fn builder(platform: TargetPlatform) -> ConfigurationBuilder {
        ConfigurationBuilder::new()
            .project_dir("/p")
            .entry_file("/p/main.py")
            .platform(platform)
    }

    #[test]
    fn onefile_needs_standalone() {
        let config = builder(TargetPlatform::Linux)
            .native(NativeSettings {
                standalone: false,
                onefile: true,
                ..Default::default()
            })
            .build();
        let args = native_args(&config).unwrap();
        assert!(!args.iter().any(|a| a == "--onefile"));
        assert!(!args.iter().any(|a| a == "--standalone"));
    }

    #[test]
    fn windows_toolchains_map_to_distinct_flags() {
        let flags: Vec<_> = CompilerToolchain::ALL
            .iter()
            .map(|&t| toolchain_flag(t, TargetPlatform::Windows))
            .collect();
        assert_eq!(
            flags,
            vec![Some("--mingw64"), Some("--msvc=latest"), Some("--clang")]
        );
    }

    #[test]
    fn non_windows_only_clang_emits_flag() {
        for platform in [TargetPlatform::Linux, TargetPlatform::MacOs] {
            assert_eq!(toolchain_flag(CompilerToolchain::MinGw64, platform), None);
            assert_eq!(toolchain_flag(CompilerToolchain::Msvc, platform), None);
            assert_eq!(
                toolchain_flag(CompilerToolchain::Clang, platform),
                Some("--clang")
            );
        }
    }

    #[test]
    fn verbose_run_shows_progress_and_memory() {
        let config = builder(TargetPlatform::Linux)
            .native(NativeSettings {
                show_progressbar: false,
                ..Default::default()
            })
            .build();
        let args = native_args(&config).unwrap();
        let pos = |flag: &str| args.iter().position(|a| a == flag);
        assert!(pos("--quiet").is_none());
        assert!(pos("--no-progressbar").unwrap() < pos("--show-memory").unwrap());
        assert!(pos("--windows-disable-console").is_some());
    }

    #[test]
    fn windows_metadata_and_icons_in_order() {
        let config = builder(TargetPlatform::Windows)
            .company_name("ACME")
            .version("2.1.0")
            .uac_admin(true)
            .show_console(true)
            .app_name("tool")
            .icon_file(Some("res/app.ico"))
            .native(NativeSettings {
                toolchain: CompilerToolchain::Msvc,
                remove_output: true,
                plugins: vec!["pyqt5".into(), "numpy".into()],
                ..Default::default()
            })
            .exclude_packages(vec!["pytest".into()])
            .build();

        let args = native_args(&config).unwrap();
        assert_eq!(
            args,
            vec![
                "nuitka",
                "--standalone",
                "--assume-yes-for-downloads",
                "--remove-output",
                "--msvc=latest",
                "--show-progress",
                "--show-memory",
                "--windows-company-name=ACME",
                "--windows-file-version=2.1.0",
                "--windows-uac-admin",
                "--output-dir=build",
                "--output-filename=tool",
                "--jobs=4",
                "--windows-icon-from-ico=res/app.ico",
                "--linux-icon=res/app.ico",
                "--enable-plugin=pyqt5",
                "--enable-plugin=numpy",
                "--nofollow-import-to=pytest",
                "main.py",
            ]
        );
    }

    #[test]
    fn resource_metadata_skipped_off_windows() {
        let config = builder(TargetPlatform::Linux)
            .company_name("ACME")
            .version("2.1.0")
            .build();
        let args = native_args(&config).unwrap();
        assert!(!args.iter().any(|a| a.starts_with("--windows-company-name")));
        assert!(!args.iter().any(|a| a.starts_with("--windows-file-version")));
    }
}
