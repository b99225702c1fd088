use super::{entry_arg, path_arg};
use crate::config::{Configuration, UpxDir};
use crate::error::Result;
use crate::script::VERSION_FILE_NAME;

/// Arguments for the PyInstaller backend.
///
/// Exactly one of `--onefile`/`--onedir` and exactly one of
/// `--windowed`/`--console` is always present.
pub fn bundler_args(config: &Configuration) -> Result<Vec<String>> {
    let entry = entry_arg(config)?;
    let bundler = config.bundler();

    let mut args = vec![config.backend().command().to_string()];

    let layout = if bundler.onefile { "--onefile" } else { "--onedir" };
    let console = if config.show_console() { "--console" } else { "--windowed" };
    args.push(layout.into());
    args.push(console.into());

    if !config.output_dir().is_empty() {
        args.push(format!("--distpath={}", config.output_dir()));
        args.push(format!("--workpath={}", config.work_dir()));
    }

    if !config.app_name().is_empty() {
        args.push(format!("--name={}", config.app_name()));
    }

    if let Some(icon) = config.icon_file() {
        args.push(format!("--icon={}", path_arg(icon)));
    }

    if config.platform().supports_resource_metadata() {
        args.push(format!("--version-file={VERSION_FILE_NAME}"));
    }

    args.extend(
        bundler
            .hidden_imports
            .iter()
            .map(|module| format!("--hidden-import={module}")),
    );
    args.extend(
        bundler
            .collect_all
            .iter()
            .map(|package| format!("--collect-all={package}")),
    );
    args.extend(
        bundler
            .add_data
            .iter()
            .map(|mapping| format!("--add-data={mapping}")),
    );
    args.extend(
        config
            .exclude_packages()
            .iter()
            .map(|module| format!("--exclude-module={module}")),
    );

    match &bundler.upx {
        Some(UpxDir::Auto) => args.push("--upx-dir=".into()),
        Some(UpxDir::Path(dir)) => args.push(format!("--upx-dir={}", path_arg(dir))),
        None => {}
    }

    if bundler.debug {
        args.push("--log-level=DEBUG".into());
    }
    if bundler.clean {
        args.push("--clean".into());
    }
    if config.quiet() {
        args.push("--log-level=WARN".into());
    }

    args.push(entry);
    Ok(args)
}
