//! Nuitka-specific settings.

use super::CompilerToolchain;

/// Job count used when the user accepts the default.
pub const DEFAULT_JOBS: u32 = 4;

/// Options consulted only when the backend is [`Backend::Nuitka`](super::Backend::Nuitka).
#[derive(Clone, Debug)]
pub struct NativeSettings {
    /// C compiler selection. Platform-conditional when compiled to flags.
    pub toolchain: CompilerToolchain,

    /// Bundle every runtime dependency so no Python install is needed.
    ///
    /// Default: true
    pub standalone: bool,

    /// Produce a single executable. Ignored unless `standalone` is set.
    ///
    /// Default: false
    pub onefile: bool,

    /// Parallel C compilation jobs. Always positive.
    pub jobs: u32,

    /// Show Nuitka's progress bar (only when not quiet).
    pub show_progressbar: bool,

    /// Remove the intermediate build directory afterwards.
    pub remove_output: bool,

    /// Enabled plugins, in selection order.
    pub plugins: Vec<String>,
}

impl Default for NativeSettings {
    fn default() -> Self {
        Self {
            toolchain: CompilerToolchain::default(),
            standalone: true,
            onefile: false,
            jobs: DEFAULT_JOBS,
            show_progressbar: true,
            remove_output: false,
            plugins: Vec::new(),
        }
    }
}

impl NativeSettings {
    /// Whether onefile mode actually applies.
    pub fn effective_onefile(&self) -> bool {
        self.standalone && self.onefile
    }
}
