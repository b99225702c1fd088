//! Backend selection.

use std::fmt;

/// Pipeline that turns the Python entry file into an executable.
///
/// The two backends are mutually exclusive; the selected one decides which of
/// [`NativeSettings`](super::NativeSettings) or
/// [`BundlerSettings`](super::BundlerSettings) is consulted.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
pub enum Backend {
    /// Nuitka: ahead-of-time compilation to C and a native binary.
    #[default]
    Nuitka,
    /// PyInstaller: freezes the interpreter and bytecode into a bundle.
    PyInstaller,
}

impl Backend {
    /// Executable name, also the first token of the compiled argument list.
    pub fn command(self) -> &'static str {
        match self {
            Backend::Nuitka => "nuitka",
            Backend::PyInstaller => "pyinstaller",
        }
    }

    /// Display name used in generated scripts and console output.
    pub fn display_name(self) -> &'static str {
        match self {
            Backend::Nuitka => "Nuitka",
            Backend::PyInstaller => "PyInstaller",
        }
    }

    /// Python module to import when checking the backend is installed.
    pub fn module_name(self) -> &'static str {
        match self {
            Backend::Nuitka => "nuitka",
            Backend::PyInstaller => "PyInstaller",
        }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.command())
    }
}

/// C compiler Nuitka should drive.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
pub enum CompilerToolchain {
    /// MinGW-w64 GCC (Windows only)
    MinGw64,
    /// Microsoft Visual C++ (Windows only)
    Msvc,
    /// Clang, available on every platform
    #[default]
    Clang,
}

impl CompilerToolchain {
    pub const ALL: [CompilerToolchain; 3] = [
        CompilerToolchain::MinGw64,
        CompilerToolchain::Msvc,
        CompilerToolchain::Clang,
    ];

    /// Only clang is usable outside Windows.
    pub fn is_cross_platform(self) -> bool {
        matches!(self, CompilerToolchain::Clang)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            CompilerToolchain::MinGw64 => "mingw64",
            CompilerToolchain::Msvc => "msvc",
            CompilerToolchain::Clang => "clang",
        }
    }

    pub fn describe(self) -> &'static str {
        match self {
            CompilerToolchain::MinGw64 => "MinGW64 (Windows)",
            CompilerToolchain::Msvc => "MSVC (Windows)",
            CompilerToolchain::Clang => "Clang (Linux, Windows, macOS)",
        }
    }
}

impl fmt::Display for CompilerToolchain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
