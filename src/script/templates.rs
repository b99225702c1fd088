//! Handlebars templates for the sections of a generated script.
//!
//! Placeholders always receive pre-encoded Python literals (see
//! [`super::literal`]) and are rendered with escaping disabled.

pub(super) const HEADER: &str = r##"#!/usr/bin/env python3
# -*- coding: utf-8 -*-
"""{{description}}

Standalone: needs only the Python standard library and the tools it checks for.
"""

import os
import shutil
import subprocess
import sys
from datetime import datetime
from pathlib import Path

GENERATOR = {{generator}}
GENERATED_AT = {{generated_at}}
ENTRY_NAME = {{entry_name}}"##;

pub(super) const LOGGING: &str = r##"COLORS = {
    "INFO": "\033[94m",
    "SUCCESS": "\033[92m",
    "WARNING": "\033[93m",
    "ERROR": "\033[91m",
}
RESET = "\033[0m"


def log(level, message):
    color = COLORS.get(level, "") if sys.stdout.isatty() else ""
    reset = RESET if color else ""
    timestamp = datetime.now().strftime("%H:%M:%S")
    print(f"{timestamp} | {color}{level:<7}{reset} | {message}", flush=True)


def log_info(message):
    log("INFO", message)


def log_success(message):
    log("SUCCESS", message)


def log_warning(message):
    log("WARNING", message)


def log_error(message):
    log("ERROR", message)"##;

pub(super) const TOOL_PROBE: &str = r##"PROBE_TIMEOUT = {{probe_timeout}}


def check_tool(name, version_arg="--version", path=None):
    """True when `name <version_arg>` exits successfully within PROBE_TIMEOUT seconds."""
    program = path or shutil.which(name)
    if not program:
        return False
    try:
        result = subprocess.run(
            [program, version_arg],
            stdout=subprocess.DEVNULL,
            stderr=subprocess.DEVNULL,
            timeout=PROBE_TIMEOUT,
        )
    except (OSError, subprocess.SubprocessError):
        return False
    return result.returncode == 0


def check_module(module):
    try:
        __import__(module)
    except ImportError:
        return False
    return True"##;

pub(super) const DISCOVERY: &str = r##"SEARCH_DIRS = {{search_dirs}}
EXCLUDED_EXTENSIONS = {{excluded_extensions}}
SUPPORT_ARCHIVE = {{support_archive}}


def is_executable_candidate(path):
    if not path.is_file():
        return False
    if path.name.startswith("_") or path.name == SUPPORT_ARCHIVE:
        return False
    suffix = path.suffix.lower().lstrip(".")
    if suffix in EXCLUDED_EXTENSIONS:
        return False
    return suffix == "" or os.access(path, os.X_OK)


def find_executable(dirs=SEARCH_DIRS):
    """First plausible executable in dirs; direct children before one level down."""
    for directory in dirs:
        base = Path(directory)
        if not base.is_dir():
            continue
        children = sorted(base.iterdir())
        for path in children:
            if is_executable_candidate(path):
                return path
        for sub in children:
            if not sub.is_dir():
                continue
            for path in sorted(sub.iterdir()):
                if is_executable_candidate(path):
                    return path
    return None"##;

pub(super) const ENVIRONMENT: &str = r##"PYTHON_MANAGERS = {{python_managers}}


def check_environment():
    log_info("Checking environment")
    version = sys.version_info
    current = f"{version.major}.{version.minor}.{version.micro}"
    if version >= ({{min_python_major}}, {{min_python_minor}}):
        log_success(f"Python {current}")
    else:
        log_warning(f"Python {current} is older than {{min_python_major}}.{{min_python_minor}}")
    managers = [name for name in PYTHON_MANAGERS if shutil.which(name)]
    if managers:
        log_success("Package managers: " + ", ".join(managers))
    elif shutil.which("pip3") or shutil.which("pip"):
        log_success("Package manager: pip")
    else:
        log_warning("No Python package manager found")
    return True"##;

pub(super) const NATIVE_CHECK: &str = r##"def check_backend():
    if check_module("nuitka") or check_tool("nuitka"):
        log_success("Nuitka is installed")
        return True
    log_error("Nuitka is not installed")
    log_info("Install it with: pip install nuitka")
    return False"##;

pub(super) const BUNDLER_CHECK: &str = r##"def check_backend():
    if check_module("PyInstaller") or check_tool("pyinstaller"):
        log_success("PyInstaller is installed")
        return True
    log_error("PyInstaller is not installed")
    log_info("Install it with: pip install pyinstaller")
    return False"##;

pub(super) const DEPENDENCY_CHECK: &str = r##"REQUIRED_TOOLS = {{required_tools}}


def check_build_dependencies():
    """Warn about missing helper tools. Never fails: they are only needed later."""
    for tool in REQUIRED_TOOLS.get("system_tools", []):
        if check_tool(tool):
            log_success(f"{tool} is available")
        else:
            log_warning(f"{tool} not found; the compiler toolchain may be unavailable")
{{#if packaging}}
    if locate_packaging_tool() is None:
        log_warning(f"{PACKAGE_TOOL} not found; Linux packages cannot be built")
        log_info(PACKAGE_TOOL_HINT)
    else:
        log_success(f"{PACKAGE_TOOL} is available")
    for tool in REQUIRED_TOOLS.get("package_formats", []):
        if check_tool(tool):
            log_success(f"{tool} is available")
        else:
            log_warning(f"{tool} not found; building that package format may fail")
{{/if}}
    return True"##;

pub(super) const COPY_HELPER: &str = r##"OUTPUT_DIR = {{output_dir}}
COPY_DIRS = {{copy_dirs}}


def copy_additional_files():
    if not COPY_DIRS:
        return
    output = Path(OUTPUT_DIR)
    if not output.is_dir():
        log_warning(f"Output directory {output} does not exist, nothing copied")
        return
    for name in COPY_DIRS:
        source = Path(name)
        if not source.is_dir():
            log_warning(f"Directory {source} not found, skipped")
            continue
        target = output / name
        try:
            if target.exists():
                shutil.rmtree(target)
            shutil.copytree(source, target)
            log_success(f"Copied {source} to {target}")
        except OSError as exc:
            log_error(f"Copying {source} failed: {exc}")"##;

pub(super) const EXIT_STATUS: &str = r##"def exit_code_of(status):
    """Exit code from an os.system() status."""
    if os.name == "nt":
        return status
    if hasattr(os, "waitstatus_to_exitcode"):
        code = os.waitstatus_to_exitcode(status)
    else:
        code = status >> 8 if status & 0xFF == 0 else -(status & 0x7F)
    return 128 - code if code < 0 else code"##;

pub(super) const NATIVE_CLEANUP: &str = r##"def cleanup():
    pass"##;

pub(super) const BUNDLER_CLEANUP: &str = r##"WORK_DIR = {{work_dir}}
SPEC_FILE = {{spec_file}}


def cleanup():
    work = Path(WORK_DIR)
    if work.is_dir():
        try:
            shutil.rmtree(work)
            log_info(f"Removed {work}")
        except OSError as exc:
            log_warning(f"Cannot remove {work}: {exc}")
    spec = Path(SPEC_FILE)
    if spec.is_file():
        try:
            spec.unlink()
            log_info(f"Removed {spec}")
        except OSError as exc:
            log_warning(f"Cannot remove {spec}: {exc}")"##;

pub(super) const MAIN_PROLOGUE: &str = r##"BACKEND_NAME = {{backend_name}}


def main():
    if not check_environment():
        return 1
    if not check_backend():
        return 1
    if not check_build_dependencies():
        return 1

    start_time = datetime.now()
    log_info("=" * 60)
    log_info(f"{BACKEND_NAME} build started at {start_time:%Y-%m-%d %H:%M:%S}")
    log_info("=" * 60)"##;

pub(super) const NATIVE_PARAMETERS: &str = r##"    log_info(f"Entry file: {ENTRY_NAME}")
    log_info(f"Output directory: {OUTPUT_DIR}")
    log_info("Application name: " + {{app_name}})
    log_info("Compiler: " + {{toolchain}})
    log_info("Mode: " + {{layout}})
    log_info("Parallel jobs: " + {{jobs}})
    log_info("Console window: " + {{console}})

    args = {{args}}"##;

pub(super) const BUNDLER_PARAMETERS: &str = r##"    log_info(f"Entry file: {ENTRY_NAME}")
    log_info(f"Output directory: {OUTPUT_DIR}")
    log_info("Application name: " + {{app_name}})
    log_info("Mode: " + {{layout}})
    log_info("Console window: " + {{console}})
{{#if version_info}}
    Path({{version_file}}).write_text({{version_info}}, encoding="utf-8")
    log_info("Wrote version resource " + {{version_file}})
{{/if}}

    args = {{args}}"##;

pub(super) const EPILOGUE: &str = r##"    command = " ".join(args)
    log_info(f"Running: {command}")
    code = exit_code_of(os.system(command))
    if code != 0:
        log_error(f"{BACKEND_NAME} failed with exit code {code}")
        return code
    log_success(f"{BACKEND_NAME} finished")

    copy_additional_files()

    elapsed = int((datetime.now() - start_time).total_seconds())
    log_success("Build complete")
    log_info(f"Output directory: {OUTPUT_DIR}")
    log_info(f"Elapsed: {elapsed // 60}m {elapsed % 60}s")

    cleanup()

{{#if packaging}}
    log_info("=" * 60)
    log_info("Creating Linux packages")
    log_info("=" * 60)
    if not create_linux_packages():
        log_error("Linux package generation failed")
        return 1
{{else}}
    log_info("Linux package generation is disabled")
{{/if}}
    return 0"##;

pub(super) const PACKAGING: &str = r##"PACKAGE_NAME = {{name}}
PACKAGE_VERSION = {{version}}
PACKAGE_TOOL = {{tool}}
PACKAGE_TOOL_VERSION_ARG = {{tool_version_arg}}
PACKAGE_TOOL_HINT = {{tool_hint}}
PACKAGE_OUTPUT_DIR = {{output_dir}}
PACKAGE_FORMATS = {{formats}}
PACKAGE_FILES = {{files}}
PACKAGE_BUILD_TOOLS = {{build_tools}}
PACKAGE_COMMANDS = {{commands}}
GO_BIN_DIRS = {{go_bin_dirs}}
NFPM_MANIFEST_FILE = {{manifest_file}}
NFPM_MANIFEST = {{manifest}}
EXECUTABLE_PLACEHOLDER = {{placeholder}}


def locate_packaging_tool():
    candidates = []
    found = shutil.which(PACKAGE_TOOL)
    if found:
        candidates.append(found)
    if PACKAGE_TOOL == "nfpm":
        gopath = os.environ.get("GOPATH")
        dirs = [os.path.join(p, "bin") for p in gopath.split(os.pathsep) if p] if gopath else []
        dirs += [os.path.expanduser(d) for d in GO_BIN_DIRS]
        candidates += [os.path.join(d, PACKAGE_TOOL) for d in dirs]
    for candidate in candidates:
        if os.path.isfile(candidate) and check_tool(PACKAGE_TOOL, PACKAGE_TOOL_VERSION_ARG, path=candidate):
            return candidate
    return None


def remove_stale_packages(fmt):
    for stale in Path(PACKAGE_OUTPUT_DIR).glob(f"*.{fmt}"):
        try:
            stale.unlink()
            log_info(f"Removed previous package {stale}")
        except OSError as exc:
            log_warning(f"Cannot remove {stale}: {exc}")


def build_package(tool, fmt, exe_path):
    build_tool = PACKAGE_BUILD_TOOLS[fmt]
    if not check_tool(build_tool):
        log_warning(f"{build_tool} not found; building {fmt.upper()} may fail")
    command = [tool] + [arg.replace(EXECUTABLE_PLACEHOLDER, exe_path) for arg in PACKAGE_COMMANDS[fmt][1:]]
    log_info("Running: " + " ".join(command))
    result = subprocess.run(command, capture_output=True, text=True)
    if result.returncode != 0:
        log_error(f"{fmt.upper()} package failed with exit code {result.returncode}")
        output = "\n".join(part for part in (result.stdout.strip(), result.stderr.strip()) if part)
        if output:
            log_error(output)
        return False
    target = Path(PACKAGE_OUTPUT_DIR) / PACKAGE_FILES[fmt]
    if target.is_file():
        log_success(f"Created {target} ({target.stat().st_size} bytes)")
    else:
        log_warning(f"{PACKAGE_TOOL} succeeded but {target} was not found")
    return True


def create_linux_packages(executable=None):
    tool = locate_packaging_tool()
    if tool is None:
        log_error(f"{PACKAGE_TOOL} is not installed")
        log_info(PACKAGE_TOOL_HINT)
        return False
    if executable is None:
        executable = find_executable()
    if executable is None:
        log_error("No executable found in " + ", ".join(SEARCH_DIRS))
        return False
    executable = Path(executable)
    if not executable.is_file():
        log_error(f"Executable {executable} does not exist")
        return False
    size = executable.stat().st_size
    if size == 0:
        log_error(f"Executable {executable} is empty")
        return False
    if executable.suffix.lower() == ".exe":
        log_warning(f"{executable} is a Windows executable and needs Wine on Linux")
    log_info(f"Packaging {executable} ({size} bytes)")

    exe_path = os.path.abspath(executable).replace("\\", "/")
    Path(PACKAGE_OUTPUT_DIR).mkdir(parents=True, exist_ok=True)
    if NFPM_MANIFEST is not None:
        Path(NFPM_MANIFEST_FILE).write_text(NFPM_MANIFEST.replace(EXECUTABLE_PLACEHOLDER, exe_path), encoding="utf-8")

    success = True
    try:
        for fmt in PACKAGE_FORMATS:
            remove_stale_packages(fmt)
            if not build_package(tool, fmt, exe_path):
                success = False
    finally:
        if NFPM_MANIFEST is not None:
            manifest = Path(NFPM_MANIFEST_FILE)
            if manifest.exists():
                manifest.unlink()
    return success"##;

pub(super) const PACKAGE_MAIN: &str = r##"def main():
    log_info("=" * 60)
    log_info(f"Linux packages for {PACKAGE_NAME} {PACKAGE_VERSION}")
    log_info("=" * 60)
    executable = sys.argv[1] if len(sys.argv) > 1 else None
    if create_linux_packages(executable):
        log_success(f"Packages written to {PACKAGE_OUTPUT_DIR}")
        return 0
    log_error("Linux package generation failed")
    return 1"##;

pub(super) const FOOTER: &str = r##"if __name__ == "__main__":
    try:
        sys.exit(main())
    except KeyboardInterrupt:
        log_warning("Interrupted by user")
        sys.exit(130)"##;

pub(super) const VERSION_INFO: &str = r##"# UTF-8
VSVersionInfo(
  ffi=FixedFileInfo(
    filevers={{version_tuple}},
    prodvers={{version_tuple}},
    mask=0x3f,
    flags=0x0,
    OS=0x40004,
    fileType=0x1,
    subtype=0x0,
    date=(0, 0)
  ),
  kids=[
    StringFileInfo([
      StringTable(
        '040904B0',
        [StringStruct('CompanyName', {{company}}),
        StringStruct('FileDescription', {{description}}),
        StringStruct('FileVersion', {{version}}),
        StringStruct('InternalName', {{name}}),
        StringStruct('LegalCopyright', {{copyright}}),
        StringStruct('OriginalFilename', {{original_filename}}),
        StringStruct('ProductName', {{name}}),
        StringStruct('ProductVersion', {{version}})])
    ]),
    VarFileInfo([VarStruct('Translation', [1033, 1200])])
  ]
)
"##;
