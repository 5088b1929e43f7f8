//! `esbuild` back-end for the [`Compiler`] contract.
//!
//! Constants are not passed as `--define` flags: page literals easily exceed
//! the per-argument size limit of `execve`. They are written to a generated
//! module instead and handed over with `--inject`, which rewrites every free
//! reference to an exported name into that export.
//!
//! esbuild names each bundled file in a comment relative to the working
//! directory, so the generated module lives at a fixed path inside the
//! project ([`CONSTANTS_MODULE`]) and is removed once the bundler exits.

use super::{CompileRequest, Compiler, ConstantTable};
use crate::{
    error::BuildError,
    log,
    utils::exec::{self, FilterRule},
};
use std::{
    ffi::OsString,
    fs,
    path::{Path, PathBuf},
};

/// Generated constants module, relative to the project root.
pub const CONSTANTS_MODULE: &str = "node_modules/.cache/workerpack/constants.js";

/// esbuild prints a summary line per output file on success.
const ESBUILD_FILTER: FilterRule = FilterRule::new(&["⚡ Done", "Done in"]);

#[derive(Debug, Clone)]
pub struct EsbuildCompiler {
    /// Command and leading arguments, e.g. `["npx", "esbuild"]`.
    command: Vec<String>,
    /// Working directory, so bare imports resolve from the project's node_modules.
    root: PathBuf,
}

impl EsbuildCompiler {
    pub fn new(command: Vec<String>, root: impl Into<PathBuf>) -> Self {
        Self {
            command,
            root: root.into(),
        }
    }

    /// Where the constants module is written for this project.
    pub fn inject_path(&self) -> PathBuf {
        self.root.join(CONSTANTS_MODULE)
    }

    fn args(request: &CompileRequest, inject: &Path) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec![request.entry.clone().into()];

        if request.bundle {
            args.push("--bundle".into());
        }
        args.push(format!("--format={}", request.format.as_str()).into());
        args.push(format!("--platform={}", request.platform).into());
        args.push(format!("--target={}", request.target).into());
        for module in &request.external {
            args.push(format!("--external:{module}").into());
        }
        if request.minify {
            args.push("--minify".into());
        }

        let mut inject_arg = OsString::from("--inject:");
        inject_arg.push(inject);
        args.push(inject_arg);
        args.push("--log-level=warning".into());

        args
    }
}

/// One `export const` per constant; values are already source literals.
fn constants_module(constants: &ConstantTable) -> String {
    constants
        .iter()
        .map(|(name, literal)| format!("export const {name} = {literal};\n"))
        .collect()
}

impl Compiler for EsbuildCompiler {
    fn compile(&self, request: &CompileRequest) -> Result<String, BuildError> {
        let inject = self.inject_path();
        if let Some(dir) = inject.parent() {
            fs::create_dir_all(dir).map_err(|err| BuildError::io(dir, err))?;
        }
        fs::write(&inject, constants_module(&request.constants))
            .map_err(|err| BuildError::io(&inject, err))?;

        let cmd: Vec<OsString> = self.command.iter().map(OsString::from).collect();
        let args = Self::args(request, &inject);

        let result = exec::exec(Some(&self.root), &cmd, &args, &ESBUILD_FILTER);
        if let Err(err) = fs::remove_file(&inject) {
            log!("warn"; "could not remove `{}`: {err}", inject.display());
        }
        let output = result.map_err(|err| BuildError::CompileError(format!("{err:#}")))?;

        String::from_utf8(output.stdout)
            .map_err(|_| BuildError::CompileError("bundler emitted invalid utf-8".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bundle::ModuleFormat;
    use tempfile::TempDir;

    fn request(minify: bool) -> CompileRequest {
        CompileRequest {
            entry: PathBuf::from("/project/src/worker.js"),
            bundle: true,
            external: vec!["cloudflare:sockets".into()],
            format: ModuleFormat::Esm,
            minify,
            platform: "browser".into(),
            target: "es2020".into(),
            constants: ConstantTable::new(&[], b"", "1.2.3"),
        }
    }

    #[test]
    fn test_args() {
        let args = EsbuildCompiler::args(&request(false), Path::new("/tmp/c.js"));
        let args: Vec<_> = args.iter().map(|a| a.to_str().unwrap()).collect();

        assert_eq!(
            args,
            [
                "/project/src/worker.js",
                "--bundle",
                "--format=esm",
                "--platform=browser",
                "--target=es2020",
                "--external:cloudflare:sockets",
                "--inject:/tmp/c.js",
                "--log-level=warning",
            ]
        );
    }

    #[test]
    fn test_args_minify_flag() {
        let args = EsbuildCompiler::args(&request(true), Path::new("c.js"));
        assert!(args.iter().any(|a| a == "--minify"));
    }

    #[test]
    fn test_constants_module() {
        let module = constants_module(&ConstantTable::new(&[], &[1, 2, 3], "1.2.3"));

        assert!(module.starts_with("export const __PANEL_HTML_CONTENT__ = \"\";\n"));
        assert!(module.contains("export const __ICON__ = \"AQID\";\n"));
        assert!(module.ends_with("export const __VERSION__ = \"1.2.3\";\n"));
        assert_eq!(module.lines().count(), 6);
    }

    /// A stand-in bundler: records the inject path, then prints the module.
    #[cfg(unix)]
    #[test]
    fn test_compile_with_shell_backend() {
        let dir = TempDir::new().unwrap();
        let script = dir.path().join("fake-esbuild.sh");
        let seen = dir.path().join("inject.log");
        fs::write(
            &script,
            format!(
                "for a in \"$@\"; do case \"$a\" in --inject:*) \
                 echo \"${{a#--inject:}}\" >> '{}'; cat \"${{a#--inject:}}\";; esac; done\n",
                seen.display()
            ),
        )
        .unwrap();

        let compiler =
            EsbuildCompiler::new(vec!["sh".into(), script.to_str().unwrap().into()], dir.path());
        let first = compiler.compile(&request(false)).unwrap();
        let second = compiler.compile(&request(false)).unwrap();

        assert!(first.contains("export const __VERSION__ = \"1.2.3\";"));
        assert_eq!(first, second);

        // Same project-local path on every build, gone once the bundler exits
        let paths = fs::read_to_string(&seen).unwrap();
        let expected = dir.path().join(CONSTANTS_MODULE);
        let expected = expected.to_str().unwrap();
        assert_eq!(paths.lines().collect::<Vec<_>>(), [expected, expected]);
        assert!(!compiler.inject_path().exists());
    }

    #[test]
    fn test_inject_path_is_project_local() {
        let compiler = EsbuildCompiler::new(vec!["esbuild".into()], "/project");
        assert_eq!(
            compiler.inject_path(),
            Path::new("/project/node_modules/.cache/workerpack/constants.js")
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_compile_diagnostic_is_compile_error() {
        let dir = TempDir::new().unwrap();
        let compiler = EsbuildCompiler::new(
            vec![
                "sh".into(),
                "-c".into(),
                "echo '✘ [ERROR] Could not resolve \"./missing\"' >&2; exit 1".into(),
            ],
            dir.path(),
        );

        match compiler.compile(&request(false)) {
            Err(BuildError::CompileError(msg)) => assert!(msg.contains("Could not resolve")),
            other => panic!("expected compile error, got {other:?}"),
        }
        assert!(!compiler.inject_path().exists());
    }
}
