use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::atomic::{AtomicUsize, Ordering};

use tracing::debug;

use crate::{EquivalenceChecker, EquivalenceResult, Inconclusive};

/// The phrase `cec` prints when the two networks match.
pub const EQUIVALENT_PHRASE: &str = "are equivalent";

static SERIAL: AtomicUsize = AtomicUsize::new(0);

/// Runs `cec` in ABC on the two modules.
#[derive(Clone, Debug)]
pub struct AbcChecker {
    program: PathBuf,
    workdir: PathBuf,
}

impl AbcChecker {
    /// Creates a checker that keeps its scratch files in `workdir`.
    pub fn new(workdir: impl Into<PathBuf>) -> Self {
        AbcChecker { program: PathBuf::from("abc"), workdir: workdir.into() }
    }

    pub fn with_program(mut self, program: impl Into<PathBuf>) -> Self {
        self.program = program.into();
        self
    }

    fn scratch(&self, serial: usize, suffix: &str) -> PathBuf {
        self.workdir.join(format!("arche_{}_{serial}_{suffix}", std::process::id()))
    }

    /// Compares two Verilog files already on disk.
    pub fn check_files(&self, first: &Path, second: &Path) -> Result<EquivalenceResult, Inconclusive> {
        let serial = SERIAL.fetch_add(1, Ordering::Relaxed);
        let script = self.scratch(serial, "verify.abc");
        fs::write(&script, cec_script(first, second))?;
        debug!("running {} -f {}", self.program.display(), script.display());
        let output = Command::new(&self.program).arg("-f").arg(&script).output();
        let _ = fs::remove_file(&script);
        let output = output?;
        debug!("{} exited with {}", self.program.display(), output.status);
        classify(
            output.status.success(),
            String::from_utf8_lossy(&output.stdout).into_owned(),
            String::from_utf8_lossy(&output.stderr).into_owned(),
        )
    }
}

impl EquivalenceChecker for AbcChecker {
    fn check(&self, first: &str, second: &str) -> Result<EquivalenceResult, Inconclusive> {
        let serial = SERIAL.fetch_add(1, Ordering::Relaxed);
        let first_path = self.scratch(serial, "a.v");
        let second_path = self.scratch(serial, "b.v");
        fs::write(&first_path, first)?;
        fs::write(&second_path, second)?;
        let result = self.check_files(&first_path, &second_path);
        let _ = fs::remove_file(&first_path);
        let _ = fs::remove_file(&second_path);
        result
    }
}

fn cec_script(first: &Path, second: &Path) -> String {
    format!("cec \"{}\" \"{}\"\n", first.display(), second.display())
}

fn classify(success: bool, stdout: String, stderr: String) -> Result<EquivalenceResult, Inconclusive> {
    if !success {
        return Err(Inconclusive { stderr });
    }
    Ok(EquivalenceResult { equivalent: stdout.contains(EQUIVALENT_PHRASE), raw_output: stdout })
}

#[cfg(test)]
mod test {
    use std::path::Path;

    use super::{cec_script, classify};
    use crate::{AbcChecker, EquivalenceChecker, Inconclusive};

    #[test]
    fn test_classify() {
        let result = classify(true, "Networks are equivalent.  Time = 0.00 sec\n".into(), String::new()).unwrap();
        assert!(result.equivalent);
        let result = classify(true, "Networks are NOT EQUIVALENT.\n".into(), String::new()).unwrap();
        assert!(!result.equivalent);
        assert_eq!(result.raw_output, "Networks are NOT EQUIVALENT.\n");
        assert_eq!(
            classify(false, "are equivalent".into(), "Cannot open input file".into()),
            Err(Inconclusive { stderr: "Cannot open input file".into() })
        );
    }

    #[test]
    fn test_script_quotes_paths() {
        assert_eq!(
            cec_script(Path::new("/tmp/my work/a.v"), Path::new("b.v")),
            "cec \"/tmp/my work/a.v\" \"b.v\"\n"
        );
    }

    #[test]
    fn test_missing_program() {
        let checker = AbcChecker::new(std::env::temp_dir()).with_program("/nonexistent/arche-abc");
        assert!(checker.check("module a(); endmodule", "module b(); endmodule").is_err());
    }
}
