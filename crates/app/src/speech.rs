use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};
use std::sync::Mutex;

use services::Narrator;

/// Speech programs tried in order when none is configured.
const CANDIDATES: [&str; 4] = ["espeak-ng", "espeak", "say", "spd-say"];

/// Narrator that shells out to a text-to-speech program.
///
/// Each utterance kills the previous process if it is still talking.
#[derive(Debug)]
pub struct CommandNarrator {
    program: PathBuf,
    current: Mutex<Option<Child>>,
}

impl CommandNarrator {
    /// Locate `preferred`, or the first known speech program on `PATH`.
    #[must_use]
    pub fn detect(preferred: Option<&str>) -> Option<Self> {
        let program = match preferred {
            Some(program) => find_program(program)?,
            None => CANDIDATES.iter().find_map(|c| find_program(c))?,
        };
        tracing::debug!(program = %program.display(), "speech program found");
        Some(Self {
            program,
            current: Mutex::new(None),
        })
    }
}

impl Narrator for CommandNarrator {
    fn is_available(&self) -> bool {
        true
    }

    fn speak(&self, text: &str) {
        let Ok(mut current) = self.current.lock() else {
            return;
        };
        if let Some(mut child) = current.take() {
            let _ = child.kill();
            let _ = child.wait();
        }
        match Command::new(&self.program)
            .arg(text)
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
        {
            Ok(child) => *current = Some(child),
            Err(err) => {
                tracing::warn!(program = %self.program.display(), error = %err, "speech failed");
            }
        }
    }
}

impl Drop for CommandNarrator {
    fn drop(&mut self) {
        if let Ok(Some(child)) = self.current.get_mut().map(Option::as_mut) {
            let _ = child.kill();
        }
    }
}

fn find_program(program: &str) -> Option<PathBuf> {
    let candidate = Path::new(program);
    if candidate.components().count() > 1 {
        return candidate.is_file().then(|| candidate.to_path_buf());
    }
    let paths = std::env::var_os("PATH")?;
    std::env::split_paths(&paths)
        .map(|dir| dir.join(program))
        .find(|path| path.is_file())
}
