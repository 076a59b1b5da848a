//! Project naming from the custom template file, plus the optional external
//! "create or resume template" step that prepares the work directory.
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use tracing::info;

use crate::error::{Error, Result};

/// `LombokSenAT156VV.template` → `LombokSenAT156VV`
pub fn project_name(template: &Path) -> Result<String> {
    template
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .filter(|stem| !stem.is_empty())
        .ok_or_else(|| Error::InvalidArgument {
            arg: "custom_template_file",
            value: template.display().to_string(),
        })
}

/// `<scratch_dir>/<project_name>`
pub fn project_work_dir(scratch_dir: &Path, template: &Path) -> Result<PathBuf> {
    Ok(scratch_dir.join(project_name(template)?))
}

/// Run `<program> <template>` inside `work_dir` (created if needed) and wait for it.
pub fn run_template_step(program: &str, template: &Path, work_dir: &Path) -> Result<()> {
    std::fs::create_dir_all(work_dir)?;
    info!("Preparing {:?} with {}", work_dir, program);

    let output = Command::new(program)
        .arg(template)
        .current_dir(work_dir)
        .stdin(Stdio::null())
        .stdout(Stdio::inherit())
        .stderr(Stdio::piped())
        .output()
        .map_err(|e| Error::TemplateStepFailed {
            template: template.to_path_buf(),
            diagnostic: format!("could not run {}: {}", program, e),
        })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(Error::TemplateStepFailed {
            template: template.to_path_buf(),
            diagnostic: format!("{} exited with {}: {}", program, output.status, stderr.trim()),
        });
    }
    Ok(())
}
