use std::{
    path::{Path, PathBuf},
    process::Stdio,
};

use serde::Deserialize;
use tokio::process::Command;
use tracing::{debug, instrument, warn};

use super::{SubtitleError, SubtitleResponse};
use crate::config::{ConfigPaths, SubtitleConfig};

/// Runs the external subtitle helper script.
///
/// The helper is a batch process: one invocation per request, JSON on
/// stdout, and on failure a non-zero exit with an optional
/// `{"error": ...}` on stderr.
#[derive(Debug, Clone)]
pub struct SubtitleHelper {
    program: String,
    script: PathBuf,
    output_dir: PathBuf,
}

#[derive(Deserialize)]
struct HelperFailure {
    error: Option<String>,
}

impl SubtitleHelper {
    /// Helper run as `program script ...`, writing into `output_dir`.
    pub fn new(program: impl Into<String>, script: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            script: script.into(),
            output_dir: output_dir.into(),
        }
    }

    /// Helper configured from settings. An unset output directory resolves
    /// to `~/.miniplay/subtitles`.
    ///
    /// # Errors
    ///
    /// Returns `SubtitleError::OutputDir` if the default directory cannot be
    /// resolved or created.
    pub fn from_config(config: &SubtitleConfig) -> Result<Self, SubtitleError> {
        let output_dir = match &config.output_dir {
            Some(dir) => dir.clone(),
            None => ConfigPaths::subtitles_dir().map_err(|source| SubtitleError::OutputDir {
                path: PathBuf::from("~/.miniplay/subtitles"),
                source,
            })?,
        };
        Ok(Self::new(&config.python, &config.script, output_dir))
    }

    /// Where the extracted subtitles for `file` are written.
    pub fn output_file_for(&self, file: &Path) -> PathBuf {
        let stem = file
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_else(|| "subtitles".to_string());
        self.output_dir.join(format!("{stem}.srt"))
    }

    /// List subtitle tracks in `file`.
    pub async fn tracks(&self, file: &Path) -> SubtitleResponse {
        let args = vec!["get-tracks".into(), file.display().to_string()];
        self.run(args).await.unwrap_or_else(into_failure)
    }

    /// Extract track `stream_index` of `file` to [`output_file_for`].
    ///
    /// [`output_file_for`]: SubtitleHelper::output_file_for
    pub async fn extract(&self, file: &Path, stream_index: u32) -> SubtitleResponse {
        let output = self.output_file_for(file);
        if let Err(source) = tokio::fs::create_dir_all(&self.output_dir).await {
            return into_failure(SubtitleError::OutputDir {
                path: self.output_dir.clone(),
                source,
            });
        }

        let args = vec![
            "extract".into(),
            file.display().to_string(),
            output.display().to_string(),
            stream_index.to_string(),
        ];
        self.run(args).await.unwrap_or_else(into_failure)
    }

    #[instrument(skip(self), fields(program = %self.program, script = %self.script.display()))]
    async fn run(&self, args: Vec<String>) -> Result<SubtitleResponse, SubtitleError> {
        let output = Command::new(&self.program)
            .arg(&self.script)
            .args(&args)
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|source| SubtitleError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        let stderr = String::from_utf8_lossy(&output.stderr);

        if !output.status.success() {
            let message = serde_json::from_str::<HelperFailure>(stderr.trim())
                .ok()
                .and_then(|failure| failure.error)
                .unwrap_or_else(|| {
                    let stderr = stderr.trim();
                    if stderr.is_empty() {
                        "Failed to run subtitle helper".to_string()
                    } else {
                        stderr.to_string()
                    }
                });
            return Err(SubtitleError::ExitStatus {
                status: output.status.to_string(),
                message,
            });
        }

        let response: SubtitleResponse = serde_json::from_str(stdout.trim())?;
        if !response.success {
            let message = response
                .error
                .unwrap_or_else(|| "Unknown error occurred".to_string());
            return Err(SubtitleError::Helper(message));
        }

        debug!(tracks = response.tracks.len(), "Subtitle helper finished");
        Ok(response)
    }
}

fn into_failure(error: SubtitleError) -> SubtitleResponse {
    warn!(error = %error, "Subtitle helper failed");
    SubtitleResponse::failure(error.to_string())
}
