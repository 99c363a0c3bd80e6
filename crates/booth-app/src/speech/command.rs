use std::path::Path;
use std::process::Stdio;
use std::sync::Mutex;
use tokio::process::Command;
use tokio::sync::oneshot;

use super::{SpeechCompletion, SpeechEngine, SpeechError};

/// Narrates by running an external text-to-speech program (`say`, `espeak`)
/// with the text as the operand after `--`.
pub struct CommandSpeechEngine {
    program: String,
    voice: Option<String>,
    cancel: Mutex<Option<oneshot::Sender<()>>>,
}

impl CommandSpeechEngine {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            voice: None,
            cancel: Mutex::new(None),
        }
    }

    /// Voice or language hint, passed as `-v <voice>` after translating a
    /// language tag into what the program understands
    pub fn with_voice(mut self, voice: Option<String>) -> Self {
        self.voice = voice
            .filter(|v| !v.trim().is_empty())
            .and_then(|v| voice_for(&self.program, v.trim()));
        self
    }

    fn args(&self, text: &str) -> Vec<String> {
        let mut args = Vec::new();
        if let Some(voice) = &self.voice {
            args.push("-v".to_string());
            args.push(voice.clone());
        }
        // Answers may start with `-` (bullet lists)
        args.push("--".to_string());
        args.push(text.to_string());
        args
    }
}

/// `say` voices for common language tags
const SAY_VOICES: &[(&str, &str)] = &[
    ("ja", "Kyoko"),
    ("en", "Samantha"),
    ("zh", "Tingting"),
    ("ko", "Yuna"),
    ("fr", "Thomas"),
    ("de", "Anna"),
    ("es", "Monica"),
    ("it", "Alice"),
];

/// Primary subtag of a BCP 47 style tag such as `ja-JP` or `en_US`
fn language_of(hint: &str) -> Option<String> {
    let mut subtags = hint.split(['-', '_']);
    let primary = subtags.next()?;
    let is_tag = (2..=3).contains(&primary.len())
        && primary.chars().all(|c| c.is_ascii_alphabetic())
        && subtags.all(|s| !s.is_empty() && s.chars().all(|c| c.is_ascii_alphanumeric()));
    is_tag.then(|| primary.to_ascii_lowercase())
}

/// Translate a voice hint for `program`. Language tags become a voice name
/// for `say` and a bare language for `espeak`. Anything else is passed
/// through as an explicit voice name. `None` means use the default voice.
fn voice_for(program: &str, hint: &str) -> Option<String> {
    let Some(language) = language_of(hint) else {
        return Some(hint.to_string());
    };
    let name = Path::new(program)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or(program);

    match name {
        "say" => {
            let voice = SAY_VOICES
                .iter()
                .find(|(lang, _)| *lang == language)
                .map(|(_, voice)| voice.to_string());
            if voice.is_none() {
                log::warn!("no say voice for {}; using the default voice", hint);
            }
            voice
        }
        "espeak" | "espeak-ng" => Some(language),
        _ => Some(hint.to_string()),
    }
}

impl SpeechEngine for CommandSpeechEngine {
    fn speak(&self, text: &str) -> Result<SpeechCompletion, SpeechError> {
        if text.trim().is_empty() {
            return Err(SpeechError::EmptyText);
        }

        // One narration at a time
        self.stop();

        let mut child = Command::new(&self.program)
            .args(self.args(text))
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| SpeechError::Start(format!("{}: {}", self.program, e)))?;

        let (cancel_tx, cancel_rx) = oneshot::channel();
        let (done_tx, done_rx) = oneshot::channel();
        *self.cancel.lock().unwrap_or_else(|e| e.into_inner()) = Some(cancel_tx);

        let program = self.program.clone();
        tokio::spawn(async move {
            tokio::select! {
                status = child.wait() => {
                    let result = match status {
                        Ok(status) if status.success() => Ok(()),
                        Ok(status) => Err(SpeechError::Playback(format!("{} exited with {}", program, status))),
                        Err(e) => Err(SpeechError::Playback(e.to_string())),
                    };
                    let _ = done_tx.send(result);
                }
                _ = cancel_rx => {
                    if let Err(e) = child.kill().await {
                        log::debug!("failed to kill {}: {}", program, e);
                    }
                }
            }
        });

        log::debug!("speaking {} chars with {}", text.chars().count(), self.program);
        Ok(done_rx)
    }

    fn stop(&self) {
        let cancel = self.cancel.lock().unwrap_or_else(|e| e.into_inner()).take();
        if let Some(cancel) = cancel {
            let _ = cancel.send(());
        }
    }
}
