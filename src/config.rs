use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use which::which;

/// Application configuration settings.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// File the snippet library is persisted to
    pub data_file: PathBuf,

    /// Default editor command used when composing code in a terminal
    pub editor_command: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        let data_file = dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("snipstash")
            .join("snippets.json");

        Config {
            data_file,
            editor_command: None,
        }
    }
}

impl Config {
    // This method provides smart fallbacks when no editor is configured
    pub fn get_editor_command(&self) -> String {
        // First try the configured editor
        if let Some(editor) = &self.editor_command {
            return editor.clone();
        }

        // Then try environment variable
        if let Ok(editor) = std::env::var("EDITOR") {
            return editor;
        }

        // Fall back to platform defaults
        if cfg!(windows) {
            "notepad".to_string()
        } else if cfg!(target_os = "macos") {
            "open -t".to_string()
        } else {
            // Try common Linux editors
            for editor in &["nano", "vim", "vi", "emacs"] {
                if which(editor).is_ok() {
                    return editor.to_string();
                }
            }
            "nano".to_string()
        }
    }
}
