use std::io::{stdin, stdout, Write};

use crate::Result;

// Helper method for parsing tags
pub fn parse_tags(tags: Option<String>) -> Vec<String> {
    tags.map(|t| {
        t.split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect()
    })
    .unwrap_or_default()
}

/// Maps a language identifier to the file suffix used for editor buffers,
/// so the editor can pick up syntax highlighting.
pub fn language_extension(language: &str) -> &'static str {
    match language.to_lowercase().as_str() {
        "rust" => ".rs",
        "python" => ".py",
        "javascript" => ".js",
        "typescript" => ".ts",
        "go" => ".go",
        "java" => ".java",
        "c" => ".c",
        "cpp" | "c++" => ".cpp",
        "csharp" | "c#" => ".cs",
        "ruby" => ".rb",
        "php" => ".php",
        "swift" => ".swift",
        "kotlin" => ".kt",
        "shell" | "bash" | "sh" => ".sh",
        "html" => ".html",
        "css" => ".css",
        "sql" => ".sql",
        "json" => ".json",
        "yaml" | "yml" => ".yaml",
        _ => ".txt",
    }
}

/// Prompts on stdout and reads a yes/no answer from stdin. Only "y" and
/// "yes" count as confirmation.
pub fn confirm(prompt: &str) -> Result<bool> {
    print!("{}", prompt);
    stdout().flush()?;

    let mut input = String::new();
    stdin().read_line(&mut input)?;

    let input = input.trim().to_lowercase();
    Ok(input == "y" || input == "yes")
}
