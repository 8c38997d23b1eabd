//! CLI application handler for the snipstash binary.
//!
//! This module dispatches parsed commands against the snippet store and
//! renders the results for a terminal.
use std::{
    fs,
    io::{stdin, Read},
    path::{Path, PathBuf},
    process::Command,
};

use log::info;
use shell_words::split;
use tempfile::Builder;

use crate::{
    confirm, language_extension, parse_tags, Commands, Config, ListQuery, Result, SnipError,
    Snippet, SnippetDraft, SnippetPatch, SnippetStore, SortKey,
};

/// CLI application handler - processes CLI commands and interfaces with the
/// snippet store
pub struct App {
    /// The snippet storage backend
    store: SnippetStore,

    /// Application configuration
    config: Config,

    /// Whether to display verbose output
    verbose: bool,
}

impl App {
    /// Create a new CLI application with the given storage backend and config
    pub fn new(store: SnippetStore, config: Config, verbose: bool) -> Self {
        Self {
            store,
            config,
            verbose,
        }
    }

    /// Run the CLI application with the given command
    pub fn run(&mut self, command: Commands) -> Result<()> {
        match command {
            Commands::Add {
                title,
                description,
                language,
                code,
                file,
                edit,
                tags,
            } => self.handle_add(title, description, language, code, file, edit, tags),

            Commands::View { id, json } => self.handle_view(&id, json),

            Commands::List {
                query,
                language,
                tag,
                sort,
                limit,
                json,
                brief,
            } => self.handle_list(query, language, tag, sort, limit, json, brief),

            Commands::Search { query, limit, json } => self.handle_search(&query, limit, json),

            Commands::Edit {
                id,
                title,
                description,
                language,
                code,
                file,
                edit,
                tags,
            } => self.handle_edit(id, title, description, language, code, file, edit, tags),

            Commands::Bookmark { id } => self.handle_bookmark(&id),

            Commands::Delete { id, force } => self.handle_delete(&id, force),

            Commands::Clear { force } => self.handle_clear(force),

            Commands::Export { output } => self.handle_export(output),

            Commands::Import { input } => self.handle_import(input),

            Commands::Tags => self.handle_tags(),

            Commands::Languages => self.handle_languages(),

            Commands::Stats { json } => self.handle_stats(json),
        }
    }

    fn handle_add(
        &mut self,
        title: String,
        description: Option<String>,
        language: String,
        code: Option<String>,
        file: Option<PathBuf>,
        edit: bool,
        tags: Option<String>,
    ) -> Result<()> {
        let code = self.resolve_code_input(code, file, edit, &language, "")?;

        let draft = SnippetDraft {
            title,
            description: description.unwrap_or_default(),
            code,
            language,
            tags: parse_tags(tags),
            created_at: None,
        };

        let snippet = self.store.create(draft)?;
        println!("Snippet created with ID: {}", snippet.id);
        Ok(())
    }

    /// Resolves the code text from the possible input sources: an inline
    /// flag, a file, the editor, or piped stdin.
    fn resolve_code_input(
        &self,
        code: Option<String>,
        file: Option<PathBuf>,
        edit: bool,
        language: &str,
        initial: &str,
    ) -> Result<String> {
        match (code, file) {
            (Some(code), _) => Ok(code),
            (_, Some(path)) => {
                if !path.exists() {
                    return Err(SnipError::FileNotFound {
                        file_path: path.display().to_string(),
                    });
                }
                Ok(fs::read_to_string(path)?)
            }
            (None, None) => {
                if edit {
                    self.open_editor_for_code(language, initial)
                } else {
                    let mut buffer = String::new();
                    stdin().read_to_string(&mut buffer)?;
                    Ok(buffer)
                }
            }
        }
    }

    fn open_editor_for_code(&self, language: &str, initial: &str) -> Result<String> {
        // Suffix the buffer by language so the editor picks up highlighting
        let temp_file = Builder::new()
            .suffix(language_extension(language))
            .tempfile()?;
        let temp_path = temp_file.path().to_path_buf();

        if !initial.is_empty() {
            fs::write(&temp_path, initial)?;
        }

        // Get editor from config or environment
        let editor_cmd = self.config.get_editor_command();

        info!("Opening editor to write the snippet code. Save and exit when done...");
        self.launch_editor(&editor_cmd, &temp_path)?;

        Ok(fs::read_to_string(&temp_path)?)
    }

    fn launch_editor(&self, editor_cmd: &str, file_path: &Path) -> Result<()> {
        let path_str = file_path.to_string_lossy();

        // Handle shell-like command parsing
        let args = split(editor_cmd).map_err(|e| SnipError::Editor {
            message: format!("Failed to parse editor command: {}", e),
        })?;

        if args.is_empty() {
            return Err(SnipError::Editor {
                message: "Empty editor command".to_string(),
            });
        }

        // First word is the program name, rest are arguments
        let program = &args[0];
        let mut command = Command::new(program);

        if args.len() > 1 {
            command.args(&args[1..]);
        }

        command.arg(path_str.as_ref());

        let status = command.status()?;

        if !status.success() {
            return Err(SnipError::Editor {
                message: "Editor exited with non-zero status".to_string(),
            });
        }

        Ok(())
    }

    fn handle_view(&self, id: &str, json: bool) -> Result<()> {
        let snippet = self.store.get(id)?;

        if json {
            println!("{}", serde_json::to_string_pretty(&snippet)?);
        } else {
            self.display_snippet_full(&snippet);
        }

        Ok(())
    }

    fn handle_list(
        &self,
        query: Option<String>,
        language: Option<String>,
        tag: Vec<String>,
        sort: SortKey,
        limit: Option<usize>,
        json: bool,
        brief: bool,
    ) -> Result<()> {
        let list_query = ListQuery {
            search: query,
            language,
            tags: tag,
            sort,
        };

        let mut snippets = self.store.query(&list_query);

        if let Some(limit) = limit {
            snippets.truncate(limit);
        }

        self.display_snippets(&snippets, json, brief)
    }

    fn handle_search(&self, query: &str, limit: usize, json: bool) -> Result<()> {
        let mut results = self.store.search(query);

        // Apply limit if specified (0 means no limit)
        if limit > 0 && results.len() > limit {
            results.truncate(limit);
        }

        if results.is_empty() {
            println!("No snippets found matching query: \"{}\"", query);
            return Ok(());
        }

        if json {
            self.display_snippets_json(&results, false)?;
        } else {
            self.display_snippets_text(&results, true)?;
        }

        if limit > 0 && results.len() == limit {
            println!(
                "\nShowing {} of many matching results. Use --limit to show more.",
                results.len()
            );
        } else {
            println!(
                "\nFound {} matching snippet{}",
                results.len(),
                if results.len() == 1 { "" } else { "s" }
            );
        }

        Ok(())
    }

    fn handle_edit(
        &mut self,
        id: String,
        title: Option<String>,
        description: Option<String>,
        language: Option<String>,
        code: Option<String>,
        file: Option<PathBuf>,
        edit: bool,
        tags: Option<String>,
    ) -> Result<()> {
        // Conflicting code sources are rejected up front
        if code.is_some() && file.is_some() {
            return Err(SnipError::Application {
                message: "Cannot specify both --code and --file options".to_string(),
            });
        }
        if code.is_some() && edit {
            return Err(SnipError::Application {
                message: "Cannot specify both --code and --edit options".to_string(),
            });
        }
        if file.is_some() && edit {
            return Err(SnipError::Application {
                message: "Cannot specify both --file and --edit options".to_string(),
            });
        }

        let current = self.store.get(&id)?;

        let new_code = if let Some(code) = code {
            Some(code)
        } else if let Some(path) = file {
            if !path.exists() {
                return Err(SnipError::FileNotFound {
                    file_path: path.display().to_string(),
                });
            }
            Some(fs::read_to_string(path)?)
        } else if edit {
            // Open the editor seeded with the current code
            let buffer_language = language.as_deref().unwrap_or(current.language.as_str());
            Some(self.open_editor_for_code(buffer_language, &current.code)?)
        } else {
            None
        };

        let patch = SnippetPatch {
            title,
            description,
            code: new_code,
            language,
            tags: tags.map(|t| parse_tags(Some(t))),
            bookmarked: None,
        };

        let updated = self.store.update(&id, &patch)?;
        println!("Snippet {} updated successfully", updated.id);
        Ok(())
    }

    fn handle_bookmark(&mut self, id: &str) -> Result<()> {
        let snippet = self.store.toggle_bookmark(id)?;

        if snippet.bookmarked {
            println!("Bookmarked '{}'", snippet.title);
        } else {
            println!("Removed bookmark from '{}'", snippet.title);
        }

        Ok(())
    }

    fn handle_delete(&mut self, id: &str, force: bool) -> Result<()> {
        // Fetch first so the prompt can show what is about to go away
        let snippet = self.store.get(id)?;

        if !force {
            println!("You are about to delete the following snippet:");
            println!("ID:       {}", snippet.id);
            println!("Title:    {}", snippet.title);
            println!("Language: {}", snippet.language);
            println!("Tags:     {}", snippet.tags.join(", "));
            println!(
                "Created:  {}",
                snippet.created_at.format("%Y-%m-%d %H:%M:%S")
            );

            if !snippet.code.is_empty() {
                let preview = snippet.code.lines().take(2).collect::<Vec<_>>().join("\n");

                println!("\nCode preview:");
                println!(
                    "{}{}",
                    preview,
                    if snippet.code.lines().count() > 2 {
                        "..."
                    } else {
                        ""
                    }
                );
            }

            println!("\nThis action cannot be undone!");
            if !confirm("Are you sure you want to delete this snippet? [y/N]: ")? {
                println!("Deletion cancelled.");
                return Ok(());
            }
        }

        let removed = self.store.delete(id)?;
        println!(
            "Snippet '{}' ({}) has been permanently deleted.",
            removed.title, removed.id
        );

        Ok(())
    }

    fn handle_clear(&mut self, force: bool) -> Result<()> {
        let total = self.store.get_all().len();

        if total == 0 {
            println!("The library is already empty.");
            return Ok(());
        }

        if !force {
            println!(
                "This will delete all {} snippet{} in the library.",
                total,
                if total == 1 { "" } else { "s" }
            );
            println!("This action cannot be undone!");
            if !confirm("Are you sure you want to clear the library? [y/N]: ")? {
                println!("Clear cancelled.");
                return Ok(());
            }
        }

        self.store.clear()?;
        println!(
            "Library cleared ({} snippet{} deleted).",
            total,
            if total == 1 { "" } else { "s" }
        );

        Ok(())
    }

    fn handle_export(&self, output: Option<PathBuf>) -> Result<()> {
        let envelope = self.store.export()?;

        match output {
            Some(path) => {
                fs::write(&path, &envelope)?;
                let total = self.store.get_all().len();
                println!(
                    "Exported {} snippet{} to {}",
                    total,
                    if total == 1 { "" } else { "s" },
                    path.display()
                );
            }
            None => println!("{}", envelope),
        }

        Ok(())
    }

    fn handle_import(&mut self, input: PathBuf) -> Result<()> {
        if !input.exists() {
            return Err(SnipError::FileNotFound {
                file_path: input.display().to_string(),
            });
        }

        let payload = fs::read_to_string(&input)?;
        let added = self.store.import(&payload)?;

        println!(
            "Imported {} snippet{} from {}",
            added,
            if added == 1 { "" } else { "s" },
            input.display()
        );

        Ok(())
    }

    fn handle_tags(&self) -> Result<()> {
        let tags = self.store.all_tags();

        if tags.is_empty() {
            println!("No tags in use.");
            return Ok(());
        }

        for tag in &tags {
            println!("{}", tag);
        }
        println!(
            "\nFound {} tag{}",
            tags.len(),
            if tags.len() == 1 { "" } else { "s" }
        );

        Ok(())
    }

    fn handle_languages(&self) -> Result<()> {
        let languages = self.store.all_languages();

        if languages.is_empty() {
            println!("No languages in use.");
            return Ok(());
        }

        for language in &languages {
            println!("{}", language);
        }
        println!(
            "\nFound {} language{}",
            languages.len(),
            if languages.len() == 1 { "" } else { "s" }
        );

        Ok(())
    }

    fn handle_stats(&self, json: bool) -> Result<()> {
        let stats = self.store.stats();

        if json {
            println!("{}", serde_json::to_string_pretty(&stats)?);
            return Ok(());
        }

        println!("Snippets:   {}", stats.total_snippets);
        println!("Bookmarked: {}", stats.bookmarked_count);
        println!("Languages:  {}", stats.language_count);
        println!("Tags:       {}", stats.tag_count);

        if !stats.language_distribution.is_empty() {
            println!("\nBy language:");
            for (language, count) in &stats.language_distribution {
                println!("  {:<12} {}", language, count);
            }
        }

        Ok(())
    }

    /// Display a single snippet with its full code body
    fn display_snippet_full(&self, snippet: &Snippet) {
        let term_width = terminal_size::terminal_size()
            .map(|(w, _)| w.0 as usize)
            .unwrap_or(80);

        println!("{}", console::style(&snippet.title).bold());
        println!(
            "ID: {} | Language: {} | Created: {}",
            snippet.id,
            snippet.language,
            snippet.created_at.format("%Y-%m-%d %H:%M")
        );
        if let Some(updated_at) = snippet.updated_at {
            println!("Updated: {}", updated_at.format("%Y-%m-%d %H:%M"));
        }
        if snippet.bookmarked {
            println!("{}", console::style("Bookmarked").yellow());
        }

        if !snippet.description.is_empty() {
            println!("\n{}", snippet.description);
        }

        if !snippet.tags.is_empty() {
            let tags = snippet
                .tags
                .iter()
                .map(|tag| format!("#{}", tag))
                .collect::<Vec<_>>()
                .join(" ");

            println!("Tags: {}", console::style(tags).cyan());
        }

        println!("{}", "-".repeat(term_width.min(50)));
        println!("{}", snippet.code);
    }

    /// Display snippets in the requested format
    fn display_snippets(&self, snippets: &[Snippet], json: bool, brief: bool) -> Result<()> {
        if snippets.is_empty() {
            println!("No snippets found matching the criteria.");
            return Ok(());
        }

        if json {
            self.display_snippets_json(snippets, !brief)?;
        } else {
            self.display_snippets_text(snippets, !brief)?;
        }

        // Print count at the end
        println!(
            "\nFound {} snippet{}",
            snippets.len(),
            if snippets.len() == 1 { "" } else { "s" }
        );

        Ok(())
    }

    /// Display snippets in JSON format
    fn display_snippets_json(&self, snippets: &[Snippet], detailed: bool) -> Result<()> {
        if detailed {
            // Full snippets with all fields
            println!("{}", serde_json::to_string_pretty(snippets)?);
        } else {
            // Simplified records with just the browsing fields
            let simplified: Vec<serde_json::Value> = snippets
                .iter()
                .map(|snippet| {
                    serde_json::json!({
                        "id": snippet.id,
                        "title": snippet.title,
                        "language": snippet.language,
                        "tags": snippet.tags,
                        "bookmarked": snippet.bookmarked,
                        "createdAt": snippet.created_at,
                    })
                })
                .collect();

            println!("{}", serde_json::to_string_pretty(&simplified)?);
        }

        Ok(())
    }

    /// Display snippets in text format
    fn display_snippets_text(&self, snippets: &[Snippet], detailed: bool) -> Result<()> {
        // Use terminal width for formatting if available
        let term_width = terminal_size::terminal_size()
            .map(|(w, _)| w.0 as usize)
            .unwrap_or(80);

        for (i, snippet) in snippets.iter().enumerate() {
            // Add separator between snippets (except before the first)
            if i > 0 {
                println!("{}", "-".repeat(term_width.min(50)));
            }

            let created_at = snippet.created_at.format("%Y-%m-%d %H:%M");
            let marker = if snippet.bookmarked { " *" } else { "" };

            println!(
                "ID: {} | {} | Created: {}",
                snippet.id, snippet.language, created_at
            );
            println!("Title: {}{}", console::style(&snippet.title).bold(), marker);

            if !snippet.tags.is_empty() {
                let tags = snippet
                    .tags
                    .iter()
                    .map(|tag| format!("#{}", tag))
                    .collect::<Vec<_>>()
                    .join(" ");

                println!("Tags: {}", console::style(tags).cyan());
            }

            if detailed {
                if self.verbose {
                    println!("\n{}", snippet.code);
                } else {
                    let preview =
                        self.get_code_preview(&snippet.code, term_width.saturating_sub(4).max(20));
                    if !preview.is_empty() {
                        println!("\n{}", preview);
                    }
                }
            }
        }

        Ok(())
    }

    /// First non-empty line of the code, clamped to the given width
    fn get_code_preview(&self, code: &str, max_len: usize) -> String {
        let first_line = code
            .lines()
            .find(|line| !line.trim().is_empty())
            .unwrap_or("");

        if first_line.chars().count() <= max_len {
            first_line.to_string()
        } else {
            let clipped: String = first_line.chars().take(max_len).collect();
            format!("{}...", clipped)
        }
    }
}
