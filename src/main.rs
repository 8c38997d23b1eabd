use clap::Parser;
use log::info;

use snipstash::{App, Cli, Config, SnippetStore};

pub fn initialize_logger(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp_secs()
        .format_module_path(true)
        .init();

    info!("Logger initialized");
}

fn main() {
    let cli = Cli::parse();

    initialize_logger(cli.verbose);
    info!("Application starting up");

    let mut config = Config::default();
    if let Some(data_file) = cli.data_file {
        config.data_file = data_file;
    }
    if let Some(editor) = cli.editor {
        config.editor_command = Some(editor);
    }

    let result = SnippetStore::open(config.clone())
        .map(|store| App::new(store, config, cli.verbose))
        .and_then(|mut app| app.run(cli.command));

    if let Err(e) = result {
        eprintln!("{} {}", console::style("error:").red().bold(), e);
        std::process::exit(1);
    }
}
