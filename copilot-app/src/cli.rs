use crate::config::DEFAULT_CONFIG_FILE;
use clap::{Parser, Subcommand, ValueEnum};
use copilot_tools::{CommandRequest, EditorCommand, FindFilesRequest, Script, ViewRange};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "copilot")]
#[command(about = "Run codebase tools against a remote project workspace", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file (YAML)
    #[arg(short, long, global = true, default_value = DEFAULT_CONFIG_FILE)]
    pub config: PathBuf,

    /// Workspace base URL, overrides config and environment
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Bearer token, overrides config and environment
    #[arg(long, global = true)]
    pub token: Option<String>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Find files by extension
    FindFiles {
        /// Directory to search, relative to project root
        #[arg(long)]
        dir: String,

        /// Extension to match (repeatable)
        #[arg(long = "suffix", required = true)]
        suffixes: Vec<String>,

        /// Directory to skip (repeatable)
        #[arg(long = "exclude")]
        exclude_dirs: Vec<String>,
    },

    /// View one file (--path) or several (--paths)
    View {
        #[arg(long)]
        path: Option<String>,

        #[arg(long, num_args = 1..)]
        paths: Vec<String>,

        /// Line window; END of -1 reads to end of file
        #[arg(long, num_args = 2, value_names = ["START", "END"], allow_negative_numbers = true)]
        range: Option<Vec<i64>>,
    },

    /// Create a file
    Create {
        #[arg(long)]
        path: String,

        #[arg(long)]
        file_text: String,
    },

    /// Replace one occurrence of a string in a file
    StrReplace {
        #[arg(long)]
        path: String,

        #[arg(long)]
        old_str: String,

        #[arg(long)]
        new_str: String,
    },

    /// Insert text after a 1-based line
    Insert {
        #[arg(long)]
        path: String,

        #[arg(long)]
        line: u32,

        #[arg(long)]
        new_str: String,
    },

    /// Undo the last edit to a file
    UndoEdit {
        #[arg(long)]
        path: String,
    },

    /// Run an npm script in the project root
    RunScript {
        #[arg(value_enum)]
        script: ScriptArg,
    },

    /// Print the model-facing tool schemas
    Tools,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScriptArg {
    Lint,
    Format,
}

impl From<ScriptArg> for Script {
    fn from(arg: ScriptArg) -> Self {
        match arg {
            ScriptArg::Lint => Script::Lint,
            ScriptArg::Format => Script::Format,
        }
    }
}

impl Commands {
    /// The workspace command to send, or `None` for local-only commands.
    pub fn into_request(self) -> Option<CommandRequest> {
        let request = match self {
            Commands::FindFiles {
                dir,
                suffixes,
                exclude_dirs,
            } => CommandRequest::FindFiles(
                FindFilesRequest::new(dir, suffixes).excluding(exclude_dirs),
            ),
            Commands::View { path, paths, range } => {
                let mut command = EditorCommand::view_many(paths);
                command.path = path;
                if let Some([start, end]) = range.as_deref() {
                    command = command.with_view_range(ViewRange::new(*start, *end));
                }
                CommandRequest::Editor(command)
            }
            Commands::Create { path, file_text } => {
                CommandRequest::Editor(EditorCommand::create(path, file_text))
            }
            Commands::StrReplace {
                path,
                old_str,
                new_str,
            } => CommandRequest::Editor(EditorCommand::str_replace(path, old_str, new_str)),
            Commands::Insert {
                path,
                line,
                new_str,
            } => CommandRequest::Editor(EditorCommand::insert(path, line, new_str)),
            Commands::UndoEdit { path } => CommandRequest::Editor(EditorCommand::undo_edit(path)),
            Commands::RunScript { script } => CommandRequest::RunScript(script.into()),
            Commands::Tools => return None,
        };
        Some(request)
    }
}
