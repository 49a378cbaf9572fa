//! yantra REPL: write a Yantrabhashi program line by line and check it.
//!
//! Lines typed at the prompt accumulate into a program buffer. Meta-commands
//! start with `/`:
//!
//! - `/check` validates the buffer and prints every diagnostic
//! - `/show`, `/clear` inspect and reset the buffer
//! - `/strict`, `/relaxed` switch how `ELAITHE` conditions are checked
//! - `/vars` lists the variables declared as of the last `/check`

pub mod check;

use std::fmt;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::BaseDirs;
use owo_colors::{OwoColorize, Stream};
use rustyline::error::ReadlineError;
use rustyline::history::DefaultHistory;
use rustyline::Editor;

use yantra_kernel::validator::{SymbolTable, Validator};
use yantra_kernel::{render_diagnostics, Strictness, ValidatorConfig};

/// What the REPL has to say about one input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// Informational text.
    Info(String),
    /// `/check` found nothing.
    Valid,
    /// `/check` output: rendered diagnostics.
    Invalid(String),
    Quit,
}

impl Reply {
    /// The reply with terminal colors, when stdout supports them.
    pub fn styled(&self) -> String {
        let plain = self.to_string();
        match self {
            Reply::Valid => plain
                .if_supports_color(Stream::Stdout, |t| t.green())
                .to_string(),
            Reply::Invalid(_) => plain
                .if_supports_color(Stream::Stdout, |t| t.red())
                .to_string(),
            Reply::Info(_) | Reply::Quit => plain,
        }
    }
}

impl fmt::Display for Reply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reply::Info(text) | Reply::Invalid(text) => f.write_str(text.trim_end()),
            Reply::Valid => f.write_str("✓ no diagnostics"),
            Reply::Quit => Ok(()),
        }
    }
}

/// REPL configuration and state.
pub struct Repl {
    buffer: Vec<String>,
    config: ValidatorConfig,
    /// Symbol table from the most recent `/check`.
    symbols: Option<SymbolTable>,
}

impl Repl {
    /// Create a new REPL with the default (strict) configuration.
    pub fn new() -> Self {
        Self::with_config(ValidatorConfig::default())
    }

    pub fn with_config(config: ValidatorConfig) -> Self {
        Self {
            buffer: Vec::new(),
            config,
            symbols: None,
        }
    }

    pub fn config(&self) -> ValidatorConfig {
        self.config
    }

    /// The buffered program.
    pub fn source(&self) -> String {
        self.buffer.join("\n")
    }

    /// Line number the next program line will get.
    pub fn next_line(&self) -> usize {
        self.buffer.len() + 1
    }

    /// Process a single line of input.
    ///
    /// Program lines are buffered verbatim, blank ones included, so line
    /// numbers in diagnostics match what was typed.
    pub fn process_line(&mut self, line: &str) -> Option<Reply> {
        let trimmed = line.trim();
        if trimmed.starts_with('/') {
            return Some(self.handle_meta_command(trimmed));
        }
        self.buffer.push(line.trim_end().to_string());
        None
    }

    /// Validate the buffer.
    pub fn check(&mut self) -> Reply {
        let source = self.source();
        let validator = Validator::with_config(self.config);
        let (diagnostics, symbols) = validator.validate_with_symbols(&source);
        self.symbols = Some(symbols);
        if diagnostics.is_empty() {
            Reply::Valid
        } else {
            Reply::Invalid(render_diagnostics(&source, &diagnostics))
        }
    }

    /// Handle a meta-command (starts with /).
    fn handle_meta_command(&mut self, cmd: &str) -> Reply {
        let command = cmd.split_whitespace().next().unwrap_or("");

        match command {
            "/quit" | "/q" | "/exit" => Reply::Quit,
            "/help" | "/h" | "/?" => Reply::Info(HELP_TEXT.to_string()),
            "/check" | "/c" => self.check(),
            "/show" | "/s" => Reply::Info(self.listing()),
            "/clear" => {
                self.buffer.clear();
                self.symbols = None;
                Reply::Info("Buffer cleared.".to_string())
            }
            "/strict" => self.set_strictness(Strictness::Strict),
            "/relaxed" => self.set_strictness(Strictness::Relaxed),
            "/vars" => Reply::Info(self.variables()),
            _ => Reply::Info(format!(
                "Unknown command: {command}\nType /help for available commands."
            )),
        }
    }

    fn set_strictness(&mut self, strictness: Strictness) -> Reply {
        self.config = self.config.with_strictness(strictness);
        Reply::Info(format!("Condition checking: {strictness}"))
    }

    fn listing(&self) -> String {
        if self.buffer.is_empty() {
            return "(buffer is empty)".to_string();
        }
        self.buffer
            .iter()
            .enumerate()
            .map(|(idx, line)| format!("{:>4} | {line}", idx + 1))
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn variables(&self) -> String {
        let Some(symbols) = &self.symbols else {
            return "(run /check first)".to_string();
        };
        if symbols.is_empty() {
            return "(no variables declared)".to_string();
        }
        let mut output = String::from("Variables:");
        for (name, ty) in symbols.entries() {
            output.push_str(&format!("\n  {name}: {ty}"));
        }
        output
    }
}

impl Default for Repl {
    fn default() -> Self {
        Self::new()
    }
}

const HELP_TEXT: &str = r#"yantra: Yantrabhashi checker

Commands:
  /help, /h, /?     Show this help
  /quit, /q, /exit  Exit the REPL
  /check, /c        Validate the program typed so far
  /show, /s         Print the program with line numbers
  /clear            Discard the program
  /strict           Check ELAITHE condition types (default)
  /relaxed          Accept any ELAITHE condition
  /vars             Variables declared as of the last /check

Language:
  PADAM x:ANKHE = 5;              Declare an integer
  PADAM s:VARTTAI = "hi";         Declare a string
  x = x + 1;                      Assign
  CHATIMPU(x);  CHEPPU(x);        Print / read
  ELAITHE (x > 3) [ ... ] ALAITHE [ ... ]
  MALLI-MALLI (PADAM i:ANKHE = 0; i < 10; i = i + 1) [ ... ]
"#;

/// Resolve the validator configuration for a run.
///
/// A config file, when given, replaces the `YANTRA_STRICTNESS` environment
/// variable; `relaxed` overrides both.
pub fn resolve_config(config_file: Option<&Path>, relaxed: bool) -> Result<ValidatorConfig> {
    let config = match config_file {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read config {}", path.display()))?;
            ValidatorConfig::from_json(&text)
                .with_context(|| format!("invalid config {}", path.display()))?
        }
        None => ValidatorConfig::from_env().context("invalid YANTRA_STRICTNESS")?,
    };

    Ok(if relaxed {
        config.with_strictness(Strictness::Relaxed)
    } else {
        config
    })
}

fn history_path() -> Option<PathBuf> {
    BaseDirs::new().map(|d| d.data_dir().join("yantra").join("history.txt"))
}

/// Run the REPL.
pub fn run(config: ValidatorConfig) -> Result<()> {
    println!("yantra v{} ({} mode)", env!("CARGO_PKG_VERSION"), config.strictness);
    println!("Type a program, /check to validate it, /help for commands.\n");

    let mut rl: Editor<(), DefaultHistory> = Editor::new().context("Failed to create editor")?;

    let history_path = history_path();
    if let Some(ref path) = history_path {
        if let Err(err) = rl.load_history(path) {
            tracing::debug!(%err, path = %path.display(), "no history loaded");
        }
    }

    let mut repl = Repl::with_config(config);

    loop {
        let prompt = format!("{:>3}> ", repl.next_line());

        match rl.readline(&prompt) {
            Ok(line) => {
                let _ = rl.add_history_entry(line.as_str());

                match repl.process_line(&line) {
                    Some(Reply::Quit) => break,
                    Some(reply) => println!("{}", reply.styled()),
                    None => {}
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("^C");
                continue;
            }
            Err(ReadlineError::Eof) => {
                println!("^D");
                break;
            }
            Err(err) => {
                eprintln!("Error: {err}");
                break;
            }
        }
    }

    if let Some(ref path) = history_path {
        if let Some(parent) = path.parent() {
            let _ = std::fs::create_dir_all(parent);
        }
        if let Err(err) = rl.save_history(path) {
            tracing::warn!(%err, path = %path.display(), "failed to save history");
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn program_lines_are_buffered() {
        let mut repl = Repl::new();
        assert_eq!(repl.process_line("PADAM a:ANKHE;"), None);
        assert_eq!(repl.process_line(""), None);
        assert_eq!(repl.process_line("CHATIMPU(a);   "), None);
        assert_eq!(repl.source(), "PADAM a:ANKHE;\n\nCHATIMPU(a);");
        assert_eq!(repl.next_line(), 4);
    }

    #[test]
    fn quit_and_unknown_commands() {
        let mut repl = Repl::new();
        assert_eq!(repl.process_line("/quit"), Some(Reply::Quit));
        let reply = repl.process_line("/frobnicate").map(|r| r.to_string());
        assert!(reply.is_some_and(|r| r.starts_with("Unknown command: /frobnicate")));
    }

    #[test]
    fn vars_before_and_after_check() {
        let mut repl = Repl::new();
        repl.process_line("PADAM b:VARTTAI;");
        repl.process_line("PADAM a:ANKHE;");
        assert_eq!(
            repl.process_line("/vars"),
            Some(Reply::Info("(run /check first)".into()))
        );
        assert_eq!(repl.process_line("/check"), Some(Reply::Valid));
        assert_eq!(
            repl.process_line("/vars"),
            Some(Reply::Info("Variables:\n  a: ANKHE\n  b: VARTTAI".into()))
        );
    }

    #[test]
    fn strictness_toggles() {
        let mut repl = Repl::new();
        repl.process_line("/relaxed");
        assert_eq!(repl.config().strictness, Strictness::Relaxed);
        repl.process_line("/strict");
        assert_eq!(repl.config().strictness, Strictness::Strict);
    }

    #[test]
    fn resolve_config_relaxed_flag_wins() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"strictness": "strict"}"#).expect("write config");

        let config = resolve_config(Some(&path), false).expect("config");
        assert_eq!(config.strictness, Strictness::Strict);
        let config = resolve_config(Some(&path), true).expect("config");
        assert_eq!(config.strictness, Strictness::Relaxed);

        std::fs::write(&path, r#"{"strictness": "lenient"}"#).expect("write config");
        assert!(resolve_config(Some(&path), false).is_err());
    }
}
