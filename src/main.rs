// interp-farm: Forth and Prolog engines with a terminal REPL

use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Mutex;

use clap::Parser as ClapParser;
use crossterm::{
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing::info;
use tracing_subscriber::EnvFilter;

use interp_farm::config::Limits;
use interp_farm::output::Channel;
use interp_farm::session::{Language, Session};
use interp_farm::ui::App;

#[derive(ClapParser)]
#[command(name = "farm")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Forth and Prolog interpreters with a terminal REPL", long_about = None)]
struct Args {
    /// Program to run in batch mode (starts the REPL if omitted)
    file: Option<PathBuf>,

    /// Language: forth or prolog (guessed from the file extension otherwise)
    #[arg(short, long)]
    lang: Option<Language>,

    /// Maximum nesting of user words / predicate calls
    #[arg(long, value_name = "N")]
    max_depth: Option<usize>,

    /// Maximum goal resolutions per Prolog query
    #[arg(long, value_name = "N")]
    max_steps: Option<usize>,

    /// Write tracing logs to this file (REPL mode)
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,

    /// Print diagnostic output to stderr (batch mode)
    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    fn limits(&self) -> Limits {
        let mut limits = Limits::default();
        if let Some(depth) = self.max_depth {
            limits = limits.with_max_call_depth(depth).with_max_proof_depth(depth);
        }
        if let Some(steps) = self.max_steps {
            limits = limits.with_max_proof_steps(steps);
        }
        limits
    }

    fn language(&self) -> Language {
        if let Some(lang) = self.lang {
            return lang;
        }
        self.file
            .as_deref()
            .and_then(Path::extension)
            .and_then(|ext| ext.to_str())
            .and_then(|ext| ext.parse().ok())
            .unwrap_or_default()
    }
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("interp_farm=info"))
}

fn main() -> ExitCode {
    let args = Args::parse();

    let result = match &args.file {
        Some(path) => run_batch(&args, path),
        None => run_repl(&args),
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

/// Execute a program file line by line
fn run_batch(args: &Args, path: &Path) -> Result<ExitCode, Box<dyn std::error::Error>> {
    // Set up logging
    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(io::stderr)
        .init();

    let source = fs::read_to_string(path)
        .map_err(|e| format!("cannot read '{}': {}", path.display(), e))?;
    let language = args.language();
    info!(file = %path.display(), %language, "running program");

    let mut session = Session::with_limits(args.limits());
    let report = session.run_program(language, &source);

    for line in &report.output {
        match line.channel {
            Channel::Log => println!("{}", line.text),
            Channel::Debug if args.verbose => eprintln!("[debug] {}", line.text),
            Channel::Debug => {}
        }
    }

    match report.stopped_at {
        Some(line) => {
            eprintln!("Stopped at line {} of {}", line, path.display());
            Ok(ExitCode::FAILURE)
        }
        None => Ok(ExitCode::SUCCESS),
    }
}

/// Start the interactive terminal UI
fn run_repl(args: &Args) -> Result<ExitCode, Box<dyn std::error::Error>> {
    // Logs would corrupt the screen, so they only go to a file
    if let Some(path) = &args.log_file {
        let file = File::create(path)?;
        tracing_subscriber::fmt()
            .with_env_filter(env_filter())
            .with_ansi(false)
            .with_writer(Mutex::new(file))
            .init();
    }
    info!("starting REPL");

    // Set up terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Create and run app
    let mut app = App::new(Session::with_limits(args.limits()), args.language());
    let res = app.run(&mut terminal);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    res?;
    Ok(ExitCode::SUCCESS)
}
