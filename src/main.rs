// listty: stepping list interpreter with execution-stack visualization

use std::fs;
use std::io;
use std::path::PathBuf;
use std::sync::Mutex;

use clap::Parser;
use crossterm::{
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing_subscriber::EnvFilter;

use listty::compiler::{CompileOptions, compile};
use listty::config::RuntimeConfig;
use listty::interpreter::engine::Runtime;
use listty::parser::parse_program;
use listty::ui::App;

#[derive(Parser, Debug)]
#[command(name = "listty", version, about)]
struct Args {
    /// Program to run
    file: PathBuf,

    /// Print program output to stdout instead of opening the TUI
    #[arg(long)]
    plain: bool,

    /// Also write the canonical program text to this path
    #[arg(long, value_name = "PATH")]
    emit: Option<PathBuf>,

    /// Maximum evaluation steps before the run is stopped
    #[arg(long, value_name = "N")]
    max_steps: Option<usize>,

    /// Snapshot history limit in megabytes
    #[arg(long, value_name = "N", default_value_t = 256)]
    snapshot_limit_mb: usize,

    /// Do not record history (implies --plain)
    #[arg(long)]
    no_record: bool,

    /// Log destination while the TUI is running
    #[arg(long, value_name = "PATH", default_value = "listty.log")]
    log_file: PathBuf,
}

impl Args {
    fn plain(&self) -> bool {
        self.plain || self.no_record
    }

    fn config(&self) -> RuntimeConfig {
        let mut config = RuntimeConfig::default()
            .with_snapshot_limit(self.snapshot_limit_mb.saturating_mul(1024 * 1024));
        if let Some(max_steps) = self.max_steps {
            config = config.with_max_steps(max_steps);
        }
        config.record = !self.no_record;
        config
    }
}

fn init_logging(args: &Args) -> io::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("listty=warn"));

    if args.plain() {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(io::stderr)
            .init();
    } else {
        // The TUI owns the terminal, so logs go to a file
        let log_file = fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&args.log_file)?;
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_ansi(false)
            .with_writer(Mutex::new(log_file))
            .init();
    }
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    init_logging(&args)?;

    if !args.file.exists() {
        eprintln!("Error: File '{}' not found", args.file.display());
        std::process::exit(1);
    }

    // Read source code
    let source = fs::read_to_string(&args.file)?;

    // Parse the source code (never fails; unrecognized text is skipped)
    eprintln!("Parsing {}...", args.file.display());
    let program = parse_program(&source);
    eprintln!(
        "Parsed successfully. Found {} top-level lists.",
        program.lists().len()
    );

    if let Some(path) = &args.emit {
        let options = CompileOptions {
            save_to_file: Some(path.clone()),
        };
        compile(&program, &options)?;
        eprintln!("Wrote {}", path.display());
    }

    // Run execution to build history
    let mut runtime = Runtime::new(args.config());
    eprintln!("Executing program...");
    let outcome = runtime.execute(program);
    match &outcome {
        Ok(()) => {
            eprintln!("Execution completed successfully.");
            eprintln!("Total snapshots: {}", runtime.total_snapshots());
        }
        Err(e) => {
            eprintln!("Runtime error: {}", e);
        }
    }

    if args.plain() {
        for line in runtime.output().get_output() {
            println!("{}", line);
        }
        if outcome.is_err() {
            std::process::exit(1);
        }
        return Ok(());
    }

    if outcome.is_err() {
        eprintln!("Entering TUI with partial execution history...");
    }

    // Rewind to the beginning for TUI
    runtime.rewind_to_start();

    // Set up terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Create and run app
    let mut app = App::new(runtime, source);
    let res = app.run(&mut terminal);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("Error: {:?}", err);
    }

    Ok(())
}
