use clap::{Args as ClapArgs, Parser, Subcommand};
use jne_core::{DocumentStore, EditOpts, EditSession, FileStore, MemoryMirror, Mode, Path};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "jne-cli",
    about = "View and edit JSON nodes by path",
    version
)]
struct Cli {
    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Subcommand, Debug)]
enum Cmd {
    /// Print the value at JSON pointer (null when missing or unparsable)
    Get(GetArgs),
    /// Print the $["key"][0] label for a JSON pointer
    Path(PathArgs),
    /// Set value (raw JSON) at JSON pointer; prints or writes with --out
    Set(SetArgs),
    /// Interactive view/edit/save session over stdin
    Session(SessionArgs),
}

#[derive(ClapArgs, Debug)]
struct GetArgs {
    /// JSON file to read
    path: PathBuf,
    /// JSON Pointer, e.g. /customer/0/name
    #[arg(long, default_value = "")]
    ptr: String,
    /// Spaces per indentation level
    #[arg(long, default_value_t = 2)]
    indent: usize,
}

#[derive(ClapArgs, Debug)]
struct PathArgs {
    /// JSON Pointer, e.g. /customer/0/name
    #[arg(long, default_value = "")]
    ptr: String,
}

#[derive(ClapArgs, Debug)]
struct SetArgs {
    /// JSON file to read
    path: PathBuf,
    /// JSON Pointer, e.g. /customer/0/name
    #[arg(long, default_value = "")]
    ptr: String,
    /// New value as raw JSON (e.g., 123, true, "str", {"a":1})
    #[arg(long)]
    value: String,
    /// Optional output .json path to write; otherwise prints to stdout
    #[arg(long)]
    out: Option<PathBuf>,
    /// Spaces per indentation level
    #[arg(long, default_value_t = 2)]
    indent: usize,
}

#[derive(ClapArgs, Debug)]
struct SessionArgs {
    /// JSON file to edit in place
    path: PathBuf,
    /// Second file that receives every committed document
    #[arg(long)]
    mirror: Option<PathBuf>,
    /// Keep a timestamped .bak copy before each save
    #[arg(long, default_value_t = false)]
    backup: bool,
    /// Spaces per indentation level
    #[arg(long, default_value_t = 2)]
    indent: usize,
}

fn main() {
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Cmd::Get(a) => cmd_get(a),
        Cmd::Path(a) => cmd_path(a),
        Cmd::Set(a) => cmd_set(a),
        Cmd::Session(a) => cmd_session(a),
    }
}

fn cmd_get(args: GetArgs) {
    let text = std::fs::read_to_string(&args.path).unwrap_or_else(|e| {
        eprintln!("error: {}", e);
        std::process::exit(2);
    });
    let opts = EditOpts {
        indent: args.indent,
        ..Default::default()
    };
    let ptr = parse_ptr(&args.ptr);
    println!("{}", jne_core::resolve_with(&text, &ptr, &opts));
}

fn cmd_path(args: PathArgs) {
    println!("{}", parse_ptr(&args.ptr));
}

fn cmd_set(args: SetArgs) {
    let opts = EditOpts {
        indent: args.indent,
        ..Default::default()
    };
    let ptr = parse_ptr(&args.ptr);
    let text = std::fs::read_to_string(&args.path).unwrap_or_else(|e| {
        eprintln!("error: {}", e);
        std::process::exit(2);
    });
    let doc = jne_core::Document::parse(&text).unwrap_or_else(|e| {
        eprintln!("invalid JSON in {}: {}", args.path.display(), e);
        std::process::exit(2);
    });
    let updated = jne_core::assign_text(doc.value(), &ptr, &args.value)
        .unwrap_or_else(|e| {
            match e {
                jne_core::EditError::Parse(_) => {
                    eprintln!("invalid --value JSON: {}", e);
                    std::process::exit(3);
                }
                _ => {
                    eprintln!("error: {}", e);
                    std::process::exit(4);
                }
            }
        });
    let out_text = jne_core::to_pretty(&updated, opts.indent);
    if let Some(out) = args.out {
        FileStore::new(out).set_text(&out_text).unwrap_or_else(|e| {
            eprintln!("error writing: {}", e);
            std::process::exit(5);
        });
    } else {
        println!("{}", out_text);
    }
}

fn parse_ptr(ptr: &str) -> Path {
    Path::from_pointer(ptr).unwrap_or_else(|e| {
        eprintln!("error: {}", e);
        std::process::exit(3);
    })
}

fn cmd_session(args: SessionArgs) {
    let opts = EditOpts {
        indent: args.indent,
        backup_on_save: args.backup,
    };
    if !args.path.is_file() {
        eprintln!("not found: {}", args.path.display());
        std::process::exit(2);
    }
    let store = FileStore::new(&args.path).with_backup(opts.backup_on_save);
    match args.mirror {
        Some(m) => run_session(EditSession::new(store, FileStore::new(m), opts)),
        None => run_session(EditSession::new(store, MemoryMirror::default(), opts)),
    }
}

const SESSION_HELP: &str = "commands: select [<pointer>] | show | path | edit | draft <json> | save | cancel | status | quit";

fn run_session<M: jne_core::MirrorStore>(mut session: EditSession<FileStore, M>) {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    for line in stdin.lock().lines() {
        let line = match line {
            Ok(l) => l,
            Err(e) => {
                eprintln!("error: {}", e);
                std::process::exit(2);
            }
        };
        let line = line.trim();
        let (cmd, rest) = line.split_once(' ').unwrap_or((line, ""));
        let rest = rest.trim();
        match cmd {
            "" => continue,
            "select" => {
                if rest.is_empty() {
                    session.select(None);
                } else {
                    match Path::from_pointer(rest) {
                        Ok(p) => session.select(Some(p)),
                        Err(e) => {
                            println!("error: {}", e);
                            continue;
                        }
                    }
                }
                println!("{}", session.path_label());
            }
            "show" => match session.mode() {
                Mode::Viewing => println!("{}", session.view_text()),
                Mode::Editing => println!("{}", session.draft()),
            },
            "path" => println!("{}", session.path_label()),
            "edit" => {
                session.begin_edit();
                println!("{}", session.draft());
            }
            "draft" => {
                if let Err(e) = session.set_draft(rest) {
                    println!("error: {}", e);
                }
            }
            "save" => match session.save() {
                Ok(()) => println!("saved {}", session.path_label()),
                Err(e) => println!("error: {}", e),
            },
            "cancel" => match session.cancel() {
                Ok(()) => println!("{}", session.draft()),
                Err(e) => println!("error: {}", e),
            },
            "status" => {
                println!(
                    "{}\t{}{}",
                    session.mode().as_str(),
                    session.path_label(),
                    session.error().map(|e| format!("\terror: {}", e)).unwrap_or_default()
                );
            }
            "help" => println!("{}", SESSION_HELP),
            "quit" | "exit" => break,
            other => println!("unknown command: {} ({})", other, SESSION_HELP),
        }
        stdout.flush().ok();
    }
}
