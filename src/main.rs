use std::{
    fs::read_to_string,
    path::{Path, PathBuf},
    process::exit,
    sync::Arc,
    time::Instant,
};

use clap::{Parser, Subcommand};
use vnnlib::{
    config::{BuildOptions, LiteralPolicy},
    errors::errors::{Error, ErrorImpl},
    lexer::lexer::tokenize,
    parser::parser::parse,
    render_error,
    type_checker::type_checker::type_check,
    Position,
};

#[derive(Parser)]
#[command(name = "vnnlib")]
#[command(about = "Type checker for VNN-LIB property specifications")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check a query and print every semantic error
    Check {
        /// The file to check
        file: PathBuf,

        /// What to do with comparisons of literals only: keep, reject or an element type
        #[arg(long, default_value_t = LiteralPolicy::Keep)]
        literal_policy: LiteralPolicy,
    },

    /// Print the typed tree, followed by any errors
    Dump {
        /// The file to build
        file: PathBuf,

        /// What to do with comparisons of literals only: keep, reject or an element type
        #[arg(long, default_value_t = LiteralPolicy::Keep)]
        literal_policy: LiteralPolicy,
    },
}

fn main() {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let (file, literal_policy, dump) = match cli.command {
        Commands::Check { file, literal_policy } => (file, literal_policy, false),
        Commands::Dump { file, literal_policy } => (file, literal_policy, true),
    };

    exit(run(&file, literal_policy, dump));
}

fn run(path: &Path, literal_policy: LiteralPolicy, dump: bool) -> i32 {
    let file_name = path.display().to_string();
    let file = Arc::new(file_name.clone());
    let options = BuildOptions::default()
        .with_literal_policy(literal_policy)
        .with_file_name(file_name.clone());

    let start = Instant::now();

    let content = match read_to_string(path) {
        Ok(content) => content,
        Err(error) => {
            let error = Error::new(
                ErrorImpl::FileReadError {
                    path: file_name,
                    message: error.to_string(),
                },
                Position(0, file),
            );
            eprintln!("Error: {}", error);
            return 2;
        }
    };

    let tokens = match tokenize(&content, Arc::clone(&file)) {
        Ok(tokens) => tokens,
        Err(error) => return display_error(&error, &content, &file_name),
    };

    tracing::info!("Tokenized in {:?}", start.elapsed());

    let parse_start = Instant::now();
    let ast = match parse(tokens, Arc::clone(&file)) {
        Ok(ast) => ast,
        Err(error) => return display_error(&error, &content, &file_name),
    };

    tracing::info!("Parsed in {:?}", parse_start.elapsed());

    let type_check_start = Instant::now();
    let (query, diagnostics) = type_check(&ast, &options);

    tracing::info!("Type checked in {:?}", type_check_start.elapsed());
    tracing::info!("Total time: {:?}", start.elapsed());

    if dump {
        println!("{}", query);
    }

    if diagnostics.is_empty() {
        0
    } else {
        print!("{}", diagnostics.report(&content, &file_name));
        1
    }
}

fn display_error(error: &Error, content: &str, file_name: &str) -> i32 {
    eprint!("{}", render_error(error, content, file_name));
    2
}
