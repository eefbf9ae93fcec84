use std::path::PathBuf;

use clap::Parser;
use clap_verbosity_flag::{Verbosity, WarnLevel};

mod commands;
mod error;
mod utils;

use commands::CompileOverrides;

#[derive(Parser, Debug)]
#[command(name = "yangc")]
#[command(about = "YANG schema compiler", long_about = None)]
struct Args {
    #[command(flatten)]
    verbose: Verbosity<WarnLevel>,

    #[clap(subcommand)]
    command: Command,
}

#[derive(clap::Subcommand, Debug)]
enum Command {
    /// Parse and link a project, write snapshots, manifest and schema trees
    Compile {
        /// Project directory (defaults to the one enclosing the working directory)
        #[arg(short, long, value_name = "DIR")]
        root: Option<PathBuf>,
        /// Model identifier written into the manifest
        #[arg(long, value_name = "ID")]
        model_id: Option<String>,
        /// Directory receiving the emitted schema trees
        #[arg(short, long, value_name = "DIR")]
        out_dir: Option<PathBuf>,
        /// Directory receiving snapshots and the model manifest
        #[arg(short, long, value_name = "DIR")]
        metadata_dir: Option<PathBuf>,
    },

    /// Parse and link a project without writing anything
    Check {
        /// Project directory
        #[arg(short, long, value_name = "DIR")]
        root: Option<PathBuf>,
    },

    /// Print the resolved data tree
    Tree {
        /// Project directory
        #[arg(short, long, value_name = "DIR")]
        root: Option<PathBuf>,
        /// Only print this module
        #[arg(value_name = "MODULE")]
        module: Option<String>,
    },
}

fn main() -> miette::Result<()> {
    let args = Args::parse();

    env_logger::Builder::new()
        .filter_level(args.verbose.log_level_filter())
        .format_timestamp(None)
        .init();

    match args.command {
        Command::Compile {
            root,
            model_id,
            out_dir,
            metadata_dir,
        } => commands::handle_compile(
            root,
            CompileOverrides {
                model_id,
                code_gen_dir: out_dir,
                metadata_dir,
            },
        )?,
        Command::Check { root } => commands::handle_check(root)?,
        Command::Tree { root, module } => commands::handle_tree(root, module)?,
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_arguments_are_consistent() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_compile_flags_override() {
        let args = Args::parse_from([
            "yangc",
            "-v",
            "compile",
            "--root",
            "proj",
            "--model-id",
            "org.example",
            "-o",
            "gen",
        ]);
        assert_eq!(args.verbose.log_level_filter(), log::LevelFilter::Info);
        match args.command {
            Command::Compile {
                root,
                model_id,
                out_dir,
                metadata_dir,
            } => {
                assert_eq!(root, Some(PathBuf::from("proj")));
                assert_eq!(model_id.as_deref(), Some("org.example"));
                assert_eq!(out_dir, Some(PathBuf::from("gen")));
                assert_eq!(metadata_dir, None);
            }
            other => panic!("parsed {other:?}"),
        }
    }

    #[test]
    fn test_tree_takes_an_optional_module() {
        let args = Args::parse_from(["yangc", "tree", "ietf-interfaces"]);
        assert!(matches!(
            args.command,
            Command::Tree { root: None, module: Some(ref m) } if m == "ietf-interfaces"
        ));
    }
}
