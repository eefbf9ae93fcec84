use std::path::PathBuf;

use yang_db::Compiler;

use crate::error::CliError;
use crate::utils::resolve_root;

pub fn handle_check(root: Option<PathBuf>) -> Result<(), CliError> {
    let project_root = resolve_root(root)?;
    log::info!("checking project at {}", project_root.display());

    let compiler = Compiler::new(project_root)?;
    let compilation = compiler.check()?;

    println!(
        "Checked {} modules ({} from dependencies), {} references resolved",
        compilation.sources.len(),
        compilation.dependencies.len(),
        compilation.report.resolved
    );
    Ok(())
}
