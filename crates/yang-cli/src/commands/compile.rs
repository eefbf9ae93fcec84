use std::path::PathBuf;

use yang_db::{Compiler, TreeWriter};

use crate::error::CliError;
use crate::utils::resolve_root;

/// Command line settings that take precedence over `yang.toml`.
#[derive(Debug, Clone, Default)]
pub struct CompileOverrides {
    pub model_id: Option<String>,
    pub code_gen_dir: Option<PathBuf>,
    pub metadata_dir: Option<PathBuf>,
}

pub fn handle_compile(root: Option<PathBuf>, overrides: CompileOverrides) -> Result<(), CliError> {
    let project_root = resolve_root(root)?;
    log::info!("compiling project at {}", project_root.display());

    let mut compiler = Compiler::new(project_root)?;
    let settings = &mut compiler.config_mut().compiler;
    if let Some(model_id) = overrides.model_id {
        settings.model_id = model_id;
    }
    if let Some(dir) = overrides.code_gen_dir {
        settings.code_gen_dir = dir;
    }
    if let Some(dir) = overrides.metadata_dir {
        settings.metadata_gen_dir = dir;
    }

    let mut writer = TreeWriter::new(compiler.code_gen_dir());
    let summary = compiler.compile(&mut writer)?;

    println!(
        "Compiled {} modules in {} linking passes",
        summary.modules, summary.report.passes
    );
    println!("Model manifest: {}", summary.manifest.display());
    Ok(())
}
