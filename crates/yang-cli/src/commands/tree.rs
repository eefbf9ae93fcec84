use std::path::PathBuf;

use yang_db::{render_tree, Compiler};

use crate::error::CliError;
use crate::utils::resolve_root;

/// Prints the resolved data tree of every module, or only of `module`.
pub fn handle_tree(root: Option<PathBuf>, module: Option<String>) -> Result<(), CliError> {
    let compiler = Compiler::new(resolve_root(root)?)?;
    let compilation = compiler.check()?;
    let order = compilation.emission_order();

    let selected: Vec<_> = match &module {
        Some(name) => order
            .iter()
            .copied()
            .filter(|root| compilation.graph.node(*root).name == *name)
            .collect(),
        None => order.clone(),
    };
    if let (Some(name), true) = (module, selected.is_empty()) {
        let available: Vec<&str> = order
            .iter()
            .map(|root| compilation.graph.node(*root).name.as_str())
            .collect();
        return Err(CliError::UnknownModule {
            name,
            available: available.join(", "),
        });
    }

    for root in selected {
        print!("{}", render_tree(&compilation.graph, root));
    }
    Ok(())
}
