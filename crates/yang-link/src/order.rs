use fxhash::FxHashMap;
use yang_schema::{NodeId, SchemaGraph};

/// Translated roots ordered so that every file comes after the files it
/// imports or includes. Ties keep the order the roots were added in.
///
/// Import cycles cannot be ordered; the files involved are appended at the
/// end in their original order.
pub fn emission_order(graph: &SchemaGraph) -> Vec<NodeId> {
    let roots: Vec<NodeId> = graph
        .roots()
        .iter()
        .copied()
        .filter(|root| {
            graph
                .node(*root)
                .module_info()
                .is_some_and(|info| info.to_translate)
        })
        .collect();
    let index: FxHashMap<NodeId, usize> = roots.iter().enumerate().map(|(i, r)| (*r, i)).collect();

    let mut dependents: Vec<Vec<usize>> = vec![vec![]; roots.len()];
    let mut pending: Vec<usize> = vec![0; roots.len()];
    for (i, root) in roots.iter().enumerate() {
        let Some(info) = graph.node(*root).module_info() else {
            continue;
        };
        let mut deps: Vec<usize> = info
            .imports
            .iter()
            .chain(info.includes.iter())
            .filter_map(|link| link.resolved)
            .filter_map(|dep| index.get(&dep).copied())
            .filter(|dep| *dep != i)
            .collect();
        deps.sort_unstable();
        deps.dedup();
        pending[i] = deps.len();
        for dep in deps {
            dependents[dep].push(i);
        }
    }

    let mut order = Vec::with_capacity(roots.len());
    let mut emitted = vec![false; roots.len()];
    while let Some(next) = (0..roots.len()).find(|i| !emitted[*i] && pending[*i] == 0) {
        emitted[next] = true;
        order.push(roots[next]);
        for dependent in &dependents[next] {
            pending[*dependent] -= 1;
        }
    }

    if order.len() < roots.len() {
        log::warn!(
            "{} files take part in an import cycle; emitting them unordered",
            roots.len() - order.len()
        );
        order.extend(
            roots
                .iter()
                .enumerate()
                .filter(|(i, _)| !emitted[*i])
                .map(|(_, root)| *root),
        );
    }
    order
}
