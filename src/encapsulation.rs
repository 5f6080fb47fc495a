use crate::manifest::{EncapsulationMode, ModuleRecord};

/// Evaluation order of the vote. On equal counts the earlier entry wins.
const PRIORITY: [EncapsulationMode; 3] = [
    EncapsulationMode::None,
    EncapsulationMode::Scoped,
    EncapsulationMode::Shadow,
];

fn bucket(mode: EncapsulationMode) -> usize {
    match mode {
        EncapsulationMode::None => 0,
        EncapsulationMode::Scoped => 1,
        EncapsulationMode::Shadow => 2,
    }
}

/// Returns the encapsulation mode most modules in the group use.
///
/// Every module votes, styled or not. Ties resolve `None`, then `Scoped`,
/// then `Shadow`. Returns `None` for an empty group.
pub fn primary_encapsulation(modules: &[ModuleRecord]) -> Option<EncapsulationMode> {
    let mut counts = [0usize; 3];
    for module in modules {
        counts[bucket(module.encapsulation)] += 1;
    }

    let mut winner: Option<(EncapsulationMode, usize)> = None;
    for mode in PRIORITY {
        let count = counts[bucket(mode)];
        if count == 0 {
            continue;
        }
        match winner {
            Some((_, best)) if count <= best => {}
            _ => winner = Some((mode, count)),
        }
    }

    winner.map(|(mode, _)| mode)
}
