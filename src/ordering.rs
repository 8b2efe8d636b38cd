// ============================================================================
// Ordering : les setups "hot" passent devant
// ============================================================================
// Partition en deux groupes (hot, puis le reste) via un tri par comparaison.
//
// CONCEPT RUST : slice::sort_by est STABLE
// - Deux éléments jugés égaux (Ordering::Equal) ne changent jamais d'ordre
// - Le comparateur retourne Equal dès que les deux ont le même is_hot,
//   donc l'ordre d'entrée est conservé à l'intérieur de chaque groupe
// - Ne pas remplacer par sort_unstable_by : l'ordre deviendrait arbitraire
// ============================================================================

use std::cmp::Ordering;

use crate::models::Setup;

/// Comparateur hot-first : Equal si même priorité, sinon le hot d'abord
pub fn hot_first(a: &Setup, b: &Setup) -> Ordering {
    match (a.is_hot, b.is_hot) {
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        _ => Ordering::Equal,
    }
}

/// Trie la liste pour que tous les setups hot précèdent les autres
///
/// CONCEPT RUST : Ownership
/// - Prend le Vec par valeur, le trie en place, le rend
/// - Aucune copie des Setup
pub fn order_hot_first(mut setups: Vec<Setup>) -> Vec<Setup> {
    setups.sort_by(hot_first);
    setups
}

// ============================================================================
// Tests
// ============================================================================
