//! # Resolução de Conflitos
//!
//! Recebe uma lista não ordenada de casamentos e devolve um subconjunto ordenado
//! canonicamente por `(start, end)`, segundo uma de três políticas.
//!
//! ## Estratégias
//!
//! ```text
//! spans:  [0,3) [0,5) [2,4) [6,9)
//!
//! ALL:    [0,3) [0,5) [2,4) [6,9)     nada é removido
//! MAX:    [0,5) [6,9)                 o mais longo em cada início, da esquerda p/ direita
//! MIN:    [0,3) [2,4) [6,9)           os mais curtos; nenhum span contém outro
//! ```
//!
//! São políticas **locais e gulosas**, definidas pela ordem de varredura abaixo,
//! e não uma seleção ótima de intervalos. MAX varre da esquerda; MIN varre da
//! direita.

use tracing::trace;

use crate::config::ConflictStrategy;
use crate::span::Spanned;

/// Ordena canonicamente e aplica a estratégia.
///
/// A ordenação é estável: casamentos com o mesmo span mantêm a ordem de chegada.
pub fn resolve<T: Spanned>(mut items: Vec<T>, strategy: ConflictStrategy) -> Vec<T> {
    items.sort_by_key(|item| {
        let span = item.span();
        (span.start, span.end)
    });

    let before = items.len();
    let resolved = match strategy {
        ConflictStrategy::All => items,
        ConflictStrategy::Max => resolve_max(items),
        ConflictStrategy::Min => resolve_min(items),
    };
    trace!(%strategy, before, after = resolved.len(), "conflitos resolvidos");
    resolved
}

/// MAX: a cadeia gulosa de casamentos mais longos.
///
/// 1. Entre os spans com o menor `start`, fica apenas o de maior `end`.
/// 2. Varrendo para a frente, um span é mantido se seu `end` supera estritamente o
///    `end` do último mantido **e** seu `start` difere do `start` do próximo span
///    (empates de início sempre perdem para o candidato seguinte).
/// 3. O último span é mantido se seu `end` supera o do último mantido.
fn resolve_max<T: Spanned>(items: Vec<T>) -> Vec<T> {
    if items.len() < 2 {
        return items;
    }

    let starts: Vec<usize> = items.iter().map(Spanned::start).collect();
    let n = items.len();

    let mut first = 0;
    while first < n - 1 && starts[0] == starts[first + 1] {
        first += 1;
    }

    let mut kept = Vec::new();
    let mut last_end = 0;
    for (i, item) in items.into_iter().enumerate() {
        let keep = if i < first {
            false
        } else if i == first {
            true
        } else if i < n - 1 {
            item.end() > last_end && starts[i] != starts[i + 1]
        } else {
            item.end() > last_end
        };
        if keep {
            last_end = item.end();
            kept.push(item);
        }
    }
    kept
}

/// MIN: os casamentos mais curtos, sem contenção.
///
/// 1. Spans finais que compartilham o `start` do anterior são descartados.
/// 2. Varrendo da direita para a esquerda, um span interior cai se compartilha o
///    `start` do vizinho à esquerda ou se seu `end` é `>=` ao `end` do vizinho
///    sobrevivente à direita (isto é, ele contém o vizinho).
/// 3. O primeiro span cai se seu `end` é `>=` ao do vizinho sobrevivente.
///
/// Implementado em uma única passada com uma pilha de sobreviventes: o topo da
/// pilha é sempre o vizinho sobrevivente à direita.
fn resolve_min<T: Spanned>(mut items: Vec<T>) -> Vec<T> {
    if items.len() < 2 {
        return items;
    }

    while items.len() > 1 && items[items.len() - 1].start() == items[items.len() - 2].start() {
        items.pop();
    }

    let starts: Vec<usize> = items.iter().map(Spanned::start).collect();
    let n = items.len();

    // sobreviventes em ordem reversa
    let mut survivors: Vec<T> = Vec::with_capacity(n);
    for (i, item) in items.into_iter().enumerate().rev() {
        let keep = match survivors.last() {
            // o último span sempre sobrevive a esta etapa
            None => true,
            Some(right) if i == 0 => item.end() < right.end(),
            Some(right) => starts[i] != starts[i - 1] && item.end() < right.end(),
        };
        if keep {
            survivors.push(item);
        }
    }
    survivors.reverse();
    survivors
}
