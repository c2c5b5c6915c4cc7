//! # Mapeamento de Offsets
//!
//! Traduz spans de bytes para três sistemas de coordenadas:
//!
//! 1. **Bytes** (`start`, `end`): como saem da busca.
//! 2. **Palavras brutas** (`wstart_raw`, `wend_raw`): índices na [`WordTable`]
//!    que delimitam o span.
//! 3. **Compactadas** (`wstart`, `cstart`): índices recalculados como se cada
//!    casamento ocupasse exatamente **uma** unidade. Um evento de duas palavras
//!    vira um único "slot"; tudo que vem depois é deslocado para a esquerda.
//!
//! ## Exemplo
//!
//! ```text
//! texto:     Arv kakskümmend viis on suurem kui seitse.
//! palavras:  0   1           2    3  4      5   6     7
//! eventos:       [---------------)                [----)
//! wstart_raw:    1                                6
//! wend_raw:      3                                7
//! wstart:        1                                5       (6 - 1 palavra absorvida)
//! cstart:        4                                20      (36 - 16 bytes absorvidos)
//! ```
//!
//! As coordenadas compactadas só são definidas quando **nenhum** par de eventos
//! se sobrepõe. Com sobreposição, elas ficam ausentes em todo o lote.

use serde::{Deserialize, Serialize};
use unicode_segmentation::UnicodeSegmentation;

use crate::error::{Result, TaggerError};
use crate::span::Spanned;

/// Offsets (em bytes) do início de cada palavra, em ordem crescente.
///
/// Fornecida pelo documento hospedeiro; o núcleo nunca a altera.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WordTable {
    starts: Vec<usize>,
}

impl WordTable {
    pub fn new(starts: Vec<usize>) -> Self {
        debug_assert!(
            starts.windows(2).all(|w| w[0] < w[1]),
            "a tabela de palavras deve ser estritamente crescente"
        );
        Self { starts }
    }

    /// Como [`new`](Self::new), mas rejeita tabelas fora de ordem estritamente
    /// crescente. Para tabelas vindas de fora do processo.
    pub fn try_new(starts: Vec<usize>) -> Result<Self> {
        if let Some(w) = starts.windows(2).find(|w| w[0] >= w[1]) {
            return Err(TaggerError::InvalidWordTable {
                previous: w[0],
                next: w[1],
            });
        }
        Ok(Self { starts })
    }

    /// Deriva a tabela segmentando o texto pelas fronteiras de palavra Unicode
    /// (UAX #29). Pontuação vira palavra própria; espaços são ignorados.
    ///
    /// `"kui seitse."` → `[0, 4, 10]` (`kui`, `seitse`, `.`).
    pub fn from_text(text: &str) -> Self {
        let starts = text
            .split_word_bound_indices()
            .filter(|(_, segment)| !segment.trim().is_empty())
            .map(|(start, _)| start)
            .collect();
        Self { starts }
    }

    pub fn starts(&self) -> &[usize] {
        &self.starts
    }

    pub fn len(&self) -> usize {
        self.starts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.starts.is_empty()
    }
}

impl From<Vec<usize>> for WordTable {
    fn from(starts: Vec<usize>) -> Self {
        Self::new(starts)
    }
}

/// Coordenadas de palavra calculadas para um span.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WordOffsets {
    /// Índice da palavra que contém `start`; o total de palavras se nenhuma contiver.
    pub wstart_raw: usize,
    /// Índice + 1 da palavra que contém o último byte; `None` se não resolvido.
    pub wend_raw: Option<usize>,
    /// Índice de palavra compactado (só em lotes sem sobreposição)
    pub wstart: Option<usize>,
    /// Offset de byte compactado (só em lotes sem sobreposição)
    pub cstart: Option<usize>,
}

/// Resumo de um lote mapeado.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MappingSummary {
    /// Algum par de eventos consecutivos se sobrepõe
    pub overlapping: bool,
    /// Total de palavras absorvidas pela compactação
    pub word_shift: usize,
    /// Total de bytes absorvidos pela compactação
    pub char_shift: usize,
}

/// Calcula as coordenadas de palavra para spans já resolvidos e ordenados por
/// `(start, end)`.
///
/// A busca na tabela avança com um marcador que nunca volta atrás, então o custo
/// total é O(|spans| + |palavras|) para lotes sem sobreposição.
pub fn map_offsets<T: Spanned>(items: &[T], table: &WordTable) -> (Vec<WordOffsets>, MappingSummary) {
    let words = table.starts();
    let n = words.len();

    let mut offsets = Vec::with_capacity(items.len());
    let mut bookmark = 0;
    let mut overlapping = false;
    let mut last_end = 0;

    for item in items {
        let span = item.span();
        if last_end > span.start {
            overlapping = true;
        }
        last_end = span.end;

        let mut off = WordOffsets {
            wstart_raw: n,
            ..WordOffsets::default()
        };
        for i in bookmark..n.saturating_sub(1) {
            if words[i] <= span.start && span.start < words[i + 1] {
                off.wstart_raw = i;
                bookmark = i;
            }
            if words[i] < span.end && span.end <= words[i + 1] {
                off.wend_raw = Some(i + 1);
                break;
            }
        }
        offsets.push(off);
    }

    let mut summary = MappingSummary {
        overlapping,
        ..MappingSummary::default()
    };
    if overlapping {
        return (offsets, summary);
    }

    for (off, item) in offsets.iter_mut().zip(items) {
        let span = item.span();

        off.wstart = Some(off.wstart_raw.saturating_sub(summary.word_shift));
        // um fim não resolvido não desloca as palavras seguintes; um início não
        // resolvido (antes da primeira palavra) daria deslocamento negativo, que satura em 0
        if let Some(wend) = off.wend_raw {
            summary.word_shift += wend.saturating_sub(off.wstart_raw + 1);
        }

        off.cstart = Some(span.start.saturating_sub(summary.char_shift));
        summary.char_shift += span.len() - 1;
    }

    (offsets, summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::span::Span;

    const TEXT: &str = "Arv kakskümmend viis on suurem kui seitse.";

    #[test]
    fn test_word_table_from_text() {
        let table = WordTable::from_text(TEXT);
        assert_eq!(table.starts(), &[0, 4, 17, 22, 25, 32, 36, 42]);
        assert!(WordTable::from_text("   ").is_empty());
    }

    #[test]
    fn test_example_sentence() {
        let table = WordTable::from_text(TEXT);
        let spans = vec![Span::new(4, 21), Span::new(36, 42)];
        let (offsets, summary) = map_offsets(&spans, &table);

        assert!(!summary.overlapping);
        assert_eq!(offsets[0].wstart_raw, 1);
        assert_eq!(offsets[0].wend_raw, Some(3));
        assert_eq!(offsets[1].wstart_raw, 6);
        assert_eq!(offsets[1].wend_raw, Some(7));

        assert_eq!(offsets[0].cstart, Some(4));
        assert_eq!(offsets[1].cstart, Some(20));
        assert_eq!(offsets[0].wstart, Some(1));
        assert_eq!(offsets[1].wstart, Some(5));

        assert_eq!(summary.word_shift, 1);
        assert_eq!(summary.char_shift, 16 + 5);
    }

    #[test]
    fn test_overlap_disables_compaction() {
        let table = WordTable::from_text(TEXT);
        let spans = vec![Span::new(4, 21), Span::new(17, 21), Span::new(36, 42)];
        let (offsets, summary) = map_offsets(&spans, &table);

        assert!(summary.overlapping);
        assert!(offsets.iter().all(|o| o.wstart.is_none() && o.cstart.is_none()));
        // as coordenadas brutas continuam calculadas
        assert_eq!(offsets[1].wstart_raw, 2);
        assert_eq!(offsets[1].wend_raw, Some(3));
    }

    #[test]
    fn test_touching_spans_are_not_overlapping() {
        let table = WordTable::new(vec![0, 2, 4, 6]);
        let spans = vec![Span::new(0, 2), Span::new(2, 4)];
        let (offsets, summary) = map_offsets(&spans, &table);
        assert!(!summary.overlapping);
        assert_eq!(offsets[0].wstart, Some(0));
        assert_eq!(offsets[1].wstart, Some(1));
        assert_eq!(offsets[1].cstart, Some(1));
    }

    #[test]
    fn test_unresolved_bounds_in_last_word() {
        // a última palavra não tem sucessora na tabela: início cai no total de palavras
        // e o fim fica sem resolução
        let table = WordTable::from_text("üks kaks");
        let spans = vec![Span::new(5, 9)];
        let (offsets, _) = map_offsets(&spans, &table);
        assert_eq!(offsets[0].wstart_raw, 2);
        assert_eq!(offsets[0].wend_raw, None);
        assert_eq!(offsets[0].wstart, Some(2));
    }

    #[test]
    fn test_try_new_rejects_unsorted_starts() {
        assert_eq!(WordTable::try_new(vec![0, 4, 9]).unwrap().len(), 3);
        assert!(WordTable::try_new(Vec::new()).unwrap().is_empty());
        assert!(matches!(
            WordTable::try_new(vec![4, 0]),
            Err(TaggerError::InvalidWordTable { previous: 4, next: 0 })
        ));
        assert!(matches!(
            WordTable::try_new(vec![0, 3, 3]),
            Err(TaggerError::InvalidWordTable { previous: 3, next: 3 })
        ));
    }

    #[test]
    fn test_span_before_first_word_does_not_shift_backwards() {
        // o primeiro span começa antes da primeira palavra: wstart_raw fica no total
        // de palavras e wend_raw - wstart_raw - 1 seria negativo
        let table = WordTable::new(vec![2, 5, 8]);
        let spans = vec![Span::new(0, 3), Span::new(5, 6)];
        let (offsets, summary) = map_offsets(&spans, &table);

        assert!(!summary.overlapping);
        assert_eq!(offsets[0].wstart_raw, 3);
        assert_eq!(offsets[0].wend_raw, Some(1));
        assert_eq!(offsets[1].wstart_raw, 1);
        assert_eq!(offsets[1].wend_raw, Some(2));

        assert_eq!(summary.word_shift, 0);
        assert_eq!(offsets[0].wstart, Some(3));
        assert_eq!(offsets[1].wstart, Some(1));
        assert_eq!(offsets[1].cstart, Some(3));
        assert_eq!(summary.char_shift, 2);
    }

    #[test]
    fn test_empty_inputs() {
        let (offsets, summary) = map_offsets::<Span>(&[], &WordTable::default());
        assert!(offsets.is_empty());
        assert_eq!(summary, MappingSummary::default());

        let (offsets, _) = map_offsets(&[Span::new(0, 3)], &WordTable::default());
        assert_eq!(offsets[0].wstart_raw, 0);
        assert_eq!(offsets[0].wend_raw, None);
    }

    #[test]
    fn test_compacted_values_strictly_increase() {
        let text = "a bb ccc dddd eeeee ffffff";
        let table = WordTable::from_text(text);
        let spans = vec![Span::new(2, 8), Span::new(9, 13), Span::new(14, 26)];
        let (offsets, summary) = map_offsets(&spans, &table);
        assert!(!summary.overlapping);

        let cstarts: Vec<usize> = offsets.iter().map(|o| o.cstart.unwrap()).collect();
        let wstarts: Vec<usize> = offsets.iter().map(|o| o.wstart.unwrap()).collect();
        assert!(cstarts.windows(2).all(|w| w[0] < w[1]), "{cstarts:?}");
        assert!(wstarts.windows(2).all(|w| w[0] <= w[1]), "{wstarts:?}");
        assert_eq!(wstarts, vec![1, 2, 3]);
    }
}
