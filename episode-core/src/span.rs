//! # Spans
//!
//! Um span é um intervalo semiaberto `[start, end)` de **bytes** no texto original.
//! Todos os estágios do pipeline (busca, resolução de conflitos, mapeamento de
//! offsets) trabalham sobre spans; os tipos de saída (palavras-chave, regex,
//! eventos) carregam metadados extras mas expõem seu span via [`Spanned`].
//!
//! # Exemplo
//! Em `"Arv kakskümmend viis"`, o termo `"viis"` ocupa `Span { start: 17, end: 21 }`
//! (o `ü` ocupa dois bytes).

use serde::{Deserialize, Serialize};

/// Intervalo semiaberto de bytes, com `start < end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Span {
    /// Byte inicial (inclusivo)
    pub start: usize,
    /// Byte final (exclusivo)
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        debug_assert!(start < end, "span vazio ou invertido: {}..{}", start, end);
        Self { start, end }
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    /// `true` se os dois spans compartilham ao menos um byte.
    pub fn overlaps(&self, other: &Span) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// `true` se `other` está inteiramente dentro de `self`.
    pub fn contains(&self, other: &Span) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    /// O trecho do texto coberto pelo span.
    pub fn slice<'a>(&self, text: &'a str) -> &'a str {
        &text[self.start..self.end]
    }
}

/// Qualquer item que ocupa um span no texto.
///
/// Permite que o [`resolver`](crate::resolver) ordene e pode listas de
/// casamentos sem perder os metadados de cada um.
pub trait Spanned {
    fn span(&self) -> Span;

    fn start(&self) -> usize {
        self.span().start
    }

    fn end(&self) -> usize {
        self.span().end
    }
}

impl Spanned for Span {
    fn span(&self) -> Span {
        *self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overlap_and_containment() {
        let a = Span::new(0, 5);
        let b = Span::new(2, 4);
        let c = Span::new(5, 7);

        assert!(a.overlaps(&b));
        assert!(a.contains(&b));
        assert!(!b.contains(&a));
        // spans que apenas se tocam não se sobrepõem
        assert!(!a.overlaps(&c));
    }

    #[test]
    fn test_slice_uses_byte_offsets() {
        let text = "Arv kakskümmend viis";
        assert_eq!(Span::new(17, 21).slice(text), "viis");
        assert_eq!(Span::new(4, 16).slice(text), "kakskümmend");
        assert_eq!(Span::new(4, 16).len(), 12);
    }

    #[test]
    fn test_ordering_is_start_then_end() {
        let mut spans = vec![Span::new(2, 4), Span::new(0, 5), Span::new(0, 3)];
        spans.sort();
        assert_eq!(spans, vec![Span::new(0, 3), Span::new(0, 5), Span::new(2, 4)]);
    }
}
