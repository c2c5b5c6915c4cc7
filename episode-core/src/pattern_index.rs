//! # Índice de Padrões Literais
//!
//! Encontra **todas** as ocorrências de todos os termos do vocabulário, inclusive
//! ocorrências sobrepostas e aninhadas. A busca é literal e sensível a maiúsculas:
//! sem stemming, sem exigência de fronteira de palavra.
//!
//! ## Duas realizações
//!
//! - **Naive**: para cada padrão, `str::find` repetido, recomeçando um caractere
//!   depois do início de cada ocorrência. Custo O(|texto| × |vocabulário|).
//! - **Aho-Corasick**: um autômato construído uma vez sobre todo o vocabulário,
//!   que reporta em uma única passada cada padrão terminando em cada posição
//!   (`find_overlapping_iter`). Custo por chamada O(|texto| + casamentos).
//!
//! As duas produzem exatamente o mesmo conjunto de spans; o autômato existe apenas
//! por desempenho em vocabulários grandes.

use aho_corasick::{AhoCorasick, AhoCorasickBuilder, MatchKind};
use tracing::debug;

use crate::config::SearchMethod;
use crate::error::{Result, TaggerError};
use crate::span::{Span, Spanned};

/// Uma ocorrência bruta: o span e o índice do padrão que casou.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RawMatch {
    pub span: Span,
    /// Índice do padrão em [`PatternIndex::patterns`].
    pub pattern: usize,
}

impl Spanned for RawMatch {
    fn span(&self) -> Span {
        self.span
    }
}

enum Matcher {
    Naive,
    /// `None` quando o vocabulário é vazio.
    Automaton(Option<AhoCorasick>),
}

/// Estrutura de busca imutável sobre um vocabulário fixo.
///
/// Construída uma única vez com [`PatternIndex::build`]; depois disso só é lida,
/// podendo ser compartilhada entre threads.
pub struct PatternIndex {
    patterns: Vec<String>,
    matcher: Matcher,
}

impl PatternIndex {
    /// Constrói o índice. Um conjunto vazio de padrões produz um índice que não
    /// casa nada; um padrão vazio é erro de configuração.
    pub fn build<I, S>(method: SearchMethod, patterns: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let patterns: Vec<String> = patterns.into_iter().map(Into::into).collect();
        if let Some(index) = patterns.iter().position(|p| p.is_empty()) {
            return Err(TaggerError::EmptyPattern { index });
        }

        let matcher = match method {
            SearchMethod::Naive => Matcher::Naive,
            SearchMethod::AhoCorasick if patterns.is_empty() => Matcher::Automaton(None),
            SearchMethod::AhoCorasick => {
                let ac = AhoCorasickBuilder::new()
                    .match_kind(MatchKind::Standard)
                    .build(&patterns)?;
                Matcher::Automaton(Some(ac))
            }
        };

        debug!(patterns = patterns.len(), method = %method, "índice de padrões construído");
        Ok(Self { patterns, matcher })
    }

    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }

    pub fn pattern(&self, index: usize) -> &str {
        &self.patterns[index]
    }

    pub fn method(&self) -> SearchMethod {
        match self.matcher {
            Matcher::Naive => SearchMethod::Naive,
            Matcher::Automaton(_) => SearchMethod::AhoCorasick,
        }
    }

    /// Todas as ocorrências de todos os padrões, sem ordem garantida.
    pub fn find_all(&self, text: &str) -> Vec<RawMatch> {
        match &self.matcher {
            Matcher::Naive => self.find_naive(text),
            Matcher::Automaton(Some(ac)) => ac
                .find_overlapping_iter(text)
                .map(|m| RawMatch {
                    span: Span::new(m.start(), m.end()),
                    pattern: m.pattern().as_usize(),
                })
                .collect(),
            Matcher::Automaton(None) => Vec::new(),
        }
    }

    fn find_naive(&self, text: &str) -> Vec<RawMatch> {
        let mut matches = Vec::new();
        for (pattern, entry) in self.patterns.iter().enumerate() {
            let mut from = 0;
            while let Some(offset) = text[from..].find(entry.as_str()) {
                let start = from + offset;
                matches.push(RawMatch {
                    span: Span::new(start, start + entry.len()),
                    pattern,
                });
                // recomeça no próximo caractere, não no fim do casamento
                from = start + next_char_len(text, start);
            }
        }
        matches
    }
}

/// Tamanho em bytes do caractere que começa em `at` (1 no fim do texto).
pub(crate) fn next_char_len(text: &str, at: usize) -> usize {
    text[at..].chars().next().map_or(1, char::len_utf8)
}
