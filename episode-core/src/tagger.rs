//! # Taggers de Palavras-chave e Regex
//!
//! Os taggers são orquestradores finos sobre os estágios do pipeline:
//!
//! ```text
//! texto ─▶ PatternIndex / RegexScanner ─▶ resolve() ─▶ metadados ─▶ Vec<Match>
//!                                                                 └▶ camada do documento
//! ```
//!
//! Toda a validação acontece em `new`: vocabulário malformado, regex inválida
//! ou campo reservado nunca chegam até `tag`. Depois de construídos os taggers
//! são imutáveis e podem ser compartilhados entre threads.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::config::TaggerConfig;
use crate::document::AnnotatedText;
use crate::error::Result;
use crate::pattern_index::PatternIndex;
use crate::regex_scanner::{RegexMatch, RegexScanner};
use crate::resolver::resolve;
use crate::span::{Span, Spanned};
use crate::vocabulary::{validate_records, Vocabulary, VocabularyRecord, REGEX, REGEX_RESERVED};

/// Uma palavra-chave encontrada no texto.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeywordMatch {
    pub start: usize,
    pub end: usize,
    /// Rótulo do vocabulário (apenas para vocabulários `termo → rótulo`)
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub label: Option<Value>,
}

impl Spanned for KeywordMatch {
    fn span(&self) -> Span {
        Span::new(self.start, self.end)
    }
}

/// Encontra palavras-chave de um vocabulário fixo.
///
/// # Exemplo
///
/// ```rust
/// use episode_core::{ConflictStrategy, KeywordTagger, TaggerConfig, Vocabulary};
///
/// let tagger = KeywordTagger::new(
///     Vocabulary::from(vec!["kaks", "kakskümmend"]),
///     TaggerConfig::default().with_strategy(ConflictStrategy::Max),
/// ).unwrap();
///
/// let found = tagger.tag("kakskümmend");
/// assert_eq!(found.len(), 1);
/// assert_eq!((found[0].start, found[0].end), (0, 12));
/// ```
pub struct KeywordTagger {
    vocabulary: Vocabulary,
    index: PatternIndex,
    config: TaggerConfig,
}

impl KeywordTagger {
    pub const DEFAULT_LAYER: &'static str = "keywords";

    pub fn new(vocabulary: Vocabulary, config: TaggerConfig) -> Result<Self> {
        let index = PatternIndex::build(config.search_method, vocabulary.patterns())?;
        debug!(
            terms = index.patterns().len(),
            labeled = vocabulary.is_labeled(),
            strategy = %config.conflict_resolving_strategy,
            "KeywordTagger configurado"
        );
        Ok(Self {
            vocabulary,
            index,
            config,
        })
    }

    pub fn config(&self) -> &TaggerConfig {
        &self.config
    }

    /// Palavras-chave do texto, ordenadas por `(start, end)`.
    ///
    /// Em vocabulários rotulados, o rótulo é buscado pelo trecho do texto coberto
    /// pelo casamento **resolvido**, não pelo padrão que gerou o casamento bruto.
    pub fn tag(&self, text: &str) -> Vec<KeywordMatch> {
        let raw = self.index.find_all(text);
        let total = raw.len();
        let resolved = resolve(raw, self.config.conflict_resolving_strategy);

        let matches: Vec<KeywordMatch> = resolved
            .into_iter()
            .map(|m| KeywordMatch {
                start: m.span.start,
                end: m.span.end,
                label: self.vocabulary.label(m.span.slice(text)).cloned(),
            })
            .collect();

        debug!(raw = total, kept = matches.len(), "palavras-chave marcadas");
        matches
    }

    /// Marca vários textos em paralelo; a saída segue a ordem da entrada.
    pub fn tag_batch<S: AsRef<str> + Sync>(&self, texts: &[S]) -> Vec<Vec<KeywordMatch>> {
        texts.par_iter().map(|t| self.tag(t.as_ref())).collect()
    }

    /// Grava as palavras-chave como camada do documento.
    pub fn annotate(&self, doc: &mut AnnotatedText) -> Result<()> {
        let matches = self.tag(&doc.text);
        doc.set_layer(self.config.layer_or(Self::DEFAULT_LAYER), &matches)
    }
}

/// Encontra casamentos de uma sequência ordenada de expressões regulares.
pub struct RegexTagger {
    scanner: RegexScanner,
    config: TaggerConfig,
}

impl RegexTagger {
    pub const DEFAULT_LAYER: &'static str = "regexes";

    /// Constrói a partir de registros `{"regex": ..., <campos extras>}`.
    ///
    /// Os campos `start`, `end`, `regex` e `groups` são reservados. O método de
    /// busca da configuração não se aplica a regex e é ignorado.
    pub fn new(records: Vec<VocabularyRecord>, config: TaggerConfig) -> Result<Self> {
        let entries = validate_records(&records, REGEX, REGEX_RESERVED)?;
        let scanner = RegexScanner::new(entries)?;
        debug!(
            rules = scanner.len(),
            strategy = %config.conflict_resolving_strategy,
            "RegexTagger configurado"
        );
        Ok(Self { scanner, config })
    }

    /// Constrói a partir de uma lista simples de regex, sem metadados.
    pub fn from_patterns<I, S>(patterns: I, config: TaggerConfig) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let records = patterns
            .into_iter()
            .map(|p| {
                let mut record = VocabularyRecord::new();
                record.insert(REGEX.to_string(), Value::String(p.into()));
                record
            })
            .collect();
        Self::new(records, config)
    }

    pub fn config(&self) -> &TaggerConfig {
        &self.config
    }

    /// Casamentos do texto, ordenados por `(start, end)`.
    pub fn tag(&self, text: &str) -> Vec<RegexMatch> {
        let raw = self.scanner.scan(text);
        let total = raw.len();
        let matches = resolve(raw, self.config.conflict_resolving_strategy);
        debug!(raw = total, kept = matches.len(), "regex marcadas");
        matches
    }

    pub fn tag_batch<S: AsRef<str> + Sync>(&self, texts: &[S]) -> Vec<Vec<RegexMatch>> {
        texts.par_iter().map(|t| self.tag(t.as_ref())).collect()
    }

    pub fn annotate(&self, doc: &mut AnnotatedText) -> Result<()> {
        let matches = self.tag(&doc.text);
        doc.set_layer(self.config.layer_or(Self::DEFAULT_LAYER), &matches)
    }
}
