//! # Tagger de Eventos
//!
//! Um evento é uma palavra-chave enriquecida: além do span em bytes, recebe as
//! coordenadas de palavra calculadas pelo [`offsets`](crate::offsets) e todos os
//! campos do registro do vocabulário que o originou.
//!
//! ## Campos de um evento
//!
//! | Campo        | Significado                                                  |
//! |--------------|--------------------------------------------------------------|
//! | `term`       | termo do vocabulário                                         |
//! | `start/end`  | span em bytes                                                |
//! | `wstart_raw` | palavra que contém `start`                                   |
//! | `wend_raw`   | palavra após a que contém o último byte (`null` se não resolvido) |
//! | `wstart`     | índice de palavra compactado (ausente se houver sobreposição) |
//! | `cstart`     | offset de byte compactado (ausente se houver sobreposição)   |

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::config::TaggerConfig;
use crate::document::AnnotatedText;
use crate::error::{Result, TaggerError};
use crate::offsets::{map_offsets, MappingSummary, WordTable};
use crate::pattern_index::PatternIndex;
use crate::resolver::resolve;
use crate::sequence::{EventSequence, TimeScale};
use crate::span::{Span, Spanned};
use crate::vocabulary::{validate_records, Metadata, VocabularyEntry, VocabularyRecord, EVENT_RESERVED, TERM};

/// Um evento encontrado no texto.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub term: String,
    pub start: usize,
    pub end: usize,
    pub wstart_raw: usize,
    pub wend_raw: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wstart: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cstart: Option<usize>,
    /// Campos extras do registro do vocabulário
    #[serde(flatten)]
    pub metadata: Metadata,
}

impl Event {
    /// Valor de um campo pelo nome, incluindo os campos calculados.
    ///
    /// Usado para escolher o "tipo" de um evento ao montar sequências.
    pub fn field(&self, name: &str) -> Option<Value> {
        match name {
            TERM => Some(Value::from(self.term.clone())),
            "start" => Some(Value::from(self.start)),
            "end" => Some(Value::from(self.end)),
            "wstart_raw" => Some(Value::from(self.wstart_raw)),
            "wend_raw" => self.wend_raw.map(Value::from),
            "wstart" => self.wstart.map(Value::from),
            "cstart" => self.cstart.map(Value::from),
            other => self.metadata.get(other).cloned(),
        }
    }
}

impl Spanned for Event {
    fn span(&self) -> Span {
        Span::new(self.start, self.end)
    }
}

/// Encontra eventos de um vocabulário de registros `{"term": ..., <campos>}`.
///
/// # Exemplo
///
/// ```rust
/// use episode_core::{ConflictStrategy, EventTagger, TaggerConfig, WordTable};
/// use serde_json::json;
///
/// let vocabulary = vec![
///     json!({"term": "kakskümmend viis"}).as_object().cloned().unwrap(),
///     json!({"term": "seitse"}).as_object().cloned().unwrap(),
/// ];
/// let tagger = EventTagger::new(
///     vocabulary,
///     TaggerConfig::default().with_strategy(ConflictStrategy::All),
/// ).unwrap();
///
/// let text = "Arv kakskümmend viis on suurem kui seitse.";
/// let events = tagger.tag(text, &WordTable::from_text(text));
/// assert_eq!(events[1].cstart, Some(20));
/// assert_eq!(events[1].wstart, Some(5));
/// ```
pub struct EventTagger {
    entries: Vec<VocabularyEntry>,
    index: PatternIndex,
    config: TaggerConfig,
}

impl EventTagger {
    pub const DEFAULT_LAYER: &'static str = "events";

    /// Valida o vocabulário e constrói o índice de busca.
    ///
    /// Todo registro precisa de `term`; os campos `start`, `end`, `wstart`, `wend`,
    /// `cstart`, `wstart_raw` e `wend_raw` são reservados. Um vocabulário vazio é
    /// válido e não produz eventos.
    pub fn new(records: Vec<VocabularyRecord>, config: TaggerConfig) -> Result<Self> {
        let entries = validate_records(&records, TERM, EVENT_RESERVED)?;
        let index = PatternIndex::build(config.search_method, entries.iter().map(|e| e.pattern.clone()))?;
        debug!(
            terms = entries.len(),
            method = %config.search_method,
            strategy = %config.conflict_resolving_strategy,
            "EventTagger configurado"
        );
        Ok(Self { entries, index, config })
    }

    pub fn config(&self) -> &TaggerConfig {
        &self.config
    }

    /// Eventos do texto, ordenados por `(start, end)`.
    pub fn tag(&self, text: &str, words: &WordTable) -> Vec<Event> {
        self.tag_with_summary(text, words).0
    }

    /// Como [`tag`](Self::tag), devolvendo também o resumo da compactação.
    pub fn tag_with_summary(&self, text: &str, words: &WordTable) -> (Vec<Event>, MappingSummary) {
        let raw = self.index.find_all(text);
        let total = raw.len();
        let resolved = resolve(raw, self.config.conflict_resolving_strategy);
        let (offsets, summary) = map_offsets(&resolved, words);

        if summary.overlapping {
            debug!("eventos sobrepostos: coordenadas compactadas omitidas");
        }

        let events: Vec<Event> = resolved
            .into_iter()
            .zip(offsets)
            .map(|(m, off)| {
                let entry = &self.entries[m.pattern];
                Event {
                    term: entry.pattern.clone(),
                    start: m.span.start,
                    end: m.span.end,
                    wstart_raw: off.wstart_raw,
                    wend_raw: off.wend_raw,
                    wstart: off.wstart,
                    cstart: off.cstart,
                    metadata: entry.fields.clone(),
                }
            })
            .collect();

        debug!(raw = total, kept = events.len(), "eventos marcados");
        (events, summary)
    }

    /// Marca vários documentos em paralelo, sem alterá-los.
    pub fn tag_batch(&self, docs: &[AnnotatedText]) -> Vec<Vec<Event>> {
        docs.par_iter().map(|d| self.tag(&d.text, &d.word_table)).collect()
    }

    /// Grava os eventos como camada do documento, usando a tabela de palavras dele.
    pub fn annotate(&self, doc: &mut AnnotatedText) -> Result<()> {
        let events = self.tag(&doc.text, &doc.word_table);
        doc.set_layer(self.config.layer_or(Self::DEFAULT_LAYER), &events)
    }

    /// Monta a sequência de eventos do texto na escala de tempo escolhida.
    ///
    /// `classificator` é o campo que dá o tipo de cada evento (ex: `term`).
    /// Falha com [`TaggerError::NotCompacted`] se os eventos se sobrepõem.
    pub fn sequence(
        &self,
        text: &str,
        words: &WordTable,
        classificator: &str,
        time_scale: TimeScale,
    ) -> Result<EventSequence> {
        let (events, summary) = self.tag_with_summary(text, words);
        if summary.overlapping {
            return Err(TaggerError::NotCompacted);
        }
        EventSequence::from_events(&events, classificator, time_scale, &summary, text.len(), words.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ConflictStrategy, SearchMethod};
    use serde_json::json;

    const TEXT: &str = "Arv kakskümmend viis on suurem kui seitse.";

    fn records(values: &[Value]) -> Vec<VocabularyRecord> {
        values.iter().map(|v| v.as_object().cloned().unwrap()).collect()
    }

    fn numbers_tagger(method: SearchMethod, strategy: ConflictStrategy) -> EventTagger {
        EventTagger::new(
            records(&[json!({"term": "kakskümmend viis"}), json!({"term": "seitse"})]),
            TaggerConfig::default().with_method(method).with_strategy(strategy),
        )
        .unwrap()
    }

    #[test]
    fn test_example_sentence() {
        for method in [SearchMethod::Naive, SearchMethod::AhoCorasick] {
            let tagger = numbers_tagger(method, ConflictStrategy::All);
            let events = tagger.tag(TEXT, &WordTable::from_text(TEXT));

            assert_eq!(events.len(), 2);
            assert_eq!(events[0].term, "kakskümmend viis");
            assert_eq!((events[0].start, events[0].end), (4, 21));
            assert_eq!((events[1].start, events[1].end), (36, 42));
            assert_eq!(events[0].cstart, Some(4));
            assert_eq!(events[1].cstart, Some(20));
            assert_eq!(events[0].wstart, Some(1));
            assert_eq!(events[1].wstart, Some(5));
        }
    }

    #[test]
    fn test_taggers_are_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<EventTagger>();
        assert_send_sync::<crate::tagger::KeywordTagger>();
        assert_send_sync::<crate::tagger::RegexTagger>();
    }

    #[test]
    fn test_no_events() {
        let tagger = numbers_tagger(SearchMethod::Naive, ConflictStrategy::All);
        let text = "Sündmusteta tekst.";
        assert!(tagger.tag(text, &WordTable::from_text(text)).is_empty());
    }

    #[test]
    fn test_overlapping_events_have_no_compacted_coordinates() {
        let tagger = EventTagger::new(
            records(&[json!({"term": "kakskümmend viis"}), json!({"term": "viis on"})]),
            TaggerConfig::default().with_strategy(ConflictStrategy::All),
        )
        .unwrap();
        let events = tagger.tag(TEXT, &WordTable::from_text(TEXT));

        assert_eq!(events.len(), 2);
        assert!(events.iter().all(|e| e.wstart.is_none() && e.cstart.is_none()));
        assert_eq!(events[1].wstart_raw, 2);
        assert_eq!(events[1].wend_raw, Some(4));
    }

    #[test]
    fn test_metadata_copied_to_events() {
        let tagger = EventTagger::new(
            records(&[json!({"term": "seitse", "value": 7, "type": "number"})]),
            TaggerConfig::default(),
        )
        .unwrap();
        let events = tagger.tag(TEXT, &WordTable::from_text(TEXT));
        assert_eq!(events[0].metadata.get("value"), Some(&json!(7)));
        assert_eq!(events[0].field("type"), Some(json!("number")));
        assert_eq!(events[0].field("term"), Some(json!("seitse")));

        let serialized = serde_json::to_value(&events[0]).unwrap();
        assert_eq!(
            serialized,
            json!({
                "term": "seitse", "start": 36, "end": 42,
                "wstart_raw": 6, "wend_raw": 7, "wstart": 6, "cstart": 36,
                "value": 7, "type": "number"
            })
        );
    }

    #[test]
    fn test_vocabulary_validation() {
        let missing = EventTagger::new(records(&[json!({"word": "seitse"})]), TaggerConfig::default());
        assert!(matches!(missing, Err(TaggerError::MissingField { .. })));

        let reserved = EventTagger::new(
            records(&[json!({"term": "seitse", "wend": 1})]),
            TaggerConfig::default(),
        );
        assert!(matches!(reserved, Err(TaggerError::ReservedField { .. })));

        let empty = EventTagger::new(Vec::new(), TaggerConfig::default()).unwrap();
        assert!(empty.tag(TEXT, &WordTable::from_text(TEXT)).is_empty());
    }

    #[test]
    fn test_annotate_writes_events_layer() {
        let tagger = numbers_tagger(SearchMethod::AhoCorasick, ConflictStrategy::Max);
        let mut doc = AnnotatedText::new(TEXT);
        tagger.annotate(&mut doc).unwrap();

        let layer = doc.layer(EventTagger::DEFAULT_LAYER).unwrap();
        assert_eq!(layer.as_array().map(Vec::len), Some(2));
        assert_eq!(layer[1]["cstart"], json!(20));
    }

    #[test]
    fn test_tag_batch_matches_single_calls() {
        let tagger = numbers_tagger(SearchMethod::AhoCorasick, ConflictStrategy::Max);
        let docs = vec![AnnotatedText::new(TEXT), AnnotatedText::new("seitse seitse")];
        let batch = tagger.tag_batch(&docs);
        assert_eq!(batch[0], tagger.tag(&docs[0].text, &docs[0].word_table));
        assert_eq!(batch[1].len(), 2);
    }

    #[test]
    fn test_sequence_time_scales() {
        let tagger = numbers_tagger(SearchMethod::Naive, ConflictStrategy::All);
        let words = WordTable::from_text(TEXT);

        let by_char = tagger.sequence(TEXT, &words, "term", TimeScale::Cstart).unwrap();
        assert_eq!((by_char.start, by_char.end), (0, 22));
        assert_eq!(by_char.events[0].event_type, json!("kakskümmend viis"));
        assert_eq!(by_char.events[0].event_time, 4);
        assert_eq!(by_char.events[1].event_type, json!("seitse"));
        assert_eq!(by_char.events[1].event_time, 20);

        let by_word = tagger.sequence(TEXT, &words, "term", TimeScale::Wstart).unwrap();
        assert_eq!((by_word.start, by_word.end), (0, 7));
        assert_eq!(by_word.events[0].event_time, 1);
        assert_eq!(by_word.events[1].event_time, 5);
    }

    #[test]
    fn test_sequence_without_events() {
        let tagger = numbers_tagger(SearchMethod::Naive, ConflictStrategy::All);
        let text = "Sündmusteta tekst.";
        let words = WordTable::from_text(text);

        let by_char = tagger.sequence(text, &words, "term", TimeScale::Cstart).unwrap();
        assert_eq!((by_char.start, by_char.end), (0, text.len()));
        assert!(by_char.events.is_empty());

        let by_word = tagger.sequence(text, &words, "term", TimeScale::Wstart).unwrap();
        assert_eq!((by_word.start, by_word.end), (0, 3));
    }

    #[test]
    fn test_sequence_rejects_overlap() {
        let tagger = EventTagger::new(
            records(&[json!({"term": "kakskümmend viis"}), json!({"term": "viis"})]),
            TaggerConfig::default().with_strategy(ConflictStrategy::All),
        )
        .unwrap();
        let result = tagger.sequence(TEXT, &WordTable::from_text(TEXT), "term", TimeScale::Cstart);
        assert!(matches!(result, Err(TaggerError::NotCompacted)));
    }
}
