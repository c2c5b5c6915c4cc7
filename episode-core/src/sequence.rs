//! # Sequências de Eventos
//!
//! Converte uma lista de eventos compactados em uma sequência temporal
//! `(tipo, tempo)` dentro de uma janela `[start, end)`, o formato de entrada
//! usado por algoritmos de mineração de episódios.
//!
//! O "tempo" de um evento é a sua coordenada compactada, em uma de duas escalas:
//!
//! - [`TimeScale::Cstart`]: offset de byte compactado;
//! - [`TimeScale::Wstart`]: índice de palavra compactado.
//!
//! A janela termina no tamanho do texto já compactado, ou seja, o tamanho
//! original menos o que a compactação absorveu.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Result, TaggerError};
use crate::event::Event;
use crate::offsets::MappingSummary;

/// Escala de tempo de uma sequência.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeScale {
    #[default]
    Cstart,
    Wstart,
}

impl FromStr for TimeScale {
    type Err = TaggerError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "cstart" => Ok(TimeScale::Cstart),
            "wstart" => Ok(TimeScale::Wstart),
            other => Err(TaggerError::UnknownTimeScale(other.to_string())),
        }
    }
}

impl fmt::Display for TimeScale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimeScale::Cstart => write!(f, "cstart"),
            TimeScale::Wstart => write!(f, "wstart"),
        }
    }
}

/// Um evento na sequência: tipo e instante.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpisodeEvent {
    pub event_type: Value,
    pub event_time: usize,
}

impl EpisodeEvent {
    pub fn new(event_type: impl Into<Value>, event_time: usize) -> Self {
        Self {
            event_type: event_type.into(),
            event_time,
        }
    }

    /// Cópia deslocada no tempo. Um deslocamento que passaria de zero satura em zero.
    pub fn shift(&self, offset: isize) -> Self {
        Self {
            event_type: self.event_type.clone(),
            event_time: self.event_time.saturating_add_signed(offset),
        }
    }

    /// Ordem temporal; o tipo não participa.
    pub fn precedes(&self, other: &EpisodeEvent) -> bool {
        self.event_time < other.event_time
    }
}

/// Sequência de eventos ordenada por tempo na janela `[start, end)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventSequence {
    pub events: Vec<EpisodeEvent>,
    pub start: usize,
    pub end: usize,
}

impl EventSequence {
    /// Mantém só os eventos com `start <= tempo < end`, em ordem estável de tempo.
    pub fn new(events: Vec<EpisodeEvent>, start: usize, end: usize) -> Self {
        let mut events: Vec<EpisodeEvent> = events
            .into_iter()
            .filter(|e| start <= e.event_time && e.event_time < end)
            .collect();
        events.sort_by_key(|e| e.event_time);
        Self { events, start, end }
    }

    /// Monta a sequência a partir de eventos já compactados.
    ///
    /// - `classificator`: campo do evento usado como tipo;
    /// - `text_len` / `word_count`: tamanho original do texto, em bytes e palavras.
    pub fn from_events(
        events: &[Event],
        classificator: &str,
        time_scale: TimeScale,
        summary: &MappingSummary,
        text_len: usize,
        word_count: usize,
    ) -> Result<Self> {
        if summary.overlapping {
            return Err(TaggerError::NotCompacted);
        }

        let mut sequence = Vec::with_capacity(events.len());
        for event in events {
            let event_type = event
                .field(classificator)
                .ok_or_else(|| TaggerError::MissingClassificator {
                    field: classificator.to_string(),
                    start: event.start,
                    end: event.end,
                })?;
            let time = match time_scale {
                TimeScale::Cstart => event.cstart,
                TimeScale::Wstart => event.wstart,
            };
            let event_time = time.ok_or(TaggerError::NotCompacted)?;
            sequence.push(EpisodeEvent { event_type, event_time });
        }

        let end = match time_scale {
            TimeScale::Cstart => text_len.saturating_sub(summary.char_shift),
            TimeScale::Wstart => word_count.saturating_sub(summary.word_shift),
        };
        Ok(Self::new(sequence, 0, end))
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vocabulary::Metadata;
    use serde_json::json;

    fn numbers() -> Vec<EpisodeEvent> {
        vec![
            EpisodeEvent::new("üks", 1),
            EpisodeEvent::new("kaks", 9),
            EpisodeEvent::new("viis", 14),
            EpisodeEvent::new("neli", 13),
            EpisodeEvent::new("kolm", 13),
            EpisodeEvent::new("kuus", 15),
        ]
    }

    fn event(term: &str, wstart: usize, cstart: usize) -> Event {
        Event {
            term: term.to_string(),
            start: cstart,
            end: cstart + term.len(),
            wstart_raw: wstart,
            wend_raw: Some(wstart + 1),
            wstart: Some(wstart),
            cstart: Some(cstart),
            metadata: Metadata::new(),
        }
    }

    #[test]
    fn test_window_filter_and_order() {
        let seq = EventSequence::new(numbers(), 9, 15);
        let got: Vec<(Value, usize)> = seq
            .events
            .iter()
            .map(|e| (e.event_type.clone(), e.event_time))
            .collect();
        // empates mantêm a ordem de entrada
        assert_eq!(
            got,
            vec![
                (json!("kaks"), 9),
                (json!("neli"), 13),
                (json!("kolm"), 13),
                (json!("viis"), 14),
            ]
        );
        assert_eq!((seq.start, seq.end), (9, 15));
    }

    #[test]
    fn test_shift_and_precedes() {
        let e = EpisodeEvent::new("kaks", 9);
        assert_eq!(e.shift(3).event_time, 12);
        assert_eq!(e.shift(-4).event_time, 5);
        assert_eq!(e.shift(-20).event_time, 0);
        assert_eq!(e.shift(3).event_type, json!("kaks"));

        assert!(EpisodeEvent::new("a", 1).precedes(&e));
        assert!(!e.precedes(&EpisodeEvent::new("b", 9)));
    }

    #[test]
    fn test_from_events_window_end() {
        let events = vec![event("kakskümmend viis", 1, 4), event("seitse", 5, 20)];
        let summary = MappingSummary {
            overlapping: false,
            word_shift: 1,
            char_shift: 21,
        };

        let by_char = EventSequence::from_events(&events, "term", TimeScale::Cstart, &summary, 43, 8).unwrap();
        assert_eq!(by_char.end, 22);
        assert_eq!(by_char.len(), 2);

        let by_word = EventSequence::from_events(&events, "term", TimeScale::Wstart, &summary, 43, 8).unwrap();
        assert_eq!(by_word.end, 7);
        assert_eq!(by_word.events[1].event_time, 5);
    }

    #[test]
    fn test_from_events_errors() {
        let events = vec![event("seitse", 5, 20)];
        let summary = MappingSummary::default();

        let missing = EventSequence::from_events(&events, "value", TimeScale::Cstart, &summary, 43, 8);
        assert!(matches!(missing, Err(TaggerError::MissingClassificator { .. })));

        let overlapping = MappingSummary {
            overlapping: true,
            ..MappingSummary::default()
        };
        let result = EventSequence::from_events(&events, "term", TimeScale::Cstart, &overlapping, 43, 8);
        assert!(matches!(result, Err(TaggerError::NotCompacted)));
    }

    #[test]
    fn test_time_scale_parsing() {
        assert!(matches!("wstart".parse::<TimeScale>(), Ok(TimeScale::Wstart)));
        assert!(matches!(
            "start".parse::<TimeScale>(),
            Err(TaggerError::UnknownTimeScale(s)) if s == "start"
        ));
        assert_eq!(serde_json::to_value(TimeScale::Cstart).unwrap(), json!("cstart"));
        assert!(EventSequence::new(Vec::new(), 0, 0).is_empty());
    }
}
