//! # episode-core: Marcação de Palavras-chave, Regex e Eventos
//!
//! Este crate encontra ocorrências de um vocabulário em texto bruto e as
//! devolve como spans anotados, prontos para virar camadas de um documento ou
//! sequências de eventos para mineração de episódios.
//!
//! ## Arquitetura do Sistema
//!
//! Todos os taggers seguem o mesmo pipeline linear:
//!
//! 1.  **Entrada**: Texto bruto (String) e um vocabulário ([`vocabulary`]).
//! 2.  **Busca** ([`pattern_index`], [`regex_scanner`]): todas as ocorrências,
//!     inclusive sobrepostas, por busca ingênua, autômato Aho-Corasick ou regex.
//! 3.  **Resolução de Conflitos** ([`resolver`]): `ALL`, `MAX` ou `MIN`.
//! 4.  **Offsets** ([`offsets`]): coordenadas de palavra e compactadas (só eventos).
//! 5.  **Saída**: [`KeywordMatch`], [`RegexMatch`], [`Event`] ou uma camada do
//!     [`AnnotatedText`].
//!
//! ## Exemplo de Uso
//!
//! ```rust
//! use episode_core::{KeywordTagger, TaggerConfig, Vocabulary};
//!
//! // 1. Configura o tagger (busca Aho-Corasick, estratégia MAX)
//! let vocabulary = Vocabulary::from(vec!["kaks", "kakskümmend", "kolm"]);
//! let tagger = KeywordTagger::new(vocabulary, TaggerConfig::default()).unwrap();
//!
//! // 2. Marca o texto: "kaks" dentro de "kakskümmend" é descartado pelo MAX
//! let matches = tagger.tag("kakskümmend kolm");
//! let spans: Vec<(usize, usize)> = matches.iter().map(|m| (m.start, m.end)).collect();
//! assert_eq!(spans, vec![(0, 12), (13, 17)]);
//! ```
//!
//! ## Módulos Principais
//!
//! - [`tagger`] / [`event`]: os três taggers públicos.
//! - [`resolver`]: as estratégias de resolução de conflitos.
//! - [`offsets`]: tabela de palavras e compactação de coordenadas.
//! - [`sequence`]: sequências de eventos para mineração de episódios.

pub mod config;
pub mod document;
pub mod error;
pub mod event;
pub mod offsets;
pub mod pattern_index;
pub mod regex_scanner;
pub mod resolver;
pub mod sequence;
pub mod span;
pub mod tagger;
pub mod vocabulary;

pub use config::{ConflictStrategy, SearchMethod, TaggerConfig};
pub use document::AnnotatedText;
pub use error::{Result, TaggerError};
pub use event::{Event, EventTagger};
pub use offsets::{map_offsets, MappingSummary, WordOffsets, WordTable};
pub use pattern_index::{PatternIndex, RawMatch};
pub use regex_scanner::{RegexMatch, RegexScanner};
pub use resolver::resolve;
pub use sequence::{EpisodeEvent, EventSequence, TimeScale};
pub use span::{Span, Spanned};
pub use tagger::{KeywordMatch, KeywordTagger, RegexTagger};
pub use vocabulary::{Metadata, Vocabulary, VocabularyRecord};
