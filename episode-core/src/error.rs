//! # Erros de Configuração
//!
//! Todos os erros deste crate são erros de **configuração**: vocabulário
//! malformado, estratégia desconhecida, regex inválida. Eles são levantados
//! na construção dos taggers, nunca durante `tag`. Casar e resolver
//! conflitos sobre entrada bem formada não falha.

use thiserror::Error;

/// Erro levantado ao configurar ou usar um tagger.
#[derive(Debug, Error)]
pub enum TaggerError {
    /// Estratégia de resolução de conflitos fora de `ALL`, `MAX`, `MIN`.
    #[error("Unknown conflict_resolving_strategy '{0}'.")]
    UnknownStrategy(String),

    /// Método de busca fora de `naive`, `ahocorasick`.
    #[error("Unknown search_method '{0}'.")]
    UnknownSearchMethod(String),

    /// Escala de tempo fora de `cstart`, `wstart`.
    #[error("Unknown time_scale '{0}'.")]
    UnknownTimeScale(String),

    /// Tabela de palavras fora de ordem estritamente crescente.
    #[error("Word starts must be strictly increasing: {previous} is followed by {next}")]
    InvalidWordTable { previous: usize, next: usize },

    /// Nenhum vocabulário foi fornecido.
    #[error("Can't really do something without a vocabulary")]
    MissingVocabulary,

    /// Padrão vazio casaria em todas as posições do texto.
    #[error("Empty pattern at vocabulary entry {index}")]
    EmptyPattern { index: usize },

    /// Registro do vocabulário usa um nome de campo reservado.
    #[error("Illegal key '{field}' in vocabulary entry '{pattern}'")]
    ReservedField { field: String, pattern: String },

    /// Registro do vocabulário sem o campo obrigatório (`term` ou `regex`).
    #[error("Missing key '{field}' in vocabulary entry {index}")]
    MissingField { field: String, index: usize },

    /// O campo obrigatório existe mas não é uma string.
    #[error("Key '{field}' in vocabulary entry {index} must be a string")]
    NonStringPattern { field: String, index: usize },

    #[error("Invalid regex '{pattern}': {source}")]
    InvalidRegex {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("Failed to build the Aho-Corasick automaton: {0}")]
    Automaton(#[from] aho_corasick::BuildError),

    /// Coordenadas compactadas pedidas para um lote de eventos sobrepostos.
    #[error("Events overlap; compacted coordinates (cstart, wstart) are undefined")]
    NotCompacted,

    #[error("Failed to serialize layer '{layer}': {source}")]
    Layer {
        layer: String,
        #[source]
        source: serde_json::Error,
    },

    /// Campo classificador ausente em um evento.
    #[error("Event at {start}..{end} has no field '{field}'")]
    MissingClassificator {
        field: String,
        start: usize,
        end: usize,
    },
}

/// Atalho para resultados deste crate.
pub type Result<T> = std::result::Result<T, TaggerError>;
