//! # Configuração dos Taggers
//!
//! Os taggers são configurados por dois eixos independentes:
//!
//! | Campo                         | Valores                  | Padrão        |
//! |-------------------------------|--------------------------|---------------|
//! | `search_method`               | `naive`, `ahocorasick`   | `ahocorasick` |
//! | `conflict_resolving_strategy` | `ALL`, `MAX`, `MIN`      | `MAX`         |
//!
//! Valores desconhecidos são rejeitados na construção (via [`FromStr`] ou
//! desserialização), nunca em tempo de `tag`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TaggerError;

/// Política para escolher entre spans sobrepostos.
///
/// Veja [`crate::resolver`] para a semântica exata de cada estratégia.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ConflictStrategy {
    /// Mantém todos os spans, inclusive sobrepostos.
    All,
    /// Prefere o casamento mais longo em cada início, da esquerda para a direita.
    #[default]
    Max,
    /// Prefere os casamentos mais curtos; nenhum span contém outro.
    Min,
}

impl FromStr for ConflictStrategy {
    type Err = TaggerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ALL" => Ok(ConflictStrategy::All),
            "MAX" => Ok(ConflictStrategy::Max),
            "MIN" => Ok(ConflictStrategy::Min),
            other => Err(TaggerError::UnknownStrategy(other.to_string())),
        }
    }
}

impl fmt::Display for ConflictStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ConflictStrategy::All => "ALL",
            ConflictStrategy::Max => "MAX",
            ConflictStrategy::Min => "MIN",
        };
        write!(f, "{}", name)
    }
}

/// Como encontrar as ocorrências literais do vocabulário.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchMethod {
    /// `str::find` repetido para cada padrão. Simples, O(|texto| × |vocabulário|).
    Naive,
    /// Autômato Aho-Corasick: uma única passada pelo texto.
    #[default]
    AhoCorasick,
}

impl FromStr for SearchMethod {
    type Err = TaggerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "naive" => Ok(SearchMethod::Naive),
            "ahocorasick" => Ok(SearchMethod::AhoCorasick),
            other => Err(TaggerError::UnknownSearchMethod(other.to_string())),
        }
    }
}

impl fmt::Display for SearchMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SearchMethod::Naive => write!(f, "naive"),
            SearchMethod::AhoCorasick => write!(f, "ahocorasick"),
        }
    }
}

/// Configuração compartilhada pelos três taggers.
///
/// `layer_name` só importa para [`annotate`](crate::tagger::KeywordTagger::annotate):
/// quando ausente, cada tagger usa seu nome padrão (`keywords`, `regexes`, `events`).
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TaggerConfig {
    pub search_method: SearchMethod,
    pub conflict_resolving_strategy: ConflictStrategy,
    pub layer_name: Option<String>,
}

impl TaggerConfig {
    /// Constrói a configuração a partir de nomes textuais (ex: vindos de linha de comando).
    pub fn parse(search_method: &str, strategy: &str) -> Result<Self, TaggerError> {
        Ok(Self {
            search_method: search_method.parse()?,
            conflict_resolving_strategy: strategy.parse()?,
            layer_name: None,
        })
    }

    pub fn with_strategy(mut self, strategy: ConflictStrategy) -> Self {
        self.conflict_resolving_strategy = strategy;
        self
    }

    pub fn with_method(mut self, method: SearchMethod) -> Self {
        self.search_method = method;
        self
    }

    pub fn with_layer_name(mut self, name: impl Into<String>) -> Self {
        self.layer_name = Some(name.into());
        self
    }

    pub(crate) fn layer_or<'a>(&'a self, default: &'a str) -> &'a str {
        self.layer_name.as_deref().unwrap_or(default)
    }
}
