//! # Vocabulários
//!
//! O vocabulário diz **o que** procurar. Há dois formatos:
//!
//! - [`Vocabulary`] para o [`KeywordTagger`](crate::tagger::KeywordTagger): uma lista
//!   simples de termos ou um mapa `termo → rótulo`. O formato é decidido uma única vez,
//!   na construção (ou na desserialização: array JSON → lista, objeto JSON → mapa).
//! - Registros ([`VocabularyRecord`]) para os taggers de regex e de eventos: cada
//!   registro é um objeto com um campo obrigatório (`regex` ou `term`) e campos
//!   extras arbitrários que são copiados para cada casamento.
//!
//! A validação dos registros acontece aqui, antes de qualquer chamada a `tag`:
//! campos reservados e campos obrigatórios ausentes viram erro imediatamente.

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

use crate::error::{Result, TaggerError};

/// Campos extras de um registro do vocabulário.
pub type Metadata = Map<String, Value>;

/// Um registro bruto do vocabulário, como produzido por um carregador externo.
pub type VocabularyRecord = Map<String, Value>;

/// Campo obrigatório dos registros de eventos.
pub const TERM: &str = "term";
/// Campo obrigatório dos registros de regex.
pub const REGEX: &str = "regex";

/// Campos que um registro de evento não pode definir: são preenchidos pelo tagger.
pub const EVENT_RESERVED: &[&str] = &["start", "end", "wstart", "wend", "cstart", "wstart_raw", "wend_raw"];
/// Campos que um registro de regex não pode definir.
pub const REGEX_RESERVED: &[&str] = &["start", "end", "regex", "groups"];

/// Vocabulário de palavras-chave.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Vocabulary {
    /// Apenas os termos; os casamentos não recebem rótulo.
    Plain(Vec<String>),
    /// Termo → rótulo arbitrário (string, número, objeto...).
    Labeled(BTreeMap<String, Value>),
}

impl Vocabulary {
    /// Termos únicos, na ordem do vocabulário.
    ///
    /// Termos repetidos numa lista simples são descartados após a primeira ocorrência:
    /// cada padrão é uma chave única.
    pub fn patterns(&self) -> Vec<&str> {
        match self {
            Vocabulary::Plain(terms) => {
                let mut seen = HashSet::new();
                terms
                    .iter()
                    .map(String::as_str)
                    .filter(|t| seen.insert(*t))
                    .collect()
            }
            Vocabulary::Labeled(map) => map.keys().map(String::as_str).collect(),
        }
    }

    /// Rótulo associado ao termo, se o vocabulário for um mapa.
    pub fn label(&self, pattern: &str) -> Option<&Value> {
        match self {
            Vocabulary::Plain(_) => None,
            Vocabulary::Labeled(map) => map.get(pattern),
        }
    }

    pub fn is_labeled(&self) -> bool {
        matches!(self, Vocabulary::Labeled(_))
    }

    /// Número de termos únicos, o mesmo que `patterns().len()`.
    pub fn len(&self) -> usize {
        match self {
            Vocabulary::Plain(_) => self.patterns().len(),
            Vocabulary::Labeled(map) => map.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl From<Vec<String>> for Vocabulary {
    fn from(terms: Vec<String>) -> Self {
        Vocabulary::Plain(terms)
    }
}

impl From<Vec<&str>> for Vocabulary {
    fn from(terms: Vec<&str>) -> Self {
        Vocabulary::Plain(terms.into_iter().map(str::to_string).collect())
    }
}

impl From<BTreeMap<String, Value>> for Vocabulary {
    fn from(map: BTreeMap<String, Value>) -> Self {
        Vocabulary::Labeled(map)
    }
}

/// Um registro validado: o padrão e os demais campos.
#[derive(Debug, Clone, PartialEq)]
pub struct VocabularyEntry {
    pub pattern: String,
    pub fields: Metadata,
}

/// Valida registros brutos e separa o campo de padrão dos metadados.
///
/// - `required`: nome do campo que contém o padrão (`term` ou `regex`).
/// - `reserved`: nomes que nenhum registro pode usar.
///
/// Registros com padrão repetido mantêm apenas o primeiro.
pub fn validate_records(
    records: &[VocabularyRecord],
    required: &str,
    reserved: &[&str],
) -> Result<Vec<VocabularyEntry>> {
    let mut entries = Vec::with_capacity(records.len());
    let mut seen = HashSet::new();

    for (index, record) in records.iter().enumerate() {
        let pattern = match record.get(required) {
            Some(Value::String(s)) => s.clone(),
            Some(_) => {
                return Err(TaggerError::NonStringPattern {
                    field: required.to_string(),
                    index,
                })
            }
            None => {
                return Err(TaggerError::MissingField {
                    field: required.to_string(),
                    index,
                })
            }
        };

        if let Some(field) = record.keys().find(|k| reserved.contains(&k.as_str())) {
            return Err(TaggerError::ReservedField {
                field: field.clone(),
                pattern,
            });
        }

        if !seen.insert(pattern.clone()) {
            debug!(pattern = %pattern, "registro duplicado ignorado");
            continue;
        }

        let fields: Metadata = record
            .iter()
            .filter(|(k, _)| k.as_str() != required)
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();

        entries.push(VocabularyEntry { pattern, fields });
    }

    Ok(entries)
}
