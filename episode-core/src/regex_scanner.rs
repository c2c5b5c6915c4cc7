//! # Scanner de Expressões Regulares
//!
//! Aplica uma sequência ordenada de regex ao texto e enumera **todos** os casamentos
//! de cada uma, inclusive sobrepostos: depois de um casamento que começa em `s`, a
//! busca pela mesma regex recomeça no caractere seguinte a `s` (e não no fim do
//! casamento, como faz `find_iter`).
//!
//! Cada casamento carrega o texto da regex, os grupos nomeados capturados e os
//! metadados do registro correspondente no vocabulário.

use std::collections::BTreeMap;

use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Result, TaggerError};
use crate::pattern_index::next_char_len;
use crate::span::{Span, Spanned};
use crate::vocabulary::{Metadata, VocabularyEntry};

/// Um casamento de regex.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegexMatch {
    pub start: usize,
    pub end: usize,
    /// Texto da regex que produziu o casamento
    pub regex: String,
    /// Grupos nomeados → texto capturado (`None` se o grupo não participou)
    pub groups: BTreeMap<String, Option<String>>,
    /// Campos extras do registro do vocabulário
    #[serde(flatten)]
    pub metadata: Metadata,
}

impl Spanned for RegexMatch {
    fn span(&self) -> Span {
        Span::new(self.start, self.end)
    }
}

struct RegexRule {
    source: String,
    regex: Regex,
    group_names: Vec<String>,
    fields: Metadata,
}

/// Conjunto compilado de regras, aplicadas na ordem do vocabulário.
pub struct RegexScanner {
    rules: Vec<RegexRule>,
}

impl RegexScanner {
    /// Compila todas as regras. Uma regex inválida é erro de configuração que
    /// identifica o padrão problemático.
    pub fn new(entries: Vec<VocabularyEntry>) -> Result<Self> {
        let mut rules = Vec::with_capacity(entries.len());
        for entry in entries {
            let regex = Regex::new(&entry.pattern).map_err(|source| TaggerError::InvalidRegex {
                pattern: entry.pattern.clone(),
                source,
            })?;
            let group_names = regex.capture_names().flatten().map(str::to_string).collect();
            rules.push(RegexRule {
                source: entry.pattern,
                regex,
                group_names,
                fields: entry.fields,
            });
        }
        debug!(rules = rules.len(), "regras de regex compiladas");
        Ok(Self { rules })
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Todos os casamentos, regra por regra, sem resolução de conflitos.
    pub fn scan(&self, text: &str) -> Vec<RegexMatch> {
        let mut matches = Vec::new();
        for rule in &self.rules {
            let mut at = 0;
            while at <= text.len() {
                let Some(caps) = rule.regex.captures_at(text, at) else {
                    break;
                };
                let Some(whole) = caps.get(0) else {
                    break;
                };

                // casamentos vazios não formam spans válidos
                if whole.start() < whole.end() {
                    let groups = rule
                        .group_names
                        .iter()
                        .map(|name| (name.clone(), caps.name(name).map(|g| g.as_str().to_string())))
                        .collect();
                    matches.push(RegexMatch {
                        start: whole.start(),
                        end: whole.end(),
                        regex: rule.source.clone(),
                        groups,
                        metadata: rule.fields.clone(),
                    });
                }
                at = whole.start() + next_char_len(text, whole.start());
            }
        }
        matches
    }
}
