//! # Documento Anotado
//!
//! Um documento hospedeiro mínimo: o texto, sua tabela de palavras e um conjunto
//! de camadas nomeadas. Os taggers podem devolver a lista de casamentos
//! diretamente (`tag`) ou gravá-la como camada do documento (`annotate`).
//!
//! As camadas são guardadas como JSON, então qualquer tagger pode escrever em
//! qualquer documento sem que o documento conheça os tipos de saída.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Result, TaggerError};
use crate::offsets::WordTable;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnotatedText {
    pub text: String,
    pub word_table: WordTable,
    #[serde(default)]
    pub layers: BTreeMap<String, Value>,
}

impl AnnotatedText {
    /// Cria o documento derivando a tabela de palavras do próprio texto.
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let word_table = WordTable::from_text(&text);
        Self::with_word_table(text, word_table)
    }

    /// Cria o documento com uma tabela de palavras vinda de um tokenizador externo.
    pub fn with_word_table(text: impl Into<String>, word_table: WordTable) -> Self {
        Self {
            text: text.into(),
            word_table,
            layers: BTreeMap::new(),
        }
    }

    pub fn layer(&self, name: &str) -> Option<&Value> {
        self.layers.get(name)
    }

    /// Substitui (ou cria) a camada `name` com os itens serializados.
    pub fn set_layer<T: Serialize>(&mut self, name: &str, items: &[T]) -> Result<()> {
        let value = serde_json::to_value(items).map_err(|source| TaggerError::Layer {
            layer: name.to_string(),
            source,
        })?;
        self.layers.insert(name.to_string(), value);
        Ok(())
    }
}
