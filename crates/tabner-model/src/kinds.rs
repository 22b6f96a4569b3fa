//! Backend-selection enums for the retrieval and linking layers.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Which entity-retrieval backend to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RetrieverKind {
    /// NLP annotation-server pipeline.
    Pipeline,
    /// Prompt-based extraction through an LLM provider.
    Llm,
}

impl FromStr for RetrieverKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pipeline" => Ok(RetrieverKind::Pipeline),
            "llm" => Ok(RetrieverKind::Llm),
            other => Err(format!("unknown retriever kind: {other}")),
        }
    }
}

impl fmt::Display for RetrieverKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RetrieverKind::Pipeline => write!(f, "pipeline"),
            RetrieverKind::Llm => write!(f, "llm"),
        }
    }
}

/// Which entity-linking backend to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkerKind {
    /// DBpedia Lookup search API.
    Dbpedia,
}

impl FromStr for LinkerKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "dbpedia" => Ok(LinkerKind::Dbpedia),
            other => Err(format!("unknown linker kind: {other}")),
        }
    }
}

impl fmt::Display for LinkerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LinkerKind::Dbpedia => write!(f, "dbpedia"),
        }
    }
}
