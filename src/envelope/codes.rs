//! Response code table.

use std::collections::HashMap;

use crate::config::schema::{CodeMeaningConfig, ResponseCodeConfig};

/// The single success code.
pub const OK_CODE: &str = "00000";

/// Generic server-side failure.
pub const SYSTEM_ERROR_CODE: &str = "99999";

/// How a response code is handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CodeMeaning {
    Ok,
    SystemError,
    Business,
}

impl From<CodeMeaningConfig> for CodeMeaning {
    fn from(value: CodeMeaningConfig) -> Self {
        match value {
            CodeMeaningConfig::Ok => CodeMeaning::Ok,
            CodeMeaningConfig::SystemError => CodeMeaning::SystemError,
            CodeMeaningConfig::Business => CodeMeaning::Business,
        }
    }
}

/// A known `(code, meaning)` pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseCode {
    pub code: String,
    pub name: String,
    pub meaning: CodeMeaning,
}

/// Read-only mapping from wire codes to their meaning.
///
/// Built once at startup and shared via `Arc`. Unknown codes have no entry
/// and are treated as failures.
#[derive(Debug, Clone)]
pub struct ResponseCodeTable {
    codes: HashMap<String, ResponseCode>,
}

impl ResponseCodeTable {
    /// Table with only `OK` and `SYSTEM_ERROR`.
    pub fn builtin() -> Self {
        let mut codes = HashMap::new();
        codes.insert(
            OK_CODE.to_string(),
            ResponseCode {
                code: OK_CODE.to_string(),
                name: "OK".to_string(),
                meaning: CodeMeaning::Ok,
            },
        );
        codes.insert(
            SYSTEM_ERROR_CODE.to_string(),
            ResponseCode {
                code: SYSTEM_ERROR_CODE.to_string(),
                name: "SYSTEM_ERROR".to_string(),
                meaning: CodeMeaning::SystemError,
            },
        );
        Self { codes }
    }

    /// Built-in codes extended with configured entries.
    ///
    /// Entries that would override a built-in code or add a second success
    /// code are skipped; validation reports them before this point.
    pub fn from_config(entries: &[ResponseCodeConfig]) -> Self {
        let mut table = Self::builtin();
        for entry in entries {
            let meaning = CodeMeaning::from(entry.meaning);
            if table.codes.contains_key(&entry.code) || meaning == CodeMeaning::Ok {
                tracing::warn!(
                    code = %entry.code,
                    name = %entry.name,
                    "Ignoring response code entry"
                );
                continue;
            }
            table.codes.insert(
                entry.code.clone(),
                ResponseCode {
                    code: entry.code.clone(),
                    name: entry.name.clone(),
                    meaning,
                },
            );
        }
        table
    }

    pub fn lookup(&self, code: &str) -> Option<&ResponseCode> {
        self.codes.get(code)
    }

    /// Meaning of a code, `None` for unknown codes.
    pub fn meaning(&self, code: &str) -> Option<CodeMeaning> {
        self.lookup(code).map(|c| c.meaning)
    }

    pub fn is_success(&self, code: &str) -> bool {
        self.meaning(code) == Some(CodeMeaning::Ok)
    }

    /// All entries ordered by code.
    pub fn entries(&self) -> Vec<&ResponseCode> {
        let mut entries: Vec<_> = self.codes.values().collect();
        entries.sort_by(|a, b| a.code.cmp(&b.code));
        entries
    }
}

impl Default for ResponseCodeTable {
    fn default() -> Self {
        Self::builtin()
    }
}
