//! Parser configuration.

use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use serde::{Deserialize, Serialize};

use crate::ast::types::Convention;

/// Which argument-convention keywords are accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConventionSet {
    /// `mut`, `owned`, `ref`, `out`, `read`.
    Modern,
    /// `inout`, `owned`, `ref`.
    Legacy,
    #[default]
    Both,
}

impl ConventionSet {
    pub fn accepts(&self, convention: Convention) -> bool {
        match self {
            ConventionSet::Both => true,
            ConventionSet::Modern => convention != Convention::Inout,
            ConventionSet::Legacy => matches!(
                convention,
                Convention::Inout | Convention::Owned | Convention::Ref
            ),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    /// Columns a tab advances the indentation width by.
    pub tab_width: u32,
    pub conventions: ConventionSet,
    /// Checked before every statement; once set the parse stops.
    #[serde(skip)]
    pub cancel: Option<Arc<AtomicBool>>,
}

impl Default for ParserConfig {
    fn default() -> Self {
        ParserConfig {
            tab_width: 8,
            conventions: ConventionSet::default(),
            cancel: None,
        }
    }
}

impl ParserConfig {
    pub fn with_conventions(mut self, conventions: ConventionSet) -> Self {
        self.conventions = conventions;
        self
    }

    pub fn with_tab_width(mut self, tab_width: u32) -> Self {
        self.tab_width = tab_width;
        self
    }

    pub fn with_cancel_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel = Some(flag);
        self
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::Relaxed))
    }
}
