//! Options, word lists and the draw orchestrator.

pub(crate) mod settings;
pub(crate) mod word;
pub(crate) mod wordcloud;
