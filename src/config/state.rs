// Application state module
// Immutable per-process state shared by every request task

use std::path::{Path, PathBuf};

use super::types::Config;
use crate::listing::{Template, TemplateError};

/// Application state
pub struct AppState {
    pub config: Config,
    /// Directory served at `/`
    pub root: PathBuf,
    /// Process-wide page template, loaded once at startup
    pub template: Template,
}

impl AppState {
    pub fn new(config: Config) -> Result<Self, TemplateError> {
        let template = match config.listing.template.as_deref() {
            Some(path) => Template::load(Path::new(path))?,
            None => Template::builtin(),
        };

        Ok(Self {
            root: PathBuf::from(&config.listing.root),
            config,
            template,
        })
    }
}
