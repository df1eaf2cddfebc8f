//! Language frontend framework
//!
//! A frontend walks its language's native AST and populates one
//! [`TranslationUnitDeclaration`] per file: it allocates and registers
//! declarations and resolves integer literals through the shared
//! [`LiteralTypeResolver`]. The core never sees grammar-specific logic.

use crate::config::CpgConfig;
use crate::literal::LiteralTypeResolver;
use crate::translation_unit::TranslationUnitDeclaration;
use crate::types::TargetModel;
use crate::Result;
use std::path::Path;

/// Shared, read-only state handed to every frontend invocation
#[derive(Debug, Clone)]
pub struct TranslationContext {
    pub config: CpgConfig,
    resolver: LiteralTypeResolver,
}

impl TranslationContext {
    pub fn new(config: CpgConfig) -> Self {
        let resolver = LiteralTypeResolver::new(config.target_model);
        Self { config, resolver }
    }

    pub fn resolver(&self) -> &LiteralTypeResolver {
        &self.resolver
    }

    pub fn model(&self) -> TargetModel {
        self.resolver.model()
    }
}

impl Default for TranslationContext {
    fn default() -> Self {
        Self::new(CpgConfig::default())
    }
}

/// Trait for language frontends
///
/// Each frontend is responsible for:
/// 1. Identifying files it can parse
/// 2. Mapping native declarations onto graph declarations
/// 3. Typing literals through the context's resolver
pub trait LanguageFrontend: Send + Sync {
    /// Get the language name (for display)
    fn language_name(&self) -> &str;

    /// Get file extensions this frontend handles
    fn file_extensions(&self) -> &[&str];

    fn can_handle(&self, path: &Path) -> bool {
        if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
            self.file_extensions().contains(&ext)
        } else {
            false
        }
    }

    /// Build the translation unit of one file
    fn parse(
        &self,
        path: &str,
        content: &str,
        ctx: &TranslationContext,
    ) -> Result<TranslationUnitDeclaration>;
}

/// A unit together with the language of the frontend that built it
#[derive(Debug)]
pub struct ParsedUnit {
    pub language: String,
    pub unit: TranslationUnitDeclaration,
}

/// Frontends in registration order. A path is claimed by the first
/// frontend whose extensions match.
#[derive(Default)]
pub struct FrontendRegistry {
    frontends: Vec<Box<dyn LanguageFrontend>>,
}

impl FrontendRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, frontend: impl LanguageFrontend + 'static) {
        for ext in frontend.file_extensions() {
            let owner = self
                .frontends
                .iter()
                .find(|f| f.file_extensions().contains(ext));
            if let Some(owner) = owner {
                tracing::warn!(
                    ".{} is already claimed by {}, {} will not see it",
                    ext,
                    owner.language_name(),
                    frontend.language_name()
                );
            }
        }
        self.frontends.push(Box::new(frontend));
    }

    pub fn find_frontend(&self, path: &Path) -> Option<&dyn LanguageFrontend> {
        self.frontends
            .iter()
            .find(|f| f.can_handle(path))
            .map(|f| f.as_ref())
    }

    /// Language names in registration order
    pub fn languages(&self) -> Vec<&str> {
        self.frontends.iter().map(|f| f.language_name()).collect()
    }

    /// Run `frontend` on one file. A unit the frontend left unnamed is
    /// named after `path`.
    pub fn parse_with(
        &self,
        frontend: &dyn LanguageFrontend,
        path: &Path,
        content: &str,
        ctx: &TranslationContext,
    ) -> Result<ParsedUnit> {
        let name = path.to_string_lossy();
        tracing::debug!("parsing {} with {} frontend", name, frontend.language_name());
        let mut unit = frontend.parse(&name, content, ctx)?;
        if unit.name().is_empty() {
            unit.node.name = name.into_owned();
        }
        Ok(ParsedUnit {
            language: frontend.language_name().to_string(),
            unit,
        })
    }

    /// Parse with the frontend that claims `path`; `None` if none does
    pub fn parse_file(
        &self,
        path: &Path,
        content: &str,
        ctx: &TranslationContext,
    ) -> Result<Option<ParsedUnit>> {
        match self.find_frontend(path) {
            Some(frontend) => self.parse_with(frontend, path, content, ctx).map(Some),
            None => Ok(None),
        }
    }
}

impl std::fmt::Debug for FrontendRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.languages()).finish()
    }
}
