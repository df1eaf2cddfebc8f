//! Parallel translation of source files into sealed translation units
//!
//! Each file is handed to the frontend that claims it, on a worker pool
//! sized from [`CpgConfig::workers`]. Workers report back over a channel;
//! the coordinator restores input order and seals every finished unit
//! behind an [`Arc`] so it can be shared read-only across threads.

use crate::config::CpgConfig;
use crate::frontend::{FrontendRegistry, ParsedUnit, TranslationContext};
use crate::translation_unit::TranslationUnitDeclaration;
use crate::{Error, Result};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Message sent from translation workers to the coordinator
#[derive(Debug)]
pub enum TranslationMessage {
    Translated {
        index: usize,
        path: String,
        language: String,
        unit: TranslationUnitDeclaration,
    },
    Skipped {
        index: usize,
        path: String,
    },
    Failed {
        index: usize,
        path: String,
        error: Error,
    },
}

impl TranslationMessage {
    fn index(&self) -> usize {
        match self {
            Self::Translated { index, .. }
            | Self::Skipped { index, .. }
            | Self::Failed { index, .. } => *index,
        }
    }
}

struct Job {
    index: usize,
    path: PathBuf,
    content: Option<String>,
}

/// Drives frontends over a set of files
pub struct TranslationManager {
    config: CpgConfig,
    registry: FrontendRegistry,
}

impl TranslationManager {
    pub fn new(config: CpgConfig, registry: FrontendRegistry) -> Self {
        Self { config, registry }
    }

    /// Translate files read from disk
    pub fn translate(&self, files: &[PathBuf]) -> Result<TranslationResult> {
        let jobs = files
            .iter()
            .enumerate()
            .map(|(index, path)| Job {
                index,
                path: path.clone(),
                content: None,
            })
            .collect();
        self.run(jobs)
    }

    /// Translate in-memory sources given as `(path, content)` pairs
    pub fn translate_sources<P, S>(
        &self,
        sources: impl IntoIterator<Item = (P, S)>,
    ) -> Result<TranslationResult>
    where
        P: Into<PathBuf>,
        S: Into<String>,
    {
        let jobs = sources
            .into_iter()
            .enumerate()
            .map(|(index, (path, content))| Job {
                index,
                path: path.into(),
                content: Some(content.into()),
            })
            .collect();
        self.run(jobs)
    }

    fn run(&self, jobs: Vec<Job>) -> Result<TranslationResult> {
        let total = jobs.len();
        if total == 0 {
            return Ok(TranslationResult::default());
        }

        let ctx = TranslationContext::new(self.config.clone());
        let workers = self.config.effective_workers().min(total);
        let abort = AtomicBool::new(false);
        debug!("translating {} files on {} workers", total, workers);

        let (job_tx, job_rx) = crossbeam::channel::unbounded::<Job>();
        let (msg_tx, msg_rx) = crossbeam::channel::unbounded::<TranslationMessage>();
        for job in jobs {
            // Receiver is alive until the scope below ends
            let _ = job_tx.send(job);
        }
        drop(job_tx);

        let mut messages = crossbeam::thread::scope(|s| {
            for _ in 0..workers {
                let job_rx = job_rx.clone();
                let msg_tx = msg_tx.clone();
                let (ctx, abort) = (&ctx, &abort);
                s.spawn(move |_| {
                    for job in job_rx.iter() {
                        if abort.load(Ordering::Relaxed) {
                            break;
                        }
                        if msg_tx.send(self.translate_one(job, ctx)).is_err() {
                            break;
                        }
                    }
                });
            }
            drop(msg_tx);

            let mut messages = Vec::with_capacity(total);
            for msg in msg_rx.iter() {
                if self.config.fail_fast && matches!(msg, TranslationMessage::Failed { .. }) {
                    abort.store(true, Ordering::Relaxed);
                }
                messages.push(msg);
            }
            messages
        })
        .map_err(|_| Error::Worker("translation worker panicked".to_string()))?;

        messages.sort_by_key(TranslationMessage::index);

        let mut result = TranslationResult::default();
        for msg in messages {
            match msg {
                TranslationMessage::Translated {
                    path,
                    language,
                    unit,
                    ..
                } => {
                    result.units.push(Arc::new(unit));
                    result.paths.push(path);
                    result.languages.push(language);
                }
                TranslationMessage::Skipped { path, .. } => result.skipped.push(path),
                TranslationMessage::Failed { path, error, .. } => {
                    if self.config.fail_fast {
                        return Err(error);
                    }
                    warn!("failed to translate {}: {}", path, error);
                    result.errors.push((path, error));
                }
            }
        }

        info!(
            "translated {} of {} files ({} skipped, {} failed)",
            result.units.len(),
            total,
            result.skipped.len(),
            result.errors.len()
        );
        Ok(result)
    }

    fn translate_one(&self, job: Job, ctx: &TranslationContext) -> TranslationMessage {
        let Job { index, path, content } = job;
        let name = path.to_string_lossy().into_owned();

        let Some(frontend) = self.registry.find_frontend(&path) else {
            debug!("no frontend for {}, skipping", name);
            return TranslationMessage::Skipped { index, path: name };
        };

        let content = match content {
            Some(content) => content,
            None => match std::fs::read_to_string(&path) {
                Ok(content) => content,
                Err(e) => {
                    return TranslationMessage::Failed {
                        index,
                        path: name,
                        error: e.into(),
                    }
                }
            },
        };

        match self.registry.parse_with(frontend, &path, &content, ctx) {
            Ok(ParsedUnit { language, unit }) => TranslationMessage::Translated {
                index,
                path: name,
                language,
                unit,
            },
            Err(error) => TranslationMessage::Failed {
                index,
                path: name,
                error,
            },
        }
    }
}

/// Sealed output of a translation run, in input order
#[derive(Debug, Default)]
pub struct TranslationResult {
    units: Vec<Arc<TranslationUnitDeclaration>>,
    paths: Vec<String>,
    languages: Vec<String>,
    skipped: Vec<String>,
    errors: Vec<(String, Error)>,
}

impl TranslationResult {
    pub fn units(&self) -> &[Arc<TranslationUnitDeclaration>] {
        &self.units
    }

    /// Unit translated from `path`
    pub fn unit(&self, path: impl AsRef<Path>) -> Option<&Arc<TranslationUnitDeclaration>> {
        let path = path.as_ref().to_string_lossy();
        self.paths
            .iter()
            .position(|p| *p == path)
            .map(|i| &self.units[i])
    }

    /// Language of the frontend that translated `path`
    pub fn language(&self, path: impl AsRef<Path>) -> Option<&str> {
        let path = path.as_ref().to_string_lossy();
        self.paths
            .iter()
            .position(|p| *p == path)
            .map(|i| self.languages[i].as_str())
    }

    pub fn skipped(&self) -> &[String] {
        &self.skipped
    }

    pub fn errors(&self) -> &[(String, Error)] {
        &self.errors
    }

    pub fn stats(&self) -> TranslationStats {
        let mut by_language: Vec<(String, usize)> = Vec::new();
        for language in &self.languages {
            match by_language.iter_mut().find(|(name, _)| name == language) {
                Some((_, count)) => *count += 1,
                None => by_language.push((language.clone(), 1)),
            }
        }

        TranslationStats {
            units: self.units.len(),
            declarations: self.units.iter().map(|u| u.declarations().len()).sum(),
            includes: self.units.iter().map(|u| u.includes().len()).sum(),
            namespaces: self.units.iter().map(|u| u.namespaces().len()).sum(),
            skipped: self.skipped.len(),
            errors: self.errors.len(),
            by_language,
        }
    }
}

/// Totals across a translation run
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize)]
pub struct TranslationStats {
    pub units: usize,
    pub declarations: usize,
    pub includes: usize,
    pub namespaces: usize,
    pub skipped: usize,
    pub errors: usize,
    /// Units per frontend language, in order of first appearance
    pub by_language: Vec<(String, usize)>,
}

impl std::fmt::Display for TranslationStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Translation Statistics:")?;
        writeln!(f, "  Units: {}", self.units)?;
        writeln!(f, "  Declarations: {}", self.declarations)?;
        writeln!(f, "  Includes: {}", self.includes)?;
        writeln!(f, "  Namespaces: {}", self.namespaces)?;
        writeln!(f, "  Skipped: {}", self.skipped)?;
        writeln!(f, "  Errors: {}", self.errors)?;
        if !self.by_language.is_empty() {
            writeln!(f, "  By language:")?;
            for (language, count) in &self.by_language {
                writeln!(f, "    {}: {}", language, count)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::declaration::{Declaration, VariableDeclaration};
    use crate::expression::Expression;
    use crate::frontend::LanguageFrontend;
    use crate::types::{IntegerType, Type};
    use crate::Node;

    /// One `name = literal` per line; a line reading `error` fails the file.
    struct AssignFrontend;

    impl LanguageFrontend for AssignFrontend {
        fn language_name(&self) -> &str {
            "assign"
        }

        fn file_extensions(&self) -> &[&str] {
            &["asg"]
        }

        fn parse(
            &self,
            path: &str,
            content: &str,
            ctx: &TranslationContext,
        ) -> Result<TranslationUnitDeclaration> {
            let mut unit = TranslationUnitDeclaration::new(path);
            for line in content.lines().filter(|l| !l.trim().is_empty()) {
                if line.trim() == "error" {
                    return Err(Error::Frontend {
                        path: path.to_string(),
                        message: "syntax error".to_string(),
                    });
                }
                let (name, literal) = line.split_once('=').ok_or_else(|| Error::Frontend {
                    path: path.to_string(),
                    message: format!("expected assignment: {}", line),
                })?;
                let expr = Expression::parse_integer(literal.trim(), ctx.resolver())?;
                let var = VariableDeclaration::default().with_initializer(expr, ctx.model());
                unit.declare(Declaration::new(Node::new(name.trim()), var));
            }
            Ok(unit)
        }
    }

    /// One include per line
    struct IncludeFrontend;

    impl LanguageFrontend for IncludeFrontend {
        fn language_name(&self) -> &str {
            "include"
        }

        fn file_extensions(&self) -> &[&str] {
            &["inc"]
        }

        fn parse(
            &self,
            path: &str,
            content: &str,
            _ctx: &TranslationContext,
        ) -> Result<TranslationUnitDeclaration> {
            let mut unit = TranslationUnitDeclaration::new(path);
            for line in content.lines() {
                unit.declare(Declaration::include(line.trim()));
            }
            Ok(unit)
        }
    }

    fn manager(config: CpgConfig) -> TranslationManager {
        let mut registry = FrontendRegistry::new();
        registry.register(AssignFrontend);
        registry.register(IncludeFrontend);
        TranslationManager::new(config, registry)
    }

    fn config(workers: usize, fail_fast: bool) -> CpgConfig {
        CpgConfig {
            workers: Some(workers),
            fail_fast,
            ..CpgConfig::default()
        }
    }

    #[test]
    fn test_results_keep_input_order() {
        let sources: Vec<(String, String)> = (0..20)
            .map(|i| (format!("f{}.asg", i), format!("v{} = {}", i, i)))
            .collect();
        let result = manager(config(4, false)).translate_sources(sources).unwrap();

        assert_eq!(result.units().len(), 20);
        for (i, unit) in result.units().iter().enumerate() {
            assert_eq!(unit.name(), format!("f{}.asg", i));
        }
        assert_eq!(result.stats().declarations, 20);
    }

    #[test]
    fn test_units_resolve_literals() {
        let result = manager(config(2, false))
            .translate_sources([("a.asg", "small = 1\nbig = -2147483648\n")])
            .unwrap();

        let unit = result.unit("a.asg").unwrap();
        let big = unit.declaration_by_name::<VariableDeclaration>("big").unwrap();
        assert_eq!(big.ty, Type::Integer(IntegerType::Int));
        assert!(result.unit("b.asg").is_none());
    }

    #[test]
    fn test_unclaimed_files_are_skipped() {
        let result = manager(config(2, false))
            .translate_sources([("a.asg", "x = 1"), ("notes.txt", "x = 1")])
            .unwrap();

        assert_eq!(result.units().len(), 1);
        assert_eq!(result.skipped(), ["notes.txt".to_string()]);
        assert!(result.errors().is_empty());
    }

    #[test]
    fn test_errors_are_collected() {
        let result = manager(config(3, false))
            .translate_sources([
                ("a.asg", "x = 1"),
                ("b.asg", "error"),
                ("c.asg", "y = 0x"),
            ])
            .unwrap();

        assert_eq!(result.units().len(), 1);
        let failed: Vec<&str> = result.errors().iter().map(|(p, _)| p.as_str()).collect();
        assert_eq!(failed, ["b.asg", "c.asg"]);
        assert!(matches!(result.errors()[1].1, Error::MalformedLiteral(_)));
        assert_eq!(result.stats().errors, 2);
    }

    #[test]
    fn test_fail_fast_returns_error() {
        let err = manager(config(1, true))
            .translate_sources([
                ("a.asg", "x = 1"),
                ("b.asg", "error"),
                ("c.asg", "y = 2"),
            ])
            .unwrap_err();
        assert!(matches!(err, Error::Frontend { .. }));
    }

    #[test]
    fn test_translate_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let present = dir.path().join("a.asg");
        std::fs::write(&present, "x = 42u\n").unwrap();
        let missing = dir.path().join("missing.asg");

        let result = manager(config(2, false))
            .translate(&[present.clone(), missing])
            .unwrap();

        let unit = result.unit(&present).unwrap();
        let x = unit.declaration_by_name::<VariableDeclaration>("x").unwrap();
        assert_eq!(x.ty, Type::Integer(IntegerType::UnsignedInt));
        assert_eq!(result.errors().len(), 1);
        assert!(matches!(result.errors()[0].1, Error::Io(_)));
    }

    #[test]
    fn test_units_are_shareable() {
        let result = manager(config(1, false))
            .translate_sources([("a.asg", "x = 1")])
            .unwrap();
        let unit = Arc::clone(&result.units()[0]);

        let handle = std::thread::spawn(move || unit.declarations().len());
        assert_eq!(handle.join().unwrap(), 1);
    }

    #[test]
    fn test_units_record_their_language() {
        let result = manager(config(3, false))
            .translate_sources([
                ("a.asg", "x = 1"),
                ("b.inc", "stdio.h\nstdlib.h"),
                ("c.asg", "y = 2"),
                ("d.txt", ""),
            ])
            .unwrap();

        assert_eq!(result.language("a.asg"), Some("assign"));
        assert_eq!(result.language("b.inc"), Some("include"));
        assert_eq!(result.language("d.txt"), None);

        let stats = result.stats();
        assert_eq!(stats.includes, 2);
        assert_eq!(
            stats.by_language,
            [("assign".to_string(), 2), ("include".to_string(), 1)]
        );
        assert!(stats.to_string().contains("    assign: 2"));
    }

    #[test]
    fn test_empty_input() {
        let result = manager(CpgConfig::default()).translate(&[]).unwrap();
        assert!(result.units().is_empty());
        assert_eq!(result.stats(), TranslationStats::default());
    }
}
