//! ClassyFire client
//!
//! Wires the HTTP transport, rate-limited fetcher, persistent cache and
//! batch orchestrator from a [`ClientConfig`], and exposes single-item and
//! batch helpers over raw strings.

use crate::config::ClientConfig;
use crate::db::SqliteCacheStore;
use crate::error::{ClassyFireError, Result};
use crate::models::{Classification, Identifier};
use crate::services::tabular::delimiter_for_path;
use crate::services::{
    BatchOrchestrator, ClassificationCache, ClassificationTransport, ClassifiedRow,
    ColumnSelection, HttpTransport, ProgressReporter, RateLimitedFetcher, Row,
};
use futures::Stream;
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};

/// High-level ClassyFire client
pub struct ClassyFire {
    orchestrator: BatchOrchestrator,
}

impl ClassyFire {
    /// Client over HTTP with the on-disk cache in `config.cache_dir`
    ///
    /// When the cache database cannot be opened the client still works,
    /// caching in memory only.
    pub async fn new(config: ClientConfig) -> Result<Self> {
        let transport = HttpTransport::new(&config.base_url, config.timeout, &config.user_agent)?;

        let cache = match SqliteCacheStore::open(&config.cache_dir).await {
            Ok(store) => ClassificationCache::new(Arc::new(store)),
            Err(e) => {
                warn!(
                    cache_dir = %config.cache_dir.display(),
                    error = %e,
                    "Cache database unavailable, caching in memory only"
                );
                ClassificationCache::ephemeral()
            }
        };

        info!(
            base_url = %config.base_url,
            cache_dir = %config.cache_dir.display(),
            persistent_cache = cache.is_persistent(),
            "ClassyFire client ready"
        );

        Ok(Self::with_parts(config, Arc::new(transport), cache))
    }

    /// Client over an arbitrary transport and cache
    pub fn with_parts(
        config: ClientConfig,
        transport: Arc<dyn ClassificationTransport>,
        cache: ClassificationCache,
    ) -> Self {
        let fetcher = RateLimitedFetcher::new(transport, config.timeout, config.min_interval);
        let orchestrator = BatchOrchestrator::new(fetcher, cache)
            .with_empty_policy(config.empty_policy)
            .with_failure_policy(config.failure_policy)
            .with_retry_delay(config.retry_delay);

        Self { orchestrator }
    }

    pub fn with_progress(mut self, progress: Arc<dyn ProgressReporter>) -> Self {
        self.orchestrator = self.orchestrator.with_progress(progress);
        self
    }

    pub fn cache(&self) -> &ClassificationCache {
        self.orchestrator.cache()
    }

    pub async fn classify(&self, identifier: &Identifier) -> Result<Classification> {
        self.orchestrator.classify(identifier).await
    }

    /// Classify one InChIKey, with or without the `InChIKey=` prefix
    pub async fn classify_inchikey(&self, inchikey: &str) -> Result<Classification> {
        self.classify(&Identifier::inchikey(inchikey)?).await
    }

    pub async fn classify_smiles(&self, smiles: &str) -> Result<Classification> {
        self.classify(&Identifier::smiles(smiles)?).await
    }

    /// Classify many identifiers, yielding results in input order
    pub fn classify_many(
        &self,
        identifiers: Vec<Identifier>,
    ) -> impl Stream<Item = Result<Classification>> + '_ {
        self.orchestrator.classify_many(identifiers)
    }

    /// Validate every key, then classify them in input order
    ///
    /// # Errors
    /// `InvalidInchiKey` for the first bad key; nothing is fetched.
    pub fn classify_inchikeys<S: AsRef<str>>(
        &self,
        inchikeys: &[S],
    ) -> Result<impl Stream<Item = Result<Classification>> + '_> {
        let identifiers = inchikeys
            .iter()
            .map(|k| Identifier::inchikey(k.as_ref()))
            .collect::<Result<Vec<_>>>()?;
        Ok(self.classify_many(identifiers))
    }

    /// Validate every SMILES, then classify them in input order
    pub fn classify_smiles_list<S: AsRef<str>>(
        &self,
        smiles: &[S],
    ) -> Result<impl Stream<Item = Result<Classification>> + '_> {
        let identifiers = smiles
            .iter()
            .map(|s| Identifier::smiles(s.as_ref()))
            .collect::<Result<Vec<_>>>()?;
        Ok(self.classify_many(identifiers))
    }

    pub fn classify_rows(
        &self,
        rows: Vec<Row>,
        selection: ColumnSelection,
    ) -> impl Stream<Item = Result<ClassifiedRow>> + '_ {
        self.orchestrator.classify_rows(rows, selection)
    }

    /// Classify a delimited file
    ///
    /// Without an explicit `separator` the delimiter comes from the file
    /// extension (`.tsv` tab, `.ssv` space, otherwise comma).
    pub fn classify_csv(
        &self,
        path: &Path,
        separator: Option<u8>,
        has_header: bool,
        selection: ColumnSelection,
    ) -> Result<impl Stream<Item = Result<ClassifiedRow>> + '_> {
        if !path.is_file() {
            return Err(ClassyFireError::Tabular(format!(
                "{}: not a file",
                path.display()
            )));
        }
        let delimiter = separator
            .or_else(|| delimiter_for_path(path))
            .unwrap_or(b',');
        self.orchestrator
            .classify_delimited(path, delimiter, has_header, selection)
    }
}
