//! File-backed implementations of the ledger's collaborator traits.

use carteira_core::errors::{Error, Result};
use carteira_core::operations::{
    parse_operations_csv, validate_operation, ImportConfig, ImportRowError, Operation,
    OperationRepositoryTrait,
};
use carteira_core::quotes::{quotes_to_map, Quote, QuoteMap, QuoteProviderTrait};
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

/// Reads operations from a `.json` array or a `.csv` file on every call.
pub struct FileOperationRepository {
    path: PathBuf,
    import_config: ImportConfig,
    skip_invalid_rows: bool,
}

impl FileOperationRepository {
    pub fn new(path: impl Into<PathBuf>, import_config: ImportConfig, skip_invalid_rows: bool) -> Self {
        Self {
            path: path.into(),
            import_config,
            skip_invalid_rows,
        }
    }

    fn is_csv(path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"))
    }

    fn read_csv(&self, file: File) -> Result<Vec<Operation>> {
        let result = parse_operations_csv(BufReader::new(file), &self.import_config)?;
        self.accept(result.operations, result.errors)
    }

    /// JSON entries go through the same checks as CSV rows; `line` is the
    /// 1-based position in the array.
    fn read_json(&self, file: File) -> Result<Vec<Operation>> {
        let parsed: Vec<Operation> = serde_json::from_reader(BufReader::new(file))?;
        let mut operations = Vec::with_capacity(parsed.len());
        let mut errors = Vec::new();
        for (index, operation) in parsed.into_iter().enumerate() {
            match validate_operation(&operation) {
                Ok(()) => operations.push(operation),
                Err(e) => errors.push(ImportRowError {
                    line: index + 1,
                    message: e.to_string(),
                }),
            }
        }
        self.accept(operations, errors)
    }

    fn accept(&self, operations: Vec<Operation>, errors: Vec<ImportRowError>) -> Result<Vec<Operation>> {
        if errors.is_empty() {
            return Ok(operations);
        }
        if self.skip_invalid_rows {
            for row_error in &errors {
                log::warn!("Skipping {}: {}", self.path.display(), row_error);
            }
            return Ok(operations);
        }
        let details: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
        Err(Error::Import(format!(
            "{} has {} invalid rows: {}",
            self.path.display(),
            errors.len(),
            details.join("; ")
        )))
    }
}

impl OperationRepositoryTrait for FileOperationRepository {
    fn list_operations(&self) -> Result<Vec<Operation>> {
        let file = File::open(&self.path)
            .map_err(|e| Error::Repository(format!("{}: {}", self.path.display(), e)))?;
        let operations = if Self::is_csv(&self.path) {
            self.read_csv(file)?
        } else {
            self.read_json(file)?
        };
        log::debug!(
            "Loaded {} operations from {}",
            operations.len(),
            self.path.display()
        );
        Ok(operations)
    }
}

/// Serves quotes from a JSON object mapping ticker to price, or nothing
/// when no file was given.
pub struct FileQuoteProvider {
    path: Option<PathBuf>,
}

impl FileQuoteProvider {
    pub fn new(path: Option<PathBuf>) -> Self {
        Self { path }
    }

    fn load(&self, path: &Path) -> Result<QuoteMap> {
        let file = File::open(path)
            .map_err(|e| Error::QuoteProvider(format!("{}: {}", path.display(), e)))?;
        let raw: HashMap<String, Decimal> = serde_json::from_reader(BufReader::new(file))
            .map_err(|e| Error::QuoteProvider(format!("{}: {}", path.display(), e)))?;
        Ok(quotes_to_map(
            raw.into_iter().map(|(ticker, price)| Quote { ticker, price }),
        ))
    }
}

impl QuoteProviderTrait for FileQuoteProvider {
    fn latest_quotes(&self, tickers: &[String]) -> Result<QuoteMap> {
        let Some(path) = &self.path else {
            return Ok(QuoteMap::new());
        };
        let mut quotes = self.load(path)?;
        quotes.retain(|ticker, _| tickers.contains(ticker));
        Ok(quotes)
    }
}
