use anyhow::{Context, Result};
use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use uuid::Uuid;

use crate::data::{Event, Quote};

pub trait QuoteStore: Send + Sync {
    fn save_quote(&self, quote: &Quote) -> Result<()>;
    fn load_quote(&self, id: &Uuid) -> Result<Quote>;
    fn list_quotes(&self) -> Result<Vec<Quote>>;
    fn append_event(&self, id: &Uuid, event: &Event) -> Result<()>;
}

pub struct FileQuoteStore {
    base_dir: PathBuf,
}

impl FileQuoteStore {
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Self {
        Self {
            base_dir: base_dir.as_ref().to_path_buf(),
        }
    }

    fn quote_dir(&self, id: &Uuid) -> PathBuf {
        self.base_dir.join(id.to_string())
    }

    fn quote_path(&self, id: &Uuid) -> PathBuf {
        self.quote_dir(id).join("quote.json")
    }

    fn history_path(&self, id: &Uuid) -> PathBuf {
        self.quote_dir(id).join("history.ndjson")
    }
}

impl QuoteStore for FileQuoteStore {
    fn save_quote(&self, quote: &Quote) -> Result<()> {
        let dir = self.quote_dir(&quote.id);
        fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create quote directory: {:?}", dir))?;

        let path = self.quote_path(&quote.id);
        let json = serde_json::to_string_pretty(quote)?;
        fs::write(&path, json).with_context(|| format!("Failed to write quote: {:?}", path))?;

        tracing::info!(quote_id = %quote.id, total = quote.estimate.pricing.total, "Saved quote");
        Ok(())
    }

    fn load_quote(&self, id: &Uuid) -> Result<Quote> {
        let path = self.quote_path(id);
        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read quote: {:?}", path))?;
        let quote: Quote = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse quote: {:?}", path))?;
        Ok(quote)
    }

    fn list_quotes(&self) -> Result<Vec<Quote>> {
        if !self.base_dir.exists() {
            return Ok(Vec::new());
        }

        let mut quotes = Vec::new();
        for entry in fs::read_dir(&self.base_dir)? {
            let path = entry?.path();
            let Some(id) = path
                .file_name()
                .and_then(|n| n.to_str())
                .and_then(|n| Uuid::parse_str(n).ok())
            else {
                continue;
            };

            match self.load_quote(&id) {
                Ok(quote) => quotes.push(quote),
                Err(e) => tracing::warn!(quote_id = %id, error = %e, "Skipping unreadable quote"),
            }
        }

        quotes.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(quotes)
    }

    fn append_event(&self, id: &Uuid, event: &Event) -> Result<()> {
        let dir = self.quote_dir(id);
        fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create quote directory: {:?}", dir))?;

        let path = self.history_path(id);
        let file = fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .with_context(|| format!("Failed to open history: {:?}", path))?;

        let mut writer = BufWriter::new(file);
        let json = serde_json::to_string(event)?;
        writeln!(writer, "{}", json)?;
        writer.flush()?;

        Ok(())
    }
}
