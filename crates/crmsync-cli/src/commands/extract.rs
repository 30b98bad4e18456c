//! Extract command implementation.

use super::open_store;
use crate::cli::ExtractArgs;
use crate::config::Config;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use crmsync_extractor::{ExtractionResult, Extractor, StaticPage};
use crmsync_gatekeeper::Gatekeeper;
use std::fs;
use tracing::info;

/// Execute the extract command.
pub async fn execute_extract(args: ExtractArgs, config: &Config, formatter: &Formatter) -> Result<()> {
    let result = run_extract(&args, config).await?;
    println!("{}", formatter.format_result(&result)?);

    match result {
        ExtractionResult::Success { .. } => Ok(()),
        ExtractionResult::Failure { error } => Err(CliError::ExtractionFailed(error)),
    }
}

/// Run one pass over the saved page and return its result.
pub async fn run_extract(args: &ExtractArgs, config: &Config) -> Result<ExtractionResult> {
    let markup = fs::read_to_string(&args.html)?;
    info!(file = %args.html.display(), path = %args.path, bytes = markup.len(), "Loaded page");

    let store = open_store(config)?;
    let gatekeeper = Gatekeeper::new(config.validation.clone())?;
    let extractor = Extractor::new(store, gatekeeper, config.extractor.clone())?;

    let page = StaticPage::new(args.path.clone(), markup);
    Ok(extractor.extract(&page).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crmsync_domain::traits::CollectionStore;
    use crmsync_extractor::ExtractorConfig;
    use crmsync_store::SqliteStore;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn config_in(dir: &TempDir) -> Config {
        Config {
            database: dir.path().join("data").join("crm.db"),
            extractor: ExtractorConfig::fast(),
            ..Config::default()
        }
    }

    #[tokio::test]
    async fn test_extract_saved_page() {
        let dir = TempDir::new().unwrap();
        let html = dir.path().join("deals.html");
        fs::write(
            &html,
            r#"<div class="deal-card" data-deal-id="d-1"><h3>Renewal</h3> $1,200</div>"#,
        )
        .unwrap();
        let config = config_in(&dir);
        let args = ExtractArgs {
            html,
            path: "/app/deals".to_string(),
        };

        let result = run_extract(&args, &config).await.unwrap();
        assert_eq!(result.counts().unwrap().deals, 1);

        let store = SqliteStore::new(&config.database).unwrap();
        let deals = store.get(crmsync_domain::RecordType::Deals).unwrap().deals;
        assert_eq!(deals[0].title, "Renewal");
        assert_eq!(deals[0].value, 1_200.0);
    }

    #[tokio::test]
    async fn test_missing_page_is_io_error() {
        let dir = TempDir::new().unwrap();
        let args = ExtractArgs {
            html: PathBuf::from("/nonexistent/page.html"),
            path: "/app/contacts".to_string(),
        };
        let err = run_extract(&args, &config_in(&dir)).await.unwrap_err();
        assert!(matches!(err, CliError::Io(_)));
    }
}
