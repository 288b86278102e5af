use std::io::{self, BufWriter};
use std::sync::Arc;

use anyhow::Context;

use authorizer_cli::Handler;
use authorizer_infra::{AuthorizerConfig, InMemoryAccountStore};

fn main() -> anyhow::Result<()> {
    authorizer_observability::init();

    let config = AuthorizerConfig::from_env().context("failed to load configuration")?;
    tracing::info!(
        account_id = %config.account_id,
        storage_failures = ?config.storage_failures,
        "authorizer starting"
    );

    let handler = Handler::new(Arc::new(InMemoryAccountStore::new()), &config);

    let stdin = io::stdin().lock();
    let stdout = BufWriter::new(io::stdout().lock());

    if let Err(err) = handler.handle(stdin, stdout) {
        tracing::error!(error = %err, "request stream aborted");
        return Err(err).context("request stream aborted");
    }

    tracing::info!("input exhausted; shutting down");
    Ok(())
}
