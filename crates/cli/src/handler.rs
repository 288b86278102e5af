//! Request stream handling.

use std::io::{Read, Write};

use chrono::Utc;
use tracing::debug;

use authorizer_infra::{
    AccountService, AccountStore, AuthorizationService, AuthorizerConfig, InitializeAccount,
    ServiceError,
};

use crate::dto::{Input, Output};
use crate::errors::TransportError;

/// Routes each request to the lifecycle or the authorization engine.
#[derive(Debug)]
pub struct Handler<S> {
    accounts: AccountService<S>,
    authorizations: AuthorizationService<S>,
}

impl<S: AccountStore + Clone> Handler<S> {
    pub fn new(store: S, config: &AuthorizerConfig) -> Self {
        Self {
            accounts: AccountService::new(store.clone(), config.account_id)
                .with_storage_failures(config.storage_failures),
            authorizations: AuthorizationService::new(store, config.account_id)
                .with_storage_failures(config.storage_failures),
        }
    }
}

impl<S: AccountStore> Handler<S> {
    /// Read JSON values from `reader` until EOF, writing one response line
    /// per value, in order.
    ///
    /// Values may be separated by newlines or any other JSON whitespace. The
    /// first malformed value ends the loop with `TransportError::Decode`;
    /// responses already written stay written.
    pub fn handle<R: Read, W: Write>(
        &self,
        reader: R,
        mut writer: W,
    ) -> Result<(), TransportError> {
        let inputs = serde_json::Deserializer::from_reader(reader).into_iter::<Input>();

        for input in inputs {
            let input = input.map_err(TransportError::Decode)?;
            let output = self.respond(input)?;

            serde_json::to_writer(&mut writer, &output).map_err(TransportError::Encode)?;
            writer.write_all(b"\n")?;
            writer.flush()?;
        }

        Ok(())
    }

    /// Process a single decoded request.
    pub fn respond(&self, input: Input) -> Result<Output, ServiceError> {
        if let Some(op) = input.account {
            let decision = self.accounts.init_account(&InitializeAccount {
                active_card: op.active_card,
                max_limit: op.available_limit,
                requested_at: Utc::now(),
            })?;
            return Ok(decision.into());
        }

        if let Some(op) = input.transaction {
            let decision = self.authorizations.authorize(&op.into())?;
            return Ok(decision.into());
        }

        debug!("request carried neither an account nor a transaction");
        Ok(Output::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use authorizer_infra::InMemoryAccountStore;

    fn handler() -> Handler<Arc<InMemoryAccountStore>> {
        Handler::new(
            Arc::new(InMemoryAccountStore::new()),
            &AuthorizerConfig::default(),
        )
    }

    fn run(input: &str) -> (String, Result<(), TransportError>) {
        let mut out = Vec::new();
        let result = handler().handle(input.as_bytes(), &mut out);
        (String::from_utf8(out).unwrap(), result)
    }

    #[test]
    fn empty_input_produces_no_output() {
        let (out, result) = run("");
        assert!(result.is_ok());
        assert!(out.is_empty());
    }

    #[test]
    fn empty_object_yields_empty_response() {
        let (out, result) = run("{}\n");
        assert!(result.is_ok());
        assert_eq!(out, "{\"account\":{},\"violations\":[]}\n");
    }

    #[test]
    fn account_wins_when_both_operations_are_present() {
        let (out, _) = run(concat!(
            r#"{"account":{"active-card":true,"available-limit":50},"#,
            r#""transaction":{"merchant":"Nike","amount":10,"time":"2019-02-13T11:00:00Z"}}"#,
        ));
        assert_eq!(
            out,
            "{\"account\":{\"active-card\":true,\"available-limit\":50},\"violations\":[]}\n"
        );
    }

    #[test]
    fn malformed_line_stops_the_loop_after_earlier_responses() {
        let (out, result) = run(concat!(
            "{\"account\":{\"active-card\":true,\"available-limit\":100}}\n",
            "{\"transaction\": nope}\n",
            "{\"account\":{\"active-card\":true,\"available-limit\":100}}\n",
        ));

        assert!(matches!(result, Err(TransportError::Decode(_))));
        assert_eq!(
            out,
            "{\"account\":{\"active-card\":true,\"available-limit\":100},\"violations\":[]}\n"
        );
    }
}
