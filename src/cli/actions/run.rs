use crate::cli::actions::{account, schema, token, Action};
use anyhow::Result;

/// Execute the provided action.
// Single dispatch point for all CLI actions.
/// # Errors
/// Returns an error if the action fails.
pub async fn execute(action: Action) -> Result<()> {
    match action {
        Action::Schema(globals) => schema::execute(&globals).await,
        Action::Register(args) => account::register(args).await,
        Action::Login(args) => account::login(args).await,
        Action::Token(args) => token::execute(args).await,
    }
}
