use clap::Subcommand;
use socialspark_core::{AuthProvider, Config, KeyringAuth};

#[derive(Subcommand)]
pub enum AuthAction {
    /// Store an API bearer token
    Login {
        /// Access token issued by the login provider
        #[arg(long)]
        token: String,
    },
    /// Remove the stored token
    Logout,
    /// Check authentication status
    Status,
}

pub fn run(action: AuthAction) -> Result<(), Box<dyn std::error::Error>> {
    let mut auth = KeyringAuth::load();
    match action {
        AuthAction::Login { token } => {
            if token.trim().is_empty() {
                return Err("token must not be empty".into());
            }
            auth.login(token.trim())?;
            println!("Token stored.");
        }
        AuthAction::Logout => {
            auth.logout()?;
            println!("Token removed.");
        }
        AuthAction::Status => {
            let config = Config::load_or_default();
            if auth.is_authenticated() {
                println!("Authenticated");
            } else if config.api.require_auth {
                println!("Not authenticated (required by api.require_auth)");
            } else {
                println!("Not authenticated (anonymous access)");
            }
        }
    }
    Ok(())
}
