//! Command-line front end: checks the server, signs in when credentials are
//! given and prints the wallet, exercising the same data layer the UI uses.
//!
//! ```text
//! WALLET_USERNAME=sita WALLET_PASSWORD=... cargo run -p wallet-client
//! ```

use std::sync::Arc;

use shared::utils::{format_balance, mask_address};
use wallet_client::core::{ApiService, Result};
use wallet_client::routing::RouteGuard;
use wallet_client::services::api::{fetch_transactions, fetch_wallet, health, list_users};
use wallet_client::{debug, ApiClient, AuthService, ClientConfig, QueryClient, ToastStore};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let _log_guard = debug::init();

    let config = ClientConfig::from_env()?;
    config.validate()?;
    tracing::info!(base_url = %config.base_url, "Starting wallet client");

    let api: Arc<dyn ApiService> = Arc::new(ApiClient::new(&config)?);
    let queries = QueryClient::new(config.query_config());
    let toasts = ToastStore::new(config.toast_limit);
    let auth = AuthService::new(api.clone(), queries.clone());

    match health(api.as_ref()).await {
        Ok(status) => println!("Server {}: {}", config.base_url, status.status),
        Err(e) => {
            toasts.notify_error(&e);
            print_toasts(&toasts);
            return Err(e.into());
        }
    }

    if let (Ok(username), Ok(password)) = (std::env::var("WALLET_USERNAME"), std::env::var("WALLET_PASSWORD")) {
        match auth.login(&username, &password).await {
            Ok(user) => {
                toasts.success("Signed in", format!("Welcome back, {}", user.username));
            }
            Err(e) => {
                toasts.notify_error(&e);
            }
        }
    }

    let user = match auth.current_user().await {
        Ok(user) => user,
        Err(e) => {
            toasts.notify_error(&e);
            None
        }
    };

    let state = auth.state();
    println!("Wallet page: {:?}", RouteGuard::new().decide(&state));
    println!("Admin page:  {:?}", RouteGuard::admin().decide(&state));

    if let Some(user) = user {
        println!("Signed in as {} ({:?})", user.username, user.role);
        if !user.wallet_address.is_empty() {
            println!("Address: {}", mask_address(&user.wallet_address, 6, 4));
        }

        match fetch_wallet(&queries, api.clone()).await {
            Ok(wallet) => println!("Balance: {}", format_balance(&wallet.balance, &wallet.currency)),
            Err(e) => {
                toasts.notify_error(&e);
            }
        }

        match fetch_transactions(&queries, api.clone()).await {
            Ok(transactions) => {
                println!("Transactions: {}", transactions.len());
                for tx in transactions.iter().take(5) {
                    println!(
                        "  #{} {:?} {} ({})",
                        tx.id,
                        tx.kind,
                        format_balance(&tx.amount, &tx.currency),
                        tx.description
                    );
                }
            }
            Err(e) => {
                toasts.notify_error(&e);
            }
        }

        if user.role.is_admin() {
            match list_users(&queries, api.clone()).await {
                Ok(users) => println!("Registered users: {}", users.len()),
                Err(e) => {
                    toasts.notify_error(&e);
                }
            }
        }
    } else {
        println!("Not signed in. Set WALLET_USERNAME and WALLET_PASSWORD to log in.");
    }

    print_toasts(&toasts);
    Ok(())
}

fn print_toasts(toasts: &ToastStore) {
    for toast in toasts.toasts() {
        match &toast.description {
            Some(description) => println!("[{:?}] {}: {}", toast.variant, toast.title, description),
            None => println!("[{:?}] {}", toast.variant, toast.title),
        }
    }
}
