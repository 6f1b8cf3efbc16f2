// Auth module - app registration and the out-of-band OAuth flow
//
// First run for a profile:
//   1. ask for the server domain
//   2. register an app there (or reuse the cached registration)
//   3. print the authorization URL; the user opens it and pastes the code
//   4. trade the code for an access token and save it under the profile
//
// Anything missing from a server reply sends the user back to step 1 with
// the cached files for that attempt removed.

use crate::api::{base_url, http_client};
use crate::credentials::{AppRegistration, CredentialStore, Credentials};
use crate::document::lookup;
use anyhow::{Context, Result};
use serde_json::Value;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Lines, Stdin};

const CLIENT_NAME: &str = "nanotoot";
const REDIRECT_URI: &str = "urn:ietf:wg:oauth:2.0:oob";
const SCOPES: &str = "read write follow";

/// Register this client with a server
pub async fn register_app(http: &reqwest::Client, domain: &str) -> Result<Option<AppRegistration>> {
    let url = format!("{}api/v1/apps", base_url(domain));
    tracing::debug!("Registering app at {}", url);

    let reply: Value = http
        .post(&url)
        .form(&[
            ("client_name", CLIENT_NAME),
            ("redirect_uris", REDIRECT_URI),
            ("scopes", SCOPES),
        ])
        .send()
        .await
        .with_context(|| format!("Could not reach {}", domain))?
        .error_for_status()
        .context("App registration rejected")?
        .json()
        .await
        .context("App registration reply is not JSON")?;

    Ok(app_from_reply(&reply))
}

fn app_from_reply(reply: &Value) -> Option<AppRegistration> {
    let client_id = lookup(reply, "client_id").as_str()?;
    let client_secret = lookup(reply, "client_secret").as_str()?;
    Some(AppRegistration {
        client_id: client_id.to_string(),
        client_secret: client_secret.to_string(),
    })
}

/// URL the user opens to approve access
pub fn authorize_url(domain: &str, client_id: &str) -> String {
    format!(
        "{}oauth/authorize?client_id={}&response_type=code&redirect_uri={}&scope={}",
        base_url(domain),
        client_id,
        REDIRECT_URI,
        SCOPES.replace(' ', "%20")
    )
}

/// Trade an authorization code for an access token
pub async fn exchange_code(
    http: &reqwest::Client,
    domain: &str,
    app: &AppRegistration,
    code: &str,
) -> Result<Option<String>> {
    let url = format!("{}oauth/token", base_url(domain));

    let reply: Value = http
        .post(&url)
        .form(&[
            ("grant_type", "authorization_code"),
            ("redirect_uri", REDIRECT_URI),
            ("client_id", app.client_id.as_str()),
            ("client_secret", app.client_secret.as_str()),
            ("code", code),
        ])
        .send()
        .await
        .with_context(|| format!("Could not reach {}", domain))?
        .error_for_status()
        .context("Authorization code rejected")?
        .json()
        .await
        .context("Token reply is not JSON")?;

    Ok(lookup(&reply, "access_token").as_str().map(str::to_string))
}

// ============================================================================
// Interactive Login
// ============================================================================

/// Saved credentials for `profile`, or run the interactive login
pub async fn login(store: &CredentialStore, profile: &str) -> Result<Credentials> {
    if let Some(creds) = store.load_profile(profile)? {
        tracing::debug!("Using saved credentials for profile '{}'", profile);
        return Ok(creds);
    }

    let http = http_client()?;
    let mut input = BufReader::new(tokio::io::stdin()).lines();

    say("Welcome to nanotoot!\n").await?;
    say("No saved login for this profile, let's set one up.\n\n").await?;

    loop {
        let domain = prompt(&mut input, "Server domain (e.g. mastodon.social)\n>").await?;
        if domain.is_empty() {
            continue;
        }

        let app = match registered_app(store, &http, &domain).await {
            Ok(Some(app)) => app,
            Ok(None) => {
                say("The server did not return client credentials. Check the domain.\n\n").await?;
                store.remove_app(&domain);
                continue;
            }
            Err(e) => {
                tracing::warn!("App registration failed: {:#}", e);
                say(&format!("Registration failed: {:#}\n\n", e)).await?;
                store.remove_app(&domain);
                continue;
            }
        };

        say("Open this URL in a browser, approve access and paste the code:\n").await?;
        say(&format!("{}\n", authorize_url(&domain, &app.client_id))).await?;
        let code = prompt(&mut input, ">").await?;

        let token = match exchange_code(&http, &domain, &app, &code).await {
            Ok(Some(token)) => token,
            Ok(None) => {
                say("The server did not return an access token. Starting over.\n\n").await?;
                store.remove_app(&domain);
                continue;
            }
            Err(e) => {
                tracing::warn!("Token exchange failed: {:#}", e);
                say(&format!("Authorization failed: {:#}\n\n", e)).await?;
                store.remove_app(&domain);
                continue;
            }
        };

        let creds = Credentials {
            domain,
            access_token: token,
        };
        store.save_profile(profile, &creds)?;
        say("Login complete.\n\n").await?;
        tracing::info!("Saved credentials for profile '{}'", profile);
        return Ok(creds);
    }
}

/// Cached registration for `domain`, registering first if there is none
async fn registered_app(
    store: &CredentialStore,
    http: &reqwest::Client,
    domain: &str,
) -> Result<Option<AppRegistration>> {
    if let Some(app) = store.load_app(domain).ok().flatten() {
        return Ok(Some(app));
    }

    let Some(app) = register_app(http, domain).await? else {
        return Ok(None);
    };
    store.save_app(domain, &app)?;
    Ok(Some(app))
}

async fn say(text: &str) -> Result<()> {
    let mut out = tokio::io::stdout();
    out.write_all(text.as_bytes()).await?;
    out.flush().await?;
    Ok(())
}

async fn prompt(input: &mut Lines<BufReader<Stdin>>, text: &str) -> Result<String> {
    say(text).await?;
    let line = input
        .next_line()
        .await
        .context("Failed to read from stdin")?
        .context("Input closed before login finished")?;
    Ok(line.trim().to_string())
}
