use color_eyre::eyre::eyre;
use color_eyre::Result;
use dialoguer::Input;

use super::{describe_backend_error, AppContext};
use crate::output::Output;

fn prompt_username(username: Option<String>) -> Result<String> {
    match username {
        Some(username) => Ok(username),
        None => Input::new()
            .with_prompt("Username")
            .interact_text()
            .map_err(|e| eyre!("{}", e)),
    }
}

pub async fn run_login(username: Option<String>, output: &Output) -> Result<()> {
    let mut ctx = AppContext::load()?;
    let username = prompt_username(username)?;
    let password = rpassword::prompt_password("Password: ").map_err(|e| eyre!("{}", e))?;

    let token = ctx
        .backend()
        .login(&username, &password)
        .await
        .map_err(|e| eyre!(describe_backend_error(&e)))?;

    ctx.session.set_login(username.clone(), token);
    ctx.session.save().map_err(|e| eyre!("{:#}", e))?;

    // The account's server-held list takes over; the local ersatz list is
    // dropped, never merged.
    ctx.local_watchlist()
        .discard()
        .map_err(|e| eyre!("{:#}", e))?;

    output.success(format!("Logged in as {}", username));
    Ok(())
}

pub async fn run_signup(username: Option<String>, output: &Output) -> Result<()> {
    let ctx = AppContext::load()?;
    let username = prompt_username(username)?;
    let password = rpassword::prompt_password("Password: ").map_err(|e| eyre!("{}", e))?;
    let confirm = rpassword::prompt_password("Confirm password: ").map_err(|e| eyre!("{}", e))?;
    if password != confirm {
        return Err(eyre!("passwords do not match"));
    }

    ctx.backend()
        .signup(&username, &password)
        .await
        .map_err(|e| eyre!(describe_backend_error(&e)))?;

    output.success(format!(
        "Account '{}' created - run `moviemuse login` to sign in",
        username
    ));
    Ok(())
}

pub async fn run_logout(output: &Output) -> Result<()> {
    let mut ctx = AppContext::load()?;
    ctx.session.clear().map_err(|e| eyre!("{:#}", e))?;
    output.success("Logged out");
    Ok(())
}
