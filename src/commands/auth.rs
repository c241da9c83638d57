use anyhow::Result;

use crate::config;
use crate::google;
use crate::google::session::Session;

pub async fn run() -> Result<()> {
    let creds = config::load()?;

    let data = google::auth::authenticate(&creds).await?;
    Session::new(data).save()?;

    println!("Google account connected.");
    Ok(())
}
