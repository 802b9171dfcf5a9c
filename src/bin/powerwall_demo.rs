//! Reads a Powerwall's status via the stored-token login, flips its
//! operating mode and backup reserve, then restores the originals.
//!
//! Takes an optional path to the token record; defaults to
//! `tesla_access_token.json` in the working directory.

use std::env;
use std::process;
use std::time::Duration;

use serde_json::{json, Value};
use teslactl::{
    stored_token_login, Params, Resource, TeslaApiError, DEFAULT_ACCESS_TOKEN_FILE,
};
use tracing_subscriber::EnvFilter;

/// Prints and returns the site's current operating mode and reserve.
async fn report_mode(powerwall: &Resource) -> Result<Value, TeslaApiError> {
    let info = powerwall.child("site_info").get().await?;
    println!(
        "Current operating mode: {}",
        info["default_real_mode"].as_str().unwrap_or("unknown")
    );
    println!(
        "Current backup reserve: {:.1}%",
        info["backup_reserve_percent"].as_f64().unwrap_or(0.0)
    );
    println!();
    Ok(info)
}

/// Switches the operating mode and backup reserve.
async fn change_mode(
    powerwall: &Resource,
    mode: &str,
    backup_percent: f64,
) -> Result<(), TeslaApiError> {
    println!("Changing the mode to {mode} and the backup reserve to {backup_percent:.1}");

    let mut backup = Params::new();
    backup.insert("backup_reserve_percent".to_string(), json!(backup_percent));
    powerwall.child("backup").call(backup).await?;

    let mut operation = Params::new();
    operation.insert("default_real_mode".to_string(), json!(mode));
    powerwall.child("operation").call(operation).await?;

    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), TeslaApiError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args: Vec<String> = env::args().collect();
    let token_file = args
        .get(1)
        .map(String::as_str)
        .unwrap_or(DEFAULT_ACCESS_TOKEN_FILE);

    // Authenticate via the stored access token record.
    let server = stored_token_login(token_file)?;

    // Access to a Powerwall goes via an energy site ID, found in the
    // account's product list.
    let products = server.child("products").get().await?;
    let site_ids: Vec<u64> = products
        .as_array()
        .map(|entries| {
            entries
                .iter()
                .filter_map(|product| product["energy_site_id"].as_u64())
                .collect()
        })
        .unwrap_or_default();

    // One energy site is the usual domestic setting; bail out otherwise.
    if site_ids.len() != 1 {
        eprintln!("Expecting one energy site but we have {}", site_ids.len());
        process::exit(1);
    }
    let powerwall = server.child("energy_sites").at(site_ids[0]);

    let info = powerwall.child("site_info").get().await?;
    println!(
        "Powerwall firmware version: {}",
        info["version"].as_str().unwrap_or("unknown")
    );
    println!("Battery count: {}", info["battery_count"]);
    println!(
        "Operating mode: {}",
        info["default_real_mode"].as_str().unwrap_or("unknown")
    );
    println!(
        "Backup reserve: {:.1}%",
        info["backup_reserve_percent"].as_f64().unwrap_or(0.0)
    );

    let status = powerwall.child("live_status").get().await?;
    println!("{}", serde_json::to_string_pretty(&status)?);
    println!(
        "Total pack capacity: {:.2} kWh",
        status["total_pack_energy"].as_f64().unwrap_or(0.0) / 1000.0
    );
    println!(
        "Energy in pack: {:.2} kWh",
        status["energy_left"].as_f64().unwrap_or(0.0) / 1000.0
    );

    // Flip to the "other" mode, wait long enough for the change to be
    // observable, then restore the original settings.
    let original = report_mode(&powerwall).await?;
    let original_mode = original["default_real_mode"]
        .as_str()
        .expect("site info should carry an operating mode");
    let original_reserve = original["backup_reserve_percent"]
        .as_f64()
        .expect("site info should carry a backup reserve");

    let new_mode = match original_mode {
        "backup" => "self_consumption",
        _ => "backup",
    };
    let new_reserve = (original_reserve + 5.0) % 101.0;

    change_mode(&powerwall, new_mode, new_reserve).await?;

    println!("Waiting 30s so that changes can be observed on the phone app, etc.");
    tokio::time::sleep(Duration::from_secs(30)).await;
    report_mode(&powerwall).await?;

    change_mode(&powerwall, original_mode, original_reserve).await?;
    tokio::time::sleep(Duration::from_secs(10)).await;
    report_mode(&powerwall).await?;

    Ok(())
}
