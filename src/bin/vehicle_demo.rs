//! Logs in with email and password, wakes the first vehicle on the
//! account, and prints its charge state.

use std::env;
use std::process;
use std::time::Duration;

use teslactl::{login, Params, TeslaApiError};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), TeslaApiError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 3 {
        eprintln!("Syntax: {} EMAIL PASSWORD", args[0]);
        process::exit(1);
    }

    // The root resource represents the API connection.
    let server = login(&args[1], &args[2]).await?;

    // `child("vehicles")` stands for the `/vehicles` URL within the API;
    // `get` runs the request and unwraps the `response` component.
    let vehicles = server.child("vehicles").get().await?;

    let vin = vehicles[0]["vin"]
        .as_str()
        .expect("vehicle entry should carry a VIN");
    println!("Your car's VIN is {vin}");

    // The ID is what the per-vehicle endpoints key on.
    let id = vehicles[0]["id"]
        .as_u64()
        .expect("vehicle entry should carry an id");
    let car = server.child("vehicles").at(id);

    // Wake up the car and repeat until it confirms.
    loop {
        println!("Waiting for car to wake up...");
        let data = car.child("wake_up").post(Params::new()).await?;
        if data["state"] == "online" {
            break;
        }
        tokio::time::sleep(Duration::from_secs(3)).await;
    }

    let charge_state = car
        .child("data_request")
        .child("charge_state")
        .get()
        .await?;
    println!("{}", serde_json::to_string_pretty(&charge_state)?);

    Ok(())
}
