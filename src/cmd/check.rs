//! A subcommand making sure the environment is fine for starting the server.
//! Useful for catching errors early, without having to restart a running
//! process.

use std::net::SocketAddr;
use tokio::net::TcpListener;

use crate::{
    args::{self, Args},
    config::Config,
    load_config_and_init_logger,
    prelude::*,
    store::Seed,
};


pub(crate) async fn run(shared: &args::Shared, args: &Args) -> Result<()> {
    let config = load_config_and_init_logger(shared, args)
        .context("failed to load config: cannot proceed with `check` command")?;

    info!("Starting to verify various things...");
    let seed = check_seed(&config);
    let cors = config.http.cors_header().map(|_| ());
    let bind = check_bind(&config).await;
    info!("Done verifying various things");


    // Print summary after all log output
    let mut any_errors = false;
    println!();
    bunt::println!("{$bold+blue+intense}Summary{/$}");
    println!();
    print_outcome(&mut any_errors, "Load configuration", &Ok(()));
    print_outcome(&mut any_errors, "Load seed data", &seed);
    print_outcome(&mut any_errors, "CORS origin", &cors);
    print_outcome(&mut any_errors, "Bind HTTP address", &bind);

    println!();
    if any_errors {
        bunt::println!("{$red+intense}➡  Errors have occured!{/$}");
        std::process::exit(1);
    } else {
        bunt::println!("{$green+intense}⮕  Everything OK{/$}");
        Ok(())
    }
}

fn print_outcome<T>(any_errors: &mut bool, label: &str, result: &Result<T>) {
    match result {
        Ok(_) => {
            bunt::println!(" ▸ {[bold+intense]}  {$green+bold}✔ ok{/$}", label);
        }
        Err(e) => {
            *any_errors = true;
            bunt::println!(" ▸ {[bold+intense]}  {$red+bold}✘ error{/$}", label);
            bunt::println!("      {$red}▶▶▶ {$bold}Error:{/$}{/$} {[yellow+intense]}", e);
            if e.chain().len() > 1 {
                println!();
                bunt::println!("      {$red+italic}Caused by:{/$}");
            }

            for (i, cause) in e.chain().skip(1).enumerate() {
                print!("       {: >1$}", "", i * 2);
                println!("‣ {cause}");
            }
            println!();
        }
    }
}

fn check_seed(config: &Config) -> Result<()> {
    let seed = Seed::load(&config.store)?;
    debug!("Seed data contains {} users and {} todos", seed.users.len(), seed.todos.len());
    Ok(())
}

async fn check_bind(config: &Config) -> Result<()> {
    let addr = SocketAddr::new(config.http.address, config.http.port);
    debug!("Trying to bind to {addr}...");
    let _listener = TcpListener::bind(addr).await
        .with_context(|| format!("could not bind to {addr}"))?;
    Ok(())
}
