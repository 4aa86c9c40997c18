use dealership_rs::Config;

#[macro_use]
extern crate log;

#[tokio::main]
async fn main() {
    pretty_env_logger::init();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("failed to load configuration: {:#}", e);
            std::process::exit(1);
        }
    };

    if let Err(err) = dealership_rs::serve(config).await {
        error!("failed to run server: {:#}", err);
        std::process::exit(1);
    }
}
