use twig::{
    cli::{Cli, Context},
    config::Settings,
    services::AppServices,
    utils,
};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let settings = match Settings::new() {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("❌ Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };
    let cli = Cli::parse_args();

    utils::logger::init_logging(&settings.logs);

    let app_services = AppServices::new(&settings);

    cli.execute(&Context {
        settings: &settings,
        services: &app_services,
    })
    .await;
}
