use anyhow::Result;
use chrono::Local;
use recipe_locale::config::Config;
use recipe_locale::environment::ProcessEnvironment;
use recipe_locale::i18n::LocaleRegistry;
use recipe_locale::storage::JsonFileStore;
use recipe_locale::translation::HybridProvider;
use recipe_locale::units::{Measurement, Unit};
use recipe_locale::{LocaleContext, LocaleController};
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file (ignored when variables come from the host)
    let _ = dotenvy::dotenv();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("recipe_locale=info".parse()?),
        )
        .init();

    let config = Config::from_env()?;
    info!(
        "Starting locale core (environment: {}, preferences: {})",
        config.environment,
        config.preferences_path.display()
    );

    let registry = LocaleRegistry::global();
    let provider = Arc::new(HybridProvider::new(&config.provider_config(&registry)));

    let controller = Arc::new(LocaleController::new(
        registry,
        Arc::new(JsonFileStore::new(&config.preferences_path)),
        Arc::new(ProcessEnvironment::new()),
    ));
    controller.initialize();

    let context = LocaleContext::new(controller, provider.clone());
    let _subscription = context.subscribe(|locale| {
        info!("Locale is now {} ({})", locale.display_name, locale.code);
    });

    // Optional first argument: locale to switch to (and persist)
    if let Some(code) = std::env::args().nth(1) {
        context.change_locale(&code).await?;
    } else {
        context.load_current_translations().await;
    }

    let locale = context.locale();
    let choices: Vec<&str> = context.available_locales().iter().map(|l| l.code).collect();
    println!("{} {} ({})", locale.flag, locale.display_name, locale.code);
    println!("Available: {}", choices.join(", "));
    println!();

    println!("{}", context.translate("recipe", "title"));
    println!(
        "{}",
        context.translate_with("recipe", "servings", &[("count", "4")])
    );
    println!("{}", context.format_currency(1234.56, None));
    println!("{}", context.format_number(1234567.891));
    println!("{}", context.format_date(&Local::now().date_naive()));

    for measurement in [
        Measurement::new(180.0, Unit::Celsius),
        Measurement::new(453.592, Unit::Grams),
        Measurement::new(250.0, Unit::Milliliters),
    ] {
        let converted = context.convert(measurement)?;
        println!(
            "{} -> {}",
            context.formatter().format_measurement(&measurement),
            context.formatter().format_measurement(&converted)
        );
    }

    info!(
        "Translation loads: {}",
        serde_json::to_string(&provider.metrics().report())?
    );
    Ok(())
}
