//! Integration tests for the recipe locale core
//!
//! These tests drive the public API the way the application does: a
//! controller wired to a preference store and an environment, a translation
//! provider, and the context UI components consume.

use std::sync::{Arc, Mutex};
use std::time::Duration;
use tempfile::TempDir;
use wiremock::{
    matchers::{header, method, path},
    Mock, MockServer, ResponseTemplate,
};

use recipe_locale::environment::HeadlessEnvironment;
use recipe_locale::i18n::{
    Currency, CurrencyPlacement, LocaleConfig, NumberFormatOptions, NumberStyle, TextDirection,
};
use recipe_locale::retry::RetryConfig;
use recipe_locale::storage::{JsonFileStore, MemoryStore, PreferenceStore, LOCALE_STORAGE_KEY};
use recipe_locale::translation::{
    ExternalProvider, HybridProvider, LocalProvider, ProviderConfig, TranslationProvider,
};
use recipe_locale::units::{self, Measurement, MeasurementSystem, Unit};
use recipe_locale::{
    LocaleContext, LocaleController, LocaleError, LocaleRegistry, LocaleStatus, ReconcileOutcome,
};

// ==================== Test Helpers ====================

fn controller_with(store: Arc<dyn PreferenceStore>, languages: &[&str]) -> Arc<LocaleController> {
    Arc::new(LocaleController::new(
        LocaleRegistry::global(),
        store,
        Arc::new(HeadlessEnvironment::new(languages.iter().copied())),
    ))
}

fn arabic() -> LocaleConfig {
    LocaleConfig {
        code: "ar-SA",
        display_name: "العربية",
        flag: "🇸🇦",
        measurement_system: MeasurementSystem::Metric,
        default_currency: Currency::Usd,
        direction: TextDirection::Rtl,
        date_format: "%d/%m/%Y",
        number_format: NumberFormatOptions {
            style: NumberStyle::Decimal,
            min_fraction_digits: 0,
            max_fraction_digits: 2,
            grouping_separator: ',',
            decimal_separator: '.',
            currency_placement: CurrencyPlacement::SuffixSpaced,
        },
    }
}

// ==================== Startup Resolution Tests ====================

#[test]
fn test_empty_store_detects_from_environment() {
    let controller = controller_with(Arc::new(MemoryStore::new()), &["nl-NL"]);
    assert_eq!(controller.initialize().code, "nl-NL");
    assert_eq!(controller.status(), LocaleStatus::Ready("nl-NL"));
}

#[test]
fn test_unregistered_persisted_value_is_discarded() {
    let store = Arc::new(MemoryStore::with_value(LOCALE_STORAGE_KEY, "xx-YY"));

    let detected = controller_with(store.clone(), &["nl-BE", "en-US"]);
    assert_eq!(detected.initialize().code, "nl-NL");

    let defaulted = controller_with(store, &["ja-JP"]);
    assert_eq!(defaulted.initialize().code, "en-US");
}

#[test]
fn test_preference_survives_restart() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("prefs.json");

    let first = controller_with(Arc::new(JsonFileStore::new(&path)), &["en-US"]);
    first.initialize();
    first.change_locale("nl-NL").unwrap();

    let second = controller_with(Arc::new(JsonFileStore::new(&path)), &["en-US"]);
    assert_eq!(second.initialize().code, "nl-NL");
}

#[test]
fn test_corrupt_preference_file_degrades_to_detection() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("prefs.json");
    std::fs::write(&path, "not json").unwrap();

    let controller = controller_with(Arc::new(JsonFileStore::new(&path)), &["nl-NL"]);
    assert_eq!(controller.initialize().code, "nl-NL");
    assert!(controller.is_persistence_degraded());
}

#[test]
fn test_corrupt_preference_file_is_repaired_by_next_change() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("prefs.json");
    std::fs::write(&path, "{trunc").unwrap();

    let first = controller_with(Arc::new(JsonFileStore::new(&path)), &["en-US"]);
    assert_eq!(first.initialize().code, "en-US");
    first.change_locale("nl-NL").unwrap();

    let second = controller_with(Arc::new(JsonFileStore::new(&path)), &["en-US"]);
    assert_eq!(second.initialize().code, "nl-NL");
    assert!(!second.is_persistence_degraded());
}

// ==================== Locale Change Tests ====================

#[test]
fn test_unknown_locale_leaves_state_unchanged() {
    let store = Arc::new(MemoryStore::new());
    let controller = controller_with(store.clone(), &["en-US"]);
    controller.initialize();

    let err = controller.change_locale("xx-YY").unwrap_err();

    assert!(matches!(err, LocaleError::UnknownLocale(ref code) if code == "xx-YY"));
    assert_eq!(controller.current_locale().code, "en-US");
    assert_eq!(store.peek(LOCALE_STORAGE_KEY), None);
}

#[test]
fn test_rtl_locale_applies_direction() {
    let registry = Arc::new(
        LocaleRegistry::new(
            vec![LocaleRegistry::global().default_config().clone(), arabic()],
            "en-US",
        )
        .unwrap(),
    );
    let environment = Arc::new(HeadlessEnvironment::new(["ar-EG"]));
    let controller = LocaleController::new(
        registry,
        Arc::new(MemoryStore::new()),
        environment.clone(),
    );

    assert_eq!(controller.initialize().code, "ar-SA");
    assert_eq!(environment.document().dir, Some(TextDirection::Rtl));

    controller.change_locale("en-US").unwrap();
    assert_eq!(environment.document().dir, Some(TextDirection::Ltr));
    assert_eq!(environment.document().lang.as_deref(), Some("en-US"));
}

#[test]
fn test_independent_controllers_do_not_share_state() {
    let first = controller_with(Arc::new(MemoryStore::new()), &["en-US"]);
    let second = controller_with(Arc::new(MemoryStore::new()), &["en-US"]);
    first.initialize();
    second.initialize();

    first.change_locale("nl-NL").unwrap();

    assert_eq!(first.current_locale().code, "nl-NL");
    assert_eq!(second.current_locale().code, "en-US");
}

#[test]
fn test_external_engine_round_trip_terminates() {
    let controller = controller_with(Arc::new(MemoryStore::new()), &["en-US"]);
    controller.initialize();
    let notifications = Arc::new(Mutex::new(0));

    let _subscription = {
        let weak = Arc::downgrade(&controller);
        let notifications = notifications.clone();
        controller.subscribe(move |config| {
            *notifications.lock().unwrap() += 1;
            if let Some(controller) = weak.upgrade() {
                assert_eq!(
                    controller.reconcile_external_change(config.code),
                    ReconcileOutcome::Unchanged
                );
            }
        })
    };

    assert_eq!(
        controller.reconcile_external_change("nl-NL"),
        ReconcileOutcome::Adopted
    );
    assert_eq!(*notifications.lock().unwrap(), 1);
    assert_eq!(controller.current_locale().code, "nl-NL");
}

// ==================== Conversion & Formatting Tests ====================

#[test]
fn test_pound_in_grams_is_sixteen_ounces() {
    let ounces = units::weight::grams_to_ounces(453.592).unwrap();
    assert!((ounces - 16.0).abs() < 1e-3);
}

#[test]
fn test_non_finite_conversion_is_rejected() {
    assert!(matches!(
        units::temperature::celsius_to_fahrenheit(f64::INFINITY),
        Err(LocaleError::InvalidMeasurement(_))
    ));
}

#[test]
fn test_context_converts_and_formats_per_locale() {
    let controller = controller_with(Arc::new(MemoryStore::new()), &["en-US"]);
    controller.initialize();
    let context = LocaleContext::new(controller, Arc::new(LocalProvider::embedded()));

    let en_amount = context.format_currency(1234.56, None);
    let en_weight = context.convert(Measurement::new(453.592, Unit::Grams)).unwrap();
    assert_eq!(en_amount, "$1,234.56");
    assert_eq!(en_weight.unit, Unit::Ounces);

    context.controller().change_locale("nl-NL").unwrap();

    let nl_amount = context.format_currency(1234.56, None);
    assert_eq!(nl_amount, "€ 1.234,56");
    assert_ne!(en_amount, nl_amount);

    let nl_weight = context.convert(en_weight).unwrap();
    assert_eq!(nl_weight.unit, Unit::Grams);
    assert!((nl_weight.value - 453.592).abs() < 1e-9);
}

// ==================== Translation Tests ====================

#[tokio::test]
async fn test_concurrent_loads_share_one_bundle() {
    let provider = LocalProvider::embedded();

    let loads = (0..8).map(|_| provider.load_translations("nl-NL"));
    let bundles = futures::future::join_all(loads).await;

    assert!(bundles.iter().all(|bundle| Arc::ptr_eq(bundle, &bundles[0])));
    assert_eq!(provider.metrics().source_loads(), 1);
}

#[test]
fn test_has_translations_never_loads() {
    let provider = LocalProvider::embedded();
    assert!(!provider.has_translations("nl-NL"));

    tokio_test::block_on(provider.load_translations("nl-NL"));

    assert!(provider.has_translations("nl-NL"));
    assert!(!provider.has_translations("en-US"));
}

#[tokio::test]
async fn test_unknown_locale_resolves_to_default_bundle() {
    let provider = LocalProvider::embedded();
    let bundle = provider.load_translations("fr-FR").await;

    assert_eq!(bundle.lookup("common", "actions.save"), Some("Save"));
    assert!(!provider.has_translations("fr-FR"));
}

#[tokio::test]
async fn test_context_translates_after_locale_change() {
    let controller = controller_with(Arc::new(MemoryStore::new()), &["en-US"]);
    controller.initialize();
    let context = LocaleContext::new(controller, Arc::new(LocalProvider::embedded()));
    context.load_current_translations().await;

    assert_eq!(context.translate("recipe", "title"), "Recipes");

    context.change_locale("nl-NL").await.unwrap();

    assert_eq!(context.translate("recipe", "title"), "Recepten");
    assert_eq!(
        context.translate_with("recipe", "servings", &[("count", "2")]),
        "Voor 2 personen"
    );
}

#[tokio::test]
async fn test_production_hybrid_uses_remote_bundles() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/translations/nl-NL"))
        .and(header("Authorization", "Bearer prod-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "recipe": {"title": "Recepten van de server"}
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = ProviderConfig {
        environment: "production".to_string(),
        api_url: Some(mock_server.uri()),
        api_token: Some("prod-token".to_string()),
        ..ProviderConfig::default()
    };
    let provider = HybridProvider::new(&config);
    assert!(provider.is_external());

    let bundle = provider.load_translations("nl-NL").await;
    assert_eq!(bundle.lookup("recipe", "title"), Some("Recepten van de server"));
}

#[tokio::test]
async fn test_remote_outage_falls_back_to_bundled_translations() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/translations/nl-NL"))
        .respond_with(ResponseTemplate::new(503))
        .expect(3)
        .mount(&mock_server)
        .await;

    let provider = ExternalProvider::new(mock_server.uri(), None, LocalProvider::embedded())
        .with_retry(RetryConfig::new(3, Duration::from_millis(5)));

    let bundle = provider.load_translations("nl-NL").await;
    assert_eq!(bundle.lookup("recipe", "title"), Some("Recepten"));
    assert_eq!(provider.metrics().failures(), 1);
}
