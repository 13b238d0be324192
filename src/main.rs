mod app;

use app::StudyApp;
use medstudy::config::AppConfig;
use medstudy::database::SqliteStore;
use medstudy::seeds::sample_decks;
use medstudy::telemetry;
use tracing::{error, info};

fn main() -> eframe::Result<()> {
    telemetry::init_tracing();
    let config = AppConfig::load();

    let store = SqliteStore::open(&config.database_path).unwrap_or_else(|e| {
        error!(
            target: "medstudy",
            path = %config.database_path.display(),
            error = %e,
            "Failed to open database, falling back to memory"
        );
        SqliteStore::in_memory().expect("Failed to initialize in-memory database")
    });

    if store.deck_count().unwrap_or_default() == 0 {
        for deck in sample_decks() {
            if let Err(e) = store.save_deck(&deck) {
                error!(target: "medstudy", deck = %deck.id, error = %e, "Failed to seed deck");
            }
        }
        info!(target: "medstudy", "Sample decks created");
    }

    let deck_set = store
        .load_all_decks()
        .expect("Failed to load decks from database");

    info!(target: "medstudy", decks = deck_set.decks.len(), "Loaded decks from database");
    for deck in &deck_set.decks {
        info!(target: "medstudy", deck = %deck.id, items = deck.items.len(), "Deck available");
    }

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size([560.0, 720.0]),
        ..Default::default()
    };
    eframe::run_native(
        "MedStudy",
        options,
        Box::new(|_cc| Ok(Box::new(StudyApp::new(deck_set, store, config)))),
    )
}
