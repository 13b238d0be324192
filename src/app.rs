//! Main application UI.
//! Lists decks, imports and exports them, and drives a study session.

use chrono::TimeDelta;
use eframe::egui;
use medstudy::config::AppConfig;
use medstudy::database::{SqliteStore, record_attempt_best_effort, start_session};
use medstudy::export::json::{export_json_to_path, import_json};
use medstudy::models::{
    AnswerSpec, AttemptRecord, DeckSet, Language, Response, SessionStats, StudySession,
    UserAnswer,
};
use std::collections::HashMap;
use tracing::{error, warn};

/// Application screen states
#[derive(Default)]
enum AppScreen {
    #[default]
    Main,
    Study,
}

/// Something the learner did on the study screen, applied after rendering.
enum StudyAction {
    Reveal,
    Answer(UserAnswer),
    Respond(Response),
    Next,
    Previous,
    Shuffle,
    Submit,
    Reset,
    Back,
}

/// Main application state
pub struct StudyApp {
    show_confirmation_dialog: bool,
    allowed_to_close: bool,
    all_decks: DeckSet,
    selected_deck_index: Option<usize>,
    store: SqliteStore,
    config: AppConfig,
    language: Language,
    best_scores: HashMap<String, u32>,

    current_screen: AppScreen,
    session: Option<StudySession>,
    text_answer: String,
    attempt_handled: bool,
    save_warning: Option<String>,

    show_export_dialog: bool,
    show_import_result_dialog: bool,
    import_result_message: String,
}

impl eframe::App for StudyApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        match self.current_screen {
            AppScreen::Main => self.render_main_screen(ctx),
            AppScreen::Study => self.render_study_screen(ctx),
        }

        // Handle window close requests with confirmation dialog
        if ctx.input(|i| i.viewport().close_requested()) && !self.allowed_to_close {
            ctx.send_viewport_cmd(egui::ViewportCommand::CancelClose);
            self.show_confirmation_dialog = true;
        }

        if self.show_confirmation_dialog {
            egui::Window::new("Quitter ? / خروج؟")
                .collapsible(false)
                .resizable(false)
                .show(ctx, |ui| {
                    ui.horizontal(|ui| {
                        if ui.button("Non / لا").clicked() {
                            self.show_confirmation_dialog = false;
                            self.allowed_to_close = false;
                        }

                        if ui.button("Oui / نعم").clicked() {
                            self.show_confirmation_dialog = false;
                            self.allowed_to_close = true;
                            ui.ctx().send_viewport_cmd(egui::ViewportCommand::Close);
                        }
                    });
                });
        }

        if self.show_export_dialog {
            let mut export_deck_index: Option<usize> = None;
            let mut should_cancel = false;
            let language = self.language;

            egui::Window::new("Export")
                .collapsible(false)
                .resizable(false)
                .show(ctx, |ui| {
                    ui.label(ui_text(language, "Choisir un paquet :", "اختر مجموعة:"));
                    ui.separator();

                    for (i, deck) in self.all_decks.decks.iter().enumerate() {
                        if ui
                            .button(format!(
                                "{} ({})",
                                deck.title.resolve(language),
                                deck.items.len()
                            ))
                            .clicked()
                        {
                            export_deck_index = Some(i);
                        }
                    }

                    ui.separator();

                    if ui.button(ui_text(language, "Annuler", "إلغاء")).clicked() {
                        should_cancel = true;
                    }
                });

            if let Some(i) = export_deck_index {
                self.handle_export(i);
            }
            if should_cancel {
                self.show_export_dialog = false;
            }
        }

        if self.show_import_result_dialog {
            egui::Window::new("Import/Export")
                .collapsible(false)
                .resizable(false)
                .show(ctx, |ui| {
                    ui.label(&self.import_result_message);
                    ui.add_space(10.0);
                    if ui.button("OK").clicked() {
                        self.show_import_result_dialog = false;
                    }
                });
        }
    }
}

impl StudyApp {
    /// Creates the application over decks already loaded from `store`
    pub fn new(deck_set: DeckSet, store: SqliteStore, config: AppConfig) -> Self {
        let has_decks = !deck_set.decks.is_empty();
        let mut app = Self {
            show_confirmation_dialog: false,
            allowed_to_close: false,
            all_decks: deck_set,
            selected_deck_index: if has_decks { Some(0) } else { None },
            store,
            language: config.session.language,
            config,
            best_scores: HashMap::new(),
            current_screen: AppScreen::Main,
            session: None,
            text_answer: String::new(),
            attempt_handled: false,
            save_warning: None,
            show_export_dialog: false,
            show_import_result_dialog: false,
            import_result_message: String::new(),
        };
        app.refresh_best_scores();
        app
    }

    fn refresh_best_scores(&mut self) {
        let user = self.config.user_id.as_deref();
        self.best_scores.clear();
        for deck in &self.all_decks.decks {
            match self.store.best_percentage(&deck.id, user) {
                Ok(Some(best)) => {
                    self.best_scores.insert(deck.id.clone(), best);
                }
                Ok(None) => {}
                Err(e) => warn!(target: "medstudy", deck = %deck.id, error = %e, "Failed to load best score"),
            }
        }
    }

    fn render_language_switch(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            for language in Language::ALL {
                ui.selectable_value(&mut self.language, language, language.display_name());
            }
        });
        if let Some(session) = &mut self.session {
            if session.config().language != self.language {
                session.set_language(self.language);
            }
        }
    }

    /// Renders the main screen with the deck list
    fn render_main_screen(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default().show(ctx, |ui| {
            self.render_language_switch(ui);
            let language = self.language;
            ui.separator();

            ui.horizontal(|ui| {
                if ui.button("Export").clicked() {
                    self.show_export_dialog = true;
                }
                if ui.button("Import").clicked() {
                    self.handle_import();
                }
            });

            ui.separator();

            ui.heading(format!(
                "{} ({})",
                ui_text(language, "Paquets", "المجموعات"),
                self.all_decks.decks.len()
            ));

            let mut action_select: Option<usize> = None;
            let mut action_study: Option<usize> = None;

            egui::ScrollArea::vertical()
                .id_source("decks_list")
                .max_height(250.0)
                .show(ui, |ui| {
                    for (i, deck) in self.all_decks.decks.iter().enumerate() {
                        let is_selected = self.selected_deck_index == Some(i);
                        let kind = if deck.is_quiz() {
                            ui_text(language, "Quiz", "اختبار")
                        } else {
                            ui_text(language, "Cartes", "بطاقات")
                        };
                        let best = self
                            .best_scores
                            .get(&deck.id)
                            .map(|p| format!(" · {p}%"))
                            .unwrap_or_default();

                        ui.horizontal(|ui| {
                            if ui
                                .selectable_label(
                                    is_selected,
                                    format!(
                                        "{}. {} [{kind}, {}] ({}){best}",
                                        i + 1,
                                        deck.title.resolve(language),
                                        deck.difficulty.label(language),
                                        deck.items.len()
                                    ),
                                )
                                .clicked()
                            {
                                action_select = Some(i);
                            }

                            if ui.button(ui_text(language, "Étudier", "ادرس")).clicked() {
                                action_study = Some(i);
                            }
                        });
                    }
                });

            if let Some(i) = action_select {
                self.selected_deck_index = Some(i);
            }
            if let Some(i) = action_study {
                self.start_session(i);
            }

            ui.separator();

            if let Some(deck) = self
                .selected_deck_index
                .and_then(|i| self.all_decks.decks.get(i))
            {
                ui.heading(deck.title.resolve(language));
                ui.label(deck.description.resolve(language));
                if !deck.category.is_empty() {
                    ui.label(format!("#{}", deck.category));
                }

                egui::ScrollArea::vertical()
                    .id_source("items_list")
                    .max_height(250.0)
                    .show(ui, |ui| {
                        for (i, item) in deck.items.iter().enumerate() {
                            ui.label(format!(
                                "{}. {} ({})",
                                i + 1,
                                item.prompt.resolve(language),
                                item.kind()
                            ));
                        }
                    });
            }
        });
    }

    /// Renders the study screen for the current session
    fn render_study_screen(&mut self, ctx: &egui::Context) {
        let mut action: Option<StudyAction> = None;

        egui::CentralPanel::default().show(ctx, |ui| {
            self.render_language_switch(ui);
            let language = self.language;
            ui.separator();

            let Some(session) = self.session.as_ref() else {
                action = Some(StudyAction::Back);
                return;
            };

            ui.heading(session.deck().title.resolve(language));
            ui.label(session.progress_message());
            ui.add_space(10.0);

            if session.is_complete() {
                render_results(ui, language, &session.stats());
                if let Some(warning) = &self.save_warning {
                    ui.colored_label(egui::Color32::YELLOW, warning);
                }
                ui.add_space(20.0);
                ui.horizontal(|ui| {
                    if ui.button(ui_text(language, "Recommencer", "أعد المحاولة")).clicked() {
                        action = Some(StudyAction::Reset);
                    }
                    if ui.button(ui_text(language, "Retour", "رجوع")).clicked() {
                        action = Some(StudyAction::Back);
                    }
                });
                return;
            }

            let item = session.current_item();
            let response = session.current_response();

            ui.group(|ui| {
                ui.set_min_height(180.0);
                ui.vertical_centered(|ui| {
                    ui.add_space(10.0);
                    ui.heading(item.prompt.resolve(language));
                    ui.add_space(10.0);

                    if session.is_revealed() || response != Response::Unseen {
                        ui.label(egui::RichText::new(item.answer_text(language)).strong());
                        if let Some(explanation) = &item.explanation {
                            ui.label(explanation.resolve(language));
                        }
                    }
                });
            });

            ui.add_space(10.0);

            if response != Response::Unseen {
                let (color, text) = match response {
                    Response::Correct => (egui::Color32::GREEN, ui_text(language, "Correct", "صحيح")),
                    Response::Incorrect => (egui::Color32::RED, ui_text(language, "Incorrect", "خطأ")),
                    _ => (egui::Color32::GRAY, ui_text(language, "Passé", "تم التخطي")),
                };
                ui.colored_label(color, text);
            }

            if let Some(chosen) = render_answer_controls(ui, session, language, &mut self.text_answer) {
                action = Some(chosen);
            }

            ui.add_space(20.0);

            ui.horizontal(|ui| {
                if ui.button("◀").clicked() {
                    action = Some(StudyAction::Previous);
                }
                if ui.button("▶").clicked() {
                    action = Some(StudyAction::Next);
                }
                if ui.button(ui_text(language, "Mélanger", "خلط")).clicked() {
                    action = Some(StudyAction::Shuffle);
                }
                if ui.button(ui_text(language, "Terminer", "إنهاء")).clicked() {
                    action = Some(StudyAction::Submit);
                }
                if ui.button(ui_text(language, "Retour", "رجوع")).clicked() {
                    action = Some(StudyAction::Back);
                }
            });
        });

        // Keyboard shortcuts, unless a text field has focus
        if action.is_none() && !ctx.wants_keyboard_input() {
            action = ctx.input(|i| {
                if i.key_pressed(egui::Key::ArrowRight) {
                    Some(StudyAction::Next)
                } else if i.key_pressed(egui::Key::ArrowLeft) {
                    Some(StudyAction::Previous)
                } else if i.key_pressed(egui::Key::Space) {
                    Some(StudyAction::Reveal)
                } else {
                    None
                }
            });
        }

        if let Some(action) = action {
            self.apply_study_action(action);
        }
    }

    fn apply_study_action(&mut self, action: StudyAction) {
        if let StudyAction::Back = action {
            self.session = None;
            self.current_screen = AppScreen::Main;
            return;
        }

        let Some(session) = self.session.as_mut() else {
            return;
        };

        let result = match action {
            StudyAction::Reveal => session.reveal(),
            StudyAction::Answer(answer) => session.answer(&answer).map(|_| ()),
            StudyAction::Respond(response) => session.respond(response),
            StudyAction::Next => session.next(),
            StudyAction::Previous => session.previous(),
            StudyAction::Shuffle => session.shuffle(),
            StudyAction::Submit => session.submit(),
            StudyAction::Reset => {
                session.reset();
                self.attempt_handled = false;
                self.save_warning = None;
                Ok(())
            }
            StudyAction::Back => Ok(()),
        };

        if let Err(e) = result {
            warn!(target: "medstudy", error = %e, "Ignoring study action");
        }

        self.text_answer.clear();
        self.finish_if_complete();
    }

    /// Records the attempt once the session completes. A failed write only
    /// produces a warning on the results screen.
    fn finish_if_complete(&mut self) {
        if self.attempt_handled {
            return;
        }
        let Some(session) = self.session.as_ref() else {
            return;
        };
        let Some(record) = AttemptRecord::from_session(session, self.config.user_id.as_deref())
        else {
            return;
        };

        self.attempt_handled = true;
        if record_attempt_best_effort(&self.store, &record) {
            self.refresh_best_scores();
        } else {
            self.save_warning = Some(
                ui_text(
                    self.language,
                    "Le score n'a pas pu être enregistré.",
                    "تعذر حفظ النتيجة.",
                )
                .to_string(),
            );
        }
    }

    /// Starts a study session on the deck at `deck_index`
    fn start_session(&mut self, deck_index: usize) {
        let Some(deck_id) = self.all_decks.decks.get(deck_index).map(|d| d.id.clone()) else {
            return;
        };

        let mut session_config = self.config.session;
        session_config.language = self.language;

        match start_session(&self.store, &deck_id, session_config) {
            Ok(session) => {
                self.session = Some(session);
                self.text_answer.clear();
                self.attempt_handled = false;
                self.save_warning = None;
                self.current_screen = AppScreen::Study;
            }
            Err(e) => {
                error!(target: "medstudy", deck = %deck_id, error = %e, "Cannot start session");
                self.import_result_message = ui_text(
                    self.language,
                    "Paquet indisponible.",
                    "المجموعة غير متاحة.",
                )
                .to_string();
                self.show_import_result_dialog = true;
            }
        }
    }

    /// Handles deck export to JSON file
    fn handle_export(&mut self, deck_index: usize) {
        if let Some(deck) = self.all_decks.decks.get(deck_index) {
            if let Some(path) = rfd::FileDialog::new()
                .set_file_name(format!("{}.json", deck.id))
                .add_filter("JSON files", &["json"])
                .save_file()
            {
                self.import_result_message = match export_json_to_path(deck, &path) {
                    Ok(()) => format!("'{}' → {}", deck.id, path.display()),
                    Err(e) => format!("Export failed: {e}"),
                };
                self.show_import_result_dialog = true;
            }
        }
        self.show_export_dialog = false;
    }

    /// Handles deck import from JSON file
    fn handle_import(&mut self) {
        let Some(path) = rfd::FileDialog::new()
            .add_filter("JSON files", &["json"])
            .pick_file()
        else {
            return;
        };

        self.import_result_message = match import_json(&path) {
            Ok(deck) if self.all_decks.contains(&deck.id) => format!(
                "Deck '{}' already exists! Please change its id in the JSON file.",
                deck.id
            ),
            Ok(deck) => match self.store.save_deck(&deck) {
                Ok(()) => {
                    let message = format!(
                        "Deck '{}' imported successfully with {} items!",
                        deck.id,
                        deck.items.len()
                    );
                    self.all_decks.upsert(deck);
                    message
                }
                Err(e) => format!("Failed to save deck: {e}"),
            },
            Err(e) => format!(
                "Import failed: {e}\n\nExpected structure:\n{{\n  \"id\": \"...\",\n  \"title\": {{\"fr\": \"...\", \"ar\": \"...\"}},\n  \"description\": {{\"fr\": \"...\", \"ar\": \"...\"}},\n  \"items\": [...]\n}}"
            ),
        };
        self.show_import_result_dialog = true;
    }
}

/// Answer widgets for the current item. Nothing is offered once answered.
fn render_answer_controls(
    ui: &mut egui::Ui,
    session: &StudySession,
    language: Language,
    text_answer: &mut String,
) -> Option<StudyAction> {
    if session.current_response() != Response::Unseen {
        return None;
    }

    let mut action = None;
    match &session.current_item().answer {
        AnswerSpec::MultipleChoice { options, .. } => {
            for (i, option) in options.resolve(language).iter().enumerate() {
                if ui.button(option).clicked() {
                    action = Some(StudyAction::Answer(UserAnswer::Choice(i)));
                }
            }
        }
        AnswerSpec::TrueFalse { .. } => {
            ui.horizontal(|ui| {
                if ui.button(ui_text(language, "Vrai", "صحيح")).clicked() {
                    action = Some(StudyAction::Answer(UserAnswer::Bool(true)));
                }
                if ui.button(ui_text(language, "Faux", "خطأ")).clicked() {
                    action = Some(StudyAction::Answer(UserAnswer::Bool(false)));
                }
            });
        }
        AnswerSpec::ShortAnswer { .. } => {
            ui.horizontal(|ui| {
                let field = ui.text_edit_singleline(text_answer);
                let entered = field.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
                if ui.button(ui_text(language, "Vérifier", "تحقق")).clicked() || entered {
                    action = Some(StudyAction::Answer(UserAnswer::Text(text_answer.clone())));
                }
            });
        }
        AnswerSpec::Flashcard { .. } => {
            if !session.is_revealed() {
                if ui.button(ui_text(language, "Voir la réponse", "أظهر الإجابة")).clicked() {
                    action = Some(StudyAction::Reveal);
                }
            } else {
                ui.horizontal(|ui| {
                    if ui.button(ui_text(language, "Je savais", "عرفتها")).clicked() {
                        action = Some(StudyAction::Respond(Response::Correct));
                    }
                    if ui.button(ui_text(language, "Je ne savais pas", "لم أعرفها")).clicked() {
                        action = Some(StudyAction::Respond(Response::Incorrect));
                    }
                    if ui.button(ui_text(language, "Passer", "تخطَّ")).clicked() {
                        action = Some(StudyAction::Respond(Response::Skipped));
                    }
                });
            }
        }
    }
    action
}

fn render_results(ui: &mut egui::Ui, language: Language, stats: &SessionStats) {
    ui.heading(format!("{}%", stats.percentage));
    ui.label(format!(
        "{}: {} · {}: {} · {}: {}",
        ui_text(language, "Correctes", "صحيحة"),
        stats.correct,
        ui_text(language, "Incorrectes", "خاطئة"),
        stats.incorrect,
        ui_text(language, "Passées", "متروكة"),
        stats.skipped
    ));
    ui.label(format!(
        "{}: {:.0}%",
        ui_text(language, "Précision", "الدقة"),
        stats.accuracy * 100.0
    ));
    ui.label(format!(
        "{}: {}",
        ui_text(language, "Durée", "المدة"),
        format_elapsed(stats.elapsed)
    ));
}

/// Formats a duration as `m:ss`
fn format_elapsed(elapsed: TimeDelta) -> String {
    let secs = elapsed.num_seconds().max(0);
    format!("{}:{:02}", secs / 60, secs % 60)
}

fn ui_text(language: Language, fr: &'static str, ar: &'static str) -> &'static str {
    match language {
        Language::Fr => fr,
        Language::Ar => ar,
    }
}
