//! Built-in sample decks, written into an empty database on first launch.

use crate::models::{AnswerSpec, Deck, Difficulty, Item, Language, LocalizedList, LocalizedText};

pub fn sample_decks() -> Vec<Deck> {
    vec![cardiology_quiz(), anatomy_cards()]
}

fn cardiology_quiz() -> Deck {
    Deck {
        id: "cardio-quiz".to_string(),
        title: LocalizedText::fr_ar("Cardiologie : les bases", "أمراض القلب: الأساسيات"),
        description: LocalizedText::fr_ar(
            "Questions d'introduction sur le cœur et la circulation.",
            "أسئلة تمهيدية حول القلب والدورة الدموية.",
        ),
        category: "cardiology".to_string(),
        difficulty: Difficulty::Beginner,
        items: vec![
            Item {
                id: "chambers".to_string(),
                prompt: LocalizedText::fr_ar(
                    "Combien de cavités compte le cœur humain ?",
                    "كم عدد حجرات قلب الإنسان؟",
                ),
                answer: AnswerSpec::MultipleChoice {
                    options: LocalizedList::new()
                        .with(Language::Fr, ["Deux", "Trois", "Quatre", "Cinq"])
                        .with(Language::Ar, ["اثنتان", "ثلاث", "أربع", "خمس"]),
                    correct_index: 2,
                },
                explanation: Some(LocalizedText::fr_ar(
                    "Deux oreillettes et deux ventricules.",
                    "أذينان وبطينان.",
                )),
            },
            Item {
                id: "pulmonary-artery".to_string(),
                prompt: LocalizedText::fr_ar(
                    "L'artère pulmonaire transporte du sang oxygéné.",
                    "الشريان الرئوي ينقل دمًا مؤكسجًا.",
                ),
                answer: AnswerSpec::TrueFalse {
                    correct_value: false,
                },
                explanation: Some(LocalizedText::fr_ar(
                    "Elle conduit le sang pauvre en oxygène vers les poumons.",
                    "ينقل الدم الفقير بالأكسجين إلى الرئتين.",
                )),
            },
            Item {
                id: "pacemaker".to_string(),
                prompt: LocalizedText::fr_ar(
                    "Quel nœud est le stimulateur naturel du cœur ?",
                    "ما هي العقدة التي تعد منظم ضربات القلب الطبيعي؟",
                ),
                answer: AnswerSpec::ShortAnswer {
                    correct_text: LocalizedText::fr_ar("Sinusal", "الجيبية"),
                },
                explanation: Some(LocalizedText::fr_ar(
                    "Le nœud sinusal, dans l'oreillette droite.",
                    "العقدة الجيبية الأذينية في الأذين الأيمن.",
                )),
            },
        ],
    }
}

fn anatomy_cards() -> Deck {
    let card = |id: &str, front: (&str, &str), back: (&str, &str)| Item {
        id: id.to_string(),
        prompt: LocalizedText::fr_ar(front.0, front.1),
        answer: AnswerSpec::Flashcard {
            back: LocalizedText::fr_ar(back.0, back.1),
        },
        explanation: None,
    };

    Deck {
        id: "anatomy-cards".to_string(),
        title: LocalizedText::fr_ar("Anatomie : os et organes", "التشريح: العظام والأعضاء"),
        description: LocalizedText::fr_ar(
            "Cartes mémoire de vocabulaire anatomique.",
            "بطاقات لحفظ المصطلحات التشريحية.",
        ),
        category: "anatomy".to_string(),
        difficulty: Difficulty::Beginner,
        items: vec![
            card("femur", ("Fémur", "عظم الفخذ"), ("Os de la cuisse", "عظم الفخذ الطويل")),
            card("pancreas", ("Pancréas", "البنكرياس"), ("Sécrète l'insuline", "يفرز الأنسولين")),
            card("alveoli", ("Alvéoles", "الحويصلات الهوائية"), ("Échanges gazeux pulmonaires", "تبادل الغازات في الرئتين")),
        ],
    }
}
