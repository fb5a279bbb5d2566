//! Master Data Seeding
//!
//! Character kinds and the title catalog. Idempotent: inserts are keyed
//! on (asset_key, stage) / title key and re-running is a no-op.

use std::sync::Arc;

use taskpet::{
    CharacterKind, CharacterKindRepository, DomainError, Stage, Title, TitleRepository, TitleRule,
};

pub async fn seed_character_kinds<K: CharacterKindRepository>(
    kinds: Arc<K>,
) -> Result<(), DomainError> {
    // Every creature line has a child and an adult kind, so any pet
    // that hatches can also evolve.
    let catalog = [
        ("egg", Stage::Egg, "Egg"),
        ("green_robo", Stage::Child, "Green Robo"),
        ("green_robo", Stage::Adult, "Green Robo"),
        ("hurozapple", Stage::Child, "Hurozapple"),
        ("hurozapple", Stage::Adult, "Hurozapple"),
        ("dreamowl", Stage::Child, "Dreamowl"),
        ("dreamowl", Stage::Adult, "Dreamowl"),
        ("lumya", Stage::Child, "Lumya"),
        ("lumya", Stage::Adult, "Lumya"),
        ("luna", Stage::Child, "Luna"),
        ("luna", Stage::Adult, "Luna"),
        ("frame", Stage::Child, "Frame"),
        ("frame", Stage::Adult, "Frame"),
    ];

    for (asset_key, stage, name) in catalog {
        kinds
            .insert_if_missing(&CharacterKind::new(asset_key, stage, name))
            .await?;
    }

    tracing::info!("character kinds seeded");
    Ok(())
}

pub async fn seed_titles<T: TitleRepository>(titles: Arc<T>) -> Result<(), DomainError> {
    let catalog = [
        ("todo_5", "First Steps", TitleRule::TodoCompletion, 5),
        ("todo_10", "Getting Things Done", TitleRule::TodoCompletion, 10),
        ("todo_20", "Todo Expert", TitleRule::TodoCompletion, 20),
        ("todo_50", "Todo Virtuoso", TitleRule::TodoCompletion, 50),
        ("todo_100", "Todo Master", TitleRule::TodoCompletion, 100),
        ("habit_5", "Habit Seedling", TitleRule::HabitCompletion, 5),
        ("habit_10", "Small Streak", TitleRule::HabitCompletion, 10),
        ("habit_20", "Habit Expert", TitleRule::HabitCompletion, 20),
        ("habit_50", "Habit Virtuoso", TitleRule::HabitCompletion, 50),
        ("habit_100", "Habit Master", TitleRule::HabitCompletion, 100),
        ("pet_lv5", "Novice Keeper", TitleRule::PetLevel, 5),
        ("pet_lv10", "Skilled Keeper", TitleRule::PetLevel, 10),
        ("pet_lv20", "Master Keeper", TitleRule::PetLevel, 20),
    ];

    for (key, name, rule, threshold) in catalog {
        titles
            .insert_if_missing(&Title::new(key, name, rule, threshold))
            .await?;
    }

    tracing::info!("titles seeded");
    Ok(())
}
