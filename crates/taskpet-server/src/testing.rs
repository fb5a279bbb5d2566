//! In-memory port implementations for service and job tests.
//!
//! One shared `State` behind a mutex plays the role of the database;
//! the ledger double applies the same domain methods the Postgres
//! adapter does, so orchestration tests exercise real progression
//! arithmetic.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use rand::seq::SliceRandom;
use uuid::Uuid;

use taskpet::{
    Character, CharacterKind, CharacterKindRepository, CharacterRepository, CommentContext,
    CommentEvent, CommentGenerator, DomainError, FeedConfig, FeedOutcome, LifeState, PushNotifier,
    Stage, Task, TaskEvent, TaskEventRepository, TaskKind, TaskLedger, TaskRepository, TaskStatus,
    Title, TitleRepository, TrackingMode, User, UserRepository, UserTitle,
};

#[derive(Default)]
pub struct State {
    pub users: HashMap<Uuid, User>,
    pub kinds: Vec<CharacterKind>,
    pub characters: HashMap<Uuid, Character>,
    pub tasks: HashMap<Uuid, Task>,
    pub events: Vec<TaskEvent>,
    pub titles: Vec<Title>,
    pub user_titles: Vec<UserTitle>,
}

pub type Shared = Arc<Mutex<State>>;

impl State {
    fn active_character_id(&self, user_id: Uuid) -> Option<Uuid> {
        self.users.get(&user_id)?.active_character_id
    }

    /// Same grant semantics as the Postgres adapter: cascade, hatch
    /// into a random child kind, evolve into the adult of the same line.
    fn grant_exp(&mut self, character_id: Uuid, amount: i64) -> Result<Character, DomainError> {
        let mut character = self
            .characters
            .get(&character_id)
            .cloned()
            .ok_or_else(|| DomainError::not_found("Character", character_id))?;

        let needs = character.apply_exp_gain(amount, Utc::now());

        if needs.hatch_due {
            let child = self
                .kinds
                .iter()
                .filter(|k| k.stage == Stage::Child)
                .cloned()
                .collect::<Vec<_>>()
                .choose(&mut rand::thread_rng())
                .cloned()
                .ok_or_else(|| DomainError::Repository("no child kinds seeded".into()))?;
            character.hatch_into(&child);
        }

        if needs.evolve_due {
            let asset_key = self
                .kinds
                .iter()
                .find(|k| k.id == character.kind_id)
                .map(|k| k.asset_key.clone())
                .ok_or_else(|| DomainError::not_found("CharacterKind", character.kind_id))?;
            if let Some(adult) = self
                .kinds
                .iter()
                .find(|k| k.asset_key == asset_key && k.stage == Stage::Adult)
                .cloned()
            {
                character.evolve_into(&adult);
            }
        }

        self.characters.insert(character.id, character.clone());
        Ok(character)
    }

    fn revoke_exp(&mut self, character_id: Uuid, amount: i64) -> Result<Character, DomainError> {
        let character = self
            .characters
            .get_mut(&character_id)
            .ok_or_else(|| DomainError::not_found("Character", character_id))?;
        character.decrease_exp(amount);
        Ok(character.clone())
    }
}

// ---------------------------------------------------------------------------
// Repositories
// ---------------------------------------------------------------------------

pub struct MemUserRepository(pub Shared);

#[async_trait]
impl UserRepository for MemUserRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, DomainError> {
        Ok(self.0.lock().unwrap().users.get(&id).cloned())
    }

    async fn insert(&self, user: &User) -> Result<User, DomainError> {
        self.0.lock().unwrap().users.insert(user.id, user.clone());
        Ok(user.clone())
    }

    async fn save(&self, user: &User) -> Result<User, DomainError> {
        self.0.lock().unwrap().users.insert(user.id, user.clone());
        Ok(user.clone())
    }

    async fn set_active_character(
        &self,
        user_id: Uuid,
        character_id: Uuid,
    ) -> Result<(), DomainError> {
        let mut state = self.0.lock().unwrap();
        let user = state
            .users
            .get_mut(&user_id)
            .ok_or_else(|| DomainError::not_found("User", user_id))?;
        user.active_character_id = Some(character_id);
        Ok(())
    }
}

pub struct MemCharacterKindRepository(pub Shared);

#[async_trait]
impl CharacterKindRepository for MemCharacterKindRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<CharacterKind>, DomainError> {
        Ok(self
            .0
            .lock()
            .unwrap()
            .kinds
            .iter()
            .find(|k| k.id == id)
            .cloned())
    }

    async fn find_all(&self) -> Result<Vec<CharacterKind>, DomainError> {
        Ok(self.0.lock().unwrap().kinds.clone())
    }

    async fn find_by_asset_key_and_stage(
        &self,
        asset_key: &str,
        stage: Stage,
    ) -> Result<Option<CharacterKind>, DomainError> {
        Ok(self
            .0
            .lock()
            .unwrap()
            .kinds
            .iter()
            .find(|k| k.asset_key == asset_key && k.stage == stage)
            .cloned())
    }

    async fn insert_if_missing(&self, kind: &CharacterKind) -> Result<CharacterKind, DomainError> {
        let mut state = self.0.lock().unwrap();
        if let Some(existing) = state
            .kinds
            .iter()
            .find(|k| k.asset_key == kind.asset_key && k.stage == kind.stage)
        {
            return Ok(existing.clone());
        }
        state.kinds.push(kind.clone());
        Ok(kind.clone())
    }
}

pub struct MemCharacterRepository(pub Shared);

#[async_trait]
impl CharacterRepository for MemCharacterRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Character>, DomainError> {
        Ok(self.0.lock().unwrap().characters.get(&id).cloned())
    }

    async fn find_active_for_user(&self, user_id: Uuid) -> Result<Option<Character>, DomainError> {
        let state = self.0.lock().unwrap();
        Ok(state
            .active_character_id(user_id)
            .and_then(|id| state.characters.get(&id).cloned()))
    }

    async fn insert(&self, character: &Character) -> Result<Character, DomainError> {
        self.0
            .lock()
            .unwrap()
            .characters
            .insert(character.id, character.clone());
        Ok(character.clone())
    }

    async fn save(&self, character: &Character) -> Result<Character, DomainError> {
        self.0
            .lock()
            .unwrap()
            .characters
            .insert(character.id, character.clone());
        Ok(character.clone())
    }

    async fn feed_active(
        &self,
        user_id: Uuid,
        config: &FeedConfig,
    ) -> Result<Option<FeedOutcome>, DomainError> {
        let mut state = self.0.lock().unwrap();
        let Some(character_id) = state.active_character_id(user_id) else {
            return Ok(None);
        };
        let food_count = state
            .users
            .get(&user_id)
            .map(|u| u.food_count)
            .ok_or_else(|| DomainError::not_found("User", user_id))?;

        let mut character = state
            .characters
            .get(&character_id)
            .cloned()
            .ok_or_else(|| DomainError::not_found("Character", character_id))?;

        let outcome = character.try_feed(food_count, config, Utc::now());
        if let FeedOutcome::Fed { food_cost } = outcome {
            state.characters.insert(character.id, character);
            if let Some(user) = state.users.get_mut(&user_id) {
                user.food_count -= food_cost;
            }
        }
        Ok(Some(outcome))
    }

    async fn find_active_alive(&self) -> Result<Vec<Character>, DomainError> {
        let state = self.0.lock().unwrap();
        Ok(state
            .users
            .values()
            .filter_map(|u| u.active_character_id)
            .filter_map(|id| state.characters.get(&id))
            .filter(|c| c.is_alive())
            .cloned()
            .collect())
    }

    async fn find_active_with_bond(
        &self,
        bond: i32,
    ) -> Result<Vec<(User, Character)>, DomainError> {
        let state = self.0.lock().unwrap();
        Ok(state
            .users
            .values()
            .filter_map(|u| {
                let c = state.characters.get(&u.active_character_id?)?;
                (c.bond == bond && c.is_alive()).then(|| (u.clone(), c.clone()))
            })
            .collect())
    }

    async fn find_dead_between(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<(User, Character)>, DomainError> {
        let state = self.0.lock().unwrap();
        Ok(state
            .users
            .values()
            .filter_map(|u| {
                let c = state.characters.get(&u.active_character_id?)?;
                let dead_at = c.dead_at?;
                (c.life_state == LifeState::Dead && dead_at >= from && dead_at <= to)
                    .then(|| (u.clone(), c.clone()))
            })
            .collect())
    }
}

pub struct MemTaskRepository(pub Shared);

#[async_trait]
impl TaskRepository for MemTaskRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Task>, DomainError> {
        Ok(self.0.lock().unwrap().tasks.get(&id).cloned())
    }

    async fn find_for_user(&self, user_id: Uuid) -> Result<Vec<Task>, DomainError> {
        Ok(self
            .0
            .lock()
            .unwrap()
            .tasks
            .values()
            .filter(|t| t.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn insert(&self, task: &Task) -> Result<Task, DomainError> {
        self.0.lock().unwrap().tasks.insert(task.id, task.clone());
        Ok(task.clone())
    }

    async fn save(&self, task: &Task) -> Result<Task, DomainError> {
        self.0.lock().unwrap().tasks.insert(task.id, task.clone());
        Ok(task.clone())
    }

    async fn delete(&self, id: Uuid) -> Result<bool, DomainError> {
        let mut state = self.0.lock().unwrap();
        let existed = state.tasks.remove(&id).is_some();
        state.events.retain(|e| e.task_id != id);
        Ok(existed)
    }

    async fn find_open_due_on(&self, date: NaiveDate) -> Result<Vec<Task>, DomainError> {
        Ok(self
            .0
            .lock()
            .unwrap()
            .tasks
            .values()
            .filter(|t| t.is_open() && t.due_on == Some(date))
            .cloned()
            .collect())
    }

    async fn reset_done_checkbox_habits(&self, before: DateTime<Utc>) -> Result<u64, DomainError> {
        let mut state = self.0.lock().unwrap();
        let mut reset = 0;
        for task in state.tasks.values_mut() {
            if task.is_habit()
                && task.tracking_mode == Some(TrackingMode::Checkbox)
                && task.is_done()
                && task.completed_at.is_some_and(|at| at < before)
            {
                task.status = TaskStatus::Open;
                task.completed_at = None;
                reset += 1;
            }
        }
        Ok(reset)
    }
}

pub struct MemTaskEventRepository(pub Shared);

#[async_trait]
impl TaskEventRepository for MemTaskEventRepository {
    async fn append(&self, event: &TaskEvent) -> Result<TaskEvent, DomainError> {
        self.0.lock().unwrap().events.push(event.clone());
        Ok(event.clone())
    }

    async fn completed_delta_sum(
        &self,
        user_id: Uuid,
        kind: TaskKind,
    ) -> Result<i64, DomainError> {
        Ok(self
            .0
            .lock()
            .unwrap()
            .events
            .iter()
            .filter(|e| {
                e.user_id == user_id
                    && e.task_kind == kind
                    && e.action == taskpet::EventAction::Completed
            })
            .map(|e| i64::from(e.delta))
            .sum())
    }
}

pub struct MemTitleRepository(pub Shared);

#[async_trait]
impl TitleRepository for MemTitleRepository {
    async fn find_active(&self) -> Result<Vec<Title>, DomainError> {
        Ok(self
            .0
            .lock()
            .unwrap()
            .titles
            .iter()
            .filter(|t| t.active)
            .cloned()
            .collect())
    }

    async fn unlocked_title_ids(&self, user_id: Uuid) -> Result<Vec<Uuid>, DomainError> {
        Ok(self
            .0
            .lock()
            .unwrap()
            .user_titles
            .iter()
            .filter(|ut| ut.user_id == user_id)
            .map(|ut| ut.title_id)
            .collect())
    }

    async fn try_unlock(&self, unlock: &UserTitle) -> Result<bool, DomainError> {
        let mut state = self.0.lock().unwrap();
        let exists = state
            .user_titles
            .iter()
            .any(|ut| ut.user_id == unlock.user_id && ut.title_id == unlock.title_id);
        if exists {
            return Ok(false);
        }
        state.user_titles.push(unlock.clone());
        Ok(true)
    }

    async fn insert_if_missing(&self, title: &Title) -> Result<Title, DomainError> {
        let mut state = self.0.lock().unwrap();
        if let Some(existing) = state.titles.iter().find(|t| t.key == title.key) {
            return Ok(existing.clone());
        }
        state.titles.push(title.clone());
        Ok(title.clone())
    }
}

// ---------------------------------------------------------------------------
// Ledger
// ---------------------------------------------------------------------------

pub struct MemTaskLedger(pub Shared);

impl MemTaskLedger {
    fn load_task(state: &State, task_id: Uuid, user_id: Uuid) -> Result<Task, DomainError> {
        state
            .tasks
            .get(&task_id)
            .filter(|t| t.user_id == user_id)
            .cloned()
            .ok_or_else(|| DomainError::not_found("Task", task_id))
    }
}

#[async_trait]
impl TaskLedger for MemTaskLedger {
    async fn log_created(&self, task_id: Uuid, user_id: Uuid) -> Result<TaskEvent, DomainError> {
        let mut state = self.0.lock().unwrap();
        let task = Self::load_task(&state, task_id, user_id)?;
        let event = TaskEvent::created(&task, user_id, Utc::now());
        state.events.push(event.clone());
        Ok(event)
    }

    async fn complete(
        &self,
        task_id: Uuid,
        user_id: Uuid,
        award_exp: bool,
    ) -> Result<Task, DomainError> {
        let mut state = self.0.lock().unwrap();
        let mut task = Self::load_task(&state, task_id, user_id)?;

        if !task.is_completable() {
            return Err(DomainError::Usage(
                "log habits are completed by logging amounts, not by checking off".into(),
            ));
        }
        if task.is_done() {
            return Err(DomainError::Conflict("task is already done".into()));
        }

        let now = Utc::now();
        task.status = TaskStatus::Done;
        task.completed_at = Some(now);

        if let Some(user) = state.users.get_mut(&user_id) {
            user.food_count += task.reward_food_count;
        }

        let mut awarded_character_id = None;
        let mut xp_amount = 0;
        if award_exp && task.reward_exp > 0 {
            if let Some(character_id) = state.active_character_id(user_id) {
                state.grant_exp(character_id, i64::from(task.reward_exp))?;
                awarded_character_id = Some(character_id);
                xp_amount = task.reward_exp;
            }
        }

        state.tasks.insert(task.id, task.clone());
        state.events.push(TaskEvent::completed(
            &task,
            user_id,
            awarded_character_id,
            xp_amount,
            now,
        ));
        Ok(task)
    }

    async fn reopen(
        &self,
        task_id: Uuid,
        user_id: Uuid,
        revert_exp: bool,
        revert_food: bool,
    ) -> Result<Task, DomainError> {
        let mut state = self.0.lock().unwrap();
        let mut task = Self::load_task(&state, task_id, user_id)?;

        if task.is_open() {
            return Ok(task);
        }

        let now = Utc::now();
        task.status = TaskStatus::Open;
        task.completed_at = None;

        if revert_food {
            if let Some(user) = state.users.get_mut(&user_id) {
                user.food_count = (user.food_count - task.reward_food_count).max(0);
            }
        }

        let mut awarded_character_id = None;
        let mut xp_reverted = 0;
        if revert_exp && task.reward_exp > 0 {
            if let Some(character_id) = state.active_character_id(user_id) {
                state.revoke_exp(character_id, i64::from(task.reward_exp))?;
                awarded_character_id = Some(character_id);
                xp_reverted = task.reward_exp;
            }
        }

        state.tasks.insert(task.id, task.clone());
        state.events.push(TaskEvent::reopened(
            &task,
            user_id,
            awarded_character_id,
            xp_reverted,
            now,
        ));
        Ok(task)
    }

    async fn log_amount(
        &self,
        task_id: Uuid,
        user_id: Uuid,
        amount: f64,
        unit: Option<String>,
    ) -> Result<Task, DomainError> {
        let mut state = self.0.lock().unwrap();
        let task = Self::load_task(&state, task_id, user_id)?;

        if !task.is_log_habit() {
            return Err(DomainError::Usage(
                "only log habits accept amount entries".into(),
            ));
        }
        if amount <= 0.0 {
            return Err(DomainError::Validation("amount must be positive".into()));
        }

        let now = Utc::now();
        let unit = unit.or_else(|| task.target_unit.map(|u| u.to_string()));

        if let Some(user) = state.users.get_mut(&user_id) {
            user.food_count += task.reward_food_count;
        }

        let mut awarded_character_id = None;
        let mut xp_amount = 0;
        if task.reward_exp > 0 {
            if let Some(character_id) = state.active_character_id(user_id) {
                state.grant_exp(character_id, i64::from(task.reward_exp))?;
                awarded_character_id = Some(character_id);
                xp_amount = task.reward_exp;
            }
        }

        state.events.push(TaskEvent::logged(
            &task,
            user_id,
            awarded_character_id,
            amount,
            unit,
            xp_amount,
            now,
        ));
        Ok(task)
    }
}

// ---------------------------------------------------------------------------
// Collaborator doubles
// ---------------------------------------------------------------------------

/// Returns a fixed comment (or an error) and records every event it
/// was asked about.
pub struct StubCommentGenerator {
    pub reply: Option<String>,
    pub fail: bool,
    pub calls: Mutex<Vec<CommentEvent>>,
}

impl StubCommentGenerator {
    pub fn replying(reply: &str) -> Self {
        Self {
            reply: Some(reply.to_string()),
            fail: false,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn failing() -> Self {
        Self {
            reply: None,
            fail: true,
            calls: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl CommentGenerator for StubCommentGenerator {
    async fn generate(
        &self,
        event: CommentEvent,
        _character: &Character,
        _kind: &CharacterKind,
        _context: &CommentContext,
    ) -> Result<Option<String>, DomainError> {
        self.calls.lock().unwrap().push(event);
        if self.fail {
            return Err(DomainError::ExternalService("generator down".into()));
        }
        Ok(self.reply.clone())
    }
}

/// Records every push instead of delivering it.
#[derive(Default)]
pub struct RecordingNotifier {
    pub sent: Mutex<Vec<(String, String)>>,
}

#[async_trait]
impl PushNotifier for RecordingNotifier {
    async fn send(&self, messaging_id: &str, text: &str) -> Result<(), DomainError> {
        self.sent
            .lock()
            .unwrap()
            .push((messaging_id.to_string(), text.to_string()));
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

pub fn shared() -> Shared {
    Arc::new(Mutex::new(State::default()))
}

/// Seed the standard kind catalog: one egg line, two child/adult lines.
pub fn seed_kinds(shared: &Shared) {
    let mut state = shared.lock().unwrap();
    state.kinds = vec![
        CharacterKind::new("egg", Stage::Egg, "Egg"),
        CharacterKind::new("lumya", Stage::Child, "Lumya"),
        CharacterKind::new("lumya", Stage::Adult, "Lumya"),
        CharacterKind::new("dreamowl", Stage::Child, "Dreamowl"),
        CharacterKind::new("dreamowl", Stage::Adult, "Dreamowl"),
    ];
}

/// A user already raising a fresh egg.
pub fn user_with_egg(shared: &Shared) -> (User, Character) {
    let mut state = shared.lock().unwrap();
    let egg_kind = state
        .kinds
        .iter()
        .find(|k| k.stage == Stage::Egg)
        .expect("seed_kinds first")
        .clone();

    let mut user = User::new("tester");
    let character = Character::new_egg(user.id, &egg_kind);
    user.active_character_id = Some(character.id);

    state.characters.insert(character.id, character.clone());
    state.users.insert(user.id, user.clone());
    (user, character)
}
