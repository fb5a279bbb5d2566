//! Completion Orchestrator (Use Case)
//!
//! Wraps the transactional ledger operations with everything the UI
//! wants afterwards: growth detection over before/after snapshots, the
//! pet's reaction comment, and title evaluation. The ledger mutation is
//! the only part that must succeed; comment generation degrades to "no
//! comment" on failure, and titles are only evaluated after genuine
//! completions.

use std::sync::Arc;
use uuid::Uuid;

use taskpet::{
    growth, Character, CharacterKindRepository, CharacterRepository, CommentContext, CommentEvent,
    CommentGenerator, DomainError, GrowthFlags, GrowthSnapshot, Task, TaskEventRepository,
    TaskLedger, TaskRepository, Title, TitleRepository,
};

use super::title_unlocker::TitleUnlocker;

/// Everything that came out of completing (or reopening, or logging
/// against) a task, in one place.
#[derive(Debug, Clone)]
pub struct CompletionResult {
    pub task: Task,
    pub notice: Option<String>,
    pub growth: GrowthFlags,
    pub pet_comment: Option<String>,
    pub unlocked_titles: Vec<Title>,
}

impl CompletionResult {
    fn quiet(task: Task, notice: impl Into<String>) -> Self {
        Self {
            task,
            notice: Some(notice.into()),
            growth: GrowthFlags::none(),
            pet_comment: None,
            unlocked_titles: Vec::new(),
        }
    }
}

pub struct CompletionService<L, R, C, K, E, T, G>
where
    L: TaskLedger,
    R: TaskRepository,
    C: CharacterRepository,
    K: CharacterKindRepository,
    E: TaskEventRepository,
    T: TitleRepository,
    G: CommentGenerator,
{
    ledger: Arc<L>,
    tasks: Arc<R>,
    characters: Arc<C>,
    kinds: Arc<K>,
    comments: Arc<G>,
    unlocker: Arc<TitleUnlocker<E, C, T>>,
}

impl<L, R, C, K, E, T, G> CompletionService<L, R, C, K, E, T, G>
where
    L: TaskLedger,
    R: TaskRepository,
    C: CharacterRepository,
    K: CharacterKindRepository,
    E: TaskEventRepository,
    T: TitleRepository,
    G: CommentGenerator,
{
    pub fn new(
        ledger: Arc<L>,
        tasks: Arc<R>,
        characters: Arc<C>,
        kinds: Arc<K>,
        comments: Arc<G>,
        unlocker: Arc<TitleUnlocker<E, C, T>>,
    ) -> Self {
        Self {
            ledger,
            tasks,
            characters,
            kinds,
            comments,
            unlocker,
        }
    }

    /// Toggle a todo or checkbox habit: open tasks complete (with
    /// rewards), done tasks reopen (reversing rewards). Log habits get
    /// a guidance notice and no mutation.
    pub async fn complete(
        &self,
        task_id: Uuid,
        user_id: Uuid,
    ) -> Result<CompletionResult, DomainError> {
        let task = self
            .tasks
            .find_by_id(task_id)
            .await?
            .filter(|t| t.user_id == user_id)
            .ok_or_else(|| DomainError::not_found("Task", task_id))?;

        if task.is_log_habit() {
            return Ok(CompletionResult::quiet(
                task,
                "This habit is tracked by logging amounts",
            ));
        }

        let before = self.active_snapshot(user_id).await?;

        let (saved, completed, notice) = if task.is_done() {
            let saved = self.ledger.reopen(task_id, user_id, true, true).await?;
            (saved, false, "Task reopened")
        } else {
            let saved = self.ledger.complete(task_id, user_id, true).await?;
            (saved, true, "Task completed")
        };

        let character = self.characters.find_active_for_user(user_id).await?;
        let growth = growth::detect(before, character.as_ref().map(Character::growth_snapshot));

        let pet_comment = if completed {
            let event = if growth.leveled_up {
                Some(CommentEvent::LevelUp)
            } else {
                Some(CommentEvent::TaskCompleted)
            };
            self.comment_for(character.as_ref(), &saved, growth, event)
                .await
        } else {
            None
        };

        let unlocked_titles = if completed {
            self.unlocker.unlock_for(user_id).await?
        } else {
            Vec::new()
        };

        Ok(CompletionResult {
            task: saved,
            notice: Some(notice.into()),
            growth,
            pet_comment,
            unlocked_titles,
        })
    }

    /// Record a quantity against a log habit. Same result shape as
    /// `complete`, except titles are never evaluated for logs and the
    /// pet only speaks up on a level-up.
    pub async fn log_amount(
        &self,
        task_id: Uuid,
        user_id: Uuid,
        amount: f64,
        unit: Option<String>,
    ) -> Result<CompletionResult, DomainError> {
        let task = self
            .tasks
            .find_by_id(task_id)
            .await?
            .filter(|t| t.user_id == user_id)
            .ok_or_else(|| DomainError::not_found("Task", task_id))?;

        if !task.is_log_habit() {
            return Ok(CompletionResult::quiet(
                task,
                "This task is not an amount-logged habit",
            ));
        }

        let before = self.active_snapshot(user_id).await?;

        let saved = self.ledger.log_amount(task_id, user_id, amount, unit).await?;

        let character = self.characters.find_active_for_user(user_id).await?;
        let growth = growth::detect(before, character.as_ref().map(Character::growth_snapshot));

        let event = growth.leveled_up.then_some(CommentEvent::LevelUp);
        let pet_comment = self
            .comment_for(character.as_ref(), &saved, growth, event)
            .await;

        Ok(CompletionResult {
            task: saved,
            notice: Some("Logged".into()),
            growth,
            pet_comment,
            unlocked_titles: Vec::new(),
        })
    }

    async fn active_snapshot(&self, user_id: Uuid) -> Result<Option<GrowthSnapshot>, DomainError> {
        Ok(self
            .characters
            .find_active_for_user(user_id)
            .await?
            .as_ref()
            .map(Character::growth_snapshot))
    }

    /// Hatch and evolution moments get their own ceremony in the UI, so
    /// the chat comment stays quiet for those. Generation failures are
    /// logged and swallowed.
    async fn comment_for(
        &self,
        character: Option<&Character>,
        task: &Task,
        growth: GrowthFlags,
        event: Option<CommentEvent>,
    ) -> Option<String> {
        if growth.hatched || growth.evolved {
            return None;
        }
        let event = event?;
        let character = character.filter(|c| c.is_alive())?;

        let kind = match self.kinds.find_by_id(character.kind_id).await {
            Ok(Some(kind)) => kind,
            Ok(None) => return None,
            Err(e) => {
                tracing::warn!("failed to load character kind for comment: {e}");
                return None;
            }
        };

        let context = CommentContext {
            task_title: task.title.clone(),
            difficulty: task.difficulty,
        };

        match self
            .comments
            .generate(event, character, &kind, &context)
            .await
        {
            Ok(comment) => comment,
            Err(e) => {
                tracing::warn!("pet comment generation failed: {e}");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{
        seed_kinds, shared, user_with_egg, MemCharacterKindRepository, MemCharacterRepository,
        MemTaskEventRepository, MemTaskLedger, MemTaskRepository, MemTitleRepository, Shared,
        StubCommentGenerator,
    };
    use taskpet::{
        Difficulty, Stage, Task, TaskKind, TaskStatus, TitleRule, TrackingMode, User,
    };

    type TestService = CompletionService<
        MemTaskLedger,
        MemTaskRepository,
        MemCharacterRepository,
        MemCharacterKindRepository,
        MemTaskEventRepository,
        MemTitleRepository,
        StubCommentGenerator,
    >;

    fn service(shared: &Shared, comments: StubCommentGenerator) -> TestService {
        let characters = Arc::new(MemCharacterRepository(shared.clone()));
        let titles = Arc::new(MemTitleRepository(shared.clone()));
        let events = Arc::new(MemTaskEventRepository(shared.clone()));
        let unlocker = Arc::new(TitleUnlocker::new(events, characters.clone(), titles));
        CompletionService::new(
            Arc::new(MemTaskLedger(shared.clone())),
            Arc::new(MemTaskRepository(shared.clone())),
            characters,
            Arc::new(MemCharacterKindRepository(shared.clone())),
            Arc::new(comments),
            unlocker,
        )
    }

    fn insert_task(shared: &Shared, task: &Task) {
        shared
            .lock()
            .unwrap()
            .tasks
            .insert(task.id, task.clone());
    }

    fn world_with_todo() -> (Shared, User, Task) {
        let shared = shared();
        seed_kinds(&shared);
        let (user, _egg) = user_with_egg(&shared);
        let task = Task::new(
            user.id,
            "write report",
            TaskKind::Todo,
            None,
            Difficulty::Normal,
        );
        insert_task(&shared, &task);
        (shared, user, task)
    }

    #[tokio::test]
    async fn test_complete_grants_exp_food_and_event() {
        let (shared, user, task) = world_with_todo();
        let svc = service(&shared, StubCommentGenerator::replying("nice!"));

        let result = svc.complete(task.id, user.id).await.unwrap();

        assert_eq!(result.task.status, TaskStatus::Done);
        assert_eq!(result.pet_comment.as_deref(), Some("nice!"));
        assert!(!result.growth.any());

        let state = shared.lock().unwrap();
        let character = state
            .characters
            .get(&user.active_character_id.unwrap())
            .unwrap();
        assert_eq!(character.exp, 20);
        assert_eq!(state.users.get(&user.id).unwrap().food_count, 1);
        let event = state.events.last().unwrap();
        assert_eq!(event.delta, 1);
        assert_eq!(event.xp_amount, 20);
        assert_eq!(event.awarded_character_id, Some(character.id));
    }

    #[tokio::test]
    async fn test_complete_without_pet_records_zero_xp() {
        let shared = shared();
        seed_kinds(&shared);
        let user = User::new("petless");
        shared.lock().unwrap().users.insert(user.id, user.clone());
        let task = Task::new(
            user.id,
            "write report",
            TaskKind::Todo,
            None,
            Difficulty::Normal,
        );
        insert_task(&shared, &task);
        let svc = service(&shared, StubCommentGenerator::replying("nice!"));

        let result = svc.complete(task.id, user.id).await.unwrap();

        assert_eq!(result.task.status, TaskStatus::Done);
        assert!(result.pet_comment.is_none());

        let state = shared.lock().unwrap();
        // Food is still credited; the event carries the exp actually
        // granted, which here is none.
        assert_eq!(state.users.get(&user.id).unwrap().food_count, 1);
        let event = state.events.last().unwrap();
        assert_eq!(event.delta, 1);
        assert_eq!(event.xp_amount, 0);
        assert_eq!(event.awarded_character_id, None);
    }

    #[tokio::test]
    async fn test_reopen_round_trip_restores_exp_and_food() {
        let (shared, user, task) = world_with_todo();
        let svc = service(&shared, StubCommentGenerator::replying("nice!"));

        svc.complete(task.id, user.id).await.unwrap();
        let result = svc.complete(task.id, user.id).await.unwrap();

        assert_eq!(result.task.status, TaskStatus::Open);
        assert!(result.pet_comment.is_none());
        assert!(result.unlocked_titles.is_empty());

        let state = shared.lock().unwrap();
        let character = state
            .characters
            .get(&user.active_character_id.unwrap())
            .unwrap();
        assert_eq!(character.exp, 0);
        assert_eq!(state.users.get(&user.id).unwrap().food_count, 0);
        let event = state.events.last().unwrap();
        assert_eq!(event.delta, -1);
        assert_eq!(event.xp_amount, -20);
    }

    #[tokio::test]
    async fn test_log_habit_gets_guidance_and_no_mutation() {
        let shared = shared();
        seed_kinds(&shared);
        let (user, _egg) = user_with_egg(&shared);
        let task = Task::new(
            user.id,
            "run",
            TaskKind::Habit,
            Some(TrackingMode::Log),
            Difficulty::Easy,
        );
        insert_task(&shared, &task);
        let svc = service(&shared, StubCommentGenerator::replying("nice!"));

        let result = svc.complete(task.id, user.id).await.unwrap();

        assert!(result.notice.unwrap().contains("logging"));
        let state = shared.lock().unwrap();
        assert!(state.tasks.get(&task.id).unwrap().is_open());
        assert!(state.events.is_empty());
    }

    #[tokio::test]
    async fn test_hatch_suppresses_comment_and_changes_stage() {
        let (shared, user, task) = world_with_todo();
        {
            // 80 exp banked: the next normal todo (+20) crosses 100.
            let mut state = shared.lock().unwrap();
            let character = state
                .characters
                .get_mut(&user.active_character_id.unwrap())
                .unwrap();
            character.exp = 80;
        }
        let svc = service(&shared, StubCommentGenerator::replying("nice!"));

        let result = svc.complete(task.id, user.id).await.unwrap();

        assert!(result.growth.hatched);
        assert!(!result.growth.leveled_up);
        assert!(result.pet_comment.is_none());

        let state = shared.lock().unwrap();
        let character = state
            .characters
            .get(&user.active_character_id.unwrap())
            .unwrap();
        assert_eq!(character.level, 2);
        assert_eq!(character.stage, Stage::Child);
    }

    #[tokio::test]
    async fn test_level_up_uses_level_up_event() {
        let (shared, user, task) = world_with_todo();
        {
            // Already a child at level 2; next gain reaches level 3
            // without any stage change.
            let mut state = shared.lock().unwrap();
            let child_kind_id = state
                .kinds
                .iter()
                .find(|k| k.stage == Stage::Child)
                .unwrap()
                .id;
            let character = state
                .characters
                .get_mut(&user.active_character_id.unwrap())
                .unwrap();
            character.stage = Stage::Child;
            character.kind_id = child_kind_id;
            character.level = 2;
            character.exp = 210;
        }
        let comments = StubCommentGenerator::replying("level 3!");
        let svc = service(&shared, comments);

        let result = svc.complete(task.id, user.id).await.unwrap();

        assert!(result.growth.leveled_up);
        assert_eq!(result.pet_comment.as_deref(), Some("level 3!"));
    }

    #[tokio::test]
    async fn test_generator_failure_degrades_to_no_comment() {
        let (shared, user, task) = world_with_todo();
        let svc = service(&shared, StubCommentGenerator::failing());

        let result = svc.complete(task.id, user.id).await.unwrap();

        assert_eq!(result.task.status, TaskStatus::Done);
        assert!(result.pet_comment.is_none());
    }

    #[tokio::test]
    async fn test_fifth_completion_unlocks_title() {
        let shared = shared();
        seed_kinds(&shared);
        let (user, _egg) = user_with_egg(&shared);
        shared.lock().unwrap().titles.push(taskpet::Title::new(
            "todo_5",
            "First Steps",
            TitleRule::TodoCompletion,
            5,
        ));
        let svc = service(&shared, StubCommentGenerator::replying("nice!"));

        for i in 0..5 {
            let task = Task::new(
                user.id,
                format!("todo {i}"),
                TaskKind::Todo,
                None,
                Difficulty::Easy,
            );
            insert_task(&shared, &task);
            let result = svc.complete(task.id, user.id).await.unwrap();
            if i < 4 {
                assert!(result.unlocked_titles.is_empty());
            } else {
                assert_eq!(result.unlocked_titles.len(), 1);
                assert_eq!(result.unlocked_titles[0].key, "todo_5");
            }
        }

        // A sixth completion does not unlock it again.
        let task = Task::new(user.id, "todo 6", TaskKind::Todo, None, Difficulty::Easy);
        insert_task(&shared, &task);
        let result = svc.complete(task.id, user.id).await.unwrap();
        assert!(result.unlocked_titles.is_empty());
    }

    #[tokio::test]
    async fn test_log_amount_defaults_unit_and_skips_titles() {
        let shared = shared();
        seed_kinds(&shared);
        let (user, _egg) = user_with_egg(&shared);
        shared.lock().unwrap().titles.push(taskpet::Title::new(
            "habit_5",
            "Habit Seedling",
            TitleRule::HabitCompletion,
            1,
        ));
        let mut task = Task::new(
            user.id,
            "run",
            TaskKind::Habit,
            Some(TrackingMode::Log),
            Difficulty::Easy,
        );
        task.target_unit = Some(taskpet::TargetUnit::Km);
        insert_task(&shared, &task);
        let svc = service(&shared, StubCommentGenerator::replying("nice!"));

        let result = svc.log_amount(task.id, user.id, 3.0, None).await.unwrap();

        assert!(result.unlocked_titles.is_empty());
        // No level-up on 10 exp, so the pet stays quiet for a log.
        assert!(result.pet_comment.is_none());

        let state = shared.lock().unwrap();
        let event = state.events.last().unwrap();
        assert_eq!(event.amount, 3.0);
        assert_eq!(event.unit.as_deref(), Some("km"));
        assert_eq!(event.delta, 0);
        assert_eq!(event.xp_amount, 10);
        assert!(state.tasks.get(&task.id).unwrap().is_open());
    }

    #[tokio::test]
    async fn test_log_amount_rejects_checkbox_tasks() {
        let (shared, user, task) = world_with_todo();
        let svc = service(&shared, StubCommentGenerator::replying("nice!"));

        let result = svc.log_amount(task.id, user.id, 1.0, None).await.unwrap();

        assert!(result.notice.unwrap().contains("not an amount-logged"));
        assert!(shared.lock().unwrap().events.is_empty());
    }
}
