//! Integration tests for the SQLite store with real database operations

use medibot_core::testing::ScriptedChat;
use medibot_core::*;
use medibot_storage_sql::SqliteStore;
use std::sync::Arc;

async fn memory_store() -> SqliteStore {
    SqliteStore::new("sqlite::memory:").await.unwrap()
}

#[tokio::test]
async fn test_unknown_name_defaults_to_general() {
    let store = memory_store().await;

    assert_eq!(store.get_profile("Nadie").await.unwrap(), Profile::General);
    // Reading twice must not create a row
    assert_eq!(store.get_profile("Nadie").await.unwrap(), Profile::General);
    assert!(!store.name_exists("Nadie").await.unwrap());
}

#[tokio::test]
async fn test_profile_upsert_is_last_write_wins() {
    let store = memory_store().await;

    store.upsert_profile("Juan", Profile::Child).await.unwrap();
    assert_eq!(store.get_profile("Juan").await.unwrap(), Profile::Child);
    assert!(store.name_exists("Juan").await.unwrap());

    store.upsert_profile("Juan", Profile::Elder).await.unwrap();
    assert_eq!(store.get_profile("Juan").await.unwrap(), Profile::Elder);

    // Idempotent
    store.upsert_profile("Juan", Profile::Elder).await.unwrap();
    assert_eq!(store.get_profile("Juan").await.unwrap(), Profile::Elder);
}

#[tokio::test]
async fn test_recent_turns_are_oldest_first() {
    let store = memory_store().await;

    for i in 0..6 {
        let role = if i % 2 == 0 { Role::User } else { Role::Assistant };
        store
            .append_turn("Ana", role, &format!("mensaje {i}"))
            .await
            .unwrap();
    }

    let all = store.get_recent_turns("Ana", 6).await.unwrap();
    let contents: Vec<_> = all.iter().map(|m| m.content.clone()).collect();
    assert_eq!(
        contents,
        (0..6).map(|i| format!("mensaje {i}")).collect::<Vec<_>>()
    );
    assert_eq!(all[0].role, Role::User);
    assert_eq!(all[1].role, Role::Assistant);

    let last_two = store.get_recent_turns("Ana", 2).await.unwrap();
    assert_eq!(
        last_two,
        vec![
            HistoryMessage::new(Role::User, "mensaje 4"),
            HistoryMessage::new(Role::Assistant, "mensaje 5"),
        ]
    );
}

#[tokio::test]
async fn test_recent_turns_edge_cases() {
    let store = memory_store().await;

    assert!(store.get_recent_turns("Ana", 10).await.unwrap().is_empty());

    store.append_turn("Ana", Role::User, "hola").await.unwrap();
    store.append_turn("Ana", Role::User, "hola").await.unwrap();

    // No de-duplication, and a large limit returns everything there is
    assert_eq!(store.get_recent_turns("Ana", 10).await.unwrap().len(), 2);
    assert!(store.get_recent_turns("Ana", 0).await.unwrap().is_empty());
    assert_eq!(store.count_turns("Ana").await.unwrap(), 2);
}

#[tokio::test]
async fn test_users_do_not_share_history() {
    let store = memory_store().await;

    store.append_turn("Ana", Role::User, "de Ana").await.unwrap();
    store.append_turn("Luis", Role::User, "de Luis").await.unwrap();
    store.append_turn("Ana", Role::Assistant, "para Ana").await.unwrap();

    let ana = store.get_recent_turns("Ana", 10).await.unwrap();
    assert_eq!(ana.len(), 2);
    assert!(ana.iter().all(|m| m.content.contains("Ana")));
    assert_eq!(store.count_turns("Luis").await.unwrap(), 1);
}

#[tokio::test]
async fn test_turn_ids_and_timestamps_are_ordered() {
    let store = memory_store().await;

    let mut turns = Vec::new();
    for i in 0..5 {
        turns.push(
            store
                .append_turn("Eva", Role::User, &i.to_string())
                .await
                .unwrap(),
        );
    }

    assert!(turns.windows(2).all(|w| w[0].id < w[1].id));
    assert!(turns.windows(2).all(|w| w[0].timestamp <= w[1].timestamp));
    assert_eq!(turns[0].user, "Eva");
}

#[tokio::test]
async fn test_empty_user_is_rejected() {
    let store = memory_store().await;

    let err = store.append_turn("", Role::User, "x").await.unwrap_err();
    assert!(matches!(err, MediBotError::Validation(_)));
    let err = store.append_exchange("", "x", "y").await.unwrap_err();
    assert!(matches!(err, MediBotError::Validation(_)));
}

#[tokio::test]
async fn test_append_exchange_writes_pair_in_order() {
    let store = memory_store().await;

    store
        .append_exchange("Rosa", "me duele la garganta", "¿Tienes fiebre?")
        .await
        .unwrap();

    let turns = store.get_recent_turns("Rosa", 10).await.unwrap();
    assert_eq!(
        turns,
        vec![
            HistoryMessage::new(Role::User, "me duele la garganta"),
            HistoryMessage::new(Role::Assistant, "¿Tienes fiebre?"),
        ]
    );
}

#[tokio::test]
async fn test_file_database_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let url = format!("sqlite:{}", dir.path().join("medibot.db").display());

    {
        let store = SqliteStore::new(&url).await.unwrap();
        store.upsert_profile("Pedro", Profile::Elder).await.unwrap();
        store
            .append_exchange("Pedro", "hola", "Hola Pedro")
            .await
            .unwrap();
        store.close().await;
    }

    let reopened = SqliteStore::new(&url).await.unwrap();
    assert_eq!(reopened.get_profile("Pedro").await.unwrap(), Profile::Elder);
    assert_eq!(reopened.count_turns("Pedro").await.unwrap(), 2);
}

#[tokio::test]
async fn test_unopenable_path_is_storage_error() {
    let err = SqliteStore::new("sqlite:/nonexistent-medibot-dir/sub/medibot.db")
        .await
        .unwrap_err();
    assert!(err.is_storage());
}

#[tokio::test]
async fn test_conversation_service_over_sqlite() {
    let store = Arc::new(memory_store().await);
    let chat = Arc::new(ScriptedChat::new([
        "Hola Pedro, ¿en qué te ayudo?",
        "Toma agua y descansa.",
    ]));
    let service = ConversationService::new(
        MediBotConfig::default().with_database_url("sqlite::memory:"),
        store.clone(),
        store.clone(),
        chat.clone(),
    )
    .unwrap();

    let first = service
        .handle_text("Hola, me llamo Pedro, tengo 65 años")
        .await
        .unwrap();
    assert_eq!(first.user, "Pedro");
    assert_eq!(first.profile, Profile::Elder);

    service
        .handle_text("me llamo Pedro y me siento cansado")
        .await
        .unwrap();

    // Profile detection reruns on every utterance
    assert_eq!(store.get_profile("Pedro").await.unwrap(), Profile::General);
    assert_eq!(store.count_turns("Pedro").await.unwrap(), 4);

    let prompts = chat.prompts();
    let second_prompt = &prompts[1];
    assert_eq!(second_prompt.len(), 2 + 2);
    assert_eq!(second_prompt[0].content, system_instruction(Profile::General));
    assert_eq!(
        second_prompt[2],
        ChatMessage::assistant("Hola Pedro, ¿en qué te ayudo?")
    );

    let rejected = service.handle_text("buenos días").await.unwrap_err();
    assert!(matches!(rejected, MediBotError::NameNotDetected { .. }));
    assert_eq!(store.count_turns("Pedro").await.unwrap(), 4);
}

#[tokio::test]
async fn test_append_exchange_is_all_or_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let url = format!("sqlite:{}", dir.path().join("medibot.db").display());
    let store = SqliteStore::new(&url).await.unwrap();

    // Make the second insert of the pair fail
    let raw = sqlx::SqlitePool::connect(&url).await.unwrap();
    sqlx::query(
        r#"
        CREATE TRIGGER reject_assistant BEFORE INSERT ON history
        WHEN NEW.role = 'assistant'
        BEGIN
            SELECT RAISE(ABORT, 'assistant turns rejected');
        END
    "#,
    )
    .execute(&raw)
    .await
    .unwrap();
    raw.close().await;

    let err = store.append_exchange("Ana", "hola", "adiós").await.unwrap_err();
    assert!(err.is_storage());
    assert_eq!(store.count_turns("Ana").await.unwrap(), 0);

    // Single user turns still go through
    store.append_turn("Ana", Role::User, "hola").await.unwrap();
    assert_eq!(store.count_turns("Ana").await.unwrap(), 1);
}
