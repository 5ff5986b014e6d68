//! End-to-end flow over the in-memory store: sign up, generate a quiz from a
//! scripted model reply, submit answers, then read the analytics back.

use std::sync::Arc;

use async_trait::async_trait;
use services::llm::{LanguageModel, LlmError};
use services::{AppServices, Clock};
use storage::repository::Storage;
use tutor_core::time::fixed_now;

struct ScriptedModel {
    reply: &'static str,
}

#[async_trait]
impl LanguageModel for ScriptedModel {
    async fn complete(&self, _system: &str, _prompt: &str) -> Result<String, LlmError> {
        Ok(self.reply.to_string())
    }
}

const QUIZ_REPLY: &str = r#"[
 {"question": "1/2 + 1/4 = ?", "options": ["3/4", "2/6", "1/8", "2/4"], "correct": 0},
 {"question": "Which is larger?", "options": ["1/3", "1/2", "1/4", "1/5"], "correct": 1},
 {"question": "Simplify 4/8", "options": ["1/4", "2/3", "1/2", "3/4"], "correct": 2},
 {"question": "1 - 1/4 = ?", "options": ["1/2", "1/4", "2/4", "3/4"], "correct": 3},
 {"question": "2/4 equals", "options": ["1/2", "1/3", "1/4", "2/3"], "correct": 0}
]"#;

fn app() -> AppServices {
    let storage = Storage::in_memory();
    AppServices::new(
        Clock::fixed(fixed_now()),
        &storage,
        Arc::new(ScriptedModel { reply: QUIZ_REPLY }),
    )
}

#[tokio::test]
async fn signup_generate_submit_then_stats() {
    let app = app();

    let (token, account) = app
        .auth()
        .signup("asha@example.org", "Asha", "hunter2")
        .await
        .unwrap();
    let caller = app.auth().resolve_caller(&token).await.unwrap();
    assert_eq!(caller, account.id);

    let quiz = app.quizzes().generate(caller, "Fractions", 5).await.unwrap();
    assert_eq!(quiz.questions.len(), 5);

    let outcome = app
        .quizzes()
        .submit(caller, quiz.id, &[0, 1, 0, 3, 0])
        .await
        .unwrap();
    assert_eq!(outcome.correct_count, 4);
    assert_eq!(outcome.percentage, 80);
    assert_eq!(outcome.xp_gained, 40);

    // XP landed on the account.
    let me = app.auth().account(caller).await.unwrap();
    assert_eq!(me.xp, 40);

    // The scored quiz shows up in the listing.
    let quizzes = app.quizzes().list(caller).await.unwrap();
    assert_eq!(quizzes.len(), 1);
    assert_eq!(quizzes[0].score, Some(4));
    assert!(quizzes[0].completed);

    // And the analytics reflect the single 80% entry, scored today.
    let summary = app.progress().stats(caller).await.unwrap();
    assert_eq!(summary.total_completed, 1);
    assert_eq!(summary.average_score, 80);
    assert_eq!(summary.strengths, vec!["Fractions".to_string()]);
    assert!(summary.weaknesses.is_empty());
    assert_eq!(summary.subject_scores["Fractions"], 80);
    assert_eq!(summary.weekly_progress.len(), 7);
    assert_eq!(summary.weekly_progress[6].score, 80);
}

#[tokio::test]
async fn quiz_and_logged_activity_combine_in_stats() {
    let app = app();

    let (_, account) = app
        .auth()
        .signup("ravi@example.org", "Ravi", "hunter2")
        .await
        .unwrap();

    let quiz = app
        .quizzes()
        .generate(account.id, "Fractions", 5)
        .await
        .unwrap();
    // One of five correct: 20%.
    app.quizzes()
        .submit(account.id, quiz.id, &[0, 0, 0, 0, 1])
        .await
        .unwrap();

    app.progress()
        .log_activity(account.id, "Science", "Plants", 90, true)
        .await
        .unwrap();

    let summary = app.progress().stats(account.id).await.unwrap();
    assert_eq!(summary.total_completed, 2);
    // (20 + 90) / 2 = 55.
    assert_eq!(summary.average_score, 55);
    assert_eq!(summary.strengths, vec!["Science".to_string()]);
    assert_eq!(summary.weaknesses, vec!["Fractions".to_string()]);

    // 10 XP for the correct answer, 9 for the logged activity.
    let me = app.auth().account(account.id).await.unwrap();
    assert_eq!(me.xp, 19);
}
