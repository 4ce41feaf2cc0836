//! Startup seeding: the default manager account and declarative project
//! fixtures. Both are idempotent check-before-insert passes.

use std::path::Path;

use common::Role;
use sea_orm::*;
use serde::Deserialize;
use tracing::{info, warn};

use crate::config::SeedConfig;
use crate::entity::{project, project_step, step_question, user};
use crate::utils::hash;

/// One project as described by a `fixtures/*.toml` file.
#[derive(Debug, Deserialize)]
pub struct ProjectFixture {
    pub name: String,
    pub description: Option<String>,
    pub project_path: Option<String>,
    pub difficulty: Option<String>,
    pub estimated_minutes: Option<i32>,
    #[serde(default)]
    pub steps: Vec<StepFixture>,
}

#[derive(Debug, Deserialize)]
pub struct StepFixture {
    pub order_index: i32,
    pub title: String,
    pub content: String,
    pub full_code: Option<String>,
    #[serde(default = "default_released")]
    pub is_released: bool,
    #[serde(default)]
    pub code_snippets: Vec<CodeSnippetFixture>,
    #[serde(default)]
    pub questions: Vec<QuestionFixture>,
}

fn default_released() -> bool {
    true
}

#[derive(Debug, Deserialize, serde::Serialize)]
pub struct CodeSnippetFixture {
    pub title: String,
    pub code: String,
    pub explanation: String,
}

#[derive(Debug, Deserialize)]
pub struct QuestionFixture {
    pub prompt: String,
    pub option_a: String,
    pub option_b: String,
    pub option_c: Option<String>,
    pub option_d: Option<String>,
    pub correct_option: String,
    #[serde(default = "default_points")]
    pub points: i32,
}

fn default_points() -> i32 {
    1
}

/// Create the default manager account when no user with the configured
/// username exists.
pub async fn seed_admin_user(db: &DatabaseConnection, seed: &SeedConfig) -> anyhow::Result<()> {
    let existing = user::Entity::find()
        .filter(user::Column::Username.eq(&seed.admin_username))
        .one(db)
        .await?;
    if existing.is_some() {
        return Ok(());
    }

    user::ActiveModel {
        username: Set(seed.admin_username.clone()),
        email: Set(seed.admin_email.clone()),
        password: Set(hash::hash_password(&seed.admin_password)?),
        full_name: Set("System Administrator".into()),
        gender: Set(None),
        batch: Set(None),
        role: Set(Role::Manager),
        is_active: Set(true),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    }
    .insert(db)
    .await?;

    info!(username = %seed.admin_username, "created default manager account");
    Ok(())
}

/// Load every `*.toml` fixture in the directory and insert the projects that
/// do not exist yet. A malformed fixture is logged and skipped rather than
/// aborting startup.
pub async fn seed_fixtures(db: &DatabaseConnection, fixtures_dir: &Path) -> anyhow::Result<()> {
    let mut entries = match tokio::fs::read_dir(fixtures_dir).await {
        Ok(entries) => entries,
        Err(_) => {
            info!(dir = %fixtures_dir.display(), "no fixtures directory, skipping");
            return Ok(());
        }
    };

    while let Ok(Some(entry)) = entries.next_entry().await {
        let path = entry.path();
        if path.extension().and_then(|e| e.to_str()) != Some("toml") {
            continue;
        }

        let text = tokio::fs::read_to_string(&path).await?;
        let fixture: ProjectFixture = match toml::from_str(&text) {
            Ok(fixture) => fixture,
            Err(err) => {
                warn!(path = %path.display(), %err, "skipping malformed fixture");
                continue;
            }
        };
        seed_project(db, fixture).await?;
    }
    Ok(())
}

/// Insert one fixture project with its steps and questions, unless a project
/// of the same name already exists.
pub async fn seed_project(db: &DatabaseConnection, fixture: ProjectFixture) -> anyhow::Result<()> {
    let existing = project::Entity::find()
        .filter(project::Column::Name.eq(&fixture.name))
        .one(db)
        .await?;
    if existing.is_some() {
        return Ok(());
    }

    let txn = db.begin().await?;
    let now = chrono::Utc::now();

    let inserted = project::ActiveModel {
        name: Set(fixture.name.clone()),
        description: Set(fixture.description),
        project_path: Set(fixture.project_path),
        difficulty: Set(fixture.difficulty),
        estimated_minutes: Set(fixture.estimated_minutes),
        is_active: Set(true),
        created_at: Set(now),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    let mut question_count = 0;
    for step in fixture.steps {
        let snippets = if step.code_snippets.is_empty() {
            None
        } else {
            Some(serde_json::to_value(&step.code_snippets)?)
        };

        let inserted_step = project_step::ActiveModel {
            project_id: Set(inserted.id),
            order_index: Set(step.order_index),
            title: Set(step.title),
            content: Set(step.content),
            code_snippets: Set(snippets),
            full_code: Set(step.full_code),
            is_released: Set(step.is_released),
            created_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        for question in step.questions {
            step_question::ActiveModel {
                step_id: Set(inserted_step.id),
                prompt: Set(question.prompt),
                option_a: Set(question.option_a),
                option_b: Set(question.option_b),
                option_c: Set(question.option_c),
                option_d: Set(question.option_d),
                correct_option: Set(question.correct_option.to_ascii_uppercase()),
                points: Set(question.points),
                ..Default::default()
            }
            .insert(&txn)
            .await?;
            question_count += 1;
        }
    }

    txn.commit().await?;
    info!(project = %fixture.name, questions = question_count, "seeded fixture project");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_a_minimal_fixture() {
        let fixture: ProjectFixture = toml::from_str(
            r#"
            name = "Counting"
            difficulty = "beginner"

            [[steps]]
            order_index = 1
            title = "Step 1"
            content = "Count to ten."

            [[steps.questions]]
            prompt = "What comes after 2?"
            option_a = "1"
            option_b = "3"
            correct_option = "b"
            points = 5
            "#,
        )
        .unwrap();

        assert_eq!(fixture.name, "Counting");
        assert_eq!(fixture.steps.len(), 1);
        let step = &fixture.steps[0];
        assert!(step.is_released);
        assert!(step.code_snippets.is_empty());
        assert_eq!(step.questions[0].points, 5);
        assert_eq!(step.questions[0].option_c, None);
    }

    #[test]
    fn question_points_default_to_one() {
        let fixture: ProjectFixture = toml::from_str(
            r#"
            name = "X"
            [[steps]]
            order_index = 1
            title = "t"
            content = "c"
            [[steps.questions]]
            prompt = "p"
            option_a = "a"
            option_b = "b"
            correct_option = "A"
            "#,
        )
        .unwrap();
        assert_eq!(fixture.steps[0].questions[0].points, 1);
    }

    #[test]
    fn shipped_fixture_parses() {
        let text = include_str!("../../../fixtures/multiplication-table.toml");
        let fixture: ProjectFixture = toml::from_str(text).unwrap();
        assert_eq!(fixture.name, "MULTIPLICATION TABLE");
        assert_eq!(fixture.steps.len(), 4);
        let total_questions: usize = fixture.steps.iter().map(|s| s.questions.len()).sum();
        assert_eq!(total_questions, 27);
        assert!(fixture.steps.iter().all(|s| s.is_released));
    }
}
