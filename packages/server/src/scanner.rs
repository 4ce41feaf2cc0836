//! Startup scan of the books directory: every PDF on disk gets a catalog
//! row pointing at its `/uploads/books/...` path, created once.

use std::collections::HashSet;
use std::path::Path;

use common::Role;
use sea_orm::*;
use tracing::info;

use crate::entity::{resource, user};

const BOOKS_URL_PREFIX: &str = "/uploads/books/";

/// Human title derived from a PDF filename.
fn title_from_filename(filename: &str) -> String {
    let stem = filename.rsplit_once('.').map_or(filename, |(stem, _)| stem);
    stem.replace(" - libgen.li", "").replace('_', " ").trim().to_string()
}

/// Insert catalog rows for PDFs that do not have one yet. Returns how many
/// rows were added. Skipped entirely when no mentor/manager exists to own
/// the rows.
pub async fn scan_books(db: &DatabaseConnection, books_dir: &Path) -> Result<usize, DbErr> {
    let mut entries = match tokio::fs::read_dir(books_dir).await {
        Ok(entries) => entries,
        Err(_) => {
            info!(dir = %books_dir.display(), "books directory missing, skipping scan");
            return Ok(0);
        }
    };

    let Some(creator) = user::Entity::find()
        .filter(user::Column::Role.is_in([Role::Mentor, Role::Manager]))
        .order_by_asc(user::Column::Id)
        .one(db)
        .await?
    else {
        info!("no mentor or manager account yet, skipping book scan");
        return Ok(0);
    };

    let existing: HashSet<String> = resource::Entity::find()
        .filter(resource::Column::Content.starts_with(BOOKS_URL_PREFIX))
        .all(db)
        .await?
        .into_iter()
        .map(|r| r.content)
        .collect();

    let mut added = 0;
    while let Ok(Some(entry)) = entries.next_entry().await {
        let is_file = entry
            .file_type()
            .await
            .map(|t| t.is_file())
            .unwrap_or(false);
        if !is_file {
            continue;
        }
        let name = entry.file_name();
        let Some(name) = name.to_str() else { continue };
        if !name.to_ascii_lowercase().ends_with(".pdf") {
            continue;
        }

        let resource_path = format!("{BOOKS_URL_PREFIX}{name}");
        if existing.contains(&resource_path) {
            continue;
        }

        let title = title_from_filename(name);
        let now = chrono::Utc::now();
        resource::ActiveModel {
            title: Set(title.clone()),
            content: Set(resource_path.clone()),
            description: Set(Some(format!("PDF book: {title}"))),
            category: Set(Some("Books".into())),
            created_by: Set(creator.id),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(db)
        .await?;
        info!(%title, path = %resource_path, "catalogued book");
        added += 1;
    }

    if added > 0 {
        info!(count = added, "book scan added resources");
    }
    Ok(added)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn titles_are_cleaned_up() {
        assert_eq!(
            title_from_filename("The_Rust_Programming_Language.pdf"),
            "The Rust Programming Language"
        );
        assert_eq!(
            title_from_filename("Algorithms - libgen.li.pdf"),
            "Algorithms"
        );
        assert_eq!(title_from_filename("plain.pdf"), "plain");
        assert_eq!(title_from_filename("noext"), "noext");
    }
}
