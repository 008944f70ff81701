// src/cli/commands.rs
use crate::application::services::tree_service::{BookmarkEdit, TreeService};
use crate::cli::args::Commands;
use crate::cli::display::{show_bookmark, show_breadcrumbs, show_entries, show_folder};
use crate::cli::error::{CliError, CliResult};
use crate::config::Settings;
use crate::domain::entry::ListingOrder;
use crate::domain::path;
use crate::infrastructure::repositories::sqlite::migration;
use crate::infrastructure::repositories::sqlite::repository::SqliteTreeRepository;
use std::path::Path;
use termcolor::WriteColor;
use tracing::instrument;

/// Runs a command that needs the tree service.
#[instrument(skip(out, service, settings), level = "debug")]
pub fn run<W: WriteColor>(
    out: &mut W,
    command: Commands,
    service: &dyn TreeService,
    settings: &Settings,
) -> CliResult<()> {
    match command {
        Commands::Ls {
            path,
            interleaved,
            is_json,
        } => {
            let order = if interleaved {
                ListingOrder::Interleaved
            } else {
                settings.listing_order()
            };
            let entries = service.list(&path, order)?;
            if is_json {
                serde_json::to_writer_pretty(&mut *out, &entries)
                    .map_err(|e| CliError::Other(format!("Cannot write json: {}", e)))?;
                writeln!(out)?;
            } else {
                show_breadcrumbs(out, &service.breadcrumbs(&path)?)?;
                show_entries(out, &entries)?;
            }
        }
        Commands::Mkdir { path, title } => {
            let folder = service.create_folder_at(&path, &title)?;
            eprintln!("Created folder {}", path::join(&path, &folder.title));
            writeln!(out, "{}", folder.id)?;
        }
        Commands::Add {
            path,
            url,
            title,
            no_web,
        } => {
            let bookmark = service.add_bookmark_from_url(&path, &url, title.as_deref(), !no_web)?;
            eprintln!("Added {} to {}", bookmark, path::normalize(&path));
            writeln!(out, "{}", bookmark.id)?;
        }
        Commands::Rmdir { id } => {
            service.delete_folder(id)?;
            eprintln!("Deleted folder {}", id);
        }
        Commands::Rm { id } => {
            service.delete_bookmark(id)?;
            eprintln!("Deleted bookmark {}", id);
        }
        Commands::ShowFolder { id } => show_folder(out, &service.get_folder(id)?)?,
        Commands::Show { id } => show_bookmark(out, &service.get_bookmark(id)?)?,
        Commands::MvFolder { id, path } => {
            let folder = service.move_folder(id, &path)?;
            eprintln!("Moved folder {} to {}", folder.id, path::normalize(&path));
        }
        Commands::Mv { id, path } => {
            let bookmark = service.move_bookmark(id, &path)?;
            eprintln!("Moved bookmark {} to {}", bookmark.id, path::normalize(&path));
        }
        Commands::RenameFolder { id, title } => {
            let folder = service.rename_folder(id, &title)?;
            eprintln!("Renamed folder {} to {}", folder.id, folder);
        }
        Commands::Bottom { id, folder } => {
            let sort_key = if folder {
                service.move_folder_to_bottom(id)?
            } else {
                service.move_bookmark_to_bottom(id)?
            };
            eprintln!("Moved {} to position {}", id, sort_key);
        }
        Commands::Edit {
            id,
            title,
            url,
            comment,
        } => {
            if title.is_none() && url.is_none() && comment.is_none() {
                return Err(CliError::InvalidInput(
                    "Nothing to change, give --title, --url or --comment".to_string(),
                ));
            }
            let bookmark = service.update_bookmark(
                id,
                BookmarkEdit {
                    title,
                    url,
                    comment,
                },
            )?;
            show_bookmark(out, &bookmark)?;
        }
        Commands::CreateDb { .. } | Commands::Config { .. } | Commands::Completion { .. } => {
            return Err(CliError::CommandFailed(
                "command does not operate on the bookmark tree".to_string(),
            ));
        }
    }
    Ok(())
}

/// Creates a fresh database holding only the root folder.
#[instrument(skip(out), level = "debug")]
pub fn create_db<W: WriteColor>(out: &mut W, db_path: &str) -> CliResult<()> {
    if Path::new(db_path).exists() {
        return Err(CliError::InvalidInput(format!(
            "Database already exists at: {}. Please choose a different path or delete the existing file.",
            db_path
        )));
    }

    eprintln!("Creating new database at: {}", db_path);
    // creates parent directories and runs migrations
    let repository = SqliteTreeRepository::from_url(db_path)?;
    let mut conn = repository.get_connection()?;
    migration::init_db(&mut conn)?;

    writeln!(out, "Database created successfully at: {}", db_path)?;
    Ok(())
}

pub fn show_config<W: WriteColor>(
    out: &mut W,
    default: bool,
    settings: &Settings,
) -> CliResult<()> {
    let text = if default {
        crate::config::generate_default_config()
    } else {
        toml::to_string_pretty(settings)
            .map_err(|e| CliError::Other(format!("Cannot render settings: {}", e)))?
    };
    write!(out, "{}", text)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::TreeServiceImpl;
    use crate::domain::error::{DomainError, DomainResult};
    use crate::domain::services::metadata::{MetadataFetcher, PageMetadata};
    use crate::util::testing::{setup_test_db, TestDb};
    use std::sync::Arc;
    use termcolor::Buffer;

    #[derive(Debug)]
    struct OfflineFetcher;

    impl MetadataFetcher for OfflineFetcher {
        fn fetch_page_metadata(&self, url: &str) -> DomainResult<PageMetadata> {
            Err(DomainError::CannotFetchMetadata(url.to_string()))
        }
    }

    fn service(db: &TestDb) -> TreeServiceImpl<SqliteTreeRepository> {
        TreeServiceImpl::new(Arc::new(db.repo.clone()), Arc::new(OfflineFetcher))
    }

    fn exec(service: &dyn TreeService, command: Commands) -> CliResult<String> {
        let mut buffer = Buffer::no_color();
        run(&mut buffer, command, service, &Settings::default())?;
        Ok(String::from_utf8(buffer.into_inner()).unwrap())
    }

    #[test]
    fn given_commands_when_run_then_tree_listed() -> CliResult<()> {
        let db = setup_test_db();
        let service = service(&db);

        let id = exec(
            &service,
            Commands::Mkdir {
                path: "/".to_string(),
                title: "dev".to_string(),
            },
        )?;
        exec(
            &service,
            Commands::Add {
                path: "/".to_string(),
                url: "rust-lang.org".to_string(),
                title: Some("Rust".to_string()),
                no_web: true,
            },
        )?;

        let listing = exec(
            &service,
            Commands::Ls {
                path: "/".to_string(),
                interleaved: false,
                is_json: false,
            },
        )?;

        assert_eq!(
            listing,
            format!("/\n{}  dev/\n1  Rust  http://rust-lang.org\n", id.trim())
        );
        Ok(())
    }

    #[test]
    fn given_ls_json_when_run_then_entries_tagged_by_kind() -> CliResult<()> {
        let db = setup_test_db();
        let service = service(&db);
        service.create_folder_at("/", "a")?;

        let json = exec(
            &service,
            Commands::Ls {
                path: "/".to_string(),
                interleaved: true,
                is_json: true,
            },
        )?;

        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value[0]["kind"], "folder");
        assert_eq!(value[0]["title"], "a");
        Ok(())
    }

    #[test]
    fn given_edit_without_changes_when_run_then_invalid_input() {
        let db = setup_test_db();
        let service = service(&db);

        let result = exec(
            &service,
            Commands::Edit {
                id: 1,
                title: None,
                url: None,
                comment: None,
            },
        );

        assert!(matches!(result, Err(CliError::InvalidInput(_))));
    }

    #[test]
    fn given_missing_folder_when_show_then_not_found() {
        let db = setup_test_db();
        let service = service(&db);

        let err = exec(&service, Commands::ShowFolder { id: 42 }).unwrap_err();

        assert!(err.is_not_found());
    }

    #[test]
    fn given_new_path_when_create_db_then_root_only() -> CliResult<()> {
        let dir = tempfile::tempdir()?;
        let db_path = dir.path().join("sub/tree.db");
        let db_path = db_path.to_string_lossy();
        let mut buffer = Buffer::no_color();

        create_db(&mut buffer, &db_path)?;

        let service = TreeServiceImpl::new(
            Arc::new(SqliteTreeRepository::from_url(&db_path)?),
            Arc::new(OfflineFetcher),
        );
        assert!(service.list("/", ListingOrder::FoldersFirst)?.is_empty());
        assert!(matches!(
            create_db(&mut buffer, &db_path),
            Err(CliError::InvalidInput(_))
        ));
        Ok(())
    }

    #[test]
    fn given_settings_when_show_config_then_toml() -> CliResult<()> {
        let mut buffer = Buffer::no_color();
        let settings = Settings {
            db_url: "/x/tree.db".to_string(),
            folders_first: false,
            fetch_timeout_ms: 500,
        };

        show_config(&mut buffer, false, &settings)?;

        let text = String::from_utf8(buffer.into_inner()).unwrap();
        assert!(text.contains("db_url = \"/x/tree.db\""));
        assert!(text.contains("folders_first = false"));
        Ok(())
    }
}
