mod database;
mod error;
mod models;
mod services;

use error::AppError;
use models::AppConfig;
use plate_gallery::PhotoStore;
use services::import_service::{save_photos, suggest_plate};
use services::{delete_service, reconcile_service, FsAssetRegistry, SidecarRecognizer};
use std::path::PathBuf;

const USAGE: &str = "usage: plate-organizer [folders | show <plate> | search <query> | \
import <plate|-> [--main] <files...> | delete-photo <id> | delete-folder <plate> | reconcile]";

/// Host actions on the photo store
#[derive(Debug, Clone, PartialEq)]
enum Command {
    Folders,
    Show(String),
    Search(String),
    Import {
        /// `None` asks the recognizer for a suggestion
        plate: Option<String>,
        is_main_plate: bool,
        files: Vec<PathBuf>,
    },
    DeletePhoto(i64),
    DeleteFolder(String),
    Reconcile,
}

fn parse_command(args: &[String]) -> Result<Command, AppError> {
    let usage = || AppError::Validation(USAGE.to_string());

    let Some((action, rest)) = args.split_first() else {
        return Ok(Command::Folders);
    };

    match (action.as_str(), rest) {
        ("folders", []) => Ok(Command::Folders),
        ("show", [plate]) => Ok(Command::Show(plate.clone())),
        ("search", [query]) => Ok(Command::Search(query.clone())),
        ("import", [plate, rest @ ..]) => {
            let is_main_plate = rest.iter().any(|a| a == "--main");
            let files: Vec<PathBuf> = rest
                .iter()
                .filter(|a| *a != "--main")
                .map(PathBuf::from)
                .collect();
            if files.is_empty() {
                return Err(usage());
            }
            let plate = (plate != "-").then(|| plate.clone());
            Ok(Command::Import {
                plate,
                is_main_plate,
                files,
            })
        }
        ("delete-photo", [id]) => id
            .parse()
            .map(Command::DeletePhoto)
            .map_err(|_| AppError::Validation(format!("Invalid photo id: {}", id))),
        ("delete-folder", [plate]) => Ok(Command::DeleteFolder(plate.clone())),
        ("reconcile", []) => Ok(Command::Reconcile),
        _ => Err(usage()),
    }
}

fn print_photos(photos: &[plate_gallery::PhotoRecord]) {
    for photo in photos {
        println!(
            "{:>6}  {:<8}  {:<12}  {}  {}",
            photo.id,
            photo.plate_text,
            photo.category,
            photo.created_at.format("%Y-%m-%d %H:%M"),
            photo.image_uri
        );
    }
}

fn run(command: Command, config: &AppConfig, store: &PhotoStore) -> Result<(), AppError> {
    let registry = FsAssetRegistry::new(&config.library_path);

    match command {
        Command::Folders => {
            for folder in store.list_folders()? {
                println!("{:<10}  {}", folder.plate, folder.cover_image_uri);
            }
        }
        Command::Show(plate) => {
            let photos = store.list_by_plate(&plate.trim().to_uppercase())?;
            if photos.is_empty() {
                return Err(AppError::NotFound(format!("Folder {}", plate)));
            }
            print_photos(&photos);
        }
        Command::Search(query) => print_photos(&store.search(&query)?),
        Command::Import {
            plate,
            is_main_plate,
            files,
        } => {
            let plate = match plate {
                Some(plate) => plate,
                None => {
                    // recognizer output sits next to the file, read it before the move
                    let first = &files[0];
                    suggest_plate(&SidecarRecognizer, first).ok_or_else(|| {
                        AppError::Validation(format!(
                            "No plate detected in {}, please type it",
                            first.display()
                        ))
                    })?
                }
            };

            let saved = save_photos(
                store,
                &registry,
                &files,
                &plate,
                is_main_plate,
                config.min_plate_len,
            )?;
            println!("Saved {} photos in {}", saved, plate.trim().to_uppercase());
        }
        Command::DeletePhoto(id) => delete_service::delete_photo(store, &registry, id)?,
        Command::DeleteFolder(plate) => {
            let plate = plate.trim().to_uppercase();
            let removed = delete_service::delete_folder(store, &registry, &plate)?;
            println!("Deleted {} photos", removed);
        }
        Command::Reconcile => {
            let report = reconcile_service::reconcile(store, &registry)?;
            let json = serde_json::to_string_pretty(&report)
                .map_err(|e| AppError::Other(format!("Cannot render report: {}", e)))?;
            println!("{}", json);
        }
    }

    Ok(())
}

fn start(args: &[String]) -> Result<(), AppError> {
    let command = parse_command(args)?;
    let config = AppConfig::load()?;
    let store = database::init_database(&config)?;
    run(command, &config, &store)
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    if let Err(e) = start(&args) {
        log::error!("{}", e);
        eprintln!("{}", e.user_message());
        std::process::exit(1);
    }
}
